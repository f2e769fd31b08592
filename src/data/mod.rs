//! Data-provider contract used by every route.
//!
//! Each operation runs against PostgreSQL when a pool is available and mock
//! mode is off, otherwise against the bundled mock store. Reads that hit a
//! database error are served from the bundled data instead; writes that hit
//! one report a generic failure.

pub mod mock;

use std::{future::Future, sync::Arc};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::db::{
    self,
    models::{
        Blog, ContentStatus, Lead, NewContactSubmission, NewFunnelEvent, NewLead, Notification,
        PortfolioItem, Service, ServiceDetail, Testimonial,
    },
    queries,
};
use crate::error::DataError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Listing filters shared by all content collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<ContentStatus>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

impl ContentFilter {
    /// `(page, page_size, offset)` after clamping.
    pub fn window(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        // `page` comes straight from the query string
        (page, page_size, (page - 1).saturating_mul(page_size))
    }

    pub fn status_or_default(&self) -> ContentStatus {
        self.status.unwrap_or_default()
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Duplicate,
    Failed,
}

/// Result of a public submission, shaped for the frontend widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip, default = "failed_outcome")]
    pub outcome: Outcome,
}

fn failed_outcome() -> Outcome {
    Outcome::Failed
}

impl SubmissionResult {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            outcome: Outcome::Accepted,
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            outcome: Outcome::Duplicate,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            outcome: Outcome::Failed,
        }
    }
}

const CONTACT_OK: &str = "Thanks for reaching out! We'll get back to you within 24 hours.";
const CONTACT_FAILED: &str = "Something went wrong sending your message. Please try again later.";
const NEWSLETTER_OK: &str = "You're subscribed! Watch your inbox for design tips.";
const NEWSLETTER_DUPLICATE: &str = "This email is already subscribed.";
const NEWSLETTER_FAILED: &str = "Could not subscribe right now. Please try again later.";
const LEAD_OK: &str = "Thanks! Your details are on their way to us.";
const LEAD_FAILED: &str = "Could not save your details right now. Please try again later.";
const EVENT_OK: &str = "Event recorded";
const EVENT_FAILED: &str = "Could not record event";

/// Pool to use for this call, or `None` when serving bundled data.
fn active_pool() -> Option<Arc<PgPool>> {
    if config::SITE.use_mock_data {
        return None;
    }
    db::get_pool()
}

/// Name of the source currently serving content.
pub fn source_name() -> &'static str {
    if active_pool().is_some() {
        "database"
    } else {
        "mock"
    }
}

async fn read_with_fallback<T, D, DFut, M, MFut>(what: &'static str, from_db: D, from_mock: M) -> T
where
    D: FnOnce(Arc<PgPool>) -> DFut,
    DFut: Future<Output = Result<T, DataError>>,
    M: FnOnce() -> MFut,
    MFut: Future<Output = T>,
{
    read_from(active_pool(), what, from_db, from_mock).await
}

async fn read_from<T, D, DFut, M, MFut>(
    pool: Option<Arc<PgPool>>,
    what: &'static str,
    from_db: D,
    from_mock: M,
) -> T
where
    D: FnOnce(Arc<PgPool>) -> DFut,
    DFut: Future<Output = Result<T, DataError>>,
    M: FnOnce() -> MFut,
    MFut: Future<Output = T>,
{
    if let Some(pool) = pool {
        match from_db(pool).await {
            Ok(value) => return value,
            Err(e) => {
                tracing::warn!(query = what, error = %e, "database read failed, serving bundled data");
            }
        }
    }
    from_mock().await
}

async fn notify_owner(pool: &PgPool, kind: &str, title: &str, message: &str) {
    if let Err(e) = queries::insert_notification(pool, kind, title, message).await {
        tracing::warn!(kind = %kind, error = %e, "failed to store owner notification");
    }
}

pub async fn fetch_blogs(filter: &ContentFilter) -> Paginated<Blog> {
    read_with_fallback(
        "blogs",
        |pool| async move { queries::list_blogs(&pool, filter).await },
        || mock::store().blogs(filter),
    )
    .await
}

pub async fn fetch_blog(slug: &str) -> Option<Blog> {
    read_with_fallback(
        "blog",
        |pool| async move { queries::find_blog(&pool, slug).await },
        || mock::store().blog(slug),
    )
    .await
}

/// Bump the view counter of a published post. `Ok(None)` means no such post.
pub async fn increment_blog_views(slug: &str) -> Result<Option<i64>, DataError> {
    match active_pool() {
        Some(pool) => queries::increment_blog_views(&pool, slug).await,
        None => Ok(mock::store().increment_blog_views(slug).await),
    }
}

pub async fn fetch_portfolio(filter: &ContentFilter) -> Paginated<PortfolioItem> {
    read_with_fallback(
        "portfolio",
        |pool| async move { queries::list_portfolio(&pool, filter).await },
        || async { mock::store().portfolio(filter) },
    )
    .await
}

pub async fn fetch_portfolio_item(slug: &str) -> Option<PortfolioItem> {
    read_with_fallback(
        "portfolio_item",
        |pool| async move { queries::find_portfolio_item(&pool, slug).await },
        || async { mock::store().portfolio_item(slug) },
    )
    .await
}

pub async fn fetch_services(filter: &ContentFilter) -> Paginated<Service> {
    read_with_fallback(
        "services",
        |pool| async move { queries::list_services(&pool, filter).await },
        || async { mock::store().services(filter) },
    )
    .await
}

/// Service by slug with its testimonials resolved. Dangling testimonial ids
/// are skipped.
pub async fn fetch_service(slug: &str) -> Option<ServiceDetail> {
    read_with_fallback(
        "service",
        |pool| async move {
            let Some(service) = queries::find_service(&pool, slug).await? else {
                return Ok(None);
            };
            let testimonials = queries::testimonials_by_ids(&pool, &service.testimonial_ids).await?;
            Ok(Some(ServiceDetail {
                service,
                testimonials,
            }))
        },
        || async { mock::store().service(slug) },
    )
    .await
}

pub async fn fetch_testimonials(filter: &ContentFilter) -> Paginated<Testimonial> {
    read_with_fallback(
        "testimonials",
        |pool| async move { queries::list_testimonials(&pool, filter).await },
        || async { mock::store().testimonials(filter) },
    )
    .await
}

pub async fn fetch_notifications(unread_only: bool) -> Vec<Notification> {
    read_with_fallback(
        "notifications",
        |pool| async move { queries::list_notifications(&pool, unread_only).await },
        || mock::store().notifications(unread_only),
    )
    .await
}

pub async fn mark_notification_read(id: Uuid) -> Result<bool, DataError> {
    match active_pool() {
        Some(pool) => queries::mark_notification_read(&pool, id).await,
        None => Ok(mock::store().mark_notification_read(id).await),
    }
}

pub async fn submit_contact_form(fields: &NewContactSubmission) -> SubmissionResult {
    let Some(pool) = active_pool() else {
        mock::store().submit_contact(fields).await;
        return SubmissionResult::accepted(CONTACT_OK);
    };

    match queries::insert_contact_submission(&pool, fields).await {
        Ok(submission) => {
            tracing::info!(submission_id = %submission.id, "contact submission stored");
            notify_owner(
                &pool,
                "contact",
                &format!("New message from {}", submission.name),
                &submission.message,
            )
            .await;
            SubmissionResult::accepted(CONTACT_OK)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store contact submission");
            SubmissionResult::failed(CONTACT_FAILED)
        }
    }
}

pub async fn subscribe_newsletter(email: &str) -> SubmissionResult {
    let lead = NewLead {
        name: String::new(),
        email: email.trim().to_string(),
        whatsapp: None,
        project: None,
        source: "newsletter".to_string(),
    };

    let Some(pool) = active_pool() else {
        return if mock::store().subscribe_newsletter(lead).await {
            SubmissionResult::accepted(NEWSLETTER_OK)
        } else {
            SubmissionResult::duplicate(NEWSLETTER_DUPLICATE)
        };
    };

    match queries::newsletter_subscriber_exists(&pool, &lead.email).await {
        Ok(true) => return SubmissionResult::duplicate(NEWSLETTER_DUPLICATE),
        Ok(false) => {}
        Err(e) => {
            tracing::error!(error = %e, "failed to check newsletter subscription");
            return SubmissionResult::failed(NEWSLETTER_FAILED);
        }
    }

    newsletter_result(queries::insert_lead(&pool, &lead).await)
}

/// A concurrent signup can pass the existence check and still lose the
/// race on the unique index; that is a duplicate, not a failure.
fn newsletter_result(inserted: Result<Lead, DataError>) -> SubmissionResult {
    match inserted {
        Ok(stored) => {
            tracing::info!(lead_id = %stored.id, "newsletter subscription stored");
            SubmissionResult::accepted(NEWSLETTER_OK)
        }
        Err(e) if e.is_unique_violation() => SubmissionResult::duplicate(NEWSLETTER_DUPLICATE),
        Err(e) => {
            tracing::error!(error = %e, "failed to store newsletter subscription");
            SubmissionResult::failed(NEWSLETTER_FAILED)
        }
    }
}

pub async fn capture_lead(lead: &NewLead) -> SubmissionResult {
    let Some(pool) = active_pool() else {
        mock::store().capture_lead(lead).await;
        return SubmissionResult::accepted(LEAD_OK);
    };

    match queries::insert_lead(&pool, lead).await {
        Ok(stored) => {
            tracing::info!(lead_id = %stored.id, source = %stored.source, "lead stored");
            notify_owner(
                &pool,
                "lead",
                &format!("New {} lead: {}", stored.source, stored.name),
                &stored.email,
            )
            .await;
            SubmissionResult::accepted(LEAD_OK)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store lead");
            SubmissionResult::failed(LEAD_FAILED)
        }
    }
}

pub async fn record_funnel_event(event: &NewFunnelEvent) -> SubmissionResult {
    let Some(pool) = active_pool() else {
        mock::store().record_funnel_event(event).await;
        return SubmissionResult::accepted(EVENT_OK);
    };

    match queries::insert_funnel_event(&pool, event).await {
        Ok(_) => SubmissionResult::accepted(EVENT_OK),
        Err(e) => {
            tracing::error!(error = %e, event_type = %event.event_type, "failed to store funnel event");
            SubmissionResult::failed(EVENT_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_and_clamps() {
        let filter = ContentFilter::default();
        assert_eq!(filter.window(), (1, 10, 0));

        let filter = ContentFilter {
            page: Some(0),
            page_size: Some(500),
            ..Default::default()
        };
        assert_eq!(filter.window(), (1, 100, 0));

        let filter = ContentFilter {
            page: Some(3),
            page_size: Some(4),
            ..Default::default()
        };
        assert_eq!(filter.window(), (3, 4, 8));
    }

    #[test]
    fn test_window_saturates_on_huge_page() {
        let filter = ContentFilter {
            page: Some(i64::MAX),
            page_size: Some(100),
            ..Default::default()
        };
        let (page, page_size, offset) = filter.window();
        assert_eq!((page, page_size), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);

        let filter = ContentFilter {
            page: Some(i64::MIN),
            ..Default::default()
        };
        assert_eq!(filter.window(), (1, 10, 0));
    }

    #[test]
    fn test_status_defaults_to_published() {
        assert_eq!(
            ContentFilter::default().status_or_default(),
            ContentStatus::Published
        );
    }

    #[test]
    fn test_submission_result_hides_outcome() {
        let json = serde_json::to_value(SubmissionResult::duplicate("dup")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("outcome").is_none());
    }

    #[tokio::test]
    async fn test_failed_database_read_serves_bundled_data() {
        // lazy pool pointed at a closed port: every query fails
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(1))
            .connect_lazy("postgresql://studio@127.0.0.1:1/studio")
            .unwrap();
        let filter = &ContentFilter::default();

        let page = read_from(
            Some(Arc::new(pool)),
            "blogs",
            |pool| async move { queries::list_blogs(&pool, filter).await },
            || mock::store().blogs(filter),
        )
        .await;

        assert!(!page.items.is_empty());
        assert!(page
            .items
            .iter()
            .all(|b| b.status == ContentStatus::Published));
    }

    #[test]
    fn test_source_is_mock_without_pool() {
        assert_eq!(source_name(), "mock");
    }

    #[tokio::test]
    async fn test_fetch_blogs_is_deterministic_without_database() {
        let filter = ContentFilter {
            page_size: Some(2),
            ..Default::default()
        };
        let first = fetch_blogs(&filter).await;
        let second = fetch_blogs(&filter).await;
        let slugs = |p: &Paginated<Blog>| p.items.iter().map(|b| b.slug.clone()).collect::<Vec<_>>();
        assert_eq!(slugs(&first), slugs(&second));
        assert_eq!(first.total, second.total);
        assert_eq!(first.items.len(), 2);
    }

    #[tokio::test]
    async fn test_newsletter_rejects_duplicate_email() {
        let first = subscribe_newsletter("repeat-reader@example.com").await;
        assert!(first.success);
        let second = subscribe_newsletter("Repeat-Reader@example.com").await;
        assert!(!second.success);
        assert_eq!(second.outcome, Outcome::Duplicate);
    }

    #[test]
    fn test_newsletter_insert_race_is_duplicate() {
        use crate::error::tests::db_error;
        use sqlx::error::ErrorKind;

        let lost_race = newsletter_result(Err(db_error(ErrorKind::UniqueViolation)));
        assert_eq!(lost_race.outcome, Outcome::Duplicate);
        assert_eq!(lost_race.message, NEWSLETTER_DUPLICATE);

        let broken = newsletter_result(Err(db_error(ErrorKind::Other)));
        assert_eq!(broken.outcome, Outcome::Failed);
    }

    #[tokio::test]
    async fn test_service_detail_resolves_testimonials() {
        let detail = fetch_service("logo-design").await.expect("bundled service");
        assert!(!detail.testimonials.is_empty());
        for t in &detail.testimonials {
            assert!(detail.service.testimonial_ids.contains(&t.id));
        }
    }
}
