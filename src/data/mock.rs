//! Bundled mock content compiled into the binary, plus in-memory storage for
//! submissions made while running without a database.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContentFilter, Paginated};
use crate::db::models::{
    Blog, ContactSubmission, ContentStatus, FunnelEvent, Lead, NewContactSubmission,
    NewFunnelEvent, NewLead, Notification, PortfolioItem, Service, ServiceDetail, Testimonial,
};
use crate::error::DataError;

const BLOGS_JSON: &str = include_str!("../../data/mock/blogs.json");
const PORTFOLIO_JSON: &str = include_str!("../../data/mock/portfolio.json");
const SERVICES_JSON: &str = include_str!("../../data/mock/services.json");
const TESTIMONIALS_JSON: &str = include_str!("../../data/mock/testimonials.json");
const NOTIFICATIONS_JSON: &str = include_str!("../../data/mock/notifications.json");

/// Most records each in-memory collection keeps; the oldest are dropped first.
pub const MAX_RECORDS: usize = 1000;

static STORE: Lazy<MockStore> = Lazy::new(MockStore::bundled);

fn push_capped<T>(records: &mut VecDeque<T>, record: T, cap: usize) {
    records.push_back(record);
    while records.len() > cap {
        records.pop_front();
    }
}

/// Process-wide mock store.
pub fn store() -> &'static MockStore {
    &STORE
}

pub(crate) fn parse_bundle<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, DataError> {
    Ok(serde_json::from_str(raw)?)
}

fn load<T: DeserializeOwned>(name: &str, raw: &str) -> Vec<T> {
    parse_bundle(raw).unwrap_or_else(|e| {
        tracing::error!(bundle = %name, error = %e, "failed to parse bundled mock data");
        Vec::new()
    })
}

/// Filter/sort hooks used by [`select`]. The flags mirror which columns the
/// SQL listing filters on, so both sources answer a filter the same way.
pub trait Listable {
    const HAS_STATUS: bool;
    const HAS_CATEGORY: bool;
    const HAS_TAGS: bool;
    const HAS_FEATURED: bool = true;

    fn status(&self) -> ContentStatus {
        ContentStatus::Published
    }
    fn category(&self) -> Option<&str> {
        None
    }
    fn tags(&self) -> &[String] {
        &[]
    }
    fn featured(&self) -> bool;
    fn search_text(&self) -> &str;
    /// Sorted descending.
    fn sort_key(&self) -> (bool, DateTime<Utc>, DateTime<Utc>);
}

impl Listable for Blog {
    const HAS_STATUS: bool = true;
    const HAS_CATEGORY: bool = true;
    const HAS_TAGS: bool = true;
    const HAS_FEATURED: bool = false;

    fn status(&self) -> ContentStatus {
        self.status
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn featured(&self) -> bool {
        false
    }
    fn search_text(&self) -> &str {
        &self.title
    }
    fn sort_key(&self) -> (bool, DateTime<Utc>, DateTime<Utc>) {
        (
            self.published_at.is_some(),
            self.published_at.unwrap_or(self.created_at),
            self.created_at,
        )
    }
}

impl Listable for PortfolioItem {
    const HAS_STATUS: bool = true;
    const HAS_CATEGORY: bool = true;
    const HAS_TAGS: bool = true;

    fn status(&self) -> ContentStatus {
        self.status
    }
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn featured(&self) -> bool {
        self.featured
    }
    fn search_text(&self) -> &str {
        &self.title
    }
    fn sort_key(&self) -> (bool, DateTime<Utc>, DateTime<Utc>) {
        (true, self.created_at, self.created_at)
    }
}

impl Listable for Service {
    const HAS_STATUS: bool = true;
    const HAS_CATEGORY: bool = true;
    const HAS_TAGS: bool = false;

    fn status(&self) -> ContentStatus {
        self.status
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
    fn featured(&self) -> bool {
        self.featured
    }
    fn search_text(&self) -> &str {
        &self.title
    }
    fn sort_key(&self) -> (bool, DateTime<Utc>, DateTime<Utc>) {
        (true, self.created_at, self.created_at)
    }
}

impl Listable for Testimonial {
    const HAS_STATUS: bool = false;
    const HAS_CATEGORY: bool = false;
    const HAS_TAGS: bool = false;

    fn featured(&self) -> bool {
        self.featured
    }
    fn search_text(&self) -> &str {
        &self.client_name
    }
    fn sort_key(&self) -> (bool, DateTime<Utc>, DateTime<Utc>) {
        (true, self.created_at, self.created_at)
    }
}

fn matches<T: Listable>(record: &T, filter: &ContentFilter) -> bool {
    if T::HAS_STATUS && record.status() != filter.status_or_default() {
        return false;
    }
    if T::HAS_CATEGORY {
        if let Some(category) = filter.category.as_deref() {
            match record.category() {
                Some(c) if c.eq_ignore_ascii_case(category) => {}
                _ => return false,
            }
        }
    }
    if T::HAS_TAGS {
        if let Some(tag) = filter.tag.as_deref() {
            if !record.tags().iter().any(|t| t == tag) {
                return false;
            }
        }
    }
    if T::HAS_FEATURED {
        if let Some(featured) = filter.featured {
            if record.featured() != featured {
                return false;
            }
        }
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if !record
            .search_text()
            .to_lowercase()
            .contains(&search.to_lowercase())
        {
            return false;
        }
    }
    true
}

/// Filter, sort newest first, and slice one page out of `records`.
pub fn select<T: Listable + Clone>(records: &[T], filter: &ContentFilter) -> Paginated<T> {
    let (page, page_size, offset) = filter.window();

    let mut matched: Vec<&T> = records.iter().filter(|r| matches(*r, filter)).collect();
    matched.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

    let total = matched.len() as i64;
    let items = matched
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(page_size).unwrap_or(0))
        .cloned()
        .collect();

    Paginated {
        items,
        page,
        page_size,
        total,
    }
}

pub struct MockStore {
    blogs: RwLock<Vec<Blog>>,
    portfolio: Vec<PortfolioItem>,
    services: Vec<Service>,
    testimonials: Vec<Testimonial>,
    notifications: RwLock<VecDeque<Notification>>,
    contact_submissions: RwLock<VecDeque<ContactSubmission>>,
    leads: RwLock<VecDeque<Lead>>,
    funnel_events: RwLock<VecDeque<FunnelEvent>>,
    capacity: usize,
}

impl MockStore {
    pub fn bundled() -> Self {
        Self::with_capacity(MAX_RECORDS)
    }

    /// Bundled content with writes capped at `capacity` per collection.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut notifications: VecDeque<Notification> =
            load("notifications", NOTIFICATIONS_JSON).into();
        notifications.truncate(capacity);
        let store = Self {
            blogs: RwLock::new(load("blogs", BLOGS_JSON)),
            portfolio: load("portfolio", PORTFOLIO_JSON),
            services: load("services", SERVICES_JSON),
            testimonials: load("testimonials", TESTIMONIALS_JSON),
            notifications: RwLock::new(notifications),
            contact_submissions: RwLock::new(VecDeque::new()),
            leads: RwLock::new(VecDeque::new()),
            funnel_events: RwLock::new(VecDeque::new()),
            capacity,
        };
        tracing::debug!(
            portfolio = store.portfolio.len(),
            services = store.services.len(),
            testimonials = store.testimonials.len(),
            "mock store loaded"
        );
        store
    }

    pub async fn blogs(&self, filter: &ContentFilter) -> Paginated<Blog> {
        let blogs = self.blogs.read().await;
        select(blogs.as_slice(), filter)
    }

    pub async fn blog(&self, slug: &str) -> Option<Blog> {
        self.blogs
            .read()
            .await
            .iter()
            .find(|b| b.slug == slug && b.status == ContentStatus::Published)
            .cloned()
    }

    pub async fn increment_blog_views(&self, slug: &str) -> Option<i64> {
        let mut blogs = self.blogs.write().await;
        let blog = blogs
            .iter_mut()
            .find(|b| b.slug == slug && b.status == ContentStatus::Published)?;
        blog.view_count += 1;
        Some(blog.view_count)
    }

    pub fn portfolio(&self, filter: &ContentFilter) -> Paginated<PortfolioItem> {
        select(&self.portfolio, filter)
    }

    pub fn portfolio_item(&self, slug: &str) -> Option<PortfolioItem> {
        self.portfolio
            .iter()
            .find(|p| p.slug == slug && p.status == ContentStatus::Published)
            .cloned()
    }

    pub fn services(&self, filter: &ContentFilter) -> Paginated<Service> {
        select(&self.services, filter)
    }

    pub fn service(&self, slug: &str) -> Option<ServiceDetail> {
        let service = self
            .services
            .iter()
            .find(|s| s.slug == slug && s.status == ContentStatus::Published)?
            .clone();
        let testimonials = self
            .testimonials
            .iter()
            .filter(|t| service.testimonial_ids.contains(&t.id))
            .cloned()
            .collect();
        Some(ServiceDetail {
            service,
            testimonials,
        })
    }

    pub fn testimonials(&self, filter: &ContentFilter) -> Paginated<Testimonial> {
        select(&self.testimonials, filter)
    }

    pub async fn notifications(&self, unread_only: bool) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| !unread_only || !n.is_read)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(100);
        items
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> bool {
        let mut notifications = self.notifications.write().await;
        match notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    async fn push_notification(&self, kind: &str, title: String, message: String) {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            title,
            message,
            is_read: false,
            created_at: Utc::now(),
        };
        push_capped(
            &mut *self.notifications.write().await,
            notification,
            self.capacity,
        );
    }

    pub async fn submit_contact(&self, fields: &NewContactSubmission) -> ContactSubmission {
        let submission = ContactSubmission {
            id: Uuid::new_v4(),
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            subject: fields.subject.clone(),
            message: fields.message.clone(),
            service: fields.service.clone(),
            budget: fields.budget.clone(),
            created_at: Utc::now(),
        };
        push_capped(
            &mut *self.contact_submissions.write().await,
            submission.clone(),
            self.capacity,
        );
        self.push_notification(
            "contact",
            format!("New message from {}", submission.name),
            submission.message.clone(),
        )
        .await;
        tracing::info!(submission_id = %submission.id, "contact submission kept in memory");
        submission
    }

    fn lead_from(new: &NewLead) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            email: new.email.clone(),
            whatsapp: new.whatsapp.clone(),
            project: new.project.clone(),
            source: new.source.clone(),
            created_at: Utc::now(),
        }
    }

    /// `false` when the email is already on the list.
    pub async fn subscribe_newsletter(&self, lead: NewLead) -> bool {
        let mut leads = self.leads.write().await;
        let exists = leads
            .iter()
            .any(|l| l.source == "newsletter" && l.email.eq_ignore_ascii_case(&lead.email));
        if exists {
            return false;
        }
        push_capped(&mut *leads, Self::lead_from(&lead), self.capacity);
        true
    }

    pub async fn capture_lead(&self, new: &NewLead) -> Lead {
        let lead = Self::lead_from(new);
        push_capped(&mut *self.leads.write().await, lead.clone(), self.capacity);
        self.push_notification(
            "lead",
            format!("New {} lead: {}", lead.source, lead.name),
            lead.email.clone(),
        )
        .await;
        tracing::info!(lead_id = %lead.id, source = %lead.source, "lead kept in memory");
        lead
    }

    pub async fn record_funnel_event(&self, new: &NewFunnelEvent) -> FunnelEvent {
        let event = FunnelEvent {
            id: Uuid::new_v4(),
            event_type: new.event_type.clone(),
            page: new.page.clone(),
            session_id: new.session_id.clone(),
            metadata: new.metadata.clone(),
            created_at: Utc::now(),
        };
        push_capped(
            &mut *self.funnel_events.write().await,
            event.clone(),
            self.capacity,
        );
        event
    }

    pub async fn leads(&self) -> Vec<Lead> {
        self.leads.read().await.iter().cloned().collect()
    }

    pub async fn contact_submissions(&self) -> Vec<ContactSubmission> {
        self.contact_submissions.read().await.iter().cloned().collect()
    }

    pub async fn funnel_events(&self) -> Vec<FunnelEvent> {
        self.funnel_events.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundles_parse() {
        assert!(!parse_bundle::<Blog>(BLOGS_JSON).unwrap().is_empty());
        assert!(!parse_bundle::<PortfolioItem>(PORTFOLIO_JSON).unwrap().is_empty());
        assert!(!parse_bundle::<Service>(SERVICES_JSON).unwrap().is_empty());
        assert!(!parse_bundle::<Testimonial>(TESTIMONIALS_JSON).unwrap().is_empty());
        assert!(!parse_bundle::<Notification>(NOTIFICATIONS_JSON).unwrap().is_empty());
    }

    #[test]
    fn test_push_capped_drops_oldest() {
        let mut records = VecDeque::new();
        for n in 0..5 {
            push_capped(&mut records, n, 3);
        }
        assert_eq!(records, VecDeque::from(vec![2, 3, 4]));
    }

    #[tokio::test]
    async fn test_writes_are_capped() {
        let store = MockStore::with_capacity(3);
        for n in 0..5 {
            store
                .record_funnel_event(&NewFunnelEvent {
                    event_type: format!("event_{}", n),
                    page: None,
                    session_id: None,
                    metadata: serde_json::json!({}),
                })
                .await;
            store
                .capture_lead(&NewLead {
                    email: format!("cap{}@example.com", n),
                    source: "popup".to_string(),
                    ..Default::default()
                })
                .await;
        }

        let events = store.funnel_events().await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, "event_2");
        assert_eq!(store.leads().await.len(), 3);
        assert_eq!(store.notifications(false).await.len(), 3);
    }

    #[test]
    fn test_bundled_slugs_are_unique() {
        let blogs = parse_bundle::<Blog>(BLOGS_JSON).unwrap();
        let mut slugs: Vec<_> = blogs.iter().map(|b| b.slug.as_str()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), blogs.len());
    }

    #[test]
    fn test_select_hides_drafts_and_archived_by_default() {
        let store = MockStore::bundled();
        let all = store.portfolio(&ContentFilter {
            page_size: Some(100),
            ..Default::default()
        });
        assert!(all.items.iter().all(|p| p.status == ContentStatus::Published));

        let drafts = store.portfolio(&ContentFilter {
            status: Some(ContentStatus::Draft),
            ..Default::default()
        });
        assert!(drafts.items.iter().all(|p| p.status == ContentStatus::Draft));
    }

    #[test]
    fn test_select_paginates_consistently() {
        let store = MockStore::bundled();
        let page = |n| {
            store.portfolio(&ContentFilter {
                page: Some(n),
                page_size: Some(2),
                ..Default::default()
            })
        };
        let first = page(1);
        let second = page(2);
        assert_eq!(first.total, second.total);
        assert_eq!(first.items.len(), 2);
        assert!(first
            .items
            .iter()
            .all(|a| second.items.iter().all(|b| a.id != b.id)));
        assert!(first.items[0].created_at >= first.items[1].created_at);
    }

    #[test]
    fn test_select_page_past_end_is_empty() {
        let store = MockStore::bundled();
        let page = store.services(&ContentFilter {
            page: Some(50),
            ..Default::default()
        });
        assert!(page.items.is_empty());
        assert!(page.total > 0);
    }

    #[test]
    fn test_select_filters_category_and_search() {
        let store = MockStore::bundled();
        let branding = store.portfolio(&ContentFilter {
            category: Some("BRANDING".to_string()),
            ..Default::default()
        });
        assert!(branding.total > 0);
        assert!(branding
            .items
            .iter()
            .all(|p| p.category.eq_ignore_ascii_case("branding")));

        let search = store.services(&ContentFilter {
            search: Some("logo".to_string()),
            ..Default::default()
        });
        assert_eq!(search.total, 1);
        assert_eq!(search.items[0].slug, "logo-design");
    }

    #[test]
    fn test_select_ignores_tag_for_untagged_collections() {
        let store = MockStore::bundled();
        let plain = store.services(&ContentFilter::default());
        let tagged = store.services(&ContentFilter {
            tag: Some("anything".to_string()),
            ..Default::default()
        });
        assert_eq!(plain.total, tagged.total);
    }

    #[tokio::test]
    async fn test_blogs_sorted_by_publication_date() {
        let store = MockStore::bundled();
        let page = store
            .blogs(&ContentFilter {
                page_size: Some(100),
                ..Default::default()
            })
            .await;
        let dates: Vec<_> = page.items.iter().map(|b| b.published_at).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn test_increment_views_only_for_published() {
        let store = MockStore::bundled();
        let before = store.blog("logo-design-mistakes").await.unwrap().view_count;
        let after = store.increment_blog_views("logo-design-mistakes").await;
        assert_eq!(after, Some(before + 1));
        assert_eq!(store.increment_blog_views("upcoming-rebrand-checklist").await, None);
        assert_eq!(store.increment_blog_views("no-such-post").await, None);
    }

    #[tokio::test]
    async fn test_contact_submission_creates_notification() {
        let store = MockStore::bundled();
        let before = store.notifications(true).await.len();
        store
            .submit_contact(&NewContactSubmission {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                message: "Need a logo".to_string(),
                ..Default::default()
            })
            .await;
        assert_eq!(store.contact_submissions().await.len(), 1);
        let unread = store.notifications(true).await;
        assert_eq!(unread.len(), before + 1);
        assert_eq!(unread[0].kind, "contact");
    }

    #[tokio::test]
    async fn test_mark_notification_read() {
        let store = MockStore::bundled();
        let unread = store.notifications(true).await;
        let id = unread[0].id;
        assert!(store.mark_notification_read(id).await);
        assert!(store.notifications(true).await.iter().all(|n| n.id != id));
        assert!(!store.mark_notification_read(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_record_funnel_event() {
        let store = MockStore::bundled();
        store
            .record_funnel_event(&NewFunnelEvent {
                event_type: "cta_click".to_string(),
                page: Some("/pricing".to_string()),
                session_id: None,
                metadata: serde_json::json!({ "button": "get-quote" }),
            })
            .await;
        let events = store.funnel_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata["button"], "get-quote");
    }
}
