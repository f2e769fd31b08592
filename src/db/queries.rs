//! SQL for the content reads and public submissions.

use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{
    Blog, ContactSubmission, FunnelEvent, Lead, NewContactSubmission, NewFunnelEvent, NewLead,
    Notification, PortfolioItem, Service, Testimonial,
};
use crate::data::{ContentFilter, Paginated};
use crate::error::DataError;

const BLOG_COLUMNS: &str = "id, title, slug, excerpt, content, cover_image, category, tags, author, \
     status, view_count, published_at, created_at, updated_at";
const PORTFOLIO_COLUMNS: &str = "id, title, slug, description, category, client, image_url, gallery, \
     tags, featured, status, created_at, updated_at";
const SERVICE_COLUMNS: &str = "id, title, slug, description, category, base_price, features, \
     delivery_days, testimonial_ids, featured, status, created_at, updated_at";
const TESTIMONIAL_COLUMNS: &str =
    "id, client_name, company, content, rating, avatar_url, featured, created_at";

/// Which filters a table supports and how it sorts.
struct Listing {
    table: &'static str,
    columns: &'static str,
    order_by: &'static str,
    search_column: &'static str,
    has_status: bool,
    has_category: bool,
    has_tags: bool,
    has_featured: bool,
}

const BLOGS: Listing = Listing {
    table: "blogs",
    columns: BLOG_COLUMNS,
    order_by: "published_at DESC NULLS LAST, created_at DESC",
    search_column: "title",
    has_status: true,
    has_category: true,
    has_tags: true,
    has_featured: false,
};

const PORTFOLIO: Listing = Listing {
    table: "portfolio",
    columns: PORTFOLIO_COLUMNS,
    order_by: "created_at DESC",
    search_column: "title",
    has_status: true,
    has_category: true,
    has_tags: true,
    has_featured: true,
};

const SERVICES: Listing = Listing {
    table: "services",
    columns: SERVICE_COLUMNS,
    order_by: "created_at DESC",
    search_column: "title",
    has_status: true,
    has_category: true,
    has_tags: false,
    has_featured: true,
};

const TESTIMONIALS: Listing = Listing {
    table: "testimonials",
    columns: TESTIMONIAL_COLUMNS,
    order_by: "created_at DESC",
    search_column: "client_name",
    has_status: false,
    has_category: false,
    has_tags: false,
    has_featured: true,
};

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, listing: &Listing, filter: &ContentFilter) {
    qb.push(" WHERE true");

    if listing.has_status {
        qb.push(" AND status = ")
            .push_bind(filter.status_or_default().as_str().to_string());
    }
    if listing.has_category {
        if let Some(category) = filter.category.as_ref() {
            qb.push(" AND lower(category) = lower(")
                .push_bind(category.clone())
                .push(")");
        }
    }
    if listing.has_tags {
        if let Some(tag) = filter.tag.as_ref() {
            qb.push(" AND ").push_bind(tag.clone()).push(" = ANY(tags)");
        }
    }
    if listing.has_featured {
        if let Some(featured) = filter.featured {
            qb.push(" AND featured = ").push_bind(featured);
        }
    }
    if let Some(search) = filter.search.as_ref().filter(|s| !s.trim().is_empty()) {
        let escaped = search
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        qb.push(format!(" AND {} ILIKE ", listing.search_column))
            .push_bind(format!("%{}%", escaped));
    }
}

async fn list<T>(
    pool: &PgPool,
    listing: &Listing,
    filter: &ContentFilter,
) -> Result<Paginated<T>, DataError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let (page, page_size, offset) = filter.window();

    let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", listing.table));
    push_filters(&mut count, listing, filter);
    let total: i64 = count
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let mut select = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM {}",
        listing.columns, listing.table
    ));
    push_filters(&mut select, listing, filter);
    select
        .push(format!(" ORDER BY {}", listing.order_by))
        .push(" LIMIT ")
        .push_bind(page_size)
        .push(" OFFSET ")
        .push_bind(offset);
    let items = select.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Paginated {
        items,
        page,
        page_size,
        total,
    })
}

pub async fn list_blogs(pool: &PgPool, filter: &ContentFilter) -> Result<Paginated<Blog>, DataError> {
    list(pool, &BLOGS, filter).await
}

pub async fn list_portfolio(
    pool: &PgPool,
    filter: &ContentFilter,
) -> Result<Paginated<PortfolioItem>, DataError> {
    list(pool, &PORTFOLIO, filter).await
}

pub async fn list_services(
    pool: &PgPool,
    filter: &ContentFilter,
) -> Result<Paginated<Service>, DataError> {
    list(pool, &SERVICES, filter).await
}

pub async fn list_testimonials(
    pool: &PgPool,
    filter: &ContentFilter,
) -> Result<Paginated<Testimonial>, DataError> {
    list(pool, &TESTIMONIALS, filter).await
}

pub async fn find_blog(pool: &PgPool, slug: &str) -> Result<Option<Blog>, DataError> {
    let blog = sqlx::query_as::<_, Blog>(&format!(
        "SELECT {} FROM blogs WHERE slug = $1 AND status = 'published'",
        BLOG_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(blog)
}

pub async fn find_portfolio_item(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<PortfolioItem>, DataError> {
    let item = sqlx::query_as::<_, PortfolioItem>(&format!(
        "SELECT {} FROM portfolio WHERE slug = $1 AND status = 'published'",
        PORTFOLIO_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn find_service(pool: &PgPool, slug: &str) -> Result<Option<Service>, DataError> {
    let service = sqlx::query_as::<_, Service>(&format!(
        "SELECT {} FROM services WHERE slug = $1 AND status = 'published'",
        SERVICE_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(service)
}

pub async fn testimonials_by_ids(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<Testimonial>, DataError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {} FROM testimonials WHERE id = ANY($1) ORDER BY created_at DESC",
        TESTIMONIAL_COLUMNS
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns the new view count, or `None` when no published post has `slug`.
pub async fn increment_blog_views(pool: &PgPool, slug: &str) -> Result<Option<i64>, DataError> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        UPDATE blogs SET view_count = view_count + 1
        WHERE slug = $1 AND status = 'published'
        RETURNING view_count
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(count,)| count))
}

pub async fn list_notifications(
    pool: &PgPool,
    unread_only: bool,
) -> Result<Vec<Notification>, DataError> {
    let rows = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, kind, title, message, is_read, created_at
        FROM notifications
        WHERE ($1 = false OR is_read = false)
        ORDER BY created_at DESC
        LIMIT 100
        "#,
    )
    .bind(unread_only)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn mark_notification_read(pool: &PgPool, id: Uuid) -> Result<bool, DataError> {
    let result = sqlx::query("UPDATE notifications SET is_read = true WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_notification(
    pool: &PgPool,
    kind: &str,
    title: &str,
    message: &str,
) -> Result<Notification, DataError> {
    let row = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (kind, title, message)
        VALUES ($1, $2, $3)
        RETURNING id, kind, title, message, is_read, created_at
        "#,
    )
    .bind(kind)
    .bind(title)
    .bind(message)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn insert_contact_submission(
    pool: &PgPool,
    fields: &NewContactSubmission,
) -> Result<ContactSubmission, DataError> {
    let row = sqlx::query_as::<_, ContactSubmission>(
        r#"
        INSERT INTO contact_submissions (name, email, phone, subject, message, service, budget)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, email, phone, subject, message, service, budget, created_at
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.email)
    .bind(&fields.phone)
    .bind(&fields.subject)
    .bind(&fields.message)
    .bind(&fields.service)
    .bind(&fields.budget)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn newsletter_subscriber_exists(pool: &PgPool, email: &str) -> Result<bool, DataError> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM leads WHERE source = 'newsletter' AND lower(email) = lower($1))",
    )
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn insert_lead(pool: &PgPool, lead: &NewLead) -> Result<Lead, DataError> {
    let row = sqlx::query_as::<_, Lead>(
        r#"
        INSERT INTO leads (name, email, whatsapp, project, source)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, whatsapp, project, source, created_at
        "#,
    )
    .bind(&lead.name)
    .bind(&lead.email)
    .bind(&lead.whatsapp)
    .bind(&lead.project)
    .bind(&lead.source)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn insert_funnel_event(
    pool: &PgPool,
    event: &NewFunnelEvent,
) -> Result<FunnelEvent, DataError> {
    let row = sqlx::query_as::<_, FunnelEvent>(
        r#"
        INSERT INTO funnel_events (event_type, page, session_id, metadata)
        VALUES ($1, $2, $3, $4)
        RETURNING id, event_type, page, session_id, metadata, created_at
        "#,
    )
    .bind(&event.event_type)
    .bind(&event.page)
    .bind(&event.session_id)
    .bind(&event.metadata)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
