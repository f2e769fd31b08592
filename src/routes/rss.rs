use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::config::SITE;
use crate::data::{self, ContentFilter};
use crate::db::models::Blog;

const FEED_SIZE: i64 = 50;

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn rfc822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

fn post_date(blog: &Blog) -> DateTime<Utc> {
    blog.published_at.unwrap_or(blog.created_at)
}

fn render_feed(base_url: &str, title: &str, description: &str, posts: &[Blog]) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut items = String::new();
    for post in posts {
        let post_url = format!("{}/blog/{}", base_url, post.slug);
        let desc = post.excerpt.as_deref().unwrap_or("");
        items.push_str(&format!(
            "    <item>\n\
                   <title>{}</title>\n\
                   <link>{}</link>\n\
                   <description>{}</description>\n\
                   <pubDate>{}</pubDate>\n\
                   <guid isPermaLink=\"true\">{}</guid>\n\
                 </item>\n",
            escape_xml(&post.title),
            escape_xml(&post_url),
            escape_xml(desc),
            rfc822(&post_date(post)),
            escape_xml(&post_url),
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{}</title>
    <link>{}</link>
    <description>{}</description>
    <language>en-us</language>
    <atom:link href="{}" rel="self" type="application/rss+xml"/>
    <lastBuildDate>{}</lastBuildDate>
{}  </channel>
</rss>"#,
        escape_xml(title),
        escape_xml(&format!("{}/blog", base_url)),
        escape_xml(description),
        escape_xml(&format!("{}/rss.xml", base_url)),
        posts.first().map(|p| rfc822(&post_date(p))).unwrap_or_default(),
        items,
    )
}

/// GET /rss.xml - Published posts, newest first
pub async fn rss_feed() -> Response {
    let filter = ContentFilter {
        page_size: Some(FEED_SIZE),
        ..Default::default()
    };
    let posts = data::fetch_blogs(&filter).await.items;
    let xml = render_feed(&SITE.site_url, &SITE.site_title, &SITE.site_description, &posts);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/rss+xml; charset=utf-8"),
            (
                header::CACHE_CONTROL,
                "public, max-age=3600, stale-while-revalidate=600",
            ),
        ],
        xml,
    )
        .into_response()
}
