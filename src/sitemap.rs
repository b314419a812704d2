// src/sitemap.rs
//! sitemap.xml and robots.txt, emitted only when the site has an absolute base URL.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::layout::rel;
use crate::rss::XML_DECLARATION;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Serialize)]
struct UrlSet<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    url: Vec<UrlEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct UrlEntry<'a> {
    loc: &'a str,
    lastmod: &'a str,
}

/// Absolute URLs published in the sitemap, today's dated pulse last.
pub fn sitemap_urls(site_url: &str, day: &str) -> Vec<String> {
    let page = |path: &str| format!("{site_url}/{path}");
    vec![
        page(""),
        page("facts/"),
        page("evidence/"),
        page("noroshi/"),
        page("clarifications/"),
        page(rel::LATEST_JSON),
        page(rel::LATEST_MD),
        page(rel::AIEO_JSON),
        page(rel::FEED_JSON),
        page(rel::RSS_XML),
        page(rel::CLARIFICATIONS_JSON),
        page(&rel::daily_json(day)),
        page(&rel::daily_md(day)),
    ]
}

pub fn render_sitemap(urls: &[String], lastmod: &str) -> Result<String> {
    let set = UrlSet {
        xmlns: SITEMAP_NS,
        url: urls
            .iter()
            .map(|loc| UrlEntry {
                loc: loc.as_str(),
                lastmod,
            })
            .collect(),
    };
    let body =
        quick_xml::se::to_string_with_root("urlset", &set).context("rendering sitemap xml")?;
    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

pub fn render_robots(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {site_url}/sitemap.xml\n")
}
