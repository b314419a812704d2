// src/pipeline.rs
//! One pulse run: fetch → summarize → pulse → feed/rss → profile → sitemap.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use std::path::PathBuf;

use crate::config::{Identity, PulseConfig, SiteEnv};
use crate::feed::{upsert, FeedItem, JsonFeed, DEFAULT_MAX_ITEMS};
use crate::ingest::{fetch_or_warn, EventSource};
use crate::layout::{rel, SiteLayout};
use crate::output::{read_json_object, write_json, write_text};
use crate::profile::{AieoProfile, ResolvedUrls};
use crate::pulse::{Pulse, PulseInputs};
use crate::rss::render_rss;
use crate::sitemap::{render_robots, render_sitemap, sitemap_urls};
use crate::summary::{summarize, EventFilters, Window};
use crate::timefmt::{isoformat_z, run_date};

pub const FEED_TITLE: &str = "KGNINJA — NOROSHI";
pub const FEED_DESCRIPTION: &str =
    "Daily public-only pulse (NOROSHI) for KGNINJA. Evidence-first, hiring-oriented, and crawl-friendly.";

/// Inputs fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct PulseContext {
    pub layout: SiteLayout,
    pub config: PulseConfig,
    pub env: SiteEnv,
    pub identity: Identity,
}

impl PulseContext {
    /// Layout from `$NOROSHI_ROOT`, config from the tree, env from the process.
    pub fn from_env() -> Self {
        let layout = SiteLayout::from_env();
        let config = PulseConfig::load_from(&layout.config_json());
        Self {
            layout,
            config,
            env: SiteEnv::from_env(),
            identity: Identity::default(),
        }
    }

    fn filters(&self) -> EventFilters {
        EventFilters {
            include_repos: self.config.include_repos.clone(),
            exclude_repos: self.config.exclude_repos.clone(),
            include_types: self.config.include_event_types.clone(),
            exclude_types: self.config.exclude_event_types.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub pulse: Pulse,
    pub site_url: Option<String>,
    pub written: Vec<PathBuf>,
}

pub async fn run_once(
    ctx: &PulseContext,
    source: &dyn EventSource,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    crate::ensure_metrics_described();

    let layout = &ctx.layout;
    let site_url = ctx.env.resolved_site_url();
    let day = run_date(now);
    let generated_at = isoformat_z(now);
    let mut written = Vec::new();

    let (events, warning) = fetch_or_warn(source).await;
    let window = Window::ending_at(now, ctx.config.window_hours);
    let summary = summarize(&events, &window, &ctx.filters());
    counter!("pulse_events_kept_total").increment(summary.total_events());

    let pulse = Pulse::build(
        summary,
        PulseInputs {
            now,
            window,
            window_hours: ctx.config.window_hours,
            max_top_repos: ctx.config.max_top_repos,
            identity: &ctx.identity,
            github_sha: ctx.env.github_sha.as_deref(),
            warnings: warning.into_iter().collect(),
        },
    );

    let absolute = |path: &str| match &site_url {
        Some(site) => format!("{site}/{path}"),
        None => path.to_string(),
    };
    let daily_json_url = absolute(&rel::daily_json(&day));
    let daily_md_url = absolute(&rel::daily_md(&day));

    // Pulse, dated and latest.
    let markdown = pulse.to_markdown();
    for path in [layout.daily_json(&day), layout.latest_json()] {
        write_json(&path, &pulse)?;
        written.push(path);
    }
    for path in [layout.daily_md(&day), layout.latest_md()] {
        write_text(&path, &markdown)?;
        written.push(path);
    }

    // JSON Feed and RSS.
    let mut feed = JsonFeed::from_value(read_json_object(&layout.feed_json()).into());
    feed.ensure_defaults(FEED_TITLE, FEED_DESCRIPTION);
    feed.home_page_url = Some(match &site_url {
        Some(site) => format!("{site}/"),
        None => "./".to_string(),
    });
    feed.feed_url = Some(absolute(rel::FEED_JSON));
    let item = FeedItem {
        url: Some(daily_md_url.clone()),
        title: Some(format!("NOROSHI pulse — {day}")),
        content_text: Some(pulse.summary.clone()),
        date_published: Some(generated_at.clone()),
        ..FeedItem::with_id(format!("noroshi-{day}"))
    };
    upsert(&mut feed, item, DEFAULT_MAX_ITEMS).context("upserting feed item")?;
    write_json(&layout.feed_json(), &feed)?;
    written.push(layout.feed_json());

    write_text(&layout.rss_xml(), &render_rss(&feed)?)?;
    written.push(layout.rss_xml());

    // Profile.
    let mut profile = AieoProfile::from_map(read_json_object(&layout.aieo_json()));
    profile.refresh(
        &ctx.identity,
        &generated_at,
        site_url.as_deref().map(|site| ResolvedUrls {
            site_url: site,
            daily_json: &daily_json_url,
            daily_md: &daily_md_url,
        }),
    );
    write_json(&layout.aieo_json(), &profile)?;
    written.push(layout.aieo_json());

    // Sitemap and robots need an absolute base.
    if let Some(site) = site_url.as_deref() {
        let urls = sitemap_urls(site, &day);
        write_text(&layout.sitemap_xml(), &render_sitemap(&urls, &generated_at)?)?;
        write_text(&layout.robots_txt(), &render_robots(site))?;
        written.push(layout.sitemap_xml());
        written.push(layout.robots_txt());
    } else {
        tracing::info!("no site url resolved; skipping sitemap.xml and robots.txt");
    }

    tracing::info!(
        day = %day,
        events = pulse.counts.values().sum::<u64>(),
        repos = pulse.repos.len(),
        warnings = pulse.warnings.len(),
        files = written.len(),
        "pulse written"
    );

    Ok(RunReport {
        pulse,
        site_url,
        written,
    })
}
