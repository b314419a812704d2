// tests/pipeline_e2e.rs
use chrono::{DateTime, TimeZone, Utc};
use noroshi::config::{Identity, PulseConfig, SiteEnv};
use noroshi::layout::SiteLayout;
use noroshi::{run_once, Guard, GithubEventsProvider, PulseContext};
use serde_json::Value;
use std::fs;
use std::path::Path;

const EVENTS_JSON: &str = include_str!("fixtures/github_events.json");

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 13, 12, 0, 0).unwrap()
}

fn ctx(root: &Path, env: SiteEnv) -> PulseContext {
    PulseContext {
        layout: SiteLayout::new(root),
        config: PulseConfig::default(),
        env,
        identity: Identity::default(),
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn fixture_run_writes_pulse_feed_rss_and_profile() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(
        dir.path(),
        SiteEnv {
            github_sha: Some("deadbeef".into()),
            ..Default::default()
        },
    );
    let source = GithubEventsProvider::from_fixture(EVENTS_JSON);

    let report = run_once(&ctx, &source, now()).await.expect("run ok");
    let layout = &ctx.layout;

    assert_eq!(
        report.pulse.summary,
        "Public GitHub activity (last 24h): 4 events across 3 repos."
    );
    assert!(report.pulse.warnings.is_empty());
    let order: Vec<_> = report.pulse.repos.iter().map(|r| r.repo.as_str()).collect();
    assert_eq!(
        order,
        vec!["KG-NINJA/noroshi", "KG-NINJA/Alpha", "KG-NINJA/beta"]
    );

    let latest = read_json(&layout.latest_json());
    assert_eq!(latest, read_json(&layout.daily_json("2026-01-13")));
    assert_eq!(latest["generated_at"], "2026-01-13T12:00:00Z");
    assert_eq!(latest["counts"]["PushEvent"], 2);
    assert_eq!(latest["provenance"]["github_sha"], "deadbeef");
    assert_eq!(latest["window"]["from"], "2026-01-12T12:00:00Z");

    let raw = fs::read_to_string(layout.latest_json()).unwrap();
    assert!(raw.ends_with("}\n"));
    assert!(raw.starts_with("{\n  \"counts\""));

    let md = fs::read_to_string(layout.latest_md()).unwrap();
    assert_eq!(md, fs::read_to_string(layout.daily_md("2026-01-13")).unwrap());
    assert!(md.contains("- KG-NINJA/noroshi (2)"));

    let feed = read_json(&layout.feed_json());
    assert_eq!(feed["version"], "https://jsonfeed.org/version/1.1");
    assert_eq!(feed["home_page_url"], "./");
    assert_eq!(feed["feed_url"], "feed.json");
    assert_eq!(feed["items"][0]["id"], "noroshi-2026-01-13");
    assert_eq!(feed["items"][0]["url"], "noroshi/daily/2026-01-13.md");

    let rss = fs::read_to_string(layout.rss_xml()).unwrap();
    assert!(rss.contains("<guid>noroshi-2026-01-13</guid>"));
    assert!(rss.contains("<pubDate>Tue, 13 Jan 2026 12:00:00 GMT</pubDate>"));

    let profile = read_json(&layout.aieo_json());
    assert_eq!(profile["type"], "aieo.profile");
    assert_eq!(profile["updated_at"], "2026-01-13T12:00:00Z");
    assert!(profile.get("site_url").is_none());

    assert!(!layout.sitemap_xml().exists());
    assert!(!layout.robots_txt().exists());

    assert!(Guard::default().check_site(layout).is_empty());
}

#[tokio::test]
async fn site_url_enables_sitemap_and_absolute_urls() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(
        dir.path(),
        SiteEnv {
            github_repository: Some("KG-NINJA/noroshi-site".into()),
            github_repository_owner: Some("KG-NINJA".into()),
            ..Default::default()
        },
    );
    let source = GithubEventsProvider::from_fixture(EVENTS_JSON);

    let report = run_once(&ctx, &source, now()).await.unwrap();
    let site = "https://KG-NINJA.github.io/noroshi-site";
    assert_eq!(report.site_url.as_deref(), Some(site));

    let layout = &ctx.layout;
    let sitemap = fs::read_to_string(layout.sitemap_xml()).unwrap();
    assert_eq!(sitemap.matches("<url>").count(), 13);
    assert!(sitemap.contains(&format!("<loc>{site}/noroshi/daily/2026-01-13.json</loc>")));

    let robots = fs::read_to_string(layout.robots_txt()).unwrap();
    assert!(robots.contains(&format!("Sitemap: {site}/sitemap.xml")));

    let feed = read_json(&layout.feed_json());
    assert_eq!(feed["home_page_url"], format!("{site}/"));
    assert_eq!(
        feed["items"][0]["url"],
        format!("{site}/noroshi/daily/2026-01-13.md")
    );

    let profile = read_json(&layout.aieo_json());
    assert_eq!(profile["site_url"], site);
    assert_eq!(
        profile["resolved_urls"]["latest_json"],
        format!("{site}/noroshi/latest.json")
    );

    assert!(Guard::default().check_site(layout).is_empty());
}

#[tokio::test]
async fn failed_fetch_degrades_to_empty_pulse_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(dir.path(), SiteEnv::default());
    let source = GithubEventsProvider::from_fixture(r#"{"message": "API rate limit exceeded"}"#);

    let report = run_once(&ctx, &source, now()).await.unwrap();
    assert_eq!(
        report.pulse.warnings,
        vec!["GitHub events fetch failed: UnexpectedResponse".to_string()]
    );
    assert!(report.pulse.counts.is_empty());
    assert!(report
        .pulse
        .summary
        .starts_with("No qualifying public GitHub activity"));

    let md = fs::read_to_string(ctx.layout.latest_md()).unwrap();
    assert!(md.contains("## Warnings\n- GitHub events fetch failed: UnexpectedResponse"));
}

#[tokio::test]
async fn reruns_merge_existing_feed_and_profile() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(dir.path(), SiteEnv::default());
    let layout = &ctx.layout;

    fs::write(
        layout.feed_json(),
        r#"{"title": "Custom", "items": [{"id": "noroshi-2026-01-12", "title": "yesterday"}, 5]}"#,
    )
    .unwrap();
    fs::create_dir_all(layout.aieo_json().parent().unwrap()).unwrap();
    fs::write(layout.aieo_json(), r#"{"skills": ["rust"], "handle": "old"}"#).unwrap();

    let source = GithubEventsProvider::from_fixture(EVENTS_JSON);
    run_once(&ctx, &source, now()).await.unwrap();
    run_once(&ctx, &source, now()).await.unwrap();

    let feed = read_json(&layout.feed_json());
    assert_eq!(feed["title"], "Custom");
    let ids: Vec<_> = feed["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["noroshi-2026-01-13", "noroshi-2026-01-12"]);

    let profile = read_json(&layout.aieo_json());
    assert_eq!(profile["skills"][0], "rust");
    assert_eq!(profile["handle"], "KGNINJA");
    assert_eq!(profile["noroshi"]["json_feed"], "feed.json");
}

#[tokio::test]
async fn config_file_narrows_the_summary() {
    let dir = tempfile::tempdir().unwrap();
    let layout = SiteLayout::new(dir.path());
    fs::create_dir_all(layout.noroshi_dir()).unwrap();
    fs::write(
        layout.config_json(),
        r#"{"max_top_repos": 1, "exclude_event_types": ["CreateEvent"], "window_hours": 3}"#,
    )
    .unwrap();

    let ctx = PulseContext {
        config: PulseConfig::load_from(&layout.config_json()),
        ..ctx(dir.path(), SiteEnv::default())
    };
    let source = GithubEventsProvider::from_fixture(EVENTS_JSON);
    let report = run_once(&ctx, &source, now()).await.unwrap();

    // 3h window from 09:00 keeps the two pushes only.
    assert_eq!(report.pulse.counts.len(), 1);
    assert_eq!(report.pulse.counts["PushEvent"], 2);
    assert_eq!(report.pulse.repos.len(), 1);
    assert_eq!(report.pulse.window.hours, 3);
    assert!(report.pulse.summary.contains("(last 3h)"));
}

#[tokio::test]
async fn slash_only_site_url_writes_no_sitemap() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ctx(
        dir.path(),
        SiteEnv {
            site_url: Some("/".into()),
            ..Default::default()
        },
    );
    let source = GithubEventsProvider::from_fixture(EVENTS_JSON);

    let report = run_once(&ctx, &source, now()).await.unwrap();
    assert!(report.site_url.is_none());
    assert!(!ctx.layout.sitemap_xml().exists());
    assert!(!ctx.layout.robots_txt().exists());

    let feed = read_json(&ctx.layout.feed_json());
    assert_eq!(feed["home_page_url"], "./");
    assert!(read_json(&ctx.layout.aieo_json()).get("resolved_urls").is_none());
}
