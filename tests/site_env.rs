// tests/site_env.rs
use noroshi::config::SiteEnv;
use noroshi::layout::{SiteLayout, ENV_ROOT};
use std::env;
use std::path::Path;

const KEYS: [&str; 7] = [
    "SITE_URL",
    "GITHUB_REPOSITORY",
    "GITHUB_REPOSITORY_OWNER",
    "GITHUB_TOKEN",
    "GH_TOKEN",
    "GITHUB_SHA",
    ENV_ROOT,
];

fn clear() {
    for k in KEYS {
        env::remove_var(k);
    }
}

#[serial_test::serial]
#[test]
fn explicit_site_url_wins_and_empty_values_are_absent() {
    clear();
    env::set_var("SITE_URL", "https://example.org/");
    env::set_var("GITHUB_REPOSITORY", "octo/site");
    env::set_var("GITHUB_REPOSITORY_OWNER", "octo");
    env::set_var("GITHUB_TOKEN", "");
    env::set_var("GH_TOKEN", "fallback-token");

    let e = SiteEnv::from_env();
    assert_eq!(e.resolved_site_url().as_deref(), Some("https://example.org"));
    assert_eq!(e.token.as_deref(), Some("fallback-token"));
    assert!(e.github_sha.is_none());
    clear();
}

#[serial_test::serial]
#[test]
fn pages_url_derived_from_repository() {
    clear();
    env::set_var("GITHUB_REPOSITORY", "octo/octo.github.io");
    env::set_var("GITHUB_REPOSITORY_OWNER", "octo");
    assert_eq!(
        SiteEnv::from_env().resolved_site_url().as_deref(),
        Some("https://octo.github.io")
    );

    env::remove_var("GITHUB_REPOSITORY_OWNER");
    assert!(SiteEnv::from_env().resolved_site_url().is_none());
    clear();
}

#[serial_test::serial]
#[test]
fn layout_root_from_env_or_cwd() {
    clear();
    assert_eq!(SiteLayout::from_env().root(), Path::new("."));

    env::set_var(ENV_ROOT, "/srv/site");
    assert_eq!(
        SiteLayout::from_env().feed_json(),
        Path::new("/srv/site/feed.json")
    );
    clear();
}
