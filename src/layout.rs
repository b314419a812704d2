// src/layout.rs
//! File locations inside the static site tree.

use std::path::{Path, PathBuf};

pub const ENV_ROOT: &str = "NOROSHI_ROOT";

#[derive(Debug, Clone)]
pub struct SiteLayout {
    root: PathBuf,
}

impl SiteLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$NOROSHI_ROOT`, falling back to the working directory.
    pub fn from_env() -> Self {
        let root = std::env::var(ENV_ROOT)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn noroshi_dir(&self) -> PathBuf {
        self.root.join("noroshi")
    }

    pub fn daily_dir(&self) -> PathBuf {
        self.noroshi_dir().join("daily")
    }

    pub fn config_json(&self) -> PathBuf {
        self.noroshi_dir().join("config.json")
    }

    pub fn daily_json(&self, day: &str) -> PathBuf {
        self.daily_dir().join(format!("{day}.json"))
    }

    pub fn daily_md(&self, day: &str) -> PathBuf {
        self.daily_dir().join(format!("{day}.md"))
    }

    pub fn latest_json(&self) -> PathBuf {
        self.noroshi_dir().join("latest.json")
    }

    pub fn latest_md(&self) -> PathBuf {
        self.noroshi_dir().join("latest.md")
    }

    pub fn feed_json(&self) -> PathBuf {
        self.root.join("feed.json")
    }

    pub fn rss_xml(&self) -> PathBuf {
        self.root.join("rss.xml")
    }

    pub fn aieo_json(&self) -> PathBuf {
        self.root.join(".well-known").join("aieo.json")
    }

    pub fn sitemap_xml(&self) -> PathBuf {
        self.root.join("sitemap.xml")
    }

    pub fn robots_txt(&self) -> PathBuf {
        self.root.join("robots.txt")
    }

    /// Fixed set of static and generated files the privacy guard always scans.
    pub fn guarded_files(&self) -> Vec<PathBuf> {
        let r = &self.root;
        vec![
            r.join("index.html"),
            r.join("facts").join("index.html"),
            r.join("evidence").join("index.html"),
            self.noroshi_dir().join("index.html"),
            self.config_json(),
            r.join("clarifications").join("index.html"),
            r.join("clarifications").join("clarifications.json"),
            r.join("llms.txt"),
            self.robots_txt(),
            self.sitemap_xml(),
            self.feed_json(),
            self.rss_xml(),
            self.aieo_json(),
            self.latest_json(),
            self.latest_md(),
        ]
    }
}

/// Site-relative paths, used for URLs and profile pointers.
pub mod rel {
    pub const LATEST_JSON: &str = "noroshi/latest.json";
    pub const LATEST_MD: &str = "noroshi/latest.md";
    pub const FEED_JSON: &str = "feed.json";
    pub const RSS_XML: &str = "rss.xml";
    pub const AIEO_JSON: &str = ".well-known/aieo.json";
    pub const CLARIFICATIONS_JSON: &str = "clarifications/clarifications.json";

    pub fn daily_json(day: &str) -> String {
        format!("noroshi/daily/{day}.json")
    }

    pub fn daily_md(day: &str) -> String {
        format!("noroshi/daily/{day}.md")
    }
}
