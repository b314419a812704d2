// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod feed;
pub mod guard;
pub mod ingest;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod pulse;
pub mod rss;
pub mod sitemap;
pub mod summary;
pub mod timefmt;

// ---- Re-exports for stable public API ----
pub use crate::feed::{upsert, FeedError, FeedItem, JsonFeed};
pub use crate::guard::{Guard, Violation, ViolationKind};
pub use crate::ingest::{EventSource, GithubEvent, GithubEventsProvider};
pub use crate::pipeline::{run_once, PulseContext, RunReport};
pub use crate::summary::{summarize, EventFilters, RepoTally, Summary, Window};

use metrics::describe_counter;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact stderr logs, filtered by `RUST_LOG` (default `noroshi=info,warn`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("noroshi=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// One-time metrics registration, shared by both binaries.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "pulse_events_fetched_total",
            "Events returned by the GitHub events API."
        );
        describe_counter!("pulse_fetch_errors_total", "Failed event fetches.");
        describe_counter!(
            "pulse_events_kept_total",
            "Events counted into a pulse after window and filters."
        );
        describe_counter!(
            "guard_violations_total",
            "Privacy/content guard violations found."
        );
    });
}
