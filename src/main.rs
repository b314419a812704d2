//! NOROSHI pulse generator.
//! Fetches recent public GitHub activity and rewrites the pulse, feed, RSS,
//! profile and (with a site URL) sitemap files under `$NOROSHI_ROOT`.

use anyhow::Context;
use noroshi::{
    ensure_metrics_described, init_tracing, run_once, timefmt::utc_now, GithubEventsProvider,
    PulseContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local runs; no-op in CI.
    let _ = dotenvy::dotenv();
    init_tracing();
    ensure_metrics_described();

    let ctx = PulseContext::from_env();
    let source =
        GithubEventsProvider::for_handle(&ctx.config.github_handle, ctx.env.token.clone())
            .context("building GitHub client")?;

    let report = run_once(&ctx, &source, utc_now()).await?;
    for w in &report.pulse.warnings {
        tracing::warn!(warning = %w, "pulse recorded a warning");
    }
    println!("{}", report.pulse.summary);
    Ok(())
}
