//! Privacy/content guard for the published site tree under `$NOROSHI_ROOT`.
//! Exit code 1 when any violation is found.

use std::io;
use std::process::ExitCode;

use noroshi::{ensure_metrics_described, guard, init_tracing, layout::SiteLayout, Guard};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();
    ensure_metrics_described();

    let layout = SiteLayout::from_env();
    let violations = Guard::default().check_site(&layout);

    match guard::report(&violations, &mut io::stdout().lock()) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            tracing::error!(error = %e, "writing guard report");
            ExitCode::FAILURE
        }
    }
}
