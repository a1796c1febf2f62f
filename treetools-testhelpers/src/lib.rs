#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
//! Shared test setup for the treetools workspace.
//!
//! Call [`setup`] at the top of a test to get `tracing` output from the
//! library under test. The filter is read from `TREETOOLS_LOG` using the
//! [`Targets`] syntax (`treetools=debug,warn`); it defaults to `trace`.

use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Name of the environment variable holding the log filter.
pub const LOG_ENV: &str = "TREETOOLS_LOG";

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Timestamps relative to the first call to [`setup`].
struct SinceSetup;

impl FormatTime for SinceSetup {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

fn filter_from_env() -> Targets {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::TRACE))
}

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(SinceSetup)
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .with(filter_from_env())
        .try_init()
        .ok();
});

/// Install the tracing subscriber for this test process.
///
/// Safe to call from every test: the subscriber is installed once, and a
/// subscriber installed by someone else is left alone.
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER_INIT;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_is_idempotent() {
        setup();
        setup();
        tracing::info!("subscriber installed");
    }
}
