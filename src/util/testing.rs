//! Test logging: one global tracing subscriber shared by every test

use std::sync::Once;
use tracing_subscriber::{filter::filter_fn, fmt, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Crate spans and events at trace level unless `RUST_LOG` says otherwise.
const DEFAULT_TEST_FILTER: &str = "gitlab_cli=trace";

/// Install the test subscriber; later calls are no-ops.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));
        let http_filter = filter_fn(|metadata| {
            !["hyper", "reqwest", "rustls"]
                .iter()
                .any(|name| metadata.target().starts_with(name))
        });

        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_filter(http_filter)
            .with_filter(env_filter);

        // Another harness may already own the global dispatcher
        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            tracing::debug!("test logging ready");
        }
    });
}
