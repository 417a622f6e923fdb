use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::fmt::TestWriter;

use crate::logging::{build_subscriber, LogFormat, RuntimeSettings, Verbosity};

static TEST_SETUP: Once = Once::new();

/// Install a trace-level pretty logger for tests, once per test binary.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let settings = RuntimeSettings::new(Verbosity::new(700), LogFormat::Pretty);
    let subscriber = build_subscriber(&settings, TestWriter::new(), false);
    tracing::subscriber::set_global_default(subscriber).unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}
