//! Global logger installation.
//!
//! This binary deliberately has no `ctor` test setup: the process must start
//! without a global subscriber. Keep it to a single test so nothing else
//! installs one first.

use tracing::Level;

use polycli::logging::{self, LogFormat, RuntimeSettings, Verbosity};

#[test]
fn given_fresh_process_when_initializing_twice_then_first_settings_stay() {
    let info = RuntimeSettings::new(Verbosity::DEFAULT, LogFormat::Pretty);
    let trace = RuntimeSettings::new(Verbosity::new(700), LogFormat::Json);

    assert!(!tracing::dispatcher::has_been_set());
    assert!(logging::init(&info), "first call installs the subscriber");
    assert!(!logging::init(&trace), "second call is a no-op");
    assert!(!logging::init(&info));

    assert!(tracing::enabled!(Level::INFO));
    assert!(!tracing::enabled!(Level::DEBUG));
    assert!(!tracing::enabled!(Level::TRACE), "trace stays filtered");
}
