//! Shared helpers for dispatcher integration tests

use cascade_router::RawEnv;

/// Install a test subscriber so dispatch logs show up with `--nocapture`.
/// Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn env(method: &str, path: &str) -> RawEnv {
    RawEnv::new(method, path)
}
