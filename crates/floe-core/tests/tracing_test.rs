//! Tests for the Floe tracing/observability system.

use std::sync::Mutex;

use floe_core::tracing::setup::init_tracing;

/// Global mutex to serialize tracing tests (env var manipulation).
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

/// Per-subsystem filters are accepted without panic.
#[test]
fn test_per_subsystem_filtering() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("FLOE_LOG", "floe_policy::inheritance=debug,floe_policy::enforcement=warn");
    init_tracing();
    std::env::remove_var("FLOE_LOG");
}

/// init_tracing() called repeatedly does not panic.
#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

/// Garbage in FLOE_LOG falls back to the default filter.
#[test]
fn test_invalid_floe_log_fallback() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("FLOE_LOG", "this_is_garbage_not_a_valid_filter=[[");
    init_tracing();
    std::env::remove_var("FLOE_LOG");
}
