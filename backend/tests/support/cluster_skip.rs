//! `SKIP_TEST_CLUSTER` policy for suites needing embedded PostgreSQL.

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`, ignoring case.
fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip quietly when the environment opts out, fail loudly otherwise so a
/// broken cluster never passes CI unnoticed.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL unavailable: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
