//! Logging setup

use tracing_subscriber::EnvFilter;

/// Crates whose logs a bare level like "debug" applies to
const OWN_TARGETS: &[&str] = &["todo_core", "todo_server", "tower_http"];

/// Install the global fmt subscriber
///
/// Filter precedence: configured `log_level`, then `RUST_LOG`, then `info`.
pub fn init(log_level: Option<&str>) {
    let env_filter = match log_level {
        Some(level) => EnvFilter::new(filter_directive(level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// Expand a bare level into per-crate directives; pass full directives through
fn filter_directive(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    OWN_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_expands_to_own_crates() {
        assert_eq!(
            filter_directive("debug"),
            "todo_core=debug,todo_server=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_full_directive_passes_through() {
        assert_eq!(filter_directive("todo_core=trace"), "todo_core=trace");
        assert_eq!(filter_directive("info,hyper=warn"), "info,hyper=warn");
    }
}
