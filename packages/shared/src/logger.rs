//! Logging setup utilities for the chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crate targets that receive the default log level alongside the binary itself.
const LIBRARY_TARGETS: &[&str] = &["chatrelay_server", "chatrelay_shared"];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// # Examples
///
/// ```
/// use chatrelay_shared::logger::default_directive;
///
/// assert_eq!(
///     default_directive("chatrelay-server", "info"),
///     "chatrelay_server=info,chatrelay_shared=info,tower_http=info"
/// );
/// ```
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut directives: Vec<String> = LIBRARY_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect();
    if !LIBRARY_TARGETS.contains(&binary_target.as_str()) {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }
    directives.push(format!("tower_http={}", default_log_level));
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chatrelay-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chatrelay_shared::logger::setup_logger;
///
/// setup_logger("chatrelay-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_adds_binary_target() {
        // テスト項目: ライブラリ以外のバイナリ名がフィルタに追加される
        // given (前提条件):
        let binary_name = "relay-bench";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            directive,
            "chatrelay_server=debug,chatrelay_shared=debug,relay_bench=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_default_directive_does_not_duplicate_library_target() {
        // テスト項目: バイナリ名がライブラリと同名の場合は重複しない
        // given (前提条件):
        let binary_name = "chatrelay-server";

        // when (操作):
        let directive = default_directive(binary_name, "warn");

        // then (期待する結果):
        assert_eq!(directive.matches("chatrelay_server=").count(), 1);
    }
}
