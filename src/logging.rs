//! # Structured Logging Module
//!
//! Environment-aware console logging built on `tracing-subscriber`, plus the
//! [`log_registry!`](crate::log_registry) macro used for registry events.
//!
//! ## Level Selection
//!
//! First match wins:
//! 1. `LOG_LEVEL`
//! 2. `RUST_LOG`
//! 3. The environment (`PARCEL_REGISTRY_ENV`, then `APP_ENV`): `production`
//!    logs at `info`, everything else at `debug`
//!
//! Set `LOG_FORMAT=json` for JSON lines instead of human-readable output.

use crate::constants::defaults::ENVIRONMENT_ENV;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging once per process.
///
/// Safe to call repeatedly and from several threads. If the host application
/// already installed a global subscriber, that subscriber is kept.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json = json_output();

        // Determine if we're in a TTY for ANSI color support
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let console_layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_current_span(true)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(EnvFilter::new(&log_level));

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                json_output = json,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

/// Get current environment from environment variables
pub fn get_environment() -> String {
    std::env::var(ENVIRONMENT_ENV)
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level filter directives, honoring explicit overrides first
pub fn get_log_level(environment: &str) -> String {
    std::env::var("LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level_for(environment).to_string())
}

fn default_level_for(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn json_output() -> bool {
    std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"))
}

/// Structured registry event with an operation name and RFC 3339 timestamp.
///
/// ```rust,ignore
/// log_registry!(debug, operations::RESOLVE, scope: scope, type_name: name);
/// log_registry!(warn, operations::RESOLVE_FAILED, type_name: name, error: err.to_string());
/// ```
#[macro_export]
macro_rules! log_registry {
    // Full form with scope
    ($level:ident, $operation:expr, scope: $scope:expr, $($key:ident: $value:expr),* $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            scope = %$scope,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "REGISTRY_{} (scope: {})", $operation, $scope
        );
    };
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "REGISTRY_{}", $operation
        );
    };
    // Generic form with additional fields
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "REGISTRY_{}", $operation
        );
    };
}
