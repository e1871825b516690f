//! Logging setup for the quiz server.
//!
//! `LOG_LEVEL` takes `EnvFilter` directives; without it the quiz and server
//! targets log at debug and everything else at info. `LOG_FORMAT=json` switches
//! to one JSON object per line.
//!
//! Targets: `mzquiz_backend` for startup and transport, `quiz` for question
//! loading, session transitions and expiry.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,quiz=debug,mzquiz_backend=debug,tower_http=info,axum=info";

/// Directives from `LOG_LEVEL`, or the quiz defaults when unset or unparsable.
fn quiz_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let directives = std::env::var("LOG_LEVEL").ok();
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(quiz_filter(directives.as_deref()))
        .with_target(true)
        .with_line_number(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_quiz_debug() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        let filter = quiz_filter(None).to_string();
        assert!(filter.contains("quiz=debug"));
    }

    #[test]
    fn bad_directives_fall_back_to_defaults() {
        assert!(quiz_filter(Some("quiz=loudest")).to_string().contains("mzquiz_backend=debug"));
        assert!(quiz_filter(Some("warn")).to_string().contains("warn"));
    }
}
