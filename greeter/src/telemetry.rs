use std::{env, sync::Once};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static INIT: Once = Once::new();

/// Logs go to stderr so stdout only carries the greeting report.
/// `GREETER_LOG_FORMAT=json` switches to one JSON object per line.
pub fn setup_telemetry() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let stderr_layer = if json_logs() {
            fmt::Layer::new()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(env_filter)
                .boxed()
        } else {
            fmt::Layer::new()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false)
                .with_filter(env_filter)
                .boxed()
        };

        tracing_subscriber::registry().with(stderr_layer).init();
    });
}

fn json_logs() -> bool {
    env::var("GREETER_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"))
}
