use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Logger};

pub fn initialize_logger() -> slog::Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);
    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!("version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    )
}

/// Routes records through `slog-scope`, filtered by `RUST_LOG`. The
/// returned guard must be kept alive for as long as logging is needed.
#[cfg(feature = "env_logging")]
pub fn initialize_env_logger() -> (slog::Logger, slog_scope::GlobalLoggerGuard) {
    let guard = slog_envlogger::init().expect("initialize slog-envlogger");

    (slog_scope::logger(), guard)
}

/// A logger that drops everything, for tests and tools that don't
/// care about output.
pub fn discard_logger() -> slog::Logger {
    Logger::root(slog::Discard, o!())
}
