use std::{fs::File, path::Path, sync::OnceLock};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE: &str = "kubetree.log";
const LOG_ENV: &str = "KUBETREE_LOG";

static TRACER: OnceLock<()> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the file logger writing to `<log_dir>/kubetree.log`. Only the first
/// successful call has any effect. `KUBETREE_LOG` overrides the `info` filter.
pub fn setup_logger(log_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    if TRACER.get().is_some() {
        return Ok(());
    }

    let file = File::create(Path::new(log_dir).join(LOG_FILE))?;

    TRACER.get_or_init(|| {
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file);

        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        let file_layer = fmt::layer()
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_writer)
            .with_filter(filter);

        LOG_GUARD.set(guard).ok();

        tracing_subscriber::registry().with(file_layer).try_init().ok();
    });

    Ok(())
}
