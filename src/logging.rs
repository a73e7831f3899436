use indicatif::MultiProgress;
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// Logs to stderr; `RUST_LOG` overrides the default level.
///
/// Lines are written with the spinners of `multi_progress` hidden so that
/// concurrent associates do not tear through the progress block.
pub fn init(multi_progress: &MultiProgress) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(ProgressWriter::new(multi_progress.clone()))
                .with_target(true),
        )
        .try_init();
}

/// stderr writer that suspends the progress bars around each write.
#[derive(Clone)]
pub struct ProgressWriter {
    multi_progress: MultiProgress,
}

impl ProgressWriter {
    pub fn new(multi_progress: MultiProgress) -> Self {
        Self { multi_progress }
    }
}

impl<'a> MakeWriter<'a> for ProgressWriter {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.multi_progress
            .suspend(|| io::stderr().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
