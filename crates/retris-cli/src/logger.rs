use std::{
    fs::{self, File},
    io::{self, LineWriter, Write},
    path::Path,
    sync::{Mutex, PoisonError},
    time::Instant,
};

use anyhow::Context as _;
use log::{LevelFilter, Log, Metadata, Record};

/// Line-oriented logger writing `[seconds LEVEL target] message` records.
///
/// The terminal UI owns stdout and stderr while it runs, so `play` only logs when
/// given a file.
struct Logger {
    level: LevelFilter,
    started: Instant,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    fn new(level: LevelFilter, sink: Box<dyn Write + Send>) -> Self {
        Self {
            level,
            started: Instant::now(),
            sink: Mutex::new(sink),
        }
    }

    fn format(&self, record: &Record<'_>) -> String {
        format!(
            "[{:>9.3} {:<5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        // Nowhere left to report a failing log sink
        _ = writeln!(sink, "{line}");
    }

    fn flush(&self) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        _ = sink.flush();
    }
}

fn install(logger: Logger) -> anyhow::Result<()> {
    let level = logger.level;
    log::set_boxed_logger(Box::new(logger)).context("Failed to install logger")?;
    log::set_max_level(level);
    Ok(())
}

pub fn init_stderr(level: LevelFilter) -> anyhow::Result<()> {
    install(Logger::new(level, Box::new(io::stderr())))
}

pub fn init_file(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    install(Logger::new(level, Box::new(LineWriter::new(file))))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use log::Level;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn emit(logger: &Logger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("retris_engine::engine")
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn test_records_below_level_are_dropped() {
        let buf = SharedBuf::default();
        let logger = Logger::new(LevelFilter::Info, Box::new(buf.clone()));
        emit(&logger, Level::Debug, "auto-play: hold");
        emit(&logger, Level::Warn, "high score not saved");

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("WARN  retris_engine::engine] high score not saved"));
    }
}
