//! Failure log sinks.
//!
//! Routine and use-case failures are reported through [`LogSink`], a
//! fire-and-forget seam that never returns an error to the caller. The
//! file sink hands lines to a `tracing-appender` worker thread, which writes
//! them to a daily file through `file-rotate` and rolls that file over once
//! it grows past [`ROTATE_BYTES`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use tracing::{error, warn};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

/// Size above which the current daily file is moved aside.
pub const ROTATE_BYTES: usize = 100 * 1024 * 1024;

/// Destination for failure messages. Implementations must not panic.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Emits every message as a `tracing` error event.
#[derive(Debug, Default, Clone)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, message: &str) {
        error!(target: "tekus::failures", "{message}");
    }
}

fn daily_file(dir: &Path, day: &str) -> PathBuf {
    dir.join(format!("log_{day}.txt"))
}

/// Writer owned by the appender thread: reopens on date change and lets
/// `file-rotate` move oversized files to `log_YYYYMMDD.txt.<timestamp>`.
struct DailyRotatingWriter {
    dir: PathBuf,
    max_bytes: usize,
    current: Option<(String, FileRotate<AppendTimestamp>)>,
}

impl DailyRotatingWriter {
    fn file(&mut self) -> io::Result<&mut FileRotate<AppendTimestamp>> {
        let day = Local::now().format("%Y%m%d").to_string();
        if self.current.as_ref().map_or(true, |(open, _)| *open != day) {
            fs::create_dir_all(&self.dir)?;
            let rotate = FileRotate::new(
                daily_file(&self.dir, &day),
                AppendTimestamp::default(FileLimit::Unlimited),
                ContentLimit::BytesSurpassed(self.max_bytes),
                Compression::None,
                #[cfg(unix)]
                None,
            );
            self.current = Some((day, rotate));
        }
        match &mut self.current {
            Some((_, file)) => Ok(file),
            None => Err(io::Error::other("log file not open")),
        }
    }
}

impl Write for DailyRotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.file().and_then(|file| file.write(buf));
        if let Err(e) = &written {
            warn!(dir = %self.dir.display(), error = %e, "failed to append to log file");
        }
        written
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.current {
            Some((_, file)) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Appends `[YYYY-MM-DD HH:MM:SS] message` lines to `log_YYYYMMDD.txt`.
///
/// `log` only enqueues; a full queue drops the line. Pending lines are
/// flushed when the sink is dropped.
#[derive(Debug)]
pub struct FileLogSink {
    dir: PathBuf,
    writer: NonBlocking,
    _guard: WorkerGuard,
}

impl FileLogSink {
    /// Relative directories are resolved against the current working directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_limit(dir, ROTATE_BYTES)
    }

    pub fn with_limit<P: AsRef<Path>>(dir: P, max_bytes: usize) -> Self {
        let dir = dir.as_ref();
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir().map(|cwd| cwd.join(dir)).unwrap_or_else(|_| dir.to_path_buf())
        };
        let target = DailyRotatingWriter { dir: dir.clone(), max_bytes, current: None };
        let (writer, guard) = NonBlockingBuilder::default()
            .lossy(true)
            .thread_name("tekus-failure-log")
            .finish(target);
        Self { dir, writer, _guard: guard }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of today's log file.
    pub fn current_file(&self) -> PathBuf {
        daily_file(&self.dir, &Local::now().format("%Y%m%d").to_string())
    }
}

impl LogSink for FileLogSink {
    fn log(&self, message: &str) {
        let line = format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        let mut writer = self.writer.clone();
        if let Err(e) = writer.write_all(line.as_bytes()) {
            warn!(dir = %self.dir.display(), error = %e, "failed to queue log line");
        }
    }
}

/// Forwards each message to every inner sink.
#[derive(Clone, Default)]
pub struct FanOutLogSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanOutLogSink {
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

impl LogSink for FanOutLogSink {
    fn log(&self, message: &str) {
        for sink in &self.sinks {
            sink.log(message);
        }
    }
}

/// In-memory sink for tests and doc examples.
pub mod mock {
    use super::LogSink;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingLogSink {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingLogSink {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().map(|m| m.clone()).unwrap_or_default()
        }

        pub fn count(&self) -> usize {
            self.messages.lock().map(|m| m.len()).unwrap_or_default()
        }
    }

    impl LogSink for RecordingLogSink {
        fn log(&self, message: &str) {
            if let Ok(mut m) = self.messages.lock() {
                m.push(message.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tekus_logs_{tag}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_sink_appends_timestamped_lines() {
        let dir = temp_dir("append");
        let sink = FileLogSink::new(&dir);
        let path = sink.current_file();
        sink.log("first failure");
        sink.log("second failure");
        // dropping the guard drains the queue
        drop(sink);

        let content = fs::read_to_string(path).expect("read log file");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] first failure"));
        assert!(lines[1].ends_with("] second failure"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_sink_rolls_over_past_the_size_limit() {
        let dir = temp_dir("rotate");
        let sink = FileLogSink::with_limit(&dir, 32);
        for i in 0..4 {
            sink.log(&format!("failure number {i} with some padding"));
        }
        drop(sink);

        let files = fs::read_dir(&dir).expect("list log dir").count();
        assert!(files >= 2, "expected rotated files, found {files}");
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn file_sink_log_returns_without_waiting_for_io() {
        let dir = temp_dir("queue");
        let sink = FileLogSink::new(&dir);
        let started = std::time::Instant::now();
        for i in 0..1_000 {
            sink.log(&format!("queued {i}"));
        }
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        drop(sink);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_sink_swallows_io_errors() {
        // a regular file where the directory should be makes create_dir_all fail
        let blocker = std::env::temp_dir().join(format!("tekus_logs_blocker_{}", std::process::id()));
        fs::write(&blocker, b"x").expect("write blocker");
        let sink = FileLogSink::new(&blocker);
        sink.log("never written");
        drop(sink);
        assert!(blocker.is_file());
        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn fan_out_reaches_every_sink() {
        let a = Arc::new(mock::RecordingLogSink::default());
        let b = Arc::new(mock::RecordingLogSink::default());
        let fan = FanOutLogSink::new(vec![a.clone(), b.clone()]);
        fan.log("boom");
        assert_eq!(a.messages(), vec!["boom".to_string()]);
        assert_eq!(b.count(), 1);
    }
}
