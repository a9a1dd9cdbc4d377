use std::fmt::Arguments;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use env_logger::{Builder, Env, Target};

type SharedFile = Arc<Mutex<BufWriter<File>>>;

fn lock(file: &SharedFile) -> io::Result<std::sync::MutexGuard<'_, BufWriter<File>>> {
    file.lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))
}

/// Copies every log line to the console sink and the log file.
struct Tee<C> {
    console: C,
    file: SharedFile,
}

impl<C: Write> Write for Tee<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        lock(&self.file)?.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        lock(&self.file)?.flush()
    }
}

fn format_line(timestamp: DateTime<Local>, level: log::Level, args: &Arguments) -> String {
    format!(
        "{} - {} - {}",
        timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        args
    )
}

/// Handle to the process logger. The log file is flushed when the handle is dropped.
pub struct Logging {
    file: SharedFile,
}

impl Logging {
    /// Install the global logger, appending to `path`. Filter defaults to `info`, see `RUST_LOG`.
    pub fn init(path: &Path) -> Result<Self, crate::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let file = Arc::new(Mutex::new(BufWriter::new(file)));
        Builder::from_env(Env::default().default_filter_or("info"))
            .format(|buf, record| {
                writeln!(buf, "{}", format_line(Local::now(), record.level(), record.args()))
            })
            .target(Target::Pipe(Box::new(Tee {
                console: io::stdout(),
                file: file.clone(),
            })))
            .try_init()?;
        Ok(Self { file })
    }

    pub fn flush(&self) {
        if let Err(e) = lock(&self.file).and_then(|mut file| file.flush()) {
            eprintln!("failed to flush log file: {}", e);
        }
    }
}

impl Drop for Logging {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_line() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        let line = format_line(timestamp, log::Level::Warn, &format_args!("no cards on {}", "page"));
        assert_eq!(line, "2024-03-01 09:05:07,000 - WARN - no cards on page");
    }

    #[test]
    fn test_tee_writes_to_console_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraper.log");
        let file = File::create(&path).unwrap();
        let mut tee = Tee {
            console: Vec::new(),
            file: Arc::new(Mutex::new(BufWriter::new(file))),
        };
        writeln!(tee, "hello").unwrap();
        tee.flush().unwrap();
        assert_eq!(tee.console, b"hello\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
