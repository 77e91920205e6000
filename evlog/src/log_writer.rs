use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

/// Destination for rendered log lines. Handlers hand over one complete line
/// per record, without the trailing newline.
pub trait LogWriter {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Standard output. Each line is written and flushed under a single lock.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// A local file, created if missing and appended to otherwise.
pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }
}

impl LogWriter for LogFile {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// In-memory lines shared between clones, for capturing handler output.
#[derive(Default, Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogWriter for LogBuffer {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?
            .push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_log_file() {
    std::fs::remove_file("/tmp/test_evlog_file.log").ok();
    let mut log_file = LogFile::new("/tmp/test_evlog_file.log").unwrap();
    log_file.write_line("Hello, world!").unwrap();
    log_file.write_line("rust is awesome !").unwrap();
    log_file.flush().unwrap();
    drop(log_file);
    let mut log_file = LogFile::new("/tmp/test_evlog_file.log").unwrap();
    log_file.write_line("test").unwrap();
    log_file.flush().unwrap();
    assert_eq!(
        std::fs::read_to_string("/tmp/test_evlog_file.log").unwrap(),
        "Hello, world!\nrust is awesome !\ntest\n"
    );
}

#[test]
fn test_log_buffer_is_shared() {
    let buffer = LogBuffer::default();
    let mut writer = buffer.clone();
    writer.write_line("first").unwrap();
    writer.write_line("second").unwrap();
    assert_eq!(buffer.lines(), vec!["first", "second"]);
    buffer.clear();
    assert!(writer.lines().is_empty());
}

#[test]
fn test_log_stdout() {
    let mut log_stdout = LogStdout;
    log_stdout.write_line("Hello, world!").unwrap();
    log_stdout.flush().unwrap();
}
