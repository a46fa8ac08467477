//! Synchronized output for command implementations.
//!
//! A [`Printer`] is a cloneable handle to one shared sink. Every write takes the
//! sink's lock, so lines printed from background threads spawned by a command
//! never interleave mid-write. Hold [`Printer::lock`] to keep several writes together.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

type Sink = Box<dyn Write + Send>;

#[derive(Clone)]
pub struct Printer {
    sink: Arc<Mutex<Sink>>,
}

impl Printer {
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// A printer writing into memory, and a handle to read what was written.
    pub fn buffer() -> (Self, CaptureBuffer) {
        let buffer = CaptureBuffer::default();
        (Self::from_writer(buffer.clone()), buffer)
    }

    pub fn print(&self, text: impl fmt::Display) -> io::Result<()> {
        let mut sink = self.sink.lock();
        write!(sink, "{}", text)?;
        sink.flush()
    }

    pub fn println(&self, text: impl fmt::Display) -> io::Result<()> {
        let mut sink = self.sink.lock();
        writeln!(sink, "{}", text)?;
        sink.flush()
    }

    /// Formatted write, used as `printer.printf(format_args!("{} items\n", n))`.
    pub fn printf(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut sink = self.sink.lock();
        sink.write_fmt(args)?;
        sink.flush()
    }

    /// Take the lock for a sequence of writes.
    pub fn lock(&self) -> PrinterGuard<'_> {
        PrinterGuard {
            sink: self.sink.lock(),
        }
    }
}

impl fmt::Debug for Printer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer").finish_non_exhaustive()
    }
}

/// Exclusive access to the sink until dropped.
pub struct PrinterGuard<'a> {
    sink: MutexGuard<'a, Sink>,
}

impl Write for PrinterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

impl Drop for PrinterGuard<'_> {
    fn drop(&mut self) {
        let _ = self.sink.flush();
    }
}

/// In-memory sink shared between a [`Printer`] and its reader.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Return the captured text and clear the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.bytes.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
