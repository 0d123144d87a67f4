use std::{
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

use tracing_subscriber::fmt::MakeWriter;

/// Console side of the logger output.
///
/// [`Console::Stdout`] is what the global logger uses.
/// [`Console::Memory`] keeps everything in a buffer, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub enum Console {
    #[default]
    Stdout,
    Memory(MemorySink),
}

impl Console {
    /// In-memory console plus a handle to read it back.
    pub fn memory() -> (Self, MemorySink) {
        let sink = MemorySink::default();
        (Console::Memory(sink.clone()), sink)
    }
}

/// Shared, growable byte buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Arc<Mutex<Vec<u8>>>);

impl MemorySink {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub enum ConsoleWriter {
    Stdout(io::Stdout),
    Memory(MemorySink),
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ConsoleWriter::Stdout(out) => out.write(buf),
            ConsoleWriter::Memory(sink) => sink.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            ConsoleWriter::Stdout(out) => out.write_all(buf),
            ConsoleWriter::Memory(sink) => sink.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ConsoleWriter::Stdout(out) => out.flush(),
            ConsoleWriter::Memory(sink) => sink.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Console::Stdout => ConsoleWriter::Stdout(io::stdout()),
            Console::Memory(sink) => ConsoleWriter::Memory(sink.clone()),
        }
    }
}
