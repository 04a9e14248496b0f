//! Shared access to the terminal while an interactive prompt is open.
//!
//! The prompt puts the terminal in raw mode and redraws its own line, so
//! anything written underneath it is garbled or overwritten. Output produced
//! while the prompt is open is queued and written once it closes.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

static TERMINAL: OutputGate = OutputGate::new();

/// The process-wide gate in front of stdout and stderr.
pub fn terminal() -> &'static OutputGate {
    &TERMINAL
}

/// Which standard stream a chunk of output belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Holds output back while the terminal belongs to a prompt.
#[derive(Debug)]
pub struct OutputGate {
    state: Mutex<GateState>,
}

#[derive(Debug)]
struct GateState {
    held: bool,
    queued: Vec<(Stream, Vec<u8>)>,
}

impl OutputGate {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                held: false,
                queued: Vec::new(),
            }),
        }
    }

    /// Starts queueing output instead of writing it.
    pub fn hold(&self) {
        self.lock().held = true;
    }

    /// Writes everything queued since [`hold`](Self::hold), in order, and
    /// resumes writing directly. Returns how many chunks were flushed.
    pub fn release(&self) -> usize {
        let mut state = self.lock();
        state.held = false;
        let queued = std::mem::take(&mut state.queued);
        let flushed = queued.len();
        for (stream, bytes) in queued {
            write_stream(stream, &bytes);
        }
        flushed
    }

    pub fn is_held(&self) -> bool {
        self.lock().held
    }

    /// Writes `bytes` now, or queues them while held.
    pub fn emit(&self, stream: Stream, bytes: &[u8]) {
        let mut state = self.lock();
        if state.held {
            state.queued.push((stream, bytes.to_vec()));
        } else {
            write_stream(stream, bytes);
        }
    }

    /// Emits `line` followed by a newline.
    pub fn line(&self, stream: Stream, line: &str) {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.emit(stream, &bytes);
    }

    /// Output waiting for the prompt to close.
    pub fn queued(&self) -> Vec<(Stream, String)> {
        self.lock()
            .queued
            .iter()
            .map(|(stream, bytes)| (*stream, String::from_utf8_lossy(bytes).into_owned()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OutputGate {
    fn default() -> Self {
        Self::new()
    }
}

fn write_stream(stream: Stream, bytes: &[u8]) {
    let _ = match stream {
        Stream::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).and_then(|()| stdout.flush())
        }
        Stream::Stderr => io::stderr().lock().write_all(bytes),
    };
}

/// Log writer that routes each formatted event through [`terminal`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GatedStderr;

impl<'a> MakeWriter<'a> for GatedStderr {
    type Writer = GatedEvent;

    fn make_writer(&'a self) -> Self::Writer {
        GatedEvent::default()
    }
}

/// Collects one log event and emits it as a single chunk when dropped.
#[derive(Debug, Default)]
pub struct GatedEvent {
    buf: Vec<u8>,
}

impl Write for GatedEvent {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for GatedEvent {
    fn drop(&mut self) {
        if !self.buf.is_empty() {
            terminal().emit(Stream::Stderr, &self.buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_queued_while_held() {
        let gate = OutputGate::new();
        gate.hold();
        assert!(gate.is_held());

        gate.line(Stream::Stdout, "Bot: hi there");
        gate.line(Stream::Stderr, "Error: refused");

        assert_eq!(
            gate.queued(),
            vec![
                (Stream::Stdout, "Bot: hi there\n".to_string()),
                (Stream::Stderr, "Error: refused\n".to_string()),
            ]
        );

        assert_eq!(gate.release(), 2);
        assert!(!gate.is_held());
        assert!(gate.queued().is_empty());
    }

    #[test]
    fn test_released_gate_writes_through() {
        let gate = OutputGate::new();
        gate.line(Stream::Stdout, "You: hello");
        assert!(gate.queued().is_empty());
        assert_eq!(gate.release(), 0);
    }
}
