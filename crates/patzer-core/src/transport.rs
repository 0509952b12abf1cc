//! Line transport to the external search process

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to start engine `{path}`: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine process exposes no {0} pipe")]
    MissingPipe(&'static str),
    #[error("failed to write to engine stdin: {0}")]
    Write(#[from] std::io::Error),
}

/// A bidirectional line channel to the engine process.
///
/// Implementations deliver inbound lines through a channel fed by their own
/// reader; a disconnected receiver means the engine side is gone for good.
pub trait EngineTransport: Send {
    /// Send one command line. A newline is appended and the write flushed.
    fn send_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Receiver of inbound lines, trailing newline stripped.
    fn lines(&self) -> Receiver<String>;
}

/// Transport over a spawned engine executable with piped stdio.
///
/// Stdout is pumped by a dedicated reader thread into an unbounded channel;
/// stderr is inherited so engine diagnostics stay visible. Dropping the
/// transport asks the engine to quit and then reaps the process.
pub struct ChildTransport {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    lines_rx: Receiver<String>,
    reader: Option<JoinHandle<()>>,
}

impl ChildTransport {
    pub fn spawn(program: &Path) -> Result<Self, TransportError> {
        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                path: program.display().to_string(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(TransportError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(TransportError::MissingPipe("stdout"))?;

        let (tx, rx) = unbounded();
        let reader = thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
            log::debug!("engine stdout closed, reader thread exiting");
        });

        Ok(Self {
            child,
            stdin: BufWriter::new(stdin),
            lines_rx: rx,
            reader: Some(reader),
        })
    }
}

impl EngineTransport for ChildTransport {
    fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn lines(&self) -> Receiver<String> {
        self.lines_rx.clone()
    }
}

impl Drop for ChildTransport {
    fn drop(&mut self) {
        // The session normally sent quit already; repeat it for the case
        // where the transport is dropped mid-flight, then reap.
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}
