//! A REPL child process driven over stdio.
//!
//! Input is handed to a writer thread through a channel, so writes never block the caller on a
//! busy interpreter. Two reader threads forward stdout and stderr line by line. Everything stays
//! runtime-agnostic: plain threads and `std::sync::mpsc`.

use repl_bridge::CommandLine;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::process::{Child, ChildStdin, Command as ProcessCommand, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Which output pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

#[derive(Debug)]
/// Outbound data for the REPL's stdin.
pub enum ReplOutbound {
    /// Raw bytes, written and flushed as one unit.
    Input(Vec<u8>),
}

#[derive(Debug)]
/// Events produced by the background threads.
pub enum ReplInbound {
    /// One line of output, without its line terminator.
    Output {
        /// Source pipe.
        stream: OutputStream,
        /// Decoded text (invalid UTF-8 is replaced).
        text: String,
    },
    /// A pipe reached end of file.
    Closed(OutputStream),
    /// An I/O error produced by the background reader/writer threads.
    IoError(String),
}

/// A spawned REPL with piped stdio.
pub struct ReplProcess {
    child: Child,
    tx: mpsc::Sender<ReplOutbound>,
    rx: mpsc::Receiver<ReplInbound>,
}

impl ReplProcess {
    /// Spawn `command_line` with `COLUMNS` set to `width`.
    pub fn spawn(command_line: &CommandLine, width: u16) -> io::Result<Self> {
        let mut cmd = ProcessCommand::new(command_line.program());
        cmd.args(command_line.args())
            .env("COLUMNS", width.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let child = cmd.spawn()?;
        Self::from_child(child)
    }

    /// Wrap an already-spawned child whose stdin and stdout are piped.
    ///
    /// A piped stderr is forwarded as well; otherwise it is left alone.
    pub fn from_child(mut child: Child) -> io::Result<Self> {
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("Failed to open REPL stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("Failed to open REPL stdout"))?;
        let stderr = child.stderr.take();

        let (tx_out, rx_out) = mpsc::channel::<ReplOutbound>();
        let (tx_in, rx_in) = mpsc::channel::<ReplInbound>();

        {
            let tx_in = tx_in.clone();
            thread::spawn(move || repl_write_loop(stdin, rx_out, tx_in));
        }
        if let Some(stderr) = stderr {
            let tx_in = tx_in.clone();
            thread::spawn(move || repl_read_loop(stderr, OutputStream::Stderr, tx_in));
        }
        thread::spawn(move || repl_read_loop(stdout, OutputStream::Stdout, tx_in));

        Ok(Self {
            child,
            tx: tx_out,
            rx: rx_in,
        })
    }

    /// OS process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Queue `bytes` for the REPL's stdin.
    ///
    /// Fails once the writer thread has stopped (after a write error on the pipe).
    pub fn send(&self, bytes: &[u8]) -> io::Result<()> {
        self.tx
            .send(ReplOutbound::Input(bytes.to_vec()))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "REPL writer thread stopped"))
    }

    /// Try to receive the next event without blocking.
    pub fn try_recv(&self) -> Option<ReplInbound> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ReplInbound> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Exit status if the process has finished, without blocking.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Returns `true` while the process has not exited.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kill the process and reap it.
    pub fn kill(&mut self) -> io::Result<()> {
        if self.is_running() {
            self.child.kill()?;
        }
        self.child.wait().map(|_| ())
    }
}

impl Drop for ReplProcess {
    fn drop(&mut self) {
        if let Err(err) = self.kill() {
            tracing::debug!(pid = self.child.id(), error = %err, "failed to stop REPL on drop");
        }
    }
}

fn repl_write_loop(
    stdin: ChildStdin,
    rx: mpsc::Receiver<ReplOutbound>,
    tx_in: mpsc::Sender<ReplInbound>,
) {
    let mut writer = BufWriter::new(stdin);
    for msg in rx {
        match msg {
            ReplOutbound::Input(bytes) => {
                if let Err(err) = writer.write_all(&bytes).and_then(|()| writer.flush()) {
                    let _ = tx_in.send(ReplInbound::IoError(err.to_string()));
                    break;
                }
            }
        }
    }
}

fn repl_read_loop<R: Read>(pipe: R, stream: OutputStream, tx: mpsc::Sender<ReplInbound>) {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                let _ = tx.send(ReplInbound::Closed(stream));
                break;
            }
            Ok(_) => {
                let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                let text = String::from_utf8_lossy(line).into_owned();
                if tx.send(ReplInbound::Output { stream, text }).is_err() {
                    break;
                }
            }
            Err(err) => {
                let _ = tx.send(ReplInbound::IoError(err.to_string()));
                break;
            }
        }
    }
}
