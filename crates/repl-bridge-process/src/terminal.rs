//! [`ProcessHost`] over OS processes, one output view per REPL.

use crate::process::{OutputStream, ReplInbound, ReplProcess};
use crate::view::{DEFAULT_CAPACITY, ReplView};
use repl_bridge::{CommandLine, ProcessHost};
use std::collections::HashMap;
use std::fmt;
use std::io;

/// Identifies a REPL view (and the process attached to it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Raw id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

struct Terminal {
    process: ReplProcess,
    view: ReplView,
}

impl Terminal {
    /// Move pending output into the view. Returns the number of rows appended.
    fn pump(&mut self, id: ViewId) -> usize {
        let before = self.view.len();
        while let Some(event) = self.process.try_recv() {
            match event {
                ReplInbound::Output { stream, text } => {
                    if stream == OutputStream::Stderr {
                        tracing::trace!(view = %id, "stderr: {}", text);
                    }
                    self.view.push_line(&text);
                }
                ReplInbound::Closed(stream) => {
                    tracing::debug!(view = %id, ?stream, "REPL pipe closed");
                }
                ReplInbound::IoError(err) => {
                    tracing::warn!(view = %id, error = %err, "REPL I/O error");
                }
            }
        }
        self.view.len().saturating_sub(before)
    }
}

/// Number of views of exited REPLs kept around by default.
pub const DEFAULT_EXITED_VIEWS: usize = 4;

/// Spawns REPLs as child processes and keeps a wrapped transcript of their output.
///
/// Closing a view kills its process; killing the process keeps the view (so the transcript stays
/// readable) but the bridge then treats the session as dead. Views of exited REPLs are kept up to
/// an exited-view limit; beyond it the oldest ones are dropped whenever a new REPL is spawned.
pub struct TerminalHost {
    next_id: u64,
    capacity: usize,
    exited_limit: usize,
    terminals: HashMap<ViewId, Terminal>,
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalHost {
    /// Create a host whose views keep [`DEFAULT_CAPACITY`] rows.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a host whose views keep `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_id: 1,
            capacity,
            exited_limit: DEFAULT_EXITED_VIEWS,
            terminals: HashMap::new(),
        }
    }

    /// Keep at most `limit` views of exited REPLs.
    pub fn with_exited_limit(mut self, limit: usize) -> Self {
        self.exited_limit = limit;
        self
    }

    /// Drop the oldest views of exited REPLs beyond the exited-view limit.
    ///
    /// Returns the ids that were removed.
    pub fn prune_exited(&mut self) -> Vec<ViewId> {
        let mut exited: Vec<ViewId> = self
            .terminals
            .iter_mut()
            .filter_map(|(id, terminal)| (!terminal.process.is_running()).then_some(*id))
            .collect();
        if exited.len() <= self.exited_limit {
            return Vec::new();
        }

        exited.sort();
        exited.truncate(exited.len() - self.exited_limit);
        for id in &exited {
            self.terminals.remove(id);
            tracing::debug!(view = %id, "pruned view of exited REPL");
        }
        exited
    }

    /// Ids of every open view.
    pub fn views(&self) -> Vec<ViewId> {
        let mut ids: Vec<ViewId> = self.terminals.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Drain pending output of `id` into its view.
    pub fn pump(&mut self, id: ViewId) -> usize {
        self.terminals
            .get_mut(&id)
            .map(|terminal| terminal.pump(id))
            .unwrap_or(0)
    }

    /// The output view of `id`, after draining pending output.
    pub fn view_output(&mut self, id: ViewId) -> Option<&ReplView> {
        let terminal = self.terminals.get_mut(&id)?;
        terminal.pump(id);
        Some(&terminal.view)
    }

    /// Kill the process of `id` but keep its view.
    pub fn terminate(&mut self, id: ViewId) -> io::Result<()> {
        match self.terminals.get_mut(&id) {
            Some(terminal) => terminal.process.kill(),
            None => Ok(()),
        }
    }

    /// Close the view of `id`, killing its process.
    pub fn close_view(&mut self, id: ViewId) {
        if let Some(mut terminal) = self.terminals.remove(&id) {
            if let Err(err) = terminal.process.kill() {
                tracing::warn!(view = %id, error = %err, "failed to stop REPL");
            }
            tracing::debug!(view = %id, "REPL view closed");
        }
    }
}

impl ProcessHost for TerminalHost {
    type Handle = ViewId;

    fn spawn(&mut self, command_line: &CommandLine, width: u16) -> io::Result<ViewId> {
        self.prune_exited();
        let process = ReplProcess::spawn(command_line, width)?;
        let id = ViewId(self.next_id);
        self.next_id += 1;

        tracing::debug!(
            view = %id,
            pid = process.id(),
            command = %command_line,
            "REPL view opened"
        );
        self.terminals.insert(
            id,
            Terminal {
                process,
                view: ReplView::new(width, self.capacity),
            },
        );
        Ok(id)
    }

    fn buffer_exists(&self, handle: &ViewId) -> bool {
        self.terminals.contains_key(handle)
    }

    fn is_running(&mut self, handle: &ViewId) -> bool {
        match self.terminals.get_mut(handle) {
            Some(terminal) => {
                terminal.pump(*handle);
                terminal.process.is_running()
            }
            None => false,
        }
    }

    fn write(&mut self, handle: &ViewId, bytes: &[u8]) -> io::Result<()> {
        let terminal = self
            .terminals
            .get_mut(handle)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "REPL view is closed"))?;
        if !terminal.process.is_running() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "REPL has exited"));
        }
        terminal.process.send(bytes)
    }

    fn process_id(&self, handle: &ViewId) -> Option<u32> {
        self.terminals.get(handle).map(|terminal| terminal.process.id())
    }
}
