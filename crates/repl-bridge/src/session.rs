//! REPL session registry.
//!
//! [`SessionManager`] owns one [`Session`] per editing context and the [`ProcessHost`] that
//! backs them. Liveness is checked lazily: a REPL that dies on its own is only noticed by the
//! next [`SessionManager::check_liveness`] (which every [`SessionManager::ensure`] performs).
//!
//! ```text
//! Absent --create()--> Active --check_liveness() sees exit--> Dead --cleanup()--> Absent
//! ```

use crate::config::CommandLine;
use crate::error::{BridgeError, ConfigError, SessionError, TransmissionError};
use crate::host::{ContextId, EditorHost, MessageLevel, ProcessHost};
use serde::Serialize;
use std::collections::HashMap;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No process.
    Absent,
    /// A process was spawned and was running at the last check.
    Active,
    /// The last liveness check found the process or its view gone.
    Dead,
}

/// Snapshot of a session for hosts (serializable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    /// Lifecycle state.
    pub state: SessionState,
    /// OS process id of the stored handle, if any.
    pub process_id: Option<u32>,
}

/// A REPL process bound to one editing context.
#[derive(Debug)]
pub struct Session<H> {
    context: ContextId,
    handle: H,
    state: SessionState,
}

impl<H> Session<H> {
    /// The owning editing context.
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Process handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

/// Result of a successful [`SessionManager::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new process was spawned.
    Spawned,
    /// A live session already existed; nothing was spawned.
    AlreadyActive,
}

/// Owns the sessions of every editing context.
pub struct SessionManager<P: ProcessHost> {
    processes: P,
    sessions: HashMap<ContextId, Session<P::Handle>>,
    command_line: CommandLine,
    view_width: u16,
}

impl<P: ProcessHost> SessionManager<P> {
    /// Create a manager that spawns `command_line` in views of `view_width` columns.
    pub fn new(processes: P, command_line: CommandLine, view_width: u16) -> Self {
        Self {
            processes,
            sessions: HashMap::new(),
            command_line,
            view_width,
        }
    }

    /// The process host.
    pub fn processes(&self) -> &P {
        &self.processes
    }

    /// Mutable access to the process host.
    pub fn processes_mut(&mut self) -> &mut P {
        &mut self.processes
    }

    /// The REPL invocation used for new sessions.
    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    /// The stored session for `context`, if any.
    pub fn session(&self, context: ContextId) -> Option<&Session<P::Handle>> {
        self.sessions.get(&context)
    }

    /// Returns `true` if `context` has a live process.
    ///
    /// A stored handle whose view is gone or whose process exited marks the session
    /// [`SessionState::Dead`] and is then cleared, so the next [`Self::ensure`] spawns a fresh
    /// process.
    pub fn check_liveness(&mut self, context: ContextId) -> bool {
        let Some(session) = self.sessions.get_mut(&context) else {
            return false;
        };
        let handle = &session.handle;

        if self.processes.buffer_exists(handle) && self.processes.is_running(handle) {
            return true;
        }

        session.state = SessionState::Dead;
        tracing::warn!(
            context = %context,
            pid = ?self.processes.process_id(handle),
            "REPL session is no longer running"
        );
        self.cleanup(context);
        false
    }

    /// Spawn a REPL for the editor's context unless a live one exists.
    ///
    /// Reports the outcome through [`EditorHost::notify`] and restores focus to the originating
    /// context after spawning.
    pub fn create<E: EditorHost + ?Sized>(
        &mut self,
        editor: &mut E,
    ) -> Result<CreateOutcome, BridgeError> {
        let context = editor.context_id();
        match self.spawn_for(context) {
            Ok(CreateOutcome::AlreadyActive) => {
                editor.notify(MessageLevel::Info, "REPL is already running");
                Ok(CreateOutcome::AlreadyActive)
            }
            Ok(CreateOutcome::Spawned) => {
                editor.restore_focus(context);
                let message = match self.status(context).process_id {
                    Some(pid) => format!("Started {} (pid {})", self.command_line.program(), pid),
                    None => format!("Started {}", self.command_line.program()),
                };
                editor.notify(MessageLevel::Info, &message);
                Ok(CreateOutcome::Spawned)
            }
            Err(err) => {
                tracing::warn!(context = %context, error = %err, "failed to start REPL");
                editor.notify(MessageLevel::Error, &err.to_string());
                Err(err)
            }
        }
    }

    fn spawn_for(&mut self, context: ContextId) -> Result<CreateOutcome, BridgeError> {
        if self.check_liveness(context) {
            return Ok(CreateOutcome::AlreadyActive);
        }

        let program = self.command_line.program();
        if self.processes.resolve_executable(program).is_none() {
            return Err(ConfigError::ExecutableNotFound(program.to_string()).into());
        }

        let handle = self
            .processes
            .spawn(&self.command_line, self.view_width)
            .map_err(|source| SessionError::Spawn {
                program: program.to_string(),
                source,
            })?;

        tracing::info!(
            context = %context,
            pid = ?self.processes.process_id(&handle),
            command = %self.command_line,
            width = self.view_width,
            "REPL started"
        );
        self.sessions.insert(
            context,
            Session {
                context,
                handle,
                state: SessionState::Active,
            },
        );
        Ok(CreateOutcome::Spawned)
    }

    /// Make sure the editor's context has a live REPL, spawning one if needed.
    pub fn ensure<E: EditorHost + ?Sized>(&mut self, editor: &mut E) -> bool {
        self.check_liveness(editor.context_id()) || self.create(editor).is_ok()
    }

    /// Forget the session of `context`. Safe to call when nothing is stored.
    pub fn cleanup(&mut self, context: ContextId) {
        if let Some(session) = self.sessions.remove(&context) {
            tracing::debug!(context = %context, state = ?session.state, "REPL session cleared");
        }
    }

    /// Current state and process id of `context`. Does not check whether the process is alive.
    pub fn status(&self, context: ContextId) -> SessionStatus {
        match self.sessions.get(&context) {
            Some(session) => SessionStatus {
                state: session.state,
                process_id: self.processes.process_id(&session.handle),
            },
            None => SessionStatus {
                state: SessionState::Absent,
                process_id: None,
            },
        }
    }

    /// Hand `bytes` to the REPL of `context`.
    pub fn write(&mut self, context: ContextId, bytes: &[u8]) -> Result<(), BridgeError> {
        let handle = self
            .sessions
            .get(&context)
            .map(|session| &session.handle)
            .ok_or(SessionError::StaleHandle)?;
        self.processes
            .write(handle, bytes)
            .map_err(TransmissionError::Write)?;
        Ok(())
    }
}
