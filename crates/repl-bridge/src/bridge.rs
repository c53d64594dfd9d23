//! The public entry point tying sessions, extraction, and dispatch together.

use crate::config::BridgeConfig;
use crate::dispatch::{Command, DispatchEngine, DispatchOptions};
use crate::host::{ContextId, EditorHost, ProcessHost};
use crate::region::RegionKind;
use crate::session::{SessionManager, SessionStatus};

/// Bridge between editor documents and per-context REPL processes.
///
/// All operations run to completion on the caller's thread. Boolean results are the only
/// outcome exposed; failures are reported through [`EditorHost::notify`].
pub struct ReplBridge<P: ProcessHost> {
    config: BridgeConfig,
    sessions: SessionManager<P>,
    engine: DispatchEngine,
}

impl<P: ProcessHost> ReplBridge<P> {
    /// Create a bridge from a validated configuration and a process host.
    pub fn new(config: BridgeConfig, processes: P) -> Self {
        let sessions =
            SessionManager::new(processes, config.command_line().clone(), config.view_width());
        let engine = DispatchEngine::new(&config);
        Self {
            config,
            sessions,
            engine,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The session registry.
    pub fn sessions(&self) -> &SessionManager<P> {
        &self.sessions
    }

    /// Mutable access to the session registry.
    pub fn sessions_mut(&mut self) -> &mut SessionManager<P> {
        &mut self.sessions
    }

    /// Make sure the editor's context has a live REPL.
    pub fn ensure_session<E: EditorHost + ?Sized>(&mut self, editor: &mut E) -> bool {
        self.sessions.ensure(editor)
    }

    /// Start a REPL for the editor's context; reports "already running" if one is live.
    pub fn create_session<E: EditorHost + ?Sized>(&mut self, editor: &mut E) -> bool {
        self.sessions.create(editor).is_ok()
    }

    /// Send the `kind` region around the cursor.
    pub fn dispatch<E: EditorHost + ?Sized>(
        &mut self,
        editor: &mut E,
        kind: RegionKind,
        options: DispatchOptions,
    ) -> bool {
        self.engine.dispatch(&mut self.sessions, editor, kind, options)
    }

    /// Send a literal command.
    pub fn send_command<E: EditorHost + ?Sized>(
        &mut self,
        editor: &mut E,
        command: &Command,
    ) -> bool {
        self.engine.send_command(&mut self.sessions, editor, command)
    }

    /// Lines the `kind` region would deliver (empty when extraction fails).
    pub fn region_for<E: EditorHost + ?Sized>(&self, editor: &E, kind: RegionKind) -> Vec<String> {
        self.engine
            .extractor()
            .extract(kind, editor.document(), editor.cursor(), editor.selection())
            .map(|region| region.lines)
            .unwrap_or_default()
    }

    /// State and process id of `context`'s session.
    pub fn session_status(&self, context: ContextId) -> SessionStatus {
        self.sessions.status(context)
    }

    /// Forget `context`'s session.
    pub fn cleanup_session(&mut self, context: ContextId) {
        self.sessions.cleanup(context);
    }
}
