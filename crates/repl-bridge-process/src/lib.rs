#![warn(missing_docs)]
//! `repl-bridge-process` - OS-process host for `repl-bridge`.
//!
//! [`TerminalHost`] implements [`repl_bridge::ProcessHost`]: every REPL runs as a child process
//! with piped stdio, and its output is collected into a [`ReplView`] wrapped to the configured
//! view width. No async runtime is required; background threads move bytes between the pipes and
//! channels.

pub mod process;
pub mod terminal;
pub mod view;

pub use process::{OutputStream, ReplInbound, ReplOutbound, ReplProcess};
pub use terminal::{DEFAULT_EXITED_VIEWS, TerminalHost, ViewId};
pub use view::{DEFAULT_CAPACITY, ReplView};
