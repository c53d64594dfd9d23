#![allow(dead_code)]

use repl_bridge::{BridgeConfig, CommandLine, ProcessHost, ReplBridge, ReplLanguage};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Scriptable process host that records spawns and writes.
#[derive(Debug, Default)]
pub struct FakeProcesses {
    next_id: u32,
    running: HashSet<u32>,
    buffers: HashSet<u32>,
    pub spawned: Vec<(String, u16)>,
    pub writes: Vec<(u32, String)>,
    pub missing_executables: HashSet<String>,
    pub fail_spawn: bool,
    pub fail_writes: bool,
}

impl FakeProcesses {
    pub fn kill(&mut self, handle: u32) {
        self.running.remove(&handle);
    }

    pub fn close_buffer(&mut self, handle: u32) {
        self.buffers.remove(&handle);
    }

    pub fn written(&self) -> Vec<&str> {
        self.writes.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl ProcessHost for FakeProcesses {
    type Handle = u32;

    fn resolve_executable(&self, program: &str) -> Option<PathBuf> {
        if self.missing_executables.contains(program) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }

    fn spawn(&mut self, command_line: &CommandLine, width: u16) -> io::Result<u32> {
        if self.fail_spawn {
            return Err(io::Error::other("spawn refused"));
        }
        self.next_id += 1;
        let handle = 4000 + self.next_id;
        self.running.insert(handle);
        self.buffers.insert(handle);
        self.spawned.push((command_line.to_string(), width));
        Ok(handle)
    }

    fn buffer_exists(&self, handle: &u32) -> bool {
        self.buffers.contains(handle)
    }

    fn is_running(&mut self, handle: &u32) -> bool {
        self.running.contains(handle)
    }

    fn write(&mut self, handle: &u32, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes || !self.running.contains(handle) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"));
        }
        self.writes.push((*handle, String::from_utf8_lossy(bytes).into_owned()));
        Ok(())
    }

    fn process_id(&self, handle: &u32) -> Option<u32> {
        Some(*handle)
    }
}

pub fn config(temp_dir: &Path) -> BridgeConfig {
    BridgeConfig::for_language(&ReplLanguage::R)
        .unwrap()
        .with_line_delay(Duration::ZERO)
        .with_temp_dir(temp_dir)
}

pub fn bridge(temp_dir: &Path) -> ReplBridge<FakeProcesses> {
    ReplBridge::new(config(temp_dir), FakeProcesses::default())
}

pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
