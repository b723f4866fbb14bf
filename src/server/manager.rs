//! Single-slot supervision of the capture child process.
//!
//! The manager owns the one-session invariant: at most one capture child at
//! a time. Start spawns the CLI binary and returns immediately; a background
//! observer task waits on the child and clears the slot when it exits. Stop
//! sends the graceful interrupt, waits out the grace period, and escalates
//! to terminate and then kill if the child will not die. The slot lives
//! behind a mutex because the start, stop, and status handlers race the
//! observer's cleanup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use super::sys;
use crate::error::{Result, ShotlogError};

/// Wait after the interrupt before escalating to terminate.
const STOP_GRACE: Duration = Duration::from_secs(5);
/// Wait after terminate before the unconditional kill.
const TERMINATE_GRACE: Duration = Duration::from_secs(3);
/// Slot poll interval while waiting for the observer to reap the child.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Parameters forwarded to the capture child, echoed back on start.
#[derive(Debug, Clone, Serialize)]
pub struct StartParams {
    pub rate: u32,
    pub duration: u32,
    pub output: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Inactive,
}

#[derive(Debug)]
struct ActiveSession {
    pid: u32,
}

/// Tracks the single active capture session.
pub struct SessionManager {
    program: PathBuf,
    active: Arc<Mutex<Option<ActiveSession>>>,
}

impl SessionManager {
    /// Manager launching the `shotlog` binary that ships next to this
    /// executable.
    pub fn new() -> Self {
        Self::with_program(default_program())
    }

    /// Manager launching an arbitrary program. Tests point this at a stub.
    pub fn with_program(program: PathBuf) -> Self {
        Self {
            program,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Launch a capture child with `params`. Returns without waiting for the
    /// run to finish; rejects when a session is already active.
    pub async fn start(&self, params: &StartParams) -> Result<()> {
        let mut slot = self.active.lock().await;
        if slot.is_some() {
            return Err(ShotlogError::AlreadyRunning);
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg("-r")
            .arg(params.rate.to_string())
            .arg("-d")
            .arg(params.duration.to_string())
            .arg("-o")
            .arg(&params.output);
        if let Some(name) = &params.name {
            cmd.arg("-n").arg(name);
        }

        let mut child = cmd.spawn()?;
        let pid = child.id().ok_or(ShotlogError::PidUnavailable)?;
        *slot = Some(ActiveSession { pid });
        drop(slot);
        info!(pid, "capture process started");

        // Observer: reap the child and free the slot, but only if the slot
        // still refers to this child.
        let active = Arc::clone(&self.active);
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => info!(pid, %status, "capture process exited"),
                Err(e) => warn!(pid, error = %e, "failed to wait on capture process"),
            }
            let mut slot = active.lock().await;
            if slot.as_ref().map(|s| s.pid) == Some(pid) {
                *slot = None;
            }
        });

        Ok(())
    }

    /// Stop the active session: interrupt, then terminate, then kill, with
    /// the documented grace periods between steps. Rejects when idle.
    pub async fn stop(&self) -> Result<()> {
        let pid = match self.active.lock().await.as_ref() {
            Some(session) => session.pid,
            None => return Err(ShotlogError::NotRunning),
        };

        sys::interrupt(pid).map_err(|source| ShotlogError::Signal { pid, source })?;
        info!(pid, "sent interrupt to capture process");
        if self.wait_for_exit(pid, STOP_GRACE).await {
            return Ok(());
        }

        warn!(pid, "capture process outlived the grace period, terminating");
        sys::terminate(pid).map_err(|source| ShotlogError::Signal { pid, source })?;
        if self.wait_for_exit(pid, TERMINATE_GRACE).await {
            return Ok(());
        }

        warn!(pid, "capture process survived terminate, killing");
        sys::kill(pid).map_err(|source| ShotlogError::Signal { pid, source })?;
        self.wait_for_exit(pid, TERMINATE_GRACE).await;
        Ok(())
    }

    /// `Active` while the observer still tracks a live child.
    pub async fn status(&self) -> SessionStatus {
        if self.active.lock().await.is_some() {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        }
    }

    /// True once the observer has cleared `pid` from the slot. Never holds
    /// the lock across a sleep.
    async fn wait_for_exit(&self, pid: u32, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            let held = self.active.lock().await.as_ref().map(|s| s.pid) == Some(pid);
            if !held {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// The capture binary installed alongside the server binary.
fn default_program() -> PathBuf {
    let name = format!("shotlog{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&name)))
        .unwrap_or_else(|| PathBuf::from(name))
}
