//! Process signalling for the stop escalation path.
//!
//! The interrupt is the graceful request: the capture child treats it like
//! Ctrl+C and finalizes its document. Terminate and kill are the escalation
//! steps when the child does not wind down in time.

use std::io;

#[cfg(unix)]
fn send(pid: u32, signal: libc::c_int) -> io::Result<()> {
    let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Ask the process to finish up and write its document (SIGINT).
#[cfg(unix)]
pub fn interrupt(pid: u32) -> io::Result<()> {
    send(pid, libc::SIGINT)
}

/// Firm termination request (SIGTERM).
#[cfg(unix)]
pub fn terminate(pid: u32) -> io::Result<()> {
    send(pid, libc::SIGTERM)
}

/// Unconditional kill (SIGKILL).
#[cfg(unix)]
pub fn kill(pid: u32) -> io::Result<()> {
    send(pid, libc::SIGKILL)
}

#[cfg(not(unix))]
pub fn interrupt(_pid: u32) -> io::Result<()> {
    Err(unsupported())
}

#[cfg(not(unix))]
pub fn terminate(_pid: u32) -> io::Result<()> {
    Err(unsupported())
}

#[cfg(not(unix))]
pub fn kill(_pid: u32) -> io::Result<()> {
    Err(unsupported())
}

#[cfg(not(unix))]
fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "process signalling is only implemented on unix",
    )
}
