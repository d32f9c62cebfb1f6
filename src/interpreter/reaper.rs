//! Background Child Reclamation
//!
//! Foreground children are waited for synchronously at their fork
//! sites; backgrounded ones are drained here with non-blocking waits.
//! Only top-level interpretation entries reap - a reap during
//! recursion could steal the pid a synchronous `waitpid` inside a
//! pipeline or subshell is about to claim.

use log::debug;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::interpreter::status;

/// One background child reclaimed by [`reap_completed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaped {
    pub pid: Pid,
    pub status: i32,
}

/// The stderr notice announcing one reaped child.
pub fn completion_line(reaped: Reaped) -> String {
    format!("Completed: {} ({})", reaped.pid, reaped.status)
}

/// Reclaim every already-exited child without blocking, announcing
/// each on stderr. Returns the reclaimed children.
pub fn reap_completed() -> Vec<Reaped> {
    let mut reaped = Vec::new();
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => break,
            Ok(wait_status @ WaitStatus::Exited(..))
            | Ok(wait_status @ WaitStatus::Signaled(..)) => {
                let pid = match wait_status.pid() {
                    Some(pid) => pid,
                    None => continue,
                };
                let child = Reaped {
                    pid,
                    status: status::from_wait(wait_status),
                };
                eprintln!("{}", completion_line(child));
                reaped.push(child);
            }
            // Stopped/continued children stay in the table.
            Ok(_) => continue,
            Err(Errno::ECHILD) => break,
            Err(errno) => {
                debug!("reap: waitpid failed: {}", errno.desc());
                break;
            }
        }
    }
    reaped
}

// ============================================================================
// Tests
// ============================================================================
