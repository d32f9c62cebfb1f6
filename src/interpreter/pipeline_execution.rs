//! Pipeline Execution
//!
//! A `Pipe` node is binary; `a | b | c` arrives left-nested from the
//! parser. Each stage is a forked child that re-enters the interpreter,
//! so any command kind can sit on either side of the bar.

use std::os::unix::io::RawFd;

use log::debug;
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::wait::waitpid;
use nix::unistd::{close, dup2, fork, ForkResult};

use crate::ast::types::Cmd;
use crate::interpreter::errors::ExecError;
use crate::interpreter::execution_engine::Interpreter;
use crate::interpreter::fd::pipe_pair;
use crate::interpreter::status;

impl Interpreter {
    pub(crate) fn execute_pipe(&mut self, left: &Cmd, right: &Cmd) -> i32 {
        match self.run_pipeline(left, right) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("{}", err);
                err.status()
            }
        }
    }

    fn run_pipeline(&mut self, left: &Cmd, right: &Cmd) -> Result<i32, ExecError> {
        let (read_end, write_end) = pipe_pair()?;

        let left_pid = match unsafe { fork() }.map_err(|errno| ExecError::sys("fork", errno))? {
            ForkResult::Child => {
                self.run_stage(left, write_end.raw(), STDOUT_FILENO, read_end.raw())
            }
            ForkResult::Parent { child } => child,
        };

        // A failed second fork drops both ends on the early return; the
        // orphaned left stage is the reaper's to collect.
        let right_pid = match unsafe { fork() }.map_err(|errno| ExecError::sys("fork", errno))? {
            ForkResult::Child => {
                self.run_stage(right, read_end.raw(), STDIN_FILENO, write_end.raw())
            }
            ForkResult::Parent { child } => child,
        };

        // Both ends must be closed in the parent before any wait, or
        // the right stage never sees EOF and the wait deadlocks.
        drop(read_end);
        drop(write_end);

        let left_wait = waitpid(left_pid, None).map_err(|errno| ExecError::sys("waitpid", errno))?;
        let right_wait =
            waitpid(right_pid, None).map_err(|errno| ExecError::sys("waitpid", errno))?;
        debug!("pipeline waits: left {:?}, right {:?}", left_wait, right_wait);

        // Rightmost-stage semantics: the left status is observed only
        // to reap the child.
        Ok(status::from_wait(right_wait))
    }

    /// Child side of one stage: splice the active pipe end onto the
    /// stage's stream, close both ends, interpret, exit.
    fn run_stage(&mut self, stage: &Cmd, active: RawFd, target: RawFd, other: RawFd) -> ! {
        if let Err(errno) = dup2(active, target) {
            let err = ExecError::sys("dup2", errno);
            eprintln!("{}", err);
            std::process::exit(err.status());
        }
        let _ = close(active);
        let _ = close(other);

        let code = self.interpret(stage);
        std::process::exit(status::clamp(code));
    }
}

// ============================================================================
// Tests
// ============================================================================
