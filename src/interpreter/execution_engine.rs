//! Execution Engine
//!
//! The recursive interpreter that turns a command tree into running
//! processes. Dispatch lives here; the per-kind execution paths live
//! in their component modules as further `impl Interpreter` blocks.

use log::trace;

use crate::ast::types::Cmd;
use crate::interpreter::dir_stack::DirStack;
use crate::interpreter::{reaper, status};

/// The tree interpreter - one per shell process.
///
/// Holds the shell state that outlives a single command: the
/// `pushd`/`popd` directory stack and the last observed exit status.
/// Everything else the engine touches (cwd, environment, children) is
/// process state shared with the embedding shell.
#[derive(Debug, Default)]
pub struct Interpreter {
    pub(crate) dir_stack: DirStack,
    last_status: i32,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an interpreter over an existing directory stack.
    pub fn with_dir_stack(dir_stack: DirStack) -> Self {
        Self {
            dir_stack,
            last_status: 0,
        }
    }

    /// Status of the most recently interpreted node.
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// The `pushd`/`popd` stack.
    pub fn dir_stack(&self) -> &DirStack {
        &self.dir_stack
    }

    /// Top-level entry, called once per parsed command by the shell
    /// loop. Finished background children are reaped first, so their
    /// completion notices appear before the new command's output.
    pub fn run(&mut self, cmd: &Cmd) -> i32 {
        reaper::reap_completed();
        self.interpret(cmd)
    }

    /// Recursive worker. Re-entered inside forked pipeline, subshell,
    /// and background children - which is why it never reaps: the
    /// synchronous waits in those paths own specific pids.
    pub(crate) fn interpret(&mut self, cmd: &Cmd) -> i32 {
        trace!("interpret {:?}", cmd);
        let status = match cmd {
            Cmd::Simple(simple) => self.execute_simple(simple),
            Cmd::Pipe { left, right } => self.execute_pipe(left, right),
            Cmd::And { left, right } => self.execute_and(left, right),
            Cmd::Or { left, right } => self.execute_or(left, right),
            Cmd::Seq { left, right } => self.execute_seq(left, right.as_deref()),
            Cmd::Background { job, next } => self.execute_background(job, next.as_deref()),
            Cmd::Subshell(subshell) => self.execute_subshell(subshell),
        };
        self.last_status = status;
        status::record(status);
        status
    }
}

// ============================================================================
// Tests
// ============================================================================
