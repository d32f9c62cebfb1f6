//! Simple-Command Execution
//!
//! Builtins run in-process; everything else forks, rewires the child's
//! environment and descriptors, and execs. The parent only ever waits
//! for the exact pid it forked - stray children belong to the reaper.

use std::ffi::CString;

use log::debug;
use nix::sys::wait::waitpid;
use nix::unistd::{execvp, fork, ForkResult};

use crate::ast::types::SimpleCmd;
use crate::interpreter::builtins::{self, BuiltinOutcome};
use crate::interpreter::errors::ExecError;
use crate::interpreter::execution_engine::Interpreter;
use crate::interpreter::{redirections, status};

impl Interpreter {
    pub(crate) fn execute_simple(&mut self, cmd: &SimpleCmd) -> i32 {
        if cmd.argv.is_empty() {
            eprintln!("just-sh: empty command");
            return 1;
        }

        match builtins::dispatch(&cmd.argv, &mut self.dir_stack) {
            BuiltinOutcome::Handled(code) => return code,
            BuiltinOutcome::NotBuiltin => {}
        }

        debug!("exec {:?}", cmd.argv);
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let err = exec_child(cmd);
                // Reached only on failure; the diagnostic is the
                // child's last word.
                eprintln!("{}", err);
                std::process::exit(err.status());
            }
            Ok(ForkResult::Parent { child }) => match waitpid(child, None) {
                Ok(wait_status) => status::from_wait(wait_status),
                Err(errno) => {
                    let err = ExecError::sys("waitpid", errno);
                    eprintln!("{}", err);
                    err.status()
                }
            },
            Err(errno) => {
                let err = ExecError::sys("fork", errno);
                eprintln!("{}", err);
                err.status()
            }
        }
    }
}

/// Child side: locals overlay, redirections (input then output), exec.
/// Returns only when something failed.
fn exec_child(cmd: &SimpleCmd) -> ExecError {
    for (name, value) in &cmd.locals {
        std::env::set_var(name, value);
    }

    if let Err(err) = redirections::apply(cmd.input.as_ref(), cmd.output.as_ref()) {
        return err;
    }

    let argv = match to_cstrings(&cmd.argv) {
        Ok(argv) => argv,
        Err(err) => return err,
    };

    match execvp(&argv[0], &argv) {
        Ok(infallible) => match infallible {},
        Err(errno) => ExecError::sys("execvp", errno),
    }
}

fn to_cstrings(argv: &[String]) -> Result<Vec<CString>, ExecError> {
    argv.iter()
        .map(|arg| CString::new(arg.as_str()).map_err(|_| ExecError::BadArg))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
