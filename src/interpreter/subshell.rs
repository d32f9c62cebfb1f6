//! Subshell Execution
//!
//! `( body )` runs the body in a forked child; the fork itself is the
//! isolation mechanism. Whatever the body does to its cwd, environment,
//! or directory stack happens to the child's copies and dies with it.

use nix::sys::wait::waitpid;
use nix::unistd::{fork, ForkResult};

use crate::ast::types::SubshellCmd;
use crate::interpreter::errors::ExecError;
use crate::interpreter::execution_engine::Interpreter;
use crate::interpreter::{redirections, status};

impl Interpreter {
    pub(crate) fn execute_subshell(&mut self, cmd: &SubshellCmd) -> i32 {
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                for (name, value) in &cmd.locals {
                    std::env::set_var(name, value);
                }
                if let Err(err) = redirections::apply(cmd.input.as_ref(), cmd.output.as_ref()) {
                    eprintln!("{}", err);
                    std::process::exit(err.status());
                }
                let code = self.interpret(&cmd.body);
                std::process::exit(status::clamp(code));
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

// ============================================================================
// Tests
// ============================================================================
