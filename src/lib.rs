//! just-sh - the execution engine of a minimal POSIX-style shell
//!
//! This library turns a parsed command tree into cooperating OS
//! processes: fork/exec for simple commands, anonymous pipes for
//! pipelines, forked subshells for isolation, fire-and-forget
//! background jobs, and the `cd`/`pushd`/`popd` builtins that must run
//! in the shell process itself to take effect.
//!
//! Parsing is a collaborator, not a concern of this crate: embedders
//! build [`ast::types::Cmd`] trees (by hand or from their own parser)
//! and hand them to [`Interpreter::run`] once per top-level command.

pub mod ast;
pub mod interpreter;

pub use ast::types::*;
pub use interpreter::{DirStack, ExecError, Interpreter};
