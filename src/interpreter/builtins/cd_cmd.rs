//! The `cd` Builtin
//!
//! `cd [dir]` - change the shell's working directory. With no argument
//! the target is `$HOME`.

use std::path::PathBuf;

use nix::unistd::chdir;

use crate::interpreter::status;

pub fn run(args: &[String]) -> i32 {
    let target = match args {
        [] => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home),
            None => {
                eprintln!("cd: HOME not set");
                return 1;
            }
        },
        [dir] => PathBuf::from(dir),
        _ => {
            eprintln!("cd: too many arguments");
            return 1;
        }
    };

    match chdir(target.as_path()) {
        Ok(()) => 0,
        Err(errno) => {
            eprintln!("cd: {}: {}", target.display(), errno.desc());
            status::clamp(errno as i32)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
