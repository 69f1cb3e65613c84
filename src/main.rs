use std::ffi::OsString;
use std::process;

use colored::*;

mod branch;
mod chain;
mod cli;
mod commands;
mod error;
mod gateway;
mod git_chain;
mod rebase;
mod types;

use cli::parse_arg_matches;
use commands::run;

// Re-export for use by other modules
pub use branch::Branch;
pub use chain::Chain;

pub fn executable_name() -> String {
    let name = std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    if name.starts_with("git-") && name.len() > 4 {
        return format!("git {}", &name[4..]);
    }
    name
}

fn run_app<I, T>(arguments: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let arg_matches = parse_arg_matches(arguments);

    match run(arg_matches) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            process::exit(1);
        }
    }
}

fn main() {
    run_app(std::env::args_os());
}
