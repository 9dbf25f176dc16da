//! Process module.
//!
//! This module contains cross platform helpers around the
//! `std::process` crate, used to run password commands.

use log::debug;
use std::{env, io, process::Command, result, string};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot run command {1:?}")]
    RunCmdError(#[source] io::Error, String),
    #[error("cannot run command {0:?}: exited with status {1}")]
    ExitStatusError(String, String),
    #[error("cannot parse command output")]
    ParseCmdOutputError(#[source] string::FromUtf8Error),
}

pub type Result<T> = result::Result<T, Error>;

/// Runs the given command through the system shell and returns its
/// standard output as UTF-8 string.
pub fn run(cmd: &str) -> Result<String> {
    debug!("running command: {}", cmd);

    let windows = cfg!(target_os = "windows")
        && env::var("MSYSTEM")
            .map(|env| !env.starts_with("MINGW"))
            .unwrap_or(true);

    let output = if windows {
        Command::new("cmd").args(&["/C", cmd]).output()
    } else {
        Command::new("sh").arg("-c").arg(cmd).output()
    }
    .map_err(|err| Error::RunCmdError(err, cmd.to_owned()))?;

    if !output.status.success() {
        return Err(Error::ExitStatusError(
            cmd.to_owned(),
            output.status.to_string(),
        ));
    }

    String::from_utf8(output.stdout).map_err(Error::ParseCmdOutputError)
}
