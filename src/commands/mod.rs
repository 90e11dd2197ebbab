//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.
//! Each takes the clap matches for its own subcommand.

pub mod langx;
pub mod artifacts;
pub mod corpus;
pub mod completions;

use std::io::Read;
use crate::DYNERR;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("File not found")]
    FileNotFound,
    #[error("Some corpus cases failed")]
    CorpusFailure
}

/// Read binary data from stdin, which must not be the console
pub fn read_stdin_bytes(cmd_name: &str) -> Result<Vec<u8>,DYNERR> {
    if atty::is(atty::Stream::Stdin) {
        log::error!("line entry is not supported for `{}`, please pipe something in",cmd_name);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut dat: Vec<u8> = Vec::new();
    std::io::stdin().read_to_end(&mut dat)?;
    if dat.len()==0 {
        log::error!("{} did not receive any data from previous node",cmd_name);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    Ok(dat)
}

/// Read a program from stdin, which must not be the console
pub fn read_stdin_program(cmd_name: &str) -> Result<String,DYNERR> {
    let dat = read_stdin_bytes(cmd_name)?;
    match String::from_utf8(dat) {
        Ok(program) => Ok(program),
        Err(e) => {
            log::error!("the input to {} could not be interpreted as a string",cmd_name);
            Err(Box::new(e))
        }
    }
}
