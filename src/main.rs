//! # Command Line Interface
//!
//! The clap command is built in `cli.rs`.
//! The subcommands are run by the `commands` module of the library.

use env_logger;
#[cfg(windows)]
use colored;
use integerbasic::commands;
use integerbasic::commands::CommandError;

mod cli;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);
    let matches = cli::build_cli().get_matches();

    // Language analysis

    if let Some(cmd) = matches.subcommand_matches("verify") {
        return commands::langx::verify(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("parse") {
        return commands::langx::parse(cmd);
    }

    // Tokens

    if let Some(cmd) = matches.subcommand_matches("tokenize") {
        return commands::langx::tokenize(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("detokenize") {
        return commands::langx::detokenize(cmd);
    }

    // Grammar artifacts

    if let Some(cmd) = matches.subcommand_matches("tokens") {
        return commands::artifacts::tokens(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("node-types") {
        return commands::artifacts::node_types(cmd);
    }
    if let Some(_cmd) = matches.subcommand_matches("highlights") {
        return commands::artifacts::highlights();
    }

    // Corpus

    if let Some(cmd) = matches.subcommand_matches("corpus") {
        if let Some(sub) = cmd.subcommand_matches("run") {
            return commands::corpus::run(sub);
        }
        if let Some(sub) = cmd.subcommand_matches("generate") {
            return commands::corpus::generate(sub);
        }
    }

    // Completions

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(cli::build_cli(),cmd);
    }

    log::error!("No subcommand was found, try `integerbasic --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
