//! ## Grammar Artifacts
//!
//! Writes the generated descriptions of the language to stdout.

use crate::grammar;
use crate::STDRESULT;

fn indent(cmd: &clap::ArgMatches) -> Option<u16> {
    cmd.get_one::<u16>("indent").copied()
}

pub fn tokens(cmd: &clap::ArgMatches) -> STDRESULT {
    println!("{}",grammar::token_list_json(indent(cmd))?);
    Ok(())
}

pub fn node_types(cmd: &clap::ArgMatches) -> STDRESULT {
    println!("{}",grammar::node_types_json(indent(cmd))?);
    Ok(())
}

pub fn highlights() -> STDRESULT {
    print!("{}",crate::HIGHLIGHTS_QUERY);
    Ok(())
}
