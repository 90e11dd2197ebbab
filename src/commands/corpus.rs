//! ## Corpus Tests

use colored::Colorize;
use super::CommandError;
use crate::corpus;
use crate::grammar::tokens::ROM_TOKENS;
use crate::{LANGUAGE,STDRESULT};
const RCH: &str = "unreachable was reached";

pub fn run(cmd: &clap::ArgMatches) -> STDRESULT {
    let lang = tree_sitter::Language::new(LANGUAGE);
    let mut failures = 0;
    let mut total = 0;
    for path in cmd.get_many::<String>("file").expect(RCH) {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                log::error!("could not read {}: {}",path,e);
                return Err(Box::new(CommandError::FileNotFound));
            }
        };
        let cases = corpus::parse(&text)?;
        for outcome in corpus::run(&lang,&cases)? {
            total += 1;
            if !outcome.passed {
                failures += 1;
                eprintln!("{} {}: {}","\u{2717}".red(),path,outcome.name);
                eprintln!("    expected: {}",outcome.expected);
                eprintln!("    actual:   {}",outcome.actual);
            }
        }
    }
    if failures > 0 {
        eprintln!("\u{2717} {} of {} {}",failures.to_string().red(),total,"cases failed".red());
        return Err(Box::new(CommandError::CorpusFailure));
    }
    eprintln!("\u{2713} {} {}",total,"cases passed".green());
    Ok(())
}

pub fn generate(cmd: &clap::ArgMatches) -> STDRESULT {
    match cmd.get_one::<String>("kind").expect(RCH).as_str() {
        "vars-legal" => print!("{}",corpus::generate_vars_legal(&ROM_TOKENS)),
        "vars-illegal" => print!("{}",corpus::generate_vars_illegal()),
        _ => return Err(Box::new(CommandError::InvalidCommand))
    }
    Ok(())
}
