//! ## Language Analysis and Transformations

use std::io::Write;
use colored::Colorize;
use super::{CommandError,read_stdin_bytes,read_stdin_program};
use crate::lang;
use crate::lang::{Diagnostic,Severity};
use crate::lang::diagnostics::Analyzer;
use crate::lang::tokenizer::Tokenizer;
use tree_sitter::{Language,Parser};
use crate::{LANGUAGE,STDRESULT};
const RCH: &str = "unreachable was reached";

/// Print a diagnostic with the offending span highlighted
fn eprint_diagnostic(diag: &Diagnostic,program: &str) {
    let row = diag.range.start_point.row;
    let line = program.lines().nth(row).unwrap_or("");
    let c1 = usize::min(diag.range.start_point.column,line.len());
    let c2 = match diag.range.end_point.row > row {
        true => line.len(),
        false => usize::max(c1,usize::min(diag.range.end_point.column,line.len()))
    };
    let label = match diag.severity {
        Severity::Error => diag.severity.to_string().red(),
        Severity::Warning => diag.severity.to_string().bright_yellow(),
        _ => diag.severity.to_string().blue()
    };
    eprintln!("{} row {} col {}: {}",label,row,c1,diag.message);
    eprintln!("    {}{}{}",
        line.get(0..c1).unwrap_or("???"),
        match line.get(c1..c2) { None => "???".normal(), Some(s) => s.red().bold() },
        line.get(c2..).unwrap_or("???"));
}

pub fn verify(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut analyzer = Analyzer::new();
    analyzer.set_config(lang::settings::parse(cmd.get_one::<String>("config").expect(RCH))?);
    let program = lang::read_stdin("> ")?;
    if program.trim().len()==0 {
        log::error!("verify was handed an empty string");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let language = Language::new(LANGUAGE);
    if cmd.get_flag("sexpr") {
        lang::eprint_lines_sexpr(&language,&program)?;
    }
    let verified = lang::verify_program(&language,&program,false)?;
    analyzer.analyze(&program)?;
    for diag in analyzer.get_diags() {
        eprint_diagnostic(&diag,&program);
    }
    let [err,warn,_info] = analyzer.err_warn_info_counts();
    if warn > 0 {
        eprintln!("! {} {}",warn.to_string().bright_yellow(),"warnings".bright_yellow());
    }
    eprint!("{}",verified.summary);
    if err==0 {
        if !atty::is(atty::Stream::Stdout) {
            // if not the console, pipe the code to the next node
            print!("{}",verified.listing);
        }
        return Ok(());
    } else {
        eprintln!("\u{2717} {} {}",err.to_string().red(),"errors".red());
        return Err(Box::new(lang::Error::Syntax));
    }
}

pub fn parse(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut program = lang::read_stdin("> ")?;
    if program.len() > 0 && !program.ends_with('\n') {
        program.push('\n');
    }
    let mut parser = Parser::new();
    parser.set_language(&LANGUAGE.into())?;
    let tree = match parser.parse(&program,None) {
        Some(t) => t,
        None => return Err(Box::new(lang::Error::ParsingError))
    };
    if cmd.get_flag("highlights") {
        for (rng,capture) in crate::highlight::captures(&tree) {
            println!("{}:{}-{}:{} @{} {}",
                rng.start_point.row,rng.start_point.column,
                rng.end_point.row,rng.end_point.column,
                capture,
                program.get(rng.start_byte..rng.end_byte).unwrap_or("???"));
        }
    } else {
        println!("{}",tree.root_node().to_sexp());
    }
    if tree.root_node().has_error() {
        log::warn!("syntax tree contains errors");
    }
    Ok(())
}

pub fn tokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    let program = read_stdin_program("tokenize")?;
    lang::verify_str(&Language::new(LANGUAGE),&program)?;
    let mut tokenizer = Tokenizer::new();
    let object = tokenizer.tokenize(&program)?;
    if atty::is(atty::Stream::Stdout) || cmd.get_flag("console") {
        crate::display_block(0,&object);
    } else {
        std::io::stdout().write_all(&object)?;
    }
    Ok(())
}

pub fn detokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    let config = lang::settings::parse(cmd.get_one::<String>("config").expect(RCH))?;
    let tok = read_stdin_bytes("detokenize")?;
    let mut tokenizer = Tokenizer::new();
    tokenizer.set_config(config);
    let program = tokenizer.detokenize(&tok)?;
    for line in program.lines() {
        println!("{}",line);
    }
    Ok(())
}
