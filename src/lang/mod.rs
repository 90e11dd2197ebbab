//! # Language Module
//!
//! Objects that want to walk a syntax tree can provide the `Visit` trait.
//! Such objects can take some action depending on the status of `TreeCursor`.
//! Tokenization, detokenization, and diagnostics are in the submodules.

pub mod settings;
pub mod tokenizer;
pub mod diagnostics;
#[cfg(test)]
mod detokenize_test;

use colored::*;
use thiserror::Error;
use std::fmt::Write as FormattedWriter;
use std::io;
use std::io::Read;
use std::io::Write;
use std::str::FromStr;
use atty;
use log::{debug,error};

use tree_sitter::{Language,Parser,Node,Tree,TreeCursor,Range};
use crate::{STDRESULT,DYNERR};

pub enum WalkerChoice {
    GotoChild,
    GotoSibling,
    GotoParentSibling,
    Exit
}

#[derive(Error,Debug)]
pub enum Error {
    #[error("Syntax error")]
    Syntax,
    #[error("Invalid Line Number")]
    LineNumber,
    #[error("Tokenization error")]
    Tokenization,
    #[error("Detokenization error")]
    Detokenization,
    #[error("Parser could not produce a tree")]
    ParsingError
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f,"error"),
            Self::Warning => write!(f,"warning"),
            Self::Information => write!(f,"info"),
            Self::Hint => write!(f,"hint")
        }
    }
}

/// A diagnostic positioned within a whole program, rows count from 0
#[derive(Clone,Debug,PartialEq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String
}

/// Get text of the node, source should be the parsed line.
/// Returns an empty string if the source text does not include the node's range.
pub fn node_text(node: &Node,source: &str) -> String {
    match source.get(node.start_byte()..node.end_byte()) {
        Some(s) => s.to_string(),
        None => String::new()
    }
}

/// Get the value of a numerical node, spaces are ignored
pub fn node_integer<T: FromStr>(node: &Node,source: &str) -> Option<T> {
    let txt = node_text(node,source).replace(" ","");
    match T::from_str(&txt) {
        Ok(x) => Some(x),
        Err(_) => None
    }
}

/// Starting in some stringlike context, where the trigger byte has already been consumed,
/// escape the remaining negative ASCII bytes within that context.
/// Bytes in `escapes`, positive ASCII, and the negative ASCII backslash are put as `\xHH`.
/// Return the escaped string and the index to the terminator.
/// The terminator is not part of the returned string.
pub fn bytes_to_escaped_string(bytes: &[u8], offset: usize, terminator: &[u8], escapes: &[u8]) -> (String,usize)
{
    const NEG_BACKSLASH: u8 = 0xdc;
    let mut ans = String::new();
    let mut idx = offset;
    while idx < bytes.len() {
        let b = bytes[idx];
        if terminator.contains(&b) {
            break;
        }
        if escapes.contains(&b) || b < 128 || b == NEG_BACKSLASH || b == 255 {
            write!(&mut ans,"\\x{:02x}",b).expect("unreachable");
        } else {
            ans.push(char::from(b - 128));
        }
        idx += 1;
    }
    return (ans,idx);
}

/// Try to update an integer from a serde `Value` presumed to be an object.
/// If there is any error do not change the value.
pub fn update_json_i64(maybe_obj: &serde_json::Value, key: &str, curr: &mut i64) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(x) = obj.get(key) {
            if let Some(i) = x.as_i64() {
                *curr = i;
            }
        }
    }
}

/// Try to update an integer list from a serde `Value` presumed to be an object.
/// If there is any error do not change the value.
pub fn update_json_vec(maybe_obj: &serde_json::Value, key: &str, curr: &mut Vec<i64>) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(x) = obj.get(key) {
            if let Some(a) = x.as_array() {
                let mut ans = Vec::new();
                for v in a {
                    match v.as_i64() {
                        Some(i) => ans.push(i),
                        None => return
                    }
                }
                *curr = ans;
            }
        }
    }
}

/// Try to update a severity from a serde `Value` presumed to be an object.
/// The value `ignore` turns the check off.  If there is any error do not change the value.
pub fn update_json_severity(maybe_obj: &serde_json::Value, key: &str, curr: &mut Option<Severity>) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(x) = obj.get(key) {
            if let Some(s) = x.as_str() {
                *curr = match s {
                    "ignore" => None,
                    "hint" => Some(Severity::Hint),
                    "info" => Some(Severity::Information),
                    "warn" => Some(Severity::Warning),
                    "error" => Some(Severity::Error),
                    _ => *curr
                };
            }
        }
    }
}

pub trait Visit {
    fn visit(&mut self,curs: &TreeCursor) -> WalkerChoice;
    fn walk(&mut self,tree: &Tree)
    {
        let mut curs = tree.walk();
        let mut choice = WalkerChoice::GotoChild;
        while ! matches!(choice,WalkerChoice::Exit)
        {
            if matches!(choice,WalkerChoice::GotoChild) && curs.goto_first_child() {
                choice = self.visit(&curs);
            } else if matches!(choice,WalkerChoice::GotoParentSibling) && curs.goto_parent() && curs.goto_next_sibling() {
                choice = self.visit(&curs);
            } else if matches!(choice,WalkerChoice::GotoSibling) && curs.goto_next_sibling() {
                choice = self.visit(&curs);
            } else if curs.goto_next_sibling() {
                choice = self.visit(&curs);
            } else if curs.goto_parent() {
                choice = WalkerChoice::GotoSibling;
            } else {
                choice = WalkerChoice::Exit;
            }
        }
    }
}

pub struct SyntaxCheckVisitor {
    pub code: String,
    pub err_count: usize,
    pub curr_line: usize
}

impl SyntaxCheckVisitor {
    fn new(prog: String) -> Self {
        Self { code: prog, err_count: 0, curr_line: 0 }
    }
}

impl Visit for SyntaxCheckVisitor {
    fn visit(&mut self,curs: &TreeCursor) -> WalkerChoice
    {
        if curs.node().is_error() || curs.node().is_missing()
        {
            self.err_count += 1;
            let mut c = curs.clone();
            let b1 = c.node().start_byte();
            let b2 = c.node().end_byte();
            let mut l1 = b1;
            let mut l2 = b2;
            while c.goto_parent() {
                if c.node().kind()=="line" {
                    l1 = c.node().start_byte();
                    l2 = c.node().end_byte() - 1;
                }
            }
            if curs.node().is_missing() {
                eprintln!("{} row {} col {} missing {}","ERROR".red(),self.curr_line,b1,curs.node().kind());
            } else {
                eprintln!("{} row {} col {}","ERROR".red(),self.curr_line,b1);
            }
            debug!("error bounds {} {} {} {}",l1,b1,b2,l2);
            debug!("line length {}",self.code.len());
            eprintln!("    {}{}{}",
                match self.code.get(l1..b1) { None => "???", Some(s) => s },
                match self.code.get(b1..b2) { None => "???".normal(), Some(s) => s.red().bold() },
                match self.code.get(b2..l2) { None => "???", Some(s) => s });
            return WalkerChoice::GotoSibling;
        }
        return WalkerChoice::GotoChild;
    }
}

fn parser_for(lang: &Language) -> Result<Parser,DYNERR> {
    let mut parser = Parser::new();
    parser.set_language(lang)?;
    Ok(parser)
}

/// Simple verify, returns an error if any issues
pub fn verify_str(lang: &Language,code: &str) -> STDRESULT {
    let mut parser = parser_for(lang)?;
    let mut visitor = SyntaxCheckVisitor::new(String::new());
    for line in code.lines()
    {
        if line.trim().len()>0 {
            visitor.code = String::from(line) + "\n";
            let tree = match parser.parse(&visitor.code,None) {
                Some(t) => t,
                None => return Err(Box::new(Error::ParsingError))
            };
            visitor.walk(&tree);
        }
        visitor.curr_line += 1;
    }
    if visitor.err_count > 0 {
        error!("found {} syntax errors",visitor.err_count);
        return Err(Box::new(Error::Syntax));
    }
    Ok(())
}

/// Accumulate lines from the console until the user types `bye`
pub fn line_entry(prompt: &str) -> Result<String,DYNERR> {
    let mut code = String::new();
    eprintln!("Line entry interface.");
    eprintln!("This is a blind accumulation of lines.");
    eprintln!("Verify occurs when entry is terminated.");
    eprintln!("Accumulated lines can be piped.");
    eprintln!("`bye` terminates.");
    loop {
        eprint!("{} ",prompt);
        let mut line = String::new();
        io::stderr().flush()?;
        if io::stdin().read_line(&mut line)?==0 {
            break;
        }
        if line=="bye\n" || line=="bye\r\n" {
            break;
        }
        code += &line;
    }
    Ok(code)
}

/// Read a whole program from stdin, using line entry if stdin is the console
pub fn read_stdin(prompt: &str) -> Result<String,DYNERR> {
    if atty::is(atty::Stream::Stdin) {
        return line_entry(prompt);
    }
    let mut code = String::new();
    io::stdin().read_to_string(&mut code)?;
    Ok(code)
}

/// Result of `verify_program`
pub struct Verified {
    /// the non-empty lines, each followed by its s-expression if requested
    pub listing: String,
    /// one line tally for the console
    pub summary: String,
    pub err_count: usize
}

/// Detect syntax errors in a program.  If `sexpr`, each line is followed by its s-expression.
/// The listing is built whether or not there are errors, only a failure to parse is an `Err`.
pub fn verify_program(lang: &Language,code: &str,sexpr: bool) -> Result<Verified,DYNERR>
{
    let mut parser = parser_for(lang)?;
    let mut visitor = SyntaxCheckVisitor::new(String::new());
    let mut res = String::new();
    let mut summary = String::new();
    for line in code.lines()
    {
        if line.len()>0 {
            visitor.code = String::from(line) + "\n";
            let tree = match parser.parse(&visitor.code,None) {
                Some(t) => t,
                None => return Err(Box::new(Error::ParsingError))
            };
            if sexpr {
                if res.len()==0 {
                    res += "\n";
                }
                res += &(line.to_string() + "\n" + &tree.root_node().to_sexp() + "\n");
            } else {
                res += &(line.to_string() + "\n");
            }
            visitor.walk(&tree);
        }
        visitor.curr_line += 1;
    }
    match visitor.err_count {
        0 => writeln!(summary,"\u{2713} {}","Syntax OK".to_string().green())?,
        n => writeln!(summary,"\u{2717} {} ({})","Syntax Errors".to_string().red(),n)?
    };
    Ok(Verified { listing: res, summary, err_count: visitor.err_count })
}

/// Print each line of the program followed by its s-expression, for debugging
pub fn eprint_lines_sexpr(lang: &Language,program: &str) -> STDRESULT {
    let mut parser = parser_for(lang)?;
    for line in program.lines() {
        if line.trim().len()==0 {
            continue;
        }
        let code = String::from(line) + "\n";
        match parser.parse(&code,None) {
            Some(tree) => {
                eprintln!("{}",line);
                eprintln!("  {}",tree.root_node().to_sexp());
            },
            None => return Err(Box::new(Error::ParsingError))
        }
    }
    Ok(())
}
