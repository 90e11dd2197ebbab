//! # Corpus tests
//!
//! Reads and runs test files in the tree-sitter corpus format:
//! ```text
//! ==========
//! name
//! :error
//! ==========
//!
//! 10 PRINT "HELLO"
//!
//! ---
//!
//! (source_file (line ...))
//! ```
//! A case with the `:error` attribute passes if the tree contains an error, otherwise
//! the tree must match the expected s-expression, ignoring whitespace.
//!
//! The variable naming corpora are generated from the ROM token table.

use std::fmt::Write;
use log::{debug,info};
use regex::Regex;
use thiserror::Error;
use crate::grammar::tokens;
use crate::grammar::tokens::RomToken;
use tree_sitter::{Language,Parser};
use crate::DYNERR;

#[derive(Error,Debug)]
pub enum Error {
    #[error("corpus header not closed at line {0}")]
    UnclosedHeader(usize),
    #[error("corpus case `{0}` has no `---` separator")]
    MissingSeparator(String),
    #[error("corpus case `{0}` has an unknown attribute `{1}`")]
    UnknownAttribute(String,String),
    #[error("corpus case `{0}` expects neither a tree nor an error")]
    EmptyExpectation(String)
}

#[derive(Clone,Debug,PartialEq)]
pub struct Case {
    pub name: String,
    pub expect_error: bool,
    pub code: String,
    pub expected: String
}

#[derive(Clone,Debug)]
pub struct Outcome {
    pub name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String
}

/// Collapse whitespace so that s-expressions can be compared
pub fn normalize_sexp(sexp: &str) -> String {
    let ws = Regex::new(r"\s+").expect("unreachable");
    let collapsed = ws.replace_all(sexp.trim(),  " ").to_string();
    collapsed.replace("( ","(").replace(" )",")")
}

fn header_rule() -> Regex {
    Regex::new(r"^={3,}\s*$").expect("unreachable")
}

fn separator_rule() -> Regex {
    Regex::new(r"^-{3,}\s*$").expect("unreachable")
}

/// Parse the text of a corpus file into cases
pub fn parse(text: &str) -> Result<Vec<Case>,Error> {
    let header = header_rule();
    let sep = separator_rule();
    let lines: Vec<&str> = text.lines().collect();
    let mut ans = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !header.is_match(lines[i]) {
            i += 1;
            continue;
        }
        let open = i;
        i += 1;
        let mut name = String::new();
        let mut expect_error = false;
        while i < lines.len() && !header.is_match(lines[i]) {
            let l = lines[i].trim();
            if l.starts_with(':') {
                match l {
                    ":error" => expect_error = true,
                    _ => return Err(Error::UnknownAttribute(name,l.to_string()))
                }
            } else if name.len()==0 {
                name = l.to_string();
            }
            i += 1;
        }
        if i >= lines.len() {
            return Err(Error::UnclosedHeader(open+1));
        }
        i += 1;
        let body_start = i;
        while i < lines.len() && !header.is_match(lines[i]) {
            i += 1;
        }
        let body = &lines[body_start..i];
        let split = match body.iter().position(|l| sep.is_match(l)) {
            Some(idx) => idx,
            None => return Err(Error::MissingSeparator(name))
        };
        let code = body[0..split].join("\n").trim_matches('\n').to_string() + "\n";
        let expected = normalize_sexp(&body[split+1..].join("\n"));
        if expected.len()==0 && !expect_error {
            return Err(Error::EmptyExpectation(name));
        }
        debug!("corpus case {}",name);
        ans.push(Case { name, expect_error, code, expected });
    }
    Ok(ans)
}

/// Run the cases against a language
pub fn run(lang: &Language,cases: &[Case]) -> Result<Vec<Outcome>,DYNERR> {
    let mut parser = Parser::new();
    parser.set_language(lang)?;
    let mut ans = Vec::new();
    for case in cases {
        let tree = match parser.parse(&case.code,None) {
            Some(t) => t,
            None => return Err(Box::new(crate::lang::Error::ParsingError))
        };
        let actual = tree.root_node().to_sexp();
        let passed = match case.expect_error {
            true => tree.root_node().has_error(),
            false => normalize_sexp(&actual)==case.expected
        };
        ans.push(Outcome { name: case.name.clone(), passed, expected: case.expected.clone(), actual });
    }
    info!("{} of {} corpus cases passed",ans.iter().filter(|o| o.passed).count(),ans.len());
    Ok(ans)
}

fn heading(s: &str,expect_err: bool) -> String {
    match expect_err {
        true => ["==========\n",s,"\n:error\n==========\n\n"].concat(),
        false => ["==========\n",s,"\n==========\n\n"].concat()
    }
}

fn sorted(mut v: Vec<&'static str>) -> Vec<&'static str> {
    v.sort();
    v.dedup();
    v
}

const ASSIGN_INT: &str = "(line (linenum) (statement (assignment_int (int_name) (op_eq_assign_int) (integer)))))";
const ASSIGN_STR: &str = "(line (linenum) (statement (assignment_str (str_name (dollar)) (op_eq_assign_str) (string (quote) (unquote))))))";
const REM_LINE: &str = "(line (linenum) (statement (statement_rem) (comment_text) )))";

/// Generate the corpus of variable names that must be rejected
pub fn generate_vars_illegal() -> String {
    let mut ans = String::new();
    for l in sorted(tokens::ILLEGAL_VAR.to_vec()) {
        let u = l.to_uppercase();
        ans += &heading(&format!("Standalone int {}",l),true);
        write!(ans,"10 {} = 1\n\n---\n\n",u).expect("unreachable");
        ans += &heading(&format!("Standalone str {}",l),true);
        write!(ans,"10 {}$ = \"1\"\n\n---\n\n",u).expect("unreachable");
    }
    for l in sorted(tokens::ILLEGAL_VAR_POSTNUM.to_vec()) {
        ans += &heading(&format!("Postnumber int {}",l),true);
        write!(ans,"10 {}1 = 1\n\n---\n\n",l.to_uppercase()).expect("unreachable");
    }
    for l in sorted(tokens::illegal_str_postnum()) {
        ans += &heading(&format!("Postnumber str {}",l),true);
        write!(ans,"10 {}1$ = \"1\"\n\n---\n\n",l.to_uppercase()).expect("unreachable");
    }
    let postalpha_and_postnum = tokens::difference(&tokens::ILLEGAL_VAR_POSTALPHA,&tokens::illegal_var_postalpha_only());
    for l in sorted(postalpha_and_postnum) {
        let u = l.to_uppercase();
        ans += &heading(&format!("Postalpha int {}",l),true);
        write!(ans,"10 {}A = 1\n\n---\n\n",u).expect("unreachable");
        ans += &heading(&format!("Postalpha str {}",l),true);
        write!(ans,"10 {}A$ = \"1\"\n\n---\n\n",u).expect("unreachable");
    }
    for l in sorted(tokens::ILLEGAL_VAR_END.to_vec()) {
        let u = l.to_uppercase();
        ans += &heading(&format!("Within int {}",l),true);
        write!(ans,"10 Z{}Z = 1: Z{} = 1\n\n---\n\n",u,u).expect("unreachable");
        ans += &heading(&format!("Within str {}",l),true);
        write!(ans,"10 Z{}Z$ = \"1\": Z{}$ = \"1\"\n\n---\n\n",u,u).expect("unreachable");
    }
    ans
}

/// Generate the corpus of variable names that must be accepted, along with the expected trees
pub fn generate_vars_legal(toks: &[RomToken]) -> String {
    let alpha = tokens::alpha_lexemes(toks);
    let without = |exclude: &[&str]| -> Vec<String> {
        alpha.iter().filter(|l| !exclude.contains(&l.as_str())).cloned().collect()
    };
    let str_postnum = tokens::illegal_str_postnum();
    let mut ans = String::new();
    for l in without(&tokens::ILLEGAL_VAR) {
        let u = l.to_uppercase();
        ans += &heading(&format!("Standalone int {}",l),false);
        write!(ans,"10 {} = 1\n\n---\n\n(source_file\n",u).expect("unreachable");
        ans += if l=="rem" { REM_LINE } else { ASSIGN_INT };
        ans += "\n\n";
        ans += &heading(&format!("Standalone str {}",l),false);
        write!(ans,"10 {}$ = \"1\"\n\n---\n\n(source_file\n",u).expect("unreachable");
        ans += if l=="rem" { REM_LINE } else { ASSIGN_STR };
        ans += "\n\n";
    }
    for l in without(&tokens::ILLEGAL_VAR_POSTNUM) {
        ans += &heading(&format!("Postnumber int {}",l),false);
        write!(ans,"10 {}1 = 1\n\n---\n\n(source_file\n",l.to_uppercase()).expect("unreachable");
        ans += match l.as_str() {
            "print" => "(line (linenum) (statement (statement_print_int) (binary_aexpr (integer) (op_aeq) (integer)) )))",
            "goto" => "(line (linenum) (statement (statement_goto) (binary_aexpr (integer) (op_aeq) (integer)) )))",
            "rem" => REM_LINE,
            _ => ASSIGN_INT
        };
        ans += "\n\n";
    }
    for l in without(&str_postnum) {
        ans += &heading(&format!("Postnumber str {}",l),false);
        write!(ans,"10 {}1$ = \"1\"\n\n---\n\n(source_file\n",l.to_uppercase()).expect("unreachable");
        ans += if l=="rem" { REM_LINE } else { ASSIGN_STR };
        ans += "\n\n";
    }
    for l in without(&tokens::ILLEGAL_VAR_POSTALPHA) {
        let u = l.to_uppercase();
        ans += &heading(&format!("Postalpha int {}",l),false);
        write!(ans,"10 {}A = 1\n\n---\n\n(source_file\n",u).expect("unreachable");
        ans += match l.as_str() {
            "let" => "(line (linenum) (statement (assignment_int (statement_let) (int_name) (op_eq_assign_int) (integer)))))",
            "print" => "(line (linenum) (statement (statement_print_int) (binary_aexpr (int_name) (op_aeq) (integer)) )))",
            "goto" => "(line (linenum) (statement (statement_goto) (binary_aexpr (int_name) (op_aeq) (integer)) )))",
            "rem" => REM_LINE,
            _ => ASSIGN_INT
        };
        ans += "\n\n";
        ans += &heading(&format!("Postalpha str {}",l),false);
        write!(ans,"10 {}A$ = \"1\"\n\n---\n\n(source_file\n",u).expect("unreachable");
        ans += match l.as_str() {
            "let" => "(line (linenum) (statement (assignment_str (statement_let) (str_name (dollar)) (op_eq_assign_str) (string (quote) (unquote))))))",
            "print" => "(line (linenum) (statement (statement_print_int) (binary_aexpr (str_name (dollar)) (op_seq) (string (quote) (unquote))) )))",
            "goto" => "(line (linenum) (statement (statement_goto) (binary_aexpr (str_name (dollar)) (op_seq) (string (quote) (unquote))) )))",
            "rem" => REM_LINE,
            _ => ASSIGN_STR
        };
        ans += "\n\n";
    }
    for l in without(&tokens::ILLEGAL_VAR_END) {
        let u = l.to_uppercase();
        ans += &heading(&format!("Within int {}",l),false);
        write!(ans,"10 Z{}Z = 1: Z{} = 1\n\n---\n\n(source_file\n",u,u).expect("unreachable");
        ans += "(line (linenum)\n    (statement (assignment_int (int_name) (op_eq_assign_int) (integer)))\n    (sep_statement)\n    (statement (assignment_int (int_name) (op_eq_assign_int) (integer)))))\n\n";
        ans += &heading(&format!("Within str {}",l),false);
        write!(ans,"10 Z{}Z$ = \"1\": Z{}$ = \"1\"\n\n---\n\n(source_file\n",u,u).expect("unreachable");
        ans += "(line (linenum)\n    (statement (assignment_str (str_name (dollar)) (op_eq_assign_str) (string (quote) (unquote))))\n    (sep_statement)\n    (statement (assignment_str (str_name (dollar)) (op_eq_assign_str) (string (quote) (unquote))))))\n\n";
    }
    ans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LANGUAGE;
    use crate::grammar::tokens::ROM_TOKENS;

    const SAMPLE: &str = "==========
Print
==========

10 PRINT \"HI\"

---

(source_file
  (line (linenum) (statement (statement_print_str) (string (quote) (unquote)))))

==========
Bad
:error
==========

10 PRINT=1

---

";

    #[test]
    fn parse_sample() {
        let cases = parse(SAMPLE).expect("parse failed");
        assert_eq!(cases.len(),2);
        assert_eq!(cases[0].name,"Print");
        assert_eq!(cases[0].code,"10 PRINT \"HI\"\n");
        assert_eq!(cases[0].expected,"(source_file (line (linenum) (statement (statement_print_str) (string (quote) (unquote)))))");
        assert!(cases[1].expect_error);
        assert_eq!(cases[1].expected,"");
    }

    #[test]
    fn run_sample() {
        let cases = parse(SAMPLE).expect("parse failed");
        let outcomes = run(&LANGUAGE.into(),&cases).expect("run failed");
        assert!(outcomes.iter().all(|o| o.passed));
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_sexp("(a\n  (b) )\n"),"(a (b))");
        assert_eq!(normalize_sexp("( a (b)\t(c) ))"),"(a (b) (c)))");
    }

    #[test]
    fn malformed() {
        assert!(matches!(parse("==========\nX\n"),Err(Error::UnclosedHeader(1))));
        assert!(matches!(parse("==========\nX\n==========\n10 END\n"),Err(Error::MissingSeparator(_))));
        assert!(matches!(parse("==========\nX\n:skip\n==========\n10 END\n---\n"),Err(Error::UnknownAttribute(_,_))));
    }

    #[test]
    fn generated_corpora_pass() {
        let lang: Language = LANGUAGE.into();
        for text in [generate_vars_legal(&ROM_TOKENS),generate_vars_illegal()] {
            let cases = parse(&text).expect("parse failed");
            for outcome in run(&lang,&cases).expect("run failed") {
                assert!(outcome.passed,"{}: expected {} got {}",outcome.name,outcome.expected,outcome.actual);
            }
        }
    }

    #[test]
    fn shipped_corpora_are_current() {
        assert_eq!(include_str!("../test/corpus/vars-legal.txt"),generate_vars_legal(&ROM_TOKENS));
        assert_eq!(include_str!("../test/corpus/vars-illegal.txt"),generate_vars_illegal());
    }
}
