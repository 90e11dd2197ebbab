//! Integer diagnostics module.
//!
//! Checks a program one line at a time.  The first pass gathers line numbers,
//! the second pass checks references and everything else.
//! Used by the CLI, results are sorted by row as a side effect of the walk.

use std::collections::HashSet;
use std::fmt::Write;
use log::{trace,warn};
use regex::Regex;
use crate::lang::{Visit,WalkerChoice,Diagnostic,Severity,node_text,node_integer};
use crate::lang::settings::Settings;
use tree_sitter::{Language,Parser,Node,TreeCursor,Range,Point};
use crate::{LANGUAGE,STDRESULT};

const CASE_CHECK: [&str;6] = ["statement_", "fcall_", "str_name", "int_name", "op_", "com_"];
const MAX_INTEGER: i64 = 32767;

pub struct Analyzer {
    config: Settings,
    row: usize,
    offset: usize,
    pass: usize,
    line: String,
    diagnostics: Vec<Diagnostic>,
    line_numbers: HashSet<i64>,
    last_good_line_number: i64,
    err_pattern: Regex
}

impl Visit for Analyzer {
    fn visit(&mut self,curs: &TreeCursor) -> WalkerChoice {
        match self.pass {
            1 => self.visit_primaries(curs),
            _ => self.visit_node(curs)
        }
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            config: Settings::new(),
            row: 0,
            offset: 0,
            pass: 0,
            line: String::new(),
            diagnostics: Vec::new(),
            line_numbers: HashSet::new(),
            last_good_line_number: -1,
            err_pattern: Regex::new(r"^(?i) *(D *S *P|N *O *D *S *P|N *E *X *T|I *N *P *U *T) *[A-Z]").expect("regex failure")
        }
    }
    pub fn set_config(&mut self,config: Settings) {
        self.config = config;
    }
    pub fn update_config(&mut self,json_str: &str) -> STDRESULT {
        self.config = super::settings::parse(json_str)?;
        Ok(())
    }
    /// Analyze a whole program, replacing any prior diagnostics
    pub fn analyze(&mut self,program: &str) -> STDRESULT {
        self.diagnostics = Vec::new();
        self.line_numbers = HashSet::new();
        let mut parser = Parser::new();
        parser.set_language(&Language::new(LANGUAGE))?;
        for pass in 1..3 {
            self.last_good_line_number = -1;
            self.row = 0;
            self.offset = 0;
            self.pass = pass;
            for full_line in program.split_inclusive('\n') {
                let line = full_line.strip_suffix('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).unwrap_or(full_line);
                trace!("analyze row {} at byte {}",self.row,self.offset);
                if line.trim_start().len() > 0 {
                    self.line = String::from(line) + "\n";
                    match parser.parse(&self.line,None) {
                        Some(tree) => self.walk(&tree),
                        None => return Err(Box::new(crate::lang::Error::ParsingError))
                    };
                }
                self.row += 1;
                self.offset += full_line.len();
            }
        }
        Ok(())
    }
    pub fn get_diags(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }
    pub fn err_warn_info_counts(&self) -> [usize;3] {
        let mut err = 0;
        let mut warn = 0;
        let mut info = 0;
        for item in &self.diagnostics {
            match item.severity {
                Severity::Error => err += 1,
                Severity::Warning => warn += 1,
                Severity::Information => info += 1,
                _ => {}
            }
        }
        [err,warn,info]
    }
    /// Convert a range within the current line to a range within the program
    fn program_range(&self,rng: Range) -> Range {
        Range {
            start_byte: rng.start_byte + self.offset,
            end_byte: rng.end_byte + self.offset,
            start_point: Point::new(rng.start_point.row + self.row,rng.start_point.column),
            end_point: Point::new(rng.end_point.row + self.row,rng.end_point.column)
        }
    }
    fn push(&mut self,rng: Range,mess: &str,severity: Severity) {
        self.diagnostics.push(Diagnostic {
            range: self.program_range(rng),
            severity,
            message: mess.to_string()
        });
    }
    /// gathers line numbers
    fn visit_primaries(&mut self,curs: &TreeCursor) -> WalkerChoice {
        let node = curs.node();
        if node.kind() == "linenum" {
            let rng = node.range();
            if let Some(num) = node_integer::<i64>(&node,&self.line) {
                if num < 0 || num > MAX_INTEGER {
                    self.push(rng, "Out of range (0,32767)",Severity::Error);
                }
                else if num <= self.last_good_line_number {
                    self.push(rng, "Line number out of order",Severity::Error);
                }
                else {
                    self.line_numbers.insert(num);
                    self.last_good_line_number = num;
                }
            } else {
                self.push(rng, "Out of range (0,32767)",Severity::Error);
            }
            return WalkerChoice::Exit;
        }
        if node.kind() == "line" {
            return WalkerChoice::GotoChild;
        }
        return WalkerChoice::GotoSibling;
    }
    fn value_range(&mut self,node: Node, low: i64, high: i64) {
        if node.kind()=="integer" || node.kind()=="unary_aexpr" {
            match node_integer::<i64>(&node,&self.line) {
                Some(parsed) if node.kind()=="integer" && parsed > MAX_INTEGER => {},
                Some(parsed) => if parsed < low || parsed > high {
                    let mut mess = "Out of range (".to_string();
                    write!(&mut mess,"{low},{high})").expect("could not format");
                    self.push(node.range(),&mess,Severity::Error);
                },
                None if node.kind()=="unary_aexpr" => {},
                None => warn!("parsing numerical node failed {}",node_text(&node,&self.line))
            }
        }
    }
    /// Only process the ref if it is a literal integer.
    /// Always start on GOTO, GOSUB, or THEN node (no other branching possible).
    fn process_linenum_ref(&mut self,node: Node) {
        let sev = match self.config.flag.bad_references {
            Some(s) => s,
            None => return
        };
        if let Some(target) = node.next_named_sibling() {
            if target.kind() == "integer" && target.next_named_sibling().is_none() {
                if let Some(num) = node_integer::<i64>(&target,&self.line) {
                    if !self.line_numbers.contains(&num) {
                        self.push(target.range(), "Line does not exist", sev);
                    }
                }
            }
        }
    }
    fn visit_node(&mut self,curs: &TreeCursor) -> WalkerChoice {
        let node = curs.node();
        let rng = node.range();
        if let Some(sev) = self.config.flag.case_sensitive {
            let txt = node_text(&node, &self.line);
            for chk in CASE_CHECK {
                if node.kind().starts_with(chk) && txt != txt.to_uppercase() {
                    self.push(rng,"settings require upper case",sev);
                }
            }
        }
        if node.is_missing() {
            let mut mess = "something is missing".to_string();
            if let Some(p) = node.parent() {
                mess += &[" after ",&p.to_sexp()].concat();
            }
            self.push(rng, &mess, Severity::Error);
            return WalkerChoice::GotoSibling;
        }
        if node.is_error() {
            self.push(rng, &("syntax error: ".to_string() + &node.to_sexp()), Severity::Error);
            return WalkerChoice::GotoSibling;
        }
        if node.kind() == "line" {
            if self.line.trim_end().len() > self.config.warn.length as usize {
                self.push(rng, "Line may be too long", Severity::Warning);
            }
        } else if ["statement_goto", "statement_gosub", "statement_then_line"].contains(&node.kind()) {
            self.process_linenum_ref(node);
        } else if node.kind() == "integer" {
            if let Some(parsed) = node_integer::<i64>(&node,&self.line) {
                if parsed > MAX_INTEGER {
                    self.push(rng, "Out of range (0,32767)", Severity::Error);
                }
            }
        } else if node.kind() == "statement_poke" {
            if let Some(addr) = node.next_named_sibling() {
                self.value_range(addr, -32767, 32767);
                if let Some(sep) = addr.next_named_sibling() {
                    if let Some(byte) = sep.next_named_sibling() {
                        self.value_range(byte,0,255);
                    }
                }
            }
        } else if node.kind() == "fcall_peek" {
            if let Some(open) = node.next_named_sibling() {
                if let Some(addr) = open.next_named_sibling() {
                    self.value_range(addr, -32767, 32767);
                }
            }
        } else if node.kind() == "statement_coloreq" {
            if let Some(col) = node.next_named_sibling() {
                self.value_range(col, 0, 255);
            }
        } else if node.kind() == "statement_call" {
            if let Some(addr) = node.next_named_sibling() {
                self.value_range(addr, -32767, 32767);
            }
        } else if node.kind().starts_with("assignment") {
            if let (Some(child),Some(sev)) = (node.named_child(0),self.config.flag.illegal_names) {
                // the ROM rejects DSP, NODSP, NEXT, INPUT followed by a letter,
                // e.g., cannot have NEXTA=1, but can have NEXT=1 or NEXT1=1
                if child.kind() != "statement_let" && self.err_pattern.is_match(&node_text(&child, &self.line)) {
                    self.push(child.range(), "illegal variable name, try LET",sev);
                }
            }
        } else if node.kind().starts_with("com_") {
            if let Some(sev) = self.config.flag.immediate_mode {
                self.push(rng, "Immediate mode command, Apple tokenizer will reject",sev);
            }
        }
        return WalkerChoice::GotoChild;
    }
}
