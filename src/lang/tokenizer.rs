//! Module containing the Integer BASIC tokenizer
//!
//! Every leaf of the syntax tree names its ROM token, so tokenizing is mostly a lookup.
//! Numbers, names, strings, and comments are encoded separately.

use std::collections::HashMap;
use log::{debug,error};
use crate::lang;
use crate::lang::{Visit,WalkerChoice};
use crate::lang::settings::Settings;
use tree_sitter::{Language,Parser,Node,TreeCursor};
use crate::grammar::tokens::ROM_TOKENS;
use crate::{LANGUAGE,STDRESULT,DYNERR};

const OPEN_QUOTE: u8 = 0x28;
const CLOSE_QUOTE: u8 = 0x29;
const REM_TOK: u8 = 0x5d;
const EOL: u8 = 0x01;
const MAX_TOKENS_PER_LINE: usize = 126;

/// Handles tokenization of Integer BASIC
pub struct Tokenizer
{
    line: String,
    tokenized_program: Vec<u8>,
    tokenized_line: Vec<u8>,
    tok_map: HashMap<&'static str,u8>,
    detok_map: HashMap<u8,&'static str>,
    lang: Language,
    config: Settings,
    err: Option<lang::Error>
}

impl Visit for Tokenizer
{
    fn visit(&mut self,curs: &TreeCursor) -> WalkerChoice
    {
        let node = curs.node();
        // Numbers to binary
        if node.kind()=="linenum" || node.kind()=="integer" {
            let cleaned = self.text(&node).replace(" ","");
            if let Ok(num) = u16::from_str_radix(&cleaned,10) {
                let bytes = u16::to_le_bytes(num);
                // line number arguments of LIST, RUN, etc. are stored like integers
                if node.kind()=="integer" || !Self::is_line_label(&node) {
                    self.tokenized_line.push(cleaned.as_bytes()[0]+128);
                }
                self.tokenized_line.push(bytes[0]);
                self.tokenized_line.push(bytes[1]);
                return WalkerChoice::GotoSibling;
            }
            error!("number is out of range: {}",cleaned);
            self.err = Some(match node.kind() {
                "linenum" if Self::is_line_label(&node) => lang::Error::LineNumber,
                _ => lang::Error::Tokenization
            });
            return WalkerChoice::Exit;
        }
        // Positive ASCII tokens
        if let Some(tok) = self.tok_map.get(node.kind()) {
            self.tokenized_line.push(*tok);
            return WalkerChoice::GotoSibling;
        }
        // Variables to upper case and negative ASCII
        if node.kind()=="str_name" || node.kind()=="int_name" {
            let cleaned = self.text(&node).to_uppercase().replace(" ","").as_bytes().to_vec();
            let mut neg = cleaned.iter().map(|b| {
                if *b==b'$' {
                    0x40 // tokenize $
                } else {
                    b+128
                }
            }).collect();
            self.tokenized_line.append(&mut neg);
            return WalkerChoice::GotoSibling;
        }
        // Strings including tokenized quotes and escapes
        if node.kind()=="string" {
            let mut neg: Vec<u8> = vec![OPEN_QUOTE];
            let txt = Self::stringlike_node_to_bytes(&self.text(&node));
            if txt.len() >= 2 {
                neg.append(&mut txt[1..txt.len()-1].to_vec());
            }
            neg.push(CLOSE_QUOTE);
            self.tokenized_line.append(&mut neg);
            return WalkerChoice::GotoSibling;
        }
        // Comment text with escapes
        if node.kind()=="comment_text" {
            let mut neg = Self::stringlike_node_to_bytes(&self.text(&node));
            self.tokenized_line.append(&mut neg);
            return WalkerChoice::GotoSibling;
        }
        if node.child_count()==0 {
            error!("no token for {}",node.kind());
            self.err = Some(lang::Error::Tokenization);
            return WalkerChoice::Exit;
        }
        return WalkerChoice::GotoChild;
    }
}

impl Tokenizer
{
    /// Create a new `Tokenizer` with default settings
    pub fn new() -> Self
    {
        Self::with_settings(Settings::new())
    }
    /// Create a new `Tokenizer`, the settings affect detokenization
    pub fn with_settings(config: Settings) -> Self {
        let lang = Language::new(LANGUAGE);
        let mut tok_map = HashMap::new();
        let mut detok_map = HashMap::new();
        for tok in ROM_TOKENS.iter() {
            if let Some(rule) = tok.rule_id {
                tok_map.insert(rule,tok.code);
            }
            if let Some(lexeme) = tok.lexeme {
                detok_map.insert(tok.code,lexeme);
            }
        }
        Self {
            line: String::new(),
            tokenized_line: Vec::<u8>::new(),
            tokenized_program: Vec::<u8>::new(),
            tok_map,
            detok_map,
            lang,
            config,
            err: None
        }
    }
    pub fn set_config(&mut self,config: Settings) {
        self.config = config;
    }
    fn text(&self,node: &Node) -> String {
        lang::node_text(node,&self.line)
    }
    fn is_line_label(node: &Node) -> bool {
        match node.parent() {
            Some(p) => p.kind()=="line",
            None => false
        }
    }
    /// will invert and capitalize
    fn stringlike_node_to_bytes(txt: &str) -> Vec<u8> {
        return crate::parse_escaped_ascii(txt, true, true);
    }
    fn tokenize_line(&mut self,parser: &mut Parser) -> STDRESULT {
        self.tokenized_line = Vec::new();
        self.err = None;
        let tree = match parser.parse(&self.line,None) {
            Some(t) => t,
            None => return Err(Box::new(lang::Error::ParsingError))
        };
        if tree.root_node().has_error() {
            error!("syntax error: {}",self.line.trim_end());
            debug!("{}",tree.root_node().to_sexp());
            return Err(Box::new(lang::Error::Syntax));
        }
        self.walk(&tree);
        if let Some(e) = self.err.take() {
            return Err(Box::new(e));
        }
        if self.tokenized_line.len()>MAX_TOKENS_PER_LINE {
            error!("integer BASIC line too long");
            return Err(Box::new(lang::Error::Syntax));
        }
        self.tokenized_line.insert(0,self.tokenized_line.len() as u8 +2);
        self.tokenized_line.push(EOL);
        Ok(())
    }
    /// Tokenize a program contained in a UTF8 string, result is an array of bytes
    pub fn tokenize(&mut self,program: &str) -> Result<Vec<u8>,DYNERR> {
        self.tokenized_program = Vec::new();
        let mut parser = Parser::new();
        parser.set_language(&self.lang)?;
        for line in program.lines() {
            if line.trim().len()==0 {
                continue;
            }
            self.line = String::from(line) + "\n";
            self.tokenize_line(&mut parser)?;
            self.tokenized_program.append(&mut self.tokenized_line);
        }
        Ok(self.tokenized_program.clone())
    }
    /// Detokenize from byte array into a UTF8 string
    pub fn detokenize(&self,img: &[u8]) -> Result<String,DYNERR> {
        let escapes = self.config.escape_bytes();
        let max_line_length = self.config.detokenizer.max_line_length.max(1) as usize;
        let mut line_count = 0;
        let mut addr = 0;
        let mut code = String::new();
        while addr < 65536 && addr+2<img.len() {
            line_count += 1;
            if line_count as i64 > self.config.detokenizer.max_lines {
                error!("program exceeds {} lines",self.config.detokenizer.max_lines);
                return Err(Box::new(lang::Error::Detokenization));
            }
            addr += 1; //skip record length
            let line_num: u16 = img[addr] as u16 + img[addr+1] as u16*256;
            code += &(u16::to_string(&line_num) + " ");
            addr += 2;
            let mut escaped: String;
            for rep in 0..max_line_length+1 {
                if rep==max_line_length {
                    error!("integer BASIC line is too long");
                    return Err(Box::new(lang::Error::Syntax));
                }
                if addr >= img.len() {
                    error!("program ended while processing line");
                    return Err(Box::new(lang::Error::Detokenization));
                }
                if img[addr]==EOL {
                    code += "\n";
                    addr += 1;
                    break;
                } else if img[addr] == OPEN_QUOTE {
                    code += "\"";
                    (escaped,addr) = lang::bytes_to_escaped_string(img, addr+1, &[CLOSE_QUOTE,EOL], &escapes);
                    code += &escaped;
                    if addr < img.len() && img[addr] == CLOSE_QUOTE {
                        code += "\"";
                        addr += 1;
                    }
                } else if img[addr] == REM_TOK {
                    if !code.ends_with(" ") {
                        code += " ";
                    }
                    code += "REM";
                    (escaped,addr) = lang::bytes_to_escaped_string(img, addr+1, &[EOL], &escapes);
                    code += &escaped;
                } else if img[addr]<128 {
                    if let Some(tok) = self.detok_map.get(&img[addr]) {
                        if tok.len()>1 && *tok!="<>" && !code.ends_with(" ") {
                            code += " ";
                        }
                        code += *tok;
                        if tok.len()>1 && *tok!="<>" && !tok.ends_with("(") && !tok.ends_with("=") {
                            code += " ";
                        }
                        addr += 1;
                    } else {
                        error!("unrecognized integer BASIC token encountered: {:02X}",img[addr]);
                        return Err(Box::new(lang::Error::Syntax));
                    }
                } else if img[addr]>=0xb0 && img[addr]<=0xb9 {
                    // next 2 bytes are a binary number
                    if addr+2 >= img.len() {
                        error!("program ended while processing integer");
                        return Err(Box::new(lang::Error::Detokenization));
                    }
                    code += &u16::to_string(&u16::from_le_bytes([img[addr+1],img[addr+2]]));
                    addr += 3;
                } else {
                    // this is a variable name
                    while img[addr]>=128 {
                        code.push(char::from(img[addr]-128));
                        addr += 1;
                        if addr >= img.len() {
                            error!("program ended while processing variable name");
                            return Err(Box::new(lang::Error::Detokenization));
                        }
                    }
                }
            }
        }
        return Ok(code);
    }
}
