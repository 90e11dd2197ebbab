//! # `integerbasic` main library
//!
//! This library provides a tree-sitter grammar for Apple II Integer BASIC, along with the
//! tooling that is built around it.
//!
//! ## Architecture
//!
//! * `grammar.js` is compiled to `src/parser.c`, which `build.rs` links into the crate
//! * `grammar` holds the ROM token table that the token rules follow
//! * `highlight` produces the highlight query and classifies nodes for editors
//! * `corpus` runs and generates tree-sitter style corpus tests
//! * `lang` handles tokenization, detokenization, and diagnostics
//! * `commands` runs the subcommands of the `integerbasic` binary
//!
//! ## Loading the grammar
//!
//! ```
//! let mut parser = tree_sitter::Parser::new();
//! parser.set_language(&integerbasic::LANGUAGE.into()).expect("Error loading Integer BASIC grammar");
//! let tree = parser.parse("10 PRINT \"HELLO\"\n",None).expect("parse failed");
//! assert!(!tree.root_node().has_error());
//! ```
//!
//! Syntax trees are verbose by design: every token maps to a unique named node, so that
//! tokenizing a program is a matter of looking up node kinds.

pub mod grammar;
pub mod highlight;
pub mod corpus;
pub mod lang;
pub mod commands;

use regex::Regex;
use tree_sitter_language::LanguageFn;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

unsafe extern "C" {
    fn tree_sitter_integerbasic() -> *const ();
}

/// The tree-sitter [`LanguageFn`] for Integer BASIC, lower case keywords and variables are accepted
pub const LANGUAGE: LanguageFn = unsafe { LanguageFn::from_raw(tree_sitter_integerbasic) };

/// The content of the generated `node-types.json`
pub const NODE_TYPES: &str = include_str!("node-types.json");

/// The syntax highlighting query
pub const HIGHLIGHTS_QUERY: &str = include_str!("../queries/highlights.scm");

/// Display binary to stdout in columns of hex, +ascii, and -ascii
pub fn display_block(start_addr: u16,block: &[u8]) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr as usize + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        let neg_txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x>=160 && x<255 => x - 128,
            _ => 46
        }).collect();
        print!("{:04X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        print!("|+| {} ",String::from_utf8_lossy(&txt));
        for _blank in slice_end..slice_start+16 {
            print!(" ");
        }
        println!("|-| {}",String::from_utf8_lossy(&neg_txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}

/// Interpret a UTF8 string as pure ascii and put into bytes.
/// Non-ascii characters are omitted from the result, but arbitrary
/// bytes can be introduced using escapes, e.g., `\xff`.
/// Literal hex escapes are created by repeating, e.g., `\x5CxFF`.
/// If `inverted`, the positive ASCII is inverted (escaped bytes are taken as is).
/// If `caps`, lower case letters are capitalized (escaped bytes are taken as is).
pub fn parse_escaped_ascii(s: &str,inverted: bool,caps: bool) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    let hex_patt = Regex::new(r"\\x[0-9A-Fa-f][0-9A-Fa-f]").expect("unreachable");
    let mut hexes = hex_patt.find_iter(s);
    let mut maybe_hex = hexes.next();
    let mut curs = 0;
    let mut skip = 0;
    for c in s.chars() {
        if skip>0 {
            skip -= 1;
            curs += c.len_utf8();
            continue;
        }
        if let Some(m) = maybe_hex {
            if curs==m.start() {
                if let Ok(mut bytes) = hex::decode(&s[curs+2..curs+4]) {
                    ans.append(&mut bytes);
                }
                curs += 1;
                maybe_hex = hexes.next();
                skip = 3;
                continue;
            }
        }
        if c.is_ascii() {
            let b = match caps {
                true => c.to_ascii_uppercase() as u8,
                false => c as u8
            };
            ans.push(b + match inverted { true => 128, false => 0 });
        }
        curs += c.len_utf8();
    }
    return ans;
}
