//! # Grammar artifacts
//!
//! The grammar itself lives in `grammar.js`, and `tree-sitter generate` turns it into
//! `src/parser.c` and `src/node-types.json`.  This module holds the ROM token table that
//! the token rules follow, and serializes the JSON artifacts for the command line.

pub mod tokens;

use serde::Serialize;
use tokens::ROM_TOKENS;

/// The generated node types, reformatted with the given indentation, or minified if `None`
pub fn node_types_json(indent: Option<u16>) -> Result<String,serde_json::Error> {
    let val: serde_json::Value = serde_json::from_str(crate::NODE_TYPES)?;
    to_json(&val,indent)
}

/// JSON array of the ROM tokens, omitting fields that are absent
pub fn token_list_json(indent: Option<u16>) -> Result<String,serde_json::Error> {
    to_json(&ROM_TOKENS[..],indent)
}

/// Serialize with the given indentation, or minify if `None`
fn to_json<T: Serialize + ?Sized>(val: &T,indent: Option<u16>) -> Result<String,serde_json::Error> {
    let spaces = match indent {
        Some(n) => n as usize,
        None => return serde_json::to_string(val)
    };
    let pad = " ".repeat(spaces);
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf,fmt);
    val.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Language;
    use crate::LANGUAGE;

    #[test]
    fn every_rule_id_is_a_node_kind() {
        let lang: Language = LANGUAGE.into();
        for tok in ROM_TOKENS.iter() {
            if let Some(rule) = tok.rule_id {
                assert_ne!(lang.id_for_node_kind(rule,true),0,"{} is not in the grammar",rule);
            }
        }
    }

    #[test]
    fn node_types() {
        let json = node_types_json(Some(2)).expect("serialization failed");
        let val: serde_json::Value = serde_json::from_str(&json).expect("bad json");
        let arr = val.as_array().expect("not an array");
        let kinds: Vec<&str> = arr.iter().filter_map(|v| v["type"].as_str()).collect();
        assert!(kinds.contains(&"source_file"));
        assert!(kinds.contains(&"sep_print_str"));
        assert!(kinds.contains(&"op_error"));
        assert!(json.contains("\n  {"));
        let minified = node_types_json(None).expect("serialization failed");
        assert!(!minified.contains('\n'));
    }

    #[test]
    fn token_list() {
        let json = token_list_json(Some(2)).expect("serialization failed");
        let val: serde_json::Value = serde_json::from_str(&json).expect("bad json");
        assert_eq!(val[0x45]["rule id"],"sep_print_str");
        assert_eq!(val[0x45]["lexeme"],";");
        assert_eq!(val[0x2d]["enclosing rule"],"int_array");
        assert!(val[0x01].get("lexeme").is_none());
    }
}
