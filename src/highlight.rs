//! # Highlighting
//!
//! The highlight query is generated from the ROM token table, and shipped as
//! `queries/highlights.scm`.  For clients that do not run queries, `captures`
//! classifies the nodes of a tree using the same rules.

use std::collections::HashMap;
use tree_sitter::{Tree,Node,Range};
use crate::grammar::tokens::{RomToken,ROM_TOKENS};

/// Capture name for a ROM token, if any
pub fn token_capture(tok: &RomToken) -> Option<&'static str> {
    let rule = tok.rule_id?;
    if rule.starts_with("op_") {
        return Some("operator");
    }
    if rule.starts_with("sep_") {
        return Some("punctuation.delimiter");
    }
    if rule.starts_with("statement_") || rule.starts_with("com_") {
        return Some("keyword.builtin");
    }
    if rule.starts_with("fcall_") {
        return Some("function.builtin");
    }
    None
}

/// Generate the text of `highlights.scm`
pub fn generate(tokens: &[RomToken]) -> String {
    let mut ans = String::new();
    ans += "(linenum) @tag\n";
    ans += "(op_error) @operator\n";
    ans += "(statement (statement_gosub) (integer) @tag)\n";
    ans += "(statement (statement_goto) (integer) @tag)\n";
    ans += "(comment_text) @comment\n";
    ans += "(string) @string\n";
    ans += "(integer) @number\n";
    ans += "(str_name) @variable\n";
    ans += "(int_name) @variable\n";
    for tok in tokens {
        if let (Some(rule),Some(cap)) = (tok.rule_id,token_capture(tok)) {
            ans += &format!("({}) @{}\n",rule,cap);
        }
    }
    ans
}

/// Assigns captures to nodes
pub struct Highlighter {
    token_map: HashMap<&'static str,&'static str>
}

impl Highlighter {
    pub fn new(tokens: &[RomToken]) -> Self {
        let mut token_map = HashMap::new();
        for tok in tokens {
            if let (Some(rule),Some(cap)) = (tok.rule_id,token_capture(tok)) {
                token_map.insert(rule,cap);
            }
        }
        Self { token_map }
    }
    fn is_branch_target(node: &Node) -> bool {
        let mut prev = node.prev_sibling();
        while let Some(sib) = prev {
            if sib.kind()=="statement_gosub" || sib.kind()=="statement_goto" {
                return true;
            }
            prev = sib.prev_sibling();
        }
        false
    }
    /// Capture for one node, patterns earlier in the query take precedence
    pub fn capture(&self,node: &Node) -> Option<&'static str> {
        match node.kind() {
            "linenum" => Some("tag"),
            "op_error" => Some("operator"),
            "integer" if Self::is_branch_target(node) => Some("tag"),
            "comment_text" => Some("comment"),
            "string" => Some("string"),
            "integer" => Some("number"),
            "str_name" | "int_name" => Some("variable"),
            k => self.token_map.get(k).copied()
        }
    }
    /// Captures of the whole tree in document order.
    /// Children of a captured node are not visited.
    pub fn captures(&self,tree: &Tree) -> Vec<(Range,&'static str)> {
        let mut ans = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.is_missing() {
                continue;
            }
            if let Some(cap) = self.capture(&node) {
                ans.push((node.range(),cap));
                continue;
            }
            let mut curs = node.walk();
            let mut children: Vec<Node> = node.children(&mut curs).collect();
            children.reverse();
            stack.append(&mut children);
        }
        ans
    }
}

/// Captures of the whole tree
pub fn captures(tree: &Tree) -> Vec<(Range,&'static str)> {
    Highlighter::new(&ROM_TOKENS).captures(tree)
}
