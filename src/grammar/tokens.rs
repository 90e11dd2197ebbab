//! # ROM token table
//!
//! Integer BASIC stores programs as a stream of one-byte tokens.  The same lexeme can map
//! to several codes depending on context, e.g., there are six flavors of `,` and three
//! flavors of `PRINT`.  Each code that the parser can produce is given a unique rule id,
//! which is also the kind of the leaf node in the syntax tree.  This makes tokenization
//! a simple lookup.
//!
//! Codes without a rule id are kept so that detokenization can still name them.

use serde::Serialize;

/// Number of codes in the ROM table, `0x00..=0x7f`
pub const ROM_TOKEN_COUNT: usize = 128;

/// One entry of the ROM token table
#[derive(Clone,Copy,Debug,PartialEq,Serialize)]
pub struct RomToken {
    pub code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexeme: Option<&'static str>,
    #[serde(rename = "rule id", skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<&'static str>,
    #[serde(rename = "enclosing rule", skip_serializing_if = "Option::is_none")]
    pub enclosing_rule: Option<&'static str>
}

const fn tok(code: u8,lexeme: &'static str,rule_id: &'static str,enclosing_rule: &'static str) -> RomToken {
    RomToken { code, lexeme: Some(lexeme), rule_id: Some(rule_id), enclosing_rule: Some(enclosing_rule) }
}

const fn lex(code: u8,lexeme: &'static str) -> RomToken {
    RomToken { code, lexeme: Some(lexeme), rule_id: None, enclosing_rule: None }
}

const fn unused(code: u8) -> RomToken {
    RomToken { code, lexeme: None, rule_id: None, enclosing_rule: None }
}

/// The ROM tokens, indexed by code.
/// References: Apple II Reference Manual (1978), Apple Programmer's Handbook (1984).
pub static ROM_TOKENS: [RomToken;ROM_TOKEN_COUNT] = [
    unused(0x00),
    unused(0x01), // end of line
    unused(0x02),
    tok(0x03,":","sep_statement","line"),
    tok(0x04,"LOAD","com_load","command"),
    tok(0x05,"SAVE","com_save","command"),
    tok(0x06,"CON","com_con","command"),
    tok(0x07,"RUN","com_run_line","command.run"),
    tok(0x08,"RUN","com_run","command"),
    tok(0x09,"DEL","com_del","command"),
    tok(0x0a,",","sep_del","command.del"),
    tok(0x0b,"NEW","com_new","command"),
    tok(0x0c,"CLR","com_clr","command"),
    tok(0x0d,"AUTO","com_auto","command"),
    tok(0x0e,",","sep_auto","command.auto"),
    tok(0x0f,"MAN","com_man","command"),
    tok(0x10,"HIMEM:","com_himem","command"),
    tok(0x11,"LOMEM:","com_lomem","command"),
    tok(0x12,"+","op_plus","binary_aexpr"),
    tok(0x13,"-","op_minus","binary_aexpr"),
    tok(0x14,"*","op_times","binary_aexpr"),
    tok(0x15,"/","op_div","binary_aexpr"),
    tok(0x16,"=","op_aeq","binary_aexpr"),
    tok(0x17,"#","op_aneq","binary_aexpr"),
    tok(0x18,">=","op_gtreq","binary_aexpr"),
    tok(0x19,">","op_gtr","binary_aexpr"),
    tok(0x1a,"<=","op_lesseq","binary_aexpr"),
    tok(0x1b,"<>","op_neq","binary_aexpr"),
    tok(0x1c,"<","op_less","binary_aexpr"),
    tok(0x1d,"AND","op_and","binary_aexpr"),
    tok(0x1e,"OR","op_or","binary_aexpr"),
    tok(0x1f,"MOD","op_mod","binary_aexpr"),
    tok(0x20,"^","op_pow","binary_aexpr"),
    lex(0x21,"+"),
    tok(0x22,"(","open_dim_str","statement.dim"),
    tok(0x23,",","sep_slice","str_slice"),
    tok(0x24,"THEN","statement_then_line","statement.if"),
    tok(0x25,"THEN","statement_then","statement.if"),
    tok(0x26,",","sep_input_str","statement.input"),
    tok(0x27,",","sep_input_int","statement.input"),
    tok(0x28,"\"","quote","string"),
    tok(0x29,"\"","unquote","string"),
    tok(0x2a,"(","open_slice","str_slice"),
    lex(0x2b,"!"),
    lex(0x2c,"!"),
    tok(0x2d,"(","open_int","int_array"),
    tok(0x2e,"PEEK","fcall_peek","fcall"),
    tok(0x2f,"RND","fcall_rnd","fcall"),
    tok(0x30,"SGN","fcall_sgn","fcall"),
    tok(0x31,"ABS","fcall_abs","fcall"),
    tok(0x32,"PDL","fcall_pdl","fcall"),
    lex(0x33,"RNDX"),
    tok(0x34,"(","open_dim_int","statement.dim"),
    tok(0x35,"+","op_unary_plus","unary_aexpr"),
    tok(0x36,"-","op_unary_minus","unary_aexpr"),
    tok(0x37,"NOT","op_not","unary_aexpr"),
    tok(0x38,"(","open_aexpr","aexpr"),
    tok(0x39,"=","op_seq","binary_aexpr"),
    tok(0x3a,"#","op_sneq","binary_aexpr"),
    tok(0x3b,"LEN(","fcall_lenp","fcall"),
    tok(0x3c,"ASC(","fcall_ascp","fcall"),
    tok(0x3d,"SCRN(","fcall_scrnp","fcall"),
    tok(0x3e,",","sep_scrn","fcall"),
    tok(0x3f,"(","open_fcall","fcall"),
    tok(0x40,"$","dollar","str_name"),
    lex(0x41,"$"),
    tok(0x42,"(","open_str","str_array"),
    tok(0x43,",","sep_dim_str","statement.dim"),
    tok(0x44,",","sep_dim_int","statement.dim"),
    tok(0x45,";","sep_print_str","statement.print"),
    tok(0x46,";","sep_print_int","statement.print"),
    tok(0x47,";","sep_print_null","statement.print"),
    tok(0x48,",","sep_tab_str","statement.print"),
    tok(0x49,",","sep_tab_int","statement.print"),
    tok(0x4a,",","sep_tab_null","statement.print"),
    tok(0x4b,"TEXT","statement_text","statement"),
    tok(0x4c,"GR","statement_gr","statement"),
    tok(0x4d,"CALL","statement_call","statement"),
    tok(0x4e,"DIM","statement_dim_str","statement"),
    tok(0x4f,"DIM","statement_dim_int","statement"),
    tok(0x50,"TAB","statement_tab","statement"),
    tok(0x51,"END","statement_end","statement"),
    tok(0x52,"INPUT","statement_input_str","statement"),
    tok(0x53,"INPUT","statement_input_prompt","statement"),
    tok(0x54,"INPUT","statement_input_int","statement"),
    tok(0x55,"FOR","statement_for","statement"),
    tok(0x56,"=","op_eq_for","statement.for"),
    tok(0x57,"TO","op_to","statement.for"),
    tok(0x58,"STEP","op_step","statement.for"),
    tok(0x59,"NEXT","statement_next","statement"),
    tok(0x5a,",","sep_next","statement.next"),
    tok(0x5b,"RETURN","statement_return","statement"),
    tok(0x5c,"GOSUB","statement_gosub","statement"),
    tok(0x5d,"REM","statement_rem","statement"),
    tok(0x5e,"LET","statement_let","assignment"),
    tok(0x5f,"GOTO","statement_goto","statement"),
    tok(0x60,"IF","statement_if","statement"),
    tok(0x61,"PRINT","statement_print_str","statement"),
    tok(0x62,"PRINT","statement_print_int","statement"),
    tok(0x63,"PRINT","statement_print_null","statement"),
    tok(0x64,"POKE","statement_poke","statement"),
    tok(0x65,",","sep_poke","statement.poke"),
    tok(0x66,"COLOR=","statement_coloreq","statement"),
    tok(0x67,"PLOT","statement_plot","statement"),
    tok(0x68,",","sep_plot","statement.plot"),
    tok(0x69,"HLIN","statement_hlin","statement"),
    tok(0x6a,",","sep_hlin","statement.hlin"),
    tok(0x6b,"AT","op_hlin_at","statement.hlin"),
    tok(0x6c,"VLIN","statement_vlin","statement"),
    tok(0x6d,",","sep_vlin","statement.vlin"),
    tok(0x6e,"AT","op_vlin_at","statement.vlin"),
    tok(0x6f,"VTAB","statement_vtab","statement"),
    tok(0x70,"=","op_eq_assign_str","assignment_str"),
    tok(0x71,"=","op_eq_assign_int","assignment_int"),
    tok(0x72,")","close","aexpr"),
    lex(0x73,")"),
    tok(0x74,"LIST","statement_list_line","statement"),
    tok(0x75,",","sep_list","statement.list"),
    tok(0x76,"LIST","statement_list","statement"),
    tok(0x77,"POP","statement_pop","statement"),
    tok(0x78,"NODSP","statement_nodsp_str","statement"),
    tok(0x79,"NODSP","statement_nodsp_int","statement"),
    tok(0x7a,"NOTRACE","statement_notrace","statement"),
    tok(0x7b,"DSP","statement_dsp_str","statement"),
    tok(0x7c,"DSP","statement_dsp_int","statement"),
    tok(0x7d,"TRACE","statement_trace","statement"),
    tok(0x7e,"PR#","statement_prn","statement"),
    tok(0x7f,"IN#","statement_inn","statement")
];

// Variable naming rules, as observed on Virtual ][.  Lexemes are lower case here.

/// Assigning the variable is a syntax error
pub const ILLEGAL_VAR: [&str;12] = ["auto","end","for","goto","gr","list","notrace","pop","print","return","text","trace"];
/// Assigning the variable with a leading Z is a syntax error
pub const ILLEGAL_VAR_END: [&str;10] = ["auto","and","at","for","goto","mod","or","step","then","to"];
/// Assigning the variable with a trailing letter is a syntax error
pub const ILLEGAL_VAR_POSTALPHA: [&str;14] = ["auto","dsp","end","for","gr","input","list","next","nodsp","notrace","pop","return","text","trace"];
/// Assigning the variable with a trailing number is a syntax error
pub const ILLEGAL_VAR_POSTNUM: [&str;10] = ["auto","end","for","gr","list","notrace","pop","return","text","trace"];
/// Added to `ILLEGAL_VAR_POSTNUM` for string variables
pub const ILLEGAL_STR_POSTNUM_EXTRA: [&str;3] = ["auto","goto","print"];

/// Set difference of two word lists, kept in the order of `a`
pub fn difference<'a>(a: &[&'a str],b: &[&str]) -> Vec<&'a str> {
    a.iter().filter(|x| !b.contains(x)).map(|x| *x).collect()
}

/// Lexemes of `illegal_var_postalpha` that parse as assignments anyway, e.g., `DSPA=1`.
/// The ROM rejects these, so downstream checks have to look for them.
pub fn illegal_var_postalpha_only() -> Vec<&'static str> {
    difference(&ILLEGAL_VAR_POSTALPHA,&ILLEGAL_VAR_POSTNUM)
}

/// Union of `ILLEGAL_VAR_POSTNUM` and the string extras
pub fn illegal_str_postnum() -> Vec<&'static str> {
    let mut ans = ILLEGAL_VAR_POSTNUM.to_vec();
    for extra in ILLEGAL_STR_POSTNUM_EXTRA {
        if !ans.contains(&extra) {
            ans.push(extra);
        }
    }
    ans
}

/// Lower case lexemes that are purely alphabetic and have a rule id, sorted and deduplicated
pub fn alpha_lexemes(tokens: &[RomToken]) -> Vec<String> {
    let mut ans: Vec<String> = tokens.iter()
        .filter(|t| t.rule_id.is_some())
        .filter_map(|t| t.lexeme)
        .filter(|lx| lx.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|lx| lx.to_lowercase())
        .collect();
    ans.sort();
    ans.dedup();
    ans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_in_order() {
        for (i,t) in ROM_TOKENS.iter().enumerate() {
            assert_eq!(t.code as usize,i);
        }
    }

    #[test]
    fn postalpha_only() {
        assert_eq!(illegal_var_postalpha_only(),vec!["dsp","input","next","nodsp"]);
    }

    #[test]
    fn alpha_lexemes_exclude_unruled() {
        let alpha = alpha_lexemes(&ROM_TOKENS);
        assert!(alpha.contains(&"print".to_string()));
        assert!(alpha.contains(&"at".to_string()));
        assert!(!alpha.contains(&"rndx".to_string()));
        assert!(!alpha.contains(&"color=".to_string()));
    }
}
