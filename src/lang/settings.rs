//! Parse settings string sent by any client.
//!
//! The tools check for specific keys that may affect their operation.
//! These are then used by the various modules to set their own flags.
//! Unknown keys are ignored, as are values of the wrong type.

use serde_json;
use crate::DYNERR;
use super::{update_json_i64,update_json_vec,update_json_severity,Severity};

#[derive(Clone,Debug)]
pub struct Flag {
    pub case_sensitive: Option<Severity>,
    pub immediate_mode: Option<Severity>,
    pub illegal_names: Option<Severity>,
    pub bad_references: Option<Severity>
}
#[derive(Clone,Debug)]
pub struct Warn {
    pub length: i64
}
#[derive(Clone,Debug)]
pub struct Detokenizer {
    pub escapes: Vec<i64>,
    pub max_lines: i64,
    pub max_line_length: i64
}
#[derive(Clone,Debug)]
pub struct Settings {
    pub flag: Flag,
    pub warn: Warn,
    pub detokenizer: Detokenizer
}

impl Settings {
    pub fn new() -> Self {
        Self {
            flag : Flag {
                case_sensitive: None,
                immediate_mode: Some(Severity::Error),
                illegal_names: Some(Severity::Error),
                bad_references: Some(Severity::Error)
            },
            warn : Warn {
                length: 150
            },
            detokenizer : Detokenizer {
                escapes: vec![138,141],
                max_lines: 5000,
                max_line_length: 255
            }
        }
    }
    /// Escapes that fit in a byte, others are dropped
    pub fn escape_bytes(&self) -> Vec<u8> {
        self.detokenizer.escapes.iter().filter_map(|x| u8::try_from(*x).ok()).collect()
    }
}

pub fn parse(json: &str) -> Result<Settings,DYNERR> {
    let mut ans = Settings::new();
    let root = serde_json::from_str::<serde_json::Value>(json)?;
    if let Some(obj) = root.as_object() {
        for (key,val) in obj {
            match key.as_str() {
                "flag" => {
                    update_json_severity(val,"caseSensitive",&mut ans.flag.case_sensitive);
                    update_json_severity(val,"immediateMode",&mut ans.flag.immediate_mode);
                    update_json_severity(val,"illegalNames",&mut ans.flag.illegal_names);
                    update_json_severity(val,"badReferences",&mut ans.flag.bad_references);
                },
                "warn" => {
                    update_json_i64(val,"length",&mut ans.warn.length);
                },
                "detokenizer" => {
                    update_json_i64(val, "maxLineLength", &mut ans.detokenizer.max_line_length);
                    update_json_i64(val,"maxLines",&mut ans.detokenizer.max_lines);
                    update_json_vec(val,"escapes",&mut ans.detokenizer.escapes);
                },
                _ => {}
            }
        }
    }
    Ok(ans)
}
