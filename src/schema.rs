//! Cursor analysis response schema
//!
//! The backend answers `/api/analyze` with the ownership/lifetime decorations
//! found at the cursor. Parsing is strict about shape: a missing field, a wrong
//! type or an unknown decoration tag rejects the whole payload. Unknown extra
//! keys are ignored.
//!
//! The body is the cursor result itself, not wrapped in a `{"result": ...}`
//! envelope.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Body sent to `/api/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Full text of the source file
    pub source: String,
    /// 0-based cursor row
    pub line: u32,
    /// 0-based cursor column
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Analyzing,
    Finished,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// A local variable, identified within its enclosing function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FnLocal {
    pub id: u32,
    pub fn_id: u32,
}

/// Fields common to every decoration kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationInfo {
    pub local: FnLocal,
    pub range: Range,
    pub hover_text: String,
    pub overlapped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decoration {
    Lifetime(DecorationInfo),
    ImmBorrow(DecorationInfo),
    MutBorrow(DecorationInfo),
    Move(DecorationInfo),
    Call(DecorationInfo),
    SharedMut(DecorationInfo),
    Outlive(DecorationInfo),
}

impl Decoration {
    pub const fn info(&self) -> &DecorationInfo {
        match self {
            Self::Lifetime(info)
            | Self::ImmBorrow(info)
            | Self::MutBorrow(info)
            | Self::Move(info)
            | Self::Call(info)
            | Self::SharedMut(info)
            | Self::Outlive(info) => info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspCursorResponse {
    pub is_analyzed: bool,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub path: Option<String>,
    pub decorations: Vec<Decoration>,
}

/// Validate an untrusted JSON payload
pub fn parse(raw: &[u8]) -> Result<LspCursorResponse, SchemaError> {
    Ok(serde_json::from_slice(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINISHED: &str = r#"{
        "is_analyzed": true,
        "status": "finished",
        "path": "/work/3f1c.rs",
        "decorations": [
            {
                "type": "lifetime",
                "local": { "id": 1, "fn_id": 0 },
                "range": {
                    "start": { "line": 0, "character": 8 },
                    "end": { "line": 2, "character": 1 }
                },
                "hover_text": "lifetime of variable",
                "overlapped": false
            },
            {
                "type": "imm_borrow",
                "local": { "id": 1, "fn_id": 0 },
                "range": {
                    "start": { "line": 1, "character": 4 },
                    "end": { "line": 1, "character": 6 }
                },
                "hover_text": "immutable borrow",
                "overlapped": true
            }
        ]
    }"#;

    #[test]
    fn test_parse_finished_response() {
        let resp = parse(FINISHED.as_bytes()).unwrap();
        assert!(resp.is_analyzed);
        assert_eq!(resp.status, AnalysisStatus::Finished);
        assert_eq!(resp.path.as_deref(), Some("/work/3f1c.rs"));
        assert_eq!(resp.decorations.len(), 2);
        assert!(matches!(resp.decorations[1], Decoration::ImmBorrow(_)));
        assert!(resp.decorations[1].info().overlapped);
        assert_eq!(resp.decorations[0].info().range.end.line, 2);
    }

    #[test]
    fn test_path_is_optional_and_extra_keys_are_ignored() {
        let raw = r#"{"is_analyzed":false,"status":"analyzing","decorations":[],"extra":1}"#;
        let resp = parse(raw.as_bytes()).unwrap();
        assert_eq!(resp.status, AnalysisStatus::Analyzing);
        assert!(resp.path.is_none());
    }

    #[test]
    fn test_rejects_unrelated_object() {
        assert!(parse(br#"{"unexpected": true}"#).is_err());
    }

    #[test]
    fn test_rejects_missing_field() {
        let raw = r#"{"is_analyzed":true,"status":"finished"}"#;
        assert!(parse(raw.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_wrong_type() {
        let raw = r#"{"is_analyzed":"yes","status":"finished","decorations":[]}"#;
        assert!(parse(raw.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_unknown_status_and_tag() {
        let raw = r#"{"is_analyzed":true,"status":"done","decorations":[]}"#;
        assert!(parse(raw.as_bytes()).is_err());

        let raw = r#"{"is_analyzed":true,"status":"finished","decorations":[
            {"type":"teleport","local":{"id":1,"fn_id":0},
             "range":{"start":{"line":0,"character":0},"end":{"line":0,"character":1}},
             "hover_text":"","overlapped":false}]}"#;
        assert!(parse(raw.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_negative_position() {
        let raw = r#"{"is_analyzed":true,"status":"finished","decorations":[
            {"type":"move","local":{"id":1,"fn_id":0},
             "range":{"start":{"line":-1,"character":0},"end":{"line":0,"character":1}},
             "hover_text":"","overlapped":false}]}"#;
        assert!(parse(raw.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_result_envelope() {
        let raw = format!(r#"{{"result": {FINISHED}}}"#);
        assert!(parse(raw.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(parse(b"<html>502 Bad Gateway</html>").is_err());
    }
}
