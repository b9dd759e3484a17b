//! Recover the candidate array from raw model output.
//!
//! Models wrap JSON in reasoning, markdown fences or prose. The payload is taken to be
//! everything from the first `[` to the last `]`.

use crate::domain::{CandidateResult, ParseFailure};
use serde_json::Value;
use tracing::{debug, warn};

/// Locate the JSON array in `raw`: first `[` through last `]`, inclusive.
pub fn locate_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (start < end).then(|| &raw[start..=end])
}

/// Parse raw model output into candidate results.
///
/// Fails only when no array can be located or the slice is not valid JSON; the failure
/// carries `raw` unchanged. Elements are decoded one by one, so a malformed element
/// becomes an error record instead of failing the batch.
pub fn parse_candidates(raw: &str) -> Result<Vec<CandidateResult>, ParseFailure> {
    let Some(json) = locate_json_array(raw) else {
        warn!(raw_len = raw.len(), "no JSON array in model output");
        return Err(ParseFailure {
            reason: "no JSON array found in model output".to_string(),
            raw: raw.to_string(),
        });
    };

    let items: Vec<Value> = serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, json = %json.chars().take(200).collect::<String>(), "JSON parse failed");
        ParseFailure {
            reason: e.to_string(),
            raw: raw.to_string(),
        }
    })?;

    let candidates: Vec<CandidateResult> = items.into_iter().map(decode_candidate).collect();
    debug!(count = candidates.len(), "parsed candidates");
    Ok(candidates)
}

fn decode_candidate(item: Value) -> CandidateResult {
    if !item.is_object() {
        return CandidateResult::malformed(format!("expected an object, got: {}", item));
    }
    serde_json::from_value(item.clone()).unwrap_or_else(|e| {
        CandidateResult::malformed(format!("could not decode candidate ({}): {}", e, item))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_surrounding_noise() {
        let raw = r#"blah [{"name":"A","match_score":90}] blah"#;
        let parsed = parse_candidates(raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "A");
        assert_eq!(parsed[0].match_score, 90);
    }

    #[test]
    fn test_no_brackets_keeps_raw_unmodified() {
        let raw = "  I could not evaluate these resumes, sorry.\n";
        let err = parse_candidates(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn test_broken_json_is_error() {
        let raw = "[{broken json";
        let err = parse_candidates(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn test_invalid_slice_is_error() {
        let raw = "[{broken json]";
        let err = parse_candidates(raw).unwrap_err();
        assert_eq!(err.raw, raw);
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_closing_before_opening_is_error() {
        assert_eq!(locate_json_array("] nothing ["), None);
        assert!(parse_candidates("] nothing [").is_err());
    }

    #[test]
    fn test_markdown_fence_and_reasoning() {
        let raw = r#"Let me think about both candidates.
```json
[
  {"name": "Alice", "match_score": 91, "key_skills": ["Go", "Raft"], "missing_skills": [],
   "summary": "Strong distributed systems background.", "status": "Interview"},
  {"name": "Bob", "match_score": 12, "key_skills": [], "missing_skills": ["Go"],
   "summary": "Unrelated experience.", "status": "Reject"}
]
```
Hope this helps!"#;
        let parsed = parse_candidates(raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].key_skills, vec!["Go", "Raft"]);
        assert_eq!(parsed[1].status, "Reject");
        assert_eq!(parsed[1].missing_skills, vec!["Go"]);
    }

    #[test]
    fn test_object_wrapping_array() {
        let raw = r#"{"candidates": [{"name": "A", "match_score": 70}]}"#;
        let parsed = parse_candidates(raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].match_score, 70);
    }

    #[test]
    fn test_malformed_element_does_not_fail_batch() {
        let raw = r#"[{"name": "A", "match_score": 80}, "oops", {"name": "C"}]"#;
        let parsed = parse_candidates(raw).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].issue.is_none());
        assert!(parsed[1].issue.as_deref().unwrap().contains("oops"));
        assert_eq!(parsed[2].name, "C");
        assert_eq!(parsed[2].match_score, 0);
    }

    #[test]
    fn test_element_with_both_schema_names_is_kept() {
        let raw = r#"[{"name": "Alice", "match_score": 91, "summary": "Strong.",
                       "explanation": "Also strong.", "strengths": ["Go"], "key_skills": ["Raft"],
                       "gaps": [], "missing_skills": ["K8s"], "overall_score": 90}]"#;
        let parsed = parse_candidates(raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].issue.is_none());
        assert_eq!(parsed[0].name, "Alice");
        assert_eq!(parsed[0].match_score, 91);
        assert_eq!(parsed[0].key_skills, vec!["Raft"]);
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_candidates("[]").unwrap().is_empty());
    }
}
