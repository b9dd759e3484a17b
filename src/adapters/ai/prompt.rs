//! Screening prompt builder. Pure string assembly, shared by every backend.

use crate::domain::ScreeningRequest;

const ROLE: &str = "You are an Expert Technical Recruiter.";

const BLIND_CLAUSE: &str = "BLIND MODE: Ignore names, gender, age and any other personal details. \
Score only on skills and experience.";

const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT (JSON list only, one object per candidate, no prose):
[{ "name": "Name", "match_score": 85, "key_skills": [], "missing_skills": [], "summary": "...", "status": "Interview" }]
"match_score" is an integer from 0 to 100. "status" is one of: Interview, Maybe, Reject."#;

/// Build the single prompt for a screening batch.
///
/// Each resume is labeled `--- CANDIDATE {i} ({identifier}) ---` with a 1-based index.
/// With `max_resume_chars` set, each resume text is cut to that many characters and the
/// rest is dropped without notice.
pub fn build_prompt(request: &ScreeningRequest, max_resume_chars: Option<usize>) -> String {
    let mut prompt = String::new();
    prompt.push_str(ROLE);
    prompt.push_str("\nJOB DESCRIPTION:\n");
    prompt.push_str(&request.job_description);
    prompt.push_str("\n\nTASK: Analyze each candidate below against the job description.\n");
    if request.blind_mode {
        prompt.push_str(BLIND_CLAUSE);
        prompt.push('\n');
    }
    prompt.push_str(OUTPUT_FORMAT);
    prompt.push_str("\n\nRESUMES:\n");

    for (i, resume) in request.resumes.iter().enumerate() {
        prompt.push_str(&format!(
            "\n--- CANDIDATE {} ({}) ---\n{}\n",
            i + 1,
            resume.identifier,
            truncate_chars(&resume.raw_text, max_resume_chars)
        ));
    }
    prompt
}

/// First `limit` characters of `text` (char boundary safe). `None` = whole text.
pub fn truncate_chars(text: &str, limit: Option<usize>) -> &str {
    match limit {
        Some(n) => match text.char_indices().nth(n) {
            Some((idx, _)) => &text[..idx],
            None => text,
        },
        None => text,
    }
}
