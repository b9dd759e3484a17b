//! Terminal rendering of screening results: scoreboard table, candidate cards, error cards.
//!
//! Formatting functions return plain strings; `print_*` add colour.

use crate::domain::{CandidateResult, DomainError, ScanRecord, ScreeningReport};
use chrono::{DateTime, Utc};
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};

const SUMMARY_COLUMN_CHARS: usize = 60;

/// Shorten `text` to `max` characters, marking the cut with an ellipsis.
fn ellipsize(text: &str, max: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Render rows as an aligned text table with a header rule.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.iter().map(|h| h.to_string()).collect());
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.clone()));
        out.push('\n');
    }
    out
}

/// Scoreboard: one row per candidate (name, score, status, summary), in the given order.
pub fn scoreboard(candidates: &[CandidateResult]) -> String {
    let rows: Vec<Vec<String>> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                (i + 1).to_string(),
                c.name.clone(),
                c.match_score.to_string(),
                c.status.clone(),
                ellipsize(&c.summary, SUMMARY_COLUMN_CHARS),
            ]
        })
        .collect();
    table(&["#", "Name", "Score", "Status", "Summary"], &rows)
}

/// Card title, e.g. `85% - alice.pdf`.
pub fn card_title(candidate: &CandidateResult) -> String {
    format!("{}% - {}", candidate.match_score, candidate.name)
}

/// Card body: verdict, summary, strengths, gaps; or the decode issue for a malformed element.
pub fn card_body(candidate: &CandidateResult) -> String {
    if let Some(issue) = &candidate.issue {
        return format!("  Issue with output: {}\n", issue);
    }
    let mut body = String::new();
    if !candidate.status.is_empty() {
        body.push_str(&format!("  Verdict:   {}\n", candidate.status));
    }
    if !candidate.summary.is_empty() {
        body.push_str(&format!("  Summary:   {}\n", candidate.summary));
    }
    if !candidate.key_skills.is_empty() {
        body.push_str(&format!("  Strengths: {}\n", candidate.key_skills.join(", ")));
    }
    if !candidate.missing_skills.is_empty() {
        body.push_str(&format!("  Gaps:      {}\n", candidate.missing_skills.join(", ")));
    }
    body
}

/// User-facing text for a failed run. Parse failures include the raw model output.
pub fn error_card(err: &DomainError) -> String {
    match err {
        DomainError::Parse(failure) => format!(
            "Issue with output: {}\n--- raw model output ---\n{}\n------------------------\n",
            failure.reason, failure.raw
        ),
        other => format!("{}\n", other),
    }
}

/// Recent scans as a table.
pub fn history_table(records: &[ScanRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let when = DateTime::<Utc>::from_timestamp(r.scanned_at, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| r.scanned_at.to_string());
            vec![
                when,
                ellipsize(&r.job_title, 30),
                r.candidate_name.clone(),
                r.match_score.to_string(),
                ellipsize(&r.summary, 50),
            ]
        })
        .collect();
    table(&["When", "Job", "Candidate", "Score", "Summary"], &rows)
}

fn score_color(score: u8) -> Color {
    match score {
        70..=100 => Color::Green,
        40..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn print_colored(color: Color, text: &str) {
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(color));
    let _ = out.execute(Print(text));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

/// Print the scoreboard and cards, best score first.
pub fn print_report(report: &ScreeningReport) {
    let ranked = report.ranked();

    print_colored(Color::Green, "\nAnalysis Complete!\n\n");
    if ranked.is_empty() {
        println!("The model returned no candidates.");
    } else {
        print!("{}", scoreboard(&ranked));
        println!();
        for candidate in &ranked {
            let color = if candidate.issue.is_some() {
                Color::Red
            } else {
                score_color(candidate.match_score)
            };
            print_colored(color, &format!("{}\n", card_title(candidate)));
            print!("{}", card_body(candidate));
            println!();
        }
    }

    if !report.dropped_uploads.is_empty() {
        print_colored(
            Color::Yellow,
            &format!(
                "Skipped (no readable text): {}\n",
                report.dropped_uploads.join(", ")
            ),
        );
    }
}

/// Print a failed run.
pub fn print_error(err: &DomainError) {
    let color = match err {
        DomainError::InvalidInput(_) => Color::Yellow,
        _ => Color::Red,
    };
    print_colored(color, &error_card(err));
}
