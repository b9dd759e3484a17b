//! Implements InputPort. Inquire-based screening form.
//!
//! The form mirrors a single page: job description, resume uploads, blind-mode toggle,
//! then the screen action. Results and failures are rendered in place.

use crate::adapters::ui::{progress, render, uploads};
use crate::adapters::ui::export::export_csv;
use crate::domain::{DomainError, ResumeUpload, ScreeningReport};
use crate::ports::InputPort;
use crate::usecases::ScreeningService;
use async_trait::async_trait;
use crossterm::style::Stylize;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, Text};
use std::path::Path;
use std::sync::Arc;

/// Applies the prompt theme for all subsequent inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::DarkCyan))
        .with_answered_prompt_prefix(Styled::new("✓").with_fg(Color::DarkGreen))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

/// Run one screening batch with a spinner, then render the outcome. The CSV export, when
/// requested, uses the same ranked order as the scoreboard.
///
/// Failures are rendered as error cards and also returned, so scripted callers can set
/// an exit status.
pub async fn present_screening(
    service: &ScreeningService,
    job_description: &str,
    uploads: &[ResumeUpload],
    blind_mode: bool,
    export: Option<&Path>,
) -> Result<ScreeningReport, DomainError> {
    let spinner = progress::spinner(format!(
        "Analyzing {} resume(s) with {}...",
        uploads.len(),
        service.backend_label()
    ));
    let outcome = service.screen(job_description, uploads, blind_mode).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(report) => {
            render::print_report(&report);
            if let Some(path) = export {
                match export_csv(path, &report.ranked()).await {
                    Ok(()) => println!("Scoreboard exported to {}", path.display()),
                    Err(e) => render::print_error(&e),
                }
            }
            Ok(report)
        }
        Err(e) => {
            render::print_error(&e);
            Err(e)
        }
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    service: Arc<ScreeningService>,
}

impl TuiInputPort {
    pub fn new(service: Arc<ScreeningService>) -> Self {
        Self { service }
    }

    fn print_status(&self) {
        let db = if self.service.is_persistence_enabled() {
            "● Database connected".green()
        } else {
            "● Database offline".red()
        };
        println!("Backend: {}   {}\n", self.service.backend_label().cyan(), db);
    }

    async fn run_once(&self) -> Result<(), DomainError> {
        let jd_input = Text::new("1. Job description:")
            .with_help_message("Paste the JD, or @path/to/jd.txt to load it from a file")
            .prompt()
            .map_err(|e| DomainError::Ui(e.to_string()))?;
        let job_description = uploads::resolve_job_description(&jd_input).await?;

        let paths_input = Text::new("2. Resume PDFs:")
            .with_help_message("Comma-separated files or directories")
            .prompt()
            .map_err(|e| DomainError::Ui(e.to_string()))?;
        let uploads = uploads::load_uploads(&uploads::parse_path_list(&paths_input)).await?;

        let blind_mode = Confirm::new("Blind hiring mode?")
            .with_default(true)
            .with_help_message("Ask the model to ignore names, gender and age")
            .prompt()
            .map_err(|e| DomainError::Ui(e.to_string()))?;

        // Run failures are already rendered; the form stays open.
        let _ = present_screening(&self.service, &job_description, &uploads, blind_mode, None).await;
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        self.print_status();
        loop {
            match self.run_once().await {
                Ok(()) => {}
                Err(DomainError::Ui(e)) => return Err(DomainError::Ui(e)),
                Err(e) => render::print_error(&e),
            }
            let again = Confirm::new("Screen another batch?")
                .with_default(false)
                .prompt()
                .map_err(|e| DomainError::Ui(e.to_string()))?;
            if !again {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockLlmAdapter;
    use crate::adapters::pdf::usable_text;
    use crate::ports::TextExtractorPort;

    struct PlainTextExtractor;

    #[async_trait]
    impl TextExtractorPort for PlainTextExtractor {
        async fn extract(&self, name: &str, bytes: &[u8]) -> Result<String, DomainError> {
            usable_text([String::from_utf8_lossy(bytes)])
                .ok_or_else(|| DomainError::Extraction(name.to_string()))
        }
    }

    #[tokio::test]
    async fn test_export_follows_scoreboard_order() {
        let llm = Arc::new(MockLlmAdapter::responding(
            r#"[{"name": "bob.pdf", "match_score": 20}, {"name": "alice.pdf", "match_score": 90}]"#,
        ));
        let service = ScreeningService::new(llm, Arc::new(PlainTextExtractor), None, None);
        let uploads = vec![
            ResumeUpload::new("bob.pdf", b"Bob: pastry chef, ten years running a busy neighbourhood bakery downtown.".to_vec()),
            ResumeUpload::new("alice.pdf", b"Alice: seven years of Go, built Raft-based storage, Kubernetes and gRPC.".to_vec()),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");

        let report = present_screening(&service, "Senior Go engineer", &uploads, true, Some(&path))
            .await
            .unwrap();
        assert_eq!(report.candidates[0].name, "bob.pdf");

        let csv = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert!(rows[0].starts_with("alice.pdf,90"));
        assert!(rows[1].starts_with("bob.pdf,20"));
    }
}
