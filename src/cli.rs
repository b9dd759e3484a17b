//! Command-line interface. Without a subcommand the interactive form runs.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "talent-align", version)]
#[command(about = "Screen PDF resumes against a job description with an LLM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend override: hosted, local or mock
    #[arg(long, global = true)]
    pub backend: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Screen a batch of resumes in one model call
    Screen {
        /// Job description file
        #[arg(short, long, conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description text
        #[arg(long)]
        job_text: Option<String>,

        /// Resume PDFs or directories containing them
        resumes: Vec<PathBuf>,

        /// Blind hiring mode (ignore names, gender, age)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        blind: bool,

        /// Per-resume character budget in the prompt (0 = unbounded)
        #[arg(long)]
        max_resume_chars: Option<usize>,

        /// Also write the scoreboard to a CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// List recent scans from the scan log
    History {
        /// Number of rows
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}
