//! Startup banner: figlet wordmark shaded left to right, a rule, and the tagline.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

const WORDMARK: &str = "TalentAlign";
const TAGLINE: &str = "Screen resumes against a job description";

/// Indigo (#4b3cfa).
const INDIGO: (u8, u8, u8) = (0x4b, 0x3c, 0xfa);
/// Teal (#14d2b4).
const TEAL: (u8, u8, u8) = (0x14, 0xd2, 0xb4);

/// Colour of column `col` out of `width`, blending indigo into teal.
fn column_color(col: usize, width: usize) -> Color {
    let t = if width <= 1 {
        0.0
    } else {
        col as f64 / (width - 1) as f64
    };
    let mix = |from: u8, to: u8| (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8;
    Color::Rgb {
        r: mix(INDIGO.0, TEAL.0),
        g: mix(INDIGO.1, TEAL.1),
        b: mix(INDIGO.2, TEAL.2),
    }
}

/// Figlet rendering of the wordmark; plain text if the font cannot be loaded.
fn wordmark_lines() -> Vec<String> {
    let art = match FIGfont::standard() {
        Ok(font) => font
            .convert(WORDMARK)
            .map(|figure| figure.to_string())
            .unwrap_or_else(|| WORDMARK.to_string()),
        Err(_) => WORDMARK.to_string(),
    };
    art.lines()
        .map(|l| l.trim_end().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Prints the wordmark, a rule under it as wide as the art, then version and tagline.
pub fn print_welcome() {
    let mut out = stdout();
    let lines = wordmark_lines();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for line in &lines {
        for (col, ch) in line.chars().enumerate() {
            let _ = out.execute(SetForegroundColor(column_color(col, width)));
            let _ = out.execute(Print(ch));
        }
        let _ = out.execute(ResetColor);
        let _ = out.execute(Print("\r\n"));
    }

    let _ = out.execute(SetForegroundColor(Color::DarkGrey));
    let _ = out.execute(Print(format!("{}\r\n", "─".repeat(width.max(TAGLINE.len())))));
    let _ = out.execute(SetForegroundColor(column_color(width.saturating_sub(1), width)));
    let _ = out.execute(Print(format!(
        "{} v{}  {}\r\n\r\n",
        WORDMARK,
        env!("CARGO_PKG_VERSION"),
        TAGLINE
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
