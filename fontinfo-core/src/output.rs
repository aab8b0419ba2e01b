//! Text rendering for reports (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;

use crate::extract::{Extraction, FaceInfo, FontReport, FontSummary, INVALID_FONT};

/// Printed instead of any report when discovery finds nothing.
pub const NO_FONTS_MESSAGE: &str = "No matching font files found.";
/// Shown for a stylistic set whose UI name could not be resolved.
pub const UNNAMED_SET: &str = "no name";

pub const FILE_COLUMN_WIDTH: usize = 32;
pub const NAME_COLUMN_WIDTH: usize = 40;
pub const VERSION_COLUMN_WIDTH: usize = 24;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub stylistic_sets: bool,
    pub color: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            stylistic_sets: true,
            color: false,
        }
    }
}

/// Write one block per face: naming table rows, then stylistic sets.
///
/// Each block opens with a blank line and a `Font file:` header. Collections
/// get one block per face, headed `file.ttc#N`, so a family never hides its
/// siblings. Files that failed to parse still get their header, followed by a
/// single `Invalid Font` line explaining what went wrong.
///
/// ```
/// use fontinfo_core::output::{write_report, ReportOptions};
///
/// let mut out = Vec::new();
/// write_report(&[], &mut out, &ReportOptions::default()).unwrap();
/// assert!(out.is_empty());
/// ```
pub fn write_report(
    reports: &[FontReport],
    mut w: impl Write,
    opts: &ReportOptions,
) -> Result<()> {
    for report in reports {
        match &report.extraction {
            Extraction::Parsed(faces) => {
                for face in faces {
                    write_face(&report.file_name(), face, &mut w, opts)?;
                }
            }
            Extraction::Invalid { reason } => {
                writeln!(w)?;
                write_header(&report.file_name(), &mut w, opts.color)?;
                writeln!(w, "  {INVALID_FONT}: {reason}")?;
            }
        }
    }
    Ok(())
}

fn write_face(
    file_name: &str,
    face: &FaceInfo,
    w: &mut impl Write,
    opts: &ReportOptions,
) -> Result<()> {
    let header = match face.ttc_index {
        Some(idx) => format!("{file_name}#{idx}"),
        None => file_name.to_string(),
    };

    writeln!(w)?;
    write_header(&header, w, opts.color)?;
    writeln!(w, "Name table entries:")?;
    if face.names.is_empty() {
        writeln!(w, "  none")?;
    }
    for entry in &face.names {
        writeln!(w, "  {} ({}): {}", entry.name_id, entry.label, entry.value)?;
    }

    if opts.stylistic_sets {
        writeln!(w)?;
        writeln!(w, "Stylistic sets (ssXX):")?;
        if face.stylistic_sets.is_empty() {
            writeln!(w, "  none")?;
        }
        for set in &face.stylistic_sets {
            let name = set.ui_name.as_deref().unwrap_or(UNNAMED_SET);
            writeln!(w, "  {}: {}", set.tag, name)?;
        }
    }
    Ok(())
}

fn write_header(name: &str, w: &mut impl Write, color: bool) -> Result<()> {
    let rendered = apply_color(name, color, AnsiColor::Cyan);
    writeln!(w, "Font file: {rendered}")?;
    Ok(())
}

/// Write the fixed-width filename / font name / version table.
pub fn write_table(summaries: &[FontSummary], mut w: impl Write, color: bool) -> Result<()> {
    let header = format!(
        "{} {} {}",
        pad("Filename", FILE_COLUMN_WIDTH),
        pad("Font Name", NAME_COLUMN_WIDTH),
        "Version"
    );
    writeln!(w, "{}", apply_color(&header, color, AnsiColor::Yellow))?;
    writeln!(
        w,
        "{} {} {}",
        "-".repeat(FILE_COLUMN_WIDTH),
        "-".repeat(NAME_COLUMN_WIDTH),
        "-".repeat(VERSION_COLUMN_WIDTH)
    )?;

    for summary in summaries {
        writeln!(
            w,
            "{} {} {}",
            pad(&summary.file_name(), FILE_COLUMN_WIDTH),
            pad(&summary.full_name, NAME_COLUMN_WIDTH),
            truncate(&summary.version, VERSION_COLUMN_WIDTH)
        )?;
    }
    Ok(())
}

pub fn write_no_fonts(mut w: impl Write) -> Result<()> {
    writeln!(w, "{NO_FONTS_MESSAGE}")?;
    Ok(())
}

/// Cut `text` to `width` characters, marking the cut with `~`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width))
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
