//! Two-column PDF text files.
//!
//! ```text
//! # Value,	Probability
//! 3.800000	0.000334
//! 3.824242	0.000569
//! ```
//!
//! Lines starting with `#` and blank lines are skipped. Each data line holds
//! a value and a density separated by whitespace, a comma, or both.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use riser_math::{DomainError, PdfTable};
use thiserror::Error;

/// Header written at the top of every PDF file.
pub const HEADER: &str = "# Value,\tProbability";

#[derive(Debug, Error)]
pub enum PdfFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid PDF: {0}")]
    Domain(#[from] DomainError),

    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<PdfFileError>,
    },
}

impl PdfFileError {
    /// True when the file could not be read or written at all.
    pub fn is_io(&self) -> bool {
        match self {
            PdfFileError::Io { .. } => true,
            PdfFileError::InFile { source, .. } => source.is_io(),
            _ => false,
        }
    }
}

fn parse_field(field: &str, line: usize, what: &str) -> Result<f64, PdfFileError> {
    field.parse::<f64>().map_err(|_| PdfFileError::Parse {
        line,
        message: format!("{} is not a number: {:?}", what, field),
    })
}

/// Parse PDF text into a normalized table.
pub fn parse_pdf(text: &str) -> Result<PdfTable, PdfFileError> {
    let mut support = Vec::new();
    let mut density = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 2 {
            return Err(PdfFileError::Parse {
                line,
                message: format!("expected 2 columns (value, density), found {}", fields.len()),
            });
        }
        support.push(parse_field(fields[0], line, "value")?);
        density.push(parse_field(fields[1], line, "density")?);
    }

    Ok(PdfTable::new(support, density)?)
}

/// Read and parse a PDF file.
pub fn read_pdf(path: &Path) -> Result<PdfTable, PdfFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| PdfFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pdf(&text).map_err(|err| PdfFileError::InFile {
        path: path.to_path_buf(),
        source: Box::new(err),
    })
}

/// Render a table in the two-column text format.
pub fn format_pdf(pdf: &PdfTable) -> String {
    let mut out = String::with_capacity(HEADER.len() + pdf.points() * 24);
    out.push_str(HEADER);
    out.push('\n');
    for (x, p) in pdf.support().iter().zip(pdf.density()) {
        let _ = writeln!(out, "{}\t{}", x, p);
    }
    out
}

/// Write a table to `path`, replacing any existing file.
pub fn write_pdf(path: &Path, pdf: &PdfTable) -> Result<(), PdfFileError> {
    std::fs::write(path, format_pdf(pdf)).map_err(|source| PdfFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}
