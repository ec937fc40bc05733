//! Marker list files.
//!
//! One marker per line, youngest first:
//!
//! ```text
//! # name   age PDF        displacement PDF
//! T1       t1_age.txt     t1_disp.txt
//! T2       t2_age.txt     t2_disp.txt
//! ```
//!
//! Relative paths resolve against the list file's directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pdf_file::{read_pdf, PdfFileError};
use crate::resample::{Marker, MarkerChain, ResampleError};

#[derive(Debug, Error)]
pub enum MarkerFileError {
    #[error("I/O error reading marker list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} line {line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("marker {marker}: {source}")]
    Pdf {
        marker: String,
        #[source]
        source: PdfFileError,
    },

    #[error(transparent)]
    Chain(#[from] ResampleError),
}

impl MarkerFileError {
    pub fn is_io(&self) -> bool {
        match self {
            MarkerFileError::Io { .. } => true,
            MarkerFileError::Pdf { source, .. } => source.is_io(),
            _ => false,
        }
    }
}

/// One parsed line of a marker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEntry {
    pub name: String,
    pub age_path: PathBuf,
    pub displacement_path: PathBuf,
}

/// Parse marker list text. `base` is joined onto relative paths.
pub fn parse_marker_list(
    text: &str,
    base: &Path,
    source: &Path,
) -> Result<Vec<MarkerEntry>, MarkerFileError> {
    let mut entries: Vec<MarkerEntry> = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let &[name, age, disp] = fields.as_slice() else {
            return Err(MarkerFileError::Syntax {
                path: source.to_path_buf(),
                line,
                message: format!(
                    "expected `name age_file displacement_file`, found {} fields",
                    fields.len()
                ),
            });
        };
        if entries.iter().any(|e| e.name == name) {
            return Err(MarkerFileError::Syntax {
                path: source.to_path_buf(),
                line,
                message: format!("duplicate marker name {:?}", name),
            });
        }
        entries.push(MarkerEntry {
            name: name.to_string(),
            age_path: base.join(age),
            displacement_path: base.join(disp),
        });
    }
    Ok(entries)
}

/// Read a marker list and every PDF it names.
pub fn load_markers(path: &Path) -> Result<MarkerChain, MarkerFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| MarkerFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let entries = parse_marker_list(&text, base, path)?;

    let mut markers = Vec::with_capacity(entries.len());
    for entry in entries {
        let pdf_err = |source: PdfFileError| MarkerFileError::Pdf {
            marker: entry.name.clone(),
            source,
        };
        let age = read_pdf(&entry.age_path).map_err(pdf_err)?;
        let displacement = read_pdf(&entry.displacement_path).map_err(pdf_err)?;
        markers.push(Marker::new(entry.name, age, displacement));
    }
    Ok(MarkerChain::new(markers)?)
}
