//! Minimal MEME motif format reader.
//!
//! Only the parts needed to build the catalog are read: `MOTIF` lines and the
//! `letter-probability matrix` block that follows each of them. Everything
//! else (alphabet, background frequencies, URLs) is ignored.
//!
//! ```text
//! MOTIF MA0004.1 Arnt
//! letter-probability matrix: alength= 4 w= 2 nsites= 20 E= 0
//!   0.200000  0.800000  0.000000  0.000000
//!   0.950000  0.000000  0.050000  0.000000
//! ```

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::defaults::MAX_MOTIF_WIDTH;
use crate::error::{Error, Result};
use crate::models::BaseWeights;

static WIDTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"w=\s*(\d+)").expect("width regex is valid"));

/// One motif read from a MEME file.
#[derive(Debug, Clone, PartialEq)]
pub struct MemeMotif {
    pub motif_id: String,
    /// Alternate name from the `MOTIF` line; the id when absent.
    pub motif_name: String,
    pub weights: Vec<BaseWeights>,
}

/// Parse every motif with a probability matrix from `reader`.
///
/// Motifs declared without a matrix are skipped.
pub fn parse_meme<R: BufRead>(reader: R) -> Result<Vec<MemeMotif>> {
    let mut motifs = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut lines = reader.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        let line = line?;
        let line = line.trim();
        let line_no = idx + 1;

        if line.starts_with("MOTIF") {
            if let Some((id, _)) = current.take() {
                debug!(motif_id = %id, "Skipping motif without probability matrix");
            }
            let mut tokens = line.split_whitespace().skip(1);
            let id = tokens
                .next()
                .ok_or_else(|| Error::Format(format!("line {}: MOTIF without id", line_no)))?;
            let name = tokens.next().unwrap_or(id);
            current = Some((id.to_string(), name.to_string()));
            continue;
        }

        if !line.starts_with("letter-probability") {
            continue;
        }

        let (motif_id, motif_name) = current.take().ok_or_else(|| {
            Error::Format(format!("line {}: matrix before any MOTIF line", line_no))
        })?;

        let width: usize = WIDTH_RE
            .captures(line)
            .and_then(|c| c[1].parse().ok())
            .ok_or_else(|| Error::Format(format!("line {}: matrix width missing", line_no)))?;
        if width > MAX_MOTIF_WIDTH {
            return Err(Error::Format(format!(
                "line {}: matrix width {} exceeds {}",
                line_no, width, MAX_MOTIF_WIDTH
            )));
        }

        let mut weights = Vec::with_capacity(width);
        while weights.len() < width {
            let (idx, row) = lines.next().ok_or_else(|| {
                Error::Format(format!(
                    "motif {}: expected {} rows, found {}",
                    motif_id,
                    width,
                    weights.len()
                ))
            })?;
            let row = row?;
            let row = row.trim();
            if row.is_empty() {
                continue;
            }
            weights.push(parse_row(row, idx + 1)?);
        }

        motifs.push(MemeMotif {
            motif_id,
            motif_name,
            weights,
        });
    }

    Ok(motifs)
}

fn parse_row(row: &str, line_no: usize) -> Result<BaseWeights> {
    let values = row
        .split_whitespace()
        .map(|v| v.parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Format(format!("line {}: {}", line_no, e)))?;

    match values.as_slice() {
        [a, c, g, t] => Ok([*a, *c, *g, *t]),
        _ => Err(Error::Format(format!(
            "line {}: expected 4 columns, found {}",
            line_no,
            values.len()
        ))),
    }
}
