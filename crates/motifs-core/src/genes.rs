//! Gene symbol derivation from motif identifiers.
//!
//! Each source catalog encodes the bound transcription factors differently,
//! so the rule is chosen per dataset.

use std::collections::BTreeSet;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::defaults::MAX_GENE_RANGE;
use crate::error::{Error, Result};

// E2F1..5 -> E2F1, E2F2, ..., E2F5
static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?\D)(\d+)\.\.(\d+)$").expect("range regex is valid"));

// FOXA1,2 -> FOXA1, FOXA2
static LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)(\d+(?:,\d+)+)$").expect("list regex is valid"));

// NFAT{C1,C2} -> NFATC1, NFATC2
static BRACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\{(.+)\}$").expect("brace regex is valid"));

/// How gene symbols are encoded in a catalog's motif ids or names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneRule {
    /// `MA0059.1 MAX::MYC`: `::`-separated names, each cut at `_`.
    Jaspar,
    /// `E2F1..5_TFDP1.p2`: the id before `.p`, `_`-separated with range,
    /// list and brace shorthands.
    SwissRegulon,
    /// `ALX3_full_1`, `BARHL2_DBD_3`.
    Jolma,
    /// HOCOMOCO style `AHR.H12CORE.0.P.B`, with the release tag given.
    Suffixed(String),
}

impl GeneRule {
    /// Pick the rule from a dataset name, falling back to `Jaspar`.
    pub fn for_dataset(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("swissregulon") {
            GeneRule::SwissRegulon
        } else if lower.starts_with("jolma") {
            GeneRule::Jolma
        } else if let Some(tag) = ["H12CORE", "H13CORE"]
            .iter()
            .find(|tag| name.eq_ignore_ascii_case(tag))
        {
            GeneRule::Suffixed(tag.to_string())
        } else {
            GeneRule::Jaspar
        }
    }

    /// Sorted, de-duplicated gene symbols for a motif.
    ///
    /// Fails with `Format` when a range shorthand spans more than
    /// `MAX_GENE_RANGE` genes.
    pub fn genes(&self, motif_id: &str, motif_name: &str) -> Result<Vec<String>> {
        let genes: BTreeSet<String> = match self {
            GeneRule::Jaspar => motif_name
                .split("::")
                .filter_map(|part| part.split('_').next())
                .map(str::to_string)
                .collect(),
            GeneRule::SwissRegulon => {
                let base = motif_id.split(".p").next().unwrap_or(motif_id);
                let mut genes = BTreeSet::new();
                for token in base.split('_') {
                    genes.extend(expand_swissregulon(token)?);
                }
                genes
            }
            GeneRule::Jolma => {
                let base = motif_id.split("_full").next().unwrap_or(motif_id);
                let base = base.find("_DBD").map_or(base, |i| &base[..i]);
                base.split('_').map(str::to_string).collect()
            }
            GeneRule::Suffixed(tag) => {
                let base = motif_id.split("_full").next().unwrap_or(motif_id);
                let marker = format!(".{}", tag);
                let base = base.find(&marker).map_or(base, |i| &base[..i]);
                base.split('_').map(str::to_string).collect()
            }
        };

        Ok(genes.into_iter().filter(|g| !g.is_empty()).collect())
    }
}

fn expand_swissregulon(token: &str) -> Result<Vec<String>> {
    if let Some(caps) = RANGE_RE.captures(token) {
        let symbol = &caps[1];
        if let (Ok(start), Ok(end)) = (caps[2].parse::<u32>(), caps[3].parse::<u32>()) {
            if start <= end {
                if end - start >= MAX_GENE_RANGE {
                    return Err(Error::Format(format!(
                        "gene range '{}' expands to more than {} genes",
                        token, MAX_GENE_RANGE
                    )));
                }
                return Ok((start..=end).map(|n| format!("{}{}", symbol, n)).collect());
            }
        }
        return Ok(vec![token.to_string()]);
    }

    if let Some(caps) = BRACE_RE.captures(token) {
        let prefix = &caps[1];
        return Ok(caps[2]
            .split(',')
            .map(|s| format!("{}{}", prefix, s.trim()))
            .collect());
    }

    if let Some(caps) = LIST_RE.captures(token) {
        let prefix = &caps[1];
        return Ok(caps[2]
            .split(',')
            .map(|s| format!("{}{}", prefix, s.trim()))
            .collect());
    }

    Ok(vec![token.to_string()])
}

impl FromStr for GeneRule {
    type Err = Error;

    /// Accepts `jaspar`, `swissregulon`, `jolma` or `suffix:<TAG>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "jaspar" => Ok(GeneRule::Jaspar),
            "swissregulon" => Ok(GeneRule::SwissRegulon),
            "jolma" => Ok(GeneRule::Jolma),
            _ => match s.split_once(':') {
                Some((kind, tag)) if kind.eq_ignore_ascii_case("suffix") && !tag.is_empty() => {
                    Ok(GeneRule::Suffixed(tag.to_string()))
                }
                _ => Err(Error::InvalidInput(format!("unknown gene rule '{}'", s))),
            },
        }
    }
}
