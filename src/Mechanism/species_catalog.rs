//! Extraction of species declarations from the MechGen output file and
//! assembly of the ordered master compound list.
//!
//! MechGen writes two species sections, `.STS` (steady-state species) and
//! `.ACT` (active species), both terminated by the `.RXN` marker. A species
//! line looks like
//!
//! ```text
//! ISOP-A1   ... ! comment text  COMMON-NAME
//! ```
//!
//! the first token is the MechGen-internal id, the last token after the
//! first `!` is the common name. Lines whose first token starts with `!`
//! or `.` are comments/continuations.

use crate::Mechanism::ConversionError;
use crate::Mechanism::naming::NameRules;
use log::info;
use regex::Regex;
use std::collections::HashSet;

pub const STS_MARKER: &str = ".STS";
pub const ACT_MARKER: &str = ".ACT";
pub const SECTION_END: &str = ".RXN";

/// one extracted species declaration
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesEntry {
    /// MechGen-internal id (first token of the line), canonicalized
    pub mg_name: String,
    /// common name (last token after the first `!`), canonicalized
    pub name: String,
}

/// section scanner states; a section that never reaches `Done` is a
/// structural error
enum ScanState {
    SeekingStart,
    InSection,
    Done,
}

/// Extracts the species declarations between the line exactly equal to
/// `start_marker` and the line exactly equal to `end_marker`.
/// Blank lines, comment/continuation lines and lines without a `!`
/// separator are skipped; entries with an empty common name are dropped;
/// duplicate common names are collapsed to the first occurrence.
pub fn extract_section(
    lines: &[String],
    start_marker: &str,
    end_marker: &str,
    rules: &NameRules,
) -> Result<Vec<SpeciesEntry>, ConversionError> {
    let mut state = ScanState::SeekingStart;
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut entries: Vec<SpeciesEntry> = Vec::new();

    for line in lines {
        match state {
            ScanState::SeekingStart => {
                if line == start_marker {
                    state = ScanState::InSection;
                }
            }
            ScanState::InSection => {
                if line == end_marker {
                    state = ScanState::Done;
                    break;
                }
                let first_token = match line.split_whitespace().next() {
                    Some(tok) => tok,
                    None => continue, // blank line
                };
                if first_token.starts_with('!') || first_token.starts_with('.') {
                    continue; // comment or continuation
                }
                let (head, tail) = match line.split_once('!') {
                    Some(pair) => pair,
                    None => continue, // no common-name part
                };
                let mg_name = match head.split_whitespace().next() {
                    Some(tok) => rules.canonical_name(tok),
                    None => continue,
                };
                let name = match tail.split_whitespace().last() {
                    Some(tok) => rules.canonical_name(tok),
                    None => continue, // empty common name
                };
                if seen_names.insert(name.clone()) {
                    entries.push(SpeciesEntry { mg_name, name });
                }
            }
            ScanState::Done => break,
        }
    }

    match state {
        ScanState::Done => Ok(entries),
        ScanState::SeekingStart => Err(ConversionError::MissingSection(start_marker.to_string())),
        ScanState::InSection => Err(ConversionError::UnterminatedSection {
            start: start_marker.to_string(),
            end: end_marker.to_string(),
        }),
    }
}

/// Builds the master compound list: `defaults`, then the active species
/// not already covered by `defaults` or the steady-state set, then the
/// steady-state species. Returns `(all_compounds, steady_state_compounds)`.
pub fn build_compounds(
    lines: &[String],
    defaults: &[String],
    rules: &NameRules,
) -> Result<(Vec<String>, Vec<String>), ConversionError> {
    let sts = extract_section(lines, STS_MARKER, SECTION_END, rules)?;
    let act = extract_section(lines, ACT_MARKER, SECTION_END, rules)?;

    let defaults: Vec<String> = defaults.iter().map(|d| rules.canonical_name(d)).collect();
    let compounds_sts: Vec<String> = sts.iter().map(|s| s.mg_name.clone()).collect();
    let compounds_act: Vec<String> = act
        .iter()
        .map(|s| s.mg_name.clone())
        .filter(|c| !defaults.contains(c) && !compounds_sts.contains(c))
        .collect();

    let mut compounds_total = defaults;
    compounds_total.extend(compounds_act);
    compounds_total.extend(compounds_sts.clone());
    info!(
        "compound list assembled: {} total, {} steady-state",
        compounds_total.len(),
        compounds_sts.len()
    );
    Ok((compounds_total, compounds_sts))
}

/// Filters the compound list to the compounds that actually occur (as a
/// whole word) in the compiled reaction texts. Returns
/// `(retained, dropped)` with the input order preserved in both lists.
/// Running it again on `retained` against the same texts changes nothing.
pub fn clean_null_compounds(
    compounds: &[String],
    reaction_texts: &[String],
) -> (Vec<String>, Vec<String>) {
    if compounds.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let combined = reaction_texts.join(" ");
    let pattern = format!(
        r"\b(?:{})\b",
        compounds
            .iter()
            .map(|c| regex::escape(c))
            .collect::<Vec<_>>()
            .join("|")
    );
    let re = Regex::new(&pattern).unwrap();
    let found: HashSet<&str> = re.find_iter(&combined).map(|m| m.as_str()).collect();

    let retained: Vec<String> = compounds
        .iter()
        .filter(|c| found.contains(c.as_str()))
        .cloned()
        .collect();
    let dropped: Vec<String> = compounds
        .iter()
        .filter(|c| !found.contains(c.as_str()))
        .cloned()
        .collect();
    (retained, dropped)
}
