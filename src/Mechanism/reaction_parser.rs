//! Extraction of raw reaction records from the `.RXN` block of a MechGen
//! output file, and loading of the reactant set of an already compiled
//! base mechanism (used to suppress duplicate reactions).
//!
//! A record starts on a physical line beginning with the `R)` marker and
//! may continue over several physical lines; continuations are joined with
//! a single space. `#` characters are stripped everywhere in the block.

use crate::Mechanism::ConversionError;
use crate::Mechanism::naming::NameRules;
use log::info;
use std::collections::HashSet;

pub const RXN_MARKER: &str = ".RXN";
pub const RXN_END_MARKER: &str = ".";
pub const RECORD_MARKER: &str = "R)";

/// Extracts the raw (possibly multi-line) reaction records, in file order.
/// The block starts after the line exactly equal to `.RXN` (its absence is
/// a structural error) and ends at the line exactly equal to `.`; a
/// missing end marker means the block extends to the end of the file.
pub fn parse_reactions(lines: &[String]) -> Result<Vec<String>, ConversionError> {
    let rxn_start = lines
        .iter()
        .position(|l| l == RXN_MARKER)
        .ok_or_else(|| ConversionError::MissingSection(RXN_MARKER.to_string()))?
        + 1;
    let rxn_end = lines[rxn_start..]
        .iter()
        .position(|l| l == RXN_END_MARKER)
        .map(|p| rxn_start + p)
        .unwrap_or(lines.len());

    let mut reactions: Vec<String> = Vec::new();
    let mut current: String = String::new();

    for line in &lines[rxn_start..rxn_end] {
        let line = line.trim().replace('#', "");
        if line.starts_with(RECORD_MARKER) {
            // new record; flush the previous one
            if !current.is_empty() {
                reactions.push(current);
            }
            current = line;
        } else if !current.is_empty() {
            current.push(' ');
            current.push_str(&line);
        }
    }
    if !current.is_empty() {
        reactions.push(current);
    }

    info!("found {} raw reaction records", reactions.len());
    Ok(reactions)
}

/// Loads the reactant-side fragments of a base mechanism, one per line of
/// the exact form `Rnames{<idx>} = '<equation>';`. Fragments are
/// canonicalized so they compare directly against newly compiled
/// equations.
pub fn load_reference_reactions(lines: &[String], rules: &NameRules) -> HashSet<String> {
    let mut reactant_equations: HashSet<String> = HashSet::new();
    for line in lines {
        if !line.starts_with("Rnames{") {
            continue;
        }
        let Some(start) = line.find("= '") else {
            continue;
        };
        let start = start + 3;
        let Some(end) = line[start..].find("';").map(|p| start + p) else {
            continue;
        };
        let equation = rules.canonicalize_equation(&line[start..end]);
        let reactant_part = equation.split('=').next().unwrap_or("").trim().to_string();
        reactant_equations.insert(reactant_part);
    }
    info!("loaded {} reference reactions", reactant_equations.len());
    reactant_equations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_lines(text: &str) -> Vec<String> {
        text.lines().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_parse_reactions_multiline() {
        let lines = to_lines(
            "header\n\
             .RXN\n\
             R) 1.5E-12 -1.0 ; ISOPRENE + OH =\n\
             MVK + #.5 HCHO\n\
             R) 2.0E-11 0.0 ; MVK + O3 = PROD\n\
             .\n\
             trailing",
        );
        let records = parse_reactions(&lines).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            "R) 1.5E-12 -1.0 ; ISOPRENE + OH = MVK + .5 HCHO"
        );
        assert_eq!(records[1], "R) 2.0E-11 0.0 ; MVK + O3 = PROD");
    }

    #[test]
    fn test_parse_reactions_no_end_marker() {
        let lines = to_lines(
            ".RXN\n\
             R) 1.0 2.0 ; A = B\n\
             R) 3.0 4.0 ; B = C",
        );
        let records = parse_reactions(&lines).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], "R) 3.0 4.0 ; B = C");
    }

    #[test]
    fn test_parse_reactions_missing_block() {
        let lines = to_lines("no reaction block here");
        assert!(matches!(
            parse_reactions(&lines),
            Err(ConversionError::MissingSection(_))
        ));
    }

    #[test]
    fn test_load_reference_reactions() {
        let lines = to_lines(
            "Rnames{1} = 'A-B=C';\n\
             Rnames{2} = 'NO2 + OH = HNO3';\n\
             k(:,2) = 1.0;\n\
             some other line",
        );
        let rules = NameRules::new();
        let set = load_reference_reactions(&lines, &rules);
        assert_eq!(set.len(), 2);
        assert!(set.contains("A_B"));
        assert!(set.contains("NO2 + OH"));
    }
}
