//! The central compilation pipeline: takes the raw reaction records in file
//! order, applies the soft filters, translates the rate clause, computes
//! the per-species stoichiometry and emits the formatted F0AM reaction
//! blocks.
//!
//! All per-record filters are soft: a failing record is skipped, the skip
//! is tallied in `ConversionStats` and processing continues. Output indices
//! are assigned densely (1..N) over the surviving records only.

use crate::Mechanism::naming::NameRules;
use crate::Mechanism::rate_translator::{PhotolysisNames, RateExpression, format_float, translate};
use indexmap::IndexMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// reactant token standing for a photon; kept in the equation text but
/// excluded from declarations and stoichiometry
pub const PHOTON_MARKER: &str = "HV";
/// reserved prefix of the secondary-aerosol proxy species
pub const AGGREGATE_PREFIX: &str = "VBS";
/// radical-pool marker used by multi-generation mechanisms
pub const MULTI_RADICAL_MARKER: &str = "RAD";
/// name of the running radical-pool counter species (pre-canonicalization)
pub const RADICAL_POOL_COUNTER: &str = "RO2";

/// single- vs multi-generation mechanism; the radical-pool species are
/// labeled differently in the two modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generation {
    Single,
    Multi,
}

/// per-run tallies of skipped/dropped records, observable to the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionStats {
    pub raw_records: usize,
    pub compiled: usize,
    pub malformed: usize,
    pub duplicate_suppressed: usize,
    pub undefined_species: usize,
    pub generation_filtered: usize,
    pub opaque_rates: usize,
}

/// one compiled reaction; immutable once emitted
#[derive(Debug, Clone)]
pub struct CompiledReaction {
    /// 1-based output index, dense over surviving records
    pub index: usize,
    /// canonicalized equation text (photon marker included)
    pub equation: String,
    pub rate_expression: String,
    pub reactants: Vec<String>,
    /// (yield, species) pairs, yield defaults to 1.0
    pub products: Vec<(f64, String)>,
    /// net coefficient per species, first-seen order
    pub stoichiometry: IndexMap<String, f64>,
    /// net contribution to the radical-pool counter
    pub radical_pool_delta: f64,
    /// the emitted F0AM block
    pub formatted: String,
}

/// compiler configuration for one conversion run
#[derive(Debug, Clone)]
pub struct ReactionCompiler<'a> {
    pub generation: Generation,
    pub precursor: String,
    /// master compound list; reactions whose first reactant is not listed
    /// here are skipped
    pub compounds: &'a [String],
    /// skip radical-pool reactions beyond this generation number
    pub radical_cutoff: Option<u32>,
    /// reactant-side fragments already covered by the base mechanism
    pub reference: Option<&'a HashSet<String>>,
    /// when false, `VBS*` products appear in the equation text but get no
    /// balance lines
    pub include_aggregate: bool,
    pub rules: &'a NameRules,
}

/// Parses the generation number of a radical-pool identifier: the
/// underscore-delimited segments are scanned right to left and the first
/// trailing digit run found supplies the number. Identifiers without one
/// are never cutoff-filtered.
fn generation_number(identifier: &str) -> Option<u32> {
    for segment in identifier.rsplit('_') {
        let run: String = segment
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if !run.is_empty() {
            return run.parse().ok();
        }
    }
    None
}

impl<'a> ReactionCompiler<'a> {
    pub fn new(
        generation: Generation,
        precursor: &str,
        compounds: &'a [String],
        rules: &'a NameRules,
    ) -> Self {
        Self {
            generation,
            precursor: precursor.to_string(),
            compounds,
            radical_cutoff: None,
            reference: None,
            include_aggregate: false,
            rules,
        }
    }

    /// label prefix of the radical-pool species for this run
    pub fn radical_prefix(&self) -> String {
        match self.generation {
            Generation::Single => format!("{}r", self.precursor),
            Generation::Multi => MULTI_RADICAL_MARKER.to_string(),
        }
    }

    /// Compiles the raw records in order. Returns the surviving reactions
    /// (indices dense from 1) and the skip tallies; the photolysis
    /// accumulator collects every distinct `PF=` product name.
    pub fn compile(
        &self,
        records: &[String],
        names_pf: &mut PhotolysisNames,
    ) -> (Vec<CompiledReaction>, ConversionStats) {
        let radical_prefix = self.radical_prefix();
        let mut stats = ConversionStats::default();
        let mut compiled: Vec<CompiledReaction> = Vec::new();
        let mut index: usize = 1;

        for record in records {
            stats.raw_records += 1;

            // 1. rate clause / equation clause
            let Some((rate_clause, eqn_clause)) = record.split_once(';') else {
                stats.malformed += 1;
                warn!("skipping record without clause delimiter: {}", record);
                continue;
            };

            // 2. canonicalize and take the reactant side
            let equation = self.rules.canonicalize_equation(eqn_clause.trim());
            let Some((reactant_text, product_text)) = equation.split_once('=') else {
                stats.malformed += 1;
                warn!("skipping record without equation separator: {}", record);
                continue;
            };
            let reactant_part = reactant_text.trim().to_string();

            // 3. already covered by the base mechanism
            if let Some(reference) = self.reference {
                if reference.contains(&reactant_part) {
                    stats.duplicate_suppressed += 1;
                    info!("skipping existing reactant: {}", reactant_part);
                    continue;
                }
            }

            // 4. first reactant must be a known compound
            let species_label = reactant_part.split_whitespace().next().unwrap_or("");
            if !self.compounds.iter().any(|c| c == species_label) {
                stats.undefined_species += 1;
                warn!("skipping reaction of undefined species: {}", species_label);
                continue;
            }

            // 5. radical generation cutoff
            if let Some(cutoff) = self.radical_cutoff {
                if reactant_part.starts_with(&radical_prefix) {
                    if let Some(gen_number) = generation_number(species_label) {
                        if gen_number > cutoff {
                            stats.generation_filtered += 1;
                            continue;
                        }
                    }
                }
            }

            // 6. rate translation; the rate text follows the R) marker
            let raw_rate = match rate_clause.find("R)") {
                Some(pos) => rate_clause[pos + 2..].trim(),
                None => rate_clause.trim(),
            };
            let rate_expression = match translate(raw_rate, names_pf) {
                RateExpression::Photolysis(symbolic) => format!("J{}", symbolic),
                RateExpression::Arrhenius(text) => text,
                RateExpression::Opaque(text) => {
                    stats.opaque_rates += 1;
                    text
                }
            };

            // 7. reactant and product tokens
            let reactants: Vec<String> = reactant_text
                .split('+')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            let products: Vec<(f64, String)> = product_text
                .split('+')
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(|entry| {
                    let mut tokens = entry.split_whitespace();
                    let first = tokens.next().unwrap_or("");
                    let rest: Vec<&str> = tokens.collect();
                    match first.parse::<f64>() {
                        Ok(yield_value) if !rest.is_empty() => (yield_value, rest.join(" ")),
                        _ => (1.0, entry.to_string()),
                    }
                })
                .collect();

            // 9. stoichiometry, netted per species in first-seen order
            let mut stoichiometry: IndexMap<String, f64> = IndexMap::new();
            let mut radical_pool_delta: f64 = 0.0;
            for reactant in &reactants {
                if reactant == PHOTON_MARKER {
                    continue;
                }
                *stoichiometry.entry(reactant.clone()).or_insert(0.0) -= 1.0;
                if reactant.starts_with(&radical_prefix) {
                    radical_pool_delta -= 1.0;
                }
            }
            for (yield_value, product) in &products {
                // 10. aggregate proxy species stay out of the balance
                if self.include_aggregate || !product.starts_with(AGGREGATE_PREFIX) {
                    *stoichiometry.entry(product.clone()).or_insert(0.0) += yield_value;
                }
                if product.starts_with(&radical_prefix) {
                    radical_pool_delta += yield_value;
                }
            }

            // 11. formatted block
            let mut block = String::new();
            block.push_str(&format!("%   {}, <R{:03}>\n", index, index));
            block.push_str("i = i + 1;\n");
            block.push_str(&format!("Rnames{{i}} = '{}';\n", equation.trim()));
            block.push_str(&format!("k(:,i) = {};\n", rate_expression));
            let mut slot = 1;
            for reactant in &reactants {
                if reactant == PHOTON_MARKER {
                    continue;
                }
                block.push_str(&format!("Gstr{{i,{}}} = '{}'; ", slot, reactant));
                slot += 1;
            }
            block.push('\n');
            let mut balance_lines: Vec<String> = Vec::new();
            for (species, delta) in &stoichiometry {
                if *delta < 0.0 {
                    balance_lines.push(format!(
                        "f{}(i) = f{}(i) - {};",
                        species,
                        species,
                        format_float(-delta)
                    ));
                } else if *delta > 0.0 {
                    balance_lines.push(format!(
                        "f{}(i) = f{}(i) + {};",
                        species,
                        species,
                        format_float(*delta)
                    ));
                }
            }
            if radical_pool_delta > 0.0 {
                let counter = self.rules.canonical_name(RADICAL_POOL_COUNTER);
                balance_lines.push(format!(
                    "f{}(i) = f{}(i) + {};",
                    counter,
                    counter,
                    format_float(radical_pool_delta)
                ));
            }
            block.push_str(&balance_lines.join("\n"));

            compiled.push(CompiledReaction {
                index,
                equation: equation.trim().to_string(),
                rate_expression,
                reactants,
                products,
                stoichiometry,
                radical_pool_delta,
                formatted: block,
            });
            index += 1;
            stats.compiled += 1;
        }

        info!(
            "compiled {} of {} raw records (malformed {}, duplicate {}, undefined {}, cutoff {})",
            stats.compiled,
            stats.raw_records,
            stats.malformed,
            stats.duplicate_suppressed,
            stats.undefined_species,
            stats.generation_filtered
        );
        (compiled, stats)
    }
}
