//! # Mechanism Module
//!
//! ## Purpose
//! Converts a mechanism file produced by the MechGen interactive generation
//! tool into a mechanism description for the F0AM box model. The pipeline is:
//! mechanism file -> species catalog -> raw reaction records -> compiled
//! reaction blocks -> output file.
//!
//! ## Main parts
//! - `species_catalog`: extracts the `.STS` and `.ACT` species sections and
//!   assembles the ordered master compound list; the cleanup pass drops
//!   compounds that never appear in a compiled reaction
//! - `reaction_parser`: extracts raw (possibly multi-line) reaction records
//!   from the `.RXN` block and loads the reactant set of a base mechanism
//! - `rate_translator`: translates one rate-law fragment (Arrhenius or
//!   photolysis `PF=`/`QY=` encoding) into MATLAB-ready expression text
//! - `reaction_compiler`: the central pipeline - soft filters, rate
//!   translation, stoichiometry bookkeeping, formatted block emission
//! - `mech_writer`: pure serializer of the species list and reaction blocks
//! - `naming`: the single naming-rule table; every identifier is
//!   canonicalized once, at the point it is first read
//! - `converter_api`: `MechConverter` struct driving the whole conversion
//!
//! Only a missing section/block marker aborts a run. Everything else is a
//! soft skip: the record is dropped, the skip is tallied in
//! `ConversionStats` and processing continues.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

pub mod converter_api;
pub mod mech_writer;
pub mod naming;
pub mod rate_translator;
pub mod reaction_compiler;
pub mod reaction_parser;
pub mod species_catalog;

/// error types for the conversion pipeline; only these abort a run
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("section marker '{0}' not found in mechanism file")]
    MissingSection(String),
    #[error("section '{start}' is not terminated by '{end}'")]
    UnterminatedSection { start: String, end: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad settings: {0}")]
    Settings(String),
}

/// reads a text file into a vector of lines (newlines stripped)
pub fn read_lines(file_name: &str) -> Result<Vec<String>, ConversionError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(ConversionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File '{}' does not exist", file_name),
        )));
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().filter_map(Result::ok).collect();
    Ok(lines)
}
