//! # Settings Module
//!
//! ## Purpose
//! Holds the configuration of one conversion run: the target precursor,
//! single/multi generation mode, the minimum-yield label the mechanism was
//! generated with, the optional radical-generation cutoff, the default
//! compound list and extra name replacements, and the input/output file
//! paths.
//!
//! Paths default to the MechGen naming conventions, derived from the
//! precursor and the minimum yield:
//!
//! | File | Default |
//! |------|---------|
//! | input mechanism | `MG-<precursor>_Rxnfile_<minyld>.dat` |
//! | base mechanism | `MechGen_Base.m` |
//! | output | `MechGen_<precursor>.m` |
//!
//! A Settings instance can be loaded from a JSON file; omitted fields fall
//! back to the defaults above.

use crate::Mechanism::reaction_compiler::Generation;
use serde::{Deserialize, Serialize};
use std::fs;

/// counter species and bookkeeping species every mechanism carries
pub const DEFAULT_COMPOUNDS: [&str; 10] = [
    "RO2", "RCO3", // counter species
    "LostMoles", "LostMass", "NegC", "NegH", "NegN", "NegO", "GLYOXAL", "FORMACID",
];

/// configuration of one conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub target_reactant: String,
    pub generation: Generation,
    /// minimum-yield threshold the mechanism was generated with; kept as
    /// the label text used in file names and the output header
    pub min_yield: String,
    /// skip radical-pool reactions beyond this generation number
    pub radical_cutoff: Option<u32>,
    /// include `VBS*` secondary-aerosol proxy species in the balance lines
    pub include_aggregate_products: bool,
    pub default_compounds: Vec<String>,
    /// extra name replacements on top of the built-in correction table
    pub name_replacements: Vec<(String, String)>,
    /// path of the base mechanism whose reactions are excluded from the
    /// output; None disables duplicate suppression
    pub reference_file: Option<String>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_reactant: "ISOPRENE".to_string(),
            generation: Generation::Multi,
            min_yield: "0.001".to_string(),
            radical_cutoff: None,
            include_aggregate_products: false,
            default_compounds: DEFAULT_COMPOUNDS.iter().map(|c| c.to_string()).collect(),
            name_replacements: Vec::new(),
            reference_file: Some("MechGen_Base.m".to_string()),
            input_file: None,
            output_file: None,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_file(file_name: &str) -> Result<Self, String> {
        let content = fs::read_to_string(file_name)
            .map_err(|e| format!("Failed to read settings file '{}': {}", file_name, e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse settings file '{}': {}", file_name, e))
    }

    /// input mechanism path; defaults to the MechGen export convention
    pub fn input_path(&self) -> String {
        self.input_file.clone().unwrap_or_else(|| {
            format!(
                "MG-{}_Rxnfile_{}.dat",
                self.target_reactant, self.min_yield
            )
        })
    }

    /// output path; defaults to `MechGen_<precursor>.m`
    pub fn output_path(&self) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("MechGen_{}.m", self.target_reactant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let settings = Settings::default();
        assert_eq!(settings.input_path(), "MG-ISOPRENE_Rxnfile_0.001.dat");
        assert_eq!(settings.output_path(), "MechGen_ISOPRENE.m");
        assert_eq!(settings.reference_file.as_deref(), Some("MechGen_Base.m"));
        assert_eq!(settings.default_compounds.len(), 10);
    }

    #[test]
    fn test_explicit_paths_win() {
        let mut settings = Settings::default();
        settings.input_file = Some("custom.dat".to_string());
        settings.output_file = Some("custom.m".to_string());
        assert_eq!(settings.input_path(), "custom.dat");
        assert_eq!(settings.output_path(), "custom.m");
    }

    #[test]
    fn test_from_json_partial() {
        use std::io::Write;
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{"target_reactant": "APINENE", "generation": "Single", "radical_cutoff": 2}}"#
        )
        .unwrap();
        let settings = Settings::from_json_file(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.target_reactant, "APINENE");
        assert_eq!(settings.generation, Generation::Single);
        assert_eq!(settings.radical_cutoff, Some(2));
        // omitted fields keep their defaults
        assert_eq!(settings.min_yield, "0.001");
        assert_eq!(settings.input_path(), "MG-APINENE_Rxnfile_0.001.dat");
    }

    #[test]
    fn test_settings_roundtrip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.target_reactant, settings.target_reactant);
        assert_eq!(parsed.generation, settings.generation);
    }
}
