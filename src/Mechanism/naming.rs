/// The project keeps a single table of identifier corrections. MechGen
/// species names are not always legal MATLAB variable names (a name may
/// start with a digit, and the counter species `RO2`/`RCO3` collide with
/// F0AM built-ins), so every identifier is canonicalized once, at the
/// point it is first read. Hyphens are normalized to underscores in the
/// same pass.
use regex::Regex;

/// default correction table: MechGen name -> MATLAB-safe name
pub const DEFAULT_NAME_RULES: [(&str, &str); 6] = [
    ("RO2", "SumRO2"),
    ("RCO3", "SumRCO3"),
    ("2M2C5E4O", "TM2C5E4O"),
    ("4OX2PEAL", "FOX2PEAL"),
    ("3M_FURAN", "M3FURAN"),
    ("2MBUTDAL", "M2BUTDAL"),
];

/// naming-rule table applied to every identifier entering the pipeline
#[derive(Debug, Clone)]
pub struct NameRules {
    pub rules: Vec<(String, String)>,
}

impl Default for NameRules {
    fn default() -> Self {
        NameRules::new()
    }
}

impl NameRules {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_NAME_RULES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// extends the default table with user-supplied replacement pairs
    pub fn with_extra(extra: &[(String, String)]) -> Self {
        let mut table = NameRules::new();
        for (from, to) in extra {
            table.rules.push((from.clone(), to.clone()));
        }
        table
    }

    /// canonical form of a single identifier: hyphens -> underscores,
    /// then an exact-match lookup in the rule table
    pub fn canonical_name(&self, raw: &str) -> String {
        let name = raw.replace('-', "_");
        for (from, to) in &self.rules {
            if &name == from {
                return to.clone();
            }
        }
        name
    }

    /// canonical form of a whole equation: hyphens -> underscores, then
    /// each rule applied as a whole-word replacement so that e.g. `RO2`
    /// inside `ISOPRENErO2_4` is left alone
    pub fn canonicalize_equation(&self, raw: &str) -> String {
        let mut eqn = raw.replace('-', "_");
        for (from, to) in &self.rules {
            let pattern = format!(r"\b{}\b", regex::escape(from));
            let re = Regex::new(&pattern).unwrap();
            eqn = re.replace_all(&eqn, to.as_str()).into_owned();
        }
        eqn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_table() {
        let rules = NameRules::new();
        assert_eq!(rules.canonical_name("RO2"), "SumRO2");
        assert_eq!(rules.canonical_name("RCO3"), "SumRCO3");
        assert_eq!(rules.canonical_name("2M2C5E4O"), "TM2C5E4O");
        assert_eq!(rules.canonical_name("ISOPRENE"), "ISOPRENE");
    }

    #[test]
    fn test_canonical_name_hyphens() {
        let rules = NameRules::new();
        assert_eq!(rules.canonical_name("CH3_CO_O2"), "CH3_CO_O2");
        assert_eq!(rules.canonical_name("CH3-CO-O2"), "CH3_CO_O2");
        // hyphen normalization happens before the table lookup
        assert_eq!(rules.canonical_name("3M-FURAN"), "M3FURAN");
    }

    #[test]
    fn test_canonicalize_equation_whole_word_only() {
        let rules = NameRules::new();
        assert_eq!(
            rules.canonicalize_equation("RO2 + NO = RO2_PROD"),
            "SumRO2 + NO = RO2_PROD"
        );
        // RO2 embedded in a longer identifier must not be rewritten
        assert_eq!(
            rules.canonicalize_equation("ISOPRENErO2_4 + HO2 = PROD"),
            "ISOPRENErO2_4 + HO2 = PROD"
        );
    }

    #[test]
    fn test_extra_rules() {
        let rules = NameRules::with_extra(&[("5HEXEN".to_string(), "FIVEHEXEN".to_string())]);
        assert_eq!(rules.canonical_name("5HEXEN"), "FIVEHEXEN");
        assert_eq!(rules.canonical_name("RO2"), "SumRO2");
    }
}
