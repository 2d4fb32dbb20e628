//! Translation of one MechGen rate-law fragment into MATLAB-ready
//! expression text.
//!
//! Two encodings occur in practice:
//! 1) photolysis: `PF=<product name>` with an optional quantum yield
//!    `QY=<value>`; the result is the (canonicalized) product name, times
//!    the yield if present. The caller prefixes the literal `J` tag to mark
//!    the overall rate as photolytic.
//! 2) Arrhenius: 2 or 3 whitespace-separated tokens
//!    `A E [B]`; `E` is rescaled by the gas constant (kcal/(mol*K)) and
//!    the result is `A .* exp(E/R./T)` with an optional
//!    `.* (T./300).^B` temperature-exponent factor.
//!
//! A fragment that fits neither form is passed through unchanged; the
//! caller treats it as an opaque rate string.

use regex::Regex;

/// gas constant in kcal/(mol*K), sign folded in so that `E / R` lands
/// directly in the exponent
pub const GAS_CONSTANT: f64 = -0.001987204258640;
/// reference temperature in K for the temperature-exponent factor
pub const T_REF: f64 = 300.0;

/// Ordered accumulator of distinct photolysis product names, scoped to one
/// conversion run. Threaded explicitly through every `translate` call so
/// repeated runs stay independent.
#[derive(Debug, Clone, Default)]
pub struct PhotolysisNames {
    pub names: Vec<String>,
}

impl PhotolysisNames {
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// appends `name` unless already present; first-seen order is kept
    pub fn register(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }
}

/// outcome of translating one rate fragment
#[derive(Debug, Clone, PartialEq)]
pub enum RateExpression {
    /// symbolic photolysis rate (`name` or `name * yield`); the caller is
    /// responsible for the `J` prefix
    Photolysis(String),
    /// numeric Arrhenius expression
    Arrhenius(String),
    /// fragment that could not be parsed; original text, unmodified
    Opaque(String),
}

impl RateExpression {
    pub fn into_text(self) -> String {
        match self {
            RateExpression::Photolysis(s)
            | RateExpression::Arrhenius(s)
            | RateExpression::Opaque(s) => s,
        }
    }
}

/// Checks the fragment for the photolysis-product encoding and, if found,
/// registers the product name in the accumulator and returns the symbolic
/// rate. `C2CHOabs` is a historical alias of `C2CHO` in MechGen output.
fn handle_photolysis(value: &str, names_pf: &mut PhotolysisNames) -> Option<String> {
    if !value.contains("PF=") {
        return None;
    }
    let product_re = Regex::new(r"PF=([^\s]+)").unwrap();
    let yield_re = Regex::new(r"QY=([0-9\.eE\-]+)").unwrap();

    let product_match = product_re.captures(value)?;
    let mut product_name = product_match[1].replace('-', "_");
    if product_name == "C2CHOabs" {
        product_name = "C2CHO".to_string();
    }
    names_pf.register(&product_name);

    if let Some(yield_match) = yield_re.captures(value) {
        Some(format!("{} * {}", product_name, &yield_match[1]))
    } else {
        Some(product_name)
    }
}

/// Renders a float the way the rate tables are written: scientific
/// notation for very small or very large magnitudes, otherwise plain
/// decimal with a `.0` kept on integral values.
pub fn format_float(x: f64) -> String {
    if x == 0.0 {
        return "0.0".to_string();
    }
    let a = x.abs();
    if a >= 1e16 || a < 1e-4 {
        format!("{:e}", x)
    } else if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

/// Translates one raw rate fragment. The photolysis accumulator is
/// explicit run-scoped state; see `PhotolysisNames`.
pub fn translate(raw_rate: &str, names_pf: &mut PhotolysisNames) -> RateExpression {
    if let Some(symbolic) = handle_photolysis(raw_rate, names_pf) {
        return RateExpression::Photolysis(symbolic);
    }

    let parts: Vec<&str> = raw_rate.split_whitespace().collect();
    match parts.as_slice() {
        [a_tok, e_tok] => {
            let (Ok(a), Ok(e)) = (a_tok.parse::<f64>(), e_tok.parse::<f64>()) else {
                return RateExpression::Opaque(raw_rate.to_string());
            };
            RateExpression::Arrhenius(format!(
                "{} .* exp({:.4}./T)",
                format_float(a),
                e / GAS_CONSTANT
            ))
        }
        [a_tok, e_tok, b_tok] => {
            let (Ok(a), Ok(e)) = (a_tok.parse::<f64>(), e_tok.parse::<f64>()) else {
                return RateExpression::Opaque(raw_rate.to_string());
            };
            // B is kept as literal text, not parsed numerically
            RateExpression::Arrhenius(format!(
                "{} .* exp({:.4}./T) .* (T./{}).^{}",
                format_float(a),
                e / GAS_CONSTANT,
                T_REF,
                b_tok
            ))
        }
        _ => RateExpression::Opaque(raw_rate.to_string()),
    }
}
