//! Pure serializer of the final mechanism: header comments, the
//! `SpeciesToAdd` registration block (species grouped six per line), the
//! `AddSpecies` directive and the formatted reaction blocks. No filtering
//! and no name rewriting happens here; everything arriving is already
//! canonical.

use std::io::Write;

pub const SPECIES_PER_LINE: usize = 6;

pub fn write_mech<W: Write>(
    out: &mut W,
    precursor: &str,
    min_yield: &str,
    compounds: &[String],
    reaction_blocks: &[String],
) -> Result<(), std::io::Error> {
    writeln!(out, "% MechGen derived {} explicit mechanism", precursor)?;
    writeln!(out, "% Default mechanism with MinYld={}", min_yield)?;

    writeln!(out, "SpeciesToAdd = {{...")?;
    for (chunk_idx, chunk) in compounds.chunks(SPECIES_PER_LINE).enumerate() {
        let line = chunk
            .iter()
            .map(|c| format!("'{}'", c))
            .collect::<Vec<_>>()
            .join("; ");
        if (chunk_idx + 1) * SPECIES_PER_LINE >= compounds.len() {
            writeln!(out, "{};}};", line)?;
        } else {
            writeln!(out, "{};...", line)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "AddSpecies")?;
    writeln!(out)?;

    writeln!(out, "% Reactions:")?;
    for block in reaction_blocks {
        writeln!(out, "{}\n", block)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("SP{}", i)).collect()
    }

    #[test]
    fn test_species_block_grouping() {
        let mut out: Vec<u8> = Vec::new();
        write_mech(&mut out, "ISOPRENE", "0.001", &species(8), &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("% MechGen derived ISOPRENE explicit mechanism\n"));
        assert!(text.contains("% Default mechanism with MinYld=0.001\n"));
        assert!(text.contains("SpeciesToAdd = {...\n"));
        // 8 species: a full line of 6 with the continuation marker, then
        // the final line with the closing brace
        assert!(text.contains("'SP1'; 'SP2'; 'SP3'; 'SP4'; 'SP5'; 'SP6';...\n"));
        assert!(text.contains("'SP7'; 'SP8';};\n"));
        assert!(text.contains("\nAddSpecies\n"));
    }

    #[test]
    fn test_species_block_exact_multiple() {
        let mut out: Vec<u8> = Vec::new();
        write_mech(&mut out, "APINENE", "0.01", &species(6), &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("'SP1'; 'SP2'; 'SP3'; 'SP4'; 'SP5'; 'SP6';};\n"));
        assert!(!text.contains(";...\n"));
    }

    #[test]
    fn test_reaction_blocks_separated() {
        let blocks = vec!["block one".to_string(), "block two".to_string()];
        let mut out: Vec<u8> = Vec::new();
        write_mech(&mut out, "ISOPRENE", "0.001", &species(1), &blocks).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("% Reactions:\nblock one\n\nblock two\n\n"));
    }
}
