use clap::Parser;
use featuredb_core::codon::AminoAcid;

use super::Source;

#[derive(Parser)]
pub struct Args {
    #[command(flatten)]
    pub source: Source,

    /// Feature name. This is case-insensitive.
    pub name: String,

    /// 1-based protein position.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub position: u32,

    /// Amino acid, as a single-letter symbol (e.g., `M`) or three-letter abbreviation (e.g.,
    /// `Met`).
    #[arg(value_parser = parse_amino_acid)]
    pub amino_acid: AminoAcid,
}

fn parse_amino_acid(s: &str) -> Result<AminoAcid, String> {
    let mut chars = s.chars();

    let amino_acid = match (chars.next(), chars.next()) {
        (Some(symbol), None) => AminoAcid::from_symbol(symbol),
        _ => AminoAcid::from_abbreviation(s),
    };

    amino_acid.ok_or_else(|| format!("invalid amino acid: {s}"))
}
