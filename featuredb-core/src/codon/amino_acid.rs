use std::fmt;

/// An amino acid, identified by its single-letter symbol.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AminoAcid {
    symbol: char,
    abbreviation: &'static str,
    name: &'static str,
}

const AMINO_ACIDS: [AminoAcid; 22] = [
    AminoAcid::new('A', "Ala", "Alanine"),
    AminoAcid::new('R', "Arg", "Arginine"),
    AminoAcid::new('N', "Asn", "Asparagine"),
    AminoAcid::new('D', "Asp", "Aspartic acid"),
    AminoAcid::new('C', "Cys", "Cysteine"),
    AminoAcid::new('Q', "Gln", "Glutamine"),
    AminoAcid::new('E', "Glu", "Glutamic acid"),
    AminoAcid::new('G', "Gly", "Glycine"),
    AminoAcid::new('H', "His", "Histidine"),
    AminoAcid::new('I', "Ile", "Isoleucine"),
    AminoAcid::new('L', "Leu", "Leucine"),
    AminoAcid::new('K', "Lys", "Lysine"),
    AminoAcid::new('M', "Met", "Methionine"),
    AminoAcid::new('F', "Phe", "Phenylalanine"),
    AminoAcid::new('P', "Pro", "Proline"),
    AminoAcid::new('S', "Ser", "Serine"),
    AminoAcid::new('T', "Thr", "Threonine"),
    AminoAcid::new('W', "Trp", "Tryptophan"),
    AminoAcid::new('Y', "Tyr", "Tyrosine"),
    AminoAcid::new('V', "Val", "Valine"),
    AminoAcid::STOP,
    AminoAcid::UNKNOWN,
];

impl AminoAcid {
    /// A stop codon.
    pub const STOP: Self = Self::new('*', "Ter", "Stop");

    /// A codon that could not be translated, e.g., one containing an `N`.
    pub const UNKNOWN: Self = Self::new('X', "Xaa", "Unknown");

    const fn new(symbol: char, abbreviation: &'static str, name: &'static str) -> Self {
        Self {
            symbol,
            abbreviation,
            name,
        }
    }

    /// Looks up an amino acid by its single-letter symbol.
    ///
    /// Symbols are case-sensitive: `m` is not methionine.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        AMINO_ACIDS
            .iter()
            .find(|amino_acid| amino_acid.symbol == symbol)
            .copied()
    }

    /// Looks up an amino acid by its three-letter abbreviation, ignoring case.
    pub fn from_abbreviation(abbreviation: &str) -> Option<Self> {
        AMINO_ACIDS
            .iter()
            .find(|amino_acid| amino_acid.abbreviation.eq_ignore_ascii_case(abbreviation))
            .copied()
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn abbreviation(&self) -> &'static str {
        self.abbreviation
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_stop(&self) -> bool {
        self.symbol == Self::STOP.symbol
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation)
    }
}
