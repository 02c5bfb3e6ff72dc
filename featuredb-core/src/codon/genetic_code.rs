use super::AminoAcid;

/// An NCBI translation table.
///
/// Amino acids are listed in the NCBI order, i.e., codons enumerated over the base order `TCAG`
/// with the first base varying slowest.
#[derive(Debug, Eq, PartialEq)]
pub struct GeneticCode {
    id: u8,
    name: &'static str,
    amino_acids: &'static [u8; 64],
}

/// NCBI translation table 1.
pub static STANDARD: GeneticCode = GeneticCode {
    id: 1,
    name: "Standard",
    amino_acids: b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
};

/// NCBI translation table 2.
pub static VERTEBRATE_MITOCHONDRIAL: GeneticCode = GeneticCode {
    id: 2,
    name: "Vertebrate Mitochondrial",
    amino_acids: b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
};

impl GeneticCode {
    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Translates a codon given on the coding strand.
    ///
    /// Bases are case-insensitive, and `U` is read as `T`. A codon with any other base translates
    /// to [`AminoAcid::UNKNOWN`].
    pub fn translate(&self, codon: [u8; 3]) -> AminoAcid {
        let mut i = 0;

        for base in codon {
            let Some(n) = base_index(base) else {
                return AminoAcid::UNKNOWN;
            };

            i = i * 4 + n;
        }

        let symbol = char::from(self.amino_acids[i]);
        AminoAcid::from_symbol(symbol).unwrap_or(AminoAcid::UNKNOWN)
    }
}

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Returns the complement of a base, preserving case. Unrecognized bases become `N`.
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' | b'u' => b'a',
        _ => b'N',
    }
}
