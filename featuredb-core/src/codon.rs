//! Codons and their translation.

mod amino_acid;
pub mod genetic_code;

pub use self::{amino_acid::AminoAcid, genetic_code::GeneticCode};

use crate::genome::Genome;

/// A translated codon of a coding feature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Codon {
    position: usize,
    genome_positions: [u64; 3],
    bases: [u8; 3],
    amino_acid: AminoAcid,
}

impl Codon {
    pub fn new(
        position: usize,
        genome_positions: [u64; 3],
        bases: [u8; 3],
        amino_acid: AminoAcid,
    ) -> Self {
        Self {
            position,
            genome_positions,
            bases,
            amino_acid,
        }
    }

    /// Returns the 1-based position of the codon in the protein.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the 0-based genomic positions of the three bases, in reading order.
    ///
    /// On the reverse strand, these are descending.
    pub fn genome_positions(&self) -> [u64; 3] {
        self.genome_positions
    }

    /// Returns the bases as read on the coding strand.
    pub fn bases(&self) -> [u8; 3] {
        self.bases
    }

    pub fn amino_acid(&self) -> AminoAcid {
        self.amino_acid
    }
}

/// A feature that encodes a protein.
pub trait CodonTranslatable {
    /// Translates the codon at the 1-based protein `position` using the reference sequence of
    /// `genome`.
    ///
    /// This returns `None` if the position lies outside the coding region or the genome lacks the
    /// sequence.
    fn codon(&self, genome: &dyn Genome, position: usize) -> Option<Codon>;
}
