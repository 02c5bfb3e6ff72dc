//! Reference sequence providers.

use std::io::{self, BufRead};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::info;

use crate::codon::{
    GeneticCode,
    genetic_code::{STANDARD, VERTEBRATE_MITOCHONDRIAL},
};

/// A reference genome.
pub trait Genome: Send + Sync {
    /// Returns the bases of `chromosome` in the 0-based, half-open interval `[start, end)`.
    fn sequence(&self, chromosome: &str, start: u64, end: u64) -> Option<Vec<u8>>;

    /// Returns the translation table used for coding features on `chromosome`.
    fn genetic_code(&self, chromosome: &str) -> &'static GeneticCode {
        if is_mitochondrial(chromosome) {
            &VERTEBRATE_MITOCHONDRIAL
        } else {
            &STANDARD
        }
    }
}

fn is_mitochondrial(chromosome: &str) -> bool {
    const NAMES: [&str; 4] = ["chrM", "chrMT", "MT", "M"];
    NAMES.iter().any(|name| name.eq_ignore_ascii_case(chromosome))
}

#[derive(Debug, Error)]
pub enum ReadGenomeError {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("invalid reference sequence name")]
    InvalidReferenceSequenceName,
    #[error("duplicate reference sequence name: {0}")]
    DuplicateReferenceSequenceName(String),
}

/// A genome whose reference sequences are held in memory.
///
/// Bases are stored upper-cased.
#[derive(Debug, Default)]
pub struct InMemoryGenome {
    reference_sequences: IndexMap<String, Vec<u8>>,
}

impl InMemoryGenome {
    /// Builds a genome from `(name, sequence)` pairs.
    ///
    /// A later sequence with the same name replaces an earlier one.
    pub fn from_sequences<I, N, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<[u8]>,
    {
        let reference_sequences = sequences
            .into_iter()
            .map(|(name, sequence)| (name.into(), sequence.as_ref().to_ascii_uppercase()))
            .collect();

        Self {
            reference_sequences,
        }
    }

    /// Reads a genome from FASTA.
    pub fn read<R>(reader: R) -> Result<Self, ReadGenomeError>
    where
        R: BufRead,
    {
        use noodles::fasta;

        let mut reader = fasta::io::Reader::new(reader);
        let mut reference_sequences = IndexMap::new();

        for result in reader.records() {
            let record = result?;

            let name = String::from_utf8(record.name().to_vec())
                .map_err(|_| ReadGenomeError::InvalidReferenceSequenceName)?;

            if reference_sequences.contains_key(&name) {
                return Err(ReadGenomeError::DuplicateReferenceSequenceName(name));
            }

            let sequence = record.sequence().as_ref().to_ascii_uppercase();
            reference_sequences.insert(name, sequence);
        }

        info!(
            reference_sequence_count = reference_sequences.len(),
            "read genome"
        );

        Ok(Self {
            reference_sequences,
        })
    }

    pub fn reference_sequence_names(&self) -> impl Iterator<Item = &str> {
        self.reference_sequences.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.reference_sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference_sequences.is_empty()
    }
}

impl Genome for InMemoryGenome {
    fn sequence(&self, chromosome: &str, start: u64, end: u64) -> Option<Vec<u8>> {
        let sequence = self.reference_sequences.get(chromosome)?;

        let start = usize::try_from(start).ok()?;
        let end = usize::try_from(end).ok()?;

        sequence.get(start..end).map(|bases| bases.to_vec())
    }
}
