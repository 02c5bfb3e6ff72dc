use std::sync::Arc;

use thiserror::Error;

use super::Snapshot;
use crate::{codon::Codon, features::Feature, genome::Genome};

#[derive(Debug, Eq, Error, PartialEq)]
pub enum MutationError {
    #[error("missing genome")]
    MissingGenome,
}

impl<F> Snapshot<F>
where
    F: Feature,
{
    /// Finds the features named `name`, ignoring case, whose codon at the 1-based protein
    /// `position` translates to the amino acid `symbol`.
    ///
    /// The symbol is a case-sensitive single-letter code. Features that do not encode a protein or
    /// whose coding region is shorter than `position` codons are excluded. Matches keep their
    /// index order.
    pub fn mutation(
        &self,
        genome: &dyn Genome,
        name: &str,
        position: usize,
        symbol: char,
    ) -> Vec<Arc<F>> {
        self.mutation_codons(genome, name, position, symbol)
            .into_iter()
            .map(|(feature, _)| feature)
            .collect()
    }

    /// Like [`Self::mutation`] but also returns the matched codons.
    pub fn mutation_codons(
        &self,
        genome: &dyn Genome,
        name: &str,
        position: usize,
        symbol: char,
    ) -> Vec<(Arc<F>, Codon)> {
        let Some(candidates) = self.bucket(name) else {
            return Vec::new();
        };

        candidates
            .iter()
            .filter_map(|feature| {
                let codon = feature.coding()?.codon(genome, position)?;

                if codon.amino_acid().symbol() == symbol {
                    Some((Arc::clone(feature), codon))
                } else {
                    None
                }
            })
            .collect()
    }
}
