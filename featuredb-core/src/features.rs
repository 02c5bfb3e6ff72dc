//! Named genomic features.

mod basic_feature;
mod strand;

pub use self::{
    basic_feature::{BasicFeature, Builder, Exon},
    strand::Strand,
};

use crate::codon::CodonTranslatable;

/// The placeholder name used by annotation formats for unnamed features.
const MISSING_NAME: &str = ".";

/// A named genomic interval.
///
/// Coordinates are 0-based and half-open.
pub trait Feature: Send + Sync {
    fn name(&self) -> &str;

    fn chromosome(&self) -> &str;

    fn start(&self) -> u64;

    fn end(&self) -> u64;

    fn strand(&self) -> Strand {
        Strand::Unknown
    }

    fn length(&self) -> u64 {
        self.end().saturating_sub(self.start())
    }

    /// Returns a stable identifier, e.g., a transcript accession.
    fn identifier(&self) -> Option<&str> {
        None
    }

    /// Returns alternate names, e.g., attribute values.
    fn aliases(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Returns the coding capability of this feature, if it has one.
    fn coding(&self) -> Option<&dyn CodonTranslatable> {
        None
    }
}

/// Normalizes a feature name to the form used as an index key.
///
/// Names are trimmed and upper-cased. Both insertion and lookup go through this, which is what
/// makes lookups case-insensitive.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Normalizes a search prefix to match against index keys.
///
/// Unlike [`canonical_name`], the prefix is not trimmed, so every matching key starts with it.
pub(crate) fn canonical_prefix(prefix: &str) -> String {
    prefix.to_uppercase()
}

/// Returns whether `name` can be used as an index key.
pub(crate) fn is_indexable(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name != MISSING_NAME
}
