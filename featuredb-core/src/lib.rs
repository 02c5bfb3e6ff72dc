//! An in-memory index of named genomic features.
//!
//! Features are looked up by name or name prefix, ignoring case, and coding features can be
//! searched by the amino acid they encode at a protein position.

pub mod codon;
pub mod db;
pub mod features;
pub mod genome;

pub use self::{
    db::{Config, DuplicatePolicy, FeatureDb, MutationError, Snapshot},
    features::{BasicFeature, Feature},
    genome::{Genome, InMemoryGenome},
};
