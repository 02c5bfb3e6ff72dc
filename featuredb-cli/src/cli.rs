pub mod lookup;
pub mod mutation;
pub mod search;
mod source;

use clap::{Parser, Subcommand};

pub use self::source::Source;

#[derive(Subcommand)]
pub enum Command {
    /// Print the longest feature with the given name.
    Lookup(lookup::Args),
    /// Find features that encode an amino acid at a protein position.
    Mutation(mutation::Args),
    /// Find features by name prefix.
    Search(search::Args),
}

#[derive(Parser)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}
