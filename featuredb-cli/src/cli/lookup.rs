use clap::Parser;

use super::Source;

#[derive(Parser)]
pub struct Args {
    #[command(flatten)]
    pub source: Source,

    /// Feature name. This is case-insensitive.
    pub name: String,
}
