use clap::Parser;

use super::Source;

#[derive(Parser)]
pub struct Args {
    #[command(flatten)]
    pub source: Source,

    /// Maximum number of features to print.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Print only the longest feature of each matching name.
    #[arg(long)]
    pub longest: bool,

    /// Feature name prefix. This is case-insensitive.
    pub prefix: String,
}
