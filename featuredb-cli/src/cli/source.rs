use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct Source {
    /// Input annotations file (GFF3). This may be gzipped.
    #[arg(long)]
    pub annotations: PathBuf,

    /// Feature type of transcripts.
    #[arg(long, default_value = "mRNA")]
    pub feature_type: String,

    /// Input reference sequences (FASTA). This may be gzipped.
    ///
    /// This is required for mutation searches.
    #[arg(long)]
    pub reference: Option<PathBuf>,
}
