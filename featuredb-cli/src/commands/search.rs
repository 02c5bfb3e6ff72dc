use std::io::{self, BufWriter};

use tracing::info;

use super::{build_db, write_features};
use crate::cli::search;

pub fn search(args: search::Args) -> anyhow::Result<()> {
    let db = build_db(&args.source)?;

    let features = if args.longest {
        db.longest_features(&args.prefix, args.limit)
    } else {
        db.features_list(&args.prefix, args.limit)
    };

    info!(prefix = %args.prefix, feature_count = features.len(), "found features");

    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);
    write_features(&mut writer, &features)?;

    Ok(())
}
