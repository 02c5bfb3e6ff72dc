use std::io::{self, BufWriter};

use tracing::warn;

use super::{build_db, write_features};
use crate::cli::lookup;

pub fn lookup(args: lookup::Args) -> anyhow::Result<()> {
    let db = build_db(&args.source)?;

    let Some(feature) = db.feature(&args.name) else {
        warn!(name = %args.name, "feature not found");
        return Ok(());
    };

    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);
    write_features(&mut writer, &[feature])?;

    Ok(())
}
