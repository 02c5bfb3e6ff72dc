mod lookup;
mod mutation;
mod search;

use std::{
    io::{self, Write},
    sync::Arc,
};

use featuredb_core::{BasicFeature, Feature, FeatureDb, InMemoryGenome};
use tracing::info;

pub use self::{lookup::lookup, mutation::mutation, search::search};
use crate::{annotations::read_features, cli::Source, fs};

fn build_db(source: &Source) -> anyhow::Result<FeatureDb<BasicFeature>> {
    let src = &source.annotations;
    let feature_type = &source.feature_type;

    info!(src = ?src, feature_type, "reading features");

    let mut reader = fs::open(src)?;
    let features = read_features(&mut reader, feature_type)?;

    info!(feature_count = features.len(), "read features");

    let db = FeatureDb::new();
    db.extend(features);

    if let Some(src) = &source.reference {
        info!(src = ?src, "reading reference sequences");

        let reader = fs::open(src)?;
        let genome = InMemoryGenome::read(reader)?;
        db.set_genome(Arc::new(genome));
    }

    Ok(db)
}

const DELIMITER: char = '\t';

fn write_feature<W>(writer: &mut W, feature: &BasicFeature) -> io::Result<()>
where
    W: Write,
{
    write!(
        writer,
        "{name}{DELIMITER}{chromosome}{DELIMITER}{start}{DELIMITER}{end}{DELIMITER}{strand}",
        name = feature.name(),
        chromosome = feature.chromosome(),
        start = feature.start(),
        end = feature.end(),
        strand = feature.strand(),
    )
}

fn write_features<W>(writer: &mut W, features: &[Arc<BasicFeature>]) -> io::Result<()>
where
    W: Write,
{
    for feature in features {
        write_feature(writer, feature)?;
        writeln!(writer)?;
    }

    Ok(())
}
