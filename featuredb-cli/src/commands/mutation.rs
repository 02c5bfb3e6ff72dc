use std::{
    io::{self, BufWriter, Write},
    sync::Arc,
};

use featuredb_core::{BasicFeature, codon::Codon};
use tracing::info;

use super::{DELIMITER, build_db, write_feature};
use crate::cli::mutation;

pub fn mutation(args: mutation::Args) -> anyhow::Result<()> {
    let db = build_db(&args.source)?;

    let position = usize::try_from(args.position)?;
    let amino_acid = args.amino_acid;

    info!(
        name = %args.name,
        position,
        amino_acid = amino_acid.abbreviation(),
        "searching mutations"
    );

    let matches = db.mutation_codons(&args.name, position, amino_acid.symbol())?;

    info!(match_count = matches.len(), "found mutations");

    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);
    write_matches(&mut writer, &matches)?;

    Ok(())
}

fn write_matches<W>(writer: &mut W, matches: &[(Arc<BasicFeature>, Codon)]) -> io::Result<()>
where
    W: Write,
{
    for (feature, codon) in matches {
        write_feature(writer, feature)?;

        let [a, b, c] = codon.bases().map(char::from);
        let [start, ..] = codon.genome_positions();

        writeln!(
            writer,
            "{DELIMITER}{position}{DELIMITER}{start}{DELIMITER}{a}{b}{c}{DELIMITER}{amino_acid}",
            position = codon.position(),
            amino_acid = codon.amino_acid().symbol(),
        )?;
    }

    Ok(())
}
