use std::io::{self, BufRead};

use featuredb_core::features::{BasicFeature, Exon, Strand};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

const ID: &str = "ID";
const PARENT: &str = "Parent";
const EXON: &str = "exon";
const CDS: &str = "CDS";

const NAME_KEYS: [&str; 2] = ["gene_name", "Name"];
const ALIAS_KEYS: [&str; 5] = ["Name", "gene_id", "transcript_id", "transcript_name", "Alias"];

#[derive(Debug, Error)]
pub enum ReadFeaturesError {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("missing attribute: {0}")]
    MissingAttribute(&'static str),
    #[error("invalid attribute: {0}")]
    InvalidAttribute(&'static str),
}

struct Transcript {
    name: String,
    chromosome: String,
    start: u64,
    end: u64,
    strand: Strand,
    attributes: Vec<(&'static str, String)>,
    exons: Vec<Exon>,
    coding_region: Option<(u64, u64)>,
}

enum PartKind {
    Exon,
    Cds,
}

struct Part {
    parent: String,
    kind: PartKind,
    start: u64,
    end: u64,
}

/// Reads transcripts of type `feature_type` from GFF3, together with their exons and coding
/// regions.
///
/// Exon and CDS records are attached to the transcript named by their `Parent` attribute.
pub fn read_features<R>(
    reader: &mut R,
    feature_type: &str,
) -> Result<Vec<BasicFeature>, ReadFeaturesError>
where
    R: BufRead,
{
    use noodles::gff::{self, record::attributes::field::Value};

    let mut transcripts: IndexMap<String, Transcript> = IndexMap::new();
    let mut parts = Vec::new();

    let mut reader = gff::io::Reader::new(reader);
    let mut line = gff::Line::default();

    while reader.read_line(&mut line)? != 0 {
        let Some(record) = line.as_record().transpose()? else {
            continue;
        };

        let ty = record.ty();

        let kind = if ty == feature_type {
            None
        } else if ty == EXON {
            Some(PartKind::Exon)
        } else if ty == CDS {
            Some(PartKind::Cds)
        } else {
            continue;
        };

        // GFF positions are 1-based and inclusive.
        let start = (usize::from(record.start()?) - 1) as u64;
        let end = usize::from(record.end()?) as u64;

        let attributes = record.attributes();

        let get = |key: &'static str| -> Result<Option<String>, ReadFeaturesError> {
            match attributes.get(key) {
                None => Ok(None),
                Some(result) => match result.map_err(|_| ReadFeaturesError::InvalidAttribute(key))? {
                    Value::String(s) => Ok(Some(s.to_string())),
                    Value::Array(_) => Err(ReadFeaturesError::InvalidAttribute(key)),
                },
            }
        };

        if let Some(kind) = kind {
            let Some(parent) = get(PARENT)? else {
                continue;
            };

            parts.push(Part {
                parent,
                kind,
                start,
                end,
            });

            continue;
        }

        let id = get(ID)?.ok_or(ReadFeaturesError::MissingAttribute(ID))?;

        let mut name = None;

        for key in NAME_KEYS {
            if let Some(value) = get(key)? {
                name = Some(value);
                break;
            }
        }

        let mut attributes = Vec::new();

        for key in ALIAS_KEYS {
            if let Some(value) = get(key)? {
                attributes.push((key, value));
            }
        }

        let strand = match record.strand()? {
            gff::feature::record::Strand::Forward => Strand::Forward,
            gff::feature::record::Strand::Reverse => Strand::Reverse,
            _ => Strand::Unknown,
        };

        let transcript = Transcript {
            name: name.unwrap_or_else(|| id.clone()),
            chromosome: record.reference_sequence_name().into(),
            start,
            end,
            strand,
            attributes,
            exons: Vec::new(),
            coding_region: None,
        };

        transcripts.insert(id, transcript);
    }

    for part in parts {
        let Some(transcript) = transcripts.get_mut(&part.parent) else {
            debug!(parent = %part.parent, "skipped part without transcript");
            continue;
        };

        match part.kind {
            PartKind::Exon => transcript.exons.push(Exon::new(part.start, part.end)),
            PartKind::Cds => {
                transcript.coding_region = match transcript.coding_region {
                    Some((start, end)) => Some((start.min(part.start), end.max(part.end))),
                    None => Some((part.start, part.end)),
                };
            }
        }
    }

    let features = transcripts
        .into_iter()
        .map(|(id, transcript)| build_feature(id, transcript))
        .collect();

    Ok(features)
}

fn build_feature(id: String, transcript: Transcript) -> BasicFeature {
    let mut builder = BasicFeature::builder(
        transcript.name,
        transcript.chromosome,
        transcript.start,
        transcript.end,
    )
    .set_identifier(id)
    .set_strand(transcript.strand)
    .set_exons(transcript.exons);

    if let Some((start, end)) = transcript.coding_region {
        builder = builder.set_coding_region(start, end);
    }

    for (key, value) in transcript.attributes {
        builder = builder.insert_attribute(key, value);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use featuredb_core::Feature;

    use super::*;

    #[test]
    fn test_read_features() -> Result<(), ReadFeaturesError> {
        const DATA: &[u8] = b"\
##gff-version 3
chr7\t.\tgene\t1\t80\t.\t+\t.\tID=g0;gene_name=EGFR
chr7\t.\tmRNA\t1\t80\t.\t+\t.\tID=t0;Parent=g0;gene_name=EGFR;transcript_name=EGFR-201
chr7\t.\texon\t1\t20\t.\t+\t.\tID=e0;Parent=t0
chr7\t.\texon\t41\t80\t.\t+\t.\tID=e1;Parent=t0
chr7\t.\tCDS\t11\t20\t.\t+\t0\tID=c0;Parent=t0
chr7\t.\tCDS\t41\t60\t.\t+\t2\tID=c0;Parent=t0
chr5\t.\tmRNA\t101\t130\t.\t-\t.\tID=t1;Name=EGFLAM-201
chr5\t.\texon\t101\t130\t.\t-\t.\tParent=t1
chr5\t.\texon\t1\t10\t.\t-\t.\tParent=t9
";

        let mut reader = DATA;
        let features = read_features(&mut reader, "mRNA")?;

        assert_eq!(features.len(), 2);

        let egfr = &features[0];
        assert_eq!(egfr.name(), "EGFR");
        assert_eq!(egfr.identifier(), Some("t0"));
        assert_eq!((egfr.start(), egfr.end()), (0, 80));
        assert_eq!(egfr.strand(), Strand::Forward);
        assert_eq!(egfr.exons(), [Exon::new(0, 20), Exon::new(40, 80)]);
        assert_eq!(egfr.coding_region(), Some((10, 60)));
        assert_eq!(egfr.aliases(), ["EGFR-201"]);

        let egflam = &features[1];
        assert_eq!(egflam.name(), "EGFLAM-201");
        assert_eq!(egflam.strand(), Strand::Reverse);
        assert_eq!(egflam.exons(), [Exon::new(100, 130)]);
        assert!(egflam.coding_region().is_none());

        Ok(())
    }

    #[test]
    fn test_read_features_with_missing_id() {
        const DATA: &[u8] = b"chr7\t.\tmRNA\t1\t80\t.\t+\t.\tName=EGFR\n";

        let mut reader = DATA;

        assert!(matches!(
            read_features(&mut reader, "mRNA"),
            Err(ReadFeaturesError::MissingAttribute(ID))
        ));
    }
}
