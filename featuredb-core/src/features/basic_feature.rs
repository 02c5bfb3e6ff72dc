use indexmap::IndexMap;

use super::{Feature, Strand};
use crate::{
    codon::{Codon, CodonTranslatable, genetic_code::complement},
    genome::Genome,
};

/// An exon, as a 0-based, half-open interval.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Exon {
    pub start: u64,
    pub end: u64,
}

impl Exon {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// A gene or transcript annotation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasicFeature {
    name: String,
    identifier: Option<String>,
    chromosome: String,
    start: u64,
    end: u64,
    strand: Strand,
    exons: Vec<Exon>,
    coding_region: Option<(u64, u64)>,
    attributes: IndexMap<String, String>,
}

impl BasicFeature {
    pub fn new<N, C>(name: N, chromosome: C, start: u64, end: u64) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        Self::builder(name, chromosome, start, end).build()
    }

    pub fn builder<N, C>(name: N, chromosome: C, start: u64, end: u64) -> Builder
    where
        N: Into<String>,
        C: Into<String>,
    {
        Builder {
            name: name.into(),
            identifier: None,
            chromosome: chromosome.into(),
            start,
            end,
            strand: Strand::default(),
            exons: Vec::new(),
            coding_region: None,
            attributes: IndexMap::new(),
        }
    }

    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    /// Returns the coding bounds `[start, end)`, if the feature encodes a protein.
    pub fn coding_region(&self) -> Option<(u64, u64)> {
        self.coding_region
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Returns the exonic parts of the coding region in ascending genomic order.
    fn coding_segments(&self, coding_start: u64, coding_end: u64) -> Vec<Exon> {
        let whole = [Exon::new(self.start, self.end)];

        let exons = if self.exons.is_empty() {
            &whole[..]
        } else {
            &self.exons[..]
        };

        exons
            .iter()
            .map(|exon| Exon::new(exon.start.max(coding_start), exon.end.min(coding_end)))
            .filter(|segment| segment.start < segment.end)
            .collect()
    }

    /// Maps an offset into the coding sequence, read 5' to 3', to a genomic position.
    fn genome_position(&self, segments: &[Exon], mut offset: u64) -> Option<u64> {
        let mut locate = |segment: &Exon| {
            let length = segment.length();

            if offset < length {
                Some(offset)
            } else {
                offset -= length;
                None
            }
        };

        if self.strand == Strand::Reverse {
            segments
                .iter()
                .rev()
                .find_map(|segment| locate(segment).map(|n| segment.end - 1 - n))
        } else {
            segments
                .iter()
                .find_map(|segment| locate(segment).map(|n| segment.start + n))
        }
    }
}

impl Feature for BasicFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn chromosome(&self) -> &str {
        &self.chromosome
    }

    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> u64 {
        self.end
    }

    fn strand(&self) -> Strand {
        self.strand
    }

    fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    fn aliases(&self) -> Vec<&str> {
        self.attributes.values().map(|value| value.as_str()).collect()
    }

    fn coding(&self) -> Option<&dyn CodonTranslatable> {
        self.coding_region.map(|_| self as &dyn CodonTranslatable)
    }
}

impl CodonTranslatable for BasicFeature {
    fn codon(&self, genome: &dyn Genome, position: usize) -> Option<Codon> {
        let (coding_start, coding_end) = self.coding_region?;
        let segments = self.coding_segments(coding_start, coding_end);

        let offset = u64::try_from(position)
            .ok()?
            .checked_sub(1)?
            .checked_mul(3)?;

        let mut genome_positions = [0; 3];

        for (i, genome_position) in (0..).zip(genome_positions.iter_mut()) {
            *genome_position = self.genome_position(&segments, offset + i)?;
        }

        let mut bases = [0; 3];

        for (base, &genome_position) in bases.iter_mut().zip(&genome_positions) {
            let sequence = genome.sequence(&self.chromosome, genome_position, genome_position + 1)?;
            let b = sequence.first()?.to_ascii_uppercase();

            *base = if self.strand == Strand::Reverse {
                complement(b)
            } else {
                b
            };
        }

        let amino_acid = genome.genetic_code(&self.chromosome).translate(bases);

        Some(Codon::new(position, genome_positions, bases, amino_acid))
    }
}

/// A [`BasicFeature`] builder.
#[derive(Debug)]
pub struct Builder {
    name: String,
    identifier: Option<String>,
    chromosome: String,
    start: u64,
    end: u64,
    strand: Strand,
    exons: Vec<Exon>,
    coding_region: Option<(u64, u64)>,
    attributes: IndexMap<String, String>,
}

impl Builder {
    pub fn set_identifier<I>(mut self, identifier: I) -> Self
    where
        I: Into<String>,
    {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn set_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    pub fn add_exon(mut self, exon: Exon) -> Self {
        self.exons.push(exon);
        self
    }

    pub fn set_exons(mut self, exons: Vec<Exon>) -> Self {
        self.exons = exons;
        self
    }

    pub fn set_coding_region(mut self, start: u64, end: u64) -> Self {
        self.coding_region = Some((start, end));
        self
    }

    pub fn insert_attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builds the feature.
    ///
    /// Exons are sorted by position, and an `end` before `start` is raised to `start`.
    pub fn build(mut self) -> BasicFeature {
        self.exons.sort_unstable();

        BasicFeature {
            name: self.name,
            identifier: self.identifier,
            chromosome: self.chromosome,
            start: self.start,
            end: self.end.max(self.start),
            strand: self.strand,
            exons: self.exons,
            coding_region: self.coding_region,
            attributes: self.attributes,
        }
    }
}
