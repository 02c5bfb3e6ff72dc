//! The feature index.
//!
//! [`FeatureDb`] maps canonical feature names to features ordered by descending length, then
//! ascending start. Each generation of the index is an immutable [`Snapshot`]. Readers take a
//! snapshot and query it without holding a lock; [`FeatureDb::clear`] swaps in an empty
//! generation, and adds copy the current generation if a reader still holds it. A query therefore
//! observes exactly one generation.

mod mutation;
mod snapshot;

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use indexmap::IndexSet;
use tracing::{debug, info};

pub use self::{mutation::MutationError, snapshot::Snapshot};
use crate::{
    codon::Codon,
    features::{Feature, canonical_name, is_indexable},
    genome::Genome,
};

/// The rule that decides whether two entries describe the same feature.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DuplicatePolicy {
    /// Entries with equal start and length are duplicates.
    #[default]
    Coordinates,
    /// Entries with equal chromosome, start, and length are duplicates.
    Locus,
}

impl DuplicatePolicy {
    /// Orders features by descending length, then ascending start.
    ///
    /// Features that compare equal are duplicates under this policy.
    pub fn compare<F>(self, a: &F, b: &F) -> Ordering
    where
        F: Feature + ?Sized,
    {
        let ordering = b
            .length()
            .cmp(&a.length())
            .then_with(|| a.start().cmp(&b.start()));

        match self {
            Self::Coordinates => ordering,
            Self::Locus => ordering.then_with(|| a.chromosome().cmp(b.chromosome())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Duplicate detection, for both insertion and list retrieval.
    pub duplicates: DuplicatePolicy,
    /// Aliases at least this long are not indexed. `0` disables alias indexing.
    pub alias_max_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            alias_max_len: 20,
        }
    }
}

// Buckets are shared between generations and copied only when written.
pub(crate) struct Index<F> {
    buckets: BTreeMap<String, Arc<Vec<Arc<F>>>>,
    len: usize,
}

impl<F> Default for Index<F> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<F> Clone for Index<F> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
        }
    }
}

impl<F> Index<F>
where
    F: Feature,
{
    fn insert(&mut self, key: String, feature: Arc<F>, duplicates: DuplicatePolicy) -> bool {
        let bucket = Arc::make_mut(self.buckets.entry(key).or_default());

        match bucket.binary_search_by(|probe| duplicates.compare(&**probe, &*feature)) {
            Ok(_) => false,
            Err(i) => {
                bucket.insert(i, feature);
                self.len += 1;
                true
            }
        }
    }
}

/// An in-memory index of named features.
pub struct FeatureDb<F> {
    config: Config,
    index: RwLock<Arc<Index<F>>>,
    genome: RwLock<Option<Arc<dyn Genome>>>,
}

impl<F> FeatureDb<F>
where
    F: Feature,
{
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            index: RwLock::new(Arc::default()),
            genome: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers the genome used for codon translation, replacing any previous one.
    pub fn set_genome(&self, genome: Arc<dyn Genome>) {
        *write(&self.genome) = Some(genome);
        info!("registered genome");
    }

    pub fn genome(&self) -> Option<Arc<dyn Genome>> {
        read(&self.genome).clone()
    }

    /// Indexes a feature under its name, its identifier, and its short aliases.
    ///
    /// Under a given key, a feature that duplicates an existing entry is not stored. This returns
    /// whether the feature was stored under at least one key.
    ///
    /// If a reader holds a snapshot, the key map is copied once and only the touched buckets are
    /// copied. Bulk loads should go through [`Self::extend`], which pays that cost once per batch.
    pub fn add(&self, feature: F) -> bool {
        let mut index = write(&self.index);
        self.insert(Arc::make_mut(&mut index), feature)
    }

    /// Indexes many features while holding the write lock once.
    ///
    /// This returns the number of features stored under at least one key.
    pub fn extend<I>(&self, features: I) -> usize
    where
        I: IntoIterator<Item = F>,
    {
        let mut index = write(&self.index);
        let index = Arc::make_mut(&mut index);

        let mut feature_count = 0;

        for feature in features {
            if self.insert(index, feature) {
                feature_count += 1;
            }
        }

        info!(feature_count, entry_count = index.len, "indexed features");

        feature_count
    }

    fn insert(&self, index: &mut Index<F>, feature: F) -> bool {
        let keys = self.keys(&feature);

        if keys.is_empty() {
            debug!(
                chromosome = feature.chromosome(),
                start = feature.start(),
                "skipped unnamed feature"
            );

            return false;
        }

        let feature = Arc::new(feature);
        let mut is_stored = false;

        for key in keys {
            if index.insert(key.clone(), feature.clone(), self.config.duplicates) {
                is_stored = true;
            } else {
                debug!(
                    %key,
                    start = feature.start(),
                    end = feature.end(),
                    "skipped duplicate feature"
                );
            }
        }

        is_stored
    }

    fn keys(&self, feature: &F) -> IndexSet<String> {
        let alias_max_len = self.config.alias_max_len;

        let aliases = feature
            .aliases()
            .into_iter()
            .filter(|alias| alias.trim().len() < alias_max_len);

        [feature.name()]
            .into_iter()
            .chain(feature.identifier())
            .chain(aliases)
            .filter(|name| is_indexable(name))
            .map(canonical_name)
            .collect()
    }

    /// Replaces the index with an empty one.
    ///
    /// Snapshots taken before the clear are unaffected.
    pub fn clear(&self) {
        let previous = std::mem::take(&mut *write(&self.index));
        info!(entry_count = previous.len, "cleared feature index");
    }

    /// Returns the current generation of the index.
    pub fn snapshot(&self) -> Snapshot<F> {
        let index = read(&self.index).clone();
        Snapshot::new(index, self.config.duplicates)
    }

    /// Returns the number of entries, summed over all keys.
    pub fn len(&self) -> usize {
        read(&self.index).len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// See [`Snapshot::feature`].
    pub fn feature(&self, name: &str) -> Option<Arc<F>> {
        self.snapshot().feature(name)
    }

    /// See [`Snapshot::features`].
    pub fn features(&self, name: &str) -> Vec<Arc<F>> {
        self.snapshot().features(name)
    }

    /// See [`Snapshot::features_list`].
    pub fn features_list(&self, prefix: &str, limit: usize) -> Vec<Arc<F>> {
        self.snapshot().features_list(prefix, limit)
    }

    /// See [`Snapshot::features_map`].
    pub fn features_map(&self, prefix: &str) -> BTreeMap<String, Vec<Arc<F>>> {
        self.snapshot().features_map(prefix)
    }

    /// See [`Snapshot::longest_features`].
    pub fn longest_features(&self, prefix: &str, limit: usize) -> Vec<Arc<F>> {
        self.snapshot().longest_features(prefix, limit)
    }

    /// Finds the features named `name` whose codon at the 1-based protein `position` translates
    /// to the amino acid `symbol`, using the registered genome.
    ///
    /// This fails if no genome is registered. See [`Snapshot::mutation`].
    pub fn mutation(
        &self,
        name: &str,
        position: usize,
        symbol: char,
    ) -> Result<Vec<Arc<F>>, MutationError> {
        let genome = self.genome().ok_or(MutationError::MissingGenome)?;
        Ok(self.snapshot().mutation(&*genome, name, position, symbol))
    }

    /// Like [`Self::mutation`] but also returns the matched codons.
    pub fn mutation_codons(
        &self,
        name: &str,
        position: usize,
        symbol: char,
    ) -> Result<Vec<(Arc<F>, Codon)>, MutationError> {
        let genome = self.genome().ok_or(MutationError::MissingGenome)?;
        Ok(self
            .snapshot()
            .mutation_codons(&*genome, name, position, symbol))
    }
}

impl<F> Default for FeatureDb<F>
where
    F: Feature,
{
    fn default() -> Self {
        Self::new()
    }
}

// Index state is replaced wholesale, never left half-written, so a poisoned lock still guards a
// consistent value.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::features::BasicFeature;

    const PREFIX: &str = "ABC";
    const DISTINCT_FEATURE_COUNT: usize = 50;
    const LARGE: usize = 500;

    // Each feature is indexed under its name, its identifier, and 8 aliases.
    fn build_db() -> FeatureDb<BasicFeature> {
        let db = FeatureDb::new();

        let features = (0..DISTINCT_FEATURE_COUNT as u64).map(|i| {
            let start = 1000 * i;
            let end = start + 100 + i;

            (0..8)
                .fold(
                    BasicFeature::builder(format!("ABC{i}"), "chr1", start, end)
                        .set_identifier(format!("ABC{i}.1")),
                    |builder, j| builder.insert_attribute(format!("alias{j}"), format!("abc{i}-20{j}")),
                )
                .build()
        });

        db.extend(features);
        db.add(BasicFeature::new("XYZ1", "chr2", 0, 10));

        db
    }

    #[test]
    fn test_len() {
        let db = build_db();
        assert_eq!(db.len(), LARGE + 1);

        assert!(!db.add(BasicFeature::new("abc7", "chr1", 7000, 7107)));
        assert_eq!(db.len(), LARGE + 1);
    }

    #[test]
    fn test_feature() {
        let db = FeatureDb::new();
        db.add(BasicFeature::new("EGFR", "chr7", 100, 200));
        db.add(BasicFeature::new("EGFR", "chr7", 50, 300));
        db.add(BasicFeature::new("EGFR", "chr7", 10, 260));

        let feature = db.feature(" egfr ");
        assert_eq!(feature.map(|f| (f.start(), f.end())), Some((10, 260)));

        db.add(BasicFeature::new("EGFR", "chr7", 20, 400));
        let feature = db.feature("EGFR");
        assert_eq!(feature.map(|f| (f.start(), f.end())), Some((20, 400)));

        assert!(db.feature("EGF").is_none());
        assert!(db.feature("").is_none());
    }

    #[test]
    fn test_features_list() {
        let db = build_db();

        let features = db.features_list("abc", 3);
        let names: Vec<_> = features.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["ABC49", "ABC48", "ABC47"]);

        let features = db.features_list(PREFIX, LARGE);
        assert_eq!(features.len(), DISTINCT_FEATURE_COUNT);

        for feature in &features {
            assert!(feature.name().starts_with(PREFIX));
            assert!(db.feature(feature.name()).is_some());
        }

        assert!(db.features_list(PREFIX, 0).is_empty());
        assert!(db.features_list("ABD", LARGE).is_empty());
        assert_eq!(db.features_list("", LARGE).len(), DISTINCT_FEATURE_COUNT + 1);
    }

    #[test]
    fn test_features_list_is_ordered() {
        let db = FeatureDb::new();
        db.add(BasicFeature::new("EG1", "chr1", 30, 40));
        db.add(BasicFeature::new("EG2", "chr1", 10, 20));
        db.add(BasicFeature::new("EG3", "chr1", 0, 50));
        db.add(BasicFeature::new("EG1", "chr1", 10, 20));

        let features = db.features_list("EG", 10);
        let coordinates: Vec<_> = features.iter().map(|f| (f.start(), f.end())).collect();
        assert_eq!(coordinates, [(0, 50), (10, 20), (30, 40)]);
    }

    #[test]
    fn test_features_list_with_locus_policy() {
        let db = FeatureDb::with_config(Config {
            duplicates: DuplicatePolicy::Locus,
            ..Default::default()
        });

        db.add(BasicFeature::new("EGFR", "chr7", 0, 10));
        db.add(BasicFeature::new("EGFR", "chr8", 0, 10));
        db.add(BasicFeature::new("EGFR", "chr8", 0, 10));

        assert_eq!(db.len(), 2);
        assert_eq!(db.features_list("EGFR", 10).len(), 2);
    }

    #[test]
    fn test_features_map() {
        let db = build_db();

        let features = db.features_map(PREFIX);
        assert_eq!(features.len(), LARGE);

        for (name, bucket) in &features {
            assert!(name.starts_with(PREFIX));
            assert!(!bucket.is_empty());
        }

        let features = db.features_map("abc12-2");
        let names: Vec<_> = features.keys().map(|name| name.as_str()).collect();
        assert_eq!(
            names,
            [
                "ABC12-200",
                "ABC12-201",
                "ABC12-202",
                "ABC12-203",
                "ABC12-204",
                "ABC12-205",
                "ABC12-206",
                "ABC12-207"
            ]
        );
    }

    #[test]
    fn test_features_map_with_untrimmed_prefix() {
        let db = FeatureDb::new();
        db.add(BasicFeature::new("ABC1", "chr1", 0, 10));
        db.add(BasicFeature::new("ABC DEF", "chr1", 20, 40));

        for prefix in ["abc ", " abc", "ABC D"] {
            let features = db.features_map(prefix);

            for name in features.keys() {
                assert!(name.starts_with(&prefix.to_uppercase()));
            }
        }

        let names: Vec<_> = db.features_map("abc ").into_keys().collect();
        assert_eq!(names, ["ABC DEF"]);

        let features = db.features_list("abc ", 10);
        let names: Vec<_> = features.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["ABC DEF"]);

        assert!(db.features_map(" abc").is_empty());
        assert!(db.longest_features(" abc", 10).is_empty());
        assert_eq!(db.features_map("abc").len(), 2);
    }

    #[test]
    fn test_non_ascii_names() {
        let db = FeatureDb::new();
        db.add(BasicFeature::new("Gène1", "chr1", 0, 10));

        assert!(db.feature("GÈNE1").is_some());
        assert!(db.feature("gène1").is_some());
        assert_eq!(db.features_map("gè").len(), 1);
    }

    #[test]
    fn test_add_with_held_snapshot() {
        let db = FeatureDb::new();
        db.add(BasicFeature::new("EGFR", "chr7", 0, 10));
        db.add(BasicFeature::new("ERBB2", "chr17", 0, 10));

        let snapshot = db.snapshot();
        db.add(BasicFeature::new("EGFR", "chr7", 0, 20));

        assert_eq!(snapshot.features("EGFR").len(), 1);
        assert_eq!(db.features("EGFR").len(), 2);

        let held = snapshot.features("ERBB2");
        let current = db.features("ERBB2");
        assert!(Arc::ptr_eq(&held[0], &current[0]));
    }

    #[test]
    fn test_features_map_entries_are_distinct_and_ordered() {
        let db = FeatureDb::new();

        for (start, end) in [(10, 20), (0, 30), (5, 15), (10, 20), (0, 10), (5, 15)] {
            db.add(BasicFeature::new("EGFLAM", "chr5", start, end));
        }

        db.add(BasicFeature::new("EGFR", "chr7", 0, 10));

        let features = db.features_map("EG");
        assert_eq!(features.len(), 2);

        for bucket in features.values() {
            for pair in bucket.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                assert!(a.length() >= b.length());
                assert!(a.length() != b.length() || a.start() < b.start());
            }
        }

        let coordinates: Vec<_> = features["EGFLAM"]
            .iter()
            .map(|f| (f.start(), f.end()))
            .collect();
        assert_eq!(coordinates, [(0, 30), (0, 10), (5, 15), (10, 20)]);
    }

    #[test]
    fn test_longest_features() {
        let db = FeatureDb::new();
        db.add(BasicFeature::new("EGFR", "chr7", 0, 10));
        db.add(BasicFeature::new("EGFR", "chr7", 0, 20));
        db.add(BasicFeature::new("EGFLAM", "chr5", 0, 5));
        db.add(BasicFeature::new("ERBB2", "chr17", 0, 5));

        let features = db.longest_features("eg", 10);
        let actual: Vec<_> = features.iter().map(|f| (f.name(), f.length())).collect();
        assert_eq!(actual, [("EGFLAM", 5), ("EGFR", 20)]);

        assert_eq!(db.longest_features("E", 1).len(), 1);
    }

    #[test]
    fn test_aliases() {
        let db = FeatureDb::new();

        db.add(
            BasicFeature::builder("EGFR", "chr7", 0, 10)
                .set_identifier("ENST00000275493")
                .insert_attribute("gene_id", "ENSG00000146648")
                .insert_attribute("description", "epidermal growth factor receptor")
                .insert_attribute("Alias", "egfr")
                .build(),
        );

        assert_eq!(db.len(), 3);
        assert!(db.feature("enst00000275493").is_some());
        assert!(db.feature("ENSG00000146648").is_some());
        assert!(db.feature("epidermal growth factor receptor").is_none());

        let db = FeatureDb::with_config(Config {
            alias_max_len: 0,
            ..Default::default()
        });

        db.add(
            BasicFeature::builder("EGFR", "chr7", 0, 10)
                .insert_attribute("gene_id", "ENSG00000146648")
                .build(),
        );

        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_add_unnamed_feature() {
        let db = FeatureDb::new();
        assert!(!db.add(BasicFeature::new(".", "chr1", 0, 10)));
        assert!(!db.add(BasicFeature::new("", "chr1", 0, 10)));
        assert!(db.is_empty());
    }

    #[test]
    fn test_clear() {
        let db = build_db();

        let snapshot = db.snapshot();
        db.clear();

        assert!(db.is_empty());
        assert!(db.features_list(PREFIX, LARGE).is_empty());
        assert!(db.features_map(PREFIX).is_empty());
        assert!(db.feature("ABC1").is_none());

        assert_eq!(snapshot.len(), LARGE + 1);
        assert_eq!(snapshot.features_list(PREFIX, LARGE).len(), DISTINCT_FEATURE_COUNT);

        db.add(BasicFeature::new("ABC1", "chr1", 0, 10));
        assert_eq!(db.len(), 1);
        assert_eq!(snapshot.len(), LARGE + 1);
    }

    #[test]
    fn test_read_while_clearing() {
        let db = build_db();
        let expected = db.features_list(PREFIX, LARGE).len();

        thread::scope(|scope| {
            let reader = scope.spawn(|| {
                for _ in 0..100 {
                    let features = db.features_list(PREFIX, LARGE);

                    for feature in &features {
                        assert!(feature.name().starts_with(PREFIX));
                    }

                    assert!(features.len() == expected || features.is_empty());
                }
            });

            let writer = scope.spawn(|| db.clear());

            writer.join().unwrap();
            reader.join().unwrap();
        });

        assert!(db.features_list(PREFIX, LARGE).is_empty());
    }

    #[test]
    fn test_add_while_clearing() {
        let db = FeatureDb::new();

        thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200 {
                    db.add(BasicFeature::new("EGFR", "chr7", i % 7, 100 + i % 11));
                }
            });

            scope.spawn(|| {
                for _ in 0..10 {
                    db.clear();
                }
            });
        });

        let snapshot = db.snapshot();

        for bucket in snapshot.features_map("").values() {
            for pair in bucket.windows(2) {
                let ordering = DuplicatePolicy::Coordinates.compare(&*pair[0], &*pair[1]);
                assert_eq!(ordering, Ordering::Less);
            }
        }

        let entry_count: usize = snapshot.features_map("").values().map(Vec::len).sum();
        assert_eq!(entry_count, snapshot.len());
    }
}
