use std::{
    cmp::Ordering,
    collections::BTreeMap,
    ops::Bound,
    sync::Arc,
};

use super::{DuplicatePolicy, Index};
use crate::features::{Feature, canonical_name, canonical_prefix};

/// An immutable generation of a [`super::FeatureDb`].
pub struct Snapshot<F> {
    index: Arc<Index<F>>,
    duplicates: DuplicatePolicy,
}

impl<F> Clone for Snapshot<F> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            duplicates: self.duplicates,
        }
    }
}

impl<F> Snapshot<F>
where
    F: Feature,
{
    pub(super) fn new(index: Arc<Index<F>>, duplicates: DuplicatePolicy) -> Self {
        Self { index, duplicates }
    }

    /// Returns the number of entries, summed over all keys.
    pub fn len(&self) -> usize {
        self.index.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the first-ranked feature named `name`, ignoring case.
    pub fn feature(&self, name: &str) -> Option<Arc<F>> {
        self.bucket(name)?.first().cloned()
    }

    /// Returns all features named `name`, ignoring case, longest first.
    pub fn features(&self, name: &str) -> Vec<Arc<F>> {
        self.bucket(name).map(|bucket| bucket.to_vec()).unwrap_or_default()
    }

    /// Returns up to `limit` distinct features whose names start with `prefix`, ignoring case.
    ///
    /// The prefix is not trimmed; surrounding whitespace must match the key.
    ///
    /// Entries of all matching names are merged, ordered longest first with ties broken by
    /// start, and collapsed to one entry per feature under the configured duplicate policy.
    pub fn features_list(&self, prefix: &str, limit: usize) -> Vec<Arc<F>> {
        if limit == 0 {
            return Vec::new();
        }

        let prefix = canonical_prefix(prefix);

        let mut features: Vec<_> = self
            .buckets_with_prefix(&prefix)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect();

        let duplicates = self.duplicates;
        features.sort_by(|a, b| duplicates.compare(&**a, &**b));
        features.dedup_by(|a, b| duplicates.compare(&**a, &**b) == Ordering::Equal);
        features.truncate(limit);

        features
    }

    /// Groups the features whose names start with `prefix`, ignoring case, by canonical name.
    pub fn features_map(&self, prefix: &str) -> BTreeMap<String, Vec<Arc<F>>> {
        let prefix = canonical_prefix(prefix);

        self.buckets_with_prefix(&prefix)
            .map(|(name, bucket)| (name.clone(), bucket.to_vec()))
            .collect()
    }

    /// Returns the first-ranked feature of each name that starts with `prefix`, ignoring case.
    ///
    /// Names are visited in ascending order, and at most `limit` are visited.
    pub fn longest_features(&self, prefix: &str, limit: usize) -> Vec<Arc<F>> {
        let prefix = canonical_prefix(prefix);

        self.buckets_with_prefix(&prefix)
            .take(limit)
            .filter_map(|(_, bucket)| bucket.first().cloned())
            .collect()
    }

    pub(super) fn bucket(&self, name: &str) -> Option<&[Arc<F>]> {
        self.index
            .buckets
            .get(&canonical_name(name))
            .map(|bucket| bucket.as_slice())
    }

    fn buckets_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Arc<Vec<Arc<F>>>)> + 'a {
        self.index
            .buckets
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(name, _)| name.starts_with(prefix))
    }
}
