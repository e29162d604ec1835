use std::hash::Hash;

use indexmap::IndexMap;

use super::model::Record;

// ---------------------------------------------------------------------------
// Aggregation – counts grouped by one key or a key pair
// ---------------------------------------------------------------------------

/// Count of records per distinct key, in order of first occurrence.
///
/// Built fresh from a record subset whenever a view needs it; there is no
/// in-place update API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation<K: Hash + Eq> {
    counts: IndexMap<K, usize>,
}

impl<K: Hash + Eq> Default for Aggregation<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> Aggregation<K> {
    /// Group `records` by `key`. Records for which `key` yields `None` are
    /// left out of the result.
    pub fn count_by<'a, I, F>(records: I, key: F) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        F: Fn(&'a Record) -> Option<K>,
    {
        let mut counts = IndexMap::new();
        for rec in records {
            if let Some(k) = key(rec) {
                *counts.entry(k).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count for `key`, zero if it never occurred.
    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Largest single count, `None` for an empty aggregation.
    pub fn max_count(&self) -> Option<usize> {
        self.counts.values().copied().max()
    }

    /// `(key, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.counts.iter().map(|(k, &c)| (k, c))
    }

    /// Entries ordered by descending count. The sort is stable: equal counts
    /// keep their first-occurrence order.
    pub fn sorted_by_count_desc(&self) -> Vec<(&K, usize)> {
        let mut entries: Vec<(&K, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<A: Hash + Eq, B: Hash + Eq> Aggregation<(A, B)> {
    /// Two-dimensional grouping. A record missing either key is left out.
    pub fn count_by_pair<'a, I, FA, FB>(records: I, first: FA, second: FB) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        FA: Fn(&'a Record) -> Option<A>,
        FB: Fn(&'a Record) -> Option<B>,
    {
        Self::count_by(records, |rec| Some((first(rec)?, second(rec)?)))
    }
}

impl<K: Hash + Eq> IntoIterator for Aggregation<K> {
    type Item = (K, usize);
    type IntoIter = indexmap::map::IntoIter<K, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

/// Group by age group.
pub fn by_age_group<'a, I>(records: I) -> Aggregation<&'a str>
where
    I: IntoIterator<Item = &'a Record>,
{
    Aggregation::count_by(records, |r| r.age_group.as_deref())
}

/// Group by race/ethnicity.
pub fn by_race<'a, I>(records: I) -> Aggregation<&'a str>
where
    I: IntoIterator<Item = &'a Record>,
{
    Aggregation::count_by(records, |r| r.race_ethnicity.as_deref())
}

/// Group by `(age group, race/ethnicity)`.
pub fn by_age_and_race<'a, I>(records: I) -> Aggregation<(&'a str, &'a str)>
where
    I: IntoIterator<Item = &'a Record>,
{
    Aggregation::count_by_pair(
        records,
        |r| r.age_group.as_deref(),
        |r| r.race_ethnicity.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("18-24", "White"),
            Record::new("18-24", "Black"),
            Record::new("25-34", "White"),
        ]
    }

    #[test]
    fn test_count_by_age_group() {
        let records = sample();
        let agg = by_age_group(&records);
        assert_eq!(agg.get(&"18-24"), 2);
        assert_eq!(agg.get(&"25-34"), 1);
        assert_eq!(agg.get(&"65+"), 0);
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn test_keys_in_first_occurrence_order() {
        let records = vec![
            Record::new("65+", "Asian"),
            Record::new("18-24", "White"),
            Record::new("65+", "White"),
        ];
        let keys: Vec<&str> = by_age_group(&records).iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["65+", "18-24"]);
    }

    #[test]
    fn test_total_equals_subset_size() {
        let records = sample();
        assert_eq!(by_age_group(&records).total(), records.len());
        assert_eq!(by_race(&records).total(), records.len());
        assert_eq!(by_age_and_race(&records).total(), records.len());

        let whites = records
            .iter()
            .filter(|r| r.race_ethnicity.as_deref() == Some("White"));
        assert_eq!(by_age_group(whites).total(), 2);
    }

    #[test]
    fn test_missing_keys_are_excluded_not_fatal() {
        let mut records = sample();
        records.push(Record {
            age_group: None,
            race_ethnicity: Some("White".into()),
        });
        let ages = by_age_group(&records);
        assert_eq!(ages.total(), 3);
        let races = by_race(&records);
        assert_eq!(races.get(&"White"), 3);
        let pairs = by_age_and_race(&records);
        assert_eq!(pairs.total(), 3);
    }

    #[test]
    fn test_empty_input_gives_empty_aggregation() {
        let records: Vec<Record> = Vec::new();
        let agg = by_age_and_race(&records);
        assert!(agg.is_empty());
        assert_eq!(agg.total(), 0);
        assert_eq!(agg.max_count(), None);
    }

    #[test]
    fn test_pair_counts() {
        let records = sample();
        let agg = by_age_and_race(&records);
        assert_eq!(agg.get(&("18-24", "White")), 1);
        assert_eq!(agg.get(&("18-24", "Black")), 1);
        assert_eq!(agg.get(&("25-34", "Black")), 0);
        assert_eq!(agg.max_count(), Some(1));
    }

    #[test]
    fn test_sort_by_count_is_stable() {
        let records = vec![
            Record::new("0-17", "White"),
            Record::new("18-24", "White"),
            Record::new("25-34", "White"),
            Record::new("25-34", "White"),
            Record::new("65+", "White"),
        ];
        let agg = by_age_group(&records);
        let sorted: Vec<(&str, usize)> = agg
            .sorted_by_count_desc()
            .into_iter()
            .map(|(k, c)| (*k, c))
            .collect();
        assert_eq!(
            sorted,
            vec![("25-34", 2), ("0-17", 1), ("18-24", 1), ("65+", 1)]
        );
    }
}
