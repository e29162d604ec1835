use std::fmt;

use indexmap::IndexSet;

// ---------------------------------------------------------------------------
// Dimension – which categorical attribute of a record we are talking about
// ---------------------------------------------------------------------------

/// The two filterable attributes of a case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Race,
    AgeGroup,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Race => write!(f, "race/ethnicity"),
            Dimension::AgeGroup => write!(f, "age group"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the case file
// ---------------------------------------------------------------------------

/// A single case observation.
///
/// Either field is `None` when the source row lacked it (or carried a
/// configured missing-value token). Such records are excluded from any
/// grouping over that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub age_group: Option<String>,
    pub race_ethnicity: Option<String>,
}

impl Record {
    pub fn new(age_group: impl Into<String>, race_ethnicity: impl Into<String>) -> Self {
        Self {
            age_group: Some(age_group.into()),
            race_ethnicity: Some(race_ethnicity.into()),
        }
    }

    /// The value of this record along `dimension`.
    pub fn value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Race => self.race_ethnicity.as_deref(),
            Dimension::AgeGroup => self.age_group.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// The full parsed dataset with the distinct values of each dimension,
/// kept in order of first occurrence.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in file order.
    pub records: Vec<Record>,
    /// Distinct age groups seen.
    pub age_groups: IndexSet<String>,
    /// Distinct race/ethnicity values seen.
    pub races: IndexSet<String>,
    /// Rows the loader could not decode and dropped.
    pub skipped_rows: usize,
}

impl Dataset {
    /// Build the per-dimension value indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut age_groups = IndexSet::new();
        let mut races = IndexSet::new();

        for rec in &records {
            if let Some(age) = &rec.age_group {
                if !age_groups.contains(age) {
                    age_groups.insert(age.clone());
                }
            }
            if let Some(race) = &rec.race_ethnicity {
                if !races.contains(race) {
                    races.insert(race.clone());
                }
            }
        }

        Dataset {
            records,
            age_groups,
            races,
            skipped_rows: 0,
        }
    }

    /// Record how many source rows were dropped while loading.
    pub fn with_skipped_rows(mut self, skipped_rows: usize) -> Self {
        self.skipped_rows = skipped_rows;
        self
    }

    /// Distinct values observed along `dimension`.
    pub fn values(&self, dimension: Dimension) -> &IndexSet<String> {
        match dimension {
            Dimension::Race => &self.races,
            Dimension::AgeGroup => &self.age_groups,
        }
    }

    /// Whether `value` occurs at least once along `dimension`.
    pub fn contains_value(&self, dimension: Dimension, value: &str) -> bool {
        self.values(dimension).contains(value)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_values_keep_first_occurrence_order() {
        let ds = Dataset::from_records(vec![
            Record::new("25-34", "White"),
            Record::new("18-24", "Black"),
            Record::new("25-34", "Asian"),
            Record::new("18-24", "White"),
        ]);
        let ages: Vec<&str> = ds.age_groups.iter().map(String::as_str).collect();
        let races: Vec<&str> = ds.races.iter().map(String::as_str).collect();
        assert_eq!(ages, vec!["25-34", "18-24"]);
        assert_eq!(races, vec!["White", "Black", "Asian"]);
    }

    #[test]
    fn test_missing_fields_are_not_indexed() {
        let ds = Dataset::from_records(vec![
            Record {
                age_group: None,
                race_ethnicity: Some("White".into()),
            },
            Record {
                age_group: Some("65+".into()),
                race_ethnicity: None,
            },
        ]);
        assert_eq!(ds.len(), 2);
        assert!(ds.contains_value(Dimension::Race, "White"));
        assert!(ds.contains_value(Dimension::AgeGroup, "65+"));
        assert_eq!(ds.races.len(), 1);
        assert_eq!(ds.age_groups.len(), 1);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.races.is_empty());
        assert!(!Dataset::from_records(vec![Record::new("18-24", "White")]).is_empty());
    }

    #[test]
    fn test_record_value_by_dimension() {
        let rec = Record::new("18-24", "Black");
        assert_eq!(rec.value(Dimension::AgeGroup), Some("18-24"));
        assert_eq!(rec.value(Dimension::Race), Some("Black"));
    }
}
