//! Yearly revenue aggregate derived from a normalized dataset.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::Dataset;

/// Summed `box_office` per release year, ascending by year.
///
/// Records without a year are left out. Always recomputed from a dataset,
/// never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearlyAggregate {
    totals: BTreeMap<i32, f64>,
}

impl YearlyAggregate {
    /// Group by year and sum revenue, in dataset order within each year.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut totals = BTreeMap::new();
        for r in dataset {
            if let Some(year) = r.year {
                *totals.entry(year).or_insert(0.0) += r.box_office;
            }
        }
        Self { totals }
    }

    /// `(year, total)` pairs in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.totals.iter().map(|(y, v)| (*y, *v))
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.totals.get(&year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.totals.keys().copied()
    }

    /// Sum over all years.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Convenience wrapper around [`YearlyAggregate::from_dataset`].
pub fn aggregate(dataset: &Dataset) -> YearlyAggregate {
    YearlyAggregate::from_dataset(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieRecord;

    fn rec(year: Option<i32>, box_office: f64) -> MovieRecord {
        let mut r = MovieRecord::unparsed(1, "m", "", box_office, 0.0, 0.0);
        r.year = year;
        r
    }

    #[test]
    fn one_record_per_year() {
        let ds = Dataset::new(vec![rec(Some(2023), 1000.0), rec(Some(2022), 800.0)]);
        let agg = aggregate(&ds);
        let pairs: Vec<_> = agg.iter().collect();
        assert_eq!(pairs, vec![(2022, 800.0), (2023, 1000.0)]);
    }

    #[test]
    fn sums_within_year_and_skips_null_years() {
        let ds = Dataset::new(vec![
            rec(Some(2021), 10.0),
            rec(None, 999.0),
            rec(Some(2021), 5.5),
            rec(Some(2019), 1.0),
        ]);
        let agg = aggregate(&ds);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.get(2021), Some(15.5));
        assert_eq!(agg.get(2019), Some(1.0));
        assert_eq!(agg.total(), 16.5);
        assert_eq!(agg.years().collect::<Vec<_>>(), vec![2019, 2021]);
    }

    #[test]
    fn empty_when_no_years() {
        let ds = Dataset::new(vec![rec(None, 1.0)]);
        assert!(aggregate(&ds).is_empty());
    }
}
