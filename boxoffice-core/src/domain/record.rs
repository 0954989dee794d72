//! MovieRecord and Dataset: the canonical shape every source converges to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::DatasetHash;

/// One row of the box-office ranking in canonical form.
///
/// Field order is the export column order. Serialized keys are the Chinese
/// column headers so a CSV or JSON export can be read back as a local snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "排名")]
    pub rank: i64,

    #[serde(rename = "电影名称")]
    pub name: String,

    /// Release date exactly as the source supplied it.
    #[serde(rename = "上映时间")]
    pub release_time_raw: String,

    /// `None` when `release_time_raw` is not a recognized date.
    #[serde(rename = "上映日期解析")]
    pub release_date: Option<NaiveDate>,

    /// Always `release_date.year()`; `None` together with `release_date`.
    #[serde(rename = "年份")]
    pub year: Option<i32>,

    /// Total revenue, in units of 10k RMB.
    #[serde(rename = "总票房(万元)")]
    pub box_office: f64,

    #[serde(rename = "平均票价(元)")]
    pub avg_ticket_price: f64,

    #[serde(rename = "平均场次观众数")]
    pub avg_audience_per_showing: f64,
}

impl MovieRecord {
    /// A record straight out of schema mapping: dates not parsed yet.
    pub fn unparsed(
        rank: i64,
        name: impl Into<String>,
        release_time_raw: impl Into<String>,
        box_office: f64,
        avg_ticket_price: f64,
        avg_audience_per_showing: f64,
    ) -> Self {
        Self {
            rank,
            name: name.into(),
            release_time_raw: release_time_raw.into(),
            release_date: None,
            year: None,
            box_office,
            avg_ticket_price,
            avg_audience_per_showing,
        }
    }
}

/// Ordered, immutable sequence of records.
///
/// Pipeline stages take a `&Dataset` and hand back a new one; nothing mutates
/// a dataset after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<MovieRecord>,
}

impl Dataset {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MovieRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose release date parsed.
    pub fn dated(&self) -> impl Iterator<Item = (&MovieRecord, NaiveDate)> + '_ {
        self.records
            .iter()
            .filter_map(|r| r.release_date.map(|d| (r, d)))
    }

    /// Content hash over every field of every record, in order.
    ///
    /// Floats are hashed by bit pattern, so two datasets share a hash only if
    /// they are field-for-field identical.
    pub fn fingerprint(&self) -> DatasetHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.records.len() as u64).to_le_bytes());
        for r in &self.records {
            hasher.update(&r.rank.to_le_bytes());
            hash_str(&mut hasher, &r.name);
            hash_str(&mut hasher, &r.release_time_raw);
            match r.release_date {
                Some(d) => {
                    hasher.update(&[1]);
                    hash_str(&mut hasher, &d.to_string());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            match r.year {
                Some(y) => {
                    hasher.update(&[1]);
                    hasher.update(&y.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            hasher.update(&r.box_office.to_bits().to_le_bytes());
            hasher.update(&r.avg_ticket_price.to_bits().to_le_bytes());
            hasher.update(&r.avg_audience_per_showing.to_bits().to_le_bytes());
        }
        DatasetHash::from_hash(hasher.finalize().to_hex().as_str())
    }
}

/// Length-prefixed so ("ab", "c") and ("a", "bc") hash differently.
fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl From<Vec<MovieRecord>> for Dataset {
    fn from(records: Vec<MovieRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a MovieRecord;
    type IntoIter = std::slice::Iter<'a, MovieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MovieRecord {
        let mut r = MovieRecord::unparsed(1, "长津湖", "2021-09-30", 577_500.0, 49.3, 28.0);
        r.release_date = NaiveDate::from_ymd_opt(2021, 9, 30);
        r.year = Some(2021);
        r
    }

    #[test]
    fn serializes_with_chinese_headers_in_field_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let keys = [
            "排名",
            "电影名称",
            "上映时间",
            "上映日期解析",
            "年份",
            "总票房(万元)",
            "平均票价(元)",
            "平均场次观众数",
        ];
        let mut last = 0;
        for key in keys {
            let pos = json.find(&format!("\"{key}\"")).unwrap();
            assert!(pos >= last, "{key} out of order in {json}");
            last = pos;
        }
        assert!(json.contains("\"长津湖\""));
        assert!(json.contains("\"2021-09-30\""));
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = Dataset::new(vec![sample()]);
        let b = Dataset::new(vec![sample()]);
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut changed = sample();
        changed.box_office += 1.0;
        let c = Dataset::new(vec![changed]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn fingerprint_distinguishes_missing_date() {
        let a = Dataset::new(vec![sample()]);
        let mut undated = sample();
        undated.release_date = None;
        undated.year = None;
        let b = Dataset::new(vec![undated]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn dated_skips_records_without_release_date() {
        let undated = MovieRecord::unparsed(2, "B", "TBD", 1.0, 1.0, 1.0);
        let ds = Dataset::new(vec![sample(), undated]);
        let dated: Vec<_> = ds.dated().map(|(r, _)| r.name.as_str()).collect();
        assert_eq!(dated, vec!["长津湖"]);
    }
}
