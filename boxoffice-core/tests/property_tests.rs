//! Property tests for normalization and aggregation invariants.
//!
//! Uses proptest to verify:
//! 1. Normalization is a permutation of its input
//! 2. Output is ordered by (date, rank) with undated records last
//! 3. Equal keys keep their relative input order
//! 4. The yearly aggregate conserves revenue over dated records

use boxoffice_core::normalize::release_order;
use boxoffice_core::{aggregate, normalize, Dataset, MovieRecord};
use proptest::prelude::*;
use std::cmp::Ordering;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_release_time() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (2018i32..2025, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| format!("{y}-{m:02}-{d:02}")),
        1 => Just(String::new()),
        1 => Just("待定".to_string()),
    ]
}

fn arb_record() -> impl Strategy<Value = MovieRecord> {
    (1i64..6, arb_release_time(), 0.0..100_000.0_f64).prop_map(|(rank, date, box_office)| {
        MovieRecord::unparsed(rank, "m", date, (box_office * 100.0).round() / 100.0, 40.0, 20.0)
    })
}

/// Records tagged with their input position through the name field.
fn arb_dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(arb_record(), 0..40).prop_map(|records| {
        Dataset::new(
            records
                .into_iter()
                .enumerate()
                .map(|(i, r)| MovieRecord {
                    name: i.to_string(),
                    ..r
                })
                .collect(),
        )
    })
}

proptest! {
    #[test]
    fn normalize_is_a_permutation(ds in arb_dataset()) {
        let out = normalize(&ds).dataset;
        prop_assert_eq!(out.len(), ds.len());

        let mut before: Vec<_> = ds.iter().map(|r| r.name.clone()).collect();
        let mut after: Vec<_> = out.iter().map(|r| r.name.clone()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn normalized_order_is_sorted_and_stable(ds in arb_dataset()) {
        let out = normalize(&ds).dataset;
        for pair in out.records().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ord = release_order(a, b);
            prop_assert_ne!(ord, Ordering::Greater);
            if ord == Ordering::Equal {
                let ia: usize = a.name.parse().unwrap();
                let ib: usize = b.name.parse().unwrap();
                prop_assert!(ia < ib, "tie broke input order: {} before {}", ia, ib);
            }
        }
    }

    #[test]
    fn undated_records_come_last(ds in arb_dataset()) {
        let out = normalize(&ds).dataset;
        let first_undated = out.iter().position(|r| r.release_date.is_none());
        if let Some(idx) = first_undated {
            prop_assert!(out.records()[idx..].iter().all(|r| r.release_date.is_none()));
        }
        prop_assert_eq!(
            out.iter().filter(|r| r.release_date.is_none()).count(),
            normalize(&ds).report.unparsed_dates
        );
    }

    #[test]
    fn aggregate_conserves_dated_revenue(ds in arb_dataset()) {
        let out = normalize(&ds).dataset;
        let agg = aggregate(&out);
        let dated: f64 = out.iter().filter(|r| r.year.is_some()).map(|r| r.box_office).sum();
        prop_assert!((agg.total() - dated).abs() < 1e-6 * dated.max(1.0));

        let years: Vec<_> = agg.years().collect();
        let mut sorted = years.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(years, sorted);
    }
}
