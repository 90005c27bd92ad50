//! Property-based tests for the aggregators
//!
//! Invariants every summary must keep regardless of the input table.

#[cfg(test)]
mod property_tests {
    use chartflow_aggregate::*;
    use chartflow_core::{SyntheticColumn, SyntheticSpec, Table};
    use proptest::prelude::*;

    fn labels() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(prop::sample::select(vec!["HR", "IT", "Sales", "Ops", "Finance"]), 0..150)
            .prop_map(|v| v.into_iter().map(String::from).collect())
    }

    proptest! {
        // Property: correlation matrices are symmetric with a unit diagonal
        #[test]
        fn prop_correlation_symmetric(seed in any::<u64>(), rows in 2usize..80) {
            let table = SyntheticSpec::new(seed, rows)
                .column(SyntheticColumn::normal("a", 0.0, 1.0))
                .column(SyntheticColumn::derived("b", 0.0).term("a", 0.7).noise(1.0))
                .column(SyntheticColumn::normal("c", 10.0, 3.0))
                .column(SyntheticColumn::constant("flat", 5.0))
                .generate()
                .unwrap();
            let m = correlation_matrix(&table, &[], ZeroVariancePolicy::Nan).unwrap();
            prop_assert!(m.is_symmetric());
            for i in 0..m.len() {
                prop_assert_eq!(m.at(i, i), 1.0);
                for j in 0..m.len() {
                    let r = m.at(i, j);
                    prop_assert!(r.is_nan() || (-1.0..=1.0).contains(&r));
                }
            }
            prop_assert!(m.get("a", "flat").unwrap().is_nan());
        }

        // Property: frequency counts sum to the row count, whatever the order
        #[test]
        fn prop_frequency_sums_to_rows(values in labels(), explicit in any::<bool>()) {
            let rows = values.len();
            let table = Table::builder().categorical("department", values).build().unwrap();
            let order = if explicit {
                CategoryOrder::explicit(&["Sales", "Marketing", "HR"])
            } else {
                CategoryOrder::ByCount
            };
            let freq = frequency(&table, "department", &order).unwrap();
            prop_assert_eq!(freq.counts().iter().sum::<usize>(), rows);
            prop_assert_eq!(freq.total(), rows);
            prop_assert_eq!(freq.count("Marketing"), 0);
            if !explicit {
                let counts = freq.counts();
                prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));
            }
        }

        // Property: grouped totals equal the column total
        #[test]
        fn prop_grouped_sum_total(
            rows in proptest::collection::vec(
                (prop::sample::select(vec!["Social", "Email", "Search"]),
                 prop::sample::select(vec!["Awareness", "Interest", "Purchase"]),
                 0.0..500.0f64),
                1..100)
        ) {
            let table = Table::builder()
                .categorical("Channel", rows.iter().map(|r| r.0).collect::<Vec<_>>())
                .categorical("Stage", rows.iter().map(|r| r.1).collect::<Vec<_>>())
                .numeric("Count", rows.iter().map(|r| r.2).collect())
                .build()
                .unwrap();
            let column_total: f64 = table.numeric("Count").unwrap().iter().sum();
            let sums = grouped_sum(&table, &["Channel", "Stage"], "Count").unwrap();
            prop_assert!((sums.total() - column_total).abs() < 1e-6 * column_total.max(1.0));
            prop_assert!(sums.len() <= 9);
            let keys: Vec<&Vec<String>> = sums.groups().iter().map(|(k, _)| k).collect();
            prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }

        // Property: box statistics are ordered
        #[test]
        fn prop_box_stats_ordered(values in proptest::collection::vec(-1e3..1e3f64, 1..200)) {
            let s = box_stats(&values).unwrap();
            prop_assert!(s.lower_whisker <= s.q1 + 1e-9);
            prop_assert!(s.q1 <= s.median && s.median <= s.q3);
            prop_assert!(s.q3 <= s.upper_whisker + 1e-9);
            prop_assert_eq!(s.count, values.len());
        }
    }
}
