//! Grouped sums over one or more categorical key columns

use chartflow_core::table::{Column, Field, Table};
use chartflow_core::{Error, Result};
use std::collections::BTreeMap;
use tracing::instrument;

/// Summed volume per key tuple, ordered by key tuple
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSum {
    keys: Vec<String>,
    value: String,
    groups: Vec<(Vec<String>, f64)>,
}

impl GroupedSum {
    /// Names of the key columns
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Name of the summed column
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn groups(&self) -> &[(Vec<String>, f64)] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum for one key tuple
    pub fn get(&self, key: &[&str]) -> Option<f64> {
        self.groups
            .iter()
            .find(|(k, _)| k.iter().map(String::as_str).eq(key.iter().copied()))
            .map(|(_, v)| *v)
    }

    /// Sum of all groups
    pub fn total(&self) -> f64 {
        self.groups.iter().map(|(_, v)| v).sum()
    }

    /// Key columns followed by `total`
    pub fn to_table(&self, decimals: Option<u32>) -> Result<Table> {
        let mut builder = Table::builder();
        for (i, key) in self.keys.iter().enumerate() {
            let values: Vec<String> = self.groups.iter().map(|(k, _)| k[i].clone()).collect();
            builder = builder.categorical(key.clone(), values);
        }
        let mut field = Field::numeric("total");
        if let Some(d) = decimals {
            field = field.with_decimals(d);
        }
        builder
            .column(field, Column::Numeric(self.groups.iter().map(|(_, v)| *v).collect()))
            .build()
    }
}

/// Group rows by the key columns and sum `value` per group
///
/// Only groups that occur are reported; there is no zero filling.
#[instrument(skip(table), fields(rows = table.n_rows()), level = "debug")]
pub fn grouped_sum(table: &Table, keys: &[&str], value: &str) -> Result<GroupedSum> {
    if keys.is_empty() {
        return Err(Error::InvalidParameter(
            "grouped sum needs at least one key column".to_string(),
        ));
    }
    let key_columns = keys
        .iter()
        .map(|k| table.categorical(k))
        .collect::<Result<Vec<_>>>()?;
    let values = table.numeric(value)?;

    let mut groups: BTreeMap<Vec<&str>, f64> = BTreeMap::new();
    for (row, &v) in values.iter().enumerate() {
        let key: Vec<&str> = key_columns.iter().map(|c| c[row].as_str()).collect();
        *groups.entry(key).or_insert(0.0) += v;
    }

    Ok(GroupedSum {
        keys: keys.iter().map(|k| k.to_string()).collect(),
        value: value.to_string(),
        groups: groups
            .into_iter()
            .map(|(k, v)| (k.into_iter().map(str::to_string).collect(), v))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn journey() -> Table {
        Table::builder()
            .categorical("Channel", vec!["Social", "Email", "Social", "Search", "Email"])
            .categorical("Stage", vec!["Awareness", "Interest", "Awareness", "Purchase", "Purchase"])
            .numeric("Count", vec![40.0, 25.0, 10.0, 5.0, 20.0])
            .build()
            .unwrap()
    }

    #[test]
    fn test_two_key_sum_sorted_by_key() {
        let sums = grouped_sum(&journey(), &["Channel", "Stage"], "Count").unwrap();
        let keys: Vec<String> = sums.groups().iter().map(|(k, _)| k.join("/")).collect();
        assert_eq!(
            keys,
            vec!["Email/Interest", "Email/Purchase", "Search/Purchase", "Social/Awareness"]
        );
        assert_eq!(sums.get(&["Social", "Awareness"]), Some(50.0));
        assert_eq!(sums.get(&["Search", "Awareness"]), None);
    }

    #[test]
    fn test_total_matches_column() {
        let sums = grouped_sum(&journey(), &["Stage"], "Count").unwrap();
        assert_abs_diff_eq!(sums.total(), 100.0, epsilon = 1e-12);
        assert_eq!(sums.len(), 3);
    }

    #[test]
    fn test_errors() {
        assert!(grouped_sum(&journey(), &[], "Count").is_err());
        assert!(grouped_sum(&journey(), &["Count"], "Count").is_err());
        assert!(grouped_sum(&journey(), &["Channel"], "Stage").is_err());
    }

    #[test]
    fn test_to_table() {
        let sums = grouped_sum(&journey(), &["Channel"], "Count").unwrap();
        let csv = String::from_utf8(sums.to_table(None).unwrap().to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "Channel,total\nEmail,45\nSearch,5\nSocial,50\n");
    }
}
