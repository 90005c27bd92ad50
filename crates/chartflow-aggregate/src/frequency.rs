//! Frequency counts of a categorical column

use chartflow_core::table::{Column, Field, Table};
use chartflow_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// Order of categories in a frequency table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryOrder {
    /// Descending count, ties in order of first appearance
    #[default]
    ByCount,
    /// The given categories first, the rest appended in `ByCount` order
    Explicit(Vec<String>),
}

impl CategoryOrder {
    pub fn explicit<S: AsRef<str>>(categories: &[S]) -> Self {
        CategoryOrder::Explicit(categories.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// Category counts in a fixed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    column: String,
    entries: Vec<(String, usize)>,
    total: usize,
}

impl FrequencyTable {
    /// Name of the counted column
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn categories(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, n)| *n).collect()
    }

    /// Count for a category; zero when it never occurs
    pub fn count(&self, category: &str) -> usize {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Percentage of rows holding `category`
    pub fn share(&self, category: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(category) as f64 / self.total as f64 * 100.0
    }

    /// Number of counted rows
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry in table order
    pub fn first(&self) -> Option<(&str, usize)> {
        self.entries.first().map(|(c, n)| (c.as_str(), *n))
    }

    /// Last entry in table order
    pub fn last(&self) -> Option<(&str, usize)> {
        self.entries.last().map(|(c, n)| (c.as_str(), *n))
    }

    /// `category,count,percent` with the percentage at `decimals`
    pub fn to_table(&self, decimals: u32) -> Result<Table> {
        let percents = self
            .entries
            .iter()
            .map(|(c, _)| self.share(c))
            .collect();
        Table::builder()
            .categorical("category", self.categories())
            .column(
                Field::numeric("count").with_decimals(0),
                Column::Numeric(self.counts().into_iter().map(|n| n as f64).collect()),
            )
            .column(
                Field::numeric("percent").with_decimals(decimals),
                Column::Numeric(percents),
            )
            .build()
    }
}

/// Count rows per distinct value of a categorical column
#[instrument(skip(table, order), fields(rows = table.n_rows()), level = "debug")]
pub fn frequency(table: &Table, column: &str, order: &CategoryOrder) -> Result<FrequencyTable> {
    let values = table.categorical(column)?;

    // first-appearance order
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match index.get(value.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.as_str(), counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }
    // stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let entries = match order {
        CategoryOrder::ByCount => counts,
        CategoryOrder::Explicit(list) => {
            let mut listed = Vec::with_capacity(counts.len());
            for category in list {
                if let Some(pos) = counts.iter().position(|(c, _)| c == category) {
                    listed.push(counts.remove(pos));
                }
            }
            listed.extend(counts);
            listed
        }
    };

    Ok(FrequencyTable {
        column: column.to_string(),
        entries,
        total: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn departments() -> Table {
        Table::builder()
            .categorical("department", vec!["IT", "HR", "Sales", "HR", "IT", "Sales", "Sales", "Ops"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_by_count_with_first_appearance_ties() {
        let freq = frequency(&departments(), "department", &CategoryOrder::ByCount).unwrap();
        assert_eq!(freq.categories(), vec!["Sales", "IT", "HR", "Ops"]);
        assert_eq!(freq.counts(), vec![3, 2, 2, 1]);
        assert_eq!(freq.total(), 8);
        assert_eq!(freq.first(), Some(("Sales", 3)));
        assert_eq!(freq.last(), Some(("Ops", 1)));
    }

    #[test]
    fn test_explicit_order() {
        let order = CategoryOrder::explicit(&["Ops", "Finance", "HR"]);
        let freq = frequency(&departments(), "department", &order).unwrap();
        // Finance never occurs and is omitted; the rest follow by count
        assert_eq!(freq.categories(), vec!["Ops", "HR", "Sales", "IT"]);
        assert_eq!(freq.counts().iter().sum::<usize>(), 8);
    }

    #[test]
    fn test_count_and_share() {
        let freq = frequency(&departments(), "department", &CategoryOrder::ByCount).unwrap();
        assert_eq!(freq.count("HR"), 2);
        assert_eq!(freq.count("Finance"), 0);
        assert_abs_diff_eq!(freq.share("Sales"), 37.5, epsilon = 1e-12);
        assert_eq!(format!("{:.1}%", freq.share("HR")), "25.0%");
    }

    #[test]
    fn test_empty_and_numeric_columns() {
        let empty = Table::builder()
            .categorical::<&str>("department", vec![])
            .numeric("score", vec![])
            .build()
            .unwrap();
        let freq = frequency(&empty, "department", &CategoryOrder::ByCount).unwrap();
        assert!(freq.is_empty());
        assert_eq!(freq.share("HR"), 0.0);
        assert!(frequency(&empty, "score", &CategoryOrder::ByCount).is_err());
    }

    #[test]
    fn test_to_table() {
        let freq = frequency(&departments(), "department", &CategoryOrder::ByCount).unwrap();
        let csv = String::from_utf8(freq.to_table(2).unwrap().to_csv_bytes().unwrap()).unwrap();
        assert_eq!(
            csv,
            "category,count,percent\nSales,3,37.50\nIT,2,25.00\nHR,2,25.00\nOps,1,12.50\n"
        );
    }
}
