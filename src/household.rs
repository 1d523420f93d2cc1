//! Stable grouping of roster rows into households

use std::collections::HashMap;

use crate::records::Record;

/// Records sharing a household key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Household {
    pub key: String,
    /// Indexes into the grouped record slice, in row order
    pub members: Vec<usize>,
}

/// Result of grouping a roster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    /// Households in first-seen order
    pub households: Vec<Household>,
    /// Records with an empty household key
    pub ungrouped: Vec<usize>,
}

/// Partition records by the household key column.
///
/// Keys keep first-seen order and members keep row order; nothing is sorted.
pub fn group_by_household(records: &[Record], key_column: usize) -> Grouping {
    let mut grouping = Grouping::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        let Some(key) = record.cell(Some(key_column)).key_text() else {
            grouping.ungrouped.push(idx);
            continue;
        };

        match positions.get(&key) {
            Some(&pos) => grouping.households[pos].members.push(idx),
            None => {
                positions.insert(key.clone(), grouping.households.len());
                grouping.households.push(Household {
                    key,
                    members: vec![idx],
                });
            }
        }
    }

    grouping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordTable;

    #[test]
    fn test_grouping_is_stable() {
        let table = RecordTable::from_rows(
            &["Titular", "Nombre"],
            &[
                vec!["B", "b1"],
                vec!["A", "a1"],
                vec!["B", "b2"],
                vec!["", "orphan"],
                vec!["A", "a2"],
                vec![" B ", "b3"],
            ],
        )
        .unwrap();

        let grouping = group_by_household(&table.records, 0);
        let keys: Vec<&str> = grouping.households.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(grouping.households[0].members, vec![0, 2, 5]);
        assert_eq!(grouping.households[1].members, vec![1, 4]);
        assert_eq!(grouping.ungrouped, vec![3]);
    }
}
