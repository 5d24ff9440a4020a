use crate::warehouse::error::WarehouseError;

/// A tabular query result as the warehouse hands it over: column names and
/// textual cells, `None` where the source had no value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, rejecting one whose width differs from the header.
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<(), WarehouseError> {
        if row.len() != self.columns.len() {
            return Err(WarehouseError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_rejects_ragged_rows() {
        let mut table = RawTable::new(["AccountId", "Speed"]);
        assert!(table
            .push_row(vec![Some("76".into()), None])
            .is_ok());
        let err = table.push_row(vec![Some("76".into())]).unwrap_err();
        assert!(matches!(
            err,
            WarehouseError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_column_index_ignores_case() {
        let table = RawTable::new(["AccountId", "DATE"]);
        assert_eq!(table.column_index("accountid"), Some(0));
        assert_eq!(table.column_index("date"), Some(1));
        assert_eq!(table.column_index("Speed"), None);
    }
}
