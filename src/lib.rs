//! Department-keyed B+ tree index over university admission records.
//!
//! Each record is a `(university, department, placement score)` triple.
//! The index keys a B+ tree of order 4 on department name; every leaf key
//! slot owns a [`ScoreList`] of that department's universities in descending
//! score order, and leaves form a sibling chain for ordered scans.
//!
//! Two construction paths produce the same logical index:
//!
//! - **Incremental**: [`DeptIndex::insert`] descends to the target leaf,
//!   merges or creates a key slot, and splits upward as needed.
//! - **Bulk**: [`DeptIndex::bulk_load`] external-sorts the input under a
//!   fixed memory bound (replacement-selection runs plus a k-way merge) and
//!   assembles the tree bottom-up from the sorted stream.
//!
//! ```
//! use deptindex::DeptIndex;
//! use std::io::Cursor;
//!
//! let csv = "id,university,department,score\n\
//!            1,UniX,Math,88\n\
//!            2,UniY,Math,80\n\
//!            3,UniZ,Math,92\n";
//!
//! let mut index = DeptIndex::new();
//! index.bulk_load(Cursor::new(csv)).unwrap();
//! assert_eq!(index.lookup_by_rank("Math", 1).unwrap().university, "UniZ");
//! ```

use std::io::BufRead;

mod arena;
mod bulk_operations;
mod construction;
mod error;
mod external_sort;
mod get_operations;
mod insert_operations;
mod iteration;
mod metrics;
mod node;
mod reader;
mod score_list;
mod types;
mod validation;

pub use error::{IndexError, Result};
pub use external_sort::{ExternalSorter, SortConfig, HEAP_SIZE, SECONDARY_STORAGE_SIZE};
pub use iteration::Departments;
pub use reader::RowReader;
pub use score_list::{ScoreList, UniversityEntry};
pub use types::{DeptIndex, NodeId, NodeRef, Record, NULL_NODE, ORDER};

impl DeptIndex {
    /// Sequentially insert every row of an admission CSV stream.
    ///
    /// The header line is skipped and malformed rows are dropped, as in
    /// [`bulk_load`](DeptIndex::bulk_load); returns the number of records
    /// inserted.
    pub fn load_csv<R: BufRead>(&mut self, input: R) -> Result<u64> {
        let mut reader = RowReader::new(input);
        let mut count = 0u64;
        while let Some(record) = reader.next_record()? {
            self.insert(&record.department, &record.university, record.score);
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn load_csv_inserts_row_by_row() {
        let csv = "id,university,department,score\n\
                   1,UniX,Math,88\n\
                   2,UniY,Physics,70\n\
                   junk\n\
                   3,UniZ,Math,92\n";
        let mut index = DeptIndex::new();
        let count = index.load_csv(Cursor::new(csv)).unwrap();
        assert_eq!(count, 3);
        assert_eq!(index.department_count(), 2);
        assert_eq!(index.lookup_by_rank("Math", 1).unwrap().university, "UniZ");
    }
}
