//! Integration tests for the bulk-loading path (external sort + bottom-up
//! build) and its equivalence with incremental insertion.

use std::io::{self, BufReader, Cursor, Read};

use deptindex::{DeptIndex, IndexError, SortConfig};

fn admissions_csv(rows: &[(&str, &str, f32)]) -> String {
    let mut csv = String::from("id,university,department,score\n");
    for (i, (uni, dept, score)) in rows.iter().enumerate() {
        csv.push_str(&format!("{},{},{},{}\n", i + 1, uni, dept, score));
    }
    csv
}

fn spread_rows(departments: usize, per_department: usize) -> Vec<(String, String, f32)> {
    // Interleave departments so the input is far from sorted, with distinct
    // scores so rank comparisons are unambiguous.
    let mut rows = Vec::new();
    for entry in 0..per_department {
        for dept in 0..departments {
            rows.push((
                format!("U{dept}_{entry}"),
                format!("dept_{:03}", (dept * 17) % departments),
                (dept * per_department + entry) as f32,
            ));
        }
    }
    rows
}

#[test]
fn bulk_load_indexes_and_counts_records() {
    let rows = [
        ("UniX", "Math", 88.0),
        ("UniY", "Math", 80.0),
        ("UniZ", "Math", 92.0),
        ("UniA", "Physics", 75.0),
    ];
    let mut index = DeptIndex::new();
    let count = index.bulk_load(Cursor::new(admissions_csv(&rows))).unwrap();
    assert_eq!(count, 4);
    assert_eq!(index.department_count(), 2);
    assert_eq!(index.lookup_by_rank("Math", 1).unwrap().university, "UniZ");
    assert_eq!(index.lookup_by_rank("Physics", 1).unwrap().university, "UniA");
    index.check_invariants().unwrap();
}

#[test]
fn four_full_departments_reach_height_two() {
    let mut rows = Vec::new();
    for dept in ["Biology", "ComputerScience", "Mathematics", "Physics"] {
        for i in 0..3 {
            rows.push((format!("U{i}"), dept.to_owned(), 50.0 + i as f32));
        }
    }
    let borrowed: Vec<(&str, &str, f32)> =
        rows.iter().map(|(u, d, s)| (u.as_str(), d.as_str(), *s)).collect();

    let mut index = DeptIndex::new();
    index
        .bulk_load(Cursor::new(admissions_csv(&borrowed)))
        .unwrap();
    // Four keys exceed one order-4 leaf, so a branch level appears.
    assert_eq!(index.height(), 2);
    index.check_invariants().unwrap();
}

#[test]
fn bulk_and_incremental_agree_on_every_rank() {
    let rows = spread_rows(23, 4);
    let borrowed: Vec<(&str, &str, f32)> =
        rows.iter().map(|(u, d, s)| (u.as_str(), d.as_str(), *s)).collect();
    let csv = admissions_csv(&borrowed);

    let mut incremental = DeptIndex::new();
    incremental.load_csv(Cursor::new(csv.as_str())).unwrap();

    let mut bulk = DeptIndex::new();
    // Small bounds force several runs and a real merge.
    bulk.bulk_load_with(
        Cursor::new(csv.as_str()),
        SortConfig {
            heap_capacity: 8,
            secondary_capacity: 3,
        },
    )
    .unwrap();

    incremental.check_invariants().unwrap();
    bulk.check_invariants().unwrap();
    assert_eq!(incremental.record_count(), bulk.record_count());

    let departments: Vec<String> = incremental.departments().map(|(d, _)| d.to_owned()).collect();
    assert_eq!(
        departments,
        bulk.departments().map(|(d, _)| d.to_owned()).collect::<Vec<_>>()
    );
    for dept in &departments {
        let len = incremental.scores(dept).unwrap().len();
        assert_eq!(bulk.scores(dept).unwrap().len(), len);
        for rank in 1..=len {
            let a = incremental.lookup_by_rank(dept, rank).unwrap();
            let b = bulk.lookup_by_rank(dept, rank).unwrap();
            assert_eq!(a, b, "department {dept} rank {rank}");
        }
    }
}

#[test]
fn bulk_load_is_structurally_idempotent() {
    let rows = spread_rows(31, 3);
    let borrowed: Vec<(&str, &str, f32)> =
        rows.iter().map(|(u, d, s)| (u.as_str(), d.as_str(), *s)).collect();
    let csv = admissions_csv(&borrowed);

    let mut first = DeptIndex::new();
    first.bulk_load(Cursor::new(csv.as_str())).unwrap();
    let mut second = DeptIndex::new();
    second.bulk_load(Cursor::new(csv.as_str())).unwrap();

    assert_eq!(first.height(), second.height());
    assert_eq!(first.department_count(), second.department_count());
    for ((dept_a, list_a), (dept_b, list_b)) in first.departments().zip(second.departments()) {
        assert_eq!(dept_a, dept_b);
        let a: Vec<_> = list_a.iter().collect();
        let b: Vec<_> = list_b.iter().collect();
        assert_eq!(a, b);
    }
}

#[test]
fn reloading_replaces_previous_contents() {
    let mut index = DeptIndex::new();
    index
        .bulk_load(Cursor::new(admissions_csv(&[("UniX", "Math", 88.0)])))
        .unwrap();
    index
        .bulk_load(Cursor::new(admissions_csv(&[("UniY", "Physics", 70.0)])))
        .unwrap();
    assert_eq!(index.department_count(), 1);
    assert!(!index.contains_department("Math"));
    assert_eq!(index.lookup_by_rank("Physics", 1).unwrap().university, "UniY");
}

#[test]
fn empty_input_loads_nothing_and_keeps_the_tree() {
    let mut index = DeptIndex::new();
    index.insert("Math", "UniX", 88.0);
    let count = index
        .bulk_load(Cursor::new("id,university,department,score\n"))
        .unwrap();
    assert_eq!(count, 0);
    assert!(index.contains_department("Math"));
}

/// Reader that fails on the first read, for cutting a stream mid-load.
struct InterruptedStream;

impl Read for InterruptedStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::ConnectionAborted,
            "input stream cut",
        ))
    }
}

#[test]
fn io_failure_aborts_and_preserves_previous_tree() {
    let mut index = DeptIndex::new();
    index.insert("Math", "UniX", 88.0);
    index.insert("Physics", "UniY", 70.0);

    // Two valid rows, then the stream dies mid-read.
    let good = "id,university,department,score\n\
                1,UniA,Biology,60\n\
                2,UniB,Chemistry,65\n";
    let input = BufReader::new(Cursor::new(good.as_bytes().to_vec()).chain(InterruptedStream));

    let err = index.bulk_load(input).unwrap_err();
    assert!(matches!(err, IndexError::Io(_)));

    // The failed load must not have touched the existing tree.
    assert_eq!(index.department_count(), 2);
    assert!(index.contains_department("Math"));
    assert!(index.contains_department("Physics"));
    assert!(!index.contains_department("Biology"));
    assert_eq!(index.lookup_by_rank("Math", 1).unwrap().university, "UniX");
    index.check_invariants().unwrap();
}

#[test]
fn zero_heap_capacity_still_indexes_every_row() {
    let rows = [("UniX", "Math", 88.0), ("UniY", "Art", 70.0)];
    let mut index = DeptIndex::new();
    let count = index
        .bulk_load_with(
            Cursor::new(admissions_csv(&rows)),
            SortConfig {
                heap_capacity: 0,
                secondary_capacity: 0,
            },
        )
        .unwrap();
    assert_eq!(count, 2);
    assert!(index.contains_department("Math"));
    assert!(index.contains_department("Art"));
    index.check_invariants().unwrap();
}

#[test]
fn malformed_rows_are_dropped_not_counted() {
    let csv = "id,university,department,score\n\
               1,UniX,Math,88\n\
               totally broken\n\
               2,,Math,70\n\
               3,UniY,Physics,bad_score\n";
    let mut index = DeptIndex::new();
    let count = index.bulk_load(Cursor::new(csv)).unwrap();
    assert_eq!(count, 2);
    // Unparseable score defaults to zero instead of dropping the row.
    assert_eq!(index.lookup_by_rank("Physics", 1).unwrap().score, 0.0);
}
