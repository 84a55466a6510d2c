//! Properties that must hold for any pair of valid tables

use crate::common::assertions::assert_complete;
use std::collections::HashSet;
use tablediff::{
    diff_tables, DiffOptions, DiffResult, Header, MemorySink, MemorySource, OutputAssembler, Row,
    RowStatus, TableSource, PARALLEL_SORT_THRESHOLD,
};

/// Small deterministic generator so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn header() -> Header {
    Header::new(["ID", "NAME", "QTY"])
}

/// Two tables over `size` candidate keys with shuffled order and random edits
fn generate(seed: u64, size: usize) -> (Vec<Row>, Vec<Row>) {
    let mut rng = Lcg(seed);
    let mut old = Vec::new();
    let mut new = Vec::new();

    for i in 0..size {
        let id = format!("k{:05}", (i * 7919) % size);
        let name = format!("item{}", rng.below(50));
        let qty = rng.below(10).to_string();
        match rng.below(5) {
            0 => old.push(vec![id, name, qty]),
            1 => new.push(vec![id, name, qty]),
            2 => {
                old.push(vec![id.clone(), name.clone(), qty]);
                new.push(vec![id, name, "changed".to_string()]);
            }
            _ => {
                old.push(vec![id.clone(), name.clone(), qty.clone()]);
                new.push(vec![id, name, qty]);
            }
        }
    }

    // Reverse table 2 so matching cannot rely on position
    new.reverse();
    (old, new)
}

fn diff(old: &[Row], new: &[Row], details: bool) -> DiffResult {
    let t1 = MemorySource::new(header(), old.to_vec()).open(None).unwrap();
    let t2 = MemorySource::new(header(), new.to_vec()).open(None).unwrap();
    diff_tables(t1, t2, &["ID".to_string()], details).unwrap()
}

fn assemble(result: &DiffResult, options: DiffOptions) -> MemorySink {
    let mut sink = MemorySink::new();
    OutputAssembler::new(options)
        .unwrap()
        .assemble(result, &mut sink)
        .unwrap();
    sink
}

#[test]
fn test_every_row_classified_exactly_once() {
    for seed in 1..=8 {
        let (old, new) = generate(seed, 300);
        let result = diff(&old, &new, true);
        assert_complete(&result.synthesis, old.len() as u64, new.len() as u64);

        let keys: HashSet<_> = result.entries.iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys.len(), result.entries.len(), "one entry per key");
        assert_eq!(result.entries.len() as u64, result.synthesis.total_entries());
    }
}

#[test]
fn test_entries_follow_table_order() {
    let (old, new) = generate(42, 200);
    let result = diff(&old, &new, false);

    let leading: Vec<&str> = result
        .entries
        .iter()
        .filter(|e| e.status != RowStatus::Added)
        .map(|e| e.key.values()[0].as_str())
        .collect();
    let table1: Vec<&str> = old.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(leading, table1);

    let first_added = result
        .entries
        .iter()
        .position(|e| e.status == RowStatus::Added)
        .unwrap_or(result.entries.len());
    assert!(result.entries[first_added..]
        .iter()
        .all(|e| e.status == RowStatus::Added));
}

#[test]
fn test_diff_is_deterministic() {
    let (old, new) = generate(7, 500);
    let first = diff(&old, &new, true);
    let second = diff(&old, &new, true);
    assert_eq!(first.entries, second.entries);
    assert_eq!(first.synthesis, second.synthesis);

    let options = DiffOptions::new().show_change_details(true).mark_column("DIFF");
    assert_eq!(
        assemble(&first, options.clone()).rows,
        assemble(&second, options).rows
    );
}

#[test]
fn test_swapping_tables_swaps_added_and_removed() {
    let (old, new) = generate(11, 400);
    let forward = diff(&old, &new, false).synthesis;
    let backward = diff(&new, &old, false).synthesis;

    assert_eq!(forward.added, backward.removed);
    assert_eq!(forward.removed, backward.added);
    assert_eq!(forward.changed, backward.changed);
    assert_eq!(forward.unchanged, backward.unchanged);
}

#[test]
fn test_identical_tables_have_no_differences() {
    let (old, _) = generate(3, 250);
    let result = diff(&old, &old, true);
    assert!(!result.synthesis.has_differences());
    assert_eq!(result.synthesis.unchanged, old.len() as u64);

    let sink = assemble(&result, DiffOptions::new().suppress_unchanged(true).emit_synthesis(true));
    assert!(sink.rows.is_empty());
    assert!(sink.synthesis.is_some());
}

#[test]
fn test_sorting_is_idempotent_and_ordered() {
    let (old, new) = generate(5, 300);
    let result = diff(&old, &new, false);
    let assembler = OutputAssembler::new(DiffOptions::new().sort_lines(true)).unwrap();

    let once: Vec<_> = assembler.arrange(&result.entries).into_iter().cloned().collect();
    let twice: Vec<_> = assembler.arrange(&once).into_iter().cloned().collect();
    assert_eq!(once, twice);
    assert!(once.windows(2).all(|w| w[0].key < w[1].key));
}

#[test]
fn test_suppression_commutes_with_sorting() {
    let (old, new) = generate(9, 300);
    let result = diff(&old, &new, false);

    let sorted = assemble(&result, DiffOptions::new().sort_lines(true));
    let sorted_then_filtered: Vec<_> = sorted
        .rows
        .into_iter()
        .filter(|r| r.status != RowStatus::Unchanged)
        .collect();

    let filtered_and_sorted = assemble(
        &result,
        DiffOptions::new().sort_lines(true).suppress_unchanged(true),
    );
    assert_eq!(sorted_then_filtered, filtered_and_sorted.rows);
    assert_eq!(
        filtered_and_sorted.rows.len() as u64,
        result.synthesis.total_entries() - result.synthesis.unchanged
    );
}

#[test]
fn test_output_options_do_not_change_synthesis() {
    let (old, new) = generate(13, 200);
    let result = diff(&old, &new, true);

    let plain = assemble(&result, DiffOptions::new().emit_synthesis(true));
    let filtered = assemble(
        &result,
        DiffOptions::new()
            .emit_synthesis(true)
            .sort_lines(true)
            .suppress_unchanged(true)
            .suppress_added_removed_marks(true),
    );
    assert_eq!(plain.synthesis, filtered.synthesis);
    assert_eq!(plain.synthesis, Some(result.synthesis));
}

#[test]
fn test_large_tables_sort_in_parallel() {
    let size = PARALLEL_SORT_THRESHOLD + 5_000;
    let (old, new) = generate(17, size);
    let result = diff(&old, &new, false);
    assert_complete(&result.synthesis, old.len() as u64, new.len() as u64);
    assert!(result.entries.len() >= PARALLEL_SORT_THRESHOLD);

    let sink = assemble(&result, DiffOptions::new().sort_lines(true));
    assert_eq!(sink.rows.len(), result.entries.len());
    assert!(sink
        .rows
        .windows(2)
        .all(|w| w[0].cells[0].value < w[1].cells[0].value));
}
