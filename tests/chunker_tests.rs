#![allow(clippy::unwrap_used)]

use release_recap::chunker::ChunkPlanner;

fn note_of_len(len: usize, fill: char) -> String {
    std::iter::repeat_n(fill, len).collect()
}

fn flatten(chunks: &[release_recap::Chunk]) -> Vec<String> {
    chunks
        .iter()
        .flat_map(|chunk| chunk.notes().iter().cloned())
        .collect()
}

#[test]
fn test_chunks_are_a_pure_partition_of_the_input() {
    let notes: Vec<String> = (0..25)
        .map(|i| format!("note {i}: {}", note_of_len(i * 37 % 400, 'x')))
        .collect();
    let planner = ChunkPlanner::new(500);

    let chunks = planner.plan(&notes);

    // No note duplicated, dropped, or reordered
    assert_eq!(flatten(&chunks), notes);
}

#[test]
fn test_budget_respected_when_all_notes_fit_individually() {
    let notes: Vec<String> = (0..12).map(|_| note_of_len(300, 'a')).collect();
    let planner = ChunkPlanner::new(1000);

    let chunks = planner.plan(&notes);

    for chunk in &chunks {
        let total: usize = chunk.notes().iter().map(String::len).sum();
        assert!(total <= 1000, "chunk holds {total} chars");
    }
}

#[test]
fn test_uniform_notes_pack_three_per_chunk() {
    // 8 notes of ~5000 chars against a 15000 budget: 3 + 3 + 2
    let notes: Vec<String> = (0..8).map(|_| note_of_len(5000, 'n')).collect();
    let planner = ChunkPlanner::new(15_000);

    let chunks = planner.plan(&notes);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].notes().len(), 3);
    assert_eq!(chunks[1].notes().len(), 3);
    assert_eq!(chunks[2].notes().len(), 2);
    assert_eq!(flatten(&chunks), notes);
}

#[test]
fn test_oversized_note_forms_a_singleton_chunk() {
    let notes = vec![
        note_of_len(12, 'a'),
        note_of_len(50, 'b'), // alone over the budget
        note_of_len(3, 'c'),
    ];
    let planner = ChunkPlanner::new(20);

    let chunks = planner.plan(&notes);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].notes().len(), 1);
    assert_eq!(chunks[1].notes()[0].len(), 50);
    assert_eq!(flatten(&chunks), notes);
}

#[test]
fn test_first_note_of_a_chunk_is_always_accepted() {
    // An oversized opener still lands in a chunk of its own
    let notes = vec![note_of_len(100, 'a'), note_of_len(2, 'b')];
    let planner = ChunkPlanner::new(10);

    let chunks = planner.plan(&notes);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].notes().len(), 1);
    assert_eq!(chunks[1].notes().len(), 1);
}

#[test]
fn test_empty_input_produces_zero_chunks() {
    let planner = ChunkPlanner::new(1000);
    assert!(planner.plan(&[]).is_empty());
}

#[test]
fn test_note_exactly_at_budget_boundary() {
    // current + next == budget is not over budget; one past it is
    let notes = vec![note_of_len(6, 'a'), note_of_len(4, 'b'), note_of_len(1, 'c')];
    let planner = ChunkPlanner::new(10);

    let chunks = planner.plan(&notes);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].notes().len(), 2);
    assert_eq!(chunks[1].notes().len(), 1);
}
