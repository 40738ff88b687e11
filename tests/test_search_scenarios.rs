use std::sync::Arc;

use kmersearch::core::candidates::CandidateStore;
use kmersearch::core::kmers::{KmerLength, SubstitutionTable};
use kmersearch::core::scheduler::scan_chunk;
use kmersearch::core::sequence::Sequence;
use kmersearch::score_matrix::{MatrixName, ScoreMatrix};

fn exact_table(kmer_length: KmerLength) -> SubstitutionTable {
    let m = ScoreMatrix::load(MatrixName::Blosum62, 10, 1);
    SubstitutionTable::build(kmer_length, &m, 0)
}

#[test]
fn exact_match_filters_out_unrelated_target() {
    let q0 = Sequence::new(0, "q0", b"AAAAA").unwrap();
    let t0 = Sequence::new(0, "t0", b"AAACC").unwrap();
    let t1 = Sequence::new(1, "t1", b"CCCCC").unwrap();

    let table = exact_table(KmerLength::Three);
    let store = Arc::new(CandidateStore::new(1, 30_000));
    scan_chunk(&[q0], &[t0, t1], &table, 3, 2, &store);

    let hits = store.candidates_for(0);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target_id, 0);
}

#[test]
fn single_query_and_target_share_four_overlapping_kmers() {
    let q0 = Sequence::new(0, "q0", b"ACDEFG").unwrap();
    let t0 = Sequence::new(0, "t0", b"ACDEFG").unwrap();

    let table = exact_table(KmerLength::Three);
    let store = Arc::new(CandidateStore::new(1, 30_000));
    scan_chunk(&[q0], &[t0], &table, 3, 1, &store);

    let hits = store.candidates_for(0);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 4);
}

#[test]
fn target_with_no_valid_residues_is_dropped_at_load_time() {
    // A target consisting entirely of ambiguity codes never becomes a
    // Sequence at all, so it can't appear in a scan.
    assert!(Sequence::new(0, "all-ambiguous", b"BJOUXZ").is_err());

    let q0 = Sequence::new(0, "q0", b"ACDEF").unwrap();
    let t0 = Sequence::new(0, "t0", b"ACDEF").unwrap();
    let table = exact_table(KmerLength::Three);
    let store = Arc::new(CandidateStore::new(1, 30_000));
    scan_chunk(&[q0], &[t0], &table, 3, 1, &store);
    assert_eq!(store.candidates_for(0).len(), 1);
}

#[test]
fn substitution_threshold_admits_near_miss_kmer() {
    // AAA and AGA pass at threshold=11 if and only if a direct BLOSUM62
    // evaluation agrees; exercised end to end via a one-residue query/target.
    let m = ScoreMatrix::load(MatrixName::Blosum62, 10, 1);
    let table = SubstitutionTable::build(KmerLength::Three, &m, 11);

    let q0 = Sequence::new(0, "q0", b"AAA").unwrap();
    let t0 = Sequence::new(0, "t0", b"AGA").unwrap();
    let store = Arc::new(CandidateStore::new(1, 30_000));
    scan_chunk(&[q0], &[t0], &table, 3, 1, &store);

    let direct_score = m.score(0, 0) + m.score(0, 6) + m.score(0, 0);
    let hits = store.candidates_for(0);
    assert_eq!(!hits.is_empty(), direct_score >= 11);
}

#[test]
fn max_candidates_two_keeps_first_two_tied_hits_in_arrival_order() {
    let q0 = Sequence::new(0, "q0", b"AAAAA").unwrap();
    // Three targets sharing the same 3-mer AAA exactly once: all three
    // hits tie at score 1.
    let t0 = Sequence::new(0, "t0", b"AAACC").unwrap();
    let t1 = Sequence::new(1, "t1", b"CCAAA").unwrap();
    let t2 = Sequence::new(2, "t2", b"CAAAC").unwrap();

    let table = exact_table(KmerLength::Three);
    let store = Arc::new(CandidateStore::new(1, 2));
    scan_chunk(&[q0], &[t0, t1, t2], &table, 3, 1, &store);

    let hits = store.candidates_for(0);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].target_id, 0);
    assert_eq!(hits[1].target_id, 1);
}

#[test]
fn final_indexes_are_ascending_by_target_id_across_a_scan() {
    // Spec scenario 5, run through the real scheduler: three targets share
    // the query's 3-mer a different number of times each, producing
    // distinct scores, and max_candidates=2 admits only the top two.
    let q0 = Sequence::new(0, "q0", b"AAAAAAA").unwrap();
    let t0 = Sequence::new(0, "t0", b"AAACCCC").unwrap(); // 1 hit: AAA
    let t1 = Sequence::new(1, "t1", b"AAAAACC").unwrap(); // 3 hits: AAA x3
    let t2 = Sequence::new(2, "t2", b"AAAACCC").unwrap(); // 2 hits: AAA x2

    let table = exact_table(KmerLength::Three);
    let store = Arc::new(CandidateStore::new(1, 2));
    scan_chunk(&[q0], &[t0, t1, t2], &table, 3, 2, &store);

    let indexes = store.into_indexes();
    assert_eq!(indexes[0], vec![1, 2]);
}

#[test]
fn empty_database_yields_no_candidates_for_any_query() {
    let q0 = Sequence::new(0, "q0", b"AAAAA").unwrap();
    let q1 = Sequence::new(1, "q1", b"CCCCC").unwrap();

    let table = exact_table(KmerLength::Three);
    let store = Arc::new(CandidateStore::new(2, 30_000));
    scan_chunk(&[q0, q1], &[], &table, 3, 4, &store);

    assert!(store.candidates_for(0).is_empty());
    assert!(store.candidates_for(1).is_empty());
}
