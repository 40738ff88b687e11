//! Per-query bounded top-K candidate store.
//!
//! Grounded on the original tool's `Candidate`/`Candidates` types and the
//! "sort and pick top candidates" block in `findCandidates`: each worker
//! accumulates hits into a local, unlocked buffer while scanning a group,
//! then folds that buffer into the shared, per-query-locked store once per
//! group under a stable descending sort plus truncation.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub score: u16,
    pub target_id: u32,
}

/// One query's accumulated candidates, capped at `max_candidates`.
#[derive(Default)]
pub struct CandidateRing {
    entries: Vec<Candidate>,
}

impl CandidateRing {
    /// Fold `fresh` hits in, re-sort by descending score (ties keep arrival
    /// order, matching `stable_sort`), and truncate to `max_candidates`.
    pub fn admit(&mut self, fresh: &[Candidate], max_candidates: usize) {
        self.entries.extend_from_slice(fresh);
        self.entries.sort_by_key(|c| std::cmp::Reverse(c.score));
        self.entries.truncate(max_candidates);
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest score currently held, or `None` if the ring has fewer than
    /// `max_candidates` entries (i.e. admission isn't competitive yet).
    pub fn floor(&self, max_candidates: usize) -> Option<u16> {
        if self.entries.len() < max_candidates {
            None
        } else {
            self.entries.last().map(|c| c.score)
        }
    }
}

/// Shared, per-query-locked candidate store for one whole run.
pub struct CandidateStore {
    rings: Vec<Mutex<CandidateRing>>,
    max_candidates: usize,
}

impl CandidateStore {
    pub fn new(num_queries: usize, max_candidates: usize) -> Self {
        CandidateStore {
            rings: (0..num_queries).map(|_| Mutex::new(CandidateRing::default())).collect(),
            max_candidates,
        }
    }

    /// Fold a worker's locally accumulated hits for query `query_id` into
    /// the shared ring under lock.
    pub fn admit(&self, query_id: u32, fresh: &[Candidate]) {
        if fresh.is_empty() {
            return;
        }
        self.rings[query_id as usize].lock().admit(fresh, self.max_candidates);
    }

    /// Snapshot of the current floor, read without holding the lock past
    /// the call — used by workers to decide whether a new hit is worth
    /// buffering locally before the next fold.
    pub fn floor(&self, query_id: u32) -> Option<u16> {
        self.rings[query_id as usize].lock().floor(self.max_candidates)
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Final candidates for `query_id`, sorted descending by score.
    pub fn candidates_for(&self, query_id: u32) -> Vec<Candidate> {
        self.rings[query_id as usize].lock().entries().to_vec()
    }

    /// The final `Indexes` output: for every query, in slot order, the
    /// ascending-sorted list of its candidates' target ids. This is the
    /// deliverable representation — `candidates_for`'s score order is
    /// only the working order used while admitting hits.
    pub fn into_indexes(&self) -> Vec<Vec<u32>> {
        self.rings
            .iter()
            .map(|ring| {
                let mut ids: Vec<u32> = ring.lock().entries().iter().map(|c| c.target_id).collect();
                ids.sort_unstable();
                ids
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admit_sorts_descending_and_truncates() {
        let mut ring = CandidateRing::default();
        ring.admit(
            &[
                Candidate { score: 5, target_id: 0 },
                Candidate { score: 9, target_id: 1 },
                Candidate { score: 3, target_id: 2 },
            ],
            2,
        );
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.entries()[0].score, 9);
        assert_eq!(ring.entries()[1].score, 5);
    }

    #[test]
    fn tie_scores_preserve_arrival_order() {
        // Spec scenario 5: max_candidates=2, three candidates tie at the
        // same score -> first two admitted in arrival order survive.
        let mut ring = CandidateRing::default();
        ring.admit(
            &[
                Candidate { score: 7, target_id: 10 },
                Candidate { score: 7, target_id: 11 },
                Candidate { score: 7, target_id: 12 },
            ],
            2,
        );
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.entries()[0].target_id, 10);
        assert_eq!(ring.entries()[1].target_id, 11);
    }

    #[test]
    fn floor_is_none_until_ring_is_full() {
        let mut ring = CandidateRing::default();
        ring.admit(&[Candidate { score: 4, target_id: 0 }], 3);
        assert_eq!(ring.floor(3), None);
        ring.admit(
            &[
                Candidate { score: 2, target_id: 1 },
                Candidate { score: 1, target_id: 2 },
            ],
            3,
        );
        assert_eq!(ring.floor(3), Some(1));
    }

    #[test]
    fn into_indexes_sorts_ascending_by_target_id_not_score() {
        // Spec scenario 5: max_candidates=2, scores 5/9/7 across targets
        // 0/1/2 -> targets 1 (score 9) and 2 (score 7) survive, reported
        // as ascending ids [1, 2], not score-descending [1, 2] or [2, 1].
        let store = CandidateStore::new(1, 2);
        store.admit(
            0,
            &[
                Candidate { score: 5, target_id: 0 },
                Candidate { score: 9, target_id: 1 },
                Candidate { score: 7, target_id: 2 },
            ],
        );

        let by_score = store.candidates_for(0);
        assert_eq!(by_score[0].target_id, 1);
        assert_eq!(by_score[1].target_id, 2);

        let indexes = store.into_indexes();
        assert_eq!(indexes[0], vec![1, 2]);
    }

    #[test]
    fn store_admits_concurrently_per_query() {
        let store = CandidateStore::new(2, 10);
        store.admit(0, &[Candidate { score: 3, target_id: 0 }]);
        store.admit(1, &[Candidate { score: 9, target_id: 1 }]);
        assert_eq!(store.candidates_for(0).len(), 1);
        assert_eq!(store.candidates_for(1)[0].score, 9);
    }
}
