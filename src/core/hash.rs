//! Query index (`Hash` in the design): an inverted index from k-mer code to
//! the (query-slot, position) pairs that produced it, built over a
//! contiguous group of queries via a two-pass counting sort.
//!
//! Grounded directly on the original tool's `Hash::Hash` constructor.

use crate::core::kmers::SubstitutionTable;
use crate::core::sequence::Sequence;

/// One occurrence of a k-mer code: `slot` is the query's position within
/// the group (0..G), not its global id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub slot: u32,
    pub position: u32,
}

pub struct QueryIndex {
    starts: Vec<u32>,
    hits: Vec<Hit>,
}

impl QueryIndex {
    /// Build the index over `queries[..]`, a contiguous group. Substitution
    /// expansion (§3 QueryIndex) records both the direct k-mer and every
    /// neighbour under the substitution table.
    pub fn build(queries: &[&Sequence], table: &SubstitutionTable) -> Self {
        let l = table.kmer_length().get();
        let code_space = table.kmer_length().code_space();

        let mut starts = vec![0u32; code_space + 1];

        // Pass 1: count.
        for query in queries {
            for (_, code) in kmer_positions(query, l) {
                starts[code as usize + 1] += 1;
                for &n in table.neighbours(code) {
                    starts[n as usize + 1] += 1;
                }
            }
        }
        for i in 0..code_space {
            starts[i + 1] += starts[i];
        }

        // Pass 2: fill, using a moving cursor copy of the prefix sums.
        let mut hits = vec![Hit { slot: 0, position: 0 }; starts[code_space] as usize];
        let mut cursor = starts.clone();
        for (slot, query) in queries.iter().enumerate() {
            for (position, code) in kmer_positions(query, l) {
                let hit = Hit {
                    slot: slot as u32,
                    position,
                };
                place(&mut hits, &mut cursor, code, hit);
                for &n in table.neighbours(code) {
                    place(&mut hits, &mut cursor, n, hit);
                }
            }
        }

        QueryIndex { starts, hits }
    }

    /// All `(slot, position)` hits recorded for k-mer code `c`.
    pub fn hits_for(&self, code: u32) -> &[Hit] {
        let c = code as usize;
        &self.hits[self.starts[c] as usize..self.starts[c + 1] as usize]
    }
}

#[inline]
fn place(hits: &mut [Hit], cursor: &mut [u32], code: u32, hit: Hit) {
    let slot = &mut cursor[code as usize];
    hits[*slot as usize] = hit;
    *slot += 1;
}

/// `(position, code)` for every k-mer in `seq`, in ascending position order.
/// A sequence shorter than `l` yields no k-mers.
pub fn kmer_positions(seq: &Sequence, l: usize) -> Vec<(u32, u32)> {
    let codes = seq.codes();
    if codes.len() < l {
        return Vec::new();
    }

    let mask = crate::core::sequence::delete_mask(l);

    let mut out = Vec::with_capacity(codes.len() - l + 1);
    let mut code = 0u32;
    for (i, &c) in codes.iter().enumerate() {
        code = ((code << crate::core::sequence::BITS_PER_SYMBOL) | c as u32) & mask;
        if i + 1 >= l {
            out.push(((i + 1 - l) as u32, code));
        }
    }
    out
}
