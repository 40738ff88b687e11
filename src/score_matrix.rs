//! A minimal amino-acid similarity matrix.
//!
//! Alignment and e-value computation are external collaborators (see
//! [`crate::collaborators`]); this module only carries enough of a
//! `ScoreMatrix` to drive substitution-table construction (`score(a, b)`)
//! and the CLI's `--gap-open`/`--gap-extend` passthrough.

use crate::error::CoreError;

/// Row/column order of [`BLOSUM62`], the standard NCBI layout.
const ORDER: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";

#[rustfmt::skip]
const BLOSUM62: [[i32; 20]; 20] = [
    [ 4,-1,-2,-2, 0,-1,-1, 0,-2,-1,-1,-1,-1,-2,-1, 1, 0,-3,-2, 0],
    [-1, 5, 0,-2,-3, 1, 0,-2, 0,-3,-2, 2,-1,-3,-2,-1,-1,-3,-2,-3],
    [-2, 0, 6, 1,-3, 0, 0, 0, 1,-3,-3, 0,-2,-3,-2, 1, 0,-4,-2,-3],
    [-2,-2, 1, 6,-3, 0, 2,-1,-1,-3,-4,-1,-3,-3,-1, 0,-1,-4,-3,-3],
    [ 0,-3,-3,-3, 9,-3,-4,-3,-3,-1,-1,-3,-1,-2,-3,-1,-1,-2,-2,-1],
    [-1, 1, 0, 0,-3, 5, 2,-2, 0,-3,-2, 1, 0,-3,-1, 0,-1,-2,-1,-2],
    [-1, 0, 0, 2,-4, 2, 5,-2, 0,-3,-3, 1,-2,-3,-1, 0,-1,-3,-2,-2],
    [ 0,-2, 0,-1,-3,-2,-2, 6,-2,-4,-4,-2,-3,-3,-2, 0,-2,-2,-3,-3],
    [-2, 0, 1,-1,-3, 0, 0,-2, 8,-3,-3,-1,-2,-1,-2,-1,-2,-2, 2,-3],
    [-1,-3,-3,-3,-1,-3,-3,-4,-3, 4, 2,-3, 1, 0,-3,-2,-1,-3,-1, 3],
    [-1,-2,-3,-4,-1,-2,-3,-4,-3, 2, 4,-2, 2, 0,-3,-2,-1,-2,-1, 1],
    [-1, 2, 0,-1,-3, 1, 1,-2,-1,-3,-2, 5,-1,-3,-1, 0,-1,-3,-2,-2],
    [-1,-1,-2,-3,-1, 0,-2,-3,-2, 1, 2,-1, 5, 0,-2,-1,-1,-1,-1, 1],
    [-2,-3,-3,-3,-2,-3,-3,-3,-1, 0, 0,-3, 0, 6,-4,-2,-2, 1, 3,-1],
    [-1,-2,-2,-1,-3,-1,-1,-2,-2,-3,-3,-1,-2,-4, 7,-1,-1,-4,-3,-2],
    [ 1,-1, 1, 0,-1, 0, 0, 0,-1,-2,-2, 0,-1,-2,-1, 4, 1,-3,-2,-2],
    [ 0,-1, 0,-1,-1,-1,-1,-2,-2,-1,-1,-1,-1,-2,-1, 1, 5,-2,-2, 0],
    [-3,-3,-4,-4,-2,-2,-3,-2,-2,-3,-2,-3,-1, 1,-4,-3,-2,11, 2,-3],
    [-2,-2,-2,-3,-2,-1,-2,-3, 2,-1,-1,-2,-1, 3,-3,-2,-2, 2, 7,-1],
    [ 0,-3,-3,-3,-1,-2,-2,-3,-3, 3, 1,-2, 1,-1,-2,-2, 0,-3,-1, 4],
];

/// Recognised matrix names for `-m/--matrix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixName {
    Blosum62,
}

impl MatrixName {
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        match name.to_ascii_uppercase().replace('-', "_").as_str() {
            "BLOSUM_62" | "BLOSUM62" => Ok(MatrixName::Blosum62),
            other => Err(CoreError::InvalidConfiguration(format!(
                "unknown similarity matrix {other:?} (supported: BLOSUM_62)"
            ))),
        }
    }
}

/// An amino-acid similarity matrix plus the gap penalties alignment would use.
pub struct ScoreMatrix {
    /// Row index (into `BLOSUM62`-shaped data) for each of the 26 letter codes.
    index_of: [i8; 26],
    table: [[i32; 20]; 20],
    gap_open: i32,
    gap_extend: i32,
}

impl ScoreMatrix {
    pub fn load(name: MatrixName, gap_open: i32, gap_extend: i32) -> Self {
        let mut index_of = [-1i8; 26];
        for (row, &letter) in ORDER.iter().enumerate() {
            index_of[(letter - b'A') as usize] = row as i8;
        }
        let table = match name {
            MatrixName::Blosum62 => BLOSUM62,
        };
        ScoreMatrix {
            index_of,
            table,
            gap_open,
            gap_extend,
        }
    }

    /// Score between two residues given as alphabet codes (0..25, `A` = 0).
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        let ra = self.index_of[a as usize];
        let rb = self.index_of[b as usize];
        debug_assert!(ra >= 0 && rb >= 0, "score() called with an invalid code");
        self.table[ra as usize][rb as usize]
    }

    pub fn gap_open(&self) -> i32 {
        self.gap_open
    }

    pub fn gap_extend(&self) -> i32 {
        self.gap_extend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_scores_match_known_diagonal() {
        let m = ScoreMatrix::load(MatrixName::Blosum62, 10, 1);
        // A vs A -> 4, W vs W -> 11 (diagonal values from the published table)
        assert_eq!(m.score(0, 0), 4);
        assert_eq!(m.score(b'W' - b'A', b'W' - b'A'), 11);
    }

    #[test]
    fn matrix_is_symmetric() {
        let m = ScoreMatrix::load(MatrixName::Blosum62, 10, 1);
        for a in crate::core::sequence::VALID_CODES {
            for b in crate::core::sequence::VALID_CODES {
                assert_eq!(m.score(a, b), m.score(b, a));
            }
        }
    }

    #[test]
    fn unknown_matrix_name_is_rejected() {
        assert!(MatrixName::parse("PAM250").is_err());
        assert!(MatrixName::parse("blosum_62").is_ok());
    }
}
