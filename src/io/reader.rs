//! Streaming FASTA reader.
//!
//! Grounded on the original tool's `readFastaChainsPart`: records are read
//! in byte-budgeted chunks so a multi-gigabyte database file never needs to
//! be held in memory at once. The line-oriented `BufRead` scan follows the
//! style used elsewhere in this crate for windowed-file parsing.

use std::io::BufRead;

use crate::core::sequence::Sequence;
use crate::error::CoreError;

/// Source of `Sequence` records, read in caller-bounded batches.
pub trait Reader {
    /// Append up to `max_bytes` worth of residue data (across as many whole
    /// records as fit) to `out`. Returns `true` if more records remain
    /// after this call, `false` once the source is exhausted.
    fn read_chains(&mut self, out: &mut Vec<Sequence>, max_bytes: usize) -> Result<bool, CoreError>;
}

/// A FASTA `Reader` over any buffered byte source.
pub struct FastaReader<R: BufRead> {
    inner: R,
    next_id: u32,
    pending_header: Option<String>,
    exhausted: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(inner: R) -> Self {
        FastaReader {
            inner,
            next_id: 0,
            pending_header: None,
            exhausted: false,
        }
    }

    fn next_record(&mut self) -> Result<Option<(String, Vec<u8>)>, CoreError> {
        let header = match self.pending_header.take() {
            Some(h) => h,
            None => loop {
                let mut line = String::new();
                if self.inner.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    continue;
                }
                if let Some(h) = trimmed.strip_prefix('>') {
                    break h.to_string();
                }
                return Err(CoreError::ReaderError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "expected FASTA header line starting with '>'",
                )));
            },
        };

        let mut body = Vec::new();
        loop {
            let mut line = String::new();
            let n = self.inner.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            let trimmed = line.trim_end();
            if let Some(h) = trimmed.strip_prefix('>') {
                self.pending_header = Some(h.to_string());
                break;
            }
            body.extend_from_slice(trimmed.as_bytes());
        }

        Ok(Some((header, body)))
    }
}

impl<R: BufRead> Reader for FastaReader<R> {
    fn read_chains(&mut self, out: &mut Vec<Sequence>, max_bytes: usize) -> Result<bool, CoreError> {
        if self.exhausted {
            return Ok(false);
        }

        let mut consumed = 0usize;
        while consumed < max_bytes {
            match self.next_record()? {
                None => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Some((header, body)) => {
                    consumed += body.len();
                    let id = self.next_id;
                    self.next_id += 1;
                    match Sequence::new(id, header, &body) {
                        Ok(seq) => out.push(seq),
                        Err(CoreError::InvalidSequence { name, reason }) => {
                            log::warn!(
                                "dropping record {:?}: {}",
                                name.unwrap_or_default(),
                                reason
                            );
                        }
                        Err(other) => return Err(other),
                    }
                }
            }
        }
        Ok(true)
    }
}
