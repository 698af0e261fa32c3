use std::fmt;

use super::CoordinateSpace;
use crate::cigar::{Cigar, CigarOp};
use crate::errors::{CigarError, Result};

pub const DEFAULT_MATCH_CHAR: char = '|';
pub const DEFAULT_MISMATCH_CHAR: char = '.';
pub const DEFAULT_GAP_CHAR: char = ' ';
pub const DEFAULT_PAD_CHAR: char = '-';

/// A pairwise alignment between a query and a target sequence, or partial ranges thereof.  The
/// sequences are held in full; the start positions and the CIGAR describe which parts of each
/// are aligned.
#[derive(Debug, Eq, PartialEq, Clone, Default)]
pub struct Alignment {
    /// The query sequence
    pub query: String,

    /// The target sequence
    pub target: String,

    /// Start position of the alignment in the query (1-based)
    pub query_start: usize,

    /// Start position of the alignment in the target (1-based)
    pub target_start: usize,

    pub cigar: Cigar,

    pub score: i32,
}

impl Alignment {
    pub fn new(
        query: String,
        target: String,
        query_start: usize,
        target_start: usize,
        cigar: Cigar,
        score: i32,
    ) -> Self {
        Self {
            query,
            target,
            query_start,
            target_start,
            cigar,
            score,
        }
    }

    /// End position of the alignment in the query (1-based inclusive).
    pub fn query_end(&self) -> usize {
        (self.query_start + self.cigar.length_on_query()).saturating_sub(1)
    }

    /// End position of the alignment in the target (1-based inclusive).
    pub fn target_end(&self) -> usize {
        (self.target_start + self.cigar.length_on_target()).saturating_sub(1)
    }

    fn extent(&self, space: CoordinateSpace) -> (usize, usize) {
        match space {
            CoordinateSpace::Query => (self.query_start, self.query_end()),
            CoordinateSpace::Target => (self.target_start, self.target_end()),
        }
    }

    /// Returns the sub-alignment covering the 1-based inclusive range `[start, end]` of the
    /// query.  See [`Alignment::sub`].
    pub fn sub_by_query(&self, start: usize, end: usize) -> Result<Alignment> {
        self.sub(start, end, CoordinateSpace::Query)
    }

    /// Returns the sub-alignment covering the 1-based inclusive range `[start, end]` of the
    /// target.  See [`Alignment::sub`].
    pub fn sub_by_target(&self, start: usize, end: usize) -> Result<Alignment> {
        self.sub(start, end, CoordinateSpace::Target)
    }

    /// Returns a new alignment restricted to the window `[start, end]` (1-based inclusive) of
    /// the given coordinate space.  The returned alignment holds the full query and target
    /// sequences, with adjusted start positions, a CIGAR covering only the window, and a score of
    /// zero.
    ///
    /// Elements that do not advance the chosen space (e.g. deletions when windowing by query)
    /// are kept when they fall strictly inside the window, and dropped when they sit exactly at
    /// `start`.  An error is returned if `start` or `end` lies outside the aligned extent.
    pub fn sub(&self, start: usize, end: usize, space: CoordinateSpace) -> Result<Alignment> {
        let (extent_start, extent_end) = self.extent(space);
        let within = |pos: usize| extent_start <= pos && pos <= extent_end;
        if !within(start) || !within(end) {
            return Err(CigarError::WindowOutOfRange {
                start,
                end,
                extent_start,
                extent_end,
                space,
            });
        }

        let (start, end) = (start as i64, end as i64);
        let mut query_start = self.query_start;
        let mut target_start = self.target_start;
        let mut curr_start = extent_start as i64;
        let mut elements = Vec::with_capacity(self.cigar.len());

        for element in &self.cigar {
            let consumes = space.is_consumed_by(element.op());
            let length = element.length() as i64;
            let curr_end = if consumes {
                curr_start + length - 1
            } else {
                curr_start - 1
            };

            if curr_end < start {
                // entirely before the window
                query_start += element.length_on_query();
                target_start += element.length_on_target();
                if consumes {
                    curr_start += length;
                }
            } else if curr_start > end {
                // entirely after the window
                continue;
            } else if curr_start >= start && curr_end <= end {
                if consumes || curr_start != start {
                    elements.push(*element);
                    if consumes {
                        curr_start += length;
                    }
                }
            } else {
                let mut remaining = length;
                if curr_start < start {
                    let diff = start - curr_start;
                    remaining -= diff;
                    if element.op().consumes_query() {
                        query_start += diff as usize;
                    }
                    if element.op().consumes_reference() {
                        target_start += diff as usize;
                    }
                    curr_start += diff;
                }
                if curr_end > end {
                    remaining -= curr_end - end;
                }
                elements.push(element.with_length(remaining as usize)?);
                curr_start += remaining;
            }
        }

        Ok(Alignment {
            query: self.query.clone(),
            target: self.target.clone(),
            query_start,
            target_start,
            cigar: Cigar::from(elements),
            score: 0,
        })
    }

    /// Renders the alignment as three lines (query, alignment, target) using the default
    /// characters, for example:
    ///
    /// ```text
    /// ACGTGAACTGACT-ACTGTATGCG
    /// |||||  |||||| ||||||||.|
    /// ACGTG--CTGACTGACTGTATGGG
    /// ```
    pub fn padded_string(&self) -> Result<[String; 3]> {
        self.padded_string_with(
            DEFAULT_MATCH_CHAR,
            DEFAULT_MISMATCH_CHAR,
            DEFAULT_GAP_CHAR,
            DEFAULT_PAD_CHAR,
        )
    }

    /// Renders the alignment as three lines (query, alignment, target).  Only alignment match,
    /// sequence match, sequence mismatch, insertion and deletion operators are supported.
    pub fn padded_string_with(
        &self,
        match_char: char,
        mismatch_char: char,
        gap_char: char,
        pad_char: char,
    ) -> Result<[String; 3]> {
        if let Some(element) = self.cigar.iter().find(|e| {
            !matches!(
                e.op(),
                CigarOp::Match
                    | CigarOp::SequenceMatch
                    | CigarOp::SequenceMismatch
                    | CigarOp::Insertion
                    | CigarOp::Deletion
            )
        }) {
            return Err(CigarError::UnsupportedOperator {
                op: element.op(),
                cigar: self.cigar.to_string(),
            });
        }
        if self.query_end() > self.query.len() {
            return Err(CigarError::SequenceTooShort {
                end: self.query_end(),
                length: self.query.len(),
                space: CoordinateSpace::Query,
            });
        }
        if self.target_end() > self.target.len() {
            return Err(CigarError::SequenceTooShort {
                end: self.target_end(),
                length: self.target.len(),
                space: CoordinateSpace::Target,
            });
        }

        let query = self.query.as_bytes();
        let target = self.target.as_bytes();
        let mut query_buffer = String::new();
        let mut align_buffer = String::new();
        let mut target_buffer = String::new();
        let mut q_offset = self.query_start.saturating_sub(1);
        let mut t_offset = self.target_start.saturating_sub(1);

        for element in &self.cigar {
            for _ in 0..element.length() {
                match element.op() {
                    CigarOp::Insertion => {
                        query_buffer.push(char::from(query[q_offset]));
                        align_buffer.push(gap_char);
                        target_buffer.push(pad_char);
                        q_offset += 1;
                    }
                    CigarOp::Deletion => {
                        query_buffer.push(pad_char);
                        align_buffer.push(gap_char);
                        target_buffer.push(char::from(target[t_offset]));
                        t_offset += 1;
                    }
                    op => {
                        let (q, t) = (query[q_offset], target[t_offset]);
                        query_buffer.push(char::from(q));
                        target_buffer.push(char::from(t));
                        let is_match = match op {
                            CigarOp::SequenceMatch => true,
                            CigarOp::SequenceMismatch => false,
                            _ => q == t,
                        };
                        align_buffer.push(if is_match { match_char } else { mismatch_char });
                        q_offset += 1;
                        t_offset += 1;
                    }
                }
            }
        }

        Ok([query_buffer, align_buffer, target_buffer])
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "query-span: {}-{} target-span: {}-{} score: {} cigar: {}",
            self.query_start,
            self.query_end(),
            self.target_start,
            self.target_end(),
            self.score,
            self.cigar,
        )
    }
}
