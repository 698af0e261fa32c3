//! The CIGAR model: operators, elements (runs of a single operator) and the CIGAR itself.
//!
//! A [`Cigar`] is parsed from, and formatted to, the SAM CIGAR string grammar: zero or more
//! `<length><operator>` tokens, with `*` denoting the empty CIGAR.  Adjacent elements with the
//! same operator are never merged.
use std::fmt;
use std::ops::{Index, Range};
use std::str::FromStr;

use itertools::Itertools;
use noodles::sam::record::cigar::Op as SamOp;
use noodles::sam::record::Cigar as SamCigar;

use crate::errors::{CigarError, Result};

mod op;

pub use op::{CigarOp, ALL_CIGAR_OPS};

/// A single run of one operator within a [`Cigar`].
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub struct CigarElement {
    length: usize,
    op: CigarOp,
}

impl CigarElement {
    /// Creates a new element, failing if `length` is zero.
    pub fn new(length: usize, op: CigarOp) -> Result<Self> {
        if length == 0 {
            return Err(CigarError::InvalidElement { length });
        }
        Ok(Self { length, op })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn op(&self) -> CigarOp {
        self.op
    }

    /// The number of query bases covered by this element.
    pub fn length_on_query(&self) -> usize {
        if self.op.consumes_query() {
            self.length
        } else {
            0
        }
    }

    /// The number of target (reference) bases covered by this element.
    pub fn length_on_target(&self) -> usize {
        if self.op.consumes_reference() {
            self.length
        } else {
            0
        }
    }

    /// Returns a copy of this element with a new length, keeping the operator.
    pub(crate) fn with_length(&self, length: usize) -> Result<Self> {
        Self::new(length, self.op)
    }
}

impl fmt::Display for CigarElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.op.character())
    }
}

/// An ordered sequence of [`CigarElement`]s, front-to-back along the query.  The empty CIGAR is
/// valid and represents "no alignment".
#[derive(Debug, Eq, PartialEq, Clone, Default, Hash)]
pub struct Cigar {
    elements: Vec<CigarElement>,
}

impl Cigar {
    pub fn new(elements: Vec<CigarElement>) -> Self {
        Self { elements }
    }

    /// Parses a CIGAR string.  `*` yields the empty CIGAR.
    ///
    /// When parsing fails, the error message contains the CIGAR string with the offending
    /// character (or the empty end-of-string position) wrapped in square brackets, e.g.
    /// `10M5[U]4M` or `10M5[]`.
    pub fn parse(cigar: &str) -> Result<Self> {
        if cigar == "*" {
            return Ok(Self::default());
        }
        if cigar.is_empty() {
            return Err(CigarError::EmptyCigar);
        }

        let chars: Vec<char> = cigar.chars().collect();
        let mut elements = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let Some(mut length) = chars[i].to_digit(10).map(|d| d as usize) else {
                return Err(CigarError::MissingLength {
                    annotated: annotate(&chars, i),
                });
            };
            i += 1;
            while let Some(digit) = chars.get(i).and_then(|c| c.to_digit(10)) {
                length = length
                    .checked_mul(10)
                    .and_then(|l| l.checked_add(digit as usize))
                    .ok_or_else(|| CigarError::MalformedCigar {
                        annotated: annotate(&chars, i),
                    })?;
                i += 1;
            }
            let op = chars
                .get(i)
                .and_then(|&c| CigarOp::from_char(c).ok())
                .ok_or_else(|| CigarError::MalformedCigar {
                    annotated: annotate(&chars, i),
                })?;
            elements.push(CigarElement::new(length, op)?);
            i += 1;
        }
        Ok(Self { elements })
    }

    pub fn elements(&self) -> &[CigarElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CigarElement> {
        self.elements.iter()
    }

    /// The number of elements (not bases) in the CIGAR.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn first(&self) -> Option<&CigarElement> {
        self.elements.first()
    }

    pub fn last(&self) -> Option<&CigarElement> {
        self.elements.last()
    }

    /// Returns a copy of the CIGAR with the elements in reverse order.
    pub fn reversed(&self) -> Self {
        Self {
            elements: self.elements.iter().rev().copied().collect(),
        }
    }

    /// The length of the alignment on the query sequence, including soft-clipped bases.
    pub fn length_on_query(&self) -> usize {
        self.elements.iter().map(CigarElement::length_on_query).sum()
    }

    /// The length of the alignment on the target sequence.
    pub fn length_on_target(&self) -> usize {
        self.elements.iter().map(CigarElement::length_on_target).sum()
    }

    /// True if any element has the given operator.
    pub fn contains(&self, op: CigarOp) -> bool {
        self.elements.iter().any(|e| e.op == op)
    }

    /// Returns the 0-based, end-exclusive range of offsets in the query of the aligned bases,
    /// i.e. excluding any leading or trailing clipping.  Returns `None` if no query bases are
    /// aligned.
    ///
    /// To count from the end of the query, use `cigar.reversed().query_alignment_offsets()`.
    pub fn query_alignment_offsets(&self) -> Option<Range<usize>> {
        let mut start = 0;
        let mut end = 0;
        let mut alignment_began = false;
        for element in &self.elements {
            if element.op.is_clipping() && !alignment_began {
                // hard clips have zero length on the query
                start += element.length_on_query();
                end += element.length_on_query();
            } else if !element.op.is_clipping() {
                alignment_began = true;
                end += element.length_on_query();
            } else {
                break;
            }
        }
        if start == end {
            None
        } else {
            Some(start..end)
        }
    }
}

/// Formats the CIGAR string with the character at `index` (or the empty end position) wrapped in
/// square brackets.
fn annotate(chars: &[char], index: usize) -> String {
    let prefix: String = chars[..index.min(chars.len())].iter().collect();
    let character: String = chars.get(index).map(char::to_string).unwrap_or_default();
    let suffix: String = chars.iter().skip(index + 1).collect();
    format!("{prefix}[{character}]{suffix}")
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            write!(f, "*")
        } else {
            write!(f, "{}", self.elements.iter().join(""))
        }
    }
}

impl FromStr for Cigar {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self> {
        Cigar::parse(s)
    }
}

impl From<Vec<CigarElement>> for Cigar {
    fn from(elements: Vec<CigarElement>) -> Self {
        Self { elements }
    }
}

impl FromIterator<CigarElement> for Cigar {
    fn from_iter<I: IntoIterator<Item = CigarElement>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for Cigar {
    type Output = CigarElement;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a Cigar {
    type Item = &'a CigarElement;
    type IntoIter = std::slice::Iter<'a, CigarElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl TryFrom<&SamCigar> for Cigar {
    type Error = CigarError;

    fn try_from(cigar: &SamCigar) -> Result<Self> {
        cigar
            .iter()
            .map(|op| CigarElement::new(op.len(), op.kind().into()))
            .collect()
    }
}

impl TryFrom<&Cigar> for SamCigar {
    type Error = CigarError;

    fn try_from(cigar: &Cigar) -> Result<Self> {
        let ops: Vec<SamOp> = cigar
            .iter()
            .map(|element| SamOp::new(element.op.into(), element.length))
            .collect();
        SamCigar::try_from(ops).map_err(|e| CigarError::Incompatible {
            reason: e.to_string(),
        })
    }
}
