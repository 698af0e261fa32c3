//! Alternative alignments stored in the tags of a primary alignment record.
//!
//! Aligners such as BWA report chimeric (supplementary) alignments in the `SA` tag and
//! alternative (secondary) hits in the `XA` or `XB` tags.  Each is a `;`-delimited list of
//! `,`-delimited fields that include a CIGAR:
//!
//! ```text
//! SA:Z:chr1,123,-,100M50S,60,4;
//! XA:Z:chr9,-104599381,49M,4;chr3,+170653467,49M,4;
//! XB:Z:chr9,-104599381,49M,4,0,30;chr3,+170653467,49M,4,0,20;
//! ```
use std::fmt;
use std::str::FromStr;

use crate::cigar::Cigar;
use crate::errors::{CigarError, Result};

fn invalid(tag: &'static str, value: &str, reason: impl Into<String>) -> CigarError {
    CigarError::InvalidTagValue {
        tag,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_field<T: FromStr>(tag: &'static str, part: &str, name: &str, field: &str) -> Result<T> {
    field
        .parse::<T>()
        .map_err(|_| invalid(tag, part, format!("invalid {name}: '{field}'")))
}

/// Converts a 1-based position to a 0-based one.
fn parse_position(tag: &'static str, part: &str, field: &str) -> Result<usize> {
    match parse_field::<usize>(tag, part, "position", field)? {
        0 => Err(invalid(tag, part, "positions are 1-based, found 0")),
        position => Ok(position - 1),
    }
}

fn parse_cigar(tag: &'static str, part: &str, field: &str) -> Result<Cigar> {
    Cigar::parse(field).map_err(|e| invalid(tag, part, e.to_string()))
}

/// A supplementary alignment as stored in the `SA` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SupplementaryAlignment {
    /// The name of the reference sequence aligned to
    pub reference_name: String,
    /// The 0-based start position of the alignment
    pub start: usize,
    pub is_forward: bool,
    pub cigar: Cigar,
    pub mapq: u8,
    /// The number of edits
    pub nm: usize,
}

impl SupplementaryAlignment {
    /// The 0-based exclusive end position of the alignment.
    pub fn end(&self) -> usize {
        self.start + self.cigar.length_on_target()
    }

    /// Parses a single `,`-delimited supplementary alignment, e.g. `chr1,123,-,100M50S,60,4`.
    /// The position is 1-based and the strand is `+` or `-`.
    pub fn parse(part: &str) -> Result<Self> {
        let fields: Vec<&str> = part.split(',').collect();
        let [reference_name, position, strand, cigar, mapq, nm] = fields[..] else {
            return Err(invalid(
                "SA",
                part,
                format!("expected 6 ',' separated fields, found {}", fields.len()),
            ));
        };
        let is_forward = match strand {
            "+" => true,
            "-" => false,
            _ => return Err(invalid("SA", part, format!("invalid strand: '{strand}'"))),
        };
        Ok(Self {
            reference_name: reference_name.to_string(),
            start: parse_position("SA", part, position)?,
            is_forward,
            cigar: parse_cigar("SA", part, cigar)?,
            mapq: parse_field("SA", part, "mapping quality", mapq)?,
            nm: parse_field("SA", part, "edit distance", nm)?,
        })
    }

    /// Parses every supplementary alignment in an `SA` tag value.  Empty parts are skipped, so an
    /// empty value or a lone `;` yields no alignments.
    pub fn parse_sa_tag(value: &str) -> Result<Vec<Self>> {
        value
            .split(';')
            .filter(|part| !part.is_empty())
            .map(Self::parse)
            .collect()
    }
}

impl fmt::Display for SupplementaryAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.reference_name,
            self.start + 1,
            if self.is_forward { '+' } else { '-' },
            self.cigar,
            self.mapq,
            self.nm
        )
    }
}

impl FromStr for SupplementaryAlignment {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A secondary alignment as stored in one part of the `XA` or `XB` tag.  The `XB` form carries
/// the alignment score and mapping quality in addition to the `XA` fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecondaryAlignment {
    pub reference_name: String,
    /// The 0-based start position of the alignment
    pub reference_start: usize,
    pub is_forward: bool,
    pub cigar: Cigar,
    pub edit_distance: usize,
    pub alignment_score: Option<u32>,
    pub mapq: Option<u8>,
}

impl SecondaryAlignment {
    /// The 0-based exclusive end position of the alignment.
    pub fn reference_end(&self) -> usize {
        self.reference_start + self.cigar.length_on_target()
    }

    /// Parses a single part of an `XA` or `XB` tag: `chr,<strand><position>,cigar,NM` optionally
    /// followed by `,AS,MapQ`.  Trailing commas are ignored.
    pub fn from_tag_part(part: &str) -> Result<Self> {
        let fields: Vec<&str> = part.trim_end_matches(',').split(',').collect();
        let (reference_name, stranded_start, cigar, edit_distance, extra) = match fields[..] {
            [name, start, cigar, nm] => (name, start, cigar, nm, None),
            [name, start, cigar, nm, score, mapq] => (name, start, cigar, nm, Some((score, mapq))),
            _ => {
                return Err(invalid(
                    "XA/XB",
                    part,
                    format!("expected 4 or 6 ',' separated fields, found {}", fields.len()),
                ))
            }
        };

        let is_forward = match stranded_start.get(..1) {
            Some("+") if stranded_start.len() > 1 => true,
            Some("-") if stranded_start.len() > 1 => false,
            _ => {
                return Err(invalid(
                    "XA/XB",
                    part,
                    format!("malformed stranded start: '{stranded_start}'"),
                ))
            }
        };

        let (alignment_score, mapq) = match extra {
            Some((score, mapq)) => (
                Some(parse_field("XA/XB", part, "alignment score", score)?),
                Some(parse_field("XA/XB", part, "mapping quality", mapq)?),
            ),
            None => (None, None),
        };

        Ok(Self {
            reference_name: reference_name.to_string(),
            reference_start: parse_position("XA/XB", part, &stranded_start[1..])?,
            is_forward,
            cigar: parse_cigar("XA/XB", part, cigar)?,
            edit_distance: parse_field("XA/XB", part, "edit distance", edit_distance)?,
            alignment_score,
            mapq,
        })
    }

    /// Parses every secondary alignment in an `XA` or `XB` tag value.  Trailing `;`s are ignored.
    pub fn many_from_tag(value: &str) -> Result<Vec<Self>> {
        value
            .trim_end_matches(';')
            .split(';')
            .map(Self::from_tag_part)
            .collect()
    }
}

impl fmt::Display for SecondaryAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}{},{},{}",
            self.reference_name,
            if self.is_forward { '+' } else { '-' },
            self.reference_start + 1,
            self.cigar,
            self.edit_distance
        )?;
        if let (Some(score), Some(mapq)) = (self.alignment_score, self.mapq) {
            write!(f, ",{score},{mapq}")?;
        }
        Ok(())
    }
}
