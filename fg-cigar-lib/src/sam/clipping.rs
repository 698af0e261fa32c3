//! Soft-clipping of read alignments.
//!
//! Clipping can be applied to the start or the end of an alignment, and the amount to clip given
//! in query bases or reference bases.  The two differ only when the clipped region contains
//! insertions or deletions.  Clipping is applied inside any existing hard and soft clipping, so
//! `5S100M` clipped by 10 query bases at the start becomes `15S90M`.
//!
//! Any clipping may invalidate alignment-derived tags (by default `MD`, `NM` and `UQ`), which are
//! removed.  Clipping the start of an alignment moves its reference start.  A record left with no
//! aligned bases is unmapped.
use std::fmt;
use std::str::FromStr;

use derive_builder::Builder;
use derive_getters::Getters;
use log::debug;
use noodles::sam::record::data::field::Tag;

use super::position::{read_pos_at_ref_pos, Ambiguity};
use super::record::AlignmentRecord;
use crate::cigar::{Cigar, CigarElement, CigarOp};
use crate::errors::{CigarError, Result};
use crate::util::tag::DEFAULT_TAGS_TO_INVALIDATE;

/// The number of query and reference bases removed from the alignment by a clipping operation.
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone, Hash)]
pub struct ClippingInfo {
    pub query_bases_clipped: usize,
    pub reference_bases_clipped: usize,
}

impl ClippingInfo {
    pub fn new(query_bases_clipped: usize, reference_bases_clipped: usize) -> Self {
        Self {
            query_bases_clipped,
            reference_bases_clipped,
        }
    }
}

/// Which end of the alignment to clip.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum ClipEnd {
    Start,
    End,
}

impl fmt::Display for ClipEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipEnd::Start => write!(f, "start"),
            ClipEnd::End => write!(f, "end"),
        }
    }
}

impl FromStr for ClipEnd {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(ClipEnd::Start),
            "end" => Ok(ClipEnd::End),
            _ => Err(CigarError::InvalidName {
                kind: "clip end",
                value: s.to_string(),
            }),
        }
    }
}

/// The units in which the number of bases to clip is given.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum ClipUnit {
    Query,
    Reference,
}

impl fmt::Display for ClipUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipUnit::Query => write!(f, "query"),
            ClipUnit::Reference => write!(f, "reference"),
        }
    }
}

impl FromStr for ClipUnit {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "query" | "read" => Ok(ClipUnit::Query),
            "reference" | "ref" | "target" => Ok(ClipUnit::Reference),
            _ => Err(CigarError::InvalidName {
                kind: "clip unit",
                value: s.to_string(),
            }),
        }
    }
}

/// Clips records with a fixed quality to assign to clipped bases and a fixed set of tags to
/// remove.
#[derive(Clone, Debug, Builder, Getters)]
#[builder(name = "ClipperBuilder", build_fn(name = "build_clipper"))]
pub struct Clipper {
    /// If set, the quality assigned to every soft-clipped base after clipping
    #[builder(default)]
    fill_quality: Option<u8>,
    /// The tags removed from clipped records
    #[builder(default = "DEFAULT_TAGS_TO_INVALIDATE.clone()")]
    tags_to_invalidate: Vec<Tag>,
}

impl Default for Clipper {
    fn default() -> Self {
        Self {
            fill_quality: None,
            tags_to_invalidate: DEFAULT_TAGS_TO_INVALIDATE.clone(),
        }
    }
}

impl Clipper {
    /// Clips `n` bases, in the given units, from the given end of the record's alignment.
    pub fn clip(
        &self,
        record: &mut AlignmentRecord,
        end: ClipEnd,
        unit: ClipUnit,
        n: usize,
    ) -> Result<ClippingInfo> {
        match (end, unit) {
            (ClipEnd::Start, ClipUnit::Query) => self.clip_start_by_query(record, n),
            (ClipEnd::End, ClipUnit::Query) => self.clip_end_by_query(record, n),
            (ClipEnd::Start, ClipUnit::Reference) => self.clip_start_by_reference(record, n),
            (ClipEnd::End, ClipUnit::Reference) => self.clip_end_by_reference(record, n),
        }
    }

    pub fn clip_start_by_query(
        &self,
        record: &mut AlignmentRecord,
        n: usize,
    ) -> Result<ClippingInfo> {
        clip_start_of_alignment_by_query(record, n, self.fill_quality, &self.tags_to_invalidate)
    }

    pub fn clip_end_by_query(
        &self,
        record: &mut AlignmentRecord,
        n: usize,
    ) -> Result<ClippingInfo> {
        clip_end_of_alignment_by_query(record, n, self.fill_quality, &self.tags_to_invalidate)
    }

    pub fn clip_start_by_reference(
        &self,
        record: &mut AlignmentRecord,
        n: usize,
    ) -> Result<ClippingInfo> {
        clip_start_of_alignment_by_reference(
            record,
            n,
            self.fill_quality,
            &self.tags_to_invalidate,
        )
    }

    pub fn clip_end_by_reference(
        &self,
        record: &mut AlignmentRecord,
        n: usize,
    ) -> Result<ClippingInfo> {
        clip_end_of_alignment_by_reference(record, n, self.fill_quality, &self.tags_to_invalidate)
    }
}

/// Soft-clips `n` query bases from the start of the alignment, after any existing clipping, and
/// moves the reference start past the clipped reference bases.
///
/// Unmapped records and `n == 0` are left unchanged.  If `n` is at least the number of aligned
/// query bases the record is unmapped.  An insertion straddling the clip point is clipped in
/// full, and a deletion immediately following the clip point is removed.
///
/// Because a straddled insertion is clipped in full, a record with fewer than `n` aligned bases
/// outside its insertions may stay mapped with nothing but clipping left, e.g. `5M5I` clipped by
/// 6 becomes `10S` at a reference start moved past the `5M`.
pub fn clip_start_of_alignment_by_query(
    record: &mut AlignmentRecord,
    n: usize,
    fill_quality: Option<u8>,
    tags_to_invalidate: &[Tag],
) -> Result<ClippingInfo> {
    if record.is_unmapped() || n < 1 {
        return Ok(ClippingInfo::default());
    }
    if n >= record.query_alignment_length() {
        return Ok(clip_whole_record(record, tags_to_invalidate));
    }

    let (cigar, info) = clip_cigar_start(&record.cigar, &mut record.quals, n, fill_quality)?;
    record.reference_start = record
        .reference_start
        .map(|start| start + info.reference_bases_clipped);
    record.cigar = cigar;
    record.remove_tags(tags_to_invalidate);
    Ok(info)
}

/// Soft-clips `n` query bases from the end of the alignment, before any existing clipping.  The
/// reference start is unchanged.  See [`clip_start_of_alignment_by_query`], including the case
/// where only clipping remains (e.g. `5I5M` clipped by 6 becomes `10S`).
pub fn clip_end_of_alignment_by_query(
    record: &mut AlignmentRecord,
    n: usize,
    fill_quality: Option<u8>,
    tags_to_invalidate: &[Tag],
) -> Result<ClippingInfo> {
    if record.is_unmapped() || n < 1 {
        return Ok(ClippingInfo::default());
    }
    if n >= record.query_alignment_length() {
        return Ok(clip_whole_record(record, tags_to_invalidate));
    }

    // clip the reversed alignment from its start, then restore the orientation
    let reversed = record.cigar.reversed();
    record.quals.reverse();
    let clipped = clip_cigar_start(&reversed, &mut record.quals, n, fill_quality);
    record.quals.reverse();
    let (cigar, info) = clipped?;

    record.cigar = cigar.reversed();
    record.remove_tags(tags_to_invalidate);
    Ok(info)
}

/// Soft-clips the query bases aligned to the first `n` reference bases of the alignment.
///
/// When the new first reference position falls in a deletion the clip extends to the next aligned
/// query base.  If `n` is at least the reference length of the alignment the record is unmapped.
pub fn clip_start_of_alignment_by_reference(
    record: &mut AlignmentRecord,
    n: usize,
    fill_quality: Option<u8>,
    tags_to_invalidate: &[Tag],
) -> Result<ClippingInfo> {
    let Some(reference_start) = record.reference_start.filter(|_| !record.unmapped) else {
        return Ok(ClippingInfo::default());
    };
    if n < 1 {
        return Ok(ClippingInfo::default());
    }
    if record.reference_length() <= n {
        return Ok(clip_whole_record(record, tags_to_invalidate));
    }

    let new_start = reference_start + n;
    let Some(new_query_start) = read_pos_at_ref_pos(record, new_start, Ambiguity::Next)? else {
        return Ok(clip_whole_record(record, tags_to_invalidate));
    };
    let query_alignment_start = record
        .cigar
        .query_alignment_offsets()
        .map_or(0, |offsets| offsets.start);
    clip_start_of_alignment_by_query(
        record,
        new_query_start.saturating_sub(query_alignment_start),
        fill_quality,
        tags_to_invalidate,
    )
}

/// Soft-clips the query bases aligned to the last `n` reference bases of the alignment.  See
/// [`clip_start_of_alignment_by_reference`].
pub fn clip_end_of_alignment_by_reference(
    record: &mut AlignmentRecord,
    n: usize,
    fill_quality: Option<u8>,
    tags_to_invalidate: &[Tag],
) -> Result<ClippingInfo> {
    let Some(reference_end) = record.reference_end() else {
        return Ok(ClippingInfo::default());
    };
    if n < 1 {
        return Ok(ClippingInfo::default());
    }
    if record.reference_length() <= n {
        return Ok(clip_whole_record(record, tags_to_invalidate));
    }

    let new_end = reference_end - n;
    let Some(new_query_end) = read_pos_at_ref_pos(record, new_end, Ambiguity::Next)? else {
        return Ok(clip_whole_record(record, tags_to_invalidate));
    };
    let query_alignment_end = record
        .cigar
        .query_alignment_offsets()
        .map_or(0, |offsets| offsets.end);
    clip_end_of_alignment_by_query(
        record,
        query_alignment_end.saturating_sub(new_query_end),
        fill_quality,
        tags_to_invalidate,
    )
}

/// Unmaps the record, reporting all of its aligned bases as clipped.
fn clip_whole_record(record: &mut AlignmentRecord, tags_to_invalidate: &[Tag]) -> ClippingInfo {
    let info = ClippingInfo::new(record.query_alignment_length(), record.reference_length());
    debug!(
        "Unmapping {} after clipping all {} aligned bases ({})",
        record.name, info.query_bases_clipped, record.cigar
    );
    record.remove_tags(tags_to_invalidate);
    record.unmap();
    info
}

/// Soft-clips `n` query bases from the start of `cigar`, after any existing hard and soft
/// clipping, returning the new CIGAR and the number of query and reference bases clipped.
///
/// Requires that `cigar` has more than `n` aligned query bases.  If `fill_quality` is set, the
/// qualities of the newly soft-clipped bases are set to it; bases that were already soft-clipped
/// keep their qualities.  CIGARs containing padding are not supported.
pub fn clip_cigar_start(
    cigar: &Cigar,
    quals: &mut [u8],
    n: usize,
    fill_quality: Option<u8>,
) -> Result<(Cigar, ClippingInfo)> {
    if cigar.contains(CigarOp::Padding) {
        return Err(CigarError::UnsupportedOperator {
            op: CigarOp::Padding,
            cigar: cigar.to_string(),
        });
    }

    let elements = cigar.elements();
    let peek = |index: usize| elements.get(index).map(CigarElement::op);

    let mut index = 0;
    let mut hard_clip_length = 0;
    while peek(index) == Some(CigarOp::HardClip) {
        hard_clip_length += elements[index].length();
        index += 1;
    }
    let mut soft_clip_length = 0;
    while peek(index) == Some(CigarOp::SoftClip) {
        soft_clip_length += elements[index].length();
        index += 1;
    }

    let mut query_bases_clipped = 0;
    let mut reference_bases_clipped = 0;
    // the part of an element split by the clip point, if any
    let mut remainder: Option<CigarElement> = None;

    // a deletion directly after the clip point is clipped with it
    let is_trailing_deletion = |clipped: usize, remainder: &Option<CigarElement>, index: usize| {
        clipped == n && remainder.is_none() && peek(index) == Some(CigarOp::Deletion)
    };

    while query_bases_clipped < n
        || is_trailing_deletion(query_bases_clipped, &remainder, index)
    {
        let Some(element) = elements.get(index) else {
            break;
        };
        index += 1;
        let remaining = n.saturating_sub(query_bases_clipped);

        if element.op().consumes_query() && element.length() > remaining {
            if element.op() == CigarOp::Insertion {
                query_bases_clipped += element.length();
            } else {
                remainder = Some(element.with_length(element.length() - remaining)?);
                query_bases_clipped += remaining;
                reference_bases_clipped += remaining;
            }
        } else {
            query_bases_clipped += element.length_on_query();
            reference_bases_clipped += element.length_on_target();
        }
    }

    let existing_soft_clip_length = soft_clip_length;
    soft_clip_length += query_bases_clipped;
    let mut clipped = Vec::with_capacity(elements.len() - index + 3);
    if hard_clip_length > 0 {
        clipped.push(CigarElement::new(hard_clip_length, CigarOp::HardClip)?);
    }
    if soft_clip_length > 0 {
        clipped.push(CigarElement::new(soft_clip_length, CigarOp::SoftClip)?);
    }
    clipped.extend(remainder);
    clipped.extend_from_slice(&elements[index..]);

    if let Some(quality) = fill_quality {
        quals
            .iter_mut()
            .take(soft_clip_length)
            .skip(existing_soft_clip_length)
            .for_each(|q| *q = quality);
    }

    Ok((
        Cigar::from(clipped),
        ClippingInfo::new(query_bases_clipped, reference_bases_clipped),
    ))
}
