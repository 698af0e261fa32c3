use std::collections::HashMap;

use noodles::sam::record::data::field::{Tag, Value};

use crate::cigar::Cigar;
use crate::util::dna::reverse_complement_in_place;

/// A query/reference position pair; either side is absent for bases that are not aligned to the
/// other sequence.
pub type AlignedPair = (Option<usize>, Option<usize>);

/// A single read alignment: the mutable state that clipping acts on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentRecord {
    /// The read name
    pub name: String,

    /// Index of the reference sequence, `None` when unmapped
    pub reference_id: Option<usize>,

    /// Start position of the alignment on the reference (0-based), `None` when unmapped
    pub reference_start: Option<usize>,

    pub cigar: Cigar,

    /// The read bases, in reference orientation when mapped to the reverse strand
    pub bases: Vec<u8>,

    /// The base qualities (Phred scale, not ASCII offset), parallel to `bases`
    pub quals: Vec<u8>,

    pub mapping_quality: u8,
    pub template_length: i32,

    pub unmapped: bool,
    pub reverse: bool,
    pub duplicate: bool,
    pub secondary: bool,
    pub supplementary: bool,
    pub proper_pair: bool,

    pub tags: HashMap<Tag, Value>,
}

impl AlignmentRecord {
    /// Creates an unmapped record with the given name, bases and qualities.
    pub fn unmapped(name: impl Into<String>, bases: Vec<u8>, quals: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bases,
            quals,
            unmapped: true,
            ..Self::default()
        }
    }

    /// Creates a record mapped to the given reference at the given 0-based start.
    pub fn mapped(
        name: impl Into<String>,
        reference_id: usize,
        reference_start: usize,
        cigar: Cigar,
        bases: Vec<u8>,
        quals: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            reference_id: Some(reference_id),
            reference_start: Some(reference_start),
            cigar,
            bases,
            quals,
            ..Self::default()
        }
    }

    /// True if the record is unmapped or has no reference position.
    pub fn is_unmapped(&self) -> bool {
        self.unmapped || self.reference_start.is_none()
    }

    /// The 0-based exclusive end of the alignment on the reference.
    pub fn reference_end(&self) -> Option<usize> {
        if self.is_unmapped() {
            return None;
        }
        self.reference_start
            .map(|start| start + self.cigar.length_on_target())
    }

    /// The number of reference bases spanned by the alignment.
    pub fn reference_length(&self) -> usize {
        if self.is_unmapped() {
            0
        } else {
            self.cigar.length_on_target()
        }
    }

    /// The number of query bases in the aligned part of the read, excluding clipping.
    pub fn query_alignment_length(&self) -> usize {
        self.cigar
            .query_alignment_offsets()
            .map_or(0, |offsets| offsets.len())
    }

    /// Returns a query/reference position pair for every base of every query- or
    /// reference-consuming element.  Soft-clipped and inserted bases have no reference position,
    /// deleted and skipped bases no query position.  Hard clips and padding yield nothing.
    /// Unmapped records have no pairs.
    pub fn aligned_pairs(&self) -> Vec<AlignedPair> {
        let Some(mut ref_pos) = self.reference_start.filter(|_| !self.unmapped) else {
            return Vec::new();
        };
        let mut query_pos = 0;
        let mut pairs =
            Vec::with_capacity(self.cigar.length_on_query() + self.cigar.length_on_target());
        for element in &self.cigar {
            let op = element.op();
            for _ in 0..element.length() {
                match (op.consumes_query(), op.consumes_reference()) {
                    (true, true) => {
                        pairs.push((Some(query_pos), Some(ref_pos)));
                        query_pos += 1;
                        ref_pos += 1;
                    }
                    (true, false) => {
                        pairs.push((Some(query_pos), None));
                        query_pos += 1;
                    }
                    (false, true) => {
                        pairs.push((None, Some(ref_pos)));
                        ref_pos += 1;
                    }
                    (false, false) => break,
                }
            }
        }
        pairs
    }

    /// Removes every one of the given tags that is present.
    pub fn remove_tags<'a, I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = &'a Tag>,
    {
        for tag in tags {
            self.tags.remove(tag);
        }
    }

    /// Removes all mapping information from the record.  Reverse-strand records have their bases
    /// reverse complemented and their qualities reversed, restoring the sequencing orientation.
    pub fn unmap(&mut self) {
        if self.reverse {
            reverse_complement_in_place(&mut self.bases);
            self.quals.reverse();
            self.reverse = false;
        }
        self.reference_id = None;
        self.reference_start = None;
        self.cigar = Cigar::default();
        self.mapping_quality = 0;
        self.template_length = 0;
        self.duplicate = false;
        self.secondary = false;
        self.supplementary = false;
        self.proper_pair = false;
        self.unmapped = true;
    }
}
