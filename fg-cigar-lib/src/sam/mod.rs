pub mod aux_alignment;
pub mod clipping;
pub mod position;
pub mod record;

pub use aux_alignment::{SecondaryAlignment, SupplementaryAlignment};
pub use clipping::{
    clip_cigar_start, clip_end_of_alignment_by_query, clip_end_of_alignment_by_reference,
    clip_start_of_alignment_by_query, clip_start_of_alignment_by_reference, ClipEnd, ClipUnit,
    Clipper, ClipperBuilder, ClippingInfo,
};
pub use position::{read_pos_at_ref_pos, Ambiguity};
pub use record::{AlignedPair, AlignmentRecord};
