//! Error types for CIGAR parsing, alignment windowing and clipping.

use thiserror::Error;

use crate::align::CoordinateSpace;
use crate::cigar::CigarOp;

/// Result type alias for this crate's operations.
pub type Result<T> = std::result::Result<T, CigarError>;

/// Errors produced by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    /// The CIGAR string was the empty string (use `*` for an empty CIGAR).
    #[error("Cigar string was empty")]
    EmptyCigar,

    /// A CIGAR token did not start with a length.
    #[error("Malformed cigar: {annotated}")]
    MissingLength {
        /// The CIGAR string with the offending character wrapped in `[...]`
        annotated: String,
    },

    /// An unrecognized operator, a missing operator, or an unparseable length.
    #[error("Malformed cigar: {annotated}")]
    MalformedCigar {
        /// The CIGAR string with the offending character (or end position) wrapped in `[...]`
        annotated: String,
    },

    /// A CIGAR element with a length of zero.
    #[error("Cigar element must have a length > 0, found {length}")]
    InvalidElement {
        /// The offending length
        length: usize,
    },

    /// An operator character or BAM operator code that is not part of the SAM specification.
    #[error("Invalid cigar operator: {value}")]
    InvalidOperator {
        /// The character or code that could not be mapped to an operator
        value: String,
    },

    /// A window that does not lie within the aligned region.
    #[error(
        "Window {start}-{end} is outside of the aligned region ({extent_start}-{extent_end}) of \
         the {space} sequence"
    )]
    WindowOutOfRange {
        /// The requested 1-based inclusive start
        start: usize,
        /// The requested 1-based inclusive end
        end: usize,
        /// The first aligned position in the coordinate space
        extent_start: usize,
        /// The last aligned position in the coordinate space
        extent_end: usize,
        /// The coordinate space of the window
        space: CoordinateSpace,
    },

    /// An alignment whose extent runs past the end of its query or target sequence.
    #[error("Alignment ends at {end} but the {space} sequence has length {length}")]
    SequenceTooShort {
        /// The 1-based inclusive end of the alignment in the coordinate space
        end: usize,
        /// The length of the sequence
        length: usize,
        /// The sequence that is too short
        space: CoordinateSpace,
    },

    /// A reference position that is not within the reference span of a record.
    #[error("{position} is not within the reference span for read {name}")]
    PositionOutOfRange {
        /// The requested 0-based reference position
        position: usize,
        /// The name of the record
        name: String,
    },

    /// An operator that the requested operation cannot handle.
    #[error("Unsupported cigar operator {op} in cigar: {cigar}")]
    UnsupportedOperator {
        /// The operator that is not supported
        op: CigarOp,
        /// The CIGAR that contained the operator
        cigar: String,
    },

    /// A name that does not match any variant of an enumeration (e.g. a coordinate space).
    #[error("Invalid {kind}: {value}")]
    InvalidName {
        /// What was being parsed
        kind: &'static str,
        /// The unrecognized name
        value: String,
    },

    /// A malformed `SA`, `XA` or `XB` tag value, or one part of it.
    #[error("Invalid {tag} tag value '{value}': {reason}")]
    InvalidTagValue {
        /// The tag being parsed
        tag: &'static str,
        /// The offending value
        value: String,
        /// What was wrong with it
        reason: String,
    },

    /// A CIGAR that could not be converted to or from its `noodles` representation.
    #[error("Incompatible cigar: {reason}")]
    Incompatible {
        /// The reason reported by `noodles`
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_cigar_message() {
        let error = CigarError::MalformedCigar {
            annotated: "10M5[U]4M".to_string(),
        };
        assert_eq!(format!("{error}"), "Malformed cigar: 10M5[U]4M");
    }

    #[test]
    fn test_missing_length_message() {
        let error = CigarError::MissingLength {
            annotated: "[M]".to_string(),
        };
        assert_eq!(format!("{error}"), "Malformed cigar: [M]");
    }

    #[test]
    fn test_window_out_of_range_message() {
        let error = CigarError::WindowOutOfRange {
            start: 1,
            end: 3,
            extent_start: 2,
            extent_end: 4,
            space: CoordinateSpace::Target,
        };
        let msg = format!("{error}");
        assert!(msg.contains("Window 1-3"));
        assert!(msg.contains("(2-4)"));
        assert!(msg.contains("target"));
    }

    #[test]
    fn test_unsupported_operator_message() {
        let error = CigarError::UnsupportedOperator {
            op: CigarOp::Padding,
            cigar: "10P5M".to_string(),
        };
        assert_eq!(format!("{error}"), "Unsupported cigar operator P in cigar: 10P5M");
    }
}
