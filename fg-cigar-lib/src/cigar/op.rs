use std::fmt::Display;

use noodles::sam::record::cigar::op::Kind;

use crate::errors::{CigarError, Result};

/// The operators that may appear in a SAM CIGAR.  Each operator consumes bases on the query
/// (read), the reference (target), both, or neither.  The set of operators is fixed by the SAM
/// specification.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum CigarOp {
    Match,            // M: consumes query and reference
    Insertion,        // I: consumes query
    Deletion,         // D: consumes reference
    Skip,             // N: consumes reference
    SoftClip,         // S: consumes query
    HardClip,         // H: consumes neither
    Padding,          // P: consumes neither
    SequenceMatch,    // =: consumes query and reference
    SequenceMismatch, // X: consumes query and reference
}

/// All operators, in order of their BAM operator code.
pub const ALL_CIGAR_OPS: [CigarOp; 9] = [
    CigarOp::Match,
    CigarOp::Insertion,
    CigarOp::Deletion,
    CigarOp::Skip,
    CigarOp::SoftClip,
    CigarOp::HardClip,
    CigarOp::Padding,
    CigarOp::SequenceMatch,
    CigarOp::SequenceMismatch,
];

impl CigarOp {
    /// The single character used for the operator in a CIGAR string.
    pub fn character(&self) -> char {
        match *self {
            CigarOp::Match => 'M',
            CigarOp::Insertion => 'I',
            CigarOp::Deletion => 'D',
            CigarOp::Skip => 'N',
            CigarOp::SoftClip => 'S',
            CigarOp::HardClip => 'H',
            CigarOp::Padding => 'P',
            CigarOp::SequenceMatch => '=',
            CigarOp::SequenceMismatch => 'X',
        }
    }

    /// The BAM operator code.
    pub fn code(&self) -> u8 {
        match *self {
            CigarOp::Match => 0,
            CigarOp::Insertion => 1,
            CigarOp::Deletion => 2,
            CigarOp::Skip => 3,
            CigarOp::SoftClip => 4,
            CigarOp::HardClip => 5,
            CigarOp::Padding => 6,
            CigarOp::SequenceMatch => 7,
            CigarOp::SequenceMismatch => 8,
        }
    }

    pub fn consumes_query(&self) -> bool {
        use CigarOp::{Insertion, Match, SequenceMatch, SequenceMismatch, SoftClip};
        matches!(
            self,
            Match | Insertion | SoftClip | SequenceMatch | SequenceMismatch
        )
    }

    pub fn consumes_reference(&self) -> bool {
        use CigarOp::{Deletion, Match, SequenceMatch, SequenceMismatch, Skip};
        matches!(
            self,
            Match | Deletion | Skip | SequenceMatch | SequenceMismatch
        )
    }

    /// True if the operator is an insertion or a deletion.
    pub fn is_indel(&self) -> bool {
        matches!(self, CigarOp::Insertion | CigarOp::Deletion)
    }

    /// True if the operator is a soft or hard clip.
    pub fn is_clipping(&self) -> bool {
        matches!(self, CigarOp::SoftClip | CigarOp::HardClip)
    }

    /// Returns the operator for the given CIGAR character.
    pub fn from_char(character: char) -> Result<Self> {
        ALL_CIGAR_OPS
            .iter()
            .find(|op| op.character() == character)
            .copied()
            .ok_or_else(|| CigarError::InvalidOperator {
                value: character.to_string(),
            })
    }

    /// Returns the operator for the given BAM operator code.
    pub fn from_code(code: u8) -> Result<Self> {
        ALL_CIGAR_OPS
            .get(code as usize)
            .copied()
            .ok_or_else(|| CigarError::InvalidOperator {
                value: code.to_string(),
            })
    }
}

impl Display for CigarOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.character())
    }
}

impl TryFrom<char> for CigarOp {
    type Error = CigarError;

    fn try_from(value: char) -> Result<Self> {
        CigarOp::from_char(value)
    }
}

impl From<CigarOp> for Kind {
    fn from(op: CigarOp) -> Self {
        match op {
            CigarOp::Match => Kind::Match,
            CigarOp::Insertion => Kind::Insertion,
            CigarOp::Deletion => Kind::Deletion,
            CigarOp::Skip => Kind::Skip,
            CigarOp::SoftClip => Kind::SoftClip,
            CigarOp::HardClip => Kind::HardClip,
            CigarOp::Padding => Kind::Pad,
            CigarOp::SequenceMatch => Kind::SequenceMatch,
            CigarOp::SequenceMismatch => Kind::SequenceMismatch,
        }
    }
}

impl From<Kind> for CigarOp {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Match => CigarOp::Match,
            Kind::Insertion => CigarOp::Insertion,
            Kind::Deletion => CigarOp::Deletion,
            Kind::Skip => CigarOp::Skip,
            Kind::SoftClip => CigarOp::SoftClip,
            Kind::HardClip => CigarOp::HardClip,
            Kind::Pad => CigarOp::Padding,
            Kind::SequenceMatch => CigarOp::SequenceMatch,
            Kind::SequenceMismatch => CigarOp::SequenceMismatch,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use itertools::Itertools;
    use noodles::sam::record::cigar::op::Kind;
    use rstest::rstest;

    use super::{CigarOp, ALL_CIGAR_OPS};

    #[rstest]
    #[case(CigarOp::Match, 'M', 0, true, true)]
    #[case(CigarOp::Insertion, 'I', 1, true, false)]
    #[case(CigarOp::Deletion, 'D', 2, false, true)]
    #[case(CigarOp::Skip, 'N', 3, false, true)]
    #[case(CigarOp::SoftClip, 'S', 4, true, false)]
    #[case(CigarOp::HardClip, 'H', 5, false, false)]
    #[case(CigarOp::Padding, 'P', 6, false, false)]
    #[case(CigarOp::SequenceMatch, '=', 7, true, true)]
    #[case(CigarOp::SequenceMismatch, 'X', 8, true, true)]
    fn test_op_attributes(
        #[case] op: CigarOp,
        #[case] character: char,
        #[case] code: u8,
        #[case] consumes_query: bool,
        #[case] consumes_reference: bool,
    ) {
        assert_eq!(op.character(), character);
        assert_eq!(op.code(), code);
        assert_eq!(op.consumes_query(), consumes_query);
        assert_eq!(op.consumes_reference(), consumes_reference);
        assert_eq!(CigarOp::from_char(character).unwrap(), op);
        assert_eq!(CigarOp::from_code(code).unwrap(), op);
        assert_eq!(op.to_string(), character.to_string());
    }

    #[rstest]
    fn test_is_indel() {
        let indels = ALL_CIGAR_OPS
            .iter()
            .copied()
            .filter(CigarOp::is_indel)
            .collect_vec();
        assert_eq!(indels, vec![CigarOp::Insertion, CigarOp::Deletion]);
    }

    #[rstest]
    fn test_is_clipping() {
        let clips = ALL_CIGAR_OPS
            .iter()
            .copied()
            .filter(CigarOp::is_clipping)
            .collect_vec();
        assert_eq!(clips, vec![CigarOp::SoftClip, CigarOp::HardClip]);
    }

    #[rstest]
    #[case('U')]
    #[case('m')]
    #[case('1')]
    fn test_from_char_invalid(#[case] character: char) {
        assert!(CigarOp::from_char(character).is_err());
    }

    #[rstest]
    fn test_from_code_invalid() {
        assert!(CigarOp::from_code(9).is_err());
        assert!(CigarOp::from_code(22).is_err());
    }

    #[rstest]
    fn test_noodles_kind_round_trip() {
        for op in ALL_CIGAR_OPS {
            let kind: Kind = op.into();
            assert_eq!(CigarOp::from(kind), op);
        }
        assert_eq!(Kind::from(CigarOp::Padding), Kind::Pad);
    }
}
