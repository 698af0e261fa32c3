use std::fmt;

use super::record::AlignmentRecord;
use crate::errors::{CigarError, Result};

/// What to return when a reference position is within the alignment span but not aligned to any
/// query base (i.e. it falls in a deletion or skip).
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum Ambiguity {
    /// The nearest aligned query position before the reference position
    Previous,
    /// The nearest aligned query position after the reference position
    Next,
    /// No query position
    None,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ambiguity::Previous => write!(f, "previous"),
            Ambiguity::Next => write!(f, "next"),
            Ambiguity::None => write!(f, "none"),
        }
    }
}

/// Returns the 0-based query position aligned to the 0-based reference position `ref_pos`.
///
/// Fails if `ref_pos` is not within `[reference_start, reference_end)` of the record, which is
/// always the case for unmapped records.  When `ref_pos` is within the span but not aligned to a
/// query base, `ambiguity` selects the nearest aligned query position before or after it, or
/// none.  Soft-clipped bases count as query positions when scanning.
pub fn read_pos_at_ref_pos(
    record: &AlignmentRecord,
    ref_pos: usize,
    ambiguity: Ambiguity,
) -> Result<Option<usize>> {
    let in_span = match (record.reference_start, record.reference_end()) {
        (Some(start), Some(end)) => start <= ref_pos && ref_pos < end,
        _ => false,
    };
    if !in_span {
        return Err(CigarError::PositionOutOfRange {
            position: ref_pos,
            name: record.name.clone(),
        });
    }

    let pairs = record.aligned_pairs();
    let index = pairs
        .iter()
        .position(|&(_, r)| r == Some(ref_pos))
        .unwrap_or(pairs.len());
    let read_pos = pairs.get(index).and_then(|&(q, _)| q);

    Ok(match (read_pos, ambiguity) {
        (Some(pos), _) => Some(pos),
        (None, Ambiguity::Previous) => pairs[..index].iter().rev().find_map(|&(q, _)| q),
        (None, Ambiguity::Next) => pairs[index..].iter().find_map(|&(q, _)| q),
        (None, Ambiguity::None) => None,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{read_pos_at_ref_pos, Ambiguity};
    use crate::errors::CigarError;
    use crate::sam::record::tests::record;

    #[rstest]
    #[case(100, 0)]
    #[case(150, 50)]
    #[case(199, 99)]
    fn test_simple(#[case] ref_pos: usize, #[case] expected: usize) {
        let rec = record(Some(100), "100M", false);
        assert_eq!(
            read_pos_at_ref_pos(&rec, ref_pos, Ambiguity::None).unwrap(),
            Some(expected)
        );
    }

    #[rstest]
    #[case(99)]
    #[case(200)]
    fn test_position_outside_range(#[case] ref_pos: usize) {
        let rec = record(Some(100), "100M", false);
        assert_eq!(
            read_pos_at_ref_pos(&rec, ref_pos, Ambiguity::None),
            Err(CigarError::PositionOutOfRange {
                position: ref_pos,
                name: "q1".to_string()
            })
        );
    }

    #[rstest]
    fn test_unmapped_record_fails() {
        let rec = record(None, "*", false);
        assert!(read_pos_at_ref_pos(&rec, 0, Ambiguity::Next).is_err());
    }

    #[rstest]
    #[case(100, 0)]
    #[case(110, 10)]
    #[case(120, 20)]
    #[case(130, 29)]
    #[case(140, 39)]
    #[case(150, 49)]
    #[case(160, 60)]
    fn test_indels_nearby(#[case] ref_pos: usize, #[case] expected: usize) {
        let rec = record(Some(100), "25M1D25M1I25M", false);
        assert_eq!(
            read_pos_at_ref_pos(&rec, ref_pos, Ambiguity::None).unwrap(),
            Some(expected)
        );
    }

    #[rstest]
    fn test_with_soft_clipping() {
        let rec = record(Some(100), "10S90M", false);
        assert_eq!(
            read_pos_at_ref_pos(&rec, 100, Ambiguity::None).unwrap(),
            Some(10)
        );
    }

    #[rstest]
    #[case(Ambiguity::None, None)]
    #[case(Ambiguity::Previous, Some(49))]
    #[case(Ambiguity::Next, Some(50))]
    fn test_position_in_deletion(#[case] ambiguity: Ambiguity, #[case] expected: Option<usize>) {
        let rec = record(Some(100), "50M5D50M", false);
        assert_eq!(read_pos_at_ref_pos(&rec, 152, ambiguity).unwrap(), expected);
    }

    #[rstest]
    fn test_position_in_trailing_deletion_has_no_next() {
        let rec = record(Some(100), "10M5D", false);
        assert_eq!(
            read_pos_at_ref_pos(&rec, 112, Ambiguity::Next).unwrap(),
            None
        );
        assert_eq!(
            read_pos_at_ref_pos(&rec, 112, Ambiguity::Previous).unwrap(),
            Some(9)
        );
    }
}
