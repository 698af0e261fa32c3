pub mod alignment;

use std::fmt;
use std::str::FromStr;

use crate::cigar::CigarOp;
use crate::errors::{CigarError, Result};

/// The sequence in which a coordinate is expressed.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum CoordinateSpace {
    Query,
    Target,
}

impl CoordinateSpace {
    /// True if the operator advances the position in this coordinate space.
    pub fn is_consumed_by(&self, op: CigarOp) -> bool {
        match self {
            CoordinateSpace::Query => op.consumes_query(),
            CoordinateSpace::Target => op.consumes_reference(),
        }
    }
}

impl fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSpace::Query => write!(f, "query"),
            CoordinateSpace::Target => write!(f, "target"),
        }
    }
}

impl FromStr for CoordinateSpace {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "query" | "q" => Ok(CoordinateSpace::Query),
            "target" | "t" | "reference" => Ok(CoordinateSpace::Target),
            _ => Err(CigarError::InvalidName {
                kind: "coordinate space",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::CoordinateSpace;
    use crate::cigar::CigarOp;
    use crate::errors::CigarError;

    #[rstest]
    #[case(CigarOp::Match, true, true)]
    #[case(CigarOp::Insertion, true, false)]
    #[case(CigarOp::Deletion, false, true)]
    #[case(CigarOp::HardClip, false, false)]
    fn test_is_consumed_by(#[case] op: CigarOp, #[case] query: bool, #[case] target: bool) {
        assert_eq!(CoordinateSpace::Query.is_consumed_by(op), query);
        assert_eq!(CoordinateSpace::Target.is_consumed_by(op), target);
    }

    #[rstest]
    #[case("query", CoordinateSpace::Query)]
    #[case("Target", CoordinateSpace::Target)]
    #[case("reference", CoordinateSpace::Target)]
    fn test_from_str(#[case] name: &str, #[case] expected: CoordinateSpace) {
        assert_eq!(name.parse::<CoordinateSpace>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<CoordinateSpace>().unwrap(), expected);
    }

    #[rstest]
    fn test_from_str_invalid() {
        assert_eq!(
            "both".parse::<CoordinateSpace>(),
            Err(CigarError::InvalidName {
                kind: "coordinate space",
                value: "both".to_string()
            })
        );
    }
}
