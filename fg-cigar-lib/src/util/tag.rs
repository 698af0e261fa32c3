//! Standard SAM tags whose values depend on the alignment and become stale when it is clipped.
use lazy_static::lazy_static;
use noodles::sam::record::data::field::Tag;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StandardTag {
    /// (`MD`)
    MismatchedPositions,
    /// (`NM`)
    EditDistance,
    /// (`UQ`)
    BaseQualitySum,
}

impl AsRef<[u8]> for StandardTag {
    fn as_ref(&self) -> &[u8] {
        match self {
            StandardTag::MismatchedPositions => b"MD",
            StandardTag::EditDistance => b"NM",
            StandardTag::BaseQualitySum => b"UQ",
        }
    }
}

impl From<StandardTag> for Tag {
    fn from(value: StandardTag) -> Self {
        value.as_ref().try_into().unwrap()
    }
}

lazy_static! {
    /// The tags removed from a record when clipping is applied, unless the caller provides
    /// another set.
    pub static ref DEFAULT_TAGS_TO_INVALIDATE: Vec<Tag> = vec![
        StandardTag::MismatchedPositions.into(),
        StandardTag::EditDistance.into(),
        StandardTag::BaseQualitySum.into(),
    ];
}

#[cfg(test)]
mod tests {
    use noodles::sam::record::data::field::Tag;

    use super::{StandardTag, DEFAULT_TAGS_TO_INVALIDATE};

    #[test]
    fn test_default_tags() {
        let expected: Vec<Tag> = ["MD", "NM", "UQ"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(*DEFAULT_TAGS_TO_INVALIDATE, expected);
    }

    #[test]
    fn test_tag_from_standard_tag() {
        let tag: Tag = StandardTag::EditDistance.into();
        assert_eq!(tag, "NM".parse::<Tag>().unwrap());
    }
}
