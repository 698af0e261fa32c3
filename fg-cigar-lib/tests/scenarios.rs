use fgcigar::align::alignment::Alignment;
use fgcigar::align::CoordinateSpace;
use fgcigar::cigar::Cigar;
use fgcigar::sam::{
    read_pos_at_ref_pos, AlignmentRecord, Ambiguity, ClipEnd, ClipUnit, ClipperBuilder,
    ClippingInfo,
};
use fgcigar::util::tag::DEFAULT_TAGS_TO_INVALIDATE;
use fgcigar::CigarError;
use noodles::sam::record::data::field::Value;
use rstest::rstest;

fn record(start: usize, cigar: &str) -> AlignmentRecord {
    let cigar: Cigar = cigar.parse().unwrap();
    let length = cigar.length_on_query();
    let mut record =
        AlignmentRecord::mapped("r1", 0, start, cigar, vec![b'C'; length], vec![35; length]);
    record.mapping_quality = 60;
    for tag in DEFAULT_TAGS_TO_INVALIDATE.iter() {
        record.tags.insert(*tag, Value::from(1));
    }
    record
}

#[test]
fn test_parse_and_display() {
    let cigar = Cigar::parse("1M4D45N37X23I11=").unwrap();
    assert_eq!(cigar.len(), 6);
    assert_eq!(cigar.length_on_query(), 1 + 37 + 23 + 11);
    assert_eq!(cigar.length_on_target(), 1 + 4 + 45 + 37 + 11);
    assert_eq!(cigar.to_string(), "1M4D45N37X23I11=");

    let err = Cigar::parse("10M5U4M").unwrap_err();
    assert_eq!(err.to_string(), "Malformed cigar: 10M5[U]4M");
    assert_eq!(Cigar::parse(""), Err(CigarError::EmptyCigar));
}

#[rstest]
#[case("1=1X6=1X1=", 5, 6, 5, 5, "2=")]
#[case("2=2I6=2D2=", 3, 8, 5, 3, "6=")]
fn test_window_by_target(
    #[case] cigar: &str,
    #[case] start: usize,
    #[case] end: usize,
    #[case] query_start: usize,
    #[case] target_start: usize,
    #[case] expected: &str,
) {
    let alignment = Alignment::new(
        "A".repeat(20),
        "A".repeat(20),
        1,
        1,
        cigar.parse().unwrap(),
        42,
    );
    let sub = alignment.sub(start, end, CoordinateSpace::Target).unwrap();
    assert_eq!(sub.query_start, query_start);
    assert_eq!(sub.target_start, target_start);
    assert_eq!(sub.cigar.to_string(), expected);
    assert_eq!(sub.score, 0);
    assert_eq!(alignment.score, 42);
}

#[test]
fn test_window_over_whole_query_is_identity() {
    let alignment = Alignment::new(
        "A".repeat(30),
        "A".repeat(30),
        3,
        2,
        "5=2I3X4D10=".parse().unwrap(),
        0,
    );
    let sub = alignment
        .sub_by_query(alignment.query_start, alignment.query_end())
        .unwrap();
    assert_eq!(sub.cigar, alignment.cigar);
    assert_eq!(sub.query_start, alignment.query_start);
    assert_eq!(sub.target_start, alignment.target_start);
}

#[rstest]
#[case("8M4I38M", ClipUnit::Query, 10, (12, 8), Some(18), "12S38M")]
#[case("10M4D40M", ClipUnit::Query, 10, (10, 14), Some(24), "10S40M")]
#[case("50M", ClipUnit::Query, 50, (50, 50), None, "*")]
#[case("10M4D40M", ClipUnit::Reference, 12, (10, 14), Some(24), "10S40M")]
#[case("50M", ClipUnit::Reference, 60, (50, 50), None, "*")]
fn test_clip_start(
    #[case] cigar: &str,
    #[case] unit: ClipUnit,
    #[case] n: usize,
    #[case] clipped: (usize, usize),
    #[case] start: Option<usize>,
    #[case] expected: &str,
) {
    let mut rec = record(10, cigar);
    let clipper = ClipperBuilder::default().build_clipper().unwrap();
    let info = clipper.clip(&mut rec, ClipEnd::Start, unit, n).unwrap();
    assert_eq!(info, ClippingInfo::new(clipped.0, clipped.1));
    assert_eq!(rec.reference_start, start);
    assert_eq!(rec.cigar.to_string(), expected);
    assert!(rec.tags.is_empty());
    assert_eq!(rec.bases.len(), rec.quals.len());
}

#[test]
fn test_clip_end_fills_quality() {
    let mut rec = record(10, "5S40M5S");
    let clipper = ClipperBuilder::default()
        .fill_quality(Some(2))
        .build_clipper()
        .unwrap();
    let info = clipper.clip(&mut rec, ClipEnd::End, ClipUnit::Query, 10).unwrap();
    assert_eq!(info, ClippingInfo::new(10, 10));
    assert_eq!(rec.cigar.to_string(), "5S30M15S");
    assert_eq!(rec.reference_start, Some(10));
    assert_eq!(rec.quals[..35], [35; 35]);
    assert_eq!(rec.quals[35..45], [2; 10]);
    assert_eq!(rec.quals[45..], [35; 5]);
}

#[test]
fn test_locate_then_clip_by_reference() {
    let mut rec = record(100, "20M10D20M");
    assert_eq!(
        read_pos_at_ref_pos(&rec, 125, Ambiguity::Next).unwrap(),
        Some(20)
    );
    let clipper = ClipperBuilder::default().build_clipper().unwrap();
    let info = clipper
        .clip(&mut rec, ClipEnd::Start, ClipUnit::Reference, 25)
        .unwrap();
    assert_eq!(info, ClippingInfo::new(20, 30));
    assert_eq!(rec.cigar.to_string(), "20S20M");
    assert_eq!(rec.reference_start, Some(130));
}
