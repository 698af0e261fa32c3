use super::command::{Command, ValueEnum};
use anyhow::{bail, Context, Result};
use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Parser,
};
use fgcigar::{
    cigar::Cigar,
    sam::{AlignmentRecord, ClipEnd, ClipUnit, ClipperBuilder, ClippingInfo},
    util::version::built_info,
};
use fgoxide::io::DelimFile;
use log::info;
use noodles::sam::record::data::field::Tag;
use proglog::{CountFormatterKind, ProgLogBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The offset of Phred+33 encoded base qualities.
const PHRED_OFFSET: u8 = 33;

////////////////////////////////////////////////////////////////////////////////
// Rows of the input and output tables
////////////////////////////////////////////////////////////////////////////////

/// A single alignment record as a row of a tab-separated table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub name: String,
    /// Empty when unmapped
    pub reference_id: Option<usize>,
    /// The 1-based start position, empty when unmapped
    pub position: Option<usize>,
    /// `*` when unmapped
    pub cigar: String,
    /// `+` or `-`
    pub strand: String,
    pub bases: String,
    /// Phred+33 encoded, or `*` when absent
    pub quals: String,
}

impl RecordRow {
    /// Converts the row to a record, unmapped if it has no position or an empty CIGAR.
    pub fn to_record(&self) -> Result<AlignmentRecord> {
        let cigar = match self.cigar.as_str() {
            "" => Cigar::default(),
            cigar => Cigar::parse(cigar)
                .with_context(|| format!("Invalid cigar for record {}", self.name))?,
        };
        let reverse = match self.strand.as_str() {
            "+" => false,
            "-" => true,
            strand => bail!("Invalid strand for record {}: {}", self.name, strand),
        };
        let quals = match self.quals.as_str() {
            "" | "*" => Vec::new(),
            quals => quals
                .bytes()
                .map(|q| q.checked_sub(PHRED_OFFSET))
                .collect::<Option<Vec<u8>>>()
                .with_context(|| format!("Invalid base qualities for record {}", self.name))?,
        };
        let bases = self.bases.as_bytes().to_vec();

        let record = match (self.reference_id, self.position) {
            (Some(reference_id), Some(position)) if !cigar.is_empty() => {
                if position == 0 {
                    bail!("Positions are 1-based, found 0 for record {}", self.name);
                }
                let mut record = AlignmentRecord::mapped(
                    self.name.clone(),
                    reference_id,
                    position - 1,
                    cigar,
                    bases,
                    quals,
                );
                record.reverse = reverse;
                record
            }
            _ => {
                let mut record = AlignmentRecord::unmapped(self.name.clone(), bases, quals);
                record.reverse = reverse;
                record
            }
        };
        Ok(record)
    }
}

impl From<&AlignmentRecord> for RecordRow {
    fn from(record: &AlignmentRecord) -> Self {
        let quals = if record.quals.is_empty() {
            "*".to_string()
        } else {
            record
                .quals
                .iter()
                .map(|&q| char::from(q.saturating_add(PHRED_OFFSET)))
                .collect()
        };
        Self {
            name: record.name.clone(),
            reference_id: record.reference_id,
            position: record.reference_start.map(|start| start + 1),
            cigar: record.cigar.to_string(),
            strand: if record.reverse { "-" } else { "+" }.to_string(),
            bases: String::from_utf8_lossy(&record.bases).into_owned(),
            quals,
        }
    }
}

/// An alignment record after clipping, with the number of bases clipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClippedRecordRow {
    pub name: String,
    pub reference_id: Option<usize>,
    pub position: Option<usize>,
    pub cigar: String,
    pub strand: String,
    pub bases: String,
    pub quals: String,
    pub query_bases_clipped: usize,
    pub reference_bases_clipped: usize,
}

impl ClippedRecordRow {
    fn new(record: &AlignmentRecord, info: ClippingInfo) -> Self {
        let row = RecordRow::from(record);
        Self {
            name: row.name,
            reference_id: row.reference_id,
            position: row.position,
            cigar: row.cigar,
            strand: row.strand,
            bases: row.bases,
            quals: row.quals,
            query_bases_clipped: info.query_bases_clipped,
            reference_bases_clipped: info.reference_bases_clipped,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Clip (main class) and it's impls
////////////////////////////////////////////////////////////////////////////////

/// Soft-clips the start or end of alignment records.
///
/// The input is a tab-separated table with a header and the columns `name`, `reference_id`,
/// `position` (1-based), `cigar`, `strand` (`+` or `-`), `bases` and `quals` (Phred+33, or `*`).
/// Unmapped records have empty `reference_id` and `position` columns and a `*` cigar.
///
/// Clipping is applied inside any existing hard or soft clipping, and may be given in query
/// bases or reference bases.  The two differ only when the clipped region contains insertions or
/// deletions: an insertion straddling the clip point is clipped in full, and a deletion directly
/// after the clip point is removed.  Records with no aligned bases left are unmapped, and
/// reverse strand records that are unmapped are reverse complemented.
///
/// The output has the same columns as the input, followed by `query_bases_clipped` and
/// `reference_bases_clipped`.
#[derive(Parser, Debug, Clone)]
#[clap(version = built_info::VERSION.as_str(), term_width=0)]
pub struct Clip {
    /// The path to the input table of alignment records.
    #[clap(long, short = 'i', display_order = 1)]
    input: PathBuf,

    /// The path to the output table of clipped alignment records.
    #[clap(long, short = 'o', display_order = 2)]
    output: PathBuf,

    /// The end of the alignment to clip.
    #[clap(
        long,
        short = 'e',
        value_parser = PossibleValuesParser::new(ClipEnd::possible_values())
            .map(|s| s.parse::<ClipEnd>().unwrap()),
        default_value_t = ClipEnd::Start,
        ignore_case = true,
        display_order = 3
    )]
    end: ClipEnd,

    /// The units of the number of bases to clip:
    /// - query: bases of the read
    /// - reference: bases of the reference the read is aligned to
    #[clap(
        long,
        short = 'u',
        value_parser = PossibleValuesParser::new(ClipUnit::possible_values())
            .map(|s| s.parse::<ClipUnit>().unwrap()),
        default_value_t = ClipUnit::Query,
        ignore_case = true,
        display_order = 4,
        verbatim_doc_comment
    )]
    unit: ClipUnit,

    /// The number of bases to clip.
    #[clap(long, short = 'n', display_order = 5)]
    bases: usize,

    /// Set the base quality of all soft-clipped bases to this value.
    #[clap(long, short = 'q', display_order = 6)]
    quality: Option<u8>,

    /// The SAM tags to remove from clipped records [default: MD NM UQ]
    #[clap(long, short = 't', num_args = 1.., display_order = 7)]
    tags: Vec<String>,
}

impl Clip {
    fn tags_to_invalidate(&self) -> Result<Vec<Tag>> {
        self.tags
            .iter()
            .map(|tag| {
                tag.parse::<Tag>()
                    .with_context(|| format!("Invalid SAM tag: {tag}"))
            })
            .collect()
    }

    /// Executes the clip command
    pub fn execute(&self) -> Result<()> {
        info!(
            "Clipping {} {} bases from the {} of each alignment",
            self.bases, self.unit, self.end
        );
        info!("Reading records from {}", self.input.display());
        let rows: Vec<RecordRow> = DelimFile::default()
            .read_tsv(&self.input)
            .with_context(|| format!("Failed to read records: {}", self.input.display()))?;

        let mut builder = ClipperBuilder::default();
        builder.fill_quality(self.quality);
        if !self.tags.is_empty() {
            builder.tags_to_invalidate(self.tags_to_invalidate()?);
        }
        let clipper = builder.build_clipper()?;

        let progress_logger = ProgLogBuilder::new()
            .name("fgcigar-progress")
            .noun("records")
            .verb("Clipped")
            .unit(100_000)
            .count_formatter(CountFormatterKind::Comma)
            .build();

        let mut clipped = Vec::with_capacity(rows.len());
        let mut num_unmapped = 0;
        for row in &rows {
            let mut record = row.to_record()?;
            let was_mapped = !record.is_unmapped();
            let info = clipper
                .clip(&mut record, self.end, self.unit, self.bases)
                .with_context(|| format!("Failed to clip record {}", row.name))?;
            if was_mapped && record.is_unmapped() {
                num_unmapped += 1;
            }
            clipped.push(ClippedRecordRow::new(&record, info));
            progress_logger.record();
        }

        DelimFile::default()
            .write_tsv(&self.output, &clipped)
            .with_context(|| format!("Failed to write records: {}", self.output.display()))?;
        info!(
            "Wrote {} records to {} ({} unmapped by clipping)",
            clipped.len(),
            self.output.display(),
            num_unmapped
        );
        Ok(())
    }
}

impl Command for Clip {
    fn execute(&self) -> anyhow::Result<()> {
        Clip::execute(self)
    }
}
