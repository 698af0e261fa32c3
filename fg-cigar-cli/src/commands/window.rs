use super::command::{Command, ValueEnum};
use anyhow::{Context, Result};
use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Parser,
};
use fgcigar::{
    align::{alignment::Alignment, CoordinateSpace},
    cigar::Cigar,
    util::version::built_info,
};
use fgoxide::io::DelimFile;
use log::info;
use proglog::{CountFormatterKind, ProgLogBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A pairwise alignment as a row of a tab-separated table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRow {
    pub query: String,
    pub target: String,
    /// 1-based
    pub query_start: usize,
    /// 1-based
    pub target_start: usize,
    pub cigar: String,
    pub score: i32,
}

impl AlignmentRow {
    pub fn to_alignment(&self) -> Result<Alignment> {
        let cigar = Cigar::parse(&self.cigar)
            .with_context(|| format!("Invalid cigar for alignment: {}", self.cigar))?;
        Ok(Alignment::new(
            self.query.clone(),
            self.target.clone(),
            self.query_start,
            self.target_start,
            cigar,
            self.score,
        ))
    }
}

impl From<Alignment> for AlignmentRow {
    fn from(alignment: Alignment) -> Self {
        Self {
            cigar: alignment.cigar.to_string(),
            query: alignment.query,
            target: alignment.target,
            query_start: alignment.query_start,
            target_start: alignment.target_start,
            score: alignment.score,
        }
    }
}

/// Restricts pairwise alignments to a window of the query or the target.
///
/// The input is a tab-separated table with a header and the columns `query`, `target`,
/// `query_start`, `target_start` (both 1-based), `cigar` and `score`.  Each alignment is
/// restricted to the 1-based inclusive window `[start, end]` of the chosen sequence, which must
/// lie within the aligned part of every alignment.  The output has the same columns, with the
/// score of each windowed alignment set to zero.
#[derive(Parser, Debug, Clone)]
#[clap(version = built_info::VERSION.as_str(), term_width=0)]
pub struct Window {
    /// The path to the input table of alignments.
    #[clap(long, short = 'i', display_order = 1)]
    input: PathBuf,

    /// The path to the output table of windowed alignments.
    #[clap(long, short = 'o', display_order = 2)]
    output: PathBuf,

    /// The sequence in which the window is given.
    #[clap(
        long,
        short = 's',
        value_parser = PossibleValuesParser::new(CoordinateSpace::possible_values())
            .map(|s| s.parse::<CoordinateSpace>().unwrap()),
        default_value_t = CoordinateSpace::Target,
        ignore_case = true,
        display_order = 3
    )]
    space: CoordinateSpace,

    /// The first position of the window (1-based inclusive).
    #[clap(long, display_order = 4)]
    start: usize,

    /// The last position of the window (1-based inclusive).
    #[clap(long, display_order = 5)]
    end: usize,
}

impl Window {
    /// Executes the window command
    pub fn execute(&self) -> Result<()> {
        info!(
            "Restricting alignments to {} positions {}-{}",
            self.space, self.start, self.end
        );
        let rows: Vec<AlignmentRow> = DelimFile::default()
            .read_tsv(&self.input)
            .with_context(|| format!("Failed to read alignments: {}", self.input.display()))?;

        let progress_logger = ProgLogBuilder::new()
            .name("fgcigar-progress")
            .noun("alignments")
            .verb("Windowed")
            .unit(100_000)
            .count_formatter(CountFormatterKind::Comma)
            .build();

        let mut windowed = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let alignment = row.to_alignment()?;
            let sub = alignment
                .sub(self.start, self.end, self.space)
                .with_context(|| format!("Failed to window alignment #{}: {alignment}", index + 1))?;
            windowed.push(AlignmentRow::from(sub));
            progress_logger.record();
        }

        DelimFile::default()
            .write_tsv(&self.output, &windowed)
            .with_context(|| format!("Failed to write alignments: {}", self.output.display()))?;
        info!("Wrote {} alignments to {}", windowed.len(), self.output.display());
        Ok(())
    }
}

impl Command for Window {
    fn execute(&self) -> anyhow::Result<()> {
        Window::execute(self)
    }
}
