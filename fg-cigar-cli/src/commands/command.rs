use anyhow::Result;
use clap::builder::PossibleValue;
use enum_dispatch::enum_dispatch;
use fgcigar::align::CoordinateSpace;
use fgcigar::sam::{ClipEnd, ClipUnit};
use std::{fmt::Display, str::FromStr};

#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self) -> Result<()>;
}

/// An enumeration that can be given on the command line by its display name.
pub trait ValueEnum: Display + FromStr {
    fn variants<'a>() -> &'a [Self];

    fn possible_values() -> Vec<PossibleValue> {
        Self::variants()
            .iter()
            .map(|variant| PossibleValue::new(variant.to_string()))
            .collect()
    }
}

impl ValueEnum for ClipEnd {
    fn variants<'a>() -> &'a [Self] {
        &[Self::Start, Self::End]
    }
}

impl ValueEnum for ClipUnit {
    fn variants<'a>() -> &'a [Self] {
        &[Self::Query, Self::Reference]
    }
}

impl ValueEnum for CoordinateSpace {
    fn variants<'a>() -> &'a [Self] {
        &[Self::Query, Self::Target]
    }
}
