#![deny(unsafe_code)]
#![allow(
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::clip::Clip;
use commands::command::Command;
use commands::window::Window;
use enum_dispatch::enum_dispatch;
use env_logger::Env;
use fgcigar::util::version::built_info;

#[derive(Parser, Debug)]
#[command(version = built_info::VERSION.as_str())]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[enum_dispatch(Command)]
#[derive(Parser, Debug)]
#[command(version = built_info::VERSION.as_str())]
enum Subcommand {
    Clip(Clip),
    Window(Window),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args: Args = Args::parse();
    args.subcommand.execute()
}
