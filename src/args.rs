use clap::{Parser, Subcommand};

use crate::gen;

#[derive(Parser, Clone, Debug)]
#[command(disable_help_subcommand = true)]
pub struct Opt {
    /// debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// defaults to `interp`
    #[command(subcommand)]
    pub subcommand: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Interpolate an image sequence into an mp4 (interactive)
    Interp(gen::interp::Opt),
    /// Only write the ffmpeg concat input file
    FfmpegConcat(gen::ffmpeg_concat::Opt),
    ShellCompletions,
}
