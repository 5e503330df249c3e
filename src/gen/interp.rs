use std::{
    error::Error,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use tracing::{debug, info, warn};

use crate::{
    error::{self, Result},
    options::{Defaults, OptKey, OptValue, OptionTable, TextOverlay, DEFAULT_INPUT_FPS},
    output_path::{output_filename_normalize, resolve_output_path, MAX_PATH},
    prompt::Prompter,
    utils,
};

use super::{
    ffmpeg_demuxer_create, ffmpeg_run, filter_desc, manifest::Manifest, print_command_output,
    FfmpegCmd,
};

/// Fixed concat input file name, shared by every run in the working directory
pub const DEFAULT_MANIFEST: &str = "~ffmpeg_inputs.txt";

#[derive(Parser, Debug, Clone)]
pub struct Opt {
    /// ffmpeg executable
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: String,
    /// concat demuxer input file (left in place after the run)
    #[arg(long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
    /// show the final frame for this many frames
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub hold: u32,
    /// longest accepted output path
    #[arg(long, default_value_t = MAX_PATH)]
    pub max_path: usize,
    /// print ffmpeg output after a successful run
    #[arg(long)]
    pub debug: bool,
    #[command(flatten)]
    pub overlay: TextOverlay,
}

/// Steps of one run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CollectingGeneralOptions,
    CollectingModeOptions,
    BuildingManifest,
    ResolvingOutputPath,
    InvokingEncoder,
    Done,
    Failed,
}

/// Answers collected for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub input_dir: PathBuf,
    pub input_pattern: String,
    /// Empty for `<first input>.mp4`
    pub output_filename: String,
    pub options: OptionTable,
}

impl Session {
    pub fn input_fps(&self) -> f64 {
        self.options
            .get(OptKey::InputFps)
            .and_then(OptValue::as_f64)
            .filter(|fps| *fps > 0.0)
            .unwrap_or(DEFAULT_INPUT_FPS)
    }
}

pub fn main(opt: Opt) -> std::result::Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    println!("|==| ims-interp |==|");
    println!("| - Defaults indicated by ^");
    println!();

    run(&opt, &Defaults::default(), &mut prompter)?;
    Ok(())
}

/// Prompt and encode until a run succeeds or the user stops retrying.
///
/// Returns the video written by the last run, if it succeeded.
pub fn run<R: BufRead, W: Write>(
    opt: &Opt,
    defaults: &Defaults,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<PathBuf>> {
    loop {
        let session = collect_session(prompter, defaults)?;
        match make_video(opt, &session) {
            Ok(output) => {
                debug!(stage = ?Stage::Done);
                println!("Saved: {}", output.display());
                return Ok(Some(output));
            }
            Err(e) => {
                debug!(stage = ?Stage::Failed, "{}", e);
                report_failure(&e);
            }
        }
        if !prompter.ask_yes_no("Run again? [y/^n]: ", false)? {
            return Ok(None);
        }
    }
}

fn report_failure(e: &error::Error) {
    match e {
        error::Error::EncoderFailed {
            status,
            stdout,
            stderr,
        } => {
            println!("-------- Error thrown by ffmpeg ({}) --------", status);
            print_command_output(stdout, stderr);
        }
        e => println!("[Error] {}", e),
    }
}

/// Ask the general options, then the `mci` ones when that mode is picked.
pub fn collect_session<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    defaults: &Defaults,
) -> io::Result<Session> {
    debug!(stage = ?Stage::CollectingGeneralOptions);
    let input_dir =
        prompter.ask("Path to folder containing image files (can be relative) [^\".\"]: ")?;
    let input_dir = input_dir.trim().replace('\\', "/");
    let input_dir = if input_dir.is_empty() {
        ".".to_string()
    } else {
        input_dir
    };

    let input_pattern = prompter
        .ask("Pattern to match files in folder [^\"\"]: ")?
        .trim()
        .to_string();

    let output_filename = output_filename_normalize(
        &prompter.ask("File name for output video [^\"<name-of-first-input-image>.mp4\"]: ")?,
    );

    let mut options = OptionTable::builder();
    options.set(
        OptKey::InputFps,
        prompter.ask_choice("Input FPS", &defaults.input_fps)?,
    );
    options.set(
        OptKey::Fps,
        prompter.ask_choice("Interpolation FPS", &defaults.fps)?,
    );
    let mi_mode = prompter.ask_choice(OptKey::MiMode.name(), &defaults.mi_mode)?;
    let mci = mi_mode.as_str() == Some("mci");
    options.set(OptKey::MiMode, mi_mode);

    if mci {
        debug!(stage = ?Stage::CollectingModeOptions);
        for spec in &defaults.mci {
            options.set(spec.key, prompter.ask_choice(spec.key.name(), spec)?);
        }
    }

    Ok(Session {
        input_dir: PathBuf::from(input_dir),
        input_pattern,
        output_filename,
        options: options.build(),
    })
}

/// Filters for the run: interpolation, then the optional text overlay.
pub fn video_filters(options: &OptionTable, overlay: &TextOverlay) -> Vec<String> {
    let mut filters = Vec::new();
    match options.mode() {
        Some(mode) => filters.push(filter_desc("minterpolate", &options.filter_args(mode))),
        None => warn!("No interpolation mode selected, frames are not interpolated"),
    }
    if let Some(args) = overlay.filter_args() {
        filters.push(filter_desc("drawtext", &args));
    }
    filters
}

/// Discover the frames, write the manifest and run ffmpeg on it.
pub fn make_video(opt: &Opt, session: &Session) -> Result<PathBuf> {
    debug!(stage = ?Stage::BuildingManifest);
    let (pattern, images) = utils::input_discover(&session.input_dir, &session.input_pattern)?;
    println!("Found {} files matching {}.", images.len(), pattern);

    let manifest = Manifest::new(&images, session.input_fps(), opt.hold as usize);
    ffmpeg_demuxer_create(&opt.manifest, &manifest)?;
    info!(
        frames = manifest.len(),
        duration = manifest.total_duration(),
        "Wrote {}",
        opt.manifest.display()
    );

    debug!(stage = ?Stage::ResolvingOutputPath);
    let first_input: &Path = &images[0];
    let output = resolve_output_path(&session.output_filename, first_input, opt.max_path)?;

    debug!(stage = ?Stage::InvokingEncoder);
    let cmd = FfmpegCmd {
        program: opt.ffmpeg.clone(),
        manifest: opt.manifest.clone(),
        filters: video_filters(&session.options, &opt.overlay),
        output: output.clone(),
    };
    let out = ffmpeg_run(&cmd)?;
    if opt.debug {
        print_command_output(
            &String::from_utf8_lossy(&out.stdout),
            &String::from_utf8_lossy(&out.stderr),
        );
    }
    Ok(output)
}
