use std::{error::Error, path::PathBuf};

use clap::Args;

use crate::{choice::validate_choice, options::Defaults, utils};

use super::{ffmpeg_demuxer_create, interp::DEFAULT_MANIFEST, manifest::Manifest};

/// Write the concat demuxer input without encoding anything.
#[derive(Args, Debug, Clone)]
pub struct Opt {
    /// folder containing image files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
    /// pattern to match files in folder
    #[arg(short, long, default_value = "")]
    pattern: String,
    /// input frame rate
    #[arg(short = 'r', long, default_value = "15", value_parser = parse_input_fps)]
    fps: f64,
    /// show the final frame for this many frames
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    hold: u32,
    #[arg(short, long, default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,
}

fn parse_input_fps(s: &str) -> Result<f64, String> {
    let spec = Defaults::default().input_fps;
    match validate_choice(s, &spec.shape) {
        Ok(Some(v)) => v.as_f64().ok_or_else(|| format!("not a number: {s}")),
        Ok(None) => Err("empty frame rate".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

pub fn main(opt: Opt) -> Result<(), Box<dyn Error>> {
    let (pattern, images) = utils::input_discover(&opt.dir, &opt.pattern)?;
    println!("Found {} files matching {}.", images.len(), pattern);

    let manifest = Manifest::new(&images, opt.fps, opt.hold as usize);
    ffmpeg_demuxer_create(&opt.manifest, &manifest)?;
    println!(
        "{}: {} frames, {} s",
        opt.manifest.display(),
        manifest.len(),
        manifest.total_duration()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        opt: Opt,
    }

    #[test]
    fn fps_is_range_checked() {
        assert_eq!(parse_input_fps("30"), Ok(30.0));
        assert!(parse_input_fps("0").is_err());
        assert!(parse_input_fps("abc").is_err());
        assert!(Cli::try_parse_from(["concat", "-r", "200"]).is_err());
    }

    #[test]
    fn writes_manifest_for_directory() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["1.png", "2.png"] {
            std::fs::write(tmp.path().join(name), b"").unwrap();
        }
        let manifest = tmp.path().join("list.txt");
        let args: Vec<std::ffi::OsString> = vec![
            "concat".into(),
            "-d".into(),
            tmp.path().into(),
            "-r".into(),
            "10".into(),
            "--hold".into(),
            "2".into(),
            "-m".into(),
            manifest.as_path().into(),
        ];
        let cli = Cli::parse_from(args);
        main(cli.opt).unwrap();

        let text = std::fs::read_to_string(&manifest).unwrap();
        assert!(text.starts_with(
            "## Input file for ffmpeg 'concat' format. Total frames: 2. Total duration: 0.2 s.\n\n"
        ));
        assert_eq!(text.matches("duration 0.1\n").count(), 3);
        assert!(text.contains("2.png'\nduration 0.1\n# Frame 3 - Repeated Final Frame (2/2 total)\n"));
    }
}
