use std::{
    ffi::OsString,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tracing::debug;

use crate::error::{Error, Result};

pub mod ffmpeg_concat;
pub mod interp;
pub mod manifest;

use manifest::Manifest;

/// Constant rate factor of the produced video
pub const CRF: u8 = 15;

/// Escape a filter option value (first escaping level).
pub fn escape_filter_value(value: &str) -> String {
    escape_chars(value, &['\\', '\'', ':'])
}

/// Escape a filter description for use inside a filtergraph (second level).
pub fn escape_filtergraph(desc: &str) -> String {
    escape_chars(desc, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `name=k1=v1:k2=v2`
pub fn filter_desc(name: &str, args: &[(&str, String)]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let args = args
        .iter()
        .map(|(k, v)| format!("{}={}", k, escape_filter_value(v)))
        .collect::<Vec<_>>()
        .join(":");
    format!("{name}={args}")
}

/// Linear filter chain for `-vf`.
pub fn filtergraph(filters: &[String]) -> String {
    filters
        .iter()
        .map(|f| escape_filtergraph(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write `manifest` where the `concat` demuxer will read it.
pub fn ffmpeg_demuxer_create(demuxerf_path: &Path, manifest: &Manifest) -> std::io::Result<()> {
    let demuxerf = std::fs::File::create(demuxerf_path)?;
    let mut demuxerf = std::io::BufWriter::new(demuxerf);
    demuxerf.write_all(manifest.to_string().as_bytes())?;
    demuxerf.flush()?;
    Ok(())
}

/// ffmpeg invocation: concat manifest in, H.264 MP4 out.
#[derive(Debug, Clone)]
pub struct FfmpegCmd {
    pub program: String,
    pub manifest: PathBuf,
    /// Filter descriptions, applied in order
    pub filters: Vec<String>,
    pub output: PathBuf,
}

impl FfmpegCmd {
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-y", "-f", "concat", "-safe", "0", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(self.manifest.clone().into_os_string());
        if !self.filters.is_empty() {
            args.push("-vf".into());
            args.push(filtergraph(&self.filters).into());
        }
        args.extend(
            ["-f", "mp4", "-c:v", "libx264", "-crf"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(CRF.to_string().into());
        args.push(self.output.clone().into_os_string());
        args
    }

    /// Shell-like rendering for logs
    pub fn display(&self) -> String {
        std::iter::once(OsString::from(&self.program))
            .chain(self.args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run ffmpeg to completion with both streams captured.
pub fn ffmpeg_run(cmd: &FfmpegCmd) -> Result<Output> {
    debug!("{}", cmd.display());
    let output = Command::new(&cmd.program)
        .args(cmd.args())
        .output()
        .map_err(|source| Error::EncoderSpawn {
            program: cmd.program.clone(),
            source,
        })?;
    command_error_check(output)
}

fn command_error_check(output: Output) -> Result<Output> {
    if output.status.success() {
        Ok(output)
    } else {
        Err(Error::EncoderFailed {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Relay captured encoder streams to the user.
pub fn print_command_output(stdout: &str, stderr: &str) {
    println!("\n[stdout]\n{}", stdout);
    println!("\n[stderr]\n{}", stderr);
}
