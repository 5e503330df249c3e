use std::{
    fmt,
    path::{Path, PathBuf},
};

/// One `concat` demuxer entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub path: PathBuf,
    /// seconds
    pub duration: f64,
}

/// Input list for ffmpeg's `concat` demuxer.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    records: Vec<FrameRecord>,
    /// Number of records that are real input frames
    inputs: usize,
    hold: usize,
    /// seconds per record
    duration: f64,
}

fn round8(v: f64) -> f64 {
    (v * 1e8).round() / 1e8
}

/// Seconds per frame, rounded to 8 decimal places.
pub fn frame_duration(fps: f64) -> f64 {
    round8(1.0 / fps)
}

/// Seconds as written to the manifest; whole values keep a `.0`.
pub fn format_seconds(secs: f64) -> String {
    if secs.is_finite() && secs.fract() == 0.0 {
        format!("{secs:.1}")
    } else {
        secs.to_string()
    }
}

/// Escape single quotes for a quoted `file` directive.
pub fn escape_quotes(path: &str) -> String {
    path.replace('\'', "\\'")
}

impl Manifest {
    /// One record per input, then `hold - 1` more showing the last input.
    ///
    /// `fps` must be positive; a `hold` of 0 is treated as 1.
    pub fn new(files: &[PathBuf], fps: f64, hold: usize) -> Manifest {
        let duration = frame_duration(fps);
        let hold = hold.max(1);

        let mut records: Vec<FrameRecord> = files
            .iter()
            .map(|path| FrameRecord {
                path: path.to_owned(),
                duration,
            })
            .collect();
        if let Some(last) = files.last() {
            records.extend((1..hold).map(|_| FrameRecord {
                path: last.to_owned(),
                duration,
            }));
        }

        Manifest {
            records,
            inputs: files.len(),
            hold,
            duration,
        }
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_input(&self) -> Option<&Path> {
        self.records.first().map(|r| r.path.as_path())
    }

    /// Seconds of playback, held frames included
    pub fn total_duration(&self) -> f64 {
        round8(self.records.iter().map(|r| r.duration).sum())
    }

    /// Seconds covered by the input frames alone, unrounded
    pub fn input_duration(&self) -> f64 {
        self.inputs as f64 * self.duration
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // header totals describe the inputs, held frames are not counted
        writeln!(
            f,
            "## Input file for ffmpeg 'concat' format. Total frames: {}. Total duration: {} s.",
            self.inputs,
            format_seconds(self.input_duration())
        )?;
        writeln!(f)?;
        for (i, record) in self.records.iter().enumerate() {
            if i < self.inputs {
                writeln!(f, "# Frame {}", i + 1)?;
            } else {
                writeln!(
                    f,
                    "# Frame {} - Repeated Final Frame ({}/{} total)",
                    i + 1,
                    i - self.inputs + 2,
                    self.hold
                )?;
            }
            writeln!(
                f,
                "file '{}'",
                escape_quotes(&record.path.to_string_lossy())
            )?;
            writeln!(f, "duration {}", format_seconds(record.duration))?;
        }
        Ok(())
    }
}
