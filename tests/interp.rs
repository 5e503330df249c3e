#![cfg(unix)]

use std::{
    fs,
    io::{self, Cursor},
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use clap::Parser;
use ims_interp::{
    gen::interp::{run, Opt},
    options::Defaults,
    prompt::Prompter,
};

const OK_ENCODER: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "$(dirname "$0")/args.txt"
for last; do :; done
: > "$last"
"#;

const FAILING_ENCODER: &str = r#"#!/bin/sh
echo "stub stdout"
echo "stub stderr" >&2
exit 1
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn frames_dir(root: &Path, names: &[&str]) -> PathBuf {
    let dir = root.join("frames");
    fs::create_dir_all(&dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
    dir
}

fn opt(encoder: &Path, manifest: &Path, extra: &[&str]) -> Opt {
    let mut args = vec![
        "interp".to_string(),
        "--ffmpeg".to_string(),
        encoder.display().to_string(),
        "--manifest".to_string(),
        manifest.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Opt::parse_from(args)
}

fn drive(opt: &Opt, answers: String) -> Option<PathBuf> {
    let mut prompter = Prompter::new(Cursor::new(answers), io::sink());
    run(opt, &Defaults::default(), &mut prompter).unwrap()
}

fn blend_run_writes_video(root: &Path) {
    let bin = root.join("ok");
    fs::create_dir_all(&bin).unwrap();
    let encoder = write_script(&bin, "ffmpeg", OK_ENCODER);
    let frames = frames_dir(&root.join("blend"), &["a.png", "b.png", "c.png"]);
    let manifest = root.join("blend.txt");

    let opt = opt(&encoder, &manifest, &["--hold", "3"]);
    let out = drive(&opt, format!("{}\n\n\n15\n60\nblend\n", frames.display()));

    assert_eq!(out.as_deref(), Some(frames.join("a.mp4").as_path()));
    assert!(frames.join("a.mp4").exists());

    let args = fs::read_to_string(bin.join("args.txt")).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert!(args.contains(&"minterpolate=fps=60:mi_mode=blend"));
    assert!(args.windows(2).any(|w| w == ["-crf", "15"]));
    assert!(args.windows(2).any(|w| w == ["-safe", "0"]));

    let text = fs::read_to_string(&manifest).unwrap();
    assert_eq!(text.matches("\nfile '").count(), 5);
    assert_eq!(text.matches("c.png'\n").count(), 3);
    assert_eq!(text.matches("duration 0.06666667\n").count(), 5);
}

fn encoder_failure_is_reported(root: &Path) {
    let bin = root.join("fail");
    fs::create_dir_all(&bin).unwrap();
    let encoder = write_script(&bin, "ffmpeg", FAILING_ENCODER);
    let frames = frames_dir(&root.join("failing"), &["a.png"]);

    let opt = opt(&encoder, &root.join("failing.txt"), &[]);
    let out = drive(&opt, format!("{}\n\nclip\n\n\nmci\n\n\n\n\nn\n", frames.display()));

    assert_eq!(out, None);
    assert!(!frames.join("clip.mp4").exists());
}

fn retry_after_missing_frames(root: &Path) {
    let bin = root.join("retry");
    fs::create_dir_all(&bin).unwrap();
    let encoder = write_script(&bin, "ffmpeg", OK_ENCODER);
    let empty = root.join("empty");
    fs::create_dir_all(&empty).unwrap();
    let frames = frames_dir(&root.join("retry"), &["x_1.png", "x_2.png"]);

    let opt = opt(&encoder, &root.join("retry.txt"), &[]);
    let answers = format!(
        "{}\n\n\n\n\nblend\ny\n{}\nx_\nout\n\n\nblend\n",
        empty.display(),
        frames.display()
    );
    let out = drive(&opt, answers);

    assert_eq!(out.as_deref(), Some(frames.join("out.mp4").as_path()));
}

// Scenarios share one test so no other test thread forks while the stub
// scripts are being written.
#[test]
fn interp_against_stub_encoder() {
    let tmp = tempfile::tempdir().unwrap();
    blend_run_writes_video(tmp.path());
    encoder_failure_is_reported(tmp.path());
    retry_after_missing_frames(tmp.path());
}
