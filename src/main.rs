use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use ims_interp::{args, gen};
use std::{error::Error, fs, io};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let opt = args::Opt::parse();
    init_logging(opt.verbose);

    match opt.subcommand {
        Some(args::Commands::Interp(opt)) => gen::interp::main(opt)?,
        Some(args::Commands::FfmpegConcat(opt)) => gen::ffmpeg_concat::main(opt)?,
        Some(args::Commands::ShellCompletions) => install_shell_completions()?,
        None => gen::interp::main(gen::interp::Opt::parse_from(["interp"]))?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn install_shell_completions() -> io::Result<()> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No home directory"))?;
    let dir = home.join(".zsh/zfunctions");
    fs::create_dir_all(&dir)?;
    let p_zsh = dir.join("_ims-interp");
    let mut f_zsh = fs::File::create(&p_zsh)?;
    generate(Shell::Zsh, &mut args::Opt::command(), "ims-interp", &mut f_zsh);
    println!("Zsh completions installed: {}", &p_zsh.display());
    Ok(())
}
