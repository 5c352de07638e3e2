mod dump;
mod manifest;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use nra::NeroProject;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Read and write Nero audio CD project (.nra) files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the album metadata and options stored in a project file
    Dump {
        /// Project file path
        file_path: PathBuf,

        /// Also print every section of the file as hex and text
        #[arg(long, default_value_t)]
        hex: bool,

        /// Print the album as a TOML manifest instead, suitable as input to encode
        #[arg(long, default_value_t, conflicts_with = "hex")]
        toml: bool,
    },
    /// Write a project file for one disc of an album manifest
    Encode {
        /// Album manifest (TOML) path; relative track paths are resolved against its directory
        manifest_path: PathBuf,

        /// Output project file path
        #[arg(short = 'o', long)]
        output_path: PathBuf,

        /// Disc to write, starting from 1
        #[arg(short = 'd', long, default_value_t = 1)]
        disc: usize,
    },
    /// Print the PCM parameters of a WAVE file
    Wave {
        /// WAVE file path
        file_path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Dump { file_path, hex, toml } => run_dump(file_path, hex, toml),
        Command::Encode { manifest_path, output_path, disc } => {
            run_encode(manifest_path, output_path, disc)
        }
        Command::Wave { file_path } => run_wave(file_path),
    }
}

fn run_dump(file_path: PathBuf, hex: bool, toml: bool) -> anyhow::Result<()> {
    let buffer = fs::read(&file_path)
        .with_context(|| format!("Unable to read project file '{}'", file_path.display()))?;
    let project = NeroProject::parse(&buffer)
        .with_context(|| format!("Unable to decode project file '{}'", file_path.display()))?;

    log::info!("'{}' is a Nero project file with {} bytes", file_path.display(), buffer.len());

    if toml {
        print!("{}", toml::to_string_pretty(&project.album)?);
        return Ok(());
    }

    dump::print_project(&project);
    if hex {
        dump::print_sections(&buffer, &project.layout);
    }

    Ok(())
}

fn run_encode(manifest_path: PathBuf, output_path: PathBuf, disc: usize) -> anyhow::Result<()> {
    anyhow::ensure!(disc != 0, "Disc numbers start at 1");

    let album = manifest::load(&manifest_path)?;
    log::info!(
        "Loaded album '{}' with {} discs from '{}'",
        album.title,
        album.discs.len(),
        manifest_path.display()
    );

    let bytes = nra::encode_nero_project(&album, disc - 1)
        .with_context(|| format!("Unable to encode disc {disc} of '{}'", album.title))?;

    fs::write(&output_path, &bytes)
        .with_context(|| format!("Unable to write project file '{}'", output_path.display()))?;

    log::info!("Wrote {} bytes to '{}'", bytes.len(), output_path.display());

    Ok(())
}

fn run_wave(file_path: PathBuf) -> anyhow::Result<()> {
    let header = nra::read_wave_header(&file_path)?;
    dump::print_wave_header(&header);

    Ok(())
}
