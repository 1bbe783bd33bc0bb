// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use cantor::{Composer, SongFile};

fn print_usage() {
    println!("Cantor - Algorithmic Melody Composer");
    println!();
    println!("Usage: cantor <SONG.yaml> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --output <FILE>  Write the MIDI file here (default: <song name>.mid)");
    println!("  --seed <N>       Fix the random seed for reproducible output");
    println!("  --help           Show this help message");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let song_path = PathBuf::from(&args[1]);
    let mut output: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                let value = args.get(i + 1).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a file path")
                })?;
                output = Some(PathBuf::from(value));
                i += 2;
            }
            "--seed" => {
                let value = args.get(i + 1).ok_or_else(|| {
                    anyhow::anyhow!("--seed requires a number")
                })?;
                seed = Some(value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid seed: {}", value)
                })?);
                i += 2;
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
    }

    let song = SongFile::load(&song_path)?;
    let instrument = song.instrument()?;
    let settings = song.to_settings(seed)?;

    let mut composer = Composer::new(settings)?;
    let melody = composer.compose()?;

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.mid", song.song.name)));
    cantor::midi::write_midi(&melody, song.song.tempo, instrument.program, &output)?;

    println!(
        "Composed {} events ({} beats); midi file written at {}",
        melody.len(),
        melody.total_beats(),
        output.display()
    );
    Ok(())
}
