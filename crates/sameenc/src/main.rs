use std::fs::File;
use std::io;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use log::{info, LevelFilter};

use samegen::{read_wav, EncoderBuilder, SameEncoder, Waveform};

mod app;
mod cli;
mod relay;
mod spawner;

use cli::{Args, CliError};

fn main() {
    match sameenc() {
        Ok(()) => {}
        Err(cli_error) => cli_error.exit(),
    }
}

fn sameenc() -> Result<(), CliError> {
    // Parse options and start logging
    let args = Args::try_parse()?;
    log_setup(&args);

    // create the encoder
    let config = EncoderBuilder::new(args.rate)
        .with_originator(args.org.as_str())
        .with_station(args.station.as_str())
        .with_attention_secs(args.attention_secs)
        .with_tone_policy(args.tone)
        .with_framing(args.framing)
        .with_loopback_check(!args.no_loopback_check)
        .build()
        .context("Invalid encoder configuration")?;
    let encoder = SameEncoder::new(config);

    // describe the alert and load narration, if any
    let now = Utc::now();
    let alert = app::alert_from_args(&args, now);
    let narration = narration_setup(&args)?;

    // encode
    let package = encoder
        .encode_at(&alert, narration, now)
        .context("Unable to encode alert")?;
    info!(
        "SAME encoder produced {:.1} s of audio at {} Hz",
        package.duration().as_secs_f32(),
        package.sample_rate()
    );

    // output
    app::run(&args, &package)?;

    Ok(())
}

fn log_setup(args: &Args) {
    if args.quiet {
        // no logging
        return;
    } else if std::env::var_os("RUST_LOG").is_none() {
        // parameter controls
        let log_filter = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        pretty_env_logger::formatted_builder()
            .filter_module("samegen", log_filter)
            .filter_module("sameenc", log_filter)
            .init();
    } else {
        // environment controls
        pretty_env_logger::init();
    }
}

fn narration_setup(args: &Args) -> Result<Option<Waveform>, anyhow::Error> {
    let path = match &args.narration {
        Some(path) => path,
        None => return Ok(None),
    };

    info!("SAME encoder reading narration: \"{}\"", path.display());
    let file = File::open(path)
        .with_context(|| format!("Unable to open --narration \"{}\"", path.display()))?;
    let narration = read_wav(io::BufReader::new(file))
        .with_context(|| format!("Unable to read --narration \"{}\"", path.display()))?;
    Ok(Some(narration))
}
