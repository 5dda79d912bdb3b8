//! Output and playout of an encoded broadcast
//!
//! Once the alert is encoded, `sameenc` may
//!
//! 1. print the header, and optionally a breakdown of it;
//! 2. write the composite audio to a WAV file or, as raw
//!    samples, to standard output;
//! 3. write each segment to its own WAV file; and
//! 4. play the composite audio through a child process, with
//!    the relay engaged.

use std::fs;
use std::io::{self, Write};

use anyhow::{anyhow, Context};
use byteorder::{NativeEndian, WriteBytesExt};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use samegen::{keyed, AlertContext, BroadcastPackage, NoRelay, Relay};

use crate::cli::Args;
use crate::relay::CommandRelay;
use crate::spawner;

/// Describe the alert given on the command line
///
/// Alerts without a `--sent` time are issued at `now`. The
/// expiration comes from `--expires` or from `--valid-minutes`
/// after issuance.
pub fn alert_from_args(args: &Args, now: DateTime<Utc>) -> AlertContext {
    let sent = args.sent.unwrap_or(now);
    let mut ctx = AlertContext::new(args.event_name.as_str())
        .with_event_codes(args.event.iter().cloned())
        .with_geocodes(args.location.iter().cloned())
        .with_sent(sent);

    let expires = match (args.expires, args.valid_minutes) {
        (Some(expires), _) => Some(expires),
        (None, Some(minutes)) => Some(sent + Duration::minutes(minutes as i64)),
        (None, None) => None,
    };
    if let Some(expires) = expires {
        ctx = ctx.with_expires(expires);
    }
    ctx
}

/// Run the application
///
/// Prints, writes, and plays the encoded `package` as the
/// command-line `args` direct.
pub fn run(args: &Args, package: &BroadcastPackage) -> Result<(), anyhow::Error> {
    if !args.quiet {
        println!("{}", package.header());
        if args.describe {
            println!("{}", package.header().describe());
            for degradation in package.degradations() {
                println!("{:<12}{}", "Note", degradation);
            }
        }
    }

    if args.output.is_some() || args.segments_dir.is_some() {
        write_files(args, package)?;
    }

    if !args.child.is_empty() {
        match &args.relay_cmd {
            Some(cmd) => play(&args.child, package, CommandRelay::new(cmd))?,
            None => play(&args.child, package, NoRelay)?,
        }
    } else if args.relay_cmd.is_some() {
        warn!("--relay-cmd has no effect without a child process to play the broadcast");
    }

    Ok(())
}

// write --output and --segments-dir
fn write_files(args: &Args, package: &BroadcastPackage) -> Result<(), anyhow::Error> {
    if args.output_is_stdout() {
        if is_terminal(&io::stdout()) {
            return Err(anyhow!(
                "cowardly refusing to write audio samples to a terminal.

Redirect standard output to a file, or pipe it into a player
like aplay, pacat, or sox."
            ));
        }
        info!("SAME encoder writing standard output");
        let stdout = io::stdout();
        write_samples(stdout.lock(), package.composite().samples())
            .context("Unable to write audio to standard output")?;
    }

    let wav_output = args.output.as_deref().filter(|_| !args.output_is_stdout());
    if wav_output.is_none() && args.segments_dir.is_none() {
        return Ok(());
    }
    let rendered = package.render().context("Unable to render WAV audio")?;

    if let Some(path) = wav_output {
        info!("SAME encoder writing file: \"{}\"", path);
        fs::write(path, rendered.composite().bytes())
            .with_context(|| format!("Unable to write --output \"{}\"", path))?;
    }

    if let Some(dir) = &args.segments_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Unable to create --segments-dir \"{}\"", dir.display()))?;
        for (segment, audio) in rendered.segments() {
            let path = dir.join(format!("{}.wav", segment));
            info!("SAME encoder writing segment: \"{}\"", path.display());
            fs::write(&path, audio.bytes())
                .with_context(|| format!("Unable to write \"{}\"", path.display()))?;
        }
    }

    Ok(())
}

// play the composite audio through the child process, with the relay engaged
fn play<R>(child_args: &[String], package: &BroadcastPackage, relay: R) -> Result<(), anyhow::Error>
where
    R: Relay,
{
    let (cmd, cmd_args) = child_args
        .split_first()
        .ok_or_else(|| anyhow!("no child process given"))?;

    keyed(relay, || {
        let mut child = spawner::spawn(cmd, cmd_args, package)?;
        info!("SAME encoder playing through child process \"{}\"", cmd);

        let written = match child.stdin.take() {
            Some(stdin) => write_samples(stdin, package.composite().samples()),
            None => Ok(()),
        };
        let status = child.wait()?;
        written?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("child process \"{}\" failed: {}", cmd, status),
            ))
        }
    })
    .with_context(|| format!("Unable to play broadcast through \"{}\"", cmd))
}

/// Write samples as signed 16-bit native-endian
///
/// `out` is flushed and then dropped, which closes it.
pub fn write_samples<W>(out: W, samples: &[i16]) -> io::Result<()>
where
    W: Write,
{
    let mut out = io::BufWriter::new(out);
    for &sa in samples {
        out.write_i16::<NativeEndian>(sa)?;
    }
    out.flush()
}

#[cfg(not(target_os = "windows"))]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::fd::AsRawFd,
{
    terminal_size::terminal_size_using_fd(stream.as_raw_fd()).is_some()
}

#[cfg(target_os = "windows")]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::windows::io::AsRawHandle,
{
    terminal_size::terminal_size_using_handle(stream.as_raw_handle()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use clap::Parser;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_alert_from_args() {
        let args = Args::try_parse_from([
            "sameenc",
            "--event-name",
            "Tornado Warning",
            "-l",
            "039137",
            "-l",
            "39003",
            "--valid-minutes",
            "30",
        ])
        .unwrap();

        let ctx = alert_from_args(&args, now());
        assert_eq!(ctx.event_name(), "Tornado Warning");
        assert!(ctx.event_codes().is_empty());
        assert_eq!(ctx.geocodes(), &["039137", "39003"]);
        assert_eq!(ctx.sent(), Some(&now()));
        assert_eq!(ctx.expires(), Some(&(now() + Duration::minutes(30))));
    }

    #[test]
    fn test_alert_from_args_explicit_times() {
        let args = Args::try_parse_from([
            "sameenc",
            "-e",
            "RWT",
            "--sent",
            "2024-05-02T12:00:00Z",
            "--expires",
            "2024-05-02T13:00:00Z",
        ])
        .unwrap();

        let ctx = alert_from_args(&args, now());
        assert_eq!(ctx.event_codes(), &["RWT"]);
        assert_eq!(
            ctx.sent(),
            Some(&Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap())
        );
        assert_eq!(
            ctx.expires(),
            Some(&Utc.with_ymd_and_hms(2024, 5, 2, 13, 0, 0).unwrap())
        );

        let args = Args::try_parse_from(["sameenc"]).unwrap();
        assert!(alert_from_args(&args, now()).expires().is_none());
    }

    #[test]
    fn test_write_samples() {
        let mut out = Vec::new();
        write_samples(&mut out, &[1, -2, i16::MAX]).unwrap();
        let mut expect = Vec::new();
        for sa in [1i16, -2, i16::MAX] {
            expect.extend_from_slice(&sa.to_ne_bytes());
        }
        assert_eq!(out, expect);
    }
}
