use std::fmt::Display;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{error::ErrorKind, CommandFactory, Parser};
use samegen::{Framing, TonePolicy};

/// Standard output filename
const STDOUT_FILE: &str = "-";

const USAGE_SHORT: &str = r#"
This program encodes an alert as a SAME header and renders a complete broadcast: three header bursts, an attention tone, optional narration, and three end-of-message bursts. The header is printed in its ASCII representation.

See --help for more details.

ALWAYS TEST YOUR ENCODING SETUP WITH A DUMMY LOAD!
"#;

const USAGE_LONG: &str = r#"
This program encodes an alert as a SAME header and renders a complete broadcast: three header bursts, an attention tone, optional narration, and three end-of-message bursts. The header is printed in its ASCII representation.

Write the broadcast to a WAV file

    sameenc --event-name "Tornado Warning" --org WXR \
        --location 039137 --valid-minutes 30 --output alert.wav

or pipe raw samples, signed 16-bit native-endian, into a player

    sameenc -r 22050 -e RWT -l 039137 --output - \
        | pacat --channels 1 --format s16ne --rate 22050

Arguments which follow "--" will be used to spawn a child process. The child process will have the broadcast audio piped to its standard input, and it will be wrapped by the --relay-cmd, if any.

    sameenc -r 22050 -e RWT -l 039137 --relay-cmd ./ptt -- \
        pacat --channels 1 --format s16ne --rate 22050

The relay command is run as "<relay-cmd> on" before playout and as "<relay-cmd> off" afterwards.

The child process receives the following additional environment variables which describe the message:

  SAMEENC_RATE="22050" (configured sample --rate)
  SAMEENC_MSG="ZCZC-EAS-RWT-012057-012081+0030-2780415-KLOX/NWS-"
  SAMEENC_ORG="EAS" (or CIV,WXR,PEP)
  SAMEENC_ORIGINATOR="Broadcast station or cable system"
  SAMEENC_EVT="RWT"
  SAMEENC_EVENT="Required Weekly Test"
  SAMEENC_SIGNIFICANCE="T" (or M,S,E,A,W)
  SAMEENC_LOCATIONS="012057 012081"
  SAMEENC_DURATION_SECS="23.415" (length of the audio)

Child processes MUST read or close standard input.

ALWAYS TEST YOUR ENCODING SETUP WITH A DUMMY LOAD!
"#;

const ALERT: &str = "Alert";
const OUTPUT: &str = "Output";

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(author = "Colin S. <https://github.com/cbs228/sameold>")]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_help = USAGE_SHORT, after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print NOTHING, not even the SAME header
    #[arg(short, long)]
    pub quiet: bool,

    /// Sampling rate (Hz)
    ///
    /// Output sampling rate, between 8000 and 192000 Hz. Narration
    /// must be sampled at this rate.
    #[arg(short, long, default_value_t = 22050)]
    pub rate: u32,

    /// Event name, like "Tornado Warning"
    ///
    /// Used to find the event code when no --event is given or
    /// none is recognized. Case and punctuation are ignored.
    #[arg(long, default_value_t = String::new(), hide_default_value = true)]
    #[arg(help_heading = ALERT)]
    pub event_name: String,

    /// Candidate event code, like TOR (repeatable)
    ///
    /// Tried in order. The first code which is recognized is
    /// sent. If nothing is recognized, CEM is sent.
    #[arg(short, long)]
    #[arg(help_heading = ALERT)]
    pub event: Vec<String>,

    /// Originator code (PEP, CIV, WXR, or EAS)
    #[arg(long, default_value_t = String::from("EAS"))]
    #[arg(help_heading = ALERT)]
    pub org: String,

    /// Station identifier, up to eight characters
    #[arg(long, default_value_t = String::from("NOCALL00"))]
    #[arg(help_heading = ALERT)]
    pub station: String,

    /// Location code, like 039137 (repeatable)
    ///
    /// Non-digits are removed. If no usable code is given, the
    /// message is sent to 000000.
    #[arg(short, long)]
    #[arg(help_heading = ALERT)]
    pub location: Vec<String>,

    /// Issuance time (RFC 3339) [default: now]
    #[arg(long, value_parser = parse_datetime)]
    #[arg(help_heading = ALERT)]
    pub sent: Option<DateTime<Utc>>,

    /// Expiration time (RFC 3339)
    #[arg(long, value_parser = parse_datetime)]
    #[arg(conflicts_with = "valid_minutes")]
    #[arg(help_heading = ALERT)]
    pub expires: Option<DateTime<Utc>>,

    /// Validity window, in minutes from issuance
    #[arg(long)]
    #[arg(help_heading = ALERT)]
    pub valid_minutes: Option<u32>,

    /// Attention tone duration (s)
    #[arg(long, default_value_t = 8.0)]
    pub attention_secs: f32,

    /// Attention tone: auto, none, single, or dual
    ///
    /// "auto" sends no tone for tests, a single 1050 Hz tone for
    /// statements and messages, and the two-tone attention signal
    /// for everything else.
    #[arg(long, default_value_t = TonePolicy::default())]
    pub tone: TonePolicy,

    /// Character framing: async or nwsi
    #[arg(long, default_value_t = Framing::default())]
    pub framing: Framing,

    /// Narration WAV file (mono, 16-bit, at --rate)
    #[arg(long)]
    pub narration: Option<PathBuf>,

    /// Output WAV file (or "-" for raw samples on stdout)
    ///
    /// Raw samples are one-channel (mono), signed 16-bit
    /// native-endian at --rate.
    #[arg(short, long)]
    #[arg(help_heading = OUTPUT)]
    pub output: Option<String>,

    /// Write each segment to a WAV file in this directory
    #[arg(long)]
    #[arg(help_heading = OUTPUT)]
    pub segments_dir: Option<PathBuf>,

    /// Print a field-by-field breakdown of the header
    #[arg(long)]
    #[arg(help_heading = OUTPUT)]
    pub describe: bool,

    /// Skip decoding the generated audio
    #[arg(long)]
    #[arg(help_heading = OUTPUT)]
    pub no_loopback_check: bool,

    /// Relay control program, run as "CMD on" and "CMD off"
    #[arg(long)]
    #[arg(help_heading = OUTPUT)]
    pub relay_cmd: Option<String>,

    /// Spawn child process to play the broadcast. Optional.
    ///
    /// Arguments are provided VERBATIM to the child process
    /// without shell interpretation.
    #[arg(last = true)]
    pub child: Vec<String>,
}

impl Args {
    /// Return true if the user requests output to stdout
    pub fn output_is_stdout(&self) -> bool {
        self.output.as_deref() == Some(STDOUT_FILE)
    }
}

// parse an RFC 3339 timestamp into UTC
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// A program-level error with exit code
#[derive(Debug)]
pub struct CliError {
    error: anyhow::Error,
    exit_code: i32,
}

impl CliError {
    /// Create new error with a custom exit code
    pub fn new(error: anyhow::Error, code: i32) -> CliError {
        CliError {
            error,
            exit_code: code,
        }
    }

    /// Print this error to the terminal
    ///
    /// Errors from clap are printed verbatim. Other types of errors
    /// are printed indirectly via clap's fancy formatter.
    pub fn print(&self) -> std::io::Result<()> {
        if let Some(e) = self.error.downcast_ref::<clap::Error>() {
            e.print()
        } else {
            Args::command()
                .error(ErrorKind::Format, self.to_string())
                .print()
        }
    }

    /// Print this error to the terminal and exit
    pub fn exit(&self) -> ! {
        drop(self.print());
        std::process::exit(self.exit_code);
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.error)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> CliError {
        CliError::new(err, 1)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> CliError {
        let code = if err.use_stderr() { 1 } else { 0 };
        CliError::new(err.into(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use samegen::ToneProfile;

    #[test]
    fn test_clap() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse() {
        let args = Args::try_parse_from([
            "sameenc",
            "--event-name",
            "Tornado Warning",
            "-e",
            "TOR",
            "-e",
            "SVR",
            "-l",
            "039137",
            "--sent",
            "2024-05-02T10:05:00-04:00",
            "--tone",
            "single",
            "--framing",
            "nwsi",
            "-o",
            "-",
        ])
        .unwrap();

        assert_eq!(args.event_name, "Tornado Warning");
        assert_eq!(args.event, vec!["TOR", "SVR"]);
        assert_eq!(args.location, vec!["039137"]);
        assert_eq!(
            args.sent,
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 14, 5, 0).unwrap())
        );
        assert_eq!(args.tone, TonePolicy::Fixed(ToneProfile::Single));
        assert_eq!(args.framing, Framing::Nwsi);
        assert!(args.output_is_stdout());
        assert_eq!(args.org, "EAS");
        assert!(args.child.is_empty());
    }

    #[test]
    fn test_parse_rejects() {
        assert!(Args::try_parse_from(["sameenc", "--tone", "loud"]).is_err());
        assert!(Args::try_parse_from(["sameenc", "--sent", "yesterday"]).is_err());
        assert!(Args::try_parse_from([
            "sameenc",
            "--expires",
            "2024-05-02T10:05:00Z",
            "--valid-minutes",
            "30"
        ])
        .is_err());
    }

    #[test]
    fn test_child() {
        let args = Args::try_parse_from(["sameenc", "--tone", "auto", "--", "pacat", "-v"]).unwrap();
        assert_eq!(args.tone, TonePolicy::Automatic);
        assert_eq!(args.child, vec!["pacat", "-v"]);
        assert!(!args.output_is_stdout());
    }
}
