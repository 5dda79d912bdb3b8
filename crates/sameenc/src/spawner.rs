//! Spawns a playout child process for a BroadcastPackage

use std::ffi::OsStr;
use std::io;
use std::process::{Child, Command, Stdio};

use samegen::BroadcastPackage;

/// Start `cmd` to play out `package`
///
/// The child gets a piped standard input, which the caller must
/// fill with the package's samples, and inherits our standard
/// output and error. Its environment describes the alert; see
/// [`child_env()`].
pub fn spawn<C, A, B>(cmd: C, args: A, package: &BroadcastPackage) -> io::Result<Child>
where
    C: AsRef<OsStr>,
    B: AsRef<OsStr>,
    A: IntoIterator<Item = B>,
{
    Command::new(cmd)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .args(args)
        .envs(child_env(package))
        .spawn()
}

/// Environment variables which describe `package`
pub fn child_env(package: &BroadcastPackage) -> Vec<(&'static str, String)> {
    let header = package.header();
    let evt = header.event();
    let locations = header.location_str_iter().collect::<Vec<_>>().join(" ");

    vec![
        (childenv::SAMEENC_RATE, package.sample_rate().to_string()),
        (childenv::SAMEENC_MSG, header.as_str().to_owned()),
        (childenv::SAMEENC_ORG, header.originator_str().to_owned()),
        (
            childenv::SAMEENC_ORIGINATOR,
            header.originator().as_display_str().to_owned(),
        ),
        (childenv::SAMEENC_EVT, header.event_str().to_owned()),
        (childenv::SAMEENC_EVENT, evt.name().to_owned()),
        (
            childenv::SAMEENC_SIGNIFICANCE,
            evt.significance().as_code_str().to_owned(),
        ),
        (childenv::SAMEENC_LOCATIONS, locations),
        (
            childenv::SAMEENC_DURATION_SECS,
            format!("{:.3}", package.duration().as_secs_f64()),
        ),
    ]
}

mod childenv {
    /// Sample rate of the piped audio, in Hz
    pub const SAMEENC_RATE: &str = "SAMEENC_RATE";

    /// Header as sent, like
    /// `ZCZC-EAS-RWT-039035-039093+0030-2780415-KCLE/NWS-`
    pub const SAMEENC_MSG: &str = "SAMEENC_MSG";

    /// Originator code, like `EAS`
    pub const SAMEENC_ORG: &str = "SAMEENC_ORG";

    /// Originator name, like "`Broadcast station or cable system`"
    pub const SAMEENC_ORIGINATOR: &str = "SAMEENC_ORIGINATOR";

    /// Event code, like `RWT`
    pub const SAMEENC_EVT: &str = "SAMEENC_EVT";

    /// Event name, like "`Required Weekly Test`"
    pub const SAMEENC_EVENT: &str = "SAMEENC_EVENT";

    /// One-letter significance: `T`, `M`, `S`, `E`, `A`, or `W`
    pub const SAMEENC_SIGNIFICANCE: &str = "SAMEENC_SIGNIFICANCE";

    /// Location codes separated by spaces, like `039035 039093`
    pub const SAMEENC_LOCATIONS: &str = "SAMEENC_LOCATIONS";

    /// Length of the piped audio in seconds, to the millisecond
    pub const SAMEENC_DURATION_SECS: &str = "SAMEENC_DURATION_SECS";
}
