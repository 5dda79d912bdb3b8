//! Relay control through an external program

use std::ffi::{OsStr, OsString};
use std::io;
use std::process::{Command, Stdio};

use log::info;
use samegen::Relay;

/// A relay switched by running a program
///
/// The program is run as `<cmd> on` to engage the relay and
/// `<cmd> off` to release it, without shell interpretation. It
/// must exit successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRelay {
    cmd: OsString,
}

impl CommandRelay {
    /// Relay controlled by the program `cmd`
    pub fn new<C>(cmd: C) -> Self
    where
        C: AsRef<OsStr>,
    {
        Self {
            cmd: cmd.as_ref().to_owned(),
        }
    }

    fn switch(&self, state: &str) -> io::Result<()> {
        info!("relay: running \"{} {}\"", self.cmd.to_string_lossy(), state);
        let status = Command::new(&self.cmd)
            .arg(state)
            .stdin(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "relay command \"{} {}\" failed: {}",
                    self.cmd.to_string_lossy(),
                    state,
                    status
                ),
            ))
        }
    }
}

impl Relay for CommandRelay {
    fn engage(&mut self) -> io::Result<()> {
        self.switch("on")
    }

    fn release(&mut self) -> io::Result<()> {
        self.switch("off")
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_command_relay() {
        let mut relay = CommandRelay::new("true");
        assert!(relay.engage().is_ok());
        assert!(relay.release().is_ok());

        let mut relay = CommandRelay::new("false");
        assert!(relay.engage().is_err());

        let mut relay = CommandRelay::new("/nonexistent/sameenc-relay");
        assert!(relay.engage().is_err());
    }
}
