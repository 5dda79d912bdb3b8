//! Transmitter relay control
//!
//! Some stations key a transmitter or switch an audio path
//! with a relay while alert audio plays. The encoder never
//! touches hardware itself. Applications which do supply a
//! [`Relay`] and wrap playout with [`keyed()`].

use std::io;

use log::debug;

/// A switch which is engaged for the duration of playout
pub trait Relay {
    /// Close the relay before audio begins
    fn engage(&mut self) -> io::Result<()>;

    /// Open the relay after audio ends
    fn release(&mut self) -> io::Result<()>;
}

/// A relay which does nothing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoRelay;

impl Relay for NoRelay {
    fn engage(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R> Relay for &mut R
where
    R: Relay + ?Sized,
{
    fn engage(&mut self) -> io::Result<()> {
        (**self).engage()
    }

    fn release(&mut self) -> io::Result<()> {
        (**self).release()
    }
}

/// Run `playout` with the `relay` engaged
///
/// The relay is released after `playout` returns, even if it
/// fails. If `playout` fails, its error is returned; otherwise
/// any error from releasing the relay is returned. If the relay
/// cannot be engaged, `playout` does not run.
///
/// ```
/// use samegen::{keyed, NoRelay};
///
/// let out = keyed(NoRelay, || Ok(42)).unwrap();
/// assert_eq!(out, 42);
/// ```
pub fn keyed<R, F, T>(mut relay: R, playout: F) -> io::Result<T>
where
    R: Relay,
    F: FnOnce() -> io::Result<T>,
{
    relay.engage()?;
    debug!("relay: engaged");

    let result = playout();
    let released = relay.release();
    debug!("relay: released");

    let out = result?;
    released?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingRelay {
        log: Vec<&'static str>,
        fail_engage: bool,
    }

    impl Relay for RecordingRelay {
        fn engage(&mut self) -> io::Result<()> {
            if self.fail_engage {
                return Err(io::Error::new(io::ErrorKind::Other, "stuck"));
            }
            self.log.push("on");
            Ok(())
        }

        fn release(&mut self) -> io::Result<()> {
            self.log.push("off");
            Ok(())
        }
    }

    #[test]
    fn test_keyed() {
        let mut relay = RecordingRelay::default();
        let out = keyed(&mut relay, || Ok("played")).unwrap();
        assert_eq!(out, "played");
        assert_eq!(relay.log, vec!["on", "off"]);
    }

    #[test]
    fn test_keyed_releases_on_failure() {
        let mut relay = RecordingRelay::default();
        let out: io::Result<()> = keyed(&mut relay, || {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "player died"))
        });
        assert_eq!(out.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(relay.log, vec!["on", "off"]);
    }

    #[test]
    fn test_engage_failure_skips_playout() {
        let mut relay = RecordingRelay {
            fail_engage: true,
            ..Default::default()
        };
        let mut ran = false;
        let out = keyed(&mut relay, || {
            ran = true;
            Ok(())
        });
        assert!(out.is_err());
        assert!(!ran);
        assert!(relay.log.is_empty());
    }
}
