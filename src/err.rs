use std::fmt::{self, Debug, Display};
use std::io;

/// Wrapper so errors escaping `main` are printed with their Display
/// impl instead of the default Debug dump.
pub struct DisplayError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl Debug for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T: Into<Box<dyn std::error::Error + Send + Sync + 'static>>> From<T> for DisplayError {
    fn from(display: T) -> Self {
        DisplayError(display.into())
    }
}

pub trait IoErrorExt {
    fn applies_to(&self) -> AppliesTo;
}

impl IoErrorExt for io::Error {
    fn applies_to(&self) -> AppliesTo {
        match self.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset => AppliesTo::Connection,
            _ => AppliesTo::Listener,
        }
    }
}

pub enum AppliesTo {
    Connection,
    Listener,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_resets_apply_to_the_connection() {
        let e = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(matches!(e.applies_to(), AppliesTo::Connection));
    }

    #[test]
    fn resource_exhaustion_applies_to_the_listener() {
        let e = io::Error::from(io::ErrorKind::OutOfMemory);
        assert!(matches!(e.applies_to(), AppliesTo::Listener));
    }
}
