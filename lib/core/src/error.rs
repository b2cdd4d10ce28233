//! Error handling foundation for cloudbuddy.
//!
//! Library crates define their own error enums and return
//! `Result<T, TheirError>`; `?` lifts a plain error value into a
//! [`Report`] carrying it as context.

use rootcause::Report;

/// Result whose error is a rootcause [`Report`] with context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Missing;

    impl fmt::Display for Missing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("missing")
        }
    }

    impl std::error::Error for Missing {}

    fn lookup(present: bool) -> Result<u8, Missing> {
        if present { Ok(7) } else { Err(Missing.into()) }
    }

    #[test]
    fn errors_become_reports() {
        assert_eq!(lookup(true).expect("present"), 7);
        assert!(lookup(false).is_err());
    }
}
