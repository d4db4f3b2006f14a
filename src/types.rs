use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Starting value of the coordinator's clock.
///
/// - `Now`: process start time, so a page rendered right after startup does
///   not see every change as already stale (default).
/// - `Zero`: start at the epoch; any non-zero baseline parks until the first
///   change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InitialClock {
    #[default]
    Now,
    Zero,
}

impl FromStr for InitialClock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "now" => Ok(InitialClock::Now),
            "zero" => Ok(InitialClock::Zero),
            other => Err(format!(
                "invalid initial_clock: {other} (expected \"now\" or \"zero\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(" Zero ".parse::<InitialClock>(), Ok(InitialClock::Zero));
        assert_eq!("NOW".parse::<InitialClock>(), Ok(InitialClock::Now));
        assert!("later".parse::<InitialClock>().is_err());
    }

    #[test]
    fn defaults_to_now() {
        assert_eq!(InitialClock::default(), InitialClock::Now);
    }
}
