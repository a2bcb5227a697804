//! Hours

use std::{fmt, ops::Deref, str::FromStr};

use thiserror::Error;

/// Errors constructing a booking duration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HoursError {
    /// The duration falls outside the bookable range.
    #[error("booking duration must be between {min} and {max} hours, got {0}", min = Hours::MIN, max = Hours::MAX)]
    OutOfRange(u32),

    /// The duration could not be parsed as a whole number.
    #[error("invalid booking duration: {0}")]
    Invalid(String),
}

/// A booking duration in whole hours, always within `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours {
    value: u32,
}

impl Hours {
    /// Shortest bookable duration
    pub const MIN: u32 = 1;

    /// Longest bookable duration
    pub const MAX: u32 = 8;

    /// Creates a new duration
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::OutOfRange`] if `value` is outside `1..=8`.
    pub fn new(value: u32) -> Result<Self, HoursError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Hours { value })
        } else {
            Err(HoursError::OutOfRange(value))
        }
    }

    /// The one hour duration a fresh booking form starts with.
    pub fn one() -> Self {
        Hours { value: Self::MIN }
    }
}

impl Default for Hours {
    fn default() -> Self {
        Self::one()
    }
}

impl Deref for Hours {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl TryFrom<u32> for Hours {
    type Error = HoursError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Hours::new(value)
    }
}

impl FromStr for Hours {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|_err| HoursError::Invalid(s.to_string()))?;

        Hours::new(value)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value == 1 {
            write!(f, "1 hour")
        } else {
            write!(f, "{} hours", self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn accepts_the_bookable_range() -> TestResult {
        for value in 1..=8 {
            assert_eq!(*Hours::new(value)?, value);
        }

        Ok(())
    }

    #[test]
    fn rejects_values_outside_the_range() {
        assert_eq!(Hours::new(0), Err(HoursError::OutOfRange(0)));
        assert_eq!(Hours::new(9), Err(HoursError::OutOfRange(9)));
    }

    #[test]
    fn parses_from_str() -> TestResult {
        assert_eq!(" 5 ".parse::<Hours>()?, Hours::new(5)?);
        assert!(matches!("five".parse::<Hours>(), Err(HoursError::Invalid(_))));
        assert_eq!("12".parse::<Hours>(), Err(HoursError::OutOfRange(12)));

        Ok(())
    }

    #[test]
    fn display_pluralises() -> TestResult {
        assert_eq!(Hours::one().to_string(), "1 hour");
        assert_eq!(Hours::new(3)?.to_string(), "3 hours");

        Ok(())
    }
}
