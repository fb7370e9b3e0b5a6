use std::convert::TryInto;
use std::fmt::Display;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LENGTH: usize = 6;

/// A one-time-password code, as typed in by a voter or a user resetting their password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code {
    code: [u8; LENGTH],
}

impl Deref for Code {
    type Target = [u8; LENGTH];

    fn deref(&self) -> &Self::Target {
        &self.code
    }
}

impl Display for Code {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for digit in self.code {
            write!(formatter, "{digit}")?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = CodeParseError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let string = string.trim();
        let len = string.chars().count();
        if len != LENGTH {
            return Err(Self::Err::InvalidLength(len));
        }
        let digits = string
            .chars()
            .map(|c| match c {
                '0'..='9' => Ok(c as u8 - b'0'),
                _ => Err(Self::Err::InvalidChar(c)),
            })
            .collect::<Result<Vec<u8>, Self::Err>>()?;
        Ok(Self {
            code: digits.try_into().unwrap(), // Valid because digits.len() == LENGTH
        })
    }
}

impl TryFrom<String> for Code {
    type Error = CodeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodeParseError {
    #[error("Code must contain exactly {LENGTH} digits")]
    InvalidLength(usize),
    #[error("Code must contain only digits, found '{0}'")]
    InvalidChar(char),
}

/// A voter's registration number, normalised to trimmed upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RegistrationNumber {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RegistrationNumber {
    type Err = RegistrationNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_uppercase();
        if normalised.is_empty() {
            return Err(RegistrationNumberError);
        }
        Ok(Self(normalised))
    }
}

impl TryFrom<String> for RegistrationNumber {
    type Error = RegistrationNumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RegistrationNumber> for String {
    fn from(reg_no: RegistrationNumber) -> Self {
        reg_no.0
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Registration number is required")]
pub struct RegistrationNumberError;

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Code {
        pub fn example() -> Self {
            "123456".parse().unwrap()
        }
    }

    impl RegistrationNumber {
        pub fn example() -> Self {
            "REG/2024/001".parse().unwrap()
        }
    }
}
