//! Case-fold policies applied to echoed bytes.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::LinkError;

/// How a byte is case-folded on its way back out.
///
/// Folding only ever touches the ASCII alphabetic ranges `0x41..=0x5A` and
/// `0x61..=0x7A`; every other byte passes through unchanged, including the
/// line terminator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FoldPolicy {
    /// Lowercase letters become uppercase; everything else is unchanged.
    #[default]
    Upper,
    /// Uppercase letters become lowercase; everything else is unchanged.
    Lower,
    /// Letters swap case in both directions.
    Swap,
    /// Identity; bytes are echoed exactly as received.
    Preserve,
}

impl FoldPolicy {
    /// Fold a single byte under this policy.
    pub fn apply(self, byte: u8) -> u8 {
        match self {
            Self::Upper => {
                if byte.is_ascii_lowercase() {
                    byte - 0x20
                } else {
                    byte
                }
            }
            Self::Lower => {
                if byte.is_ascii_uppercase() {
                    byte + 0x20
                } else {
                    byte
                }
            }
            Self::Swap => {
                if byte.is_ascii_lowercase() {
                    byte - 0x20
                } else if byte.is_ascii_uppercase() {
                    byte + 0x20
                } else {
                    byte
                }
            }
            Self::Preserve => byte,
        }
    }
}

impl fmt::Display for FoldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Swap => "swap",
            Self::Preserve => "preserve",
        };
        f.write_str(name)
    }
}

impl FromStr for FoldPolicy {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "swap" => Ok(Self::Swap),
            "preserve" => Ok(Self::Preserve),
            other => Err(LinkError::UnknownFoldPolicy(other.to_string())),
        }
    }
}
