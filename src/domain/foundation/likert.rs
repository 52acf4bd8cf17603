//! Likert value object (1 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A self-placement on a bipolar dimension: 1 leans fully to the left pole,
/// 5 fully to the right pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertValue(u8);

impl LikertValue {
    /// Lowest value on the scale.
    pub const MIN: u8 = 1;

    /// Highest value on the scale.
    pub const MAX: u8 = 5;

    /// Creates a LikertValue, returning error if out of range.
    ///
    /// Values are never clamped.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range(
                "value",
                i32::from(Self::MIN),
                i32::from(Self::MAX),
                i32::from(value),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns every value on the scale in ascending order.
    pub fn all() -> impl Iterator<Item = LikertValue> {
        (Self::MIN..=Self::MAX).map(LikertValue)
    }
}

impl TryFrom<u8> for LikertValue {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from_u8(value)
    }
}

impl From<LikertValue> for u8 {
    fn from(value: LikertValue) -> Self {
        value.0
    }
}

impl fmt::Display for LikertValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
