// ABOUTME: Size units and validated size limits for the size-limit cleanup mode.
// ABOUTME: Converts (value, unit) pairs to bytes using binary (1024-based) multipliers.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseSizeUnitError {
    #[error("size unit cannot be empty")]
    Empty,

    #[error("unknown size unit '{0}' (expected one of B, KB, MB, GB)")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum SizeLimitError {
    #[error("size limit must be a finite number, got {0}")]
    NotFinite(f64),

    #[error("size limit cannot be negative, got {0}")]
    Negative(f64),
}

/// Unit a size limit is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    /// Number of bytes in one of this unit.
    pub const fn multiplier(self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => 1024,
            SizeUnit::Megabytes => 1024 * 1024,
            SizeUnit::Gigabytes => 1024 * 1024 * 1024,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            SizeUnit::Bytes => "B",
            SizeUnit::Kilobytes => "KB",
            SizeUnit::Megabytes => "MB",
            SizeUnit::Gigabytes => "GB",
        }
    }

    /// Convert `value` of this unit to bytes, truncating any fractional byte.
    pub fn to_bytes(self, value: f64) -> u64 {
        // `as` saturates, so huge values clamp to u64::MAX instead of wrapping.
        (value * self.multiplier() as f64) as u64
    }
}

impl FromStr for SizeUnit {
    type Err = ParseSizeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseSizeUnitError::Empty);
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "B" | "BYTES" => Ok(SizeUnit::Bytes),
            "KB" | "KILOBYTES" => Ok(SizeUnit::Kilobytes),
            "MB" | "MEGABYTES" => Ok(SizeUnit::Megabytes),
            "GB" | "GIGABYTES" => Ok(SizeUnit::Gigabytes),
            _ => Err(ParseSizeUnitError::Unknown(trimmed.to_string())),
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A validated size threshold.
///
/// Images are selected when their size is strictly greater than the threshold,
/// so an image of exactly `500 MB` survives a `500 MB` limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimit {
    value: f64,
    unit: SizeUnit,
}

impl SizeLimit {
    pub fn new(value: f64, unit: SizeUnit) -> Result<Self, SizeLimitError> {
        if !value.is_finite() {
            return Err(SizeLimitError::NotFinite(value));
        }
        if value < 0.0 {
            return Err(SizeLimitError::Negative(value));
        }
        Ok(Self { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    pub fn to_bytes(&self) -> u64 {
        self.unit.to_bytes(self.value)
    }
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
