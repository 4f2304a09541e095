//! Global Warming Level scenarios and their year windows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::SelectionError;

/// Number of years every scenario window spans.
pub const SCENARIO_WINDOW_YEARS: i32 = 20;

/// A Global Warming Level scenario.
///
/// Serialized as the label stored in the dataset's `gwl` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "1.0")]
    Gwl1_0,
    #[serde(rename = "1.5")]
    Gwl1_5,
    #[serde(rename = "2.0")]
    Gwl2_0,
    #[serde(rename = "2.5")]
    Gwl2_5,
    #[serde(rename = "3.0")]
    Gwl3_0,
    #[serde(rename = "4.0")]
    Gwl4_0,
}

impl Scenario {
    /// All scenarios, in ascending warming order.
    pub const ALL: [Scenario; 6] = [
        Scenario::Gwl1_0,
        Scenario::Gwl1_5,
        Scenario::Gwl2_0,
        Scenario::Gwl2_5,
        Scenario::Gwl3_0,
        Scenario::Gwl4_0,
    ];

    /// Dataset label, e.g. `"2.0"`.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Gwl1_0 => "1.0",
            Scenario::Gwl1_5 => "1.5",
            Scenario::Gwl2_0 => "2.0",
            Scenario::Gwl2_5 => "2.5",
            Scenario::Gwl3_0 => "3.0",
            Scenario::Gwl4_0 => "4.0",
        }
    }

    /// Warming in °C above the reference period.
    pub fn warming_degrees(&self) -> f64 {
        match self {
            Scenario::Gwl1_0 => 1.0,
            Scenario::Gwl1_5 => 1.5,
            Scenario::Gwl2_0 => 2.0,
            Scenario::Gwl2_5 => 2.5,
            Scenario::Gwl3_0 => 3.0,
            Scenario::Gwl4_0 => 4.0,
        }
    }

    /// Calendar year mapped to time index 0 for this scenario.
    pub fn base_year(&self) -> i32 {
        match self {
            Scenario::Gwl4_0 => 2052,
            _ => 1995,
        }
    }

    /// Last valid calendar year (inclusive).
    pub fn last_year(&self) -> i32 {
        self.base_year() + SCENARIO_WINDOW_YEARS - 1
    }

    /// Valid calendar years for this scenario.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.base_year()..=self.last_year()
    }

    /// Match a numeric warming level (e.g. read from a float coordinate).
    pub fn from_warming_degrees(value: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| (s.warming_degrees() - value).abs() < 1e-6)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Scenario {
    type Err = SelectionError;

    /// Accepts the stored label (`"2.0"`) or any numeric spelling of it (`"2"`, `"2.00"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(scenario) = Self::ALL.into_iter().find(|sc| sc.label() == trimmed) {
            return Ok(scenario);
        }

        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .and_then(Self::from_warming_degrees)
            .ok_or_else(|| SelectionError::UnknownScenario(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_twenty_years() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.years().count(), 20);
        }
    }

    #[test]
    fn test_gwl4_starts_later() {
        assert_eq!(Scenario::Gwl4_0.base_year(), 2052);
        assert_eq!(Scenario::Gwl4_0.last_year(), 2071);
        assert_eq!(Scenario::Gwl2_0.base_year(), 1995);
    }

    #[test]
    fn test_label_roundtrip() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.label().parse::<Scenario>().unwrap(), scenario);
        }
    }
}
