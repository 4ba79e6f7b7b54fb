//! Reporting horizons and the bucket granularity each one is shown at.
//!
//! The horizon labels mirror the range selector on the Smoney stock page:
//! daily rows for one month, weekly for six months, monthly for one or two
//! years and quarterly for three or five years.
//!
//! ```
//! use trade_flow_ingestor::models::{granularity::Granularity, horizon::Horizon};
//!
//! let h: Horizon = "1y".parse().unwrap();
//! assert_eq!(h, Horizon::OneYear);
//! assert_eq!(h.granularity(), Some(Granularity::Monthly));
//! assert_eq!(h.to_string(), "1Y");
//! ```

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::models::granularity::Granularity;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HorizonError {
    #[error("Unsupported horizon '{label}'. Choose from 1M, 6M, 1Y, 2Y, 3Y, 5Y")]
    InvalidInput { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    OneMonth,
    SixMonths,
    OneYear,
    TwoYears,
    ThreeYears,
    FiveYears,
}

impl Horizon {
    pub const ALL: [Horizon; 6] = [
        Horizon::OneMonth,
        Horizon::SixMonths,
        Horizon::OneYear,
        Horizon::TwoYears,
        Horizon::ThreeYears,
        Horizon::FiveYears,
    ];

    /// Bucket size for this horizon; `None` means rows pass through as-is.
    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            Horizon::OneMonth => None,
            Horizon::SixMonths => Some(Granularity::Weekly),
            Horizon::OneYear | Horizon::TwoYears => Some(Granularity::Monthly),
            Horizon::ThreeYears | Horizon::FiveYears => Some(Granularity::Quarterly),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Horizon::OneMonth => "1M",
            Horizon::SixMonths => "6M",
            Horizon::OneYear => "1Y",
            Horizon::TwoYears => "2Y",
            Horizon::ThreeYears => "3Y",
            Horizon::FiveYears => "5Y",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = HorizonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Ok(Horizon::OneMonth),
            "6M" => Ok(Horizon::SixMonths),
            "1Y" => Ok(Horizon::OneYear),
            "2Y" => Ok(Horizon::TwoYears),
            "3Y" => Ok(Horizon::ThreeYears),
            "5Y" => Ok(Horizon::FiveYears),
            _ => Err(HorizonError::InvalidInput {
                label: s.to_string(),
            }),
        }
    }
}
