//! Utility functions for the premia_forecast crate
//!
//! Period keys are plain integers: `yyyy` for annual tables and `yyyymm`
//! for monthly tables. Both orders sort chronologically.

use crate::config::Frequency;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use premia_math::goodness::round_to;

/// Decimal places used for every reported statistic
pub const PRESENTATION_DECIMALS: i32 = 2;

/// Express a fraction as a percentage, rounded for presentation
pub fn to_percent(fraction: f64) -> f64 {
    round_to(fraction * 100.0, PRESENTATION_DECIMALS)
}

/// Round a unitless statistic for presentation
pub fn present(value: f64) -> f64 {
    round_to(value, PRESENTATION_DECIMALS)
}

/// Period key of the period containing `date`
pub fn period_key(date: NaiveDate, frequency: Frequency) -> i32 {
    match frequency {
        Frequency::Annual => date.year(),
        Frequency::Monthly => date.year() * 100 + date.month() as i32,
    }
}

/// First calendar day of the period denoted by `key`
pub fn period_start(key: i32, frequency: Frequency) -> Result<NaiveDate> {
    let date = match frequency {
        Frequency::Annual => NaiveDate::from_ymd_opt(key, 1, 1),
        Frequency::Monthly => {
            let month = key.rem_euclid(100) as u32;
            NaiveDate::from_ymd_opt(key.div_euclid(100), month, 1)
        }
    };

    date.ok_or_else(|| {
        ForecastError::InvalidParameter(format!(
            "{} is not a valid {} period key",
            key, frequency
        ))
    })
}

/// Parse a period from `1927`, `192712`, `1927-12` or `1927-12-01`
pub fn parse_period(s: &str, frequency: Frequency) -> Result<i32> {
    let s = s.trim();

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"));
    if let Ok(date) = date {
        return Ok(period_key(date, frequency));
    }

    let key: i32 = s.parse().map_err(|_| {
        ForecastError::InvalidParameter(format!("Cannot parse period: {}", s))
    })?;

    let key = match frequency {
        Frequency::Monthly if s.len() == 4 => key * 100 + 1,
        _ => key,
    };
    period_start(key, frequency)?;

    Ok(key)
}
