//! Flat statistic mappings returned to the caller

use crate::error::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Stable key names of the result mapping
pub mod keys {
    pub const IS_R2_HEAD_1927: &str = "IS_R2_head_1927";
    pub const IS_R2_HEAD_OOS: &str = "IS_R2_head_OOS";
    pub const IS_R2_HEAD_1965: &str = "IS_R2_head_1965";
    pub const OOS_OR2: &str = "OOS_oR2";
    pub const D_RMSE: &str = "dRMSE";
    pub const MSE_F: &str = "MSEf";

    pub const IS_R2_HEAD_LOG: &str = "IS_R2_head_log";
    pub const IS_R2_HEAD: &str = "IS_R2_head";
    pub const IS_R2_HEAD_TRUNC: &str = "IS_R2_head_trunc";
    pub const OOS_R2_HEAD: &str = "OOS_R2_head";
    pub const SHARE_T: &str = "share_T";
    pub const SHARE_U: &str = "share_U";
    pub const OOS_R2_HEAD_TRUNC: &str = "OOS_R2_head_trunc";

    pub const ANNUAL: [&str; 6] = [
        IS_R2_HEAD_1927,
        IS_R2_HEAD_OOS,
        IS_R2_HEAD_1965,
        OOS_OR2,
        D_RMSE,
        MSE_F,
    ];

    pub const MONTHLY: [&str; 8] = [
        IS_R2_HEAD_LOG,
        IS_R2_HEAD,
        IS_R2_HEAD_TRUNC,
        OOS_R2_HEAD,
        SHARE_T,
        SHARE_U,
        OOS_R2_HEAD_TRUNC,
        D_RMSE,
    ];
}

/// Annual figures, already in presentation units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualStatistics {
    /// In-sample R² over the full sample (%)
    pub is_r2_full: f64,
    /// In-sample R² over the out-of-sample period (%)
    pub is_r2_oos: f64,
    /// In-sample R² over the late sub-period (%)
    pub is_r2_late: f64,
    pub oos_r2: f64,
    pub delta_rmse: f64,
    pub mse_f: f64,
}

/// Monthly figures, already in presentation units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyStatistics {
    pub is_r2_log: f64,
    pub is_r2: f64,
    pub is_r2_trunc: f64,
    pub oos_r2: f64,
    pub share_truncated: f64,
    pub share_overridden: f64,
    pub oos_r2_trunc: f64,
    pub delta_rmse: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistics {
    Annual(AnnualStatistics),
    Monthly(MonthlyStatistics),
}

/// Named scalar statistics in a fixed key order
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMapping {
    entries: Vec<(&'static str, f64)>,
}

impl ResultMapping {
    /// Pack computed statistics under their fixed key names
    pub fn assemble(statistics: &Statistics) -> Self {
        let entries = match statistics {
            Statistics::Annual(s) => vec![
                (keys::IS_R2_HEAD_1927, s.is_r2_full),
                (keys::IS_R2_HEAD_OOS, s.is_r2_oos),
                (keys::IS_R2_HEAD_1965, s.is_r2_late),
                (keys::OOS_OR2, s.oos_r2),
                (keys::D_RMSE, s.delta_rmse),
                (keys::MSE_F, s.mse_f),
            ],
            Statistics::Monthly(s) => vec![
                (keys::IS_R2_HEAD_LOG, s.is_r2_log),
                (keys::IS_R2_HEAD, s.is_r2),
                (keys::IS_R2_HEAD_TRUNC, s.is_r2_trunc),
                (keys::OOS_R2_HEAD, s.oos_r2),
                (keys::SHARE_T, s.share_truncated),
                (keys::SHARE_U, s.share_overridden),
                (keys::OOS_R2_HEAD_TRUNC, s.oos_r2_trunc),
                (keys::D_RMSE, s.delta_rmse),
            ],
        };

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ResultMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for ResultMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "  {:<18} {:>10.2}", key, value)?;
        }
        Ok(())
    }
}
