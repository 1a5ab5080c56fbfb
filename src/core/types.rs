use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::ChartResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One raw series sample: unix time in seconds and a price value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub time: f64,
    pub value: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> ChartResult<Self> {
        Ok(Self {
            time: datetime_to_unix_seconds(time),
            value: decimal_to_f64(value, "value")?,
        })
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.time.is_finite() && self.value.is_finite()
    }
}
