use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{datetime_to_unix_seconds, decimal_to_f64};

    #[test]
    fn millisecond_precision_survives_conversion() {
        let time = Utc
            .timestamp_millis_opt(1_700_000_000_250)
            .single()
            .expect("valid timestamp");
        assert_eq!(datetime_to_unix_seconds(time), 1_700_000_000.25);
    }

    #[test]
    fn decimal_prices_convert_to_f64() {
        let price = Decimal::new(10_125, 2);
        assert_eq!(decimal_to_f64(price, "price").expect("convert"), 101.25);
    }
}
