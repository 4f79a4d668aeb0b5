//! Synthetic daily price series
//!
//! Thirty trading days ending on the given date, shaped like the
//! `TIME_SERIES_DAILY` response: a gentle sine wave around 150 with random
//! noise, floored at 120.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};

use super::seed_for;

/// Number of daily bars generated
pub const SERIES_DAYS: i64 = 30;

const BASE_PRICE: f64 = 150.0;
const PRICE_FLOOR: f64 = 120.0;

/// Builds the series for `symbol`, seeded from the symbol and date
pub fn daily_series(symbol: &str, today: NaiveDate) -> Value {
    let date = today.format("%Y-%m-%d").to_string();
    let mut rng = StdRng::seed_from_u64(seed_for(&[symbol, &date]));
    daily_series_with_rng(symbol, today, &mut rng)
}

/// Builds the series drawing all randomness from `rng`
pub fn daily_series_with_rng<R: Rng>(symbol: &str, today: NaiveDate, rng: &mut R) -> Value {
    let mut bars = Map::new();

    for i in (0..SERIES_DAYS).rev() {
        let date = today - Duration::days(i);

        let variation = (rng.gen::<f64>() - 0.5) * 10.0;
        let close = (BASE_PRICE + variation + (i as f64 / 5.0).sin() * 5.0).max(PRICE_FLOOR);
        let open = close - 1.0 + rng.gen::<f64>() * 2.0;
        let high = open.max(close) + rng.gen::<f64>() * 3.0;
        let low = open.min(close) - rng.gen::<f64>() * 3.0;
        let volume = (rng.gen::<f64>() * 100_000_000.0).floor() as u64;

        bars.insert(
            date.format("%Y-%m-%d").to_string(),
            json!({
                "1. open": format!("{:.2}", open),
                "2. high": format!("{:.2}", high),
                "3. low": format!("{:.2}", low),
                "4. close": format!("{:.2}", close),
                "5. volume": volume.to_string(),
            }),
        );
    }

    json!({
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": symbol,
            "3. Last Refreshed": today.format("%Y-%m-%d").to_string(),
            "4. Output Size": "Compact",
            "5. Time Zone": "US/Eastern",
        },
        "Time Series (Daily)": bars,
    })
}
