//! Synthetic market snapshot of top gainers and losers

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

/// (ticker, price, change_amount, change_percentage, volume)
type Mover = (&'static str, &'static str, &'static str, &'static str, &'static str);

const GAINERS: [Mover; 6] = [
    ("AAPL", "150.25", "5.75", "3.98%", "75000000"),
    ("GOOGL", "2750.80", "125.30", "4.77%", "25000000"),
    ("MSFT", "320.45", "12.85", "4.18%", "45000000"),
    ("TSLA", "850.20", "35.60", "4.37%", "55000000"),
    ("AMZN", "3200.75", "145.25", "4.75%", "18000000"),
    ("NVDA", "220.85", "8.95", "4.23%", "62000000"),
];

const LOSERS: [Mover; 6] = [
    ("META", "180.45", "-8.25", "-4.38%", "42000000"),
    ("NFLX", "385.20", "-16.80", "-4.18%", "28000000"),
    ("DIS", "95.75", "-4.15", "-4.15%", "35000000"),
    ("UBER", "45.20", "-1.95", "-4.13%", "48000000"),
    ("SNAP", "12.85", "-0.58", "-4.32%", "68000000"),
    ("TWTR", "38.45", "-1.75", "-4.36%", "52000000"),
];

fn mover_json(&(ticker, price, change_amount, change_percentage, volume): &Mover) -> Value {
    json!({
        "ticker": ticker,
        "price": price,
        "change_amount": change_amount,
        "change_percentage": change_percentage,
        "volume": volume,
    })
}

/// Builds the fixed gainers/losers snapshot, stamped with `now`
pub fn top_gainers_losers(now: DateTime<Utc>) -> Value {
    json!({
        "metadata": "Top gainers/losers for the US market",
        "last_updated": now.to_rfc3339_opts(SecondsFormat::Millis, true),
        "top_gainers": GAINERS.iter().map(mover_json).collect::<Vec<_>>(),
        "top_losers": LOSERS.iter().map(mover_json).collect::<Vec<_>>(),
    })
}
