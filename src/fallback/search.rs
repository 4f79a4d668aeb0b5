//! Synthetic symbol search result

use serde_json::{json, Value};

/// A single best match echoing the query
pub fn symbol_search(keywords: &str) -> Value {
    json!({
        "bestMatches": [{
            "1. symbol": keywords.to_uppercase(),
            "2. name": format!("{} Inc", keywords),
            "3. type": "Equity",
            "4. region": "United States",
            "5. marketOpen": "09:30",
            "6. marketClose": "16:00",
            "7. timezone": "UTC-04",
            "8. currency": "USD",
            "9. matchScore": "0.8000",
        }]
    })
}
