//! Synthetic company profile

use serde_json::{Map, Value};

/// Profile fields that do not depend on the symbol
const PROFILE_FIELDS: &[(&str, &str)] = &[
    ("AssetType", "Common Stock"),
    ("Exchange", "NASDAQ"),
    ("Currency", "USD"),
    ("Country", "USA"),
    ("Sector", "Technology"),
    ("Industry", "Consumer Electronics"),
    ("MarketCapitalization", "2500000000000"),
    ("PERatio", "28.5"),
    ("PEGRatio", "1.2"),
    ("BookValue", "4.5"),
    ("DividendPerShare", "0.88"),
    ("DividendYield", "0.58"),
    ("EPS", "5.25"),
    ("RevenuePerShareTTM", "22.5"),
    ("ProfitMargin", "0.23"),
    ("OperatingMarginTTM", "0.28"),
    ("ReturnOnAssetsTTM", "0.12"),
    ("ReturnOnEquityTTM", "0.85"),
    ("RevenueTTM", "365000000000"),
    ("GrossProfitTTM", "170000000000"),
    ("DilutedEPSTTM", "5.25"),
    ("QuarterlyEarningsGrowthYOY", "0.15"),
    ("QuarterlyRevenueGrowthYOY", "0.12"),
    ("AnalystTargetPrice", "160.0"),
    ("TrailingPE", "28.5"),
    ("ForwardPE", "25.2"),
    ("PriceToSalesRatioTTM", "7.2"),
    ("PriceToBookRatio", "33.5"),
    ("EVToRevenue", "7.8"),
    ("EVToEBITDA", "21.5"),
    ("Beta", "1.2"),
    ("52WeekHigh", "175.5"),
    ("52WeekLow", "125.2"),
    ("50DayMovingAverage", "148.5"),
    ("200DayMovingAverage", "142.8"),
    ("SharesOutstanding", "16000000000"),
    ("SharesFloat", "15800000000"),
    ("SharesShort", "120000000"),
    ("SharesShortPriorMonth", "110000000"),
    ("ShortRatio", "1.8"),
    ("ShortPercentOutstanding", "0.0075"),
    ("ShortPercentFloat", "0.0076"),
    ("PercentInsiders", "0.15"),
    ("PercentInstitutions", "58.5"),
    ("ForwardAnnualDividendRate", "0.92"),
    ("ForwardAnnualDividendYield", "0.0061"),
    ("PayoutRatio", "0.175"),
    ("DividendDate", "2024-02-15"),
    ("ExDividendDate", "2024-02-08"),
    ("LastSplitFactor", "4:1"),
    ("LastSplitDate", "2020-08-31"),
];

/// Builds a profile for `symbol` with placeholder fundamentals
pub fn company_overview(symbol: &str) -> Value {
    let mut profile = Map::new();
    profile.insert("Symbol".to_string(), Value::from(symbol));
    profile.insert("Name".to_string(), Value::from(format!("{} Inc.", symbol)));
    profile.insert(
        "Description".to_string(),
        Value::from(format!(
            "{} is a leading technology company that designs, develops, and sells consumer electronics, computer software, and online services.",
            symbol
        )),
    );
    for (field, value) in PROFILE_FIELDS {
        profile.insert(field.to_string(), Value::from(*value));
    }
    Value::Object(profile)
}
