//! Curated offline news feed
//!
//! A fixed set of articles in the `NEWS_SENTIMENT` feed shape, optionally
//! narrowed by tickers and topic the same way the live endpoint is queried.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{json, Value};

/// Per-ticker sentiment attached to an article
#[derive(Debug, Clone, Serialize)]
struct TickerSentiment {
    ticker: &'static str,
    relevance_score: &'static str,
    ticker_sentiment_score: &'static str,
    ticker_sentiment_label: &'static str,
}

/// Static description of a curated article
struct Article {
    title: &'static str,
    slug: &'static str,
    hours_ago: i64,
    source: &'static str,
    label: &'static str,
    score: f64,
    summary: &'static str,
    banner: &'static str,
    tickers: &'static [(&'static str, &'static str, &'static str, &'static str)],
    topics: &'static [&'static str],
}

const ARTICLES: &[Article] = &[
    Article {
        title: "Apple Reports Strong Q4 Earnings, iPhone Sales Surge",
        slug: "apple-earnings",
        hours_ago: 2,
        source: "Financial News Network",
        label: "Bullish",
        score: 0.75,
        summary: "Apple Inc. exceeded analyst expectations with strong iPhone sales and robust services revenue, driving optimism for the holiday quarter.",
        banner: "007AFF/FFFFFF?text=AAPL+News",
        tickers: &[("AAPL", "0.95", "0.8", "Bullish")],
        topics: &["earnings", "technology"],
    },
    Article {
        title: "Tesla Unveils New Charging Network Expansion Plans",
        slug: "tesla-charging",
        hours_ago: 4,
        source: "Tech Daily",
        label: "Bullish",
        score: 0.65,
        summary: "Tesla announces major expansion of Supercharger network, opening to all electric vehicles in move that could boost revenue.",
        banner: "00C851/FFFFFF?text=TSLA+News",
        tickers: &[("TSLA", "0.92", "0.7", "Bullish")],
        topics: &["technology", "energy_transportation"],
    },
    Article {
        title: "Federal Reserve Signals Potential Rate Cuts Ahead",
        slug: "fed-rates",
        hours_ago: 6,
        source: "Economic Times",
        label: "Bullish",
        score: 0.55,
        summary: "Fed officials hint at possible interest rate reductions in upcoming meetings, boosting market sentiment across sectors.",
        banner: "5856D6/FFFFFF?text=Fed+News",
        tickers: &[
            ("SPY", "0.85", "0.6", "Bullish"),
            ("QQQ", "0.80", "0.65", "Bullish"),
        ],
        topics: &["financial_markets", "economy_monetary"],
    },
    Article {
        title: "Microsoft Azure Cloud Revenue Beats Expectations",
        slug: "microsoft-azure",
        hours_ago: 8,
        source: "Cloud Computing News",
        label: "Bullish",
        score: 0.72,
        summary: "Microsoft's cloud division continues strong growth trajectory, with Azure services showing significant market share gains.",
        banner: "0078D4/FFFFFF?text=MSFT+News",
        tickers: &[("MSFT", "0.98", "0.75", "Bullish")],
        topics: &["technology", "earnings"],
    },
    Article {
        title: "Cryptocurrency Market Faces Regulatory Uncertainty",
        slug: "crypto-regulation",
        hours_ago: 12,
        source: "Crypto Watch",
        label: "Bearish",
        score: -0.45,
        summary: "New regulatory proposals from government agencies create uncertainty in cryptocurrency markets, affecting related stocks.",
        banner: "FF3B30/FFFFFF?text=Crypto+News",
        tickers: &[("COIN", "0.90", "-0.5", "Bearish")],
        topics: &["financial_markets", "blockchain"],
    },
    Article {
        title: "AI Chip Demand Drives Semiconductor Sector Growth",
        slug: "ai-chips",
        hours_ago: 16,
        source: "Semiconductor Weekly",
        label: "Bullish",
        score: 0.82,
        summary: "Rising demand for AI processing chips continues to benefit major semiconductor companies as machine learning adoption accelerates.",
        banner: "76B900/FFFFFF?text=AI+Chips",
        tickers: &[
            ("NVDA", "0.95", "0.85", "Bullish"),
            ("AMD", "0.88", "0.70", "Bullish"),
        ],
        topics: &["technology", "manufacturing"],
    },
    Article {
        title: "Bank Stocks Rally on Interest Rate Outlook",
        slug: "bank-rally",
        hours_ago: 20,
        source: "Banking Weekly",
        label: "Bullish",
        score: 0.68,
        summary: "Major bank stocks surge as investors anticipate favorable interest rate environment and strong lending growth ahead.",
        banner: "34C759/FFFFFF?text=Bank+News",
        tickers: &[
            ("JPM", "0.90", "0.72", "Bullish"),
            ("BAC", "0.85", "0.68", "Bullish"),
        ],
        topics: &["financial_markets", "finance"],
    },
    Article {
        title: "Major IPO Filing Expected This Week",
        slug: "ipo-filing",
        hours_ago: 24,
        source: "IPO News",
        label: "Neutral",
        score: 0.15,
        summary: "Several companies are preparing for public offerings in what could be a busy week for initial public offerings.",
        banner: "FF9500/FFFFFF?text=IPO+News",
        tickers: &[],
        topics: &["ipo", "financial_markets"],
    },
];

impl Article {
    fn mentions_any(&self, tickers: &[String]) -> bool {
        self.tickers
            .iter()
            .any(|(ticker, ..)| tickers.iter().any(|t| t.eq_ignore_ascii_case(ticker)))
    }

    fn to_json(&self, now: DateTime<Utc>) -> Value {
        let published = now - Duration::hours(self.hours_ago);
        let ticker_sentiment: Vec<TickerSentiment> = self
            .tickers
            .iter()
            .map(|&(ticker, relevance, score, label)| TickerSentiment {
                ticker,
                relevance_score: relevance,
                ticker_sentiment_score: score,
                ticker_sentiment_label: label,
            })
            .collect();

        json!({
            "title": self.title,
            "url": format!("https://example.com/{}", self.slug),
            "time_published": published.format("%Y%m%dT%H%M").to_string(),
            "source": self.source,
            "overall_sentiment_label": self.label,
            "overall_sentiment_score": self.score,
            "summary": self.summary,
            "banner_image": format!("https://via.placeholder.com/600x300/{}", self.banner),
            "ticker_sentiment": ticker_sentiment,
            "topics": self.topics,
        })
    }
}

/// Builds the curated feed, filtered by `tickers` (comma separated) and `topic`
///
/// A topic of `all` does not filter. Publication times are relative to `now`.
pub fn news_sentiment(tickers: Option<&str>, topic: Option<&str>, now: DateTime<Utc>) -> Value {
    let ticker_list: Option<Vec<String>> = tickers.map(|list| {
        list.split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect()
    });
    let topic = topic.filter(|t| *t != "all");

    let feed: Vec<Value> = ARTICLES
        .iter()
        .filter(|article| match &ticker_list {
            Some(list) => article.mentions_any(list),
            None => true,
        })
        .filter(|article| match topic {
            Some(topic) => article.topics.iter().any(|t| *t == topic),
            None => true,
        })
        .map(|article| article.to_json(now))
        .collect();

    json!({
        "items": feed.len().to_string(),
        "sentiment_score_definition": "x <= -0.35: Bearish; -0.35 < x <= 0.35: Neutral; 0.35 < x: Bullish",
        "relevance_score_definition": "0 < x <= 1, with a higher score indicating higher relevance.",
        "feed": feed,
    })
}
