//! marketview - Browse stock market data from the terminal
//!
//! Fetches quotes, movers, series, fundamentals and news from the market data
//! API through a local expiring cache and prints them to stdout.

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use futures::future::join_all;
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketview::cache::{FileStorage, MemoryStorage, Storage};
use marketview::cli::{parse_interval_arg, parse_output_size_arg, Cli, Command, IndicatorArgs, WatchlistCommand};
use marketview::config::Config;
use marketview::error::ApiError;
use marketview::data::{IndicatorQuery, MacdQuery, NewsQuery, StockApi, WatchedStock, WatchlistStore};
use marketview::format::{format_currency, format_percentage, format_volume, is_positive_change};

/// Sets up logging to stderr
///
/// Defaults to warnings only; `--verbose` raises the crate to debug and
/// `RUST_LOG` overrides both.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "marketview=debug" } else { "marketview=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Picks the storage backend for cached responses
fn open_cache_storage(config: &Config) -> Arc<dyn Storage> {
    if let Some(dir) = &config.cache_dir {
        return Arc::new(FileStorage::with_dir(dir.clone()));
    }
    match FileStorage::new() {
        Some(storage) => Arc::new(storage),
        None => {
            warn!("no cache directory available, responses will not persist");
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Picks the storage backend for watchlists
///
/// An explicit cache directory holds watchlists too; otherwise they go to the
/// XDG data directory so clearing the OS cache does not lose them.
fn open_watchlist_storage(config: &Config, cache: &Arc<dyn Storage>) -> Arc<dyn Storage> {
    if config.cache_dir.is_some() {
        return cache.clone();
    }
    match FileStorage::in_data_dir() {
        Some(storage) => Arc::new(storage),
        None => {
            warn!("no data directory available, watchlists will not persist");
            cache.clone()
        }
    }
}

fn print_json(value: &Value) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints one side of the movers snapshot as a table
fn print_movers(title: &str, movers: &Value) {
    println!("{}", title);
    let Some(rows) = movers.as_array() else {
        println!("  (none)");
        return;
    };
    for row in rows {
        let arrow = if is_positive_change(&row["change_amount"]) { "▲" } else { "▼" };
        println!(
            "  {:<8} {:>12} {} {:>8}  vol {:>7}",
            row["ticker"].as_str().unwrap_or("?"),
            format_currency(&row["price"]),
            arrow,
            format_percentage(&row["change_percentage"]),
            format_volume(&row["volume"]),
        );
    }
}

fn indicator_query(args: &IndicatorArgs, default_period: u32) -> IndicatorQuery {
    IndicatorQuery {
        symbol: args.symbol.clone(),
        interval: args.interval.clone(),
        time_period: args.time_period.unwrap_or(default_period),
        series_type: args.series_type.clone(),
    }
}

async fn run_watchlist(
    command: &WatchlistCommand,
    api: &StockApi,
    store: &WatchlistStore,
) -> Result<(), Box<dyn Error>> {
    match command {
        WatchlistCommand::List => {
            for list in store.list().await? {
                let tickers: Vec<&str> = list.stocks.iter().map(|s| s.ticker.as_str()).collect();
                println!("{}  {}  [{}]", list.id, list.name, tickers.join(", "));
            }
        }
        WatchlistCommand::Create { name } => {
            let list = store.create(name).await?;
            println!("Created watchlist '{}' with id {}", list.name, list.id);
        }
        WatchlistCommand::Delete { id } => {
            if !store.delete(id).await? {
                println!("No watchlist with id {}", id);
            }
        }
        WatchlistCommand::Add { id, ticker } => {
            if !store.add_stock(id, WatchedStock::new(ticker.to_uppercase())).await? {
                println!("{} was not added (unknown watchlist or already present)", ticker);
            }
        }
        WatchlistCommand::Remove { id, ticker } => {
            if !store.remove_stock(id, &ticker.to_uppercase()).await? {
                println!("{} was not on watchlist {}", ticker, id);
            }
        }
        WatchlistCommand::Quotes { id } => {
            let Some(list) = store.get(id).await? else {
                println!("No watchlist with id {}", id);
                return Ok(());
            };
            let quotes = join_all(list.stocks.iter().map(|s| api.global_quote(&s.ticker))).await;
            for (stock, quote) in list.stocks.iter().zip(quotes) {
                match quote {
                    Ok(quote) => {
                        let q = &quote["Global Quote"];
                        println!(
                            "  {:<8} {:>12} {:>8}",
                            stock.ticker,
                            format_currency(&q["05. price"]),
                            format_percentage(&q["10. change percent"]),
                        );
                    }
                    Err(e) => println!("  {:<8} error: {}", stock.ticker, e),
                }
            }
        }
    }
    Ok(())
}

async fn run(command: &Command, api: &StockApi, store: &WatchlistStore) -> Result<(), Box<dyn Error>> {
    let payload = match command {
        Command::Movers => {
            let movers = api.top_gainers_losers().await?;
            print_movers("Top gainers", &movers["top_gainers"]);
            print_movers("Top losers", &movers["top_losers"]);
            return Ok(());
        }
        Command::Quote { symbol } => api.global_quote(symbol).await?,
        Command::Intraday {
            symbol,
            interval,
            output_size,
        } => {
            let interval = parse_interval_arg(interval)?;
            let output_size = parse_output_size_arg(output_size)?;
            api.intraday(symbol, interval, output_size).await?
        }
        Command::Overview { symbol } => api.company_overview(symbol).await?,
        Command::Daily { symbol, output_size } => {
            api.time_series_daily(symbol, parse_output_size_arg(output_size)?).await?
        }
        Command::News {
            tickers,
            topics,
            time_from,
            time_to,
            sort,
            limit,
        } => {
            let query = NewsQuery {
                tickers: tickers.clone(),
                topics: topics.clone(),
                time_from: time_from.clone(),
                time_to: time_to.clone(),
                sort: sort.clone(),
                limit: *limit,
            };
            api.news_sentiment(&query).await?
        }
        Command::Search { keywords } => api.search_symbol(keywords).await?,
        Command::MarketStatus => api.market_status().await?,
        Command::Earnings { symbol } => api.earnings(symbol).await?,
        Command::Income { symbol } => api.income_statement(symbol).await?,
        Command::BalanceSheet { symbol } => api.balance_sheet(symbol).await?,
        Command::CashFlow { symbol } => api.cash_flow(symbol).await?,
        Command::Sma(args) => api.sma(&indicator_query(args, 20)).await?,
        Command::Ema(args) => api.ema(&indicator_query(args, 20)).await?,
        Command::Rsi(args) => api.rsi(&indicator_query(args, 14)).await?,
        Command::Macd {
            symbol,
            interval,
            series_type,
        } => {
            let query = MacdQuery {
                interval: interval.clone(),
                series_type: series_type.clone(),
                ..MacdQuery::new(symbol.clone())
            };
            api.macd(&query).await?
        }
        Command::ClearCache => {
            let removed = api.clear_cache().await?;
            println!("Removed {} cached entries", removed);
            return Ok(());
        }
        Command::Watchlist(command) => return run_watchlist(command, api, store).await,
    };

    print_json(&payload)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.apply_to(Config::from_env());
    let storage = open_cache_storage(&config);
    let store = WatchlistStore::new(open_watchlist_storage(&config, &storage));
    let api = StockApi::new(&config, storage);

    if let Err(e) = run(&cli.command, &api, &store).await {
        if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_transport) {
            eprintln!("The market data service could not be reached; try again shortly.");
        }
        return Err(e);
    }
    Ok(())
}
