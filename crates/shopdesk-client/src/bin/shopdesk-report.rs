//! # ShopDesk Report Tool
//!
//! Fetches orders, customers and products from the backend and prints the
//! sales report, the customer growth report and the dashboard cards.
//!
//! ## Usage
//! ```bash
//! # Monthly reports as of today
//! SHOPDESK_API_TOKEN=... cargo run -p shopdesk-client --bin shopdesk-report
//!
//! # Weekly, limited to a date range
//! cargo run -p shopdesk-client --bin shopdesk-report -- --period weekly \
//!     --from 2026-07-01 --to 2026-09-30
//!
//! # CSV for spreadsheets
//! cargo run -p shopdesk-client --bin shopdesk-report -- --csv > sales.csv
//! ```

use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use shopdesk_client::{AppState, ClientConfig};
use shopdesk_core::export::{growth_report_csv, sales_report_csv};
use shopdesk_core::report::{DateRange, Period, ReportQuery};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_date(value: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", value, e).into())
}

fn print_help() {
    println!("ShopDesk Report Tool");
    println!();
    println!("Usage: shopdesk-report [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -p, --period <P>     daily | weekly | monthly | all (default from config)");
    println!("      --from <DATE>    First day of the range (YYYY-MM-DD)");
    println!("      --to <DATE>      Last day of the range (YYYY-MM-DD)");
    println!("      --as-of <DATE>   Report date (default: today, UTC)");
    println!("      --seed <N>       Customer count before the first window");
    println!("      --csv            Print the sales and growth tables as CSV");
    println!("  -c, --config <PATH>  Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shopdesk=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut period: Option<Period> = None;
    let mut from: Option<NaiveDate> = None;
    let mut to: Option<NaiveDate> = None;
    let mut as_of = Utc::now().date_naive();
    let mut seed: Option<u64> = None;
    let mut csv = false;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--period" | "-p", Some(v)) => {
                period = Some(v.parse()?);
                i += 1;
            }
            ("--from", Some(v)) => {
                from = Some(parse_date(v)?);
                i += 1;
            }
            ("--to", Some(v)) => {
                to = Some(parse_date(v)?);
                i += 1;
            }
            ("--as-of", Some(v)) => {
                as_of = parse_date(v)?;
                i += 1;
            }
            ("--seed", Some(v)) => {
                seed = Some(v.parse()?);
                i += 1;
            }
            ("--config" | "-c", Some(v)) => {
                config_path = Some(PathBuf::from(v));
                i += 1;
            }
            ("--csv", _) => csv = true,
            ("--help" | "-h", _) => {
                print_help();
                return Ok(());
            }
            (other, _) => return Err(format!("unknown or incomplete option '{}'", other).into()),
        }
        i += 1;
    }

    let config = ClientConfig::load(config_path)?;
    let state = AppState::from_config(&config)?;
    if !state.is_signed_in().await {
        return Err("no API token; set SHOPDESK_API_TOKEN or api.token in the config file".into());
    }

    // A lone --to just moves the report date.
    if let (None, Some(b)) = (from, to) {
        as_of = b;
    }
    let mut query = ReportQuery::new(period.unwrap_or(config.reports.default_period), as_of);
    if let Some(a) = from {
        query = query.with_range(DateRange::new(a, to.unwrap_or(as_of)));
    }

    info!(base_url = %config.base_url(), period = %query.period, %as_of, "Fetching data");
    state.fetch_orders().await?;
    state.fetch_customers().await?;
    state.fetch_products().await?;

    let sales = state.sales_report(&query).await;
    let growth = state.growth_report(&query, seed).await;

    if csv {
        print!("{}", sales_report_csv(&sales)?);
        println!();
        print!("{}", growth_report_csv(&growth)?);
        return Ok(());
    }

    println!("Sales ({})", query.period);
    println!("{:<28} {:>14} {:>8} {:>14}", "Period", "Revenue", "Orders", "Average");
    for bucket in &sales.buckets {
        println!(
            "{:<28} {:>14} {:>8} {:>14}",
            bucket.label,
            bucket.revenue.to_string(),
            bucket.orders,
            bucket.average_order_value.to_string()
        );
    }
    println!(
        "Total: {} over {} orders, average {}",
        sales.summary.total_revenue, sales.summary.total_orders, sales.summary.average_order_value
    );
    println!();

    println!("Customer growth ({})", query.period);
    println!("{:<28} {:>6} {:>8} {:>8} {:>9}", "Period", "New", "Churned", "Total", "Growth");
    for bucket in &growth.buckets {
        println!(
            "{:<28} {:>6} {:>8} {:>8} {:>8}%",
            bucket.label,
            bucket.new_customers,
            bucket.churned_customers,
            bucket.total_at_end,
            bucket.growth_rate.round_dp(2)
        );
    }
    println!(
        "Customers: {} (average growth {}%, latest churn {}%)",
        growth.summary.current_total,
        growth.summary.average_growth_rate.round_dp(2),
        growth.summary.latest_churn_rate.round_dp(2)
    );
    println!();

    let stats = state.dashboard(as_of).await;
    println!("Dashboard (last {} days)", stats.window_days);
    for card in [
        &stats.total_sales,
        &stats.total_orders,
        &stats.total_items,
        &stats.total_revenue,
    ] {
        println!(
            "{:<16} {:>14} ({}{}%)",
            card.title,
            card.value.round_dp(2),
            if card.is_positive() { "+" } else { "" },
            card.change_percent.round_dp(2)
        );
    }
    println!("Items in stock: {}", stats.items_in_stock);
    for alert in &stats.low_stock {
        println!("  low stock: {} ({}) - {} left", alert.name, alert.sku, alert.stock);
    }

    Ok(())
}
