//! Command line interface of the `tao-income` binary.

use clap::{Args, Parser, Subcommand};
use time::{Duration, OffsetDateTime};

use crate::config::GatewayConfig;
use crate::error::TaoError;
use crate::gateway::{self, GatewayClient};
use crate::rewards::{
    BalanceRow, PricingPolicy, Snapshot, TimeRange, balance_summary, balance_table, compute_rewards,
    coverage, rolling_rewards,
};

#[derive(Debug, Parser)]
#[command(name = "tao-income")]
#[command(about = "tao.app gateway and staking reward analysis", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the rate-limited gateway
    Serve {
        /// Listen address, overrides GATEWAY_HOST
        #[arg(long)]
        host: Option<String>,
        /// Listen port, overrides GATEWAY_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Reconstruct rewards over a trailing window
    Rewards(AnalysisArgs),
    /// Print the per-snapshot balance history table
    Table(AnalysisArgs),
    /// Report how much history the gateway returns
    Coverage(CoverageArgs),
}

/// Where to read a portfolio from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Coldkey whose portfolio to analyse
    #[arg(long, env = "TAO_COLDKEY")]
    pub coldkey: String,
    /// Base URL of a running gateway
    #[arg(long, env = "TAO_GATEWAY_URL", default_value = "http://localhost:8000")]
    pub gateway_url: String,
}

impl SourceArgs {
    async fn snapshots(&self) -> Result<Vec<Snapshot>, TaoError> {
        GatewayClient::new(&self.gateway_url)
            .portfolio_snapshots(&self.coldkey)
            .await
    }
}

#[derive(Debug, Args)]
pub struct AnalysisArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Trailing window in hours
    #[arg(long, default_value_t = 24)]
    pub hours: u32,
    /// Value subnet tokens in USD instead of TAO
    #[arg(long)]
    pub usd: bool,
}

#[derive(Debug, Args)]
pub struct CoverageArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// How recent data must be to count as usable, in hours
    #[arg(long, default_value_t = 48)]
    pub hours: u32,
}

impl AnalysisArgs {
    fn pricing(&self) -> PricingPolicy {
        if self.usd {
            PricingPolicy::usd()
        } else {
            PricingPolicy::standard()
        }
    }

    fn lookback(&self) -> Duration {
        Duration::hours(i64::from(self.hours))
    }
}

pub async fn run(cli: Cli) -> Result<(), TaoError> {
    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = GatewayConfig::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            gateway::serve(config).await
        }
        Commands::Rewards(args) => rewards(&args).await,
        Commands::Table(args) => table(&args).await,
        Commands::Coverage(args) => report_coverage(&args).await,
    }
}

async fn rewards(args: &AnalysisArgs) -> Result<(), TaoError> {
    let snapshots = args.source.snapshots().await?;
    let pricing = args.pricing();
    let window = TimeRange::trailing(OffsetDateTime::now_utc(), args.lookback());

    let report = compute_rewards(&snapshots, &window, &pricing);
    let rolling_hour = rolling_rewards(&snapshots, Duration::hours(1), &pricing);

    for partition in &report.per_partition {
        println!(
            "Subnet {:>4}  snapshots {:>4}  total {:>14.6}  last step {:>12.6}  window {:>12.6}",
            partition.partition_id,
            partition.snapshot_count,
            partition.full_range.currency_value,
            partition.hourly_reward,
            partition.windowed_reward,
        );
    }
    let totals = &report.totals;
    println!();
    println!("Data points:          {}", totals.data_points);
    println!("Subnets:              {}", totals.partitions);
    println!("Total rewards:        {:.6}", totals.total_rewards);
    println!("Balance change:       {:.6}", totals.balance_change);
    println!("Past hour (last step): {:.6}", totals.hourly_rewards);
    println!("Past hour (rolling):   {:.6}", rolling_hour.total);
    println!("Past {}h:              {:.6}", args.hours, totals.windowed_rewards);
    Ok(())
}

async fn table(args: &AnalysisArgs) -> Result<(), TaoError> {
    let snapshots = args.source.snapshots().await?;
    let pricing = args.pricing();
    let window = TimeRange::trailing(OffsetDateTime::now_utc(), args.lookback());

    println!(
        "{:<26} {:>6} {:>16} {:>12} {:>14} {:>16} {:>14}",
        "Timestamp", "Subnet", "Token Amount", "Token Price", "Balance Value", "Reward Tokens", "Reward Value"
    );
    for row in balance_table(&snapshots, &window, &pricing) {
        print_row(&row);
    }

    let summary = balance_summary(&snapshots, &window, &pricing);
    println!();
    println!("Rows:                  {}", summary.rows);
    println!("Subnets:               {}", summary.partitions);
    println!("Reward tokens:         {:.6}", summary.total_reward_quantity);
    println!("Reward value:          {:.6}", summary.total_reward_value);
    println!("Balance value:         {:.6}", summary.total_balance_value);
    Ok(())
}

fn print_row(row: &BalanceRow) {
    let timestamp = row
        .timestamp
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| row.timestamp.to_string());
    println!(
        "{:<26} {:>6} {:>16.6} {:>12.6} {:>14.2} {:>16.6} {:>14.2}",
        timestamp,
        row.partition_id,
        row.quantity,
        row.unit_price,
        row.balance_value,
        row.reward_quantity,
        row.reward_value,
    );
}

async fn report_coverage(args: &CoverageArgs) -> Result<(), TaoError> {
    let snapshots = args.source.snapshots().await?;
    let recent = Duration::hours(i64::from(args.hours));
    let report = coverage(&snapshots, OffsetDateTime::now_utc(), recent);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
