//! Statusboard CLI
//!
//! Command-line client for a running Statusboard API:
//! - Show and refresh API status
//! - Register status targets
//! - Browse the activity feed
//! - Search transit connections

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "statusboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal dashboard: API status, activity feed and transit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8086", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current status of every target
    Status,

    /// Probe every target now and show the result
    Refresh,

    /// Register a status target
    Add {
        /// Display name
        name: String,
        /// Endpoint url
        url: String,
        /// Probe strategy (reachability, weekly-json)
        #[arg(short, long, default_value = "reachability")]
        strategy: String,
    },

    /// Show the activity feed
    Feed,

    /// Search transit connections
    Connections {
        /// Departure station
        from: String,
        /// Arrival station
        to: String,
        /// Departure time, YYYY-MM-DDTHH:MM (default: now)
        #[arg(short, long)]
        at: Option<String>,
        /// Number of connections
        #[arg(short, long)]
        limit: Option<u32>,
        /// Show every section of each connection
        #[arg(short, long)]
        details: bool,
    },

    /// Show recent transit searches
    History,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.api_url.trim_end_matches('/').to_string();

    match cli.command {
        Commands::Status => {
            let data = send(client.get(format!("{}/api/v1/status", base)), &base).await?;
            print_status(&data, &cli.format)?;
        }

        Commands::Refresh => {
            let data = send(client.post(format!("{}/api/v1/status/refresh", base)), &base).await?;
            print_status(&data, &cli.format)?;
        }

        Commands::Add {
            name,
            url,
            strategy,
        } => {
            let body = serde_json::json!({
                "name": name,
                "url": url,
                "strategy": strategy,
            });
            let data = send(
                client
                    .post(format!("{}/api/v1/status/targets", base))
                    .json(&body),
                &base,
            )
            .await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!(
                    "Registered '{}' ({}) at position {}",
                    data["entry"]["name"].as_str().unwrap_or("-"),
                    data["entry"]["strategy"].as_str().unwrap_or("-"),
                    data["index"].as_u64().unwrap_or(0)
                );
                println!("It will be checked on the next refresh.");
            }
        }

        Commands::Feed => {
            let data = send(client.get(format!("{}/api/v1/feed", base)), &base).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                let items = data["items"].as_array().cloned().unwrap_or_default();
                if items.is_empty() {
                    println!("The feed is empty.");
                }
                for item in items {
                    println!(
                        "{}  [{}] {}",
                        item["date"].as_str().unwrap_or("-"),
                        item["icon"].as_str().unwrap_or("menu"),
                        item["title"].as_str().unwrap_or("-")
                    );
                    println!(
                        "            {}: {}",
                        item["category"].as_str().unwrap_or("-"),
                        item["summary"].as_str().unwrap_or("")
                    );
                }
            }
        }

        Commands::Connections {
            from,
            to,
            at,
            limit,
            details,
        } => {
            let mut url = format!(
                "{}/api/v1/transit/connections?from={}&to={}",
                base,
                urlencoding::encode(&from),
                urlencoding::encode(&to)
            );
            if let Some(at) = &at {
                url.push_str(&format!("&datetime={}", urlencoding::encode(at)));
            }
            if let Some(limit) = limit {
                url.push_str(&format!("&limit={}", limit));
            }

            let data = send(client.get(url), &base).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_connections(&data, details);
            }
        }

        Commands::History => {
            let data = send(client.get(format!("{}/api/v1/transit/history", base)), &base).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                let searches = data["searches"].as_array().cloned().unwrap_or_default();
                if searches.is_empty() {
                    println!("No searches yet.");
                }
                for search in searches {
                    println!(
                        "{:<25} {} -> {}{}",
                        search["timestamp"].as_str().unwrap_or("-"),
                        search["from"].as_str().unwrap_or("-"),
                        search["to"].as_str().unwrap_or("-"),
                        search["datetime"]
                            .as_str()
                            .map(|d| format!(" ({})", d))
                            .unwrap_or_default()
                    );
                }
            }
        }

        Commands::Config { output } => {
            let config = statusboard::config::generate_default_config();

            match output {
                Some(path) => {
                    std::fs::write(&path, config)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", config),
            }
        }
    }

    Ok(())
}

/// Send a request and decode the JSON body, turning API errors into messages
async fn send(request: reqwest::RequestBuilder, base: &str) -> anyhow::Result<Value> {
    let response = request.send().await.with_context(|| {
        format!(
            "Cannot connect to Statusboard API at {}\nMake sure the server is running:\n  cargo run --bin statusboard-api",
            base
        )
    })?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = body["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        bail!("Request failed ({}): {}", status, message);
    }

    Ok(body)
}

fn print_status(data: &Value, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(data)?);
        return Ok(());
    }

    let entries = data["entries"].as_array().cloned().unwrap_or_default();
    if entries.is_empty() {
        println!("No status targets registered.");
        println!();
        println!("Add one with:");
        println!("  statusboard-cli add \"GitHub API\" https://api.github.com");
        return Ok(());
    }

    println!("{:<2} {:<8} {:<20} {:>9}  {}", "", "Status", "Name", "Latency", "URL");
    println!("{}", "-".repeat(80));

    for entry in &entries {
        let latency = entry["latency_ms"]
            .as_u64()
            .map(|ms| format!("{} ms", ms))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<2} {:<8} {:<20} {:>9}  {}",
            entry["symbol"].as_str().unwrap_or("?"),
            entry["label"].as_str().unwrap_or("-"),
            entry["name"].as_str().unwrap_or("-"),
            latency,
            entry["url"].as_str().unwrap_or("-")
        );
    }

    let counts = &data["counts"];
    println!();
    println!(
        "{}/{} online",
        counts["online"].as_u64().unwrap_or(0),
        counts["total"].as_u64().unwrap_or(0)
    );
    if let Some(ms) = data["last_refresh"]["duration_ms"].as_u64() {
        println!("Last refresh took {} ms", ms);
    }

    Ok(())
}

fn print_connections(data: &Value, details: bool) {
    let connections = data["connections"].as_array().cloned().unwrap_or_default();
    if connections.is_empty() {
        println!("No connections found.");
        return;
    }

    println!(
        "{:<6} {:<6} {:<8} {:<9} {:<5} {}",
        "Dep", "Arr", "Duration", "Transfers", "Plat", "Route"
    );
    println!("{}", "-".repeat(70));

    for connection in &connections {
        println!(
            "{:<6} {:<6} {:<8} {:<9} {:<5} {} -> {}",
            connection["departure"].as_str().unwrap_or("-"),
            connection["arrival"].as_str().unwrap_or("-"),
            connection["duration"].as_str().unwrap_or("-"),
            connection["transfers"].as_u64().unwrap_or(0),
            connection["platform"].as_str().unwrap_or("?"),
            connection["from"].as_str().unwrap_or("-"),
            connection["to"].as_str().unwrap_or("-")
        );

        if details {
            for section in connection["sections"].as_array().into_iter().flatten() {
                println!(
                    "       {} {:<12} {} ({}) -> {} {} ({}), {} min",
                    section["departure"].as_str().unwrap_or("-"),
                    section["name"].as_str().unwrap_or("-"),
                    section["from"].as_str().unwrap_or("-"),
                    section["depart_platform"].as_str().unwrap_or("?"),
                    section["arrival"].as_str().unwrap_or("-"),
                    section["to"].as_str().unwrap_or("-"),
                    section["arrival_platform"].as_str().unwrap_or("?"),
                    section["duration_minutes"].as_i64().unwrap_or(0)
                );
            }
        }
    }
}
