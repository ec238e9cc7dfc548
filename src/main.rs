use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use martlens::cli::{self, OutputFormat, ReportContext};
use martlens::config;
use martlens::filter::FilterSpec;
use martlens::web::{self, ServeOptions};

#[derive(Debug, Parser)]
#[command(name = "martlens")]
#[command(about = "Sales analytics and reporting over retail transaction logs")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every report command: where the data lives and which
/// rows are in scope.
#[derive(Debug, Args)]
struct ScopeArgs {
    /// Path to the sales transactions CSV (overrides configuration)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Keep transactions on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Keep transactions on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
    /// Keep only this store location (repeat for more than one)
    #[arg(long = "store")]
    stores: Vec<String>,
    /// Keep only one sales channel: In-store, Online, or All
    #[arg(long)]
    channel: Option<String>,
    /// Keep only this product category (repeat for more than one)
    #[arg(long = "category")]
    categories: Vec<String>,
}

impl ScopeArgs {
    fn context(&self) -> Result<ReportContext> {
        let cfg = config::load();
        let spec = FilterSpec::build(
            self.from.as_deref(),
            self.to.as_deref(),
            self.stores.clone(),
            self.channel.as_deref(),
            self.categories.clone(),
        )?;

        Ok(ReportContext {
            data: self
                .data
                .clone()
                .unwrap_or_else(|| PathBuf::from(&cfg.data.path)),
            spec,
            report: cfg.report,
        })
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show summary statistics for the filtered selection
    Summary {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Break revenue down by one dimension
    Revenue {
        /// Grouping dimension: category, store, channel, date, product,
        /// customer, payment, segment, weekday
        #[arg(long, default_value = "store")]
        by: String,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Rank products or customers by revenue
    Top {
        #[command(subcommand)]
        target: TopTarget,
    },
    /// Count transactions per sales channel
    Channels {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Print a readable sample of matching transactions
    Sample {
        /// Number of rows to show
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Export matching transactions as normalized CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// List the stores observed in the data
    Stores {
        /// Path to the sales transactions CSV (overrides configuration)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Interactive report menu
    Menu {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Start the local web dashboard
    Serve {
        /// Bind host (overrides configuration)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides configuration)
        #[arg(long)]
        port: Option<u16>,
        /// Open the dashboard in the default browser
        #[arg(long)]
        open: bool,
        /// Path to the sales transactions CSV (overrides configuration)
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum TopTarget {
    /// Highest-revenue products
    Products {
        /// How many entries to show
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Highest-revenue customers with their first-seen segment
    Customers {
        /// How many entries to show
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration and where it comes from
    Show,
    /// Write a starter global config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a value in the global config file (e.g. report.top_n 10)
    Set {
        /// Dotted key, e.g. data.path or report.top_n
        key: String,
        /// New value
        value: String,
    },
    /// Delete the global config file, restoring defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    if !config::load().display.color {
        colored::control::set_override(false);
    }

    match app.command {
        Commands::Summary { scope, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_summary(&scope.context()?, fmt)
        }
        Commands::Revenue { by, scope, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_revenue(&scope.context()?, &by, fmt)
        }
        Commands::Top { target } => match target {
            TopTarget::Products {
                limit,
                scope,
                format,
            } => {
                let fmt = OutputFormat::from_str_opt(Some(&format));
                let ctx = scope.context()?;
                let n = limit.unwrap_or(ctx.report.top_n);
                cli::run_top_products(&ctx, n, fmt)
            }
            TopTarget::Customers {
                limit,
                scope,
                format,
            } => {
                let fmt = OutputFormat::from_str_opt(Some(&format));
                let ctx = scope.context()?;
                let n = limit.unwrap_or(ctx.report.top_n);
                cli::run_top_customers(&ctx, n, fmt)
            }
        },
        Commands::Channels { scope, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_channels(&scope.context()?, fmt)
        }
        Commands::Sample {
            limit,
            scope,
            format,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            let ctx = scope.context()?;
            let rows = limit.unwrap_or(ctx.report.sample_rows);
            cli::run_sample(&ctx, rows, fmt)
        }
        Commands::Export { output, scope } => {
            cli::run_export(&scope.context()?, output.as_deref())
        }
        Commands::Stores { data, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            let cfg = config::load();
            let ctx = ReportContext {
                data: data.unwrap_or_else(|| PathBuf::from(&cfg.data.path)),
                spec: FilterSpec::default(),
                report: cfg.report,
            };
            cli::run_stores(&ctx, fmt)
        }
        Commands::Menu { scope } => cli::menu::run(&scope.context()?),
        Commands::Serve {
            host,
            port,
            open,
            data,
        } => {
            let cfg = config::load();
            let mut server = cfg.server;
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }

            let opts = ServeOptions {
                addr: server.addr(),
                data: data.unwrap_or_else(|| PathBuf::from(&cfg.data.path)),
                report: cfg.report,
                open,
            };
            web::serve(&opts)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
