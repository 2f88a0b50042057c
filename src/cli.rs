//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::adapters::chart_svg::generate_price_svg;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::config::{DashboardConfig, DataSource};
use crate::domain::dashboard::{Body, Dashboard, Notice};
use crate::domain::error::DashError;
use crate::domain::period::PeriodCode;
use crate::domain::selection::{
    DEFAULT_COMPANIES, PRICE_CEILING, PRICE_FLOOR, PriceRange, Selection,
};
use crate::domain::table::{COMPANY_COLUMN, WideTable};
use crate::domain::ticker::TickerMap;
use crate::ports::market_data_port::MarketDataPort;

/// Exit code of `show` when no company is selected.
pub const EMPTY_SELECTION_EXIT: u8 = 5;

#[derive(Parser, Debug)]
#[command(name = "pricedash", about = "Closing-price dashboard for GAFA+ stocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run one render pass in the terminal
    Show {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Lookback period: 5d, 1mo, 3mo or 6mo
        #[arg(long, default_value = "5d")]
        period: String,
        /// Comma-separated company names
        #[arg(long)]
        companies: Option<String>,
        #[arg(long, default_value_t = PRICE_FLOOR)]
        ymin: f64,
        #[arg(long, default_value_t = PRICE_CEILING)]
        ymax: f64,
        /// Write the Vega-Lite chart document here
        #[arg(long)]
        vega_out: Option<PathBuf>,
        /// Write the rendered SVG chart here
        #[arg(long)]
        svg_out: Option<PathBuf>,
    },
    /// List the tracked companies and their tickers
    Companies,
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing();
    match cli.command {
        Command::Serve { config } => run_serve(config.as_ref()),
        Command::Show {
            config,
            period,
            companies,
            ymin,
            ymax,
            vega_out,
            svg_out,
        } => {
            let outputs = ShowOutputs {
                vega: vega_out,
                svg: svg_out,
            };
            let companies = companies.as_deref();
            match run_show(config.as_ref(), &period, companies, ymin, ymax, &outputs) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("error: {e}");
                    (&e).into()
                }
            }
        }
        Command::Companies => run_companies(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Already installed when `run` is called more than once in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: Option<&PathBuf>) -> Result<DashboardConfig, DashError> {
    let adapter = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path).map_err(|e| DashError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => FileConfigAdapter::empty(),
    };
    DashboardConfig::from_config(&adapter)
}

pub fn build_source(
    source: &DataSource,
) -> Result<Arc<dyn MarketDataPort + Send + Sync>, DashError> {
    match source {
        DataSource::Yahoo { base_url, timeout } => {
            tracing::info!(%base_url, "using Yahoo Finance market data");
            Ok(Arc::new(YahooAdapter::new(base_url.clone(), *timeout)?))
        }
        DataSource::Csv { dir } => {
            tracing::info!(dir = %dir.display(), "using CSV market data");
            Ok(Arc::new(CsvAdapter::new(dir.clone())))
        }
    }
}

pub fn build_dashboard(config: &DashboardConfig) -> Result<Dashboard, DashError> {
    let source = build_source(&config.source)?;
    Ok(Dashboard::new(source, TickerMap::gafa(), config.locale))
}

/// Splits a comma-separated list, trimming and lowercasing each name.
///
/// Every name must be a company of `tickers`.
pub fn parse_companies(
    raw: Option<&str>,
    tickers: &TickerMap,
) -> Result<Vec<String>, DashError> {
    let Some(list) = raw else {
        return Ok(DEFAULT_COMPANIES.iter().map(|s| s.to_string()).collect());
    };
    list.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .map(|name| {
            if tickers.contains(&name) {
                Ok(name)
            } else {
                Err(DashError::UnknownCompany { name })
            }
        })
        .collect()
}

/// Writes the table as CSV: a name column, then one column per date.
pub fn write_table_csv<W: Write>(table: &WideTable, writer: W) -> Result<(), DashError> {
    let to_io = |e: csv::Error| DashError::Io(std::io::Error::other(e));
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![COMPANY_COLUMN.to_string()];
    header.extend(table.dates().iter().map(|d| d.format("%Y-%m-%d").to_string()));
    wtr.write_record(&header).map_err(to_io)?;

    for row in table.rows() {
        let mut record = vec![row.company.clone()];
        record.extend(
            row.cells
                .iter()
                .map(|c| c.map(|v| format!("{:.2}", v)).unwrap_or_default()),
        );
        wtr.write_record(&record).map_err(to_io)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct ShowOutputs {
    pub vega: Option<PathBuf>,
    pub svg: Option<PathBuf>,
}

fn run_show(
    config_path: Option<&PathBuf>,
    period: &str,
    companies: Option<&str>,
    ymin: f64,
    ymax: f64,
    outputs: &ShowOutputs,
) -> Result<ExitCode, DashError> {
    let config = load_config(config_path)?;
    let dashboard = build_dashboard(&config)?;
    let selection = Selection::new(
        period.parse::<PeriodCode>()?,
        PriceRange::new(ymin, ymax)?,
        parse_companies(companies, dashboard.tickers())?,
    );
    show_selection(&dashboard, &selection, outputs, std::io::stdout().lock())
}

/// Runs one render pass and writes it to `out`.
///
/// Returns success when a chart was produced, [`EMPTY_SELECTION_EXIT`] for
/// the empty-selection message, and the cause's exit code on failure.
pub fn show_selection<W: Write>(
    dashboard: &Dashboard,
    selection: &Selection,
    outputs: &ShowOutputs,
    mut out: W,
) -> Result<ExitCode, DashError> {
    let output = dashboard.render(selection);
    let locale = dashboard.locale();
    writeln!(out, "# {}", output.header.caption)?;

    match &output.body {
        Body::Chart(panel) => {
            write_table_csv(&panel.table, &mut out)?;
            if let Some(path) = &outputs.vega {
                let doc = serde_json::to_string_pretty(&panel.chart.to_vega_lite())
                    .map_err(|e| DashError::Io(std::io::Error::other(e)))?;
                fs::write(path, doc)?;
                tracing::info!(path = %path.display(), "wrote Vega-Lite chart");
            }
            if let Some(path) = &outputs.svg {
                fs::write(path, generate_price_svg(&panel.chart))?;
                tracing::info!(path = %path.display(), "wrote SVG chart");
            }
            Ok(ExitCode::SUCCESS)
        }
        Body::Message(notice @ Notice::EmptySelection) => {
            writeln!(out, "{}", notice.text(locale))?;
            Ok(ExitCode::from(EMPTY_SELECTION_EXIT))
        }
        Body::Message(notice @ Notice::Failure { cause }) => {
            writeln!(out, "{}", notice.text(locale))?;
            eprintln!("error: {cause}");
            Ok(cause.into())
        }
    }
}

fn run_companies() -> ExitCode {
    for (name, symbol) in TickerMap::gafa().iter() {
        println!("{name}\t{symbol}");
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: Option<&PathBuf>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let dashboard = match build_dashboard(&config) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let state = AppState {
            dashboard: Arc::new(dashboard),
            static_dir: config.static_dir.clone(),
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: failed to start runtime: {e}");
                return ExitCode::from(1);
            }
        };

        let result = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(config.listen).await?;
            tracing::info!(addr = %config.listen, "dashboard listening");
            axum::serve(listener, router).await?;
            Ok::<(), std::io::Error>(())
        });

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                let err = DashError::Io(e);
                eprintln!("error: {err}");
                (&err).into()
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
