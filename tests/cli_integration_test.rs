//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading from INI files on disk
//! - Company list parsing
//! - Table CSV output
//! - One `show` render pass against a CSV data directory

mod common;

use common::*;
use pricedash::cli::{self, ShowOutputs};
use pricedash::domain::config::{DashboardConfig, DataSource};
use pricedash::domain::dashboard::Dashboard;
use pricedash::domain::error::DashError;
use pricedash::domain::locale::Locale;
use pricedash::domain::period::PeriodCode;
use pricedash::domain::selection::{PriceRange, Selection};
use pricedash::domain::table::WideTable;
use pricedash::domain::ticker::TickerMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Writes one Yahoo-style history CSV per ticker, five days each.
fn write_csv_dir(dir: &Path) {
    for (i, (_, symbol)) in TickerMap::gafa().iter().enumerate() {
        let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
        for day in 0..5 {
            let close = 100.0 * (i + 1) as f64 + day as f64;
            content.push_str(&format!(
                "2024-03-{:02},{close},{close},{close},{close},{close},1000\n",
                4 + day
            ));
        }
        fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
    }
}

fn csv_ini(dir: &Path) -> String {
    format!("[data]\nsource = csv\ncsv_dir = {}\n", dir.display())
}

mod config_loading {
    use super::*;

    #[test]
    fn no_path_uses_defaults() {
        let config = cli::load_config(None).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn reads_all_sections() {
        let ini = write_temp_ini(
            "[web]\nlisten = 0.0.0.0:8080\nstatic_dir = assets\n\n\
             [data]\nsource = csv\ncsv_dir = prices\n\n\
             [ui]\nlocale = ja\n",
        );
        let config = cli::load_config(Some(&ini.path().to_path_buf())).unwrap();

        assert_eq!(config.listen.port(), 8080);
        assert_eq!(config.static_dir, PathBuf::from("assets"));
        assert_eq!(
            config.source,
            DataSource::Csv {
                dir: PathBuf::from("prices")
            }
        );
        assert_eq!(config.locale, Locale::Ja);
    }

    #[test]
    fn missing_file_is_parse_error() {
        let path = PathBuf::from("/nonexistent/pricedash.ini");
        let err = cli::load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, DashError::ConfigParse { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }

    #[test]
    fn unknown_source_is_invalid() {
        let ini = write_temp_ini("[data]\nsource = bloomberg\n");
        let err = cli::load_config(Some(&ini.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, DashError::ConfigInvalid { ref key, .. } if key == "source"));
    }

    #[test]
    fn builds_dashboard_for_each_source() {
        let dir = tempfile::tempdir().unwrap();
        let ini = write_temp_ini(&csv_ini(dir.path()));
        let config = cli::load_config(Some(&ini.path().to_path_buf())).unwrap();
        let dashboard = cli::build_dashboard(&config).unwrap();
        assert_eq!(dashboard.tickers().len(), 6);

        assert!(cli::build_dashboard(&DashboardConfig::default()).is_ok());
    }
}

mod company_parsing {
    use super::*;

    #[test]
    fn splits_trims_and_lowercases() {
        let companies = cli::parse_companies(Some(" Apple, netflix ,,GOOGLE"), &TickerMap::gafa());
        assert_eq!(companies.unwrap(), vec!["apple", "netflix", "google"]);
    }

    #[test]
    fn missing_list_uses_defaults() {
        assert_eq!(
            cli::parse_companies(None, &TickerMap::gafa()).unwrap(),
            vec!["google", "amazon", "facebook", "apple"]
        );
    }

    #[test]
    fn blank_list_is_empty() {
        let companies = cli::parse_companies(Some(" , "), &TickerMap::gafa()).unwrap();
        assert!(companies.is_empty());
    }

    #[test]
    fn unknown_company_is_rejected() {
        let err = cli::parse_companies(Some("apple,tesla"), &TickerMap::gafa()).unwrap_err();
        assert!(matches!(err, DashError::UnknownCompany { ref name } if name == "tesla"));
        assert_eq!(ExitCode::from(&err), ExitCode::from(4));
    }
}

mod table_output {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let table = WideTable::from_series(vec![
            (
                "apple".to_string(),
                vec![(date(2024, 3, 4), 170.5), (date(2024, 3, 5), 171.25)],
            ),
            ("google".to_string(), vec![(date(2024, 3, 5), 140.0)]),
        ])
        .unwrap();

        let mut out = Vec::new();
        cli::write_table_csv(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Name,2024-03-04,2024-03-05");
        assert_eq!(lines[1], "apple,170.50,171.25");
        assert_eq!(lines[2], "google,,140.00");
    }
}

mod show_pass {
    use super::*;

    fn csv_dashboard(dir: &Path) -> Dashboard {
        let ini = write_temp_ini(&csv_ini(dir));
        let config = cli::load_config(Some(&ini.path().to_path_buf())).unwrap();
        cli::build_dashboard(&config).unwrap()
    }

    #[test]
    fn default_selection_prints_sorted_table() {
        let dir = tempfile::tempdir().unwrap();
        write_csv_dir(dir.path());
        let dashboard = csv_dashboard(dir.path());

        let mut out = Vec::new();
        let selection = Selection::default();
        let code = cli::show_selection(&dashboard, &selection, &ShowOutputs::default(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(lines[0], "# GAFA stock prices over the past 5 days");
        assert!(lines[1].starts_with("Name,2024-03-04"));
        let names: Vec<&str> = lines[2..]
            .iter()
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(names, vec!["amazon", "apple", "facebook", "google"]);
    }

    #[test]
    fn writes_requested_chart_files() {
        let dir = tempfile::tempdir().unwrap();
        write_csv_dir(dir.path());
        let dashboard = csv_dashboard(dir.path());
        let vega = dir.path().join("chart.json");
        let svg = dir.path().join("chart.svg");
        let outputs = ShowOutputs {
            vega: Some(vega.clone()),
            svg: Some(svg.clone()),
        };
        let selection = Selection::new(
            PeriodCode::FiveDays,
            PriceRange::new(100.0, 700.0).unwrap(),
            ["netflix", "apple"],
        );

        let code = cli::show_selection(&dashboard, &selection, &outputs, Vec::new()).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&vega).unwrap()).unwrap();
        assert_eq!(doc["encoding"]["y"]["scale"]["domain"][1].as_f64(), Some(700.0));
        assert_eq!(doc["data"]["values"].as_array().unwrap().len(), 10);
        assert!(fs::read_to_string(&svg).unwrap().starts_with("<svg"));
    }

    #[test]
    fn empty_selection_prints_message() {
        let dashboard = Dashboard::new(Arc::new(gafa_market()), TickerMap::gafa(), Locale::En);
        let selection =
            Selection::new(PeriodCode::OneMonth, PriceRange::default(), Vec::<String>::new());

        let mut out = Vec::new();
        let code = cli::show_selection(&dashboard, &selection, &ShowOutputs::default(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, ExitCode::from(cli::EMPTY_SELECTION_EXIT));
        assert_ne!(code, ExitCode::from(&DashError::Io(std::io::Error::other("disk"))));
        assert!(text.contains("past 30 days"));
        assert!(text.contains("Select at least one company."));
    }

    #[test]
    fn missing_ticker_file_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_csv_dir(dir.path());
        fs::remove_file(dir.path().join("NFLX.csv")).unwrap();
        let dashboard = csv_dashboard(dir.path());

        let mut out = Vec::new();
        let selection = Selection::default();
        let code = cli::show_selection(&dashboard, &selection, &ShowOutputs::default(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, ExitCode::from(3));
        assert!(text.contains("An error has occurred."));
        assert!(!text.contains("Name,"));
    }
}
