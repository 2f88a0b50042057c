//! User-facing text.

use std::str::FromStr;

use crate::domain::error::DashError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ja,
}

pub struct Texts {
    pub title: &'static str,
    pub sidebar_heading: &'static str,
    pub sidebar_intro: &'static str,
    pub period_heading: &'static str,
    pub period_label: &'static str,
    pub range_heading: &'static str,
    pub range_label: &'static str,
    pub companies_label: &'static str,
    pub table_heading: &'static str,
    pub submit: &'static str,
    pub empty_selection: &'static str,
    pub failure: &'static str,
    pub error_heading: &'static str,
    pub not_found: &'static str,
    pub bad_request: &'static str,
    pub back_link: &'static str,
}

const EN: Texts = Texts {
    title: "Stock Price Visualizer",
    sidebar_heading: "GAFA stock prices",
    sidebar_intro: "A stock price visualization tool. Choose how many days to show from the options below.",
    period_heading: "Days to show",
    period_label: "Days",
    range_heading: "Price range",
    range_label: "Set the range",
    companies_label: "Select companies.",
    table_heading: "Stock prices (USD)",
    submit: "Update",
    empty_selection: "Select at least one company.",
    failure: "An error has occurred.",
    error_heading: "Error",
    not_found: "Page not found",
    bad_request: "Invalid request parameter",
    back_link: "Back to the dashboard",
};

const JA: Texts = Texts {
    title: "株価可視化アプリ",
    sidebar_heading: "GAFA株価",
    sidebar_intro: "こちらは株価可視化ツールです。以下のオプションから表示日数を指定してください。",
    period_heading: "表示日数選択",
    period_label: "日数",
    range_heading: "株価の指定範囲",
    range_label: "範囲を指定してください",
    companies_label: "会社名を選択してください.",
    table_heading: "株価 (USD)",
    submit: "更新",
    empty_selection: "少なくとも一社は選んでください.",
    failure: "エラーが発生しています.",
    error_heading: "エラー",
    not_found: "ページが見つかりません",
    bad_request: "リクエストのパラメータが不正です",
    back_link: "ダッシュボードに戻る",
};

impl Locale {
    pub fn texts(self) -> &'static Texts {
        match self {
            Locale::En => &EN,
            Locale::Ja => &JA,
        }
    }

    /// Heading for the active lookback window.
    pub fn period_caption(self, days: u32) -> String {
        match self {
            Locale::En => format!("GAFA stock prices over the past {days} days"),
            Locale::Ja => format!("過去 {days}日間 のGAFA株価"),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }
}

impl FromStr for Locale {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            other => Err(DashError::ConfigInvalid {
                section: "ui".into(),
                key: "locale".into(),
                reason: format!("unsupported locale '{other}'"),
            }),
        }
    }
}
