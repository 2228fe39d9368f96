//! Dashboard selection: the option tables behind each control and the
//! complete UI state built from them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{DashboardError, Result};

/// Bar interval offered by the interval dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::TwelveHours,
        Self::OneDay,
    ];

    /// Kline interval code understood by the exchange
    pub fn code(&self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::TwelveHours => "12h",
            Self::OneDay => "1d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15 Minutes",
            Self::ThirtyMinutes => "30 Minutes",
            Self::OneHour => "1 Hour",
            Self::FourHours => "4 Hours",
            Self::TwelveHours => "12 Hours",
            Self::OneDay => "24 Hours",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::FifteenMinutes => Duration::minutes(15),
            Self::ThirtyMinutes => Duration::minutes(30),
            Self::OneHour => Duration::hours(1),
            Self::FourHours => Duration::hours(4),
            Self::TwelveHours => Duration::hours(12),
            Self::OneDay => Duration::days(1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Interval {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.code().eq_ignore_ascii_case(needle) || i.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DashboardError::InvalidSelection(format!("unknown interval: {}", s)))
    }
}

/// A cryptocurrency offered by the symbol dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CryptoAsset {
    pub ticker: &'static str,
    pub label: &'static str,
}

/// Every asset the dashboard can chart.
pub const CRYPTO_CATALOG: [CryptoAsset; 12] = [
    CryptoAsset { ticker: "BTC", label: "Bitcoin" },
    CryptoAsset { ticker: "ETH", label: "Ethereum" },
    CryptoAsset { ticker: "XRP", label: "Ripple" },
    CryptoAsset { ticker: "DOGE", label: "Dogecoin" },
    CryptoAsset { ticker: "SHIB", label: "Shiba Inu" },
    CryptoAsset { ticker: "UNI", label: "Uniswap" },
    CryptoAsset { ticker: "TRX", label: "Tron" },
    CryptoAsset { ticker: "LINK", label: "Chainlink" },
    CryptoAsset { ticker: "SOL", label: "Solana" },
    CryptoAsset { ticker: "BEAM", label: "Beam" },
    CryptoAsset { ticker: "MANA", label: "Decentraland" },
    CryptoAsset { ticker: "ADA", label: "Cardano" },
];

impl CryptoAsset {
    pub fn from_ticker(ticker: &str) -> Option<Self> {
        let ticker = ticker.trim();
        CRYPTO_CATALOG
            .into_iter()
            .find(|a| a.ticker.eq_ignore_ascii_case(ticker))
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        CRYPTO_CATALOG
            .into_iter()
            .find(|a| a.label.eq_ignore_ascii_case(label))
    }

    /// Accepts either the ticker ("BTC") or the display label ("Bitcoin").
    pub fn lookup(value: &str) -> Result<Self> {
        Self::from_ticker(value)
            .or_else(|| Self::from_label(value))
            .ok_or_else(|| DashboardError::InvalidSelection(format!("unknown crypto symbol: {}", value)))
    }
}

/// Check the asset table once at startup.
pub fn validate_catalog() -> Result<()> {
    check_catalog(&CRYPTO_CATALOG)
}

pub(crate) fn check_catalog(catalog: &[CryptoAsset]) -> Result<()> {
    if catalog.is_empty() {
        return Err(DashboardError::Catalog("no assets defined".to_string()));
    }

    let mut tickers = HashSet::new();
    let mut labels = HashSet::new();
    for asset in catalog {
        let well_formed = !asset.ticker.is_empty()
            && asset
                .ticker
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !well_formed {
            return Err(DashboardError::Catalog(format!(
                "malformed ticker {:?}",
                asset.ticker
            )));
        }
        if asset.label.trim().is_empty() {
            return Err(DashboardError::Catalog(format!(
                "ticker {} has an empty label",
                asset.ticker
            )));
        }
        if !tickers.insert(asset.ticker) {
            return Err(DashboardError::Catalog(format!("duplicate ticker {}", asset.ticker)));
        }
        if !labels.insert(asset.label.to_ascii_lowercase()) {
            return Err(DashboardError::Catalog(format!("duplicate label {}", asset.label)));
        }
    }
    Ok(())
}

/// Trailing lookback in whole days, 1 to 365 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayRange(u16);

impl DayRange {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 365;

    pub fn new(days: u16) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&days) {
            Ok(Self(days))
        } else {
            Err(DashboardError::InvalidSelection(format!(
                "day range must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                days
            )))
        }
    }

    pub fn days(&self) -> u16 {
        self.0
    }

    pub fn label(&self) -> String {
        if self.0 == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", self.0)
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::days(i64::from(self.0))
    }

    /// Every selectable range, shortest first.
    pub fn all() -> impl Iterator<Item = DayRange> {
        (Self::MIN..=Self::MAX).map(DayRange)
    }
}

impl Default for DayRange {
    fn default() -> Self {
        Self(2)
    }
}

impl FromStr for DayRange {
    type Err = DashboardError;

    /// Accepts "30" as well as the dropdown labels "30 days" / "1 day".
    fn from_str(s: &str) -> Result<Self> {
        let number = s
            .trim()
            .trim_end_matches("days")
            .trim_end_matches("day")
            .trim();
        let days: u16 = number
            .parse()
            .map_err(|_| DashboardError::InvalidSelection(format!("unknown day range: {}", s)))?;
        Self::new(days)
    }
}

/// The complete state of the dashboard controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub interval: Interval,
    pub asset: CryptoAsset,
    pub day_range: DayRange,
    pub show_range_slider: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            interval: Interval::OneHour,
            asset: CRYPTO_CATALOG[0],
            day_range: DayRange::default(),
            show_range_slider: true,
        }
    }
}

/// Raw control values as the page submits them. Missing fields fall back to
/// the dashboard defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionQuery {
    pub interval: Option<String>,
    pub symbol: Option<String>,
    pub days: Option<String>,
    pub rangeslider: Option<String>,
}

impl TryFrom<SelectionQuery> for Selection {
    type Error = DashboardError;

    fn try_from(query: SelectionQuery) -> Result<Self> {
        let defaults = Selection::default();
        Ok(Self {
            interval: match query.interval.as_deref() {
                Some(s) => s.parse()?,
                None => defaults.interval,
            },
            asset: match query.symbol.as_deref() {
                Some(s) => CryptoAsset::lookup(s)?,
                None => defaults.asset,
            },
            day_range: match query.days.as_deref() {
                Some(s) => s.parse()?,
                None => defaults.day_range,
            },
            show_range_slider: match query.rangeslider.as_deref() {
                Some(s) => parse_toggle(s)?,
                None => defaults.show_range_slider,
            },
        })
    }
}

/// Checkbox state as a query value: "true"/"false", "on"/"off" or "1"/"0".
fn parse_toggle(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(DashboardError::InvalidSelection(format!(
            "range slider toggle must be true or false, got {}",
            value
        ))),
    }
}
