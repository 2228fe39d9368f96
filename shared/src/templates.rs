use askama::Template;

/// One `<option>` of a dashboard dropdown
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>, selected: bool) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected,
        }
    }
}

/// The single dashboard page: three dropdowns, the range slider checkbox and
/// the chart area. The page script re-requests the figure on every change.
#[derive(Template)]
#[template(path = "dashboard.html.jinja", escape = "html")]
pub struct DashboardPage {
    pub quote_currency: String,
    pub intervals: Vec<SelectOption>,
    pub cryptos: Vec<SelectOption>,
    pub day_ranges: Vec<SelectOption>,
    pub show_range_slider: bool,
    pub figure_endpoint: String,
}

impl DashboardPage {
    pub fn title(&self) -> String {
        format!("Crypto vs {}", self.quote_currency)
    }
}
