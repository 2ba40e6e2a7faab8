use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which answer a question was routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Greeting,
    Costs,
    Savings,
    BreakEven,
    Employees,
    Recommendation,
    Risks,
    KeyNumbers,
    Headcount,
    Payback,
    ShippingChange,
    Maintenance,
    SavingsChart,
    Assumptions,
    ShipmentVolume,
    StoreImpact,
    LongTerm,
    Phased,
    Help,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown topic `{0}`")]
pub struct UnknownTopic(pub String);

impl Topic {
    pub const ALL: [Topic; 19] = [
        Self::Greeting,
        Self::Costs,
        Self::Savings,
        Self::BreakEven,
        Self::Employees,
        Self::Recommendation,
        Self::Risks,
        Self::KeyNumbers,
        Self::Headcount,
        Self::Payback,
        Self::ShippingChange,
        Self::Maintenance,
        Self::SavingsChart,
        Self::Assumptions,
        Self::ShipmentVolume,
        Self::StoreImpact,
        Self::LongTerm,
        Self::Phased,
        Self::Help,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Costs => "costs",
            Self::Savings => "savings",
            Self::BreakEven => "break_even",
            Self::Employees => "employees",
            Self::Recommendation => "recommendation",
            Self::Risks => "risks",
            Self::KeyNumbers => "key_numbers",
            Self::Headcount => "headcount",
            Self::Payback => "payback",
            Self::ShippingChange => "shipping_change",
            Self::Maintenance => "maintenance",
            Self::SavingsChart => "savings_chart",
            Self::Assumptions => "assumptions",
            Self::ShipmentVolume => "shipment_volume",
            Self::StoreImpact => "store_impact",
            Self::LongTerm => "long_term",
            Self::Phased => "phased",
            Self::Help => "help",
        }
    }
}

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == wanted)
            .ok_or_else(|| UnknownTopic(value.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub metric: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableData {
    pub fn metrics(rows: Vec<TableRow>) -> Self {
        Self { columns: vec!["Metric".to_string(), "Value".to_string()], rows }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: u32,
    pub y: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

/// Vertical line drawn across the chart at `x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMarker {
    pub x: Decimal,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
    pub marker: Option<ChartMarker>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    Table(TableData),
    Chart(ChartData),
}

/// One answer: markdown text plus an optional table or chart for the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub topic: Topic,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl ResponsePayload {
    pub fn text(topic: Topic, text: impl Into<String>) -> Self {
        Self { topic, text: text.into(), attachment: None }
    }

    pub fn with_table(mut self, table: TableData) -> Self {
        self.attachment = Some(Attachment::Table(table));
        self
    }

    pub fn with_chart(mut self, chart: ChartData) -> Self {
        self.attachment = Some(Attachment::Chart(chart));
        self
    }

    pub fn table(&self) -> Option<&TableData> {
        match &self.attachment {
            Some(Attachment::Table(table)) => Some(table),
            _ => None,
        }
    }

    pub fn chart(&self) -> Option<&ChartData> {
        match &self.attachment {
            Some(Attachment::Chart(chart)) => Some(chart),
            _ => None,
        }
    }
}
