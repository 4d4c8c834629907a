//! Shared typed models: rows read from the relational store, and the flat
//! records written to each dump stream.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stream kinds
// ---------------------------------------------------------------------------

/// Logical dump stream, one per exported record kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpKind {
    Events,
    Links,
    Measures,
    Metrics,
    Settings,
    NewCodePeriods,
}

impl DumpKind {
    pub const ALL: [DumpKind; 6] = [
        DumpKind::Events,
        DumpKind::Links,
        DumpKind::Measures,
        DumpKind::Metrics,
        DumpKind::Settings,
        DumpKind::NewCodePeriods,
    ];

    /// Stream name, also used as the on-disk file stem.
    pub fn stream_name(self) -> &'static str {
        match self {
            DumpKind::Events => "events",
            DumpKind::Links => "links",
            DumpKind::Measures => "measures",
            DumpKind::Metrics => "metrics",
            DumpKind::Settings => "settings",
            DumpKind::NewCodePeriods => "new_code_periods",
        }
    }

    /// Label used at the start of a step failure message.
    pub fn label(self) -> &'static str {
        match self {
            DumpKind::Events => "Event",
            DumpKind::Links => "Link",
            DumpKind::Measures => "Measure",
            DumpKind::Metrics => "Metric",
            DumpKind::Settings => "Setting",
            DumpKind::NewCodePeriods => "New Code Periods",
        }
    }

    /// Human-readable plural used in summaries and failure messages.
    pub fn plural(self) -> &'static str {
        match self {
            DumpKind::Events => "events",
            DumpKind::Links => "links",
            DumpKind::Measures => "measures",
            DumpKind::Metrics => "metrics",
            DumpKind::Settings => "settings",
            DumpKind::NewCodePeriods => "new code periods",
        }
    }
}

impl fmt::Display for DumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stream_name())
    }
}

// ---------------------------------------------------------------------------
// Store rows
// ---------------------------------------------------------------------------

/// Analysis status as stored in `snapshots.status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisStatus {
    Processed,
    Unprocessed,
}

impl AnalysisStatus {
    pub fn from_code(code: &str) -> Self {
        if code == "P" {
            AnalysisStatus::Processed
        } else {
            AnalysisStatus::Unprocessed
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            AnalysisStatus::Processed => "P",
            AnalysisStatus::Unprocessed => "U",
        }
    }
}

/// A component row (project root, branch root, directory or file).
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentRow {
    pub uuid: String,
    pub key: String,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventRow {
    pub uuid: String,
    pub analysis_uuid: String,
    pub component_uuid: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub data: Option<String>,
    pub event_date: i64,
    pub created_at: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkRow {
    pub uuid: String,
    pub project_uuid: String,
    pub link_type: String,
    pub name: Option<String>,
    pub href: String,
}

/// A measure joined with its metric and owning analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureRow {
    pub analysis_uuid: String,
    pub analysis_status: AnalysisStatus,
    pub component_uuid: String,
    pub metric_uuid: String,
    pub metric_key: String,
    pub metric_enabled: bool,
    pub value: Option<f64>,
    pub text_value: Option<String>,
    pub alert_status: Option<String>,
    pub alert_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricRow {
    pub uuid: String,
    pub key: String,
    pub short_name: String,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRow {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCodePeriodRow {
    pub uuid: String,
    pub project_uuid: String,
    pub branch_uuid: Option<String>,
    pub period_type: String,
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Dump records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub uuid: String,
    pub analysis_uuid: String,
    pub component_ref: u32,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub date: i64,
    pub created_at: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub uuid: String,
    pub project_uuid: String,
    pub name: String,
    pub href: String,
    #[serde(rename = "type")]
    pub link_type: String,
}

/// Exactly one of `value` / `variation` is set for a measure with a stored
/// numeric value, and neither when the stored value is null.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasureRecord {
    pub analysis_uuid: String,
    pub component_ref: u32,
    pub metric_ref: u32,
    pub text_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<f64>,
    pub alert_status: String,
    pub alert_text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "ref")]
    pub metric_ref: u32,
    pub key: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettingRecord {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCodePeriodRecord {
    pub uuid: String,
    pub project_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_uuid: Option<String>,
    #[serde(rename = "type")]
    pub period_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One record addressed to the stream matching its variant.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DumpRecord {
    Event(EventRecord),
    Link(LinkRecord),
    Measure(MeasureRecord),
    Metric(MetricRecord),
    Setting(SettingRecord),
    NewCodePeriod(NewCodePeriodRecord),
}

impl DumpRecord {
    pub fn kind(&self) -> DumpKind {
        match self {
            DumpRecord::Event(_) => DumpKind::Events,
            DumpRecord::Link(_) => DumpKind::Links,
            DumpRecord::Measure(_) => DumpKind::Measures,
            DumpRecord::Metric(_) => DumpKind::Metrics,
            DumpRecord::Setting(_) => DumpKind::Settings,
            DumpRecord::NewCodePeriod(_) => DumpKind::NewCodePeriods,
        }
    }
}

macro_rules! impl_into_dump_record {
    ($($record:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$record> for DumpRecord {
                fn from(record: $record) -> Self {
                    DumpRecord::$variant(record)
                }
            }
        )*
    };
}

impl_into_dump_record!(
    EventRecord => Event,
    LinkRecord => Link,
    MeasureRecord => Measure,
    MetricRecord => Metric,
    SettingRecord => Setting,
    NewCodePeriodRecord => NewCodePeriod,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kind_matches_stream() {
        let record: DumpRecord = SettingRecord {
            key: "sonar.exclusions".into(),
            value: String::new(),
        }
        .into();
        assert_eq!(record.kind(), DumpKind::Settings);
        assert_eq!(record.kind().stream_name(), "settings");
    }

    #[test]
    fn absent_numeric_fields_are_not_serialized() {
        let record = MeasureRecord {
            analysis_uuid: "A1".into(),
            component_ref: 0,
            metric_ref: 2,
            text_value: String::new(),
            value: None,
            variation: Some(12.5),
            alert_status: String::new(),
            alert_text: String::new(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("value").is_none());
        assert_eq!(json["variation"], serde_json::json!(12.5));
    }

    #[test]
    fn unknown_status_code_is_unprocessed() {
        assert_eq!(AnalysisStatus::from_code("P"), AnalysisStatus::Processed);
        assert_eq!(AnalysisStatus::from_code("U"), AnalysisStatus::Unprocessed);
        assert_eq!(AnalysisStatus::from_code(""), AnalysisStatus::Unprocessed);
    }
}
