use crate::error::FetchError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::warn;

/// Number of hourly traffic buckets the server reports (`"0"` through `"6"`).
pub const HOURLY_BUCKETS: usize = 7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Online,
    #[default]
    Offline,
}

impl ConnectionState {
    pub fn is_online(self) -> bool {
        self == ConnectionState::Online
    }

    pub fn badge_label(self) -> &'static str {
        match self {
            ConnectionState::Online => "SYSTEM ONLINE",
            ConnectionState::Offline => "SYSTEM OFFLINE",
        }
    }

    pub(crate) const fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Online => 1,
            ConnectionState::Offline => 0,
        }
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Online,
            _ => ConnectionState::Offline,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    #[default]
    Dashboard,
    Monitor,
    Logs,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::Dashboard, ViewId::Monitor, ViewId::Logs];

    pub fn title(self) -> &'static str {
        match self {
            ViewId::Dashboard => "Dashboard",
            ViewId::Monitor => "Monitor",
            ViewId::Logs => "Data Logs",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            ViewId::Dashboard => 0,
            ViewId::Monitor => 1,
            ViewId::Logs => 2,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ViewId::Dashboard),
            1 => Some(ViewId::Monitor),
            2 => Some(ViewId::Logs),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            ViewId::Dashboard => ViewId::Monitor,
            ViewId::Monitor => ViewId::Logs,
            ViewId::Logs => ViewId::Dashboard,
        }
    }
}

/// Presentation bucket a table status falls into. Grid cards and table rows
/// share this mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Urgent,
    Pending,
    Resolved,
    Neutral,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    #[default]
    Idle,
    CustomerCalled,
    WaiterResponded,
    Unknown(String),
}

impl CallStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Idle" => CallStatus::Idle,
            "Customer_Called" => CallStatus::CustomerCalled,
            "Waiter_Responded" => CallStatus::WaiterResponded,
            other => CallStatus::Unknown(other.to_string()),
        }
    }

    /// Wire spelling of the status.
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Idle => "Idle",
            CallStatus::CustomerCalled => "Customer_Called",
            CallStatus::WaiterResponded => "Waiter_Responded",
            CallStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            CallStatus::CustomerCalled => StatusCategory::Urgent,
            CallStatus::WaiterResponded => StatusCategory::Pending,
            CallStatus::Idle => StatusCategory::Resolved,
            CallStatus::Unknown(_) => StatusCategory::Neutral,
        }
    }
}

/// Table identifier as the server sent it. Entries without an id keep a
/// `None` id and are never merged with each other.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TableId(Option<String>);

impl TableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    pub fn unknown() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_known(&self) -> bool {
        self.0.is_some()
    }

    pub fn label(&self) -> String {
        format!("T-{self}")
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or("-"))
    }
}

/// KPI fields keep the server's text so `12.5` or `2.0` display as sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_calls: Option<String>,
    pub open_calls: Option<String>,
    pub avg_response_minutes: Option<String>,
    pub avg_delivery_minutes: Option<String>,
    pub hourly_counts: BTreeMap<u8, f64>,
    pub open_count: Option<i64>,
    pub closed_count: Option<i64>,
}

impl AnalyticsSummary {
    /// Seven hourly points in bucket order; absent buckets read as zero.
    pub fn hourly_series(&self) -> [f64; HOURLY_BUCKETS] {
        let mut series = [0.0; HOURLY_BUCKETS];
        for (bucket, value) in &self.hourly_counts {
            if let Some(slot) = series.get_mut(usize::from(*bucket)) {
                *slot = *value;
            }
        }
        series
    }
}

impl AnalyticsSummary {
    fn from_wire(wire: WireAnalytics) -> Self {
        Self {
            total_calls: wire.total,
            open_calls: wire.open,
            avg_response_minutes: wire.avg_resp,
            avg_delivery_minutes: wire.avg_dlv,
            hourly_counts: wire.hourly,
            open_count: wire.open_count,
            closed_count: wire.closed_count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LiveStatusEntry {
    pub table_id: TableId,
    pub status: CallStatus,
    pub minutes_ago: u64,
}

impl LiveStatusEntry {
    pub fn new(table_id: TableId, status: CallStatus, minutes_ago: u64) -> Self {
        Self {
            table_id,
            status,
            minutes_ago,
        }
    }
}

impl LiveStatusEntry {
    fn from_wire(wire: WireStatusEntry) -> Self {
        Self::new(TableId(wire.table_id), wire.status, wire.minutes_ago)
    }
}

/// One complete fetch result. Known table ids are unique within a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    analytics: AnalyticsSummary,
    live_status: Vec<LiveStatusEntry>,
}

impl Snapshot {
    pub fn new(analytics: AnalyticsSummary, live_status: Vec<LiveStatusEntry>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(live_status.len());
        for entry in live_status {
            if !entry.table_id.is_known() || seen.insert(entry.table_id.clone()) {
                unique.push(entry);
            } else {
                warn!(
                    event = "snapshot_duplicate_table",
                    table_id = %entry.table_id
                );
            }
        }
        Self {
            analytics,
            live_status: unique,
        }
    }

    /// Builds a snapshot from a decoded `/data` body. Only the top-level
    /// shape is an error; every missing or mistyped field falls back to its
    /// default.
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        if !value.is_object() {
            return Err(FetchError::UnexpectedShape {
                found: value_kind(&value),
            });
        }
        let wire: WireSnapshot = serde_json::from_value(value)?;
        Ok(Self::new(
            AnalyticsSummary::from_wire(wire.analytics),
            wire.live_status
                .into_iter()
                .map(LiveStatusEntry::from_wire)
                .collect(),
        ))
    }

    pub fn analytics(&self) -> &AnalyticsSummary {
        &self.analytics
    }

    pub fn live_status(&self) -> &[LiveStatusEntry] {
        &self.live_status
    }
}

#[derive(Debug, Default, Deserialize)]
struct WireSnapshot {
    #[serde(default, deserialize_with = "deserialize_analytics")]
    analytics: WireAnalytics,
    #[serde(default, deserialize_with = "deserialize_entries")]
    live_status: Vec<WireStatusEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct WireAnalytics {
    #[serde(default, deserialize_with = "deserialize_text")]
    total: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    open: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    avg_resp: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    avg_dlv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_hourly")]
    hourly: BTreeMap<u8, f64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    open_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    closed_count: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct WireStatusEntry {
    #[serde(default, deserialize_with = "deserialize_id")]
    table_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_status")]
    status: CallStatus,
    #[serde(default, deserialize_with = "deserialize_minutes")]
    minutes_ago: u64,
}

fn deserialize_analytics<'de, D>(deserializer: D) -> Result<WireAnalytics, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(WireAnalytics::default()),
    }
}

/// Non-object items are skipped; the rest decode leniently.
fn deserialize_entries<'de, D>(deserializer: D) -> Result<Vec<WireStatusEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        if item.is_object() {
            entries.push(serde_json::from_value(item).map_err(serde::de::Error::custom)?);
        }
    }
    Ok(entries)
}

/// Deserialize an id that can be either a string or a number
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<CallStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => CallStatus::parse(&raw),
        Value::Null => CallStatus::Idle,
        other => CallStatus::Unknown(other.to_string()),
    })
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_as_i64(&Value::deserialize(deserializer)?))
}

fn deserialize_minutes<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_as_i64(&Value::deserialize(deserializer)?)
        .map(|value| value.max(0) as u64)
        .unwrap_or(0))
}

/// Only the exact keys `"0"` to `"6"` name a bucket.
fn deserialize_hourly<'de, D>(deserializer: D) -> Result<BTreeMap<u8, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .iter()
        .filter_map(|(key, value)| {
            let bucket = match key.as_bytes() {
                [digit @ b'0'..=b'6'] => digit - b'0',
                _ => return None,
            };
            Some((bucket, value_as_f64(value)?))
        })
        .collect())
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0 && value.is_finite())
                .map(|value| value as i64)
        }),
        Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<i64>().ok().or_else(|| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|value| value.fract() == 0.0 && value.is_finite())
                    .map(|value| value as i64)
            })
        }
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analytics(value: Value) -> AnalyticsSummary {
        Snapshot::from_value(json!({ "analytics": value }))
            .expect("object payload")
            .analytics()
            .clone()
    }

    #[test]
    fn empty_analytics_resolves_to_defaults() {
        let snapshot = Snapshot::from_value(json!({
            "analytics": {},
            "live_status": [{"table_id": 4, "status": "Customer_Called", "minutes_ago": 2}]
        }))
        .expect("object payload");

        assert_eq!(snapshot.analytics(), &AnalyticsSummary::default());
        assert_eq!(snapshot.analytics().hourly_series(), [0.0; HOURLY_BUCKETS]);
        let entry = &snapshot.live_status()[0];
        assert_eq!(entry.table_id.label(), "T-4");
        assert_eq!(entry.status, CallStatus::CustomerCalled);
        assert_eq!(entry.minutes_ago, 2);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = Snapshot::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedShape { found: "array" }));
        let err = Snapshot::from_value(Value::Null).unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedShape { found: "null" }));
    }

    #[test]
    fn mistyped_sections_fall_back_to_defaults() {
        let snapshot = Snapshot::from_value(json!({
            "analytics": [1, 2],
            "live_status": {"table_id": 1}
        }))
        .expect("object payload");
        assert_eq!(snapshot.analytics(), &AnalyticsSummary::default());
        assert!(snapshot.live_status().is_empty());
    }

    #[test]
    fn hourly_buckets_match_exact_keys_only() {
        let summary = analytics(json!({
            "hourly": {"0": 5, "3": "7", "6": 2.5, "7": 99, "x": 1, "2": "n/a",
                       "03": 40, "+4": 41, " 5": 42}
        }));
        assert_eq!(summary.hourly_series(), [5.0, 0.0, 0.0, 7.0, 0.0, 0.0, 2.5]);
    }

    #[test]
    fn kpi_fields_keep_the_server_text() {
        let summary = analytics(json!({
            "total": 12.5,
            "open": "3a",
            "avg_resp": 2.0,
            "avg_dlv": null
        }));
        assert_eq!(summary.total_calls.as_deref(), Some("12.5"));
        assert_eq!(summary.open_calls.as_deref(), Some("3a"));
        assert_eq!(summary.avg_response_minutes.as_deref(), Some("2.0"));
        assert_eq!(summary.avg_delivery_minutes, None);
    }

    #[test]
    fn lenient_occupancy_counts() {
        let summary = analytics(json!({
            "open_count": 2.5,
            "closed_count": "-1"
        }));
        assert_eq!(summary.open_count, None);
        assert_eq!(summary.closed_count, Some(-1));
        assert_eq!(analytics(json!({"open_count": "4"})).open_count, Some(4));
    }

    #[test]
    fn live_status_entry_defaults() {
        let snapshot = Snapshot::from_value(json!({
            "live_status": [
                {"table_id": "A1"},
                {"table_id": 7, "status": "Dancing", "minutes_ago": -4},
                {"status": "Idle", "minutes_ago": "x"},
                "not-an-entry"
            ]
        }))
        .expect("object payload");

        let entries = snapshot.live_status();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].status, CallStatus::Idle);
        assert_eq!(entries[0].minutes_ago, 0);
        assert_eq!(entries[1].status, CallStatus::Unknown("Dancing".to_string()));
        assert_eq!(entries[1].minutes_ago, 0);
        assert_eq!(entries[2].table_id.label(), "T--");
    }

    #[test]
    fn duplicate_table_ids_keep_first_entry() {
        let snapshot = Snapshot::from_value(json!({
            "live_status": [
                {"table_id": 1, "status": "Idle"},
                {"table_id": "1", "status": "Customer_Called"},
                {"table_id": 2, "status": "Waiter_Responded"}
            ]
        }))
        .expect("object payload");
        let ids: Vec<_> = snapshot
            .live_status()
            .iter()
            .map(|entry| entry.table_id.as_str())
            .collect();
        assert_eq!(ids, vec![Some("1"), Some("2")]);
        assert_eq!(snapshot.live_status()[0].status, CallStatus::Idle);
    }

    #[test]
    fn entries_without_ids_are_all_kept() {
        let snapshot = Snapshot::from_value(json!({
            "live_status": [
                {"status": "Customer_Called", "minutes_ago": 1},
                {"table_id": null, "status": "Waiter_Responded", "minutes_ago": 4},
                {"table_id": [1], "status": "Idle"},
                {"table_id": 5, "status": "Idle"}
            ]
        }))
        .expect("object payload");
        let entries = snapshot.live_status();
        assert_eq!(entries.len(), 4);
        let statuses: Vec<_> = entries.iter().map(|entry| entry.status.clone()).collect();
        assert_eq!(
            statuses,
            vec![
                CallStatus::CustomerCalled,
                CallStatus::WaiterResponded,
                CallStatus::Idle,
                CallStatus::Idle
            ]
        );
        assert!(entries[..3].iter().all(|entry| entry.table_id.label() == "T--"));
        assert_eq!(entries[3].table_id, TableId::new("5"));
    }

    #[test]
    fn status_taxonomy() {
        assert_eq!(CallStatus::parse("Customer_Called").category(), StatusCategory::Urgent);
        assert_eq!(CallStatus::parse("Waiter_Responded").category(), StatusCategory::Pending);
        assert_eq!(CallStatus::parse("Idle").category(), StatusCategory::Resolved);
        assert_eq!(CallStatus::parse("idle").category(), StatusCategory::Neutral);
        assert_eq!(CallStatus::parse("Waiter_Responded").label(), "Waiter Responded");
    }

    #[test]
    fn view_index_round_trip_and_cycle() {
        for view in ViewId::ALL {
            assert_eq!(ViewId::from_index(view.index()), Some(view));
        }
        assert_eq!(ViewId::from_index(3), None);
        assert_eq!(ViewId::Logs.next(), ViewId::Dashboard);
    }
}
