use crate::model::{
    AnalyticsSummary, LiveStatusEntry, Snapshot, StatusCategory, ViewId, HOURLY_BUCKETS,
};
use serde::Serialize;
use tracing::debug;

pub const TRAFFIC_Y_FLOOR: f64 = 100.0;
const TRAFFIC_Y_STEP: f64 = 20.0;
const PLACEHOLDER: &str = "...";
const MISSING: &str = "-";
const DEFAULT_MINUTES: &str = "0";
const AVAILABILITY: &str = "Yes";
const ORDERS: &str = "0";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KpiValues {
    pub total_calls: String,
    pub active_needs: String,
    pub avg_response: String,
    pub avg_delivery: String,
}

impl Default for KpiValues {
    fn default() -> Self {
        Self {
            total_calls: PLACEHOLDER.to_string(),
            active_needs: PLACEHOLDER.to_string(),
            avg_response: PLACEHOLDER.to_string(),
            avg_delivery: PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrafficSeries {
    pub points: [f64; HOURLY_BUCKETS],
    pub y_max: f64,
}

impl Default for TrafficSeries {
    fn default() -> Self {
        Self {
            points: [0.0; HOURLY_BUCKETS],
            y_max: TRAFFIC_Y_FLOOR,
        }
    }
}

/// Open/closed split for the occupancy chart. Never both zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub open: u64,
    pub closed: u64,
}

impl Default for Occupancy {
    fn default() -> Self {
        Self { open: 1, closed: 0 }
    }
}

impl Occupancy {
    pub fn open_ratio(self) -> f64 {
        let total = self.open + self.closed;
        if total == 0 {
            return 1.0;
        }
        self.open as f64 / total as f64
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableCard {
    pub table: String,
    pub status: String,
    pub category: StatusCategory,
    pub minutes_ago: String,
    pub compact: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub table: String,
    pub status: String,
    pub category: StatusCategory,
    pub availability: String,
    pub orders: String,
    pub orders_highlight: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardModel {
    pub kpis: KpiValues,
    pub traffic: TrafficSeries,
    pub occupancy: Occupancy,
    pub floor_grid: Vec<TableCard>,
    pub status_table: Vec<TableRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MonitorModel {
    pub grid: Vec<TableCard>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LogsModel {
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderModels {
    pub dashboard: DashboardModel,
    pub monitor: MonitorModel,
    pub logs: LogsModel,
}

/// Monitor and logs models are only rebuilt while their view is active.
#[derive(Debug, Default)]
pub struct ViewReconciler {
    models: RenderModels,
    latest: Option<Snapshot>,
}

impl ViewReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn models(&self) -> &RenderModels {
        &self.models
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn reconcile(&mut self, snapshot: Snapshot, active_view: ViewId) -> &RenderModels {
        self.models.dashboard = dashboard_model(&snapshot);
        match active_view {
            ViewId::Dashboard => {}
            ViewId::Monitor => self.models.monitor = monitor_model(&snapshot),
            ViewId::Logs => self.models.logs = logs_model(&snapshot),
        }
        debug!(
            event = "reconcile",
            view = active_view.title(),
            tables = snapshot.live_status().len()
        );
        self.latest = Some(snapshot);
        &self.models
    }

    /// Rebuilds `view` from the cached snapshot. Returns false when nothing
    /// has been fetched yet.
    pub fn activate(&mut self, view: ViewId) -> bool {
        let Some(snapshot) = self.latest.as_ref() else {
            return false;
        };
        match view {
            ViewId::Dashboard => self.models.dashboard = dashboard_model(snapshot),
            ViewId::Monitor => self.models.monitor = monitor_model(snapshot),
            ViewId::Logs => self.models.logs = logs_model(snapshot),
        }
        true
    }
}

pub fn dashboard_model(snapshot: &Snapshot) -> DashboardModel {
    let analytics = snapshot.analytics();
    DashboardModel {
        kpis: kpi_values(analytics),
        traffic: traffic_series(analytics),
        occupancy: occupancy(analytics),
        floor_grid: grid_cards(snapshot.live_status(), true),
        status_table: table_rows(snapshot.live_status()),
    }
}

pub fn monitor_model(snapshot: &Snapshot) -> MonitorModel {
    MonitorModel {
        grid: grid_cards(snapshot.live_status(), false),
    }
}

pub fn logs_model(snapshot: &Snapshot) -> LogsModel {
    LogsModel {
        rows: table_rows(snapshot.live_status()),
    }
}

pub fn kpi_values(analytics: &AnalyticsSummary) -> KpiValues {
    KpiValues {
        total_calls: count_or_missing(analytics.total_calls.as_deref()),
        active_needs: count_or_missing(analytics.open_calls.as_deref()),
        avg_response: minutes(analytics.avg_response_minutes.as_deref()),
        avg_delivery: minutes(analytics.avg_delivery_minutes.as_deref()),
    }
}

pub fn traffic_series(analytics: &AnalyticsSummary) -> TrafficSeries {
    let points = analytics.hourly_series();
    let peak = points.iter().copied().fold(0.0_f64, f64::max);
    let y_max = if peak > TRAFFIC_Y_FLOOR {
        (peak / TRAFFIC_Y_STEP).ceil() * TRAFFIC_Y_STEP
    } else {
        TRAFFIC_Y_FLOOR
    };
    TrafficSeries { points, y_max }
}

pub fn occupancy(analytics: &AnalyticsSummary) -> Occupancy {
    let mut open = analytics.open_count.unwrap_or(0).max(0) as u64;
    let closed = analytics.closed_count.unwrap_or(0).max(0) as u64;
    if open + closed == 0 {
        open = 1;
    }
    Occupancy { open, closed }
}

pub fn grid_cards(entries: &[LiveStatusEntry], compact: bool) -> Vec<TableCard> {
    entries
        .iter()
        .map(|entry| TableCard {
            table: entry.table_id.label(),
            status: entry.status.label(),
            category: entry.status.category(),
            minutes_ago: format!("{} min ago", entry.minutes_ago),
            compact,
        })
        .collect()
}

pub fn table_rows(entries: &[LiveStatusEntry]) -> Vec<TableRow> {
    entries
        .iter()
        .map(|entry| TableRow {
            table: entry.table_id.label(),
            status: entry.status.label(),
            category: entry.status.category(),
            availability: AVAILABILITY.to_string(),
            orders: ORDERS.to_string(),
            orders_highlight: orders_highlight(ORDERS),
        })
        .collect()
}

fn orders_highlight(orders: &str) -> bool {
    orders.parse::<u64>().map(|count| count > 0).unwrap_or(false)
}

fn count_or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

fn minutes(value: Option<&str>) -> String {
    format!("{}m", value.unwrap_or(DEFAULT_MINUTES))
}
