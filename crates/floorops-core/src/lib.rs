pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod health;
pub mod model;
pub mod reconcile;
pub mod runtime;
pub mod tasks;

pub use clock::ClockTicker;
pub use config::DashboardConfig;
pub use error::{ClockError, ConfigError, FetchError, ProbeError};
pub use fetch::{build_http_client, SnapshotFetcher};
pub use health::HealthMonitor;
pub use model::{
    AnalyticsSummary, CallStatus, ConnectionState, LiveStatusEntry, Snapshot, StatusCategory,
    TableId, ViewId,
};
pub use reconcile::{RenderModels, ViewReconciler};
pub use runtime::RuntimeState;
pub use tasks::{spawn_background, BackgroundTasks, DashboardEvent};
