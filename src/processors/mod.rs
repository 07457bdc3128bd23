pub mod dashboard;
pub mod forecast;
pub mod heatmap;
pub mod integrity_checker;
pub mod live_metrics;
pub mod pipeline;

pub use dashboard::Dashboard;
pub use forecast::forecast_series;
pub use heatmap::{month_day_heatmap, month_day_heatmap_by_code};
pub use integrity_checker::{DataViolation, IntegrityChecker, IntegrityReport, ViolationType};
pub use live_metrics::{hourly_series, latest_reading, state_temperatures};
pub use pipeline::AggregationPipeline;
