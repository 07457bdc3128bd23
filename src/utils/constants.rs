/// Default input file names
pub const LIVE_FILE: &str = "live.csv";
pub const AQI_HISTORY_FILE: &str = "aqi_history.csv";
pub const FORECAST_FILE: &str = "forecast.csv";

/// Default data directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Configuration sources
pub const CONFIG_FILE: &str = "state-weather.toml";
pub const ENV_PREFIX: &str = "STATE_WEATHER";

/// Initial dropdown selection
pub const DEFAULT_STATE: &str = "Rhode Island";

/// Table names used in errors and reports
pub const LIVE_TABLE: &str = "live observation";
pub const AQI_TABLE: &str = "historical AQI";
pub const FORECAST_TABLE: &str = "forecast";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Output
pub const DEFAULT_OUTPUT_DIR: &str = "output";
