pub mod calendar;
pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;
pub mod us_states;

pub use calendar::month_abbr;
pub use constants::*;
pub use filename::{generate_default_snapshot_filename, state_slug};
pub use logging::init_logging;
pub use progress::ProgressReporter;
pub use us_states::{is_us_state, state_code};
