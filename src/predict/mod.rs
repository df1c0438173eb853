mod common_window;
mod error;
mod events;
mod ground_station;
mod pass_finder;
mod propagation;
mod satellite;
mod types;

pub use common_window::find_common_windows;
pub use error::PredictError;
pub use events::{find_events, ElevationEvent, EventKind};
pub use ground_station::GroundStation;
pub use pass_finder::find_passes;
pub use propagation::{observe, subpoint};
pub use satellite::Satellite;
pub use types::{wire_time, CommonWindow, Pass, Subpoint, Topocentric};
