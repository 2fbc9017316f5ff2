pub mod controller;
pub mod state;

pub use controller::{HealthController, RefreshReport};
pub use state::{AuthorizationStatus, HealthSnapshot, HealthState, Metric, StateUpdate};
