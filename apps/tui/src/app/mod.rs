// Application state and input handling for the scorecard dashboard.

pub mod actions;
pub mod animation;
pub mod input;
pub mod state;

pub use actions::AppActions;
pub use input::handle_input;
pub use state::{App, AppScreen, DashboardFocus, PendingRequest};
