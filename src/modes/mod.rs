pub mod autoplay;
pub mod human;

pub use autoplay::{AutoplayMode, AutoplayReport, Autopilot};
pub use human::HumanMode;
