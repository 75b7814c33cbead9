//! Drives a game in real time: a ticker for the period and a session that
//! serializes inputs against ticks.

pub mod session;
pub mod ticker;

pub use session::Session;
pub use ticker::Ticker;
