//! Tap Snake - a tick-driven snake game
//!
//! This library provides:
//! - Core game logic: grid geometry, the simulation engine and its state (game module)
//! - A real-time driver that serializes inputs against ticks (driver module)
//! - TUI rendering and input mapping (render and input modules)
//! - Execution modes: interactive and headless autoplay (modes module)

pub mod driver;
pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

pub use error::ConfigError;
