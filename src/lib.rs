//! platbox: pixel-exact actor/solid movement for 2D platformers

pub mod types;
pub mod error;
pub mod api;
pub mod body;
pub mod narrowphase;
pub mod level;
pub mod config;
pub mod flicker;
pub mod tiles;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::body::Body;
pub use crate::config::LevelConfig;
pub use crate::error::{LevelError, Result};
pub use crate::flicker::Flicker;
pub use crate::level::{ActorContext, Level, SolidContext};
pub use crate::tiles::TileGrid;
