pub mod config;
pub mod error;
pub mod types;

pub use config::{CellDefaults, EngineConfig};
pub use error::{EchoError, Result};
pub use types::{Direction, ParticipantId, RoomCode, Tick, GRID_SIZE};
