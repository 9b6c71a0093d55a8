pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod practice;

// Re-export for convenience
pub use crate::core::code::Code;
pub use crate::core::controller::GameController;
pub use crate::core::session::{GameId, PlayerRole, SessionContext, Status};
pub use crate::practice::session::PracticeSession;
