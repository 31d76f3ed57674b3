// Presenter Bridge Core - Volume-button gesture engine
// Turns raw volume-level notifications into peripheral commands

// Module declarations
pub mod bridge;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gesture;
pub mod router;
pub mod source;
pub mod timer;
pub mod transport;

// Re-exports for convenience
pub use bridge::BridgeHandle;
pub use config::{BridgeConfig, BridgeOptions, ClassifierConfig};
pub use gesture::{Direction, GestureEvent};
pub use source::{LevelNotification, LevelSource, StreamId};
pub use transport::Transport;
