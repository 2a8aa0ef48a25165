//! Nova Strike - a browser-based arcade plane shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `renderer`: Canvas2D rendering with sprite fallbacks
//! - `assets`: Image registry resolved once at startup
//! - `audio`: Fire-and-forget sound trigger service
//! - `settings`: Difficulty tier and user preferences
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the cadence the game is tuned at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Viewport fallback when the canvas size cannot be read
    pub const DEFAULT_VIEW_W: f32 = 800.0;
    pub const DEFAULT_VIEW_H: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// The ship spawns this far above the bottom edge
    pub const PLAYER_SPAWN_MARGIN: f32 = 100.0;
    /// Analog input below this magnitude is ignored
    pub const ANALOG_DEADZONE: f32 = 0.1;

    /// Projectile speeds (velocity sign encodes direction: up for the player,
    /// down for hostiles)
    pub const PLAYER_SHOT_SPEED: f32 = 8.0;
    pub const HOSTILE_SHOT_SPEED: f32 = 5.0;
    pub const PROJECTILE_DAMAGE: i32 = 1;

    /// Hostile movement oscillation
    pub const ZIGZAG_FREQ: f32 = 0.1;
    pub const ZIGZAG_AMPLITUDE: f32 = 50.0;
    pub const WEAVE_FREQ: f32 = 0.05;
    pub const WEAVE_AMPLITUDE: f32 = 100.0;

    /// Cull margins past the viewport edges
    pub const HOSTILE_CULL_MARGIN: f32 = 50.0;
    pub const PROJECTILE_CULL_MARGIN: f32 = 10.0;
}
