//! Line-quantized smooth motion
//!
//! Turns a request to move N lines into a run of timed single-line steps so a
//! large jump reads as motion instead of a cut.
//!
//! # Architecture
//!
//! ## Atomic Layer
//! - `surface` - Host interface: the text window and the periodic timer
//! - `velocity` - Pure speed curve over the remaining distance
//! - `reconcile` - Merging new requests into a running animation
//!
//! ## Molecular Layer
//! - `stepper` - Single-line moves against the host, boundary detection
//! - `animation` - Tick-driven state machine combining the atoms
//!
//! ## Command Layer
//! - `commands` - Half/full window scrolls
//! - `jump` - Named blocking jumps (`gg`, `G`, ...)
//!
//! # Usage
//!
//! ```ignore
//! use glide_core::{MotionEngine, MotionConfig, TextView};
//! use glide_core::motion::ScrollCommand;
//!
//! let mut view = TextView::from_text(&text, 24);
//! let mut engine = MotionEngine::new(MotionConfig::default());
//!
//! engine.scroll(&mut view, ScrollCommand::HalfPageDown, None);
//!
//! // Host timer fires every `update_interval_ms`
//! engine.on_tick(&mut view);
//! ```

// Atomic Layer
pub mod reconcile;
pub mod surface;
pub mod velocity;

// Molecular Layer
pub mod animation;
pub mod stepper;

// Command Layer
pub mod commands;
pub mod jump;

// Re-exports for convenient access
pub use animation::{AnimationState, MotionEngine, MoveMode, MoveRequest, TickOutcome};
pub use commands::ScrollCommand;
pub use jump::{JumpContext, JumpKind, JumpOutcome, JumpPlan, JumpSpec, JumpStart};
pub use stepper::Direction;
pub use surface::{Surface, Timer, TimerId};
