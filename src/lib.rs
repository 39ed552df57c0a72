//! # Titration RL
//!
//! A weak-acid / strong-base titration posed as a sequential decision
//! process. An agent adds discrete volumes of base and decides when to stop,
//! seeing only the indicator color, never the true pH.
//!
//! ## Modules
//!
//! - [`chemistry`]: Titration curve and indicator color, both pure functions
//! - [`env`]: Episodic environment: parameters, observation, reward shaping
//! - [`ai`]: Agent trait and bundled baseline policies
//! - [`training`]: Episode runner, trainer loop, metrics, reliability early stop
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod chemistry;
pub mod config;
pub mod env;
pub mod error;
pub mod training;
