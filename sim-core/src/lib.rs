//! Core cloth simulation library.
//!
//! A rectangular grid of point masses held together by distance
//! constraints, advanced one fixed timestep per rendered frame.
//!
//! Main components:
//! - [`particle`] — per-particle kinematic state.
//! - [`lattice`] — grid addressing, anchoring/tear rules and static mesh data.
//! - [`force`] — gravity and the oscillating wind.
//! - [`constraint`] — distance and anchor constraints.
//! - [`phases`] — force, integration and relaxation phases of a step.
//! - [`output`] — flat position buffer published to the renderer.
//! - [`simulation`] — owned context tying the above together.
//! - [`config`] — static parameters, live controls and settings files.
//! - [`error`] — configuration errors.
//! - [`types`] — shared ids.

pub mod config;
pub mod constraint;
pub mod error;
pub mod force;
pub mod lattice;
pub mod output;
pub mod particle;
pub mod phases;
pub mod simulation;
pub mod types;

pub use config::{Config, Controls, Settings};
pub use error::ConfigError;
pub use simulation::{Simulation, StepClock, StepReport};
