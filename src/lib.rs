//! A deterministic simulation of single-lane traffic on a ring road.
//!
//! Vehicles follow one another using the intelligent driver model, while the
//! lead vehicle periodically stops on a fixed schedule, setting off stop-and-go
//! waves that travel backwards through the queue.

pub use cgmath;
pub use error::ConfigError;
pub use params::{SimulationParameters, EMERGENCY_DECELERATION};
pub use ring::Ring;
pub use schedule::BrakingSchedule;
pub use simulation::{step, Simulation, SimulationState, COLLISION_CLEARANCE};
pub use stats::Summary;
pub use vehicle::{AccelerationModel, ModelParams, VehicleState};

mod error;
pub mod math;
mod params;
mod ring;
mod schedule;
mod simulation;
mod stats;
mod vehicle;
