pub use self::acceleration::{AccelerationModel, ModelParams};
use crate::ring::Ring;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod acceleration;

/// Vehicles slower than this are considered stopped, in m/s.
const STOPPED_VEL: f64 = 0.1; // m/s

/// The kinematic state of a single vehicle on the ring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleState {
    /// The arc-length position of the vehicle in m, in `[0, circumference)`.
    pub(crate) pos: f64,
    /// The velocity in m/s. Never negative.
    pub(crate) vel: f64,
}

impl VehicleState {
    /// Creates a new vehicle state.
    pub fn new(pos: f64, vel: f64) -> Self {
        Self { pos, vel }
    }

    /// The arc-length position of the vehicle in m.
    pub fn pos(&self) -> f64 {
        self.pos
    }

    /// The vehicle's velocity in m/s.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    /// Whether the vehicle is stopped.
    pub fn has_stopped(&self) -> bool {
        self.vel < STOPPED_VEL
    }

    /// Integrates the vehicle's motion over one time step with the given acceleration.
    /// The position is advanced using the updated velocity.
    ///
    /// # Parameters
    /// * `acc` - The acceleration in m/s^2
    /// * `dt` - The time step in seconds
    /// * `ring` - The ring used to wrap the new position
    pub(crate) fn integrate(&self, acc: f64, dt: f64, ring: &Ring) -> Self {
        let vel = f64::max(self.vel + dt * acc, 0.0);
        self.with_velocity(vel, dt, ring)
    }

    /// Moves the vehicle from its current position at the given velocity for one time step.
    pub(crate) fn with_velocity(&self, vel: f64, dt: f64, ring: &Ring) -> Self {
        Self {
            pos: ring.wrap(self.pos + vel * dt),
            vel,
        }
    }
}
