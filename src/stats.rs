//! Aggregate measurements of the traffic on the ring.

use crate::params::SimulationParameters;
use crate::simulation::SimulationState;
use itertools::{Itertools, MinMaxResult};
use std::fmt;

/// A summary of a simulation state, used for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    /// The simulation time in s.
    pub time: f64,
    /// The mean velocity of all vehicles in m/s.
    pub mean_vel: f64,
    /// The lowest velocity in m/s.
    pub min_vel: f64,
    /// The highest velocity in m/s.
    pub max_vel: f64,
    /// The number of stopped vehicles.
    pub stopped: usize,
    /// The smallest gap between a follower and the vehicle ahead, in m.
    pub min_gap: f64,
}

impl Summary {
    /// Summarises the given state.
    pub fn of(state: &SimulationState, params: &SimulationParameters) -> Self {
        let vehicles = state.vehicles();
        if vehicles.is_empty() {
            return Self {
                time: state.time(),
                ..Default::default()
            };
        }

        let vels = vehicles.iter().map(|veh| veh.vel());
        let (min_vel, max_vel) = match vels.clone().minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(vel) => (vel, vel),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let mean_vel = vels.sum::<f64>() / vehicles.len() as f64;
        let stopped = vehicles.iter().filter(|veh| veh.has_stopped()).count();
        let min_gap = (0..vehicles.len())
            .map(|i| state.gap(i, params))
            .fold(f64::INFINITY, f64::min);

        Self {
            time: state.time(),
            mean_vel,
            min_vel,
            max_vel,
            stopped,
            min_gap,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.1}s mean={:.2} m/s min={:.2} m/s max={:.2} m/s stopped={} min_gap={:.2} m",
            self.time, self.mean_vel, self.min_vel, self.max_vel, self.stopped, self.min_gap
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vehicle::VehicleState;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn summarises_vehicles() {
        let params = SimulationParameters {
            vehicle_count: 3,
            circumference: 30.0,
            vehicle_length: 2.0,
            ..Default::default()
        };
        let state = SimulationState::from_vehicles(
            &params,
            vec![
                VehicleState::new(0.0, 0.0),
                VehicleState::new(25.0, 3.0),
                VehicleState::new(20.0, 6.0),
            ],
        )
        .unwrap();

        let summary = Summary::of(&state, &params);
        assert_approx_eq!(summary.mean_vel, 3.0);
        assert_eq!(summary.min_vel, 0.0);
        assert_eq!(summary.max_vel, 6.0);
        assert_eq!(summary.stopped, 1);
        // vehicle 1 at 25 m is 5 m behind the leader at 0 m
        assert_approx_eq!(summary.min_gap, 3.0);
        assert!(summary.to_string().contains("stopped=1"));
    }
}
