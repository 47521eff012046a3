use crate::error::ConfigError;
use crate::math::{ring_point, Point2d};
use crate::params::SimulationParameters;
use crate::schedule::BrakingSchedule;
use crate::vehicle::VehicleState;
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The clearance a follower must leave to the pre-step position of the vehicle ahead, in m.
pub const COLLISION_CLEARANCE: f64 = 0.5; // m

/// The state of every vehicle on the ring at a moment in time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationState {
    /// The vehicles in ring order. Vehicle 0 is the scripted leader.
    vehicles: Vec<VehicleState>,
    /// The simulation time in s.
    time: f64,
}

/// What a vehicle will do during the current step.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    /// Integrate with the given acceleration.
    Accelerate(f64),
    /// Remain exactly where it is, at zero velocity.
    Hold,
}

impl SimulationState {
    /// Creates the initial state: vehicles evenly spaced around the ring,
    /// all travelling at the desired speed.
    pub fn new(params: &SimulationParameters) -> Self {
        let vehicles = params
            .ring()
            .even_spacing()
            .map(|pos| VehicleState::new(pos, params.desired_speed))
            .collect();
        Self {
            vehicles,
            time: 0.0,
        }
    }

    /// Creates an evenly spaced initial state with the given starting velocities.
    pub fn with_velocities(
        params: &SimulationParameters,
        velocities: &[f64],
    ) -> Result<Self, ConfigError> {
        if velocities.len() != params.vehicle_count {
            return Err(ConfigError::StateMismatch {
                expected: params.vehicle_count,
                actual: velocities.len(),
            });
        }
        if let Some(&vel) = velocities.iter().find(|vel| !vel.is_finite()) {
            debug!("rejecting non-finite initial velocity {}", vel);
            return Err(ConfigError::NonFinite { name: "velocity" });
        }
        if let Some(&value) = velocities.iter().find(|vel| **vel < 0.0) {
            return Err(ConfigError::Negative {
                name: "velocity",
                value,
            });
        }

        let mut state = Self::new(params);
        for (veh, vel) in state.vehicles.iter_mut().zip(velocities) {
            veh.vel = *vel;
        }
        Ok(state)
    }

    /// Creates an initial state from explicitly placed vehicles, given in ring order.
    pub fn from_vehicles(
        params: &SimulationParameters,
        vehicles: Vec<VehicleState>,
    ) -> Result<Self, ConfigError> {
        if vehicles.len() != params.vehicle_count {
            return Err(ConfigError::StateMismatch {
                expected: params.vehicle_count,
                actual: vehicles.len(),
            });
        }
        for (index, veh) in vehicles.iter().enumerate() {
            if !(0.0..params.circumference).contains(&veh.pos) {
                return Err(ConfigError::OffRing {
                    index,
                    pos: veh.pos,
                });
            }
            if !veh.vel.is_finite() {
                return Err(ConfigError::NonFinite { name: "velocity" });
            }
            if veh.vel < 0.0 {
                return Err(ConfigError::Negative {
                    name: "velocity",
                    value: veh.vel,
                });
            }
        }
        Ok(Self {
            vehicles,
            time: 0.0,
        })
    }

    /// The vehicles in ring order.
    pub fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    /// The simulation time in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The forward clearance between vehicle `i` and the rear of the vehicle ahead, in m.
    ///
    /// May be negative if the vehicles overlap. A lone vehicle follows itself
    /// around the whole ring.
    pub fn gap(&self, i: usize, params: &SimulationParameters) -> f64 {
        let ring = params.ring();
        let leader = ring.leader(i);
        let dist = if leader == i {
            ring.circumference()
        } else {
            ring.distance_ahead(self.vehicles[i].pos, self.vehicles[leader].pos)
        };
        dist - params.vehicle_length
    }

    /// Decides how every vehicle moves this step, using only the current state.
    fn motions(&self, params: &SimulationParameters, leader_stopped: bool) -> Vec<Motion> {
        let ring = params.ring();
        let model = params.acceleration_model();

        self.vehicles
            .iter()
            .enumerate()
            .map(|(i, veh)| {
                if i == 0 {
                    match (leader_stopped, veh.vel > 0.0) {
                        (true, true) => Motion::Accelerate(params.emergency_deceleration),
                        (true, false) => Motion::Hold,
                        (false, _) => Motion::Accelerate(model.free_road(veh.vel)),
                    }
                } else {
                    let ahead = &self.vehicles[ring.leader(i)];
                    Motion::Accelerate(model.follow_vehicle(
                        self.gap(i, params),
                        veh.vel,
                        ahead.vel,
                    ))
                }
            })
            .collect()
    }
}

/// Advances `state` by one time step, starting at time `t`.
///
/// Accelerations are calculated for every vehicle from the state at the start
/// of the step before any vehicle is moved, so the result does not depend on
/// the order in which vehicles are updated. Followers are then prevented from
/// travelling further than [COLLISION_CLEARANCE] short of where the vehicle
/// ahead was at the start of the step.
///
/// `state` must hold exactly `params.vehicle_count` vehicles. Returns whether
/// the leader was told to stop during this step.
pub fn step(params: &SimulationParameters, state: &mut SimulationState, t: f64) -> bool {
    debug_assert_eq!(
        state.vehicles.len(),
        params.vehicle_count,
        "state does not match the configured vehicle count"
    );
    let ring = params.ring();
    let dt = params.time_step;
    let leader_stopped = BrakingSchedule::from_params(params).is_stopped(t);
    let motions = state.motions(params, leader_stopped);

    let vehicles: Vec<VehicleState> = state
        .vehicles
        .iter()
        .zip(motions)
        .enumerate()
        .map(|(i, (veh, motion))| {
            let acc = match motion {
                Motion::Hold => return VehicleState::new(veh.pos, 0.0),
                Motion::Accelerate(acc) => acc,
            };
            let next = veh.integrate(acc, dt, &ring);
            if i == 0 {
                return next;
            }

            let limit = state.gap(i, params) - COLLISION_CLEARANCE;
            if next.vel * dt > limit {
                let vel = f64::max(0.0, limit / dt);
                trace!(
                    "t={:.2}: clamping vehicle {} from {:.3} to {:.3} m/s",
                    t,
                    i,
                    next.vel,
                    vel
                );
                veh.with_velocity(vel, dt, &ring)
            } else {
                next
            }
        })
        .collect();

    state.vehicles = vehicles;
    state.time = t + dt;
    leader_stopped
}

/// A ring road traffic simulation.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The fixed parameters of the run.
    params: SimulationParameters,
    /// The current state of the vehicles.
    state: SimulationState,
    /// The current frame of simulation.
    frame: usize,
    /// Whether the leader was told to stop during the previous frame.
    leader_stopped: bool,
}

impl Simulation {
    /// Creates a new simulation with vehicles evenly spaced at the desired speed.
    pub fn new(params: SimulationParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        let state = SimulationState::new(&params);
        Ok(Self::from_parts(params, state))
    }

    /// Creates a new simulation from an existing state.
    pub fn with_state(
        params: SimulationParameters,
        state: SimulationState,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        if state.vehicles.len() != params.vehicle_count {
            return Err(ConfigError::StateMismatch {
                expected: params.vehicle_count,
                actual: state.vehicles.len(),
            });
        }
        Ok(Self::from_parts(params, state))
    }

    fn from_parts(params: SimulationParameters, state: SimulationState) -> Self {
        debug!(
            "ring of {} vehicles over {} m, dt = {} s, leader stops for {} s every {} s from t = {} s",
            params.vehicle_count,
            params.circumference,
            params.time_step,
            params.stop_duration,
            params.repeat_interval,
            params.first_stop_time,
        );
        Self {
            params,
            state,
            frame: 0,
            leader_stopped: false,
        }
    }

    /// Advances the simulation by one time step, starting at time `t`.
    ///
    /// The caller owns the clock; `t` normally increases by the time step with each call.
    pub fn step(&mut self, t: f64) {
        let leader_stopped = step(&self.params, &mut self.state, t);
        self.frame += 1;

        if leader_stopped != self.leader_stopped {
            trace!(
                "t={:.2}: leader {}",
                t,
                if leader_stopped { "stopping" } else { "moving off" }
            );
            self.leader_stopped = leader_stopped;
        }
    }

    /// Advances the simulation by one time step from the end of the previous one.
    pub fn advance(&mut self) {
        self.step(self.state.time);
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The simulation time at the end of the latest step, in s.
    pub fn time(&self) -> f64 {
        self.state.time
    }

    /// The parameters of the simulation.
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// The current state of the simulation.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The number of vehicles on the ring.
    pub fn vehicle_count(&self) -> usize {
        self.state.vehicles.len()
    }

    /// The length of the ring in m.
    pub fn circumference(&self) -> f64 {
        self.params.circumference
    }

    /// Returns an iterator over all the vehicles in ring order.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &VehicleState> {
        self.state.vehicles.iter()
    }

    /// The positions of all vehicles in m.
    pub fn positions(&self) -> Vec<f64> {
        self.iter_vehicles().map(|veh| veh.pos).collect()
    }

    /// The velocities of all vehicles in m/s.
    pub fn velocities(&self) -> Vec<f64> {
        self.iter_vehicles().map(|veh| veh.vel).collect()
    }

    /// The forward gap of every vehicle to the one ahead, in m.
    pub fn gaps(&self) -> Vec<f64> {
        (0..self.vehicle_count())
            .map(|i| self.state.gap(i, &self.params))
            .collect()
    }

    /// The world space coordinates of every vehicle, on a circle centred at the origin.
    pub fn world_positions(&self) -> Vec<Point2d> {
        self.iter_vehicles()
            .map(|veh| ring_point(veh.pos, self.params.circumference))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn params() -> SimulationParameters {
        SimulationParameters {
            vehicle_count: 4,
            circumference: 100.0,
            ..SimulationParameters::stop_and_go()
        }
    }

    #[test]
    fn initial_state() {
        let state = SimulationState::new(&params());
        let positions: Vec<_> = state.vehicles().iter().map(|v| v.pos()).collect();
        assert_eq!(positions, vec![0.0, 25.0, 50.0, 75.0]);
        assert!(state.vehicles().iter().all(|v| v.vel() == 10.0));
        assert_eq!(state.time(), 0.0);
    }

    #[test]
    fn gap_wraps_around() {
        let params = params();
        let state = SimulationState::new(&params);
        // vehicle 1 at 25 m follows vehicle 0 at 0 m, across the origin
        assert_approx_eq!(state.gap(1, &params), 71.0);
        // vehicle 0 follows the last vehicle at 75 m
        assert_approx_eq!(state.gap(0, &params), 71.0);
    }

    #[test]
    fn with_velocities_checks_input() {
        let params = params();
        assert_eq!(
            SimulationState::with_velocities(&params, &[0.0; 3]),
            Err(ConfigError::StateMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            SimulationState::with_velocities(&params, &[0.0, -1.0, 0.0, 0.0]),
            Err(ConfigError::Negative {
                name: "velocity",
                value: -1.0
            })
        );
        assert_eq!(
            SimulationState::with_velocities(&params, &[0.0, f64::NAN, 0.0, 0.0]),
            Err(ConfigError::NonFinite { name: "velocity" })
        );
        assert_eq!(
            SimulationState::with_velocities(&params, &[f64::INFINITY, 0.0, 0.0, 0.0]),
            Err(ConfigError::NonFinite { name: "velocity" })
        );
        let state = SimulationState::with_velocities(&params, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(state.vehicles()[2].vel(), 3.0);
    }

    #[test]
    fn leader_drives_freely_before_first_stop() {
        let params = params();
        let mut state = SimulationState::with_velocities(&params, &[5.0, 0.0, 0.0, 0.0]).unwrap();
        step(&params, &mut state, 0.0);
        let leader = state.vehicles()[0];
        let expected_vel = 5.0 + 0.05 * (1.0 - 0.5f64.powi(4));
        assert_approx_eq!(leader.vel(), expected_vel);
        assert_approx_eq!(leader.pos(), expected_vel * 0.05);
        assert_approx_eq!(state.time(), 0.05);
    }

    #[test]
    fn stopped_leader_brakes_hard_then_holds() {
        let params = params();
        let mut state = SimulationState::with_velocities(&params, &[0.2, 0.0, 0.0, 0.0]).unwrap();
        step(&params, &mut state, 3.0);
        assert_eq!(state.vehicles()[0].vel(), 0.0);
        assert_eq!(state.vehicles()[0].pos(), 0.0);

        step(&params, &mut state, 3.05);
        assert_eq!(state.vehicles()[0].vel(), 0.0);
        assert_eq!(state.vehicles()[0].pos(), 0.0);
    }

    #[test]
    fn follower_is_clamped_behind_leader() {
        // A coarse time step and an eager driver, so the car following model alone
        // would carry the follower past the leader's rear bumper
        let params = SimulationParameters {
            vehicle_count: 2,
            circumference: 100.0,
            time_step: 1.0,
            min_gap: 0.0,
            time_headway: 0.1,
            desired_speed: 100.0,
            ..SimulationParameters::stop_and_go()
        };
        let mut state = SimulationState::from_vehicles(
            &params,
            vec![VehicleState::new(0.0, 10.0), VehicleState::new(88.0, 10.0)],
        )
        .unwrap();
        assert_approx_eq!(state.gap(1, &params), 8.0);

        step(&params, &mut state, 0.0);
        let follower = state.vehicles()[1];
        assert_approx_eq!(follower.vel(), 7.5);
        assert_approx_eq!(follower.pos(), 95.5);
    }

    #[test]
    fn follower_stops_when_touching() {
        let params = SimulationParameters {
            vehicle_count: 2,
            circumference: 100.0,
            ..SimulationParameters::stop_and_go()
        };
        let mut state = SimulationState::from_vehicles(
            &params,
            vec![VehicleState::new(0.0, 0.0), VehicleState::new(95.8, 3.0)],
        )
        .unwrap();
        assert!(state.gap(1, &params) < COLLISION_CLEARANCE);

        step(&params, &mut state, 3.0);
        assert_eq!(state.vehicles()[1].vel(), 0.0);
        assert_eq!(state.vehicles()[1].pos(), 95.8);
    }

    #[test]
    fn from_vehicles_checks_placement() {
        let params = SimulationParameters {
            vehicle_count: 2,
            circumference: 100.0,
            ..SimulationParameters::stop_and_go()
        };
        assert_eq!(
            SimulationState::from_vehicles(
                &params,
                vec![VehicleState::new(0.0, 0.0), VehicleState::new(100.0, 0.0)],
            ),
            Err(ConfigError::OffRing {
                index: 1,
                pos: 100.0
            })
        );
        assert!(matches!(
            SimulationState::from_vehicles(&params, vec![VehicleState::new(0.0, 0.0)]),
            Err(ConfigError::StateMismatch { .. })
        ));
        assert_eq!(
            SimulationState::from_vehicles(
                &params,
                vec![VehicleState::new(0.0, f64::NAN), VehicleState::new(50.0, 0.0)],
            ),
            Err(ConfigError::NonFinite { name: "velocity" })
        );
        assert_eq!(
            SimulationState::from_vehicles(
                &params,
                vec![VehicleState::new(0.0, 0.0), VehicleState::new(50.0, -2.0)],
            ),
            Err(ConfigError::Negative {
                name: "velocity",
                value: -2.0
            })
        );
    }

    #[test]
    fn simulation_tracks_time_and_frames() {
        let mut sim = Simulation::new(params()).unwrap();
        for _ in 0..10 {
            sim.advance();
        }
        assert_eq!(sim.frame(), 10);
        assert_approx_eq!(sim.time(), 0.5);
        assert_eq!(sim.positions().len(), 4);
        assert_eq!(sim.world_positions().len(), 4);
    }

    #[test]
    fn with_state_checks_vehicle_count() {
        let state = SimulationState::new(&SimulationParameters::long_stop());
        assert!(matches!(
            Simulation::with_state(params(), state),
            Err(ConfigError::StateMismatch { .. })
        ));
    }

    #[test]
    fn with_state_validates_params() {
        let state = SimulationState::new(&params());
        let bad = SimulationParameters {
            time_step: -0.05,
            ..params()
        };
        assert_eq!(
            Simulation::with_state(bad, state).unwrap_err(),
            ConfigError::NonPositive {
                name: "time_step",
                value: -0.05
            }
        );
    }

    #[test]
    fn step_reports_leader_schedule() {
        let params = params();
        let mut state = SimulationState::new(&params);
        assert!(!step(&params, &mut state, 1.0));
        assert!(step(&params, &mut state, 2.5));
        assert!(!step(&params, &mut state, 4.0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "state does not match the configured vehicle count")]
    fn step_rejects_mismatched_state() {
        let mut state = SimulationState::new(&SimulationParameters::long_stop());
        step(&params(), &mut state, 0.0);
    }
}
