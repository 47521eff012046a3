//! Simulation parameters and the named scenario presets.

use crate::error::ConfigError;
use crate::ring::Ring;
use crate::vehicle::{AccelerationModel, ModelParams};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The deceleration applied to a scripted leader which is told to stop, in m/s^2.
///
/// This is a behavioural value chosen to halt the leader within a fraction of a
/// second, not a calibrated physical constant.
pub const EMERGENCY_DECELERATION: f64 = -10.0; // m/s^2

/// The parameters of a ring road simulation. These are fixed for the lifetime of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationParameters {
    /// The number of vehicles on the ring.
    pub vehicle_count: usize,
    /// The length of the ring in m.
    pub circumference: f64,
    /// The integration time step in s.
    pub time_step: f64,
    /// The length of every vehicle in m.
    pub vehicle_length: f64,
    /// The jam distance of the IDM in m.
    pub min_gap: f64,
    /// The desired free-road speed in m/s.
    pub desired_speed: f64,
    /// The maximum acceleration in m/s^2.
    pub max_acceleration: f64,
    /// The comfortable deceleration in m/s^2, as a positive number.
    pub comfortable_deceleration: f64,
    /// The desired time gap to the vehicle ahead in s.
    pub time_headway: f64,
    /// How long the leader remains stopped in each braking cycle, in s.
    pub stop_duration: f64,
    /// The time of the leader's first stop in s.
    pub first_stop_time: f64,
    /// The period of the leader's braking cycle in s.
    pub repeat_interval: f64,
    /// The hard-braking acceleration of the leader while it is told to stop, in m/s^2.
    pub emergency_deceleration: f64,
}

impl SimulationParameters {
    /// Short, frequent stops of a slow leader: 22 vehicles braking for 2 s every 10 s.
    pub fn stop_and_go() -> Self {
        Self {
            vehicle_count: 22,
            circumference: 230.0,
            time_step: 0.05,
            vehicle_length: 4.0,
            min_gap: 2.0,
            desired_speed: 10.0,
            max_acceleration: 1.0,
            comfortable_deceleration: 4.0,
            time_headway: 1.6,
            stop_duration: 2.0,
            first_stop_time: 2.0,
            repeat_interval: 10.0,
            emergency_deceleration: EMERGENCY_DECELERATION,
        }
    }

    /// Long stops of a faster leader: 20 vehicles, stopping for 6 s every 15 s,
    /// long enough for the whole queue to come to rest.
    pub fn long_stop() -> Self {
        Self {
            vehicle_count: 20,
            desired_speed: 15.0,
            max_acceleration: 0.8,
            stop_duration: 6.0,
            repeat_interval: 15.0,
            ..Self::stop_and_go()
        }
    }

    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "stop-and-go" | "stop_and_go" => Some(Self::stop_and_go()),
            "long-stop" | "long_stop" => Some(Self::long_stop()),
            _ => None,
        }
    }

    /// The ring described by these parameters.
    pub fn ring(&self) -> Ring {
        Ring::new(self.vehicle_count, self.circumference)
    }

    /// The car following model described by these parameters.
    pub fn acceleration_model(&self) -> AccelerationModel {
        AccelerationModel::new(&ModelParams {
            time_headway: self.time_headway,
            max_acceleration: self.max_acceleration,
            comf_deceleration: self.comfortable_deceleration,
            min_gap: self.min_gap,
            desired_velocity: self.desired_speed,
        })
    }

    /// Checks that the parameters describe a simulation that can be run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reals = [
            ("circumference", self.circumference),
            ("time_step", self.time_step),
            ("vehicle_length", self.vehicle_length),
            ("min_gap", self.min_gap),
            ("desired_speed", self.desired_speed),
            ("max_acceleration", self.max_acceleration),
            ("comfortable_deceleration", self.comfortable_deceleration),
            ("time_headway", self.time_headway),
            ("stop_duration", self.stop_duration),
            ("first_stop_time", self.first_stop_time),
            ("repeat_interval", self.repeat_interval),
            ("emergency_deceleration", self.emergency_deceleration),
        ];
        if let Some(&(name, _)) = reals.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NonFinite { name });
        }

        if self.vehicle_count < 1 {
            return Err(ConfigError::NoVehicles);
        }

        let positive = [
            ("circumference", self.circumference),
            ("time_step", self.time_step),
            ("desired_speed", self.desired_speed),
            ("max_acceleration", self.max_acceleration),
            ("comfortable_deceleration", self.comfortable_deceleration),
            ("time_headway", self.time_headway),
            ("repeat_interval", self.repeat_interval),
        ];
        if let Some(&(name, value)) = positive.iter().find(|(_, value)| *value <= 0.0) {
            return Err(ConfigError::NonPositive { name, value });
        }

        let non_negative = [
            ("vehicle_length", self.vehicle_length),
            ("min_gap", self.min_gap),
            ("stop_duration", self.stop_duration),
            ("first_stop_time", self.first_stop_time),
        ];
        if let Some(&(name, value)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(ConfigError::Negative { name, value });
        }

        if self.emergency_deceleration >= 0.0 {
            return Err(ConfigError::EmergencyDeceleration(
                self.emergency_deceleration,
            ));
        }

        let required = self.vehicle_count as f64 * self.vehicle_length;
        if required > self.circumference {
            return Err(ConfigError::Overcrowded {
                required,
                circumference: self.circumference,
            });
        }

        Ok(())
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::stop_and_go()
    }
}
