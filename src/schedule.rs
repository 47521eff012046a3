use crate::params::SimulationParameters;

/// The scripted stop-and-go timing of the lead vehicle.
///
/// The leader is told to stop for `stop_duration` seconds out of every
/// `repeat_interval` seconds, starting at `first_stop`. Before the first stop
/// it always drives freely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrakingSchedule {
    /// The time of the first stop in s.
    first_stop: f64,
    /// The length of each stop in s.
    stop_duration: f64,
    /// The period of the cycle in s.
    repeat_interval: f64,
}

impl BrakingSchedule {
    /// Creates a new braking schedule.
    pub fn new(first_stop: f64, stop_duration: f64, repeat_interval: f64) -> Self {
        Self {
            first_stop,
            stop_duration,
            repeat_interval,
        }
    }

    /// Creates the braking schedule described by the simulation parameters.
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self::new(
            params.first_stop_time,
            params.stop_duration,
            params.repeat_interval,
        )
    }

    /// Whether the leader is told to be stopped at time `t`.
    pub fn is_stopped(&self, t: f64) -> bool {
        let elapsed = t - self.first_stop;
        if elapsed < 0.0 {
            return false;
        }
        elapsed % self.repeat_interval < self.stop_duration
    }
}
