/// The gap below which the car following model treats the vehicle ahead
/// as touching, in m. Keeps the interaction term finite.
const MIN_EFFECTIVE_GAP: f64 = 0.01; // m

/// The intelligent driver model shared by every vehicle on the ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccelerationModel {
    headway: f64,
    max_acc: f64,
    comf_dec: f64,
    min_gap: f64,
    desired_vel: f64,
}

/// The parameters of the acceleration model.
pub struct ModelParams {
    /// The desired gap between this and the vehicle ahead in seconds.
    pub time_headway: f64,
    /// The vehicle's maximum acceleration in m/s<sup>2</sup>.
    pub max_acceleration: f64,
    /// The comfortable decelleration in m/s<sup>2</sup>, as a positive number.
    pub comf_deceleration: f64,
    /// The minimum gap to maintain to a stopped vehicle ahead in m.
    pub min_gap: f64,
    /// The free-road velocity the vehicle tries to reach in m/s.
    pub desired_velocity: f64,
}

impl AccelerationModel {
    /// Creates a new acceleration model.
    pub fn new(params: &ModelParams) -> Self {
        AccelerationModel {
            headway: params.time_headway,
            max_acc: params.max_acceleration,
            comf_dec: params.comf_deceleration,
            min_gap: params.min_gap,
            desired_vel: params.desired_velocity,
        }
    }

    /// The acceleration of a vehicle with an empty road ahead.
    ///
    /// # Arguments
    /// * `vel` - The velocity of the simulated vehicle (m/s).
    pub fn free_road(&self, vel: f64) -> f64 {
        self.max_acc * (1. - (vel / self.desired_vel).powi(4))
    }

    /// The gap the driver would like to keep to the vehicle ahead, in m.
    ///
    /// # Arguments
    /// * `my_vel` - The velocity of the simulated vehicle (m/s).
    /// * `their_vel` - The vehicle ahead's velocity (m/s).
    pub fn desired_gap(&self, my_vel: f64, their_vel: f64) -> f64 {
        let appr = my_vel - their_vel;
        let factor = 1. / (2. * (self.max_acc * self.comf_dec).sqrt());
        self.min_gap + f64::max(0.0, my_vel * self.headway + my_vel * appr * factor)
    }

    /// Calculates the acceleration needed to follow the vehicle ahead.
    ///
    /// The result is unbounded below: a vehicle closing on a nearly touching
    /// leader will brake as hard as the model demands.
    ///
    /// # Arguments
    /// * `net_dist` - The distance between this vehicle and the vehicle ahead in metres.
    /// * `my_vel` - The velocity of the simulated vehicle (m/s).
    /// * `their_vel` - The vehicle ahead's velocity (m/s).
    pub fn follow_vehicle(&self, net_dist: f64, my_vel: f64, their_vel: f64) -> f64 {
        let ss = self.desired_gap(my_vel, their_vel);
        let term = ss / f64::max(MIN_EFFECTIVE_GAP, net_dist);
        self.max_acc * (1. - (my_vel / self.desired_vel).powi(4) - (term * term))
    }
}
