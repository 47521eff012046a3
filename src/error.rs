use thiserror::Error;

/// An error raised when a simulation is configured with invalid parameters
/// or an inconsistent initial state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The ring must hold at least one vehicle.
    #[error("simulation requires at least one vehicle")]
    NoVehicles,

    /// A parameter which must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A parameter which must be non-negative was negative.
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// A parameter was NaN or infinite.
    #[error("{name} must be finite")]
    NonFinite { name: &'static str },

    /// The leader's hard-braking value must decelerate the vehicle.
    #[error("emergency deceleration must be negative, got {0}")]
    EmergencyDeceleration(f64),

    /// The vehicles do not fit end to end on the ring.
    #[error("{required} m of vehicles do not fit on a {circumference} m ring")]
    Overcrowded { required: f64, circumference: f64 },

    /// A vehicle was placed outside `[0, circumference)`.
    #[error("vehicle {index} at {pos} m is not on the ring")]
    OffRing { index: usize, pos: f64 },

    /// An initial state does not match the configured vehicle count.
    #[error("expected {expected} vehicles, got {actual}")]
    StateMismatch { expected: usize, actual: usize },
}
