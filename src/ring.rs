//! The circular topology of the road.

/// A closed single-lane road of fixed length holding `len` vehicles.
///
/// Vehicles are indexed in physical order around the ring: vehicle `i` drives
/// directly behind vehicle `i - 1`, and vehicle `0` drives behind the last one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    /// The number of vehicles on the ring.
    len: usize,
    /// The length of the ring in m.
    circumference: f64,
}

impl Ring {
    /// Creates a new ring.
    pub const fn new(len: usize, circumference: f64) -> Self {
        Self { len, circumference }
    }

    /// The number of vehicles on the ring.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the ring holds no vehicles.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of the ring in m.
    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// The index of the vehicle immediately ahead of vehicle `i`.
    pub fn leader(&self, i: usize) -> usize {
        (i + self.len - 1) % self.len
    }

    /// The index of the vehicle immediately behind vehicle `i`.
    pub fn follower(&self, i: usize) -> usize {
        (i + 1) % self.len
    }

    /// Maps an arc-length coordinate into `[0, circumference)`.
    pub fn wrap(&self, pos: f64) -> f64 {
        let pos = pos.rem_euclid(self.circumference);
        // `rem_euclid` rounds tiny negative values up to the modulus itself
        if pos >= self.circumference {
            0.0
        } else {
            pos
        }
    }

    /// The distance travelled forward around the ring to get from `from` to `to`.
    /// The result lies in `[0, circumference)`.
    pub fn distance_ahead(&self, from: f64, to: f64) -> f64 {
        let dist = to - from;
        if dist < 0.0 {
            dist + self.circumference
        } else {
            dist
        }
    }

    /// The evenly spaced starting positions of the vehicles.
    pub fn even_spacing(&self) -> impl Iterator<Item = f64> {
        let spacing = self.circumference / self.len as f64;
        (0..self.len).map(move |i| i as f64 * spacing)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn neighbours_wrap_around() {
        let ring = Ring::new(5, 100.0);
        assert_eq!(ring.leader(0), 4);
        assert_eq!(ring.leader(3), 2);
        assert_eq!(ring.follower(4), 0);
        assert_eq!(ring.follower(0), 1);
        for i in 0..5 {
            assert_eq!(ring.follower(ring.leader(i)), i);
        }
    }

    #[test]
    fn single_vehicle_follows_itself() {
        let ring = Ring::new(1, 50.0);
        assert_eq!(ring.leader(0), 0);
        assert_eq!(ring.follower(0), 0);
    }

    #[test]
    fn wrap_normalises_positions() {
        let ring = Ring::new(3, 30.0);
        assert_approx_eq!(ring.wrap(31.5), 1.5);
        assert_approx_eq!(ring.wrap(-2.0), 28.0);
        assert_eq!(ring.wrap(30.0), 0.0);
        assert!(ring.wrap(-1e-18) < 30.0);
    }

    #[test]
    fn distance_ahead_crosses_origin() {
        let ring = Ring::new(2, 100.0);
        assert_approx_eq!(ring.distance_ahead(10.0, 30.0), 20.0);
        assert_approx_eq!(ring.distance_ahead(90.0, 5.0), 15.0);
        assert_eq!(ring.distance_ahead(42.0, 42.0), 0.0);
    }

    #[test]
    fn even_spacing_matches_count() {
        let ring = Ring::new(4, 230.0);
        let positions: Vec<_> = ring.even_spacing().collect();
        assert_eq!(positions.len(), 4);
        assert_approx_eq!(positions[1], 57.5);
        assert_approx_eq!(positions[3], 172.5);
    }
}
