use std::fmt::Display;

use common::{
    robot::{Landmark, LandmarkMeasurement},
    world::WorldSnapshot,
};
use nalgebra::Point2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SimulatorError},
    noise::uniform_noise,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotParameters {
    /// Side length of the square world. The robot is kept inside `[0, world_size]` on both axes.
    pub world_size: f64,

    /// Landmarks whose measured offset exceeds this value on either axis are not reported.
    /// A negative value disables the range check entirely.
    pub measurement_range: f64,

    /// Scale of the uniform noise added to every commanded translation.
    pub motion_noise: f64,

    /// Scale of the uniform noise added to every landmark measurement.
    pub measurement_noise: f64,
}

impl Default for RobotParameters {
    fn default() -> Self {
        Self {
            world_size: 100.0,
            measurement_range: 30.0,
            motion_noise: 1.0,
            measurement_noise: 1.0,
        }
    }
}

impl RobotParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(SimulatorError::InvalidWorldSize(self.world_size));
        }

        for (name, value) in [
            ("motion noise", self.motion_noise),
            ("measurement noise", self.measurement_noise),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimulatorError::InvalidNoise { name, value });
            }
        }

        if self.measurement_range.is_nan() {
            return Err(SimulatorError::InvalidMeasurementRange(self.measurement_range));
        }

        Ok(())
    }
}

/// A point robot moving in a bounded square world, observing a fixed set of landmarks through a
/// noisy relative position sensor.
///
/// All randomness is drawn from the injected `rng`, seed it to get reproducible runs.
pub struct Robot<R = StdRng> {
    parameters: RobotParameters,
    position: Point2<f64>,
    landmarks: Vec<Landmark>,
    rng: R,
}

impl Robot<StdRng> {
    /// Creates a robot at the center of the world using an entropy seeded random source.
    pub fn new(parameters: RobotParameters) -> Result<Self> {
        Self::with_rng(parameters, StdRng::from_entropy())
    }

    pub fn with_seed(parameters: RobotParameters, seed: u64) -> Result<Self> {
        Self::with_rng(parameters, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Robot<R> {
    pub fn with_rng(parameters: RobotParameters, rng: R) -> Result<Self> {
        parameters.validate()?;

        let center = parameters.world_size / 2.0;
        Ok(Self {
            parameters,
            position: Point2::new(center, center),
            landmarks: Vec::new(),
            rng,
        })
    }

    pub fn parameters(&self) -> &RobotParameters {
        &self.parameters
    }

    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn num_landmarks(&self) -> usize {
        self.landmarks.len()
    }

    pub(crate) fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    fn in_world(&self, v: f64) -> bool {
        (0.0..=self.parameters.world_size).contains(&v)
    }

    /// Attempts to translate the robot by `(dx, dy)` plus motion noise.
    ///
    /// Returns `false` and leaves the position untouched if the noisy target lies outside the
    /// world on either axis.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> bool {
        let noise = self.parameters.motion_noise;
        let x = self.position.x + dx + uniform_noise(&mut self.rng) * noise;
        let y = self.position.y + dy + uniform_noise(&mut self.rng) * noise;

        if !(self.in_world(x) && self.in_world(y)) {
            tracing::trace!("Move rejected, target ({x:.5}, {y:.5}) outside world");
            return false;
        }

        self.position = Point2::new(x, y);
        tracing::trace!("Moved to ({x:.5}, {y:.5})");
        true
    }

    /// Replaces all landmarks with `count` new ones, uniformly distributed over the world and
    /// rounded to whole coordinates.
    pub fn generate_landmarks(&mut self, count: usize) {
        let world_size = self.parameters.world_size;

        let coordinate = |rng: &mut R| {
            let v = (rng.gen::<f64>() * world_size).round();
            // rounding up may step past a fractional world size
            if v > world_size {
                world_size.floor()
            } else {
                v
            }
        };

        self.landmarks = (0..count)
            .map(|_| {
                let x = coordinate(&mut self.rng);
                let y = coordinate(&mut self.rng);
                Landmark::new(x as i64, y as i64)
            })
            .collect();

        tracing::debug!("Generated landmarks: {:?}", self.landmarks);
    }

    /// Replaces all landmarks with the given ones. Fails without touching the current landmarks if
    /// any of them lies outside the world.
    pub fn set_landmarks(&mut self, landmarks: Vec<Landmark>) -> Result<()> {
        let world_size = self.parameters.world_size;

        if let Some((index, l)) = landmarks.iter().enumerate().find(|(_, l)| {
            !(self.in_world(l.x as f64) && self.in_world(l.y as f64))
        }) {
            return Err(SimulatorError::LandmarkOutOfBounds {
                index,
                x: l.x,
                y: l.y,
                world_size,
            });
        }

        self.landmarks = landmarks;
        tracing::debug!("Landmarks set: {:?}", self.landmarks);
        Ok(())
    }

    /// Measures the offset to every landmark, adding measurement noise.
    ///
    /// A landmark is reported when both noisy offsets are at most the measurement range. Only
    /// the upper bound is checked, large negative offsets are always reported. A negative
    /// measurement range reports every landmark. Results are ordered by landmark index.
    pub fn sense(&mut self) -> Vec<LandmarkMeasurement> {
        let RobotParameters {
            measurement_range,
            measurement_noise,
            ..
        } = self.parameters;
        let unlimited = measurement_range < 0.0;

        let mut measurements = Vec::with_capacity(self.landmarks.len());

        for (landmark_index, l) in self.landmarks.iter().enumerate() {
            let dx = (l.x as f64 - self.position.x)
                + uniform_noise(&mut self.rng) * measurement_noise;
            let dy = (l.y as f64 - self.position.y)
                + uniform_noise(&mut self.rng) * measurement_noise;

            if unlimited || (dx <= measurement_range && dy <= measurement_range) {
                measurements.push(LandmarkMeasurement {
                    landmark_index,
                    dx,
                    dy,
                });
            }
        }

        tracing::trace!("Sensed {} of {} landmarks", measurements.len(), self.landmarks.len());
        measurements
    }

    /// Collects the state a visualization needs to draw the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            world_size: self.parameters.world_size.round() as i64,
            robot: [self.position.x, self.position.y],
            landmarks: (!self.landmarks.is_empty())
                .then(|| self.landmarks.iter().map(|&l| l.into()).collect()),
        }
    }
}

impl<R> Display for Robot<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Robot: [x={:.5} y={:.5}]", self.position.x, self.position.y)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    fn noiseless(world_size: f64, measurement_range: f64) -> Robot {
        Robot::with_seed(
            RobotParameters {
                world_size,
                measurement_range,
                motion_noise: 0.0,
                measurement_noise: 0.0,
            },
            0,
        )
        .unwrap()
    }

    fn landmarks(points: &[[i64; 2]]) -> Vec<Landmark> {
        points.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn starts_at_center() {
        let r = Robot::new(RobotParameters::default()).unwrap();
        assert_eq!(r.position(), Point2::new(50.0, 50.0));
        assert_eq!(r.num_landmarks(), 0);
        assert_eq!(r.to_string(), "Robot: [x=50.00000 y=50.00000]");
    }

    #[test]
    fn display_precision() {
        let mut r = noiseless(10.0, 5.0);
        assert!(r.move_by(1.0 / 3.0, -2.0 / 3.0));
        assert_eq!(r.to_string(), "Robot: [x=5.33333 y=4.33333]");
    }

    #[test]
    fn rejects_invalid_parameters() {
        let p = RobotParameters::default();

        for world_size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Robot::new(RobotParameters { world_size, ..p }),
                Err(SimulatorError::InvalidWorldSize(_))
            ));
        }

        assert!(matches!(
            Robot::new(RobotParameters {
                motion_noise: -0.5,
                ..p
            }),
            Err(SimulatorError::InvalidNoise {
                name: "motion noise",
                ..
            })
        ));
        assert!(matches!(
            Robot::new(RobotParameters {
                measurement_noise: f64::NAN,
                ..p
            }),
            Err(SimulatorError::InvalidNoise {
                name: "measurement noise",
                ..
            })
        ));
        assert!(matches!(
            Robot::new(RobotParameters {
                measurement_range: f64::NAN,
                ..p
            }),
            Err(SimulatorError::InvalidMeasurementRange(_))
        ));

        // negative range means unlimited
        assert!(Robot::new(RobotParameters {
            measurement_range: -1.0,
            ..p
        })
        .is_ok());
    }

    #[test]
    fn noiseless_move() {
        let mut r = noiseless(10.0, 5.0);
        assert!(r.move_by(1.0, 2.0));
        assert_eq!(r.position(), Point2::new(6.0, 7.0));

        // exactly on the boundary is still inside
        assert!(r.move_by(4.0, -7.0));
        assert_eq!(r.position(), Point2::new(10.0, 0.0));
    }

    #[test]
    fn move_outside_is_rejected_atomically() {
        let mut r = noiseless(10.0, 5.0);

        // x is fine but y leaves the world, nothing may change
        let before = r.position();
        assert!(!r.move_by(1.0, 5.5));
        assert_eq!(r.x().to_bits(), before.x.to_bits());
        assert_eq!(r.y().to_bits(), before.y.to_bits());

        // and the other way around
        assert!(!r.move_by(-5.5, 1.0));
        assert_eq!(r.position(), before);
    }

    #[test]
    fn move_past_zero_edge() {
        let mut r = noiseless(10.0, 5.0);
        assert!(r.move_by(-5.0, 0.0));
        assert_eq!(r.position(), Point2::new(0.0, 5.0));

        assert!(!r.move_by(-0.1, 0.0));
        assert_eq!(r.position(), Point2::new(0.0, 5.0));

        // a failed move can be repeated without any effect
        assert!(!r.move_by(-0.1, 0.0));
        assert_eq!(r.position(), Point2::new(0.0, 5.0));
    }

    #[test]
    fn noisy_move_stays_inside() {
        let mut r = Robot::with_seed(
            RobotParameters {
                world_size: 10.0,
                motion_noise: 2.0,
                ..Default::default()
            },
            3,
        )
        .unwrap();

        for i in 0..1000 {
            let d = if i % 2 == 0 { 3.0 } else { -3.0 };
            r.move_by(d, -d);
            assert!((0.0..=10.0).contains(&r.x()));
            assert!((0.0..=10.0).contains(&r.y()));
        }
    }

    #[test]
    fn noisy_move_is_perturbed() {
        let mut r = Robot::with_seed(
            RobotParameters {
                world_size: 100.0,
                motion_noise: 1.0,
                ..Default::default()
            },
            11,
        )
        .unwrap();

        assert!(r.move_by(10.0, 10.0));
        assert!((59.0..61.0).contains(&r.x()));
        assert!((59.0..61.0).contains(&r.y()));
        assert!(r.x() != 60.0 || r.y() != 60.0);
    }

    #[test]
    fn generated_landmarks_lie_inside() {
        let mut r = Robot::with_seed(RobotParameters::default(), 5).unwrap();
        r.generate_landmarks(50);
        assert_eq!(r.num_landmarks(), 50);
        assert_eq!(r.landmarks().len(), 50);
        assert!(r
            .landmarks()
            .iter()
            .all(|l| (0..=100).contains(&l.x) && (0..=100).contains(&l.y)));

        r.generate_landmarks(3);
        assert_eq!(r.num_landmarks(), 3);
        assert_eq!(r.landmarks().len(), 3);

        r.generate_landmarks(0);
        assert_eq!(r.num_landmarks(), 0);
        assert!(r.sense().is_empty());
    }

    #[test]
    fn fractional_world_keeps_landmarks_inside() {
        let mut r = Robot::with_seed(
            RobotParameters {
                world_size: 2.6,
                ..Default::default()
            },
            9,
        )
        .unwrap();
        r.generate_landmarks(500);
        assert!(r
            .landmarks()
            .iter()
            .all(|l| (0..=2).contains(&l.x) && (0..=2).contains(&l.y)));
    }

    #[test]
    fn set_landmarks_out_of_bounds() {
        let mut r = noiseless(10.0, 5.0);
        r.set_landmarks(landmarks(&[[1, 1], [10, 0]])).unwrap();

        let err = r.set_landmarks(landmarks(&[[2, 2], [3, 11]])).unwrap_err();
        assert_eq!(
            err,
            SimulatorError::LandmarkOutOfBounds {
                index: 1,
                x: 3,
                y: 11,
                world_size: 10.0
            }
        );
        assert_eq!(r.landmarks(), landmarks(&[[1, 1], [10, 0]]).as_slice());

        assert!(r.set_landmarks(landmarks(&[[-1, 2]])).is_err());
        assert_eq!(r.num_landmarks(), 2);
    }

    #[test]
    fn sense_without_landmarks() {
        let mut r = Robot::new(RobotParameters::default()).unwrap();
        assert!(r.sense().is_empty());
    }

    #[test]
    fn end_to_end_scenario() {
        let mut r = noiseless(10.0, 5.0);
        assert_eq!(r.position(), Point2::new(5.0, 5.0));

        assert!(r.move_by(1.0, 2.0));
        assert_eq!(r.position(), Point2::new(6.0, 7.0));

        r.set_landmarks(landmarks(&[[1, 1], [5, 2], [2, 4]])).unwrap();
        let z: Vec<(usize, f64, f64)> = r.sense().into_iter().map(Into::into).collect();
        assert_eq!(z, vec![(0, -5.0, -6.0), (1, -1.0, -5.0), (2, -4.0, -3.0)]);
    }

    #[test]
    fn range_check_is_one_sided() {
        let mut r = noiseless(100.0, 5.0);
        r.set_landmarks(landmarks(&[[0, 0], [56, 50], [50, 55], [55, 56], [100, 100]])).unwrap();

        let z = r.sense();
        let indices: Vec<usize> = z.iter().map(|m| m.landmark_index).collect();
        // far away in the negative direction is still reported, above the range is not
        assert_eq!(indices, vec![0, 2]);
        assert_relative_eq!(z[0].dx, -50.0);
        assert_relative_eq!(z[1].dy, 5.0);
    }

    #[test]
    fn negative_range_reports_everything() {
        let mut r = noiseless(100.0, -1.0);
        r.set_landmarks(landmarks(&[[100, 100], [0, 0], [50, 50], [99, 1]])).unwrap();

        let z = r.sense();
        let indices: Vec<usize> = z.iter().map(|m| m.landmark_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_relative_eq!(z[0].dx, 50.0);
        assert_relative_eq!(z[3].dy, -49.0);
    }

    #[test]
    fn noiseless_sense_is_repeatable() {
        let mut r = noiseless(100.0, 30.0);
        r.generate_landmarks(10);
        let a = r.sense();
        let b = r.sense();
        assert_eq!(a, b);
        for m in &a {
            let l = r.landmarks()[m.landmark_index];
            assert_relative_eq!(m.dx, l.x as f64 - 50.0);
            assert_relative_eq!(m.dy, l.y as f64 - 50.0);
        }
    }

    #[test]
    fn noisy_sense_keeps_identity() {
        let mut r = Robot::with_seed(
            RobotParameters {
                measurement_range: -1.0,
                measurement_noise: 2.0,
                ..Default::default()
            },
            21,
        )
        .unwrap();
        r.generate_landmarks(8);

        let a = r.sense();
        let b = r.sense();
        assert_ne!(a, b);
        assert_eq!(a.len(), 8);
        for (m, n) in a.iter().zip(&b) {
            assert_eq!(m.landmark_index, n.landmark_index);
            let l = r.landmarks()[m.landmark_index];
            assert!((m.dx - (l.x as f64 - 50.0)).abs() <= 2.0);
            assert!((n.dy - (l.y as f64 - 50.0)).abs() <= 2.0);
        }
    }

    #[test]
    fn same_seed_same_run() {
        let run = |seed| {
            let mut r = Robot::with_seed(RobotParameters::default(), seed).unwrap();
            r.generate_landmarks(5);
            let mut out = Vec::new();
            for _ in 0..10 {
                out.push(r.sense());
                r.move_by(3.0, -2.0);
            }
            (out, r.position(), r.landmarks().to_vec())
        };

        assert_eq!(run(17), run(17));
    }

    #[test]
    fn snapshot() {
        let mut r = noiseless(10.0, 5.0);
        assert_eq!(
            r.snapshot(),
            WorldSnapshot {
                world_size: 10,
                robot: [5.0, 5.0],
                landmarks: None
            }
        );

        r.set_landmarks(landmarks(&[[1, 2], [3, 4]])).unwrap();
        assert_eq!(r.snapshot().landmarks, Some(vec![[1, 2], [3, 4]]));
    }
}
