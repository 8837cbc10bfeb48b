use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Coordinate conversions
// ---------------------------------------------------------------------------

/// Convert cartesian `(x, y, z)` to spherical `(r, theta, phi)`.
///
/// The `y` axis points at the pole (`theta = 0`), `z` is `phi = 0` on the
/// equator and `x` is `phi = pi/2`.
pub fn cartesian_to_spherical(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let r = (x * x + y * y + z * z).sqrt();
    let theta = if y != 0.0 {
        (x * x + z * z).sqrt().atan2(y)
    } else {
        FRAC_PI_2
    };
    let phi = if z != 0.0 { x.atan2(z) } else { FRAC_PI_2 };
    (r, theta, phi)
}

/// Convert spherical `(r, theta, phi)` to cartesian `(x, y, z)`.
pub fn spherical_to_cartesian(r: f64, theta: f64, phi: f64) -> (f64, f64, f64) {
    let z = r * theta.sin() * phi.cos();
    let x = r * theta.sin() * phi.sin();
    let y = r * theta.cos();
    (x, y, z)
}

/// Convert spherical `(r, theta, phi)` to geographical `(r, lat, lon)` in radians.
pub fn spherical_to_geographical_radians(r: f64, theta: f64, phi: f64) -> (f64, f64, f64) {
    let lat = FRAC_PI_2 - theta;
    let lon = if phi <= PI { phi } else { phi - TAU };
    (r, lat, lon)
}

/// Convert spherical `(r, theta, phi)` to geographical `(r, lat, lon)` in degrees.
pub fn spherical_to_geographical_degrees(r: f64, theta: f64, phi: f64) -> (f64, f64, f64) {
    let (r, lat, lon) = spherical_to_geographical_radians(r, theta, phi);
    (r, lat.to_degrees(), lon.to_degrees())
}

/// Convert geographical `(r, lat, lon)` in radians to spherical `(r, theta, phi)`.
pub fn geographical_radians_to_spherical(r: f64, lat: f64, lon: f64) -> (f64, f64, f64) {
    let theta = FRAC_PI_2 - lat;
    let phi = if lon >= 0.0 { lon } else { lon + TAU };
    (r, theta, phi)
}

/// Convert geographical `(r, lat, lon)` in degrees to spherical `(r, theta, phi)`.
pub fn geographical_degrees_to_spherical(r: f64, lat: f64, lon: f64) -> (f64, f64, f64) {
    geographical_radians_to_spherical(r, lat.to_radians(), lon.to_radians())
}

// ---------------------------------------------------------------------------
// Coordinate (geographical)
// ---------------------------------------------------------------------------

/// A position in geographical coordinates, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude, `-pi/2..=pi/2`.
    pub lat: f64,
    /// Longitude, `-pi..=pi`.
    pub lon: f64,
}

impl Coordinate {
    /// A coordinate from latitude and longitude in radians.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Initial bearing from `self` towards `other`, measured from north.
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        let x = (other.lon - self.lon).sin() * other.lat.cos();
        let y = self.lat.cos() * other.lat.sin()
            - self.lat.sin() * other.lat.cos() * (other.lon - self.lon).cos();
        x.atan2(y)
    }

    /// Haversine distance on a sphere of the given radius.
    pub fn great_circle_distance_to(&self, other: &Coordinate, radius: f64) -> f64 {
        let sin1 = (0.5 * (self.lat - other.lat).abs()).sin();
        let sin2 = (0.5 * (self.lon - other.lon).abs()).sin();
        let h = sin1 * sin1 + self.lat.cos() * other.lat.cos() * sin2 * sin2;
        2.0 * radius * h.sqrt().min(1.0).asin()
    }

    /// Destination reached after travelling `distance` along `bearing`.
    pub fn moved_by(&self, distance: f64, bearing: f64, radius: f64) -> Coordinate {
        let angular = distance / radius;
        let (sad, cad) = angular.sin_cos();
        let (sb, cb) = bearing.sin_cos();
        let (slat1, clat1) = self.lat.sin_cos();

        let lat2 = (slat1 * cad + clat1 * sad * cb).clamp(-1.0, 1.0).asin();
        let lon2 = self.lon + (sb * sad * clat1).atan2(cad - slat1 * lat2.sin());
        Coordinate::new(lat2, lon2)
    }

    /// The same position in spherical coordinates.
    pub fn to_point(&self) -> Point {
        let (_, theta, phi) = geographical_radians_to_spherical(1.0, self.lat, self.lon);
        Point::new(theta, phi)
    }
}

// ---------------------------------------------------------------------------
// Point (spherical)
// ---------------------------------------------------------------------------

/// A position on the world sphere in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Polar angle measured from the pole.
    pub theta: f64,
    /// Azimuthal angle.
    pub phi: f64,
}

impl Point {
    /// A point from polar and azimuthal angles.
    pub fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Initial bearing towards `other`, measured from north.
    pub fn bearing_to(&self, other: &Point) -> f64 {
        self.to_coordinate().bearing_to(&other.to_coordinate())
    }

    /// Surface distance to `other` on a sphere of `radius`.
    pub fn great_circle_distance_to(&self, other: &Point, radius: f64) -> f64 {
        self.to_coordinate()
            .great_circle_distance_to(&other.to_coordinate(), radius)
    }

    /// Where travelling `distance` along `bearing` ends up.
    pub fn moved_by(&self, distance: f64, bearing: f64, radius: f64) -> Point {
        self.to_coordinate()
            .moved_by(distance, bearing, radius)
            .to_point()
    }

    /// The same position in geographical coordinates.
    pub fn to_coordinate(&self) -> Coordinate {
        let (_, lat, lon) = spherical_to_geographical_radians(1.0, self.theta, self.phi);
        Coordinate::new(lat, lon)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point(theta={}, phi={})", self.theta, self.phi)
    }
}

// ---------------------------------------------------------------------------
// Elevation
// ---------------------------------------------------------------------------

/// A terrain layer contributing to the world's elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Terrain {
    /// Short-wavelength undulation.
    Hills {
        /// Reference point of the layer.
        origin: Point,
    },
    /// Mid-wavelength mountain ranges.
    Ranges {
        /// Reference point of the layer.
        origin: Point,
    },
    /// Continental plates.
    Continents {
        /// Reference point of the layer.
        origin: Point,
    },
}

impl Terrain {
    /// Height this layer adds at `pos` on a world of `radius`.
    pub fn evaluate(&self, pos: &Point, radius: f64) -> f64 {
        match self {
            Self::Hills { .. } => {
                0.006
                    * radius
                    * (pos.theta / PI - 1.0)
                    * (50.0 * pos.phi).sin()
                    * (pos.theta / PI - 2.0)
                    * (50.0 * pos.theta).sin()
            }
            Self::Ranges { .. } => {
                0.012 * radius * (10.0 * pos.theta + PI).cos() * (10.0 * pos.phi).cos()
            }
            Self::Continents { .. } => 0.018 * radius * pos.theta.sin() * pos.phi.sin(),
        }
    }
}

/// The world's radius plus stacked terrain layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationFunction {
    /// Base radius of the sphere.
    pub radius: f64,
    /// Layers summed on top of the base radius.
    #[serde(default)]
    pub terrain: Vec<Terrain>,
}

impl ElevationFunction {
    /// A smooth sphere of `radius`.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            terrain: Vec::new(),
        }
    }

    /// Stack another terrain layer.
    pub fn add(&mut self, terrain: Terrain) {
        self.terrain.push(terrain);
    }

    /// Base radius of the sphere.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Height above (or below) the base radius at `position`.
    pub fn evaluate_without_radius(&self, position: &Point) -> f64 {
        self.terrain
            .iter()
            .map(|t| t.evaluate(position, self.radius))
            .sum()
    }

    /// Absolute distance of the surface from the sphere's centre.
    pub fn evaluate_with_radius(&self, position: &Point) -> f64 {
        self.radius + self.evaluate_without_radius(position)
    }
}
