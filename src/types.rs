use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of landmarks produced by the face-mesh detector.
pub const MEDIAPIPE_LANDMARK_COUNT: usize = 468;

/// A 2D point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Length of the point taken as a vector from the origin.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// On-disk forms accepted by [`LandmarkSet::load`].
#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkFile {
    Pairs(Vec<[f64; 2]>),
    Wrapped { landmarks: Vec<[f64; 2]> },
}

/// The landmarks of one detected face, indexed by the detector's canonical scheme.
///
/// Coordinates are normalized to [0,1] relative to image width and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create a landmark set from `[x, y]` pairs.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        Self {
            points: pairs.iter().map(|[x, y]| Point::new(*x, *y)).collect(),
        }
    }

    /// Create a landmark set from a flat vector of [x0, y0, x1, y1, ...] coordinates.
    pub fn from_flat_vec(v: &[f64]) -> Result<Self> {
        if v.len() % 2 != 0 {
            let len = v.len() / 2;
            return Err(Error::InvalidLandmarkSet { index: len, len });
        }
        let points = v
            .chunks_exact(2)
            .map(|chunk| Point::new(chunk[0], chunk[1]))
            .collect();
        Ok(Self { points })
    }

    /// Load a landmark set from a JSON file.
    ///
    /// The file holds either a bare array of `[x, y]` pairs or an object with
    /// a `landmarks` field of that form.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let file: LandmarkFile = serde_json::from_reader(reader)?;
        let pairs = match file {
            LandmarkFile::Pairs(pairs) | LandmarkFile::Wrapped { landmarks: pairs } => pairs,
        };
        Ok(Self::from_pairs(&pairs))
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    /// Look up a landmark by canonical index.
    pub fn get(&self, index: usize) -> Result<Point> {
        self.points
            .get(index)
            .copied()
            .ok_or(Error::InvalidLandmarkSet {
                index,
                len: self.points.len(),
            })
    }

    /// Midpoint of two landmarks.
    pub fn midpoint(&self, a: usize, b: usize) -> Result<Point> {
        Ok(self.get(a)?.midpoint(&self.get(b)?))
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}
