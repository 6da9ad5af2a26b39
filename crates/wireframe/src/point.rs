//! Fixed-dimension points with tolerance equality.
//!
//! Invariants
//! - A `Point<N>` always holds exactly `N` coordinates; index access outside
//!   `0..N` returns `GeomError::IndexOutOfBounds`.
//! - `is_same` compares per coordinate with the absolute tolerance
//!   `cfg::SAME_POINT_EPS`. It is reflexive and symmetric but not transitive,
//!   so `Point` deliberately does not implement `PartialEq`.
//!
//! Sharing
//! - Elements hold `SharedPoint<N>` (`Arc<Point<N>>`). Several elements may
//!   reference the same instance; identity (`Arc::ptr_eq`) is a separate
//!   relation from `is_same`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use nalgebra::SVector;

use crate::cfg::SAME_POINT_EPS;
use crate::error::GeomError;

/// A point in R^N.
#[derive(Clone, Copy, Debug)]
pub struct Point<const N: usize> {
    coords: SVector<f64, N>,
}

/// Shared handle to a point; elements reference vertices through this.
pub type SharedPoint<const N: usize> = Arc<Point<N>>;

impl<const N: usize> Point<N> {
    #[inline]
    pub fn new(coords: [f64; N]) -> Self {
        Self {
            coords: SVector::from(coords),
        }
    }

    #[inline]
    pub fn origin() -> Self {
        Self {
            coords: SVector::zeros(),
        }
    }

    #[inline]
    pub fn from_vector(coords: SVector<f64, N>) -> Self {
        Self { coords }
    }

    /// Coordinates as an nalgebra column vector.
    #[inline]
    pub fn vector(&self) -> &SVector<f64, N> {
        &self.coords
    }

    /// Number of coordinates (`N`).
    #[inline]
    pub const fn dim(&self) -> usize {
        N
    }

    pub fn coord(&self, index: usize) -> Result<f64, GeomError> {
        GeomError::check_index(index, N)?;
        Ok(self.coords[index])
    }

    pub fn set_coord(&mut self, index: usize, value: f64) -> Result<(), GeomError> {
        GeomError::check_index(index, N)?;
        self.coords[index] = value;
        Ok(())
    }

    #[inline]
    pub fn set_coords(&mut self, coords: [f64; N]) {
        self.coords = SVector::from(coords);
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        self.coords.as_slice()
    }

    #[inline]
    pub fn to_array(&self) -> [f64; N] {
        std::array::from_fn(|i| self.coords[i])
    }

    /// Every coordinate pair differs by at most `SAME_POINT_EPS`.
    pub fn is_same(&self, other: &Self) -> bool {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .all(|(a, b)| (a - b).abs() <= SAME_POINT_EPS)
    }

    /// Euclidean distance, also across dimensions.
    ///
    /// The shared prefix `0..min(N, M)` contributes squared differences; the
    /// coordinates only the higher-dimensional point has contribute their
    /// squares (distance from 0 in the missing axes). Symmetric in its
    /// arguments.
    pub fn distance<const M: usize>(&self, other: &Point<M>) -> f64 {
        let (a, b) = (self.as_slice(), other.as_slice());
        let shared = N.min(M);
        let common: f64 = a[..shared]
            .iter()
            .zip(&b[..shared])
            .map(|(x, y)| (x - y) * (x - y))
            .sum();
        let tail: f64 = a[shared..].iter().chain(&b[shared..]).map(|x| x * x).sum();
        (common + tail).sqrt()
    }

    #[inline]
    pub fn into_shared(self) -> SharedPoint<N> {
        Arc::new(self)
    }
}

impl<const N: usize> Default for Point<N> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<const N: usize> From<[f64; N]> for Point<N> {
    fn from(coords: [f64; N]) -> Self {
        Self::new(coords)
    }
}

/// Renders as `[ c0 c1 ... ]`.
impl<const N: usize> fmt::Display for Point<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for c in self.coords.iter() {
            write!(f, "{c} ")?;
        }
        write!(f, "]")
    }
}

/// Failure to parse the bracketed text form of a point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsePointError {
    MissingBrackets,
    Arity { expected: usize, found: usize },
    Number(String),
}

impl fmt::Display for ParsePointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePointError::MissingBrackets => write!(f, "point must be enclosed in '[' ']'"),
            ParsePointError::Arity { expected, found } => {
                write!(f, "expected {expected} coordinates, found {found}")
            }
            ParsePointError::Number(token) => write!(f, "invalid coordinate '{token}'"),
        }
    }
}

impl std::error::Error for ParsePointError {}

impl<const N: usize> FromStr for Point<N> {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or(ParsePointError::MissingBrackets)?;
        let tokens: Vec<&str> = inner.split_whitespace().collect();
        if tokens.len() != N {
            return Err(ParsePointError::Arity {
                expected: N,
                found: tokens.len(),
            });
        }
        let mut coords = [0.0; N];
        for (slot, token) in coords.iter_mut().zip(tokens) {
            *slot = token
                .parse()
                .map_err(|_| ParsePointError::Number(token.to_string()))?;
        }
        Ok(Self::new(coords))
    }
}
