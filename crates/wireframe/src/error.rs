//! Geometric error kinds raised by the core (points, elements, model).

use std::fmt;

/// Failure of a point, element or model operation.
///
/// The core signals these synchronously at the point of violation; callers
/// (controller, importer) translate them into their own vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeomError {
    /// Slot, coordinate or element index outside `0..len`.
    IndexOutOfBounds { index: usize, len: usize },
    /// Two slots of one element would hold coordinate-equal points.
    IdenticalPoint,
    /// The element would duplicate an existing one in the same collection.
    IdenticalElement,
}

impl GeomError {
    #[inline]
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), GeomError> {
        if index < len {
            Ok(())
        } else {
            Err(GeomError::IndexOutOfBounds { index, len })
        }
    }
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeomError::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds (len {len})")
            }
            GeomError::IdenticalPoint => write!(f, "two of the provided points are the same"),
            GeomError::IdenticalElement => {
                write!(f, "element coincides with an existing one")
            }
        }
    }
}

impl std::error::Error for GeomError {}
