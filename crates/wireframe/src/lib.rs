//! Core data layer for small wireframe models: points, line segments and
//! triangular faces over N-dimensional points.
//!
//! Layout
//! - `point`: fixed-dimension coordinates with tolerance equality.
//! - `element`: generic P-vertex element; `Line` (P=2) and `Face` (P=3).
//! - `model`: the owning container with uniqueness rules and statistics.
//! - `obj`: line-oriented text format (`g`/`v`/`l`/`f` records).
//! - `controller`: 1-based ID facade used by interactive front ends.
//!
//! Equality policy
//! - Two relations coexist on purpose: value equality (`Point::is_same`,
//!   coordinates within `cfg::SAME_POINT_EPS`) decides duplicates, while
//!   identity (`Arc::ptr_eq` on `SharedPoint`) decides which vertices are
//!   the same instance when collecting or exporting points.

pub mod cfg;
pub mod controller;
pub mod element;
pub mod error;
pub mod model;
pub mod obj;
pub mod point;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use controller::{ControlError, Controller};
pub use element::{Element, Face, Line};
pub use error::GeomError;
pub use model::{Model, Statistics};
pub use obj::ObjError;
pub use point::{ParsePointError, Point, SharedPoint};

/// Three-dimensional aliases used by the text format and the controller.
pub type Point3 = Point<3>;
pub type Line3 = Line<3>;
pub type Face3 = Face<3>;
pub type Model3 = Model<3>;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::SAME_POINT_EPS;
    pub use crate::controller::{ControlError, Controller};
    pub use crate::element::{Element, Face, Line};
    pub use crate::error::GeomError;
    pub use crate::model::{Model, Statistics};
    pub use crate::point::{Point, SharedPoint};
    pub use crate::{Face3, Line3, Model3, Point3};
}
