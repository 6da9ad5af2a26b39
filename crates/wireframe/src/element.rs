//! Generic P-vertex elements and their `Line`/`Face` specialisations.
//!
//! Invariants
//! - An element holds exactly `P` shared points and no two of them are
//!   coordinate-equal (`Point::is_same`). Every constructor and mutator
//!   validates before writing, so a failed call leaves the element as it was.
//!
//! Equality
//! - `is_same` is multiset equality under `Point::is_same`: vertex order does
//!   not matter. It searches for a slot assignment (a permutation) that
//!   matches every vertex; cost is O(P!) which is fine for P ∈ {2, 3}.
//!
//! Specialisations
//! - `Line<N> = Element<N, 2>` adds `first`/`second` and `length`.
//! - `Face<N> = Element<N, 3>` adds `first`/`second`/`third` and `area`.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::error::GeomError;
use crate::point::{Point, SharedPoint};

/// Ordered, fixed-size collection of `P` shared points in R^N.
#[derive(Clone, Debug)]
pub struct Element<const N: usize, const P: usize> {
    points: [SharedPoint<N>; P],
}

/// Line segment.
pub type Line<const N: usize> = Element<N, 2>;
/// Triangular face.
pub type Face<const N: usize> = Element<N, 3>;

impl<const N: usize, const P: usize> Element<N, P> {
    const LABEL: &'static str = match P {
        2 => "Line",
        3 => "Face",
        _ => "Element",
    };

    pub fn new(points: [SharedPoint<N>; P]) -> Result<Self, GeomError> {
        if !Self::all_distinct(&points) {
            return Err(GeomError::IdenticalPoint);
        }
        Ok(Self { points })
    }

    /// Build from point values; each vertex gets its own fresh allocation.
    pub fn from_points(points: [Point<N>; P]) -> Result<Self, GeomError> {
        Self::new(points.map(Arc::new))
    }

    /// No two entries are coordinate-equal.
    pub fn all_distinct<Q: Borrow<Point<N>>>(points: &[Q]) -> bool {
        points.iter().enumerate().all(|(i, a)| {
            points[i + 1..]
                .iter()
                .all(|b| !a.borrow().is_same(b.borrow()))
        })
    }

    /// Number of vertices (`P`).
    #[inline]
    pub const fn arity(&self) -> usize {
        P
    }

    pub fn point(&self, index: usize) -> Result<&SharedPoint<N>, GeomError> {
        GeomError::check_index(index, P)?;
        Ok(&self.points[index])
    }

    #[inline]
    pub fn points(&self) -> &[SharedPoint<N>; P] {
        &self.points
    }

    /// Vertices in slot order.
    pub fn points_vec(&self) -> Vec<SharedPoint<N>> {
        self.points.to_vec()
    }

    pub fn set_points(&mut self, points: [SharedPoint<N>; P]) -> Result<(), GeomError> {
        if !Self::all_distinct(&points) {
            return Err(GeomError::IdenticalPoint);
        }
        self.points = points;
        Ok(())
    }

    /// Link an existing (possibly shared) point instance into slot `index`.
    pub fn set_point(&mut self, index: usize, point: SharedPoint<N>) -> Result<(), GeomError> {
        GeomError::check_index(index, P)?;
        if self.clashes_with_others(index, &point) {
            return Err(GeomError::IdenticalPoint);
        }
        self.points[index] = point;
        Ok(())
    }

    /// Replace slot `index` with a fresh point.
    ///
    /// Only the other slots are checked; the replaced vertex may be
    /// coordinate-equal to the new one.
    pub fn change_point(&mut self, index: usize, point: Point<N>) -> Result<(), GeomError> {
        self.set_point(index, Arc::new(point))
    }

    fn clashes_with_others(&self, index: usize, point: &Point<N>) -> bool {
        self.points
            .iter()
            .enumerate()
            .any(|(i, q)| i != index && q.is_same(point))
    }

    /// Same vertex multiset as `other`, in any order.
    pub fn is_same(&self, other: &Self) -> bool {
        let theirs: [&Point<N>; P] = std::array::from_fn(|i| other.points[i].as_ref());
        self.matches_in_any_order(&theirs)
    }

    /// Same vertex multiset as a raw point list, in any order.
    pub fn is_same_points(&self, points: &[Point<N>; P]) -> bool {
        let theirs: [&Point<N>; P] = std::array::from_fn(|i| &points[i]);
        self.matches_in_any_order(&theirs)
    }

    fn matches_in_any_order(&self, theirs: &[&Point<N>; P]) -> bool {
        let mut used = [false; P];
        self.assign_from(0, theirs, &mut used)
    }

    // Depth-first over permutations: slot `slot` of `self` tries every unused
    // vertex of `theirs`.
    fn assign_from(&self, slot: usize, theirs: &[&Point<N>; P], used: &mut [bool; P]) -> bool {
        if slot == P {
            return true;
        }
        for j in 0..P {
            if used[j] || !self.points[slot].is_same(theirs[j]) {
                continue;
            }
            used[j] = true;
            if self.assign_from(slot + 1, theirs, used) {
                return true;
            }
            used[j] = false;
        }
        false
    }

    /// Holds this exact point instance (identity, not coordinates).
    pub fn shares_point(&self, point: &SharedPoint<N>) -> bool {
        self.points.iter().any(|p| Arc::ptr_eq(p, point))
    }

    /// Display adapter for the bare `[ p0 p1 ... ]` form without the label.
    pub fn vertices(&self) -> Vertices<'_, N, P> {
        Vertices(self)
    }
}

impl<const N: usize> Element<N, 2> {
    #[inline]
    pub fn first(&self) -> &SharedPoint<N> {
        &self.points[0]
    }
    #[inline]
    pub fn second(&self) -> &SharedPoint<N> {
        &self.points[1]
    }
    pub fn set_first(&mut self, point: SharedPoint<N>) -> Result<(), GeomError> {
        self.set_point(0, point)
    }
    pub fn set_second(&mut self, point: SharedPoint<N>) -> Result<(), GeomError> {
        self.set_point(1, point)
    }

    pub fn length(&self) -> f64 {
        self.points[0].distance(&*self.points[1])
    }
}

impl<const N: usize> Element<N, 3> {
    #[inline]
    pub fn first(&self) -> &SharedPoint<N> {
        &self.points[0]
    }
    #[inline]
    pub fn second(&self) -> &SharedPoint<N> {
        &self.points[1]
    }
    #[inline]
    pub fn third(&self) -> &SharedPoint<N> {
        &self.points[2]
    }
    pub fn set_first(&mut self, point: SharedPoint<N>) -> Result<(), GeomError> {
        self.set_point(0, point)
    }
    pub fn set_second(&mut self, point: SharedPoint<N>) -> Result<(), GeomError> {
        self.set_point(1, point)
    }
    pub fn set_third(&mut self, point: SharedPoint<N>) -> Result<(), GeomError> {
        self.set_point(2, point)
    }

    fn sides(&self) -> [f64; 3] {
        let [p, q, r] = &self.points;
        [p.distance(&**q), q.distance(&**r), r.distance(&**p)]
    }

    pub fn perimeter(&self) -> f64 {
        self.sides().iter().sum()
    }

    /// Heron's formula. The radicand is clamped at 0 so collinear vertices
    /// give 0 rather than NaN.
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.sides();
        let s = (a + b + c) / 2.0;
        (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
    }
}

/// See [`Element::vertices`].
pub struct Vertices<'a, const N: usize, const P: usize>(&'a Element<N, P>);

impl<const N: usize, const P: usize> fmt::Display for Vertices<'_, N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for p in &self.0.points {
            write!(f, "{p} ")?;
        }
        write!(f, "]")
    }
}

/// Renders as `Line [ ... ]` / `Face [ ... ]`.
impl<const N: usize, const P: usize> fmt::Display for Element<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", Self::LABEL, self.vertices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64, z: f64) -> Point<3> {
        Point::new([x, y, z])
    }

    fn tri() -> [Point<3>; 3] {
        [pt(0.0, 0.0, 0.0), pt(3.0, 0.0, 0.0), pt(0.0, 4.0, 0.0)]
    }

    #[test]
    fn coincident_points_rejected_in_every_position() {
        let [a, b, _] = tri();
        let twin = pt(a.coord(0).unwrap() + 1e-7, 0.0, 0.0);
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            let mut pts = tri();
            pts[i] = a;
            pts[j] = twin;
            assert_eq!(
                Face::from_points(pts).unwrap_err(),
                GeomError::IdenticalPoint,
                "pair ({i},{j})"
            );
        }
        assert_eq!(
            Line::from_points([b, b]).unwrap_err(),
            GeomError::IdenticalPoint
        );
    }

    #[test]
    fn is_same_ignores_vertex_order() {
        let [a, b, c] = tri();
        let base = Face::from_points([a, b, c]).unwrap();
        let orders = [
            [a, b, c],
            [a, c, b],
            [b, a, c],
            [b, c, a],
            [c, a, b],
            [c, b, a],
        ];
        for order in orders {
            let other = Face::from_points(order).unwrap();
            assert!(base.is_same(&other) && other.is_same(&base));
            assert!(base.is_same_points(&order));
        }
        let moved = Face::from_points([a, b, pt(0.0, 4.0, 1.0)]).unwrap();
        assert!(!base.is_same(&moved));
    }

    #[test]
    fn line_is_same_within_tolerance() {
        let l1 = Line::from_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)]).unwrap();
        let l2 = Line::from_points([pt(1.0 + 1e-7, 0.0, 0.0), pt(0.0, 0.0, 0.0)]).unwrap();
        assert!(l1.is_same(&l2));
    }

    #[test]
    fn accessors_are_bounds_checked() {
        let line = Line::from_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)]).unwrap();
        assert_eq!(line.arity(), 2);
        assert!(line.point(1).is_ok());
        assert_eq!(
            line.point(2).unwrap_err(),
            GeomError::IndexOutOfBounds { index: 2, len: 2 }
        );
        assert_eq!(line.points_vec().len(), 2);
    }

    #[test]
    fn change_point_checks_only_other_slots() {
        let mut face = Face::from_points(tri()).unwrap();
        // Same coordinates as the vertex being replaced: allowed.
        face.change_point(0, pt(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(
            face.change_point(0, pt(3.0, 0.0, 0.0)).unwrap_err(),
            GeomError::IdenticalPoint
        );
        assert_eq!(
            face.change_point(3, pt(9.0, 9.0, 9.0)).unwrap_err(),
            GeomError::IndexOutOfBounds { index: 3, len: 3 }
        );
        face.change_point(2, pt(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(face.third().to_array(), [0.0, 0.0, 5.0]);
    }

    #[test]
    fn set_point_shares_instances() {
        let shared = pt(7.0, 7.0, 7.0).into_shared();
        let mut l1 = Line::from_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)]).unwrap();
        let mut l2 = Line::from_points([pt(0.0, 1.0, 0.0), pt(1.0, 1.0, 0.0)]).unwrap();
        l1.set_second(shared.clone()).unwrap();
        l2.set_first(shared.clone()).unwrap();
        assert!(Arc::ptr_eq(l1.second(), l2.first()));
        assert!(l1.shares_point(&shared) && l2.shares_point(&shared));
        assert!(!l1.shares_point(&pt(7.0, 7.0, 7.0).into_shared()));
    }

    #[test]
    fn set_points_validates_before_writing() {
        let mut line = Line::from_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)]).unwrap();
        let dup = pt(5.0, 5.0, 5.0).into_shared();
        assert_eq!(
            line.set_points([dup.clone(), dup]).unwrap_err(),
            GeomError::IdenticalPoint
        );
        assert_eq!(line.first().to_array(), [0.0, 0.0, 0.0]);
        assert_eq!(line.second().to_array(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn length_and_area() {
        let line = Line::from_points([pt(0.0, 0.0, 0.0), pt(3.0, 4.0, 0.0)]).unwrap();
        assert!((line.length() - 5.0).abs() < 1e-12);
        let face = Face::from_points(tri()).unwrap();
        assert!((face.area() - 6.0).abs() < 1e-12);
        assert!((face.perimeter() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_face_has_zero_area() {
        let face =
            Face::from_points([pt(0.0, 0.0, 0.0), pt(1.0, 1.0, 1.0), pt(3.0, 3.0, 3.0)]).unwrap();
        let area = face.area();
        assert!(!area.is_nan());
        assert!(area.abs() < 1e-6);
    }

    #[test]
    fn text_form_has_label() {
        let line = Line::from_points([pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)]).unwrap();
        assert_eq!(line.to_string(), "Line [ [ 0 0 0 ] [ 1 0 0 ] ]");
        assert_eq!(line.vertices().to_string(), "[ [ 0 0 0 ] [ 1 0 0 ] ]");
        let face = Face::from_points(tri()).unwrap();
        assert!(face.to_string().starts_with("Face [ [ 0 0 0 ]"));
    }
}
