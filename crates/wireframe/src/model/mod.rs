//! Model container: ordered lines and faces with uniqueness rules.
//!
//! Invariants
//! - No two lines are `is_same`; no two faces are `is_same`. Checked on the
//!   validated insert path and on modification (O(n) scan of the same
//!   collection). The unchecked append path trusts its caller (the importer).
//! - Elements are owned by value; callers only ever see borrowed views, so
//!   `clear` cannot leave dangling element handles behind.
//!
//! Conventions
//! - Indices here are 0-based. The 1-based ID translation lives in
//!   `controller`.
//! - Modification validates before mutating: a rejected `modify_*` call
//!   leaves the model untouched.

use std::collections::HashSet;
use std::sync::Arc;

use crate::element::{Element, Face, Line};
use crate::error::GeomError;
use crate::point::{Point, SharedPoint};

/// Named collection of lines and faces in R^N.
#[derive(Debug, Default)]
pub struct Model<const N: usize> {
    name: String,
    lines: Vec<Line<N>>,
    faces: Vec<Face<N>>,
}

/// Aggregate figures over a model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    /// Vertex slots (2 per line, 3 per face); shared vertices count each time.
    pub point_count: usize,
    /// Distinct point instances, as returned by `collect_points`.
    pub distinct_point_count: usize,
    pub line_count: usize,
    pub total_length: f64,
    pub face_count: usize,
    pub total_area: f64,
    pub min_box_volume: f64,
}

impl<const N: usize> Model<N> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
            faces: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn lines(&self) -> &[Line<N>] {
        &self.lines
    }

    #[inline]
    pub fn faces(&self) -> &[Face<N>] {
        &self.faces
    }

    pub fn line(&self, index: usize) -> Result<&Line<N>, GeomError> {
        GeomError::check_index(index, self.lines.len())?;
        Ok(&self.lines[index])
    }

    pub fn face(&self, index: usize) -> Result<&Face<N>, GeomError> {
        GeomError::check_index(index, self.faces.len())?;
        Ok(&self.faces[index])
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.faces.is_empty()
    }

    /// Validated insert; returns the index of the new line.
    pub fn add_line(&mut self, first: Point<N>, second: Point<N>) -> Result<usize, GeomError> {
        add_checked(&mut self.lines, [first, second])
    }

    /// Validated insert; returns the index of the new face.
    pub fn add_face(
        &mut self,
        first: Point<N>,
        second: Point<N>,
        third: Point<N>,
    ) -> Result<usize, GeomError> {
        add_checked(&mut self.faces, [first, second, third])
    }

    /// Append without the uniqueness scan. Trusted bulk-load path only.
    pub fn add_line_unchecked(&mut self, line: Line<N>) {
        self.lines.push(line);
    }

    /// Append without the uniqueness scan. Trusted bulk-load path only.
    pub fn add_face_unchecked(&mut self, face: Face<N>) {
        self.faces.push(face);
    }

    pub fn modify_line(
        &mut self,
        index: usize,
        slot: usize,
        point: Point<N>,
    ) -> Result<(), GeomError> {
        modify_checked(&mut self.lines, index, slot, point)
    }

    pub fn modify_face(
        &mut self,
        index: usize,
        slot: usize,
        point: Point<N>,
    ) -> Result<(), GeomError> {
        modify_checked(&mut self.faces, index, slot, point)
    }

    /// `false` if `index` is out of range (nothing removed).
    pub fn remove_line(&mut self, index: usize) -> bool {
        if index >= self.lines.len() {
            return false;
        }
        self.lines.remove(index);
        true
    }

    /// `false` if `index` is out of range (nothing removed).
    pub fn remove_face(&mut self, index: usize) -> bool {
        if index >= self.faces.len() {
            return false;
        }
        self.faces.remove(index);
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.faces.clear();
    }

    /// Distinct point instances referenced by any line or face.
    ///
    /// Dedup is by identity (`Arc::ptr_eq`), not by coordinates. Order is
    /// first-seen: lines in order, then faces, each in slot order.
    pub fn collect_points(&self) -> Vec<SharedPoint<N>> {
        let mut seen: HashSet<*const Point<N>> = HashSet::new();
        let mut out = Vec::new();
        let vertices = self
            .lines
            .iter()
            .flat_map(|l| l.points().iter())
            .chain(self.faces.iter().flat_map(|f| f.points().iter()));
        for p in vertices {
            if seen.insert(Arc::as_ptr(p)) {
                out.push(Arc::clone(p));
            }
        }
        out
    }

    /// Per-axis (min, max) corners over `collect_points`; `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point<N>, Point<N>)> {
        let points = self.collect_points();
        let (head, rest) = points.split_first()?;
        let mut lo = *head.vector();
        let mut hi = lo;
        for p in rest {
            lo = lo.inf(p.vector());
            hi = hi.sup(p.vector());
        }
        Some((Point::from_vector(lo), Point::from_vector(hi)))
    }

    /// Product of the bounding box extents; 0 for a model without points.
    pub fn min_box_volume(&self) -> f64 {
        match self.bounding_box() {
            Some((lo, hi)) => (hi.vector() - lo.vector()).product(),
            None => 0.0,
        }
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            point_count: self.lines.len() * 2 + self.faces.len() * 3,
            distinct_point_count: self.collect_points().len(),
            line_count: self.lines.len(),
            total_length: self.lines.iter().map(|l| l.length()).sum(),
            face_count: self.faces.len(),
            total_area: self.faces.iter().map(|f| f.area()).sum(),
            min_box_volume: self.min_box_volume(),
        }
    }
}

fn add_checked<const N: usize, const P: usize>(
    items: &mut Vec<Element<N, P>>,
    points: [Point<N>; P],
) -> Result<usize, GeomError> {
    if !Element::<N, P>::all_distinct(&points) {
        return Err(GeomError::IdenticalPoint);
    }
    if items.iter().any(|e| e.is_same_points(&points)) {
        return Err(GeomError::IdenticalElement);
    }
    items.push(Element::from_points(points)?);
    Ok(items.len() - 1)
}

fn modify_checked<const N: usize, const P: usize>(
    items: &mut [Element<N, P>],
    index: usize,
    slot: usize,
    point: Point<N>,
) -> Result<(), GeomError> {
    GeomError::check_index(index, items.len())?;
    let mut candidate = items[index].clone();
    candidate.change_point(slot, point)?;
    let clash = items
        .iter()
        .enumerate()
        .any(|(i, e)| i != index && e.is_same(&candidate));
    if clash {
        return Err(GeomError::IdenticalElement);
    }
    items[index] = candidate;
    Ok(())
}
