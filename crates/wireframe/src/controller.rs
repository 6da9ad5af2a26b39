//! 1-based ID facade over a 3D model, used by interactive front ends.
//!
//! The controller owns one `Model<3>` and is constructed explicitly by the
//! program entry point; there is no global instance. Line, face and point IDs
//! are 1-based here and translated to the model's 0-based indices. Failures
//! are reported as `ControlError`, one variant per outcome a front end shows.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::GeomError;
use crate::model::Statistics;
use crate::obj::{self, ObjError};
use crate::point::{Point, SharedPoint};
use crate::{Face3, Line3, Model3};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlError {
    FileExtension,
    FileOpen,
    FileFormat(String),
    /// Line or face ID is 0 or past the end.
    IdOutOfBounds(usize),
    IdenticalPoints,
    IdenticalElements,
    /// Point ID outside `1..=P` for the addressed element.
    PointIndex(usize),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::FileExtension => write!(f, "invalid file extension"),
            ControlError::FileOpen => write!(f, "cannot open file"),
            ControlError::FileFormat(detail) => write!(f, "invalid file format ({detail})"),
            ControlError::IdOutOfBounds(id) => write!(f, "#{id} is not a valid id"),
            ControlError::IdenticalPoints => write!(f, "identical points within element"),
            ControlError::IdenticalElements => write!(f, "identical elements within model"),
            ControlError::PointIndex(id) => write!(f, "invalid point index '{id}'"),
        }
    }
}

impl std::error::Error for ControlError {}

impl From<GeomError> for ControlError {
    fn from(err: GeomError) -> Self {
        match err {
            GeomError::IndexOutOfBounds { index, .. } => ControlError::IdOutOfBounds(index + 1),
            GeomError::IdenticalPoint => ControlError::IdenticalPoints,
            GeomError::IdenticalElement => ControlError::IdenticalElements,
        }
    }
}

impl From<ObjError> for ControlError {
    fn from(err: ObjError) -> Self {
        match err {
            ObjError::Extension(_) => ControlError::FileExtension,
            ObjError::Open { .. } | ObjError::Io(_) => ControlError::FileOpen,
            ObjError::Format { .. } => ControlError::FileFormat(err.to_string()),
            ObjError::Geometry { .. } => ControlError::IdenticalPoints,
        }
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    model: Model3,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: Model3) -> Self {
        Self { model }
    }

    #[inline]
    pub fn model(&self) -> &Model3 {
        &self.model
    }

    pub fn into_model(self) -> Model3 {
        self.model
    }

    /// Replace the model with the file's content. On failure the current
    /// model is kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ControlError> {
        let path = path.as_ref();
        let model = obj::import(path).map_err(|err| {
            warn!(path = %path.display(), %err, "load failed");
            ControlError::from(err)
        })?;
        self.model = model;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ControlError> {
        let path = path.as_ref();
        obj::export(path, &self.model).map_err(|err| {
            warn!(path = %path.display(), %err, "save failed");
            ControlError::from(err)
        })
    }

    #[inline]
    pub fn lines(&self) -> &[Line3] {
        self.model.lines()
    }

    #[inline]
    pub fn faces(&self) -> &[Face3] {
        self.model.faces()
    }

    pub fn line_points(&self, id: usize) -> Result<Vec<SharedPoint<3>>, ControlError> {
        let index = to_index(id, self.model.lines().len())?;
        Ok(self.model.lines()[index].points_vec())
    }

    pub fn face_points(&self, id: usize) -> Result<Vec<SharedPoint<3>>, ControlError> {
        let index = to_index(id, self.model.faces().len())?;
        Ok(self.model.faces()[index].points_vec())
    }

    pub fn remove_line(&mut self, id: usize) -> Result<(), ControlError> {
        if id == 0 || !self.model.remove_line(id - 1) {
            return Err(ControlError::IdOutOfBounds(id));
        }
        debug!(id, "removed line");
        Ok(())
    }

    pub fn remove_face(&mut self, id: usize) -> Result<(), ControlError> {
        if id == 0 || !self.model.remove_face(id - 1) {
            return Err(ControlError::IdOutOfBounds(id));
        }
        debug!(id, "removed face");
        Ok(())
    }

    /// Returns the new line's ID.
    pub fn add_line(&mut self, first: [f64; 3], second: [f64; 3]) -> Result<usize, ControlError> {
        let index = self.model.add_line(Point::new(first), Point::new(second))?;
        debug!(id = index + 1, "added line");
        Ok(index + 1)
    }

    /// Returns the new face's ID.
    pub fn add_face(
        &mut self,
        first: [f64; 3],
        second: [f64; 3],
        third: [f64; 3],
    ) -> Result<usize, ControlError> {
        let index =
            self.model
                .add_face(Point::new(first), Point::new(second), Point::new(third))?;
        debug!(id = index + 1, "added face");
        Ok(index + 1)
    }

    pub fn modify_line(
        &mut self,
        id: usize,
        point_id: usize,
        coords: [f64; 3],
    ) -> Result<(), ControlError> {
        let index = to_index(id, self.model.lines().len())?;
        let slot = to_slot(point_id)?;
        self.model
            .modify_line(index, slot, Point::new(coords))
            .map_err(|err| point_error(err, point_id))
    }

    pub fn modify_face(
        &mut self,
        id: usize,
        point_id: usize,
        coords: [f64; 3],
    ) -> Result<(), ControlError> {
        let index = to_index(id, self.model.faces().len())?;
        let slot = to_slot(point_id)?;
        self.model
            .modify_face(index, slot, Point::new(coords))
            .map_err(|err| point_error(err, point_id))
    }

    pub fn statistics(&self) -> Statistics {
        self.model.statistics()
    }
}

fn to_index(id: usize, len: usize) -> Result<usize, ControlError> {
    if id == 0 || id > len {
        Err(ControlError::IdOutOfBounds(id))
    } else {
        Ok(id - 1)
    }
}

fn to_slot(point_id: usize) -> Result<usize, ControlError> {
    point_id
        .checked_sub(1)
        .ok_or(ControlError::PointIndex(point_id))
}

// The element index was validated up front, so a remaining bounds error
// can only come from the point slot.
fn point_error(err: GeomError, point_id: usize) -> ControlError {
    match err {
        GeomError::IndexOutOfBounds { .. } => ControlError::PointIndex(point_id),
        other => other.into(),
    }
}
