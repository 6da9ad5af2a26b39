//! Line-oriented text format for models (`.obj` files).
//!
//! Records
//! - `# ...`        comment, ignored (blank lines are ignored too)
//! - `g <name>`     model name (remainder of the line, trimmed)
//! - `v x y z`      one point; points are numbered 1, 2, ... in order
//! - `l i j`        line between the i-th and j-th declared points
//! - `f i j k`      face over three declared points
//!
//! Any other leading token is a format error. A `v` record carries exactly
//! `N` coordinates (three for the usual 3D model).
//!
//! Identity
//! - The reader hands every element the same `SharedPoint` for the same
//!   vertex number, so `Model::collect_points` sees shared vertices once.
//! - The writer numbers points by their first-seen position in
//!   `collect_points` and writes 1-based indices.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::element::Element;
use crate::error::GeomError;
use crate::model::Model;
use crate::point::{Point, SharedPoint};

/// File extension accepted by `import` and `export` (without the dot).
pub const EXTENSION: &str = "obj";

#[derive(Debug)]
pub enum ObjError {
    /// Path does not end in `.obj`.
    Extension(PathBuf),
    /// File could not be opened or created.
    Open { path: PathBuf, source: io::Error },
    /// Read or write failure after opening.
    Io(io::Error),
    /// Malformed record; `line` is 1-based.
    Format { line: usize, message: String },
    /// Record is well-formed but describes an invalid element.
    Geometry { line: usize, source: GeomError },
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::Extension(path) => {
                write!(
                    f,
                    "invalid file extension: {} (expected .{})",
                    path.display(),
                    EXTENSION
                )
            }
            ObjError::Open { path, .. } => write!(f, "cannot open file {}", path.display()),
            ObjError::Io(err) => write!(f, "i/o error: {err}"),
            ObjError::Format { line, message } => write!(f, "line {line}: {message}"),
            ObjError::Geometry { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for ObjError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ObjError::Open { source, .. } => Some(source),
            ObjError::Io(err) => Some(err),
            ObjError::Geometry { source, .. } => Some(source),
            ObjError::Extension(_) | ObjError::Format { .. } => None,
        }
    }
}

impl From<io::Error> for ObjError {
    fn from(err: io::Error) -> Self {
        ObjError::Io(err)
    }
}

pub fn has_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EXTENSION)
}

fn check_extension(path: &Path) -> Result<(), ObjError> {
    if has_extension(path) {
        Ok(())
    } else {
        Err(ObjError::Extension(path.to_path_buf()))
    }
}

/// Read a model from an `.obj` file.
pub fn import<const N: usize>(path: impl AsRef<Path>) -> Result<Model<N>, ObjError> {
    let path = path.as_ref();
    check_extension(path)?;
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let model = read_model(BufReader::new(file))?;
    info!(
        path = %path.display(),
        lines = model.lines().len(),
        faces = model.faces().len(),
        "imported model"
    );
    Ok(model)
}

/// Write a model to an `.obj` file, truncating any existing content.
pub fn export<const N: usize>(path: impl AsRef<Path>, model: &Model<N>) -> Result<(), ObjError> {
    let path = path.as_ref();
    check_extension(path)?;
    let file = File::create(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    write_model(model, BufWriter::new(file))?;
    info!(path = %path.display(), name = model.name(), "exported model");
    Ok(())
}

/// Parse records into a fresh model. Elements go through the unchecked
/// append path; only per-element point distinctness is enforced.
pub fn read_model<const N: usize, R: BufRead>(reader: R) -> Result<Model<N>, ObjError> {
    let mut model = Model::default();
    let mut points: Vec<SharedPoint<N>> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let (kind, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        match kind {
            "g" => model.set_name(rest.trim()),
            "v" => {
                let coords: [f64; N] = parse_fields(rest, lineno)?;
                points.push(Arc::new(Point::new(coords)));
            }
            "l" => model.add_line_unchecked(element(rest, &points, lineno)?),
            "f" => model.add_face_unchecked(element(rest, &points, lineno)?),
            other => {
                return Err(ObjError::Format {
                    line: lineno,
                    message: format!("unknown record kind '{other}'"),
                })
            }
        }
    }
    debug!(
        points = points.len(),
        lines = model.lines().len(),
        faces = model.faces().len(),
        "parsed records"
    );
    Ok(model)
}

/// Serialize `model`: header comment, name, points, then lines and faces.
pub fn write_model<const N: usize, W: Write>(model: &Model<N>, mut writer: W) -> Result<(), ObjError> {
    let points = model.collect_points();
    let numbering: HashMap<*const Point<N>, usize> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (Arc::as_ptr(p), i + 1))
        .collect();

    writeln!(
        writer,
        "# wireframe {}: {} points, {} lines, {} faces",
        crate::VERSION,
        points.len(),
        model.lines().len(),
        model.faces().len()
    )?;
    writeln!(writer, "g {}", model.name())?;
    for p in &points {
        write!(writer, "v")?;
        for c in p.as_slice() {
            write!(writer, " {c}")?;
        }
        writeln!(writer)?;
    }
    for line in model.lines() {
        write_record(&mut writer, "l", line, &numbering)?;
    }
    for face in model.faces() {
        write_record(&mut writer, "f", face, &numbering)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_record<const N: usize, const P: usize, W: Write>(
    writer: &mut W,
    tag: &str,
    element: &Element<N, P>,
    numbering: &HashMap<*const Point<N>, usize>,
) -> io::Result<()> {
    write!(writer, "{tag}")?;
    for p in element.points() {
        // collect_points covers every vertex of every element.
        write!(writer, " {}", numbering[&Arc::as_ptr(p)])?;
    }
    writeln!(writer)
}

fn parse_fields<T, const K: usize>(rest: &str, line: usize) -> Result<[T; K], ObjError>
where
    T: FromStr + Copy + Default,
{
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() != K {
        return Err(ObjError::Format {
            line,
            message: format!("expected {} fields, found {}", K, tokens.len()),
        });
    }
    let mut out = [T::default(); K];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse().map_err(|_| ObjError::Format {
            line,
            message: format!("invalid field '{token}'"),
        })?;
    }
    Ok(out)
}

fn element<const N: usize, const P: usize>(
    rest: &str,
    points: &[SharedPoint<N>],
    line: usize,
) -> Result<Element<N, P>, ObjError> {
    let ids: [usize; P] = parse_fields(rest, line)?;
    if let Some(&bad) = ids.iter().find(|&&id| id == 0 || id > points.len()) {
        return Err(ObjError::Format {
            line,
            message: format!("vertex index {bad} outside 1..={}", points.len()),
        });
    }
    Element::new(ids.map(|id| Arc::clone(&points[id - 1])))
        .map_err(|source| ObjError::Geometry { line, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn pt(x: f64, y: f64, z: f64) -> Point<3> {
        Point::new([x, y, z])
    }

    fn parse(text: &str) -> Result<Model<3>, ObjError> {
        read_model(Cursor::new(text))
    }

    fn render(model: &Model<3>) -> String {
        let mut buf = Vec::new();
        write_model(model, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn named_line_round_trips() {
        let mut model = Model::<3>::new("demo");
        model.add_line(pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)).unwrap();
        let text = render(&model);
        assert!(text.contains("g demo\n"));
        assert!(text.contains("v 0 0 0\nv 1 0 0\n"));
        assert!(text.contains("l 1 2\n"));

        let back = parse(&text).unwrap();
        assert_eq!(back.name(), "demo");
        assert_eq!(back.lines().len(), 1);
        assert!(back.lines()[0].is_same(&model.lines()[0]));
        assert_eq!(back.lines()[0].first().to_array(), [0.0, 0.0, 0.0]);
        assert_eq!(back.lines()[0].second().to_array(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn shared_vertices_keep_identity() {
        let text = "g tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nl 1 2\nl 2 3\nf 1 2 3\n";
        let model = parse(text).unwrap();
        assert!(Arc::ptr_eq(
            model.lines()[0].second(),
            model.lines()[1].first()
        ));
        assert_eq!(model.collect_points().len(), 3);
        let again = render(&model);
        assert!(again.contains("l 1 2\nl 2 3\nf 1 2 3\n"));
        assert_eq!(again.matches("\nv ").count(), 3);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let text = "# header\n\n   \ng  spaced name  \nv 0 0 0\n# mid\nv 0 0 1\nl 2 1\n";
        let model = parse(text).unwrap();
        assert_eq!(model.name(), "spaced name");
        assert_eq!(model.lines().len(), 1);
        assert_eq!(model.lines()[0].first().to_array(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_record_reports_line_number() {
        let err = parse("v 0 0 0\nvn 0 0 1\n").unwrap_err();
        assert!(matches!(err, ObjError::Format { line: 2, .. }), "{err}");
    }

    #[test]
    fn indices_are_one_based_and_checked() {
        let zero = parse("v 0 0 0\nv 1 0 0\nl 0 1\n").unwrap_err();
        assert!(matches!(zero, ObjError::Format { line: 3, .. }));
        let past = parse("v 0 0 0\nv 1 0 0\nl 1 3\n").unwrap_err();
        assert!(matches!(past, ObjError::Format { line: 3, .. }));
        let neg = parse("v 0 0 0\nv 1 0 0\nl -1 2\n").unwrap_err();
        assert!(matches!(neg, ObjError::Format { line: 3, .. }));
    }

    #[test]
    fn wrong_field_counts_are_format_errors() {
        assert!(matches!(
            parse("v 0 0\n").unwrap_err(),
            ObjError::Format { line: 1, .. }
        ));
        assert!(matches!(
            parse("v 0 0 0\nv 1 1 1\nv 2 2 2\nf 1 2\n").unwrap_err(),
            ObjError::Format { line: 4, .. }
        ));
        assert!(matches!(
            parse("v 0 zero 0\n").unwrap_err(),
            ObjError::Format { line: 1, .. }
        ));
    }

    #[test]
    fn coincident_vertices_are_geometry_errors() {
        let err = parse("v 0 0 0\nv 0 0 0\nl 1 2\n").unwrap_err();
        assert!(matches!(
            err,
            ObjError::Geometry {
                line: 3,
                source: GeomError::IdenticalPoint
            }
        ));
    }

    #[test]
    fn two_dimensional_models_read_two_coordinates() {
        let model: Model<2> = read_model(Cursor::new("v 0 0\nv 3 4\nl 1 2\n")).unwrap();
        assert!((model.lines()[0].length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn file_round_trip_and_extension_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cube.obj");
        let mut model = Model::<3>::new("cube");
        model
            .add_face(pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0))
            .unwrap();
        export(&path, &model).unwrap();
        let back: Model<3> = import(&path).unwrap();
        assert_eq!(back.name(), "cube");
        assert!(back.faces()[0].is_same(&model.faces()[0]));

        let wrong = dir.path().join("cube.txt");
        assert!(matches!(
            export(&wrong, &model).unwrap_err(),
            ObjError::Extension(_)
        ));
        assert!(matches!(
            import::<3>(&wrong).unwrap_err(),
            ObjError::Extension(_)
        ));
        let missing = dir.path().join("missing.obj");
        assert!(matches!(
            import::<3>(&missing).unwrap_err(),
            ObjError::Open { .. }
        ));
    }
}
