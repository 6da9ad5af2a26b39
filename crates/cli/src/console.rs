//! Interactive console over a `Controller`.
//!
//! Input is a stream of whitespace-separated tokens, so a command and its
//! arguments may share a line or be typed one per prompt. A token that does
//! not parse as the expected number prints an error, drops the rest of that
//! input line and returns to the command prompt. End of input ends the
//! session like `exit`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use wireframe::{ControlError, Controller};

const COMMANDS: &[(&str, &str)] = &[
    ("save", "Save the model (`-` reuses the loaded path)"),
    ("list_lines", "List all lines"),
    ("list_line_points", "List points of the specified line"),
    ("add_line", "Add line"),
    ("remove_line", "Remove line"),
    ("modify_line", "Modify one point of a line"),
    ("list_faces", "List all faces"),
    ("list_face_points", "List points of the specified face"),
    ("add_face", "Add face"),
    ("remove_face", "Remove face"),
    ("modify_face", "Modify one point of a face"),
    ("statistics", "Show statistics"),
    ("help", "Show available commands"),
    ("exit", "Exit the program"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Line,
    Face,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Line => "line",
            Kind::Face => "face",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Kind::Line => "Line",
            Kind::Face => "Face",
        }
    }

    fn arity(self) -> usize {
        match self {
            Kind::Line => 2,
            Kind::Face => 3,
        }
    }
}

/// Why a command stopped reading its arguments.
enum Interrupt {
    Eof,
    Invalid(String),
    Io(io::Error),
}

impl From<io::Error> for Interrupt {
    fn from(err: io::Error) -> Self {
        Interrupt::Io(err)
    }
}

struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn next(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }

    fn discard_line(&mut self) {
        self.pending.clear();
    }
}

pub struct Console<R, W> {
    input: Tokens<R>,
    out: W,
    loaded: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input: Tokens {
                reader: input,
                pending: VecDeque::new(),
            },
            out,
            loaded: None,
        }
    }

    /// Load `path` into the controller and remember it as the default save
    /// target. Returns `false` (after printing why) when loading failed.
    pub fn load(&mut self, controller: &mut Controller, path: &Path) -> io::Result<bool> {
        match controller.load(path) {
            Ok(()) => {
                writeln!(self.out, "Successfully loaded '{}'.", path.display())?;
                self.loaded = Some(path.to_path_buf());
                Ok(true)
            }
            Err(err) => {
                let message = match err {
                    ControlError::FileExtension => "Invalid file extension.".to_string(),
                    ControlError::FileOpen => format!("Cannot open file '{}'.", path.display()),
                    ControlError::FileFormat(detail) => {
                        format!("File '{}' has invalid format: {detail}.", path.display())
                    }
                    _ => format!("File '{}' contains invalid elements.", path.display()),
                };
                writeln!(self.out, "error: {message}")?;
                Ok(false)
            }
        }
    }

    /// Run the command loop until `exit` or end of input.
    pub fn run(&mut self, controller: &mut Controller) -> io::Result<()> {
        writeln!(self.out, "wireframe {} console", wireframe::VERSION)?;
        loop {
            self.prompt("Please enter a command (use 'help' to display available commands): ")?;
            let Some(command) = self.input.next()? else {
                writeln!(self.out)?;
                return Ok(());
            };
            tracing::debug!(%command, "console command");
            let outcome = match command.as_str() {
                "exit" => return Ok(()),
                "help" => self.help().map_err(Interrupt::from),
                "save" => self.save(controller),
                "statistics" => self.statistics(controller).map_err(Interrupt::from),
                "list_lines" => self.list(controller, Kind::Line).map_err(Interrupt::from),
                "list_faces" => self.list(controller, Kind::Face).map_err(Interrupt::from),
                "list_line_points" => self.list_points(controller, Kind::Line),
                "list_face_points" => self.list_points(controller, Kind::Face),
                "add_line" => self.add(controller, Kind::Line),
                "add_face" => self.add(controller, Kind::Face),
                "remove_line" => self.remove(controller, Kind::Line),
                "remove_face" => self.remove(controller, Kind::Face),
                "modify_line" => self.modify(controller, Kind::Line),
                "modify_face" => self.modify(controller, Kind::Face),
                other => writeln!(self.out, "unknown command: {other}").map_err(Interrupt::from),
            };
            match outcome {
                Ok(()) => {}
                Err(Interrupt::Eof) => {
                    writeln!(self.out)?;
                    return Ok(());
                }
                Err(Interrupt::Invalid(token)) => {
                    self.input.discard_line();
                    writeln!(self.out, "error: invalid input '{token}'.")?;
                }
                Err(Interrupt::Io(err)) => return Err(err),
            }
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    fn token(&mut self) -> Result<String, Interrupt> {
        self.input.next()?.ok_or(Interrupt::Eof)
    }

    fn read<T: std::str::FromStr>(&mut self) -> Result<T, Interrupt> {
        let token = self.token()?;
        token.parse().map_err(|_| Interrupt::Invalid(token))
    }

    fn read_coords(&mut self) -> Result<[f64; 3], Interrupt> {
        Ok([self.read()?, self.read()?, self.read()?])
    }

    fn report(&mut self, kind: Kind, err: ControlError) -> io::Result<()> {
        match err {
            ControlError::IdOutOfBounds(id) => {
                writeln!(self.out, "error: #{id} is not a valid {} id.", kind.name())
            }
            other => writeln!(self.out, "error: {other}."),
        }
    }

    fn help(&mut self) -> io::Result<()> {
        writeln!(self.out, "Available commands:")?;
        for (name, about) in COMMANDS {
            writeln!(self.out, "  {name:<18}- {about}")?;
        }
        Ok(())
    }

    fn save(&mut self, controller: &Controller) -> Result<(), Interrupt> {
        let hint = match &self.loaded {
            Some(path) => format!("(enter '-' to use '{}')\n", path.display()),
            None => "(no file loaded; enter a path)\n".to_string(),
        };
        self.prompt(&hint)?;
        self.prompt("Save to: ")?;
        let token = self.token()?;
        let target = if token == "-" {
            match &self.loaded {
                Some(path) => path.clone(),
                None => {
                    writeln!(self.out, "error: no file loaded.")?;
                    return Ok(());
                }
            }
        } else {
            PathBuf::from(token)
        };
        match controller.save(&target) {
            Ok(()) => writeln!(self.out, "Successfully saved to '{}'.", target.display())?,
            Err(ControlError::FileExtension) => writeln!(self.out, "error: Invalid file extension.")?,
            Err(_) => writeln!(self.out, "error: Cannot open file '{}'.", target.display())?,
        }
        Ok(())
    }

    fn statistics(&mut self, controller: &Controller) -> io::Result<()> {
        let stats = controller.statistics();
        writeln!(self.out, "Statistics:")?;
        writeln!(self.out, "  Total Point Count:\t{}", stats.point_count)?;
        writeln!(self.out, "  Distinct Points:\t{}", stats.distinct_point_count)?;
        writeln!(self.out, "  Total Line Count:\t{}", stats.line_count)?;
        writeln!(self.out, "  Total Line Length:\t{}", stats.total_length)?;
        writeln!(self.out, "  Total Face Count:\t{}", stats.face_count)?;
        writeln!(self.out, "  Total Face Area:\t{}", stats.total_area)?;
        writeln!(self.out, "  Min Box Volume:\t{}", stats.min_box_volume)
    }

    /// One row per element: 1-based ID, vertices, then length or area.
    fn list(&mut self, controller: &Controller, kind: Kind) -> io::Result<()> {
        match kind {
            Kind::Line => {
                for (i, line) in controller.lines().iter().enumerate() {
                    writeln!(self.out, "Line {}: {}", i + 1, line.vertices())?;
                    writeln!(self.out, "    Length: {}", line.length())?;
                }
            }
            Kind::Face => {
                for (i, face) in controller.faces().iter().enumerate() {
                    writeln!(self.out, "Face {}: {}", i + 1, face.vertices())?;
                    writeln!(self.out, "    Area: {}", face.area())?;
                }
            }
        }
        Ok(())
    }

    fn choose(&mut self, controller: &Controller, kind: Kind, verb: &str) -> Result<usize, Interrupt> {
        writeln!(self.out, "Select a {} to {verb}", kind.name())?;
        let rows: Vec<String> = match kind {
            Kind::Line => controller.lines().iter().map(|l| l.vertices().to_string()).collect(),
            Kind::Face => controller.faces().iter().map(|f| f.vertices().to_string()).collect(),
        };
        for (i, row) in rows.iter().enumerate() {
            writeln!(self.out, "{} {}: {row}", kind.title(), i + 1)?;
        }
        self.prompt("Your choice: ")?;
        self.read()
    }

    fn list_points(&mut self, controller: &Controller, kind: Kind) -> Result<(), Interrupt> {
        let id = self.choose(controller, kind, "inspect")?;
        let points = match kind {
            Kind::Line => controller.line_points(id),
            Kind::Face => controller.face_points(id),
        };
        match points {
            Ok(points) => {
                writeln!(self.out, "Points in {} #{id}:", kind.name())?;
                for (i, p) in points.iter().enumerate() {
                    writeln!(self.out, "  #{} {p}", i + 1)?;
                }
            }
            Err(err) => self.report(kind, err)?,
        }
        Ok(())
    }

    fn add(&mut self, controller: &mut Controller, kind: Kind) -> Result<(), Interrupt> {
        let result = match kind {
            Kind::Line => {
                self.prompt("Enter 2 points' coordinates x1 y1 z1 x2 y2 z2: ")?;
                let (a, b) = (self.read_coords()?, self.read_coords()?);
                controller.add_line(a, b)
            }
            Kind::Face => {
                self.prompt("Enter 3 points' coordinates x1 y1 z1 x2 y2 z2 x3 y3 z3: ")?;
                let (a, b, c) = (self.read_coords()?, self.read_coords()?, self.read_coords()?);
                controller.add_face(a, b, c)
            }
        };
        match result {
            Ok(id) => writeln!(self.out, "Successfully created {} #{id}.", kind.name())?,
            Err(err) => self.report(kind, err)?,
        }
        Ok(())
    }

    fn remove(&mut self, controller: &mut Controller, kind: Kind) -> Result<(), Interrupt> {
        let id = self.choose(controller, kind, "remove")?;
        let result = match kind {
            Kind::Line => controller.remove_line(id),
            Kind::Face => controller.remove_face(id),
        };
        match result {
            Ok(()) => writeln!(self.out, "Successfully removed {} #{id}.", kind.name())?,
            Err(err) => self.report(kind, err)?,
        }
        Ok(())
    }

    fn modify(&mut self, controller: &mut Controller, kind: Kind) -> Result<(), Interrupt> {
        let id = self.choose(controller, kind, "modify")?;
        self.prompt(&format!("Point index [1~{}]: ", kind.arity()))?;
        let point_id: usize = self.read()?;
        self.prompt("Coordinates x y z: ")?;
        let coords = self.read_coords()?;
        let result = match kind {
            Kind::Line => controller.modify_line(id, point_id, coords),
            Kind::Face => controller.modify_face(id, point_id, coords),
        };
        match result {
            Ok(()) => writeln!(self.out, "Successfully modified {} #{id}.", kind.name())?,
            Err(err) => self.report(kind, err)?,
        }
        Ok(())
    }
}
