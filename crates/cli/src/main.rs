use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use wireframe::{obj, Controller, Model3, Statistics};

mod console;

#[derive(Parser)]
#[command(name = "wireframe", version)]
#[command(about = "Inspect and edit 3D wireframe models stored as .obj files")]
struct Cmd {
    /// Log debug details to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Interactive console; optionally load a model first
    Shell { path: Option<PathBuf> },
    /// Print model statistics
    Stats {
        path: PathBuf,
        /// Emit a JSON object instead of text
        #[arg(long)]
        json: bool,
    },
    /// List lines and faces with their lengths and areas
    List { path: PathBuf },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else if cmd.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    match cmd.action {
        Action::Shell { path } => shell(path),
        Action::Stats { path, json } => stats(&path, json),
        Action::List { path } => list(&path),
    }
}

fn shell(path: Option<PathBuf>) -> Result<()> {
    tracing::info!(path = ?path, "shell");
    let mut controller = Controller::new();
    let stdin = io::stdin();
    let mut console = console::Console::new(stdin.lock(), io::stdout());
    if let Some(path) = path {
        if !console.load(&mut controller, &path)? {
            return Ok(());
        }
    }
    console.run(&mut controller).context("console i/o")
}

fn load(path: &Path) -> Result<Model3> {
    obj::import(path).with_context(|| format!("loading {}", path.display()))
}

/// Serialized form of `stats --json`.
#[derive(Debug, Serialize)]
struct StatsReport {
    path: String,
    name: String,
    point_count: usize,
    distinct_point_count: usize,
    line_count: usize,
    total_length: f64,
    face_count: usize,
    total_area: f64,
    min_box_volume: f64,
}

impl StatsReport {
    fn new(path: &Path, name: &str, s: &Statistics) -> Self {
        Self {
            path: path.to_string_lossy().into_owned(),
            name: name.to_string(),
            point_count: s.point_count,
            distinct_point_count: s.distinct_point_count,
            line_count: s.line_count,
            total_length: s.total_length,
            face_count: s.face_count,
            total_area: s.total_area,
            min_box_volume: s.min_box_volume,
        }
    }
}

fn stats(path: &Path, json: bool) -> Result<()> {
    let model = load(path)?;
    let report = StatsReport::new(path, model.name(), &model.statistics());
    tracing::info!(
        lines = report.line_count,
        faces = report.face_count,
        "stats"
    );
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("model: {}", report.name);
        println!("points: {} ({} distinct)", report.point_count, report.distinct_point_count);
        println!("lines: {} (total length {})", report.line_count, report.total_length);
        println!("faces: {} (total area {})", report.face_count, report.total_area);
        println!("bounding box volume: {}", report.min_box_volume);
    }
    Ok(())
}

fn list(path: &Path) -> Result<()> {
    let model = load(path)?;
    for (i, line) in model.lines().iter().enumerate() {
        println!("line {}: {} length {}", i + 1, line.vertices(), line.length());
    }
    for (i, face) in model.faces().iter().enumerate() {
        println!("face {}: {} area {}", i + 1, face.vertices(), face.area());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn stats_report_serializes_all_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("box.obj");
        std::fs::write(&path, "g box\nv 0 0 0\nv 1 2 3\nv 0 1 0\nl 1 2\nf 1 2 3\n").unwrap();
        let model = load(&path).unwrap();
        let report = StatsReport::new(&path, model.name(), &model.statistics());
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["name"], "box");
        assert_eq!(v["line_count"], 1);
        assert_eq!(v["face_count"], 1);
        assert_eq!(v["point_count"], 5);
        assert_eq!(v["distinct_point_count"], 3);
        assert_eq!(v["min_box_volume"], 6.0);
    }

    #[test]
    fn load_error_carries_path_context() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.obj");
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.obj"));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cmd::try_parse_from(["wireframe", "-v", "--quiet", "list", "a.obj"]).is_err());
        let cmd = Cmd::try_parse_from(["wireframe", "stats", "a.obj", "--json"]).unwrap();
        assert!(matches!(cmd.action, Action::Stats { json: true, .. }));
    }
}
