//! Mesh the superquadrics of a scene file and export them
//!
//! ```text
//! superquad nodes.json --output-dir meshes --format obj --world
//! ```
//!
//! Set `RUST_LOG=debug` to see per-shape grid sizes.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use superquad_io::{read_scene, write_mesh, MeshFormat, SceneObject};
use superquad_mesher::{MesherConfig, ParallelConfig, SceneGeometry, SuperquadricMesher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ply,
    Obj,
}

impl From<OutputFormat> for MeshFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Ply => MeshFormat::Ply,
            OutputFormat::Obj => MeshFormat::Obj,
        }
    }
}

/// Superquadric scene mesher
#[derive(Debug, Parser)]
#[command(name = "superquad")]
#[command(about = "Mesh the superquadrics of a scene description", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene description (nodes.json)
    scene: PathBuf,

    /// Directory the meshes are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output mesh format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ply)]
    format: OutputFormat,

    /// Apply each shape's rotation and translation before writing
    #[arg(long)]
    world: bool,

    /// Also mesh elements marked invisible
    #[arg(long)]
    include_hidden: bool,

    /// Mesh shapes one after another
    #[arg(long)]
    sequential: bool,

    /// Size of the worker pool
    #[arg(long)]
    threads: Option<usize>,

    /// Skip the curvature subdivision pass
    #[arg(long)]
    no_subdivision: bool,
}

/// File stem for an element name: anything outside `[A-Za-z0-9._-]` becomes `_`
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "shape".to_string()
    } else {
        cleaned.to_string()
    }
}

fn parallel_config(cli: &Cli) -> ParallelConfig {
    let config = ParallelConfig::default().with_enabled(!cli.sequential);
    match cli.threads {
        Some(threads) => config.with_threads(threads),
        None => config,
    }
}

fn export(object: &SceneObject, cli: &Cli, output_dir: &Path) -> Result<Option<PathBuf>> {
    let SceneGeometry::Procedural(sq) = &object.geometry else {
        let mesh = object.geometry.triangle_mesh();
        log::info!(
            "mesh '{}': {} vertices, {} triangles",
            object.name,
            mesh.vertex_count(),
            mesh.face_count()
        );
        return Ok(None);
    };

    let mesh = if cli.world { sq.to_world() } else { sq.mesh.clone() };
    let format = MeshFormat::from(cli.format);
    let path = output_dir.join(format!("{}.{}", sanitize_name(&object.name), format.extension()));

    write_mesh(&mesh, &path).with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "superquadric '{}': {} triangles -> {}",
        object.name,
        mesh.face_count(),
        path.display()
    );
    Ok(Some(path))
}

fn run(cli: &Cli) -> Result<Vec<PathBuf>> {
    let scene = read_scene(&cli.scene)
        .with_context(|| format!("reading scene {}", cli.scene.display()))?;
    let base_dir = cli.scene.parent().unwrap_or_else(|| Path::new("."));

    let config = MesherConfig::default().with_subdivision(!cli.no_subdivision);
    let mesher = SuperquadricMesher::new(config);
    let objects = scene
        .build(&mesher, &parallel_config(cli), base_dir, cli.include_hidden)
        .context("building scene geometry")?;

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("creating {}", cli.output_dir.display()))?;

    let mut written = Vec::new();
    for object in &objects {
        if let Some(path) = export(object, cli, &cli.output_dir)? {
            written.push(path);
        }
    }
    Ok(written)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let written = run(&cli)?;
    if written.is_empty() {
        log::warn!("no superquadrics found in {}", cli.scene.display());
    }
    println!("wrote {} mesh file(s) to {}", written.len(), cli.output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Superquadric;1"), "Superquadric_1");
        assert_eq!(sanitize_name("a/b c"), "a_b_c");
        assert_eq!(sanitize_name("shape-2.v1"), "shape-2.v1");
        assert_eq!(sanitize_name("..."), "shape");
        assert_eq!(sanitize_name(""), "shape");
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "superquad",
            "nodes.json",
            "--format",
            "obj",
            "--threads",
            "2",
            "--world",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Obj);
        assert!(cli.world);
        assert_eq!(parallel_config(&cli).num_threads, Some(2));
        assert!(parallel_config(&cli).enabled);

        let cli = Cli::try_parse_from(["superquad", "nodes.json", "--sequential"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Ply);
        assert!(!parallel_config(&cli).enabled);
    }

    #[test]
    fn test_run_writes_one_file_per_shape() {
        let dir = tempfile::tempdir().unwrap();
        let scene = dir.path().join("nodes.json");
        fs::write(
            &scene,
            r#"{
                "Shape;1": {"type": "superquadric", "scalings": [1, 1, 1],
                            "exponents": [1, 1, 1], "resolution": 12},
                "Shape;2": {"type": "superquadric", "scalings": [1, 2, 1],
                            "exponents": [0.5, 0.5, 0.5], "resolution": 12,
                            "translation": [0, 0, 4]},
                "Label": {"type": "labels"}
            }"#,
        )
        .unwrap();
        let out = dir.path().join("out");
        let cli = Cli::try_parse_from([
            "superquad",
            scene.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
            "--format",
            "obj",
            "--world",
        ])
        .unwrap();

        let written = run(&cli).unwrap();
        assert_eq!(written, vec![out.join("Shape_1.obj"), out.join("Shape_2.obj")]);

        let placed = superquad_io::read_mesh(&written[1]).unwrap();
        assert!(placed.vertices.iter().all(|p| p.z > 2.5));
    }
}
