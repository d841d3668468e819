use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::Arc,
};

use clap::Parser;
use cli::{Cli, Shape};
use parking_lot::Mutex;
use polydetail::{
    error::{ExportError, GenerateError},
    export::TriangleMesh,
    generate::{self, CubeOptions},
    GeometryStore, JobHandle, NormalSolver,
};

mod cli;

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("couldn't start a job: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("couldn't write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

type ObjWriter = BufWriter<File>;

fn write_obj(mesh: &TriangleMesh, mut out: ObjWriter) -> std::io::Result<()> {
    for p in &mesh.positions {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in &mesh.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    // OBJ indices are 1-based
    for [a, b, c] in mesh.triangles().map(|t| t.map(|i| i + 1)) {
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    out.flush()
}

/// Create the output file on a worker thread while the shape is built.
fn open_output(
    path: &Path,
) -> Result<(JobHandle, Arc<Mutex<Option<std::io::Result<ObjWriter>>>>), Error> {
    let slot = Arc::new(Mutex::new(None));
    let job = {
        let slot = slot.clone();
        let path = path.to_owned();
        JobHandle::spawn(JobHandle::completed(), move || {
            let res = File::create(&path).map(BufWriter::new);
            tracing::debug!(path = %path.display(), ok = res.is_ok(), "opened output");
            *slot.lock() = Some(res);
        })
        .map_err(Error::Spawn)?
    };
    Ok((job, slot))
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Write {
        path: path.display().to_string(),
        source,
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let output = cli.output.as_deref().map(open_output).transpose()?;
    let dependency = output
        .as_ref()
        .map_or_else(JobHandle::completed, |(job, _)| job.clone());

    let mut store = GeometryStore::<u32>::new(64);
    match cli.shape {
        Shape::Cube | Shape::HardCube => generate::cube(
            &mut store,
            cli.size,
            CubeOptions {
                normals: false,
                hard_edges: cli.shape == Shape::HardCube,
            },
        )?,
        Shape::Icosphere => generate::icosphere(&mut store, cli.size, cli.subdivisions)?,
    }
    tracing::info!(
        shape = ?cli.shape,
        points = store.point_count(),
        vertices = store.vertex_count(),
        primitives = store.primitive_count(),
        "generated"
    );

    // solving waits for the output file to be ready
    NormalSolver::from_degrees(cli.angle)
        .schedule(&mut store, dependency)
        .complete();

    let mesh = TriangleMesh::from_store(&store)?;
    tracing::info!(
        corners = mesh.positions.len(),
        triangles = mesh.triangle_count(),
        "exported"
    );

    if let (Some((_, slot)), Some(path)) = (output, &cli.output) {
        let opened = slot.lock().take().unwrap_or_else(|| {
            Err(std::io::Error::other("output job finished without a result"))
        });
        opened
            .and_then(|out| write_obj(&mesh, out))
            .map_err(write_error(path))?;
        tracing::info!(path = %path.display(), "wrote mesh");
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.log_filter, cli.log_format);
    tracing::debug!("{cli:?}");

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
