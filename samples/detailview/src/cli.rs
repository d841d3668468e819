use std::path::PathBuf;

use clap::ValueHint;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Shape {
    /// 8 shared corners
    Cube,
    /// 24 points; no point is shared between faces
    HardCube,
    Icosphere,
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,polydetail=info,detailview=info",
        env = "DETAILVIEW_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// Shape to generate
    #[arg(value_enum, default_value_t = Shape::Icosphere)]
    pub shape: Shape,
    /// Edge length of cubes, or radius of spheres
    #[arg(short, long, default_value_t = 1.0)]
    pub size: f32,
    /// Icosphere subdivision passes
    #[arg(short = 'd', long, default_value_t = 2)]
    pub subdivisions: u32,
    /// Faces meeting at less than this angle, in degrees, share smoothed normals
    #[arg(short, long, default_value_t = 60.0)]
    pub angle: f32,
    /// Write the solved mesh to this path as Wavefront OBJ
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Install a stderr subscriber with local wall-clock timestamps.
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        offset,
        time::macros::format_description!("[hour]:[minute]:[second]"),
    );
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(timer)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
    if offset.is_utc() {
        tracing::debug!("logging in UTC");
    }
}
