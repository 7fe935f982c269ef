use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use zenfit::handler::{self, HandlerConfig, ResizeRequest};
use zenfit::store::DirStore;
use zenfit::{DEFAULT_MAX_BUFFER_BYTES, Filter, Limits, Unstoppable};

/// Fit an image from a bucket directory into a fixed canvas and store the PNG
/// next to it as `<stem>_<width>x<height>.png`.
#[derive(Parser, Debug)]
#[command(name = "zenfit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Object key of the source image inside the bucket
    filename: String,

    /// Bucket directory holding sources and results
    #[arg(short, long, env = "ZENFIT_BUCKET", default_value = ".")]
    bucket: PathBuf,

    /// Box width; 0 uses 600
    #[arg(long, env = "ZENFIT_WIDTH", default_value_t = 0)]
    width: u32,

    /// Box height; 0 uses 300
    #[arg(long, env = "ZENFIT_HEIGHT", default_value_t = 0)]
    height: u32,

    /// Resampling filter
    #[arg(long, value_enum, default_value_t = FilterArg::Nearest)]
    filter: FilterArg,

    /// Reject sources with more pixels than this
    #[arg(long, env = "ZENFIT_MAX_SOURCE_PIXELS")]
    max_source_pixels: Option<u64>,

    /// Reject boxes with more pixels than this
    #[arg(long, env = "ZENFIT_MAX_CANVAS_PIXELS")]
    max_canvas_pixels: Option<u64>,

    /// Largest single pixel buffer in bytes
    #[arg(long, env = "ZENFIT_MAX_BUFFER_BYTES", default_value_t = DEFAULT_MAX_BUFFER_BYTES)]
    max_buffer_bytes: u64,

    /// Base URL reported as the download location instead of the file path
    #[arg(long, env = "ZENFIT_BASE_URL")]
    base_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FilterArg {
    Nearest,
    Bilinear,
}

impl From<FilterArg> for Filter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::Nearest => Filter::Nearest,
            FilterArg::Bilinear => Filter::Bilinear,
        }
    }
}

fn init_subscriber(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_subscriber(args.log_json);

    let mut store = DirStore::new(&args.bucket);
    if let Some(base) = &args.base_url {
        store = store.with_base_url(base);
    }
    let config = HandlerConfig {
        filter: args.filter.into(),
        limits: Limits {
            max_source_pixels: args.max_source_pixels,
            max_canvas_pixels: args.max_canvas_pixels,
            max_buffer_bytes: Some(args.max_buffer_bytes),
            ..Limits::default()
        },
        ..Default::default()
    };
    let request = ResizeRequest {
        filename: args.filename,
        width: args.width,
        height: args.height,
    };

    tracing::debug!(
        bucket = %args.bucket.display(),
        filename = %request.filename,
        "handling request"
    );
    let response = handler::handle(&store, &request, &config, Unstoppable);

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to serialize response: {e}");
            return ExitCode::FAILURE;
        }
    }
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
