use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};

use triface_core::pipeline::capabilities::check_capabilities;
use triface_core::recording::domain::animation_assembler::AnimationAssembler;
use triface_core::recording::infrastructure::assembler_factory::create_assembler;
use triface_core::shared::constants::{DEFAULT_FRAME_DELAY_CS, DEFAULT_TILE_SIZE, IMAGE_EXTENSIONS};
use triface_core::shared::options::{
    default_temp_dir, DetectionMode, InputSource, MergeTool, RunOptions,
};

/// Detects faces in a camera stream or image and triangulizes them.
#[derive(Parser, Debug)]
#[command(name = "triface", version)]
struct Cli {
    /// Camera index (digits only) or path to an image.
    input: String,

    /// Haar cascade XML file [default: the system OpenCV frontal-face
    /// cascade, downloaded when missing].
    #[arg(short, long, value_name = "FILE")]
    cascade: Option<PathBuf>,

    /// Triangle tile size in pixels (0 = pick from the face size).
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    tile_size: u32,

    /// Animated output for camera input, image output for still input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Triangulize every detected face instead of only the largest.
    #[arg(long)]
    all_faces: bool,

    /// Directory for recorded frames [default: <system temp>/triface-frames].
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Tool that merges recorded frames: imagemagick or ffmpeg.
    #[arg(long, default_value = "imagemagick")]
    merge_tool: String,

    /// Delay between animation frames in 1/100 s.
    #[arg(long, default_value_t = DEFAULT_FRAME_DELAY_CS)]
    frame_delay: u32,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and go to stdout
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let input = match InputSource::parse(&cli.input) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {e}\n\n{}", Cli::command().render_usage());
            process::exit(1);
        }
    };

    if let Err(e) = run(cli, input) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli, input: InputSource) -> Result<(), Box<dyn std::error::Error>> {
    validate(&cli, &input)?;
    let options = to_options(cli, input)?;
    log_startup(&options);

    let assembler = options
        .records_frames()
        .then(|| create_assembler(options.merge_tool, options.frame_delay_cs));
    check_capabilities(&options, assembler.as_deref())?;

    run_session(options, assembler)
}

#[cfg(feature = "opencv")]
fn run_session(
    options: RunOptions,
    assembler: Option<Box<dyn AnimationAssembler>>,
) -> Result<(), Box<dyn std::error::Error>> {
    use triface_core::detection::domain::cascade_classifier::CascadeParams;
    use triface_core::detection::domain::cascade_face_detector::CascadeFaceDetector;
    use triface_core::detection::infrastructure::opencv_cascade_classifier::OpencvCascadeClassifier;
    use triface_core::detection::infrastructure::opencv_preprocessor::OpencvPreprocessor;
    use triface_core::effect::infrastructure::region_filter_effect::RegionFilterEffect;
    use triface_core::effect::infrastructure::triangulizor::Triangulizor;
    use triface_core::pipeline::frame_processor::FrameProcessor;
    use triface_core::pipeline::pipeline_logger::StdoutPipelineLogger;
    use triface_core::pipeline::session::TrifaceSession;
    use triface_core::pipeline::triangulate_image_use_case::TriangulateImageUseCase;
    use triface_core::pipeline::triangulate_stream_use_case::{
        FrameRecording, TriangulateStreamUseCase,
    };
    use triface_core::presentation::infrastructure::highgui_presenter::HighguiPresenter;
    use triface_core::shared::constants::{IMAGE_SCALE, WINDOW_NAME};
    use triface_core::shared::model_resolver::resolve_cascade;
    use triface_core::video::infrastructure::image_file_source::ImageFileSource;
    use triface_core::video::infrastructure::image_file_writer::ImageFileWriter;
    use triface_core::video::infrastructure::opencv_camera_source::OpencvCameraSource;

    let cascade = resolve_cascade(
        options.cascade_path(),
        options.uses_default_cascade(),
        Some(Box::new(download_progress)),
    )?;
    log::info!("Using cascade {}", cascade.display());
    let classifier = OpencvCascadeClassifier::load(&cascade)?;

    let detector = CascadeFaceDetector::new(
        Box::new(OpencvPreprocessor::new(IMAGE_SCALE)),
        Box::new(classifier),
        CascadeParams::with_mode(options.detection_mode),
    );
    let effect = RegionFilterEffect::new(Box::new(Triangulizor::new()), options.tile_size);
    let processor = FrameProcessor::new(Box::new(detector), Box::new(effect));
    let logger = Box::new(StdoutPipelineLogger::default());

    let input = options.input.clone();
    let mut session = TrifaceSession::new(options);
    match input {
        InputSource::Image(path) => {
            let source = ImageFileSource::open(&path)?;
            let presenter = HighguiPresenter::new(WINDOW_NAME)?;
            let mut use_case = TriangulateImageUseCase::new(
                Box::new(source),
                processor,
                Box::new(presenter),
                Box::new(ImageFileWriter::new()),
                logger,
            );
            use_case.execute(&mut session)
        }
        InputSource::Camera(index) => {
            let source = OpencvCameraSource::open(index)?;
            let presenter = HighguiPresenter::new(WINDOW_NAME)?;
            let mut use_case =
                TriangulateStreamUseCase::new(Box::new(source), processor, Box::new(presenter), logger);
            if let Some(assembler) = assembler {
                use_case = use_case.with_recording(FrameRecording {
                    writer: Box::new(ImageFileWriter::new()),
                    assembler,
                });
            }
            use_case.execute(&mut session)
        }
    }
}

#[cfg(not(feature = "opencv"))]
fn run_session(
    _options: RunOptions,
    _assembler: Option<Box<dyn AnimationAssembler>>,
) -> Result<(), Box<dyn std::error::Error>> {
    use triface_core::shared::error::TrifaceError;
    Err(TrifaceError::DependencyMissing("opencv".into()).into())
}

fn validate(cli: &Cli, input: &InputSource) -> Result<(), Box<dyn std::error::Error>> {
    parse_merge_tool(&cli.merge_tool)?;
    if cli.frame_delay == 0 {
        return Err("Frame delay must be at least 1 (1/100 s)".into());
    }
    if let (InputSource::Image(_), Some(output)) = (input, &cli.output) {
        if !is_image(output) {
            return Err(format!(
                "Output for an image input must be an image file ({}), got {}",
                IMAGE_EXTENSIONS.join(", "),
                output.display()
            )
            .into());
        }
    }
    if let Some(output) = &cli.output {
        if output.is_dir() {
            return Err(format!("Output is a directory: {}", output.display()).into());
        }
        if input.is_camera() {
            let temp_dir = cli.temp_dir.clone().unwrap_or_else(default_temp_dir);
            if resolve_path(output).starts_with(resolve_path(&temp_dir)) {
                return Err(format!(
                    "Output {} must not be inside the frame directory {}",
                    output.display(),
                    temp_dir.display()
                )
                .into());
            }
        }
    }
    Ok(())
}

/// Absolute form of `path`, following symlinks through the longest
/// existing ancestor.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            resolve_path(parent).join(name)
        }
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

fn to_options(cli: Cli, input: InputSource) -> Result<RunOptions, Box<dyn std::error::Error>> {
    let mut options = RunOptions::new(input);
    options.cascade_path = cli.cascade;
    options.tile_size = cli.tile_size;
    options.output = cli.output;
    options.detection_mode = if cli.all_faces {
        DetectionMode::All
    } else {
        DetectionMode::LargestOnly
    };
    options.temp_dir = cli.temp_dir.unwrap_or_else(default_temp_dir);
    options.merge_tool = parse_merge_tool(&cli.merge_tool)?;
    options.frame_delay_cs = cli.frame_delay;
    Ok(options)
}

fn log_startup(options: &RunOptions) {
    match &options.input {
        InputSource::Camera(index) => log::info!("Input: camera {index}"),
        InputSource::Image(path) => log::info!("Input: image {}", path.display()),
    }
    if options.tile_size == 0 {
        log::info!("Tile size: auto");
    } else {
        log::info!("Tile size: {}", options.tile_size);
    }
    match (&options.output, options.records_frames()) {
        (Some(output), true) => log::info!(
            "Recording to {} via {} (frames in {})",
            output.display(),
            options.merge_tool.program(),
            options.temp_dir.display()
        ),
        (Some(output), false) => log::info!("Writing result to {}", output.display()),
        (None, _) => log::info!("Display only, no output"),
    }
}

fn parse_merge_tool(name: &str) -> Result<MergeTool, Box<dyn std::error::Error>> {
    match name.to_ascii_lowercase().as_str() {
        "imagemagick" | "convert" => Ok(MergeTool::ImageMagick),
        "ffmpeg" => Ok(MergeTool::Ffmpeg),
        _ => Err(format!("Merge tool must be 'imagemagick' or 'ffmpeg', got '{name}'").into()),
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg_attr(not(feature = "opencv"), allow(dead_code))]
fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face cascade... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face cascade... {downloaded} bytes");
    }
}
