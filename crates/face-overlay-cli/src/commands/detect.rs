//! Detect command - run face detection and emit overlay reports.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use face_overlay_adapters::{load_image, models, SeetaFaceDetector};
use face_overlay_core::{
    overlay, DetectionState, DetectorOptions, DetectorProfile, FaceDetector, OverlayReport,
    ProgressEvent, ProgressSink, RenderPlan, ReportOutput, Session,
};
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Border color of annotated detection rectangles.
const OVERLAY_COLOR: [u8; 3] = [0, 255, 0];

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Detector profile selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ProfileArg {
    /// Low-latency coarse scan
    #[default]
    Fast,
    /// Denser scan, catches smaller faces
    Standard,
}

impl From<ProfileArg> for DetectorProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fast => Self::Fast,
            ProfileArg::Standard => Self::Standard,
        }
    }
}

/// Shared arguments for face detection.
#[derive(Args, Clone)]
pub struct DetectArgs {
    /// Image files to process
    pub paths: Vec<PathBuf>,

    /// Detector profile
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Write annotated copies with detection rectangles to this directory
    #[arg(long, value_name = "DIR")]
    pub annotate_dir: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

impl DetectArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.profile.is_none() {
            args.profile = config
                .detector
                .profile
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "fast" => Some(ProfileArg::Fast),
                    "standard" => Some(ProfileArg::Standard),
                    _ => None,
                });
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        // Boolean output options: CLI flag wins, then config
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        if args.annotate_dir.is_none() {
            args.annotate_dir.clone_from(&config.output.annotate_dir);
        }

        // Models directory: CLI > config
        if args.models_dir.is_none() {
            args.models_dir.clone_from(&config.models.dir);
        }

        args
    }

    /// Get the detector profile with fallback to the fast default.
    fn profile(&self) -> ProfileArg {
        self.profile.unwrap_or_default()
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Result of running the detect command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct DetectResult {
    /// Number of images processed.
    pub processed: usize,
    /// Number of images skipped.
    pub skipped: usize,
    /// Total faces found across processed images.
    pub faces_found: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the detect command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &DetectArgs) -> Result<DetectResult> {
    info!("Running detect command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    // Apply models directory override if specified
    if let Some(ref models_dir) = args.models_dir {
        debug!("Using custom models directory: {}", models_dir.display());
        models::set_models_dir(Some(models_dir.clone()));
    }

    let options = DetectorOptions {
        profile: args.profile().into(),
    };
    let mut session = Session::new(options);
    let detector = prepare_detector(&mut session);

    // Determine if we should show progress
    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(Some(args.paths.len() as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout();

    process_images(&mut session, detector.as_ref(), &output, &progress_bar, args)
}

/// Resolves model readiness for the session.
///
/// Ready requires both bundles present and the face-locator parsing; any
/// failure is surfaced as an explicit failed phase rather than a silent
/// perpetual-loading state.
fn prepare_detector(session: &mut Session) -> Option<SeetaFaceDetector> {
    let missing = models::missing_models();
    if !missing.is_empty() {
        session.models_failed(format!(
            "Model bundles not installed: {}. Run `face-overlay models fetch`.",
            missing.join(", ")
        ));
        return None;
    }

    match SeetaFaceDetector::from_models_dir() {
        Ok(detector) => {
            session.models_ready();
            Some(detector)
        }
        Err(e) => {
            session.models_failed(format!("Model bundles unusable: {e:#}"));
            None
        }
    }
}

/// Feed each image through the session and write its overlay report.
fn process_images(
    session: &mut Session,
    detector: Option<&SeetaFaceDetector>,
    output: &JsonOutput,
    progress: &ProgressBar,
    args: &DetectArgs,
) -> Result<DetectResult> {
    let total = Some(args.paths.len());
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut faces_found = 0usize;
    let mut failures = 0usize;
    let mut all_reports: Vec<OverlayReport> = Vec::new();

    for (index, path) in args.paths.iter().enumerate() {
        let display_path = path.to_string_lossy().into_owned();

        progress.on_event(ProgressEvent::Started {
            path: display_path.clone(),
            index,
            total,
        });

        let image = match load_image(path) {
            Ok(image) => image,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    path: display_path,
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        let dimensions = image.dimensions();
        session.select_image(image);

        if let Some(request) = session.image_loaded() {
            let outcome = match (detector, session.image()) {
                (Some(detector), Some(image)) => {
                    detector.detect_faces(&image.image, session.detector_options())
                }
                // image_loaded only issues requests once readiness resolved
                _ => Err(anyhow::anyhow!("No detection engine available")),
            };
            session.finish_detection(request, outcome);
        }

        let plan = overlay::render(session);
        match &plan {
            RenderPlan::View { rects, error } => {
                faces_found += rects.len();
                if error.is_some() {
                    failures += 1;
                }
            }
            RenderPlan::ModelsFailed { .. } => failures += 1,
            RenderPlan::Loading => {}
        }

        if let Some(dir) = &args.annotate_dir {
            if let Err(e) = write_annotated(session, dir) {
                tracing::warn!("Failed to write annotated copy for {}: {e:#}", path.display());
            }
        }

        let report = OverlayReport {
            path: display_path,
            timestamp: iso_timestamp(),
            dimensions: Some(dimensions),
            overlay: plan,
        };

        progress.on_event(ProgressEvent::Completed {
            report: report.clone(),
        });

        match args.format() {
            OutputFormat::Jsonl => {
                output.write(&report)?;
            }
            OutputFormat::Json => {
                all_reports.push(report);
            }
        }

        processed += 1;
    }

    // For JSON format, output all reports as one array via the adapter
    if matches!(args.format(), OutputFormat::Json) {
        output.write_array(&all_reports, args.pretty)?;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let exit_code = if failures > 0 {
        ExitCode::DetectionFailed
    } else {
        ExitCode::Success
    };

    Ok(DetectResult {
        processed,
        skipped,
        faces_found,
        exit_code,
    })
}

/// Writes a copy of the current image with hollow rectangles at the
/// detected boxes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn write_annotated(session: &Session, dir: &Path) -> Result<()> {
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    let Some(image) = session.image() else {
        return Ok(());
    };
    let DetectionState::Ready(detections) = session.detection() else {
        return Ok(());
    };

    let mut rgb = image.image.to_rgb8();
    let (width, height) = (image.width as f32, image.height as f32);

    for detection in detections {
        let region = detection.region;
        let rect = Rect::at(
            (region.left * width) as i32,
            (region.top * height) as i32,
        )
        .of_size(
            ((region.width * width) as u32).max(1),
            ((region.height * height) as u32).max(1),
        );
        draw_hollow_rect_mut(&mut rgb, rect, image::Rgb(OVERLAY_COLOR));
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create annotate directory: {}", dir.display()))?;

    let file_name = Path::new(&image.path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("annotated");
    let out_path = dir.join(format!("{file_name}.png"));
    rgb.save(&out_path)
        .with_context(|| format!("Failed to write annotated copy: {}", out_path.display()))?;

    debug!("Annotated copy written to {}", out_path.display());
    Ok(())
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
