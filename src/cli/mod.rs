//! # CLI Module
//!
//! Command-line interface for GearView.
//!
//! ## Usage
//! ```bash
//! # Group photos by camera and lens
//! gearview scan ~/Photos ~/Card
//!
//! # Alphabetical order, JSON output
//! gearview scan ~/Photos --sort name --output json
//!
//! # Copy one camera into camera/lens folders
//! gearview copy ~/Photos --target ~/Sorted --camera "Canon EOS R5" --by-lens
//!
//! # Move one lens group without asking
//! gearview move ~/Photos --target ~/Sorted --lens "Fuji X100::No lens info" --yes
//!
//! # Show what GearView reads from one file
//! gearview info ~/Photos/IMG_0001.jpg
//! ```

use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use gearview::core::grouping::{CameraView, SortMode};
use gearview::core::metadata::extract_tags;
use gearview::core::relocate::{Action, RelocatePlan, RelocateResult, Selection};
use gearview::core::resolver::{resolve_camera, resolve_lens};
use gearview::error::{GearViewError, InputError, Result};
use gearview::events::{Event, EventChannel, EventReceiver, ScanEvent, ScanOutcome};
use gearview::Session;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

/// GearView - sort photos by the gear that took them
#[derive(Parser, Debug)]
#[command(name = "gearview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan folders and show photos grouped by camera and lens
    Scan {
        /// Source folders, scanned in this order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Group ordering
        #[arg(short, long, default_value = "count")]
        sort: SortArg,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Copy selected photos into target/camera/lens folders
    Copy(RelocateArgs),
    /// Move selected photos into target/camera/lens folders
    Move(RelocateArgs),
    /// Show the tags and labels read from one photo
    Info {
        /// Photo to inspect
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RelocateArgs {
    /// Source folders, scanned in this order
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Target folder
    #[arg(short, long)]
    target: PathBuf,

    /// Select every photo of a camera (repeatable)
    #[arg(long = "camera", value_name = "CAMERA")]
    cameras: Vec<String>,

    /// Select a lens group as CAMERA::LENS (repeatable)
    #[arg(long = "lens", value_name = "CAMERA::LENS")]
    lenses: Vec<String>,

    /// Select a single scanned photo (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Select every camera
    #[arg(long)]
    all: bool,

    /// Create lens subfolders for camera selections
    #[arg(long)]
    by_lens: bool,

    /// Skip the move confirmation
    #[arg(short, long)]
    yes: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// Most photos first
    Count,
    /// Alphabetical, ignoring case
    Name,
}

impl From<SortArg> for SortMode {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Count => SortMode::ByCount,
            SortArg::Name => SortMode::ByName,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    gearview::init_tracing(if cli.verbose { "debug" } else { "warn" });

    match cli.command {
        Commands::Scan {
            paths,
            sort,
            output,
        } => run_scan(paths, sort.into(), output),
        Commands::Copy(args) => run_relocate(args, Action::Copy),
        Commands::Move(args) => run_relocate(args, Action::Move),
        Commands::Info { file } => run_info(&file),
    }
}

/// Build a session over `paths` and scan it with a spinner
fn scan_folders(paths: Vec<PathBuf>, quiet: bool) -> Result<Session> {
    let term = Term::stderr();
    let (sender, receiver) = EventChannel::new();
    let mut session = Session::builder().events(sender).build();

    for path in paths {
        if let Err(e) = session.add_source_folder(&path) {
            term.write_line(&format!("{} {}", style("!").yellow(), e)).ok();
        }
    }

    session.start_scan()?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Scanning...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let poll_interval = session.poll_interval();
    let outcome = loop {
        drain_scan_events(&receiver, &spinner);
        if let Some(outcome) = session.poll_scan() {
            break outcome;
        }
        thread::sleep(poll_interval);
    };
    spinner.finish_and_clear();

    match outcome {
        ScanOutcome::Success(summary) => {
            if !quiet {
                term.write_line(&format!("{} {}", style("✓").green().bold(), summary))
                    .ok();
            }
            Ok(session)
        }
        ScanOutcome::Error(message) => Err(GearViewError::ScanFailed(message)),
    }
}

fn drain_scan_events(receiver: &EventReceiver, spinner: &ProgressBar) {
    for event in receiver.drain() {
        match event {
            Event::Scan(ScanEvent::Progress(p)) => {
                spinner.set_message(format!(
                    "Scanning... {} photos ({})",
                    p.photos_found,
                    p.current_path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                ));
            }
            Event::Scan(ScanEvent::Error { message, .. }) => {
                spinner.println(format!("{} {}", style("!").yellow(), message));
            }
            _ => {}
        }
    }
}

fn run_scan(paths: Vec<PathBuf>, sort: SortMode, output: OutputFormat) -> Result<()> {
    let quiet = matches!(output, OutputFormat::Json);
    let mut session = scan_folders(paths, quiet)?;
    session.set_sort_mode(sort);
    let views = session.ordered();

    match output {
        OutputFormat::Pretty => print_tree(&Term::stdout(), &views),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": session.grouping().summary(),
                "sort": sort,
                "cameras": views,
            });
            print_json(&output)?;
        }
    }

    Ok(())
}

fn print_tree(term: &Term, views: &[CameraView]) {
    if views.is_empty() {
        term.write_line(&format!(
            "{}",
            style("No JPG files found in selected folders.").dim()
        ))
        .ok();
        return;
    }

    term.write_line("").ok();
    for camera in views {
        term.write_line(&format!(
            "{} {}",
            style(&camera.label).bold().cyan(),
            style(format!("({})", camera.file_count)).dim()
        ))
        .ok();

        for lens in &camera.lenses {
            term.write_line(&format!(
                "  {} {}",
                style(&lens.label).yellow(),
                style(format!("({})", lens.files.len())).dim()
            ))
            .ok();

            for file in &lens.files {
                term.write_line(&format!(
                    "    {}  {}",
                    style(format_time(file.modified)).dim(),
                    display_path(&file.path)
                ))
                .ok();
            }
        }
        term.write_line("").ok();
    }
}

fn run_relocate(args: RelocateArgs, action: Action) -> Result<()> {
    let term = Term::stderr();
    let quiet = matches!(args.output, OutputFormat::Json);
    let mut session = scan_folders(args.paths.clone(), quiet)?;
    session.set_target_folder(&args.target);

    let selection = build_selection(&args, &session)?;
    let plan = session.plan(&selection, args.by_lens)?;

    for item in &plan.unmatched {
        term.write_line(&format!(
            "{} Nothing in the scan matches {:?}",
            style("!").yellow(),
            item
        ))
        .ok();
    }
    if plan.files.is_empty() {
        return Err(InputError::EmptySelection.into());
    }

    if action == Action::Move && !args.yes && !confirm_move(&term, &plan, &args.target)? {
        term.write_line("Move cancelled.").ok();
        return Ok(());
    }

    let result = session.relocate(&selection, action, args.by_lens)?;

    match args.output {
        OutputFormat::Pretty => print_relocation(&term, &result, action),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "action": action,
                "succeeded": result.succeeded,
                "failed": result.failed,
                "folders_created": result.folders_created,
                "duration_ms": result.duration_ms,
                "relocated": result.relocated,
                "errors": result.errors,
            });
            print_json(&output)?;
        }
    }

    Ok(())
}

fn build_selection(args: &RelocateArgs, session: &Session) -> Result<Selection> {
    let mut selection = Selection::new();

    if args.all {
        for camera in session.ordered() {
            selection = selection.camera(camera.label);
        }
    }
    for camera in &args.cameras {
        selection = selection.camera(camera.as_str());
    }
    for spec in &args.lenses {
        let (camera, lens) = spec.split_once("::").ok_or_else(|| {
            GearViewError::Config(format!("--lens expects CAMERA::LENS, got {:?}", spec))
        })?;
        selection = selection.lens(camera, lens);
    }
    for file in &args.files {
        let path = std::path::absolute(file).unwrap_or_else(|_| file.clone());
        selection = selection.file(path);
    }

    Ok(selection)
}

fn confirm_move(term: &Term, plan: &RelocatePlan, target: &Path) -> Result<bool> {
    term.write_line(&format!(
        "{}",
        style("WARNING: MOVE OPERATION").red().bold()
    ))
    .ok();
    term.write_line(&format!(
        "This will move {} files out of their source folders into {}.",
        plan.total_files,
        target.display()
    ))
    .ok();
    term.write_str("Type 'yes' to continue: ").ok();

    let answer = term
        .read_line()
        .map_err(|e| GearViewError::Config(format!("Could not read confirmation: {}", e)))?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

fn print_relocation(term: &Term, result: &RelocateResult, action: Action) {
    term.write_line("").ok();
    for line in result.summary(action).lines() {
        term.write_line(&format!("  {}", line)).ok();
    }

    if result.folders_created > 0 {
        term.write_line(&format!(
            "  {} folders created",
            style(result.folders_created).dim()
        ))
        .ok();
    }

    for error in &result.errors {
        term.write_line(&format!("  {} {}", style("✗").red(), error))
            .ok();
    }
}

fn run_info(file: &Path) -> Result<()> {
    let term = Term::stdout();
    let tags = extract_tags(file);

    term.write_line(&format!("{}", style(display_path(file)).bold()))
        .ok();
    if tags.is_empty() {
        term.write_line(&format!("  {}", style("No EXIF data").dim()))
            .ok();
    }
    for (name, value) in &tags {
        term.write_line(&format!("  {:<18} {}", name, value.to_display()))
            .ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {:<18} {}",
        "Camera",
        style(resolve_camera(&tags)).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {:<18} {}",
        "Lens",
        style(resolve_lens(&tags)).yellow()
    ))
    .ok();

    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| GearViewError::Config(format!("Could not encode JSON: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}
