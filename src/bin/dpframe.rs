use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use dpframe::{
    AssetFetcher, DirectoryDownloads, ExportOutcome, ExportPipeline, FrameResolver, ImagePosition,
    Notification, NotificationLevel, PhotoSource, PreviewSession, UserSelection, caption,
    config::Settings,
};

#[derive(Parser, Debug)]
#[command(name = "dpframe", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the 400px preview as a PNG.
    Preview(PreviewArgs),
    /// Render the 3000px picture and save it to the download directory.
    Export(ExportArgs),
    /// Print the share caption.
    Caption(CaptionArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Session JSON: `{"name", "section", "status", "position"?}`.
    #[arg(long)]
    session: PathBuf,

    /// Photo file (any image format).
    #[arg(long)]
    photo: PathBuf,

    /// Asset root directory (overrides DPFRAME_ASSETS_DIR).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Frame URL prefix under the asset root (overrides DPFRAME_FRAMES_PREFIX).
    #[arg(long)]
    frames_prefix: Option<String>,

    /// Zoom multiplier applied before rendering.
    #[arg(long)]
    zoom: Option<f64>,

    /// Horizontal offset applied before rendering.
    #[arg(long, allow_negative_numbers = true)]
    dx: Option<f64>,

    /// Vertical offset applied before rendering.
    #[arg(long, allow_negative_numbers = true)]
    dy: Option<f64>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Download directory (overrides DPFRAME_DOWNLOAD_DIR).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Session JSON.
    #[arg(long)]
    session: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct SessionFile {
    #[serde(flatten)]
    selection: UserSelection,
    #[serde(default)]
    position: Option<ImagePosition>,
}

type CliSession = PreviewSession<AssetFetcher, fn(ImagePosition), fn(Notification)>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Preview(args) => cmd_preview(args).await,
        Command::Export(args) => cmd_export(args).await,
        Command::Caption(args) => cmd_caption(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn print_notification(n: Notification) {
    let tag = match n.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    eprintln!("[{tag}] {}", n.message);
}

fn log_position(p: ImagePosition) {
    tracing::info!(x = p.x, y = p.y, scale = p.scale, "position committed");
}

fn read_session(path: &Path) -> anyhow::Result<SessionFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open session '{}'", path.display()))?;
    let session: SessionFile =
        serde_json::from_str(&text).with_context(|| "parse session JSON")?;
    Ok(session)
}

fn settings_for(source: &SourceArgs) -> Settings {
    let mut settings = Settings::from_env();
    if let Some(dir) = &source.assets {
        settings.assets_root = dir.clone();
    }
    if let Some(prefix) = &source.frames_prefix {
        settings.frames_prefix = prefix.clone();
    }
    settings
}

async fn open_session(source: &SourceArgs, settings: &Settings) -> anyhow::Result<CliSession> {
    let file = read_session(&source.session)?;
    let bytes = tokio::fs::read(&source.photo)
        .await
        .with_context(|| format!("read photo '{}'", source.photo.display()))?;
    let photo = PhotoSource::from_encoded(&bytes)?;

    let mut session: CliSession = PreviewSession::new(
        file.selection,
        photo,
        AssetFetcher::new(&settings.assets_root),
        FrameResolver::new(settings.frames_prefix.clone()),
        log_position as fn(ImagePosition),
        print_notification as fn(Notification),
    );
    if let Some(position) = file.position {
        session = session.with_position(position);
    }

    if !session.refresh().await {
        anyhow::bail!("preview could not be prepared (see errors above)");
    }

    if let Some(zoom) = source.zoom {
        session.set_scale(zoom);
    }
    if let Some(dx) = source.dx {
        session.set_x(dx);
    }
    if let Some(dy) = source.dy {
        session.set_y(dy);
    }
    session.slider_released();
    session.on_display_frame();
    Ok(session)
}

async fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let settings = settings_for(&args.source);
    let session = open_session(&args.source, &settings).await?;

    let surface = session
        .surface()
        .context("preview surface was never drawn")?;
    let png = surface.encode_png()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut settings = settings_for(&args.source);
    if let Some(dir) = &args.out_dir {
        settings.download_dir = dir.clone();
    }
    let session = open_session(&args.source, &settings).await?;

    let pipeline = ExportPipeline::new(
        AssetFetcher::new(&settings.assets_root),
        FrameResolver::new(settings.frames_prefix.clone()),
    );
    let downloads = DirectoryDownloads::new(&settings.download_dir);
    let mut notifier = print_notification;

    match pipeline
        .export_high_res(&session.export_job(), &mut notifier, &downloads)
        .await
    {
        ExportOutcome::Downloaded(filename) => {
            eprintln!("wrote {}", downloads.path_for(&filename).display());
            Ok(())
        }
        ExportOutcome::Failed => anyhow::bail!("export failed"),
        ExportOutcome::Busy => anyhow::bail!("an export is already running"),
        ExportOutcome::Skipped => anyhow::bail!("export surface unavailable"),
    }
}

fn cmd_caption(args: CaptionArgs) -> anyhow::Result<()> {
    let file = read_session(&args.session)?;
    println!("{}", caption::caption_for(&file.selection));
    print_notification(caption::caption_copied());
    Ok(())
}
