use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

use countdown_gif::{
    AnimateOpts, FontBook, FontRole, GifEncodeOpts, InMemoryTimerStore, Language, RenderThreading,
    Rgb8, ServeOpts, StyleId, TimerSpec,
};

const NUMBER_FONT_ENV: &str = "COUNTDOWN_NUMBER_FONT";
const LABEL_FONT_ENV: &str = "COUNTDOWN_LABEL_FONT";

#[derive(Parser, Debug)]
#[command(name = "countdown-gif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a looping countdown GIF.
    Render(RenderArgs),
    /// Render the first tick as a PNG.
    Frame(FrameArgs),
    /// Serve one stored timer record the way the HTTP endpoint does.
    Record(RecordArgs),
    /// List the common timezones with their current wall-clock time.
    Timezones(TimezonesArgs),
}

#[derive(Args, Debug)]
struct TimerArgs {
    /// Target instant (RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]` taken as UTC).
    #[arg(long)]
    end: String,

    /// IANA timezone; unknown names count as UTC.
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Style: modern, minimal, classic, neon, gradient or elegant.
    #[arg(long, default_value = "modern")]
    style: String,

    /// Display color as hex RGB.
    #[arg(long, default_value = "#3b82f6")]
    color: String,

    /// Label language code.
    #[arg(long, default_value = "en")]
    language: String,

    /// Render as if the current instant were this one.
    #[arg(long)]
    now: Option<String>,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Font file for the numbers (falls back to $COUNTDOWN_NUMBER_FONT, then system fonts).
    #[arg(long)]
    number_font: Option<PathBuf>,

    /// Font file for the labels (falls back to $COUNTDOWN_LABEL_FONT, then the number font).
    #[arg(long)]
    label_font: Option<PathBuf>,

    /// Print the resolved font families and the SHA-256 of their bytes.
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct TimezonesArgs {
    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    timer: TimerArgs,

    #[command(flatten)]
    fonts: FontArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Number of one-second ticks.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Palette quality, 1..=30.
    #[arg(long, default_value_t = 21)]
    quality: u8,

    /// Play once instead of looping forever.
    #[arg(long, default_value_t = false)]
    no_loop: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render every tick even when its countdown value repeats.
    #[arg(long, default_value_t = false)]
    no_elision: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    timer: TimerArgs,

    #[command(flatten)]
    fonts: FontArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RecordArgs {
    /// JSON file holding an array of timer records.
    #[arg(long)]
    records: PathBuf,

    /// Record id to serve.
    #[arg(long)]
    id: String,

    /// Where to write the response body.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render as if the current instant were this one.
    #[arg(long)]
    now: Option<String>,

    #[command(flatten)]
    fonts: FontArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Record(args) => cmd_record(args),
        Command::Timezones(args) => cmd_timezones(args),
    }
}

fn parse_now(now: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match now {
        Some(s) => Ok(countdown_gif::parse_instant(s)?),
        None => Ok(Utc::now()),
    }
}

fn timer_spec(args: &TimerArgs) -> anyhow::Result<TimerSpec> {
    let end = countdown_gif::parse_instant(&args.end)?;
    let color = Rgb8::parse_hex(&args.color)?;
    Ok(TimerSpec::new(end, color)
        .with_timezone(args.timezone.clone())
        .with_style(StyleId::resolve(&args.style))
        .with_language(Language::resolve(&args.language)))
}

fn load_fonts(args: &FontArgs) -> anyhow::Result<FontBook> {
    let from_env = |key: &str| std::env::var_os(key).map(PathBuf::from);
    let number = args.number_font.clone().or_else(|| from_env(NUMBER_FONT_ENV));
    let label = args.label_font.clone().or_else(|| from_env(LABEL_FONT_ENV));
    let fonts = FontBook::resolve(number.as_deref(), label.as_deref())?;
    if args.dump_fonts {
        dump_font_diagnostics(&fonts);
    }
    Ok(fonts)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec = timer_spec(&args.timer)?;
    let now = parse_now(args.timer.now.as_deref())?;
    let fonts = load_fonts(&args.fonts)?;

    let opts = AnimateOpts {
        frame_count: args.frames,
        threading: RenderThreading {
            parallel: args.parallel,
            threads: args.threads,
            static_frame_elision: !args.no_elision,
        },
        ..AnimateOpts::default()
    };
    let gif = GifEncodeOpts {
        loop_forever: !args.no_loop,
        quality: args.quality,
        ..GifEncodeOpts::default()
    };
    let bytes = countdown_gif::render_countdown_gif(&spec, now, &fonts, &opts, &gif)?;

    create_parent_dir(&args.out)?;
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} bytes)", args.out.display(), bytes.len());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let spec = timer_spec(&args.timer)?;
    let now = parse_now(args.timer.now.as_deref())?;
    let fonts = load_fonts(&args.fonts)?;
    let frame = countdown_gif::render_still(&spec, now, &fonts)?;

    create_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    let store = InMemoryTimerStore::from_path(&args.records)?;
    let now = parse_now(args.now.as_deref())?;
    let fonts = load_fonts(&args.fonts)?;

    let resp =
        countdown_gif::handle_timer_request(&store, &args.id, now, &fonts, &ServeOpts::default());
    println!("status: {}", resp.status);
    for (name, value) in &resp.headers {
        println!("{name}: {value}");
    }
    match &args.out {
        Some(out) => {
            create_parent_dir(out)?;
            std::fs::write(out, &resp.body)
                .with_context(|| format!("write body '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None if resp.status != 200 => println!("{}", String::from_utf8_lossy(&resp.body)),
        None => {}
    }
    if resp.status != 200 {
        anyhow::bail!("request failed with status {}", resp.status);
    }
    Ok(())
}

fn cmd_timezones(args: TimezonesArgs) -> anyhow::Result<()> {
    if args.fonts.dump_fonts {
        load_fonts(&args.fonts)?;
    }
    for opt in countdown_gif::timezone_options(Utc::now()) {
        println!("{}\t{}", opt.value, opt.label);
    }
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn dump_font_diagnostics(fonts: &FontBook) {
    eprintln!("font diagnostics:");
    for (key, role) in [("number", FontRole::Number), ("label", FontRole::Label)] {
        eprintln!("  {key}:");
        match fonts.face(role) {
            Some(face) => {
                eprintln!("    font_source: {}", face.source);
                eprintln!("    family:      {}", face.family);
                eprintln!("    weight:      {}", face.weight);
                eprintln!("    sha256:      {}", sha256_hex(&face.bytes));
            }
            None => eprintln!("    (none)"),
        }
    }
    for face in fonts.fallbacks() {
        eprintln!("  fallback:");
        eprintln!("    font_source: {}", face.source);
        eprintln!("    family:      {}", face.family);
        eprintln!("    sha256:      {}", sha256_hex(&face.bytes));
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
