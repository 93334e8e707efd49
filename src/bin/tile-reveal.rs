use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tile-reveal", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the reveal (and the start of breathing) as a PNG sequence.
    Frames(FramesArgs),
    /// Render the glyph mask alone as a PNG.
    Mask(MaskArgs),
}

#[derive(Parser, Debug)]
struct FaceArgs {
    /// Headline text; `\n` separates lines.
    #[arg(long)]
    text: String,

    /// TTF/OTF font file. Without it, glyphs are drawn as blocks.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in CSS px.
    #[arg(long, default_value_t = 64.0)]
    font_size: f64,

    /// Container width in CSS px.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Container height in CSS px.
    #[arg(long, default_value_t = 240.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    face: FaceArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// JSON tuning overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per second of the synthetic clock.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Length of the sequence; defaults to the reveal plus two seconds of breathing.
    #[arg(long)]
    duration_ms: Option<f64>,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    #[command(flatten)]
    face: FaceArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Mask(args) => cmd_mask(args),
    }
}

fn font_spec(args: &FaceArgs) -> tile_reveal::FontSpec {
    tile_reveal::FontSpec {
        size_px: args.font_size,
        ..tile_reveal::FontSpec::default()
    }
    .sanitized()
}

fn make_face(
    args: &FaceArgs,
) -> anyhow::Result<(
    Box<dyn tile_reveal::TextMetrics>,
    Box<dyn tile_reveal::GlyphPainter>,
)> {
    let spec = font_spec(args);
    let Some(path) = args.font.as_ref() else {
        let face = tile_reveal::BlockFace::new(spec);
        return Ok((Box::new(face.clone()), Box::new(face)));
    };
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    let metrics = tile_reveal::ParleyFace::new(bytes.clone(), spec.clone())
        .with_context(|| format!("load font '{}'", path.display()))?;
    let painter = tile_reveal::ParleyFace::new(bytes, spec)?;
    Ok((Box::new(metrics), Box::new(painter)))
}

fn read_config(path: Option<&Path>) -> anyhow::Result<tile_reveal::RevealConfig> {
    let Some(path) = path else {
        return Ok(tile_reveal::RevealConfig::default());
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    tile_reveal::RevealConfig::from_json_str(&s)
        .with_context(|| format!("parse config '{}'", path.display()))
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn write_png(path: &Path, mut frame: tile_reveal::FrameRGBA) -> anyhow::Result<()> {
    frame.unpremultiply();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let (metrics, painter) = make_face(&args.face)?;
    let env = tile_reveal::HostEnv {
        reduced_motion: false,
        device_pixel_ratio: args.face.dpr,
        viewport_width: args.face.width,
    };

    let mut headline = tile_reveal::Headline::new(unescape(&args.face.text), cfg, env)
        .with_face(metrics, painter);
    headline.set_on_complete(Box::new(|| eprintln!("reveal complete")));
    headline.on_resize(
        tile_reveal::CssSize::new(args.face.width, args.face.height),
        0.0,
    );
    headline.start(0.0);
    if headline.mask().is_none() {
        anyhow::bail!(
            "container {}x{} has nothing to render",
            args.face.width,
            args.face.height
        );
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let r = &cfg.reveal;
    let total_ms = args
        .duration_ms
        .unwrap_or(r.delay_ms + r.duration_ms + r.breath_start_delay_ms + 2000.0);
    let fps = f64::from(args.fps.max(1));
    let count = (total_ms.max(0.0) * fps / 1000.0).ceil() as u64 + 1;

    for i in 0..count {
        let now = i as f64 * 1000.0 / fps;
        headline.tick(now);
        let frame = headline
            .read_frame()
            .context("headline has no surface")?;
        let path = args.out.join(format!("frame_{i:05}.png"));
        write_png(&path, frame)?;
    }

    eprintln!(
        "wrote {count} frames to {} (dom opacity {:.2})",
        args.out.display(),
        headline.dom_opacity()
    );
    Ok(())
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let (mut metrics, mut painter) = make_face(&args.face)?;
    let inputs = tile_reveal::MaskInputs {
        text: unescape(&args.face.text),
        container: tile_reveal::CssSize::new(args.face.width, args.face.height),
        device_pixel_ratio: args.face.dpr,
        feather_px: tile_reveal::FieldConfig::default().feather_px,
    };
    let mask = tile_reveal::build_mask(&inputs, metrics.as_mut(), painter.as_mut())
        .with_context(|| format!("container {}x{} has nothing to render", args.face.width, args.face.height))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(
        &args.out,
        tile_reveal::FrameRGBA {
            width: mask.width(),
            height: mask.height(),
            data: mask.pixels().to_vec(),
            premultiplied: true,
        },
    )?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
