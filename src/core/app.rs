//! Command line front end
//!
//! Each subcommand opens the record store, does one thing, and waits for any
//! queued saves before exiting.

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use image::RgbaImage;

use crate::annotations::AnnotationCollection;
use crate::capture::crop::{crop_region, full_region};
use crate::capture::image::{load_image, save_png};
use crate::config::SnapnoteConfig;
use crate::domain::{AnnotationKind, Point};
use crate::render::image::PixmapSurface;
use crate::render::record::DisplayList;
use crate::render::text::GlyphRenderer;
use crate::session::{EditorEvent, EditorSession, GestureOutcome, Key};
use crate::store::{LocalStore, Persist, Screenshot, spawn_saver};

#[derive(Parser)]
#[command(name = "snapnote")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Annotate stored screenshots", long_about = None)]
struct Cli {
    /// Record store directory (overrides the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Act as this user (overrides the config file)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty screenshot record and print its id
    Create {
        /// Page the screenshot was taken from
        #[arg(long)]
        source_url: Option<String>,
    },

    /// Print a screenshot record as JSON
    Show { id: String },

    /// List the annotations of a screenshot in drawing order
    Annotations { id: String },

    /// Draw one annotation by replaying a gesture
    Draw {
        id: String,

        /// The screenshot image
        #[arg(long)]
        image: PathBuf,

        /// Annotation kind (Text, Line, Arrow, Highlight, Box, Circle, Blur)
        #[arg(long, value_parser = parse_kind)]
        tool: AnnotationKind,

        /// Drag start, as X,Y
        #[arg(long, value_parser = parse_point)]
        from: Option<Point>,

        /// Drag end, as X,Y
        #[arg(long, value_parser = parse_point)]
        to: Option<Point>,

        /// Hold the snap modifier while dragging
        #[arg(long)]
        snap: bool,

        /// Text position, as X,Y
        #[arg(long, value_parser = parse_point)]
        at: Option<Point>,

        /// Text to write
        #[arg(long)]
        text: Option<String>,
    },

    /// Remove the annotation at INDEX (as listed by `annotations`)
    Remove { id: String, index: usize },

    /// Export the annotated image
    Render {
        id: String,

        /// The screenshot image
        #[arg(long)]
        image: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Crop an image to a region
    Crop {
        image: PathBuf,

        /// X,Y,W,H; negative sizes extend up or to the left. Defaults to the
        /// whole image.
        #[arg(long, value_parser = parse_region, allow_hyphen_values = true)]
        region: Option<(Point, Point)>,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Parse the command line and run the selected command
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SnapnoteConfig::load();
    if let Some(store) = cli.store {
        config.store_dir = Some(store);
    }
    if let Some(user) = cli.user {
        config.user_id = user;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    runtime.block_on(execute(cli.command, config))
}

async fn execute(command: Commands, config: SnapnoteConfig) -> Result<()> {
    let store = Arc::new(LocalStore::new(config.store_root()?));

    match command {
        Commands::Create { source_url } => {
            let screenshot = Screenshot::create(&*store, source_url, &config.user_id)?;
            println!("{}", screenshot.image_id);
            Ok(())
        }

        Commands::Show { id } => {
            let screenshot = fetch(&store, &id)?;
            println!("{}", serde_json::to_string_pretty(&screenshot)?);
            Ok(())
        }

        Commands::Annotations { id } => cmd_annotations(&fetch(&store, &id)?),

        Commands::Draw {
            id,
            image,
            tool,
            from,
            to,
            snap,
            at,
            text,
        } => {
            let gesture = Gesture::from_args(tool, from, to, snap, at, text)?;
            cmd_draw(store, &config, &id, &image, tool, gesture).await
        }

        Commands::Remove { id, index } => cmd_remove(store, &config, &id, index).await,

        Commands::Render { id, image, output } => {
            cmd_render(&store, &config, &id, &image, &output)
        }

        Commands::Crop {
            image,
            region,
            output,
        } => cmd_crop(&image, region, &output),
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Crop `image` to `region`, or copy it whole when no region is given
fn cmd_crop(image: &Path, region: Option<(Point, Point)>, output: &Path) -> Result<()> {
    let source = load_image(image)?;
    let (start, dimensions) = region.unwrap_or_else(|| full_region(&source));
    let Some(cropped) = crop_region(&source, start, dimensions) else {
        bail!("Crop region does not overlap the image");
    };
    save_png(&cropped, output)?;
    println!(
        "Saved {}x{} crop to {}",
        cropped.width(),
        cropped.height(),
        output.display()
    );
    Ok(())
}

fn cmd_annotations(screenshot: &Screenshot) -> Result<()> {
    for (index, record) in screenshot.annotations.iter().enumerate() {
        let kind = AnnotationKind::from_tag(record.kind())
            .with_context(|| format!("Unknown annotation kind {:?}", record.kind()))?;
        println!(
            "{index}\t{}\t{}",
            kind.display_name(),
            serde_json::Value::Object(record.fields().clone())
        );
    }
    Ok(())
}

async fn cmd_draw(
    store: Arc<LocalStore>,
    config: &SnapnoteConfig,
    id: &str,
    image: &Path,
    tool: AnnotationKind,
    gesture: Gesture,
) -> Result<()> {
    let screenshot = fetch(&store, id)?;
    let source = Rc::new(load_image(image)?);
    let surface = DisplayList::new(source.width(), source.height());

    let (queue, saver) = spawn_saver(store);
    let outcome = {
        let collection = AnnotationCollection::new(
            surface,
            screenshot,
            Box::new(queue),
            config.annotation_context(source),
        )?;
        let mut session = EditorSession::new(collection, &config.user_id);
        if !session.is_editable() {
            bail!("Screenshot {id} belongs to another user");
        }
        session.set_tool(tool);
        gesture
            .events()
            .into_iter()
            .fold(GestureOutcome::Ignored, |_, event| session.handle_event(event))
    };
    saver.await.context("Saver task failed")?;

    match outcome {
        GestureOutcome::Committed(annotation) => println!("Added {tool} annotation {annotation}"),
        _ => println!("Nothing to add: the {tool} gesture was empty"),
    }
    Ok(())
}

async fn cmd_remove(
    store: Arc<LocalStore>,
    config: &SnapnoteConfig,
    id: &str,
    index: usize,
) -> Result<()> {
    let screenshot = fetch(&store, id)?;
    let count = screenshot.annotations.len();
    // Nothing is drawn, so an empty source is enough to rebuild the annotations
    let context = config.annotation_context(Rc::new(RgbaImage::new(0, 0)));

    let (queue, saver) = spawn_saver(store);
    let removed = {
        let collection =
            AnnotationCollection::new(DisplayList::new(0, 0), screenshot, Box::new(queue), context)?;
        let mut session = EditorSession::new(collection, &config.user_id);
        if !session.is_editable() {
            bail!("Screenshot {id} belongs to another user");
        }
        let Some(annotation) = session.collection().id_at(index) else {
            bail!("No annotation at index {index} ({count} annotations)");
        };
        session.remove_annotation(annotation)
    };
    saver.await.context("Saver task failed")?;

    if let Some(annotation) = removed {
        println!("Removed {} annotation at index {index}", annotation.display_name());
    }
    Ok(())
}

fn cmd_render(
    store: &LocalStore,
    config: &SnapnoteConfig,
    id: &str,
    image: &Path,
    output: &Path,
) -> Result<()> {
    let screenshot = fetch(store, id)?;
    let source = Rc::new(load_image(image)?);
    let glyphs = GlyphRenderer::discover(config.font_path.as_deref()).map(Rc::new);
    let surface = PixmapSurface::for_image(&source)?.with_glyphs(glyphs);

    let collection = AnnotationCollection::new(
        surface,
        screenshot,
        Box::new(ReadOnly),
        config.annotation_context(source.clone()),
    )?;
    let annotated = collection.surface().compose_over(&source);
    save_png(&annotated, output)?;
    println!(
        "Rendered {} annotations to {}",
        collection.len(),
        output.display()
    );
    Ok(())
}

fn fetch(store: &LocalStore, id: &str) -> Result<Screenshot> {
    Screenshot::get(store, id)?.with_context(|| format!("No screenshot with id {id}"))
}

/// Persistence for commands that never change the record
struct ReadOnly;

impl Persist for ReadOnly {
    fn save(&self, screenshot: Screenshot) {
        log::warn!(
            "Ignoring save of {} from a read-only command",
            screenshot.image_id
        );
    }
}

// ============================================================================
// Gesture replay
// ============================================================================

/// A scripted gesture for one `draw` invocation
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Drag { from: Point, to: Point, snap: bool },
    Type { at: Point, text: String },
}

impl Gesture {
    fn from_args(
        tool: AnnotationKind,
        from: Option<Point>,
        to: Option<Point>,
        snap: bool,
        at: Option<Point>,
        text: Option<String>,
    ) -> Result<Self> {
        if tool.is_drag() {
            match (from, to) {
                (Some(from), Some(to)) => Ok(Gesture::Drag { from, to, snap }),
                _ => bail!("{tool} needs --from X,Y and --to X,Y"),
            }
        } else {
            match (at, text) {
                (Some(at), Some(text)) => Ok(Gesture::Type { at, text }),
                _ => bail!("{tool} needs --at X,Y and --text TEXT"),
            }
        }
    }

    /// The input a user would produce for this gesture
    fn events(&self) -> Vec<EditorEvent> {
        match self {
            Gesture::Drag { from, to, snap } => vec![
                EditorEvent::press(from.x, from.y),
                EditorEvent::drag(to.x, to.y, *snap),
                EditorEvent::release(to.x, to.y),
            ],
            Gesture::Type { at, text } => {
                let mut events = vec![EditorEvent::press(at.x, at.y)];
                events.extend(text.chars().map(|c| EditorEvent::Key(Key::Char(c))));
                events.push(EditorEvent::Key(Key::Enter));
                events
            }
        }
    }
}

// ============================================================================
// Argument parsers
// ============================================================================

fn parse_kind(s: &str) -> Result<AnnotationKind, String> {
    AnnotationKind::ALL
        .into_iter()
        .find(|kind| kind.tag().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown annotation kind {s:?}"))
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let values = s
        .split(',')
        .map(|part| {
            let value = part
                .trim()
                .parse::<f64>()
                .map_err(|err| format!("{part:?}: {err}"))?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(format!("{part:?}: not a finite number"))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[f64; N]>::try_from(values).map_err(|v| format!("expected {N} numbers, got {}", v.len()))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let [x, y] = parse_numbers(s)?;
    Ok(Point::new(x, y))
}

fn parse_region(s: &str) -> Result<(Point, Point), String> {
    let [x, y, w, h] = parse_numbers(s)?;
    Ok((Point::new(x, y), Point::new(w, h)))
}
