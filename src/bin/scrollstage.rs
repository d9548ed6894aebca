use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scrollstage::{
    ContactHandler, Document, ElementId, EmailJsClient, Field, FrameLoop, Page, PinState,
    PropertyMap, RecordingSink, Settings, Stage,
};

#[derive(Parser, Debug)]
#[command(name = "scrollstage", version)]
struct Cli {
    /// Settings file (defaults to `scrollstage.toml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the styles of a page at a scroll position as JSON.
    Sample(SampleArgs),
    /// Sweep the scroll position and print every trigger's progress.
    Trace(TraceArgs),
    /// Drive a page with the frame loop and a constant wheel input.
    Simulate(SimulateArgs),
    /// Send a contact message through the configured delivery service.
    Send(SendArgs),
}

#[derive(Parser, Debug)]
struct PageArgs {
    /// Built-in page name (`portfolio` or `contact`).
    #[arg(long, default_value = "portfolio", conflicts_with = "in_path")]
    page: String,

    /// Page definition JSON.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Scroll offset in pixels.
    #[arg(long, default_value_t = 0.0)]
    scroll: f64,

    /// Seconds of time-driven playback before sampling.
    #[arg(long, default_value_t = 0.0)]
    time: f64,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Distance between samples in pixels.
    #[arg(long, default_value_t = 250.0)]
    step: f64,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Simulated seconds.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Wheel delta fed every frame.
    #[arg(long, default_value_t = 40.0, allow_negative_numbers = true)]
    wheel: f64,
}

#[derive(Parser, Debug)]
struct SendArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    message: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("load settings")?;
    match cli.cmd {
        Command::Sample(args) => cmd_sample(args, &settings),
        Command::Trace(args) => cmd_trace(args, &settings),
        Command::Simulate(args) => cmd_simulate(args, &settings).await,
        Command::Send(args) => cmd_send(args, &settings).await,
    }
}

fn load_page(args: &PageArgs) -> anyhow::Result<Page> {
    let page = match &args.in_path {
        Some(path) => read_page(path)?,
        None => Page::builtin(&args.page)?,
    };
    page.validate()?;
    Ok(page)
}

fn read_page(path: &Path) -> anyhow::Result<Page> {
    Page::from_path(path).with_context(|| format!("read page '{}'", path.display()))
}

fn make_stage(page: &Page, settings: &Settings) -> anyhow::Result<Stage> {
    let smooth = settings.smooth_scroll(page.def().smooth_scroll);
    Stage::new(page, smooth).with_context(|| format!("build stage for page '{}'", page.name()))
}

/// `#id`, else `.class@e<n>`, else `e<n>`.
fn label(doc: &Document, el: ElementId) -> String {
    match doc.get(el) {
        Some(e) => match (&e.id, e.classes.first()) {
            (Some(id), _) => format!("#{id}"),
            (None, Some(class)) => format!(".{class}@{el}"),
            (None, None) => el.to_string(),
        },
        None => el.to_string(),
    }
}

#[derive(serde::Serialize)]
struct SampleOut {
    page: String,
    scroll: f64,
    styles: BTreeMap<String, PropertyMap>,
    pins: BTreeMap<String, PinState>,
}

fn cmd_sample(args: SampleArgs, settings: &Settings) -> anyhow::Result<()> {
    let page = load_page(&args.page)?;
    let mut stage = make_stage(&page, settings)?;
    let mut sink = RecordingSink::new();

    stage.jump_to(args.scroll);
    // Ten seconds settles every smoothed scrub; the second frame starts chained scenes.
    stage.frame(args.time.max(0.0) + 10.0, &mut sink)?;
    stage.frame(10.0, &mut sink)?;

    let doc = stage.document();
    let out = SampleOut {
        page: page.name().to_owned(),
        scroll: stage.scroll_position(),
        styles: sink
            .styles()
            .iter()
            .map(|(el, props)| (label(doc, *el), props.clone()))
            .collect(),
        pins: sink
            .pins()
            .iter()
            .map(|(el, state)| (label(doc, *el), *state))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_trace(args: TraceArgs, settings: &Settings) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.step.is_finite() && args.step > 0.0,
        "--step must be a positive number of pixels"
    );
    let page = load_page(&args.page)?;
    let mut stage = make_stage(&page, settings)?;
    let mut sink = RecordingSink::new();
    let names: BTreeMap<_, _> = stage
        .triggers()
        .map(|(name, id)| (id, name.to_owned()))
        .collect();

    println!("{:>8}  {:<12} {:>8}  phase", "scroll", "trigger", "progress");
    let limit = stage.scroll_limit();
    let mut scroll = 0.0;
    loop {
        stage.jump_to(scroll);
        let report = stage.frame(0.0, &mut sink)?;
        for update in &report.triggers {
            let name = names.get(&update.id).map_or("?", String::as_str);
            println!(
                "{:>8.0}  {:<12} {:>8.3}  {:?}",
                report.scroll.position, name, update.progress, update.phase
            );
        }
        if scroll >= limit {
            break;
        }
        scroll = (scroll + args.step).min(limit);
    }
    Ok(())
}

async fn cmd_simulate(args: SimulateArgs, settings: &Settings) -> anyhow::Result<()> {
    let page = load_page(&args.page)?;
    let mut stage = make_stage(&page, settings)?;
    let mut sink = RecordingSink::new();
    let mut frames = FrameLoop::start(settings.fps)?;

    let mut elapsed = 0.0;
    let mut last = None;
    while elapsed < args.seconds {
        let Some(tick) = frames.next_frame().await else {
            break;
        };
        stage.wheel(args.wheel);
        let report = stage.frame(tick.dt, &mut sink)?;
        for name in &report.completed {
            eprintln!("{:>7.3}s  scene '{name}' completed", elapsed + tick.dt);
        }
        elapsed += tick.dt;
        last = Some(report);
    }
    frames.stop();
    stage.teardown();

    if let Some(report) = last {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    eprintln!(
        "{} frames, {} style updates",
        sink.frames(),
        sink.total_updates()
    );
    Ok(())
}

async fn cmd_send(args: SendArgs, settings: &Settings) -> anyhow::Result<()> {
    let credentials = settings.credentials()?;
    let client = EmailJsClient::new(settings.emailjs_endpoint.clone());
    let handler = ContactHandler::new(client, credentials);
    handler.set_field(Field::Name, args.name);
    handler.set_field(Field::Email, args.email);
    handler.set_field(Field::Message, args.message);

    let outcome = handler.submit().await;
    if let Some(notice) = outcome.notice() {
        println!("{}", notice.text());
    }
    outcome.into_result().context("send contact message")
}
