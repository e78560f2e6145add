use lifeline::assemble::build_canonical;
use lifeline::geom::point;
use lifeline::render::raster::{RasterError, RasterOptions, svg_to_png};
use lifeline::render::{HeadlessError, LayoutOptions, SvgRenderOptions, SvgSurface, sanitize_svg_id};
use lifeline::view::{DiagnosticData, NetworkGraphView};
use lifeline::{DiagramConfig, PointerOutcome};
use serde_json::{Value, json};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(json5::Error),
    Headless(HeadlessError),
    Render(lifeline_render::Error),
    Raster(RasterError),
    Json(serde_json::Error),
    DragRejected(usize),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "config error: {err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::DragRejected(i) => write!(f, "message {i} did not move"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<json5::Error> for CliError {
    fn from(value: json5::Error) -> Self {
        Self::Config(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<lifeline_render::Error> for CliError {
    fn from(value: lifeline_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<lifeline::Error> for CliError {
    fn from(value: lifeline::Error) -> Self {
        Self::Headless(value.into())
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Command {
    #[default]
    Render,
    Layout,
    Drag,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    format: RenderFormat,
    pretty: bool,
    width: Option<f64>,
    height: Option<f64>,
    scale: f32,
    config: Option<PathBuf>,
    id: Option<String>,
    out: Option<PathBuf>,
    message: Option<usize>,
    drag_y: Option<f64>,
}

fn usage() -> &'static str {
    "lifeline-cli\n\
\n\
USAGE:\n\
  lifeline-cli [render] [--format svg|png] [--scale <n>] [--width <w>] [--height <h>] [--config <path>] [--id <diagram-id>] [--out <path>]\n\
  lifeline-cli layout [--pretty] [--width <w>] [--height <h>] [--config <path>]\n\
  lifeline-cli drag --message <1-4> --y <y> [--format svg|png] [--width <w>] [--height <h>] [--config <path>] [--out <path>]\n\
\n\
NOTES:\n\
  - --config reads a JSON5 file merged over the built-in defaults.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to ./out.png.\n\
  - drag moves the given message to pointer y and renders the result.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next()
        .map(String::as_str)
        .ok_or(CliError::Usage(usage()))
}

fn parse_num<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    let mut seen_command = false;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" | "layout" | "drag" if !seen_command => {
                args.command = match a.as_str() {
                    "layout" => Command::Layout,
                    "drag" => Command::Drag,
                    _ => Command::Render,
                };
                seen_command = true;
            }
            "--format" => {
                args.format = match next_value(&mut it)? {
                    "svg" => RenderFormat::Svg,
                    "png" => RenderFormat::Png,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "--pretty" => args.pretty = true,
            "--width" => args.width = Some(parse_num(next_value(&mut it)?)?),
            "--height" => args.height = Some(parse_num(next_value(&mut it)?)?),
            "--scale" => args.scale = parse_num(next_value(&mut it)?)?,
            "--config" => args.config = Some(PathBuf::from(next_value(&mut it)?)),
            "--id" => args.id = Some(next_value(&mut it)?.to_string()),
            "--out" => args.out = Some(PathBuf::from(next_value(&mut it)?)),
            "--message" => args.message = Some(parse_num(next_value(&mut it)?)?),
            "--y" => args.drag_y = Some(parse_num(next_value(&mut it)?)?),
            _ => return Err(CliError::Usage(usage())),
        }
    }

    for v in [args.width, args.height, args.drag_y].into_iter().flatten() {
        if !v.is_finite() {
            return Err(CliError::Usage(usage()));
        }
    }
    if args.command == Command::Drag {
        match args.message {
            Some(1..=4) if args.drag_y.is_some() => {}
            _ => return Err(CliError::Usage(usage())),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<DiagramConfig, CliError> {
    let overrides: Value = match &args.config {
        Some(path) => json5::from_str(&std::fs::read_to_string(path)?)?,
        None => json!({}),
    };
    let mut cfg = DiagramConfig::with_overrides(&overrides);
    if let Some(w) = args.width {
        cfg.set_value("paper.width", json!(w));
    }
    if let Some(h) = args.height {
        cfg.set_value("paper.height", json!(h));
    }
    Ok(cfg)
}

fn write_bytes(out: Option<&PathBuf>, bytes: &[u8]) -> Result<(), CliError> {
    match out {
        Some(path) => std::fs::write(path, bytes)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn emit_svg(args: &Args, svg: &str) -> Result<(), CliError> {
    match args.format {
        RenderFormat::Svg => write_bytes(args.out.as_ref(), svg.as_bytes()),
        RenderFormat::Png => {
            let png = svg_to_png(
                svg,
                &RasterOptions {
                    scale: args.scale,
                    ..Default::default()
                },
            )?;
            let out = args.out.clone().unwrap_or_else(|| PathBuf::from("out.png"));
            write_bytes(Some(&out), &png)
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let cfg = load_config(&args)?;
    let paper = cfg.paper();

    match args.command {
        Command::Layout => {
            let diagram = build_canonical(&cfg)?;
            let json = lifeline_render::layout_graph_json(
                &diagram.graph,
                paper.width,
                paper.height,
                &LayoutOptions::default(),
                args.pretty,
            )?;
            write_bytes(None, json.as_bytes())
        }
        Command::Render => {
            let diagram = build_canonical(&cfg)?;
            let svg_options = SvgRenderOptions {
                diagram_id: args.id.as_deref().map(sanitize_svg_id),
                ..SvgRenderOptions::from(&paper)
            };
            let svg = lifeline::render::render_svg_sync(
                &diagram.graph,
                paper.width,
                paper.height,
                &LayoutOptions::default(),
                &svg_options,
            )?;
            emit_svg(&args, &svg)
        }
        Command::Drag => {
            let (Some(index), Some(y)) = (args.message, args.drag_y) else {
                return Err(CliError::Usage(usage()));
            };
            let threshold = cfg.interaction().move_threshold;
            let mut view = NetworkGraphView::with_config(SvgSurface::new(), cfg);
            view.process_data(&DiagnosticData::default())?;
            let id = view
                .diagram()
                .and_then(|d| d.messages.get(index - 1).copied())
                .ok_or(CliError::Usage(usage()))?;

            view.pointer_down(id, point(0.0, y))?;
            let mut outcome = PointerOutcome::Idle;
            for _ in 0..=threshold {
                outcome = view.pointer_move(point(0.0, y))?;
            }
            view.pointer_up();
            if !matches!(outcome, PointerOutcome::MessageMoved { .. }) {
                return Err(CliError::DragRejected(index));
            }
            let svg = view.surface().svg().unwrap_or_default().to_string();
            emit_svg(&args, &svg)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        match err {
            CliError::Usage(msg) => {
                eprintln!("{msg}");
                std::process::exit(2);
            }
            err => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}
