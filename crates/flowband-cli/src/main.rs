mod records;

use flowband::SankeyInput;
use flowband::render::raster::{self, RasterOptions};
use flowband::render::{RenderOptions, render_svg};
use std::io::{Read, Write};
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Records(String),
    Layout(flowband::Error),
    Render(flowband::render::HeadlessError),
    Raster(raster::RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Records(err) => write!(f, "record error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<flowband::Error> for CliError {
    fn from(value: flowband::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<flowband::render::HeadlessError> for CliError {
    fn from(value: flowband::render::HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<raster::RasterError> for CliError {
    fn from(value: raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    aspect: Option<f64>,
    right_color: bool,
    left_order: Option<Vec<String>>,
    right_order: Option<Vec<String>>,
    colors: Vec<(String, String)>,
    font_size: Option<f64>,
    font_family: Option<String>,
    render_format: RenderFormat,
    scale: Option<f32>,
    background: Option<String>,
    diagram_id: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "flowband-cli\n\
\n\
USAGE:\n\
  flowband-cli [layout] [--pretty] [DATA-OPTIONS] [<path>|-]\n\
  flowband-cli render [--format svg|png|jpg] [--scale <n>] [--background <css-color>]\n\
                      [--font-size <n>] [--font-family <name>] [--id <diagram-id>]\n\
                      [--out <path>] [DATA-OPTIONS] [<path>|-]\n\
\n\
DATA-OPTIONS:\n\
  --aspect <n>           vertical extent in units of horizontal extent (default 4)\n\
  --right-color          color strips by their right label instead of their left label\n\
  --left-order a,b,...   explicit stacking order for the left side\n\
  --right-order x,y,...  explicit stacking order for the right side\n\
  --color label=<color>  explicit color for a label (repeatable; must cover every label)\n\
\n\
INPUT:\n\
  CSV records `left,right[,leftWeight[,rightWeight]]` from <path>, or stdin with `-`.\n\
  Missing weights default to 1 (left) and to the left weight (right).\n\
\n\
NOTES:\n\
  - `layout` prints the computed geometry as JSON.\n\
  - `render` prints SVG to stdout unless `--out` is given; raster formats\n\
    default to a white background and a 150 DPI scale.\n"
}

fn parse_args() -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1).peekable();

    match it.peek().map(String::as_str) {
        Some("layout") => {
            it.next();
        }
        Some("render") => {
            args.command = Command::Render;
            it.next();
        }
        _ => {}
    }

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            "--pretty" => args.pretty = true,
            "--right-color" => args.right_color = true,
            "--aspect" => {
                args.aspect = Some(
                    next_value(&mut it)?
                        .parse()
                        .map_err(|_| CliError::Usage("invalid --aspect value"))?,
                );
            }
            "--left-order" => {
                args.left_order = Some(split_labels(&next_value(&mut it)?));
            }
            "--right-order" => {
                args.right_order = Some(split_labels(&next_value(&mut it)?));
            }
            "--color" => {
                let value = next_value(&mut it)?;
                let Some((label, color)) = value.split_once('=') else {
                    return Err(CliError::Usage("--color expects label=<color>"));
                };
                args.colors.push((label.to_string(), color.to_string()));
            }
            "--font-size" => {
                args.font_size = Some(
                    next_value(&mut it)?
                        .parse()
                        .map_err(|_| CliError::Usage("invalid --font-size value"))?,
                );
            }
            "--font-family" => args.font_family = Some(next_value(&mut it)?),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse()
                    .map_err(|_| CliError::Usage("invalid --format (svg|png|jpg)"))?;
            }
            "--scale" => {
                args.scale = Some(
                    next_value(&mut it)?
                        .parse()
                        .map_err(|_| CliError::Usage("invalid --scale value"))?,
                );
            }
            "--background" => args.background = Some(next_value(&mut it)?),
            "--id" => args.diagram_id = Some(next_value(&mut it)?),
            "--out" => args.out = Some(next_value(&mut it)?),
            _ if arg.starts_with("--") => return Err(CliError::Usage("unknown option")),
            _ => {
                if args.input.is_some() {
                    return Err(CliError::Usage("multiple inputs given"));
                }
                args.input = Some(arg);
            }
        }
    }
    Ok(args)
}

fn next_value(
    it: &mut std::iter::Peekable<impl Iterator<Item = String>>,
) -> Result<String, CliError> {
    it.next().ok_or(CliError::Usage("missing option value"))
}

fn split_labels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn build_input(args: &Args, table: records::RecordTable) -> SankeyInput {
    let mut input = SankeyInput::from_nullable(table.left, table.right);
    input.left_weight = table.left_weight;
    input.right_weight = table.right_weight;
    input.left_labels = args.left_order.clone();
    input.right_labels = args.right_order.clone();
    if !args.colors.is_empty() {
        input.colors = Some(args.colors.iter().cloned().collect());
    }
    if let Some(aspect) = args.aspect {
        input.aspect = aspect;
    }
    input.right_color = args.right_color;
    input
}

/// Raster output defaults to the input path with the format's extension,
/// stdout only for stdin input.
fn raster_out_path(args: &Args, ext: &str) -> Option<String> {
    if args.out.is_some() {
        return args.out.clone();
    }
    match args.input.as_deref() {
        Some(path) if path != "-" => Some(
            std::path::Path::new(path)
                .with_extension(ext)
                .to_string_lossy()
                .into_owned(),
        ),
        _ => None,
    }
}

fn write_output(out: Option<&str>, bytes: &[u8]) -> Result<(), CliError> {
    match out {
        Some(path) => std::fs::write(path, bytes)?,
        None => std::io::stdout().write_all(bytes)?,
    }
    Ok(())
}

fn run() -> Result<(), CliError> {
    let args = parse_args()?;
    let text = read_input(args.input.as_deref())?;
    let table = records::parse_records(&text).map_err(CliError::Records)?;
    let input = build_input(&args, table);

    match args.command {
        Command::Layout => {
            let layout = flowband::compute_layout(&input)?;
            let json = if args.pretty {
                serde_json::to_string_pretty(&layout)?
            } else {
                serde_json::to_string(&layout)?
            };
            let mut bytes = json.into_bytes();
            bytes.push(b'\n');
            write_output(args.out.as_deref(), &bytes)
        }
        Command::Render => {
            let mut options = RenderOptions::default();
            options.diagram_id = args.diagram_id.clone();
            if let Some(font_size) = args.font_size {
                options.font_size = font_size;
            }
            if let Some(font_family) = &args.font_family {
                options.font_family = font_family.clone();
            }
            if let Some(background) = &args.background {
                options.background = Some(background.clone());
            }

            let layout = flowband::compute_layout(&input)?;
            let svg = render_svg(&layout, &options)
                .map_err(flowband::render::HeadlessError::Render)?;

            let mut raster_options = RasterOptions::default();
            if let Some(scale) = args.scale {
                raster_options.scale = scale;
            }
            raster_options.background =
                Some(args.background.clone().unwrap_or_else(|| "white".to_string()));

            match args.render_format {
                RenderFormat::Svg => write_output(args.out.as_deref(), svg.as_bytes()),
                RenderFormat::Png => {
                    let bytes = raster::svg_to_png(&svg, &raster_options)?;
                    let out = raster_out_path(&args, "png");
                    write_output(out.as_deref(), &bytes)
                }
                RenderFormat::Jpeg => {
                    let bytes = raster::svg_to_jpeg(&svg, &raster_options)?;
                    let out = raster_out_path(&args, "jpg");
                    write_output(out.as_deref(), &bytes)
                }
            }
        }
    }
}

fn main() {
    if let Err(err) = run() {
        match err {
            CliError::Usage(msg) => {
                eprintln!("{msg}");
            }
            other => eprintln!("error: {other}"),
        }
        std::process::exit(1);
    }
}
