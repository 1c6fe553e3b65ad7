use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;
use log::{debug, warn};
use serde::Serialize;
use spanjson::{Anomaly, Document, DocumentStats, NodeRef, ParseMode, ParseOptions};

#[derive(Parser, Debug)]
#[command(name = "spanjson", version, about = "Zero-copy JSON tree inspector")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Dot-separated key path to select before printing (e.g. a.b.c).
    #[arg(short, long, value_name = "path")]
    get: Option<String>,

    /// Print the selected array as a JSON list of floats.
    #[arg(long)]
    floats: bool,

    /// Value written for elements that are not numbers (with --floats).
    #[arg(
        long,
        value_name = "number",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    default: f32,

    /// Build the tree with reverse sibling links.
    #[arg(short, long)]
    reverse: bool,

    /// JSON file with parse options ({"mode": ..., "arena": {...}}).
    #[arg(long, value_name = "file")]
    config: Option<String>,

    /// Arena page size in bytes.
    #[arg(long = "page-bytes", value_name = "bytes")]
    page_bytes: Option<usize>,

    /// Maximum number of arena pages before the parse fails.
    #[arg(long = "max-pages", value_name = "count")]
    max_pages: Option<usize>,

    /// Print node and page counts plus anomalies as JSON.
    #[arg(long)]
    stats: bool,

    /// Indentation size (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,
}

#[derive(Serialize)]
struct Report<'d> {
    #[serde(flatten)]
    stats: DocumentStats,
    anomalies: &'d [Anomaly],
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let options = resolve_options(&args)?;
    let buffer = read_input(args.input.as_deref())?;

    let doc = spanjson::parse_bytes(&buffer, &options)?;
    for anomaly in doc.anomalies() {
        warn!("{anomaly:?}");
    }

    with_output_writer(args.output.as_deref(), |writer| {
        if args.stats {
            return write_stats(writer, &doc, args.indent);
        }
        let target = select(&doc, args.get.as_deref())?;
        if args.floats {
            write_floats(writer, target, args.default, doc.mode())
        } else {
            write_outline(writer, target, args.indent)
        }
    })?;

    doc.release();
    Ok(())
}

fn resolve_options(args: &Args) -> Result<ParseOptions, Box<dyn Error>> {
    let mut options = match args.config.as_deref() {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => ParseOptions::new(),
    };
    if args.reverse {
        options = options.with_mode(ParseMode::Reverse);
    }
    if let Some(page_bytes) = args.page_bytes {
        options = options.with_page_bytes(page_bytes);
    }
    if args.max_pages.is_some() {
        options = options.with_max_pages(args.max_pages);
    }
    debug!("parse options: {options:?}");
    Ok(options)
}

fn read_input(input: Option<&str>) -> Result<Vec<u8>, Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read(path)?),
    }
}

fn select<'d, 'a>(
    doc: &'d Document<'a>,
    path: Option<&str>,
) -> Result<NodeRef<'d, 'a>, Box<dyn Error>> {
    let root = doc.root().ok_or("document has no root value")?;
    match path {
        None | Some("") => Ok(root),
        Some(path) => root
            .path(path.split('.'))
            .ok_or_else(|| format!("key path not found: {path}").into()),
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json<T: Serialize>(
    writer: &mut dyn Write,
    value: &T,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(&mut *writer, value)?;
    } else {
        let indent_bytes = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        value.serialize(&mut serializer)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_stats(
    writer: &mut dyn Write,
    doc: &Document<'_>,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    let report = Report {
        stats: doc.stats(),
        anomalies: doc.anomalies(),
    };
    write_json(writer, &report, indent)
}

fn write_floats(
    writer: &mut dyn Write,
    node: NodeRef<'_, '_>,
    default: f32,
    mode: ParseMode,
) -> Result<(), Box<dyn Error>> {
    let array = node.as_array().ok_or("selected value is not an array")?;
    let mut values = vec![default; array.count()];
    let written = array.extract_f32(&mut values, default, None, mode.is_reverse());
    values.truncate(written);
    write_json(writer, &values, 0)
}

fn write_outline(
    writer: &mut dyn Write,
    node: NodeRef<'_, '_>,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    let mut stack = vec![(node, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        write!(writer, "{:width$}", "", width = depth * indent)?;
        if let Some(key) = node.key() {
            write!(writer, "{key}: ")?;
        }
        match node.text() {
            Some(text) => writeln!(writer, "{text}")?,
            None if node.is_array() => writeln!(writer, "array[{}]", node.count())?,
            None => writeln!(writer, "object")?,
        }
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
    Ok(())
}
