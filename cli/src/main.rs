use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::{ArgAction, Parser};
use formnest::{DecodeOptions, DuplicateKeys, EncodeOptions, NullStyle};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "formnest",
    version,
    about = "Rebuild nested JSON from bracket-notation form fields"
)]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Input is a flat JSON object instead of a url-encoded body.
    #[arg(long, conflicts_with_all = ["lines", "encode"])]
    json: bool,

    /// Input is newline-delimited JSON, one flat object per line.
    #[arg(long, conflicts_with = "encode")]
    lines: bool,

    /// Flatten nested JSON into a url-encoded body instead.
    #[arg(short = 'e', long)]
    encode: bool,

    /// Fail on keys that overwrite each other instead of letting the last one win.
    #[arg(long)]
    strict: bool,

    /// Largest digit segment treated as an array index.
    #[arg(long = "max-index", value_name = "number", conflicts_with = "no_max_index")]
    max_index: Option<usize>,

    /// Treat every digit segment as an array index, however large.
    #[arg(long = "no-max-index")]
    no_max_index: bool,

    /// Null holes one body may open in arrays before further keys are skipped.
    #[arg(long = "max-holes", value_name = "number", conflicts_with = "no_max_holes")]
    max_holes: Option<usize>,

    /// Let arrays grow any number of holes (trusted input only).
    #[arg(long = "no-max-holes")]
    no_max_holes: bool,

    /// Keep only the last value of a repeated field instead of collecting an array.
    #[arg(long = "last-wins")]
    last_wins: bool,

    /// Encode null leaves as empty fields instead of dropping them.
    #[arg(long = "empty-nulls")]
    empty_nulls: bool,

    /// JSON indentation size, 0 for compact output (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Decode,
    Json,
    Lines,
    Encode,
}

impl Mode {
    fn from_args(args: &Args) -> Self {
        if args.encode {
            Mode::Encode
        } else if args.lines {
            Mode::Lines
        } else if args.json {
            Mode::Json
        } else {
            Mode::Decode
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Mode::Encode => "Encoded",
            Mode::Decode | Mode::Json | Mode::Lines => "Decoded",
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = run(&args) {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let input = read_input(args.input.as_deref())?;
    let mode = Mode::from_args(args);
    debug!(?mode, bytes = input.len(), "read input");

    let output = match mode {
        Mode::Decode => {
            let body = input.trim_end_matches(['\r', '\n']);
            let value = formnest::decode_to_value_with_options(body, &decode_options(args))?;
            render_json(&value, args.indent)?
        }
        Mode::Json => {
            let flat: Map<String, Value> = serde_json::from_str(&input)
                .map_err(|err| format!("input must be a flat JSON object: {err}"))?;
            let nested = formnest::decode::from_flat_map(flat, &decode_options(args))?;
            render_json(&Value::Object(nested), args.indent)?
        }
        Mode::Lines => run_lines(&input, &decode_options(args))?,
        Mode::Encode => {
            let value: Value = serde_json::from_str(&input)?;
            formnest::to_string_with_options(&value, &encode_options(args))?
        }
    };

    write_output(args.output.as_deref(), output.as_bytes())?;
    if let Some(path) = args.output.as_deref().filter(|path| *path != "-") {
        let input_label = match args.input.as_deref() {
            None | Some("-") => "stdin",
            Some(path) => path,
        };
        println!("✔ {} {input_label} → {path}", mode.verb());
    }
    Ok(())
}

fn run_lines(input: &str, options: &DecodeOptions) -> Result<String, Box<dyn Error>> {
    let mut line_numbers = Vec::new();
    let mut bodies = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = idx + 1;
        let flat: Map<String, Value> = serde_json::from_str(line).map_err(|err| {
            format!("line {line_number}: input must be a flat JSON object: {err}")
        })?;
        line_numbers.push(line_number);
        bodies.push(flat);
    }

    let mut out = String::new();
    let results = formnest::transcode_batch(&bodies, options);
    for (line, result) in line_numbers.into_iter().zip(results) {
        let nested = result.map_err(|err| format!("line {line}: {err}"))?;
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&serde_json::to_string(&Value::Object(nested))?);
    }
    Ok(out)
}

fn decode_options(args: &Args) -> DecodeOptions {
    let mut options = DecodeOptions::new().with_strict(args.strict);
    if args.no_max_index {
        options = options.with_max_index(None);
    } else if let Some(max_index) = args.max_index {
        options = options.with_max_index(Some(max_index));
    }
    if args.no_max_holes {
        options = options.with_max_holes(None);
    } else if let Some(max_holes) = args.max_holes {
        options = options.with_max_holes(Some(max_holes));
    }
    if args.last_wins {
        options = options.with_duplicates(DuplicateKeys::Last);
    }
    options
}

fn encode_options(args: &Args) -> EncodeOptions {
    if args.empty_nulls {
        EncodeOptions::new().with_nulls(NullStyle::Empty)
    } else {
        EncodeOptions::new()
    }
}

fn read_input(input: Option<&str>) -> Result<String, Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
    }
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) if path != "-" => fs::write(path, data)?,
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(data)?;
        }
    }
    Ok(())
}

fn render_json(value: &Value, indent: usize) -> Result<String, Box<dyn Error>> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}
