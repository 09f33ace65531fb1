//! restyle - print a source file with incremental syntax highlighting

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use restyle::minimap::Minimap;
use restyle::syntax::{StyleTag, SyntaxManager};
use restyle::terminal::Terminal;
use restyle::viewport::LineIndex;
use restyle::{Config, Result};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    profile: Option<String>,
    lines: Option<(usize, usize)>,
    spans: bool,
    minimap: bool,
    list: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RESTYLE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn parse_lines(value: &str) -> Option<(usize, usize)> {
    let (first, count) = value.split_once(':')?;
    Some((first.trim().parse().ok()?, count.trim().parse().ok()?))
}

fn parse_args(args: &[String]) -> std::result::Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--profile" => {
                let name = iter.next().ok_or("--profile needs a NAME")?;
                options.profile = Some(name.clone());
            }
            "--lines" => {
                let value = iter.next().ok_or("--lines needs FIRST:COUNT")?;
                options.lines = Some(parse_lines(value).ok_or_else(|| format!("bad --lines value: {value}"))?);
            }
            "--spans" => options.spans = true,
            "--minimap" => options.minimap = true,
            "--list" => options.list = true,
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            other => options.file = Some(PathBuf::from(other)),
        }
    }
    Ok(Some(options))
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => return Ok(()),
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(2);
        }
    };

    let config = Config::load();
    let mut manager = SyntaxManager::with_config(&config);

    if options.list {
        for name in manager.list_profiles() {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(path) = options.file else {
        print_usage();
        process::exit(2);
    };
    let text = fs::read_to_string(&path)?;
    let profile = match &options.profile {
        Some(name) => Some(manager.profile(name)?),
        None => manager.detect_profile(&path),
    };

    let index = LineIndex::new(&text);
    let range = match options.lines {
        Some((first, count)) => index.viewport_range(first, count),
        None => 0..text.len(),
    };

    let mut tags: Vec<StyleTag> = Vec::new();
    if let Some(profile) = profile {
        manager.open_buffer(0, &text, profile);
        manager.restyle_range(0, &text, range.start, range.end, &mut tags)?;
    }

    let mut term = Terminal::new(io::stdout().lock());
    if options.spans {
        term.write_spans(&tags)?;
    } else {
        term.write_styled(&text, &tags, range)?;
    }

    if options.minimap {
        let mut all: Vec<StyleTag> = Vec::new();
        manager.restyle_range(0, &text, 0, text.len(), &mut all)?;
        let minimap = Minimap::build(&text, &all, config.minimap_width, config.lines_per_minimap_row);
        term.write_str("\n")?;
        term.write_minimap(&minimap)?;
    }

    manager.close_buffer(0);
    Ok(())
}

fn print_usage() {
    println!("restyle {} - incremental syntax highlighter", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: restyle [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  --profile NAME       Use the named language profile");
    println!("  --lines FIRST:COUNT  Restyle only COUNT lines from line FIRST (0-based)");
    println!("  --spans              Print style tags instead of colored text");
    println!("  --minimap            Print a minimap after the text");
    println!("  --list               List available language profiles");
    println!("  -h, --help           Show this help message");
    println!("  -V, --version        Show version information");
    println!();
    println!("Settings are read from ~/.restyle.conf; set RESTYLE_LOG for diagnostics.");
}

fn print_version() {
    println!("restyle {}", env!("CARGO_PKG_VERSION"));
}
