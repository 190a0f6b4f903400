//! `collage-render`: render a saved collage to PNG or JPEG offline.
//!
//! Reads either a snapshot JSON file or the snapshot slot of a store
//! directory (as written by `FileStore`), rasterizes it the same way the
//! browser export does, and writes the encoded image.
//!
//! ```text
//! collage-render <snapshot.json> <out.png|out.jpeg> [--font FAMILY=PATH]...
//! collage-render --store-dir DIR [--key KEY] <out> [--font FAMILY=PATH]...
//! ```

use collage_core::snapshot::Snapshot;
use collage_editor::config::DEFAULT_STORAGE_KEY;
use collage_editor::store::{FileStore, SnapshotStore};
use collage_render::{ExportFormat, FontBook, Rasterizer};
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: collage-render <snapshot.json | --store-dir DIR [--key KEY]> \
<out.png|out.jpeg> [--font FAMILY=PATH]... [--format png|jpeg]";

/// Where the snapshot comes from.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    File(PathBuf),
    Store { dir: PathBuf, key: String },
}

#[derive(Debug, Clone, PartialEq)]
struct Args {
    input: Input,
    output: PathBuf,
    format: Option<ExportFormat>,
    fonts: Vec<(String, PathBuf)>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut store_dir = None;
    let mut key = None;
    let mut format = None;
    let mut fonts = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "--store-dir" => store_dir = Some(PathBuf::from(value("--store-dir")?)),
            "--key" => key = Some(value("--key")?),
            "--format" => {
                let name = value("--format")?;
                format = Some(name.parse::<ExportFormat>().map_err(|e| e.to_string())?);
            }
            "--font" => {
                let pair = value("--font")?;
                let (family, path) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("--font expects FAMILY=PATH, got '{pair}'"))?;
                fonts.push((family.to_string(), PathBuf::from(path)));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let (input, output) = match (store_dir, positional.as_slice()) {
        (Some(dir), [output]) => (
            Input::Store {
                dir,
                key: key.unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            },
            output.clone(),
        ),
        (None, [input, output]) => (Input::File(input.clone()), output.clone()),
        _ => return Err(USAGE.to_string()),
    };

    Ok(Args {
        input,
        output,
        format,
        fonts,
    })
}

/// Format from `--format`, else from the output extension.
fn output_format(args: &Args) -> Result<ExportFormat, String> {
    if let Some(format) = args.format {
        return Ok(format);
    }
    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| {
            format!("cannot tell format of '{}'; pass --format", args.output.display())
        })?;
    ext.parse().map_err(|e: collage_render::RenderError| e.to_string())
}

fn load_snapshot(input: &Input) -> Result<Snapshot, String> {
    let text = match input {
        Input::File(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {e}", path.display()))?,
        Input::Store { dir, key } => FileStore::new(dir)
            .load(key)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("no saved collage under '{key}' in '{}'", dir.display()))?,
    };
    Snapshot::from_json(&text).map_err(|e| e.to_string())
}

fn load_fonts(fonts: &[(String, PathBuf)]) -> Result<FontBook, String> {
    let mut book = FontBook::new();
    for (family, path) in fonts {
        let data = std::fs::read(path)
            .map_err(|e| format!("cannot read font '{}': {e}", path.display()))?;
        book.register(family, data).map_err(|e| e.to_string())?;
    }
    Ok(book)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), String> {
    std::fs::write(path, bytes).map_err(|e| format!("cannot write '{}': {e}", path.display()))
}

fn run(args: &Args) -> Result<(), String> {
    let format = output_format(args)?;
    let snapshot = load_snapshot(&args.input)?;
    let scene = snapshot.scene();
    log::info!(
        "rendering {}×{} collage with {} object(s)",
        scene.width,
        scene.height,
        scene.len()
    );

    let mut rasterizer = Rasterizer::new(load_fonts(&args.fonts)?);
    let bytes = rasterizer.export(scene, format).map_err(|e| e.to_string())?;
    write_output(&args.output, &bytes)?;
    log::info!("wrote {} ({} bytes)", args.output.display(), bytes.len());
    Ok(())
}

fn main() {
    env_logger::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return;
    }

    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("collage-render error: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = run(&args) {
        eprintln!("collage-render error: {e}");
        std::process::exit(1);
    }
}
