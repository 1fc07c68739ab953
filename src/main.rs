use clap::Parser;
use kml_layers::convert::Measure;
use kml_layers::read_kml::{kml_files, read_file};
use kml_layers::{Layer, ParseOptions, ParsedKml, export};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// Compile KML documents and print what they contain.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// KML files, or directories searched recursively for *.kml
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// URL the documents were loaded from, used for relative icon hrefs
    /// (default: $KML_SOURCE_URL, then the file location)
    #[arg(long)]
    source_url: Option<String>,
    /// Fail a document on ground overlays without bounds
    #[arg(long)]
    strict: bool,
    /// Write every layer of every document as one GeoJSON FeatureCollection
    #[arg(long)]
    geojson: Option<PathBuf>,
}

fn source_url_env() -> Option<String> {
    env::var("KML_SOURCE_URL").ok().filter(|s| !s.is_empty())
}

fn summary(name: &str, parsed: &ParsedKml) {
    let features = parsed.features();
    let shapes: usize = parsed.layers.iter().map(Layer::count_shapes).sum();
    println!("{}", name);
    println!("     layers: {}", parsed.layers.len());
    println!("   features: {}", features.len());
    println!("     shapes: {}", shapes);
    println!("   overlays: {}", parsed.overlays().len());
    println!("     coords: {}", parsed.coordinates.len());
    if let Some(bounds) = parsed.bounds() {
        println!("     bounds: {}", bounds);
    }

    let mut length = 0f64;
    let mut area = 0f64;
    for shape in features.iter().flat_map(|f| f.shapes.iter()) {
        match shape.measure() {
            Measure::Length(m) => length += m,
            Measure::Area(a) => area += a,
            Measure::Point => {}
        }
    }
    println!("     length: {:.1} m", length);
    println!("       area: {:.1} m2", area);
    println!();
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();
    let options = ParseOptions {
        source_url: args.source_url.clone().or_else(source_url_env),
        strict: args.strict,
    };

    let mut layers = Vec::new();
    let mut failed = 0;
    for path in &args.paths {
        for file in kml_files(path) {
            match read_file(&file, &options) {
                Ok(parsed) => {
                    summary(&file.display().to_string(), &parsed);
                    layers.extend(parsed.layers);
                }
                Err(e) => {
                    log::error!("{}", e);
                    failed += 1;
                }
            }
        }
    }

    if let Some(out) = &args.geojson {
        if let Err(e) = std::fs::write(out, export::to_geojson_string(&layers)) {
            log::error!("cannot write {}: {}", out.display(), e);
            return ExitCode::FAILURE;
        }
        log::info!("wrote {} layers to {}", layers.len(), out.display());
    }

    if failed > 0 {
        log::error!("{} documents failed to load", failed);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
