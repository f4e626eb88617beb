use clap::Parser;
use hdralign::{
    intersection, load_rgb16_image, register_sequence, DisplacementFinder, OwnedImage, Params,
    Rect, SequenceRegistration, Vec2,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Bracket-series alignment (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output (set RUST_LOG=hdralign=debug for per-region detail).
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ParamsJson {
    start_search_size: [usize; 2],
    start_correl_size: [usize; 2],
    max_regions_per_axis: usize,
    search_shrink_step: usize,
    correl_grow_step: usize,
    min_accepted_rho: f32,
    parallel: bool,
}

impl Default for ParamsJson {
    fn default() -> Self {
        let p = Params::default();
        Self {
            start_search_size: [p.start_search_size.x, p.start_search_size.y],
            start_correl_size: [p.start_correl_size.x, p.start_correl_size.y],
            max_regions_per_axis: p.max_regions_per_axis,
            search_shrink_step: p.search_shrink_step,
            correl_grow_step: p.correl_grow_step,
            min_accepted_rho: p.min_accepted_rho,
            parallel: p.parallel,
        }
    }
}

impl From<&ParamsJson> for Params {
    fn from(value: &ParamsJson) -> Self {
        Params {
            start_search_size: Vec2::new(value.start_search_size[0], value.start_search_size[1]),
            start_correl_size: Vec2::new(value.start_correl_size[0], value.start_correl_size[1]),
            max_regions_per_axis: value.max_regions_per_axis,
            search_shrink_step: value.search_shrink_step,
            correl_grow_step: value.correl_grow_step,
            min_accepted_rho: value.min_accepted_rho,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    image_paths: Vec<String>,
    output_path: Option<String>,
    params: ParamsJson,
}

#[derive(Debug, Serialize)]
struct PairRecord {
    reference: usize,
    target: usize,
    displacement: Option<[i32; 2]>,
    passes: Option<usize>,
    used_regions: Option<usize>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RectRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl From<Rect> for RectRecord {
    fn from(value: Rect) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    pairs: Vec<PairRecord>,
    offsets: Option<Vec<[i32; 2]>>,
    intersection: Option<RectRecord>,
}

impl Output {
    fn from_sequence(seq: &SequenceRegistration, sizes: &[Vec2<usize>]) -> Self {
        let pairs = seq
            .pairs
            .iter()
            .map(|pair| match &pair.outcome {
                Ok(reg) => PairRecord {
                    reference: pair.reference,
                    target: pair.target,
                    displacement: Some([reg.displacement.x, reg.displacement.y]),
                    passes: Some(reg.passes),
                    used_regions: Some(reg.aggregate.used),
                    error: None,
                },
                Err(err) => PairRecord {
                    reference: pair.reference,
                    target: pair.target,
                    displacement: None,
                    passes: None,
                    used_regions: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();

        let offsets = seq.cumulative_offsets().ok();
        let overlap = offsets
            .as_deref()
            .and_then(|offsets| intersection(sizes, offsets))
            .map(RectRecord::from);
        Self {
            pairs,
            offsets: offsets.map(|o| o.iter().map(|d| [d.x, d.y]).collect()),
            intersection: overlap,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("hdralign=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_paths.len() < 2 {
        return Err("image_paths must list at least two images".into());
    }

    let images = config
        .image_paths
        .iter()
        .map(load_rgb16_image)
        .collect::<Result<Vec<OwnedImage<u16>>, _>>()?;
    let views: Vec<_> = images.iter().map(OwnedImage::view).collect();
    let sizes: Vec<_> = views.iter().map(|v| v.size()).collect();

    let finder = DisplacementFinder::new().with_params(Params::from(&config.params));
    let seq = register_sequence(&finder, &views);
    for pair in &seq.pairs {
        if let Err(err) = &pair.outcome {
            tracing::warn!(first = pair.reference, second = pair.target, "pair failed: {err}");
        }
    }

    let output = Output::from_sequence(&seq, &sizes);
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
