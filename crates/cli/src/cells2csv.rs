//! cells2csv - Rebuild a table as CSV from detected cells and OCR tokens
//!
//! Reads two JSON files produced by upstream collaborators:
//! - cells: `[{"centroid": [x, y], "polygon": [[x, y], ...]}, ...]`
//! - tokens: `[{"box": [[x, y], [x, y], [x, y], [x, y]], "text": "...", "confidence": 0.9}, ...]`
//!
//! and writes one CSV line per reconstructed row.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use celltab_core::export::write_delimited;
use celltab_core::geometry::check_point;
use celltab_core::{CellRegion, LayoutSettings, Polygon, Token, extract_rows};
use clap::{ArgAction, Parser};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rebuild a table as CSV from detected cell regions and recognized text.
#[derive(Parser, Debug)]
#[command(name = "cells2csv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with detected cell regions
    #[arg(long)]
    cells: PathBuf,

    /// JSON file with recognized text tokens
    #[arg(long)]
    tokens: PathBuf,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Field delimiter (a single ASCII character)
    #[arg(long, default_value = ",")]
    delimiter: String,

    /// Band height in pixels for ordering tokens inside a cell
    #[arg(long = "token-band", default_value = "10")]
    token_band: i64,

    /// Band height in pixels for the coarse ordering of cells
    #[arg(long = "cell-band", default_value = "20")]
    cell_band: i64,

    /// Assign each token only to the smallest cell containing it
    #[arg(long, action = ArgAction::SetTrue)]
    exclusive: bool,

    /// Text inserted between tokens merged into one cell
    #[arg(long, default_value = "")]
    separator: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct CellRecord {
    centroid: [i64; 2],
    polygon: Vec<[i64; 2]>,
}

#[derive(Debug, Deserialize)]
struct TokenRecord {
    #[serde(rename = "box")]
    quad: [[f64; 2]; 4],
    text: String,
    #[serde(default)]
    confidence: f64,
}

impl CellRecord {
    fn into_cell(self) -> celltab_core::Result<CellRegion> {
        let points = self.polygon.into_iter().map(|[x, y]| (x, y)).collect();
        let polygon = Polygon::new(points)?;
        let centroid = check_point((self.centroid[0], self.centroid[1]))?;
        Ok(CellRegion::new(centroid, polygon))
    }
}

impl TokenRecord {
    fn into_token(self) -> celltab_core::Result<Token> {
        let corners = self.quad.map(|[x, y]| (x, y));
        Token::from_float_corners(corners, self.text, self.confidence)
    }
}

fn parse_cells(json: &str) -> Result<Vec<CellRegion>> {
    let records: Vec<CellRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.into_cell().with_context(|| format!("cell #{i}")))
        .collect()
}

fn parse_tokens(json: &str) -> Result<Vec<Token>> {
    let records: Vec<TokenRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.into_token().with_context(|| format!("token #{i}")))
        .collect()
}

fn read_json(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Build LayoutSettings from command line arguments.
fn build_settings(args: &Args) -> LayoutSettings {
    LayoutSettings {
        token_band_height: args.token_band,
        cell_band_height: args.cell_band,
        exclusive_assignment: args.exclusive,
        token_separator: args.separator.clone(),
        ..Default::default()
    }
}

fn delimiter_byte(s: &str) -> Result<u8> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => bail!("delimiter must be a single ASCII character, got {s:?}"),
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let settings = build_settings(args);
    let delimiter = delimiter_byte(&args.delimiter)?;

    let cells = parse_cells(&read_json(&args.cells)?)
        .with_context(|| format!("Invalid cells file {}", args.cells.display()))?;
    let tokens = parse_tokens(&read_json(&args.tokens)?)
        .with_context(|| format!("Invalid tokens file {}", args.tokens.display()))?;
    info!(cells = cells.len(), tokens = tokens.len(), "inputs loaded");

    // Build every row before touching the output so a failed run leaves
    // an existing file intact.
    let rows = extract_rows(cells, &tokens, &settings)?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("Failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    write_delimited(&rows, &mut output, delimiter)?;
    output.flush()?;
    info!(rows = rows.len(), "table written");
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells() {
        let json = r#"[
            {"centroid": [50, 25], "polygon": [[0, 0], [100, 0], [100, 50], [0, 50]]},
            {"centroid": [150, 25], "polygon": [[100, 0], [200, 0], [200, 50], [100, 50]]}
        ]"#;
        let cells = parse_cells(json).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].centroid(), (150, 25));
        assert_eq!(cells[0].polygon().points().len(), 4);
    }

    #[test]
    fn rejects_degenerate_polygon() {
        let json = r#"[{"centroid": [0, 0], "polygon": [[0, 0], [1, 1]]}]"#;
        let err = parse_cells(json).unwrap_err();
        assert!(format!("{err:#}").contains("cell #0"));
    }

    #[test]
    fn parses_tokens_with_float_corners() {
        let json = r#"[
            {"box": [[10.4, 5.6], [60.0, 5.6], [60.0, 20.5], [10.4, 20.5]],
             "text": "Total", "confidence": 0.87}
        ]"#;
        let tokens = parse_tokens(json).unwrap();
        assert_eq!(tokens[0].corners()[0], (10, 6));
        assert_eq!(tokens[0].centroid(), (35, 13));
        assert_eq!(tokens[0].text(), "Total");
    }

    #[test]
    fn confidence_defaults_to_zero() {
        let json = r#"[{"box": [[0, 0], [1, 0], [1, 1], [0, 1]], "text": "x"}]"#;
        let tokens = parse_tokens(json).unwrap();
        assert_eq!(tokens[0].confidence(), 0.0);
    }

    #[test]
    fn settings_follow_flags() {
        let args = Args::parse_from([
            "cells2csv",
            "--cells",
            "c.json",
            "--tokens",
            "t.json",
            "--exclusive",
            "--cell-band",
            "30",
            "--separator",
            " ",
        ]);
        let settings = build_settings(&args);
        assert!(settings.exclusive_assignment);
        assert_eq!(settings.cell_band_height, 30);
        assert_eq!(settings.token_band_height, 10);
        assert_eq!(settings.token_separator, " ");
    }

    #[test]
    fn delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(";").unwrap(), b';');
        assert_eq!(delimiter_byte("\t").unwrap(), b'\t');
        assert!(delimiter_byte("、").is_err());
        assert!(delimiter_byte(";;").is_err());
    }

    #[test]
    fn rejects_out_of_range_centroid() {
        let json = r#"[{"centroid": [9000000000, 0], "polygon": [[0, 0], [10, 0], [10, 10]]}]"#;
        let err = parse_cells(json).unwrap_err();
        assert!(format!("{err:#}").contains("outside"));
    }

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let cells = dir.join("cells.json");
        let tokens = dir.join("tokens.json");
        std::fs::write(
            &cells,
            r#"[{"centroid": [50, 25], "polygon": [[0, 0], [100, 0], [100, 50], [0, 50]]}]"#,
        )
        .unwrap();
        std::fs::write(
            &tokens,
            r#"[{"box": [[40, 20], [60, 20], [60, 30], [40, 30]], "text": "cell"}]"#,
        )
        .unwrap();
        (cells, tokens)
    }

    fn args_for(cells: &Path, tokens: &Path, outfile: &Path, extra: &[&str]) -> Args {
        let mut argv = vec![
            "cells2csv".to_string(),
            "--cells".to_string(),
            cells.display().to_string(),
            "--tokens".to_string(),
            tokens.display().to_string(),
            "-o".to_string(),
            outfile.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    #[test]
    fn failed_run_keeps_existing_outfile() {
        let dir = tempfile::tempdir().unwrap();
        let (cells, tokens) = write_inputs(dir.path());
        let outfile = dir.path().join("table.csv");
        std::fs::write(&outfile, "precious,data\n").unwrap();

        let args = args_for(&cells, &tokens, &outfile, &["--cell-band", "0"]);
        assert!(run(&args).is_err());
        assert_eq!(std::fs::read_to_string(&outfile).unwrap(), "precious,data\n");
    }

    #[test]
    fn successful_run_replaces_outfile() {
        let dir = tempfile::tempdir().unwrap();
        let (cells, tokens) = write_inputs(dir.path());
        let outfile = dir.path().join("table.csv");
        std::fs::write(&outfile, "stale\n").unwrap();

        run(&args_for(&cells, &tokens, &outfile, &[])).unwrap();
        assert_eq!(std::fs::read_to_string(&outfile).unwrap(), "cell\n");
    }
}
