//! Chartdeck CLI
//!
//! Command-line access to the dashboard's derivations, without a browser:
//! - Preview a CSV file
//! - Build a chart figure
//! - Generate a config file

use anyhow::{bail, Context};
use chartdeck::chart::{build_chart, ChartKind, ChartSelection};
use chartdeck::ingest::{Scalar, Table};
use chartdeck::options::{DataOptions, PreviewTable};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chartdeck-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Preview CSV files and build chart figures")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the first rows and the columns of a CSV file
    Preview {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Build a chart and print its figure JSON
    Chart {
        /// Path to CSV file
        path: PathBuf,
        /// X-axis column
        #[arg(short, long)]
        x: String,
        /// Y-axis columns (repeatable)
        #[arg(short, long)]
        y: Vec<String>,
        /// Color column
        #[arg(short, long)]
        color: Option<String>,
        /// Chart type (scatter, line, bar, histogram, box, violin, heatmap, sunburst)
        #[arg(short, long, default_value = "scatter")]
        kind: ChartKind,
        /// Number of histogram bins
        #[arg(short, long)]
        bins: Option<i64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { path } => {
            let table = read_table(&path)?;
            let options = DataOptions::derive(Some(&table));

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                println!(
                    "{} rows, {} columns",
                    table.row_count(),
                    table.column_count()
                );
                println!("Columns:");
                for (column, option) in table.columns().iter().zip(&options.x_options.0) {
                    println!("  {} ({:?})", option.label, column.kind);
                }
                println!();
                println!("{}", options.caption);
                print_preview(&options.preview);
            }
        }

        Commands::Chart {
            path,
            x,
            y,
            color,
            kind,
            bins,
        } => {
            let table = read_table(&path)?;

            let mut selection = ChartSelection::new(kind).x(x);
            for column in y {
                selection = selection.y(column);
            }
            if let Some(color) = color {
                selection = selection.color(color);
            }
            if let Some(bins) = bins {
                selection = selection.bins(bins);
            }

            let figure = build_chart(&table, &selection)
                .with_context(|| format!("Cannot build {} chart", kind))?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string(&figure)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&figure)?);
            }
        }

        Commands::Config { output } => {
            let config = chartdeck::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn read_table(path: &Path) -> anyhow::Result<Table> {
    if !path.exists() {
        bail!("File not found: {:?}", path);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {:?} as UTF-8 text", path))?;

    Table::from_csv_str(&text).with_context(|| format!("Cannot parse {:?}", path))
}

fn print_preview(preview: &PreviewTable) {
    let cell = |value: &Scalar| value.as_label().unwrap_or_default();

    let widths: Vec<usize> = preview
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            preview
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|v| cell(v).len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = preview
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{:<w$}", name, w = w))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in &preview.rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, w)| format!("{:<w$}", cell(value), w = w))
            .collect();
        println!("{}", line.join("  "));
    }
}
