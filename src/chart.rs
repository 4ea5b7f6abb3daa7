//! Line-chart rendering of a finished run.
//!
//! Writes a self-contained SVG with one polyline per sex, axis labels and a
//! legend. The markup is built by hand; nothing here depends on the
//! simulation itself.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::report::TimeSeriesRow;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

const FEMALE_COLOR: &str = "#d0552a";
const MALE_COLOR: &str = "#2a6fd0";

pub fn svg_file_name(species: &str) -> String {
    format!("{species}_population.svg")
}

/// Render the full time series to an SVG file.
pub fn render(series: &[TimeSeriesRow], species: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let svg = build_svg(series, species)?;
    fs::write(path, svg)
        .with_context(|| format!("Failed to write chart file {}", path.display()))?;
    Ok(())
}

fn build_svg(series: &[TimeSeriesRow], species: &str) -> Result<String> {
    if series.is_empty() {
        bail!("cannot chart an empty time series");
    }

    let max_tick = series.iter().map(|row| row.tick).max().unwrap_or(0).max(1);
    let max_count = series
        .iter()
        .map(|row| row.female.max(row.male))
        .max()
        .unwrap_or(0)
        .max(1);

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let x = |tick: u64| MARGIN_LEFT + plot_width * tick as f64 / max_tick as f64;
    let y = |count: u64| MARGIN_TOP + plot_height * (1.0 - count as f64 / max_count as f64);

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    )?;
    writeln!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="20">Population Model</text>"#,
        WIDTH / 2.0
    )?;

    // Axes.
    writeln!(
        svg,
        r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#,
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = HEIGHT - MARGIN_BOTTOM
    )?;
    writeln!(
        svg,
        r#"<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
        l = MARGIN_LEFT,
        r = WIDTH - MARGIN_RIGHT,
        b = HEIGHT - MARGIN_BOTTOM
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">Tick</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        HEIGHT - 20.0
    )?;
    writeln!(
        svg,
        r#"<text x="20" y="{:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {:.1})">Population of {species}</text>"#,
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    )?;

    // Extremes on both axes, enough to read the scale.
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">0</text>"#,
        MARGIN_LEFT,
        HEIGHT - MARGIN_BOTTOM + 20.0
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{max_tick}</text>"#,
        WIDTH - MARGIN_RIGHT,
        HEIGHT - MARGIN_BOTTOM + 20.0
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{max_count}</text>"#,
        MARGIN_LEFT - 8.0,
        MARGIN_TOP + 5.0
    )?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">0</text>"#,
        MARGIN_LEFT - 8.0,
        HEIGHT - MARGIN_BOTTOM + 5.0
    )?;

    let series_defs: [(&str, &str, fn(&TimeSeriesRow) -> u64); 2] = [
        (FEMALE_COLOR, "Female Population", |row| row.female),
        (MALE_COLOR, "Male Population", |row| row.male),
    ];
    for (color, label, pick) in series_defs {
        let mut points = String::new();
        for row in series {
            write!(points, "{:.1},{:.1} ", x(row.tick), y(pick(row)))?;
        }
        writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="1.5"><title>{label}</title></polyline>"#,
            points.trim_end()
        )?;
    }

    // Legend, top right corner of the plot area.
    let legend_x = WIDTH - MARGIN_RIGHT - 180.0;
    for (index, (color, label)) in [(FEMALE_COLOR, "Female Population"), (MALE_COLOR, "Male Population")]
        .iter()
        .enumerate()
    {
        let row_y = MARGIN_TOP + 15.0 + index as f64 * 20.0;
        writeln!(
            svg,
            r#"<line x1="{legend_x:.1}" y1="{row_y:.1}" x2="{:.1}" y2="{row_y:.1}" stroke="{color}" stroke-width="1.5"/>"#,
            legend_x + 25.0
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="13">{label}</text>"#,
            legend_x + 32.0,
            row_y + 4.0
        )?;
    }

    writeln!(svg, "</svg>")?;
    Ok(svg)
}
