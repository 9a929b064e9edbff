use std::fmt::{self, Write as FmtWrite};

use anyhow::Context;
use serde::Serialize;

use crate::report::figure::Figure;

const WIDTH: f64 = 800.0;
const LABEL_WIDTH: f64 = 130.0;
const MARGIN_RIGHT: f64 = 20.0;
const TITLE_HEIGHT: f64 = 28.0;
const TRACK_HEADER: f64 = 18.0;
const LANE_HEIGHT: f64 = 14.0;
const TRACK_GAP: f64 = 8.0;
const AXIS_HEIGHT: f64 = 30.0;

// ---------------------------------------------------------------------------
// Embeddable fragments
// ---------------------------------------------------------------------------

/// Script and markup fragments dropped into the page template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Components {
    pub script: String,
    pub div: String,
}

/// Serialize a figure into `{script, div}`; both are empty without a figure.
pub fn components(figure: Option<&Figure>) -> anyhow::Result<Components> {
    let Some(figure) = figure else {
        return Ok(Components::default());
    };

    // `</` would close the script element early.
    let json = serde_json::to_string(figure)
        .context("serializing figure")?
        .replace("</", "<\\/");
    let svg = render_svg(figure).context("drawing figure")?;
    Ok(Components {
        script: format!(r#"<script type="application/json" id="figure-data">{json}</script>"#),
        div: format!(r#"<div class="figure">{svg}</div>"#),
    })
}

// ---------------------------------------------------------------------------
// SVG rendering
// ---------------------------------------------------------------------------

/// Render the figure as a standalone SVG element.
///
/// Layout, top to bottom: title, one block per track (header + one lane per
/// allele), shared position axis.
pub fn render_svg(figure: &Figure) -> Result<String, fmt::Error> {
    let lanes = figure.lane_count() as f64;
    let tracks = figure.tracks.len() as f64;
    let height = TITLE_HEIGHT + tracks * (TRACK_HEADER + TRACK_GAP) + lanes * LANE_HEIGHT + AXIS_HEIGHT;
    let scale = Scale::new(figure.axis_start, figure.axis_end);

    let mut svg = String::with_capacity(4096);
    write_svg(&mut svg, figure, &scale, height)?;
    Ok(svg)
}

fn write_svg(svg: &mut String, figure: &Figure, scale: &Scale, height: f64) -> fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" font-family="sans-serif" font-size="11">"#
    )?;
    writeln!(
        svg,
        r#"<text x="{LABEL_WIDTH}" y="18" font-size="14" font-weight="bold">{}</text>"#,
        escape(&figure.title)
    )?;

    let mut y = TITLE_HEIGHT;
    for track in &figure.tracks {
        writeln!(
            svg,
            r#"<text x="4" y="{:.1}" font-weight="bold" fill="{}">{}</text>"#,
            y + 13.0,
            track.color,
            escape(&track.predictor)
        )?;
        y += TRACK_HEADER;

        for lane in &track.lanes {
            writeln!(
                svg,
                r##"<text x="12" y="{:.1}" fill="#444">{}</text>"##,
                y + 11.0,
                escape(&lane.allele)
            )?;
            writeln!(
                svg,
                r##"<line x1="{LABEL_WIDTH}" x2="{:.1}" y1="{:.1}" y2="{:.1}" stroke="#eee"/>"##,
                WIDTH - MARGIN_RIGHT,
                y + LANE_HEIGHT / 2.0,
                y + LANE_HEIGHT / 2.0
            )?;
            for seg in &lane.segments {
                let x = scale.x(seg.start);
                let w = (scale.x(seg.end) - x).max(1.0);
                writeln!(
                    svg,
                    r#"<rect x="{x:.1}" y="{:.1}" width="{w:.1}" height="{:.1}" fill="{}" fill-opacity="0.8"><title>{} {}-{}: {} peptides, best {:.2}</title></rect>"#,
                    y + 1.0,
                    LANE_HEIGHT - 2.0,
                    track.color,
                    escape(&lane.allele),
                    seg.start,
                    seg.end - 1,
                    seg.peptides,
                    seg.best_score
                )?;
            }
            y += LANE_HEIGHT;
        }
        y += TRACK_GAP;
    }

    write_axis(svg, scale, y)?;
    writeln!(svg, "</svg>")
}

fn write_axis(svg: &mut String, scale: &Scale, y: f64) -> fmt::Result {
    writeln!(
        svg,
        r##"<line x1="{LABEL_WIDTH}" x2="{:.1}" y1="{y:.1}" y2="{y:.1}" stroke="#333"/>"##,
        WIDTH - MARGIN_RIGHT
    )?;
    for tick in scale.ticks() {
        let x = scale.x(tick);
        writeln!(
            svg,
            r##"<line x1="{x:.1}" x2="{x:.1}" y1="{y:.1}" y2="{:.1}" stroke="#333"/><text x="{x:.1}" y="{:.1}" text-anchor="middle">{tick}</text>"##,
            y + 4.0,
            y + 16.0
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Position → pixel mapping
// ---------------------------------------------------------------------------

struct Scale {
    start: i64,
    end: i64,
}

impl Scale {
    fn new(start: i64, end: i64) -> Self {
        Self { start, end: end.max(start + 1) }
    }

    fn x(&self, pos: i64) -> f64 {
        let span = (self.end - self.start) as f64;
        LABEL_WIDTH + (pos - self.start) as f64 / span * (WIDTH - LABEL_WIDTH - MARGIN_RIGHT)
    }

    /// Round-numbered tick positions, roughly ten across the axis.
    fn ticks(&self) -> Vec<i64> {
        let span = self.end - self.start;
        let raw = (span as f64 / 10.0).max(1.0);
        let magnitude = 10f64.powf(raw.log10().floor());
        let step = [1.0, 2.0, 5.0, 10.0]
            .iter()
            .map(|m| m * magnitude)
            .find(|s| *s >= raw)
            .unwrap_or(raw) as i64;
        let step = step.max(1);

        let first = (self.start + step - 1).div_euclid(step) * step;
        (0..)
            .map(|i| first + i * step)
            .take_while(|t| *t <= self.end)
            .collect()
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
