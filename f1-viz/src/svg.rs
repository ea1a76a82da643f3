//! Standalone SVG documents for the timeline and grid chart scenes.

use crate::grid_chart::{GridChartScene, LINE_OPACITY, PADDING};
use crate::legend::{CHIP_HEIGHT, DOT_RADIUS};
use crate::timeline::{TimelineScene, MARKER_RADIUS};
use crate::Anchor;
use std::fmt::Write;

const BACKGROUND: &str = "#15151e";
const FOREGROUND: &str = "#f0f0f0";
const MUTED: &str = "#9a9aa5";
const TRACK: &str = "#555";

/// Escape text for use in SVG element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn open(out: &mut String, width: f64, height: f64) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="system-ui, sans-serif">"#,
        w = width,
        h = height
    )?;
    writeln!(out, r#"<rect width="100%" height="100%" fill="{}"/>"#, BACKGROUND)
}

fn text(
    out: &mut String,
    x: f64,
    y: f64,
    anchor: Anchor,
    size: u32,
    fill: &str,
    content: &str,
) -> std::fmt::Result {
    writeln!(
        out,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="{}" dominant-baseline="middle" font-size="{}" fill="{}">{}</text>"#,
        x,
        y,
        anchor.as_str(),
        size,
        fill,
        escape(content)
    )
}

/// Render a season timeline as a standalone SVG document.
pub fn timeline_svg(scene: &TimelineScene) -> anyhow::Result<String> {
    let mut out = String::new();
    open(&mut out, scene.width, scene.height)?;
    writeln!(out, r#"<g transform="{}">"#, scene.inner_transform())?;

    if let Some(message) = &scene.message {
        text(
            &mut out,
            scene.inner_width / 2.0,
            scene.height / 2.0 - 10.0,
            Anchor::Middle,
            14,
            MUTED,
            message,
        )?;
    }

    for row in &scene.rows {
        writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2"/>"#,
            row.x1, row.y, row.x2, row.y, TRACK
        )?;
    }
    for connector in &scene.connectors {
        writeln!(
            out,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            connector.path(),
            TRACK
        )?;
    }
    for marker in scene.markers() {
        writeln!(
            out,
            r#"<g class="race" data-race-id="{}" transform="translate({:.2},{:.2})">"#,
            marker.race_id, marker.x, marker.y
        )?;
        writeln!(
            out,
            r#"<circle r="{}" fill="{}" stroke="{}" stroke-width="1.5"><title>{}</title></circle>"#,
            MARKER_RADIUS,
            marker.color,
            FOREGROUND,
            escape(&marker.name)
        )?;
        writeln!(
            out,
            r#"<text transform="{}" text-anchor="end" font-size="10" fill="{}">{}</text>"#,
            marker.label_transform(),
            MUTED,
            escape(&marker.label)
        )?;
        writeln!(out, "</g>")?;
    }
    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")?;
    Ok(out)
}

/// Render a race's grid chart as a standalone SVG document.
pub fn grid_chart_svg(scene: &GridChartScene, title: &str) -> anyhow::Result<String> {
    let mut out = String::new();
    open(&mut out, scene.width, scene.height)?;
    text(
        &mut out,
        scene.width / 2.0,
        PADDING + 10.0,
        Anchor::Middle,
        18,
        FOREGROUND,
        title,
    )?;

    let (cx, cy) = scene.chips_origin();
    writeln!(out, r#"<g class="legend" transform="translate({},{})">"#, cx, cy)?;
    for legend in &scene.chips {
        let chip = &legend.chip;
        let (dx, dy) = chip.dot_center();
        writeln!(
            out,
            r#"<g transform="translate({:.2},{:.2})"><rect width="{:.2}" height="{}" rx="{}" fill="none" stroke="{}"/><circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            chip.x,
            chip.y,
            chip.width,
            CHIP_HEIGHT,
            CHIP_HEIGHT / 2.0,
            TRACK,
            dx,
            dy,
            DOT_RADIUS,
            legend.color
        )?;
        writeln!(
            out,
            r#"<text x="{}" y="{}" dominant-baseline="middle" font-size="12" fill="{}">{}</text></g>"#,
            chip.text_x(),
            CHIP_HEIGHT / 2.0,
            FOREGROUND,
            escape(&chip.label)
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(out, r#"<g transform="{}">"#, scene.inner_transform())?;
    if scene.is_empty() {
        text(
            &mut out,
            scene.inner_width / 2.0,
            scene.inner_height / 2.0,
            Anchor::Middle,
            14,
            MUTED,
            "No grid data for this race",
        )?;
    }
    for line in &scene.lines {
        writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2.5" stroke-opacity="{}"/>"#,
            line.x1,
            line.y1,
            line.x2,
            line.y2,
            line.color,
            LINE_OPACITY
        )?;
    }
    for label in scene.start_labels.iter().chain(&scene.finish_labels) {
        let fill = if label.dim { MUTED } else { FOREGROUND };
        text(&mut out, label.x, label.y, label.anchor, 12, fill, &label.text)?;
    }
    for header in &scene.headers {
        text(&mut out, header.x, header.y, header.anchor, 13, FOREGROUND, &header.text)?;
    }
    if let Some(note) = &scene.footnote {
        text(&mut out, note.x, note.y, note.anchor, 11, MUTED, &note.text)?;
    }
    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")?;
    Ok(out)
}
