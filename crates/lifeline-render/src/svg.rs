//! SVG output for a [`SequenceLayout`].
//!
//! Every shape is a `<g>` carrying `data-id` and `data-type`, so hosts can map DOM events back to
//! graph ids. Numbers go through [`fmt`] to keep the output stable across platforms.

use crate::model::{LayoutBox, LayoutGeometry, LayoutPoint, LayoutText, SequenceLayout};
use lifeline_core::PaperConfig;
use lifeline_core::shape::{BoxStyle, LifeSpan, LineStyle, Marker};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    pub diagram_id: Option<String>,
    pub background: String,
    /// CSS border shorthand applied to the root element, e.g. `1px solid #E5E5E5`.
    pub border: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self::from(&PaperConfig::default())
    }
}

impl From<&PaperConfig> for SvgRenderOptions {
    fn from(paper: &PaperConfig) -> Self {
        Self {
            diagram_id: None,
            background: paper.background.clone(),
            border: Some(paper.border.clone()).filter(|b| !b.trim().is_empty()),
        }
    }
}

pub fn render_svg(layout: &SequenceLayout, options: &SvgRenderOptions) -> String {
    let mut out = String::with_capacity(4096);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}""#,
        w = fmt(layout.width),
        h = fmt(layout.height),
    );
    if let Some(id) = &options.diagram_id {
        let _ = write!(out, r#" id="{}""#, escape_xml(id));
    }
    if let Some(border) = &options.border {
        let _ = write!(out, r#" style="border: {}""#, escape_xml(border));
    }
    out.push('>');
    let _ = write!(
        out,
        r#"<rect class="background" x="0" y="0" width="100%" height="100%" fill="{}"/>"#,
        escape_xml(&options.background)
    );

    out.push_str(r#"<g class="cells">"#);
    for shape in &layout.shapes {
        let _ = write!(
            out,
            r#"<g class="cell" data-id="{}" data-type="{}">"#,
            shape.id,
            shape.shape_type.name()
        );
        render_geometry(&mut out, &shape.geometry);
        out.push_str("</g>");
    }
    out.push_str("</g></svg>");
    out
}

fn render_geometry(out: &mut String, geometry: &LayoutGeometry) {
    match geometry {
        LayoutGeometry::RoleGroup { bbox, style } => push_box(out, bbox, style),
        LayoutGeometry::Role { bbox, style, label } => {
            push_box(out, bbox, style);
            push_text(out, label);
        }
        LayoutGeometry::Lifeline {
            source,
            target,
            style,
        } => push_line(out, *source, *target, style),
        LayoutGeometry::LifeSpan {
            source,
            target,
            style,
            icon,
            icon_radius,
        } => {
            push_line(out, *source, *target, style);
            let _ = write!(
                out,
                r##"<g class="icon" transform="translate({},{})"><circle r="{}" fill="{}"/><path d="{}" stroke="#FFFFFF" stroke-width="1" fill="none"/></g>"##,
                fmt(icon.x),
                fmt(icon.y),
                fmt(*icon_radius),
                escape_xml(&style.stroke),
                LifeSpan::ICON_PATH,
            );
        }
        LayoutGeometry::Message {
            source,
            target,
            style,
            labels,
        } => {
            push_line(out, *source, *target, style);
            for label in labels {
                out.push_str(r#"<g class="label">"#);
                let _ = write!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="2" ry="2" fill="{}"/>"#,
                    fmt(label.body.x),
                    fmt(label.body.y),
                    fmt(label.body.width),
                    fmt(label.body.height),
                    escape_xml(&label.body_fill),
                );
                push_text(out, &label.text);
                out.push_str("</g>");
            }
        }
    }
}

fn push_box(out: &mut String, bbox: &LayoutBox, style: &BoxStyle) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}""#,
        fmt(bbox.x),
        fmt(bbox.y),
        fmt(bbox.width),
        fmt(bbox.height),
        escape_xml(&style.fill),
        escape_xml(&style.stroke),
        fmt(style.stroke_width),
    );
    if style.radius > 0.0 {
        let r = fmt(style.radius);
        let _ = write!(out, r#" rx="{r}" ry="{r}""#);
    }
    out.push_str("/>");
}

fn push_line(out: &mut String, source: LayoutPoint, target: LayoutPoint, style: &LineStyle) {
    let _ = write!(
        out,
        r#"<path class="line" d="M {} {} L {} {}" fill="none" stroke="{}" stroke-width="{}""#,
        fmt(source.x),
        fmt(source.y),
        fmt(target.x),
        fmt(target.y),
        escape_xml(&style.stroke),
        fmt(style.stroke_width),
    );
    if let Some(dash) = &style.dasharray {
        let _ = write!(out, r#" stroke-dasharray="{}""#, escape_xml(dash));
    }
    out.push_str("/>");
    if let Some(m) = &style.source_marker {
        push_marker(out, "source", source, target, m, &style.stroke);
    }
    if let Some(m) = &style.target_marker {
        push_marker(out, "target", target, source, m, &style.stroke);
    }
}

/// Marker bodies extend along +x from the tip; rotate them back along the line.
fn push_marker(
    out: &mut String,
    end: &str,
    at: LayoutPoint,
    away_from: LayoutPoint,
    marker: &Marker,
    color: &str,
) {
    let angle = (away_from.y - at.y).atan2(away_from.x - at.x).to_degrees();
    let color = escape_xml(color);
    let _ = write!(
        out,
        r#"<path class="marker-{end}" d="{}" transform="translate({},{}) rotate({})" fill="{color}" stroke="{color}" stroke-width="{}"/>"#,
        escape_xml(&marker.path),
        fmt(at.x),
        fmt(at.y),
        fmt(angle),
        fmt(marker.stroke_width),
    );
}

fn push_text(out: &mut String, text: &LayoutText) {
    let first_y = text.center.y - (text.lines.len().saturating_sub(1) as f64) * text.line_height / 2.0;
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}" font-family="{}" fill="{}" text-anchor="middle" dominant-baseline="central">"#,
        fmt(text.center.x),
        fmt(first_y),
        fmt(text.font_size),
        escape_xml(&text.font_family),
        escape_xml(&text.fill),
    );
    for (i, line) in text.lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { text.line_height };
        let _ = write!(
            out,
            r#"<tspan x="{}" dy="{}">{}</tspan>"#,
            fmt(text.center.x),
            fmt(dy),
            escape_xml(line)
        );
    }
    out.push_str("</text>");
}

/// Shortest decimal form, without `-0` or sub-micro float noise.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == 0.0 {
        v = 0.0;
    }
    format!("{v}")
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_trims_noise_and_negative_zero() {
        assert_eq!(fmt(150.0), "150");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(1e-12), "0");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(99.99999999), "100");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn escape_xml_covers_markup_chars() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn empty_layout_still_paints_the_paper() {
        let layout = SequenceLayout {
            width: 800.0,
            height: 600.0,
            bounds: None,
            shapes: Vec::new(),
        };
        let svg = render_svg(&layout, &SvgRenderOptions::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert!(svg.contains(r##"fill="#F3F7F6""##));
        assert!(svg.contains("border: 1px solid #E5E5E5"));
        assert!(svg.ends_with("</g></svg>"));
    }
}
