//! SVG document assembly for the choropleth display.

mod proj;
mod writer;

use std::io::Write;

use crate::Result;
use crate::color::{BUCKETS, Rgb};
use crate::map::RegionShape;

pub(crate) use proj::{Projection, multipolygon_to_path};
pub(crate) use writer::SvgWriter;

/// Everything needed to draw one frame of the display.
pub(crate) struct MapDocument<'a> {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Viewport transform: (scale, (translate_x, translate_y)).
    pub transform: (f64, (f64, f64)),
    pub layers: Option<MapLayers<'a>>,
    pub status: Option<&'a str>,
}

/// The bound scene: shapes, per-shape fills, hover highlight, legend.
pub(crate) struct MapLayers<'a> {
    pub shapes: &'a [RegionShape],
    pub fills: &'a [Rgb],
    pub hovered: Option<usize>,
    pub legend: [Rgb; BUCKETS],
    pub project: &'a Projection<'a>,
}

/// Write a complete SVG document for `doc`.
pub(crate) fn write_map<W: Write>(writer: &mut W, doc: &MapDocument) -> Result<()> {
    writer::write_header(writer, doc.width, doc.height)?;
    writer::write_styles(writer)?;

    if let Some(layers) = &doc.layers {
        let (scale, (tx, ty)) = doc.transform;
        writeln!(writer, r#"<g transform="translate({tx:.3} {ty:.3}) scale({scale:.3})">"#)?;
        draw_regions(writer, layers)?;
        writeln!(writer, "</g>")?;
        draw_legend(writer, &layers.legend, doc.margin, doc.height)?;
    }

    if let Some(status) = doc.status {
        writeln!(
            writer,
            r#"<text class="status" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            doc.width / 2.0,
            doc.margin + 14.0,
            xml_escape(status),
        )?;
    }

    writer::write_footer(writer)
}

/// One path per region, colored by the active mapper; the hovered region
/// gets the highlight stroke.
fn draw_regions<W: Write>(writer: &mut W, layers: &MapLayers) -> Result<()> {
    debug_assert_eq!(layers.fills.len(), layers.shapes.len(),
        "one fill per region shape");

    for (idx, (shape, fill)) in layers.shapes.iter().zip(layers.fills.iter()).enumerate() {
        let class = if layers.hovered == Some(idx) { "region hovered" } else { "region" };
        writeln!(
            writer,
            r#"<path class="{class}" d="{path}" style="fill:{fill}"><title>{title}</title></path>"#,
            path = multipolygon_to_path(&shape.boundary, layers.project),
            title = xml_escape(&shape.name),
        )?;
    }
    Ok(())
}

/// Four swatches, light to dark, anchored to the lower-left corner.
fn draw_legend<W: Write>(writer: &mut W, legend: &[Rgb; BUCKETS], margin: f64, height: f64) -> Result<()> {
    let y = height - margin - 12.0;
    for (idx, color) in legend.iter().enumerate() {
        writeln!(
            writer,
            r#"<rect class="legend-swatch" x="{x:.1}" y="{y:.1}" width="24" height="12" fill="{color}"/>"#,
            x = margin + idx as f64 * 28.0,
        )?;
    }
    Ok(())
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use crate::map::geometry::tests::square;

    use super::*;

    #[test]
    fn document_contains_regions_legend_and_status() {
        let shapes = vec![square("A", 0.0, 0.0), square("B", 2.0, 0.0)];
        let fills = vec![Rgb::new(0xfe, 0xe0, 0xa5), Rgb::new(0xd7, 0x30, 0x27)];
        let identity = |coord: &Coord<f64>| (coord.x, coord.y);
        let doc = MapDocument {
            width: 800.0,
            height: 600.0,
            margin: 10.0,
            transform: (2.0, (5.0, -3.0)),
            layers: Some(MapLayers {
                shapes: &shapes,
                fills: &fills,
                hovered: Some(1),
                legend: [Rgb::new(1, 2, 3); BUCKETS],
                project: &identity,
            }),
            status: Some("Showing total population data"),
        };

        let mut out = Vec::new();
        write_map(&mut out, &doc).unwrap();
        let svg = String::from_utf8(out).unwrap();

        assert_eq!(svg.matches(r#"class="region""#).count(), 1);
        assert_eq!(svg.matches(r#"class="region hovered""#).count(), 1);
        assert!(svg.contains("fill:#fee0a5"));
        assert!(svg.contains(r#"translate(5.000 -3.000) scale(2.000)"#));
        assert_eq!(svg.matches("legend-swatch").count(), BUCKETS + 1); // style rule + swatches
        assert!(svg.contains("Showing total population data"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn idle_document_has_no_shapes() {
        let doc = MapDocument {
            width: 100.0,
            height: 100.0,
            margin: 10.0,
            transform: (1.0, (0.0, 0.0)),
            layers: None,
            status: None,
        };

        let mut out = Vec::new();
        write_map(&mut out, &doc).unwrap();
        let svg = String::from_utf8(out).unwrap();
        assert!(!svg.contains("<path"));
    }
}
