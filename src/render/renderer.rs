use std::{io::Write, path::Path, time::Instant};

use geo::{Coord, Rect};

use crate::color::{BUCKETS, ColorMapper, Rgb};
use crate::io::svg::{self, MapDocument, MapLayers, SvgWriter};
use crate::map::{Dataset, Metric, MetricStore, RegionSet, RegionShape};
use crate::{Error, Result};

use super::events::{HoverEvent, HoverHandlers, TOOLTIP_OFFSET, Tooltip, format_count};
use super::status::StatusLine;
use super::viewport::{Viewport, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// Rendering lifecycle: `Idle` until geometry is bound, `Rendered` after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Rendered,
}

/// Linear fit of the geometry bounds into the view box, preserving aspect
/// and centering (lon/lat -> base SVG coords, Y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FitProjection {
    scale: f64,
    x0: f64,
    y0: f64,
    min_x: f64,
    max_y: f64,
}

impl FitProjection {
    pub(crate) fn fit(bounds: &Rect<f64>, width: f64, height: f64, margin: f64) -> Self {
        let bw = if bounds.width() > 0.0 { bounds.width() } else { 1.0 };
        let bh = if bounds.height() > 0.0 { bounds.height() } else { 1.0 };
        let scale = ((width - 2.0 * margin) / bw).min((height - 2.0 * margin) / bh);

        Self {
            scale,
            x0: (width - bw * scale) / 2.0,
            y0: (height - bh * scale) / 2.0,
            min_x: bounds.min().x,
            max_y: bounds.max().y,
        }
    }

    #[inline]
    pub(crate) fn project(&self, coord: &Coord<f64>) -> (f64, f64) {
        (
            self.x0 + (coord.x - self.min_x) * self.scale,
            self.y0 + (self.max_y - coord.y) * self.scale, // invert vertically
        )
    }

    #[inline]
    pub(crate) fn unproject(&self, x: f64, y: f64) -> Coord<f64> {
        Coord {
            x: self.min_x + (x - self.x0) / self.scale,
            y: self.max_y - (y - self.y0) / self.scale,
        }
    }
}

/// The bound scene: both data sources, the derived projection and colors,
/// and the transient hover selection.
#[derive(Debug)]
struct Scene {
    store: MetricStore,
    regions: RegionSet,
    projection: FitProjection,
    mapper: ColorMapper,
    fills: Vec<Rgb>,
    hovered: Option<usize>,
}

/// Interactive choropleth display.
///
/// Owns all mutable display state (bound scene, viewport transform, hover
/// selection, status line), so multiple renderers compose on one process
/// without shared globals.
pub struct Renderer {
    width: f64,
    height: f64,
    margin: f64,
    viewport: Viewport,
    status: StatusLine,
    handlers: HoverHandlers,
    scene: Option<Scene>,
}

impl Renderer {
    pub const DEFAULT_MARGIN: f64 = 10.0;

    /// A renderer in the `Idle` state: nothing bound, identity viewport.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Self::DEFAULT_MARGIN,
            viewport: Viewport::new(),
            status: StatusLine::new(),
            handlers: HoverHandlers::default(),
            scene: None,
        }
    }

    #[inline]
    pub fn state(&self) -> RenderState {
        if self.scene.is_some() { RenderState::Rendered } else { RenderState::Idle }
    }

    /// Active metric, once a scene is bound.
    #[inline]
    pub fn metric(&self) -> Option<Metric> {
        self.scene.as_ref().map(|scene| scene.mapper.metric())
    }

    /// Bind both data sources and apply the initial color mapping:
    /// `Idle` -> `Rendered`. Re-initialization replaces the scene.
    pub fn initialize(&mut self, dataset: Dataset, metric: Metric, now: Instant) {
        let Dataset { store, regions } = dataset;
        let projection = FitProjection::fit(&regions.bounds(), self.width, self.height, self.margin);
        let mapper = ColorMapper::recompute(&store, metric);
        let fills = compute_fills(&store, &regions, &mapper);

        tracing::info!(regions = regions.len(), metric = metric.column(), "scene bound");
        self.scene = Some(Scene { store, regions, projection, mapper, fills, hovered: None });
        self.status.show(status_text(metric), now);
    }

    /// Switch the displayed metric: `Rendered` -> `Rendered`.
    ///
    /// Recomputes the color mapper from the new metric's full distribution
    /// and re-binds every region fill; idempotent for a repeated metric.
    pub fn select_metric(&mut self, metric: Metric, now: Instant) -> Result<()> {
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        scene.mapper = ColorMapper::recompute(&scene.store, metric);
        scene.fills = compute_fills(&scene.store, &scene.regions, &scene.mapper);

        tracing::debug!(metric = metric.column(), "metric selected");
        self.status.show(status_text(metric), now);
        Ok(())
    }

    /// Hover callback registrations.
    pub fn handlers_mut(&mut self) -> &mut HoverHandlers {
        &mut self.handlers
    }

    /// Track the pointer at screen coords (x, y).
    ///
    /// Resolves the region under the pointer, maintains the highlight,
    /// fires enter/move/leave handlers, and returns the tooltip for the
    /// hovered region. Never touches the selected metric or the store.
    pub fn pointer_over(&mut self, x: f64, y: f64) -> Option<Tooltip> {
        let viewport = self.viewport;
        let scene = self.scene.as_mut()?;

        let (bx, by) = viewport.invert(x, y);
        let lonlat = scene.projection.unproject(bx, by);
        let hit = scene.regions.hit_test(lonlat.x, lonlat.y);

        match (scene.hovered, hit) {
            (previous, Some(idx)) => {
                let shape = scene.regions.get(idx)?;
                let metric = scene.mapper.metric();
                let value = scene.store.get(&shape.id, metric);
                let event = HoverEvent { region: &shape.id, name: &shape.name, metric, value, x, y };

                if previous == Some(idx) {
                    self.handlers.emit_move(&event);
                } else {
                    if previous.is_some() {
                        self.handlers.emit_leave();
                    }
                    scene.hovered = Some(idx);
                    self.handlers.emit_enter(&event);
                }

                Some(Tooltip {
                    title: shape.name.clone(),
                    body: format!("{}: {}", metric.label(), format_count(value)),
                    x: x + TOOLTIP_OFFSET.0,
                    y: y + TOOLTIP_OFFSET.1,
                })
            }
            (Some(_), None) => {
                scene.hovered = None;
                self.handlers.emit_leave();
                None
            }
            (None, None) => None,
        }
    }

    /// Pointer left the display: clear the highlight.
    pub fn pointer_leave(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            if scene.hovered.take().is_some() {
                self.handlers.emit_leave();
            }
        }
    }

    /// Currently highlighted region, if any.
    pub fn hovered(&self) -> Option<&RegionShape> {
        let scene = self.scene.as_ref()?;
        scene.regions.get(scene.hovered?)
    }

    /// One fill per region shape; empty while `Idle`.
    pub fn fills(&self) -> &[Rgb] {
        self.scene.as_ref().map(|scene| scene.fills.as_slice()).unwrap_or(&[])
    }

    /// Legend swatches for the active palette.
    pub fn legend(&self) -> Option<[Rgb; BUCKETS]> {
        self.scene.as_ref().map(|scene| scene.mapper.legend())
    }

    /// Visible status text at `now`.
    pub fn status(&self, now: Instant) -> Option<&str> {
        self.status.current(now)
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_by(ZOOM_IN_FACTOR, self.center());
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_by(ZOOM_OUT_FACTOR, self.center());
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Write the current display as an SVG document.
    pub fn write_svg<W: Write>(&self, writer: &mut W, now: Instant) -> Result<()> {
        match self.scene.as_ref() {
            Some(scene) => {
                let project = |coord: &Coord<f64>| scene.projection.project(coord);
                svg::write_map(writer, &MapDocument {
                    width: self.width,
                    height: self.height,
                    margin: self.margin,
                    transform: (self.viewport.scale(), self.viewport.translate()),
                    layers: Some(MapLayers {
                        shapes: scene.regions.shapes(),
                        fills: &scene.fills,
                        hovered: scene.hovered,
                        legend: scene.mapper.legend(),
                        project: &project,
                    }),
                    status: self.status.current(now),
                })
            }
            None => svg::write_map(writer, &MapDocument {
                width: self.width,
                height: self.height,
                margin: self.margin,
                transform: (self.viewport.scale(), self.viewport.translate()),
                layers: None,
                status: self.status.current(now),
            }),
        }
    }

    /// Write the current display to an SVG file.
    pub fn to_svg(&self, path: &Path, now: Instant) -> Result<()> {
        let mut writer = SvgWriter::new(path)?;
        self.write_svg(&mut writer, now)?;
        writer.flush()?;
        Ok(())
    }
}

fn compute_fills(store: &MetricStore, regions: &RegionSet, mapper: &ColorMapper) -> Vec<Rgb> {
    regions
        .shapes()
        .iter()
        .map(|shape| mapper.color_for(store.get(&shape.id, mapper.metric())))
        .collect()
}

fn status_text(metric: Metric) -> String {
    format!("Showing {} data", metric.label())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use crate::color::palette;
    use crate::map::geometry::tests::square;
    use crate::map::{RegionId, RegionRecord};
    use crate::render::status::STATUS_TTL;

    use super::*;

    /// Four regions in a row with totals 100..400 and flipped male/female
    /// distributions, plus helpers to address them on screen.
    fn make_dataset() -> Dataset {
        let store = MetricStore::from_records([
            ("A", 100.0, 80.0, 20.0),
            ("B", 200.0, 60.0, 140.0),
            ("C", 300.0, 40.0, 260.0),
            ("D", 400.0, 20.0, 380.0),
        ].map(|(id, total, male, female)| {
            (RegionId::new(id), RegionRecord { total, male, female })
        }));
        let regions = RegionSet::new(vec![
            square("A", 0.0, 0.0),
            square("B", 2.0, 0.0),
            square("C", 4.0, 0.0),
            square("D", 6.0, 0.0),
        ])
        .unwrap();
        Dataset::from_parts(store, regions)
    }

    fn make_renderer(now: Instant) -> Renderer {
        let mut renderer = Renderer::new(800.0, 600.0);
        renderer.initialize(make_dataset(), Metric::Total, now);
        renderer
    }

    /// Screen coords of a lon/lat point under the current transform.
    fn screen_point(renderer: &Renderer, lon: f64, lat: f64) -> (f64, f64) {
        let scene = renderer.scene.as_ref().unwrap();
        let (bx, by) = scene.projection.project(&Coord { x: lon, y: lat });
        renderer.viewport.apply(bx, by)
    }

    #[test]
    fn fit_projection_round_trips() {
        let bounds = Rect::new(Coord { x: 68.0, y: 8.0 }, Coord { x: 97.0, y: 37.0 });
        let projection = FitProjection::fit(&bounds, 800.0, 600.0, 10.0);

        let coord = Coord { x: 77.2, y: 28.6 };
        let (x, y) = projection.project(&coord);
        let back = projection.unproject(x, y);
        assert!((back.x - coord.x).abs() < 1e-9);
        assert!((back.y - coord.y).abs() < 1e-9);
    }

    #[test]
    fn initialize_binds_scene_and_colors() {
        let t0 = Instant::now();
        let renderer = make_renderer(t0);

        assert_eq!(renderer.state(), RenderState::Rendered);
        assert_eq!(renderer.metric(), Some(Metric::Total));
        assert_eq!(renderer.fills(), palette(Metric::Total).as_slice());
        assert_eq!(renderer.status(t0), Some("Showing total population data"));
        assert!(renderer.status(t0 + STATUS_TTL).is_none());
    }

    #[test]
    fn select_metric_requires_a_scene() {
        let mut renderer = Renderer::new(800.0, 600.0);
        assert_eq!(renderer.state(), RenderState::Idle);
        assert!(matches!(
            renderer.select_metric(Metric::Total, Instant::now()),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn select_metric_is_idempotent() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);

        renderer.select_metric(Metric::Male, t0).unwrap();
        let first: Vec<Rgb> = renderer.fills().to_vec();
        renderer.select_metric(Metric::Male, t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(renderer.fills(), first.as_slice());
    }

    #[test]
    fn reselect_leaves_no_residual_coloring() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);

        renderer.select_metric(Metric::Male, t0).unwrap();
        renderer.select_metric(Metric::Female, t0).unwrap();

        // Totals ascend A..D but male counts descend, so the female fills
        // must reflect only the female distribution.
        assert_eq!(renderer.fills(), palette(Metric::Female).as_slice());
        assert_eq!(renderer.legend(), Some(palette(Metric::Female)));
        assert_eq!(renderer.status(t0), Some("Showing population female data"));
    }

    #[test]
    fn hover_reports_region_and_fires_handlers() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);

        let entered = Rc::new(RefCell::new(Vec::new()));
        let left = Rc::new(RefCell::new(0usize));
        let moved = Rc::new(RefCell::new(0usize));
        {
            let entered = Rc::clone(&entered);
            renderer.handlers_mut().on_enter(move |event| {
                entered.borrow_mut().push((event.name.to_string(), event.value));
            });
            let moved = Rc::clone(&moved);
            renderer.handlers_mut().on_move(move |_| *moved.borrow_mut() += 1);
            let left = Rc::clone(&left);
            renderer.handlers_mut().on_leave(move || *left.borrow_mut() += 1);
        }

        // Enter region B.
        let (x, y) = screen_point(&renderer, 2.5, 0.5);
        let tooltip = renderer.pointer_over(x, y).unwrap();
        assert_eq!(tooltip.title, "B");
        assert_eq!(tooltip.body, "total population: 200");
        assert_eq!((tooltip.x, tooltip.y), (x + 10.0, y - 28.0));
        assert_eq!(renderer.hovered().unwrap().name, "B");

        // Move within B: no second enter.
        renderer.pointer_over(x + 1.0, y).unwrap();
        assert_eq!(entered.borrow().len(), 1);
        assert_eq!(*moved.borrow(), 1);

        // Cross to C: leave B, enter C.
        let (cx, cy) = screen_point(&renderer, 4.5, 0.5);
        renderer.pointer_over(cx, cy).unwrap();
        assert_eq!(*left.borrow(), 1);
        assert_eq!(entered.borrow().last().unwrap(), &("C".to_string(), 300.0));

        // Leave the display entirely.
        renderer.pointer_leave();
        assert_eq!(*left.borrow(), 2);
        assert!(renderer.hovered().is_none());
    }

    #[test]
    fn hover_mutates_neither_fills_nor_metric() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);
        let fills_before: Vec<Rgb> = renderer.fills().to_vec();

        let (x, y) = screen_point(&renderer, 0.5, 0.5);
        renderer.pointer_over(x, y);
        renderer.pointer_leave();

        assert_eq!(renderer.metric(), Some(Metric::Total));
        assert_eq!(renderer.fills(), fills_before.as_slice());
    }

    #[test]
    fn region_without_data_renders_from_zero() {
        let t0 = Instant::now();
        let store = MetricStore::from_records([
            (RegionId::new("A"), RegionRecord { total: 100.0, male: 0.0, female: 0.0 }),
            (RegionId::new("B"), RegionRecord { total: 200.0, male: 0.0, female: 0.0 }),
            (RegionId::new("C"), RegionRecord { total: 300.0, male: 0.0, female: 0.0 }),
            (RegionId::new("D"), RegionRecord { total: 400.0, male: 0.0, female: 0.0 }),
        ]);
        let regions = RegionSet::new(vec![
            square("A", 0.0, 0.0),
            square("B", 2.0, 0.0),
            square("C", 4.0, 0.0),
            square("D", 6.0, 0.0),
            square("E", 8.0, 0.0), // geometry only, no data row
        ])
        .unwrap();

        let mut renderer = Renderer::new(800.0, 600.0);
        renderer.initialize(Dataset::from_parts(store, regions), Metric::Total, t0);

        // E resolves via the default 0: lowest bucket, no failure.
        assert_eq!(renderer.fills()[4], palette(Metric::Total)[0]);

        // Hovering E reports the default value and leaves the status alone.
        let (x, y) = screen_point(&renderer, 8.5, 0.5);
        let tooltip = renderer.pointer_over(x, y).unwrap();
        assert_eq!(tooltip.body, "total population: 0");
        assert_eq!(renderer.status(t0), Some("Showing total population data"));
    }

    #[test]
    fn zoom_is_independent_of_selection() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);
        let fills_before: Vec<Rgb> = renderer.fills().to_vec();

        renderer.zoom_in();
        assert_eq!(renderer.viewport().scale(), 1.5);
        renderer.select_metric(Metric::Male, t0).unwrap();
        assert_eq!(renderer.viewport().scale(), 1.5);

        renderer.zoom_out();
        renderer.reset_view();
        assert!(renderer.viewport().is_identity());
        assert_ne!(renderer.fills(), fills_before.as_slice());
    }

    #[test]
    fn hit_testing_respects_the_viewport_transform() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);

        renderer.zoom_in();
        renderer.pan(33.0, -12.0);

        let (x, y) = screen_point(&renderer, 6.5, 0.5);
        let tooltip = renderer.pointer_over(x, y).unwrap();
        assert_eq!(tooltip.title, "D");
    }

    #[test]
    fn initialize_replaces_the_scene() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);
        assert_eq!(renderer.fills().len(), 4);

        let store = MetricStore::from_records([
            (RegionId::new("X"), RegionRecord { total: 1.0, male: 1.0, female: 0.0 }),
        ]);
        let regions = RegionSet::new(vec![square("X", 0.0, 0.0)]).unwrap();
        renderer.initialize(Dataset::from_parts(store, regions), Metric::Female, t0);

        assert_eq!(renderer.fills().len(), 1);
        assert_eq!(renderer.metric(), Some(Metric::Female));
    }

    #[test]
    fn svg_reflects_the_rendered_state() {
        let t0 = Instant::now();
        let mut renderer = make_renderer(t0);
        let (x, y) = screen_point(&renderer, 0.5, 0.5);
        renderer.pointer_over(x, y);

        let mut out = Vec::new();
        renderer.write_svg(&mut out, t0).unwrap();
        let svg = String::from_utf8(out).unwrap();

        assert_eq!(svg.matches("<path").count(), 4);
        assert!(svg.contains(r#"class="region hovered""#));
        assert!(svg.contains("Showing total population data"));

        // Status is gone once the TTL elapses.
        let mut out = Vec::new();
        renderer.write_svg(&mut out, t0 + STATUS_TTL).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("Showing"));
    }
}
