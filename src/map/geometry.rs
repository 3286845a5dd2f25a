use geo::{BoundingRect, Contains, Coord, MultiPolygon, Point, Rect};
use rstar::{RTree, primitives::{GeomWithData, Rectangle}};

use crate::{Error, Result};
use super::RegionId;

/// A single region boundary with its identifier and display name.
#[derive(Debug, Clone)]
pub struct RegionShape {
    pub id: RegionId,
    pub name: String,  // Original-cased name, for tooltips
    pub boundary: MultiPolygon<f64>,
}

type Envelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Region boundaries plus an R-tree over their envelopes for pointer
/// hit-testing. Loaded once; immutable.
#[derive(Debug)]
pub struct RegionSet {
    shapes: Vec<RegionShape>,
    index: RTree<Envelope>,
    bounds: Rect<f64>,
}

impl RegionSet {
    /// Build the set and its spatial index.
    ///
    /// Shapes with no extent are left out of the index (they can never be
    /// hit); a set with no usable shape at all is rejected.
    pub fn new(shapes: Vec<RegionShape>) -> Result<Self> {
        let mut items = Vec::with_capacity(shapes.len());
        let mut bounds: Option<Rect<f64>> = None;

        for (idx, shape) in shapes.iter().enumerate() {
            let Some(rect) = shape.boundary.bounding_rect() else {
                tracing::warn!(region = %shape.id, "region has no extent; excluded from hit-testing");
                continue;
            };
            items.push(GeomWithData::new(
                Rectangle::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
                idx,
            ));
            bounds = Some(match bounds {
                None => rect,
                Some(merged) => merge(merged, rect),
            });
        }

        let bounds = bounds.ok_or(Error::EmptyGeometry)?;
        Ok(Self { shapes, index: RTree::bulk_load(items), bounds })
    }

    #[inline]
    pub fn len(&self) -> usize { self.shapes.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    #[inline]
    pub fn shapes(&self) -> &[RegionShape] { &self.shapes }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&RegionShape> { self.shapes.get(idx) }

    /// Overall lon/lat extent of every indexed shape.
    #[inline]
    pub fn bounds(&self) -> Rect<f64> { self.bounds }

    /// Region under a lon/lat point: envelope query first, then an exact
    /// containment test. Ties resolve to the lowest shape index.
    pub fn hit_test(&self, lon: f64, lat: f64) -> Option<usize> {
        let point = Point::new(lon, lat);
        self.index
            .locate_all_at_point(&[lon, lat])
            .map(|envelope| envelope.data)
            .filter(|&idx| self.shapes[idx].boundary.contains(&point))
            .min()
    }
}

fn merge(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}
