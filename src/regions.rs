//! Named element regions derived from a box model
//!
//! Every element decomposes into the same set of shapes: BODY (the
//! rounded box inside the margin), INTERIOR (body shrunk by the border
//! widths), BORDER (the ring between them) and EXTERIOR (everything
//! outside the body). Paints clip to these shapes, so they have to
//! partition cleanly: INTERIOR + BORDER covers exactly BODY, and BODY +
//! EXTERIOR covers exactly the element rectangle.
//!
//! Shapes are built as vector paths and rasterized into coverage masks
//! once, on first use. Region algebra (subtract, intersect, union) then
//! works per coverage byte, which keeps the partition exact even on
//! anti-aliased contours.

use std::cell::OnceCell;

use tiny_skia::FillRule;
use tiny_skia::Mask;
use tiny_skia::Path;
use tiny_skia::PathBuilder;
use tiny_skia::Transform;

use crate::boxmodel::BoxModel;
use crate::boxmodel::ComponentArea;
use crate::boxmodel::Edge;
use crate::geometry::BorderRadii;
use crate::geometry::BorderRadius;
use crate::geometry::EdgeOffsets;
use crate::geometry::Rect;

/// Cubic Bezier approximation factor for a quarter circle
pub(crate) const KAPPA: f32 = 0.552_284_8;

/// A rasterized element region
///
/// Holds an anti-aliased coverage mask at element resolution, or
/// nothing at all for empty regions. Regions are immutable; the set
/// operations return new regions and never touch their operands.
#[derive(Debug, Clone)]
pub struct Region {
  mask: Option<Mask>,
  width: u32,
  height: u32,
}

impl Region {
  /// An empty region of the given raster size
  pub fn empty(width: u32, height: u32) -> Self {
    Self { mask: None, width, height }
  }

  /// A region covering the full raster
  pub fn full(width: u32, height: u32) -> Self {
    let Some(mut mask) = Mask::new(width, height) else {
      return Self::empty(width, height);
    };
    mask.data_mut().fill(255);
    Self { mask: Some(mask), width, height }
  }

  /// Rasterizes a path into a region
  ///
  /// A missing path or a zero-sized raster yields an empty region.
  pub(crate) fn from_path(width: u32, height: u32, path: Option<&Path>, rule: FillRule) -> Self {
    let Some(path) = path else {
      return Self::empty(width, height);
    };
    let Some(mut mask) = Mask::new(width, height) else {
      return Self::empty(width, height);
    };
    mask.fill_path(path, rule, true, Transform::identity());
    Self { mask: Some(mask), width, height }
  }

  /// A rectangular region
  pub fn from_rect(width: u32, height: u32, rect: Rect) -> Self {
    Self::from_path(width, height, rect_path(rect).as_ref(), FillRule::Winding)
  }

  /// A rounded rectangle region
  pub fn from_rounded_rect(width: u32, height: u32, rect: Rect, radii: BorderRadii) -> Self {
    Self::from_path(width, height, rounded_rect_path(rect, radii).as_ref(), FillRule::Winding)
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  /// True when no pixel has any coverage
  pub fn is_empty(&self) -> bool {
    match &self.mask {
      None => true,
      Some(mask) => mask.data().iter().all(|&byte| byte == 0),
    }
  }

  /// Coverage of one pixel, 0 (outside) to 255 (fully inside)
  pub fn coverage(&self, x: u32, y: u32) -> u8 {
    match &self.mask {
      None => 0,
      Some(mask) => {
        if x >= self.width || y >= self.height {
          0
        } else {
          mask.data()[(y * self.width + x) as usize]
        }
      }
    }
  }

  /// The coverage mask, if the region has one
  pub(crate) fn mask(&self) -> Option<&Mask> {
    self.mask.as_ref()
  }

  /// This region minus another
  ///
  /// Coverage subtracts per pixel, so removing a nested shape leaves
  /// its exact complement. Both regions must share raster dimensions.
  pub fn subtract(&self, other: &Region) -> Region {
    debug_assert_eq!((self.width, self.height), (other.width, other.height));
    let Some(mask) = &self.mask else {
      return Region::empty(self.width, self.height);
    };
    let Some(other_mask) = &other.mask else {
      return self.clone();
    };
    let mut out = mask.clone();
    for (dst, src) in out.data_mut().iter_mut().zip(other_mask.data()) {
      *dst = dst.saturating_sub(*src);
    }
    Region { mask: Some(out), width: self.width, height: self.height }
  }

  /// The overlap of two regions
  pub fn intersect(&self, other: &Region) -> Region {
    debug_assert_eq!((self.width, self.height), (other.width, other.height));
    let (Some(mask), Some(other_mask)) = (&self.mask, &other.mask) else {
      return Region::empty(self.width, self.height);
    };
    let mut out = mask.clone();
    for (dst, src) in out.data_mut().iter_mut().zip(other_mask.data()) {
      *dst = (*dst).min(*src);
    }
    Region { mask: Some(out), width: self.width, height: self.height }
  }

  /// The combined cover of two regions
  pub fn union(&self, other: &Region) -> Region {
    debug_assert_eq!((self.width, self.height), (other.width, other.height));
    let Some(mask) = &self.mask else {
      return other.clone();
    };
    let Some(other_mask) = &other.mask else {
      return self.clone();
    };
    let mut out = mask.clone();
    for (dst, src) in out.data_mut().iter_mut().zip(other_mask.data()) {
      *dst = dst.saturating_add(*src);
    }
    Region { mask: Some(out), width: self.width, height: self.height }
  }
}

/// Lazily computed regions of one element
///
/// Each shape rasterizes at most once per paint pass, on first access.
pub struct RegionSet {
  model: BoxModel,
  width: u32,
  height: u32,
  all: OnceCell<Region>,
  body: OnceCell<Region>,
  interior: OnceCell<Region>,
  border: OnceCell<Region>,
  exterior: OnceCell<Region>,
}

impl RegionSet {
  pub fn new(model: BoxModel) -> Self {
    let width = model.size.width.ceil().max(0.0) as u32;
    let height = model.size.height.ceil().max(0.0) as u32;
    Self {
      model,
      width,
      height,
      all: OnceCell::new(),
      body: OnceCell::new(),
      interior: OnceCell::new(),
      border: OnceCell::new(),
      exterior: OnceCell::new(),
    }
  }

  pub fn model(&self) -> &BoxModel {
    &self.model
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  /// The full element rectangle
  pub fn all(&self) -> &Region {
    self.all.get_or_init(|| Region::full(self.width, self.height))
  }

  /// The rounded box inside the margin
  pub fn body(&self) -> &Region {
    self.body.get_or_init(|| {
      let path = body_path(&self.model, EdgeOffsets::ZERO);
      Region::from_path(self.width, self.height, path.as_ref(), FillRule::Winding)
    })
  }

  /// The body shrunk by the border widths
  pub fn interior(&self) -> &Region {
    self.interior.get_or_init(|| {
      let path = body_path(&self.model, self.model.border_widths);
      Region::from_path(self.width, self.height, path.as_ref(), FillRule::Winding)
    })
  }

  /// The ring between the body contour and the interior
  pub fn border(&self) -> &Region {
    self.border.get_or_init(|| self.body().subtract(self.interior()).clone())
  }

  /// Everything outside the body
  pub fn exterior(&self) -> &Region {
    self.exterior.get_or_init(|| self.all().subtract(self.body()).clone())
  }

  pub fn area(&self, area: ComponentArea) -> &Region {
    match area {
      ComponentArea::All => self.all(),
      ComponentArea::Exterior => self.exterior(),
      ComponentArea::Border => self.border(),
      ComponentArea::Interior => self.interior(),
      ComponentArea::Body => self.body(),
    }
  }

  /// One side of the border ring, cut by an axis-aligned half-plane
  ///
  /// Used to paint per-edge border colors. The half-plane runs along
  /// the inner edge of the respective border side, so adjacent strips
  /// share their corner squares.
  pub fn edge_strip(&self, edge: Edge) -> Region {
    let model = &self.model;
    let w = model.size.width;
    let h = model.size.height;
    let half_plane = match edge {
      Edge::Top => Rect::from_xywh(0.0, 0.0, w, model.margin.top + model.border_widths.top),
      Edge::Bottom => {
        let y = h - model.margin.bottom - model.border_widths.bottom;
        Rect::from_xywh(0.0, y, w, h - y)
      }
      Edge::Left => Rect::from_xywh(0.0, 0.0, model.margin.left + model.border_widths.left, h),
      Edge::Right => {
        let x = w - model.margin.right - model.border_widths.right;
        Rect::from_xywh(x, 0.0, w - x, h)
      }
    };
    self
      .border()
      .intersect(&Region::from_rect(self.width, self.height, half_plane))
  }
}

/// Builds the body contour of a box model, inset by an extra amount
/// per side beyond the margin
///
/// Corner arcs shrink by the smaller of the two insets adjacent to
/// each corner, clamped at zero; margins position the box but leave
/// the arcs untouched. Returns `None` when the insets leave no area.
///
/// Two constructions: a single rounded-rectangle contour when the
/// radii and insets are uniform, otherwise a union of quarter-ellipse
/// corner wedges, edge rectangles and a center rectangle. Edge
/// rectangles extend inward to the larger of the two adjacent arc
/// extents so the center rectangle can never poke past a corner arc.
pub(crate) fn body_path(model: &BoxModel, insets: EdgeOffsets) -> Option<Path> {
  let left = model.margin.left + insets.left.max(0.0);
  let top = model.margin.top + insets.top.max(0.0);
  let right = model.margin.right + insets.right.max(0.0);
  let bottom = model.margin.bottom + insets.bottom.max(0.0);
  let width = model.size.width - left - right;
  let height = model.size.height - top - bottom;
  if width <= 0.0 || height <= 0.0 {
    return None;
  }
  let rect = Rect::from_xywh(left, top, width, height);

  if !model.radii.has_radius() {
    return rect_path(rect);
  }

  if model.radii.is_uniform() && insets.is_uniform() {
    let arc = model.radii.top_left.shrink(insets.top.max(0.0));
    if !arc.has_radius() {
      return rect_path(rect);
    }
    return rounded_rect_path(rect, BorderRadii::uniform(arc));
  }

  general_body_path(rect, model.radii, insets)
}

/// The per-corner construction: corner wedges, edge rectangles and a
/// center rectangle, unioned by nonzero winding
fn general_body_path(rect: Rect, radii: BorderRadii, insets: EdgeOffsets) -> Option<Path> {
  let ins_top = insets.top.max(0.0);
  let ins_right = insets.right.max(0.0);
  let ins_bottom = insets.bottom.max(0.0);
  let ins_left = insets.left.max(0.0);

  let tl = radii.top_left.shrink(ins_left.min(ins_top));
  let tr = radii.top_right.shrink(ins_top.min(ins_right));
  let br = radii.bottom_right.shrink(ins_bottom.min(ins_right));
  let bl = radii.bottom_left.shrink(ins_bottom.min(ins_left));

  let x0 = rect.min_x();
  let y0 = rect.min_y();
  let x1 = rect.max_x();
  let y1 = rect.max_y();

  let mut pb = PathBuilder::new();

  if tl.has_radius() {
    corner_wedge(&mut pb, x0 + tl.width, y0 + tl.height, tl, Quadrant::TopLeft);
  }
  if tr.has_radius() {
    corner_wedge(&mut pb, x1 - tr.width, y0 + tr.height, tr, Quadrant::TopRight);
  }
  if br.has_radius() {
    corner_wedge(&mut pb, x1 - br.width, y1 - br.height, br, Quadrant::BottomRight);
  }
  if bl.has_radius() {
    corner_wedge(&mut pb, x0 + bl.width, y1 - bl.height, bl, Quadrant::BottomLeft);
  }

  let top_depth = tl.height.max(tr.height);
  let right_depth = tr.width.max(br.width);
  let bottom_depth = br.height.max(bl.height);
  let left_depth = bl.width.max(tl.width);

  push_rect(&mut pb, x0 + tl.width, y0, (x1 - tr.width) - (x0 + tl.width), top_depth);
  push_rect(&mut pb, x1 - right_depth, y0 + tr.height, right_depth, (y1 - br.height) - (y0 + tr.height));
  push_rect(&mut pb, x0 + bl.width, y1 - bottom_depth, (x1 - br.width) - (x0 + bl.width), bottom_depth);
  push_rect(&mut pb, x0, y0 + tl.height, left_depth, (y1 - bl.height) - (y0 + tl.height));
  push_rect(
    &mut pb,
    x0 + left_depth,
    y0 + top_depth,
    (x1 - right_depth) - (x0 + left_depth),
    (y1 - bottom_depth) - (y0 + top_depth),
  );

  pb.finish()
}

enum Quadrant {
  TopLeft,
  TopRight,
  BottomRight,
  BottomLeft,
}

/// One quarter-ellipse wedge around a corner center point
fn corner_wedge(pb: &mut PathBuilder, cx: f32, cy: f32, radius: BorderRadius, quadrant: Quadrant) {
  let kw = KAPPA * radius.width;
  let kh = KAPPA * radius.height;
  pb.move_to(cx, cy);
  match quadrant {
    Quadrant::TopLeft => {
      pb.line_to(cx - radius.width, cy);
      pb.cubic_to(cx - radius.width, cy - kh, cx - kw, cy - radius.height, cx, cy - radius.height);
    }
    Quadrant::TopRight => {
      pb.line_to(cx, cy - radius.height);
      pb.cubic_to(cx + kw, cy - radius.height, cx + radius.width, cy - kh, cx + radius.width, cy);
    }
    Quadrant::BottomRight => {
      pb.line_to(cx + radius.width, cy);
      pb.cubic_to(cx + radius.width, cy + kh, cx + kw, cy + radius.height, cx, cy + radius.height);
    }
    Quadrant::BottomLeft => {
      pb.line_to(cx, cy + radius.height);
      pb.cubic_to(cx - kw, cy + radius.height, cx - radius.width, cy + kh, cx - radius.width, cy);
    }
  }
  pb.close();
}

fn push_rect(pb: &mut PathBuilder, x: f32, y: f32, w: f32, h: f32) {
  if let Some(rect) = tiny_skia::Rect::from_xywh(x, y, w, h) {
    pb.push_rect(rect);
  }
}

/// A plain rectangle contour
pub(crate) fn rect_path(rect: Rect) -> Option<Path> {
  let rect = tiny_skia::Rect::from_xywh(rect.x(), rect.y(), rect.width(), rect.height())?;
  Some(PathBuilder::from_rect(rect))
}

/// A single rounded-rectangle contour with per-corner arcs
///
/// Radii are scaled down with the usual overlap rule when adjacent
/// arcs would not fit along an edge, so the contour never
/// self-intersects.
pub(crate) fn rounded_rect_path(rect: Rect, radii: BorderRadii) -> Option<Path> {
  if rect.width() <= 0.0 || rect.height() <= 0.0 {
    return None;
  }
  if !radii.has_radius() {
    return rect_path(rect);
  }
  let radii = radii.clamped(rect.width(), rect.height());
  let x0 = rect.min_x();
  let y0 = rect.min_y();
  let x1 = rect.max_x();
  let y1 = rect.max_y();
  let tl = radii.top_left;
  let tr = radii.top_right;
  let br = radii.bottom_right;
  let bl = radii.bottom_left;

  let mut pb = PathBuilder::new();
  pb.move_to(x0 + tl.width, y0);
  pb.line_to(x1 - tr.width, y0);
  if tr.has_radius() {
    let kw = KAPPA * tr.width;
    let kh = KAPPA * tr.height;
    pb.cubic_to(x1 - tr.width + kw, y0, x1, y0 + tr.height - kh, x1, y0 + tr.height);
  }
  pb.line_to(x1, y1 - br.height);
  if br.has_radius() {
    let kw = KAPPA * br.width;
    let kh = KAPPA * br.height;
    pb.cubic_to(x1, y1 - br.height + kh, x1 - br.width + kw, y1, x1 - br.width, y1);
  }
  pb.line_to(x0 + bl.width, y1);
  if bl.has_radius() {
    let kw = KAPPA * bl.width;
    let kh = KAPPA * bl.height;
    pb.cubic_to(x0 + bl.width - kw, y1, x0, y1 - bl.height + kh, x0, y1 - bl.height);
  }
  pb.line_to(x0, y0 + tl.height);
  if tl.has_radius() {
    let kw = KAPPA * tl.width;
    let kh = KAPPA * tl.height;
    pb.cubic_to(x0, y0 + tl.height - kh, x0 + tl.width - kw, y0, x0 + tl.width, y0);
  }
  pb.close();
  pb.finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::Size;

  fn model(size: Size, margin: f32, border: EdgeOffsets, radius: f32) -> BoxModel {
    BoxModel::new(
      size,
      EdgeOffsets::all(margin),
      border,
      EdgeOffsets::ZERO,
      BorderRadii::uniform(BorderRadius::circular(radius)),
    )
  }

  fn assert_partition(set: &RegionSet) {
    let body = set.body();
    let recombined = set.interior().union(set.border());
    for y in 0..set.height() {
      for x in 0..set.width() {
        assert_eq!(recombined.coverage(x, y), body.coverage(x, y), "interior+border != body at ({x}, {y})");
      }
    }
    let full = set.all();
    let covered = set.body().union(set.exterior());
    for y in 0..set.height() {
      for x in 0..set.width() {
        assert_eq!(covered.coverage(x, y), full.coverage(x, y), "body+exterior != all at ({x}, {y})");
      }
    }
    assert!(set.interior().intersect(set.exterior()).is_empty());
  }

  #[test]
  fn test_partition_uniform_radii() {
    let set = RegionSet::new(model(Size::new(64.0, 48.0), 4.0, EdgeOffsets::all(3.0), 8.0));
    assert_partition(&set);
  }

  #[test]
  fn test_partition_per_corner_radii() {
    let model = BoxModel::new(
      Size::new(64.0, 48.0),
      EdgeOffsets::new(2.0, 4.0, 6.0, 8.0),
      EdgeOffsets::new(1.0, 2.0, 3.0, 4.0),
      EdgeOffsets::ZERO,
      BorderRadii::new(
        BorderRadius::circular(12.0),
        BorderRadius::circular(2.0),
        BorderRadius::new(6.0, 10.0),
        BorderRadius::ZERO,
      ),
    );
    let set = RegionSet::new(model);
    assert_partition(&set);
  }

  #[test]
  fn test_partition_sharp_corners() {
    let set = RegionSet::new(model(Size::new(32.0, 32.0), 0.0, EdgeOffsets::all(2.0), 0.0));
    assert_partition(&set);
  }

  #[test]
  fn test_general_path_matches_fast_path_for_uniform_input() {
    let size = Size::new(60.0, 40.0);
    let uniform = RegionSet::new(model(size, 3.0, EdgeOffsets::ZERO, 10.0));
    // A vanishing per-corner difference forces the general construction.
    let near_uniform = RegionSet::new(BoxModel::new(
      size,
      EdgeOffsets::all(3.0),
      EdgeOffsets::ZERO,
      EdgeOffsets::ZERO,
      BorderRadii::new(
        BorderRadius::circular(10.0),
        BorderRadius::circular(10.0),
        BorderRadius::circular(10.0),
        BorderRadius::circular(10.0 + 1e-4),
      ),
    ));
    let a = uniform.body();
    let b = near_uniform.body();
    for y in 0..uniform.height() {
      for x in 0..uniform.width() {
        let diff = (a.coverage(x, y) as i16 - b.coverage(x, y) as i16).abs();
        assert!(diff <= 2, "coverage diff {diff} at ({x}, {y})");
      }
    }
  }

  #[test]
  fn test_zero_size_yields_empty_regions() {
    let set = RegionSet::new(model(Size::new(0.0, 20.0), 0.0, EdgeOffsets::all(1.0), 4.0));
    assert!(set.body().is_empty());
    assert!(set.border().is_empty());
    assert!(set.exterior().is_empty());
  }

  #[test]
  fn test_overlarge_insets_yield_empty_body() {
    let set = RegionSet::new(model(Size::new(20.0, 20.0), 12.0, EdgeOffsets::ZERO, 0.0));
    assert!(set.body().is_empty());
    assert!(!set.exterior().is_empty());
  }

  #[test]
  fn test_border_ring_has_hole() {
    let set = RegionSet::new(model(Size::new(40.0, 40.0), 0.0, EdgeOffsets::all(4.0), 0.0));
    let border = set.border();
    assert_eq!(border.coverage(20, 20), 0);
    assert_eq!(border.coverage(2, 20), 255);
    assert_eq!(border.coverage(20, 2), 255);
  }

  #[test]
  fn test_margin_leaves_arcs_untouched() {
    // The body contour keeps its full corner radius regardless of margin.
    let with_margin = RegionSet::new(model(Size::new(60.0, 60.0), 10.0, EdgeOffsets::ZERO, 8.0));
    // Corner pixel of the body box is rounded off.
    assert_eq!(with_margin.body().coverage(10, 10), 0);
    // Center of the body is solid.
    assert_eq!(with_margin.body().coverage(30, 30), 255);
  }

  #[test]
  fn test_edge_strips_cover_their_side_only() {
    let set = RegionSet::new(model(Size::new(40.0, 40.0), 0.0, EdgeOffsets::all(4.0), 0.0));
    let top = set.edge_strip(Edge::Top);
    assert_eq!(top.coverage(20, 1), 255);
    assert_eq!(top.coverage(20, 38), 0);
    let left = set.edge_strip(Edge::Left);
    assert_eq!(left.coverage(1, 20), 255);
    assert_eq!(left.coverage(38, 20), 0);
    // Strips are subsets of the border ring.
    let outside = top.subtract(set.border());
    assert!(outside.is_empty());
  }

  #[test]
  fn test_region_ops() {
    let a = Region::from_rect(10, 10, Rect::from_xywh(0.0, 0.0, 6.0, 10.0));
    let b = Region::from_rect(10, 10, Rect::from_xywh(4.0, 0.0, 6.0, 10.0));
    let both = a.intersect(&b);
    assert_eq!(both.coverage(5, 5), 255);
    assert_eq!(both.coverage(2, 5), 0);
    let only_a = a.subtract(&b);
    assert_eq!(only_a.coverage(2, 5), 255);
    assert_eq!(only_a.coverage(5, 5), 0);
    let either = a.union(&b);
    assert_eq!(either.coverage(2, 5), 255);
    assert_eq!(either.coverage(8, 5), 255);
    assert!(a.intersect(&Region::empty(10, 10)).is_empty());
  }

  #[test]
  fn test_rounded_rect_path_clamps_oversized_radii() {
    // Radii wider than the box scale down instead of self-intersecting.
    let path = rounded_rect_path(Rect::from_xywh(0.0, 0.0, 20.0, 20.0), BorderRadii::uniform(BorderRadius::circular(30.0)));
    let region = Region::from_path(20, 20, path.as_ref(), FillRule::Winding);
    assert_eq!(region.coverage(10, 10), 255);
    assert_eq!(region.coverage(0, 0), 0);
  }
}
