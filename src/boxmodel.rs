//! Box model and the closed style enums
//!
//! A [`BoxModel`] is the immutable geometric snapshot of one element:
//! its size plus margins, border widths, padding and corner arcs. It is
//! derived fresh from a style and the element's current bounds on every
//! paint pass, and everything downstream (regions, paints, the cache
//! fingerprint) is computed from it.
//!
//! The enums here are the closed vocabularies of the style language:
//! paint layers, region names, boundaries, compass placements, gradient
//! spans and the like. All of them are plain data dispatched by `match`.

use crate::geometry::BorderRadii;
use crate::geometry::EdgeOffsets;
use crate::geometry::Point;
use crate::geometry::Rect;
use crate::geometry::Size;

/// Immutable box-model snapshot of one element
///
/// All coordinates are element-local: the element occupies
/// `(0, 0, size.width, size.height)` and margins inset inward from
/// there. Constructors clamp every offset and radius to be
/// non-negative, so downstream region math never sees inverted input.
///
/// # Examples
///
/// ```
/// use lacquer::boxmodel::BoxModel;
/// use lacquer::geometry::{BorderRadii, BorderRadius, EdgeOffsets, Size};
///
/// let model = BoxModel::new(
///     Size::new(100.0, 100.0),
///     EdgeOffsets::ZERO,
///     EdgeOffsets::all(2.0),
///     EdgeOffsets::all(4.0),
///     BorderRadii::uniform(BorderRadius::circular(8.0)),
/// );
///
/// assert_eq!(model.interior_rect().width(), 96.0);
/// assert_eq!(model.content_rect().width(), 88.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxModel {
  /// Element size including margins
  pub size: Size,
  /// Margin between the element bounds and the body
  pub margin: EdgeOffsets,
  /// Width of the border band per side
  pub border_widths: EdgeOffsets,
  /// Padding between the border and the content
  pub padding: EdgeOffsets,
  /// Corner arcs of the body contour
  pub radii: BorderRadii,
}

impl BoxModel {
  /// Creates a box model, clamping offsets and radii to be non-negative
  pub fn new(size: Size, margin: EdgeOffsets, border_widths: EdgeOffsets, padding: EdgeOffsets, radii: BorderRadii) -> Self {
    let sanitize = |r: crate::geometry::BorderRadius| crate::geometry::BorderRadius::new(r.width.max(0.0), r.height.max(0.0));
    Self {
      size: Size::new(size.width.max(0.0), size.height.max(0.0)),
      margin: margin.max_zero(),
      border_widths: border_widths.max_zero(),
      padding: padding.max_zero(),
      radii: BorderRadii::new(
        sanitize(radii.top_left),
        sanitize(radii.top_right),
        sanitize(radii.bottom_right),
        sanitize(radii.bottom_left),
      ),
    }
  }

  /// A box model with the given size and no margins, borders or rounding
  pub fn plain(size: Size) -> Self {
    Self {
      size,
      margin: EdgeOffsets::ZERO,
      border_widths: EdgeOffsets::ZERO,
      padding: EdgeOffsets::ZERO,
      radii: BorderRadii::ZERO,
    }
  }

  /// The full element rectangle in element-local coordinates
  pub fn full_rect(&self) -> Rect {
    Rect::from_xywh(0.0, 0.0, self.size.width, self.size.height)
  }

  /// The body rectangle (full rect minus margins)
  pub fn body_rect(&self) -> Rect {
    self.full_rect().inset_by(self.margin)
  }

  /// The interior rectangle (body minus border widths)
  pub fn interior_rect(&self) -> Rect {
    self.full_rect().inset_by(self.margin.plus(self.border_widths))
  }

  /// The content rectangle (interior minus padding)
  pub fn content_rect(&self) -> Rect {
    self
      .full_rect()
      .inset_by(self.margin.plus(self.border_widths).plus(self.padding))
  }

  /// The accumulated insets from the element edge to a boundary
  ///
  /// [`Boundary::CenterToContent`] has no per-side inset of its own;
  /// callers anchoring at the center derive their own offsets from
  /// [`content_rect`](Self::content_rect) and the element center.
  pub fn boundary_insets(&self, boundary: Boundary) -> EdgeOffsets {
    match boundary {
      Boundary::OuterToExterior => EdgeOffsets::ZERO,
      Boundary::ExteriorToBorder => self.margin,
      Boundary::BorderToInterior => self.margin.plus(self.border_widths),
      Boundary::InteriorToContent | Boundary::CenterToContent => {
        self.margin.plus(self.border_widths).plus(self.padding)
      }
    }
  }

  /// The rectangle enclosed by a boundary
  pub fn boundary_rect(&self, boundary: Boundary) -> Rect {
    self.full_rect().inset_by(self.boundary_insets(boundary))
  }

  /// The rectangle covered by a named area
  ///
  /// This is the bounding rectangle only; the exact (rounded,
  /// multi-contour) shapes live in the regions module.
  pub fn area_rect(&self, area: ComponentArea) -> Rect {
    match area {
      ComponentArea::All | ComponentArea::Exterior => self.full_rect(),
      ComponentArea::Body | ComponentArea::Border => self.body_rect(),
      ComponentArea::Interior => self.interior_rect(),
    }
  }

  /// True when the element has no paintable area
  pub fn is_empty(&self) -> bool {
    self.size.is_empty()
  }

  /// True when the border band has any width
  pub fn has_border(&self) -> bool {
    !self.border_widths.is_zero()
  }

  /// Scales the whole model by a uniform factor (DPI scaling)
  pub fn scale(&self, factor: f32) -> Self {
    Self {
      size: self.size.scale(factor),
      margin: self.margin.scale(factor),
      border_widths: self.border_widths.scale(factor),
      padding: self.padding.scale(factor),
      radii: self.radii.scale(factor),
    }
  }
}

/// The four paint layers of an element, in compositing order
///
/// Layers always render in the fixed order background, content,
/// border, foreground; later layers paint over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UiLayer {
  /// Painted first, behind everything
  Background,
  /// The component's own content surface
  Content,
  /// The border band
  Border,
  /// Painted last, over everything
  Foreground,
}

impl UiLayer {
  /// All layers in compositing order
  pub const ALL: [UiLayer; 4] = [UiLayer::Background, UiLayer::Content, UiLayer::Border, UiLayer::Foreground];
}

/// Named areas of an element, used as clip shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentArea {
  /// The entire element rectangle
  All,
  /// Everything outside the body (the margin band)
  Exterior,
  /// The band between the body contour and the interior
  Border,
  /// Inside the border band
  Interior,
  /// Interior plus border (everything except the exterior)
  Body,
}

/// Named boundaries of an element, used as gradient anchor sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
  /// The outermost element edge, before the margin
  OuterToExterior,
  /// After the margin, before the border
  ExteriorToBorder,
  /// After the border, before the padding
  BorderToInterior,
  /// After the padding, where content begins
  InteriorToContent,
  /// Anchored at the element center, extending to the content edge
  CenterToContent,
}

/// The four corners of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
  TopLeft,
  TopRight,
  BottomRight,
  BottomLeft,
}

impl Corner {
  /// All corners, clockwise from top-left
  pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomRight, Corner::BottomLeft];
}

/// The four edges of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
  Top,
  Right,
  Bottom,
  Left,
}

impl Edge {
  /// All edges, clockwise from the top
  pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Compass placement of an image or text run inside a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
  Top,
  Left,
  Bottom,
  Right,
  TopLeft,
  TopRight,
  BottomLeft,
  BottomRight,
  Center,
}

impl Placement {
  /// Positions a box of `size` inside `bounds`, returning its top-left
  /// corner
  ///
  /// Edge placements hug the named side and center along the other
  /// axis. A box larger than its bounds overhangs symmetrically when
  /// centered.
  pub fn align(self, bounds: Rect, size: Size) -> Point {
    let free_w = bounds.width() - size.width;
    let free_h = bounds.height() - size.height;
    let (dx, dy) = match self {
      Placement::Top => (free_w / 2.0, 0.0),
      Placement::Left => (0.0, free_h / 2.0),
      Placement::Bottom => (free_w / 2.0, free_h),
      Placement::Right => (free_w, free_h / 2.0),
      Placement::TopLeft => (0.0, 0.0),
      Placement::TopRight => (free_w, 0.0),
      Placement::BottomLeft => (0.0, free_h),
      Placement::BottomRight => (free_w, free_h),
      Placement::Center => (free_w / 2.0, free_h / 2.0),
    };
    Point::new(bounds.x() + dx, bounds.y() + dy)
  }
}

/// The geometric direction of a gradient
///
/// Axis-aligned spans run edge to edge; diagonal spans run corner to
/// corner along the rectangle's true diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Span {
  TopLeftToBottomRight,
  BottomLeftToTopRight,
  TopRightToBottomLeft,
  BottomRightToTopLeft,
  TopToBottom,
  LeftToRight,
  BottomToTop,
  RightToLeft,
}

impl Span {
  /// True for the four corner-to-corner directions
  pub fn is_diagonal(self) -> bool {
    matches!(
      self,
      Span::TopLeftToBottomRight | Span::BottomLeftToTopRight | Span::TopRightToBottomLeft | Span::BottomRightToTopLeft
    )
  }
}

/// How a gradient continues past its last stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cycle {
  /// The last color fills the remaining area
  None,
  /// The gradient repeats in reverse, then forward again
  Reflect,
  /// The gradient repeats from the first color
  Repeat,
}

/// The geometric family of a gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientKind {
  /// Color transition along a straight line
  Linear,
  /// Color transition growing from a central point outwards
  Radial,
  /// Color transition sweeping around a center like a clock hand
  Conic,
}

/// How an image is sized against the element
///
/// All modes preserve the image aspect ratio except
/// [`WidthAndHeight`](FitMode::WidthAndHeight), which stretches both
/// axes independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitMode {
  /// Keep the image's intrinsic size
  None,
  /// Match the element width
  Width,
  /// Match the element height
  Height,
  /// Stretch to match both dimensions
  WidthAndHeight,
  /// Match whichever element dimension is larger
  MaxDim,
  /// Match whichever element dimension is smaller
  MinDim,
}

/// The procedural texture family of a noise paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseKind {
  /// Raw smoothed value noise
  Stochastic,
  /// Smooth banded height-map contours
  SmoothTopology,
  /// Hard-edged height-map contours
  HardTopology,
  /// Soft blobs
  SmoothSpots,
  /// Binary blobs
  HardSpots,
  /// High-frequency grain
  Grainy,
  /// Rectangular tile pattern
  Tiles,
  /// Cellular pattern with bright cell cores
  Cells,
}
