//! Core geometry types for box-model styling and painting
//!
//! This module provides the geometric primitives used throughout the
//! rendering engine. All units are in logical pixels unless otherwise
//! noted; a style can be scaled to device pixels with a uniform factor
//! before rendering.
//!
//! # Coordinate System
//!
//! The coordinate system has its origin at the top-left corner:
//! - Positive X extends to the right
//! - Positive Y extends downward
//!
//! Box-model arithmetic (margins, border widths, padding) clamps
//! negative inputs to zero, so a degenerate style can never produce an
//! inverted region.

use std::fmt;

/// A 2D point in logical pixel space
///
/// Represents a coordinate in the rendering surface's coordinate system.
/// The origin (0, 0) is at the top-left corner.
///
/// # Examples
///
/// ```
/// use lacquer::Point;
///
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::ZERO;
///
/// assert_eq!(p1.x, 10.0);
/// assert_eq!(p1.y, 20.0);
/// assert_eq!(p2, Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  /// X coordinate (horizontal position, increases to the right)
  pub x: f32,
  /// Y coordinate (vertical position, increases downward)
  pub y: f32,
}

impl Point {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

  /// Creates a new point at the given coordinates
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::Point;
  ///
  /// let point = Point::new(100.0, 50.0);
  /// assert_eq!(point.x, 100.0);
  /// assert_eq!(point.y, 50.0);
  /// ```
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  /// Translates this point by another point's coordinates
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::Point;
  ///
  /// let p1 = Point::new(10.0, 20.0);
  /// let p2 = Point::new(5.0, 3.0);
  /// let result = p1.translate(p2);
  ///
  /// assert_eq!(result, Point::new(15.0, 23.0));
  /// ```
  pub fn translate(self, other: Point) -> Self {
    Self {
      x: self.x + other.x,
      y: self.y + other.y,
    }
  }

  /// Computes the distance to another point
  ///
  /// Uses Euclidean distance formula: sqrt((x2-x1)² + (y2-y1)²)
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::Point;
  ///
  /// let p1 = Point::new(0.0, 0.0);
  /// let p2 = Point::new(3.0, 4.0);
  ///
  /// assert_eq!(p1.distance_to(p2), 5.0); // 3-4-5 triangle
  /// ```
  pub fn distance_to(self, other: Point) -> f32 {
    let dx = other.x - self.x;
    let dy = other.y - self.y;
    (dx * dx + dy * dy).sqrt()
  }

  /// Scales both coordinates by a factor
  pub fn scale(self, factor: f32) -> Self {
    Self {
      x: self.x * factor,
      y: self.y * factor,
    }
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// A 2D size in logical pixels
///
/// Represents the dimensions of a rectangular region.
/// Both width and height are non-negative (though not enforced by the type).
///
/// # Examples
///
/// ```
/// use lacquer::Size;
///
/// let size = Size::new(800.0, 600.0);
/// assert_eq!(size.area(), 480000.0);
/// assert!(!size.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
  /// Width in logical pixels
  pub width: f32,
  /// Height in logical pixels
  pub height: f32,
}

impl Size {
  /// A size with zero width and height
  pub const ZERO: Self = Self {
    width: 0.0,
    height: 0.0,
  };

  /// Creates a new size with the given dimensions
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  /// Computes the area (width × height)
  pub fn area(self) -> f32 {
    self.width * self.height
  }

  /// Checks if either dimension is zero or negative
  ///
  /// An empty size cannot contain any content and produces no pixels
  /// when rendered.
  pub fn is_empty(self) -> bool {
    self.width <= 0.0 || self.height <= 0.0
  }

  /// Scales both dimensions by a factor
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::Size;
  ///
  /// let size = Size::new(100.0, 50.0);
  /// let doubled = size.scale(2.0);
  /// assert_eq!(doubled, Size::new(200.0, 100.0));
  /// ```
  pub fn scale(self, factor: f32) -> Self {
    Self {
      width: self.width * factor,
      height: self.height * factor,
    }
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

/// A rectangle in logical pixel space
///
/// Defined by an origin point (top-left corner) and a size.
///
/// # Examples
///
/// ```
/// use lacquer::{Point, Rect, Size};
///
/// let rect = Rect::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
///
/// assert_eq!(rect.min_x(), 10.0);
/// assert_eq!(rect.max_x(), 110.0);
/// assert_eq!(rect.center(), Point::new(60.0, 45.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  /// The top-left corner of the rectangle
  pub origin: Point,
  /// The dimensions of the rectangle
  pub size: Size,
}

impl Rect {
  /// A rectangle at the origin with zero size
  pub const ZERO: Self = Self {
    origin: Point::ZERO,
    size: Size::ZERO,
  };

  /// Creates a new rectangle from origin and size
  pub const fn new(origin: Point, size: Size) -> Self {
    Self { origin, size }
  }

  /// Creates a rectangle from individual coordinates and dimensions
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::Rect;
  ///
  /// let rect = Rect::from_xywh(10.0, 20.0, 100.0, 50.0);
  /// assert_eq!(rect.x(), 10.0);
  /// assert_eq!(rect.width(), 100.0);
  /// ```
  pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      origin: Point::new(x, y),
      size: Size::new(width, height),
    }
  }

  /// Creates a rectangle from two corner points
  ///
  /// The points can be in any order; the rectangle will span between them.
  pub fn from_points(p1: Point, p2: Point) -> Self {
    let min_x = p1.x.min(p2.x);
    let min_y = p1.y.min(p2.y);
    let max_x = p1.x.max(p2.x);
    let max_y = p1.y.max(p2.y);
    Self::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
  }

  /// Returns the X coordinate of the origin
  pub fn x(self) -> f32 {
    self.origin.x
  }

  /// Returns the Y coordinate of the origin
  pub fn y(self) -> f32 {
    self.origin.y
  }

  /// Returns the width
  pub fn width(self) -> f32 {
    self.size.width
  }

  /// Returns the height
  pub fn height(self) -> f32 {
    self.size.height
  }

  /// Returns the leftmost X coordinate
  pub fn min_x(self) -> f32 {
    self.origin.x
  }

  /// Returns the rightmost X coordinate
  pub fn max_x(self) -> f32 {
    self.origin.x + self.size.width
  }

  /// Returns the topmost Y coordinate
  pub fn min_y(self) -> f32 {
    self.origin.y
  }

  /// Returns the bottommost Y coordinate
  pub fn max_y(self) -> f32 {
    self.origin.y + self.size.height
  }

  /// Returns the center point
  pub fn center(self) -> Point {
    Point::new(
      self.origin.x + self.size.width / 2.0,
      self.origin.y + self.size.height / 2.0,
    )
  }

  /// Checks if this rectangle has zero or negative area
  pub fn is_empty(self) -> bool {
    self.size.is_empty()
  }

  /// Checks if a point is inside this rectangle (boundary inclusive)
  pub fn contains_point(self, point: Point) -> bool {
    point.x >= self.min_x() && point.x <= self.max_x() && point.y >= self.min_y() && point.y <= self.max_y()
  }

  /// Checks if this rectangle intersects another (boundary touch counts)
  pub fn intersects(self, other: Rect) -> bool {
    self.min_x() <= other.max_x()
      && self.max_x() >= other.min_x()
      && self.min_y() <= other.max_y()
      && self.max_y() >= other.min_y()
  }

  /// Computes the smallest rectangle containing both rectangles
  pub fn union(self, other: Rect) -> Rect {
    let min_x = self.min_x().min(other.min_x());
    let min_y = self.min_y().min(other.min_y());
    let max_x = self.max_x().max(other.max_x());
    let max_y = self.max_y().max(other.max_y());
    Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
  }

  /// Computes the overlapping region of two rectangles
  ///
  /// Returns `None` if the rectangles do not overlap.
  pub fn intersection(self, other: Rect) -> Option<Rect> {
    let min_x = self.min_x().max(other.min_x());
    let min_y = self.min_y().max(other.min_y());
    let max_x = self.max_x().min(other.max_x());
    let max_y = self.max_y().min(other.max_y());
    if min_x < max_x && min_y < max_y {
      Some(Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y))
    } else {
      None
    }
  }

  /// Translates this rectangle by a point's coordinates
  pub fn translate(self, offset: Point) -> Rect {
    Rect::new(self.origin.translate(offset), self.size)
  }

  /// Grows (positive) or shrinks (negative) the rectangle on all sides
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::Rect;
  ///
  /// let rect = Rect::from_xywh(10.0, 10.0, 20.0, 20.0);
  /// assert_eq!(rect.inflate(5.0), Rect::from_xywh(5.0, 5.0, 30.0, 30.0));
  /// ```
  pub fn inflate(self, amount: f32) -> Rect {
    Rect::from_xywh(
      self.x() - amount,
      self.y() - amount,
      self.width() + amount * 2.0,
      self.height() + amount * 2.0,
    )
  }

  /// Shrinks the rectangle inward by per-side offsets
  ///
  /// Each side moves inward by its offset. Dimensions saturate at zero,
  /// so over-large offsets yield an empty rectangle rather than an
  /// inverted one.
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::geometry::{EdgeOffsets, Rect};
  ///
  /// let rect = Rect::from_xywh(0.0, 0.0, 100.0, 60.0);
  /// let inner = rect.inset_by(EdgeOffsets::new(10.0, 5.0, 10.0, 5.0));
  ///
  /// assert_eq!(inner, Rect::from_xywh(5.0, 10.0, 90.0, 40.0));
  /// ```
  pub fn inset_by(self, offsets: EdgeOffsets) -> Rect {
    Rect::from_xywh(
      self.x() + offsets.left,
      self.y() + offsets.top,
      (self.width() - offsets.horizontal()).max(0.0),
      (self.height() - offsets.vertical()).max(0.0),
    )
  }
}

impl fmt::Display for Rect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{} {}]", self.origin, self.size)
  }
}

/// Per-side offsets for box-model edges
///
/// Used for margins, border widths and padding. Follows the CSS
/// convention of top, right, bottom, left ordering.
///
/// # Examples
///
/// ```
/// use lacquer::geometry::EdgeOffsets;
///
/// let margin = EdgeOffsets::all(10.0);
/// let padding = EdgeOffsets::new(5.0, 10.0, 5.0, 10.0);
///
/// assert_eq!(margin.horizontal(), 20.0);
/// assert_eq!(padding.vertical(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeOffsets {
  /// Offset from the top edge
  pub top: f32,
  /// Offset from the right edge
  pub right: f32,
  /// Offset from the bottom edge
  pub bottom: f32,
  /// Offset from the left edge
  pub left: f32,
}

impl EdgeOffsets {
  /// Zero offsets on all sides
  pub const ZERO: Self = Self {
    top: 0.0,
    right: 0.0,
    bottom: 0.0,
    left: 0.0,
  };

  /// Creates offsets with the same value on all sides
  pub const fn all(value: f32) -> Self {
    Self {
      top: value,
      right: value,
      bottom: value,
      left: value,
    }
  }

  /// Creates offsets with individual values per side (CSS order)
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::geometry::EdgeOffsets;
  ///
  /// let offsets = EdgeOffsets::new(1.0, 2.0, 3.0, 4.0);
  /// assert_eq!(offsets.top, 1.0);
  /// assert_eq!(offsets.right, 2.0);
  /// assert_eq!(offsets.bottom, 3.0);
  /// assert_eq!(offsets.left, 4.0);
  /// ```
  pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
    Self {
      top,
      right,
      bottom,
      left,
    }
  }

  /// Creates symmetric edge offsets
  ///
  /// # Arguments
  /// * `vertical` - Value for top and bottom
  /// * `horizontal` - Value for left and right
  pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
    Self {
      top: vertical,
      right: horizontal,
      bottom: vertical,
      left: horizontal,
    }
  }

  /// Returns the sum of left and right offsets
  pub fn horizontal(self) -> f32 {
    self.left + self.right
  }

  /// Returns the sum of top and bottom offsets
  pub fn vertical(self) -> f32 {
    self.top + self.bottom
  }

  /// Adds another set of offsets side by side
  ///
  /// Box-model inset accumulation: margin + border width + padding.
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::geometry::EdgeOffsets;
  ///
  /// let margin = EdgeOffsets::all(10.0);
  /// let border = EdgeOffsets::all(2.0);
  /// assert_eq!(margin.plus(border), EdgeOffsets::all(12.0));
  /// ```
  pub fn plus(self, other: EdgeOffsets) -> Self {
    Self {
      top: self.top + other.top,
      right: self.right + other.right,
      bottom: self.bottom + other.bottom,
      left: self.left + other.left,
    }
  }

  /// Clamps every side to be non-negative
  ///
  /// Negative margins are valid style input but never contribute to
  /// inset math, so every consumer clamps before accumulating.
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::geometry::EdgeOffsets;
  ///
  /// let offsets = EdgeOffsets::new(-5.0, 3.0, -1.0, 0.0);
  /// assert_eq!(offsets.max_zero(), EdgeOffsets::new(0.0, 3.0, 0.0, 0.0));
  /// ```
  pub fn max_zero(self) -> Self {
    Self {
      top: self.top.max(0.0),
      right: self.right.max(0.0),
      bottom: self.bottom.max(0.0),
      left: self.left.max(0.0),
    }
  }

  /// Scales all sides by a factor
  pub fn scale(self, factor: f32) -> Self {
    Self {
      top: self.top * factor,
      right: self.right * factor,
      bottom: self.bottom * factor,
      left: self.left * factor,
    }
  }

  /// Checks if all four sides have the same value
  pub fn is_uniform(self) -> bool {
    self.top == self.right && self.right == self.bottom && self.bottom == self.left
  }

  /// Checks if all four sides are zero
  pub fn is_zero(self) -> bool {
    self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
  }
}

impl fmt::Display for EdgeOffsets {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[t:{}, r:{}, b:{}, l:{}]",
      self.top, self.right, self.bottom, self.left
    )
  }
}

/// The elliptical arc of a single rounded corner
///
/// Width and height are the horizontal and vertical radii of the arc.
/// A corner with either radius at zero renders square.
///
/// # Examples
///
/// ```
/// use lacquer::geometry::BorderRadius;
///
/// let round = BorderRadius::circular(8.0);
/// let oval = BorderRadius::new(16.0, 8.0);
///
/// assert!(round.has_radius());
/// assert_eq!(oval.width, 16.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderRadius {
  /// Horizontal radius of the corner arc
  pub width: f32,
  /// Vertical radius of the corner arc
  pub height: f32,
}

impl BorderRadius {
  /// A square corner (no rounding)
  pub const ZERO: Self = Self {
    width: 0.0,
    height: 0.0,
  };

  /// Creates a corner arc with independent horizontal and vertical radii
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  /// Creates a circular corner arc (equal radii)
  pub const fn circular(radius: f32) -> Self {
    Self {
      width: radius,
      height: radius,
    }
  }

  /// Checks if this corner actually rounds
  ///
  /// A corner only rounds when both radii are positive.
  pub fn has_radius(self) -> bool {
    self.width > 0.0 && self.height > 0.0
  }

  /// Shrinks both radii by an amount, saturating at zero
  ///
  /// Used when deriving an inner contour from an outer one: moving a
  /// rounded corner inward by `amount` shrinks its arc by the same
  /// amount until it degenerates to a square corner.
  pub fn shrink(self, amount: f32) -> Self {
    Self {
      width: (self.width - amount).max(0.0),
      height: (self.height - amount).max(0.0),
    }
  }

  /// Scales both radii by a factor
  pub fn scale(self, factor: f32) -> Self {
    Self {
      width: self.width * factor,
      height: self.height * factor,
    }
  }
}

impl fmt::Display for BorderRadius {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

/// Corner arcs for all four corners of a box
///
/// Each corner carries an independent width×height arc. Corners are
/// named clockwise from top-left.
///
/// # Examples
///
/// ```
/// use lacquer::geometry::{BorderRadii, BorderRadius};
///
/// let radii = BorderRadii::uniform(BorderRadius::circular(10.0));
/// assert!(radii.has_radius());
/// assert!(radii.is_uniform());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderRadii {
  /// Top-left corner arc
  pub top_left: BorderRadius,
  /// Top-right corner arc
  pub top_right: BorderRadius,
  /// Bottom-right corner arc
  pub bottom_right: BorderRadius,
  /// Bottom-left corner arc
  pub bottom_left: BorderRadius,
}

impl BorderRadii {
  /// All corners square (no rounding)
  pub const ZERO: Self = Self {
    top_left: BorderRadius::ZERO,
    top_right: BorderRadius::ZERO,
    bottom_right: BorderRadius::ZERO,
    bottom_left: BorderRadius::ZERO,
  };

  /// Creates radii with the same arc on every corner
  pub const fn uniform(radius: BorderRadius) -> Self {
    Self {
      top_left: radius,
      top_right: radius,
      bottom_right: radius,
      bottom_left: radius,
    }
  }

  /// Creates radii with individual arcs per corner (clockwise from top-left)
  pub const fn new(
    top_left: BorderRadius,
    top_right: BorderRadius,
    bottom_right: BorderRadius,
    bottom_left: BorderRadius,
  ) -> Self {
    Self {
      top_left,
      top_right,
      bottom_right,
      bottom_left,
    }
  }

  /// Checks if any corner actually rounds
  pub fn has_radius(&self) -> bool {
    self.top_left.has_radius()
      || self.top_right.has_radius()
      || self.bottom_right.has_radius()
      || self.bottom_left.has_radius()
  }

  /// Checks if all corners carry the same arc
  pub fn is_uniform(&self) -> bool {
    self.top_left == self.top_right && self.top_right == self.bottom_right && self.bottom_right == self.bottom_left
  }

  /// Checks if all corners are square
  pub fn is_zero(&self) -> bool {
    !self.has_radius()
  }

  /// Returns the largest radius on any axis of any corner
  pub fn max_radius(&self) -> f32 {
    let corner_max = |r: BorderRadius| r.width.max(r.height);
    corner_max(self.top_left)
      .max(corner_max(self.top_right))
      .max(corner_max(self.bottom_right))
      .max(corner_max(self.bottom_left))
  }

  /// Returns the average of all eight radii
  pub fn average_radius(&self) -> f32 {
    (self.top_left.width
      + self.top_left.height
      + self.top_right.width
      + self.top_right.height
      + self.bottom_right.width
      + self.bottom_right.height
      + self.bottom_left.width
      + self.bottom_left.height)
      / 8.0
  }

  /// Shrinks every corner arc by an amount, saturating at zero
  pub fn shrink(&self, amount: f32) -> Self {
    Self {
      top_left: self.top_left.shrink(amount),
      top_right: self.top_right.shrink(amount),
      bottom_right: self.bottom_right.shrink(amount),
      bottom_left: self.bottom_left.shrink(amount),
    }
  }

  /// Scales every corner arc by a factor
  pub fn scale(&self, factor: f32) -> Self {
    Self {
      top_left: self.top_left.scale(factor),
      top_right: self.top_right.scale(factor),
      bottom_right: self.bottom_right.scale(factor),
      bottom_left: self.bottom_left.scale(factor),
    }
  }

  /// Clamps radii so adjacent arcs never overlap
  ///
  /// Per the CSS overlap rule: if the sum of any two adjacent radii
  /// exceeds the box dimension they share, all radii are scaled down
  /// proportionally by the worst offender.
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::geometry::{BorderRadii, BorderRadius};
  ///
  /// // 30 + 30 exceeds the 40px edge, so everything scales by 2/3.
  /// let radii = BorderRadii::uniform(BorderRadius::circular(30.0)).clamped(40.0, 100.0);
  /// assert!((radii.top_left.width - 20.0).abs() < 0.001);
  /// ```
  pub fn clamped(self, width: f32, height: f32) -> Self {
    if width <= 0.0 || height <= 0.0 {
      return Self::ZERO;
    }

    let top_scale = width / (self.top_left.width + self.top_right.width).max(width);
    let right_scale = height / (self.top_right.height + self.bottom_right.height).max(height);
    let bottom_scale = width / (self.bottom_left.width + self.bottom_right.width).max(width);
    let left_scale = height / (self.top_left.height + self.bottom_left.height).max(height);

    let scale = top_scale.min(right_scale).min(bottom_scale).min(left_scale);
    if scale >= 1.0 {
      return self;
    }

    Self {
      top_left: self.top_left.scale(scale),
      top_right: self.top_right.scale(scale),
      bottom_right: self.bottom_right.scale(scale),
      bottom_left: self.bottom_left.scale(scale),
    }
  }
}

impl fmt::Display for BorderRadii {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[tl:{}, tr:{}, br:{}, bl:{}]",
      self.top_left, self.top_right, self.bottom_right, self.bottom_left
    )
  }
}
