//! Box shadow synthesis.
//!
//! Shadows are approximated without a blur kernel. The fade between an inner
//! rectangle (full shadow color) and an outer rectangle (fully transparent)
//! is assembled from nine fills: four radial corner fades, four linear edge
//! fades and a flat body fill. Outset shadows paint outside the element body,
//! inset shadows inside it, and the two share all of the geometry with the
//! signs of the spread and the falloff divisor flipped.

use tiny_skia::{GradientStop, LinearGradient, Paint, RadialGradient, SpreadMode, Transform};

use crate::boxmodel::{BoxModel, Corner, Edge};
use crate::geometry::{BorderRadii, BorderRadius, EdgeOffsets, Point, Rect};
use crate::paint::canvas::Canvas;
use crate::paint::gradient::{to_skia_color, to_skia_point};
use crate::regions::{Region, RegionSet};
use crate::style::color::Rgba;
use crate::style::ShadowSpec;

// How fast the fade falls off relative to the shadow corner radius. The pair
// of divisors is a visual contract: inset fades are slightly steeper than
// outset ones.
pub const INSET_FALLOFF_DIVISOR: f64 = 4.5;
pub const OUTSET_FALLOFF_DIVISOR: f64 = 3.79;

/// Length of the flat zone before the fade ramp starts, derived from the
/// effective shadow corner radius.
fn falloff_offset(radius: i32, outset: bool) -> i32 {
  let divisor = if outset {
    OUTSET_FALLOFF_DIVISOR
  } else {
    INSET_FALLOFF_DIVISOR
  };
  ((radius * 2) as f64 / divisor) as i32
}

/// The rectangles framing one shadow.
///
/// The fade runs from `inner` (full shadow color) to `outer` (transparent).
/// Either rectangle may have negative dimensions when blur and spread
/// outgrow the element; the fills degrade to nothing in that case.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ShadowFrame {
  pub outer: Rect,
  pub inner: Rect,
  /// Pixels of flat shadow color before the ramp begins.
  pub gradient_start_offset: i32,
}

pub(crate) fn shadow_frame(model: &BoxModel, spec: &ShadowSpec) -> ShadowFrame {
  let inset = !spec.outset;
  // Outset shadows hang off the body box; inset shadows start inside the
  // border band.
  let left = model.margin.left + if inset { model.border_widths.left } else { 0.0 };
  let top = model.margin.top + if inset { model.border_widths.top } else { 0.0 };
  let right = model.margin.right + if inset { model.border_widths.right } else { 0.0 };
  let bottom = model.margin.bottom + if inset { model.border_widths.bottom } else { 0.0 };

  let x = left + spec.offset.x;
  let y = top + spec.offset.y;
  let w = model.size.width - left - right;
  let h = model.size.height - top - bottom;

  let blur = spec.blur.max(0.0);
  // A positive spread grows an outset shadow outward, which in this frame
  // means moving the outer rectangle out, hence the sign flip.
  let spread = if spec.outset { -spec.spread } else { spec.spread };

  let outer = Rect::from_xywh(
    x - blur + spread,
    y - blur + spread,
    w + blur * 2.0 - spread * 2.0,
    h + blur * 2.0 - spread * 2.0,
  );

  let corner_mean = |r: BorderRadius| (r.width + r.height) / 2.0;
  let average_corner_radius = ((corner_mean(model.radii.top_left)
    + corner_mean(model.radii.top_right)
    + corner_mean(model.radii.bottom_right)
    + corner_mean(model.radii.bottom_left)) as i32)
    / 4;
  let average_border_width = ((model.border_widths.left
    + model.border_widths.top
    + model.border_widths.right
    + model.border_widths.bottom)
    / 4.0) as i32;
  let shadow_corner_radius = (average_corner_radius as f32
    + if spec.outset {
      -spread - blur * 2.0
    } else {
      -(average_border_width as f32).max(spread)
    })
  .max(0.0) as i32;
  let gradient_start_offset = 1 + falloff_offset(shadow_corner_radius, spec.outset);
  let ramp = gradient_start_offset as f32;

  let inner = Rect::from_xywh(
    x + blur + ramp + spread,
    y + blur + ramp + spread,
    w - blur * 2.0 - ramp * 2.0 - spread * 2.0,
    h - blur * 2.0 - ramp * 2.0 - spread * 2.0,
  );

  ShadowFrame {
    outer,
    inner,
    gradient_start_offset,
  }
}

/// Renders one shadow onto the canvas.
pub fn render_shadow(canvas: &mut Canvas, regions: &RegionSet, spec: &ShadowSpec) {
  if !spec.color.is_visible() {
    return;
  }
  let model = regions.model();
  let width = regions.width();
  let height = regions.height();
  let frame = shadow_frame(model, spec);

  let base_storage;
  let base: &Region = if spec.outset {
    // Body shrunk by one pixel so the shadow tucks under the body edge
    // without a visible seam.
    base_storage = Region::from_rounded_rect(
      width,
      height,
      model.body_rect().inset_by(EdgeOffsets::all(1.0)),
      model.radii.shrink(1.0),
    );
    &base_storage
  } else {
    regions.body()
  };

  let outer_region = Region::from_rect(width, height, frame.outer);
  let shadow_area = if spec.outset {
    outer_region.subtract(base)
  } else {
    outer_region.intersect(base)
  };

  // The fade runs between the shadow color and the same color with zero
  // alpha, inverted for inset shadows where the dark side is outermost.
  let transparent = spec.color.with_alpha(0.0);
  let (inner_color, outer_color) = if spec.outset {
    (spec.color, transparent)
  } else {
    (transparent, spec.color)
  };

  for corner in Corner::ALL {
    render_corner(canvas, corner, &shadow_area, &frame, inner_color, outer_color, spec.outset);
  }
  for edge in Edge::ALL {
    render_edge(canvas, edge, &shadow_area, &frame, inner_color, outer_color, spec.outset);
  }
  render_body(canvas, base, &frame, spec);
}

// The region between the fade frame and the body gets the flat shadow
// color: inside the inner rectangle for outset shadows, between the body
// contour and the outer rectangle for inset ones.
fn render_body(canvas: &mut Canvas, base: &Region, frame: &ShadowFrame, spec: &ShadowSpec) {
  let width = base.width();
  let height = base.height();
  if spec.outset {
    let inner_region = Region::from_rect(width, height, frame.inner);
    canvas.fill_region(&inner_region.subtract(base), spec.color);
  } else {
    let outer_region = Region::from_rect(width, height, frame.outer);
    canvas.fill_region(&base.subtract(&outer_region), spec.color);
  }
}

fn render_corner(
  canvas: &mut Canvas,
  corner: Corner,
  shadow_area: &Region,
  frame: &ShadowFrame,
  inner_color: Rgba,
  outer_color: Rgba,
  outset: bool,
) {
  let outer = frame.outer;
  let inner = frame.inner;
  let half_w = outer.width() / 2.0;
  let half_h = outer.height() / 2.0;
  let mid_x = outer.x() + half_w;
  let mid_y = outer.y() + half_h;

  // Corner boxes span between the outer and inner rectangle corners; the
  // fade circle is centered on the inner corner. Quadrant clip boxes keep
  // opposite corners from overpainting each other on small elements.
  let (corner_box, clip_box, cx, cy) = match corner {
    Corner::TopLeft => {
      let b = Rect::from_xywh(outer.x(), outer.y(), inner.x() - outer.x(), inner.y() - outer.y());
      (b, Rect::from_xywh(outer.x(), outer.y(), half_w, half_h), b.max_x(), b.max_y())
    }
    Corner::TopRight => {
      let b = Rect::from_xywh(inner.max_x(), outer.y(), outer.max_x() - inner.max_x(), inner.y() - outer.y());
      (b, Rect::from_xywh(mid_x, outer.y(), half_w, half_h), b.x(), b.max_y())
    }
    Corner::BottomLeft => {
      let b = Rect::from_xywh(outer.x(), inner.max_y(), inner.x() - outer.x(), outer.max_y() - inner.max_y());
      (b, Rect::from_xywh(outer.x(), mid_y, half_w, half_h), b.max_x(), b.y())
    }
    Corner::BottomRight => {
      let b = Rect::from_xywh(
        inner.max_x(),
        inner.max_y(),
        outer.max_x() - inner.max_x(),
        outer.max_y() - inner.max_y(),
      );
      (b, Rect::from_xywh(mid_x, mid_y, half_w, half_h), b.x(), b.y())
    }
  };

  let cr = corner_box.width();
  if cr <= 0.0 {
    return;
  }
  let gradient_start = frame.gradient_start_offset as f32 / cr;

  let width = shadow_area.width();
  let height = shadow_area.height();
  let corner_area = Region::from_rect(width, height, corner_box).intersect(shadow_area);

  // Ramp covers none or all of the corner: a sharp circle suffices.
  if gradient_start == 1.0 || gradient_start == 0.0 {
    let circle = Region::from_rounded_rect(
      width,
      height,
      Rect::from_xywh(cx - cr, cy - cr, cr * 2.0, cr * 2.0),
      BorderRadii::uniform(BorderRadius::circular(cr)),
    );
    if outset {
      canvas.fill_region(&corner_area.intersect(&circle), inner_color);
    } else {
      canvas.fill_region(&corner_area.subtract(&circle), outer_color);
    }
    return;
  }

  let stops = if gradient_start > 1.0 || gradient_start < 0.0 {
    vec![
      GradientStop::new(0.0, to_skia_color(inner_color)),
      GradientStop::new(1.0, to_skia_color(outer_color)),
    ]
  } else {
    vec![
      GradientStop::new(0.0, to_skia_color(inner_color)),
      GradientStop::new(gradient_start, to_skia_color(inner_color)),
      GradientStop::new(1.0, to_skia_color(outer_color)),
    ]
  };
  let center = to_skia_point(Point::new(cx, cy));
  let Some(shader) = RadialGradient::new(center, center, cr, stops, SpreadMode::Pad, Transform::identity())
  else {
    return;
  };
  let mut paint = Paint::default();
  paint.shader = shader;
  paint.anti_alias = false;
  let clipped = corner_area.intersect(&Region::from_rect(width, height, clip_box));
  canvas.fill_region_with(&clipped, &paint);
}

fn render_edge(
  canvas: &mut Canvas,
  edge: Edge,
  shadow_area: &Region,
  frame: &ShadowFrame,
  inner_color: Rgba,
  outer_color: Rgba,
  outset: bool,
) {
  let outer = frame.outer;
  let inner = frame.inner;
  let mid_x = outer.x() + outer.width() / 2.0;
  let mid_y = outer.y() + outer.height() / 2.0;

  // Each edge band runs along the inner rectangle side; the gradient goes
  // from the inner side out. When the band reaches past the midline of the
  // outer rectangle the clip box caps it there so opposite edges meet
  // without overlapping.
  let (edge_box, clip_box, grad_start, grad_end) = match edge {
    Edge::Top => {
      let b = Rect::from_xywh(inner.x(), outer.y(), inner.width(), inner.y() - outer.y());
      let clip = (b.max_y() > mid_y)
        .then(|| Rect::from_xywh(b.x(), b.y(), b.width(), mid_y - b.y()));
      (b, clip, Point::new(b.x(), b.max_y()), Point::new(b.x(), b.y()))
    }
    Edge::Right => {
      let b = Rect::from_xywh(inner.max_x(), inner.y(), outer.max_x() - inner.max_x(), inner.height());
      let clip = (b.x() < mid_x)
        .then(|| Rect::from_xywh(mid_x, b.y(), b.max_x() - mid_x, b.height()));
      (b, clip, Point::new(b.x(), b.y()), Point::new(b.max_x(), b.y()))
    }
    Edge::Bottom => {
      let b = Rect::from_xywh(inner.x(), inner.max_y(), inner.width(), outer.max_y() - inner.max_y());
      let clip = (b.y() < mid_y)
        .then(|| Rect::from_xywh(b.x(), mid_y, b.width(), b.max_y() - mid_y));
      (b, clip, Point::new(b.x(), b.y()), Point::new(b.x(), b.max_y()))
    }
    Edge::Left => {
      let b = Rect::from_xywh(outer.x(), inner.y(), inner.x() - outer.x(), inner.height());
      let clip = (b.max_x() > mid_x)
        .then(|| Rect::from_xywh(b.x(), b.y(), mid_x - b.x(), b.height()));
      (b, clip, Point::new(b.max_x(), b.y()), Point::new(b.x(), b.y()))
    }
  };

  if grad_start == grad_end {
    return;
  }

  let dist = grad_start.distance_to(grad_end);
  let gradient_start = frame.gradient_start_offset as f32 / dist;

  let width = shadow_area.width();
  let height = shadow_area.height();

  let stops = if gradient_start > 1.0 || gradient_start < 0.0 {
    vec![
      GradientStop::new(0.0, to_skia_color(inner_color)),
      GradientStop::new(1.0, to_skia_color(outer_color)),
    ]
  } else {
    if gradient_start == 1.0 || gradient_start == 0.0 {
      // The whole band sits in the flat zone.
      let mut area = Region::from_rect(width, height, edge_box);
      if outset {
        area = area.intersect(shadow_area);
      }
      canvas.fill_region(&area, inner_color);
      return;
    }
    vec![
      GradientStop::new(0.0, to_skia_color(inner_color)),
      GradientStop::new(gradient_start, to_skia_color(inner_color)),
      GradientStop::new(1.0, to_skia_color(outer_color)),
    ]
  };

  let Some(shader) = LinearGradient::new(
    to_skia_point(grad_start),
    to_skia_point(grad_end),
    stops,
    SpreadMode::Pad,
    Transform::identity(),
  ) else {
    return;
  };
  let mut paint = Paint::default();
  paint.shader = shader;
  paint.anti_alias = false;

  let mut area = Region::from_rect(width, height, edge_box).intersect(shadow_area);
  if let Some(clip) = clip_box {
    area = area.intersect(&Region::from_rect(width, height, clip));
  }
  canvas.fill_region_with(&area, &paint);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::Size;

  fn rounded_model() -> BoxModel {
    BoxModel::new(
      Size::new(100.0, 80.0),
      EdgeOffsets::all(5.0),
      EdgeOffsets::all(2.0),
      EdgeOffsets::all(3.0),
      BorderRadii::uniform(BorderRadius::circular(8.0)),
    )
  }

  #[test]
  fn falloff_is_steeper_for_inset_shadows() {
    assert_eq!(falloff_offset(20, false), 8);
    assert_eq!(falloff_offset(20, true), 10);
    for radius in 0..64 {
      assert!(falloff_offset(radius, true) >= falloff_offset(radius, false));
    }
  }

  #[test]
  fn outset_frame_grows_outward_from_the_body_box() {
    let model = rounded_model();
    let spec = ShadowSpec {
      blur: 10.0,
      color: Rgba::BLACK,
      outset: true,
      ..ShadowSpec::default()
    };
    let frame = shadow_frame(&model, &spec);
    assert_eq!(
      (frame.outer.x(), frame.outer.y(), frame.outer.width(), frame.outer.height()),
      (-5.0, -5.0, 110.0, 90.0)
    );
    // Average corner radius 8 is swallowed by twice the blur, so the ramp
    // is the minimal single pixel.
    assert_eq!(frame.gradient_start_offset, 1);
    assert_eq!(
      (frame.inner.x(), frame.inner.y(), frame.inner.width(), frame.inner.height()),
      (16.0, 16.0, 68.0, 48.0)
    );
  }

  #[test]
  fn inset_frame_starts_inside_the_border_band() {
    let model = rounded_model();
    let spec = ShadowSpec {
      blur: 10.0,
      color: Rgba::BLACK,
      outset: false,
      ..ShadowSpec::default()
    };
    let frame = shadow_frame(&model, &spec);
    assert_eq!(
      (frame.outer.x(), frame.outer.y(), frame.outer.width(), frame.outer.height()),
      (-3.0, -3.0, 106.0, 86.0)
    );
    // Corner radius 8 minus the average border width 2 leaves 6, and
    // 12 / 4.5 truncates to 2.
    assert_eq!(frame.gradient_start_offset, 3);
    assert_eq!(
      (frame.inner.x(), frame.inner.y(), frame.inner.width(), frame.inner.height()),
      (20.0, 20.0, 60.0, 40.0)
    );
  }

  #[test]
  fn mirrored_inset_toggle_keeps_the_ramp_positive() {
    let model = BoxModel::new(
      Size::new(100.0, 80.0),
      EdgeOffsets::all(5.0),
      EdgeOffsets::all(2.0),
      EdgeOffsets::all(3.0),
      BorderRadii::uniform(BorderRadius::circular(24.0)),
    );
    let outset = ShadowSpec {
      offset: Point::new(3.0, -2.0),
      blur: 3.0,
      spread: 2.0,
      color: Rgba::BLACK,
      outset: true,
    };
    let mirrored = ShadowSpec {
      offset: Point::new(-3.0, 2.0),
      spread: -2.0,
      outset: false,
      ..outset
    };

    let out_frame = shadow_frame(&model, &outset);
    let in_frame = shadow_frame(&model, &mirrored);

    // Negating spread and offsets while toggling inset keeps the ramp
    // positive on both sides; only the divisor choice differs.
    // Outset: shadow corner radius 24 + 2 - 6 = 20, ramp 40 / 3.79 -> 10.
    assert_eq!(out_frame.gradient_start_offset, 11);
    // Inset: shadow corner radius 24 - 2 = 22, ramp 44 / 4.5 -> 9.
    assert_eq!(in_frame.gradient_start_offset, 10);
  }

  #[test]
  fn spread_moves_the_outset_frame_outward() {
    let model = BoxModel::plain(Size::new(60.0, 60.0));
    let spec = ShadowSpec {
      spread: 4.0,
      color: Rgba::BLACK,
      outset: true,
      ..ShadowSpec::default()
    };
    let frame = shadow_frame(&model, &spec);
    assert_eq!((frame.outer.x(), frame.outer.y()), (-4.0, -4.0));
    assert_eq!((frame.outer.width(), frame.outer.height()), (68.0, 68.0));
  }

  #[test]
  fn outset_shadow_paints_outside_the_body_only() {
    let model = BoxModel::new(
      Size::new(60.0, 60.0),
      EdgeOffsets::all(10.0),
      EdgeOffsets::ZERO,
      EdgeOffsets::ZERO,
      BorderRadii::ZERO,
    );
    let regions = RegionSet::new(model);
    let mut canvas = Canvas::new(60, 60).expect("canvas");
    let spec = ShadowSpec {
      blur: 5.0,
      color: Rgba::BLACK,
      outset: true,
      ..ShadowSpec::default()
    };
    render_shadow(&mut canvas, &regions, &spec);

    let alpha_at = |x: u32, y: u32| canvas.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0);
    // In the fade ring outside the body.
    assert!(alpha_at(7, 30) > 0);
    assert!(alpha_at(7, 30) < 255);
    assert!(alpha_at(8, 8) > 0);
    // The element interior stays untouched.
    assert_eq!(alpha_at(30, 30), 0);
  }

  #[test]
  fn inset_shadow_paints_inside_the_body_only() {
    let model = BoxModel::plain(Size::new(40.0, 40.0));
    let regions = RegionSet::new(model);
    let mut canvas = Canvas::new(40, 40).expect("canvas");
    let spec = ShadowSpec {
      blur: 8.0,
      color: Rgba::BLACK,
      outset: false,
      ..ShadowSpec::default()
    };
    render_shadow(&mut canvas, &regions, &spec);

    let alpha_at = |x: u32, y: u32| canvas.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0);
    // Near the edge the shadow is strong.
    assert!(alpha_at(1, 20) > 0);
    // The center lies inside the inner rectangle and stays clear.
    assert_eq!(alpha_at(20, 20), 0);
  }

  #[test]
  fn invisible_shadow_color_renders_nothing() {
    let model = BoxModel::plain(Size::new(30.0, 30.0));
    let regions = RegionSet::new(model);
    let mut canvas = Canvas::new(30, 30).expect("canvas");
    let spec = ShadowSpec {
      blur: 6.0,
      color: Rgba::BLACK.with_alpha(0.0),
      outset: true,
      ..ShadowSpec::default()
    };
    render_shadow(&mut canvas, &regions, &spec);
    assert!(canvas.pixmap().data().iter().all(|&b| b == 0));
  }
}
