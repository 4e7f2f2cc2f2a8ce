//! Image layer painting.
//!
//! An image spec resolves to at most two fills: an optional flat primer
//! over the clip area, then the image itself, sized by its fit mode,
//! placed by the nine point compass against a boundary box, inset by
//! padding and finally either drawn once or tiled over the body. All
//! geometry is computed up front; the draw is a single pixmap composite
//! or pattern fill.

use tiny_skia::{FilterQuality, Paint, Pattern, Pixmap, SpreadMode, Transform};

use crate::boxmodel::FitMode;
use crate::geometry::{Rect, Size};
use crate::paint::canvas::Canvas;
use crate::regions::RegionSet;
use crate::style::ImageSpec;

/// Resolves the size the image is drawn at, before padding.
///
/// `native` is the raster size of the source. Scalable sources treat it
/// as a fallback only: they have no intrinsic size to preserve, so any
/// fit mode sizes them straight against the boundary box. For raster
/// sources every fit mode except [`FitMode::WidthAndHeight`] preserves
/// the native aspect ratio, and explicit width/height overrides always
/// win over the derived dimension they replace.
pub(crate) fn fitted_image_size(spec: &ImageSpec, native: Size, bounds: Size) -> Size {
  let intrinsic = (!spec.scalable).then_some(native);
  let mut width = spec.width.or(intrinsic.map(|s| s.width));
  let mut height = spec.height.or(intrinsic.map(|s| s.height));

  if spec.fit != FitMode::None {
    if spec.scalable {
      width = Some(spec.width.unwrap_or(bounds.width));
      height = Some(spec.height.unwrap_or(bounds.height));
    } else {
      if spec.fit == FitMode::WidthAndHeight {
        width = Some(spec.width.unwrap_or(bounds.width));
        height = Some(spec.height.unwrap_or(bounds.height));
      }
      let by_width = spec.fit == FitMode::Width
        || (spec.fit == FitMode::MaxDim && bounds.width > bounds.height)
        || (spec.fit == FitMode::MinDim && bounds.width < bounds.height);
      let by_height = spec.fit == FitMode::Height
        || (spec.fit == FitMode::MaxDim && bounds.width < bounds.height)
        || (spec.fit == FitMode::MinDim && bounds.width > bounds.height);
      // A square boundary drives neither axis under MaxDim/MinDim; the
      // initial size stands.
      if by_width && native.width > 0.0 {
        let w = spec.width.unwrap_or(bounds.width);
        width = Some(w);
        height = Some(w * native.height / native.width);
      } else if by_height && native.height > 0.0 {
        let h = spec.height.unwrap_or(bounds.height);
        height = Some(h);
        width = Some(h * native.width / native.height);
      }
    }
  }

  Size::new(
    width.unwrap_or(native.width).max(0.0),
    height.unwrap_or(native.height).max(0.0),
  )
}

/// Paints one image spec onto the canvas.
///
/// The primer (when visible) fills the clip area first. The image then
/// draws clipped to the same area: tiled over the body when `repeat` is
/// set, otherwise composited once at its placement. A spec without an
/// image paints only the primer.
pub fn render_image(canvas: &mut Canvas, regions: &RegionSet, spec: &ImageSpec) {
  if let Some(primer) = spec.primer.filter(|c| c.is_visible()) {
    canvas.fill_region(regions.area(spec.clip), primer);
  }
  let Some(image) = spec.image.as_ref() else {
    return;
  };
  if spec.opacity <= 0.0 {
    return;
  }

  let model = regions.model();
  let bounds = model.boundary_rect(spec.boundary);
  let native = Size::new(image.width() as f32, image.height() as f32);
  let size = fitted_image_size(spec, native, bounds.size);

  let placed = spec.placement.align(bounds, size).translate(spec.offset);
  let target = Rect::from_xywh(
    placed.x + spec.padding.left,
    placed.y + spec.padding.top,
    size.width - spec.padding.horizontal(),
    size.height - spec.padding.vertical(),
  );
  if target.width() <= 0.0 || target.height() <= 0.0 {
    return;
  }

  canvas.save();
  canvas.set_clip_region(regions.area(spec.clip));
  let opacity = (spec.opacity * canvas.opacity()).clamp(0.0, 1.0);
  if spec.repeat {
    if let Some(paint) = image_paint(image, target, SpreadMode::Repeat, opacity) {
      canvas.fill_region_with(regions.body(), &paint);
    }
  } else {
    draw_fitted(canvas, image, target, spec.opacity, opacity);
  }
  canvas.restore();
}

fn draw_fitted(canvas: &mut Canvas, image: &Pixmap, target: Rect, opacity: f32, folded_opacity: f32) {
  let unscaled = (target.width() - image.width() as f32).abs() < 0.5
    && (target.height() - image.height() as f32).abs() < 0.5;
  if unscaled {
    // draw_pixmap folds the canvas opacity in on its own.
    canvas.draw_pixmap(target.x().round() as i32, target.y().round() as i32, image, opacity);
    return;
  }
  if let Some(paint) = image_paint(image, target, SpreadMode::Pad, folded_opacity) {
    canvas.fill_rect_with(target, &paint);
  }
}

/// A pattern paint mapping the source raster onto `anchor`.
///
/// With [`SpreadMode::Repeat`] the anchor is the tile; with
/// [`SpreadMode::Pad`] it is the one scaled copy.
fn image_paint(image: &Pixmap, anchor: Rect, spread: SpreadMode, opacity: f32) -> Option<Paint<'_>> {
  let scale_x = anchor.width() / image.width() as f32;
  let scale_y = anchor.height() / image.height() as f32;
  if !(scale_x.is_finite() && scale_y.is_finite()) || scale_x <= 0.0 || scale_y <= 0.0 {
    return None;
  }
  let mut paint = Paint::default();
  paint.shader = Pattern::new(
    image.as_ref(),
    spread,
    FilterQuality::Bilinear,
    opacity,
    Transform::from_row(scale_x, 0.0, 0.0, scale_y, anchor.x(), anchor.y()),
  );
  paint.anti_alias = false;
  Some(paint)
}
