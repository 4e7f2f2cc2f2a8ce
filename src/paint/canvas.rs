//! Drawing surface over tiny-skia
//!
//! The [`Canvas`] wraps a `Pixmap` and a stack of graphics states. Each
//! state carries the current transform, opacity, blend mode and clip;
//! states push and pop around independently failable paint steps so a
//! misbehaving step cannot leak its setup into the next one.
//!
//! Clips combine multiplicatively: setting a clip intersects it with
//! whatever clip is already active. Besides rectangles and rounded
//! rectangles, a clip can come from any [`Region`], which is how paints
//! stay inside the element shapes.

use fontdue::Font;
use tiny_skia::BlendMode;
use tiny_skia::ColorU8;
use tiny_skia::FillRule;
use tiny_skia::FilterQuality;
use tiny_skia::Mask;
use tiny_skia::MaskType;
use tiny_skia::Paint;
use tiny_skia::Path;
use tiny_skia::PathBuilder;
use tiny_skia::Pixmap;
use tiny_skia::PixmapPaint;
use tiny_skia::Rect as SkiaRect;
use tiny_skia::Stroke;
use tiny_skia::Transform;

use crate::error::RenderError;
use crate::geometry::BorderRadii;
use crate::geometry::Point;
use crate::geometry::Rect;
use crate::geometry::Size;
use crate::paint::pixmap::new_pixmap;
use crate::paint::pixmap::new_pixmap_checked;
use crate::regions::rounded_rect_path;
use crate::regions::Region;
use crate::style::color::Rgba;

/// Graphics state for the canvas
#[derive(Debug, Clone)]
struct CanvasState {
  transform: Transform,
  opacity: f32,
  /// Device-space clip bounds used for cheap culling
  clip_rect: Option<Rect>,
  /// Clip coverage, respecting radii and region shapes
  clip_mask: Option<Mask>,
  blend_mode: BlendMode,
}

impl CanvasState {
  fn new() -> Self {
    Self {
      transform: Transform::identity(),
      opacity: 1.0,
      clip_rect: None,
      clip_mask: None,
      blend_mode: BlendMode::SourceOver,
    }
  }

  /// Creates a paint with the current opacity and blend mode applied
  fn create_paint(&self, color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    let alpha = color.a * self.opacity;
    paint.set_color_rgba8(color.r, color.g, color.b, (alpha * 255.0) as u8);
    paint.anti_alias = true;
    paint.blend_mode = self.blend_mode;
    paint
  }
}

impl Default for CanvasState {
  fn default() -> Self {
    Self::new()
  }
}

/// 2D drawing surface
///
/// Not thread-safe; one canvas belongs to one rendering pass.
pub struct Canvas {
  pixmap: Pixmap,
  state_stack: Vec<CanvasState>,
  current_state: CanvasState,
}

impl Canvas {
  /// Creates a transparent canvas of the given size
  pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
    let pixmap = new_pixmap_checked(width, height)?;
    Ok(Self::from_pixmap(pixmap))
  }

  /// Creates a canvas filled with a background color
  pub fn with_background(width: u32, height: u32, background: Rgba) -> Result<Self, RenderError> {
    let mut canvas = Self::new(width, height)?;
    canvas.clear(background);
    Ok(canvas)
  }

  /// Wraps an existing pixmap without clearing it
  pub fn from_pixmap(pixmap: Pixmap) -> Self {
    Self {
      pixmap,
      state_stack: Vec::new(),
      current_state: CanvasState::new(),
    }
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.pixmap.width()
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.pixmap.height()
  }

  #[inline]
  pub fn size(&self) -> Size {
    Size::new(self.width() as f32, self.height() as f32)
  }

  #[inline]
  pub fn bounds(&self) -> Rect {
    Rect::from_xywh(0.0, 0.0, self.width() as f32, self.height() as f32)
  }

  /// Fills the whole surface, ignoring clip and opacity
  pub fn clear(&mut self, color: Rgba) {
    let skia_color = tiny_skia::Color::from_rgba8(color.r, color.g, color.b, (color.a * 255.0) as u8);
    self.pixmap.fill(skia_color);
  }

  pub fn into_pixmap(self) -> Pixmap {
    self.pixmap
  }

  #[inline]
  pub fn pixmap(&self) -> &Pixmap {
    &self.pixmap
  }

  #[inline]
  pub fn pixmap_mut(&mut self) -> &mut Pixmap {
    &mut self.pixmap
  }

  // ========================================================================
  // State management
  // ========================================================================

  /// Saves the current graphics state to the stack
  pub fn save(&mut self) {
    self.state_stack.push(self.current_state.clone());
  }

  /// Restores the previously saved graphics state
  ///
  /// Does nothing if the stack is empty.
  pub fn restore(&mut self) {
    if let Some(state) = self.state_stack.pop() {
      self.current_state = state;
    }
  }

  #[inline]
  pub fn state_depth(&self) -> usize {
    self.state_stack.len()
  }

  /// Pops states until the stack is back at the given depth
  ///
  /// Recovers from paint steps that saved more than they restored.
  pub fn restore_to_depth(&mut self, depth: usize) {
    while self.state_stack.len() > depth {
      self.restore();
    }
  }

  /// Replaces the current state with a neutral one
  ///
  /// Identity transform, full opacity, no clip. The saved stack is
  /// left alone.
  pub fn reset_state(&mut self) {
    self.current_state = CanvasState::new();
  }

  pub fn set_opacity(&mut self, opacity: f32) {
    self.current_state.opacity = opacity.clamp(0.0, 1.0);
  }

  #[inline]
  pub fn opacity(&self) -> f32 {
    self.current_state.opacity
  }

  pub fn set_blend_mode(&mut self, mode: BlendMode) {
    self.current_state.blend_mode = mode;
  }

  pub fn set_transform(&mut self, transform: Transform) {
    self.current_state.transform = transform;
  }

  #[inline]
  pub fn transform(&self) -> Transform {
    self.current_state.transform
  }

  pub fn translate(&mut self, dx: f32, dy: f32) {
    self.current_state.transform = self.current_state.transform.pre_translate(dx, dy);
  }

  pub fn scale(&mut self, sx: f32, sy: f32) {
    self.current_state.transform = self.current_state.transform.pre_scale(sx, sy);
  }

  /// Intersects the clip with a rectangle
  pub fn set_clip(&mut self, rect: Rect) {
    self.set_clip_rounded(rect, BorderRadii::ZERO);
  }

  /// Intersects the clip with a rounded rectangle
  pub fn set_clip_rounded(&mut self, rect: Rect, radii: BorderRadii) {
    let transform = self.current_state.transform;
    let clip_bounds = if transform == Transform::identity() {
      rect
    } else {
      Self::transform_rect_aabb(rect, transform)
    };

    let base_clip = match self.current_state.clip_rect {
      Some(existing) => existing.intersection(clip_bounds).unwrap_or(Rect::ZERO),
      None => clip_bounds,
    };
    self.current_state.clip_rect = Some(base_clip);

    let new_mask = self.build_clip_mask(rect, radii);
    self.intersect_clip_mask(new_mask);
  }

  /// Intersects the clip with an element region
  ///
  /// The region raster must match the canvas size; an empty region
  /// clips everything.
  pub fn set_clip_region(&mut self, region: &Region) {
    debug_assert_eq!((region.width(), region.height()), (self.width(), self.height()));
    let new_mask = match region.mask() {
      Some(mask) => Some(mask.clone()),
      // All-zero coverage; Mask::new starts cleared.
      None => Mask::new(self.width(), self.height()),
    };
    self.intersect_clip_mask(new_mask);
  }

  fn intersect_clip_mask(&mut self, new_mask: Option<Mask>) {
    self.current_state.clip_mask = match (new_mask, self.current_state.clip_mask.take()) {
      (Some(mut next), Some(existing)) => {
        combine_masks(&mut next, &existing);
        Some(next)
      }
      (Some(mask), None) => Some(mask),
      (None, existing) => existing,
    };
  }

  /// Clears the clip entirely
  pub fn clear_clip(&mut self) {
    self.current_state.clip_rect = None;
    self.current_state.clip_mask = None;
  }

  pub(crate) fn clip_bounds(&self) -> Option<Rect> {
    self.current_state.clip_rect
  }

  pub(crate) fn clip_mask(&self) -> Option<&Mask> {
    self.current_state.clip_mask.as_ref()
  }

  // ========================================================================
  // Drawing
  // ========================================================================

  /// Fills a rectangle with a flat color
  pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
    if color.a == 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    let rect = match self.apply_clip(rect) {
      Some(r) => r,
      None => return,
    };
    if let Some(skia_rect) = to_skia_rect(rect) {
      let path = PathBuilder::from_rect(skia_rect);
      let paint = self.current_state.create_paint(color);
      self.fill(&path, &paint);
    }
  }

  /// Fills a rounded rectangle with a flat color
  pub fn fill_rounded_rect(&mut self, rect: Rect, radii: BorderRadii, color: Rgba) {
    if color.a == 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    if !radii.has_radius() {
      return self.fill_rect(rect, color);
    }
    if self.fully_clipped(rect) {
      return;
    }
    if let Some(path) = rounded_rect_path(rect, radii) {
      let paint = self.current_state.create_paint(color);
      self.fill(&path, &paint);
    }
  }

  /// Fills an arbitrary path with a flat color
  pub fn fill_path(&mut self, path: &Path, color: Rgba) {
    if color.a == 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    let paint = self.current_state.create_paint(color);
    self.fill(path, &paint);
  }

  /// Fills a path with a prepared paint, typically a gradient shader
  pub(crate) fn fill_path_with(&mut self, path: &Path, paint: &Paint) {
    self.fill(path, paint);
  }

  /// Fills a rectangle with a prepared paint
  pub(crate) fn fill_rect_with(&mut self, rect: Rect, paint: &Paint) {
    if let Some(skia_rect) = to_skia_rect(rect) {
      let path = PathBuilder::from_rect(skia_rect);
      self.fill(&path, paint);
    }
  }

  /// Fills an element region with a flat color
  pub fn fill_region(&mut self, region: &Region, color: Rgba) {
    if color.a == 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    let paint = self.current_state.create_paint(color);
    self.fill_region_with(region, &paint);
  }

  /// Fills an element region with a prepared paint
  pub(crate) fn fill_region_with(&mut self, region: &Region, paint: &Paint) {
    let Some(region_mask) = region.mask() else {
      return;
    };
    let Some(skia_rect) = to_skia_rect(self.bounds()) else {
      return;
    };
    let path = PathBuilder::from_rect(skia_rect);
    let combined;
    let mask = match &self.current_state.clip_mask {
      None => region_mask,
      Some(clip) => {
        let mut next = region_mask.clone();
        combine_masks(&mut next, clip);
        combined = next;
        &combined
      }
    };
    self
      .pixmap
      .fill_path(&path, paint, FillRule::Winding, self.current_state.transform, Some(mask));
  }

  /// Strokes a rectangle outline
  pub fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f32) {
    if color.a == 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    if let Some(skia_rect) = to_skia_rect(rect) {
      let path = PathBuilder::from_rect(skia_rect);
      let paint = self.current_state.create_paint(color);
      let stroke = Stroke { width, ..Stroke::default() };
      self.pixmap.stroke_path(
        &path,
        &paint,
        &stroke,
        self.current_state.transform,
        self.current_state.clip_mask.as_ref(),
      );
    }
  }

  /// Draws a line between two points
  pub fn draw_line(&mut self, start: Point, end: Point, color: Rgba, width: f32) {
    if color.a == 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(start.x, start.y);
    pb.line_to(end.x, end.y);
    if let Some(path) = pb.finish() {
      let paint = self.current_state.create_paint(color);
      let stroke = Stroke { width, ..Stroke::default() };
      self.pixmap.stroke_path(
        &path,
        &paint,
        &stroke,
        self.current_state.transform,
        self.current_state.clip_mask.as_ref(),
      );
    }
  }

  /// Fills a circle
  pub fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
    if color.a == 0.0 || radius <= 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    let mut pb = PathBuilder::new();
    pb.push_circle(center.x, center.y, radius);
    if let Some(path) = pb.finish() {
      let paint = self.current_state.create_paint(color);
      self.fill(&path, &paint);
    }
  }

  /// Composites another pixmap at an integer offset
  ///
  /// Used for cached layer buffers and placed images.
  pub fn draw_pixmap(&mut self, x: i32, y: i32, pixmap: &Pixmap, opacity: f32) {
    let paint = PixmapPaint {
      opacity: (opacity * self.current_state.opacity).clamp(0.0, 1.0),
      blend_mode: self.current_state.blend_mode,
      quality: FilterQuality::Nearest,
    };
    self.pixmap.draw_pixmap(
      x,
      y,
      pixmap.as_ref(),
      &paint,
      self.current_state.transform,
      self.current_state.clip_mask.as_ref(),
    );
  }

  /// Draws a single line of text with its top-left corner at `origin`
  ///
  /// Glyphs rasterize through fontdue and composite one by one,
  /// honoring the current clip, opacity and transform.
  pub fn draw_text(&mut self, font: &Font, text: &str, size: f32, letter_spacing: f32, origin: Point, color: Rgba) {
    if text.is_empty() || color.a == 0.0 || self.current_state.opacity == 0.0 {
      return;
    }
    let Some(line) = font.horizontal_line_metrics(size) else {
      log::warn!("font has no horizontal metrics, skipping text run");
      return;
    };
    let baseline = origin.y + line.ascent;
    let mut cursor = origin.x;
    for ch in text.chars() {
      let (metrics, coverage) = font.rasterize(ch, size);
      if metrics.width > 0 && metrics.height > 0 {
        let gx = (cursor + metrics.xmin as f32).round() as i32;
        let gy = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i32;
        if let Some(glyph) = glyph_pixmap(&coverage, metrics.width as u32, metrics.height as u32, color) {
          let paint = PixmapPaint {
            opacity: self.current_state.opacity,
            blend_mode: self.current_state.blend_mode,
            quality: FilterQuality::Nearest,
          };
          self.pixmap.draw_pixmap(
            gx,
            gy,
            glyph.as_ref(),
            &paint,
            self.current_state.transform,
            self.current_state.clip_mask.as_ref(),
          );
        }
      }
      cursor += metrics.advance_width + letter_spacing;
    }
  }

  /// Measures a single line of text
  pub fn measure_text(font: &Font, text: &str, size: f32, letter_spacing: f32) -> Size {
    if text.is_empty() {
      return Size::ZERO;
    }
    let height = font
      .horizontal_line_metrics(size)
      .map(|line| line.ascent - line.descent)
      .unwrap_or(size);
    let mut width = 0.0;
    let mut chars = 0usize;
    for ch in text.chars() {
      width += font.metrics(ch, size).advance_width;
      chars += 1;
    }
    if chars > 1 {
      width += letter_spacing * (chars - 1) as f32;
    }
    Size::new(width, height)
  }

  // ========================================================================
  // Internals
  // ========================================================================

  fn fill(&mut self, path: &Path, paint: &Paint) {
    self.pixmap.fill_path(
      path,
      paint,
      FillRule::Winding,
      self.current_state.transform,
      self.current_state.clip_mask.as_ref(),
    );
  }

  /// Clips a rectangle against the device-space clip bounds
  fn apply_clip(&self, rect: Rect) -> Option<Rect> {
    if self.current_state.clip_mask.is_some() && self.current_state.transform != Transform::identity() {
      return Some(rect);
    }
    if let Some(clip) = self.current_state.clip_rect {
      if clip.width() <= 0.0 || clip.height() <= 0.0 {
        return None;
      }
      if self.current_state.transform == Transform::identity() {
        rect.intersection(clip)
      } else {
        let transformed = Self::transform_rect_aabb(rect, self.current_state.transform);
        if transformed.intersection(clip).is_some() {
          Some(rect)
        } else {
          None
        }
      }
    } else {
      Some(rect)
    }
  }

  fn fully_clipped(&self, rect: Rect) -> bool {
    if let Some(clip) = self.current_state.clip_rect {
      if clip.width() <= 0.0 || clip.height() <= 0.0 {
        return true;
      }
      let bounds = if self.current_state.transform == Transform::identity() {
        rect
      } else {
        Self::transform_rect_aabb(rect, self.current_state.transform)
      };
      return bounds.intersection(clip).is_none();
    }
    false
  }

  #[inline]
  fn transform_point(transform: Transform, point: Point) -> Point {
    Point::new(
      point.x * transform.sx + point.y * transform.kx + transform.tx,
      point.x * transform.ky + point.y * transform.sy + transform.ty,
    )
  }

  #[inline]
  fn transform_rect_aabb(rect: Rect, transform: Transform) -> Rect {
    let p1 = Self::transform_point(transform, rect.origin);
    let p2 = Self::transform_point(transform, Point::new(rect.max_x(), rect.min_y()));
    let p3 = Self::transform_point(transform, Point::new(rect.min_x(), rect.max_y()));
    let p4 = Self::transform_point(transform, Point::new(rect.max_x(), rect.max_y()));
    let min_x = p1.x.min(p2.x).min(p3.x).min(p4.x);
    let max_x = p1.x.max(p2.x).max(p3.x).max(p4.x);
    let min_y = p1.y.min(p2.y).min(p3.y).min(p4.y);
    let max_y = p1.y.max(p2.y).max(p3.y).max(p4.y);
    Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
  }

  fn build_clip_mask(&self, rect: Rect, radii: BorderRadii) -> Option<Mask> {
    if rect.width() <= 0.0 || rect.height() <= 0.0 || self.width() == 0 || self.height() == 0 {
      return None;
    }
    let mut mask_pixmap = new_pixmap(self.width(), self.height())?;
    let paint = {
      let mut p = Paint::default();
      p.set_color_rgba8(255, 255, 255, 255);
      p.anti_alias = true;
      p
    };
    let path = rounded_rect_path(rect, radii)?;
    mask_pixmap.fill_path(&path, &paint, FillRule::Winding, self.current_state.transform, None);
    Some(Mask::from_pixmap(mask_pixmap.as_ref(), MaskType::Alpha))
  }
}

/// Intersects two masks of equal size, byte by byte
fn combine_masks(into: &mut Mask, existing: &Mask) {
  if into.width() != existing.width() || into.height() != existing.height() {
    return;
  }
  for (dst, src) in into.data_mut().iter_mut().zip(existing.data().iter()) {
    let multiplied = (*dst as u16 * *src as u16 + 127) / 255;
    *dst = multiplied as u8;
  }
}

fn to_skia_rect(rect: Rect) -> Option<SkiaRect> {
  SkiaRect::from_xywh(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Rasterized glyph coverage colored and premultiplied into a pixmap
fn glyph_pixmap(coverage: &[u8], width: u32, height: u32, color: Rgba) -> Option<Pixmap> {
  let mut pixmap = new_pixmap(width, height)?;
  let alpha = color.a.clamp(0.0, 1.0);
  for (dst, &cov) in pixmap.pixels_mut().iter_mut().zip(coverage) {
    let a = (cov as f32 * alpha) as u8;
    *dst = ColorU8::from_rgba(color.r, color.g, color.b, a).premultiply();
  }
  Some(pixmap)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::BorderRadius;

  fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let idx = ((y * pixmap.width() + x) * 4) as usize;
    let data = pixmap.data();
    (data[idx], data[idx + 1], data[idx + 2], data[idx + 3])
  }

  #[test]
  fn test_canvas_creation() {
    let canvas = Canvas::new(100, 50).unwrap();
    assert_eq!(canvas.width(), 100);
    assert_eq!(canvas.height(), 50);
    assert_eq!(canvas.bounds(), Rect::from_xywh(0.0, 0.0, 100.0, 50.0));
  }

  #[test]
  fn test_canvas_rejects_zero_size() {
    assert!(Canvas::new(0, 10).is_err());
  }

  #[test]
  fn test_fill_rect_writes_pixels() {
    let mut canvas = Canvas::with_background(10, 10, Rgba::WHITE).unwrap();
    canvas.fill_rect(Rect::from_xywh(2.0, 2.0, 4.0, 4.0), Rgba::rgb(255, 0, 0));
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 3, 3), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 8, 8), (255, 255, 255, 255));
  }

  #[test]
  fn test_save_restore_round_trips_state() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    canvas.save();
    canvas.set_opacity(0.5);
    canvas.translate(3.0, 0.0);
    assert_eq!(canvas.opacity(), 0.5);
    canvas.restore();
    assert_eq!(canvas.opacity(), 1.0);
    assert_eq!(canvas.transform(), Transform::identity());
    assert_eq!(canvas.state_depth(), 0);
  }

  #[test]
  fn test_restore_to_depth_unwinds_unbalanced_saves() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    let depth = canvas.state_depth();
    canvas.save();
    canvas.save();
    canvas.set_opacity(0.25);
    canvas.restore_to_depth(depth);
    assert_eq!(canvas.state_depth(), depth);
    assert_eq!(canvas.opacity(), 1.0);
  }

  #[test]
  fn test_reset_state_neutralizes_clip_and_transform() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    canvas.translate(2.0, 2.0);
    canvas.set_clip(Rect::from_xywh(0.0, 0.0, 4.0, 4.0));
    canvas.set_opacity(0.3);
    canvas.reset_state();
    assert_eq!(canvas.transform(), Transform::identity());
    assert_eq!(canvas.opacity(), 1.0);
    assert!(canvas.clip_mask().is_none());
    assert!(canvas.clip_bounds().is_none());
  }

  #[test]
  fn test_clip_limits_rect_fill() {
    let mut canvas = Canvas::with_background(10, 10, Rgba::WHITE).unwrap();
    canvas.set_clip(Rect::from_xywh(2.0, 2.0, 4.0, 4.0));
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), Rgba::rgb(255, 0, 0));
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 3, 3), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 0, 0), (255, 255, 255, 255));
  }

  #[test]
  fn test_rounded_clip_masks_corners() {
    let mut canvas = Canvas::with_background(12, 12, Rgba::WHITE).unwrap();
    canvas.set_clip_rounded(
      Rect::from_xywh(2.0, 2.0, 8.0, 8.0),
      BorderRadii::uniform(BorderRadius::circular(4.0)),
    );
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 12.0, 12.0), Rgba::rgb(0, 0, 255));
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 6, 6), (0, 0, 255, 255));
    assert_eq!(pixel(&pixmap, 2, 2), (255, 255, 255, 255));
  }

  #[test]
  fn test_region_clip_constrains_fill() {
    let region = Region::from_rect(10, 10, Rect::from_xywh(0.0, 0.0, 5.0, 10.0));
    let mut canvas = Canvas::with_background(10, 10, Rgba::WHITE).unwrap();
    canvas.set_clip_region(&region);
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), Rgba::rgb(0, 255, 0));
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 2, 5), (0, 255, 0, 255));
    assert_eq!(pixel(&pixmap, 8, 5), (255, 255, 255, 255));
  }

  #[test]
  fn test_empty_region_clips_everything() {
    let mut canvas = Canvas::with_background(8, 8, Rgba::WHITE).unwrap();
    canvas.set_clip_region(&Region::empty(8, 8));
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 8.0, 8.0), Rgba::rgb(255, 0, 0));
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 4, 4), (255, 255, 255, 255));
  }

  #[test]
  fn test_fill_region_paints_only_region() {
    let region = Region::from_rect(10, 10, Rect::from_xywh(3.0, 3.0, 4.0, 4.0));
    let mut canvas = Canvas::with_background(10, 10, Rgba::WHITE).unwrap();
    canvas.fill_region(&region, Rgba::rgb(255, 0, 0));
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 4, 4), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 1, 1), (255, 255, 255, 255));
  }

  #[test]
  fn test_clips_nest_multiplicatively() {
    let mut canvas = Canvas::with_background(10, 10, Rgba::WHITE).unwrap();
    canvas.set_clip(Rect::from_xywh(0.0, 0.0, 6.0, 10.0));
    canvas.set_clip(Rect::from_xywh(4.0, 0.0, 6.0, 10.0));
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), Rgba::rgb(255, 0, 0));
    let pixmap = canvas.into_pixmap();
    // Only the two-clip overlap receives paint.
    assert_eq!(pixel(&pixmap, 4, 5), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 2, 5), (255, 255, 255, 255));
    assert_eq!(pixel(&pixmap, 8, 5), (255, 255, 255, 255));
  }

  #[test]
  fn test_opacity_scales_fill_alpha() {
    let mut canvas = Canvas::new(4, 4).unwrap();
    canvas.set_opacity(0.5);
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 4.0, 4.0), Rgba::rgb(255, 0, 0));
    let pixmap = canvas.into_pixmap();
    let (_, _, _, a) = pixel(&pixmap, 2, 2);
    assert!((a as i16 - 127).abs() <= 1, "alpha {a}");
  }

  #[test]
  fn test_draw_pixmap_composites_buffer() {
    let mut source = Canvas::new(4, 4).unwrap();
    source.fill_rect(Rect::from_xywh(0.0, 0.0, 4.0, 4.0), Rgba::rgb(0, 0, 255));
    let source = source.into_pixmap();

    let mut canvas = Canvas::with_background(10, 10, Rgba::WHITE).unwrap();
    canvas.draw_pixmap(3, 3, &source, 1.0);
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 4, 4), (0, 0, 255, 255));
    assert_eq!(pixel(&pixmap, 1, 1), (255, 255, 255, 255));
  }

  #[test]
  fn test_translated_clip_tracks_device_bounds() {
    let mut canvas = Canvas::with_background(10, 10, Rgba::WHITE).unwrap();
    canvas.translate(2.0, 1.0);
    canvas.set_clip(Rect::from_xywh(1.0, 1.0, 4.0, 4.0));
    if let Some(bounds) = canvas.clip_bounds() {
      assert_eq!(bounds, Rect::from_xywh(3.0, 2.0, 4.0, 4.0));
    }
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 6.0, 6.0), Rgba::rgb(255, 0, 0));
    let pixmap = canvas.into_pixmap();
    assert_eq!(pixel(&pixmap, 4, 3), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 2, 2), (255, 255, 255, 255));
  }
}
