//! Text run painting.
//!
//! A text run measures itself through the metrics of a host-registered
//! font, places its measured box by the nine point compass against a
//! layout boundary, then draws an optional background fill and the
//! glyphs, clipped to the run's clip area. Fonts arrive from the host
//! as raw TrueType/OpenType bytes and live in a [`FontTable`]; a run
//! naming an unregistered family is skipped with a log entry rather
//! than failing the paint pass.

use std::sync::Arc;

use fontdue::Font;
use rustc_hash::FxHashMap;

use crate::boxmodel::BoxModel;
use crate::error::ConfigError;
use crate::geometry::{Point, Rect, Size};
use crate::paint::canvas::Canvas;
use crate::regions::RegionSet;
use crate::style::TextSpec;

/// Host-registered fonts keyed by family name.
#[derive(Default)]
pub struct FontTable {
  fonts: FxHashMap<String, Arc<Font>>,
}

impl FontTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses and registers a font under a family name.
  ///
  /// Replaces any font previously registered under the same name.
  pub fn register(&mut self, family: impl Into<String>, bytes: &[u8]) -> Result<(), ConfigError> {
    let family = family.into();
    let font = Font::from_bytes(bytes, fontdue::FontSettings::default())
      .map_err(|reason| ConfigError::InvalidFont { name: family.clone(), reason: reason.to_string() })?;
    self.fonts.insert(family, Arc::new(font));
    Ok(())
  }

  /// Registers an already-parsed font.
  pub fn register_parsed(&mut self, family: impl Into<String>, font: Arc<Font>) {
    self.fonts.insert(family.into(), font);
  }

  pub fn get(&self, family: &str) -> Option<&Arc<Font>> {
    self.fonts.get(family)
  }

  pub fn is_empty(&self) -> bool {
    self.fonts.is_empty()
  }

  pub fn len(&self) -> usize {
    self.fonts.len()
  }
}

/// Top-left corner of the measured text box.
pub(crate) fn text_anchor(model: &BoxModel, spec: &TextSpec, measured: Size) -> Point {
  let bounds = model.boundary_rect(spec.boundary);
  spec.placement.align(bounds, measured).translate(spec.offset)
}

/// Paints one text run onto the canvas.
pub fn render_text(canvas: &mut Canvas, regions: &RegionSet, spec: &TextSpec, fonts: &FontTable) {
  if spec.content.is_empty() {
    return;
  }
  let background = spec.background.filter(|c| c.is_visible());
  if !spec.color.is_visible() && background.is_none() {
    return;
  }
  let Some(font) = fonts.get(&spec.font.family) else {
    log::warn!("font family '{}' is not registered, skipping text run", spec.font.family);
    return;
  };

  let measured = Canvas::measure_text(font, &spec.content, spec.font.size, spec.font.letter_spacing);
  let origin = text_anchor(regions.model(), spec, measured);

  canvas.save();
  canvas.set_clip_region(regions.area(spec.clip));
  if let Some(background) = background {
    canvas.fill_rect(Rect::from_xywh(origin.x, origin.y, measured.width, measured.height), background);
  }
  canvas.draw_text(font, &spec.content, spec.font.size, spec.font.letter_spacing, origin, spec.color);
  canvas.restore();
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::boxmodel::{Boundary, Placement};
  use crate::geometry::{BorderRadii, EdgeOffsets};
  use crate::style::color::Rgba;

  fn model_100() -> BoxModel {
    BoxModel::new(
      Size::new(100.0, 80.0),
      EdgeOffsets::all(5.0),
      EdgeOffsets::all(2.0),
      EdgeOffsets::all(3.0),
      BorderRadii::ZERO,
    )
  }

  #[test]
  fn anchor_places_against_the_layout_boundary() {
    let spec = TextSpec {
      content: "hi".into(),
      placement: Placement::BottomRight,
      boundary: Boundary::InteriorToContent,
      ..TextSpec::default()
    };
    // Content rect of the model is (10, 10, 80, 60).
    let anchor = text_anchor(&model_100(), &spec, Size::new(20.0, 10.0));
    assert_eq!(anchor, Point::new(70.0, 60.0));
  }

  #[test]
  fn anchor_applies_the_offset() {
    let spec = TextSpec {
      content: "hi".into(),
      placement: Placement::TopLeft,
      offset: Point::new(4.0, -2.0),
      ..TextSpec::default()
    };
    let anchor = text_anchor(&model_100(), &spec, Size::new(20.0, 10.0));
    assert_eq!(anchor, Point::new(14.0, 8.0));
  }

  #[test]
  fn boundary_widens_the_placement_box() {
    let spec = TextSpec {
      content: "hi".into(),
      placement: Placement::TopLeft,
      boundary: Boundary::OuterToExterior,
      ..TextSpec::default()
    };
    let anchor = text_anchor(&model_100(), &spec, Size::new(20.0, 10.0));
    assert_eq!(anchor, Point::ZERO);
  }

  #[test]
  fn unregistered_family_skips_the_run() {
    let _ = env_logger::builder().is_test(true).try_init();
    let regions = RegionSet::new(BoxModel::plain(Size::new(20.0, 20.0)));
    let spec = TextSpec {
      content: "hello".into(),
      background: Some(Rgba::RED),
      ..TextSpec::default()
    };
    let mut canvas = Canvas::new(20, 20).unwrap();
    render_text(&mut canvas, &regions, &spec, &FontTable::new());
    assert!(canvas.into_pixmap().data().iter().all(|&b| b == 0));
  }

  #[test]
  fn empty_content_draws_nothing() {
    let regions = RegionSet::new(BoxModel::plain(Size::new(20.0, 20.0)));
    let mut canvas = Canvas::new(20, 20).unwrap();
    render_text(&mut canvas, &regions, &TextSpec::default(), &FontTable::new());
    assert!(canvas.into_pixmap().data().iter().all(|&b| b == 0));
  }

  #[test]
  fn register_rejects_malformed_font_bytes() {
    let mut fonts = FontTable::new();
    let err = fonts.register("broken", &[0u8; 16]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFont { .. }));
    assert!(fonts.is_empty());
  }
}
