//! Style declarations
//!
//! The types here are plain immutable data describing how an element
//! should look: base colors, per-edge border colors and, per paint
//! layer, named collections of images, gradients, noise fields,
//! shadows, text runs and user painters. They carry no rendering
//! logic; the paint modules interpret them against a box model.
//!
//! Numeric sanity is checked once at intake via [`ElementStyle::validate`]
//! so that malformed input fails fast instead of surfacing as a half
//! painted element later.

pub mod color;

pub use color::Rgba;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::boxmodel::Boundary;
use crate::boxmodel::ComponentArea;
use crate::boxmodel::Cycle;
use crate::boxmodel::Edge;
use crate::boxmodel::FitMode;
use crate::boxmodel::GradientKind;
use crate::boxmodel::NoiseKind;
use crate::boxmodel::Placement;
use crate::boxmodel::Span;
use crate::boxmodel::UiLayer;
use crate::error::ConfigError;
use crate::geometry::EdgeOffsets;
use crate::geometry::Point;
use crate::geometry::Size;
use crate::paint::canvas::Canvas;

/// A user-supplied paint callback
///
/// Runs with a known transform and clip; side effects are otherwise
/// unconstrained. A panicking painter is isolated by the compositor
/// and never aborts the paint pass.
pub trait Painter {
  fn paint(&self, canvas: &mut Canvas);
}

impl<F> Painter for F
where
  F: Fn(&mut Canvas),
{
  fn paint(&self, canvas: &mut Canvas) {
    self(canvas)
  }
}

/// A user painter together with the area its drawing clips to
#[derive(Clone)]
pub struct PainterSpec {
  pub painter: Arc<dyn Painter>,
  pub clip: ComponentArea,
}

impl PainterSpec {
  /// Wraps a painter, clipped to the interior
  pub fn new(painter: impl Painter + 'static) -> Self {
    Self { painter: Arc::new(painter), clip: ComponentArea::Interior }
  }

  pub fn with_clip(mut self, clip: ComponentArea) -> Self {
    self.clip = clip;
    self
  }
}

/// A color gradient over one of the element's boundary boxes
#[derive(Debug, Clone)]
pub struct GradientSpec {
  /// Gradient colors in order, at least one
  pub colors: Vec<Rgba>,
  /// Explicit stop fractions; reconciled against the color count
  pub fractions: Vec<f32>,
  pub kind: GradientKind,
  pub span: Span,
  pub cycle: Cycle,
  /// Boundary box the anchors derive from
  pub boundary: Boundary,
  /// Region the fill clips to
  pub area: ComponentArea,
  /// Explicit gradient length; derived from the anchors when absent
  pub size: Option<f32>,
  /// Extra rotation in degrees around the first anchor
  pub rotation: f32,
  /// Focus offset from the center, radial gradients only
  pub focus: Point,
  /// Translation applied to both anchors
  pub offset: Point,
}

impl Default for GradientSpec {
  fn default() -> Self {
    Self {
      colors: Vec::new(),
      fractions: Vec::new(),
      kind: GradientKind::Linear,
      span: Span::TopToBottom,
      cycle: Cycle::None,
      boundary: Boundary::ExteriorToBorder,
      area: ComponentArea::Body,
      size: None,
      rotation: 0.0,
      focus: Point::ZERO,
      offset: Point::ZERO,
    }
  }
}

impl GradientSpec {
  /// A top-to-bottom linear gradient over the body
  pub fn vertical(colors: Vec<Rgba>) -> Self {
    Self { colors, ..Self::default() }
  }

  pub fn is_opaque(&self) -> bool {
    !self.colors.is_empty() && self.colors.iter().all(|c| c.is_opaque())
  }

  fn validate(&self, name: &str) -> Result<(), ConfigError> {
    if self.colors.is_empty() {
      return Err(ConfigError::InvalidGradient { message: format!("gradient '{name}' has no colors") });
    }
    validate_fractions(&self.fractions).map_err(|reason| ConfigError::InvalidGradient {
      message: format!("gradient '{name}' {reason}"),
    })?;
    if let Some(size) = self.size {
      if !size.is_finite() || size <= 0.0 {
        return Err(ConfigError::InvalidGradient {
          message: format!("gradient '{name}' has non-positive size {size}"),
        });
      }
    }
    if !self.rotation.is_finite() {
      return Err(ConfigError::InvalidGradient { message: format!("gradient '{name}' has non-finite rotation") });
    }
    Ok(())
  }

  fn scale(&mut self, factor: f32) {
    if let Some(size) = self.size.as_mut() {
      *size *= factor;
    }
    self.focus = self.focus.scale(factor);
    self.offset = self.offset.scale(factor);
  }
}

/// A procedural noise texture over one of the element's boundary boxes
#[derive(Debug, Clone)]
pub struct NoiseSpec {
  pub kind: NoiseKind,
  /// Colors mapped over the noise value, at least one
  pub colors: Vec<Rgba>,
  /// Explicit stop fractions; reconciled like gradient stops
  pub fractions: Vec<f32>,
  /// Translation of the noise field
  pub offset: Point,
  /// Per-axis stretch of the noise field
  pub scale: Size,
  pub area: ComponentArea,
  pub boundary: Boundary,
  /// Rotation of the noise field in degrees
  pub rotation: f32,
}

impl Default for NoiseSpec {
  fn default() -> Self {
    Self {
      kind: NoiseKind::Stochastic,
      colors: Vec::new(),
      fractions: Vec::new(),
      offset: Point::ZERO,
      scale: Size::new(1.0, 1.0),
      area: ComponentArea::Body,
      boundary: Boundary::ExteriorToBorder,
      rotation: 0.0,
    }
  }
}

impl NoiseSpec {
  fn validate(&self, name: &str) -> Result<(), ConfigError> {
    if self.colors.is_empty() {
      return Err(ConfigError::InvalidNoise { message: format!("noise '{name}' has no colors") });
    }
    validate_fractions(&self.fractions).map_err(|reason| ConfigError::InvalidNoise {
      message: format!("noise '{name}' {reason}"),
    })?;
    if !(self.scale.width.is_finite() && self.scale.height.is_finite()) || self.scale.width <= 0.0 || self.scale.height <= 0.0 {
      return Err(ConfigError::InvalidNoise { message: format!("noise '{name}' has non-positive scale") });
    }
    Ok(())
  }

  fn scale_by(&mut self, factor: f32) {
    self.offset = self.offset.scale(factor);
    self.scale = self.scale.scale(factor);
  }
}

/// A CSS-like box shadow, inset or outset
#[derive(Debug, Clone, Copy)]
pub struct ShadowSpec {
  /// Horizontal and vertical shadow offset
  pub offset: Point,
  /// Blur radius, clamped at zero when painted
  pub blur: f32,
  /// Spread radius; positive grows an outset shadow
  pub spread: f32,
  pub color: Rgba,
  /// True paints outside the body, false inside it
  pub outset: bool,
}

impl Default for ShadowSpec {
  fn default() -> Self {
    Self {
      offset: Point::ZERO,
      blur: 0.0,
      spread: 0.0,
      color: Rgba::BLACK.with_alpha(0.5),
      outset: true,
    }
  }
}

impl ShadowSpec {
  pub fn is_visible(&self) -> bool {
    self.color.is_visible()
  }

  fn validate(&self, name: &str) -> Result<(), ConfigError> {
    let finite =
      self.offset.x.is_finite() && self.offset.y.is_finite() && self.blur.is_finite() && self.spread.is_finite();
    if !finite {
      return Err(ConfigError::InvalidShadow { message: format!("shadow '{name}' has non-finite geometry") });
    }
    Ok(())
  }

  fn scale(&mut self, factor: f32) {
    self.offset = self.offset.scale(factor);
    self.blur *= factor;
    self.spread *= factor;
  }
}

/// An image placed, fitted or tiled over a boundary box
#[derive(Clone)]
pub struct ImageSpec {
  /// Flat fill painted behind the image
  pub primer: Option<Rgba>,
  /// The image raster; absent paints only the primer
  pub image: Option<Arc<Pixmap>>,
  /// True for vector-backed images with no intrinsic size of their
  /// own; they are sized against the element instead of their raster
  pub scalable: bool,
  pub placement: Placement,
  pub boundary: Boundary,
  /// Tile the image over the whole boundary box
  pub repeat: bool,
  pub fit: FitMode,
  /// Explicit target size per axis, overriding the fit result
  pub width: Option<f32>,
  pub height: Option<f32>,
  pub opacity: f32,
  /// Inset applied inside the boundary box before placement
  pub padding: EdgeOffsets,
  pub offset: Point,
  pub clip: ComponentArea,
}

impl Default for ImageSpec {
  fn default() -> Self {
    Self {
      primer: None,
      image: None,
      scalable: false,
      placement: Placement::Center,
      boundary: Boundary::ExteriorToBorder,
      repeat: false,
      fit: FitMode::None,
      width: None,
      height: None,
      opacity: 1.0,
      padding: EdgeOffsets::ZERO,
      offset: Point::ZERO,
      clip: ComponentArea::Body,
    }
  }
}

impl fmt::Debug for ImageSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ImageSpec")
      .field("primer", &self.primer)
      .field("image", &self.image.as_ref().map(|img| (img.width(), img.height())))
      .field("scalable", &self.scalable)
      .field("placement", &self.placement)
      .field("repeat", &self.repeat)
      .field("fit", &self.fit)
      .field("opacity", &self.opacity)
      .finish()
  }
}

impl ImageSpec {
  pub fn has_content(&self) -> bool {
    self.image.is_some() || self.primer.map_or(false, |c| c.is_visible())
  }

  fn validate(&self, name: &str) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&self.opacity) {
      return Err(ConfigError::InvalidImage {
        message: format!("image '{name}' opacity {} outside [0, 1]", self.opacity),
      });
    }
    for dim in [self.width, self.height].into_iter().flatten() {
      if !dim.is_finite() || dim <= 0.0 {
        return Err(ConfigError::InvalidImage { message: format!("image '{name}' has non-positive size {dim}") });
      }
    }
    Ok(())
  }

  fn scale(&mut self, factor: f32) {
    if let Some(w) = self.width.as_mut() {
      *w *= factor;
    }
    if let Some(h) = self.height.as_mut() {
      *h *= factor;
    }
    self.padding = self.padding.scale(factor);
    self.offset = self.offset.scale(factor);
  }
}

/// Font selection for a text run
///
/// The family name resolves against the fonts registered with the
/// engine; an unregistered family skips the run with a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
  pub family: String,
  /// Size in pixels
  pub size: f32,
  /// Extra advance between glyphs in pixels
  pub letter_spacing: f32,
}

impl Default for FontSpec {
  fn default() -> Self {
    Self { family: String::new(), size: 12.0, letter_spacing: 0.0 }
  }
}

/// A text run placed against a boundary box
#[derive(Debug, Clone)]
pub struct TextSpec {
  pub content: String,
  pub font: FontSpec,
  pub color: Rgba,
  /// Flat fill behind the measured text bounds
  pub background: Option<Rgba>,
  pub placement: Placement,
  pub boundary: Boundary,
  pub offset: Point,
  pub clip: ComponentArea,
}

impl Default for TextSpec {
  fn default() -> Self {
    Self {
      content: String::new(),
      font: FontSpec::default(),
      color: Rgba::BLACK,
      background: None,
      placement: Placement::Center,
      boundary: Boundary::InteriorToContent,
      offset: Point::ZERO,
      clip: ComponentArea::Interior,
    }
  }
}

impl TextSpec {
  fn validate(&self, name: &str) -> Result<(), ConfigError> {
    if !self.font.size.is_finite() || self.font.size <= 0.0 {
      return Err(ConfigError::InvalidFont {
        name: self.font.family.clone(),
        reason: format!("text '{name}' has non-positive font size {}", self.font.size),
      });
    }
    Ok(())
  }

  fn scale(&mut self, factor: f32) {
    self.font.size *= factor;
    self.font.letter_spacing *= factor;
    self.offset = self.offset.scale(factor);
  }
}

/// Everything one paint layer renders, each kind keyed by name
///
/// Same-kind effects draw in name-sorted order; the sorted map is the
/// whole tie-break rule.
#[derive(Clone, Default)]
pub struct LayerContent {
  pub images: BTreeMap<String, ImageSpec>,
  pub gradients: BTreeMap<String, GradientSpec>,
  pub noises: BTreeMap<String, NoiseSpec>,
  pub shadows: BTreeMap<String, ShadowSpec>,
  pub texts: BTreeMap<String, TextSpec>,
  pub painters: BTreeMap<String, PainterSpec>,
}

impl LayerContent {
  pub fn is_empty(&self) -> bool {
    self.images.is_empty()
      && self.gradients.is_empty()
      && self.noises.is_empty()
      && self.shadows.is_empty()
      && self.texts.is_empty()
      && self.painters.is_empty()
  }

  pub fn has_painters(&self) -> bool {
    !self.painters.is_empty()
  }

  fn validate(&self) -> Result<(), ConfigError> {
    for (name, gradient) in &self.gradients {
      gradient.validate(name)?;
    }
    for (name, noise) in &self.noises {
      noise.validate(name)?;
    }
    for (name, shadow) in &self.shadows {
      shadow.validate(name)?;
    }
    for (name, image) in &self.images {
      image.validate(name)?;
    }
    for (name, text) in &self.texts {
      text.validate(name)?;
    }
    Ok(())
  }

  fn scale(&mut self, factor: f32) {
    for gradient in self.gradients.values_mut() {
      gradient.scale(factor);
    }
    for noise in self.noises.values_mut() {
      noise.scale_by(factor);
    }
    for shadow in self.shadows.values_mut() {
      shadow.scale(factor);
    }
    for image in self.images.values_mut() {
      image.scale(factor);
    }
    for text in self.texts.values_mut() {
      text.scale(factor);
    }
  }
}

impl fmt::Debug for LayerContent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LayerContent")
      .field("images", &self.images)
      .field("gradients", &self.gradients)
      .field("noises", &self.noises)
      .field("shadows", &self.shadows)
      .field("texts", &self.texts)
      .field("painters", &self.painters.keys().collect::<Vec<_>>())
      .finish()
  }
}

/// Per-edge border colors
///
/// All four present and equal is the common case and paints the whole
/// border ring in one fill; otherwise each edge strip fills on its
/// own.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderColors {
  pub top: Option<Rgba>,
  pub right: Option<Rgba>,
  pub bottom: Option<Rgba>,
  pub left: Option<Rgba>,
}

impl BorderColors {
  pub fn uniform(color: Rgba) -> Self {
    Self { top: Some(color), right: Some(color), bottom: Some(color), left: Some(color) }
  }

  pub fn edge(&self, edge: Edge) -> Option<Rgba> {
    match edge {
      Edge::Top => self.top,
      Edge::Right => self.right,
      Edge::Bottom => self.bottom,
      Edge::Left => self.left,
    }
  }

  pub fn is_uniform(&self) -> bool {
    self.top == self.right && self.right == self.bottom && self.bottom == self.left
  }

  pub fn any_visible(&self) -> bool {
    [self.top, self.right, self.bottom, self.left]
      .into_iter()
      .flatten()
      .any(|c| c.is_visible())
  }
}

/// The complete resolved style of one element
#[derive(Debug, Clone, Default)]
pub struct ElementStyle {
  /// Flat fill of the body, painted first on the background layer
  pub background: Option<Rgba>,
  /// Flat fill of the exterior (margin band)
  pub foundation: Option<Rgba>,
  pub border_colors: BorderColors,
  pub background_layer: LayerContent,
  pub content_layer: LayerContent,
  pub border_layer: LayerContent,
  pub foreground_layer: LayerContent,
}

impl ElementStyle {
  pub fn layer(&self, layer: UiLayer) -> &LayerContent {
    match layer {
      UiLayer::Background => &self.background_layer,
      UiLayer::Content => &self.content_layer,
      UiLayer::Border => &self.border_layer,
      UiLayer::Foreground => &self.foreground_layer,
    }
  }

  pub fn layer_mut(&mut self, layer: UiLayer) -> &mut LayerContent {
    match layer {
      UiLayer::Background => &mut self.background_layer,
      UiLayer::Content => &mut self.content_layer,
      UiLayer::Border => &mut self.border_layer,
      UiLayer::Foreground => &mut self.foreground_layer,
    }
  }

  /// True when any layer has a user painter
  pub fn has_painters(&self) -> bool {
    UiLayer::ALL.iter().any(|&l| self.layer(l).has_painters())
  }

  /// Checks all numeric ranges, failing on the first bad spec
  pub fn validate(&self) -> Result<(), ConfigError> {
    for &layer in &UiLayer::ALL {
      self.layer(layer).validate()?;
    }
    Ok(())
  }

  /// Scales every length in the style by a uniform factor
  pub fn scale(&self, factor: f32) -> Self {
    let mut scaled = self.clone();
    for &layer in &UiLayer::ALL {
      scaled.layer_mut(layer).scale(factor);
    }
    scaled
  }
}

fn validate_fractions(fractions: &[f32]) -> Result<(), String> {
  for pair in fractions.windows(2) {
    if pair[1] < pair[0] {
      return Err(format!("has decreasing stop fractions {} > {}", pair[0], pair[1]));
    }
  }
  for &f in fractions {
    if !f.is_finite() || !(0.0..=1.0).contains(&f) {
      return Err(format!("has stop fraction {f} outside [0, 1]"));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validate_accepts_default_style() {
    assert!(ElementStyle::default().validate().is_ok());
  }

  #[test]
  fn test_validate_rejects_empty_gradient_colors() {
    let mut style = ElementStyle::default();
    style
      .background_layer
      .gradients
      .insert("g".to_string(), GradientSpec::default());
    let err = style.validate().unwrap_err();
    assert!(err.to_string().contains("no colors"));
  }

  #[test]
  fn test_validate_rejects_decreasing_fractions() {
    let mut style = ElementStyle::default();
    let spec = GradientSpec {
      colors: vec![Rgba::RED, Rgba::BLUE, Rgba::GREEN],
      fractions: vec![0.0, 0.8, 0.3],
      ..GradientSpec::default()
    };
    style.background_layer.gradients.insert("g".to_string(), spec);
    assert!(style.validate().is_err());
  }

  #[test]
  fn test_validate_rejects_out_of_range_opacity() {
    let mut style = ElementStyle::default();
    let spec = ImageSpec { opacity: 1.5, ..ImageSpec::default() };
    style.content_layer.images.insert("i".to_string(), spec);
    let err = style.validate().unwrap_err();
    assert!(err.to_string().contains("opacity"));
  }

  #[test]
  fn test_validate_rejects_zero_font_size() {
    let mut style = ElementStyle::default();
    let spec = TextSpec {
      content: "hi".to_string(),
      font: FontSpec { size: 0.0, ..FontSpec::default() },
      ..TextSpec::default()
    };
    style.foreground_layer.texts.insert("t".to_string(), spec);
    assert!(style.validate().is_err());
  }

  #[test]
  fn test_layer_lookup_matches_field() {
    let mut style = ElementStyle::default();
    style.border_layer.shadows.insert("s".to_string(), ShadowSpec::default());
    assert_eq!(style.layer(UiLayer::Border).shadows.len(), 1);
    assert!(style.layer(UiLayer::Background).shadows.is_empty());
  }

  #[test]
  fn test_named_effects_iterate_sorted() {
    let mut content = LayerContent::default();
    for name in ["zebra", "alpha", "mid"] {
      content.gradients.insert(name.to_string(), GradientSpec::vertical(vec![Rgba::RED]));
    }
    let names: Vec<&str> = content.gradients.keys().map(String::as_str).collect();
    assert_eq!(names, ["alpha", "mid", "zebra"]);
  }

  #[test]
  fn test_scale_stretches_lengths() {
    let mut style = ElementStyle::default();
    let shadow = ShadowSpec { offset: Point::new(2.0, 3.0), blur: 4.0, spread: 1.0, ..ShadowSpec::default() };
    style.background_layer.shadows.insert("s".to_string(), shadow);
    let scaled = style.scale(2.0);
    let shadow = &scaled.background_layer.shadows["s"];
    assert_eq!(shadow.offset, Point::new(4.0, 6.0));
    assert_eq!(shadow.blur, 8.0);
    assert_eq!(shadow.spread, 2.0);
  }

  #[test]
  fn test_border_colors_uniformity() {
    let uniform = BorderColors::uniform(Rgba::RED);
    assert!(uniform.is_uniform());
    assert!(uniform.any_visible());
    let mixed = BorderColors { top: Some(Rgba::BLUE), ..uniform };
    assert!(!mixed.is_uniform());
    assert!(!BorderColors::default().any_visible());
  }

  #[test]
  fn test_painter_closures_qualify() {
    let mut content = LayerContent::default();
    content
      .painters
      .insert("p".to_string(), PainterSpec::new(|_: &mut Canvas| {}));
    assert!(content.has_painters());
    assert!(!content.is_empty());
    assert_eq!(content.painters["p"].clip, ComponentArea::Interior);
  }
}
