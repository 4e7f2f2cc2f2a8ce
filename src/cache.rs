//! Raster caching of rendered layers.
//!
//! A layer whose style is expensive to draw and whose raster is small
//! enough to be worth the memory gets rendered once into an offscreen
//! buffer and blitted from there until its render state changes. The
//! render state is captured as a [`LayerFingerprint`]: a canonical byte
//! encoding of everything that can reach the layer's pixels. Buffers
//! live in a process-wide table keyed by fingerprint, so any number of
//! elements sharing a style share one buffer.
//!
//! The table holds its buffers weakly. Whoever renders from a buffer
//! keeps a strong handle for as long as the raster is wanted; once the
//! last handle drops, the table entry is dead and gets pruned on the
//! next access. A hard cap on live entries stops new insertions rather
//! than evicting, since eviction is the weak handles' job.
//!
//! All of this is an optimization only. Every decision in here may
//! come out as "do not cache" and rendering still works, just without
//! reuse.

use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;
use tiny_skia::Pixmap;

use crate::boxmodel::{BoxModel, UiLayer};
use crate::style::color::Rgba;
use crate::style::{
  BorderColors, ElementStyle, GradientSpec, ImageSpec, LayerContent, NoiseSpec, PainterSpec,
  ShadowSpec, TextSpec,
};

// One weight unit of heavy style buys this many cacheable pixels.
const PIXELS_PER_HEAVY_UNIT: f32 = 256.0 * 256.0;
// Weight units past this stop buying additional pixels.
const MAX_WEIGHTED_UNITS: u32 = 5;
// New table entries stop once this many fingerprints are live.
const MAX_LIVE_FINGERPRINTS: usize = 128;

/// Whether rendering `layer` of `style` through a buffer pays off.
///
/// Never caches empty elements (nothing to store), layers with user
/// painters (arbitrary side effects must re-run every pass) or layers
/// without any heavy style (a blit would cost as much as the redraw).
/// Everything else caches while the raster stays under a budget that
/// grows with the weighted heavy-style count.
pub fn should_cache(layer: UiLayer, style: &ElementStyle, model: &BoxModel) -> bool {
  if model.size.is_empty() {
    return false;
  }
  if !style.layer(layer).painters.is_empty() {
    return false;
  }
  let heavy = heavy_style_count(layer, style, model);
  if heavy < 1 {
    return false;
  }
  let budget = PIXELS_PER_HEAVY_UNIT * heavy.min(MAX_WEIGHTED_UNITS) as f32;
  model.size.area() <= budget
}

/// Counts the style features that make a layer expensive to redraw.
///
/// Noise fields weigh double; everything else weighs one. Border and
/// background base fills only count when they actually cost something:
/// a border needs both widths and a visible color, and the two base
/// background fills only matter once a margin splits the element into
/// separate exterior and body contours. A merely rounded background is
/// still a single cheap fill and stays uncounted.
pub(crate) fn heavy_style_count(layer: UiLayer, style: &ElementStyle, model: &BoxModel) -> u32 {
  let content = style.layer(layer);
  let mut count = 0u32;
  count += content.images.values().filter(|s| s.image.is_some()).count() as u32;
  count += content.gradients.values().filter(|s| !s.colors.is_empty()).count() as u32;
  count += 2 * content.noises.values().filter(|s| !s.colors.is_empty()).count() as u32;
  count += content.texts.values().filter(|s| !s.content.is_empty()).count() as u32;
  count += content.shadows.values().filter(|s| s.color.is_visible()).count() as u32;

  match layer {
    UiLayer::Border => {
      if model.has_border() && style.border_colors.any_visible() {
        count += 1;
      }
    }
    UiLayer::Background => {
      if !model.margin.is_zero() {
        if style.background.is_some_and(|c| c.is_visible()) {
          count += 1;
        }
        if style.foundation.is_some_and(|c| c.is_visible()) {
          count += 1;
        }
      }
    }
    UiLayer::Content | UiLayer::Foreground => {}
  }
  count
}

/// Layer-scoped render state in canonical byte form.
///
/// Two fingerprints compare equal iff every input that can reach the
/// layer's pixels is bit-identical: the box model, the base colors
/// bound to the layer and the layer's own content. The layer tag
/// itself is not part of the encoding, so two layers carrying the same
/// state (in practice: content and foreground) produce the same
/// fingerprint and share a buffer. Image pixmaps and painters encode
/// by identity, not by contents.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LayerFingerprint {
  bytes: Vec<u8>,
}

impl LayerFingerprint {
  /// Captures the state that renders `layer` of `style` at `model`.
  ///
  /// Base colors fold in only on the layer that paints them:
  /// foundation and background on the background layer, edge colors on
  /// the border layer.
  pub fn capture(style: &ElementStyle, model: &BoxModel, layer: UiLayer) -> Self {
    let mut w = FingerprintWriter::default();
    w.box_model(model);
    let (background, foundation) = match layer {
      UiLayer::Background => (style.background, style.foundation),
      _ => (None, None),
    };
    w.opt_color(background);
    w.opt_color(foundation);
    let border_colors = match layer {
      UiLayer::Border => style.border_colors,
      _ => BorderColors::default(),
    };
    w.opt_color(border_colors.top);
    w.opt_color(border_colors.right);
    w.opt_color(border_colors.bottom);
    w.opt_color(border_colors.left);
    w.layer_content(style.layer(layer));
    Self { bytes: w.bytes }
  }
}

impl std::fmt::Debug for LayerFingerprint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "LayerFingerprint({} bytes)", self.bytes.len())
  }
}

/// Serializes style state into an unambiguous byte stream.
///
/// Every variable-length section is preceded by its length and every
/// optional field by a presence tag, so no two distinct states share
/// an encoding. Floats encode as their exact bit pattern, which makes
/// the derived equality reflexive even for NaN inputs.
#[derive(Default)]
struct FingerprintWriter {
  bytes: Vec<u8>,
}

impl FingerprintWriter {
  fn u8(&mut self, v: u8) {
    self.bytes.push(v);
  }

  fn u32(&mut self, v: u32) {
    self.bytes.extend_from_slice(&v.to_le_bytes());
  }

  fn f32(&mut self, v: f32) {
    self.u32(v.to_bits());
  }

  fn ptr(&mut self, addr: usize) {
    self.bytes.extend_from_slice(&(addr as u64).to_le_bytes());
  }

  fn str(&mut self, s: &str) {
    self.u32(s.len() as u32);
    self.bytes.extend_from_slice(s.as_bytes());
  }

  fn color(&mut self, c: Rgba) {
    self.u8(c.r);
    self.u8(c.g);
    self.u8(c.b);
    self.f32(c.a);
  }

  fn opt_color(&mut self, c: Option<Rgba>) {
    match c {
      Some(c) => {
        self.u8(1);
        self.color(c);
      }
      None => self.u8(0),
    }
  }

  fn opt_f32(&mut self, v: Option<f32>) {
    match v {
      Some(v) => {
        self.u8(1);
        self.f32(v);
      }
      None => self.u8(0),
    }
  }

  fn point(&mut self, p: crate::geometry::Point) {
    self.f32(p.x);
    self.f32(p.y);
  }

  fn size(&mut self, s: crate::geometry::Size) {
    self.f32(s.width);
    self.f32(s.height);
  }

  fn edges(&mut self, e: crate::geometry::EdgeOffsets) {
    self.f32(e.top);
    self.f32(e.right);
    self.f32(e.bottom);
    self.f32(e.left);
  }

  fn colors(&mut self, colors: &[Rgba]) {
    self.u32(colors.len() as u32);
    for &c in colors {
      self.color(c);
    }
  }

  fn fractions(&mut self, fractions: &[f32]) {
    self.u32(fractions.len() as u32);
    for &f in fractions {
      self.f32(f);
    }
  }

  fn box_model(&mut self, model: &BoxModel) {
    self.size(model.size);
    self.edges(model.margin);
    self.edges(model.border_widths);
    self.edges(model.padding);
    for corner in [
      model.radii.top_left,
      model.radii.top_right,
      model.radii.bottom_right,
      model.radii.bottom_left,
    ] {
      self.f32(corner.width);
      self.f32(corner.height);
    }
  }

  fn layer_content(&mut self, content: &LayerContent) {
    self.u32(content.images.len() as u32);
    for (name, spec) in &content.images {
      self.str(name);
      self.image(spec);
    }
    self.u32(content.gradients.len() as u32);
    for (name, spec) in &content.gradients {
      self.str(name);
      self.gradient(spec);
    }
    self.u32(content.noises.len() as u32);
    for (name, spec) in &content.noises {
      self.str(name);
      self.noise(spec);
    }
    self.u32(content.shadows.len() as u32);
    for (name, spec) in &content.shadows {
      self.str(name);
      self.shadow(spec);
    }
    self.u32(content.texts.len() as u32);
    for (name, spec) in &content.texts {
      self.str(name);
      self.text(spec);
    }
    self.u32(content.painters.len() as u32);
    for (name, spec) in &content.painters {
      self.str(name);
      self.painter(spec);
    }
  }

  fn image(&mut self, spec: &ImageSpec) {
    self.opt_color(spec.primer);
    match &spec.image {
      // The pixmap is immutable behind its Arc; the address is its identity.
      Some(image) => {
        self.u8(1);
        self.ptr(Arc::as_ptr(image) as usize);
      }
      None => self.u8(0),
    }
    self.u8(spec.scalable as u8);
    self.u8(spec.placement as u8);
    self.u8(spec.boundary as u8);
    self.u8(spec.repeat as u8);
    self.u8(spec.fit as u8);
    self.opt_f32(spec.width);
    self.opt_f32(spec.height);
    self.f32(spec.opacity);
    self.edges(spec.padding);
    self.point(spec.offset);
    self.u8(spec.clip as u8);
  }

  fn gradient(&mut self, spec: &GradientSpec) {
    self.colors(&spec.colors);
    self.fractions(&spec.fractions);
    self.u8(spec.kind as u8);
    self.u8(spec.span as u8);
    self.u8(spec.cycle as u8);
    self.u8(spec.boundary as u8);
    self.u8(spec.area as u8);
    self.opt_f32(spec.size);
    self.f32(spec.rotation);
    self.point(spec.focus);
    self.point(spec.offset);
  }

  fn noise(&mut self, spec: &NoiseSpec) {
    self.u8(spec.kind as u8);
    self.colors(&spec.colors);
    self.fractions(&spec.fractions);
    self.point(spec.offset);
    self.size(spec.scale);
    self.u8(spec.area as u8);
    self.u8(spec.boundary as u8);
    self.f32(spec.rotation);
  }

  fn shadow(&mut self, spec: &ShadowSpec) {
    self.point(spec.offset);
    self.f32(spec.blur);
    self.f32(spec.spread);
    self.color(spec.color);
    self.u8(spec.outset as u8);
  }

  fn text(&mut self, spec: &TextSpec) {
    self.str(&spec.content);
    self.str(&spec.font.family);
    self.f32(spec.font.size);
    self.f32(spec.font.letter_spacing);
    self.color(spec.color);
    self.opt_color(spec.background);
    self.u8(spec.placement as u8);
    self.u8(spec.boundary as u8);
    self.point(spec.offset);
    self.u8(spec.clip as u8);
  }

  fn painter(&mut self, spec: &PainterSpec) {
    self.ptr(Arc::as_ptr(&spec.painter) as *const () as usize);
    self.u8(spec.clip as u8);
  }
}

/// One rendered layer raster, shared by every user whose fingerprint
/// matches. Immutable once built.
pub struct LayerBuffer {
  pixmap: Pixmap,
}

impl LayerBuffer {
  pub fn new(pixmap: Pixmap) -> Self {
    Self { pixmap }
  }

  pub fn pixmap(&self) -> &Pixmap {
    &self.pixmap
  }
}

/// Counters describing how the table has been doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterCacheStats {
  pub hits: u64,
  pub misses: u64,
  pub live: usize,
}

/// The process-wide fingerprint to buffer table.
///
/// Entries hold their buffer weakly; a lookup that finds a dead handle
/// removes the entry on the spot and inserts sweep everything dead
/// first. Single-threaded by contract, like the rest of the pipeline.
pub struct RasterCache {
  table: FxHashMap<LayerFingerprint, Weak<LayerBuffer>>,
  max_live: usize,
  hits: u64,
  misses: u64,
}

impl Default for RasterCache {
  fn default() -> Self {
    Self::new()
  }
}

impl RasterCache {
  pub fn new() -> Self {
    Self::with_capacity(MAX_LIVE_FINGERPRINTS)
  }

  pub fn with_capacity(max_live: usize) -> Self {
    Self { table: FxHashMap::default(), max_live, hits: 0, misses: 0 }
  }

  /// Looks up the buffer for a fingerprint, pruning the entry if its
  /// buffer is already gone.
  pub fn get(&mut self, fingerprint: &LayerFingerprint) -> Option<Arc<LayerBuffer>> {
    match self.table.get(fingerprint).map(Weak::upgrade) {
      Some(Some(buffer)) => {
        self.hits += 1;
        Some(buffer)
      }
      Some(None) => {
        self.table.remove(fingerprint);
        self.misses += 1;
        None
      }
      None => {
        self.misses += 1;
        None
      }
    }
  }

  /// Offers a freshly rendered buffer for sharing.
  ///
  /// Returns false when the table is at its live-entry cap; the caller
  /// keeps its own handle either way, the buffer just stays private.
  pub fn insert(&mut self, fingerprint: LayerFingerprint, buffer: &Arc<LayerBuffer>) -> bool {
    self.table.retain(|_, handle| handle.strong_count() > 0);
    if self.table.len() > self.max_live {
      log::debug!("raster cache at capacity ({} live), not sharing new buffer", self.table.len());
      return false;
    }
    self.table.insert(fingerprint, Arc::downgrade(buffer));
    true
  }

  /// Live entries, counting only buffers still alive.
  pub fn live_len(&self) -> usize {
    self.table.values().filter(|h| h.strong_count() > 0).count()
  }

  pub fn snapshot(&self) -> RasterCacheStats {
    RasterCacheStats { hits: self.hits, misses: self.misses, live: self.live_len() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::boxmodel::Placement;
  use crate::geometry::{BorderRadii, BorderRadius, EdgeOffsets, Size};
  use crate::paint::canvas::Canvas;
  use crate::style::FontSpec;

  fn model(width: f32, height: f32) -> BoxModel {
    BoxModel::plain(Size::new(width, height))
  }

  fn rounded_model(width: f32, height: f32) -> BoxModel {
    BoxModel::new(
      Size::new(width, height),
      EdgeOffsets::ZERO,
      EdgeOffsets::all(2.0),
      EdgeOffsets::ZERO,
      BorderRadii::uniform(BorderRadius::circular(8.0)),
    )
  }

  fn gradient(colors: Vec<Rgba>) -> GradientSpec {
    GradientSpec { colors, ..GradientSpec::default() }
  }

  fn shadow(color: Rgba) -> ShadowSpec {
    ShadowSpec { color, blur: 10.0, outset: true, ..ShadowSpec::default() }
  }

  fn text(content: &str) -> TextSpec {
    TextSpec {
      content: content.to_string(),
      font: FontSpec { family: "sans".into(), size: 12.0, letter_spacing: 0.0 },
      ..TextSpec::default()
    }
  }

  fn blank_pixmap(width: u32, height: u32) -> Arc<Pixmap> {
    let canvas = Canvas::new(width, height).unwrap();
    Arc::new(canvas.into_pixmap())
  }

  #[test]
  fn test_heavy_count_weighs_noise_double() {
    let mut style = ElementStyle::default();
    let layer = style.layer_mut(UiLayer::Content);
    layer.gradients.insert("g".into(), gradient(vec![Rgba::RED, Rgba::BLUE]));
    layer.noises.insert(
      "n".into(),
      NoiseSpec { colors: vec![Rgba::RED, Rgba::BLUE], ..NoiseSpec::default() },
    );
    layer.shadows.insert("s".into(), shadow(Rgba::BLACK));
    layer.texts.insert("t".into(), text("hi"));

    let count = heavy_style_count(UiLayer::Content, &style, &model(50.0, 50.0));
    assert_eq!(count, 1 + 2 + 1 + 1);
  }

  #[test]
  fn test_heavy_count_skips_inert_specs() {
    let mut style = ElementStyle::default();
    let layer = style.layer_mut(UiLayer::Content);
    layer.gradients.insert("empty".into(), gradient(Vec::new()));
    layer.shadows.insert("invisible".into(), shadow(Rgba::new(0, 0, 0, 0.0)));
    layer.texts.insert("blank".into(), text(""));
    layer
      .images
      .insert("primer-only".into(), ImageSpec { primer: Some(Rgba::RED), ..ImageSpec::default() });

    assert_eq!(heavy_style_count(UiLayer::Content, &style, &model(50.0, 50.0)), 0);
  }

  #[test]
  fn test_heavy_count_border_needs_width_and_color() {
    let style = ElementStyle {
      border_colors: BorderColors::uniform(Rgba::RED),
      ..ElementStyle::default()
    };
    assert_eq!(heavy_style_count(UiLayer::Border, &style, &rounded_model(50.0, 50.0)), 1);
    assert_eq!(heavy_style_count(UiLayer::Border, &style, &model(50.0, 50.0)), 0);
    let colorless = ElementStyle::default();
    assert_eq!(heavy_style_count(UiLayer::Border, &colorless, &rounded_model(50.0, 50.0)), 0);
  }

  #[test]
  fn test_heavy_count_background_needs_a_margin() {
    let style = ElementStyle {
      background: Some(Rgba::RED),
      foundation: Some(Rgba::BLUE),
      ..ElementStyle::default()
    };
    // Without a margin the base fills are single contours and stay cheap,
    // rounded or not.
    assert_eq!(heavy_style_count(UiLayer::Background, &style, &model(50.0, 50.0)), 0);
    assert_eq!(heavy_style_count(UiLayer::Background, &style, &rounded_model(50.0, 50.0)), 0);

    let margin = BoxModel::new(
      Size::new(50.0, 50.0),
      EdgeOffsets::all(5.0),
      EdgeOffsets::ZERO,
      EdgeOffsets::ZERO,
      BorderRadii::ZERO,
    );
    assert_eq!(heavy_style_count(UiLayer::Background, &style, &margin), 2);
  }

  #[test]
  fn test_should_cache_refuses_painters_and_light_layers() {
    let margined = BoxModel::new(
      Size::new(100.0, 100.0),
      EdgeOffsets::all(4.0),
      EdgeOffsets::ZERO,
      EdgeOffsets::ZERO,
      BorderRadii::ZERO,
    );
    let mut style = ElementStyle {
      background: Some(Rgba::RED),
      ..ElementStyle::default()
    };
    assert!(should_cache(UiLayer::Background, &style, &margined));

    style
      .layer_mut(UiLayer::Background)
      .painters
      .insert("p".into(), PainterSpec::new(|_: &mut Canvas| {}));
    assert!(!should_cache(UiLayer::Background, &style, &margined));

    let light = ElementStyle { background: Some(Rgba::RED), ..ElementStyle::default() };
    assert!(!should_cache(UiLayer::Background, &light, &model(100.0, 100.0)));
    assert!(!should_cache(UiLayer::Background, &light, &rounded_model(0.0, 0.0)));
  }

  #[test]
  fn test_should_cache_budget_scales_with_weight() {
    let mut light = ElementStyle::default();
    light
      .layer_mut(UiLayer::Content)
      .gradients
      .insert("g".into(), gradient(vec![Rgba::RED, Rgba::BLUE]));
    // One unit buys 256x256 pixels and no more.
    assert!(should_cache(UiLayer::Content, &light, &model(256.0, 256.0)));
    assert!(!should_cache(UiLayer::Content, &light, &model(300.0, 300.0)));

    let mut heavy = light.clone();
    let layer = heavy.layer_mut(UiLayer::Content);
    layer.noises.insert(
      "n".into(),
      NoiseSpec { colors: vec![Rgba::RED, Rgba::BLUE], ..NoiseSpec::default() },
    );
    layer.shadows.insert("s".into(), shadow(Rgba::BLACK));
    layer.shadows.insert("s2".into(), shadow(Rgba::RED));
    // Five units buy five times the area; past five the budget stops growing.
    assert_eq!(heavy_style_count(UiLayer::Content, &heavy, &model(500.0, 500.0)), 5);
    assert!(should_cache(UiLayer::Content, &heavy, &model(500.0, 500.0)));
    assert!(!should_cache(UiLayer::Content, &heavy, &model(600.0, 600.0)));
  }

  #[test]
  fn test_fingerprint_reflects_style_changes() {
    let style = ElementStyle { background: Some(Rgba::RED), ..ElementStyle::default() };
    let m = rounded_model(40.0, 40.0);
    let a = LayerFingerprint::capture(&style, &m, UiLayer::Background);
    let b = LayerFingerprint::capture(&style, &m, UiLayer::Background);
    assert_eq!(a, b);

    let recolored = ElementStyle { background: Some(Rgba::BLUE), ..ElementStyle::default() };
    assert_ne!(a, LayerFingerprint::capture(&recolored, &m, UiLayer::Background));

    let regrown = rounded_model(41.0, 40.0);
    assert_ne!(a, LayerFingerprint::capture(&style, &regrown, UiLayer::Background));
  }

  #[test]
  fn test_fingerprint_is_layer_scoped() {
    let red = ElementStyle { background: Some(Rgba::RED), ..ElementStyle::default() };
    let blue = ElementStyle { background: Some(Rgba::BLUE), ..ElementStyle::default() };
    let m = model(40.0, 40.0);

    // The background color is invisible to the content layer.
    assert_eq!(
      LayerFingerprint::capture(&red, &m, UiLayer::Content),
      LayerFingerprint::capture(&blue, &m, UiLayer::Content),
    );
    assert_ne!(
      LayerFingerprint::capture(&red, &m, UiLayer::Background),
      LayerFingerprint::capture(&blue, &m, UiLayer::Background),
    );
  }

  #[test]
  fn test_content_and_foreground_share_fingerprints() {
    let mut style = ElementStyle::default();
    let spec = gradient(vec![Rgba::RED, Rgba::BLUE]);
    style.layer_mut(UiLayer::Content).gradients.insert("g".into(), spec.clone());
    style.layer_mut(UiLayer::Foreground).gradients.insert("g".into(), spec);
    let m = model(40.0, 40.0);

    assert_eq!(
      LayerFingerprint::capture(&style, &m, UiLayer::Content),
      LayerFingerprint::capture(&style, &m, UiLayer::Foreground),
    );
  }

  #[test]
  fn test_fingerprint_tracks_image_identity_not_pixels() {
    let m = model(40.0, 40.0);
    let first = blank_pixmap(4, 4);
    let twin = blank_pixmap(4, 4);

    let style_with = |image: &Arc<Pixmap>| {
      let mut style = ElementStyle::default();
      style.layer_mut(UiLayer::Content).images.insert(
        "i".into(),
        ImageSpec { image: Some(image.clone()), ..ImageSpec::default() },
      );
      style
    };

    let a = LayerFingerprint::capture(&style_with(&first), &m, UiLayer::Content);
    let same = LayerFingerprint::capture(&style_with(&first), &m, UiLayer::Content);
    let other = LayerFingerprint::capture(&style_with(&twin), &m, UiLayer::Content);
    assert_eq!(a, same);
    assert_ne!(a, other);
  }

  #[test]
  fn test_fingerprint_separates_placement_from_offset() {
    // Tagged encodings must not let one field bleed into the next.
    let m = model(40.0, 40.0);
    let base = TextSpec {
      content: "x".into(),
      font: FontSpec { family: "sans".into(), size: 12.0, letter_spacing: 0.0 },
      ..TextSpec::default()
    };
    let style_with = |spec: TextSpec| {
      let mut style = ElementStyle::default();
      style.layer_mut(UiLayer::Content).texts.insert("t".into(), spec);
      style
    };

    let moved = TextSpec {
      placement: Placement::BottomRight,
      ..base.clone()
    };
    assert_ne!(
      LayerFingerprint::capture(&style_with(base), &m, UiLayer::Content),
      LayerFingerprint::capture(&style_with(moved), &m, UiLayer::Content),
    );
  }

  #[test]
  fn test_table_lookup_and_weak_eviction() {
    let mut cache = RasterCache::new();
    let style = ElementStyle { background: Some(Rgba::RED), ..ElementStyle::default() };
    let fp = LayerFingerprint::capture(&style, &model(8.0, 8.0), UiLayer::Background);

    assert!(cache.get(&fp).is_none());

    let buffer = Arc::new(LayerBuffer::new(Pixmap::new(8, 8).unwrap()));
    assert!(cache.insert(fp.clone(), &buffer));
    assert!(cache.get(&fp).is_some());
    assert_eq!(cache.live_len(), 1);

    drop(buffer);
    assert!(cache.get(&fp).is_none());
    assert_eq!(cache.live_len(), 0);

    let stats = cache.snapshot();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
  }

  #[test]
  fn test_table_stops_inserting_at_the_cap() {
    let mut cache = RasterCache::with_capacity(4);
    let mut anchors = Vec::new();
    for i in 0..6 {
      let style = ElementStyle {
        background: Some(Rgba::new(i as u8, 0, 0, 1.0)),
        ..ElementStyle::default()
      };
      let fp = LayerFingerprint::capture(&style, &model(8.0, 8.0), UiLayer::Background);
      let buffer = Arc::new(LayerBuffer::new(Pixmap::new(8, 8).unwrap()));
      let inserted = cache.insert(fp, &buffer);
      anchors.push(buffer);
      // The cap check runs against the table before each insert.
      assert_eq!(inserted, i <= 4, "insert {i}");
    }
    assert_eq!(cache.live_len(), 5);

    // Dropping anchors frees slots for new entries again.
    anchors.clear();
    let style = ElementStyle { foundation: Some(Rgba::GREEN), ..ElementStyle::default() };
    let fp = LayerFingerprint::capture(&style, &model(8.0, 8.0), UiLayer::Background);
    let buffer = Arc::new(LayerBuffer::new(Pixmap::new(8, 8).unwrap()));
    assert!(cache.insert(fp, &buffer));
    assert_eq!(cache.live_len(), 1);
  }
}
