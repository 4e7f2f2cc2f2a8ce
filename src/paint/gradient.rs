//! Gradient paint construction.
//!
//! Turns a [`GradientSpec`] plus a [`BoxModel`] into something a canvas can
//! fill a region with: a flat color, a tiny-skia shader (linear, radial), or
//! a rasterized texture for the conic case tiny-skia has no shader for. Conic
//! rasterization goes through a color LUT so multi-stop interpolation is a
//! table walk per pixel rather than a stop search, and finished textures are
//! kept in a bounded LRU pixmap cache shared with the noise module.

use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use rustc_hash::{FxHashMap, FxHasher};
use tiny_skia::{
  ColorU8, FilterQuality, GradientStop, LinearGradient, Pattern, Pixmap, PremultipliedColorU8,
  RadialGradient, Shader, SpreadMode, Transform,
};

use crate::boxmodel::{Boundary, BoxModel, Cycle, GradientKind, NoiseKind, Span};
use crate::error::RenderError;
use crate::geometry::{EdgeOffsets, Point, Size};
use crate::paint::canvas::Canvas;
use crate::paint::pixmap::new_pixmap;
use crate::regions::Region;
use crate::style::color::Rgba;
use crate::style::GradientSpec;

const DEFAULT_PAINT_PIXMAP_CACHE_ITEMS: usize = 64;
// Rasterized conic and noise textures are full element size. Keep the cache
// modest and bounded via LRU eviction so a burst of unique styles cannot pin
// arbitrary amounts of pixel data.
const DEFAULT_PAINT_PIXMAP_CACHE_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub enum SpreadModeKey {
  Pad,
  Repeat,
  Reflect,
}

impl From<SpreadMode> for SpreadModeKey {
  fn from(value: SpreadMode) -> Self {
    match value {
      SpreadMode::Pad => SpreadModeKey::Pad,
      SpreadMode::Repeat => SpreadModeKey::Repeat,
      SpreadMode::Reflect => SpreadModeKey::Reflect,
    }
  }
}

/// Maps a cycle mode onto the shader spread mode with the same meaning.
pub fn spread_mode(cycle: Cycle) -> SpreadMode {
  match cycle {
    Cycle::None => SpreadMode::Pad,
    Cycle::Repeat => SpreadMode::Repeat,
    Cycle::Reflect => SpreadMode::Reflect,
  }
}

type PaintPixmapHasher = BuildHasherDefault<FxHasher>;

#[derive(Clone, Copy, Debug)]
pub struct PaintPixmapCacheConfig {
  pub max_items: usize,
  pub max_bytes: usize,
}

impl Default for PaintPixmapCacheConfig {
  fn default() -> Self {
    Self {
      max_items: DEFAULT_PAINT_PIXMAP_CACHE_ITEMS,
      max_bytes: DEFAULT_PAINT_PIXMAP_CACHE_BYTES,
    }
  }
}

/// Cache key for a rasterized paint texture. All floating point inputs are
/// keyed by their bit patterns, so two keys are equal only when every input
/// that influences the raster is identical.
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct PaintPixmapKey {
  kind: PaintPixmapKeyKind,
  width: u32,
  height: u32,
  params: Vec<u32>,
  lut_key: GradientCacheKey,
}

#[derive(Clone, Copy, Hash, PartialEq, Eq)]
enum PaintPixmapKeyKind {
  Conic,
  Noise,
}

impl PaintPixmapKey {
  pub fn conic(
    width: u32,
    height: u32,
    center: Point,
    start_angle: f32,
    spread: SpreadMode,
    stops: &[(f32, Rgba)],
    bucket: u16,
  ) -> Option<Self> {
    if width == 0 || height == 0 || stops.is_empty() {
      return None;
    }
    if !center.x.is_finite() || !center.y.is_finite() || !start_angle.is_finite() {
      return None;
    }
    let period = gradient_period(stops);
    // Canonicalize the angle so rotations that differ by a full turn share
    // cache entries.
    let canonical_angle = start_angle.rem_euclid(std::f32::consts::PI * 2.0);
    Some(Self {
      kind: PaintPixmapKeyKind::Conic,
      width,
      height,
      params: vec![
        center.x.to_bits(),
        center.y.to_bits(),
        canonical_angle.to_bits(),
      ],
      lut_key: GradientCacheKey::new(stops, spread, period, bucket),
    })
  }

  pub fn noise(
    width: u32,
    height: u32,
    kind: NoiseKind,
    center: Point,
    scale: Size,
    rotation: f32,
    stops: &[(f32, Rgba)],
    bucket: u16,
  ) -> Option<Self> {
    if width == 0 || height == 0 || stops.is_empty() {
      return None;
    }
    if !center.x.is_finite()
      || !center.y.is_finite()
      || !scale.width.is_finite()
      || !scale.height.is_finite()
      || !rotation.is_finite()
    {
      return None;
    }
    Some(Self {
      kind: PaintPixmapKeyKind::Noise,
      width,
      height,
      params: vec![
        kind as u32,
        center.x.to_bits(),
        center.y.to_bits(),
        scale.width.to_bits(),
        scale.height.to_bits(),
        rotation.to_bits(),
      ],
      lut_key: GradientCacheKey::new(stops, SpreadMode::Pad, gradient_period(stops), bucket),
    })
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PaintPixmapCacheStats {
  pub hits: u64,
  pub misses: u64,
  pub bytes: u64,
  pub items: usize,
}

struct PaintPixmapCacheInner {
  lru: LruCache<PaintPixmapKey, Arc<Pixmap>, PaintPixmapHasher>,
  hits: u64,
  misses: u64,
  bytes: usize,
  config: PaintPixmapCacheConfig,
}

impl PaintPixmapCacheInner {
  fn new(config: PaintPixmapCacheConfig) -> Self {
    Self {
      lru: LruCache::unbounded_with_hasher(PaintPixmapHasher::default()),
      hits: 0,
      misses: 0,
      bytes: 0,
      config,
    }
  }

  fn evict(&mut self) {
    while (self.config.max_items > 0 && self.lru.len() > self.config.max_items)
      || (self.config.max_bytes > 0 && self.bytes > self.config.max_bytes)
    {
      if let Some((_key, value)) = self.lru.pop_lru() {
        self.bytes = self.bytes.saturating_sub(value.data().len());
      } else {
        break;
      }
    }
  }

  fn reset(&mut self) {
    self.lru.clear();
    self.hits = 0;
    self.misses = 0;
    self.bytes = 0;
  }

  fn stats(&self) -> PaintPixmapCacheStats {
    PaintPixmapCacheStats {
      hits: self.hits,
      misses: self.misses,
      bytes: self.bytes as u64,
      items: self.lru.len(),
    }
  }
}

/// Bounded LRU cache of rasterized paint textures (conic gradients, noise
/// fields), shared by every element a render engine paints.
#[derive(Clone)]
pub struct PaintPixmapCache {
  inner: Arc<Mutex<PaintPixmapCacheInner>>,
}

impl Default for PaintPixmapCache {
  fn default() -> Self {
    Self::new(PaintPixmapCacheConfig::default())
  }
}

impl PaintPixmapCache {
  pub fn new(config: PaintPixmapCacheConfig) -> Self {
    Self {
      inner: Arc::new(Mutex::new(PaintPixmapCacheInner::new(config))),
    }
  }

  pub fn snapshot(&self) -> PaintPixmapCacheStats {
    let guard = self
      .inner
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.stats()
  }

  pub fn get_or_insert<F>(
    &self,
    key: PaintPixmapKey,
    build: F,
  ) -> Result<Option<Arc<Pixmap>>, RenderError>
  where
    F: FnOnce() -> Result<Option<Pixmap>, RenderError>,
  {
    // Fast path: caching disabled.
    {
      let guard = self
        .inner
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
      if guard.config.max_items == 0 {
        drop(guard);
        return Ok(build()?.map(Arc::new));
      }
    }

    {
      let mut guard = match self.inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
          let mut guard = poisoned.into_inner();
          // The cache is a performance optimization. If a panic happened
          // while the lock was held, partially inserted state may remain, so
          // drop everything and rebuild on demand.
          guard.reset();
          guard
        }
      };
      if let Some(found) = guard.lru.get(&key).cloned() {
        guard.hits = guard.hits.saturating_add(1);
        return Ok(Some(found));
      }
      guard.misses = guard.misses.saturating_add(1);
    }

    let Some(pixmap) = build()? else {
      return Ok(None);
    };
    let weight = pixmap.data().len();

    let arc = Arc::new(pixmap);

    let mut guard = match self.inner.lock() {
      Ok(guard) => guard,
      Err(poisoned) => {
        let mut guard = poisoned.into_inner();
        guard.reset();
        guard
      }
    };

    // Another thread may have inserted while we were rasterizing.
    if let Some(found) = guard.lru.get(&key).cloned() {
      guard.hits = guard.hits.saturating_add(1);
      return Ok(Some(found));
    }

    if guard.config.max_bytes > 0 && weight > guard.config.max_bytes {
      return Ok(Some(arc));
    }

    if let Some(existing) = guard.lru.peek(&key) {
      guard.bytes = guard.bytes.saturating_sub(existing.data().len());
    }
    guard.bytes = guard.bytes.saturating_add(weight);
    guard.lru.put(key, arc.clone());
    guard.evict();
    Ok(Some(arc))
  }
}

#[derive(Clone, Hash, PartialEq, Eq)]
struct GradientStopKey {
  pos_bits: u32,
  r: u8,
  g: u8,
  b: u8,
  a_bits: u32,
}

#[derive(Clone, Hash, PartialEq, Eq)]
pub struct GradientCacheKey {
  stops: Vec<GradientStopKey>,
  spread: SpreadModeKey,
  period_bits: u32,
  bucket: u16,
}

impl GradientCacheKey {
  pub fn new(stops: &[(f32, Rgba)], spread: SpreadMode, period: f32, bucket: u16) -> Self {
    Self {
      stops: stops
        .iter()
        .map(|(pos, color)| GradientStopKey {
          pos_bits: pos.to_bits(),
          r: color.r,
          g: color.g,
          b: color.b,
          a_bits: color.a.to_bits(),
        })
        .collect(),
      spread: spread.into(),
      period_bits: period.to_bits(),
      bucket,
    }
  }
}

/// Premultiplied color lookup table over `[0, period]`, sampled per pixel by
/// the conic rasterizer and the noise color mapping.
#[derive(Clone)]
pub struct GradientLut {
  colors: Arc<Vec<PremultipliedColorU8>>,
  spread: SpreadModeKey,
  period: f32,
  scale: f32,
  last_idx: usize,
  first: PremultipliedColorU8,
  last: PremultipliedColorU8,
}

impl GradientLut {
  #[inline(always)]
  fn sample_mapped(&self, t: f32) -> PremultipliedColorU8 {
    debug_assert!(t.is_finite());
    debug_assert!(t >= 0.0);
    if self.last_idx == 0 {
      return self.first;
    }

    let scaled = t * self.scale;
    let idx = scaled as usize;
    if idx >= self.last_idx {
      return self.last;
    }
    // Fast path: exact hit on a LUT entry.
    let frac = scaled - idx as f32;
    if frac <= 0.0 {
      // SAFETY: idx < last_idx implies idx is within the LUT.
      return unsafe { *self.colors.get_unchecked(idx) };
    }
    // SAFETY: idx < last_idx implies idx+1 is within the LUT.
    let c0 = unsafe { *self.colors.get_unchecked(idx) };
    let c1 = unsafe { *self.colors.get_unchecked(idx + 1) };
    blend_premul(c0, c1, frac)
  }

  #[inline(always)]
  fn sample_pad(&self, t: f32) -> PremultipliedColorU8 {
    if self.last_idx == 0 || !t.is_finite() {
      return self.first;
    }
    if t <= 0.0 {
      return self.first;
    }
    if t >= self.period {
      return self.last;
    }
    self.sample_mapped(t)
  }

  #[inline(always)]
  fn sample_repeat(&self, mut t: f32) -> PremultipliedColorU8 {
    if self.last_idx == 0 || !t.is_finite() {
      return self.first;
    }
    let p = self.period;
    if p <= 0.0 {
      return self.first;
    }
    t = t % p;
    if t < 0.0 {
      t += p;
    }
    self.sample_mapped(t)
  }

  #[inline(always)]
  fn sample_reflect(&self, mut t: f32) -> PremultipliedColorU8 {
    if self.last_idx == 0 || !t.is_finite() {
      return self.first;
    }
    let p = self.period;
    if p <= 0.0 {
      return self.first;
    }
    let two_p = p * 2.0;
    t = t % two_p;
    if t < 0.0 {
      t += two_p;
    }
    if t > p {
      t = two_p - t;
    }
    self.sample_mapped(t)
  }

  #[inline(always)]
  pub(crate) fn sample(&self, t: f32) -> PremultipliedColorU8 {
    match self.spread {
      SpreadModeKey::Pad => self.sample_pad(t),
      SpreadModeKey::Repeat => self.sample_repeat(t),
      SpreadModeKey::Reflect => self.sample_reflect(t),
    }
  }
}

/// Cache of [`GradientLut`]s keyed by the exact stop list. LUT construction
/// walks every stop segment, so repeated paints with the same stops reuse
/// the table.
#[derive(Clone, Default)]
pub struct GradientLutCache {
  inner: Arc<Mutex<FxHashMap<GradientCacheKey, Arc<GradientLut>>>>,
}

impl GradientLutCache {
  pub fn get_or_build<F>(&self, key: GradientCacheKey, build: F) -> Arc<GradientLut>
  where
    F: FnOnce() -> GradientLut,
  {
    let mut guard = match self.inner.lock() {
      Ok(guard) => guard,
      Err(poisoned) => {
        let mut guard = poisoned.into_inner();
        // Same recovery as the pixmap cache: a panic under the lock may have
        // left partially inserted state, so clear and rebuild on demand.
        guard.clear();
        guard
      }
    };
    if let Some(found) = guard.get(&key) {
      return found.clone();
    }
    let lut = Arc::new(build());
    guard.entry(key).or_insert_with(|| lut.clone()).clone()
  }
}

#[inline(always)]
fn blend_premul(a: PremultipliedColorU8, b: PremultipliedColorU8, t: f32) -> PremultipliedColorU8 {
  debug_assert!(t.is_finite());
  debug_assert!((0.0..=1.0).contains(&t));

  let inv = 1.0 - t;
  let r = (a.red() as f32 * inv + b.red() as f32 * t + 0.5) as u8;
  let g = (a.green() as f32 * inv + b.green() as f32 * t + 0.5) as u8;
  let blue = (a.blue() as f32 * inv + b.blue() as f32 * t + 0.5) as u8;
  let alpha = (a.alpha() as f32 * inv + b.alpha() as f32 * t + 0.5) as u8;

  PremultipliedColorU8::from_rgba(r, g, blue, alpha).unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

fn premultiply_rgba(color: Rgba) -> PremultipliedColorU8 {
  let alpha_u8 = (color.a * 255.0).round().clamp(0.0, 255.0) as u8;
  ColorU8::from_rgba(color.r, color.g, color.b, alpha_u8).premultiply()
}

pub fn build_gradient_lut(
  stops: &[(f32, Rgba)],
  spread: SpreadMode,
  period: f32,
  bucket: u16,
) -> GradientLut {
  let max_idx = bucket.max(1) as usize;
  let step_count = max_idx + 1;
  let max_idx = max_idx as f32;
  let mut colors = Vec::with_capacity(step_count);
  let mut window = stops.windows(2).peekable();
  for i in 0..step_count {
    let pos = (i as f32 / max_idx) * period;
    while let Some(segment) = window.peek() {
      if pos > segment[1].0 {
        window.next();
      } else {
        break;
      }
    }
    let color = if let Some(segment) = window.peek() {
      let (p0, c0) = segment[0];
      let (p1, c1) = segment[1];
      if (p1 - p0).abs() < f32::EPSILON {
        c0
      } else {
        let frac = ((pos - p0) / (p1 - p0)).clamp(0.0, 1.0);
        mix_rgba(c0, c1, frac)
      }
    } else {
      stops.last().map(|(_, c)| *c).unwrap_or(Rgba::TRANSPARENT)
    };
    colors.push(premultiply_rgba(color));
  }

  let colors = Arc::new(colors);
  let last_idx = colors.len().saturating_sub(1);
  // Pad sampling returns `first`/`last` directly when clamping outside the
  // stop range, so these must match the terminal stop colors rather than the
  // sampled LUT values. With duplicate stops at a terminal position the LUT
  // sample at that exact position can come from the preceding segment.
  let first = stops
    .first()
    .map(|(_, c)| premultiply_rgba(*c))
    .unwrap_or(PremultipliedColorU8::TRANSPARENT);
  let last = stops.last().map(|(_, c)| premultiply_rgba(*c)).unwrap_or(first);
  let scale = max_idx / period.max(1e-6);

  GradientLut {
    spread: spread.into(),
    period,
    scale,
    last_idx,
    first,
    last,
    colors,
  }
}

pub fn gradient_period(stops: &[(f32, Rgba)]) -> f32 {
  stops.last().map(|(pos, _)| *pos).unwrap_or(1.0).max(1e-6)
}

/// LUT resolution for a raster of the given maximum dimension, stepping in
/// powers of two between 64 and 4096 entries.
pub fn gradient_bucket(max_dim: u32) -> u16 {
  let mut bucket = 64u32;
  let target = max_dim.max(64);
  while bucket < target {
    bucket *= 2;
    if bucket >= 4096 {
      bucket = 4096;
      break;
    }
  }
  bucket as u16
}

/// Reconciles an explicit fraction list against the color count.
///
/// Matching counts pass through, excess fractions are truncated, a missing
/// tail is filled by stepping linearly from the last given fraction to 1.0,
/// and an empty list distributes stops evenly over `[0, 1]`.
pub fn reconcile_fractions(color_count: usize, fractions: &[f32]) -> Vec<f32> {
  if fractions.len() == color_count {
    return fractions.to_vec();
  }
  if fractions.len() > color_count {
    return fractions[..color_count].to_vec();
  }
  if fractions.is_empty() {
    if color_count <= 1 {
      return vec![0.0; color_count];
    }
    let max = (color_count - 1) as f32;
    return (0..color_count).map(|i| i as f32 / max).collect();
  }
  let given = fractions.len();
  let mut out = Vec::with_capacity(color_count);
  out.extend_from_slice(fractions);
  let last = fractions[given - 1];
  let step = (1.0 - last) / (color_count - given) as f32;
  for i in given..color_count {
    out.push((last + step * (i - given + 1) as f32).min(1.0));
  }
  out
}

/// Pairs colors with their reconciled stop positions.
pub fn gradient_stops(colors: &[Rgba], fractions: &[f32]) -> Vec<(f32, Rgba)> {
  reconcile_fractions(colors.len(), fractions)
    .into_iter()
    .zip(colors.iter().copied())
    .collect()
}

fn mix_rgba(a: Rgba, b: Rgba, t: f32) -> Rgba {
  let t = t.clamp(0.0, 1.0);
  Rgba {
    r: (a.r as f32 + (b.r as f32 - a.r as f32) * t)
      .round()
      .clamp(0.0, 255.0) as u8,
    g: (a.g as f32 + (b.g as f32 - a.g as f32) * t)
      .round()
      .clamp(0.0, 255.0) as u8,
    b: (a.b as f32 + (b.b as f32 - a.b as f32) * t)
      .round()
      .clamp(0.0, 255.0) as u8,
    a: a.a + (b.a - a.a) * t,
  }
}

/// The two anchor points a gradient spans, derived from the boundary box the
/// spec selects and its span direction. The offset translates both anchors.
pub fn gradient_anchors(model: &BoxModel, spec: &GradientSpec) -> (Point, Point) {
  let ins = span_insets(model, spec);
  let width = model.size.width - (ins.left + ins.right);
  let height = model.size.height - (ins.top + ins.bottom);
  let x = ins.left + spec.offset.x;
  let y = ins.top + spec.offset.y;
  match spec.span {
    Span::TopLeftToBottomRight => (Point::new(x, y), Point::new(x + width, y + height)),
    Span::BottomLeftToTopRight => (Point::new(x, y + height), Point::new(x + width, y)),
    Span::TopRightToBottomLeft => (Point::new(x + width, y), Point::new(x, y + height)),
    Span::BottomRightToTopLeft => (Point::new(x + width, y + height), Point::new(x, y)),
    Span::TopToBottom => (Point::new(x, y), Point::new(x, y + height)),
    Span::LeftToRight => (Point::new(x, y), Point::new(x + width, y)),
    Span::BottomToTop => (Point::new(x, y + height), Point::new(x, y)),
    Span::RightToLeft => (Point::new(x + width, y), Point::new(x, y)),
  }
}

fn span_insets(model: &BoxModel, spec: &GradientSpec) -> EdgeOffsets {
  if spec.boundary != Boundary::CenterToContent {
    return model.boundary_insets(spec.boundary);
  }
  // Center-relative: collapse the box to the element center, then open the
  // side(s) the span points toward back up to the content edge.
  let content = model.boundary_insets(Boundary::InteriorToContent);
  let mut ins = EdgeOffsets::symmetric(model.size.height / 2.0, model.size.width / 2.0);
  match spec.span {
    Span::TopToBottom => ins.bottom = content.bottom,
    Span::BottomToTop => ins.top = content.top,
    Span::LeftToRight => ins.right = content.right,
    Span::RightToLeft => ins.left = content.left,
    Span::TopLeftToBottomRight => {
      ins.bottom = content.bottom;
      ins.right = content.right;
    }
    Span::BottomRightToTopLeft => {
      ins.top = content.top;
      ins.left = content.left;
    }
    Span::TopRightToBottomLeft => {
      ins.bottom = content.bottom;
      ins.left = content.left;
    }
    Span::BottomLeftToTopRight => {
      ins.top = content.top;
      ins.right = content.right;
    }
  }
  ins
}

/// Projects both corner anchors of a diagonal span onto the rectangle's
/// diagonal axis. Both directions of the same diagonal project to the same
/// two points, which keeps diagonal gradients symmetric regardless of which
/// corner pair was requested.
fn align_diagonal(c1: Point, c2: Point) -> (Point, Point) {
  let center = Point::new((c1.x + c2.x) / 2.0, (c1.y + c2.y) / 2.0);
  let normal = Point::new(c2.x - c1.x, c1.y - c2.y);
  (
    project_point_onto_line(c1, normal, center),
    project_point_onto_line(c2, normal, center),
  )
}

// Foot of the perpendicular from `c` onto the line through `a` with
// direction `n`.
fn project_point_onto_line(a: Point, n: Point, c: Point) -> Point {
  let len2 = n.x * n.x + n.y * n.y;
  if len2 <= f32::EPSILON {
    return a;
  }
  let t = ((c.x - a.x) * n.x + (c.y - a.y) * n.y) / len2;
  Point::new(a.x + t * n.x, a.y + t * n.y)
}

fn rotate_point(pivot: Point, p: Point, degrees: f32) -> Point {
  if degrees % 360.0 == 0.0 {
    return p;
  }
  let (sin, cos) = (degrees as f64).to_radians().sin_cos();
  let x = (p.x - pivot.x) as f64;
  let y = (p.y - pivot.y) as f64;
  Point::new(
    (pivot.x as f64 + x * cos - y * sin) as f32,
    (pivot.y as f64 + x * sin + y * cos) as f32,
  )
}

/// Angle of `p2` around `p1` in degrees.
fn rotation_between(p1: Point, p2: Point) -> f32 {
  ((p2.y - p1.y) as f64).atan2((p2.x - p1.x) as f64).to_degrees() as f32
}

// Re-projects `c2` along the `c1 -> c2` unit vector to the given length.
fn with_length(c1: Point, c2: Point, length: f32) -> Point {
  let dx = c2.x - c1.x;
  let dy = c2.y - c1.y;
  let dist = (dx * dx + dy * dy).sqrt();
  if dist <= f32::EPSILON {
    return c2;
  }
  Point::new(c1.x + (dx / dist) * length, c1.y + (dy / dist) * length)
}

/// A renderable gradient paint, ready to fill a region with.
pub enum GradientPaint {
  /// Flat fill: single color specs and degenerate axes.
  Solid(Rgba),
  /// Linear and radial fills via a tiny-skia shader.
  Shader(Shader<'static>),
  /// Rasterized texture for fills tiny-skia has no shader for.
  Texture(Arc<Pixmap>),
}

impl fmt::Debug for GradientPaint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GradientPaint::Solid(color) => f.debug_tuple("Solid").field(color).finish(),
      GradientPaint::Shader(_) => f.write_str("Shader(..)"),
      GradientPaint::Texture(pixmap) => f
        .debug_tuple("Texture")
        .field(&pixmap.width())
        .field(&pixmap.height())
        .finish(),
    }
  }
}

impl GradientPaint {
  /// Fills `region` on `canvas` with this paint.
  pub fn fill(&self, canvas: &mut Canvas, region: &Region) {
    match self {
      GradientPaint::Solid(color) => canvas.fill_region(region, *color),
      GradientPaint::Shader(shader) => {
        let mut paint = tiny_skia::Paint::default();
        paint.shader = shader.clone();
        paint.anti_alias = false;
        canvas.fill_region_with(region, &paint);
      }
      GradientPaint::Texture(texture) => {
        let mut paint = tiny_skia::Paint::default();
        paint.shader = Pattern::new(
          texture.as_ref().as_ref(),
          SpreadMode::Pad,
          FilterQuality::Nearest,
          1.0,
          Transform::identity(),
        );
        paint.anti_alias = false;
        canvas.fill_region_with(region, &paint);
      }
    }
  }
}

/// Builds the paint for a gradient spec against the given box model.
///
/// Returns `Ok(None)` when there is nothing to draw (no colors, empty
/// element, degenerate radius).
pub fn build_paint(
  model: &BoxModel,
  spec: &GradientSpec,
  luts: &GradientLutCache,
  textures: &PaintPixmapCache,
) -> Result<Option<GradientPaint>, RenderError> {
  let Some((&first, rest)) = spec.colors.split_first() else {
    return Ok(None);
  };
  if rest.is_empty() {
    return Ok(Some(GradientPaint::Solid(first)));
  }
  match spec.kind {
    GradientKind::Linear => Ok(Some(build_linear(model, spec))),
    GradientKind::Radial => Ok(build_radial(model, spec)),
    GradientKind::Conic => build_conic(model, spec, luts, textures),
  }
}

fn build_linear(model: &BoxModel, spec: &GradientSpec) -> GradientPaint {
  let (start, end, stops) = linear_geometry(model, spec);
  let first = stops.first().map(|s| s.1).unwrap_or(Rgba::TRANSPARENT);
  let skia_stops = stops
    .iter()
    .map(|&(pos, color)| GradientStop::new(pos, to_skia_color(color)))
    .collect();
  match LinearGradient::new(
    to_skia_point(start),
    to_skia_point(end),
    skia_stops,
    spread_mode(spec.cycle),
    Transform::identity(),
  ) {
    Some(shader) => GradientPaint::Shader(shader),
    // Zero-length axis, same as a flat fill of the first stop.
    None => GradientPaint::Solid(first),
  }
}

/// Anchor pair and stop list for a linear gradient, after diagonal
/// alignment, explicit sizing and rotation.
fn linear_geometry(model: &BoxModel, spec: &GradientSpec) -> (Point, Point, Vec<(f32, Rgba)>) {
  let (mut c1, mut c2) = gradient_anchors(model, spec);
  let mut stops = gradient_stops(&spec.colors, &spec.fractions);
  if spec.span.is_diagonal() {
    let (p1, p2) = align_diagonal(c1, c2);
    c1 = p1;
    c2 = p2;
    if matches!(spec.span, Span::BottomRightToTopLeft | Span::BottomLeftToTopRight) {
      // Canonical direction per diagonal: requesting the reversed corner
      // pair with reversed colors produces bit-identical output.
      std::mem::swap(&mut c1, &mut c2);
      stops = mirror_stops(stops);
    }
  }
  if let Some(size) = spec.size {
    c2 = with_length(c1, c2, size);
  }
  c2 = rotate_point(c1, c2, spec.rotation);
  (c1, c2, stops)
}

fn mirror_stops(stops: Vec<(f32, Rgba)>) -> Vec<(f32, Rgba)> {
  stops
    .into_iter()
    .rev()
    .map(|(pos, color)| (1.0 - pos, color))
    .collect()
}

fn build_radial(model: &BoxModel, spec: &GradientSpec) -> Option<GradientPaint> {
  let (c1, c2) = gradient_anchors(model, spec);
  let (center, radius, focus) = radial_geometry(c1, c2, spec);
  if !(radius > 0.0) {
    log::debug!("radial gradient with degenerate radius {radius}, skipping");
    return None;
  }
  let stops = gradient_stops(&spec.colors, &spec.fractions);
  let skia_stops = stops
    .iter()
    .map(|&(pos, color)| GradientStop::new(pos, to_skia_color(color)))
    .collect();
  match RadialGradient::new(
    to_skia_point(focus),
    to_skia_point(center),
    radius,
    skia_stops,
    spread_mode(spec.cycle),
    Transform::identity(),
  ) {
    Some(shader) => Some(GradientPaint::Shader(shader)),
    None => {
      log::debug!("radial gradient shader rejected, skipping");
      None
    }
  }
}

/// Center, radius and focal point for a radial gradient. The radius defaults
/// to the anchor distance; the focus offset is relative to the center and
/// follows the spec rotation.
fn radial_geometry(c1: Point, c2: Point, spec: &GradientSpec) -> (Point, f32, Point) {
  let radius = spec.size.unwrap_or_else(|| c1.distance_to(c2));
  let focus = if spec.focus == Point::ZERO {
    c1
  } else {
    rotate_point(
      c1,
      Point::new(c1.x + spec.focus.x, c1.y + spec.focus.y),
      spec.rotation,
    )
  };
  (c1, radius, focus)
}

fn build_conic(
  model: &BoxModel,
  spec: &GradientSpec,
  luts: &GradientLutCache,
  textures: &PaintPixmapCache,
) -> Result<Option<GradientPaint>, RenderError> {
  let (c1, c2) = gradient_anchors(model, spec);
  let width = model.size.width.ceil() as u32;
  let height = model.size.height.ceil() as u32;
  // The sweep starts at the requested rotation plus the angle the span
  // itself points at, normalized to [-180, 180).
  let rotation = spec.rotation + rotation_between(c1, c2);
  let rotation = (rotation + 180.0).rem_euclid(360.0) - 180.0;
  let stops = conic_stops(gradient_stops(&spec.colors, &spec.fractions), spec.cycle);
  let spread = spread_mode(spec.cycle);
  let bucket = gradient_bucket(width.max(height).saturating_mul(2));
  let pixmap = rasterize_conic_gradient_cached(
    textures,
    width,
    height,
    c1,
    rotation.to_radians(),
    spread,
    &stops,
    luts,
    bucket,
  )?;
  Ok(pixmap.map(GradientPaint::Texture))
}

/// Pads conic stops out to the full `[0, 1]` turn for non-cycling sweeps.
///
/// The padding color is the blend the wrap-around would produce between the
/// last and first stop, so the sweep meets itself without a seam at the
/// start angle.
fn conic_stops(mut stops: Vec<(f32, Rgba)>, cycle: Cycle) -> Vec<(f32, Rgba)> {
  if cycle != Cycle::None || stops.is_empty() {
    return stops;
  }
  let first = stops[0];
  let last = stops[stops.len() - 1];
  if first.0 <= 0.0 && last.0 >= 1.0 {
    return stops;
  }
  let tail = 1.0 - last.0;
  let wrap = tail + first.0;
  let seam = if wrap > 0.0 {
    mix_rgba(last.1, first.1, tail / wrap)
  } else {
    first.1
  };
  if first.0 > 0.0 {
    stops.insert(0, (0.0, seam));
  }
  if last.0 < 1.0 {
    stops.push((1.0, seam));
  }
  stops
}

pub(crate) fn to_skia_color(color: Rgba) -> tiny_skia::Color {
  tiny_skia::Color::from_rgba8(
    color.r,
    color.g,
    color.b,
    (color.a * 255.0).round().clamp(0.0, 255.0) as u8,
  )
}

pub(crate) fn to_skia_point(p: Point) -> tiny_skia::Point {
  tiny_skia::Point::from_xy(p.x, p.y)
}

/// Rasterizes a conic sweep around `center` into a fresh pixmap.
///
/// Zero is at twelve o'clock and angles grow clockwise; the full circle maps
/// to one turn of the stop range, so non-cycling stops that end short of 1.0
/// extend their terminal color through the rest of the sweep.
pub fn rasterize_conic_gradient(
  width: u32,
  height: u32,
  center: Point,
  start_angle: f32,
  spread: SpreadMode,
  stops: &[(f32, Rgba)],
  cache: &GradientLutCache,
  bucket: u16,
) -> Result<Option<Pixmap>, RenderError> {
  if width == 0 || height == 0 || stops.is_empty() {
    return Ok(None);
  }

  let period = gradient_period(stops);
  let key = GradientCacheKey::new(stops, spread, period, bucket);
  let lut = cache.get_or_build(key, || build_gradient_lut(stops, spread, period, bucket));
  let Some(mut pixmap) = new_pixmap(width, height) else {
    return Ok(None);
  };

  let start_angle = start_angle.rem_euclid(std::f32::consts::PI * 2.0);
  let angle_scale = 0.5 / std::f32::consts::PI;
  let stride = width as usize;
  let pixels = pixmap.pixels_mut();
  let dx0 = 0.5 - center.x;
  for (y, row) in pixels.chunks_mut(stride).enumerate() {
    let dy = y as f32 + 0.5 - center.y;
    let mut dx = dx0;
    for pixel in row {
      let mut t = (dx.atan2(-dy) + start_angle) * angle_scale;
      if t < 0.0 {
        t += 1.0;
      } else if t >= 1.0 {
        t -= 1.0;
      }
      *pixel = lut.sample(t);
      dx += 1.0;
    }
  }

  Ok(Some(pixmap))
}

pub fn rasterize_conic_gradient_cached(
  pixmap_cache: &PaintPixmapCache,
  width: u32,
  height: u32,
  center: Point,
  start_angle: f32,
  spread: SpreadMode,
  stops: &[(f32, Rgba)],
  cache: &GradientLutCache,
  bucket: u16,
) -> Result<Option<Arc<Pixmap>>, RenderError> {
  let Some(key) = PaintPixmapKey::conic(width, height, center, start_angle, spread, stops, bucket)
  else {
    return Ok(None);
  };
  pixmap_cache.get_or_insert(key, || {
    rasterize_conic_gradient(
      width,
      height,
      center,
      start_angle,
      spread,
      stops,
      cache,
      bucket,
    )
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::BorderRadii;

  fn boxed_model() -> BoxModel {
    BoxModel::new(
      Size::new(100.0, 80.0),
      EdgeOffsets::all(5.0),
      EdgeOffsets::all(2.0),
      EdgeOffsets::all(3.0),
      BorderRadii::ZERO,
    )
  }

  fn two_color_spec(colors: Vec<Rgba>, span: Span) -> GradientSpec {
    GradientSpec {
      colors,
      span,
      boundary: Boundary::OuterToExterior,
      ..GradientSpec::default()
    }
  }

  #[test]
  fn reconcile_passes_matching_fractions_through() {
    let fractions = [0.0, 0.25, 1.0];
    assert_eq!(reconcile_fractions(3, &fractions), fractions.to_vec());
  }

  #[test]
  fn reconcile_truncates_excess_fractions() {
    let fractions = [0.0, 0.5, 0.75, 1.0];
    assert_eq!(reconcile_fractions(2, &fractions), vec![0.0, 0.5]);
  }

  #[test]
  fn reconcile_distributes_evenly_when_no_fractions_given() {
    let got = reconcile_fractions(4, &[]);
    assert_eq!(got.len(), 4);
    assert_eq!(got[0], 0.0);
    assert!((got[1] - 1.0 / 3.0).abs() < 1e-6);
    assert!((got[2] - 2.0 / 3.0).abs() < 1e-6);
    assert_eq!(got[3], 1.0);

    assert_eq!(reconcile_fractions(1, &[]), vec![0.0]);
  }

  #[test]
  fn reconcile_fills_missing_tail_toward_one() {
    let got = reconcile_fractions(5, &[0.0, 0.1]);
    assert_eq!(got.len(), 5);
    assert_eq!(&got[..2], &[0.0, 0.1]);
    assert!((got[2] - 0.4).abs() < 1e-5);
    assert!((got[3] - 0.7).abs() < 1e-5);
    assert!((got[4] - 1.0).abs() < 1e-5);
    for pair in got.windows(2) {
      assert!(pair[0] <= pair[1], "fractions must be non-decreasing: {got:?}");
    }
    assert!(got[0] >= 0.0);
    assert!(*got.last().unwrap() <= 1.0);
  }

  #[test]
  fn anchors_follow_boundary_insets() {
    let model = boxed_model();
    let spec = GradientSpec {
      colors: vec![Rgba::RED, Rgba::BLUE],
      span: Span::TopToBottom,
      boundary: Boundary::ExteriorToBorder,
      ..GradientSpec::default()
    };
    let (c1, c2) = gradient_anchors(&model, &spec);
    assert_eq!((c1.x, c1.y), (5.0, 5.0));
    assert_eq!((c2.x, c2.y), (5.0, 75.0));

    let spec = GradientSpec {
      span: Span::LeftToRight,
      boundary: Boundary::BorderToInterior,
      ..spec
    };
    let (c1, c2) = gradient_anchors(&model, &spec);
    assert_eq!((c1.x, c1.y), (7.0, 7.0));
    assert_eq!((c2.x, c2.y), (93.0, 7.0));
  }

  #[test]
  fn anchors_translate_with_offset() {
    let model = boxed_model();
    let spec = GradientSpec {
      colors: vec![Rgba::RED, Rgba::BLUE],
      span: Span::TopToBottom,
      boundary: Boundary::OuterToExterior,
      offset: Point::new(4.0, -2.0),
      ..GradientSpec::default()
    };
    let (c1, c2) = gradient_anchors(&model, &spec);
    assert_eq!((c1.x, c1.y), (4.0, -2.0));
    assert_eq!((c2.x, c2.y), (4.0, 78.0));
  }

  #[test]
  fn center_boundary_spans_from_center_to_content_edge() {
    let model = boxed_model();
    let spec = GradientSpec {
      colors: vec![Rgba::RED, Rgba::BLUE],
      span: Span::TopToBottom,
      boundary: Boundary::CenterToContent,
      ..GradientSpec::default()
    };
    let (c1, c2) = gradient_anchors(&model, &spec);
    // Element center down to the content bottom edge (80 - (5+2+3)).
    assert_eq!((c1.x, c1.y), (50.0, 40.0));
    assert_eq!((c2.x, c2.y), (50.0, 70.0));
  }

  #[test]
  fn diagonal_projection_ignores_span_direction() {
    let c1 = Point::new(0.0, 0.0);
    let c2 = Point::new(100.0, 60.0);
    let (p1, p2) = align_diagonal(c1, c2);
    let (q1, q2) = align_diagonal(c2, c1);
    assert_eq!(p1.x.to_bits(), q2.x.to_bits());
    assert_eq!(p1.y.to_bits(), q2.y.to_bits());
    assert_eq!(p2.x.to_bits(), q1.x.to_bits());
    assert_eq!(p2.y.to_bits(), q1.y.to_bits());
  }

  #[test]
  fn reversed_diagonal_with_reversed_colors_builds_identical_geometry() {
    let model = BoxModel::plain(Size::new(64.0, 40.0));
    let forward = two_color_spec(vec![Rgba::RED, Rgba::BLUE], Span::TopLeftToBottomRight);
    let reverse = two_color_spec(vec![Rgba::BLUE, Rgba::RED], Span::BottomRightToTopLeft);

    let (a1, a2, a_stops) = linear_geometry(&model, &forward);
    let (b1, b2, b_stops) = linear_geometry(&model, &reverse);
    assert_eq!(a1.x.to_bits(), b1.x.to_bits());
    assert_eq!(a1.y.to_bits(), b1.y.to_bits());
    assert_eq!(a2.x.to_bits(), b2.x.to_bits());
    assert_eq!(a2.y.to_bits(), b2.y.to_bits());
    assert_eq!(a_stops.len(), b_stops.len());
    for (a, b) in a_stops.iter().zip(&b_stops) {
      assert_eq!(a.0.to_bits(), b.0.to_bits());
      assert_eq!(a.1, b.1);
    }
  }

  #[test]
  fn reversed_diagonal_with_reversed_colors_is_pixel_identical() {
    let model = BoxModel::plain(Size::new(40.0, 24.0));
    let region = Region::full(40, 24);
    let luts = GradientLutCache::default();
    let textures = PaintPixmapCache::default();

    let render = |spec: &GradientSpec| -> Vec<u8> {
      let paint = build_paint(&model, spec, &luts, &textures)
        .expect("build paint")
        .expect("paint present");
      let mut canvas = Canvas::new(40, 24).expect("canvas");
      paint.fill(&mut canvas, &region);
      canvas.pixmap().data().to_vec()
    };

    let forward = render(&two_color_spec(
      vec![Rgba::RED, Rgba::BLUE],
      Span::TopLeftToBottomRight,
    ));
    let reverse = render(&two_color_spec(
      vec![Rgba::BLUE, Rgba::RED],
      Span::BottomRightToTopLeft,
    ));
    assert_eq!(forward, reverse);

    let anti_forward = render(&two_color_spec(
      vec![Rgba::RED, Rgba::BLUE],
      Span::TopRightToBottomLeft,
    ));
    let anti_reverse = render(&two_color_spec(
      vec![Rgba::BLUE, Rgba::RED],
      Span::BottomLeftToTopRight,
    ));
    assert_eq!(anti_forward, anti_reverse);
  }

  #[test]
  fn single_color_builds_a_solid_paint() {
    let model = boxed_model();
    let spec = GradientSpec {
      colors: vec![Rgba::GREEN],
      ..GradientSpec::default()
    };
    let luts = GradientLutCache::default();
    let textures = PaintPixmapCache::default();
    let paint = build_paint(&model, &spec, &luts, &textures)
      .expect("build paint")
      .expect("paint present");
    assert!(matches!(paint, GradientPaint::Solid(c) if c == Rgba::GREEN));
  }

  #[test]
  fn degenerate_axis_falls_back_to_flat_fill() {
    let model = BoxModel::plain(Size::new(0.0, 10.0));
    let spec = two_color_spec(vec![Rgba::RED, Rgba::BLUE], Span::LeftToRight);
    let luts = GradientLutCache::default();
    let textures = PaintPixmapCache::default();
    let paint = build_paint(&model, &spec, &luts, &textures)
      .expect("build paint")
      .expect("paint present");
    assert!(matches!(paint, GradientPaint::Solid(c) if c == Rgba::RED));
  }

  #[test]
  fn radial_radius_defaults_to_anchor_distance() {
    let c1 = Point::new(0.0, 0.0);
    let c2 = Point::new(30.0, 40.0);
    let spec = GradientSpec::default();
    let (center, radius, focus) = radial_geometry(c1, c2, &spec);
    assert_eq!((center.x, center.y), (0.0, 0.0));
    assert_eq!(radius, 50.0);
    assert_eq!((focus.x, focus.y), (0.0, 0.0));

    let spec = GradientSpec {
      size: Some(7.0),
      focus: Point::new(3.0, 4.0),
      ..GradientSpec::default()
    };
    let (_, radius, focus) = radial_geometry(c1, c2, &spec);
    assert_eq!(radius, 7.0);
    assert_eq!((focus.x, focus.y), (3.0, 4.0));
  }

  #[test]
  fn conic_stops_pad_the_full_turn_with_the_seam_blend() {
    let stops = vec![(0.25, Rgba::RED), (0.75, Rgba::BLUE)];
    let padded = conic_stops(stops.clone(), Cycle::None);
    assert_eq!(padded.len(), 4);
    let seam = Rgba::new(128, 0, 128, 1.0);
    assert_eq!(padded[0], (0.0, seam));
    assert_eq!(padded[1], (0.25, Rgba::RED));
    assert_eq!(padded[2], (0.75, Rgba::BLUE));
    assert_eq!(padded[3], (1.0, seam));

    // Cycling sweeps keep their stops; the spread mode covers the rest.
    assert_eq!(conic_stops(stops.clone(), Cycle::Repeat), stops);
  }

  fn sample_stop_color(stops: &[(f32, Rgba)], t: f32, period: f32, spread: SpreadMode) -> Rgba {
    if stops.is_empty() {
      return Rgba::TRANSPARENT;
    }
    let pos = match spread {
      SpreadMode::Pad => t.clamp(0.0, period),
      SpreadMode::Repeat => t.rem_euclid(period),
      SpreadMode::Reflect => {
        let two_p = period * 2.0;
        let mut v = t.rem_euclid(two_p);
        if v > period {
          v = two_p - v;
        }
        v
      }
    };
    if pos <= stops[0].0 {
      return stops[0].1;
    }
    if pos >= stops.last().unwrap().0 {
      return stops.last().unwrap().1;
    }
    for window in stops.windows(2) {
      let (p0, c0) = window[0];
      let (p1, c1) = window[1];
      if pos >= p0 && pos <= p1 {
        return mix_rgba(c0, c1, ((pos - p0) / (p1 - p0)).clamp(0.0, 1.0));
      }
    }
    stops.last().unwrap().1
  }

  fn naive_conic(
    width: u32,
    height: u32,
    center: Point,
    start_angle: f32,
    stops: &[(f32, Rgba)],
    spread: SpreadMode,
  ) -> Pixmap {
    let period = gradient_period(stops);
    let mut pixmap = new_pixmap(width, height).expect("pixmap allocation");
    let stride = width as usize;
    let pixels = pixmap.pixels_mut();
    let inv_two_pi = 0.5 / std::f32::consts::PI;
    for y in 0..height as usize {
      let dy = y as f32 + 0.5 - center.y;
      for x in 0..width as usize {
        let dx = x as f32 + 0.5 - center.x;
        let angle = dx.atan2(-dy) + start_angle;
        let pos = (angle * inv_two_pi).rem_euclid(1.0);
        let color = sample_stop_color(stops, pos, period, spread);
        pixels[y * stride + x] = premultiply_rgba(color);
      }
    }
    pixmap
  }

  #[test]
  fn conic_lut_matches_naive_with_low_error() {
    let stops = vec![(0.0, Rgba::RED), (0.5, Rgba::GREEN), (1.0, Rgba::BLUE)];
    let cache = GradientLutCache::default();
    let width = 48;
    let height = 48;
    let center = Point::new(width as f32 / 2.0, height as f32 / 2.0);
    let lut_pixmap = rasterize_conic_gradient(
      width,
      height,
      center,
      0.0,
      SpreadMode::Repeat,
      &stops,
      &cache,
      gradient_bucket(width.max(height).saturating_mul(2)),
    )
    .expect("conic rasterize")
    .expect("conic pixmap");
    let naive = naive_conic(width, height, center, 0.0, &stops, SpreadMode::Repeat);
    let max_diff = lut_pixmap
      .data()
      .iter()
      .zip(naive.data())
      .map(|(a, b)| a.abs_diff(*b))
      .max()
      .unwrap_or(0);
    assert!(max_diff <= 1, "max channel diff {max_diff}");
  }

  #[test]
  fn conic_premultiplies_semi_transparent_stops() {
    let color = Rgba::new(0, 255, 0, 0.5);
    let stops = vec![(0.0, color), (1.0, color)];
    let cache = GradientLutCache::default();
    let pixmap = rasterize_conic_gradient(
      2,
      2,
      Point::new(1.0, 1.0),
      0.0,
      SpreadMode::Pad,
      &stops,
      &cache,
      64,
    )
    .expect("conic rasterize")
    .expect("conic pixmap");
    let px = pixmap.pixel(0, 0).expect("pixel");
    assert_eq!(px.red(), 0);
    assert_eq!(px.green(), 128);
    assert_eq!(px.blue(), 0);
    assert_eq!(px.alpha(), 128);
  }

  #[test]
  fn texture_cache_hits_on_second_render() {
    let luts = GradientLutCache::default();
    let textures = PaintPixmapCache::default();
    let stops = vec![(0.0, Rgba::RED), (1.0, Rgba::BLUE)];
    let center = Point::new(16.0, 16.0);

    let first = rasterize_conic_gradient_cached(
      &textures,
      32,
      32,
      center,
      0.0,
      SpreadMode::Pad,
      &stops,
      &luts,
      64,
    )
    .expect("first rasterize")
    .expect("first pixmap");
    let after_first = textures.snapshot();
    assert_eq!(after_first.misses, 1);
    assert_eq!(after_first.hits, 0);
    assert_eq!(after_first.items, 1);

    let second = rasterize_conic_gradient_cached(
      &textures,
      32,
      32,
      center,
      0.0,
      SpreadMode::Pad,
      &stops,
      &luts,
      64,
    )
    .expect("second rasterize")
    .expect("second pixmap");
    let after_second = textures.snapshot();
    assert_eq!(after_second.misses, 1);
    assert_eq!(after_second.hits, 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.data(), second.data());
  }

  #[test]
  fn lut_cache_recovers_from_poisoned_lock() {
    let cache = GradientLutCache::default();

    let result = std::panic::catch_unwind(|| {
      let _guard = cache.inner.lock().unwrap();
      panic!("poison the LUT cache lock");
    });
    assert!(result.is_err(), "expected panic to be caught");
    assert!(cache.inner.is_poisoned(), "expected mutex to be poisoned");

    let stops = [(0.0, Rgba::BLACK), (1.0, Rgba::WHITE)];
    let key = GradientCacheKey::new(&stops, SpreadMode::Pad, 1.0, 16);
    let lut = cache.get_or_build(key, || build_gradient_lut(&stops, SpreadMode::Pad, 1.0, 16));
    assert_eq!(lut.period, 1.0);
    assert!(!lut.colors.is_empty());
  }
}
