//! Procedural noise paints.
//!
//! A noise paint maps a deterministic noise field through a gradient stop
//! list. The field is a pure function of the sample coordinate, so the same
//! spec always rasterizes to the same texture; textures go through the shared
//! [`PaintPixmapCache`] keyed by the full field parameter set.
//!
//! The noise catalog is a seeded kernel sum: each kernel point contributes a
//! pseudo random amplitude weighted by its distance to the sample point, and
//! the shaped variants post-process that sum (sine bands, sigmoid, rounding).

use std::sync::Arc;

use tiny_skia::{Pixmap, SpreadMode};

use crate::boxmodel::{Boundary, BoxModel, NoiseKind};
use crate::error::RenderError;
use crate::geometry::{EdgeOffsets, Point, Size};
use crate::paint::gradient::{
  build_gradient_lut, gradient_bucket, gradient_period, gradient_stops, GradientCacheKey,
  GradientLutCache, GradientPaint, PaintPixmapCache, PaintPixmapKey,
};
use crate::paint::pixmap::new_pixmap;
use crate::style::color::Rgba;
use crate::style::NoiseSpec;

const PRIME_1: i64 = 12055296811267;
const PRIME_2: i64 = 53982894593057;

/// Hashes a coordinate pair to a byte. The whole noise catalog bottoms out
/// here, so the constants and the fold are part of the visual contract:
/// changing them reseeds every texture.
fn pseudo_random_byte(a: i32, b: i32) -> i8 {
  let x = PRIME_1.wrapping_mul(a as i64);
  let y = PRIME_2.wrapping_mul(x.wrapping_add(b as i64));
  fold_seed(x ^ y)
}

fn fold_seed(seed: i64) -> i8 {
  let as_int = (seed ^ (((seed as u64) >> 32) as i64)) as i32;
  let as_short = (as_int ^ (((as_int as u32) >> 16) as i32)) as i16;
  (as_short ^ (((as_short as u16) >> 8) as i16)) as i8
}

/// Pseudo random value in `[0, 1]`, keyed by the bit patterns of the inputs.
fn pseudo_random_unit(x: f32, y: f32) -> f64 {
  let byte = pseudo_random_byte(x.to_bits() as i32, y.to_bits() as i32);
  (byte as f64 + 128.0) / 255.0
}

// Half-up rounding toward positive infinity, so -0.5 rounds to 0.
fn round_half_up(value: f32) -> i32 {
  (value + 0.5).floor() as i32
}

fn sigmoid(x: f64) -> f64 {
  1.0 / (1.0 + (-x).exp())
}

/// Kernel sum of distance-weighted pseudo random amplitudes around the
/// sample point. Roughly half of the kernel points contribute; each one adds
/// a signed fraction scaled by the square of its proximity.
fn grad_value(kernel_size: i32, x_in: f32, y_in: f32) -> f64 {
  let max_distance = kernel_size / 2;
  let kernel_points = kernel_size * kernel_size;
  let sample_rate = 0.5;
  let mut sum = 0.0f64;
  for i in 0..kernel_points {
    let x = i % kernel_size;
    let y = i / kernel_size;
    let xi = (x - max_distance) as f32 + x_in;
    let yi = (y - max_distance) as f32 + y_in;
    let rx = round_half_up(xi);
    let ry = round_half_up(yi);
    let score = pseudo_random_byte(ry, rx);
    if (255.0 * sample_rate - 128.0) < score as f64 {
      let vx = (rx as f32 - x_in) as f64;
      let vy = (ry as f32 - y_in) as f64;
      let distance = (vx * vx + vy * vy).sqrt();
      let relevance = (1.0 - distance / max_distance as f64).max(0.0);
      let frac = pseudo_random_unit(rx as f32, ry as f32) - 0.5;
      sum += frac * (relevance * relevance);
    }
  }
  sum
}

// Same kernel walk, but the distance is the signed maximum of the coordinate
// deltas rather than Euclidean. Points up-left of the sample get a distance
// below zero and a relevance above one, which is what stamps out the
// rectangular tile look.
fn grad_tile_value(kernel_size: i32, x_in: f32, y_in: f32) -> f64 {
  let max_distance = kernel_size / 2;
  let kernel_points = kernel_size * kernel_size;
  let sample_rate = 0.5;
  let mut sum = 0.0f64;
  for i in 0..kernel_points {
    let x = i % kernel_size;
    let y = i / kernel_size;
    let xi = (x - max_distance) as f32 + x_in;
    let yi = (y - max_distance) as f32 + y_in;
    let rx = round_half_up(xi);
    let ry = round_half_up(yi);
    let score = pseudo_random_byte(ry, rx);
    if (255.0 * sample_rate - 128.0) < score as f64 {
      let vx = (rx as f32 - x_in) as f64;
      let vy = (ry as f32 - y_in) as f64;
      let distance = vy.max(vx);
      let relevance = (1.0 - distance / max_distance as f64).max(0.0);
      let frac = pseudo_random_unit(rx as f32, ry as f32) - 0.5;
      sum += frac * (relevance * relevance);
    }
  }
  sum
}

// Cell variant: a higher sample rate, unsigned fractions and max-aggregation
// instead of a sum, so each sample point becomes the bright core of its own
// cell.
fn cells_value(kernel_size: i32, x_in: f32, y_in: f32) -> f64 {
  let max_distance = kernel_size / 2;
  let kernel_points = kernel_size * kernel_size;
  let sample_rate = 0.65;
  let mut grad = 0.0f64;
  for i in 0..kernel_points {
    let x = i % kernel_size;
    let y = i / kernel_size;
    let xi = (x - max_distance) as f32 + x_in;
    let yi = (y - max_distance) as f32 + y_in;
    let rx = round_half_up(xi);
    let ry = round_half_up(yi);
    let score = pseudo_random_byte(ry, rx);
    if (255.0 * sample_rate - 128.0) < score as f64 {
      let vx = (rx as f32 - x_in) as f64;
      let vy = (ry as f32 - y_in) as f64;
      let distance = (vx * vx + vy * vy).sqrt();
      let relevance = (1.0 - distance / max_distance as f64).max(0.0);
      let frac = pseudo_random_unit(rx as f32, ry as f32);
      grad = grad.max(frac * (relevance * relevance));
    }
  }
  grad
}

/// Raw smoothed value noise in `[0, 1]`.
pub fn stochastic(x: f32, y: f32) -> f32 {
  let kernel_size = 8;
  let sum = grad_value(kernel_size, x, y);
  (((sum * (12.0 / kernel_size as f64)).sin() + 1.0) / 2.0) as f32
}

/// Smooth height-map contour bands.
pub fn smooth_topology(x: f32, y: f32) -> f32 {
  let scale = 6.0;
  ((((stochastic(x / scale, y / scale) * 6.0) as f64 * std::f64::consts::PI).sin() + 1.0) / 2.0)
    as f32
}

/// Hard-edged height-map contours; the band value wraps instead of folding.
pub fn hard_topology(x: f32, y: f32) -> f32 {
  let scale = 6.0;
  (stochastic(x / scale, y / scale) * 6.0) % 1.0
}

/// Binary blobs: smoothed noise rounded to 0 or 1.
pub fn hard_spots(x: f32, y: f32) -> f32 {
  let scale = 4.0;
  round_half_up(stochastic(x / scale, y / scale)) as f32
}

/// Soft blobs: the kernel sum pushed through a steep sigmoid.
pub fn smooth_spots(x: f32, y: f32) -> f32 {
  let scale = 6.0;
  let kernel_size = 6;
  let sum = grad_value(kernel_size, x / scale, y / scale);
  sigmoid(sum * 64.0 / kernel_size as f64) as f32
}

/// High-frequency grain: mid values drop to zero, extremes go bright.
pub fn grainy(x: f32, y: f32) -> f32 {
  let scale = 2.0;
  let kernel_size = 4;
  let sum = grad_value(kernel_size, x / scale, y / scale);
  let stochastic = ((sum * (12.0 / kernel_size as f64)).sin() + 1.0) / 2.0;
  ((stochastic - 0.5) * 2.0).abs() as f32
}

/// Rectangular tile pattern.
pub fn tiles(x: f32, y: f32) -> f32 {
  let scale = 10.0;
  let kernel_size = 8;
  let sum = grad_tile_value(kernel_size, x / scale, y / scale);
  (((sum * (12.0 / kernel_size as f64)).sin() + 1.0) / 2.0) as f32
}

/// Cellular pattern with bright cores fading outward.
pub fn cells(x: f32, y: f32) -> f32 {
  let scale = 4.0;
  let kernel_size = 6;
  cells_value(kernel_size, x / scale, y / scale) as f32
}

/// Samples the noise field of the given kind. Every kind maps any finite
/// coordinate to a value in `[0, 1]`.
pub fn noise_value(kind: NoiseKind, x: f32, y: f32) -> f32 {
  match kind {
    NoiseKind::Stochastic => stochastic(x, y),
    NoiseKind::SmoothTopology => smooth_topology(x, y),
    NoiseKind::HardTopology => hard_topology(x, y),
    NoiseKind::SmoothSpots => smooth_spots(x, y),
    NoiseKind::HardSpots => hard_spots(x, y),
    NoiseKind::Grainy => grainy(x, y),
    NoiseKind::Tiles => tiles(x, y),
    NoiseKind::Cells => cells(x, y),
  }
}

/// The point the noise field is anchored at, in element coordinates.
pub fn noise_center(model: &BoxModel, spec: &NoiseSpec) -> Point {
  let ins = if spec.boundary == Boundary::CenterToContent {
    EdgeOffsets::symmetric(model.size.height / 2.0, model.size.width / 2.0)
  } else {
    model.boundary_insets(spec.boundary)
  };
  Point::new(ins.left + spec.offset.x, ins.top + spec.offset.y)
}

/// Builds the paint for a noise spec against the given box model.
///
/// Single color specs collapse to a flat fill; everything else rasterizes
/// the noise field into a cached texture.
pub fn build_paint(
  model: &BoxModel,
  spec: &NoiseSpec,
  luts: &GradientLutCache,
  textures: &PaintPixmapCache,
) -> Result<Option<GradientPaint>, RenderError> {
  let Some((&first, rest)) = spec.colors.split_first() else {
    return Ok(None);
  };
  if rest.is_empty() {
    return Ok(Some(GradientPaint::Solid(first)));
  }
  let width = model.size.width.ceil() as u32;
  let height = model.size.height.ceil() as u32;
  let center = noise_center(model, spec);
  let stops = gradient_stops(&spec.colors, &spec.fractions);
  let bucket = gradient_bucket(width.max(height));
  let pixmap = rasterize_noise_cached(
    textures,
    width,
    height,
    spec.kind,
    center,
    spec.scale,
    spec.rotation,
    &stops,
    luts,
    bucket,
  )?;
  Ok(pixmap.map(GradientPaint::Texture))
}

/// Rasterizes a noise field into a fresh pixmap.
///
/// Each pixel center is translated relative to the field center, rotated by
/// the inverse of the field rotation, stretched by the per-axis scale and
/// then sampled; the value in `[0, 1]` picks the color from the stop LUT
/// with values past the last stop clamping to its color.
pub fn rasterize_noise(
  width: u32,
  height: u32,
  kind: NoiseKind,
  center: Point,
  scale: Size,
  rotation: f32,
  stops: &[(f32, Rgba)],
  cache: &GradientLutCache,
  bucket: u16,
) -> Result<Option<Pixmap>, RenderError> {
  if width == 0 || height == 0 || stops.is_empty() {
    return Ok(None);
  }
  if !(scale.width > 0.0) || !(scale.height > 0.0) {
    return Ok(None);
  }

  let period = gradient_period(stops);
  let key = GradientCacheKey::new(stops, SpreadMode::Pad, period, bucket);
  let lut = cache.get_or_build(key, || {
    build_gradient_lut(stops, SpreadMode::Pad, period, bucket)
  });
  let Some(mut pixmap) = new_pixmap(width, height) else {
    return Ok(None);
  };

  let (sin, cos) = (rotation as f64).to_radians().sin_cos();
  let (sin, cos) = (sin as f32, cos as f32);
  let inv_sx = 1.0 / scale.width;
  let inv_sy = 1.0 / scale.height;
  let stride = width as usize;
  let pixels = pixmap.pixels_mut();
  for (y, row) in pixels.chunks_mut(stride).enumerate() {
    let v = y as f32 + 0.5 - center.y;
    let mut u = 0.5 - center.x;
    for pixel in row {
      let xr = (u * cos + v * sin) * inv_sx;
      let yr = (v * cos - u * sin) * inv_sy;
      *pixel = lut.sample(noise_value(kind, xr, yr));
      u += 1.0;
    }
  }
  Ok(Some(pixmap))
}

pub fn rasterize_noise_cached(
  pixmap_cache: &PaintPixmapCache,
  width: u32,
  height: u32,
  kind: NoiseKind,
  center: Point,
  scale: Size,
  rotation: f32,
  stops: &[(f32, Rgba)],
  cache: &GradientLutCache,
  bucket: u16,
) -> Result<Option<Arc<Pixmap>>, RenderError> {
  let Some(key) = PaintPixmapKey::noise(width, height, kind, center, scale, rotation, stops, bucket)
  else {
    return Ok(None);
  };
  pixmap_cache.get_or_insert(key, || {
    rasterize_noise(width, height, kind, center, scale, rotation, stops, cache, bucket)
  })
}
