//! Per-element render orchestration.
//!
//! [`StyleEngine`] owns the shared services of a rendering subsystem: the
//! font table, the gradient LUT and noise texture caches and the layer
//! raster cache. One [`ElementRenderer`] per styled element carries the
//! element's session state between paint passes: its region set and the
//! strong handles that keep its cached layer buffers alive.
//!
//! A paint pass walks the four layers in their fixed order. Layers that
//! fail the caching heuristic render straight onto the target canvas;
//! the rest render once into an offscreen buffer shared through the
//! raster cache and blit from there until their fingerprint changes.

use std::sync::Arc;

use crate::boxmodel::{BoxModel, UiLayer};
use crate::cache::{should_cache, LayerBuffer, LayerFingerprint, RasterCache, RasterCacheStats};
use crate::compositor::{render_layer, PaintServices};
use crate::error::ConfigError;
use crate::paint::canvas::Canvas;
use crate::paint::gradient::{GradientLutCache, PaintPixmapCache, PaintPixmapCacheStats};
use crate::paint::text::FontTable;
use crate::regions::RegionSet;
use crate::style::ElementStyle;

/// Shared rendering services plus the layer raster cache.
///
/// Single-threaded by contract; a host rendering from several threads
/// needs one engine per thread or external synchronization.
pub struct StyleEngine {
  fonts: FontTable,
  luts: GradientLutCache,
  textures: PaintPixmapCache,
  cache: RasterCache,
}

impl Default for StyleEngine {
  fn default() -> Self {
    Self::new()
  }
}

impl StyleEngine {
  pub fn new() -> Self {
    Self {
      fonts: FontTable::new(),
      luts: GradientLutCache::default(),
      textures: PaintPixmapCache::default(),
      cache: RasterCache::new(),
    }
  }

  /// Registers a font for text runs under a family name.
  pub fn register_font(
    &mut self,
    family: impl Into<String>,
    bytes: &[u8],
  ) -> Result<(), ConfigError> {
    self.fonts.register(family, bytes)
  }

  pub fn fonts(&self) -> &FontTable {
    &self.fonts
  }

  pub fn fonts_mut(&mut self) -> &mut FontTable {
    &mut self.fonts
  }

  /// Raster cache counters, for diagnostics and tests.
  pub fn cache_stats(&self) -> RasterCacheStats {
    self.cache.snapshot()
  }

  /// Noise and conic texture cache counters.
  pub fn texture_stats(&self) -> PaintPixmapCacheStats {
    self.textures.snapshot()
  }

  /// Paints all four layers of `style` onto `canvas`.
  ///
  /// The canvas is expected in its neutral state, covering the element's
  /// full rectangle with the origin at its top left corner. Layers paint
  /// in the fixed order background, content, border, foreground; each is
  /// either blitted from a cached buffer or rendered directly. A zero
  /// sized element paints nothing and releases the element's cache
  /// handles.
  pub fn render(
    &mut self,
    element: &mut ElementRenderer,
    style: &ElementStyle,
    model: &BoxModel,
    canvas: &mut Canvas,
  ) {
    if model.size.is_empty() {
      element.reset();
      return;
    }
    if element.regions.as_ref().is_some_and(|r| r.model() != model) {
      element.regions = None;
    }
    let ElementRenderer { regions, slots } = element;
    let regions = regions.get_or_insert_with(|| RegionSet::new(*model));
    let services = PaintServices {
      luts: &self.luts,
      textures: &self.textures,
      fonts: &self.fonts,
    };

    for (slot, layer) in slots.iter_mut().zip(UiLayer::ALL) {
      if !should_cache(layer, style, model) {
        slot.clear();
        render_layer(canvas, regions, style, layer, services);
        continue;
      }

      let fingerprint = LayerFingerprint::capture(style, model, layer);

      // Unchanged since the last pass: blit the held buffer, no lookup.
      if slot.fingerprint.as_ref() == Some(&fingerprint) {
        if let Some(buffer) = &slot.buffer {
          canvas.draw_pixmap(0, 0, buffer.pixmap(), 1.0);
          continue;
        }
      }

      slot.clear();
      if let Some(buffer) = self.cache.get(&fingerprint) {
        canvas.draw_pixmap(0, 0, buffer.pixmap(), 1.0);
        slot.fingerprint = Some(fingerprint);
        slot.buffer = Some(buffer);
        continue;
      }

      match Canvas::new(regions.width(), regions.height()) {
        Ok(mut offscreen) => {
          render_layer(&mut offscreen, regions, style, layer, services);
          let buffer = Arc::new(LayerBuffer::new(offscreen.into_pixmap()));
          canvas.draw_pixmap(0, 0, buffer.pixmap(), 1.0);
          self.cache.insert(fingerprint.clone(), &buffer);
          slot.fingerprint = Some(fingerprint);
          slot.buffer = Some(buffer);
        }
        Err(error) => {
          // Caching is an optimization only; a failed buffer falls back
          // to drawing straight onto the target.
          log::warn!("layer buffer allocation failed ({error}), rendering {layer:?} directly");
          render_layer(canvas, regions, style, layer, services);
        }
      }
    }
  }
}

/// Per-element session state carried between paint passes.
///
/// Holds the element's rasterized region set (rebuilt when the box model
/// changes) and, per layer, the last fingerprint with a strong handle on
/// its buffer. Dropping the renderer releases those handles, which is
/// what lets the raster cache reclaim the element's entries.
#[derive(Default)]
pub struct ElementRenderer {
  regions: Option<RegionSet>,
  slots: [LayerSlot; 4],
}

impl ElementRenderer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of layers currently pinned to a cached buffer.
  pub fn cached_layer_count(&self) -> usize {
    self.slots.iter().filter(|slot| slot.buffer.is_some()).count()
  }

  fn reset(&mut self) {
    self.regions = None;
    for slot in &mut self.slots {
      slot.clear();
    }
  }
}

#[derive(Default)]
struct LayerSlot {
  fingerprint: Option<LayerFingerprint>,
  buffer: Option<Arc<LayerBuffer>>,
}

impl LayerSlot {
  fn clear(&mut self) {
    self.fingerprint = None;
    self.buffer = None;
  }
}
