//! Layer compositing.
//!
//! An element paints as four layers in a fixed order: background, content,
//! border, foreground. Within a layer the stages always run in the same
//! sequence: base color fills, images, gradients, noise fields, shadows,
//! text runs and finally user painters, each stage in name order. Every
//! stage skips silently when its style has nothing to draw, and a failing
//! stage logs instead of taking the rest of the layer down with it.
//!
//! User painters are the one stage with arbitrary code behind it. Each one
//! runs against a freshly reset canvas state clipped to its configured
//! area, bracketed so that neither unbalanced save/restore calls nor a
//! panic can leak state into later stages.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::boxmodel::{Edge, UiLayer};
use crate::paint::canvas::Canvas;
use crate::paint::gradient::{self, GradientLutCache, PaintPixmapCache};
use crate::paint::image::render_image;
use crate::paint::noise;
use crate::paint::shadow::render_shadow;
use crate::paint::text::{render_text, FontTable};
use crate::regions::RegionSet;
use crate::style::{ElementStyle, PainterSpec};

/// Shared resources the paint stages draw from.
///
/// The engine owns one of each; a layer pass only borrows them.
#[derive(Clone, Copy)]
pub struct PaintServices<'a> {
  pub luts: &'a GradientLutCache,
  pub textures: &'a PaintPixmapCache,
  pub fonts: &'a FontTable,
}

/// Paints one layer of `style` onto `canvas`.
///
/// Expects the canvas state to be neutral and leaves it that way. Base
/// color fills are layer-bound: foundation and background colors paint
/// only on [`UiLayer::Background`], edge colors only on
/// [`UiLayer::Border`]. Everything else comes from the layer's own
/// content set.
pub fn render_layer(
  canvas: &mut Canvas,
  regions: &RegionSet,
  style: &ElementStyle,
  layer: UiLayer,
  services: PaintServices<'_>,
) {
  match layer {
    UiLayer::Background => render_base_background(canvas, regions, style),
    UiLayer::Border => render_border_colors(canvas, regions, style),
    UiLayer::Content | UiLayer::Foreground => {}
  }

  let content = style.layer(layer);
  for spec in content.images.values() {
    render_image(canvas, regions, spec);
  }
  for (name, spec) in &content.gradients {
    match gradient::build_paint(regions.model(), spec, services.luts, services.textures) {
      Ok(Some(paint)) => paint.fill(canvas, regions.area(spec.area)),
      Ok(None) => {}
      Err(error) => log::error!("gradient '{name}' on {layer:?} failed: {error}"),
    }
  }
  for (name, spec) in &content.noises {
    match noise::build_paint(regions.model(), spec, services.luts, services.textures) {
      Ok(Some(paint)) => paint.fill(canvas, regions.area(spec.area)),
      Ok(None) => {}
      Err(error) => log::error!("noise '{name}' on {layer:?} failed: {error}"),
    }
  }
  for spec in content.shadows.values() {
    render_shadow(canvas, regions, spec);
  }
  for spec in content.texts.values() {
    render_text(canvas, regions, spec, services.fonts);
  }
  for (name, spec) in &content.painters {
    run_painter(canvas, regions, name, spec, layer);
  }
}

/// The two base fills owned by the background layer.
///
/// The foundation color covers the exterior (the margin ring outside the
/// border), the background color the body inside it.
fn render_base_background(canvas: &mut Canvas, regions: &RegionSet, style: &ElementStyle) {
  if let Some(color) = style.foundation.filter(|c| c.is_visible()) {
    canvas.fill_region(regions.exterior(), color);
  }
  if let Some(color) = style.background.filter(|c| c.is_visible()) {
    canvas.fill_region(regions.body(), color);
  }
}

/// Fills the border ring with the configured edge colors.
///
/// A uniform color set paints the whole ring in one fill, keeping rounded
/// corners seamless. Mixed colors fill one edge strip each; adjacent
/// strips share their corner squares, so a later edge wins the overlap.
fn render_border_colors(canvas: &mut Canvas, regions: &RegionSet, style: &ElementStyle) {
  let colors = &style.border_colors;
  if !regions.model().has_border() || !colors.any_visible() {
    return;
  }
  if colors.is_uniform() {
    // any_visible guarantees the shared color is present and visible
    if let Some(color) = colors.top {
      canvas.fill_region(regions.border(), color);
    }
    return;
  }
  for edge in Edge::ALL {
    if let Some(color) = colors.edge(edge).filter(|c| c.is_visible()) {
      let strip = regions.edge_strip(edge);
      canvas.fill_region(&strip, color);
    }
  }
}

/// Runs one user painter, fenced off from the rest of the pipeline.
///
/// The painter sees a neutral canvas state with its configured clip area
/// applied. Afterwards the state stack is cut back to the depth recorded
/// before the painter ran and the live state is reset, so neither
/// unbalanced save/restore calls nor leftover clip, transform or opacity
/// survive. A panic is caught and logged; the pass continues with the
/// next painter.
fn run_painter(
  canvas: &mut Canvas,
  regions: &RegionSet,
  name: &str,
  spec: &PainterSpec,
  layer: UiLayer,
) {
  let depth = canvas.state_depth();
  canvas.save();
  canvas.reset_state();
  canvas.set_clip_region(regions.area(spec.clip));

  let outcome = catch_unwind(AssertUnwindSafe(|| spec.painter.paint(canvas)));

  canvas.restore_to_depth(depth);
  canvas.reset_state();
  if let Err(payload) = outcome {
    log::warn!("painter '{name}' on {layer:?} panicked: {}", panic_message(payload.as_ref()));
  }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
  if let Some(message) = payload.downcast_ref::<&str>() {
    message
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message
  } else {
    "opaque panic payload"
  }
}
