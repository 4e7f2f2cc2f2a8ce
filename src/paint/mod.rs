//! Painting and rasterization
//!
//! This module turns style declarations into pixels.
//!
//! # Responsibilities
//!
//! - **Canvas**: Stateful drawing surface over a tiny-skia pixmap with a
//!   save/restore stack for opacity, transform, blend mode and clip
//! - **Buffers**: Guarded pixmap allocation with a hard byte ceiling
//! - **Effects**: Renderers for images, gradients, noise fields, box
//!   shadows and text runs
//!
//! # Painting Order
//!
//! Within one layer the effect renderers always run in a fixed order:
//!
//! 1. Images
//! 2. Gradients
//! 3. Noise fields
//! 4. Shadows
//! 5. Text runs
//! 6. User painters
//!
//! The order across layers (background, content, border, foreground) is
//! driven by the compositor, not here.
//!
//! # Example
//!
//! ```rust,ignore
//! use lacquer::paint::canvas::Canvas;
//! use lacquer::{Rect, Rgba};
//!
//! let mut canvas = Canvas::new(200, 120)?;
//! canvas.fill_rect(Rect::from_xywh(10.0, 10.0, 60.0, 40.0), Rgba::rgb(200, 30, 30));
//! let pixmap = canvas.into_pixmap();
//! ```

pub mod canvas;
pub mod gradient;
pub mod image;
pub mod noise;
pub mod pixmap;
pub mod shadow;
pub mod text;

pub use canvas::Canvas;
pub use text::FontTable;
