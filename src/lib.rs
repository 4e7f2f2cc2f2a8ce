pub mod boxmodel;
pub mod cache;
pub mod compositor;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod regions;
pub mod style;

pub use error::{Error, Result};
pub use geometry::{BorderRadii, BorderRadius, EdgeOffsets, Point, Rect, Size};
pub use engine::{ElementRenderer, StyleEngine};

pub use boxmodel::{BoxModel, ComponentArea, UiLayer};
pub use paint::canvas::Canvas;
pub use regions::{Region, RegionSet};

// Re-export the color types from the style module
pub use style::color::{ColorParseError, Rgba};
pub use style::{ElementStyle, Painter, PainterSpec};
