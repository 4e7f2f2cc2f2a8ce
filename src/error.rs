//! Error types for the style rendering engine
//!
//! Two families of failures exist, handled differently:
//! - Configuration errors (`ConfigError`): a style specification is
//!   structurally invalid. These are raised when the spec is constructed
//!   and fail fast, before any rendering starts.
//! - Render errors (`RenderError`): a drawing step could not complete,
//!   usually a raster buffer that could not be allocated. During layer
//!   painting these are caught, logged and skipped so the remaining
//!   effects still render.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.

use thiserror::Error;

use crate::style::color::ColorParseError;

/// Result type alias for engine operations
///
/// # Examples
///
/// ```
/// use lacquer::Result;
///
/// fn build_style() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the engine
///
/// Each variant wraps the more specific error type of its phase.
#[derive(Error, Debug)]
pub enum Error {
  /// Style specification validation error
  #[error("Config error: {0}")]
  Config(#[from] ConfigError),

  /// Rendering or rasterization error
  #[error("Render error: {0}")]
  Render(#[from] RenderError),
}

/// Errors raised while validating a style specification
///
/// Raised by the spec constructors in the `style` module. A spec that
/// passes construction never fails validation again later; rendering
/// code can rely on its invariants.
///
/// # Examples
///
/// ```
/// use lacquer::error::ConfigError;
///
/// let error = ConfigError::InvalidGradient {
///     message: "stop fractions must be non-decreasing".to_string(),
/// };
/// assert!(format!("{}", error).contains("non-decreasing"));
/// ```
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
  /// Gradient specification is invalid
  #[error("Invalid gradient: {message}")]
  InvalidGradient { message: String },

  /// Noise specification is invalid
  #[error("Invalid noise paint: {message}")]
  InvalidNoise { message: String },

  /// Shadow specification is invalid
  #[error("Invalid shadow: {message}")]
  InvalidShadow { message: String },

  /// Image specification is invalid
  #[error("Invalid image: {message}")]
  InvalidImage { message: String },

  /// Font data could not be loaded
  #[error("Invalid font '{name}': {reason}")]
  InvalidFont { name: String, reason: String },

  /// A color string could not be parsed
  #[error("Invalid color: {0}")]
  Color(#[from] ColorParseError),
}

/// Errors raised while rendering
///
/// These happen during the paint phase when converting a style to
/// pixels. Inside the layer pipeline they are caught per effect and
/// logged; only surface-level failures (the host-facing entry points)
/// propagate them to the caller.
#[derive(Error, Debug, Clone)]
pub enum RenderError {
  /// Raster buffer creation failed
  #[error("Failed to create raster buffer: {width}x{height}")]
  SurfaceCreationFailed { width: u32, height: u32 },

  /// Raster buffer would exceed the allocation ceiling
  #[error("Raster buffer too large: {width}x{height} exceeds {max_bytes} bytes")]
  SurfaceTooLarge { width: u32, height: u32, max_bytes: usize },

  /// Raster buffer memory could not be reserved
  #[error("Failed to allocate {bytes} bytes for raster buffer")]
  AllocationFailed { bytes: usize },

  /// Paint operation failed
  #[error("Paint operation failed: {operation}")]
  PaintFailed { operation: String },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_error_invalid_gradient() {
    let error = ConfigError::InvalidGradient {
      message: "at least one color required".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Invalid gradient"));
    assert!(display.contains("at least one color"));
  }

  #[test]
  fn test_config_error_invalid_shadow() {
    let error = ConfigError::InvalidShadow {
      message: "blur radius must be finite".to_string(),
    };
    assert!(format!("{}", error).contains("blur radius"));
  }

  #[test]
  fn test_config_error_invalid_font() {
    let error = ConfigError::InvalidFont {
      name: "Inter".to_string(),
      reason: "unsupported table format".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Inter"));
    assert!(display.contains("unsupported table format"));
  }

  #[test]
  fn test_config_error_from_color_parse() {
    let parse_error = ColorParseError::UnknownName("blurple".to_string());
    let error: ConfigError = parse_error.into();
    assert!(matches!(error, ConfigError::Color(_)));
    assert!(format!("{}", error).contains("blurple"));
  }

  #[test]
  fn test_render_error_surface_creation() {
    let error = RenderError::SurfaceCreationFailed {
      width: 10000,
      height: 10000,
    };
    assert!(format!("{}", error).contains("10000"));
  }

  #[test]
  fn test_render_error_surface_too_large() {
    let error = RenderError::SurfaceTooLarge {
      width: 100000,
      height: 100000,
      max_bytes: 1 << 30,
    };
    let display = format!("{}", error);
    assert!(display.contains("100000"));
    assert!(display.contains("bytes"));
  }

  #[test]
  fn test_render_error_paint_failed() {
    let error = RenderError::PaintFailed {
      operation: "fill_region".to_string(),
    };
    assert!(format!("{}", error).contains("fill_region"));
  }

  #[test]
  fn test_error_from_config_error() {
    let config_error = ConfigError::InvalidNoise {
      message: "test".to_string(),
    };
    let error: Error = config_error.into();
    assert!(matches!(error, Error::Config(_)));
  }

  #[test]
  fn test_error_from_render_error() {
    let render_error = RenderError::AllocationFailed { bytes: 4096 };
    let error: Error = render_error.into();
    assert!(matches!(error, Error::Render(_)));
  }

  #[test]
  fn test_result_type_alias() {
    fn returns_result() -> Result<i32> {
      Ok(42)
    }
    assert_eq!(returns_result().unwrap(), 42);
  }

  #[test]
  fn test_error_trait_implemented() {
    let error = Error::Render(RenderError::PaintFailed {
      operation: "test".to_string(),
    });
    // If this compiles, Error implements std::error::Error
    let _: &dyn std::error::Error = &error;
  }

  #[test]
  fn test_clone_errors() {
    let config_error = ConfigError::InvalidImage {
      message: "test".to_string(),
    };
    let cloned = config_error.clone();
    assert_eq!(format!("{}", config_error), format!("{}", cloned));
  }
}
