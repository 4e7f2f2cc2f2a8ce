//! Color types for style specifications
//!
//! Styles name colors either programmatically as [`Rgba`] values or as
//! strings parsed with [`Rgba::parse`]. The parser accepts hex notation,
//! `rgb()`/`rgba()` functions, the standard named colors, and shading
//! prefixes (`dark`/`darker`, `light`/`lighter`/`bright`/`brighter`,
//! `transparent`).
//!
//! # Examples
//!
//! ```
//! use lacquer::style::Rgba;
//!
//! let a = Rgba::parse("#ff0000").unwrap();
//! let b = Rgba::parse("rgb(255, 0, 0)").unwrap();
//! let c = Rgba::parse("red").unwrap();
//!
//! assert_eq!(a, b);
//! assert_eq!(b, c);
//! ```

use std::fmt;

/// RGBA color representation
///
/// Represents a color in the RGB color space with an alpha channel.
/// - R, G, B: 0-255 (stored as u8)
/// - A: 0.0-1.0 (stored as f32, where 0.0 is fully transparent, 1.0 is fully opaque)
///
/// # Examples
///
/// ```
/// use lacquer::style::Rgba;
///
/// let red = Rgba::new(255, 0, 0, 1.0);
/// let semi_transparent_blue = Rgba::new(0, 0, 255, 0.5);
/// let transparent = Rgba::TRANSPARENT;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
  /// Red component (0-255)
  pub r: u8,
  /// Green component (0-255)
  pub g: u8,
  /// Blue component (0-255)
  pub b: u8,
  /// Alpha component (0.0-1.0)
  pub a: f32,
}

/// Shading factor used by [`Rgba::darker`] and [`Rgba::brighter`]
const SHADE_FACTOR: f32 = 0.7;

impl Rgba {
  /// Fully transparent black
  pub const TRANSPARENT: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 0.0,
  };

  /// Opaque black
  pub const BLACK: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 1.0,
  };

  /// Opaque white
  pub const WHITE: Self = Self {
    r: 255,
    g: 255,
    b: 255,
    a: 1.0,
  };

  /// Opaque red
  pub const RED: Self = Self {
    r: 255,
    g: 0,
    b: 0,
    a: 1.0,
  };

  /// Opaque green
  pub const GREEN: Self = Self {
    r: 0,
    g: 255,
    b: 0,
    a: 1.0,
  };

  /// Opaque blue
  pub const BLUE: Self = Self {
    r: 0,
    g: 0,
    b: 255,
    a: 1.0,
  };

  /// Creates a new RGBA color
  ///
  /// # Arguments
  /// * `r` - Red component (0-255)
  /// * `g` - Green component (0-255)
  /// * `b` - Blue component (0-255)
  /// * `a` - Alpha component (0.0-1.0)
  pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
    Self { r, g, b, a }
  }

  /// Creates an opaque RGB color (alpha = 1.0)
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::style::Rgba;
  ///
  /// let purple = Rgba::rgb(128, 0, 128);
  /// assert_eq!(purple.a, 1.0);
  /// ```
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: 1.0 }
  }

  /// Returns true if the color is fully transparent
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::style::Rgba;
  ///
  /// assert!(Rgba::TRANSPARENT.is_transparent());
  /// assert!(!Rgba::BLACK.is_transparent());
  /// ```
  pub fn is_transparent(self) -> bool {
    self.a <= 0.0
  }

  /// Returns true if the color contributes any pixels when painted
  pub fn is_visible(self) -> bool {
    self.a > 0.0
  }

  /// Returns true if the color is fully opaque
  pub fn is_opaque(self) -> bool {
    self.a >= 1.0
  }

  /// Returns a new color with the given alpha value
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::style::Rgba;
  ///
  /// let red = Rgba::RED;
  /// let semi_transparent_red = red.with_alpha(0.5);
  /// assert_eq!(semi_transparent_red.a, 0.5);
  /// ```
  pub fn with_alpha(self, alpha: f32) -> Self {
    Self {
      r: self.r,
      g: self.g,
      b: self.b,
      a: alpha.clamp(0.0, 1.0),
    }
  }

  /// Returns a darker shade of this color
  ///
  /// Each channel is scaled by a fixed factor; alpha is preserved.
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::style::Rgba;
  ///
  /// let dark_red = Rgba::RED.darker();
  /// assert_eq!(dark_red.r, 178);
  /// assert_eq!(dark_red.g, 0);
  /// ```
  pub fn darker(self) -> Self {
    Self {
      r: (self.r as f32 * SHADE_FACTOR) as u8,
      g: (self.g as f32 * SHADE_FACTOR) as u8,
      b: (self.b as f32 * SHADE_FACTOR) as u8,
      a: self.a,
    }
  }

  /// Returns a brighter shade of this color
  ///
  /// Inverse of [`darker`](Self::darker). Channels already at zero are
  /// lifted to a small floor first so pure black can brighten at all.
  pub fn brighter(self) -> Self {
    let floor = (1.0 / (1.0 - SHADE_FACTOR)) as u8;
    if self.r == 0 && self.g == 0 && self.b == 0 {
      return Self {
        r: floor,
        g: floor,
        b: floor,
        a: self.a,
      };
    }
    let lift = |c: u8| if c > 0 && c < floor { floor } else { c };
    let scale = |c: u8| ((c as f32 / SHADE_FACTOR) as u16).min(255) as u8;
    Self {
      r: scale(lift(self.r)),
      g: scale(lift(self.g)),
      b: scale(lift(self.b)),
      a: self.a,
    }
  }

  /// Parse a color from a string
  ///
  /// Supports:
  /// - Hex: #RGB, #RRGGBB, #RGBA, #RRGGBBAA
  /// - RGB: rgb(r, g, b), rgba(r, g, b, a)
  /// - Named colors: red, steelblue, etc.
  /// - Shading prefixes: "dark red", "lighter gray", "transparent salmon"
  /// - The bare keyword "transparent"
  ///
  /// A leading "transparent" before a color name halves its alpha.
  ///
  /// # Examples
  ///
  /// ```
  /// use lacquer::style::Rgba;
  ///
  /// assert!(Rgba::parse("#abc").is_ok());
  /// assert!(Rgba::parse("rgba(10, 20, 30, 0.5)").is_ok());
  /// assert!(Rgba::parse("dark salmon").is_ok());
  /// assert!(Rgba::parse("no such color").is_err());
  /// ```
  pub fn parse(s: &str) -> Result<Self, ColorParseError> {
    let s = s.trim();
    if s.is_empty() {
      return Err(ColorParseError::InvalidFormat(s.to_string()));
    }

    if let Some(hex) = s.strip_prefix('#') {
      return parse_hex(s, hex);
    }
    if let Some(hex) = s.strip_prefix("0x") {
      return parse_hex(s, hex);
    }

    if s.starts_with("rgb(") || s.starts_with("rgba(") {
      return parse_rgb(s);
    }

    parse_word(s)
  }
}

impl fmt::Display for Rgba {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.a == 1.0 {
      write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    } else {
      write!(f, "rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
  }
}

/// Parse error for color strings
#[derive(Debug, Clone, PartialEq)]
pub enum ColorParseError {
  InvalidFormat(String),
  InvalidHex(String),
  InvalidComponent(String),
  UnknownName(String),
}

impl fmt::Display for ColorParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ColorParseError::InvalidFormat(s) => write!(f, "Invalid color format: {}", s),
      ColorParseError::InvalidHex(s) => write!(f, "Invalid hex color: {}", s),
      ColorParseError::InvalidComponent(s) => write!(f, "Invalid color component: {}", s),
      ColorParseError::UnknownName(s) => write!(f, "Unknown color name: {}", s),
    }
  }
}

impl std::error::Error for ColorParseError {}

/// Parse the digits of a hex color (#RGB, #RRGGBB, #RGBA, #RRGGBBAA)
fn parse_hex(full: &str, hex: &str) -> Result<Rgba, ColorParseError> {
  let nibble = |range: &str| -> Result<u8, ColorParseError> {
    u8::from_str_radix(&range.repeat(2), 16).map_err(|_| ColorParseError::InvalidHex(full.to_string()))
  };
  let byte = |range: &str| -> Result<u8, ColorParseError> {
    u8::from_str_radix(range, 16).map_err(|_| ColorParseError::InvalidHex(full.to_string()))
  };

  let (r, g, b, a) = match hex.len() {
    3 => (nibble(&hex[0..1])?, nibble(&hex[1..2])?, nibble(&hex[2..3])?, 1.0),
    4 => (
      nibble(&hex[0..1])?,
      nibble(&hex[1..2])?,
      nibble(&hex[2..3])?,
      nibble(&hex[3..4])? as f32 / 255.0,
    ),
    6 => (byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 1.0),
    8 => (
      byte(&hex[0..2])?,
      byte(&hex[2..4])?,
      byte(&hex[4..6])?,
      byte(&hex[6..8])? as f32 / 255.0,
    ),
    _ => return Err(ColorParseError::InvalidHex(full.to_string())),
  };

  Ok(Rgba::new(r, g, b, a))
}

/// Parse rgb() or rgba() function
fn parse_rgb(s: &str) -> Result<Rgba, ColorParseError> {
  let start = s
    .find('(')
    .ok_or_else(|| ColorParseError::InvalidFormat(s.to_string()))?;
  let end = s
    .find(')')
    .ok_or_else(|| ColorParseError::InvalidFormat(s.to_string()))?;
  if end < start {
    return Err(ColorParseError::InvalidFormat(s.to_string()));
  }
  let inner = &s[start + 1..end];

  let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();
  if parts.len() < 3 || parts.len() > 4 {
    return Err(ColorParseError::InvalidFormat(s.to_string()));
  }

  let r = parse_color_component(parts[0])?;
  let g = parse_color_component(parts[1])?;
  let b = parse_color_component(parts[2])?;
  let a = if parts.len() == 4 {
    parts[3]
      .parse::<f32>()
      .map_err(|_| ColorParseError::InvalidComponent(parts[3].to_string()))?
      .clamp(0.0, 1.0)
  } else {
    1.0
  };

  Ok(Rgba::new(r, g, b, a))
}

/// Parse a color component (0-255 or 0-100%)
fn parse_color_component(s: &str) -> Result<u8, ColorParseError> {
  if let Some(percent_str) = s.strip_suffix('%') {
    let percent = percent_str
      .parse::<f32>()
      .map_err(|_| ColorParseError::InvalidComponent(s.to_string()))?;
    if !(0.0..=100.0).contains(&percent) {
      return Err(ColorParseError::InvalidComponent(s.to_string()));
    }
    Ok((percent / 100.0 * 255.0).round() as u8)
  } else {
    s.parse::<u8>()
      .map_err(|_| ColorParseError::InvalidComponent(s.to_string()))
  }
}

/// Parse a named color, possibly with shading prefixes
fn parse_word(s: &str) -> Result<Rgba, ColorParseError> {
  let mut word = s.to_lowercase();
  let mut transparent = false;

  if let Some(rest) = word.strip_prefix("transparent") {
    transparent = true;
    word = rest.trim().to_string();
    if word.is_empty() {
      return Ok(Rgba::TRANSPARENT);
    }
  }

  // Longer prefixes first so "darker" is not consumed as "dark" + "er ..."
  let shaders: [(&str, fn(Rgba) -> Rgba); 6] = [
    ("darker", Rgba::darker),
    ("dark", Rgba::darker),
    ("lighter", Rgba::brighter),
    ("light", Rgba::brighter),
    ("brighter", Rgba::brighter),
    ("bright", Rgba::brighter),
  ];

  let mut color = named_color(&word);
  if color.is_none() {
    for (prefix, shade) in shaders {
      if let Some(rest) = word.strip_prefix(prefix) {
        if let Some(base) = named_color(rest.trim()) {
          color = Some(shade(base));
          break;
        }
      }
    }
  }

  match color {
    Some(c) if transparent => Ok(c.with_alpha(0.5)),
    Some(c) => Ok(c),
    None => Err(ColorParseError::UnknownName(s.to_string())),
  }
}

/// Standard named color table (CSS keyword set)
fn named_color(s: &str) -> Option<Rgba> {
  match s {
    "aliceblue" => Some(Rgba::rgb(240, 248, 255)),
    "antiquewhite" => Some(Rgba::rgb(250, 235, 215)),
    "aqua" => Some(Rgba::rgb(0, 255, 255)),
    "aquamarine" => Some(Rgba::rgb(127, 255, 212)),
    "azure" => Some(Rgba::rgb(240, 255, 255)),
    "beige" => Some(Rgba::rgb(245, 245, 220)),
    "bisque" => Some(Rgba::rgb(255, 228, 196)),
    "black" => Some(Rgba::BLACK),
    "blanchedalmond" => Some(Rgba::rgb(255, 235, 205)),
    "blue" => Some(Rgba::BLUE),
    "blueviolet" => Some(Rgba::rgb(138, 43, 226)),
    "brown" => Some(Rgba::rgb(165, 42, 42)),
    "burlywood" => Some(Rgba::rgb(222, 184, 135)),
    "cadetblue" => Some(Rgba::rgb(95, 158, 160)),
    "chartreuse" => Some(Rgba::rgb(127, 255, 0)),
    "chocolate" => Some(Rgba::rgb(210, 105, 30)),
    "coral" => Some(Rgba::rgb(255, 127, 80)),
    "cornflowerblue" => Some(Rgba::rgb(100, 149, 237)),
    "cornsilk" => Some(Rgba::rgb(255, 248, 220)),
    "crimson" => Some(Rgba::rgb(220, 20, 60)),
    "cyan" => Some(Rgba::rgb(0, 255, 255)),
    "darkblue" => Some(Rgba::rgb(0, 0, 139)),
    "darkcyan" => Some(Rgba::rgb(0, 139, 139)),
    "darkgoldenrod" => Some(Rgba::rgb(184, 134, 11)),
    "darkgray" | "darkgrey" => Some(Rgba::rgb(169, 169, 169)),
    "darkgreen" => Some(Rgba::rgb(0, 100, 0)),
    "darkkhaki" => Some(Rgba::rgb(189, 183, 107)),
    "darkmagenta" => Some(Rgba::rgb(139, 0, 139)),
    "darkolivegreen" => Some(Rgba::rgb(85, 107, 47)),
    "darkorange" => Some(Rgba::rgb(255, 140, 0)),
    "darkorchid" => Some(Rgba::rgb(153, 50, 204)),
    "darkred" => Some(Rgba::rgb(139, 0, 0)),
    "darksalmon" => Some(Rgba::rgb(233, 150, 122)),
    "darkseagreen" => Some(Rgba::rgb(143, 188, 143)),
    "darkslateblue" => Some(Rgba::rgb(72, 61, 139)),
    "darkslategray" | "darkslategrey" => Some(Rgba::rgb(47, 79, 79)),
    "darkturquoise" => Some(Rgba::rgb(0, 206, 209)),
    "darkviolet" => Some(Rgba::rgb(148, 0, 211)),
    "deeppink" => Some(Rgba::rgb(255, 20, 147)),
    "deepskyblue" => Some(Rgba::rgb(0, 191, 255)),
    "dimgray" | "dimgrey" => Some(Rgba::rgb(105, 105, 105)),
    "dodgerblue" => Some(Rgba::rgb(30, 144, 255)),
    "firebrick" => Some(Rgba::rgb(178, 34, 34)),
    "floralwhite" => Some(Rgba::rgb(255, 250, 240)),
    "forestgreen" => Some(Rgba::rgb(34, 139, 34)),
    "fuchsia" | "magenta" => Some(Rgba::rgb(255, 0, 255)),
    "gainsboro" => Some(Rgba::rgb(220, 220, 220)),
    "ghostwhite" => Some(Rgba::rgb(248, 248, 255)),
    "gold" => Some(Rgba::rgb(255, 215, 0)),
    "goldenrod" => Some(Rgba::rgb(218, 165, 32)),
    "gray" | "grey" => Some(Rgba::rgb(128, 128, 128)),
    "green" => Some(Rgba::rgb(0, 128, 0)),
    "greenyellow" => Some(Rgba::rgb(173, 255, 47)),
    "honeydew" => Some(Rgba::rgb(240, 255, 240)),
    "hotpink" => Some(Rgba::rgb(255, 105, 180)),
    "indianred" => Some(Rgba::rgb(205, 92, 92)),
    "indigo" => Some(Rgba::rgb(75, 0, 130)),
    "ivory" => Some(Rgba::rgb(255, 255, 240)),
    "khaki" => Some(Rgba::rgb(240, 230, 140)),
    "lavender" => Some(Rgba::rgb(230, 230, 250)),
    "lavenderblush" => Some(Rgba::rgb(255, 240, 245)),
    "lawngreen" => Some(Rgba::rgb(124, 252, 0)),
    "lemonchiffon" => Some(Rgba::rgb(255, 250, 205)),
    "lightblue" => Some(Rgba::rgb(173, 216, 230)),
    "lightcoral" => Some(Rgba::rgb(240, 128, 128)),
    "lightcyan" => Some(Rgba::rgb(224, 255, 255)),
    "lightgoldenrodyellow" => Some(Rgba::rgb(250, 250, 210)),
    "lightgray" | "lightgrey" => Some(Rgba::rgb(211, 211, 211)),
    "lightgreen" => Some(Rgba::rgb(144, 238, 144)),
    "lightpink" => Some(Rgba::rgb(255, 182, 193)),
    "lightsalmon" => Some(Rgba::rgb(255, 160, 122)),
    "lightseagreen" => Some(Rgba::rgb(32, 178, 170)),
    "lightskyblue" => Some(Rgba::rgb(135, 206, 250)),
    "lightslategray" | "lightslategrey" => Some(Rgba::rgb(119, 136, 153)),
    "lightsteelblue" => Some(Rgba::rgb(176, 196, 222)),
    "lightyellow" => Some(Rgba::rgb(255, 255, 224)),
    "lime" => Some(Rgba::rgb(0, 255, 0)),
    "limegreen" => Some(Rgba::rgb(50, 205, 50)),
    "linen" => Some(Rgba::rgb(250, 240, 230)),
    "maroon" => Some(Rgba::rgb(128, 0, 0)),
    "mediumaquamarine" => Some(Rgba::rgb(102, 205, 170)),
    "mediumblue" => Some(Rgba::rgb(0, 0, 205)),
    "mediumorchid" => Some(Rgba::rgb(186, 85, 211)),
    "mediumpurple" => Some(Rgba::rgb(147, 112, 219)),
    "mediumseagreen" => Some(Rgba::rgb(60, 179, 113)),
    "mediumslateblue" => Some(Rgba::rgb(123, 104, 238)),
    "mediumspringgreen" => Some(Rgba::rgb(0, 250, 154)),
    "mediumturquoise" => Some(Rgba::rgb(72, 209, 204)),
    "mediumvioletred" => Some(Rgba::rgb(199, 21, 133)),
    "midnightblue" => Some(Rgba::rgb(25, 25, 112)),
    "mintcream" => Some(Rgba::rgb(245, 255, 250)),
    "mistyrose" => Some(Rgba::rgb(255, 228, 225)),
    "moccasin" => Some(Rgba::rgb(255, 228, 181)),
    "navajowhite" => Some(Rgba::rgb(255, 222, 173)),
    "navy" => Some(Rgba::rgb(0, 0, 128)),
    "oldlace" => Some(Rgba::rgb(253, 245, 230)),
    "olive" => Some(Rgba::rgb(128, 128, 0)),
    "olivedrab" => Some(Rgba::rgb(107, 142, 35)),
    "orange" => Some(Rgba::rgb(255, 165, 0)),
    "orangered" => Some(Rgba::rgb(255, 69, 0)),
    "orchid" => Some(Rgba::rgb(218, 112, 214)),
    "palegoldenrod" => Some(Rgba::rgb(238, 232, 170)),
    "palegreen" => Some(Rgba::rgb(152, 251, 152)),
    "paleturquoise" => Some(Rgba::rgb(175, 238, 238)),
    "palevioletred" => Some(Rgba::rgb(219, 112, 147)),
    "papayawhip" => Some(Rgba::rgb(255, 239, 213)),
    "peachpuff" => Some(Rgba::rgb(255, 218, 185)),
    "peru" => Some(Rgba::rgb(205, 133, 63)),
    "pink" => Some(Rgba::rgb(255, 192, 203)),
    "plum" => Some(Rgba::rgb(221, 160, 221)),
    "powderblue" => Some(Rgba::rgb(176, 224, 230)),
    "purple" => Some(Rgba::rgb(128, 0, 128)),
    "rebeccapurple" => Some(Rgba::rgb(102, 51, 153)),
    "red" => Some(Rgba::RED),
    "rosybrown" => Some(Rgba::rgb(188, 143, 143)),
    "royalblue" => Some(Rgba::rgb(65, 105, 225)),
    "saddlebrown" => Some(Rgba::rgb(139, 69, 19)),
    "salmon" => Some(Rgba::rgb(250, 128, 114)),
    "sandybrown" => Some(Rgba::rgb(244, 164, 96)),
    "seagreen" => Some(Rgba::rgb(46, 139, 87)),
    "seashell" => Some(Rgba::rgb(255, 245, 238)),
    "sienna" => Some(Rgba::rgb(160, 82, 45)),
    "silver" => Some(Rgba::rgb(192, 192, 192)),
    "skyblue" => Some(Rgba::rgb(135, 206, 235)),
    "slateblue" => Some(Rgba::rgb(106, 90, 205)),
    "slategray" | "slategrey" => Some(Rgba::rgb(112, 128, 144)),
    "snow" => Some(Rgba::rgb(255, 250, 250)),
    "springgreen" => Some(Rgba::rgb(0, 255, 127)),
    "steelblue" => Some(Rgba::rgb(70, 130, 180)),
    "tan" => Some(Rgba::rgb(210, 180, 140)),
    "teal" => Some(Rgba::rgb(0, 128, 128)),
    "thistle" => Some(Rgba::rgb(216, 191, 216)),
    "tomato" => Some(Rgba::rgb(255, 99, 71)),
    "turquoise" => Some(Rgba::rgb(64, 224, 208)),
    "violet" => Some(Rgba::rgb(238, 130, 238)),
    "wheat" => Some(Rgba::rgb(245, 222, 179)),
    "white" => Some(Rgba::WHITE),
    "whitesmoke" => Some(Rgba::rgb(245, 245, 245)),
    "yellow" => Some(Rgba::rgb(255, 255, 0)),
    "yellowgreen" => Some(Rgba::rgb(154, 205, 50)),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rgba_creation() {
    let color = Rgba::new(255, 128, 0, 1.0);
    assert_eq!(color.r, 255);
    assert_eq!(color.g, 128);
    assert_eq!(color.b, 0);
    assert_eq!(color.a, 1.0);
  }

  #[test]
  fn test_rgba_constants() {
    assert_eq!(Rgba::BLACK, Rgba::new(0, 0, 0, 1.0));
    assert_eq!(Rgba::WHITE, Rgba::new(255, 255, 255, 1.0));
    assert_eq!(Rgba::RED, Rgba::new(255, 0, 0, 1.0));
    assert_eq!(Rgba::TRANSPARENT, Rgba::new(0, 0, 0, 0.0));
  }

  #[test]
  fn test_rgba_with_alpha() {
    let color = Rgba::RED.with_alpha(0.5);
    assert_eq!(color.a, 0.5);
    assert_eq!(color.r, 255);

    // Out-of-range alphas are clamped
    assert_eq!(Rgba::RED.with_alpha(3.0).a, 1.0);
    assert_eq!(Rgba::RED.with_alpha(-1.0).a, 0.0);
  }

  #[test]
  fn test_rgba_visibility() {
    assert!(Rgba::TRANSPARENT.is_transparent());
    assert!(!Rgba::BLACK.is_transparent());
    assert!(Rgba::new(0, 0, 0, 0.5).is_visible());
    assert!(Rgba::BLACK.is_opaque());
    assert!(!Rgba::new(0, 0, 0, 0.5).is_opaque());
  }

  #[test]
  fn test_darker() {
    let dark = Rgba::rgb(100, 200, 0).darker();
    assert_eq!(dark.r, 70);
    assert_eq!(dark.g, 140);
    assert_eq!(dark.b, 0);
  }

  #[test]
  fn test_brighter() {
    let bright = Rgba::rgb(70, 140, 0).brighter();
    assert_eq!(bright.r, 100);
    assert_eq!(bright.g, 200);
    assert_eq!(bright.b, 0);

    // Black has nothing to scale, so it bumps up to the floor
    let from_black = Rgba::BLACK.brighter();
    assert!(from_black.r > 0);

    // Saturates instead of wrapping
    assert_eq!(Rgba::rgb(250, 250, 250).brighter().r, 255);
  }

  #[test]
  fn test_parse_hex_3() {
    assert_eq!(Rgba::parse("#f00").unwrap(), Rgba::RED);
  }

  #[test]
  fn test_parse_hex_6() {
    assert_eq!(Rgba::parse("#ff0000").unwrap(), Rgba::RED);
    assert_eq!(Rgba::parse("0xff0000").unwrap(), Rgba::RED);
  }

  #[test]
  fn test_parse_hex_with_alpha() {
    let rgba = Rgba::parse("#f008").unwrap();
    assert_eq!(rgba.r, 255);
    assert!((rgba.a - 0.533).abs() < 0.01); // 0x88 / 0xFF

    let rgba = Rgba::parse("#ff000080").unwrap();
    assert_eq!(rgba.r, 255);
    assert!((rgba.a - 0.5).abs() < 0.01);
  }

  #[test]
  fn test_parse_rgb() {
    assert_eq!(Rgba::parse("rgb(255, 0, 0)").unwrap(), Rgba::RED);
    assert_eq!(Rgba::parse("rgb(100%, 0%, 0%)").unwrap(), Rgba::RED);
  }

  #[test]
  fn test_parse_rgba() {
    let rgba = Rgba::parse("rgba(255, 0, 0, 0.5)").unwrap();
    assert_eq!(rgba.r, 255);
    assert_eq!(rgba.a, 0.5);
  }

  #[test]
  fn test_parse_named() {
    assert_eq!(Rgba::parse("red").unwrap(), Rgba::RED);
    assert_eq!(Rgba::parse("RED").unwrap(), Rgba::RED);
    let rp = Rgba::parse("rebeccapurple").unwrap();
    assert_eq!((rp.r, rp.g, rp.b), (102, 51, 153));
  }

  #[test]
  fn test_parse_shading_prefixes() {
    assert_eq!(Rgba::parse("dark red").unwrap(), Rgba::RED.darker());
    assert_eq!(Rgba::parse("darker red").unwrap(), Rgba::RED.darker());
    assert_eq!(Rgba::parse("light gray").unwrap(), Rgba::rgb(128, 128, 128).brighter());
    // "darkred" is a name of its own, not "dark" + "red"
    assert_eq!(Rgba::parse("darkred").unwrap(), Rgba::rgb(139, 0, 0));
  }

  #[test]
  fn test_parse_transparent() {
    assert_eq!(Rgba::parse("transparent").unwrap(), Rgba::TRANSPARENT);

    let half_red = Rgba::parse("transparent red").unwrap();
    assert_eq!(half_red.r, 255);
    assert_eq!(half_red.a, 0.5);
  }

  #[test]
  fn test_parse_invalid() {
    assert!(Rgba::parse("").is_err());
    assert!(Rgba::parse("no such color").is_err());
    assert!(Rgba::parse("#xyz").is_err());
    assert!(Rgba::parse("#12345").is_err());
    assert!(Rgba::parse("rgb(300, 0, 0)").is_err());
    assert!(Rgba::parse("rgb(120%, 0%, 0%)").is_err());
    assert!(Rgba::parse("rgb(1, 2)").is_err());
  }

  #[test]
  fn test_rgba_display() {
    assert_eq!(format!("{}", Rgba::new(255, 0, 0, 1.0)), "rgb(255, 0, 0)");
    assert_eq!(format!("{}", Rgba::new(255, 0, 0, 0.5)), "rgba(255, 0, 0, 0.500)");
  }
}
