//! Cell and header values: colors, images and fonts.

use peniko::Color as PenikoColor;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{GridError, GridResult};

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS color: hex, functional notation or a named color.
    pub fn parse(text: &str) -> GridResult<Self> {
        let color = parse_color(text).map_err(|_| GridError::InvalidArgument(format!("invalid color {text:?}")))?;
        Ok(color.to_alpha_color::<Srgb>().into())
    }

    /// Wire encoding `[r, g, b, a]`.
    pub fn to_value(self) -> Value {
        json!([self.r, self.g, self.b, self.a])
    }
}

impl From<PenikoColor> for Color {
    fn from(color: PenikoColor) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Color> for PenikoColor {
    fn from(color: Color) -> Self {
        PenikoColor::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A reference to an externally encoded image, with its pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub key: String,
    pub width: i32,
    pub height: i32,
}

impl Image {
    pub fn new(key: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
        }
    }

    /// Wire encoding `[key, width, height]`.
    pub fn to_value(&self) -> Value {
        json!([self.key, self.width, self.height])
    }
}

/// A font description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    pub names: Vec<String>,
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
}

impl Font {
    pub fn new(name: impl Into<String>, size: i32) -> Self {
        Self {
            names: vec![name.into()],
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Wire encoding `[[names...], size, bold, italic]`.
    pub fn to_value(&self) -> Value {
        json!([self.names, self.size, self.bold, self.italic])
    }
}

pub(crate) fn opt_color(color: Option<Color>) -> Value {
    color.map_or(Value::Null, Color::to_value)
}

pub(crate) fn opt_image(image: Option<&Image>) -> Value {
    image.map_or(Value::Null, Image::to_value)
}

pub(crate) fn opt_font(font: Option<&Font>) -> Value {
    font.map_or(Value::Null, Font::to_value)
}
