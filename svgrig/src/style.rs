use crate::{Error, Warning};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(input: &str) -> Result<Self, Error> {
        parse_hex_color_rgba(input, "color").map(|[r, g, b, a]| Self::rgba(r, g, b, a))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Paint state of a path. `None` colors mean "not painted".
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Color::BLACK),
            stroke: None,
            stroke_width: 1.0,
        }
    }
}

impl Style {
    /// Parses a `;`-separated `key:value` list. Only `fill`, `stroke` and
    /// `stroke-width` are honored; everything else is reported and skipped.
    ///
    /// A `stroke-width` without a usable `stroke` strokes with the fill color.
    pub fn parse(input: &str) -> (Style, Vec<Warning>) {
        let mut style = Style::default();
        let mut warnings = Vec::new();
        let mut stroke_width_set = false;
        let mut stroke_set = false;

        for item in input.split(';') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let Some((key, value)) = item.split_once(':') else {
                warnings.push(Warning::MalformedStyle {
                    key: item.to_string(),
                    value: String::new(),
                });
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "fill" => match parse_paint(value) {
                    Ok(paint) => style.fill = paint,
                    Err(_) => warnings.push(malformed(key, value)),
                },
                "stroke" => match parse_paint(value) {
                    Ok(paint) => {
                        style.stroke = paint;
                        stroke_set = paint.is_some();
                    }
                    Err(_) => warnings.push(malformed(key, value)),
                },
                "stroke-width" => match value.parse::<f64>() {
                    Ok(width) if width.is_finite() && width >= 0.0 => {
                        style.stroke_width = width;
                        stroke_width_set = true;
                    }
                    _ => warnings.push(malformed(key, value)),
                },
                _ => warnings.push(Warning::UnsupportedStyleKey {
                    key: key.to_string(),
                }),
            }
        }

        if stroke_width_set && !stroke_set {
            style.stroke = style.fill;
        }

        for warning in &warnings {
            log::warn!("style: {warning}");
        }
        (style, warnings)
    }
}

fn malformed(key: &str, value: &str) -> Warning {
    Warning::MalformedStyle {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_paint(value: &str) -> Result<Option<Color>, Error> {
    if value == "none" {
        return Ok(None);
    }
    Color::from_hex(value).map(Some)
}

fn parse_hex_color_rgba(input: &str, context: &str) -> Result<[f32; 4], Error> {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let invalid = || Error::InvalidColor {
        context: context.to_string(),
        value: input.to_string(),
    };

    let bytes = input
        .trim()
        .strip_prefix('#')
        .ok_or_else(invalid)?
        .as_bytes();
    let byte = |i: usize| hex(bytes[i]).zip(hex(bytes[i + 1])).map(|(h, l)| (h << 4) | l);
    let (r, g, b, a) = match bytes.len() {
        6 => (byte(0), byte(2), byte(4), Some(255)),
        8 => (byte(0), byte(2), byte(4), byte(6)),
        _ => return Err(invalid()),
    };

    let (Some(r), Some(g), Some(b), Some(a)) = (r, g, b, a) else {
        return Err(invalid());
    };

    Ok([
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ])
}
