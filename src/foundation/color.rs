use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{StageError, StageResult};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel.
    pub alpha: u8,
}

/// Named colors: the basic set plus the Tango palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum StaticColor {
    White,
    Black,
    Red,
    DarkRed,
    Green,
    DarkGreen,
    Blue,
    DarkBlue,
    Cyan,
    DarkCyan,
    Magenta,
    DarkMagenta,
    Yellow,
    DarkYellow,
    Gray,
    DarkGray,
    LightGray,
    Butter,
    ButterLight,
    ButterDark,
    Orange,
    OrangeLight,
    OrangeDark,
    Chocolate,
    ChocolateLight,
    ChocolateDark,
    Chameleon,
    ChameleonLight,
    ChameleonDark,
    SkyBlue,
    SkyBlueLight,
    SkyBlueDark,
    Plum,
    PlumLight,
    PlumDark,
    ScarletRed,
    ScarletRedLight,
    ScarletRedDark,
    Aluminium1,
    Aluminium2,
    Aluminium3,
    Aluminium4,
    Aluminium5,
    Aluminium6,
    Transparent,
}

const STATIC_COLORS: &[(StaticColor, &str, u32)] = &[
    (StaticColor::White, "white", 0xffff_ffff),
    (StaticColor::Black, "black", 0x0000_00ff),
    (StaticColor::Red, "red", 0xff00_00ff),
    (StaticColor::DarkRed, "dark-red", 0x8000_00ff),
    (StaticColor::Green, "green", 0x00ff_00ff),
    (StaticColor::DarkGreen, "dark-green", 0x0080_00ff),
    (StaticColor::Blue, "blue", 0x0000_ffff),
    (StaticColor::DarkBlue, "dark-blue", 0x0000_80ff),
    (StaticColor::Cyan, "cyan", 0x00ff_ffff),
    (StaticColor::DarkCyan, "dark-cyan", 0x0080_80ff),
    (StaticColor::Magenta, "magenta", 0xff00_ffff),
    (StaticColor::DarkMagenta, "dark-magenta", 0x8000_80ff),
    (StaticColor::Yellow, "yellow", 0xffff_00ff),
    (StaticColor::DarkYellow, "dark-yellow", 0x8080_00ff),
    (StaticColor::Gray, "gray", 0xa0a0_a4ff),
    (StaticColor::DarkGray, "dark-gray", 0x8080_80ff),
    (StaticColor::LightGray, "light-gray", 0xc0c0_c0ff),
    (StaticColor::Butter, "butter", 0xedd4_00ff),
    (StaticColor::ButterLight, "butter-light", 0xfce9_4fff),
    (StaticColor::ButterDark, "butter-dark", 0xc4a0_00ff),
    (StaticColor::Orange, "orange", 0xf579_00ff),
    (StaticColor::OrangeLight, "orange-light", 0xfcaf_3eff),
    (StaticColor::OrangeDark, "orange-dark", 0xce5c_00ff),
    (StaticColor::Chocolate, "chocolate", 0xc17d_11ff),
    (StaticColor::ChocolateLight, "chocolate-light", 0xe9b9_6eff),
    (StaticColor::ChocolateDark, "chocolate-dark", 0x8f59_02ff),
    (StaticColor::Chameleon, "chameleon", 0x73d2_16ff),
    (StaticColor::ChameleonLight, "chameleon-light", 0x8ae2_34ff),
    (StaticColor::ChameleonDark, "chameleon-dark", 0x4e9a_06ff),
    (StaticColor::SkyBlue, "sky-blue", 0x3465_a4ff),
    (StaticColor::SkyBlueLight, "sky-blue-light", 0x729f_cfff),
    (StaticColor::SkyBlueDark, "sky-blue-dark", 0x204a_87ff),
    (StaticColor::Plum, "plum", 0x7550_7bff),
    (StaticColor::PlumLight, "plum-light", 0xad7f_a8ff),
    (StaticColor::PlumDark, "plum-dark", 0x5c35_66ff),
    (StaticColor::ScarletRed, "scarlet-red", 0xcc00_00ff),
    (StaticColor::ScarletRedLight, "scarlet-red-light", 0xef29_29ff),
    (StaticColor::ScarletRedDark, "scarlet-red-dark", 0xa400_00ff),
    (StaticColor::Aluminium1, "aluminium-1", 0xeeee_ecff),
    (StaticColor::Aluminium2, "aluminium-2", 0xd3d7_cfff),
    (StaticColor::Aluminium3, "aluminium-3", 0xbabd_b6ff),
    (StaticColor::Aluminium4, "aluminium-4", 0x888a_85ff),
    (StaticColor::Aluminium5, "aluminium-5", 0x5557_53ff),
    (StaticColor::Aluminium6, "aluminium-6", 0x2e34_36ff),
    (StaticColor::Transparent, "transparent", 0x0000_0000),
];

impl StaticColor {
    /// Kebab-case name used by [`Color::parse`].
    pub fn name(self) -> &'static str {
        STATIC_COLORS
            .iter()
            .find(|(c, _, _)| *c == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("transparent")
    }

    /// Look up a named color (case-insensitive, `_` and `-` are interchangeable).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase().replace('_', "-");
        STATIC_COLORS
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(c, _, _)| *c)
    }
}

impl Color {
    /// Build a color from its four channels.
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Decode a `0xRRGGBBAA` pixel.
    pub const fn from_pixel(pixel: u32) -> Self {
        Self::new(
            (pixel >> 24) as u8,
            (pixel >> 16) as u8,
            (pixel >> 8) as u8,
            pixel as u8,
        )
    }

    /// Encode as a `0xRRGGBBAA` pixel.
    pub fn to_pixel(self) -> u32 {
        (u32::from(self.red) << 24)
            | (u32::from(self.green) << 16)
            | (u32::from(self.blue) << 8)
            | u32::from(self.alpha)
    }

    /// Resolve a palette entry.
    pub fn from_static(c: StaticColor) -> Self {
        STATIC_COLORS
            .iter()
            .find(|(s, _, _)| *s == c)
            .map(|(_, _, px)| Self::from_pixel(*px))
            .unwrap_or_default()
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or a palette name.
    pub fn parse(s: &str) -> StageResult<Self> {
        let s = s.trim();
        let Some(hex) = s.strip_prefix('#') else {
            return StaticColor::from_name(s)
                .map(Self::from_static)
                .ok_or_else(|| StageError::validation(format!("unknown color name \"{s}\"")));
        };

        fn nibble(c: u8) -> Option<u8> {
            (c as char).to_digit(16).map(|d| d as u8)
        }

        let digits = hex
            .bytes()
            .map(nibble)
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| StageError::validation(format!("invalid hex color \"{s}\"")))?;

        let (r, g, b, a) = match digits.as_slice() {
            [r, g, b] => (r * 17, g * 17, b * 17, 255),
            [r, g, b, a] => (r * 17, g * 17, b * 17, a * 17),
            [r1, r0, g1, g0, b1, b0] => (r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, 255),
            [r1, r0, g1, g0, b1, b0, a1, a0] => {
                (r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, a1 << 4 | a0)
            }
            _ => {
                return Err(StageError::validation(
                    "hex color must be #rgb, #rgba, #rrggbb or #rrggbbaa",
                ));
            }
        };
        Ok(Self::new(r, g, b, a))
    }

    /// Build an opaque color from hue (degrees), luminance and saturation (`0..=1`).
    pub fn from_hls(hue: f64, luminance: f64, saturation: f64) -> Self {
        let hue = hue.rem_euclid(360.0) / 360.0;
        let l = luminance.clamp(0.0, 1.0);
        let s = saturation.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = to_channel(l);
            return Self::new(v, v, v, 255);
        }

        let tmp2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let tmp1 = 2.0 * l - tmp2;

        fn component(tmp1: f64, tmp2: f64, mut t: f64) -> f64 {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if 6.0 * t < 1.0 {
                tmp1 + (tmp2 - tmp1) * t * 6.0
            } else if 2.0 * t < 1.0 {
                tmp2
            } else if 3.0 * t < 2.0 {
                tmp1 + (tmp2 - tmp1) * (2.0 / 3.0 - t) * 6.0
            } else {
                tmp1
            }
        }

        Self::new(
            to_channel(component(tmp1, tmp2, hue + 1.0 / 3.0)),
            to_channel(component(tmp1, tmp2, hue)),
            to_channel(component(tmp1, tmp2, hue - 1.0 / 3.0)),
            255,
        )
    }

    /// Convert to `(hue°, luminance, saturation)`; alpha is ignored.
    pub fn to_hls(self) -> (f64, f64, f64) {
        let r = f64::from(self.red) / 255.0;
        let g = f64::from(self.green) / 255.0;
        let b = f64::from(self.blue) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, l, 0.0);
        }

        let delta = max - min;
        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        let mut h = if r == max {
            (g - b) / delta
        } else if g == max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }
        (h, l, s)
    }

    /// Scale luminance and saturation by `factor`, keeping hue and alpha.
    pub fn shade(self, factor: f64) -> Self {
        let (h, l, s) = self.to_hls();
        let mut out = Self::from_hls(h, (l * factor).clamp(0.0, 1.0), (s * factor).clamp(0.0, 1.0));
        out.alpha = self.alpha;
        out
    }

    /// A lighter shade (factor 1.3).
    pub fn lighten(self) -> Self {
        self.shade(1.3)
    }

    /// A darker shade (factor 0.7).
    pub fn darken(self) -> Self {
        self.shade(0.7)
    }

    /// Channel-wise saturating addition; alpha is the max of both.
    pub fn add(self, other: Self) -> Self {
        Self::new(
            self.red.saturating_add(other.red),
            self.green.saturating_add(other.green),
            self.blue.saturating_add(other.blue),
            self.alpha.max(other.alpha),
        )
    }

    /// Channel-wise saturating subtraction; alpha is the min of both.
    pub fn subtract(self, other: Self) -> Self {
        Self::new(
            self.red.saturating_sub(other.red),
            self.green.saturating_sub(other.green),
            self.blue.saturating_sub(other.blue),
            self.alpha.min(other.alpha),
        )
    }

    /// Channel by position: 0 red, 1 green, 2 blue, 3 alpha.
    pub fn channel(self, idx: usize) -> Option<u8> {
        match idx {
            0 => Some(self.red),
            1 => Some(self.green),
            2 => Some(self.blue),
            3 => Some(self.alpha),
            _ => None,
        }
    }

    /// Replace a channel by position.
    pub fn set_channel(&mut self, idx: usize, value: u8) -> StageResult<()> {
        let slot = match idx {
            0 => &mut self.red,
            1 => &mut self.green,
            2 => &mut self.blue,
            3 => &mut self.alpha,
            _ => {
                return Err(StageError::validation(format!(
                    "color channel index {idx} out of range"
                )));
            }
        };
        *slot = value;
        Ok(())
    }

    /// Channel-wise interpolation with factor `t`.
    pub fn interpolate(self, to: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self::new(
            lerp_u8(self.red, to.red, t),
            lerp_u8(self.green, to.green, t),
            lerp_u8(self.blue, to.blue, t),
            lerp_u8(self.alpha, to.alpha, t),
        )
    }
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Channels {
                red: u8,
                green: u8,
                blue: u8,
                #[serde(default = "opaque")]
                alpha: u8,
            },
            Hls {
                hue: f64,
                luminance: f64,
                saturation: f64,
                #[serde(default = "opaque")]
                alpha: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::Channels {
                red,
                green,
                blue,
                alpha,
            } => Ok(Self::new(red, green, blue, alpha)),
            Repr::Hls {
                hue,
                luminance,
                saturation,
                alpha,
            } => {
                let mut c = Self::from_hls(hue, luminance, saturation);
                c.alpha = alpha;
                Ok(c)
            }
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b, 255)),
                [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
