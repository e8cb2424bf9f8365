// ============================================
// Color Spaces - RGB / XYZ / LAB / LCH
// ============================================
// Observer = 2°, Illuminant = D65.
// RGB хранится в sRGB (0.0 - 1.0), XYZ в диапазоне 0 - 100.

use serde::{Deserialize, Serialize};

/// Опорная белая точка D65
const WHITE_X: f32 = 95.047;
const WHITE_Y: f32 = 100.0;
const WHITE_Z: f32 = 108.883;

const LAB_EPSILON: f32 = 0.008856;
const LAB_KAPPA: f32 = 7.787;
const LAB_OFFSET: f32 = 16.0 / 116.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

/// Цилиндрическая форма LAB: светлота, насыщенность, тон (градусы 0..360)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lch {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Разбор строки "#RRGGBB"
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| format!("Invalid hex format: '{}'", hex))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("Invalid hex format: '{}'", hex));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| format!("Invalid hex digit in '{}': {}", hex, e))
        };

        Ok(Self::from_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Ограничить каналы диапазоном 0..1 (после обратного преобразования из LCH
    /// цвет может выйти за гамму sRGB)
    pub fn clamped(self) -> Self {
        Self::new(self.r.clamp(0.0, 1.0), self.g.clamp(0.0, 1.0), self.b.clamp(0.0, 1.0))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c > 0.003_130_8 {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * c
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA * t + LAB_OFFSET
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let cube = t * t * t;
    if cube > LAB_EPSILON {
        cube
    } else {
        (t - LAB_OFFSET) / LAB_KAPPA
    }
}

impl From<Rgb> for Xyz {
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r) * 100.0;
        let g = srgb_to_linear(rgb.g) * 100.0;
        let b = srgb_to_linear(rgb.b) * 100.0;

        Xyz {
            x: r * 0.4124 + g * 0.3576 + b * 0.1805,
            y: r * 0.2126 + g * 0.7152 + b * 0.0722,
            z: r * 0.0193 + g * 0.1192 + b * 0.9505,
        }
    }
}

impl From<Xyz> for Rgb {
    fn from(xyz: Xyz) -> Self {
        let x = xyz.x / 100.0;
        let y = xyz.y / 100.0;
        let z = xyz.z / 100.0;

        let r = x * 3.2406 + y * -1.5372 + z * -0.4986;
        let g = x * -0.9689 + y * 1.8758 + z * 0.0415;
        let b = x * 0.0557 + y * -0.2040 + z * 1.0570;

        Rgb::new(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
    }
}

impl From<Xyz> for Lab {
    fn from(xyz: Xyz) -> Self {
        let x = lab_f(xyz.x / WHITE_X);
        let y = lab_f(xyz.y / WHITE_Y);
        let z = lab_f(xyz.z / WHITE_Z);

        Lab {
            l: 116.0 * y - 16.0,
            a: 500.0 * (x - y),
            b: 200.0 * (y - z),
        }
    }
}

impl From<Lab> for Xyz {
    fn from(lab: Lab) -> Self {
        let y = (lab.l + 16.0) / 116.0;
        let x = lab.a / 500.0 + y;
        let z = y - lab.b / 200.0;

        Xyz {
            x: WHITE_X * lab_f_inv(x),
            y: WHITE_Y * lab_f_inv(y),
            z: WHITE_Z * lab_f_inv(z),
        }
    }
}

impl From<Lab> for Lch {
    fn from(lab: Lab) -> Self {
        let c = (lab.a * lab.a + lab.b * lab.b).sqrt();
        let h = lab.b.atan2(lab.a).to_degrees().rem_euclid(360.0);
        Lch { l: lab.l, c, h }
    }
}

impl From<Lch> for Lab {
    fn from(lch: Lch) -> Self {
        let h = lch.h.to_radians();
        Lab {
            l: lch.l,
            a: h.cos() * lch.c,
            b: h.sin() * lch.c,
        }
    }
}

impl From<Rgb> for Lab {
    fn from(rgb: Rgb) -> Self {
        Lab::from(Xyz::from(rgb))
    }
}

impl From<Lab> for Rgb {
    fn from(lab: Lab) -> Self {
        Rgb::from(Xyz::from(lab))
    }
}

impl From<Rgb> for Lch {
    fn from(rgb: Rgb) -> Self {
        Lch::from(Lab::from(rgb))
    }
}

impl From<Lch> for Rgb {
    fn from(lch: Lch) -> Self {
        Rgb::from(Lab::from(lch))
    }
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Линейная интерполяция в sRGB
pub fn lerp_rgb(c1: Rgb, c2: Rgb, t: f32) -> Rgb {
    Rgb::new(mix(c1.r, c2.r, t), mix(c1.g, c2.g, t), mix(c1.b, c2.b, t))
}

/// Интерполяция в LCH, тон идёт по кратчайшей дуге
pub fn lerp_lch(c1: Lch, c2: Lch, t: f32) -> Lch {
    let mut dh = c2.h - c1.h;
    if dh > 180.0 {
        dh -= 360.0;
    } else if dh < -180.0 {
        dh += 360.0;
    }

    Lch {
        l: mix(c1.l, c2.l, t),
        c: mix(c1.c, c2.c, t),
        h: (c1.h + dh * t).rem_euclid(360.0),
    }
}
