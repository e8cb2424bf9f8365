// ============================================
// Color Module - Цветовые пространства
// ============================================
// Интерполяция в LCH даёт перцептивно равномерные переходы
// между цветами материалов terrain.

mod spaces;

pub use spaces::{lerp_lch, lerp_rgb, Lab, Lch, Rgb, Xyz};
