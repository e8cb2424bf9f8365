// ============================================
// Material - Цветовой материал меша
// ============================================

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Материал в модели Фонга
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub shininess: f32,
}

impl Material {
    /// Матовый материал одного цвета
    pub fn matte(color: Rgb) -> Self {
        Self {
            ambient: Rgb::new(color.r * 0.3, color.g * 0.3, color.b * 0.3),
            diffuse: color,
            specular: Rgb::gray(0.05),
            shininess: 8.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::matte(Rgb::gray(0.8))
    }
}
