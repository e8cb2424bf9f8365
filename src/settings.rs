// ============================================
// Terrain Settings - Параметры генерации
// ============================================
// Data-driven: настройки можно загрузить из JSON,
// отсутствующие поля берутся из Default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Минимальный масштаб шума (защита от деления на ноль)
pub const MIN_NOISE_SCALE: f32 = 0.0001;

/// Предел разрешения чанка: (N+1)² вершин должны помещаться в u32-индексы
pub const MAX_CHUNK_RESOLUTION: u32 = 4096;

/// Параметры многооктавного шума
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Размер "холма" в мировых единицах (позиция делится на scale)
    pub scale: f32,
    /// Количество октав
    pub octaves: u32,
    /// Затухание амплитуды на октаву
    pub persistence: f32,
    /// Рост частоты на октаву
    pub lacunarity: f32,
    /// Мастер-seed, из него выводятся seed-ы октав
    pub seed: u64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: 24.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 42,
        }
    }
}

impl NoiseSettings {
    /// Исправляет вырожденные значения вместо ошибки
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.scale > 0.0) || !self.scale.is_finite() {
            log::debug!("noise scale {} clamped to {}", self.scale, MIN_NOISE_SCALE);
            self.scale = MIN_NOISE_SCALE;
        }
        if self.octaves == 0 {
            log::debug!("octave count 0 raised to 1");
            self.octaves = 1;
        }
        if !(self.persistence > 0.0) || !self.persistence.is_finite() {
            log::debug!("persistence {} replaced by {}", self.persistence, defaults.persistence);
            self.persistence = defaults.persistence;
        }
        if !(self.lacunarity > 0.0) || !self.lacunarity.is_finite() {
            log::debug!("lacunarity {} replaced by {}", self.lacunarity, defaults.lacunarity);
            self.lacunarity = defaults.lacunarity;
        }
        self
    }
}

/// Параметры стримера terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// N - количество квадов по стороне чанка (вершин N+1)
    pub resolution: u32,
    /// Размер одного квада в мировых единицах
    pub cell_size: f32,
    /// Вертикальный масштаб нормализованной высоты
    pub height_scale: f32,
    /// Высота маркера чанка над поверхностью
    pub marker_height: f32,
    pub marker_scale: f32,
    /// 0 = по числу ядер
    pub worker_threads: usize,
    pub noise: NoiseSettings,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            resolution: 32,
            cell_size: 1.0,
            height_scale: 16.0,
            marker_height: 20.0,
            marker_scale: 0.5,
            worker_threads: 0,
            noise: NoiseSettings::default(),
        }
    }
}

impl TerrainSettings {
    /// Загрузить настройки из JSON строки
    pub fn from_json(json: &str) -> Result<Self, String> {
        let settings: TerrainSettings = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;
        Ok(settings)
    }

    /// Загрузить настройки из файла
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read file: {}", e))?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))
    }

    /// Исправляет вырожденные значения вместо ошибки
    pub fn sanitized(mut self) -> Self {
        if self.resolution == 0 {
            log::debug!("chunk resolution 0 raised to 1");
            self.resolution = 1;
        }
        if self.resolution > MAX_CHUNK_RESOLUTION {
            log::debug!("chunk resolution {} capped at {}", self.resolution, MAX_CHUNK_RESOLUTION);
            self.resolution = MAX_CHUNK_RESOLUTION;
        }
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            log::debug!("cell size {} replaced by 1.0", self.cell_size);
            self.cell_size = 1.0;
        }
        if !self.height_scale.is_finite() {
            self.height_scale = Self::default().height_scale;
        }
        if !self.marker_height.is_finite() {
            self.marker_height = Self::default().marker_height;
        }
        if !(self.marker_scale > 0.0) || !self.marker_scale.is_finite() {
            self.marker_scale = Self::default().marker_scale;
        }
        self.noise = self.noise.sanitized();
        self
    }

    /// Фактическое число воркеров
    pub fn worker_count(&self) -> usize {
        if self.worker_threads > 0 {
            self.worker_threads
        } else {
            num_cpus::get().max(1)
        }
    }

    /// Сторона чанка в мировых единицах
    #[inline]
    pub fn chunk_world_size(&self) -> f32 {
        self.resolution as f32 * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = TerrainSettings::from_json(r#"{ "resolution": 8, "noise": { "octaves": 2 } }"#).unwrap();
        assert_eq!(settings.resolution, 8);
        assert_eq!(settings.noise.octaves, 2);
        assert_eq!(settings.noise.seed, NoiseSettings::default().seed);
        assert_eq!(settings.cell_size, 1.0);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = TerrainSettings::from_json("{ resolution: }").unwrap_err();
        assert!(err.starts_with("Failed to parse JSON"));
    }

    #[test]
    fn test_degenerate_values_are_clamped() {
        let settings = TerrainSettings {
            resolution: 0,
            cell_size: -2.0,
            noise: NoiseSettings {
                scale: 0.0,
                octaves: 0,
                persistence: -1.0,
                lacunarity: f32::NAN,
                seed: 7,
            },
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.resolution, 1);
        assert_eq!(settings.cell_size, 1.0);
        assert_eq!(settings.noise.scale, MIN_NOISE_SCALE);
        assert_eq!(settings.noise.octaves, 1);
        assert_eq!(settings.noise.persistence, 0.5);
        assert_eq!(settings.noise.lacunarity, 2.0);
        assert_eq!(settings.noise.seed, 7);
    }

    #[test]
    fn test_huge_resolution_is_capped() {
        let settings = TerrainSettings { resolution: 1_000_000, ..Default::default() }.sanitized();
        assert_eq!(settings.resolution, MAX_CHUNK_RESOLUTION);
    }

    #[test]
    fn test_worker_count_defaults_to_cpus() {
        let settings = TerrainSettings::default();
        assert!(settings.worker_count() >= 1);
        let fixed = TerrainSettings { worker_threads: 3, ..Default::default() };
        assert_eq!(fixed.worker_count(), 3);
    }

    #[test]
    fn test_json_roundtrip_keeps_noise() {
        let settings = TerrainSettings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(TerrainSettings::from_json(&json).unwrap(), settings);
    }
}
