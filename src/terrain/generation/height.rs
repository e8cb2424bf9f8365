// ============================================
// Heightfield Generator - Высоты и нормали
// ============================================
// Многооктавный градиентный шум. Seed-ы октав выводятся из
// мастер-seed через ChaCha8, поэтому одинаковые настройки
// дают одинаковый ландшафт на любой машине.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ultraviolet::{Vec2, Vec3};

use super::noise::GradientNoise;
use crate::settings::{NoiseSettings, TerrainSettings};
use crate::terrain::chunk::ChunkCoord;

/// Шаг конечных разностей для нормали (мировые единицы)
pub const NORMAL_STEP: f32 = 0.032;

/// Высота в диапазоне [0, 1] и единичная нормаль
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSample {
    pub height: f32,
    pub normal: Vec3,
}

/// Сетка (N+1) x (N+1) сэмплов чанка, построчно по Z
#[derive(Debug, Clone)]
pub struct HeightGrid {
    resolution: u32,
    samples: Vec<HeightSample>,
}

impl HeightGrid {
    pub fn new(resolution: u32, samples: Vec<HeightSample>) -> Option<Self> {
        let side = resolution as usize + 1;
        (samples.len() == side * side).then_some(Self { resolution, samples })
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Вершин по стороне (N + 1)
    #[inline]
    pub fn side(&self) -> usize {
        self.resolution as usize + 1
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Option<&HeightSample> {
        let side = self.side();
        if x < side && z < side {
            self.samples.get(z * side + x)
        } else {
            None
        }
    }

    pub fn samples(&self) -> &[HeightSample] {
        &self.samples
    }
}

pub struct HeightfieldGenerator {
    noise: NoiseSettings,
    height_scale: f32,
    octave_seeds: Vec<u32>,
}

impl HeightfieldGenerator {
    pub fn new(noise: NoiseSettings, height_scale: f32) -> Self {
        let noise = noise.sanitized();

        let mut rng = ChaCha8Rng::seed_from_u64(noise.seed);
        let octave_seeds = (0..noise.octaves).map(|_| rng.random::<u32>()).collect();

        Self {
            noise,
            height_scale: if height_scale.is_finite() { height_scale } else { 1.0 },
            octave_seeds,
        }
    }

    pub fn from_settings(settings: &TerrainSettings) -> Self {
        Self::new(settings.noise, settings.height_scale)
    }

    pub fn settings(&self) -> &NoiseSettings {
        &self.noise
    }

    pub fn octave_seeds(&self) -> &[u32] {
        &self.octave_seeds
    }

    #[inline]
    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    /// Нормализованная высота в мировой точке (x, z)
    pub fn height(&self, world: Vec2) -> f32 {
        let p = world / self.noise.scale;

        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;

        for &seed in &self.octave_seeds {
            value += amplitude * GradientNoise::sample(p * frequency, seed);
            total += amplitude;
            amplitude *= self.noise.persistence;
            frequency *= self.noise.lacunarity;
        }

        let height = value / total;
        if height.is_finite() {
            height.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    /// Высота + нормаль по конечным разностям
    pub fn height_and_normal(&self, world: Vec2) -> HeightSample {
        let h = self.height(world);
        let hx = self.height(world + Vec2::new(NORMAL_STEP, 0.0));
        let hz = self.height(world + Vec2::new(0.0, NORMAL_STEP));

        let tangent_x = Vec3::new(NORMAL_STEP, (hx - h) * self.height_scale, 0.0);
        let tangent_z = Vec3::new(0.0, (hz - h) * self.height_scale, NORMAL_STEP);

        HeightSample {
            height: h,
            normal: safe_normal(tangent_z.cross(tangent_x)),
        }
    }

    /// Сетка сэмплов чанка. Локальная (0,0) смещена на -size/2 от центра чанка.
    pub fn sample_chunk(&self, coord: ChunkCoord, resolution: u32, cell_size: f32) -> HeightGrid {
        let side = resolution as usize + 1;
        let center = coord.world_origin(resolution as f32 * cell_size);
        let half = resolution as f32 * cell_size * 0.5;

        let mut samples = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                let local = Vec2::new(x as f32 * cell_size - half, z as f32 * cell_size - half);
                samples.push(self.height_and_normal(center + local));
            }
        }

        HeightGrid { resolution, samples }
    }
}

/// Нормализовать; вырожденный вектор превращается в "вверх"
#[inline]
fn safe_normal(v: Vec3) -> Vec3 {
    let len = v.mag();
    if len.is_finite() && len > 1e-12 {
        let n = v / len;
        if n.x.is_finite() && n.y.is_finite() && n.z.is_finite() {
            return n;
        }
    }
    Vec3::unit_y()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(octaves: u32, seed: u64) -> HeightfieldGenerator {
        HeightfieldGenerator::new(NoiseSettings { octaves, seed, ..Default::default() }, 16.0)
    }

    #[test]
    fn test_octave_seeds_are_reproducible() {
        let a = generator(5, 42);
        let b = generator(5, 42);
        let c = generator(5, 43);
        assert_eq!(a.octave_seeds().len(), 5);
        assert_eq!(a.octave_seeds(), b.octave_seeds());
        assert_ne!(a.octave_seeds(), c.octave_seeds());
    }

    #[test]
    fn test_heights_are_bounded() {
        for (octaves, persistence, lacunarity) in [(1, 0.5, 2.0), (6, 0.9, 1.7), (8, 3.0, 0.5)] {
            let gen = HeightfieldGenerator::new(
                NoiseSettings { octaves, persistence, lacunarity, seed: 9, scale: 7.0 },
                16.0,
            );
            for i in 0..200 {
                let p = Vec2::new(i as f32 * 1.37 - 100.0, i as f32 * -2.11 + 40.0);
                let h = gen.height(p);
                assert!((0.0..=1.0).contains(&h), "height {} out of range", h);
            }
        }
    }

    #[test]
    fn test_single_octave_equals_raw_noise() {
        let gen = generator(1, 42);
        let p = Vec2::new(13.5, -4.25);
        let expected = GradientNoise::sample(p / gen.settings().scale, gen.octave_seeds()[0]);
        assert_eq!(gen.height(p), expected);
    }

    #[test]
    fn test_normals_are_unit_and_finite() {
        let gen = generator(4, 1);
        for i in 0..100 {
            let s = gen.height_and_normal(Vec2::new(i as f32 * 0.7, i as f32 * 0.3));
            assert!(s.normal.y > 0.0);
            assert!((s.normal.mag() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_flat_field_points_up() {
        let gen = HeightfieldGenerator::new(NoiseSettings::default(), 0.0);
        let s = gen.height_and_normal(Vec2::new(3.3, 1.1));
        assert!((s.normal - Vec3::unit_y()).mag() < 1e-6);
    }

    #[test]
    fn test_degenerate_vector_falls_back_to_up() {
        assert_eq!(safe_normal(Vec3::zero()), Vec3::unit_y());
        assert_eq!(safe_normal(Vec3::new(f32::NAN, 1.0, 0.0)), Vec3::unit_y());
        assert_eq!(safe_normal(Vec3::new(f32::INFINITY, 1.0, 0.0)), Vec3::unit_y());
    }

    #[test]
    fn test_chunk_origin_sample_matches_noise() {
        let settings = TerrainSettings {
            resolution: 8,
            noise: NoiseSettings { octaves: 1, seed: 42, ..Default::default() },
            ..Default::default()
        };
        let gen = HeightfieldGenerator::from_settings(&settings);
        let grid = gen.sample_chunk(ChunkCoord::new(0, 0), settings.resolution, settings.cell_size);

        let half = settings.chunk_world_size() * 0.5;
        let origin_adjusted = Vec2::new(-half, -half) / settings.noise.scale;
        let expected = GradientNoise::sample(origin_adjusted, gen.octave_seeds()[0]);
        assert_eq!(grid.get(0, 0).unwrap().height, expected);
    }

    #[test]
    fn test_neighbouring_chunks_share_edges() {
        let gen = generator(3, 7);
        let left = gen.sample_chunk(ChunkCoord::new(0, 0), 4, 2.0);
        let right = gen.sample_chunk(ChunkCoord::new(1, 0), 4, 2.0);
        for z in 0..left.side() {
            let a = left.get(4, z).unwrap().height;
            let b = right.get(0, z).unwrap().height;
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_grid_rejects_wrong_sample_count() {
        let sample = HeightSample { height: 0.5, normal: Vec3::unit_y() };
        assert!(HeightGrid::new(2, vec![sample; 9]).is_some());
        assert!(HeightGrid::new(2, vec![sample; 8]).is_none());
    }
}
