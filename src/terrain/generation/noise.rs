// ============================================
// Gradient Noise - Градиентный шум (Perlin)
// ============================================
// Каждый узел решётки хэшируется вместе с seed в угол градиента.
// Результат нормализован в [0, 1], в узлах решётки ровно 0.5.

use std::f32::consts::TAU;

use ultraviolet::Vec2;

/// Константа золотого сечения для смешивания хэшей
const HASH_MAGIC: u32 = 0x9e37_79b9;

/// Подмешать значение в хэш: h ^= v + magic + (h << 6) + (h >> 2)
#[inline(always)]
pub fn hash_combine(hash: u32, value: u32) -> u32 {
    hash ^ value
        .wrapping_add(HASH_MAGIC)
        .wrapping_add(hash << 6)
        .wrapping_add(hash >> 2)
}

/// Хэш узла решётки с учётом seed
#[inline(always)]
pub fn hash_lattice(x: i32, y: i32, seed: u32) -> u32 {
    hash_combine(hash_combine(seed, x as u32), y as u32)
}

#[inline(always)]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Детерминированный 2D градиентный шум
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientNoise;

impl GradientNoise {
    /// Единичный градиент для узла решётки
    #[inline]
    pub fn gradient(x: i32, y: i32, seed: u32) -> Vec2 {
        let angle = hash_lattice(x, y, seed) as f32 / u32::MAX as f32 * TAU;
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Значение шума в точке, [0, 1]
    pub fn sample(position: Vec2, seed: u32) -> f32 {
        let x0 = position.x.floor();
        let y0 = position.y.floor();
        let xi = x0 as i32;
        let yi = y0 as i32;
        let fx = position.x - x0;
        let fy = position.y - y0;

        let corner = |cx: i32, cy: i32, dx: f32, dy: f32| {
            Self::gradient(cx, cy, seed).dot(Vec2::new(dx, dy))
        };

        let n00 = corner(xi, yi, fx, fy);
        let n10 = corner(xi.wrapping_add(1), yi, fx - 1.0, fy);
        let n01 = corner(xi, yi.wrapping_add(1), fx, fy - 1.0);
        let n11 = corner(xi.wrapping_add(1), yi.wrapping_add(1), fx - 1.0, fy - 1.0);

        let u = smoothstep(fx);
        let v = smoothstep(fy);

        let nx0 = lerp(n00, n10, u);
        let nx1 = lerp(n01, n11, u);

        (lerp(nx0, nx1, v) + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_bitwise_deterministic() {
        for &(x, y, seed) in &[(0.3f32, 7.9f32, 1u32), (-12.25, 3.5, 42), (1000.1, -999.7, 0xdead_beef)] {
            let a = GradientNoise::sample(Vec2::new(x, y), seed);
            let b = GradientNoise::sample(Vec2::new(x, y), seed);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_lattice_points_are_neutral() {
        for (x, y) in [(0.0, 0.0), (3.0, -2.0), (-17.0, 5.0)] {
            assert_eq!(GradientNoise::sample(Vec2::new(x, y), 9), 0.5);
        }
    }

    #[test]
    fn test_continuous_across_cell_boundaries() {
        let eps = 1e-4;
        for seed in [1u32, 42, 777] {
            for k in -3..4 {
                let edge = k as f32;
                for t in [0.1f32, 0.45, 0.8] {
                    let left = GradientNoise::sample(Vec2::new(edge - eps, t), seed);
                    let right = GradientNoise::sample(Vec2::new(edge + eps, t), seed);
                    assert!((left - right).abs() < 1e-3, "jump at x={} seed={}", edge, seed);

                    let below = GradientNoise::sample(Vec2::new(t, edge - eps), seed);
                    let above = GradientNoise::sample(Vec2::new(t, edge + eps), seed);
                    assert!((below - above).abs() < 1e-3, "jump at y={} seed={}", edge, seed);
                }
            }
        }
    }

    #[test]
    fn test_output_stays_in_unit_range() {
        for i in 0..400 {
            let p = Vec2::new(i as f32 * 0.173 - 30.0, i as f32 * 0.291 - 50.0);
            let v = GradientNoise::sample(p, 5);
            assert!((0.0..=1.0).contains(&v), "{} out of range at {:?}", v, p);
        }
    }

    #[test]
    fn test_seed_changes_field() {
        let p = Vec2::new(2.4, 8.7);
        assert_ne!(GradientNoise::sample(p, 1), GradientNoise::sample(p, 2));
    }

    #[test]
    fn test_hash_combine_matches_reference_mix() {
        let h = hash_combine(0, 0);
        assert_eq!(h, 0x9e37_79b9);
        assert_ne!(hash_lattice(1, 2, 3), hash_lattice(2, 1, 3));
    }
}
