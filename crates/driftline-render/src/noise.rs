//! Seeded 2D simplex noise.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

const F2: f64 = 0.366_025_403_784_438_6; // 0.5 * (sqrt(3) - 1)
const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

const GRADIENTS: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// 2D simplex noise over a shuffled permutation table.
///
/// Output is smooth, deterministic for a given table, and within `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct Simplex2 {
    perm: [u8; 512],
}

impl Simplex2 {
    /// Build a table by shuffling with the given generator.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    /// Sample the noise field at `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Skew into simplex cell space
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let n0 = self.corner(ii, jj, x0, y0);
        let n1 = self.corner(ii + i1, jj + j1, x1, y1);
        let n2 = self.corner(ii + 1, jj + 1, x2, y2);

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    fn corner(&self, i: usize, j: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            return 0.0;
        }
        let idx = self.perm[i + self.perm[j] as usize] as usize % GRADIENTS.len();
        let (gx, gy) = GRADIENTS[idx];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }
}
