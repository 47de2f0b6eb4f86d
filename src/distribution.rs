//! Discrete probability distributions over daily nap counts.
//!
//! Every distribution in this crate lives on the closed support
//! `0..=MAX_NAP_COUNT` (an infant naps between zero and six times a day).
//! The representation is dense: a count with probability `0.0` and an
//! absent count are the same thing.
//!
//! Distributions are used in two forms:
//!
//! - **unnormalized**: raw fractions as parsed from a population table
//!   (blank cells drop out, so the mass can sum below 1);
//! - **normalized**: mass rescaled to sum to 1, produced on demand by
//!   [`CountDistribution::normalize`].
//!
//! All mass accumulation is done in `f64`; the HDI scan compares coverage
//! against its target at a `1e-9` tolerance, which is below `f32`
//! resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest representable daily nap count.
pub const MAX_NAP_COUNT: u8 = 6;

/// Number of points in the closed support `0..=MAX_NAP_COUNT`.
pub const SUPPORT_SIZE: usize = MAX_NAP_COUNT as usize + 1;

/// Tolerance when comparing cumulative mass against an HDI target.
const MASS_TOLERANCE: f64 = 1e-9;

/// Probability mass over daily nap counts 0..=6.
///
/// Values are kept exactly as given (no implicit rescaling), so the same
/// type serves both the unnormalized population prior and the normalized
/// posterior. Out-of-support counts and non-finite or negative masses are
/// rejected at the boundary and never reach the aggregate computations.
///
/// # Example
///
/// ```
/// use siesta::CountDistribution;
///
/// let prior = CountDistribution::from_pairs(&[(1, 0.10), (2, 0.25), (3, 0.40), (4, 0.20), (5, 0.05)]);
/// assert_eq!(prior.mode(), Some(3));
/// assert!((prior.raw_mean() - 2.85).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CountDistribution {
    probs: [f64; SUPPORT_SIZE],
}

/// Mean and variance of a distribution.
///
/// Meaningful for normalized mass; callers normalize first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Expected nap count E[K].
    pub mean: f64,
    /// Variance `Var[K]`, clamped at zero against floating-point error.
    pub variance: f64,
}

impl Moments {
    /// Standard deviation, the square root of the variance.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Narrowest contiguous support range holding a target probability mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HdiInterval {
    /// Inclusive lower nap count.
    pub low: u8,
    /// Inclusive upper nap count.
    pub high: u8,
    /// Probability mass actually covered by `[low, high]`.
    pub covered: f64,
}

impl HdiInterval {
    /// Interval width in support steps (`high - low`).
    #[must_use]
    pub fn width(&self) -> u8 {
        self.high - self.low
    }
}

impl CountDistribution {
    /// Creates an empty (all-zero) distribution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a distribution from `(count, mass)` pairs.
    ///
    /// Out-of-support counts and non-finite or negative masses are
    /// ignored. Duplicate counts accumulate.
    ///
    /// # Example
    ///
    /// ```
    /// use siesta::CountDistribution;
    ///
    /// let d = CountDistribution::from_pairs(&[(2, 0.6), (9, 1.0), (3, f64::NAN)]);
    /// assert_eq!(d.get(2), 0.6);
    /// assert_eq!(d.total(), 0.6);
    /// ```
    #[must_use]
    pub fn from_pairs(pairs: &[(u8, f64)]) -> Self {
        let mut dist = Self::new();
        for &(count, p) in pairs {
            if count <= MAX_NAP_COUNT && p.is_finite() && p > 0.0 {
                dist.probs[count as usize] += p;
            }
        }
        dist
    }

    /// Builds a one-hot distribution placing all mass on `count`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`MAX_NAP_COUNT`].
    #[must_use]
    pub fn point_mass(count: u8) -> Self {
        assert!(
            count <= MAX_NAP_COUNT,
            "nap count must be within the 0..={MAX_NAP_COUNT} support"
        );
        let mut dist = Self::new();
        dist.probs[count as usize] = 1.0;
        dist
    }

    /// Mass at `count`; zero for out-of-support counts.
    #[must_use]
    pub fn get(&self, count: u8) -> f64 {
        if count > MAX_NAP_COUNT {
            return 0.0;
        }
        self.probs[count as usize]
    }

    /// Sets the mass at `count`.
    ///
    /// Out-of-support counts and non-finite or negative masses are
    /// ignored.
    pub fn set(&mut self, count: u8, p: f64) {
        if count > MAX_NAP_COUNT || !p.is_finite() || p < 0.0 {
            return;
        }
        self.probs[count as usize] = p;
    }

    /// Total mass over the support.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Whether the distribution carries no mass at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() <= 0.0
    }

    /// Iterates `(count, mass)` in ascending count order over the full
    /// support, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.probs
            .iter()
            .enumerate()
            .map(|(k, &p)| (k as u8, p))
    }

    /// Returns the distribution rescaled to total mass 1.
    ///
    /// An empty distribution is returned unchanged rather than divided by
    /// zero. Idempotent on already-normalized input.
    ///
    /// # Example
    ///
    /// ```
    /// use siesta::CountDistribution;
    ///
    /// let d = CountDistribution::from_pairs(&[(1, 0.2), (2, 0.2)]).normalize();
    /// assert!((d.total() - 1.0).abs() < 1e-12);
    /// assert!((d.get(1) - 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn normalize(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return *self;
        }
        let mut probs = self.probs;
        for p in &mut probs {
            *p /= total;
        }
        Self { probs }
    }

    /// Mean and variance of the stored mass.
    ///
    /// Mean = Σ k·p(k), variance = Σ k²·p(k) − mean². These are the
    /// distribution moments only when the mass is normalized; the sigma
    /// retention mode normalizes before calling this.
    #[must_use]
    pub fn moments(&self) -> Moments {
        let mut mean = 0.0;
        let mut second = 0.0;
        for (count, p) in self.iter() {
            let k = f64::from(count);
            mean += k * p;
            second += k * k * p;
        }
        let variance = (second - mean * mean).max(0.0);
        Moments { mean, variance }
    }

    /// Mass-weighted mean over the *unnormalized* values: Σ k·p(k) / Σ p(k).
    ///
    /// This is the "raw mean" used as the fixed retention window center
    /// when no curated reference mean exists for an age. It differs from
    /// [`moments`](Self::moments) on unnormalized input and the two are
    /// deliberately kept as separate computations. Returns 0.0 for an
    /// empty distribution.
    #[must_use]
    pub fn raw_mean(&self) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self.iter().map(|(count, p)| f64::from(count) * p).sum();
        weighted / total
    }

    /// Most probable nap count, or `None` for an empty distribution.
    ///
    /// The support is scanned in ascending order with a strictly-greater
    /// comparison, so ties resolve to the lowest count. Counts with zero
    /// mass never win.
    ///
    /// # Example
    ///
    /// ```
    /// use siesta::CountDistribution;
    ///
    /// let tied = CountDistribution::from_pairs(&[(2, 0.4), (4, 0.4), (5, 0.2)]);
    /// assert_eq!(tied.mode(), Some(2));
    /// assert_eq!(CountDistribution::new().mode(), None);
    /// ```
    #[must_use]
    pub fn mode(&self) -> Option<u8> {
        let mut best: Option<(u8, f64)> = None;
        for (count, p) in self.iter() {
            if p <= 0.0 {
                continue;
            }
            let improves = match best {
                None => true,
                Some((_, best_p)) => p > best_p,
            };
            if improves {
                best = Some((count, p));
            }
        }
        best.map(|(count, _)| count)
    }

    /// Narrowest contiguous range covering at least `mass` probability.
    ///
    /// Expects normalized input for `mass` in `(0, 1]` to be meaningful.
    /// The scan is brute force over all O(support²) windows with a prefix
    /// sum: a window qualifies when its coverage reaches `mass` within a
    /// `1e-9` tolerance; among qualifying windows the narrowest wins,
    /// equal widths prefer greater coverage, and remaining ties keep the
    /// first window encountered (low-to-high start, then end).
    ///
    /// A distribution with no qualifying window (only possible when the
    /// total mass falls short of `mass`, e.g. the empty distribution)
    /// yields the degenerate point `[0, 0]` with zero coverage.
    ///
    /// # Example
    ///
    /// ```
    /// use siesta::CountDistribution;
    ///
    /// let d = CountDistribution::from_pairs(&[(1, 0.10), (2, 0.25), (3, 0.40), (4, 0.20), (5, 0.05)]);
    /// let interval = d.hdi(0.95);
    /// assert_eq!((interval.low, interval.high), (1, 4));
    /// assert!((interval.covered - 0.95).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn hdi(&self, mass: f64) -> HdiInterval {
        let mut prefix = [0.0_f64; SUPPORT_SIZE + 1];
        for k in 0..SUPPORT_SIZE {
            prefix[k + 1] = prefix[k] + self.probs[k];
        }

        let mut best: Option<HdiInterval> = None;
        for i in 0..SUPPORT_SIZE {
            for j in i..SUPPORT_SIZE {
                let covered = prefix[j + 1] - prefix[i];
                if covered + MASS_TOLERANCE < mass {
                    continue;
                }
                let width = j - i;
                let improves = match &best {
                    None => true,
                    Some(b) => {
                        let best_width = usize::from(b.width());
                        width < best_width || (width == best_width && covered > b.covered)
                    }
                };
                if improves {
                    best = Some(HdiInterval {
                        low: i as u8,
                        high: j as u8,
                        covered,
                    });
                }
            }
        }

        best.unwrap_or(HdiInterval {
            low: 0,
            high: 0,
            covered: 0.0,
        })
    }

    /// Draws one nap count by inverse-CDF sampling over the stored mass.
    ///
    /// Works on unnormalized mass (the draw is scaled by the total).
    /// Returns `None` for an empty distribution.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use siesta::CountDistribution;
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let d = CountDistribution::point_mass(3);
    /// assert_eq!(d.sample(&mut rng), Some(3));
    /// ```
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<u8> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let target: f64 = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut last_nonzero = None;
        for (count, p) in self.iter() {
            if p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_nonzero = Some(count);
            if target < cumulative {
                return Some(count);
            }
        }
        // Floating-point shortfall at the top of the CDF.
        last_nonzero
    }
}
