//! Value scales for sweep axes.

/// Geometric progression `base^min_exp ..= base^max_exp`.
///
/// # Example
/// ```
/// use exspeed_harness::LogScale;
///
/// let depths: Vec<_> = LogScale::new(10, 1, 3).values().collect();
/// assert_eq!(depths, vec![10, 100, 1000]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogScale {
    pub base: u32,
    pub min_exp: u32,
    pub max_exp: u32,
}

impl LogScale {
    pub const fn new(base: u32, min_exp: u32, max_exp: u32) -> Self {
        Self {
            base,
            min_exp,
            max_exp,
        }
    }

    /// Depths 10, 100, 1000.
    pub const DECADES: Self = Self::new(10, 1, 3);

    pub fn values(&self) -> impl Iterator<Item = u32> {
        let base = self.base;
        (self.min_exp..=self.max_exp).map(move |exp| base.saturating_pow(exp))
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max_exp - self.min_exp + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_exp > self.max_exp
    }
}
