//! Initial placement of strategy-map nodes.
//!
//! Each category owns a region of an 800x600 canvas. Nodes alternate to
//! either side of their region's anchor by index parity and get a bounded
//! random offset so siblings do not stack.

use std::ops::RangeInclusive;

use lens_core::StrategyNodeCategory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

/// Maximum random offset on each axis
pub const JITTER: f64 = 50.0;

/// Vertical spread for the left (Operation) and right (Market) columns
pub const COLUMN_SPREAD: f64 = 100.0;

/// Horizontal spread for the bottom (Finance) and top (Risk) rows
pub const ROW_SPREAD: f64 = 150.0;

pub const OPERATION_ANCHOR: (f64, f64) = (150.0, 300.0);
pub const PRODUCT_ANCHOR: (f64, f64) = (400.0, 300.0);
pub const MARKET_ANCHOR: (f64, f64) = (650.0, 300.0);
pub const FINANCE_ANCHOR: (f64, f64) = (400.0, 500.0);
pub const RISK_ANCHOR: (f64, f64) = (400.0, 100.0);

/// Source of layout noise
pub trait JitterSource: Send {
    /// Offset in `[-JITTER, JITTER]`
    fn offset(&mut self) -> f64;
}

/// Uniform jitter from a seedable RNG
pub struct RandJitter {
    rng: StdRng,
}

impl RandJitter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSource for RandJitter {
    fn offset(&mut self) -> f64 {
        self.rng.gen_range(-JITTER..=JITTER)
    }
}

/// No noise; nodes land exactly on their parity slots
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn offset(&mut self) -> f64 {
        0.0
    }
}

pub fn anchor(category: StrategyNodeCategory) -> (f64, f64) {
    match category {
        StrategyNodeCategory::Operation => OPERATION_ANCHOR,
        StrategyNodeCategory::Product => PRODUCT_ANCHOR,
        StrategyNodeCategory::Market => MARKET_ANCHOR,
        StrategyNodeCategory::Finance => FINANCE_ANCHOR,
        StrategyNodeCategory::Risk => RISK_ANCHOR,
    }
}

/// Even indices go up/left, odd indices down/right
fn parity(index: usize) -> f64 {
    if index % 2 == 0 {
        -1.0
    } else {
        1.0
    }
}

/// Parity spread as an (x, y) offset
fn spread(category: StrategyNodeCategory, index: usize) -> (f64, f64) {
    let side = parity(index);
    match category {
        StrategyNodeCategory::Operation | StrategyNodeCategory::Market => (0.0, side * COLUMN_SPREAD),
        StrategyNodeCategory::Finance | StrategyNodeCategory::Risk => (side * ROW_SPREAD, 0.0),
        StrategyNodeCategory::Product => (0.0, 0.0),
    }
}

/// Coordinates for the node at `index` in the node list
pub fn position(
    category: StrategyNodeCategory,
    index: usize,
    jitter: &mut dyn JitterSource,
) -> (f64, f64) {
    let (ax, ay) = anchor(category);
    let (sx, sy) = spread(category, index);
    let jx = jitter.offset().clamp(-JITTER, JITTER);
    let jy = jitter.offset().clamp(-JITTER, JITTER);
    (ax + sx + jx, ay + sy + jy)
}

/// Bounding box every node of a category falls within
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub x: RangeInclusive<f64>,
    pub y: RangeInclusive<f64>,
}

impl Region {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }
}

pub fn region(category: StrategyNodeCategory) -> Region {
    let (ax, ay) = anchor(category);
    let (sx, sy) = spread(category, 0);
    let (sx, sy) = (sx.abs(), sy.abs());
    Region {
        x: (ax - sx - JITTER)..=(ax + sx + JITTER),
        y: (ay - sy - JITTER)..=(ay + sy + JITTER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl JitterSource for Fixed {
        fn offset(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_regions() {
        assert_eq!(
            region(StrategyNodeCategory::Operation),
            Region {
                x: 100.0..=200.0,
                y: 150.0..=450.0
            }
        );
        assert_eq!(
            region(StrategyNodeCategory::Product),
            Region {
                x: 350.0..=450.0,
                y: 250.0..=350.0
            }
        );
        assert_eq!(
            region(StrategyNodeCategory::Market),
            Region {
                x: 600.0..=700.0,
                y: 150.0..=450.0
            }
        );
        assert_eq!(
            region(StrategyNodeCategory::Finance),
            Region {
                x: 200.0..=600.0,
                y: 450.0..=550.0
            }
        );
        assert_eq!(
            region(StrategyNodeCategory::Risk),
            Region {
                x: 200.0..=600.0,
                y: 50.0..=150.0
            }
        );
    }

    #[test]
    fn test_parity_slots_without_jitter() {
        let mut none = NoJitter;
        assert_eq!(position(StrategyNodeCategory::Operation, 0, &mut none), (150.0, 200.0));
        assert_eq!(position(StrategyNodeCategory::Operation, 1, &mut none), (150.0, 400.0));
        assert_eq!(position(StrategyNodeCategory::Market, 3, &mut none), (650.0, 400.0));
        assert_eq!(position(StrategyNodeCategory::Finance, 2, &mut none), (250.0, 500.0));
        assert_eq!(position(StrategyNodeCategory::Risk, 5, &mut none), (550.0, 100.0));
        assert_eq!(position(StrategyNodeCategory::Product, 7, &mut none), (400.0, 300.0));
    }

    #[test]
    fn test_extreme_jitter_stays_in_region() {
        for value in [-JITTER, JITTER, 10_000.0, -10_000.0] {
            let mut jitter = Fixed(value);
            for category in StrategyNodeCategory::ALL {
                for index in 0..4 {
                    let (x, y) = position(category, index, &mut jitter);
                    assert!(region(category).contains(x, y), "{:?} {} -> ({}, {})", category, index, x, y);
                }
            }
        }
    }

    #[test]
    fn test_random_jitter_stays_in_canvas() {
        let mut jitter = RandJitter::seeded(7);
        for _ in 0..200 {
            for category in StrategyNodeCategory::ALL {
                let (x, y) = position(category, 1, &mut jitter);
                assert!((0.0..=CANVAS_WIDTH).contains(&x));
                assert!((0.0..=CANVAS_HEIGHT).contains(&y));
                assert!(region(category).contains(x, y));
            }
        }
    }
}
