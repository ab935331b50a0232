//! Table sizing parameters.

use crate::error::{Result, TableError};

/// Slots allocated by `ProbeTable::new`.
pub const DEFAULT_CAPACITY: usize = 16;
/// Load factor above which an insert grows the table first.
pub const DEFAULT_RESIZE_THRESHOLD: f64 = 0.5;
/// Capacity multiplier applied on growth.
pub const DEFAULT_RESIZE_FACTOR: f64 = 2.0;

/// Capacity and growth parameters for a `ProbeTable`.
///
/// Misconfigured parameters degrade performance rather than correctness:
/// a threshold close to 1.0 lengthens probe chains, and a factor close to
/// 1.0 makes every growth step cost O(n) for a single extra slot.
///
/// ```
/// use probe_table::TableConfig;
///
/// let cfg = TableConfig::default()
///     .with_capacity(4)
///     .with_resize_threshold(0.75);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.resize_factor, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Initial number of slots. Must be at least 1.
    pub capacity: usize,
    /// Growth triggers when `(len + 1) / capacity` would exceed this.
    /// Must lie in `(0, 1]`.
    pub resize_threshold: f64,
    /// New capacity is `floor(capacity * resize_factor)`, and always at
    /// least one more than before. Must be finite and `>= 1.0`.
    pub resize_factor: f64,
}

impl TableConfig {
    pub const fn new(capacity: usize, resize_threshold: f64, resize_factor: f64) -> Self {
        Self {
            capacity,
            resize_threshold,
            resize_factor,
        }
    }

    pub fn with_capacity(self, capacity: usize) -> Self {
        Self { capacity, ..self }
    }

    pub fn with_resize_threshold(self, resize_threshold: f64) -> Self {
        Self {
            resize_threshold,
            ..self
        }
    }

    pub fn with_resize_factor(self, resize_factor: f64) -> Self {
        Self {
            resize_factor,
            ..self
        }
    }

    /// Reject parameters the growth policy cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(TableError::InvalidConfig("capacity must be at least 1"));
        }
        // NaN fails both comparisons.
        if !(self.resize_threshold > 0.0 && self.resize_threshold <= 1.0) {
            return Err(TableError::InvalidConfig(
                "resize threshold must lie in (0, 1]",
            ));
        }
        if !self.resize_factor.is_finite() || self.resize_factor < 1.0 {
            return Err(TableError::InvalidConfig(
                "resize factor must be finite and at least 1.0",
            ));
        }
        Ok(())
    }

    /// Whether holding `prospective` entries in `capacity` slots calls for
    /// growth. One slot is always kept free so probes terminate.
    pub(crate) fn needs_growth(&self, prospective: usize, capacity: usize) -> bool {
        prospective >= capacity
            || prospective as f64 / capacity as f64 > self.resize_threshold
    }

    /// Capacity after one growth step from `capacity`.
    pub(crate) fn grown_capacity(&self, capacity: usize) -> Result<usize> {
        let target = (capacity as f64 * self.resize_factor).floor();
        let overflow = TableError::CapacityOverflow {
            capacity,
            factor: self.resize_factor,
        };
        // `usize::MAX as f64` rounds up, so `>=` is the safe bound.
        if !(target < usize::MAX as f64) {
            return Err(overflow);
        }
        let bumped = capacity.checked_add(1).ok_or(overflow)?;
        Ok((target as usize).max(bumped))
    }

    /// Capacity to rehash into so `prospective` entries fit.
    ///
    /// One growth step from `capacity` is taken; if that is still too small
    /// the target jumps straight to the smallest capacity that fits.
    pub(crate) fn growth_target(&self, prospective: usize, capacity: usize) -> Result<usize> {
        let stepped = self.grown_capacity(capacity)?;
        if !self.needs_growth(prospective, stepped) {
            return Ok(stepped);
        }
        self.min_capacity_for(prospective, capacity)
    }

    /// Smallest capacity that holds `prospective` entries without growth.
    fn min_capacity_for(&self, prospective: usize, capacity: usize) -> Result<usize> {
        let overflow = || TableError::CapacityOverflow {
            capacity,
            factor: self.resize_factor,
        };
        let estimate = (prospective as f64 / self.resize_threshold).ceil();
        if !(estimate < usize::MAX as f64) {
            return Err(overflow());
        }
        let floor = prospective.checked_add(1).ok_or_else(overflow)?;
        let mut target = (estimate as usize).max(floor);
        // The division can round the estimate a slot off in either direction.
        while target > floor && !self.needs_growth(prospective, target - 1) {
            target -= 1;
        }
        while self.needs_growth(prospective, target) {
            target = target.checked_add(1).ok_or_else(overflow)?;
        }
        Ok(target)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CAPACITY,
            DEFAULT_RESIZE_THRESHOLD,
            DEFAULT_RESIZE_FACTOR,
        )
    }
}
