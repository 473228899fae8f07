//! Running window accumulator shared by the sliding-window indicators.
//!
//! Values are summed relative to a fixed `shift` so that variance stays
//! accurate for price levels far from zero. Non-finite values never enter the
//! sums; they are counted instead and the window is "dirty" until they leave.
//!
//! A window holding one repeated value reports that value and zero variance
//! exactly. Callers rebuild the sums from the live window on the steps given
//! by [`resync_due`] so rounding error from values long gone cannot build up.

#[derive(Debug, Clone)]
pub(crate) struct RollingSum {
    shift: f64,
    sum: f64,
    sum_sq: f64,
    non_finite: usize,
    non_zero: usize,
    last: f64,
    run: usize,
}

impl RollingSum {
    pub(crate) fn new(shift: f64) -> Self {
        Self {
            shift,
            sum: 0.0,
            sum_sq: 0.0,
            non_finite: 0,
            non_zero: 0,
            last: f64::NAN,
            run: 0,
        }
    }

    /// Shift taken from the first finite value, 0 when there is none.
    pub(crate) fn for_values(values: &[f64]) -> Self {
        Self::new(values.iter().copied().find(|v| v.is_finite()).unwrap_or(0.0))
    }

    pub(crate) fn push(&mut self, x: f64) {
        if x.is_finite() && x == self.last {
            self.run += 1;
        } else {
            self.last = x;
            self.run = usize::from(x.is_finite());
        }
        self.add(x);
    }

    fn add(&mut self, x: f64) {
        if !x.is_finite() {
            self.non_finite += 1;
            return;
        }
        let d = x - self.shift;
        if d != 0.0 {
            self.non_zero += 1;
            self.sum += d;
            self.sum_sq += d * d;
        }
    }

    pub(crate) fn pop(&mut self, x: f64) {
        if !x.is_finite() {
            self.non_finite -= 1;
            return;
        }
        let d = x - self.shift;
        if d != 0.0 {
            self.non_zero -= 1;
            self.sum -= d;
            self.sum_sq -= d * d;
        }
        // Nothing but exact zeros left: drop accumulated rounding residue.
        if self.non_zero == 0 {
            self.sum = 0.0;
            self.sum_sq = 0.0;
        }
    }

    /// Rebuilds the sums from the values currently in the window, discarding
    /// the rounding error left behind by values that have already left it.
    pub(crate) fn resync<I: IntoIterator<Item = f64>>(&mut self, window: I) {
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.non_finite = 0;
        self.non_zero = 0;
        for x in window {
            self.add(x);
        }
    }

    /// No non-finite value currently inside the window.
    pub(crate) fn is_clean(&self) -> bool {
        self.non_finite == 0
    }

    /// The last `count` pushes were all the same finite value.
    fn is_flat(&self, count: usize) -> bool {
        self.run >= count
    }

    pub(crate) fn mean(&self, count: usize) -> f64 {
        if self.is_flat(count) {
            return self.last;
        }
        self.shift + self.sum / count as f64
    }

    /// Population variance, clamped at zero.
    pub(crate) fn variance(&self, count: usize) -> f64 {
        if self.is_flat(count) {
            return 0.0;
        }
        let n = count as f64;
        let m = self.sum / n;
        (self.sum_sq / n - m * m).max(0.0)
    }
}

/// Whether the accumulator should be rebuilt after pushing index `i`: once
/// every `window` steps after the first window is full, so amortised O(1).
pub(crate) fn resync_due(i: usize, window: usize) -> bool {
    i >= window && (i + 1) % window == 0
}
