//! Snapping an axis range to a readable step

/// Multipliers tried, in order, for each power of ten
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Result of [`snap_ends`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapped {
    pub from: f64,
    pub to: f64,
    pub step: f64,
    pub steps: usize,
}

/// Round `[from, to]` outward to a whole number of "nice" steps.
///
/// `from` is kept as is; `to` moves up to the next multiple of the step
/// counted from `from`. The step is the smallest of 1, 2, 2.5, 5 or 10 times
/// a power of ten that covers the range in at most `steps` steps.
///
/// An empty or inverted range snaps to a single point at `from.max(to)`.
pub fn snap_ends(from: f64, to: f64, steps: usize) -> Snapped {
    let steps = steps.max(1);
    let span = to - from;
    if !(span > 0.0) || !span.is_finite() {
        return Snapped {
            from,
            to: from.max(to),
            step: 1.0,
            steps: 0,
        };
    }

    let raw = span / steps as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let multiplier = NICE_STEPS
        .iter()
        .copied()
        .find(|m| *m >= normalized)
        .unwrap_or(10.0);
    let step = multiplier * magnitude;

    let count = ((span / step).ceil() as usize).clamp(1, steps);
    let snapped_to = from + count as f64 * step;
    Snapped {
        from,
        // Rounding can leave the last grid line an ulp short of `to`
        to: snapped_to.max(to),
        step,
        steps: count,
    }
}
