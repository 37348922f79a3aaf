//! Range & pattern detector.
//!
//! Stage one of the pipeline: compute the rolling close range and volume
//! average, flag the two accumulation patterns plus the weakness exit
//! condition per bar, and collapse the flags into an enter/exit/hold signal.
//!
//! Pattern flags compare against the *previous* bar's range so the bar being
//! tested never participates in the range it is breaking out of. All float
//! comparisons against NaN are false, so warm-up bars (and bar 0, which has
//! no previous range) can never flag.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::{Indicator, RangeExtreme, VolumeSma};

/// Per-bar trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Go long (or stay long): a spring or breakout fired.
    Enter,
    /// Go flat: price fell back below resistance.
    Exit,
    /// Carry the previous position forward.
    Hold,
}

impl Signal {
    /// Conventional numeric encoding: enter +1, exit -1, hold 0.
    pub fn value(self) -> i8 {
        match self {
            Signal::Enter => 1,
            Signal::Exit => -1,
            Signal::Hold => 0,
        }
    }
}

/// Rolling range statistics, index-aligned with the bar slice.
///
/// NaN for the first `window - 1` positions.
#[derive(Debug, Clone)]
pub struct RangeSeries {
    pub range_high: Vec<f64>,
    pub range_low: Vec<f64>,
    pub volume_avg: Vec<f64>,
}

/// Per-bar boolean pattern flags, index-aligned with the bar slice.
#[derive(Debug, Clone)]
pub struct PatternFlags {
    /// Shakeout: low pierces support, close recovers above it, on volume.
    pub spring: Vec<bool>,
    /// Close clears resistance on volume.
    pub breakout: Vec<bool>,
    /// Exit trigger: close fell back below resistance it closed above yesterday.
    pub weakness: Vec<bool>,
}

/// Full detector output for one bar series.
#[derive(Debug, Clone)]
pub struct Detection {
    pub ranges: RangeSeries,
    pub flags: PatternFlags,
    pub signals: Vec<Signal>,
}

impl Detection {
    pub fn spring_count(&self) -> usize {
        self.flags.spring.iter().filter(|&&f| f).count()
    }

    pub fn breakout_count(&self) -> usize {
        self.flags.breakout.iter().filter(|&&f| f).count()
    }

    pub fn exit_count(&self) -> usize {
        self.flags.weakness.iter().filter(|&&f| f).count()
    }
}

/// Compute the rolling range and volume average over a trailing window.
pub fn compute_ranges(bars: &[Bar], window: usize) -> RangeSeries {
    RangeSeries {
        range_high: RangeExtreme::high(window).compute(bars),
        range_low: RangeExtreme::low(window).compute(bars),
        volume_avg: VolumeSma::new(window).compute(bars),
    }
}

/// Flag spring, breakout, and weakness conditions per bar.
///
/// Spring and breakout reference the previous bar's range edges; weakness
/// references the current bar's resistance. Bar 0 never flags.
pub fn detect_patterns(bars: &[Bar], ranges: &RangeSeries) -> PatternFlags {
    let n = bars.len();
    let mut spring = vec![false; n];
    let mut breakout = vec![false; n];
    let mut weakness = vec![false; n];

    for i in 1..n {
        let prev_low = ranges.range_low[i - 1];
        let prev_high = ranges.range_high[i - 1];
        let vol_avg = ranges.volume_avg[i];
        let vol = bars[i].volume as f64;

        spring[i] = bars[i].low < prev_low && bars[i].close > prev_low && vol > vol_avg;
        breakout[i] = bars[i].close > prev_high && vol > vol_avg;

        let cur_high = ranges.range_high[i];
        weakness[i] = bars[i].close < cur_high && bars[i - 1].close > cur_high;
    }

    PatternFlags {
        spring,
        breakout,
        weakness,
    }
}

/// Collapse pattern flags into one signal per bar.
///
/// Weakness is evaluated after spring/breakout and overrides them when both
/// fire on the same bar. That exit-wins tie-break is an inherited, intentional
/// property of the strategy; changing it changes every downstream series.
pub fn derive_signals(flags: &PatternFlags) -> Vec<Signal> {
    flags
        .spring
        .iter()
        .zip(&flags.breakout)
        .zip(&flags.weakness)
        .map(|((&spring, &breakout), &weakness)| {
            if weakness {
                Signal::Exit
            } else if spring || breakout {
                Signal::Enter
            } else {
                Signal::Hold
            }
        })
        .collect()
}

/// Run the full detector: ranges, flags, and signals for one bar series.
pub fn detect(bars: &[Bar], window: usize) -> Detection {
    let ranges = compute_ranges(bars, window);
    let flags = detect_patterns(bars, &ranges);
    let signals = derive_signals(&flags);
    Detection {
        ranges,
        flags,
        signals,
    }
}
