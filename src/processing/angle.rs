//! Angle normalization and phase unwrapping.
//!
//! All helpers are pure and work on radians. `constrain_angle` maps into the
//! half-open interval `(-PI, PI]`; values already inside it are returned
//! untouched so a second application is bit-identical to the first.

use std::f64::consts::{PI, TAU};

/// Map any angle into `(-PI, PI]`.
pub fn constrain_angle(x: f64) -> f64 {
    if x > -PI && x <= PI {
        return x;
    }
    let mut r = (x + PI) % TAU;
    if r <= 0.0 {
        r += TAU;
    }
    r - PI
}

/// Normalize a raw angle before taking a difference against it.
pub fn angle_conv(angle: f64) -> f64 {
    constrain_angle(angle) % TAU
}

/// Signed shortest angular distance from `a` to `b`, in `(-PI, PI]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    constrain_angle(b - a)
}

/// Continue an unwrapped phase curve by one raw sample.
///
/// `previous` is the running unwrapped value, `raw` the next wrapped sample.
/// The returned value never differs from `previous` by more than `PI`.
pub fn unwrap(previous: f64, raw: f64) -> f64 {
    previous - angle_diff(raw, angle_conv(previous))
}

/// Unwrap a whole phase sequence left to right, seeded by the first raw sample.
pub fn unwrap_sequence(raw: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(raw.len());
    let mut iter = raw.iter().copied();
    let Some(first) = iter.next() else {
        return out;
    };
    out.push(first);
    let mut previous = first;
    for value in iter {
        previous = unwrap(previous, value);
        out.push(previous);
    }
    out
}
