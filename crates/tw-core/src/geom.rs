//! Heading and coordinate arithmetic shared by topology, layout and world.
//!
//! Headings are compass degrees: 0 is north (+y), 90 is east (+x), and they
//! grow clockwise.  All helpers here are pure and allocation-free.

use crate::{EngineError, EngineResult};

/// Wrap `pos` into the half-open interval `[min, max)`.
///
/// Values already inside the interval are returned unchanged, bit for bit.
#[inline]
pub fn wrap(pos: f64, min: f64, max: f64) -> f64 {
    if pos >= max {
        min + (pos - max) % (max - min)
    } else if pos < min {
        let result = max - ((min - pos) % (max - min));
        // (min - pos) may be an exact multiple of the width, which lands on
        // `max` itself.
        if result < max { result } else { min }
    } else {
        pos
    }
}

/// `value` unchanged if it is finite, else a domain error naming `what`.
///
/// Coordinates and headings pass through here before anything stores them;
/// [`wrap`] and [`normalize_heading`] turn infinities into NaN.
#[inline]
pub fn finite(value: f64, what: &str) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::domain(format!("{what} must be a finite number, not {value}")))
    }
}

/// Normalize a heading into `[0, 360)`.
#[inline]
pub fn normalize_heading(h: f64) -> f64 {
    if (0.0..360.0).contains(&h) {
        h
    } else {
        let r = ((h % 360.0) + 360.0) % 360.0;
        if r >= 360.0 { 0.0 } else { r }
    }
}

/// Signed smallest turn from heading `h2` to heading `h1`, in `(-180, 180]`.
pub fn subtract_headings(h1: f64, h2: f64) -> f64 {
    let h1 = normalize_heading(h1);
    let h2 = normalize_heading(h2);
    let diff = h1 - h2;
    if diff > -180.0 && diff <= 180.0 {
        diff
    } else if diff > 0.0 {
        diff - 360.0
    } else {
        diff + 360.0
    }
}

/// Heading of the vector `(dx, dy)`.
///
/// The axis-aligned cases return exact headings.  A zero vector has no
/// heading; `(x, y)` is only used for the error message.
pub fn heading_from_delta(dx: f64, dy: f64, x: f64, y: f64) -> EngineResult<f64> {
    if dx == 0.0 && dy == 0.0 {
        return Err(EngineError::NoHeading { x, y });
    }
    if dy == 0.0 {
        return Ok(if dx > 0.0 { 90.0 } else { 270.0 });
    }
    if dx == 0.0 {
        return Ok(if dy > 0.0 { 0.0 } else { 180.0 });
    }
    Ok((270.0 + (std::f64::consts::PI + (-dy).atan2(dx)).to_degrees()) % 360.0)
}

/// `(sin, cos)` of a compass heading, exact at the four cardinal points so
/// that axis-aligned moves do not drift off the grid.
#[inline]
pub fn heading_sin_cos(heading: f64) -> (f64, f64) {
    if heading == 0.0 {
        (0.0, 1.0)
    } else if heading == 90.0 {
        (1.0, 0.0)
    } else if heading == 180.0 {
        (0.0, -1.0)
    } else if heading == 270.0 {
        (-1.0, 0.0)
    } else {
        heading.to_radians().sin_cos()
    }
}

/// Plain Euclidean distance.
#[inline]
pub fn euclidean(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}
