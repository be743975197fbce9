//! Timing curves mapping linear progress to eased progress.

use crate::error::{AnimationError, Result};
use std::f32::consts::PI;

/// Overshoot used by `back.out` when none is given
const DEFAULT_OVERSHOOT: f32 = 1.70158;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease-in`
    EaseIn,
    /// CSS `ease-out`
    EaseOut,
    /// CSS `ease-in-out`
    EaseInOut,
    /// `t^n`
    PowerIn(i32),
    /// Mirror of [`Easing::PowerIn`], fast start
    PowerOut(i32),
    PowerInOut(i32),
    EaseInOutSine,
    /// Passes the target by roughly `overshoot * 10%`, then settles
    BackOut(f32),
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Eased value for `t` in 0.0..=1.0
    pub fn apply(&self, t: f32) -> f32 {
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => bezier_y_at_x(t, [0.42, 0.0, 1.0, 1.0]),
            Easing::EaseOut => bezier_y_at_x(t, [0.0, 0.0, 0.58, 1.0]),
            Easing::EaseInOut => bezier_y_at_x(t, [0.42, 0.0, 0.58, 1.0]),
            Easing::PowerIn(n) => t.powi(n),
            Easing::PowerOut(n) => 1.0 - (1.0 - t).powi(n),
            Easing::PowerInOut(n) if t < 0.5 => (2.0 * t).powi(n) / 2.0,
            Easing::PowerInOut(n) => 1.0 - (2.0 - 2.0 * t).powi(n) / 2.0,
            Easing::EaseInOutSine => (1.0 - (PI * t).cos()) / 2.0,
            Easing::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u.powi(3) + overshoot * u.powi(2)
            }
            Easing::CubicBezier(x1, y1, x2, y2) => bezier_y_at_x(t, [x1, y1, x2, y2]),
        }
    }

    /// Resolve an easing name.
    ///
    /// Known names: `none`, `linear`, `easeIn`, `easeOut`, `easeInOut`,
    /// `sine.inOut`, `powerN`, `powerN.in`, `powerN.out`, `powerN.inOut`
    /// (N from 1 to 4), `back.out`, `back.out(<overshoot>)` and
    /// `cubic-bezier(x1, y1, x2, y2)`.
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        let unknown = || AnimationError::UnknownEasing(name.to_string());

        if let Some(args) = call_args(name, "cubic-bezier") {
            let values = args
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| unknown())?;
            let points: [f32; 4] = values.try_into().map_err(|_| unknown())?;
            return Ok(Easing::from_bezier(points));
        }
        if name == "back.out" {
            return Ok(Easing::BackOut(DEFAULT_OVERSHOOT));
        }
        if let Some(arg) = call_args(name, "back.out") {
            return arg.trim().parse().map(Easing::BackOut).map_err(|_| unknown());
        }
        if let Some(power) = name.strip_prefix("power") {
            return parse_power(power).ok_or_else(unknown);
        }

        match name {
            "none" | "linear" => Ok(Easing::Linear),
            "easeIn" => Ok(Easing::EaseIn),
            "easeOut" => Ok(Easing::EaseOut),
            "easeInOut" => Ok(Easing::EaseInOut),
            "sine.inOut" => Ok(Easing::EaseInOutSine),
            _ => Err(unknown()),
        }
    }

    pub fn from_bezier([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Easing::CubicBezier(x1, y1, x2, y2)
    }
}

/// `inner` for `func(inner)`
fn call_args<'a>(name: &'a str, func: &str) -> Option<&'a str> {
    name.strip_prefix(func)?.strip_prefix('(')?.strip_suffix(')')
}

/// `N`, `N.in`, `N.out` or `N.inOut`; `powerN` eases with exponent `N + 1`
fn parse_power(rest: &str) -> Option<Easing> {
    let (level, mode) = rest.split_once('.').unwrap_or((rest, "out"));
    let level: i32 = level.parse().ok().filter(|n| (1..=4).contains(n))?;
    let exponent = level + 1;
    match mode {
        "in" => Some(Easing::PowerIn(exponent)),
        "out" => Some(Easing::PowerOut(exponent)),
        "inOut" => Some(Easing::PowerInOut(exponent)),
        _ => None,
    }
}

/// y on the CSS-style bezier through (0,0), (x1,y1), (x2,y2), (1,1) at the
/// parameter whose x equals `x`. Solved in f64 by Newton steps, with
/// bisection when the slope flattens.
fn bezier_y_at_x(x: f32, [x1, y1, x2, y2]: [f32; 4]) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let target = f64::from(x);
    let xs = Cubic::new(f64::from(x1), f64::from(x2));
    let ys = Cubic::new(f64::from(y1), f64::from(y2));

    let mut s = target;
    for _ in 0..8 {
        let error = xs.at(s) - target;
        if error.abs() < 1e-7 {
            return ys.at(s) as f32;
        }
        let slope = xs.slope(s);
        if slope.abs() < 1e-7 {
            break;
        }
        s -= error / slope;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    s = target;
    for _ in 0..20 {
        let value = xs.at(s);
        if (value - target).abs() < 1e-7 {
            break;
        }
        if value < target {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    ys.at(s) as f32
}

/// One axis of a bezier with fixed endpoints 0 and 1, in polynomial form
struct Cubic {
    a: f64,
    b: f64,
    c: f64,
}

impl Cubic {
    fn new(p1: f64, p2: f64) -> Self {
        Cubic {
            a: 1.0 + 3.0 * (p1 - p2),
            b: 3.0 * p2 - 6.0 * p1,
            c: 3.0 * p1,
        }
    }

    fn at(&self, s: f64) -> f64 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    fn slope(&self, s: f64) -> f64 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }
}
