use std::fmt;
use std::ops::{Div, Mul, Neg};

/// CSS dimension suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Px,
    Em,
    Rem,
    /// Rendered as `%`.
    Percent,
    Vw,
    Vh,
    Vmin,
    Vmax,
    Ch,
    Ex,
    Pt,
    Cm,
    Mm,
    In,
    Fr,
    Deg,
    Rad,
    Turn,
    Ms,
    S,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Percent => "%",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
            Unit::Vmin => "vmin",
            Unit::Vmax => "vmax",
            Unit::Ch => "ch",
            Unit::Ex => "ex",
            Unit::Pt => "pt",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::In => "in",
            Unit::Fr => "fr",
            Unit::Deg => "deg",
            Unit::Rad => "rad",
            Unit::Turn => "turn",
            Unit::Ms => "ms",
            Unit::S => "s",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A number with a CSS unit, e.g. `4px` or `1.5em`.
///
/// The compiler only ever looks at the `Display` output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dim {
    pub value: f64,
    pub unit: Unit,
}

impl Dim {
    pub fn new(value: f64, unit: Unit) -> Self {
        Dim { value, unit }
    }

    /// `0px`.
    pub fn zero() -> Self {
        Dim::new(0.0, Unit::Px)
    }

    /// Adds two dimensions of the same unit. Mixed units need `calc()`.
    pub fn checked_add(self, other: Dim) -> Option<Dim> {
        (self.unit == other.unit).then(|| Dim::new(self.value + other.value, self.unit))
    }

    pub fn checked_sub(self, other: Dim) -> Option<Dim> {
        (self.unit == other.unit).then(|| Dim::new(self.value - other.value, self.unit))
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl Neg for Dim {
    type Output = Dim;

    fn neg(self) -> Dim {
        Dim::new(-self.value, self.unit)
    }
}

impl Mul<f64> for Dim {
    type Output = Dim;

    fn mul(self, rhs: f64) -> Dim {
        Dim::new(self.value * rhs, self.unit)
    }
}

impl Div<f64> for Dim {
    type Output = Dim;

    fn div(self, rhs: f64) -> Dim {
        Dim::new(self.value / rhs, self.unit)
    }
}

macro_rules! unit_constructors {
    ($($name:ident => $unit:ident),* $(,)?) => {
        $(
            pub fn $name(value: impl Into<f64>) -> Dim {
                Dim::new(value.into(), Unit::$unit)
            }
        )*
    };
}

unit_constructors! {
    px => Px,
    em => Em,
    rem => Rem,
    pct => Percent,
    vw => Vw,
    vh => Vh,
    vmin => Vmin,
    vmax => Vmax,
    ch => Ch,
    ex => Ex,
    pt => Pt,
    cm => Cm,
    mm => Mm,
    inch => In,
    fr => Fr,
    deg => Deg,
    rad => Rad,
    turn => Turn,
    ms => Ms,
    sec => S,
}
