use std::{
    fmt::{Debug, Display},
    ops::{AddAssign, DivAssign, MulAssign, SubAssign},
};

use num_traits::{ConstOne, ConstZero};

pub trait Float:
    'static
    + Debug
    + Display
    + Sync
    + Send
    + Into<svg::node::Value>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + num_traits::Float
    + num_traits::NumCast
    + ConstZero
    + ConstOne
{
    const TWO: Self;
    const PI: Self;
    const TWO_FIVE_FIVE: Self;
    /// Upper bound of a target value, leaves room for overlapping strings.
    const DARKNESS_CAP: Self;
    /// Score every candidate must reach before it can win a scan.
    const INITIAL_BEST: Self;
    const LUMA_RED: Self;
    const LUMA_GREEN: Self;
    const LUMA_BLUE: Self;
}

impl Float for f32 {
    const TWO: Self = 2.0;
    const PI: Self = core::f32::consts::PI;
    const TWO_FIVE_FIVE: Self = 255.0;
    const DARKNESS_CAP: Self = 0.9;
    const INITIAL_BEST: Self = -999999.0;
    const LUMA_RED: Self = 0.2989;
    const LUMA_GREEN: Self = 0.5870;
    const LUMA_BLUE: Self = 0.1140;
}

impl Float for f64 {
    const TWO: Self = 2.0;
    const PI: Self = core::f64::consts::PI;
    const TWO_FIVE_FIVE: Self = 255.0;
    const DARKNESS_CAP: Self = 0.9;
    const INITIAL_BEST: Self = -999999.0;
    const LUMA_RED: Self = 0.2989;
    const LUMA_GREEN: Self = 0.5870;
    const LUMA_BLUE: Self = 0.1140;
}
