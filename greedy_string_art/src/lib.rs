pub mod geometry {
    pub mod circle;
    pub mod point;

    pub use circle::Circle;
    pub use point::Point;
}

mod algorithm;
mod canvas;
pub mod channel;
mod error;
pub mod field;
mod float;
pub mod grid;
pub mod nails;
pub mod params;
pub mod raster;
pub mod render;
pub mod report;
pub mod sequence;
mod target;
pub mod verboser;

pub use algorithm::*;
pub use canvas::Canvas;
pub use channel::{Channel, ChannelRotation};
pub use error::{Error, Result};
pub use field::PixelData;
pub use float::Float;
pub use grid::Grid;
pub use nails::NailTable;
pub use params::{ExclusionRule, Mode, Params, ValidParams};
pub use report::Report;
pub use sequence::{Sequence, Step};
pub use target::Target;
