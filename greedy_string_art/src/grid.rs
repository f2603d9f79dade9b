use num_traits::{NumCast, Unsigned};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl<T: Copy> Grid<T> {
    pub fn square(side: T) -> Self {
        Self {
            height: side,
            width: side,
        }
    }
}

impl<T: NumCast + Unsigned + PartialOrd + Copy> Grid<T> {
    pub fn len(&self) -> T {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == T::zero()
    }

    pub fn index_of(&self, point: Point<T>) -> Option<T> {
        if point.x < self.width && point.y < self.height {
            Some(point.y * self.width + point.x)
        } else {
            None
        }
    }

    /// Index of a signed cell, `None` for anything outside the grid.
    pub fn index_of_signed(&self, point: Point<isize>) -> Option<T> {
        point.cast::<T>().and_then(|point| self.index_of(point))
    }
}
