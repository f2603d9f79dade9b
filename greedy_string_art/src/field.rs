use std::ops::Deref;

use crate::{geometry::Point, Grid};

/// Row-major buffer of per-cell values covering a [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct PixelData<T> {
    pixels: Vec<T>,
    grid: Grid,
}

impl<T> PixelData<T> {
    pub fn new(mut builder: impl FnMut(Point<usize>) -> T, grid: Grid) -> Self {
        let mut pixels = Vec::with_capacity(grid.len());
        for y in 0..grid.height {
            for x in 0..grid.width {
                pixels.push(builder(Point { x, y }));
            }
        }
        Self { pixels, grid }
    }

    pub fn filled(value: T, grid: Grid) -> Self
    where
        T: Clone,
    {
        Self {
            pixels: vec![value; grid.len()],
            grid,
        }
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn get(&self, point: Point<usize>) -> Option<&T> {
        self.grid
            .index_of(point)
            .and_then(|index| self.pixels.get(index))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl<T> Deref for PixelData<T> {
    type Target = Grid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}
