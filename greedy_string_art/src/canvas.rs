use num_traits::AsPrimitive;

use crate::{field::PixelData, raster::Cell, Float, Grid, Target};

/// Running approximation of the target: starts white and only gets darker.
#[derive(Clone, Debug)]
pub struct Canvas<S> {
    planes: Vec<PixelData<S>>,
    grid: Grid,
}

impl<S: Float> Canvas<S>
where
    f64: AsPrimitive<S>,
{
    pub fn blank(target: &Target<S>) -> Self {
        let grid = *target.grid();
        Self {
            planes: target
                .planes()
                .iter()
                .map(|_| PixelData::filled(S::ONE, grid))
                .collect(),
            grid,
        }
    }

    /// Squared error removed from `plane` if the covered cells were darkened
    /// by `strength` times their coverage. Cells outside the grid are skipped.
    pub fn improvement(
        &self,
        plane: usize,
        target: &Target<S>,
        coverage: impl IntoIterator<Item = Cell>,
        strength: S,
    ) -> S {
        let (Some(current), Some(target)) = (self.planes.get(plane), target.plane(plane)) else {
            return S::ZERO;
        };
        let (current, target) = (current.pixels(), target.pixels());
        let mut improvement = S::ZERO;
        for cell in coverage {
            let Some(idx) = self.grid.index_of_signed(cell.point) else {
                continue;
            };
            let weight: S = cell.weight.as_();
            let value = current[idx];
            let wanted = target[idx];
            let before = (value - wanted) * (value - wanted);
            let after = value - strength * weight - wanted;
            improvement += before - after * after;
        }
        improvement
    }

    /// Darkens the covered cells of `plane` and clamps them back into `[0, 1]`.
    pub fn apply(&mut self, plane: usize, coverage: impl IntoIterator<Item = Cell>, strength: S) {
        let grid = self.grid;
        let Some(current) = self.planes.get_mut(plane) else {
            return;
        };
        let pixels = current.pixels_mut();
        for cell in coverage {
            if let Some(idx) = grid.index_of_signed(cell.point) {
                let weight: S = cell.weight.as_();
                let value = &mut pixels[idx];
                *value = (*value - strength * weight).max(S::ZERO).min(S::ONE);
            }
        }
    }
}

impl<S: Float> Canvas<S> {
    /// Total squared distance to `target` across every plane.
    pub fn error(&self, target: &Target<S>) -> S {
        let mut error = S::ZERO;
        for (current, wanted) in self.planes.iter().zip(target.planes()) {
            for (&value, &wanted) in current.pixels().iter().zip(wanted.pixels()) {
                error += (value - wanted) * (value - wanted);
            }
        }
        error
    }
}

impl<S> Canvas<S> {
    pub fn planes(&self) -> &[PixelData<S>] {
        &self.planes
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
