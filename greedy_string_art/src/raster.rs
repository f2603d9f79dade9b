//! Anti-aliased chord coverage.
//!
//! Zingl's integer-error formulation of Wu's line: every step emits the cell
//! on the line and, when close enough, its neighbour across the minor axis,
//! each weighted by `1 - distance / length`. The error terms are kept in
//! single precision and the emission order is stable, so two runs sum scores
//! over the same cells in the same order.

use crate::geometry::Point;

/// A cell touched by a chord together with how much of it the chord covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub point: Point<isize>,
    /// Coverage in `[0, 1]`.
    pub weight: f64,
}

/// Cells covered by the chord between two integer endpoints, both included.
pub fn raster(start: Point<isize>, end: Point<isize>) -> Coverage {
    Coverage::new(start, end)
}

pub struct Coverage {
    x: isize,
    y: isize,
    end: Point<isize>,
    step: Point<isize>,
    dx: f32,
    dy: f32,
    err: f32,
    ed: f32,
    pending: [Cell; 3],
    len: usize,
    head: usize,
    finished: bool,
}

impl Coverage {
    fn new(start: Point<isize>, end: Point<isize>) -> Self {
        let dx = start.x.abs_diff(end.x);
        let dy = start.y.abs_diff(end.y);
        let ed = if dx + dy == 0 {
            1.0
        } else {
            ((dx * dx + dy * dy) as f64).sqrt() as f32
        };
        let (dx, dy) = (dx as f32, dy as f32);
        Self {
            x: start.x,
            y: start.y,
            end,
            step: Point {
                x: if start.x < end.x { 1 } else { -1 },
                y: if start.y < end.y { 1 } else { -1 },
            },
            dx,
            dy,
            err: dy - dx,
            ed,
            pending: [Cell {
                point: start,
                weight: 0.0,
            }; 3],
            len: 0,
            head: 0,
            finished: false,
        }
    }

    fn push(&mut self, x: isize, y: isize, distance: f32) {
        self.pending[self.len] = Cell {
            point: Point { x, y },
            weight: 1.0 - distance.abs() as f64 / self.ed as f64,
        };
        self.len += 1;
    }

    /// Fills the pending buffer with the cells of the next step.
    fn advance(&mut self) {
        self.head = 0;
        self.len = 0;
        self.push(self.x, self.y, self.err - self.dy + self.dx);

        let err = self.err;
        let y = self.y;
        if 2.0 * err >= -self.dy {
            if self.y == self.end.y {
                self.finished = true;
                return;
            }
            if err + self.dx < self.ed {
                self.push(self.x + self.step.x, self.y, err + self.dx);
            }
            self.err -= self.dx;
            self.y += self.step.y;
        }
        if 2.0 * err <= self.dx {
            if self.x == self.end.x {
                self.finished = true;
                return;
            }
            if self.dy - err < self.ed {
                self.push(self.x, y + self.step.y, self.dy - err);
            }
            self.err += self.dy;
            self.x += self.step.x;
        }
    }
}

impl Iterator for Coverage {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.head == self.len {
            if self.finished {
                return None;
            }
            self.advance();
        }
        let cell = self.pending[self.head];
        self.head += 1;
        Some(cell)
    }
}

impl std::iter::FusedIterator for Coverage {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nails::NailTable, verboser::Silent};

    fn cells(start: (isize, isize), end: (isize, isize)) -> Vec<Cell> {
        raster(Point::new(start.0, start.1), Point::new(end.0, end.1)).collect()
    }

    #[test]
    fn zero_length_is_one_full_cell() {
        let cells = cells((4, 7), (4, 7));
        assert_eq!(
            cells,
            [Cell {
                point: Point::new(4, 7),
                weight: 1.0
            }]
        );
    }

    #[test]
    fn axis_aligned_lines_are_solid() {
        for (start, end) in [((0, 3), (10, 3)), ((5, 9), (5, 0)), ((2, 2), (0, 2))] {
            let cells = cells(start, end);
            let length = start.0.abs_diff(end.0) + start.1.abs_diff(end.1);
            assert_eq!(cells.len(), length + 1);
            assert!(cells.iter().all(|cell| cell.weight == 1.0));
            assert_eq!(cells.first().unwrap().point, Point::new(start.0, start.1));
            assert_eq!(cells.last().unwrap().point, Point::new(end.0, end.1));
        }
    }

    #[test]
    fn shallow_line_emission_order() {
        let cells = cells((0, 0), (3, 1));
        let points: Vec<_> = cells.iter().map(|cell| (cell.point.x, cell.point.y)).collect();
        assert_eq!(
            points,
            [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (3, 0), (2, 1), (3, 1)]
        );
        let expected = [
            1.0,
            0.051_316_738,
            0.683_772_236,
            0.367_544_472,
            0.367_544_472,
            0.051_316_738,
            0.683_772_236,
            1.0,
        ];
        for (cell, weight) in cells.iter().zip(expected) {
            assert!((cell.weight - weight).abs() < 1e-6, "{cell:?}");
        }
    }

    #[test]
    fn weights_stay_in_unit_range() {
        let table = NailTable::<f64>::circle(60, 149.5, &mut Silent).unwrap();
        for a in table.nails() {
            for b in table.nails() {
                for cell in raster(a.truncate(), b.truncate()) {
                    assert!((0.0..=1.0).contains(&cell.weight), "{cell:?}");
                }
            }
        }
    }

    #[test]
    fn coverage_sums_to_chord_length() {
        let table = NailTable::<f64>::circle(300, 149.5, &mut Silent).unwrap();
        for (a, b) in [(0, 150), (75, 225), (0, 75), (0, 37), (10, 200), (3, 100), (0, 50)] {
            let start = table.nails()[a].truncate();
            let end = table.nails()[b].truncate();
            let sum: f64 = raster(start, end).map(|cell| cell.weight).sum();
            let length = start.as_::<f64>().distance(&end.as_());
            assert!(
                (sum - length).abs() <= 0.05 * length,
                "chord N{a}-N{b}: coverage {sum} for length {length}"
            );
        }
    }

    #[test]
    fn rasterizing_twice_is_identical() {
        let first = cells((12, 250), (280, 31));
        let second = cells((12, 250), (280, 31));
        assert_eq!(first, second);
    }
}
