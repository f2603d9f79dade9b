use crate::Float;

use super::Point;

#[derive(Clone, Copy, Debug)]
pub struct Circle<T> {
    pub center: Point<T>,
    pub radius: T,
}

impl<T: Float> Circle<T> {
    /// Point of the circumference at angle `theta`, in screen coordinates: the
    /// y axis grows downward, so positive angles turn counter-clockwise on screen.
    pub fn point_at(&self, theta: T) -> Point<T> {
        Point {
            x: self.radius * theta.cos() + self.center.x,
            y: self.radius * (-theta).sin() + self.center.y,
        }
    }
}
