use num_traits::AsPrimitive;
use tracing::debug;

use crate::{
    error::Result,
    geometry::{Circle, Point},
    verboser::{Message, Verboser},
    Error, Float,
};

/// Nails evenly spaced on a circle inscribed in the `2r × 2r` square.
#[derive(Clone, Debug)]
pub struct NailTable<S> {
    nails: Vec<Point<S>>,
    circle: Circle<S>,
}

impl<S: Float> NailTable<S>
where
    usize: AsPrimitive<S>,
{
    pub fn circle(nail_count: usize, radius: S, verboser: &mut impl Verboser) -> Result<Self> {
        if nail_count == 0 {
            return Err(Error::configuration(
                "nail_count",
                nail_count,
                "must be positive",
            ));
        }
        let circle = Circle {
            center: Point {
                x: radius,
                y: radius,
            },
            radius,
        };
        let nails = (0..nail_count)
            .map(|i| {
                verboser.verbose(Message::CreatingNail(i));
                let theta: S = S::TWO * S::PI * i.as_() / nail_count.as_();
                circle.point_at(theta)
            })
            .collect();
        verboser.verbose(Message::CreatingNail(nail_count));
        debug!(nail_count, %radius, "nail table created");
        Ok(Self { nails, circle })
    }
}

impl<S> NailTable<S> {
    pub fn nails(&self) -> &[Point<S>] {
        &self.nails
    }

    pub fn get(&self, idx: usize) -> Option<&Point<S>> {
        self.nails.get(idx)
    }

    pub fn len(&self) -> usize {
        self.nails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nails.is_empty()
    }

    pub fn outline(&self) -> &Circle<S> {
        &self.circle
    }
}

/// Printable name of a nail, as used in instruction sheets.
pub fn label(idx: usize) -> String {
    format!("N{idx}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verboser::Silent;

    #[test]
    fn first_nail_is_rightmost() {
        let table = NailTable::<f64>::circle(300, 149.5, &mut Silent).unwrap();
        assert_eq!(table.len(), 300);
        assert_eq!(table.nails()[0], Point::new(299.0, 149.5));
    }

    #[test]
    fn positions_follow_the_parameterization() {
        let (n, r) = (37_usize, 20.0_f64);
        let table = NailTable::circle(n, r, &mut Silent).unwrap();
        for (i, nail) in table.nails().iter().enumerate() {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            assert_eq!(nail.x, r * angle.cos() + r);
            assert_eq!(nail.y, r * (-angle).sin() + r);
            assert!((nail.distance(&table.outline().center) - r).abs() < 1e-9);
        }
    }

    #[test]
    fn nails_turn_counter_clockwise_on_screen() {
        let table = NailTable::<f32>::circle(4, 10.0, &mut Silent).unwrap();
        let top = table.get(1).unwrap();
        assert!((top.x - 10.0).abs() < 1e-5);
        assert!(top.y.abs() < 1e-5);
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(
            NailTable::<f64>::circle(0, 10.0, &mut Silent),
            Err(Error::Configuration {
                parameter: "nail_count",
                ..
            })
        ));
    }

    #[test]
    fn labels() {
        assert_eq!(label(0), "N0");
        assert_eq!(label(299), "N299");
    }
}
