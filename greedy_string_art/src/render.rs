//! Previews of a finished [`Computation`].

use ::image::{Rgb, RgbImage};
use num_traits::AsPrimitive;

use crate::{geometry::Point, raster::raster, Channel, Computation, Float};

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

impl<S: Float> Computation<S> {
    /// Chords in drawing order, each with the colour of its strand.
    pub fn segments(&self) -> impl Iterator<Item = (Point<S>, Point<S>, [u8; 3])> + '_ {
        let nails = self.nails.nails();
        let mut from = self.start;
        self.sequence.steps().iter().map(move |step| {
            let to = nails[step.nail];
            let segment = (from, to, step.channel.map_or(BLACK, Channel::rgb));
            from = to;
            segment
        })
    }

    pub fn build_svg(&self, line_thickness: f32) -> svg::Document {
        let side = self.params.resolution as usize;
        let mut doc = svg::Document::new().set("viewBox", (0, 0, side, side));
        doc = doc.add(
            svg::node::element::Rectangle::new()
                .set("width", side)
                .set("height", side)
                .set("fill", "white"),
        );
        for nail in self.nails.nails() {
            doc = doc.add(
                svg::node::element::Circle::new()
                    .set("cx", format!("{:.4}", nail.x))
                    .set("cy", format!("{:.4}", nail.y))
                    .set("r", 1)
                    .set("fill", "black"),
            );
        }
        for (from, to, color) in self.segments() {
            doc = doc.add(
                svg::node::element::Line::new()
                    .set("x1", format!("{:.4}", from.x))
                    .set("y1", format!("{:.4}", from.y))
                    .set("x2", format!("{:.4}", to.x))
                    .set("y2", format!("{:.4}", to.y))
                    .set(
                        "stroke",
                        format!("rgb({}, {}, {})", color[0], color[1], color[2]),
                    )
                    .set("stroke-width", format!("{:.4}", line_thickness)),
            );
        }
        doc
    }

    /// Chords drawn with anti-aliasing over white, `scale` pixels per cell.
    pub fn build_rgb(&self, scale: S) -> RgbImage
    where
        S: AsPrimitive<u32>,
        u32: AsPrimitive<S>,
    {
        let resolution: S = self.params.resolution.as_();
        let side: u32 = (resolution * scale).round().as_();
        let mut image = RgbImage::from_pixel(side, side, Rgb(WHITE));
        for (from, to, color) in self.segments() {
            for cell in raster((from * scale).truncate(), (to * scale).truncate()) {
                let (Ok(x), Ok(y)) = (u32::try_from(cell.point.x), u32::try_from(cell.point.y))
                else {
                    continue;
                };
                if x >= side || y >= side {
                    continue;
                }
                let pixel = image.get_pixel_mut(x, y);
                for (channel, &ink) in pixel.0.iter_mut().zip(color.iter()) {
                    let blended = *channel as f64 * (1.0 - cell.weight) + ink as f64 * cell.weight;
                    *channel = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        image
    }

    /// The numeric canvas the selector worked on, one byte per cell and plane.
    pub fn build_canvas_image(&self) -> RgbImage
    where
        S: AsPrimitive<u8>,
    {
        let grid = *self.canvas.grid();
        let planes = self.canvas.planes();
        let mut image = RgbImage::new(grid.width as u32, grid.height as u32);
        for (idx, pixel) in image.pixels_mut().enumerate() {
            let value = |plane: usize| -> u8 {
                (planes[plane].pixels()[idx] * S::TWO_FIVE_FIVE)
                    .round()
                    .as_()
            };
            *pixel = match planes.len() {
                3 => Rgb([value(0), value(1), value(2)]),
                _ => Rgb([value(0); 3]),
            };
        }
        image
    }
}
