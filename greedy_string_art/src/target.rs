use std::path::Path;

use ::image::{imageops::FilterType, DynamicImage};
use num_traits::AsPrimitive;
use tracing::debug;

use crate::{error::Result, field::PixelData, Error, Float, Grid, Mode};

/// The image a run tries to reproduce, one plane per colour channel.
///
/// Values are scaled by [`Float::DARKNESS_CAP`], so even pure white asks
/// for a little thread.
#[derive(Clone, Debug)]
pub struct Target<S> {
    planes: Vec<PixelData<S>>,
    grid: Grid,
}

impl<S: Float> Target<S>
where
    f32: AsPrimitive<S>,
{
    pub fn open(path: impl AsRef<Path>, resolution: u32, mode: Mode) -> Result<Self> {
        let path = path.as_ref();
        let image = ::image::open(path)
            .map_err(|err| Error::InvalidImage(format!("{}: {err}", path.display())))?;
        Self::load(Some(&image), resolution, mode)
    }

    pub fn decode(bytes: &[u8], resolution: u32, mode: Mode) -> Result<Self> {
        let image = ::image::load_from_memory(bytes)
            .map_err(|err| Error::InvalidImage(err.to_string()))?;
        Self::load(Some(&image), resolution, mode)
    }

    /// Resamples `image` to `resolution × resolution` and splits it into planes.
    pub fn load(image: Option<&DynamicImage>, resolution: u32, mode: Mode) -> Result<Self> {
        let image = image.ok_or_else(|| Error::InvalidImage(String::from("no image supplied")))?;
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::InvalidImage(String::from("image has no pixels")));
        }
        debug!(
            width = image.width(),
            height = image.height(),
            resolution,
            ?mode,
            "loading target"
        );
        let rgb = image
            .resize_exact(resolution, resolution, FilterType::Triangle)
            .to_rgb32f();
        let grid = Grid::square(resolution as usize);
        let value = |x: usize, y: usize, channel: usize| -> S {
            rgb.get_pixel(x as u32, y as u32).0[channel].as_()
        };
        let planes = match mode {
            Mode::Monochrome => vec![PixelData::new(
                |p| {
                    (S::LUMA_RED * value(p.x, p.y, 0)
                        + S::LUMA_GREEN * value(p.x, p.y, 1)
                        + S::LUMA_BLUE * value(p.x, p.y, 2))
                        * S::DARKNESS_CAP
                },
                grid,
            )],
            Mode::Rgb => (0..3)
                .map(|channel| {
                    PixelData::new(|p| value(p.x, p.y, channel) * S::DARKNESS_CAP, grid)
                })
                .collect(),
        };
        Ok(Self { planes, grid })
    }
}

impl<S> Target<S> {
    /// Builds a target from already normalised planes sharing one grid.
    pub fn from_planes(planes: Vec<PixelData<S>>) -> Result<Self> {
        let grid = match planes.first() {
            Some(plane) => *plane.grid(),
            None => return Err(Error::InvalidImage(String::from("target has no planes"))),
        };
        if grid.is_empty() {
            return Err(Error::InvalidImage(String::from("target planes are empty")));
        }
        if planes.len() != 1 && planes.len() != 3 {
            return Err(Error::InvalidImage(format!(
                "expected 1 or 3 planes, got {}",
                planes.len()
            )));
        }
        if planes.iter().any(|plane| *plane.grid() != grid) {
            return Err(Error::InvalidImage(String::from(
                "target planes differ in size",
            )));
        }
        Ok(Self { planes, grid })
    }

    pub fn planes(&self) -> &[PixelData<S>] {
        &self.planes
    }

    pub fn plane(&self, idx: usize) -> Option<&PixelData<S>> {
        self.planes.get(idx)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        if self.planes.len() == 3 {
            Mode::Rgb
        } else {
            Mode::Monochrome
        }
    }
}

#[cfg(test)]
mod tests {
    use ::image::{Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;
    use crate::geometry::Point;

    fn solid(color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 25, Rgb(color)))
    }

    #[test]
    fn missing_image_is_rejected() {
        assert!(matches!(
            Target::<f64>::load(None, 50, Mode::Monochrome),
            Err(Error::InvalidImage(_))
        ));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            Target::<f64>::decode(b"definitely not a png", 50, Mode::Rgb),
            Err(Error::InvalidImage(_))
        ));
    }

    #[test]
    fn white_is_capped() {
        let target = Target::<f64>::load(Some(&solid([255, 255, 255])), 30, Mode::Monochrome)
            .unwrap();
        assert_eq!(target.planes().len(), 1);
        assert_eq!(*target.grid(), Grid::square(30));
        for &value in target.planes()[0].pixels() {
            assert!((value - 0.9 * (0.2989 + 0.5870 + 0.1140)).abs() < 1e-6);
        }
    }

    #[test]
    fn monochrome_uses_luma_weights() {
        let target =
            Target::<f32>::load(Some(&solid([0, 255, 0])), 16, Mode::Monochrome).unwrap();
        let value = *target.planes()[0].get(Point::new(8, 8)).unwrap();
        assert!((value - 0.9 * 0.5870).abs() < 1e-5);
    }

    #[test]
    fn rgb_keeps_three_planes() {
        let target = Target::<f64>::load(Some(&solid([255, 0, 51])), 20, Mode::Rgb).unwrap();
        assert_eq!(target.mode(), Mode::Rgb);
        let at = |plane: usize| *target.planes()[plane].get(Point::new(3, 17)).unwrap();
        assert!((at(0) - 0.9).abs() < 1e-6);
        assert!(at(1).abs() < 1e-6);
        assert!((at(2) - 0.9 * 0.2).abs() < 1e-6);
    }

    #[test]
    fn alpha_is_ignored() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 0])));
        let target = Target::<f64>::load(Some(&image), 10, Mode::Rgb).unwrap();
        assert!(target.planes()[1].pixels().iter().all(|v| (v - 0.9).abs() < 1e-6));
    }

    #[test]
    fn planes_must_agree() {
        let a = PixelData::filled(0.5_f64, Grid::square(4));
        let b = PixelData::filled(0.5_f64, Grid::square(5));
        assert!(Target::from_planes(vec![a.clone(), b.clone(), a.clone()]).is_err());
        assert!(Target::from_planes(vec![a.clone(), a.clone()]).is_err());
        assert!(Target::from_planes(vec![a]).is_ok());
        let empty = PixelData::filled(0.5_f64, Grid::square(0));
        assert!(matches!(
            Target::from_planes(vec![empty]),
            Err(Error::InvalidImage(_))
        ));
    }
}
