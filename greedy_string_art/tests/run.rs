use std::io::Cursor;

use greedy_string_art::{
    compute, verboser::Silent, Cancel, Channel, Error, Mode, Params, Report, Target,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn png_bytes() -> Vec<u8> {
    let image = RgbImage::from_fn(48, 48, |x, y| {
        let dark = ((x as i32 - 24).pow(2) + (y as i32 - 24).pow(2)) < 150;
        if dark {
            Rgb([20, 40, 200])
        } else {
            Rgb([240, 230, 220])
        }
    });
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn params(mode: Mode) -> Params {
    Params {
        resolution: 40,
        iterations: 60,
        nail_count: 36,
        mode,
        ..Params::default()
    }
}

#[test]
fn monochrome_run_from_png_bytes() {
    let params = params(Mode::Monochrome);
    let target = Target::<f64>::decode(&png_bytes(), params.resolution, params.mode).unwrap();
    let computation = compute(&params, target, &mut Silent, &Cancel::new()).unwrap();

    let sequence = computation.sequence();
    assert_eq!(sequence.len(), 60);
    assert!(sequence.nails().all(|nail| nail < 36));
    assert!(sequence.steps().iter().all(|step| step.channel.is_none()));

    let svg = computation.build_svg(params.string_width as f32).to_string();
    assert_eq!(svg.matches("<line").count(), 60);
    assert_eq!(svg.matches("<circle").count(), 36);

    let text = Report::new(sequence).to_text();
    assert!(text.starts_with("String Art\n"));
    assert_eq!(
        text.lines().filter(|line| line.starts_with('N')).count(),
        6
    );
}

#[test]
fn repeated_runs_agree() {
    let params = params(Mode::Monochrome);
    let bytes = png_bytes();
    let run = || {
        let target = Target::<f64>::decode(&bytes, params.resolution, params.mode).unwrap();
        compute(&params, target, &mut Silent, &Cancel::new())
            .unwrap()
            .sequence()
            .clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn single_precision_run() {
    let params = params(Mode::Monochrome);
    let target = Target::<f32>::decode(&png_bytes(), params.resolution, params.mode).unwrap();
    let computation = compute(&params, target, &mut Silent, &Cancel::new()).unwrap();
    assert_eq!(computation.sequence().len(), 60);
    assert!(computation
        .canvas()
        .planes()
        .iter()
        .flat_map(|plane| plane.pixels())
        .all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn rgb_run_cycles_strand_colours() {
    let params = Params {
        color_change_interval: Some(20),
        ..params(Mode::Rgb)
    };
    let target = Target::<f64>::decode(&png_bytes(), params.resolution, params.mode).unwrap();
    let computation = compute(&params, target, &mut Silent, &Cancel::new()).unwrap();

    let groups = computation.sequence().channel_groups();
    let channels: Vec<_> = groups.iter().map(|(channel, _)| *channel).collect();
    assert_eq!(
        channels,
        vec![Some(Channel::Blue), Some(Channel::Green), Some(Channel::Red)]
    );
    assert!(groups.iter().all(|(_, range)| range.len() == 20));
    assert_eq!(computation.channel_advances(), Some(3));

    let image = computation.build_rgb(2.0);
    assert_eq!(image.dimensions(), (80, 80));
}

#[test]
fn garbage_bytes_are_rejected() {
    let result = Target::<f64>::decode(b"not an image", 40, Mode::Monochrome);
    assert!(matches!(result, Err(Error::InvalidImage(_))));
}

#[test]
fn params_round_trip_through_json() {
    let params = Params {
        color_change_interval: Some(7),
        ..params(Mode::Rgb)
    };
    let json = params.to_json().unwrap();
    assert_eq!(Params::from_json(&json).unwrap(), params);
}
