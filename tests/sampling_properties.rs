use image::RgbaImage;
use povsim::{Color, LedLayout, PixelSource, PolarSampler, Rgba, SamplingConfig, SourceImage};
use rand::Rng;

/// Image double backed by a closure.
struct FnImage<F: Fn(u32, u32) -> Rgba> {
    width: u32,
    height: u32,
    pixel: F,
}

impl<F: Fn(u32, u32) -> Rgba> PixelSource for FnImage<F> {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn pixel(&self, x: u32, y: u32) -> Rgba {
        (self.pixel)(x, y)
    }
}

fn projection(img: &impl PixelSource, angle: f64, radius: f64) -> (f64, f64) {
    let a = angle.to_radians();
    let x = img.center_x() + radius * a.cos();
    let y = img.height() as f64 - (img.center_y() + radius * a.sin());
    (x, y)
}

#[test]
fn middle_of_footprint_is_the_plain_projection() {
    let mut rng = rand::rng();
    let img = SourceImage::new(RgbaImage::new(200, 150)).unwrap();

    for _ in 0..200 {
        let angle_points = rng.random_range(3..12);
        let radius_points = rng.random_range(3..12);
        let cfg = SamplingConfig::new(
            rng.random_range(0.0..20.0),
            angle_points,
            rng.random_range(0.0..30.0),
            radius_points,
        )
        .unwrap();
        let sampler = PolarSampler::new(&img, cfg, Color::WHITE);

        let angle = rng.random_range(-720.0..720.0);
        let radius = rng.random_range(0.0..150.0);
        let fp = sampler.compute_footprint(angle, radius);

        let mid_a = (cfg.angle_sample_points() - 1) / 2;
        let mid_r = (cfg.radius_sample_points() - 1) / 2;
        let (x, y) = projection(&img, angle, radius);
        let p = fp[mid_a][mid_r];
        assert!((p.x - x).abs() < 1e-9, "x {} vs {}", p.x, x);
        assert!((p.y - y).abs() < 1e-9, "y {} vs {}", p.y, y);
    }
}

#[test]
fn single_point_footprint_is_the_projection() {
    let img = SourceImage::new(RgbaImage::new(64, 64)).unwrap();
    let cfg = SamplingConfig::new(5.0, 1, 5.0, 1).unwrap();
    let sampler = PolarSampler::new(&img, cfg, Color::WHITE);

    let fp = sampler.compute_footprint(30.0, 20.0);
    assert_eq!(fp.len(), 1);
    assert_eq!(fp[0].len(), 1);
    let (x, y) = projection(&img, 30.0, 20.0);
    assert!((fp[0][0].x - x).abs() < 1e-9);
    assert!((fp[0][0].y - y).abs() < 1e-9);
}

#[test]
fn single_opaque_pixel_covers_the_whole_footprint() {
    // Queries start inside the single pixel; the outer radius samples fall
    // off the image and extend it.
    let mut rng = rand::rng();
    let rgb = [37u8, 142, 251];
    let img = SourceImage::new(RgbaImage::from_pixel(
        1,
        1,
        image::Rgba([rgb[0], rgb[1], rgb[2], 255]),
    ))
    .unwrap();
    let cfg = SamplingConfig::new(0.0, 1, 3.0, 3).unwrap();
    let sampler = PolarSampler::new(&img, cfg, Color::WHITE);

    for _ in 0..100 {
        let angle = rng.random_range(80.0..100.0);
        let radius = rng.random_range(1.6..2.4);
        let fp = sampler.compute_footprint(angle, radius);
        assert!(fp[0][2].y <= -1.0, "outer sample should be off the image");

        let c = sampler.sample_color(angle, radius);
        assert!((c.r - rgb[0] as f64).abs() < 1e-9);
        assert!((c.g - rgb[1] as f64).abs() < 1e-9);
        assert!((c.b - rgb[2] as f64).abs() < 1e-9);
    }
}

#[test]
fn transparent_image_goes_black_not_background() {
    let img = SourceImage::new(RgbaImage::from_pixel(100, 100, image::Rgba([90, 90, 90, 0]))).unwrap();
    let sampler = PolarSampler::new(&img, SamplingConfig::default(), Color::WHITE);

    for angle in [0.0, 45.0, 200.0] {
        let c = sampler.sample_color(angle, 20.0);
        assert_eq!((c.r, c.g, c.b), (0.0, 0.0, 0.0));
    }
}

#[test]
fn unit_step_sweep_has_one_color_per_degree() {
    // Color encodes the column, so each entry can be traced back to its angle.
    let img = FnImage {
        width: 400,
        height: 400,
        pixel: |x: u32, _y: u32| Rgba::new((x % 256) as u8, 0, 0, 255),
    };
    let cfg = SamplingConfig::new(0.0, 1, 0.0, 1).unwrap();
    let sampler = PolarSampler::new(&img, cfg, Color::WHITE);

    let sweep = sampler.sample_sweep(1.0, 100.0);
    assert_eq!(sweep.len(), 360);
    for (i, color) in sweep.iter().enumerate() {
        assert_eq!(*color, sampler.sample_color(i as f64, 100.0));
    }
}

#[test]
fn out_of_bounds_points_reuse_last_in_bounds_pixel() {
    // Every column has its own red value. One radius sample is inside the
    // image, the next two fall off the right edge.
    let img = FnImage {
        width: 20,
        height: 20,
        pixel: |x: u32, _y: u32| Rgba::new(x as u8 * 10, 0, 0, 255),
    };
    let cfg = SamplingConfig::new(0.0, 1, 20.0, 3).unwrap();
    let sampler = PolarSampler::new(&img, cfg, Color::new(0, 255, 0));

    // Radii 0, 10, 20 at angle 0 -> x = 10, 20, 30, y = 10.
    let fp = sampler.compute_footprint(0.0, 10.0);
    assert_eq!(fp[0].iter().map(|p| p.x).collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);

    let c = sampler.sample_color(0.0, 10.0);
    assert!((c.r - 100.0).abs() < 1e-9, "got {c:?}");
    assert_eq!(c.g, 0.0);
}

#[test]
fn leading_out_of_bounds_points_use_opaque_background() {
    let img = FnImage {
        width: 20,
        height: 20,
        pixel: |_x: u32, _y: u32| Rgba::new(0, 0, 0, 255),
    };
    let cfg = SamplingConfig::new(0.0, 1, 20.0, 3).unwrap();
    let background = Color::new(30, 60, 90);
    let sampler = PolarSampler::new(&img, cfg, background);

    // Radii -20, -10, 0 at angle 0: x = -10, 0, 10. The first point is out
    // and nothing was seen yet, so it counts as opaque background.
    let c = sampler.sample_color(0.0, -10.0);
    assert!((c.r - 10.0).abs() < 1e-9);
    assert!((c.g - 20.0).abs() < 1e-9);
    assert!((c.b - 30.0).abs() < 1e-9);
}

#[test]
fn table_matches_per_led_sweeps() {
    let img = FnImage {
        width: 120,
        height: 120,
        pixel: |x: u32, y: u32| Rgba::new(x as u8, y as u8, 7, 255),
    };
    let sampler = PolarSampler::new(&img, SamplingConfig::default(), Color::WHITE);
    let layout = LedLayout::builder().led_count(3).build();

    let table = sampler.build_color_table(&layout, 5.0);
    assert_eq!(table.led_count(), 3);
    assert_eq!(table.angles_per_led(), 72);
    for (led, radius) in layout.radii().enumerate() {
        assert_eq!(table.row(led).unwrap(), sampler.sample_sweep(5.0, radius).as_slice());
    }
}
