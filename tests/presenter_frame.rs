use image::RgbaImage;
use povsim::{
    Canvas, Color, LedLayout, PovError, Presenter, PresenterCommand, PresenterConfig,
    SamplingConfig, SourceImage, ViewState,
};

const SIDE: u32 = 200;

/// Left half red, right half blue, fully opaque.
fn split_image() -> SourceImage {
    let img = RgbaImage::from_fn(SIDE, SIDE, |x, _| {
        if x < SIDE / 2 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    SourceImage::new(img).unwrap()
}

const HUD_FONT: &[u8] = include_bytes!("fixtures/DejaVuSansMono.ttf");

fn layout() -> LedLayout {
    LedLayout::builder()
        .led_count(4)
        .led_radius(6.0)
        .led_separation(2.0)
        .led_center_offset(20.0)
        .build()
}

fn config(show_footprint: bool) -> PresenterConfig {
    PresenterConfig::builder()
        .frame_width(SIDE)
        .image_alpha(0)
        .show_footprint(show_footprint)
        .build()
}

// Wide angular span so footprint polygons are visible away from the LEDs.
fn sampling() -> SamplingConfig {
    SamplingConfig::new(40.0, 3, 10.0, 3).unwrap()
}

fn presenter(show_footprint: bool) -> Presenter {
    Presenter::new(split_image(), sampling(), layout(), config(show_footprint)).unwrap()
}

fn render(presenter: &Presenter, state: &ViewState) -> Vec<u8> {
    let mut buf = vec![0u8; (SIDE * SIDE * 4) as usize];
    let mut canvas = Canvas::new(&mut buf, SIDE as usize, SIDE as usize);
    presenter.render(&mut canvas, state);
    buf
}

fn pixel_at(buf: &[u8], x: usize, y: usize) -> Color {
    let idx = (y * SIDE as usize + x) * 4;
    Color::new(buf[idx], buf[idx + 1], buf[idx + 2])
}

#[test]
fn table_is_built_up_front() {
    let p = presenter(false);
    assert_eq!(p.table().led_count(), 4);
    assert_eq!(p.table().angles_per_led(), 360);
}

#[test]
fn leds_show_their_table_color() {
    let p = presenter(false);
    let mut state = ViewState::new(false);

    // Arm pointing right: LEDs sit over the blue half.
    let buf = render(&p, &state);
    let led = p.layout().radius_of(2) as usize;
    assert_eq!(pixel_at(&buf, 100 + led, 100), Color::BLUE);

    // Rotate left half a turn: LEDs now sit over the red half.
    for _ in 0..180 {
        state.apply(PresenterCommand::RotateLeft, p.table().angles_per_led());
    }
    assert_eq!(state.column, 180);
    let buf = render(&p, &state);
    assert_eq!(pixel_at(&buf, 100 - led, 100), Color::RED);
}

#[test]
fn white_frame_red_border_and_shaft() {
    let p = presenter(false);
    let buf = render(&p, &ViewState::new(false));
    // Border of the image is red, inside is the white frame.
    assert_eq!(pixel_at(&buf, 0, 0), Color::RED);
    assert_eq!(pixel_at(&buf, 5, 5), Color::WHITE);
    // Shaft at the center.
    assert_eq!(pixel_at(&buf, 100, 100), Color::BLACK);
}

#[test]
fn raster_mode_paints_the_whole_ring() {
    let p = presenter(false);
    let mut state = ViewState::new(false);
    state.apply(PresenterCommand::ToggleRaster, p.table().angles_per_led());
    let buf = render(&p, &state);

    let r = p.layout().radius_of(0) as usize;
    assert_eq!(pixel_at(&buf, 100 + r, 100), Color::BLUE);
    assert_eq!(pixel_at(&buf, 100 - r, 100), Color::RED);
}

#[test]
fn footprint_overlay_is_drawn_in_led_color() {
    let plain = render(&presenter(false), &ViewState::new(false));
    let overlay = render(&presenter(true), &ViewState::new(true));
    assert_ne!(plain, overlay);

    // Inside LED 3's footprint (radius 62, 15 degrees up), clear of every LED disc.
    assert_eq!(pixel_at(&plain, 159, 84), Color::WHITE);
    assert_eq!(pixel_at(&overlay, 159, 84), Color::BLUE);
}

#[test]
fn fractional_step_keeps_leds_on_table_columns() {
    let mut cfg = config(false);
    cfg.angle_step = 0.1;
    let p = Presenter::new(split_image(), sampling(), layout(), cfg).unwrap();
    assert!(p.table().angles_per_led() >= 3600);

    let mut state = ViewState::new(false);
    for _ in 0..1800 {
        state.apply(PresenterCommand::RotateLeft, p.table().angles_per_led());
    }
    assert_eq!(state.column, 1800);
    let buf = render(&p, &state);
    let led = p.layout().radius_of(2) as usize;
    assert_eq!(pixel_at(&buf, 100 - led, 100), Color::RED);
}

#[test]
fn vanishing_angle_step_is_an_error() {
    let mut cfg = config(false);
    cfg.angle_step = 1e-300;
    let result = Presenter::new(split_image(), sampling(), layout(), cfg);
    assert!(matches!(result, Err(PovError::InvalidConfig(_))));
}

#[test]
fn hud_text_is_drawn_in_the_top_left_corner() {
    let plain = render(&presenter(false), &ViewState::new(false));

    let mut cfg = config(false);
    cfg.font_data = Some(HUD_FONT.to_vec());
    let p = Presenter::new(split_image(), sampling(), layout(), cfg).unwrap();
    let with_hud = render(&p, &ViewState::new(false));

    let mut dark = 0;
    for y in 0..SIDE as usize {
        for x in 0..SIDE as usize {
            let (a, b) = (pixel_at(&plain, x, y), pixel_at(&with_hud, x, y));
            if a != b {
                assert!(y < 40, "HUD touched ({x}, {y})");
                if b.r < 128 && b.g < 128 && b.b < 128 {
                    dark += 1;
                }
            }
        }
    }
    assert!(dark > 20, "only {dark} dark HUD pixels");
}

#[test]
fn corrupt_font_is_rejected() {
    let mut cfg = config(false);
    cfg.font_data = Some(vec![0u8; 16]);
    let result = Presenter::new(split_image(), sampling(), layout(), cfg);
    assert!(matches!(result, Err(PovError::Font(_))));
}
