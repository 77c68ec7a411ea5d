use embedded_graphics::{geometry::Size, pixelcolor::RgbColor};
use image::Rgb;
use itertools::iproduct;

use super::*;
use crate::text::FontFace;

const DARK_RED: Rgb888 = Rgb888::new(30, 0, 0);

/// Top half red, bottom half near-black.
fn half_heart(size: u32) -> Sprite {
	Sprite::from_image(RgbImage::from_fn(size, size, |_, y| {
		if y < size / 2 {
			Rgb([220, 0, 0])
		} else {
			Rgb([5, 5, 5])
		}
	}))
}

/// What the composed buffer must be, built independently of the compositor's own bookkeeping.
fn expected(compositor: &Compositor) -> Framebuffer {
	let mut fb = compositor.background().clone();
	for name in compositor.sprite_names() {
		let overlay = compositor.sprite(name).unwrap();
		fb.paste(
			overlay.sprite.image(),
			overlay.position,
			overlay.mask.as_ref(),
		);
	}
	for name in compositor.text_names() {
		let overlay = compositor.text(name).unwrap();
		overlay
			.font
			.draw(&mut fb, &overlay.text, overlay.position, overlay.colour);
	}
	fb
}

#[test]
fn clear_gives_solid_stream() {
	let mut compositor = Compositor::new(480, 320);
	compositor.clear_background(Rgb888::new(0x10, 0x20, 0x30));

	let data = compositor.composed().data();
	assert_eq!(data.len(), 480 * 320 * 3);
	assert!(data.chunks(3).all(|px| px == [0x10, 0x20, 0x30]));
}

#[test]
fn clear_drops_overlays() {
	let mut compositor = Compositor::new(20, 20);
	compositor.add_sprite("a", half_heart(4), Point::new(1, 1), false);
	compositor.add_text("t", "x", Point::zero(), None, None, Rgb888::WHITE);

	compositor.clear_background(Rgb888::BLUE);
	assert_eq!(compositor.sprite_names().count(), 0);
	assert_eq!(compositor.text_names().count(), 0);
	assert_eq!(compositor.composed(), &Framebuffer::solid(20, 20, Rgb888::BLUE));
}

#[test]
fn opaque_sprite_covers_its_box() {
	let mut compositor = Compositor::new(20, 20);
	compositor.clear_background(Rgb888::BLUE);
	compositor.add_sprite("heart", half_heart(6), Point::new(3, 4), false);

	for (x, y) in iproduct!(3..9, 4..10) {
		let want = if y - 4 < 3 {
			Rgb888::new(220, 0, 0)
		} else {
			Rgb888::new(5, 5, 5)
		};
		assert_eq!(compositor.composed().pixel(x, y), Some(want), "at {x},{y}");
	}
	assert_eq!(compositor.composed().pixel(2, 4), Some(Rgb888::BLUE));
	assert_eq!(compositor.composed().pixel(9, 9), Some(Rgb888::BLUE));
}

#[test]
fn transparent_sprite_lets_background_through() {
	let mut compositor = Compositor::new(20, 20);
	compositor.clear_background(Rgb888::BLUE);
	compositor.add_sprite("heart", half_heart(6), Point::new(3, 4), true);

	assert!(compositor.sprite("heart").unwrap().is_transparent());
	assert_eq!(compositor.composed().pixel(3, 4), Some(Rgb888::new(220, 0, 0)));
	assert_eq!(compositor.composed().pixel(8, 6), Some(Rgb888::new(220, 0, 0)));
	assert_eq!(compositor.composed().pixel(3, 7), Some(Rgb888::BLUE));
	assert_eq!(compositor.composed().pixel(8, 9), Some(Rgb888::BLUE));
}

#[test]
fn custom_policy_changes_transparency() {
	let mut compositor = Compositor::new(4, 1).with_policy(TransparencyPolicy::new(40));
	compositor.clear_background(Rgb888::GREEN);
	compositor.add_sprite("s", Sprite::solid(Size::new(1, 1), DARK_RED), Point::zero(), true);
	assert_eq!(compositor.composed().pixel(0, 0), Some(Rgb888::GREEN));

	let mut compositor = Compositor::new(4, 1);
	compositor.clear_background(Rgb888::GREEN);
	compositor.add_sprite("s", Sprite::solid(Size::new(1, 1), DARK_RED), Point::zero(), true);
	assert_eq!(compositor.composed().pixel(0, 0), Some(DARK_RED));
}

#[test]
fn add_then_remove_sprite_restores() {
	let mut compositor = Compositor::new(30, 30);
	compositor.clear_background(Rgb888::CYAN);
	let before = compositor.composed().clone();

	compositor.add_sprite("heart", half_heart(10), Point::new(5, 5), false);
	assert_ne!(compositor.composed(), &before);

	assert!(compositor.remove_sprite("heart"));
	assert_eq!(compositor.composed(), &before);
	assert!(compositor.sprite("heart").is_none());
}

#[test]
fn add_then_remove_text_restores() {
	let mut compositor = Compositor::new(60, 30);
	compositor.clear_background(Rgb888::BLACK);
	compositor.add_sprite("heart", half_heart(10), Point::new(0, 0), true);
	let before = compositor.composed().clone();

	compositor.add_text("bpm", "Bpm", Point::new(2, 2), None, None, Rgb888::WHITE);
	assert_ne!(compositor.composed(), &before);

	assert!(compositor.remove_text("bpm"));
	assert_eq!(compositor.composed(), &before);
}

#[test]
fn removing_missing_names_is_harmless() {
	let mut compositor = Compositor::new(20, 20);
	compositor.clear_background(Rgb888::BLUE);
	compositor.add_sprite("heart", half_heart(4), Point::new(1, 1), true);
	compositor.add_text("bpm", "1", Point::new(8, 0), None, None, Rgb888::WHITE);
	let before = compositor.composed().clone();

	assert!(!compositor.remove_sprite("nothing"));
	assert!(!compositor.remove_text("nothing"));
	assert_eq!(compositor.composed(), &before);
}

#[test]
fn replacing_a_sprite_leaves_no_trail() {
	let mut compositor = Compositor::new(20, 20);
	compositor.clear_background(Rgb888::BLUE);
	compositor.add_sprite(
		"heart",
		Sprite::solid(Size::new(4, 4), Rgb888::RED),
		Point::new(0, 0),
		false,
	);
	compositor.add_sprite(
		"heart",
		Sprite::solid(Size::new(4, 4), Rgb888::RED),
		Point::new(10, 10),
		false,
	);

	assert_eq!(compositor.sprite_names().count(), 1);
	assert_eq!(compositor.composed().pixel(0, 0), Some(Rgb888::BLUE));
	assert_eq!(compositor.composed().pixel(10, 10), Some(Rgb888::RED));
	assert_eq!(compositor.composed(), &expected(&compositor));
}

#[test]
fn replacement_keeps_stacking_slot() {
	let mut compositor = Compositor::new(10, 10);
	compositor.add_sprite(
		"under",
		Sprite::solid(Size::new(4, 4), Rgb888::RED),
		Point::zero(),
		false,
	);
	compositor.add_sprite(
		"over",
		Sprite::solid(Size::new(4, 4), Rgb888::GREEN),
		Point::zero(),
		false,
	);
	compositor.add_sprite(
		"under",
		Sprite::solid(Size::new(4, 4), Rgb888::YELLOW),
		Point::zero(),
		false,
	);

	assert_eq!(
		compositor.sprite_names().collect::<Vec<_>>(),
		vec!["under", "over"]
	);
	assert_eq!(compositor.composed().pixel(1, 1), Some(Rgb888::GREEN));
}

#[test]
fn text_stays_above_later_sprites() {
	let mut compositor = Compositor::new(40, 30);
	compositor.add_text("label", "8", Point::zero(), None, None, Rgb888::WHITE);
	compositor.add_sprite(
		"block",
		Sprite::solid(Size::new(20, 20), Rgb888::RED),
		Point::zero(),
		false,
	);

	let white = compositor
		.composed()
		.image()
		.pixels()
		.filter(|p| p.0 == [255, 255, 255])
		.count();
	assert!(white > 0);
	assert_eq!(compositor.composed(), &expected(&compositor));
}

#[test]
fn removing_one_transparent_sprite_keeps_the_other_masked() {
	let mut compositor = Compositor::new(30, 30);
	compositor.clear_background(Rgb888::BLUE);
	compositor.add_sprite("a", half_heart(10), Point::new(0, 0), true);
	compositor.add_sprite("b", half_heart(10), Point::new(5, 5), true);

	assert!(compositor.remove_sprite("b"));
	// bottom half of "a" is see-through
	assert_eq!(compositor.composed().pixel(2, 8), Some(Rgb888::BLUE));
	assert_eq!(compositor.composed().pixel(2, 2), Some(Rgb888::new(220, 0, 0)));
	// where "b" was, clear of "a"
	assert_eq!(compositor.composed().pixel(12, 6), Some(Rgb888::BLUE));
	assert_eq!(compositor.composed(), &expected(&compositor));
}

#[test]
fn raw_drawing_is_lost_on_recompose() {
	let mut compositor = Compositor::new(10, 10);
	compositor.draw_region(Point::new(1, 1), Point::new(3, 3), Rgb888::MAGENTA);
	assert_eq!(compositor.composed().pixel(3, 3), Some(Rgb888::MAGENTA));
	assert_eq!(compositor.background().pixel(3, 3), Some(Rgb888::BLACK));

	compositor.recompose();
	assert_eq!(compositor.composed().pixel(3, 3), Some(Rgb888::BLACK));
}

#[test]
fn set_background_keeps_overlays() {
	let mut compositor = Compositor::new(10, 10);
	compositor.add_sprite(
		"s",
		Sprite::solid(Size::new(2, 2), Rgb888::RED),
		Point::new(4, 4),
		false,
	);
	compositor.set_background(&RgbImage::from_pixel(5, 10, Rgb([0, 255, 0])));

	assert_eq!(compositor.background().pixel(0, 0), Some(Rgb888::GREEN));
	assert_eq!(compositor.background().pixel(9, 0), Some(Rgb888::BLACK));
	assert_eq!(compositor.composed().pixel(4, 4), Some(Rgb888::RED));
	assert_eq!(compositor.composed(), &expected(&compositor));
}

#[test]
fn heartbeat_sequence_stays_consistent() {
	let mut compositor = Compositor::new(480, 320);
	compositor.clear_background(Rgb888::BLACK);

	for beat in 0..4 {
		let size = if beat % 2 == 0 { 70 } else { 76 };
		let position = if beat % 2 == 0 {
			Point::new(230, 50)
		} else {
			Point::new(227, 47)
		};
		compositor.add_sprite("heart", half_heart(size), position, true);
		compositor.add_text("bpm", "100", Point::new(100, 60), None, Some(50.0), Rgb888::WHITE);
		compositor.add_text("label", "Bpm", Point::new(100, 120), None, Some(30.0), Rgb888::WHITE);
		assert_eq!(compositor.composed(), &expected(&compositor), "beat {beat}");
	}

	assert!(compositor.remove_sprite("heart"));
	assert_eq!(compositor.composed(), &expected(&compositor));
}

#[test]
fn removing_missing_sprite_still_rebuilds() {
	let mut compositor = Compositor::new(10, 10);
	compositor.add_sprite("s", Sprite::solid(Size::new(2, 2), Rgb888::RED), Point::zero(), false);
	compositor.draw_region(Point::new(5, 5), Point::new(6, 6), Rgb888::WHITE);

	assert!(!compositor.remove_sprite("other"));
	assert_eq!(compositor.composed().pixel(5, 5), Some(Rgb888::BLACK));
	assert_eq!(compositor.composed().pixel(0, 0), Some(Rgb888::RED));
}

fn face(size: f32) -> TextFont {
	FontFace::load(
		concat!(
			env!("CARGO_MANIFEST_DIR"),
			"/tests/fonts/DejaVuSansMono-Oblique.ttf"
		),
		size,
	)
	.unwrap()
	.into()
}

#[test]
fn font_file_text_over_transparent_sprite_restores() {
	let mut compositor = Compositor::new(200, 100);
	compositor.clear_background(Rgb888::new(0, 0, 80));
	compositor.add_sprite("heart", half_heart(60), Point::new(20, 10), true);
	let before = compositor.composed().clone();

	compositor.add_text(
		"beat_num",
		"100",
		Point::new(10, 20),
		Some(face(30.0)),
		Some(50.0),
		Rgb888::WHITE,
	);
	assert_eq!(compositor.text("beat_num").unwrap().size(), 50.0);
	assert_eq!(compositor.text("beat_num").unwrap().font.size(), 50.0);
	assert_ne!(compositor.composed(), &before);
	assert_eq!(compositor.composed(), &expected(&compositor));

	assert!(compositor.remove_text("beat_num"));
	assert_eq!(compositor.composed(), &before);
}

#[test]
fn font_file_text_is_not_blended_twice() {
	let mut compositor = Compositor::new(200, 100);
	compositor.add_text(
		"beat_text",
		"Bpm",
		Point::new(10, 10),
		Some(face(30.0)),
		None,
		Rgb888::WHITE,
	);
	compositor.add_sprite("heart", half_heart(20), Point::new(150, 10), true);
	compositor.add_text(
		"beat_text",
		"Bpm",
		Point::new(10, 10),
		Some(face(30.0)),
		None,
		Rgb888::WHITE,
	);
	assert!(!compositor.remove_sprite("missing"));

	assert_eq!(compositor.composed(), &expected(&compositor));
}

#[test]
fn text_keeps_requested_size() {
	let mut compositor = Compositor::new(100, 100);
	compositor.add_text("big", "100", Point::zero(), None, Some(70.0), Rgb888::WHITE);
	compositor.add_text("plain", "Bpm", Point::new(0, 40), None, None, Rgb888::WHITE);

	let big = compositor.text("big").unwrap();
	assert_eq!(big.size(), 70.0);
	assert_eq!(big.font.size(), 20.0);
	assert_eq!(compositor.text("plain").unwrap().size(), 20.0);
}
