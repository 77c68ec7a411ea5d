use std::{
	fmt,
	path::{Path, PathBuf},
	sync::Arc,
};

use embedded_graphics::{
	Drawable,
	geometry::Point,
	mono_font::{
		MonoFont, MonoTextStyle,
		ascii::{FONT_6X10, FONT_7X13, FONT_8X13, FONT_9X15, FONT_10X20},
	},
	pixelcolor::{Rgb888, RgbColor},
	text::{Baseline, Text},
};
use fontdue::{
	Font, FontSettings,
	layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle},
};
use image::Rgb;
use tracing::{debug, instrument, trace};

use crate::{
	error::{Error, Result},
	framebuffer::Framebuffer,
};

/// Built-in bitmap fonts, smallest first.
const BUILTIN: [&MonoFont<'static>; 5] = [
	&FONT_6X10,
	&FONT_7X13,
	&FONT_8X13,
	&FONT_9X15,
	&FONT_10X20,
];

/// A TrueType or OpenType font loaded from a file, at a size.
#[derive(Clone)]
pub struct FontFace {
	path: PathBuf,
	font: Arc<Font>,
	size: f32,
}

impl fmt::Debug for FontFace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FontFace")
			.field("path", &self.path)
			.field("size", &self.size)
			.finish_non_exhaustive()
	}
}

impl FontFace {
	/// Load a font file, for rendering at `size` pixels.
	#[instrument(level = "debug", skip(path), fields(path = ?path.as_ref()))]
	pub fn load(path: impl AsRef<Path>, size: f32) -> Result<Self> {
		let path = path.as_ref().to_owned();
		debug!(?path, "loading font from file");
		let file = std::fs::read(&path)?;

		let font = Font::from_bytes(file, FontSettings::default()).map_err(|reason| Error::Font {
			path: path.clone(),
			reason: reason.to_string(),
		})?;

		Ok(Self {
			path,
			font: Arc::new(font),
			size,
		})
	}

	/// The same face at another size.
	///
	/// The outlines are scalable, so this doesn't touch the file again.
	pub fn resized(&self, size: f32) -> Self {
		Self {
			size,
			..self.clone()
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn size(&self) -> f32 {
		self.size
	}
}

/// The font a text overlay is drawn with.
#[derive(Debug, Clone)]
pub enum TextFont {
	/// One of the built-in bitmap fonts.
	Builtin(&'static MonoFont<'static>),

	/// A font loaded from a file.
	Face(FontFace),
}

impl Default for TextFont {
	fn default() -> Self {
		Self::Builtin(&FONT_10X20)
	}
}

impl From<FontFace> for TextFont {
	fn from(face: FontFace) -> Self {
		Self::Face(face)
	}
}

impl TextFont {
	/// Pick the font to draw with.
	///
	/// Without a font, that's the default built-in one. With a size, file faces are scaled to
	/// it and built-in fonts are swapped for the one closest in height.
	pub fn resolve(font: Option<TextFont>, size: Option<f32>) -> Self {
		let font = font.unwrap_or_default();
		match (font, size) {
			(font, None) => font,
			(Self::Face(face), Some(size)) => Self::Face(face.resized(size)),
			(Self::Builtin(_), Some(size)) => {
				let font = closest_builtin(size);
				let height = font.character_size.height;
				if height as f32 != size {
					debug!(
						requested = size,
						height,
						"no built-in font at that size, using closest"
					);
				}
				Self::Builtin(font)
			}
		}
	}

	/// Height in pixels.
	pub fn size(&self) -> f32 {
		match self {
			Self::Builtin(font) => font.character_size.height as f32,
			Self::Face(face) => face.size,
		}
	}

	/// Draw text with its top left corner at `position`.
	///
	/// Built-in fonts draw solid pixels; file faces are antialiased, blending with what's
	/// already in the buffer. Nothing is erased first.
	#[instrument(level = "trace", skip(self, target))]
	pub fn draw(&self, target: &mut Framebuffer, text: &str, position: Point, colour: Rgb888) {
		match self {
			Self::Builtin(font) => {
				let style = MonoTextStyle::new(font, colour);
				let Ok(_) = Text::with_baseline(text, position, style, Baseline::Top).draw(target);
			}
			Self::Face(face) => draw_face(face, target, text, position, colour),
		}
	}
}

fn closest_builtin(size: f32) -> &'static MonoFont<'static> {
	BUILTIN
		.into_iter()
		.min_by(|a, b| {
			let da = (a.character_size.height as f32 - size).abs();
			let db = (b.character_size.height as f32 - size).abs();
			da.total_cmp(&db)
		})
		.unwrap_or(&FONT_10X20)
}

fn draw_face(
	face: &FontFace,
	target: &mut Framebuffer,
	text: &str,
	position: Point,
	colour: Rgb888,
) {
	let fonts = &[face.font.as_ref()][..];

	let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
	layout.reset(&LayoutSettings {
		x: position.x as f32,
		y: position.y as f32,
		..LayoutSettings::default()
	});
	layout.append(fonts, &TextStyle::new(text, face.size, 0));

	for glyph in layout.glyphs() {
		if glyph.width == 0 || glyph.height == 0 {
			continue;
		}

		let (metrics, bitmap) = fonts[glyph.font_index].rasterize(glyph.parent, glyph.key.px);
		trace!(?glyph.parent, width = metrics.width, height = metrics.height, "rasterised glyph");
		for (i, &coverage) in bitmap.iter().enumerate() {
			if coverage == 0 {
				continue;
			}

			let x = glyph.x as i64 + (i % metrics.width) as i64;
			let y = glyph.y as i64 + (i / metrics.width) as i64;
			let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
				continue;
			};
			let Some(under) = target.pixel(x, y) else {
				continue;
			};

			target.set_pixel(x, y, blend(under, colour, coverage));
		}
	}
}

/// Mix `over` onto `under` with `coverage` out of 255.
fn blend(under: Rgb888, over: Rgb888, coverage: u8) -> Rgb<u8> {
	let mix = |u: u8, o: u8| -> u8 {
		let a = u16::from(coverage);
		((u16::from(o) * a + u16::from(u) * (255 - a) + 127) / 255) as u8
	};
	Rgb([
		mix(under.r(), over.r()),
		mix(under.g(), over.g()),
		mix(under.b(), over.b()),
	])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_builtin() {
		let font = TextFont::resolve(None, None);
		assert_eq!(font.size(), 20.0);
	}

	#[test]
	fn builtin_resize_picks_closest_height() {
		assert_eq!(TextFont::resolve(None, Some(10.0)).size(), 10.0);
		assert_eq!(TextFont::resolve(None, Some(12.0)).size(), 13.0);
		assert_eq!(TextFont::resolve(None, Some(70.0)).size(), 20.0);
	}

	#[test]
	fn builtin_text_draws_in_colour() {
		let mut fb = Framebuffer::new(40, 30);
		TextFont::default().draw(&mut fb, "100", Point::new(2, 2), Rgb888::WHITE);

		let lit = fb.image().pixels().filter(|p| p.0 == [255, 255, 255]).count();
		assert!(lit > 0);
		assert!(fb.image().pixels().all(|p| p.0 == [255, 255, 255] || p.0 == [0, 0, 0]));
	}

	#[test]
	fn blend_endpoints() {
		assert_eq!(blend(Rgb888::BLACK, Rgb888::WHITE, 255), Rgb([255, 255, 255]));
		assert_eq!(blend(Rgb888::BLACK, Rgb888::WHITE, 0), Rgb([0, 0, 0]));
		assert_eq!(blend(Rgb888::BLACK, Rgb888::WHITE, 128), Rgb([128, 128, 128]));
	}

	const FACE: &str = concat!(
		env!("CARGO_MANIFEST_DIR"),
		"/tests/fonts/DejaVuSansMono-Oblique.ttf"
	);

	#[test]
	fn face_is_resized_to_requested_size() {
		let face = FontFace::load(FACE, 30.0).unwrap();
		assert_eq!(TextFont::resolve(Some(face.clone().into()), None).size(), 30.0);

		let resolved = TextFont::resolve(Some(face.into()), Some(50.0));
		assert_eq!(resolved.size(), 50.0);
		let TextFont::Face(face) = resolved else {
			panic!("face swapped for a built-in font");
		};
		assert!(face.path().ends_with("DejaVuSansMono-Oblique.ttf"));
	}

	#[test]
	fn face_text_blends_edges() {
		let mut fb = Framebuffer::solid(120, 60, Rgb888::BLUE);
		let face = FontFace::load(FACE, 40.0).unwrap();
		TextFont::from(face).draw(&mut fb, "100", Point::new(4, 4), Rgb888::WHITE);

		let solid = fb.image().pixels().filter(|p| p.0 == [255, 255, 255]).count();
		let edges = fb
			.image()
			.pixels()
			.filter(|p| p.0 != [255, 255, 255] && p.0 != [0, 0, 255])
			.count();
		assert!(solid > 0);
		assert!(edges > 0);
	}

	#[test]
	fn missing_font_file_fails() {
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(
			FontFace::load(dir.path().join("arial.ttf"), 30.0),
			Err(Error::Io(_))
		));
	}

	#[test]
	fn invalid_font_file_fails() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.ttf");
		std::fs::write(&path, b"not a font").unwrap();
		assert!(matches!(
			FontFace::load(&path, 30.0),
			Err(Error::Font { .. })
		));
	}
}
