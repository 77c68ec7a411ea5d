use std::convert::Infallible;

use embedded_graphics::{
	Drawable, Pixel,
	draw_target::DrawTarget,
	geometry::{OriginDimensions, Point, Size},
	pixelcolor::{Rgb888, RgbColor},
	primitives::{Primitive, PrimitiveStyle, Rectangle},
};
use image::{GrayImage, Rgb, RgbImage};
use itertools::iproduct;

use crate::codec::image_to_wire_bytes;

/// Full-colour image buffer.
///
/// This is what the compositor composes into and what gets pushed to the panel. It is also an
/// [`embedded_graphics`] draw target, for anything beyond sprites and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
	image: RgbImage,
}

impl Framebuffer {
	/// A black buffer.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			image: RgbImage::new(width, height),
		}
	}

	/// A buffer filled with one colour.
	pub fn solid(width: u32, height: u32, colour: Rgb888) -> Self {
		Self {
			image: RgbImage::from_pixel(width, height, to_pixel(colour)),
		}
	}

	pub fn from_image(image: RgbImage) -> Self {
		Self { image }
	}

	pub fn width(&self) -> u32 {
		self.image.width()
	}

	pub fn height(&self) -> u32 {
		self.image.height()
	}

	pub fn image(&self) -> &RgbImage {
		&self.image
	}

	pub fn into_image(self) -> RgbImage {
		self.image
	}

	/// Colour at a point, if it's inside the buffer.
	pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
		self.image.get_pixel_checked(x, y).map(|&p| from_pixel(p))
	}

	pub(crate) fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgb<u8>) {
		self.image.put_pixel(x, y, pixel);
	}

	/// Fill the whole buffer with one colour.
	pub fn fill(&mut self, colour: Rgb888) {
		let pixel = to_pixel(colour);
		for p in self.image.pixels_mut() {
			*p = pixel;
		}
	}

	/// Fill a rectangle given by its corners, both inclusive. Clipped to the buffer.
	pub fn fill_region(&mut self, top_left: Point, bottom_right: Point, colour: Rgb888) {
		let Ok(()) = Rectangle::with_corners(top_left, bottom_right)
			.into_styled(PrimitiveStyle::with_fill(colour))
			.draw(self);
	}

	/// Paste an image with its top left corner at `position`, clipped to the buffer.
	///
	/// With a mask, only pixels whose mask value is non-zero are copied.
	pub fn paste(&mut self, source: &RgbImage, position: Point, mask: Option<&GrayImage>) {
		for (sy, sx) in iproduct!(0..source.height(), 0..source.width()) {
			if mask.is_some_and(|m| m.get_pixel_checked(sx, sy).is_none_or(|v| v[0] == 0)) {
				continue;
			}

			let Some((x, y)) = self.offset(position, sx, sy) else {
				continue;
			};
			self.image.put_pixel(x, y, *source.get_pixel(sx, sy));
		}
	}

	/// Bytes ready to send to the panel.
	pub fn data(&self) -> Vec<u8> {
		image_to_wire_bytes(&self.image)
	}

	fn offset(&self, position: Point, dx: u32, dy: u32) -> Option<(u32, u32)> {
		let x = u32::try_from(i64::from(position.x) + i64::from(dx)).ok()?;
		let y = u32::try_from(i64::from(position.y) + i64::from(dy)).ok()?;
		(x < self.image.width() && y < self.image.height()).then_some((x, y))
	}
}

impl OriginDimensions for Framebuffer {
	fn size(&self) -> Size {
		Size::new(self.image.width(), self.image.height())
	}
}

impl DrawTarget for Framebuffer {
	type Color = Rgb888;
	type Error = Infallible;

	fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		for Pixel(coord, color) in pixels.into_iter() {
			let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) else {
				continue;
			};

			if x < self.image.width() && y < self.image.height() {
				self.image.put_pixel(x, y, to_pixel(color));
			}
		}

		Ok(())
	}
}

pub(crate) fn to_pixel(colour: Rgb888) -> Rgb<u8> {
	Rgb([colour.r(), colour.g(), colour.b()])
}

pub(crate) fn from_pixel(pixel: Rgb<u8>) -> Rgb888 {
	Rgb888::new(pixel[0], pixel[1], pixel[2])
}
