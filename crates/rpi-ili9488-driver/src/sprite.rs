use std::path::Path;

use embedded_graphics::{geometry::Size, pixelcolor::Rgb888};
use image::{GrayImage, Luma, Rgb, RgbImage, imageops::FilterType};
use tracing::{debug, instrument};

use crate::{error::Result, framebuffer::to_pixel};

/// Which sprite pixels count as see-through.
///
/// There's no alpha blending: a pixel is either fully transparent or fully opaque. Pixels whose
/// red, green and blue channels are all at or below the threshold are transparent, which makes
/// near-black the "key" colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransparencyPolicy {
	pub threshold: u8,
}

impl Default for TransparencyPolicy {
	fn default() -> Self {
		Self { threshold: 20 }
	}
}

impl TransparencyPolicy {
	pub fn new(threshold: u8) -> Self {
		Self { threshold }
	}

	pub fn is_transparent(&self, pixel: &Rgb<u8>) -> bool {
		pixel.0.iter().all(|&channel| channel <= self.threshold)
	}

	/// Binary mask for an image: 0 where transparent, 255 where opaque.
	pub fn mask(&self, image: &RgbImage) -> GrayImage {
		GrayImage::from_fn(image.width(), image.height(), |x, y| {
			if self.is_transparent(image.get_pixel(x, y)) {
				Luma([0])
			} else {
				Luma([255])
			}
		})
	}
}

/// An image to place on the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
	image: RgbImage,
}

impl Sprite {
	/// Load an image file (PNG, JPEG, BMP, GIF) as a sprite.
	///
	/// With a size, the image is resized to it with nearest-neighbour sampling.
	#[instrument(level = "debug", skip(path), fields(path = ?path.as_ref()))]
	pub fn load(path: impl AsRef<Path>, size: Option<Size>) -> Result<Self> {
		let image = image::open(path.as_ref())?.into_rgb8();
		debug!(width = image.width(), height = image.height(), "loaded sprite");

		Ok(match size {
			Some(size) if size != Size::new(image.width(), image.height()) => {
				Self::from_image(image::imageops::resize(
					&image,
					size.width,
					size.height,
					FilterType::Nearest,
				))
			}
			_ => Self::from_image(image),
		})
	}

	/// A sprite filled with one colour.
	pub fn solid(size: Size, colour: Rgb888) -> Self {
		Self::from_image(RgbImage::from_pixel(size.width, size.height, to_pixel(colour)))
	}

	pub fn from_image(image: RgbImage) -> Self {
		Self { image }
	}

	pub fn image(&self) -> &RgbImage {
		&self.image
	}

	pub fn size(&self) -> Size {
		Size::new(self.image.width(), self.image.height())
	}
}

impl From<RgbImage> for Sprite {
	fn from(image: RgbImage) -> Self {
		Self::from_image(image)
	}
}
