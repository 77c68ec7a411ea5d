use embedded_graphics::{
	Pixel,
	draw_target::DrawTarget,
	geometry::{Dimensions, Point, Size},
	pixelcolor::{Rgb888, RgbColor},
	primitives::Rectangle,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use image::RgbImage;
use itertools::Itertools;
use tracing::instrument;

use super::{
	codec::image_to_wire_bytes,
	commands::*,
	error::{Error, Result},
	framebuffer::Framebuffer,
	helpers::address_range,
	io::{Driver, State},
};

impl<SPI, DC, RST, D> Driver<SPI, DC, RST, D>
where
	SPI: SpiDevice,
	DC: OutputPin,
	RST: OutputPin,
	D: DelayNs,
{
	/// Set the area of the screen to draw to, inclusive on both ends.
	///
	/// This leaves the controller expecting pixel data: it ends with a memory write command.
	#[instrument(level = "trace", skip(self))]
	pub fn set_window(&mut self, start: (u16, u16), end: (u16, u16)) -> Result<()> {
		if (start.0 > end.0) || (start.1 > end.1) {
			return Err(Error::Io(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				"window start must be equal or before end",
			)));
		}

		if (self.width <= end.0) || (self.height <= end.1) {
			return Err(Error::Io(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				"window exceeds screen size",
			)));
		}

		self.command(Command::ColumnAddressSet)?;
		for byte in address_range(start.0, end.0) {
			self.write_data_byte(byte)?;
		}

		self.command(Command::PageAddressSet)?;
		for byte in address_range(start.1, end.1) {
			self.write_data_byte(byte)?;
		}

		self.command(Command::MemoryWrite)
	}

	/// Set the window to the whole panel.
	pub fn set_full_window(&mut self) -> Result<()> {
		let (Some(right), Some(bottom)) = (self.width.checked_sub(1), self.height.checked_sub(1))
		else {
			return Err(Error::Io(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				"panel has no pixels",
			)));
		};

		self.set_window((0, 0), (right, bottom))
	}

	/// Push a full-panel framebuffer to the screen.
	///
	/// Usually that's the compositor's [composed buffer](crate::Compositor::composed).
	#[instrument(level = "debug", skip(self, frame))]
	pub fn display(&mut self, frame: &Framebuffer) -> Result<()> {
		self.display_image(frame.image())
	}

	/// Push an arbitrary image to the screen, from the top left corner.
	///
	/// The image should be the size of the panel; its bytes are streamed as-is into the full
	/// window, as a single chunked data write.
	#[instrument(level = "debug", skip(self, image))]
	pub fn display_image(&mut self, image: &RgbImage) -> Result<()> {
		self.set_full_window()?;
		let bytes = image_to_wire_bytes(image);
		self.write_data(&bytes)?;
		self.state = State::Displaying;
		Ok(())
	}

	/// Write an image to an area of the screen.
	#[instrument(level = "trace", skip(self, image))]
	pub fn print(&mut self, origin: (u16, u16), image: &RgbImage) -> Result<()> {
		let (Ok(w), Ok(h)) = (u16::try_from(image.width()), u16::try_from(image.height())) else {
			return Err(Error::Io(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				"image exceeds screen size",
			)));
		};
		if w == 0 || h == 0 {
			return Ok(());
		}

		self.set_window(
			origin,
			(
				origin.0.saturating_add(w - 1),
				origin.1.saturating_add(h - 1),
			),
		)?;
		self.write_data(&image_to_wire_bytes(image))
	}

	/// Write a pixel to the screen.
	#[instrument(level = "trace", skip(self))]
	pub fn pixel(&mut self, x: u16, y: u16, colour: Rgb888) -> Result<()> {
		if x >= self.width || y >= self.height {
			return Err(Error::Io(std::io::Error::new(
				std::io::ErrorKind::InvalidInput,
				"pixel out of bounds",
			)));
		}

		self.set_window((x, y), (x, y))?;
		self.write_data(&[colour.r(), colour.g(), colour.b()])
	}

	/// Clip a rectangle to the panel, in panel coordinates.
	fn clip(&self, area: &Rectangle) -> Option<((u16, u16), (u32, u32))> {
		let area = area.intersection(&self.bounding_box());
		if area.is_zero_sized() {
			return None;
		}

		let x = u16::try_from(area.top_left.x).ok()?;
		let y = u16::try_from(area.top_left.y).ok()?;
		Some(((x, y), (area.size.width, area.size.height)))
	}
}

impl<SPI, DC, RST, D> Dimensions for Driver<SPI, DC, RST, D> {
	fn bounding_box(&self) -> Rectangle {
		Rectangle::new(
			Point::new(0, 0),
			Size::new(self.width.into(), self.height.into()),
		)
	}
}

impl<SPI, DC, RST, D> DrawTarget for Driver<SPI, DC, RST, D>
where
	SPI: SpiDevice,
	DC: OutputPin,
	RST: OutputPin,
	D: DelayNs,
{
	type Color = Rgb888;
	type Error = Error;

	fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		for Pixel(coord, color) in pixels.into_iter() {
			let Ok(x) = u16::try_from(coord.x) else {
				continue;
			};
			let Ok(y) = u16::try_from(coord.y) else {
				continue;
			};

			if x >= self.width || y >= self.height {
				continue;
			}

			self.pixel(x, y, color)?;
		}

		Ok(())
	}

	#[instrument(level = "trace", skip(self, pixels))]
	fn fill_contiguous<I>(
		&mut self,
		area: &Rectangle,
		pixels: I,
	) -> std::result::Result<(), Self::Error>
	where
		I: IntoIterator<Item = Self::Color>,
	{
		let Some((origin, (w, h))) = self.clip(area) else {
			return Ok(());
		};

		// colours come in row-major order for the whole (unclipped) area
		let mut image = RgbImage::new(w, h);
		let offset = (
			(i64::from(origin.0) - i64::from(area.top_left.x)) as u32,
			(i64::from(origin.1) - i64::from(area.top_left.y)) as u32,
		);
		for ((y, x), color) in (0..area.size.height)
			.cartesian_product(0..area.size.width)
			.zip(pixels)
		{
			let (Some(ix), Some(iy)) = (x.checked_sub(offset.0), y.checked_sub(offset.1)) else {
				continue;
			};
			if ix < w && iy < h {
				image.put_pixel(ix, iy, image::Rgb([color.r(), color.g(), color.b()]));
			}
		}

		self.print(origin, &image)
	}

	#[instrument(level = "trace", skip(self))]
	fn fill_solid(
		&mut self,
		area: &Rectangle,
		color: Self::Color,
	) -> std::result::Result<(), Self::Error> {
		let Some((origin, (w, h))) = self.clip(area) else {
			return Ok(());
		};

		let image = RgbImage::from_pixel(w, h, image::Rgb([color.r(), color.g(), color.b()]));
		self.print(origin, &image)
	}
}
