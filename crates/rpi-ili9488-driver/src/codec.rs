use image::RgbImage;

/// Pack red, green and blue components into a 24-bit 888 value.
pub fn pack_rgb888(r: u8, g: u8, b: u8) -> u32 {
	(u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Convert an image to the byte stream the panel expects after a memory write.
///
/// Over SPI the ILI9488 takes 18-bit colour as three bytes per pixel (the low two bits of each
/// are ignored): red, green, then blue, in row-major order.
pub fn image_to_wire_bytes(image: &RgbImage) -> Vec<u8> {
	let mut bytes = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
	for pixel in image.pixels() {
		let packed = pack_rgb888(pixel[0], pixel[1], pixel[2]);
		bytes.extend_from_slice(&packed.to_be_bytes()[1..]);
	}
	bytes
}
