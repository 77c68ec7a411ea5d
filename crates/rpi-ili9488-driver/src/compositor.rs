use embedded_graphics::{
	geometry::{Point, Size},
	pixelcolor::Rgb888,
	primitives::Rectangle,
};
use image::{GrayImage, RgbImage};
use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::{
	framebuffer::Framebuffer,
	sprite::{Sprite, TransparencyPolicy},
	text::TextFont,
};

#[cfg(test)]
mod tests;

/// A sprite placed on the screen.
#[derive(Debug, Clone)]
pub struct SpriteOverlay {
	pub sprite: Sprite,
	pub position: Point,

	/// Present when the sprite was added as transparent: 0 for see-through pixels, 255 otherwise.
	pub mask: Option<GrayImage>,
}

impl SpriteOverlay {
	pub fn is_transparent(&self) -> bool {
		self.mask.is_some()
	}

	pub fn bounding_box(&self) -> Rectangle {
		Rectangle::new(self.position, self.sprite.size())
	}

	fn paste_onto(&self, target: &mut Framebuffer) {
		target.paste(self.sprite.image(), self.position, self.mask.as_ref());
	}
}

/// Some text placed on the screen.
#[derive(Debug, Clone)]
pub struct TextOverlay {
	pub text: String,
	pub position: Point,
	pub font: TextFont,

	/// The size asked for, or the font's own when none was given.
	///
	/// Built-in fonts only come in a few heights, so this may differ from `font.size()`.
	pub size: f32,
	pub colour: Rgb888,
}

impl TextOverlay {
	pub fn size(&self) -> f32 {
		self.size
	}

	fn draw_onto(&self, target: &mut Framebuffer) {
		self.font.draw(target, &self.text, self.position, self.colour);
	}
}

/// Layers named sprites and text over a background.
///
/// Two buffers are kept: the background, and the composed buffer which is what gets displayed.
/// The composed buffer is always the background with every sprite pasted in the order they were
/// first added, then every text drawn in the order they were first added. Re-adding an existing
/// name replaces that overlay in place, keeping its position in the stack.
///
/// Raw drawing (with [`draw_region`](Self::draw_region) or [`canvas_mut`](Self::canvas_mut)) goes
/// straight to the composed buffer and is lost the next time it's rebuilt.
#[derive(Debug, Clone)]
pub struct Compositor {
	background: Framebuffer,
	composed: Framebuffer,
	sprites: IndexMap<String, SpriteOverlay>,
	texts: IndexMap<String, TextOverlay>,
	policy: TransparencyPolicy,
}

impl Compositor {
	/// A compositor with a black background.
	pub fn new(width: u32, height: u32) -> Self {
		let background = Framebuffer::new(width, height);
		Self {
			composed: background.clone(),
			background,
			sprites: IndexMap::new(),
			texts: IndexMap::new(),
			policy: TransparencyPolicy::default(),
		}
	}

	/// Use a different transparency policy for sprites added from now on.
	pub fn with_policy(mut self, policy: TransparencyPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn policy(&self) -> TransparencyPolicy {
		self.policy
	}

	pub fn width(&self) -> u32 {
		self.background.width()
	}

	pub fn height(&self) -> u32 {
		self.background.height()
	}

	pub fn size(&self) -> Size {
		Size::new(self.width(), self.height())
	}

	pub fn background(&self) -> &Framebuffer {
		&self.background
	}

	/// The buffer to display.
	pub fn composed(&self) -> &Framebuffer {
		&self.composed
	}

	/// The composed buffer, to draw into directly with [`embedded_graphics`].
	pub fn canvas_mut(&mut self) -> &mut Framebuffer {
		&mut self.composed
	}

	pub fn sprite(&self, name: &str) -> Option<&SpriteOverlay> {
		self.sprites.get(name)
	}

	pub fn text(&self, name: &str) -> Option<&TextOverlay> {
		self.texts.get(name)
	}

	/// Sprite names, bottom to top.
	pub fn sprite_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.sprites.keys().map(String::as_str)
	}

	/// Text names, bottom to top.
	pub fn text_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.texts.keys().map(String::as_str)
	}

	/// Replace the background with a solid colour.
	///
	/// This also drops every sprite and text overlay: the screen is left showing only the colour.
	#[instrument(level = "debug", skip(self))]
	pub fn clear_background(&mut self, colour: Rgb888) {
		self.background = Framebuffer::solid(self.width(), self.height(), colour);
		self.composed = self.background.clone();
		self.sprites.clear();
		self.texts.clear();
	}

	/// Replace the background with an image, keeping all overlays.
	///
	/// The image is placed at the top left corner and clipped; uncovered areas are black.
	#[instrument(level = "debug", skip(self, image))]
	pub fn set_background(&mut self, image: &RgbImage) {
		let mut background = Framebuffer::new(self.width(), self.height());
		background.paste(image, Point::zero(), None);
		self.background = background;
		self.recompose();
	}

	/// Place a sprite with its top left corner at `position`.
	///
	/// With `transparent`, pixels the [policy](TransparencyPolicy) considers see-through are
	/// skipped. A new name is pasted straight onto the composed buffer when nothing needs to stay
	/// above it; replacing an existing name rebuilds the whole buffer.
	#[instrument(level = "debug", skip(self, sprite))]
	pub fn add_sprite(&mut self, name: &str, sprite: Sprite, position: Point, transparent: bool) {
		let mask = transparent.then(|| self.policy.mask(sprite.image()));
		let overlay = SpriteOverlay {
			sprite,
			position,
			mask,
		};

		let (index, previous) = self.sprites.insert_full(name.to_owned(), overlay);
		if previous.is_some() || !self.texts.is_empty() {
			debug!(replaced = previous.is_some(), "recomposing for new sprite");
			self.recompose();
		} else {
			self.sprites[index].paste_onto(&mut self.composed);
		}
	}

	/// Take a sprite off the screen.
	///
	/// Returns whether there was a sprite with that name. Missing names are not an error, but
	/// the buffer is rebuilt either way, so this also discards any raw drawing.
	#[instrument(level = "debug", skip(self))]
	pub fn remove_sprite(&mut self, name: &str) -> bool {
		let removed = self.sprites.shift_remove(name);
		if let Some(overlay) = &removed {
			debug!(area = ?overlay.bounding_box(), "removed sprite");
		}

		self.recompose();
		removed.is_some()
	}

	/// Place some text with its top left corner at `position`.
	///
	/// Without a font, the default built-in font is used. With a size, the font is scaled to it
	/// (or swapped for the closest built-in size). Text is drawn over what's there, without
	/// erasing first; replacing an existing name rebuilds the whole buffer.
	#[instrument(level = "debug", skip(self, text, font), fields(text = %text.as_ref()))]
	pub fn add_text(
		&mut self,
		name: &str,
		text: impl AsRef<str>,
		position: Point,
		font: Option<TextFont>,
		size: Option<f32>,
		colour: Rgb888,
	) {
		let font = TextFont::resolve(font, size);
		let overlay = TextOverlay {
			text: text.as_ref().to_owned(),
			position,
			size: size.unwrap_or_else(|| font.size()),
			font,
			colour,
		};

		let (index, previous) = self.texts.insert_full(name.to_owned(), overlay);
		if previous.is_some() {
			debug!("recomposing for replaced text");
			self.recompose();
		} else {
			self.texts[index].draw_onto(&mut self.composed);
		}
	}

	/// Take some text off the screen.
	///
	/// Returns whether there was text with that name. Missing names are not an error.
	#[instrument(level = "debug", skip(self))]
	pub fn remove_text(&mut self, name: &str) -> bool {
		if self.texts.shift_remove(name).is_none() {
			return false;
		}

		self.recompose();
		true
	}

	/// Fill a rectangle of the composed buffer, corners inclusive.
	///
	/// This is raw drawing: it isn't an overlay, and is lost when the buffer is next rebuilt.
	pub fn draw_region(&mut self, top_left: Point, bottom_right: Point, colour: Rgb888) {
		self.composed.fill_region(top_left, bottom_right, colour);
	}

	/// Rebuild the composed buffer from the background and every overlay.
	#[instrument(level = "trace", skip(self))]
	pub fn recompose(&mut self) {
		self.composed.clone_from(&self.background);
		for overlay in self.sprites.values() {
			overlay.paste_onto(&mut self.composed);
		}
		for overlay in self.texts.values() {
			overlay.draw_onto(&mut self.composed);
		}
	}
}
