//! A driver for ILI9488-based 3.5" SPI TFT displays, with a framebuffer compositor.
//!
//! The driver speaks to the panel controller in landscape orientation (480×320) at 18-bit
//! colour, over any SPI device and GPIO pins that implement the [`embedded_hal`] traits. On a
//! Raspberry Pi, [`RpiDriver::connect()`] wires it up with [rppal].
//!
//! On top of that, a [`Compositor`] keeps a background and named sprite and text overlays, and
//! maintains the full-screen [`Framebuffer`] to push to the panel. Both the driver and the
//! framebuffer are also [`embedded_graphics`] draw targets.
//!
//! [rppal]: https://docs.rs/rppal
//!
//! # Example
//!
//! ```no_run
//! # use embedded_graphics::{geometry::Point, pixelcolor::{Rgb888, RgbColor}};
//! # use rpi_ili9488_driver::{Compositor, RpiDriver, Result, Sprite};
//! # fn main() -> Result<()> {
//! let mut lcd = RpiDriver::connect(Default::default())?;
//! lcd.begin()?;
//!
//! let mut screen = Compositor::new(480, 320);
//! screen.clear_background(Rgb888::BLACK);
//! screen.add_sprite("heart", Sprite::load("heart70.png", None)?, Point::new(230, 50), true);
//! screen.add_text("bpm", "100", Point::new(100, 60), None, Some(50.0), Rgb888::WHITE);
//! lcd.display(screen.composed())?;
//! # Ok(()) }
//! ```

#[doc(inline)]
pub use codec::*;

#[doc(inline)]
pub use commands::Command;

#[doc(inline)]
pub use compositor::*;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use framebuffer::Framebuffer;

#[doc(inline)]
pub use helpers::*;

#[doc(inline)]
pub use io::*;

#[cfg(target_os = "linux")]
#[doc(inline)]
pub use rpi::RpiDriver;

#[doc(inline)]
pub use sprite::*;

#[doc(inline)]
pub use text::*;

mod codec;
mod commands;
mod compositor;
mod error;
mod framebuffer;
mod graphics;
mod helpers;
mod io;
#[cfg(target_os = "linux")]
mod rpi;
mod sprite;
mod text;
