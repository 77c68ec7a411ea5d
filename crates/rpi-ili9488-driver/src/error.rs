use std::path::PathBuf;

use embedded_hal::{digital, spi};

/// Error type for driver and compositor operations.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "miette", derive(miette::Diagnostic))]
pub enum Error {
	#[error("GPIO error: {0}")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("GPIO error, check the pin numbers"))
	)]
	Gpio(digital::ErrorKind),

	#[error("SPI error: {0}")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("SPI error, check settings or increase spidev.bufsiz"))
	)]
	Spi(spi::ErrorKind),

	#[cfg(target_os = "linux")]
	#[error("GPIO setup error")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("GPIO setup failed, check the pin numbers and permissions"))
	)]
	GpioSetup(#[from] rppal::gpio::Error),

	#[cfg(target_os = "linux")]
	#[error("SPI setup error")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("SPI setup failed, check that SPI is enabled and the bus exists"))
	)]
	SpiSetup(#[from] rppal::spi::Error),

	#[error("I/O error")]
	#[cfg_attr(feature = "miette", diagnostic(help("local (non-SPI/GPIO) I/O error")))]
	Io(#[from] std::io::Error),

	#[error("image error")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("the image file is missing, unreadable, or in an unsupported format"))
	)]
	Image(#[from] image::ImageError),

	#[error("loading font {path:?}: {reason}")]
	#[cfg_attr(
		feature = "miette",
		diagnostic(help("the font file must be a TrueType or OpenType font"))
	)]
	Font { path: PathBuf, reason: String },
}

impl Error {
	pub(crate) fn gpio(err: impl digital::Error) -> Self {
		Self::Gpio(err.kind())
	}

	pub(crate) fn spi(err: impl spi::Error) -> Self {
		Self::Spi(err.kind())
	}
}

/// Convenience type for Results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
