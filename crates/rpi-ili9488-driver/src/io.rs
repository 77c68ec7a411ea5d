use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use tracing::{debug, instrument, trace};

use super::{
	commands::*,
	error::{Error, Result},
	helpers::*,
};

/// Panel width in landscape orientation.
pub const PANEL_WIDTH: u16 = 480;

/// Panel height in landscape orientation.
pub const PANEL_HEIGHT: u16 = 320;

/// Largest payload handed to the SPI device in a single write.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Where the controller is in its bring-up.
///
/// The only way back to [`Uninitialized`](State::Uninitialized) is a fresh driver; `begin()`
/// goes through [`Reset`](State::Reset) again from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Uninitialized,
	Reset,
	Initialized,
	Displaying,
}

/// Driver for the LCD display.
///
/// Generic over the [`embedded_hal`] traits for the SPI device, the data/command pin, the
/// optional reset pin, and the delay provider. On a Raspberry Pi, use `Driver::connect()` to get
/// one wired to rppal.
#[derive(Debug)]
pub struct Driver<SPI, DC, RST, D> {
	pub(crate) spi: SPI,
	pub(crate) dc: DC,
	pub(crate) reset: Option<RST>,
	pub(crate) delay: D,
	pub(crate) width: u16,
	pub(crate) height: u16,
	pub(crate) chunk_size: usize,
	pub(crate) state: State,
	pub(crate) awake: bool,
}

/// Arguments to create a new LCD driver on a Raspberry Pi.
///
/// This is a struct to hold the arguments for the LCD driver: SPI port and frequency, GPIO pins,
/// and panel geometry.
///
/// It implements [`Default`] with the wiring used by the common 3.5" ILI9488 Pi modules.
#[derive(Debug, Clone)]
pub struct DriverArgs {
	/// SPI port to use.
	///
	/// Defaults to 0.
	pub spi: u8,

	/// SPI CE number for the display's chip select pin.
	///
	/// Defaults to 0.
	pub ce: u8,

	/// GPIO pin number for the display's data/command pin.
	///
	/// Defaults to 24.
	pub dc: u8,

	/// GPIO pin number for the display's reset pin, if wired.
	///
	/// Defaults to 25. Without it, only the software reset in the init sequence is performed.
	pub reset: Option<u8>,

	/// SPI frequency in Hz.
	///
	/// Defaults to 64 MHz.
	pub frequency: u32,

	/// Horizontal resolution of the panel.
	///
	/// Defaults to 480.
	pub width: u16,

	/// Vertical resolution of the panel.
	///
	/// Defaults to 320.
	pub height: u16,

	/// Maximum bytes per SPI write.
	///
	/// Defaults to 4096, which fits the default `spidev.bufsiz`.
	pub chunk_size: usize,
}

impl Default for DriverArgs {
	fn default() -> Self {
		Self {
			spi: 0,
			ce: 0,
			dc: 24,
			reset: Some(25),
			frequency: 64_000_000,
			width: PANEL_WIDTH,
			height: PANEL_HEIGHT,
			chunk_size: DEFAULT_CHUNK_SIZE,
		}
	}
}

impl<SPI, DC, RST, D> Driver<SPI, DC, RST, D>
where
	SPI: SpiDevice,
	DC: OutputPin,
	RST: OutputPin,
	D: DelayNs,
{
	/// Wrap already-configured hardware.
	///
	/// The SPI device must be set up for mode 0, MSB first. This doesn't touch the display; call
	/// `begin()` next.
	pub fn new(spi: SPI, dc: DC, reset: Option<RST>, delay: D) -> Self {
		Self {
			spi,
			dc,
			reset,
			delay,
			width: PANEL_WIDTH,
			height: PANEL_HEIGHT,
			chunk_size: DEFAULT_CHUNK_SIZE,
			state: State::Uninitialized,
			awake: false,
		}
	}

	/// Override the panel geometry.
	pub fn with_size(mut self, width: u16, height: u16) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	/// Override the maximum bytes per SPI write. Zero is treated as one.
	pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
		self.chunk_size = chunk_size.max(1);
		self
	}

	pub fn width(&self) -> u16 {
		self.width
	}

	pub fn height(&self) -> u16 {
		self.height
	}

	pub fn state(&self) -> State {
		self.state
	}

	/// Give the hardware back.
	pub fn release(self) -> (SPI, DC, Option<RST>, D) {
		(self.spi, self.dc, self.reset, self.delay)
	}

	#[instrument(level = "trace", skip(self))]
	fn set_dc(&mut self, data: bool) -> Result<()> {
		let result = if data {
			self.dc.set_high()
		} else {
			self.dc.set_low()
		};
		result.map_err(Error::gpio)
	}

	#[instrument(level = "trace", skip(self))]
	fn set_reset(&mut self, high: bool) -> Result<()> {
		let Some(pin) = self.reset.as_mut() else {
			return Ok(());
		};

		let result = if high { pin.set_high() } else { pin.set_low() };
		result.map_err(Error::gpio)
	}

	/// Hardware reset.
	///
	/// Pulses the reset line high, low, high. This is a no-op if no reset pin is wired; the
	/// software reset at the start of `init()` covers that case.
	#[instrument(level = "debug", skip(self))]
	pub fn reset(&mut self) -> Result<()> {
		if self.reset.is_some() {
			self.set_reset(true)?;
			self.delay.delay_ms(5);
			self.set_reset(false)?;
			self.delay.delay_ms(20);
			self.set_reset(true)?;
			self.delay.delay_ms(150);
		} else {
			debug!("no reset pin, skipping hardware reset");
		}

		self.state = State::Reset;
		self.awake = false;
		Ok(())
	}

	/// Perform the init sequence.
	///
	/// Init sequence is the vendor table for 3.5" ILI9488 SPI modules, verbatim: the panel is
	/// sensitive to every one of these bytes.
	#[instrument(level = "debug", skip(self))]
	pub fn init(&mut self) -> Result<()> {
		self.command(Command::SoftwareReset)?;
		self.delay.delay_ms(10);

		self.command(Command::InversionOff)?;

		self.command(Command::PowerControl1)?;
		self.write_data(&[0x17, 0x15])?;

		self.command(Command::PowerControl2)?;
		self.write_data(&[0x41])?;

		self.command(Command::VcomControl)?;
		self.write_data(&[0x00, 0x12, 0x80])?;

		self.command(Command::MemoryAccessControl)?;
		self.write_data(&[MemoryAccessControl::landscape().into()])?;

		self.command(Command::InterfacePixelFormat)?;
		self.write_data(&[pixel_format(COLMOD_RGB_262K, COLMOD_18BPP)])?;

		self.command(Command::InterfaceModeControl)?;
		self.write_data(&[0x00])?;

		self.command(Command::FrameRateControl)?;
		self.write_data(&[0xA0])?;

		self.command(Command::InversionControl)?;
		self.write_data(&[0x02])?;

		self.command(Command::DisplayFunctionControl)?;
		self.write_data(&[0x02, 0x02, 0x3B])?;

		self.command(Command::EntryModeSet)?;
		self.write_data(&[0xC6])?;

		self.command(Command::AdjustControl3)?;
		self.write_data(&[0xA9, 0x51, 0x2C, 0x82])?;

		self.command(Command::PositiveGammaControl)?;
		self.write_data(&[
			0x00, 0x03, 0x09, 0x08, 0x16, 0x0A, 0x3F, 0x78, 0x4C, 0x09, 0x0A, 0x08, 0x16, 0x1A,
			0x0F,
		])?;

		self.command(Command::NegativeGammaControl)?;
		self.write_data(&[
			0x00, 0x16, 0x19, 0x03, 0x0F, 0x05, 0x32, 0x45, 0x46, 0x04, 0x0E, 0x0D, 0x35, 0x37,
			0x0F,
		])?;

		self.command(Command::WakeUp)?;
		self.delay.delay_ms(150);
		self.awake = true;

		self.command(Command::DisplayOn)?;
		self.delay.delay_ms(50);

		self.state = State::Initialized;
		Ok(())
	}

	/// Reset then initialise the display.
	#[instrument(level = "debug", skip(self))]
	pub fn begin(&mut self) -> Result<()> {
		self.reset()?;
		self.init()
	}

	/// Frame some bytes as command or data and write them out.
	///
	/// Sets the data/command line once, then writes the payload in chunks no larger than the
	/// configured chunk size.
	#[instrument(level = "trace", skip(self, bytes), fields(length = bytes.len()))]
	pub fn send(&mut self, bytes: &[u8], is_data: bool) -> Result<()> {
		self.set_dc(is_data)?;
		for chunk in bytes.chunks(self.chunk_size) {
			trace!(length = chunk.len(), "writing some bytes to SPI");
			self.spi.write(chunk).map_err(Error::spi)?;
		}
		Ok(())
	}

	/// Send a command.
	#[instrument(level = "trace", skip(self, command))]
	pub fn command(&mut self, command: Command) -> Result<()> {
		trace!(byte=%format!("{:02X?}", command as u8), "writing command byte to SPI");
		self.send(&[command.into()], false)
	}

	/// Write some data.
	pub fn write_data(&mut self, bytes: &[u8]) -> Result<()> {
		self.send(bytes, true)
	}

	/// Write a single byte of data.
	pub fn write_data_byte(&mut self, byte: u8) -> Result<()> {
		self.send(&[byte], true)
	}

	/// Turn the display on or off.
	#[instrument(level = "trace", skip(self))]
	pub fn set_display(&mut self, on: bool) -> Result<()> {
		if on {
			self.command(Command::DisplayOn)
		} else {
			self.command(Command::DisplayOff)
		}
	}

	/// Turn colour inversion on or off.
	#[instrument(level = "trace", skip(self))]
	pub fn set_inversion(&mut self, on: bool) -> Result<()> {
		if on {
			self.command(Command::InversionOn)
		} else {
			self.command(Command::InversionOff)
		}
	}

	/// Go to sleep.
	#[instrument(level = "trace", skip(self))]
	pub fn sleep(&mut self) -> Result<()> {
		if self.awake {
			self.command(Command::Sleep)?;
			self.delay.delay_ms(5);
			self.awake = false;
		}

		Ok(())
	}

	/// Wake up from sleep.
	#[instrument(level = "trace", skip(self))]
	pub fn wake(&mut self) -> Result<()> {
		if !self.awake {
			self.command(Command::WakeUp)?;
			self.delay.delay_ms(120);
			self.awake = true;
		}

		Ok(())
	}
}
