use rppal::{
	gpio::{Gpio, OutputPin},
	hal::Delay,
	spi::{BitOrder, Bus, Mode, SimpleHalSpiDevice, SlaveSelect, Spi},
};
use tracing::{debug, instrument};

use super::{
	error::{Error, Result},
	io::{Driver, DriverArgs},
};

/// The driver wired to a Raspberry Pi's SPI and GPIO peripherals.
pub type RpiDriver = Driver<SimpleHalSpiDevice, OutputPin, OutputPin, Delay>;

fn invalid_input(message: &'static str) -> Error {
	Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, message))
}

impl RpiDriver {
	/// Connect to the LCD display I/O.
	///
	/// This performs the necessary setup for the GPIO and SPI pins, but doesn't touch the display
	/// otherwise. Usually you'll want to call `begin()` right after.
	#[instrument(level = "debug")]
	pub fn connect(args: DriverArgs) -> Result<Self> {
		let bus = match args.spi {
			0 => Bus::Spi0,
			1 => Bus::Spi1,
			2 => Bus::Spi2,
			3 => Bus::Spi3,
			4 => Bus::Spi4,
			5 => Bus::Spi5,
			6 => Bus::Spi6,
			_ => return Err(invalid_input("SPI bus number out of range")),
		};
		let ce = match args.ce {
			0 => SlaveSelect::Ss0,
			1 => SlaveSelect::Ss1,
			2 => SlaveSelect::Ss2,
			_ => return Err(invalid_input("SPI CE number out of range")),
		};

		let gpio = Gpio::new()?;
		let dc = gpio.get(args.dc)?.into_output();
		let reset = match args.reset {
			Some(pin) => Some(gpio.get(pin)?.into_output()),
			None => None,
		};

		let spi = Spi::new(bus, ce, args.frequency, Mode::Mode0)?;
		spi.set_bit_order(BitOrder::MsbFirst)?;
		debug!(?bus, ?ce, frequency = args.frequency, "opened SPI device");

		Ok(Self::new(SimpleHalSpiDevice::new(spi), dc, reset, Delay::new())
			.with_size(args.width, args.height)
			.with_chunk_size(args.chunk_size))
	}
}
