/// LCD display commands
///
/// This is a subset of the ILI9488 command set, just enough to drive the display.
/// Descriptions are derived from usage and the datasheet for the ILI9488 chip.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
	/// Software reset (SWRESET).
	///
	/// Resets the registers to their defaults. This must be followed by a delay of at least 5ms.
	SoftwareReset = 0x01,

	/// Sleep (SLPIN).
	///
	/// This must be followed by a delay of at least 5ms.
	Sleep = 0x10,

	/// Wake up (SLPOUT).
	///
	/// This must be followed by a delay of at least 120ms.
	WakeUp = 0x11,

	/// Switch off display inversion (INVOFF).
	InversionOff = 0x20,

	/// Switch on display inversion (INVON).
	InversionOn = 0x21,

	/// Turn display off (DISPOFF).
	DisplayOff = 0x28,

	/// Turn display on (DISPON).
	DisplayOn = 0x29,

	/// Set column addresses (CASET).
	///
	/// This sets the area of the screen the display will write to.
	///
	/// 2 u16s, big endian:
	/// - start column
	/// - end column
	ColumnAddressSet = 0x2A,

	/// Set page addresses (PASET).
	///
	/// This sets the area of the screen the display will write to.
	///
	/// 2 u16s, big endian:
	/// - start page (row)
	/// - end page (row)
	PageAddressSet = 0x2B,

	/// Memory write (RAMWR).
	///
	/// This will consider the next bytes as pixel data to write to the screen, filling the window
	/// set by [`ColumnAddressSet`](Command::ColumnAddressSet) and
	/// [`PageAddressSet`](Command::PageAddressSet).
	MemoryWrite = 0x2C,

	/// Memory access control (MADCTL).
	///
	/// 6 bits: MY, MX, MV, ML, BGR, MH.
	///
	/// Use the [`MemoryAccessControl`](super::helpers::MemoryAccessControl) builder to set these.
	MemoryAccessControl = 0x36,

	/// Interface pixel format (COLMOD).
	///
	/// 2 nibbles: RGB interface format, then control interface format. Over SPI the ILI9488 only
	/// accepts 18 bits/pixel, sent as three bytes.
	InterfacePixelFormat = 0x3A,

	/// Interface mode control.
	///
	/// Undocumented in the vendor init table, carried verbatim.
	InterfaceModeControl = 0xB0,

	/// Frame rate control in normal mode (FRMCTR1).
	///
	/// 1 byte: frame rate division ratio and frame rate.
	FrameRateControl = 0xB1,

	/// Display inversion control (INVTR).
	///
	/// 1 byte: 0x02 for 2-dot inversion.
	InversionControl = 0xB4,

	/// Display function control (DISCTRL).
	///
	/// 3 bytes: scan mode, gate/source direction, number of lines.
	DisplayFunctionControl = 0xB6,

	/// Entry mode set.
	///
	/// Undocumented in the vendor init table, carried verbatim.
	EntryModeSet = 0xB7,

	/// Power control 1 (PWCTRL1).
	///
	/// 2 bytes: VREG1OUT and VREG2OUT levels.
	PowerControl1 = 0xC0,

	/// Power control 2 (PWCTRL2).
	///
	/// 1 byte: VGH/VGL step-up factor.
	PowerControl2 = 0xC1,

	/// VCOM control (VMCTRL).
	///
	/// 3 bytes: NV memory programming, VCOM level, VCOM source.
	VcomControl = 0xC5,

	/// Positive gamma control (PGAMCTRL).
	///
	/// 15 bytes. Refer to the datasheet.
	PositiveGammaControl = 0xE0,

	/// Negative gamma control (NGAMCTRL).
	///
	/// 15 bytes. Refer to the datasheet.
	NegativeGammaControl = 0xE1,

	/// Adjust control 3.
	///
	/// Undocumented in the vendor init table, carried verbatim.
	AdjustControl3 = 0xF7,
}

impl From<Command> for u8 {
	fn from(command: Command) -> u8 {
		command as u8
	}
}
