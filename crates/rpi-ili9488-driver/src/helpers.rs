use bitvec::{BitArr, order::Msb0};
use tracing::{debug, instrument};

/// Memory access control register value (MADCTL).
///
/// Bits are stored most significant first, so index 0 is MY and index 5 is MH.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemoryAccessControl(BitArr!(for 8, in u8, Msb0));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vertical {
	TopToBottom,
	BottomToTop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Horizontal {
	LeftToRight,
	RightToLeft,
}

impl MemoryAccessControl {
	/// Landscape orientation with BGR ordering, as used by the vendor init table (0xE8).
	pub fn landscape() -> Self {
		Self::default()
			.row_order(Vertical::BottomToTop)
			.col_order(Horizontal::RightToLeft)
			.exchanged()
			.bgr()
	}

	pub fn row_order(mut self, direction: Vertical) -> Self {
		self.0.set(0, match direction {
			Vertical::TopToBottom => false,
			Vertical::BottomToTop => true,
		});
		self
	}

	pub fn col_order(mut self, direction: Horizontal) -> Self {
		self.0.set(1, match direction {
			Horizontal::LeftToRight => false,
			Horizontal::RightToLeft => true,
		});
		self
	}

	/// Rows and columns in their natural order (MV clear).
	pub fn normal(mut self) -> Self {
		self.0.set(2, false);
		self
	}

	/// Rows and columns exchanged (MV set), for landscape use of a portrait panel.
	pub fn exchanged(mut self) -> Self {
		self.0.set(2, true);
		self
	}

	/// Vertical refresh order (aka Line Address Order).
	pub fn v_refresh(mut self, direction: Vertical) -> Self {
		self.0.set(3, match direction {
			Vertical::TopToBottom => false,
			Vertical::BottomToTop => true,
		});
		self
	}

	pub fn rgb(mut self) -> Self {
		self.0.set(4, false);
		self
	}

	pub fn bgr(mut self) -> Self {
		self.0.set(4, true);
		self
	}

	/// Horizontal refresh order (aka Data Latch Order).
	pub fn h_refresh(mut self, direction: Horizontal) -> Self {
		self.0.set(5, match direction {
			Horizontal::LeftToRight => false,
			Horizontal::RightToLeft => true,
		});
		self
	}
}

impl From<MemoryAccessControl> for u8 {
	fn from(control: MemoryAccessControl) -> u8 {
		let arr: [u8; 1] = control.0.into_inner();
		arr[0]
	}
}

pub const COLMOD_RGB_65K: u8 = 0b0101;
pub const COLMOD_RGB_262K: u8 = 0b0110;

pub const COLMOD_3BPP: u8 = 0b0001;
pub const COLMOD_16BPP: u8 = 0b0101;
pub const COLMOD_18BPP: u8 = 0b0110;

/// Helper function to build the interface pixel format byte.
///
/// Takes the RGB interface and control interface formats, and returns the byte to send with
/// [`Command::InterfacePixelFormat`](crate::Command::InterfacePixelFormat).
#[instrument(level = "debug")]
pub fn pixel_format(rgb_interface: u8, control_interface: u8) -> u8 {
	let byte = (rgb_interface & 0b0111) << 4 | (control_interface & 0b0111);
	debug!(byte, "pixel format");
	byte
}

/// Helper function to split a window edge pair into the four bytes sent after
/// [`Command::ColumnAddressSet`](crate::Command::ColumnAddressSet) or
/// [`Command::PageAddressSet`](crate::Command::PageAddressSet).
pub fn address_range(start: u16, end: u16) -> [u8; 4] {
	let [s0, s1] = start.to_be_bytes();
	let [e0, e1] = end.to_be_bytes();
	[s0, s1, e0, e1]
}
