//! Fake hardware that records everything the driver does to it.

#![allow(dead_code)]

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use embedded_hal::{
	delay::DelayNs,
	digital::{self, OutputPin},
	spi::{self, Operation, SpiDevice},
};
use rpi_ili9488_driver::Driver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Dc(bool),
	Reset(bool),
	Write(Vec<u8>),
	DelayMs(u32),
	DelayNs(u32),
}

pub type Recorder = Rc<RefCell<Vec<Event>>>;

pub type FakeDriver = Driver<FakeSpi, FakePin, FakePin, FakeDelay>;

#[derive(Debug, Clone, Copy)]
pub enum PinRole {
	Dc,
	Reset,
}

#[derive(Debug)]
pub struct FakePin {
	role: PinRole,
	recorder: Recorder,
}

impl digital::ErrorType for FakePin {
	type Error = Infallible;
}

impl OutputPin for FakePin {
	fn set_low(&mut self) -> Result<(), Self::Error> {
		self.record(false);
		Ok(())
	}

	fn set_high(&mut self) -> Result<(), Self::Error> {
		self.record(true);
		Ok(())
	}
}

impl FakePin {
	fn record(&self, level: bool) {
		self.recorder.borrow_mut().push(match self.role {
			PinRole::Dc => Event::Dc(level),
			PinRole::Reset => Event::Reset(level),
		});
	}
}

#[derive(Debug)]
pub struct FakeSpiError;

impl spi::Error for FakeSpiError {
	fn kind(&self) -> spi::ErrorKind {
		spi::ErrorKind::Overrun
	}
}

#[derive(Debug)]
pub struct FakeSpi {
	recorder: Recorder,

	/// Start failing after this many successful writes.
	fail_after: Option<usize>,
	writes: usize,
}

impl spi::ErrorType for FakeSpi {
	type Error = FakeSpiError;
}

impl SpiDevice for FakeSpi {
	fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
		for op in operations {
			if let Operation::Write(bytes) = op {
				if self.fail_after.is_some_and(|n| self.writes >= n) {
					return Err(FakeSpiError);
				}
				self.writes += 1;
				self.recorder.borrow_mut().push(Event::Write(bytes.to_vec()));
			}
		}
		Ok(())
	}
}

#[derive(Debug)]
pub struct FakeDelay {
	recorder: Recorder,
}

impl DelayNs for FakeDelay {
	fn delay_ns(&mut self, ns: u32) {
		self.recorder.borrow_mut().push(Event::DelayNs(ns));
	}

	fn delay_ms(&mut self, ms: u32) {
		self.recorder.borrow_mut().push(Event::DelayMs(ms));
	}
}

/// A driver on fake hardware, with or without a reset pin.
pub fn driver(with_reset: bool) -> (FakeDriver, Recorder) {
	build(with_reset, None)
}

/// A driver whose SPI bus breaks after some number of writes.
pub fn failing_driver(after: usize) -> (FakeDriver, Recorder) {
	build(true, Some(after))
}

fn build(with_reset: bool, fail_after: Option<usize>) -> (FakeDriver, Recorder) {
	let recorder = Recorder::default();
	let spi = FakeSpi {
		recorder: recorder.clone(),
		fail_after,
		writes: 0,
	};
	let dc = FakePin {
		role: PinRole::Dc,
		recorder: recorder.clone(),
	};
	let reset = with_reset.then(|| FakePin {
		role: PinRole::Reset,
		recorder: recorder.clone(),
	});
	let delay = FakeDelay {
		recorder: recorder.clone(),
	};

	(Driver::new(spi, dc, reset, delay), recorder)
}

/// Take what's been recorded so far.
pub fn drain(recorder: &Recorder) -> Vec<Event> {
	recorder.borrow_mut().drain(..).collect()
}

/// Group recorded writes by data/command framing: each DC change starts a new frame.
///
/// Delays and reset toggles are dropped.
pub fn frames(events: &[Event]) -> Vec<(bool, Vec<u8>)> {
	let mut frames: Vec<(bool, Vec<u8>)> = Vec::new();
	for event in events {
		match event {
			Event::Dc(level) => frames.push((*level, Vec::new())),
			Event::Write(bytes) => {
				if let Some((_, frame)) = frames.last_mut() {
					frame.extend_from_slice(bytes);
				}
			}
			_ => {}
		}
	}
	frames
}

/// Bytes of every write, in order.
pub fn writes(events: &[Event]) -> Vec<Vec<u8>> {
	events
		.iter()
		.filter_map(|event| match event {
			Event::Write(bytes) => Some(bytes.clone()),
			_ => None,
		})
		.collect()
}
