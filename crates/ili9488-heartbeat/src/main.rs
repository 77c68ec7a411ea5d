use std::path::PathBuf;

use clap::Parser;
use lloggs::{LoggingArgs, PreArgs, WorkerGuard};
use miette::{Result, miette};
use rpi_ili9488_driver::DriverArgs;
use tracing::debug;

/// Animate a beating heart and a beat rate on an ILI9488 display.
///
/// This is made for the common 3.5 inch 480x320 ILI9488 SPI modules, connected to a Raspberry Pi.
/// Two heart sprites are alternated at a fixed interval, with the beat rate drawn beside them.
///
/// A full frame is 460800 bytes, which is sent in chunks of `--chunk-size`. If you get "Message
/// too long" errors, lower it or raise `spidev.bufsiz` in `/boot/firmware/cmdline.txt`.
#[derive(Debug, Clone, Parser)]
#[command(
	author,
	version,
	after_help = "Want more detail? Try the long '--help' flag!",
	after_long_help = "Didn't expect this much output? Use the short '-h' flag to get short help."
)]
pub struct Args {
	#[command(flatten)]
	logging: LoggingArgs,

	/// SPI port to use.
	#[arg(long, default_value = "0")]
	spi: u8,

	/// SPI CE number for the display's chip select pin.
	#[arg(long, default_value = "0")]
	ce: u8,

	/// GPIO pin number for the display's data/command pin.
	#[arg(long, default_value = "24")]
	dc: u8,

	/// GPIO pin number for the display's reset pin.
	#[arg(long, default_value = "25")]
	reset: u8,

	/// The display's reset pin isn't wired; rely on the software reset only.
	#[arg(long)]
	no_reset: bool,

	/// SPI frequency in Hz.
	#[arg(long, default_value = "64000000")]
	frequency: u32,

	/// Maximum bytes per SPI write.
	#[arg(long, default_value = "4096")]
	chunk_size: usize,

	/// Sprite image files, shown in turn.
	///
	/// Near-black pixels are transparent. Can be given multiple times.
	#[arg(long = "sprite", default_values = ["heart70.png", "heart76.png"])]
	sprites: Vec<PathBuf>,

	/// Top left corner of the sprites, as X,Y.
	#[arg(long, default_value = "230,50", value_parser = parse_point)]
	sprite_at: (i32, i32),

	/// Image file to use as the background.
	///
	/// Defaults to plain black.
	#[arg(long)]
	background: Option<PathBuf>,

	/// TrueType or OpenType font file for the text.
	///
	/// Defaults to a built-in bitmap font.
	#[arg(long)]
	font: Option<PathBuf>,

	/// Beat rate to display.
	#[arg(long, default_value = "100")]
	bpm: String,

	/// Time between frames.
	#[arg(long, default_value = "100ms")]
	interval: humantime::Duration,

	/// Stop after this many frames.
	///
	/// Defaults to running until interrupted.
	#[arg(long)]
	frames: Option<u64>,
}

impl Args {
	fn driver_args(&self) -> DriverArgs {
		DriverArgs {
			spi: self.spi,
			ce: self.ce,
			dc: self.dc,
			reset: (!self.no_reset).then_some(self.reset),
			frequency: self.frequency,
			chunk_size: self.chunk_size,
			..Default::default()
		}
	}
}

fn parse_point(s: &str) -> std::result::Result<(i32, i32), String> {
	let (x, y) = s
		.split_once(',')
		.ok_or_else(|| format!("expected X,Y but got {s:?}"))?;
	let x = x.trim().parse().map_err(|err| format!("bad X: {err}"))?;
	let y = y.trim().parse().map_err(|err| format!("bad Y: {err}"))?;
	Ok((x, y))
}

fn get_args() -> Result<(Args, WorkerGuard)> {
	let log_guard = PreArgs::parse().setup().map_err(|err| miette!("{err}"))?;

	debug!("parsing arguments");
	let args = Args::parse();

	let log_guard = match log_guard {
		Some(g) => g,
		None => args
			.logging
			.setup(|v| match v {
				0 => "info",
				1 => "info,ili9488_heartbeat=debug,rpi_ili9488_driver=debug",
				2 => "debug",
				3 => "debug,ili9488_heartbeat=trace,rpi_ili9488_driver=trace",
				_ => "trace",
			})
			.map_err(|err| miette!("{err}"))?,
	};

	debug!(?args, "got arguments");
	Ok((args, log_guard))
}

fn main() -> Result<()> {
	let (args, _guard) = get_args()?;
	run(args)
}

#[cfg(target_os = "linux")]
fn run(args: Args) -> Result<()> {
	use std::{
		sync::{
			Arc,
			atomic::{AtomicBool, Ordering},
		},
		thread::sleep,
		time::Duration,
	};

	use embedded_graphics::{
		geometry::Point,
		pixelcolor::{Rgb888, RgbColor},
	};
	use miette::{IntoDiagnostic, WrapErr};
	use rpi_ili9488_driver::{Compositor, FontFace, RpiDriver, Sprite, TextFont};
	use tracing::info;

	let running = Arc::new(AtomicBool::new(true));
	let r = running.clone();

	ctrlc::set_handler(move || {
		r.store(false, Ordering::SeqCst);
	})
	.into_diagnostic()
	.wrap_err("ctrlc: set_handler")?;

	let sprites = args
		.sprites
		.iter()
		.map(|path| {
			Sprite::load(path, None).wrap_err_with(|| format!("loading sprite {path:?}"))
		})
		.collect::<Result<Vec<_>>>()?;
	if sprites.is_empty() {
		return Err(miette!("need at least one sprite"));
	}

	let font = args
		.font
		.as_ref()
		.map(|path| FontFace::load(path, 70.0))
		.transpose()?
		.map(TextFont::from);

	let mut lcd = RpiDriver::connect(args.driver_args())?;
	lcd.begin()?;

	let mut screen = Compositor::new(lcd.width().into(), lcd.height().into());
	screen.clear_background(Rgb888::BLACK);
	if let Some(path) = &args.background {
		let background = Sprite::load(path, Some(screen.size()))
			.wrap_err_with(|| format!("loading background {path:?}"))?;
		screen.set_background(background.image());
	}

	screen.add_text(
		"beat_num",
		&args.bpm,
		Point::new(110, 60),
		font.clone(),
		Some(70.0),
		Rgb888::WHITE,
	);
	screen.add_text(
		"beat_text",
		"Bpm",
		Point::new(230, 110),
		font,
		Some(30.0),
		Rgb888::WHITE,
	);
	lcd.display(screen.composed())?;

	let position = Point::new(args.sprite_at.0, args.sprite_at.1);
	let interval: Duration = args.interval.into();
	info!(sprites = sprites.len(), ?interval, "starting animation");

	let mut frame: u64 = 0;
	for sprite in sprites.iter().cycle() {
		if !running.load(Ordering::SeqCst) {
			info!("interrupted");
			break;
		}

		screen.add_sprite("heart", sprite.clone(), position, true);
		lcd.display(screen.composed())?;

		frame += 1;
		if args.frames.is_some_and(|limit| frame >= limit) {
			info!(frame, "frame limit reached");
			break;
		}

		sleep(interval);
	}

	Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_args: Args) -> Result<()> {
	Err(miette!(
		"this needs the Raspberry Pi's SPI and GPIO peripherals, which are only available on Linux"
	))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	Args::command().debug_assert()
}

#[test]
fn point_parsing() {
	assert_eq!(parse_point("230,50"), Ok((230, 50)));
	assert_eq!(parse_point(" -3 , 7"), Ok((-3, 7)));
	assert!(parse_point("230").is_err());
	assert!(parse_point("a,b").is_err());
}

#[test]
fn reset_pin_can_be_disabled() {
	let args = Args::parse_from(["ili9488-heartbeat", "--no-reset", "--dc", "22"]);
	let driver = args.driver_args();
	assert_eq!(driver.reset, None);
	assert_eq!(driver.dc, 22);
	assert_eq!(driver.width, 480);
	assert_eq!(args.sprites.len(), 2);
}
