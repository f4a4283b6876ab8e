//! Display setup and initialization module.
//
// - `setup_display` builds the native quad-line interface and runs panel
//   bring-up. This is the profile that reliably drives pixels.
// - `setup_display_bridge` is the byte-framed fallback for hosts without a
//   usable quad-line master; same driver, same contract, one data line.

use esp_backtrace as _;

use embedded_hal::delay::DelayNs;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::delay::Delay;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::spi::master::{Address, Command, Config, Spi};
use esp_hal::spi::{DataMode, Mode};
use esp_hal::time::Rate;
use esp_hal::Blocking;

use crate::interface::{PanelInterface, SpiPanelInterface, OPCODE_WRITE_CMD, OPCODE_WRITE_COLOR};
use crate::st77916::{commands, St77916, St77916Error};
use crate::wiring::DisplayPins;

// Native-profile clock. 40 MHz, mode 0, known stable on this panel.
const QSPI_FREQ_HZ: u32 = 40_000_000;
// Bridge-profile ceiling; the framing costs 4 bus bytes per payload byte, so
// there is nothing to gain from clocking it harder.
const BRIDGE_FREQ_HZ: u32 = 5_000_000;
// The blocking half-duplex path is bounded by the 64-byte SPI FIFO.
const FIFO_CHUNK: usize = 64;

/// Errors raised while constructing a display backend.
#[derive(Debug)]
pub enum SetupError<E> {
    /// The SPI host rejected the bus configuration.
    Config(esp_hal::spi::master::ConfigError),
    /// The panel init sequence failed on the bus.
    Panel(St77916Error<E>),
}

/// Quad-line panel interface: 8-bit opcode phase plus 24-bit address phase
/// (the controller's 32-bit command framing), parameters on one data line,
/// pixel data on four.
pub struct QspiPanelInterface<'d> {
    spi: Spi<'d, Blocking>,
}

impl<'d> QspiPanelInterface<'d> {
    pub fn new(pins: DisplayPins<'d>) -> Result<Self, esp_hal::spi::master::ConfigError> {
        let spi = Spi::new(
            pins.spi2,
            Config::default()
                .with_frequency(Rate::from_hz(QSPI_FREQ_HZ))
                .with_mode(Mode::_0),
        )?
        .with_sck(pins.sck)
        .with_cs(pins.cs)
        .with_sio0(pins.d0)
        .with_sio1(pins.d1)
        .with_sio2(pins.d2)
        .with_sio3(pins.d3);
        Ok(Self { spi })
    }

    fn write(
        &mut self,
        data_mode: DataMode,
        opcode: u8,
        cmd: u8,
        data: &[u8],
    ) -> Result<(), esp_hal::spi::Error> {
        self.spi.half_duplex_write(
            data_mode,
            Command::_8Bit(opcode as u16, DataMode::Single),
            Address::_24Bit((cmd as u32) << 8, DataMode::Single),
            0,
            data,
        )
    }
}

impl PanelInterface for QspiPanelInterface<'_> {
    type Error = esp_hal::spi::Error;

    fn send_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.write(DataMode::Single, OPCODE_WRITE_CMD, cmd, params)
    }

    fn write_pixels(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut chunks = data.chunks(FIFO_CHUNK);
        if let Some(first) = chunks.next() {
            self.write(DataMode::Quad, OPCODE_WRITE_COLOR, commands::RAMWR, first)?;
        }
        for chunk in chunks {
            self.write(DataMode::Quad, OPCODE_WRITE_COLOR, commands::RAMWRC, chunk)?;
        }
        Ok(())
    }

    fn write_pixels_continue(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for chunk in data.chunks(FIFO_CHUNK) {
            self.write(DataMode::Quad, OPCODE_WRITE_COLOR, commands::RAMWRC, chunk)?;
        }
        Ok(())
    }
}

/// Ready-to-use native-profile display type.
pub type DisplayType<'a> = St77916<QspiPanelInterface<'a>>;

/// Build the native quad-line interface and bring the panel up.
pub fn setup_display<'d>(
    pins: DisplayPins<'d>,
    delay: &mut impl DelayNs,
) -> Result<DisplayType<'d>, SetupError<esp_hal::spi::Error>> {
    let iface = QspiPanelInterface::new(pins).map_err(SetupError::Config)?;
    St77916::new(iface, delay).map_err(SetupError::Panel)
}

// Bridge profile plumbing: full-duplex SPI on D0 with a software CS pin.
pub type BridgeSpiDev<'a> = ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, NoDelay>;

/// Ready-to-use bridge-profile display type.
pub type BridgeDisplayType<'a> = St77916<SpiPanelInterface<BridgeSpiDev<'a>, Delay>>;

/// Build the byte-framed fallback interface on the same pins (D1..D3 unused)
/// and bring the panel up.
pub fn setup_display_bridge<'d>(
    pins: DisplayPins<'d>,
    delay: &mut impl DelayNs,
) -> Result<
    BridgeDisplayType<'d>,
    SetupError<embedded_hal_bus::spi::DeviceError<esp_hal::spi::Error, core::convert::Infallible>>,
> {
    let DisplayPins {
        spi2,
        cs,
        sck,
        d0,
        d1: _,
        d2: _,
        d3: _,
    } = pins;

    let spi = Spi::new(
        spi2,
        Config::default()
            .with_frequency(Rate::from_hz(BRIDGE_FREQ_HZ))
            .with_mode(Mode::_0),
    )
    .map_err(SetupError::Config)?
    .with_sck(sck)
    .with_mosi(d0);

    let cs = Output::new(cs, Level::High, OutputConfig::default());
    let spi_dev = ExclusiveDevice::new(spi, cs, NoDelay).unwrap();

    let iface = SpiPanelInterface::new(spi_dev, Delay::new());
    St77916::new(iface, delay).map_err(SetupError::Panel)
}
