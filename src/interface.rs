
// Panel bus abstraction for the ST77916 QSPI framing (no D/C pin).
//
// The controller is driven either over native quad SPI (primary profile, see
// display.rs) or through a plain-SPI "bridge" that packs each payload byte
// into one 32-bit word. Both profiles speak the same leading-opcode scheme:
// 0x02 selects register-address mode, 0x32 selects color/data mode. The
// driver programs against `PanelInterface` and never branches on which
// profile is active.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::st77916::commands;

/// Leading opcode of a register/command word.
pub const OPCODE_WRITE_CMD: u8 = 0x02;
/// Leading opcode of a color/data word.
pub const OPCODE_WRITE_COLOR: u8 = 0x32;

// Quiet time between bridge-profile words. The controller samples CS between
// words and needs it deasserted for about a microsecond.
const WORD_GAP_NS: u32 = 1_000;

/// Command and pixel transport to the panel controller.
///
/// One `send_command` call is one protocol unit: the command word plus all of
/// its parameter words, with no foreign word in between. Pixel streams start
/// with `write_pixels` and may be extended with `write_pixels_continue`; the
/// controller keeps its RAM address counter across continuations.
///
/// No implementation retries a failed word or burst. A partial retry would
/// desynchronize the controller's command/parameter tracking, which is worse
/// than a visibly wrong frame; recovery is a full re-init.
pub trait PanelInterface {
    type Error;

    /// Send one command byte followed by its parameter bytes.
    fn send_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error>;

    /// Start a memory write and stream pixel bytes.
    fn write_pixels(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Continue a memory write started by [`PanelInterface::write_pixels`].
    fn write_pixels_continue(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: PanelInterface + ?Sized> PanelInterface for &mut T {
    type Error = T::Error;

    fn send_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error> {
        T::send_command(self, cmd, params)
    }

    fn write_pixels(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_pixels(self, data)
    }

    fn write_pixels_continue(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_pixels_continue(self, data)
    }
}

/// Software-bridge profile: one CS-gated 32-bit word per payload byte, laid
/// out as `[opcode][byte][00][00]`, MSB first, mode 0, clocked at 5 MHz or
/// below.
///
/// Fallback for hosts without a usable quad-line SPI master. Pixel throughput
/// is poor (24 padding clocks per payload byte), but the framing runs on any
/// `SpiDevice`, which also makes this the profile the host test suite drives.
pub struct SpiPanelInterface<SPI, D> {
    spi: SPI,
    delay: D,
}

impl<SPI, D> SpiPanelInterface<SPI, D>
where
    SPI: SpiDevice<u8>,
    D: DelayNs,
{
    pub fn new(spi: SPI, delay: D) -> Self {
        Self { spi, delay }
    }

    // One framed word, one CS-asserted transaction.
    fn word(&mut self, opcode: u8, byte: u8) -> Result<(), SPI::Error> {
        self.spi.write(&[opcode, byte, 0x00, 0x00])?;
        self.delay.delay_ns(WORD_GAP_NS);
        Ok(())
    }

    fn data_words(&mut self, data: &[u8]) -> Result<(), SPI::Error> {
        for &b in data {
            self.word(OPCODE_WRITE_COLOR, b)?;
        }
        Ok(())
    }
}

impl<SPI, D> PanelInterface for SpiPanelInterface<SPI, D>
where
    SPI: SpiDevice<u8>,
    D: DelayNs,
{
    type Error = SPI::Error;

    fn send_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.word(OPCODE_WRITE_CMD, cmd)?;
        self.data_words(params)
    }

    fn write_pixels(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.word(OPCODE_WRITE_CMD, commands::RAMWR)?;
        self.data_words(data)
    }

    fn write_pixels_continue(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        // The controller is still in memory-write mode; data words continue
        // the stream as long as no command word interrupts them.
        self.data_words(data)
    }
}
