
// Minimal ST77916 panel driver (QSPI opcode framing, no D/C pin).
// Works with esp-hal (no_std); the bus is abstracted behind `PanelInterface`
// so the same driver runs on the native quad-line profile and the plain-SPI
// bridge profile.
//
// Protocol: every transfer leads with an opcode byte. 0x02 frames a register
// command plus its parameters, 0x32 frames color data. The controller tracks
// which register the most recent command word addressed, so a command word
// always precedes its parameter words, and pixel data for one memory write
// is streamed back-to-back.
//
// Geometry: panel is 360 x 360 logical pixels (square).

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::IntoStorage;
use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::init_cmd::INIT_SEQUENCE;
use crate::interface::PanelInterface;

// Public constants so the rest of the firmware can adopt 360x360 easily.
pub const ST77916_WIDTH: u16 = 360;
pub const ST77916_HEIGHT: u16 = 360;

// One panel row of RGB565 bytes; fills stage at most this much at a time.
const ROW_BYTES: usize = ST77916_WIDTH as usize * 2;

/// Command set used by this driver (MIPI DCS subset the ST77916 honors).
pub mod commands {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const TEON: u8 = 0x35;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const RAMWRC: u8 = 0x3C;
}

/// Error type that wraps the bus error with the driver's own failures.
#[derive(Debug)]
pub enum St77916Error<E> {
    /// The underlying bus transfer failed. The panel state is unknown; the
    /// recovery path is a full [`St77916::reinit`].
    Transport(E),
    /// Rectangle is malformed or lies outside the panel. Nothing was sent.
    Window,
    /// The row staging buffer could not be obtained for this fill.
    Buffer,
}

impl<E> From<E> for St77916Error<E> {
    fn from(e: E) -> Self {
        Self::Transport(e)
    }
}

/// ST77916 panel handle.
///
/// A value of this type only exists after the whole vendor init sequence ran
/// to completion, so holding one is the proof that the panel is display-ready.
/// There is no global instance; the owner threads it into every draw call.
pub struct St77916<IFACE> {
    iface: IFACE,
    w: u16,
    h: u16,
}

impl<IFACE> St77916<IFACE>
where
    IFACE: PanelInterface,
{
    /// Bring the panel into its display-ready state. Call once at startup,
    /// after the expander has released the panel supply and reset lines.
    ///
    /// Any transport error aborts construction; a half-initialized panel
    /// handle is never returned.
    pub fn new(
        iface: IFACE,
        delay: &mut impl DelayNs,
    ) -> Result<Self, St77916Error<IFACE::Error>> {
        let mut this = Self {
            iface,
            w: ST77916_WIDTH,
            h: ST77916_HEIGHT,
        };
        this.run_init_sequence(delay)?;
        Ok(this)
    }

    /// Replay the whole vendor init table.
    ///
    /// Recovery path after any transport error. Always restarts from the top;
    /// resuming mid-table would leave the register-bank selection ambiguous.
    /// Safe to call on a panel that is already up.
    pub fn reinit(&mut self, delay: &mut impl DelayNs) -> Result<(), St77916Error<IFACE::Error>> {
        self.run_init_sequence(delay)
    }

    fn run_init_sequence(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), St77916Error<IFACE::Error>> {
        for entry in INIT_SEQUENCE {
            self.iface.send_command(entry.cmd, entry.params)?;
            if entry.delay_ms > 0 {
                delay.delay_ms(entry.delay_ms);
            }
        }
        Ok(())
    }

    // Panel width in pixels.
    #[inline]
    pub fn width(&self) -> u16 {
        self.w
    }

    // Panel height in pixels.
    #[inline]
    pub fn height(&self) -> u16 {
        self.h
    }

    // Program the addressable window. All pixel data that follows fills this
    // rectangle row-major until the byte count is exhausted.
    fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), St77916Error<IFACE::Error>> {
        // A malformed range would leave the controller waiting for a byte
        // count that never arrives, so reject before any bus traffic.
        if x0 > x1 || y0 > y1 || x1 >= self.w || y1 >= self.h {
            return Err(St77916Error::Window);
        }

        let ca = [
            (x0 >> 8) as u8,
            (x0 & 0xFF) as u8,
            (x1 >> 8) as u8,
            (x1 & 0xFF) as u8,
        ];
        let ra = [
            (y0 >> 8) as u8,
            (y0 & 0xFF) as u8,
            (y1 >> 8) as u8,
            (y1 & 0xFF) as u8,
        ];

        self.iface.send_command(commands::CASET, &ca)?;
        self.iface.send_command(commands::RASET, &ra)?;
        Ok(())
    }

    /// Fill an inclusive rectangle with a solid color.
    ///
    /// Streams exactly `(x1-x0+1) * (y1-y0+1)` pixels, each split into its
    /// big-endian byte pair, one precomputed row at a time. The row buffer is
    /// scoped to this call; nothing is retained between fills.
    pub fn fill_rect(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Rgb565,
    ) -> Result<(), St77916Error<IFACE::Error>> {
        self.set_window(x0, y0, x1, y1)?;

        let row_px = (x1 - x0 + 1) as usize;
        let c = color.into_storage().to_be_bytes();

        let mut row: Vec<u8, ROW_BYTES> = Vec::new();
        for _ in 0..row_px {
            row.extend_from_slice(&c)
                .map_err(|_| St77916Error::Buffer)?;
        }

        self.iface.write_pixels(&row)?;
        for _ in y0 + 1..=y1 {
            self.iface.write_pixels_continue(&row)?;
        }
        Ok(())
    }

    /// Fill the whole panel with a solid color.
    pub fn fill_screen(&mut self, color: Rgb565) -> Result<(), St77916Error<IFACE::Error>> {
        self.fill_rect(0, 0, self.w - 1, self.h - 1, color)
    }
}
