// This module handles board-specific pin mappings and initialization for the
// Waveshare ESP32-S3-Touch-LCD-1.46.
//! The following wiring is assumed:
//! - LCD QSPI: CS => GPIO21, SCK => GPIO40, D0..D3 => GPIO46/45/42/41
//! - LCD backlight => GPIO5 (LEDC PWM)
//! - TCA9554 expander on I2C0: SDA => GPIO11, SCL => GPIO10
//! The expander's outputs gate the panel supply and reset lines, so it must
//! be brought up before the panel is touched.

use esp_backtrace as _;
use esp_hal::peripherals::{
    Peripherals, GPIO10, GPIO11, GPIO21, GPIO40, GPIO41, GPIO42, GPIO45, GPIO46, GPIO5, I2C0,
    LEDC, SPI2,
};

/// QSPI bus and pins for the panel.
pub struct DisplayPins<'a> {
    pub spi2: SPI2<'a>,
    pub cs: GPIO21<'a>,
    pub sck: GPIO40<'a>,
    pub d0: GPIO46<'a>,
    pub d1: GPIO45<'a>,
    pub d2: GPIO42<'a>,
    pub d3: GPIO41<'a>,
}

/// I2C bus and pins for the expander.
pub struct ExpanderPins<'a> {
    pub i2c0: I2C0<'a>,
    pub sda: GPIO11<'a>,
    pub scl: GPIO10<'a>,
}

pub struct BoardPins<'a> {
    pub display: DisplayPins<'a>,
    pub expander: ExpanderPins<'a>,
    pub lcd_bl: GPIO5<'a>,
    pub ledc: LEDC<'a>,
}

pub fn init_board_pins<'a>(p: Peripherals) -> BoardPins<'a> {
    BoardPins {
        display: DisplayPins {
            spi2: p.SPI2,
            cs: p.GPIO21,
            sck: p.GPIO40,
            d0: p.GPIO46,
            d1: p.GPIO45,
            d2: p.GPIO42,
            d3: p.GPIO41,
        },
        expander: ExpanderPins {
            i2c0: p.I2C0,
            sda: p.GPIO11,
            scl: p.GPIO10,
        },
        lcd_bl: p.GPIO5,
        ledc: p.LEDC,
    }
}
