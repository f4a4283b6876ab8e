// GPIO expander driver for the TCA9554/TCA9554PWR.
// Datasheet: https://www.ti.com/lit/ds/symlink/tca9554.pdf
//
// On this board the expander gates the panel supply and reset lines, so it is
// the first device touched at boot. The driver is write-only: registers are
// configured once and assumed to persist until power-off, no readback.

use embedded_hal::i2c::I2c;

/// Fixed 7-bit address with A0..A2 strapped low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

// Register map.
const REG_OUTPUT: u8 = 0x01;
const REG_CONFIG: u8 = 0x03;

pub struct Tca9554<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> Tca9554<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn into_inner(self) -> I2C {
        self.i2c
    }

    /// Configure all eight pins as outputs and drive them high.
    ///
    /// Two register writes, each its own bus transaction, each checked. No
    /// retries: a rejected transaction here is a persistent wiring fault, not
    /// a transient, so the caller logs it once and decides whether to carry
    /// on (boards with pull-ups on the reset line come up regardless).
    pub fn init_outputs_high(&mut self) -> Result<(), E> {
        self.i2c.write(self.address, &[REG_CONFIG, 0x00])?;
        self.set_outputs(0xFF)
    }

    /// Write the output register directly.
    pub fn set_outputs(&mut self, levels: u8) -> Result<(), E> {
        self.i2c.write(self.address, &[REG_OUTPUT, levels])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;

    #[test]
    fn init_writes_direction_then_output() {
        let expectations = [
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0x03, 0x00]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0x01, 0xFF]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut exio = Tca9554::new(i2c.clone(), DEFAULT_ADDRESS);
        exio.init_outputs_high().unwrap();

        i2c.done();
    }

    #[test]
    fn rejected_direction_write_stops_the_sequence() {
        let expectations = [I2cTransaction::write(DEFAULT_ADDRESS, vec![0x03, 0x00])
            .with_error(MockError::Io(ErrorKind::Other))];
        let mut i2c = I2cMock::new(&expectations);

        let mut exio = Tca9554::new(i2c.clone(), DEFAULT_ADDRESS);
        assert!(exio.init_outputs_high().is_err());

        // No second transaction was attempted.
        i2c.done();
    }

    #[test]
    fn set_outputs_writes_the_level_mask() {
        let expectations = [I2cTransaction::write(DEFAULT_ADDRESS, vec![0x01, 0x5A])];
        let mut i2c = I2cMock::new(&expectations);

        let mut exio = Tca9554::new(i2c.clone(), DEFAULT_ADDRESS);
        exio.set_outputs(0x5A).unwrap();

        i2c.done();
    }
}
