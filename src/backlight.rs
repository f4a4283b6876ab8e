// Backlight PWM control.
//
// One LEDC low-speed channel at 5 kHz / 8-bit resolution drives the panel
// backlight rail. Brightness is expressed as a 0-255 level to match the
// panel vendor's tooling; the LEDC channel API takes percent, so levels are
// rescaled on the way in.

/// PWM carrier frequency.
pub const PWM_FREQ_HZ: u32 = 5_000;
/// Steady-state brightness after boot (80%).
pub const DEFAULT_LEVEL: u8 = 204;
/// Dim step used by the power-on lamp test.
pub const LAMP_TEST_DIM_LEVEL: u8 = 50;
/// Hold time per lamp-test step.
pub const LAMP_TEST_STEP_MS: u32 = 200;

/// Rescale a 0-255 brightness level onto the LEDC 0-100 duty scale.
pub fn level_to_duty_pct(level: u8) -> u8 {
    (level as u16 * 100 / 255) as u8
}

#[cfg(feature = "esp32s3")]
mod hw {
    use embedded_hal::delay::DelayNs;
    use esp_hal::ledc::channel::{self, Channel, ChannelIFace};
    use esp_hal::ledc::LowSpeed;

    use super::{level_to_duty_pct, DEFAULT_LEVEL, LAMP_TEST_DIM_LEVEL, LAMP_TEST_STEP_MS};

    /// Set the backlight brightness, 0 (off) to 255 (full).
    pub fn set_level(ch: &mut Channel<'_, LowSpeed>, level: u8) -> Result<(), channel::Error> {
        ch.set_duty(level_to_duty_pct(level))
    }

    /// Visual power-on self test: full -> dim three times, then settle at the
    /// default brightness. Purely observational; a duty update that fails
    /// here changes nothing the rest of boot depends on.
    pub fn lamp_test(ch: &mut Channel<'_, LowSpeed>, delay: &mut impl DelayNs) {
        for _ in 0..3 {
            let _ = set_level(ch, u8::MAX);
            delay.delay_ms(LAMP_TEST_STEP_MS);
            let _ = set_level(ch, LAMP_TEST_DIM_LEVEL);
            delay.delay_ms(LAMP_TEST_STEP_MS);
        }
        let _ = set_level(ch, DEFAULT_LEVEL);
    }
}

#[cfg(feature = "esp32s3")]
pub use hw::{lamp_test, set_level};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_scale_endpoints() {
        assert_eq!(level_to_duty_pct(0), 0);
        assert_eq!(level_to_duty_pct(u8::MAX), 100);
    }

    #[test]
    fn default_level_is_eighty_percent() {
        assert_eq!(level_to_duty_pct(DEFAULT_LEVEL), 80);
    }

    #[test]
    fn duty_scale_is_monotonic() {
        let mut last = 0;
        for level in 0..=u8::MAX {
            let pct = level_to_duty_pct(level);
            assert!(pct >= last);
            assert!(pct <= 100);
            last = pct;
        }
    }
}
