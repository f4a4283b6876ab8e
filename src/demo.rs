// Color-cycle demo state.
//
// The demo loop in the binary owns nothing but this state machine, a
// fill_screen call and a millisecond clock, which keeps it testable off
// target with a simulated clock.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

/// Hold time per color.
pub const CYCLE_PERIOD_MS: u64 = 3_000;

/// Demo palette with log names, cycled in order.
pub const PALETTE: [(Rgb565, &str); 4] = [
    (Rgb565::GREEN, "Green"),
    (Rgb565::BLUE, "Blue"),
    (Rgb565::WHITE, "White"),
    (Rgb565::RED, "Red"),
];

pub struct ColorCycle {
    idx: usize,
    last_ms: Option<u64>,
}

impl ColorCycle {
    pub fn new() -> Self {
        Self {
            idx: 0,
            last_ms: None,
        }
    }

    /// Advance the cycle. Returns the color to paint when one is due: the
    /// first call fires immediately with the first palette entry, after that
    /// one entry every [`CYCLE_PERIOD_MS`].
    pub fn tick(&mut self, now_ms: u64) -> Option<(Rgb565, &'static str)> {
        match self.last_ms {
            None => {
                self.last_ms = Some(now_ms);
                Some(PALETTE[self.idx])
            }
            Some(last) if now_ms.saturating_sub(last) >= CYCLE_PERIOD_MS => {
                self.idx = (self.idx + 1) % PALETTE.len();
                self.last_ms = Some(now_ms);
                Some(PALETTE[self.idx])
            }
            Some(_) => None,
        }
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embedded_graphics::prelude::IntoStorage;

    #[test]
    fn first_tick_fires_immediately_with_green() {
        let mut cycle = ColorCycle::new();
        let (color, name) = cycle.tick(0).unwrap();
        assert_eq!(color.into_storage(), 0x07E0);
        assert_eq!(name, "Green");
    }

    #[test]
    fn nothing_fires_before_the_period_elapses() {
        let mut cycle = ColorCycle::new();
        cycle.tick(0).unwrap();
        assert!(cycle.tick(100).is_none());
        assert!(cycle.tick(2_999).is_none());
    }

    #[test]
    fn palette_cycles_in_order_every_period() {
        let mut cycle = ColorCycle::new();

        let mut seen = vec![cycle.tick(0).unwrap().0.into_storage()];
        for t in (3_000..=12_000).step_by(3_000) {
            seen.push(cycle.tick(t).unwrap().0.into_storage());
        }

        // Green, blue, white, red, then wrapping back to green.
        assert_eq!(seen, vec![0x07E0, 0x001F, 0xFFFF, 0xF800, 0x07E0]);
    }

    #[test]
    fn late_polls_only_advance_one_step() {
        let mut cycle = ColorCycle::new();
        cycle.tick(0).unwrap();

        // A poll arriving long after the deadline still moves one entry.
        let (color, _) = cycle.tick(10_000).unwrap();
        assert_eq!(color.into_storage(), 0x001F);
        assert!(cycle.tick(10_100).is_none());
    }
}
