// ST77916 power-on initialization table for the 360x360 round-corner panel.
//
// The 0xF0/0xF1/0xF2 writes switch the controller's internal register banks,
// so entry order is load-bearing: a register write lands in whichever bank is
// currently selected. The table must be replayed from the top, in order,
// byte for byte. Delays are minimum settle times; the controller exposes no
// status readback on this interface.

use crate::st77916::commands;

/// One table entry: command byte, parameter bytes, post-command settle.
pub struct InitCommand {
    pub cmd: u8,
    pub params: &'static [u8],
    pub delay_ms: u32,
}

const fn entry(cmd: u8, params: &'static [u8], delay_ms: u32) -> InitCommand {
    InitCommand {
        cmd,
        params,
        delay_ms,
    }
}

pub const INIT_SEQUENCE: &[InitCommand] = &[
    // Soft reset, then let the controller reload its defaults.
    entry(commands::SWRESET, &[], 120),
    // Unlock the vendor command set.
    entry(0xF0, &[0x28], 0),
    entry(0xF2, &[0x28], 0),
    entry(0x73, &[0xF0], 0),
    entry(0x7C, &[0xD1], 0),
    entry(0x83, &[0xE0], 0),
    entry(0x84, &[0x61], 0),
    entry(0xF2, &[0x82], 0),
    entry(0xF0, &[0x00], 0),
    // Bank 1: supply, VCOM and source/gate timing.
    entry(0xF0, &[0x01], 0),
    entry(0xF1, &[0x01], 0),
    entry(0xB0, &[0x56], 0),
    entry(0xB1, &[0x4D], 0),
    entry(0xB2, &[0x24], 0),
    entry(0xB4, &[0x87], 0),
    entry(0xB5, &[0x44], 0),
    entry(0xB6, &[0x8B], 0),
    entry(0xB7, &[0x40], 0),
    entry(0xB8, &[0x86], 0),
    entry(0xBA, &[0x00], 0),
    entry(0xBB, &[0x08], 0),
    entry(0xBC, &[0x08], 0),
    entry(0xBD, &[0x00], 0),
    entry(0xC0, &[0x80], 0),
    entry(0xC1, &[0x10], 0),
    entry(0xC2, &[0x37], 0),
    entry(0xC3, &[0x80], 0),
    entry(0xC4, &[0x10], 0),
    entry(0xC5, &[0x37], 0),
    entry(0xC6, &[0xA9], 0),
    entry(0xC7, &[0x41], 0),
    entry(0xC8, &[0x01], 0),
    entry(0xC9, &[0xA9], 0),
    entry(0xCA, &[0x41], 0),
    entry(0xCB, &[0x01], 0),
    entry(0xD0, &[0x91], 0),
    entry(0xD1, &[0x68], 0),
    entry(0xD2, &[0x68], 0),
    entry(0xF5, &[0x00, 0xA5], 0),
    entry(0xDD, &[0x4F], 0),
    entry(0xDE, &[0x4F], 0),
    entry(0xF1, &[0x10], 0),
    entry(0xF0, &[0x00], 0),
    // Bank 2: gamma correction curves.
    entry(0xF0, &[0x02], 0),
    entry(
        0xE0,
        &[
            0xF0, 0x0A, 0x10, 0x09, 0x09, 0x36, 0x35, 0x33, 0x4A, 0x29, 0x15, 0x15, 0x2E, 0x34,
        ],
        0,
    ),
    entry(
        0xE1,
        &[
            0xF0, 0x0A, 0x0F, 0x08, 0x08, 0x05, 0x34, 0x33, 0x4A, 0x39, 0x15, 0x15, 0x2D, 0x33,
        ],
        0,
    ),
    // Back to the user command page before any DCS traffic.
    entry(0xF0, &[0x00], 0),
    // Display mode: top-left origin, 16bpp, inversion on, tear line out.
    entry(commands::MADCTL, &[0x00], 0),
    entry(commands::COLMOD, &[0x05], 0),
    entry(commands::INVON, &[], 0),
    entry(commands::TEON, &[0x00], 0),
    // Wake the panel, then switch the output stage on.
    entry(commands::SLPOUT, &[], 120),
    entry(commands::DISPON, &[], 10),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_starts_with_soft_reset_and_settle() {
        let first = &INIT_SEQUENCE[0];
        assert_eq!(first.cmd, commands::SWRESET);
        assert!(first.params.is_empty());
        assert!(first.delay_ms >= 120);
    }

    #[test]
    fn table_ends_with_sleep_out_then_display_on() {
        let n = INIT_SEQUENCE.len();
        let slpout = &INIT_SEQUENCE[n - 2];
        let dispon = &INIT_SEQUENCE[n - 1];

        assert_eq!(slpout.cmd, commands::SLPOUT);
        assert!(slpout.delay_ms >= 120, "sleep-out settle is a 120 ms minimum");
        assert_eq!(dispon.cmd, commands::DISPON);
        assert!(dispon.delay_ms >= 10, "display-on settle is a 10 ms minimum");
    }

    #[test]
    fn table_leaves_controller_on_user_page() {
        // The last bank-select write must land back on page 0, otherwise the
        // DCS tail of the table would hit a vendor bank.
        let last_page_select = INIT_SEQUENCE
            .iter()
            .filter(|e| e.cmd == 0xF0)
            .next_back()
            .expect("table switches banks at least once");
        assert_eq!(last_page_select.params, &[0x00]);
    }

    #[test]
    fn pixel_format_is_rgb565() {
        let colmod = INIT_SEQUENCE
            .iter()
            .find(|e| e.cmd == commands::COLMOD)
            .expect("table sets the pixel format");
        assert_eq!(colmod.params, &[0x05]);
    }

    #[test]
    fn gamma_curves_live_in_bank_two() {
        let gamma_pos = INIT_SEQUENCE
            .iter()
            .position(|e| e.cmd == 0xE0)
            .expect("table programs a positive gamma curve");
        let bank_select = INIT_SEQUENCE[..gamma_pos]
            .iter()
            .filter(|e| e.cmd == 0xF0)
            .next_back()
            .expect("a bank select precedes the gamma burst");
        assert_eq!(bank_select.params, &[0x02]);
    }
}
