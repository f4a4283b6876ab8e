//! LCD bring-up test
//! ========================================
//! needs to be run in WSL2 terminal
//! source ~/export-esp.sh
//! ========================================
//!
//! Boot order: expander releases the panel rails, backlight PWM comes up and
//! blinks once as a visual check, then the panel init sequence runs and the
//! demo loop cycles solid colors every few seconds.

//% CHIPS: esp32s3
//% FEATURES: esp-hal/unstable

#![no_std]
#![no_main]

// Define the application description, which is placed in a special section of
// the binary. This is used by the bootloader to verify the application.
// The macro automatically fills in the fields.
esp_bootloader_esp_idf::esp_app_desc!();

// Module imports
use esp32s3_lcd146::{
    backlight,
    demo::ColorCycle,
    display::setup_display,
    tca9554::{Tca9554, DEFAULT_ADDRESS},
    wiring::init_board_pins,
};

use esp_backtrace as _;

// ESP-HAL imports
use esp_hal::{
    delay::Delay,
    i2c::master::{Config as I2cConfig, I2c},
    ledc::{channel, channel::ChannelIFace, timer, timer::TimerIFace, LSGlobalClkSource, Ledc, LowSpeed},
    main,
    time::Rate,
    timer::systimer::{SystemTimer, Unit},
    Config,
};

// Embedded HAL trait for delay
use embedded_hal::delay::DelayNs;

// Println macro
use esp_println::println;

// Give the panel rails time to stabilise after the expander releases them.
const POWER_SETTLE_MS: u32 = 100;
// Demo loop polling pace.
const LOOP_PACE_MS: u32 = 100;

fn now_ms() -> u64 {
    let t = SystemTimer::unit_value(Unit::Unit0);
    t.saturating_mul(1000) / SystemTimer::ticks_per_second()
}

#[main]
fn main() -> ! {
    // Initialize peripherals
    let peripherals = esp_hal::init(Config::default());
    let pins = init_board_pins(peripherals);
    let mut delay = Delay::new();

    println!("=== ESP32-S3 LCD test ===");

    // -------------------- Expander --------------------
    // First device on the bus: its outputs gate the panel power and reset
    // lines. A failure here is logged and boot continues degraded, since
    // boards with pull-ups on the reset line come up anyway.
    let i2c_cfg = I2cConfig::default().with_frequency(Rate::from_khz(400));
    match I2c::new(pins.expander.i2c0, i2c_cfg) {
        Ok(i2c) => {
            let i2c = i2c.with_sda(pins.expander.sda).with_scl(pins.expander.scl);
            let mut exio = Tca9554::new(i2c, DEFAULT_ADDRESS);
            match exio.init_outputs_high() {
                Ok(()) => println!("EXIO OK"),
                Err(e) => println!("EXIO init failed: {:?}, continuing without expander", e),
            }
        }
        Err(e) => println!("I2C init failed: {:?}, continuing without expander", e),
    }
    delay.delay_ms(POWER_SETTLE_MS);

    // -------------------- Backlight --------------------
    let mut ledc = Ledc::new(pins.ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let mut bl_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    let timer_result = bl_timer.configure(timer::config::Config {
        duty: timer::config::Duty::Duty8Bit,
        clock_source: timer::LSClockSource::APBClk,
        frequency: Rate::from_hz(backlight::PWM_FREQ_HZ),
    });

    let mut bl_channel = match timer_result {
        Ok(()) => {
            let mut ch = ledc.channel::<LowSpeed>(channel::Number::Channel0, pins.lcd_bl);
            match ch.configure(channel::config::Config {
                timer: &bl_timer,
                duty_pct: backlight::level_to_duty_pct(backlight::DEFAULT_LEVEL),
                pin_config: channel::config::PinConfig::PushPull,
            }) {
                Ok(()) => {
                    println!("Backlight OK");
                    Some(ch)
                }
                Err(e) => {
                    println!("Backlight channel config failed: {:?}", e);
                    None
                }
            }
        }
        Err(e) => {
            println!("Backlight timer config failed: {:?}", e);
            None
        }
    };

    if let Some(ch) = bl_channel.as_mut() {
        backlight::lamp_test(ch, &mut delay);
        println!("Blink OK");
    }

    // -------------------- Panel --------------------
    // On failure the handle stays unset and every fill below short-circuits
    // with a log line instead of pushing bytes at a half-configured bus.
    println!("Init LCD...");
    let mut panel = match setup_display(pins.display, &mut delay) {
        Ok(lcd) => {
            println!("LCD OK");
            Some(lcd)
        }
        Err(e) => {
            println!("LCD init failed: {:?}", e);
            None
        }
    };

    // -------------------- Demo loop --------------------
    // Only touches fill_screen and the millisecond clock.
    let mut cycle = ColorCycle::new();
    loop {
        if let Some((color, name)) = cycle.tick(now_ms()) {
            match panel.as_mut() {
                Some(lcd) => match lcd.fill_screen(color) {
                    Ok(()) => println!("{}", name),
                    Err(e) => println!("fill failed: {:?}", e),
                },
                None => println!("panel not ready, skipping {}", name),
            }
        }
        delay.delay_ms(LOOP_PACE_MS);
    }
}
