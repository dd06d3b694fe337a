#![no_main]
#![no_std]

// TV remote on a blue pill: IR LED on PA8, active-low buttons on PB12..PB15.
//
//   cargo build --release --example tv_remote --features firmware --target thumbv7m-none-eabi
//   (add `sony` to the features for SIRC instead of NEC)

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};

use cortex_m_rt::entry;
use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::InputPin;
use stm32f1xx_hal::{delay::Delay, pac, prelude::*};

use ir_remote::keymap::{first_pressed, Action, Button, Keymap, Trigger};
use ir_remote::{Profile, Remote};

#[cfg(not(feature = "sony"))]
const PROFILE: Profile = ir_remote::NEC;
#[cfg(not(feature = "sony"))]
const KEYMAP: Keymap = ir_remote::keymap::NEC_KEYMAP;

#[cfg(feature = "sony")]
const PROFILE: Profile = ir_remote::SONY_SIRC12;
#[cfg(feature = "sony")]
const KEYMAP: Keymap = ir_remote::keymap::SONY_KEYMAP;

// minimum wait between polls, doubles as the debounce
const POLL_MS: u32 = 20;

#[entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();
    let mut rcc = dp.RCC.constrain();
    let mut flash = dp.FLASH.constrain();
    let mut gpioa = dp.GPIOA.split(&mut rcc.apb2);
    let mut gpiob = dp.GPIOB.split(&mut rcc.apb2);

    let ir_led = gpioa.pa8.into_push_pull_output(&mut gpioa.crh);
    let sw_power = gpiob.pb12.into_pull_up_input(&mut gpiob.crh);
    let sw_volume_up = gpiob.pb13.into_pull_up_input(&mut gpiob.crh);
    let sw_volume_down = gpiob.pb14.into_pull_up_input(&mut gpiob.crh);
    let sw_bootloader = gpiob.pb15.into_pull_up_input(&mut gpiob.crh);

    let clocks = rcc
        .cfgr
        .use_hse(8.mhz())
        .pclk1(36.mhz())
        .sysclk(72.mhz())
        .freeze(&mut flash.acr);
    let delay = Delay::new(cp.SYST, clocks);

    let mut remote = Remote::new(delay, ir_led, PROFILE);
    let mut trigger = Trigger::new();
    rprintln!("{:?}", remote.profile);

    loop {
        let pressed = first_pressed(|button| {
            let pin_low = match button {
                Button::Power => sw_power.is_low(),
                Button::VolumeUp => sw_volume_up.is_low(),
                Button::VolumeDown => sw_volume_down.is_low(),
            };
            pin_low.unwrap_or(false)
        });

        let mut wait_us = POLL_MS * 1_000;
        if let Some(action) = trigger.update(pressed) {
            let (button, repeat) = match action {
                Action::Send(button) => (button, false),
                Action::Repeat(button) => (button, true),
            };
            let command = KEYMAP.command(button);
            if !repeat {
                rprintln!("{:?}: {:?}", button, command);
            }

            cortex_m::interrupt::free(|_| {
                if repeat {
                    remote.send_repeat(command)
                } else {
                    remote.send(command)
                }
            })
            .ok();

            // hold the protocol's frame period while the button stays down
            let idle_us = if repeat {
                PROFILE.idle_after_repeat_us(command.address, command.command)
            } else {
                PROFILE.idle_after_frame_us(command.address, command.command)
            };
            wait_us = wait_us.max(idle_us);
        }

        remote.delay.delay_us(wait_us);

        if sw_bootloader.is_low().unwrap_or(false) {
            rprintln!("reset");
            cortex_m::peripheral::SCB::sys_reset();
        }
    }
}
