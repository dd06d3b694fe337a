#![cfg_attr(not(test), no_std)]

//! Bit-banged infrared remote-control transmitter.
//!
//! [`Remote`] owns a microsecond delay and the output pin driving the IR LED,
//! and sends frames for one [`Profile`](protocol::Profile). Carrier and bit
//! timings come from busy-waiting on the delay, so a transmission must not be
//! interrupted.

pub mod carrier;
pub mod encoder;
pub mod keymap;
pub mod protocol;

#[cfg(test)]
mod mock;

pub use keymap::{Button, Command};
pub use protocol::{Profile, NEC, SONY_SIRC12, SONY_SIRC15};

#[derive(Debug)]
pub struct Remote<DELAY, PIN> {
    pub delay: DELAY,
    pub pin: PIN,
    pub profile: Profile,
}

impl<DELAY, PIN> Remote<DELAY, PIN> {
    pub fn new(delay: DELAY, pin: PIN, profile: Profile) -> Self {
        Self {
            delay,
            pin,
            profile,
        }
    }

    pub fn new_default(delay: DELAY, pin: PIN) -> Self {
        Self::new(delay, pin, NEC)
    }

    pub fn release(self) -> (DELAY, PIN) {
        (self.delay, self.pin)
    }
}
