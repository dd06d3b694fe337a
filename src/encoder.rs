use embedded_hal::{blocking::delay::DelayUs, digital::v2::OutputPin};

use crate::carrier::generate_carrier;
use crate::keymap::Command;
use crate::protocol::{clamp_width, Encoding, MarkSpace, PulseCount};

/// Bits of a field, least significant first.
///
/// Each step reads bit 0 of a working copy and shifts the copy right by one.
#[derive(Debug, Clone)]
pub struct LsbFirst {
    value: u8,
    remaining: u8,
}

pub fn lsb_first(value: u8, bits: u8) -> LsbFirst {
    LsbFirst {
        value,
        remaining: clamp_width(bits),
    }
}

impl Iterator for LsbFirst {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        let bit = self.value & 1 != 0;
        self.value >>= 1;
        self.remaining -= 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for LsbFirst {}

impl<DELAY: DelayUs<u32>, PIN: OutputPin> crate::Remote<DELAY, PIN> {
    /// Sends one frame carrying `address` and `command` with the remote's
    /// profile. Values wider than the profile's fields are truncated.
    ///
    /// Blocks until the last bit is on air. Interrupts should be masked by
    /// the caller for the duration.
    pub fn transmit(&mut self, address: u8, command: u8) -> Result<(), PIN::Error> {
        match self.profile.encoding {
            Encoding::PulseCount(timing) => self.send_pulse_count(&timing, address, command),
            Encoding::MarkSpace(timing) => self.send_mark_space(&timing, address, command),
        }
    }

    pub fn send(&mut self, command: Command) -> Result<(), PIN::Error> {
        self.transmit(command.address, command.command)
    }

    /// Sent while a button stays held after its first frame. Mark/space
    /// protocols have a dedicated short sequence; pulse-count receivers
    /// expect the whole frame again.
    pub fn transmit_repeat(&mut self, address: u8, command: u8) -> Result<(), PIN::Error> {
        match self.profile.encoding {
            Encoding::PulseCount(timing) => self.send_pulse_count(&timing, address, command),
            Encoding::MarkSpace(timing) => {
                self.mark(timing.start_mark_pulses)?;
                self.space(timing.repeat_space_us);
                self.mark(timing.bit_mark_pulses)
            }
        }
    }

    pub fn send_repeat(&mut self, command: Command) -> Result<(), PIN::Error> {
        self.transmit_repeat(command.address, command.command)
    }

    fn mark(&mut self, pulses: u32) -> Result<(), PIN::Error> {
        generate_carrier(&mut self.pin, &mut self.delay, &self.profile.carrier, pulses)
    }

    fn space(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn send_pulse_count(
        &mut self,
        timing: &PulseCount,
        address: u8,
        command: u8,
    ) -> Result<(), PIN::Error> {
        self.mark(timing.start_pulses)?;
        self.space(timing.bit_delay_us);

        let bits = lsb_first(command, timing.command_bits)
            .chain(lsb_first(address, timing.address_bits));
        for bit in bits {
            self.mark(if bit { timing.one_pulses } else { timing.zero_pulses })?;
            self.space(timing.bit_delay_us);
        }
        Ok(())
    }

    fn send_mark_space(
        &mut self,
        timing: &MarkSpace,
        address: u8,
        command: u8,
    ) -> Result<(), PIN::Error> {
        self.mark(timing.start_mark_pulses)?;
        self.space(timing.start_space_us);

        for field in [address, !address, command, !command] {
            for bit in lsb_first(field, timing.field_bits) {
                self.mark(timing.bit_mark_pulses)?;
                self.space(if bit {
                    timing.one_space_us
                } else {
                    timing.zero_space_us
                });
            }
        }

        if timing.stop_mark {
            self.mark(timing.bit_mark_pulses)?;
        }
        Ok(())
    }
}
