use embedded_hal::{blocking::delay::DelayUs, digital::v2::OutputPin};

/// On and off time of one carrier pulse, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carrier {
    pub high_us: u32,
    pub low_us: u32,
}

pub const CARRIER_38KHZ: Carrier = Carrier::from_frequency(38_000);
pub const CARRIER_40KHZ: Carrier = Carrier::from_frequency(40_000);

impl Carrier {
    pub const fn new(high_us: u32, low_us: u32) -> Self {
        Self { high_us, low_us }
    }

    /// Splits the period closest to `1 / hz` into a high half and a low half,
    /// the high half taking the odd microsecond. A zero frequency gives a
    /// carrier with no period.
    pub const fn from_frequency(hz: u32) -> Self {
        let period = match (1_000_000 + hz / 2).checked_div(hz) {
            Some(period) => period,
            None => 0,
        };
        let high_us = (period + 1) / 2;
        Self::new(high_us, period - high_us)
    }

    pub const fn period_us(&self) -> u32 {
        self.high_us + self.low_us
    }

    /// `None` for a carrier with no period.
    pub const fn frequency_hz(&self) -> Option<u32> {
        1_000_000u32.checked_div(self.period_us())
    }

    /// Number of pulses whose length is closest to `duration_us`. A carrier
    /// with no period fits no pulses.
    pub const fn pulses_for(&self, duration_us: u32) -> u32 {
        let period = self.period_us();
        match (duration_us + period / 2).checked_div(period) {
            Some(pulses) => pulses,
            None => 0,
        }
    }
}

fn pulse<DELAY, PIN>(
    pin: &mut PIN,
    delay: &mut DELAY,
    carrier: &Carrier,
) -> Result<(), PIN::Error>
where
    DELAY: DelayUs<u32>,
    PIN: OutputPin,
{
    pin.set_high()?;
    delay.delay_us(carrier.high_us);
    pin.set_low()?;
    delay.delay_us(carrier.low_us);
    Ok(())
}

/// Toggles `pin` high then low `pulses` times. The line is left low.
///
/// Busy-waits for the whole burst: an interrupt taken in the middle of it
/// stretches the pulse it lands in.
///
/// The first pin error ends the burst. One more `set_low` is attempted so the
/// LED is not left on, then the original error is returned.
pub fn generate_carrier<DELAY, PIN>(
    pin: &mut PIN,
    delay: &mut DELAY,
    carrier: &Carrier,
    pulses: u32,
) -> Result<(), PIN::Error>
where
    DELAY: DelayUs<u32>,
    PIN: OutputPin,
{
    for _ in 0..pulses {
        if let Err(err) = pulse(pin, delay, carrier) {
            pin.set_low().ok();
            return Err(err);
        }
    }
    Ok(())
}
