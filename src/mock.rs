//! Host-side stand-in for the IR LED pin and the delay, sharing one virtual
//! clock so every edge gets a timestamp.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::{blocking::delay::DelayUs, digital::v2::OutputPin};

use crate::carrier::Carrier;
use crate::protocol::Profile;
use crate::Remote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub at_us: u64,
    pub high: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    /// Burst of carrier pulses.
    Mark(u32),
    /// Silence between bursts, not counting the low half of the last pulse.
    Space(u64),
}

#[derive(Debug, Default)]
pub struct Line {
    pub now_us: u64,
    pub edges: Vec<Edge>,
}

impl Line {
    pub fn reset(&mut self) {
        self.now_us = 0;
        self.edges.clear();
    }

    pub fn level(&self) -> Option<bool> {
        self.edges.last().map(|edge| edge.high)
    }

    pub fn rising_edges(&self) -> Vec<u64> {
        self.edges
            .iter()
            .filter(|edge| edge.high)
            .map(|edge| edge.at_us)
            .collect()
    }

    /// Groups pulses into marks: a pulse whose low time is longer than the
    /// carrier's closes the mark and starts a space.
    pub fn intervals(&self, carrier: &Carrier) -> Vec<Interval> {
        let low_us = carrier.low_us as u64;
        let rising = self.rising_edges();
        let falling: Vec<u64> = self
            .edges
            .iter()
            .filter(|edge| !edge.high)
            .map(|edge| edge.at_us)
            .collect();
        assert_eq!(rising.len(), falling.len(), "line left high");

        let mut intervals = Vec::new();
        let mut pulses = 0;
        for (i, fall) in falling.iter().enumerate() {
            pulses += 1;
            let next = rising.get(i + 1).copied().unwrap_or(self.now_us);
            let gap = next - fall;
            if gap > low_us {
                intervals.push(Interval::Mark(pulses));
                intervals.push(Interval::Space(gap - low_us));
                pulses = 0;
            } else if i + 1 == falling.len() {
                intervals.push(Interval::Mark(pulses));
            }
        }
        intervals
    }
}

pub type SharedLine = Rc<RefCell<Line>>;

pub struct MockPin(SharedLine);

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut line = self.0.borrow_mut();
        let at_us = line.now_us;
        line.edges.push(Edge { at_us, high: false });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut line = self.0.borrow_mut();
        let at_us = line.now_us;
        line.edges.push(Edge { at_us, high: true });
        Ok(())
    }
}

pub struct MockDelay(SharedLine);

impl DelayUs<u32> for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().now_us += us as u64;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

/// Pin whose `fail_at`-th call (counting from zero, high and low alike)
/// fails without touching the line. Every other call succeeds.
pub struct FlakyPin {
    line: SharedLine,
    calls: usize,
    fail_at: usize,
}

impl FlakyPin {
    fn drive(&mut self, high: bool) -> Result<(), PinFault> {
        let call = self.calls;
        self.calls += 1;
        if call == self.fail_at {
            return Err(PinFault);
        }
        let mut line = self.line.borrow_mut();
        let at_us = line.now_us;
        line.edges.push(Edge { at_us, high });
        Ok(())
    }
}

impl OutputPin for FlakyPin {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

pub fn line() -> (MockPin, MockDelay, SharedLine) {
    let line = SharedLine::default();
    (MockPin(line.clone()), MockDelay(line.clone()), line)
}

pub fn remote(profile: Profile) -> (Remote<MockDelay, MockPin>, SharedLine) {
    let (pin, delay, line) = line();
    (Remote::new(delay, pin, profile), line)
}

pub fn flaky_line(fail_at: usize) -> (FlakyPin, MockDelay, SharedLine) {
    let line = SharedLine::default();
    let pin = FlakyPin {
        line: line.clone(),
        calls: 0,
        fail_at,
    };
    (pin, MockDelay(line.clone()), line)
}

pub fn flaky_remote(
    profile: Profile,
    fail_at: usize,
) -> (Remote<MockDelay, FlakyPin>, SharedLine) {
    let (pin, delay, line) = flaky_line(fail_at);
    (Remote::new(delay, pin, profile), line)
}

#[test]
fn intervals_split_on_long_low_time() {
    let carrier = crate::carrier::CARRIER_40KHZ;
    let (mut pin, mut delay, line) = line();
    crate::carrier::generate_carrier(&mut pin, &mut delay, &carrier, 3).unwrap();
    delay.delay_us(600);
    crate::carrier::generate_carrier(&mut pin, &mut delay, &carrier, 2).unwrap();

    assert_eq!(
        line.borrow().intervals(&carrier),
        [Interval::Mark(3), Interval::Space(600), Interval::Mark(2)]
    );
}
