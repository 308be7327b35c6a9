//! Charge-transfer acquisition.
//!
//! Each raw sample grounds the sense network, waits out the discharge window and then
//! repeatedly pushes a small packet of charge in through `Down` while `Up` floats, grounding
//! `Up` again to let the comparator look at the sense node. The number of packets needed
//! before the comparator drops is the capacitance proxy.

use core::num::NonZeroU8;

use log::trace;

use crate::discharge::DischargeTimer;
use crate::{
    ChargeDelay, ChargeEdge, CountdownTimer, Idle, SenseNetwork, Terminal, TouchConfig, SATURATED,
};

pub struct Acquirer<'a, S: SenseNetwork, T: CountdownTimer, I: Idle> {
    sense: S,
    timer: DischargeTimer<'a, T, I>,
    delay: ChargeDelay,
    edge: ChargeEdge,
}

impl<'a, S: SenseNetwork, T: CountdownTimer, I: Idle> Acquirer<'a, S, T, I> {
    pub fn new(sense: S, timer: DischargeTimer<'a, T, I>, config: &TouchConfig) -> Self {
        Self {
            sense,
            timer,
            delay: config.charge_delay,
            edge: config.charge_edge,
        }
    }

    /// Take `samples` raw samples and return their truncated mean
    pub fn acquire(&mut self, samples: NonZeroU8) -> u16 {
        let mut sum: u32 = 0;
        for _ in 0..samples.get() {
            sum += self.sample() as u32;
        }
        (sum / samples.get() as u32) as u16
    }

    /// Take a single raw sample.
    ///
    /// Returns [`SATURATED`] if the 16 bit step counter wraps before the comparator trips.
    pub fn sample(&mut self) -> u16 {
        // Both lines to ground, then let the capacitor settle
        self.sense.drive_low(Terminal::Up);
        self.sense.drive_low(Terminal::Down);
        self.timer.discharge();

        let mut steps: u16 = 0;
        let mut kick = self.edge == ChargeEdge::HardFirst;
        loop {
            self.sense.float(Terminal::Up);

            // The first step drives straight to Vcc. Afterwards `Down` is left as an input, so
            // raising it goes through the pull-up before the output takes over.
            if !kick {
                self.sense.pull_up(Terminal::Down);
            }
            self.sense.drive_high(Terminal::Down);
            kick = false;

            self.sense.delay(self.delay.cycles());

            self.sense.pull_up(Terminal::Down);
            self.sense.float(Terminal::Down);
            self.sense.drive_low(Terminal::Up);

            steps = steps.wrapping_add(1);
            if steps == 0 || !self.sense.comparator() {
                break;
            }
        }

        if steps == 0 {
            trace!("comparator never tripped, saturating");
            SATURATED
        } else {
            steps
        }
    }

    pub fn release(self) -> (S, DischargeTimer<'a, T, I>) {
        (self.sense, self.timer)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::discharge::DischargeFlag;
    use crate::sim::{Op, SimIdle, SimNetwork, SimTimer};
    use crate::{nonzero, CALIBRATED_DELAY, DEFAULT_TOUCH_CONFIG};

    fn acquirer<'a>(
        counts: &[u32],
        flag: &'a DischargeFlag,
        config: &TouchConfig,
    ) -> Acquirer<'a, SimNetwork, SimTimer, SimIdle<'a>> {
        let timer = DischargeTimer::new(SimTimer::default(), SimIdle::new(flag), flag);
        Acquirer::new(SimNetwork::new(counts), timer, config)
    }

    #[test]
    fn test_average() {
        let flag = DischargeFlag::new();
        let mut a = acquirer(&[500], &flag, &DEFAULT_TOUCH_CONFIG);
        assert_eq!(a.acquire(nonzero(10)), 500);
    }

    #[test]
    fn test_average_truncates() {
        let flag = DischargeFlag::new();
        let mut a = acquirer(&[50, 50, 50, 50, 55, 50, 50, 50, 50, 50], &flag, &DEFAULT_TOUCH_CONFIG);
        // 505 / 10
        assert_eq!(a.acquire(nonzero(10)), 50);
    }

    #[test]
    fn test_single_step() {
        let flag = DischargeFlag::new();
        let mut a = acquirer(&[1], &flag, &DEFAULT_TOUCH_CONFIG);
        assert_eq!(a.sample(), 1);
    }

    #[test]
    fn test_saturation() {
        let flag = DischargeFlag::new();
        let mut a = acquirer(&[70_000], &flag, &DEFAULT_TOUCH_CONFIG);
        assert_eq!(a.sample(), SATURATED);

        // A wrapped sample must count as the maximum, not zero
        let mut a = acquirer(&[70_000, 1], &flag, &DEFAULT_TOUCH_CONFIG);
        // (65535 + 1) / 2
        assert_eq!(a.acquire(nonzero(2)), 32768);
    }

    #[test]
    fn test_one_discharge_per_sample() {
        let flag = DischargeFlag::new();
        let mut a = acquirer(&[20], &flag, &DEFAULT_TOUCH_CONFIG);
        a.acquire(nonzero(7));

        let (_, timer) = a.release();
        let (timer, idle) = timer.release();
        assert_eq!(timer.restarts, 7);
        assert_eq!(idle.sleeps, 7);
        assert!(!flag.is_pending());
    }

    #[test]
    fn test_pin_sequence_hard_first() {
        use Terminal::*;

        let flag = DischargeFlag::new();
        let mut a = acquirer(&[2], &flag, &DEFAULT_TOUCH_CONFIG);
        assert_eq!(a.sample(), 2);

        let (sense, _) = a.release();
        assert_eq!(
            sense.ops,
            [
                Op::Low(Up),
                Op::Low(Down),
                // First step: hard drive
                Op::Float(Up),
                Op::High(Down),
                Op::Delay(1),
                Op::PullUp(Down),
                Op::Float(Down),
                Op::Low(Up),
                // Second step: through the pull-up
                Op::Float(Up),
                Op::PullUp(Down),
                Op::High(Down),
                Op::Delay(1),
                Op::PullUp(Down),
                Op::Float(Down),
                Op::Low(Up),
            ]
        );
    }

    #[test]
    fn test_pin_sequence_uniform_calibrated() {
        use Terminal::*;

        let config = TouchConfig {
            charge_delay: CALIBRATED_DELAY,
            charge_edge: ChargeEdge::Uniform,
            ..DEFAULT_TOUCH_CONFIG
        };
        let flag = DischargeFlag::new();
        let mut a = acquirer(&[2], &flag, &config);
        assert_eq!(a.sample(), 2);

        let (sense, _) = a.release();
        assert_eq!(
            sense.ops,
            [
                Op::Low(Up),
                Op::Low(Down),
                // Every step re-arms through the pull-up, the first one included
                Op::Float(Up),
                Op::PullUp(Down),
                Op::High(Down),
                Op::Delay(21),
                Op::PullUp(Down),
                Op::Float(Down),
                Op::Low(Up),
                Op::Float(Up),
                Op::PullUp(Down),
                Op::High(Down),
                Op::Delay(21),
                Op::PullUp(Down),
                Op::Float(Down),
                Op::Low(Up),
            ]
        );
    }
}
