//! Simulated hardware for host tests

use crate::discharge::DischargeFlag;
use crate::{CountdownTimer, Idle, SenseNetwork, Terminal};

/// Cap on recorded pin operations; a saturating sample makes hundreds of thousands
const MAX_OPS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Low(Terminal),
    High(Terminal),
    Float(Terminal),
    PullUp(Terminal),
    Delay(u32),
}

/// A sense network whose comparator trips after a scripted number of charge steps.
///
/// Each sub-sample starts when `Down` is grounded; the comparator then reads high for
/// `counts[n] - 1` polls and low on the next one. Counts cycle when exhausted.
pub struct SimNetwork {
    counts: Vec<u32>,
    sample: Option<usize>,
    polls: u32,
    pub ops: Vec<Op>,
}

impl SimNetwork {
    pub fn new(counts: &[u32]) -> Self {
        assert!(!counts.is_empty());
        Self {
            counts: counts.to_vec(),
            sample: None,
            polls: 0,
            ops: Vec::new(),
        }
    }

    /// Replace the script, taking effect at the next sub-sample
    pub fn script(&mut self, counts: &[u32]) {
        assert!(!counts.is_empty());
        self.counts = counts.to_vec();
        self.sample = None;
    }

    fn record(&mut self, op: Op) {
        if self.ops.len() < MAX_OPS {
            self.ops.push(op);
        }
    }
}

impl SenseNetwork for SimNetwork {
    fn drive_low(&mut self, terminal: Terminal) {
        if terminal == Terminal::Down {
            self.sample = Some(self.sample.map_or(0, |n| n + 1));
            self.polls = 0;
        }
        self.record(Op::Low(terminal));
    }

    fn drive_high(&mut self, terminal: Terminal) {
        self.record(Op::High(terminal));
    }

    fn float(&mut self, terminal: Terminal) {
        self.record(Op::Float(terminal));
    }

    fn pull_up(&mut self, terminal: Terminal) {
        self.record(Op::PullUp(terminal));
    }

    fn comparator(&mut self) -> bool {
        let n = self.sample.unwrap_or(0);
        let target = self.counts[n % self.counts.len()];
        self.polls += 1;
        self.polls < target
    }

    fn delay(&mut self, cycles: u32) {
        self.record(Op::Delay(cycles));
    }
}

#[derive(Default)]
pub struct SimTimer {
    pub running: bool,
    pub restarts: u32,
}

impl CountdownTimer for SimTimer {
    fn restart(&mut self) {
        self.running = true;
        self.restarts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

/// Every sleep is woken by the discharge timer's interrupt
pub struct SimIdle<'a> {
    flag: &'a DischargeFlag,
    pub sleeps: u32,
}

impl<'a> SimIdle<'a> {
    pub fn new(flag: &'a DischargeFlag) -> Self {
        Self { flag, sleeps: 0 }
    }
}

impl<'a> Idle for SimIdle<'a> {
    fn sleep_while<F: FnMut() -> bool>(&mut self, mut cond: F) {
        while cond() {
            self.sleeps += 1;
            self.flag.expire();
        }
    }
}
