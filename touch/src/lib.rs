#![cfg_attr(not(test), no_std)]

use core::num::NonZeroU8;

pub mod acquire;
pub mod detector;
pub mod discharge;
pub mod history;
pub mod report;
pub mod sensor;

#[cfg(test)]
pub mod sim;

/// Enumeration of touch activity states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchState {
    /// The reading is within `threshold` of the window maximum
    Idle,
    /// The reading has dropped below the threshold and is being held there
    InPeak,
}

/// The two lines of the sense network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    /// Floats while charge is pushed in, grounded while measuring
    Up,
    /// Kicked to the high reference to push charge into the sense capacitor
    Down,
}

/// Busy-wait inserted between charging and measuring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeDelay {
    /// A single cycle
    Minimal,
    /// A precisely counted busy-wait of the given number of core cycles
    Calibrated(u32),
}

impl ChargeDelay {
    pub const fn cycles(&self) -> u32 {
        match self {
            Self::Minimal => 1,
            Self::Calibrated(cycles) => *cycles,
        }
    }
}

/// How the `Down` line is brought to the high reference on each charge step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeEdge {
    /// Drive hard on the first step of a sub-sample, re-arm through the pull-up afterwards
    HardFirst,
    /// Re-arm through the pull-up on every step
    Uniform,
}

/// The calibrated busy-wait: 7 loop iterations at 3 cycles each
pub const CALIBRATED_DELAY: ChargeDelay = ChargeDelay::Calibrated(21);

/// Configuration structure for the sensor
#[derive(Clone, Copy, Debug)]
pub struct TouchConfig {
    /// Number of raw samples averaged into one reading
    pub samples: NonZeroU8,
    /// A reading below `max * threshold` of the history window counts as a touch
    pub threshold: f32,
    /// Delay between charging and measuring
    pub charge_delay: ChargeDelay,
    pub charge_edge: ChargeEdge,
    /// Timer clock divider used for the discharge window
    pub timer_prescale: u16,
    /// Length of the discharge window in prescaled timer ticks. The default gives
    /// 64 * 34 = 2176 cycles, about 5 tau of the sense network.
    pub discharge_ticks: u16,
}

impl TouchConfig {
    const fn default() -> Self {
        Self {
            samples: nonzero(10),
            threshold: 0.98,
            charge_delay: ChargeDelay::Minimal,
            charge_edge: ChargeEdge::HardFirst,
            timer_prescale: 64,
            discharge_ticks: 34,
        }
    }
}

/// Build a `NonZeroU8` in a const context
pub const fn nonzero(n: u8) -> NonZeroU8 {
    match NonZeroU8::new(n) {
        Some(n) => n,
        None => panic!("sample count must be non-zero"),
    }
}

pub const DEFAULT_TOUCH_CONFIG: TouchConfig = TouchConfig::default();
/// Number of readings in the rolling history window
pub const HISTORY_LEN: usize = 10;
/// Raw sample value for a measurement whose counter wrapped
pub const SATURATED: u16 = 0xFFFF;

/// Access to the two sense-network lines and the comparator watching the sense node
pub trait SenseNetwork {
    /// Output, driven to the low reference
    fn drive_low(&mut self, terminal: Terminal);
    /// Output, driven to the high reference
    fn drive_high(&mut self, terminal: Terminal);
    /// Input with no pull
    fn float(&mut self, terminal: Terminal);
    /// Input with the pull-up enabled
    fn pull_up(&mut self, terminal: Terminal);
    /// Returns true while the sense node is above the comparator reference
    fn comparator(&mut self) -> bool;
    /// Busy-wait for roughly `cycles` core cycles
    fn delay(&mut self, cycles: u32);
}

/// A hardware countdown with an expiry interrupt
pub trait CountdownTimer {
    /// Reset the counter to zero and start counting, arming the expiry interrupt
    fn restart(&mut self);
    /// Stop counting
    fn stop(&mut self);
}

/// Low power wait for hardware events
pub trait Idle {
    /// Suspend until `cond` returns false.
    ///
    /// `cond` is evaluated with interrupts masked. While it holds, interrupts are unmasked and
    /// the core sleeps in one atomic step, so an interrupt landing between the check and the
    /// sleep still wakes it. There is no timeout: if the event never comes, this never returns.
    fn sleep_while<F: FnMut() -> bool>(&mut self, cond: F);
}
