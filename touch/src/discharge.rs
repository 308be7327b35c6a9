//! Timed discharge of the sense capacitor.
//!
//! Rather than sensing the discharge, the capacitor is held at ground for a fixed window of
//! about five time constants, measured by a hardware countdown. The countdown's interrupt
//! handler calls [`DischargeFlag::expire`]; the foreground sleeps until it has.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::{CountdownTimer, Idle};

/// Set by the foreground when a discharge window opens, cleared once by the timer interrupt.
///
/// This is the only state shared between the interrupt and the foreground.
pub struct DischargeFlag(AtomicBool);

impl DischargeFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark a discharge window as open
    pub fn arm(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Close the window. Call from the timer interrupt.
    pub fn expire(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for DischargeFlag {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DischargeTimer<'a, T: CountdownTimer, I: Idle> {
    timer: T,
    idle: I,
    flag: &'a DischargeFlag,
}

impl<'a, T: CountdownTimer, I: Idle> DischargeTimer<'a, T, I> {
    pub fn new(timer: T, idle: I, flag: &'a DischargeFlag) -> Self {
        Self { timer, idle, flag }
    }

    /// Open a discharge window
    pub fn start(&mut self) {
        // Arm before the counter runs so an early expiry can't be lost
        self.flag.arm();
        self.timer.restart();
    }

    /// Sleep until the window has expired, then stop the countdown.
    ///
    /// Returns immediately if the window has already closed.
    pub fn wait(&mut self) {
        let flag = self.flag;
        self.idle.sleep_while(|| flag.is_pending());
        self.timer.stop();
    }

    /// Open a discharge window and wait for it to expire
    pub fn discharge(&mut self) {
        self.start();
        self.wait();
    }

    pub fn release(self) -> (T, I) {
        (self.timer, self.idle)
    }
}
