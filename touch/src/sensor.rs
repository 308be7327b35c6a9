use crate::acquire::Acquirer;
use crate::detector::{Cycle, Detector};
use crate::{CountdownTimer, Idle, SenseNetwork, TouchConfig};

/// A single touch sensor: acquisition feeding detection
pub struct Sensor<'a, S: SenseNetwork, T: CountdownTimer, I: Idle, const N: usize> {
    pub acquirer: Acquirer<'a, S, T, I>,
    pub detector: Detector<'a, N>,
}

impl<'a, S: SenseNetwork, T: CountdownTimer, I: Idle, const N: usize> Sensor<'a, S, T, I, N> {
    pub fn new(acquirer: Acquirer<'a, S, T, I>, config: &'a TouchConfig) -> Self {
        Self {
            acquirer,
            detector: Detector::new(Some(config)),
        }
    }

    /// Run one cycle: acquire an averaged reading and push it through the detector
    pub fn poll(&mut self) -> Cycle {
        let reading = self.acquirer.acquire(self.detector.config().samples);
        self.detector.push(reading)
    }

    pub fn touched(&self) -> bool {
        self.detector.in_peak()
    }
}
