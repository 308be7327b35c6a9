use log::debug;

use crate::history::History;
use crate::{TouchConfig, TouchState, DEFAULT_TOUCH_CONFIG};

/// Outcome of one detection cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cycle {
    pub reading: u16,
    /// Smallest reading in the window, including this one
    pub min: u16,
    /// Largest reading in the window, including this one
    pub max: u16,
    /// True only on the cycle a touch begins
    pub onset: bool,
}

impl Cycle {
    pub fn spread(&self) -> u16 {
        self.max - self.min
    }

    /// Height of the reading above the window minimum
    pub fn rise(&self) -> u16 {
        self.reading - self.min
    }

    /// Depth of the reading below the window maximum
    pub fn depth(&self) -> u16 {
        self.max - self.reading
    }
}

/// Detects touches as dips below a fraction of the recent maximum.
///
/// A touch lowers the reading, so it shows as a drop against the window maximum. Events are
/// edge triggered: one per entry into the dip, none while it is held or on the way out.
pub struct Detector<'a, const N: usize> {
    history: History<N>,
    state: TouchState,
    config: &'a TouchConfig,
}

impl<'a, const N: usize> Detector<'a, N> {
    pub fn new(config: Option<&'a TouchConfig>) -> Self {
        let config = config.unwrap_or(&DEFAULT_TOUCH_CONFIG);
        Self {
            history: History::new(),
            state: TouchState::Idle,
            config,
        }
    }

    pub fn state(&self) -> TouchState {
        self.state
    }

    pub fn history(&self) -> &History<N> {
        &self.history
    }

    pub fn config(&self) -> &'a TouchConfig {
        self.config
    }

    pub fn in_peak(&self) -> bool {
        self.state == TouchState::InPeak
    }

    /// Process a new reading
    pub fn push(&mut self, reading: u16) -> Cycle {
        self.history.push(reading);
        let (min, max) = self.history.min_max();

        let dipped = max as f32 * self.config.threshold > reading as f32;

        let mut onset = false;
        self.state = match (self.state, dipped) {
            (TouchState::Idle, true) => {
                debug!("touch at {} (window {}..{})", reading, min, max);
                onset = true;
                TouchState::InPeak
            }
            (TouchState::InPeak, false) => {
                debug!("release at {}", reading);
                TouchState::Idle
            }
            (state, _) => state,
        };

        Cycle {
            reading,
            min,
            max,
            onset,
        }
    }
}
