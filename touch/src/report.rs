//! Line oriented telemetry.
//!
//! Each cycle produces one semicolon separated record, ready for a spreadsheet CSV import,
//! preceded by a `Blubb` line when a touch starts.

use core::fmt::{self, Write};

use crate::detector::Cycle;

/// Line emitted on every touch onset
pub const TOUCH_LINE: &str = "Blubb";

impl Cycle {
    /// Write this cycle's telemetry lines
    pub fn report<W: Write>(&self, w: &mut W) -> fmt::Result {
        if self.onset {
            writeln!(w, "{}", TOUCH_LINE)?;
        }
        writeln!(
            w,
            "{:5}; {:5}; {:5}; {:5}; {:5}; {:5}",
            self.reading,
            self.min,
            self.max,
            self.spread(),
            self.rise(),
            self.depth()
        )
    }
}

/// Translates `\n` into `\r\n` on the way through
pub struct CrLf<W: Write>(pub W);

impl<W: Write> Write for CrLf<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.0.write_str(first)?;
        }
        for line in lines {
            self.0.write_str("\r\n")?;
            self.0.write_str(line)?;
        }
        Ok(())
    }
}
