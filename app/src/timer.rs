use crate::hal::pac;
use touch::CountdownTimer;

/// TIM2 as a one-window countdown for the discharge phase
pub struct DischargeTim {
    tim: pac::TIM2,
}

impl DischargeTim {
    /// `prescale` divides the timer clock, `ticks` is the window length in prescaled ticks
    pub fn new(tim: pac::TIM2, prescale: u16, ticks: u16) -> Self {
        let rccregs = unsafe { pac::Peripherals::steal().RCC };
        rccregs.apb1enr.modify(|_, w| w.tim2en().set_bit());

        tim.psc.write(|w| w.psc().bits(prescale.saturating_sub(1)));
        tim.arr.write(|w| w.arr().bits(ticks as u32));
        // One-pulse: the counter stops itself at the update, so each window expires once
        tim.cr1.modify(|_, w| w.opm().set_bit());

        // Latch PSC now. This raises UIF, so clear it before the interrupt is enabled.
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.write(|w| unsafe { w.bits(0) });
        tim.dier.write(|w| w.uie().set_bit());

        Self { tim }
    }

    /// Acknowledge the update interrupt. Call from the TIM2 handler.
    pub fn clear_irq() {
        let tim2 = unsafe { pac::Peripherals::steal().TIM2 };
        tim2.sr.write(|w| unsafe { w.bits(0) });
    }
}

impl CountdownTimer for DischargeTim {
    fn restart(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    fn stop(&mut self) {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
    }
}
