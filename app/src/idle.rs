use touch::Idle;

/// Sleep with `wfi` between checks
#[derive(Clone, Copy, Default)]
pub struct Wfi;

impl Idle for Wfi {
    fn sleep_while<F: FnMut() -> bool>(&mut self, mut cond: F) {
        cortex_m::interrupt::disable();
        while cond() {
            // A pending interrupt wakes `wfi` even while masked, so nothing that fired after the
            // check is missed. Unmasking afterwards lets its handler run.
            cortex_m::asm::wfi();
            unsafe { cortex_m::interrupt::enable() };
            cortex_m::interrupt::disable();
        }
        unsafe { cortex_m::interrupt::enable() };
    }
}
