//! Sense network on GPIOA, watched by COMP1.
//!
//! The charge loop toggles pin modes several times per step, far too often to go through the
//! HAL's type-state conversions and their critical sections. The pins are taken from the HAL to
//! prove ownership and then driven through the GPIOA registers directly.

use crate::hal::gpio::{gpioa, Analog, Floating, Input};
use crate::hal::pac;
use touch::{SenseNetwork, Terminal};

const UP_PIN: u32 = 2;
const DOWN_PIN: u32 = 3;

const MODE_INPUT: u32 = 0b00;
const MODE_OUTPUT: u32 = 0b01;
const PULL_NONE: u32 = 0b00;
const PULL_UP: u32 = 0b01;

/// COMP1 inverting input at 1/2 VREFINT
const COMP1INSEL_HALF_VREF: u8 = 0b001;

pub struct Network {
    regs: &'static pac::gpioa::RegisterBlock,
    comp: pac::COMP,
    _up: gpioa::PA2<Input<Floating>>,
    _down: gpioa::PA3<Input<Floating>>,
    _node: gpioa::PA1<Analog>,
}

impl Network {
    /// `node` is the sense node, the non-inverting input of COMP1
    pub fn new(
        up: gpioa::PA2<Input<Floating>>,
        down: gpioa::PA3<Input<Floating>>,
        node: gpioa::PA1<Analog>,
        comp: pac::COMP,
    ) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

        comp.csr.modify(|_, w| {
            unsafe { w.comp1insel().bits(COMP1INSEL_HALF_VREF) }
                .comp1en().set_bit()
        });

        Self {
            regs: unsafe { &*pac::GPIOA::ptr() },
            comp,
            _up: up,
            _down: down,
            _node: node,
        }
    }

    fn pin(terminal: Terminal) -> u32 {
        match terminal {
            Terminal::Up => UP_PIN,
            Terminal::Down => DOWN_PIN,
        }
    }

    fn set_mode(&mut self, pin: u32, mode: u32) {
        self.regs.moder.modify(|r, w| unsafe {
            w.bits((r.bits() & !(0b11 << (2 * pin))) | (mode << (2 * pin)))
        });
    }

    fn set_pull(&mut self, pin: u32, pull: u32) {
        self.regs.pupdr.modify(|r, w| unsafe {
            w.bits((r.bits() & !(0b11 << (2 * pin))) | (pull << (2 * pin)))
        });
    }
}

impl SenseNetwork for Network {
    fn drive_low(&mut self, terminal: Terminal) {
        let pin = Self::pin(terminal);
        self.regs.bsrr.write(|w| unsafe { w.bits(1 << (pin + 16)) });
        self.set_mode(pin, MODE_OUTPUT);
    }

    fn drive_high(&mut self, terminal: Terminal) {
        let pin = Self::pin(terminal);
        self.regs.bsrr.write(|w| unsafe { w.bits(1 << pin) });
        self.set_mode(pin, MODE_OUTPUT);
    }

    fn float(&mut self, terminal: Terminal) {
        let pin = Self::pin(terminal);
        self.set_mode(pin, MODE_INPUT);
        self.set_pull(pin, PULL_NONE);
    }

    fn pull_up(&mut self, terminal: Terminal) {
        let pin = Self::pin(terminal);
        // Pull first so the line never floats on the way out of output mode
        self.set_pull(pin, PULL_UP);
        self.set_mode(pin, MODE_INPUT);
    }

    fn comparator(&mut self) -> bool {
        self.comp.csr.read().comp1out().bit_is_set()
    }

    fn delay(&mut self, cycles: u32) {
        if cycles <= 1 {
            cortex_m::asm::nop();
        } else {
            cortex_m::asm::delay(cycles);
        }
    }
}
