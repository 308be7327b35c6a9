#![no_main]
#![no_std]

use cortex_m;
use cortex_m_rt::entry;
use panic_halt as _;

use stm32f0xx_hal as hal;

use touch::acquire::Acquirer;
use touch::discharge::{DischargeFlag, DischargeTimer};
use touch::report::CrLf;
use touch::sensor::Sensor;
use touch::{nonzero, ChargeDelay, ChargeEdge, TouchConfig, HISTORY_LEN};

use crate::hal::pac;
use crate::hal::pac::interrupt;
use crate::hal::prelude::*;

use idle::Wfi;
use timer::DischargeTim;

mod idle;
mod sense;
mod serial;
mod timer;

const BAUD: u32 = 9600;

#[cfg(feature = "calibrated-delay")]
const CHARGE_DELAY: ChargeDelay = touch::CALIBRATED_DELAY;
#[cfg(not(feature = "calibrated-delay"))]
const CHARGE_DELAY: ChargeDelay = ChargeDelay::Minimal;

static TOUCH_CONFIG: TouchConfig = TouchConfig {
    samples: nonzero(10),
    threshold: 0.98,
    charge_delay: CHARGE_DELAY,
    charge_edge: ChargeEdge::HardFirst,
    // 64 * 102 cycles at 48 MHz: 136 us, about 5 tau
    timer_prescale: 64,
    discharge_ticks: 102,
};

static DISCHARGE: DischargeFlag = DischargeFlag::new();

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();
    let mut nvic = cp.NVIC;

    let mut flash = dp.FLASH;
    let mut rcc = dp.RCC.configure().sysclk(48.mhz()).freeze(&mut flash);
    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);

    // A library requiring a critical section to set a gpio mode register is bad and I just won't.
    let fake_cs = unsafe { cortex_m::interrupt::CriticalSection::new() };

    // Sense network: PA2 and PA3 through the network, PA1 on the sense node
    let up = gpioa.pa2.into_floating_input(&fake_cs);
    let down = gpioa.pa3.into_floating_input(&fake_cs);
    let node = gpioa.pa1.into_analog(&fake_cs);
    let network = sense::Network::new(up, down, node, dp.COMP);

    let tim = DischargeTim::new(dp.TIM2, TOUCH_CONFIG.timer_prescale, TOUCH_CONFIG.discharge_ticks);

    unsafe {
        nvic.set_priority(pac::Interrupt::TIM2, 3);
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIM2);
    }

    let tx_pin = gpiob.pb6.into_alternate_af0(&fake_cs);
    let rx_pin = gpiob.pb7.into_alternate_af0(&fake_cs);
    let uart = hal::serial::Serial::usart1(dp.USART1, (tx_pin, rx_pin), BAUD.bps(), &mut rcc);
    serial::uart1::init(uart, 4);

    let discharge = DischargeTimer::new(tim, Wfi, &DISCHARGE);
    let acquirer = Acquirer::new(network, discharge, &TOUCH_CONFIG);
    let mut sensor: Sensor<_, _, _, HISTORY_LEN> = Sensor::new(acquirer, &TOUCH_CONFIG);

    // Telemetry is meant for a spreadsheet CSV import, so use Windows line endings
    let mut writer = CrLf(serial::uart1::writer());

    loop {
        let cycle = sensor.poll();
        cycle.report(&mut writer).ok();
    }
}

#[interrupt]
fn TIM2() {
    DischargeTim::clear_irq();
    DISCHARGE.expire();
}
