//! Clock setup
//!
//! The DISCO board has a 25 MHz oscillator connected to the HSE input. With
//! SYSCLK at 216 MHz the HAL picks APB1 = 54 MHz and APB2 = 108 MHz, so the
//! timer kernel clocks are 108 MHz (TIM4) and 216 MHz (TIM1).

use cortex_m::asm::nop;
use stm32f7xx_hal::pac::RCC;
use stm32f7xx_hal::prelude::*;
use stm32f7xx_hal::rcc::{self, Clocks, HSEClock};

use crate::{CLOCK_FREQ_HZ, HSE_FREQ_HZ};

/// Enable the TIM1 (APB2) and TIM4 (APB1) clock gates.
pub fn enable_timer_clocks(rcc: &RCC) {
    rcc.apb2enr.modify(|_, w| w.tim1en().bit(true));
    rcc.apb1enr.modify(|_, w| w.tim4en().bit(true));

    // Delay after two clock cycles before accessing
    // peripheral registers
    nop();
    nop();
}

/// Switch to the external oscillator and freeze the clock tree. The
/// program will panic if the frequency is out of range.
pub fn freeze_clocks(rcc: RCC) -> Clocks {
    let hse_cfg = HSEClock::new(HSE_FREQ_HZ.Hz(), rcc::HSEClockMode::Bypass);
    rcc.constrain()
        .cfgr
        .hse(hse_cfg)
        .sysclk(CLOCK_FREQ_HZ.Hz())
        .freeze()
}
