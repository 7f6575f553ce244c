//! TIM4 as the commutation tick
//!
//! A free-running up-counter whose update interrupt paces the COM events
//! on TIM1.

use six_step::{flags, TickTimerConfig};
use stm32f7xx_hal::pac::TIM4;

pub struct CommutationTimer {
    tim: TIM4,
}

impl CommutationTimer {
    pub fn new(tim: TIM4, config: &TickTimerConfig) -> Self {
        tim.cr1.modify(|_, w| w.cen().bit(false));

        tim.psc.write(|w| w.psc().bits(config.prescaler));
        tim.arr.write(|w| w.arr().bits(config.period));

        // PSC only loads on an update event. Force one so the first tick
        // is already prescaled, then drop the flag it leaves behind.
        tim.egr.write(|w| w.ug().set_bit());
        let mut timer = Self { tim };
        timer.clear_interrupt();

        timer.tim.dier.modify(|_, w| w.uie().bit(true));
        timer.tim.cr1.modify(|_, w| w.cen().bit(true));

        timer
    }

    pub fn clear_interrupt(&mut self) {
        // Write rather than modify, SR is rc_w0.
        // Safety: only flag bits are written, reserved bits stay at reset value
        self.tim.sr.write(|w| unsafe {
            w.bits(flags::clear_value(flags::GENERAL_TIMER_FLAGS, flags::UIF))
        });
    }
}
