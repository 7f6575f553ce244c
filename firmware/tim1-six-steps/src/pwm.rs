//! TIM1 as a six-step bridge driver
//!
//! PAC-level setup of the advanced-control timer. References to register
//! and bit names follow the RM0385 reference manual. The channels start in
//! timing (frozen) mode; from then on the outputs only change when a COM
//! event transfers the preloaded CCxE/CCxNE/OCxM bits.

use six_step::config::PwmTimerConfig;
use six_step::flags;
use six_step::{Channel, StepOutputs};
use stm32f7xx_hal::pac::TIM1;

use crate::pins::BridgePins;

pub struct SixStepPwm {
    tim: TIM1,
    _pins: BridgePins,
}

impl SixStepPwm {
    pub fn new(tim: TIM1, pins: BridgePins, config: &PwmTimerConfig) -> Self {
        // Keep the counter stopped while configuring
        tim.cr1.modify(|_, w| w.cen().bit(false));

        // Time base: up-counting, edge aligned
        tim.cr1.modify(|_, w| {
            w.dir().bit(false);
            w.cms().bits(0b00)
        });
        tim.psc.write(|w| w.psc().bits(config.prescaler));
        tim.arr.write(|w| w.arr().bits(config.period));
        tim.rcr
            .write(|w| unsafe { w.rep().bits(config.repetition_counter) });

        // PSC and RCR are buffered, generate an update so they load now.
        // UIE is off, the flag is only cleared for tidiness.
        tim.egr.write(|w| w.ug().set_bit());
        clear_flags(&tim, flags::UIF);

        let [ch1, ch2, ch3] = &config.channels;

        // Output compare modes (timing mode sets OCxM to 0b000)
        tim.ccmr1_output().modify(|_, w| {
            w.oc1m().bits(ch1.mode.bits());
            w.oc2m().bits(ch2.mode.bits())
        });
        tim.ccmr2_output()
            .modify(|_, w| w.oc3m().bits(ch3.mode.bits()));

        tim.ccr1().write(|w| w.ccr().bits(ch1.pulse));
        tim.ccr2().write(|w| w.ccr().bits(ch2.pulse));
        tim.ccr3().write(|w| w.ccr().bits(ch3.pulse));

        // Output enables and polarities
        tim.ccer.modify(|_, w| {
            w.cc1e().bit(ch1.output_enable);
            w.cc1ne().bit(ch1.complementary_enable);
            w.cc1p().bit(ch1.polarity.ccer_bit());
            w.cc1np().bit(ch1.complementary_polarity.ccer_bit());
            w.cc2e().bit(ch2.output_enable);
            w.cc2ne().bit(ch2.complementary_enable);
            w.cc2p().bit(ch2.polarity.ccer_bit());
            w.cc2np().bit(ch2.complementary_polarity.ccer_bit());
            w.cc3e().bit(ch3.output_enable);
            w.cc3ne().bit(ch3.complementary_enable);
            w.cc3p().bit(ch3.polarity.ccer_bit());
            w.cc3np().bit(ch3.complementary_polarity.ccer_bit())
        });

        // Output levels while MOE is cleared
        tim.cr2.modify(|_, w| {
            w.ois1().bit(ch1.idle.bit());
            w.ois1n().bit(ch1.complementary_idle.bit());
            w.ois2().bit(ch2.idle.bit());
            w.ois2n().bit(ch2.complementary_idle.bit());
            w.ois3().bit(ch3.idle.bit());
            w.ois3n().bit(ch3.complementary_idle.bit())
        });

        // Break, dead time and lock. BDTR fields are write-once after
        // a lock level is set, so write them in one go.
        let protection = &config.protection;
        tim.bdtr.write(|w| unsafe {
            w.ossi().bit(protection.off_state_idle);
            w.lock().bits(protection.lock.bits());
            w.dtg().bits(protection.dead_time);
            w.bke().bit(protection.break_enable);
            w.bkp().bit(protection.break_polarity.bkp_bit());
            w.aoe().bit(protection.automatic_output)
        });

        // Preload CCxE, CCxNE and OCxM, transferred on COM. CCUS
        // cleared so only a software COMG triggers the transfer.
        tim.cr2.modify(|_, w| {
            w.ccpc().bit(true);
            w.ccus().bit(false)
        });

        clear_flags(&tim, flags::COMIF | flags::BIF);
        tim.dier.modify(|_, w| {
            w.comie().bit(true);
            w.bie().bit(protection.break_enable)
        });

        // Main output enable
        tim.bdtr.modify(|_, w| w.moe().bit(true));

        tim.cr1.modify(|_, w| w.cen().bit(true));

        Self { tim, _pins: pins }
    }

    /// Software COM event: apply the preloaded step.
    pub fn generate_commutation(&mut self) {
        self.tim.egr.write(|w| w.comg().set_bit());
    }

    pub fn clear_commutation_flag(&mut self) {
        clear_flags(&self.tim, flags::COMIF);
    }

    /// Write the channel configuration for the next COM event. Driven
    /// channels run in PWM mode 1 against their compare value.
    pub fn preload_step(&mut self, outputs: &StepOutputs) {
        let mode = |channel| outputs.mode(channel).bits();

        self.tim.ccmr1_output().modify(|_, w| {
            w.oc1m().bits(mode(Channel::Ch1));
            w.oc2m().bits(mode(Channel::Ch2))
        });
        self.tim
            .ccmr2_output()
            .modify(|_, w| w.oc3m().bits(mode(Channel::Ch3)));

        let [main1, main2, main3] = outputs.main;
        let [comp1, comp2, comp3] = outputs.complementary;
        self.tim.ccer.modify(|_, w| {
            w.cc1e().bit(main1);
            w.cc1ne().bit(comp1);
            w.cc2e().bit(main2);
            w.cc2ne().bit(comp2);
            w.cc3e().bit(main3);
            w.cc3ne().bit(comp3)
        });
    }

    /// Acknowledge a break and stop listening for it.
    pub fn latch_break(&mut self) {
        clear_flags(&self.tim, flags::BIF);
        self.tim.dier.modify(|_, w| w.bie().bit(false));
    }

    /// State of MOE. Cleared by hardware on break.
    pub fn outputs_enabled(&self) -> bool {
        self.tim.bdtr.read().moe().bit_is_set()
    }
}

/// Clear status flags without touching any other flag (SR is rc_w0).
fn clear_flags(tim: &TIM1, clear: u32) {
    // Safety: only flag bits are written, reserved bits stay at reset value
    tim.sr
        .write(|w| unsafe { w.bits(flags::clear_value(flags::ADVANCED_TIMER_FLAGS, clear)) });
}
