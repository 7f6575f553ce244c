#![no_main]
#![no_std]

/// Check a configuration `Result` at startup and halt in
/// [`panic_etc::assert_failed`] when it is an error.
#[cfg(feature = "full-assert")]
macro_rules! assert_param {
    ($check:expr) => {
        if let Err(e) = $check {
            defmt::error!("Rejected timer configuration: {}", e);
            $crate::panic_etc::assert_failed(file!(), line!());
        }
    };
}

#[cfg(not(feature = "full-assert"))]
macro_rules! assert_param {
    ($check:expr) => {};
}

pub mod clock;
pub mod init;
pub mod pins;
pub mod pwm;
pub mod tick;

mod panic_etc;

pub const CLOCK_FREQ_HZ: u32 = 216_000_000;
pub const HSE_FREQ_HZ: u32 = 25_000_000;
pub const SYSTICK_RATE_HZ: u32 = 1000;

#[rtic::app(device = stm32f7xx_hal::pac, dispatchers = [EXTI0])]
mod app {

    use crate::pwm::SixStepPwm;
    use crate::tick::CommutationTimer;
    use rtic_monotonics::systick::prelude::*;
    use six_step::MotorStep;

    use crate::init::init;
    use crate::SYSTICK_RATE_HZ;

    systick_monotonic!(Mono, SYSTICK_RATE_HZ);

    #[shared]
    pub struct Shared {
        pub pwm: SixStepPwm,
        /// Step currently applied to the outputs, `None` until the
        /// first COM event.
        pub active_step: Option<MotorStep>,
        pub commutations: u32,
    }

    #[local]
    pub struct Local {
        pub tick_timer: CommutationTimer,
        /// Step preloaded for the next COM event
        pub next_step: MotorStep,
    }

    extern "Rust" {

        #[init]
        fn init(cx: init::Context) -> (Shared, Local);
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            continue;
        }
    }

    #[task(priority = 1, shared=[pwm, active_step, commutations])]
    async fn status_loop(mut cx: status_loop::Context) {
        loop {
            Mono::delay(1.secs()).await;
            let step = cx.shared.active_step.lock(|step| *step);
            let count = cx.shared.commutations.lock(|count| *count);
            let outputs_on = cx.shared.pwm.lock(|pwm| pwm.outputs_enabled());
            match step {
                Some(step) => defmt::info!(
                    "step {}, {} commutations, outputs {}",
                    step.index() + 1,
                    count,
                    if outputs_on { "on" } else { "off" }
                ),
                None => defmt::info!("waiting for first commutation"),
            }
        }
    }

    /// Commutation tick
    ///
    /// TIM4 update. Issues a software COM event on TIM1, which
    /// applies the preloaded step in hardware.
    #[task(binds = TIM4, priority = 2, shared=[pwm], local=[tick_timer])]
    fn commutation_tick(mut cx: commutation_tick::Context) {
        // Must clear the flag or the ISR re-runs immediately
        cx.local.tick_timer.clear_interrupt();
        cx.shared.pwm.lock(|pwm| pwm.generate_commutation());
    }

    /// TIM1 commutation interrupt
    ///
    /// Runs after the hardware has applied the preloaded step. Records
    /// it and preloads the following one for the next tick.
    #[task(binds = TIM1_TRG_COM_TIM11, priority = 3, shared=[pwm, active_step, commutations], local=[next_step])]
    fn commutate(mut cx: commutate::Context) {
        let next_step = cx.local.next_step;
        let applied = *next_step;
        next_step.next();

        cx.shared.pwm.lock(|pwm| {
            pwm.clear_commutation_flag();
            pwm.preload_step(next_step.outputs());
        });
        cx.shared.active_step.lock(|step| *step = Some(applied));
        cx.shared.commutations.lock(|count| *count = count.wrapping_add(1));

        defmt::debug!("commutated to step {}", applied.index() + 1);
    }

    /// TIM1 break
    ///
    /// MOE has already been cleared by hardware. Automatic output is off,
    /// so the bridge stays idle until reset; the interrupt is masked so a
    /// held break input does not retrigger it.
    #[task(binds = TIM1_BRK_TIM9, priority = 4, shared=[pwm])]
    fn break_fault(mut cx: break_fault::Context) {
        cx.shared.pwm.lock(|pwm| pwm.latch_break());
        defmt::error!("Break input asserted, bridge outputs idle until reset");
    }
}
