use crate::app::Mono;
use crate::app::{init, Local, Shared};
use crate::clock::{enable_timer_clocks, freeze_clocks};
use crate::pins::BridgePins;
use crate::pwm::SixStepPwm;
use crate::tick::CommutationTimer;
use six_step::config::TICK_TIMER_CLOCK_HZ;
use six_step::{timing, MotorStep, PwmTimerConfig, TickTimerConfig};
use stm32f7xx_hal::prelude::*;

use crate::CLOCK_FREQ_HZ;

pub fn init(cx: init::Context) -> (Shared, Local) {
    defmt::info!("Starting RTIC init task");

    let pwm_config = PwmTimerConfig::SIX_STEP;
    let tick_config = TickTimerConfig::SIX_STEP;
    assert_param!(pwm_config.validate());
    assert_param!(tick_config.validate());

    // Device specific peripherals
    let device = cx.device;

    // Timer clock gates are PAC-level, so set them before
    // the HAL takes ownership of RCC.
    enable_timer_clocks(&device.RCC);
    let clocks = freeze_clocks(device.RCC);

    Mono::start(cx.core.SYST, CLOCK_FREQ_HZ);

    // Split up the ports, and give the bridge pins to the
    // PWM driver that owns them from here on.
    let gpioa = device.GPIOA.split();
    let gpiob = device.GPIOB.split();
    let gpioe = device.GPIOE.split();

    let pins = BridgePins::new(
        gpioa.pa8,
        gpioe.pe11,
        gpioe.pe13,
        gpiob.pb13,
        gpiob.pb14,
        gpiob.pb15,
        gpiob.pb12,
    );

    let mut pwm = SixStepPwm::new(device.TIM1, pins, &pwm_config);

    // The first COM event applies step 1
    let next_step = MotorStep::new();
    pwm.preload_step(next_step.outputs());

    let pwm_clock_hz = clocks.timclk2().raw();
    defmt::info!(
        "TIM1 running at {} Hz, dead time {} ns",
        timing::update_frequency_hz(pwm_clock_hz, pwm_config.prescaler, pwm_config.period),
        timing::dead_time_ns(pwm_config.protection.dead_time, pwm_clock_hz)
    );

    let tick_clock_hz = clocks.timclk1().raw();
    if tick_clock_hz != TICK_TIMER_CLOCK_HZ {
        defmt::warn!(
            "TIM4 kernel clock is {} Hz, tick prescaler assumes {} Hz",
            tick_clock_hz,
            TICK_TIMER_CLOCK_HZ
        );
    }

    let tick_timer = CommutationTimer::new(device.TIM4, &tick_config);
    defmt::info!(
        "TIM4 commutation tick every {} us",
        tick_config.interval_us(tick_clock_hz)
    );

    crate::app::status_loop::spawn().ok();

    defmt::info!("Ending init task");

    (
        Shared {
            pwm,
            active_step: None,
            commutations: 0,
        },
        Local {
            tick_timer,
            next_step,
        },
    )
}
