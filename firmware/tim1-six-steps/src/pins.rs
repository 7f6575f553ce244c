//! TIM1 bridge pins on the DISCO board.

use six_step::config::{OutputSpeed, BRIDGE_OUTPUT_SPEED};
use stm32f7xx_hal::gpio::{Alternate, Speed, PA8, PB12, PB13, PB14, PB15, PE11, PE13};

const TIM1_AF: u8 = 1;

fn hal_speed(speed: OutputSpeed) -> Speed {
    match speed {
        OutputSpeed::Low => Speed::Low,
        OutputSpeed::Medium => Speed::Medium,
        OutputSpeed::High => Speed::High,
        OutputSpeed::VeryHigh => Speed::VeryHigh,
    }
}

/// The six bridge outputs and the break input, all on TIM1's alternate
/// function.
pub struct BridgePins {
    pub ch1: PA8<Alternate<TIM1_AF>>,
    pub ch2: PE11<Alternate<TIM1_AF>>,
    pub ch3: PE13<Alternate<TIM1_AF>>,
    pub ch1n: PB13<Alternate<TIM1_AF>>,
    pub ch2n: PB14<Alternate<TIM1_AF>>,
    pub ch3n: PB15<Alternate<TIM1_AF>>,
    /// Active low, pulled up so a floating input does not trip the break.
    pub bkin: PB12<Alternate<TIM1_AF>>,
}

impl BridgePins {
    /// Writing the bare pin types means the raw `gpiox.pxy` fields can be
    /// passed straight from `split`.
    pub fn new(
        ch1: PA8,
        ch2: PE11,
        ch3: PE13,
        ch1n: PB13,
        ch2n: PB14,
        ch3n: PB15,
        bkin: PB12,
    ) -> Self {
        // Push-pull fast outputs
        let speed = hal_speed(BRIDGE_OUTPUT_SPEED);
        Self {
            ch1: ch1.into_alternate::<TIM1_AF>().set_speed(speed),
            ch2: ch2.into_alternate::<TIM1_AF>().set_speed(speed),
            ch3: ch3.into_alternate::<TIM1_AF>().set_speed(speed),
            ch1n: ch1n.into_alternate::<TIM1_AF>().set_speed(speed),
            ch2n: ch2n.into_alternate::<TIM1_AF>().set_speed(speed),
            ch3n: ch3n.into_alternate::<TIM1_AF>().set_speed(speed),
            bkin: bkin.into_alternate::<TIM1_AF>().internal_pull_up(true),
        }
    }
}
