use defmt_brtt as _; // global logger

use panic_probe as _;
use stm32f7xx_hal as _; // memory layout

use crate::app::Mono;
use crate::SYSTICK_RATE_HZ;
use rtic_monotonics::systick::prelude::*;

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

// Milliseconds since the SysTick monotonic was started. Dividing keeps the
// stamp from overflowing before the tick counter itself wraps.
defmt::timestamp!("{=u32:ms}", {
    let ticks = Mono::now().ticks();
    ticks / (SYSTICK_RATE_HZ / 1000)
});

/// Reports the source file and line of a rejected configuration, then
/// halts. Does not return, so no interrupt-driven behaviour starts.
#[cfg(feature = "full-assert")]
pub fn assert_failed(file: &'static str, line: u32) -> ! {
    defmt::error!("Wrong parameters value: file {} on line {}", file, line);

    loop {
        cortex_m::asm::nop();
    }
}
