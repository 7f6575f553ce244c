//! Timer arithmetic.

/// Time between two update events, in microseconds.
pub fn update_period_us(timer_clock_hz: u32, prescaler: u16, period: u16) -> u64 {
    let ticks = (u64::from(prescaler) + 1) * (u64::from(period) + 1);
    ticks * 1_000_000 / u64::from(timer_clock_hz)
}

/// Update events per second, rounded down. Never above `timer_clock_hz`.
pub fn update_frequency_hz(timer_clock_hz: u32, prescaler: u16, period: u16) -> u32 {
    let ticks = (u64::from(prescaler) + 1) * (u64::from(period) + 1);
    (u64::from(timer_clock_hz) / ticks) as u32
}

/// Decode a BDTR DTG value into tDTS ticks.
///
/// DTG[7:5] selects the range:
/// - `0xx`: DTG[6:0]
/// - `10x`: (64 + DTG[5:0]) * 2
/// - `110`: (32 + DTG[4:0]) * 8
/// - `111`: (32 + DTG[4:0]) * 16
pub const fn dead_time_ticks(dtg: u8) -> u32 {
    let dtg = dtg as u32;
    match dtg {
        d if d < 0x80 => d,
        d if d < 0xC0 => 2 * (64 + (d & 0x3F)),
        d if d < 0xE0 => 8 * (32 + (d & 0x1F)),
        d => 16 * (32 + (d & 0x1F)),
    }
}

/// Dead time in nanoseconds with CKD = 1 (tDTS = tCK_INT).
pub fn dead_time_ns(dtg: u8, timer_clock_hz: u32) -> u64 {
    u64::from(dead_time_ticks(dtg)) * 1_000_000_000 / u64::from(timer_clock_hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DEADTIME, PWM_PERIOD, PWM_PRESCALER, TICK_PERIOD, TICK_PRESCALER, TICK_TIMER_CLOCK_HZ,
    };

    #[test]
    fn tick_is_180_ms() {
        assert_eq!(
            update_period_us(TICK_TIMER_CLOCK_HZ, TICK_PRESCALER, TICK_PERIOD),
            180_000
        );
    }

    #[test]
    fn pwm_frequency_at_216_mhz() {
        assert_eq!(
            update_frequency_hz(216_000_000, PWM_PRESCALER, PWM_PERIOD),
            52_734
        );
        assert_eq!(update_period_us(216_000_000, PWM_PRESCALER, PWM_PERIOD), 18);
    }

    #[test]
    fn full_range_time_base() {
        // 2^32 ticks per update
        assert_eq!(update_frequency_hz(216_000_000, u16::MAX, u16::MAX), 0);
        assert_eq!(update_frequency_hz(u32::MAX, u16::MAX, u16::MAX), 0);
        assert_eq!(update_frequency_hz(u32::MAX, 0, 0), u32::MAX);
        assert_eq!(
            update_period_us(216_000_000, u16::MAX, u16::MAX),
            19_884_107
        );
    }

    #[test]
    fn dead_time_ranges() {
        assert_eq!(dead_time_ticks(0), 0);
        assert_eq!(dead_time_ticks(DEADTIME), 1);
        assert_eq!(dead_time_ticks(0x7F), 127);
        assert_eq!(dead_time_ticks(0x80), 128);
        assert_eq!(dead_time_ticks(0xBF), 254);
        assert_eq!(dead_time_ticks(0xC0), 256);
        assert_eq!(dead_time_ticks(0xDF), 504);
        assert_eq!(dead_time_ticks(0xE0), 512);
        assert_eq!(dead_time_ticks(0xFF), 1008);
    }

    #[test]
    fn dead_time_in_nanoseconds() {
        assert_eq!(dead_time_ns(DEADTIME, 216_000_000), 4);
        assert_eq!(dead_time_ns(108, 216_000_000), 500);
        assert_eq!(dead_time_ns(0xFF, 1_000_000), 1_008_000);
    }

    #[test]
    fn dead_time_on_slow_clock_is_not_truncated() {
        assert_eq!(dead_time_ns(0xFF, 1), 1_008_000_000_000);
    }
}
