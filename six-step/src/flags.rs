//! Timer status flags.
//!
//! TIMx_SR flags are rc_w0: writing 0 clears a flag, writing 1 leaves it
//! alone. Clearing with a read-modify-write would also clear any flag that
//! is set between the read and the write, so the register is written with
//! every other flag bit set instead.

pub const UIF: u32 = 1 << 0;
pub const COMIF: u32 = 1 << 5;
pub const BIF: u32 = 1 << 7;

/// Flag bits of an advanced-control timer (TIM1/TIM8) SR.
pub const ADVANCED_TIMER_FLAGS: u32 = 0x0003_1FFF;
/// Flag bits of a general-purpose timer (TIM2..TIM5) SR.
pub const GENERAL_TIMER_FLAGS: u32 = 0x0000_1E5F;

/// SR value that clears `flags` and nothing else. Reserved bits stay 0.
pub const fn clear_value(timer_flags: u32, flags: u32) -> u32 {
    timer_flags & !flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_one_flag_keeps_the_others() {
        let value = clear_value(ADVANCED_TIMER_FLAGS, COMIF);
        assert_eq!(value & COMIF, 0);
        assert_eq!(value & BIF, BIF);
        assert_eq!(value & UIF, UIF);
    }

    #[test]
    fn clearing_several_flags() {
        let value = clear_value(ADVANCED_TIMER_FLAGS, COMIF | BIF);
        assert_eq!(value & (COMIF | BIF), 0);
        assert_eq!(value & UIF, UIF);
    }

    #[test]
    fn reserved_bits_are_written_as_zero() {
        assert_eq!(clear_value(ADVANCED_TIMER_FLAGS, BIF) & !ADVANCED_TIMER_FLAGS, 0);
        assert_eq!(clear_value(GENERAL_TIMER_FLAGS, UIF) & !GENERAL_TIMER_FLAGS, 0);
        // COM and break do not exist on general-purpose timers
        assert_eq!(GENERAL_TIMER_FLAGS & (COMIF | BIF), 0);
        assert_eq!(clear_value(GENERAL_TIMER_FLAGS, UIF), 0x0000_1E5E);
    }
}
