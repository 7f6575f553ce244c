//! Timer configuration for the six-step example.
//!
//! Field names follow the reference manual bit names so the register writes
//! in the firmware read one-to-one against the records here.

use core::fmt;

use crate::timing;

/// TIM1 auto-reload value.
pub const PWM_PERIOD: u16 = 4095;
pub const PWM_PRESCALER: u16 = 0;
pub const PWM_REPETITION_COUNTER: u8 = 0;

pub const CCR1_VAL: u16 = 2047;
pub const CCR2_VAL: u16 = 1023;
pub const CCR3_VAL: u16 = 511;

/// Raw DTG value, see [`timing::dead_time_ticks`].
pub const DEADTIME: u8 = 1;

/// Kernel clock of the tick timer with a 216 MHz SYSCLK (APB1 / 4, doubled).
pub const TICK_TIMER_CLOCK_HZ: u32 = 108_000_000;

// 108 MHz / 10_800 = 10 kHz, 1_800 counts = 180 ms
pub const TICK_PRESCALER: u16 = 10_799;
pub const TICK_PERIOD: u16 = 1_799;

/// GPIO output speed, OSPEEDRy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputSpeed {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Speed of the six bridge outputs. They switch on every PWM edge with
/// only [`DEADTIME`] between a high side and its low side.
pub const BRIDGE_OUTPUT_SPEED: OutputSpeed = OutputSpeed::High;

/// Output compare mode, OCxM[2:0].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputCompareMode {
    /// Frozen: the comparison has no effect on OCxREF.
    Timing,
    Active,
    Inactive,
    Toggle,
    ForceInactive,
    ForceActive,
    Pwm1,
    Pwm2,
}

impl OutputCompareMode {
    pub const fn bits(self) -> u8 {
        match self {
            Self::Timing => 0b000,
            Self::Active => 0b001,
            Self::Inactive => 0b010,
            Self::Toggle => 0b011,
            Self::ForceInactive => 0b100,
            Self::ForceActive => 0b101,
            Self::Pwm1 => 0b110,
            Self::Pwm2 => 0b111,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Value of the CCxP/CCxNP bit. For the break input this is the
    /// inverse: BKP set means active high.
    pub const fn ccer_bit(self) -> bool {
        matches!(self, Self::ActiveLow)
    }

    pub const fn bkp_bit(self) -> bool {
        matches!(self, Self::ActiveHigh)
    }
}

/// Output level while MOE is cleared, OISx/OISxN.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleState {
    Reset,
    Set,
}

impl IdleState {
    pub const fn bit(self) -> bool {
        matches!(self, Self::Set)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockLevel {
    Off,
    Level1,
    Level2,
    /// Also freezes OCxM, so the outputs can no longer be commutated.
    Level3,
}

impl LockLevel {
    pub const fn bits(self) -> u8 {
        match self {
            Self::Off => 0b00,
            Self::Level1 => 0b01,
            Self::Level2 => 0b10,
            Self::Level3 => 0b11,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    pub mode: OutputCompareMode,
    pub output_enable: bool,
    pub complementary_enable: bool,
    pub pulse: u16,
    pub polarity: Polarity,
    pub complementary_polarity: Polarity,
    pub idle: IdleState,
    pub complementary_idle: IdleState,
}

impl ChannelConfig {
    /// Timing mode with both outputs enabled, active high, idle low.
    pub const fn timing(pulse: u16) -> Self {
        Self {
            mode: OutputCompareMode::Timing,
            output_enable: true,
            complementary_enable: true,
            pulse,
            polarity: Polarity::ActiveHigh,
            complementary_polarity: Polarity::ActiveHigh,
            idle: IdleState::Reset,
            complementary_idle: IdleState::Reset,
        }
    }
}

/// Break, dead time and lock settings (BDTR).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreakConfig {
    /// OSSI: keep driving the idle levels while MOE is cleared.
    pub off_state_idle: bool,
    pub lock: LockLevel,
    pub dead_time: u8,
    pub break_enable: bool,
    pub break_polarity: Polarity,
    /// AOE: let MOE be set again at the next update once break is released.
    pub automatic_output: bool,
}

/// Configuration of the advanced-control (PWM) timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTimerConfig {
    pub prescaler: u16,
    pub period: u16,
    pub repetition_counter: u8,
    pub channels: [ChannelConfig; 3],
    pub protection: BreakConfig,
}

impl PwmTimerConfig {
    pub const SIX_STEP: Self = Self {
        prescaler: PWM_PRESCALER,
        period: PWM_PERIOD,
        repetition_counter: PWM_REPETITION_COUNTER,
        channels: [
            ChannelConfig::timing(CCR1_VAL),
            ChannelConfig::timing(CCR2_VAL),
            ChannelConfig::timing(CCR3_VAL),
        ],
        protection: BreakConfig {
            off_state_idle: true,
            lock: LockLevel::Off,
            dead_time: DEADTIME,
            break_enable: true,
            break_polarity: Polarity::ActiveLow,
            automatic_output: false,
        },
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }

        for (index, channel) in self.channels.iter().enumerate() {
            if channel.pulse > self.period {
                return Err(ConfigError::PulseExceedsPeriod {
                    channel: index as u8 + 1,
                    pulse: channel.pulse,
                    period: self.period,
                });
            }
        }

        // Dead time runs on tDTS (CKD = 1), the counter on the prescaled clock.
        let dead_time_ticks = timing::dead_time_ticks(self.protection.dead_time);
        let period_ticks = (u64::from(self.period) + 1) * (u64::from(self.prescaler) + 1);
        if u64::from(dead_time_ticks) >= period_ticks {
            return Err(ConfigError::DeadTimeExceedsPeriod {
                dead_time_ticks,
                period_ticks,
            });
        }

        if self.protection.lock == LockLevel::Level3 {
            return Err(ConfigError::LockBlocksCommutation);
        }

        Ok(())
    }
}

impl Default for PwmTimerConfig {
    fn default() -> Self {
        Self::SIX_STEP
    }
}

/// Configuration of the free-running timer that paces commutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickTimerConfig {
    pub prescaler: u16,
    pub period: u16,
}

impl TickTimerConfig {
    pub const SIX_STEP: Self = Self {
        prescaler: TICK_PRESCALER,
        period: TICK_PERIOD,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }

    /// Tick interval for the given kernel clock.
    pub fn interval_us(&self, timer_clock_hz: u32) -> u64 {
        timing::update_period_us(timer_clock_hz, self.prescaler, self.period)
    }
}

impl Default for TickTimerConfig {
    fn default() -> Self {
        Self::SIX_STEP
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// An auto-reload of zero blocks the counter.
    ZeroPeriod,
    PulseExceedsPeriod { channel: u8, pulse: u16, period: u16 },
    DeadTimeExceedsPeriod { dead_time_ticks: u32, period_ticks: u64 },
    /// Lock level 3 write-protects OCxM, which every commutation rewrites.
    LockBlocksCommutation,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPeriod => write!(f, "timer period is zero"),
            Self::PulseExceedsPeriod {
                channel,
                pulse,
                period,
            } => write!(
                f,
                "channel {} compare value {} is above the period {}",
                channel, pulse, period
            ),
            Self::DeadTimeExceedsPeriod {
                dead_time_ticks,
                period_ticks,
            } => write!(
                f,
                "dead time of {} ticks does not fit in a period of {} ticks",
                dead_time_ticks, period_ticks
            ),
            Self::LockBlocksCommutation => {
                write!(f, "lock level 3 prevents output mode changes on commutation")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_step_defaults_are_valid() {
        assert_eq!(PwmTimerConfig::SIX_STEP.validate(), Ok(()));
        assert_eq!(TickTimerConfig::SIX_STEP.validate(), Ok(()));
        assert_eq!(PwmTimerConfig::default(), PwmTimerConfig::SIX_STEP);
    }

    #[test]
    fn six_step_defaults_match_example_constants() {
        let cfg = PwmTimerConfig::SIX_STEP;
        assert_eq!(cfg.period, 4095);
        assert_eq!(cfg.prescaler, 0);
        assert_eq!(cfg.repetition_counter, 0);
        let pulses: Vec<u16> = cfg.channels.iter().map(|c| c.pulse).collect();
        assert_eq!(pulses, [2047, 1023, 511]);
        assert!(cfg
            .channels
            .iter()
            .all(|c| c.mode == OutputCompareMode::Timing && c.output_enable && c.complementary_enable));
        assert_eq!(cfg.protection.dead_time, 1);
        assert!(cfg.protection.break_enable);
        assert!(!cfg.protection.break_polarity.bkp_bit());
        assert!(!cfg.protection.automatic_output);
    }

    #[test]
    fn rejects_zero_period() {
        let mut cfg = PwmTimerConfig::SIX_STEP;
        cfg.period = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPeriod));

        let tick = TickTimerConfig {
            prescaler: 10,
            period: 0,
        };
        assert_eq!(tick.validate(), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn rejects_compare_above_period() {
        let mut cfg = PwmTimerConfig::SIX_STEP;
        cfg.channels[2].pulse = 5000;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PulseExceedsPeriod {
                channel: 3,
                pulse: 5000,
                period: 4095
            })
        );
    }

    #[test]
    fn compare_equal_to_period_is_accepted() {
        let mut cfg = PwmTimerConfig::SIX_STEP;
        cfg.channels[0].pulse = cfg.period;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_dead_time_longer_than_period() {
        let mut cfg = PwmTimerConfig::SIX_STEP;
        cfg.period = 99;
        cfg.channels = [ChannelConfig::timing(10); 3];
        // 0x80 decodes to 2 * 64 = 128 ticks
        cfg.protection.dead_time = 0x80;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DeadTimeExceedsPeriod {
                dead_time_ticks: 128,
                period_ticks: 100
            })
        );

        cfg.prescaler = 1;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn full_range_time_base_is_validated_without_overflow() {
        let mut cfg = PwmTimerConfig::SIX_STEP;
        cfg.prescaler = u16::MAX;
        cfg.period = u16::MAX;
        assert_eq!(cfg.validate(), Ok(()));

        // 65_536 * 65_536 ticks per period, still larger than any dead time
        cfg.protection.dead_time = 0xFF;
        assert_eq!(cfg.validate(), Ok(()));

        cfg.prescaler = 0;
        cfg.period = 1000;
        cfg.channels = [ChannelConfig::timing(0); 3];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DeadTimeExceedsPeriod {
                dead_time_ticks: 1008,
                period_ticks: 1001
            })
        );
    }

    #[test]
    fn rejects_lock_level_three() {
        let mut cfg = PwmTimerConfig::SIX_STEP;
        cfg.protection.lock = LockLevel::Level3;
        assert_eq!(cfg.validate(), Err(ConfigError::LockBlocksCommutation));

        cfg.protection.lock = LockLevel::Level2;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn bridge_outputs_are_fast() {
        assert_ne!(BRIDGE_OUTPUT_SPEED, OutputSpeed::Low);
        assert_ne!(BRIDGE_OUTPUT_SPEED, OutputSpeed::Medium);
    }

    #[test]
    fn polarity_bits() {
        assert!(!Polarity::ActiveHigh.ccer_bit());
        assert!(Polarity::ActiveLow.ccer_bit());
        assert!(Polarity::ActiveHigh.bkp_bit());
        assert!(!Polarity::ActiveLow.bkp_bit());
    }

    #[test]
    fn error_messages() {
        let err = ConfigError::PulseExceedsPeriod {
            channel: 1,
            pulse: 9,
            period: 8,
        };
        assert_eq!(err.to_string(), "channel 1 compare value 9 is above the period 8");
    }
}
