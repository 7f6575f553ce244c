//! The six-step output table.
//!
//! Each step drives one main output (CHx, high side) and one complementary
//! output (CHyN, low side) on two different phases; the third phase floats.
//!
//! ```text
//!              | Step1 | Step2 | Step3 | Step4 | Step5 | Step6 |
//!   Channel1   |  PWM  |   0   |   0   |   0   |   0   |  PWM  |
//!   Channel1N  |   0   |   0   |  PWM  |  PWM  |   0   |   0   |
//!   Channel2   |   0   |   0   |   0   |  PWM  |  PWM  |   0   |
//!   Channel2N  |  PWM  |  PWM  |   0   |   0   |   0   |   0   |
//!   Channel3   |   0   |  PWM  |  PWM  |   0   |   0   |   0   |
//!   Channel3N  |   0   |   0   |   0   |   0   |  PWM  |  PWM  |
//! ```

use crate::config::OutputCompareMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Ch1,
    Ch2,
    Ch3,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Ch1, Channel::Ch2, Channel::Ch3];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Which outputs of each channel are driven during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepOutputs {
    /// CC1E, CC2E, CC3E
    pub main: [bool; 3],
    /// CC1NE, CC2NE, CC3NE
    pub complementary: [bool; 3],
}

impl StepOutputs {
    const fn new(main: Channel, complementary: Channel) -> Self {
        let mut outputs = Self {
            main: [false; 3],
            complementary: [false; 3],
        };
        outputs.main[main.index()] = true;
        outputs.complementary[complementary.index()] = true;
        outputs
    }

    pub fn is_driven(&self, channel: Channel) -> bool {
        self.main[channel.index()] || self.complementary[channel.index()]
    }

    /// Output compare mode to preload for `channel`. Driven channels run in
    /// PWM mode 1, the floating one is frozen with both outputs disabled.
    pub fn mode(&self, channel: Channel) -> OutputCompareMode {
        if self.is_driven(channel) {
            OutputCompareMode::Pwm1
        } else {
            OutputCompareMode::Timing
        }
    }
}

pub const SIX_STEP_TABLE: [StepOutputs; 6] = [
    StepOutputs::new(Channel::Ch1, Channel::Ch2),
    StepOutputs::new(Channel::Ch3, Channel::Ch2),
    StepOutputs::new(Channel::Ch3, Channel::Ch1),
    StepOutputs::new(Channel::Ch2, Channel::Ch1),
    StepOutputs::new(Channel::Ch2, Channel::Ch3),
    StepOutputs::new(Channel::Ch1, Channel::Ch3),
];

/// Simple wrapper for the numbers 0 to 5
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorStep {
    step: u8,
}

impl Default for MotorStep {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorStep {
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    pub fn next(&mut self) {
        self.step = (self.step + 1) % 6;
    }

    pub fn prev(&mut self) {
        self.step = (self.step + 5) % 6;
    }

    /// Zero-based step number.
    pub fn index(&self) -> u8 {
        self.step
    }

    pub fn outputs(&self) -> &'static StepOutputs {
        &SIX_STEP_TABLE[usize::from(self.step)]
    }
}
