//! Rig configuration
//!
//! Every tunable of the firmware lives in [`RigConfig`]. The defaults match
//! the welding rig as built.

pub const BLINK_PERIOD_MS: u64 = 500;
pub const STATUS_PERIOD_MS: u64 = 500;
pub const RUN_DUTY: f32 = 0.7;
pub const SERIAL_BAUD: u32 = 250_000;
pub const ENCODER_COUNTS_PER_REV: u32 = 1848 * 4; // 1848 lines, X4 decoding
pub const ENCODER_SAMPLE_MS: u64 = 25;
pub const RATED_RPM: f32 = 120.0;
pub const SPEED_REF_SAMPLE_MS: u64 = 50;
pub const ADC_FULL_SCALE: u16 = 4095;
pub const BUTTON_DEBOUNCE_MS: u64 = 20;
pub const LCD_ADDRESS: u8 = 0x27;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Run duty is not within [0, 1]
    DutyOutOfRange,
    /// A timer period is zero
    ZeroPeriod,
    /// Encoder resolution is zero
    ZeroEncoderCounts,
    /// Rated speed is zero, negative or not a number
    InvalidRatedSpeed,
    /// ADC full scale is zero
    ZeroAdcScale,
}

/// Quadrature encoder sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Counts per output shaft revolution after decoding
    pub counts_per_rev: u32,
    /// Sampling period in ms
    pub sample_ms: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            counts_per_rev: ENCODER_COUNTS_PER_REV,
            sample_ms: ENCODER_SAMPLE_MS,
        }
    }
}

/// Complete rig configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RigConfig {
    /// Motor LED blink period while the motor is not steady
    pub blink_period_ms: u64,
    /// Status report period
    pub status_period_ms: u64,
    /// Duty commanded by the fixed-duty controller
    pub run_duty: f32,
    /// Serial monitor baudrate
    pub serial_baud: u32,
    pub encoder: EncoderConfig,
    /// Motor speed at full reference, in rpm
    pub rated_rpm: f32,
    /// Potentiometer sampling period
    pub speed_ref_sample_ms: u64,
    /// Raw ADC value of a full-scale reading
    pub adc_full_scale: u16,
    /// Button settle time after a handled press (0 disables)
    pub button_debounce_ms: u64,
    /// 7-bit address of the LCD backpack
    pub lcd_address: u8,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            blink_period_ms: BLINK_PERIOD_MS,
            status_period_ms: STATUS_PERIOD_MS,
            run_duty: RUN_DUTY,
            serial_baud: SERIAL_BAUD,
            encoder: EncoderConfig::default(),
            rated_rpm: RATED_RPM,
            speed_ref_sample_ms: SPEED_REF_SAMPLE_MS,
            adc_full_scale: ADC_FULL_SCALE,
            button_debounce_ms: BUTTON_DEBOUNCE_MS,
            lcd_address: LCD_ADDRESS,
        }
    }
}

impl RigConfig {
    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.run_duty) {
            return Err(ConfigError::DutyOutOfRange);
        }

        if self.blink_period_ms == 0
            || self.status_period_ms == 0
            || self.encoder.sample_ms == 0
            || self.speed_ref_sample_ms == 0
        {
            return Err(ConfigError::ZeroPeriod);
        }

        if self.encoder.counts_per_rev == 0 {
            return Err(ConfigError::ZeroEncoderCounts);
        }

        if self.rated_rpm.is_nan() || self.rated_rpm <= 0.0 {
            return Err(ConfigError::InvalidRatedSpeed);
        }

        if self.adc_full_scale == 0 {
            return Err(ConfigError::ZeroAdcScale);
        }

        Ok(())
    }

    /// Validated configuration, or the defaults with the reason they were used
    pub fn or_default(self) -> (Self, Option<ConfigError>) {
        match self.validate() {
            Ok(()) => (self, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}
