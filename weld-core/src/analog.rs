//! Analog input scaling

/// Raw ADC sample to a fraction of full scale, clamped to [0, 1]
pub fn adc_to_fraction(sample: u16, full_scale: u16) -> f32 {
    if full_scale == 0 {
        return 0.0;
    }

    (sample as f32 / full_scale as f32).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling() {
        assert_eq!(adc_to_fraction(0, 4095), 0.0);
        assert_eq!(adc_to_fraction(4095, 4095), 1.0);
        assert!((adc_to_fraction(2048, 4095) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_over_range_clamped() {
        assert_eq!(adc_to_fraction(4096, 4095), 1.0);
        assert_eq!(adc_to_fraction(100, 0), 0.0);
    }
}
