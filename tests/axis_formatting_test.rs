// tests/axis_formatting_test.rs

use hall_lut_analysis::plot_framework::format_axis_value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_axis_keeps_full_digits() {
        // Electrical speeds sit between a few hundred and a few thousand rad/s.
        assert_eq!(format_axis_value(500.0), "500");
        assert_eq!(format_axis_value(1000.0), "1000");
        assert_eq!(format_axis_value(1100.0), "1100");
        assert_eq!(format_axis_value(9500.0), "9500");
    }

    #[test]
    fn test_large_values_use_suffixes() {
        assert_eq!(format_axis_value(10_000.0), "10k");
        assert_eq!(format_axis_value(250_000.0), "250k");
        assert_eq!(format_axis_value(1_500_000.0), "1.5M");
        assert_eq!(format_axis_value(-20_000.0), "-20k");
    }

    #[test]
    fn test_fractional_ticks_keep_decimals() {
        // Sector angle axis ticks.
        assert_eq!(format_axis_value(62.5), "62.5");
        assert_eq!(format_axis_value(57.0), "57");
        assert_eq!(format_axis_value(0.25), "0.250");
        assert_eq!(format_axis_value(-0.005), "-0.005");
        assert_eq!(format_axis_value(0.0), "0");
    }
}
