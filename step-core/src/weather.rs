//! Temperature to color mapping for the initial piece color.

use twostep_types::Color;

/// Map a temperature in °C to the piece color.
///
/// `<10` blue, `[10, 20)` green, `[20, 30)` yellow, `≥30` red. A reading
/// that fits none of these (NaN) leaves the piece white.
pub fn color_for_temperature(celsius: f64) -> Color {
    if celsius < 10.0 {
        Color::Blue
    } else if celsius < 20.0 {
        Color::Green
    } else if celsius < 30.0 {
        Color::Yellow
    } else if celsius >= 30.0 {
        Color::Red
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_half_open() {
        assert_eq!(color_for_temperature(-5.0), Color::Blue);
        assert_eq!(color_for_temperature(9.9), Color::Blue);
        assert_eq!(color_for_temperature(10.0), Color::Green);
        assert_eq!(color_for_temperature(19.9), Color::Green);
        assert_eq!(color_for_temperature(20.0), Color::Yellow);
        assert_eq!(color_for_temperature(29.9), Color::Yellow);
        assert_eq!(color_for_temperature(30.0), Color::Red);
        assert_eq!(color_for_temperature(45.0), Color::Red);
    }

    #[test]
    fn nan_stays_white() {
        assert_eq!(color_for_temperature(f64::NAN), Color::White);
    }
}
