//! Text rendering of band levels

/// Characters for vertical bar rendering (8 levels)
const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Levels at or below this many dB render as blank
pub const DISPLAY_FLOOR_DB: f64 = -60.0;

/// Map a level in dB to one bar character, `floor_db..=0` over 8 steps
fn bar_char(level_db: f64, floor_db: f64) -> char {
    let normalized = ((level_db - floor_db) / -floor_db).clamp(0.0, 1.0);
    BAR_CHARS[(normalized * 8.0).round() as usize]
}

/// One character per band, lowest band first
pub fn render_line(levels_db: &[f64]) -> String {
    levels_db
        .iter()
        .map(|&db| bar_char(db, DISPLAY_FLOOR_DB))
        .collect()
}

/// Short label for a frequency in Hz, e.g. `125`, `2.5k`
pub fn format_frequency(freq: f64) -> String {
    if freq >= 1000.0 {
        format!("{:.1}k", freq / 1000.0)
    } else {
        format!("{freq:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_levels() {
        assert_eq!(bar_char(0.0, -60.0), '█');
        assert_eq!(bar_char(6.0, -60.0), '█');
        assert_eq!(bar_char(-60.0, -60.0), ' ');
        assert_eq!(bar_char(-100.0, -60.0), ' ');
        assert_eq!(bar_char(-30.0, -60.0), '▄');
    }

    #[test]
    fn test_render_line_length() {
        let line = render_line(&[-100.0, -30.0, 0.0]);
        assert_eq!(line.chars().count(), 3);
        assert_eq!(line, " ▄█");
    }

    #[test]
    fn test_format_frequency() {
        assert_eq!(format_frequency(125.0), "125");
        assert_eq!(format_frequency(2500.0), "2.5k");
    }
}
