pub mod csv;
pub mod table;

use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Display rounding; computations never round.
pub fn format_average(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::{format_average, render_json};

    #[test]
    fn rounds_only_for_display() {
        assert_eq!(format_average(73.333_333, 2), "73.33");
        assert_eq!(format_average(95.0, 0), "95");
        assert_eq!(format_average(77.5, 3), "77.500");
    }

    #[test]
    fn renders_pretty_json() {
        let json = render_json(&vec![1, 2]).expect("render failed");
        assert!(json.contains('\n'));
    }
}
