//! Label and coordinate formatting

use crate::measurement::MeasurementKind;
use crate::units::{Dimension, Unit};

/// Format a measured value for display: `"3.66 m"`, `"12.00 m²"`, `"90.00°"`
pub fn format_value(value: f64, unit: Unit, kind: MeasurementKind, precision: usize) -> String {
    match kind.dimension() {
        Dimension::Length => format!("{value:.precision$} {}", unit.suffix()),
        Dimension::Area => format!("{value:.precision$} {}²", unit.suffix()),
        Dimension::Angle => format!("{value:.precision$}°"),
    }
}

/// Six significant figures with trailing zeros trimmed, like C's `%g`
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return if value.is_finite() { "0".to_string() } else { value.to_string() };
    }

    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
