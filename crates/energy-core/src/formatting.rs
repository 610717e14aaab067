/// Readings above this many watt-hours are shown in kilowatt-hours.
pub const KILO_THRESHOLD_WH: f64 = 50_000.0;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use energy_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let fixed = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // `-0.0` and values that round to zero print without a sign.
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format an energy quantity in watt-hours, switching to kWh above
/// [`KILO_THRESHOLD_WH`].
///
/// # Examples
///
/// ```
/// use energy_core::formatting::format_energy;
///
/// assert_eq!(format_energy(1234.0), "1,234.0 Wh");
/// assert_eq!(format_energy(75_500.0), "75.5 kWh");
/// ```
pub fn format_energy(wh: f64) -> String {
    if wh.abs() > KILO_THRESHOLD_WH {
        format!("{} kWh", format_number(wh / 1000.0, 1))
    } else {
        format!("{} Wh", format_number(wh, 1))
    }
}

/// Format a `0.0..=1.0` fraction as a percentage with one decimal.
///
/// # Examples
///
/// ```
/// use energy_core::formatting::format_fraction;
///
/// assert_eq!(format_fraction(1.0 / 3.0), "33.3%");
/// assert_eq!(format_fraction(0.0), "0.0%");
/// ```
pub fn format_fraction(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let lead = digits.len() % 3;
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
