const POWER: f64 = 1000.0;
const POWER_LABELS: [&str; 5] = ["", "K", "M", "G", "T"];

fn scale(mut size: f64) -> (f64, &'static str) {
    let mut n = 0;
    while size >= POWER && n < POWER_LABELS.len() - 1 {
        size /= POWER;
        n += 1;
    }
    (size, POWER_LABELS[n])
}

/// Formats a bandwidth in bits per second, e.g. `20000000000.0` -> `"20 Gbps"`.
pub fn format_bps(size: f64) -> String {
    let (size, label) = scale(size);
    format!("{:.0} {}bps", size, label)
}

/// Same as [`format_bps`] with three decimals.
pub fn format_bps_precise(size: f64) -> String {
    let (size, label) = scale(size);
    format!("{:.3} {}bps", size, label)
}
