// Display strings for rates, sizes and durations

const KIB: f64 = 1024.0;
const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// KB/s with one decimal below 1024 KB/s, MB/s with two decimals above. Zero reads "0.0 MB/s".
pub fn format_rate(bytes_per_sec: f64) -> String {
    if bytes_per_sec == 0.0 || bytes_per_sec.is_nan() {
        return "0.0 MB/s".into();
    }
    let kb = bytes_per_sec / KIB;
    if kb < KIB {
        return format!("{:.1} KB/s", kb);
    }
    format!("{:.2} MB/s", bytes_per_sec / (KIB * KIB))
}

/// Largest unit in B..GB keeping the value >= 1, one decimal, no separator ("1.5KB").
pub fn format_bytes(bytes: f64) -> String {
    if bytes == 0.0 || bytes.is_nan() {
        return "0".into();
    }
    let mut value = bytes;
    let mut unit = 0;
    while value.abs() >= KIB && unit < BYTE_UNITS.len() - 1 {
        value /= KIB;
        unit += 1;
    }
    format!("{:.1}{}", value, BYTE_UNITS[unit])
}

pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}
