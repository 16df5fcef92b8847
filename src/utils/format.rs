/// Formátuje číslo s oddělovači pro lepší čitelnost
/// Příklad: 1234567 -> "1 234 567"
pub fn format_number(num: u64) -> String {
    let num_str = num.to_string();
    let mut result = String::with_capacity(num_str.len() + num_str.len() / 3);

    for (count, c) in num_str.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(' ');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

/// Formátuje znaménkovou deltu, např. "+1 200" nebo "-35"
pub fn format_delta(delta: i64) -> String {
    let sign = if delta < 0 { "-" } else { "+" };
    format!("{}{}", sign, format_number(delta.unsigned_abs()))
}

/// Formátuje velikost v bytech na human-readable formát
/// Příklad: 1024 -> "1.00 KB", 1048576 -> "1.00 MB"
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= 1024.0 && exp < UNITS.len() - 1 {
        value /= 1024.0;
        exp += 1;
    }

    // Nad 100 bez desetinných míst
    if value >= 100.0 {
        format!("{:.0} {}", value, UNITS[exp])
    } else if value >= 10.0 {
        format!("{:.1} {}", value, UNITS[exp])
    } else {
        format!("{:.2} {}", value, UNITS[exp])
    }
}

/// Formátuje uptime v milisekundách, např. "3d 4h", "12m 5s"
pub fn format_uptime(millis: u64) -> String {
    let secs = millis / 1000;
    let (days, hours, mins) = (secs / 86_400, (secs % 86_400) / 3600, (secs % 3600) / 60);

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
