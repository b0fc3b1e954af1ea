/// Mean of millisecond samples, rounded to the nearest millisecond.
pub fn mean_ms(samples: &[u64]) -> Option<u64> {
    let sum = samples.iter().sum::<u64>();
    let count = samples.len() as u64;

    match count {
        positive if positive > 0 => Some((sum + count / 2) / count),
        _ => None,
    }
}

/// Millisecond counts the way the HUD prints them: whole milliseconds
/// below one second, tenths of a second from there up.
pub fn format_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{}.{}s", ms / 1000, ms % 1000 / 100)
    }
}
