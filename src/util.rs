#[cfg(test)]
pub(crate) fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// `m:ss` for a duration in milliseconds
pub fn format_game_time(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
