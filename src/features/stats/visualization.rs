//! Terminal charts for rollups.

use super::rollup::Rollup;
use crate::core::format_duration;

const BAR_CHARS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];
const FULL_BLOCK: char = '█';

/// Render a horizontal bar chart.
///
/// `data` is `(label, value)` pairs; `format_value` renders the number shown
/// after each bar.
pub fn render_bar_chart(
    data: &[(String, u64)],
    label_width: usize,
    bar_width: usize,
    format_value: impl Fn(u64) -> String,
) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max_value = data.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
    let mut lines = Vec::new();

    for (label, value) in data {
        let label = if label.chars().count() > label_width {
            let cut: String = label.chars().take(label_width.saturating_sub(3)).collect();
            format!("{cut}...")
        } else {
            format!("{label:label_width$}")
        };

        let bar_length = scale(*value, max_value, bar_width);
        let bar = FULL_BLOCK.to_string().repeat(bar_length);
        let padding = " ".repeat(bar_width - bar_length);

        lines.push(format!("{label} |{bar}{padding} {}", format_value(*value)));
    }

    lines.join("\n")
}

/// Render a one-line sparkline.
#[must_use]
pub fn render_sparkline(values: &[u64]) -> String {
    let max_value = values.iter().copied().max().unwrap_or(1).max(1);

    values
        .iter()
        .map(|&v| {
            if v == 0 {
                BAR_CHARS[0]
            } else {
                BAR_CHARS[scale(v, max_value, 7).clamp(1, 7)]
            }
        })
        .collect()
}

/// Work time per period as a bar chart.
#[must_use]
pub fn render_rollup_chart(rollup: &Rollup, bar_width: usize) -> String {
    let data: Vec<(String, u64)> = rollup
        .periods
        .iter()
        .map(|p| (p.period.clone(), p.work_time))
        .collect();
    let label_width = data.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    render_bar_chart(&data, label_width, bar_width, format_duration)
}

/// `value / max` of `width`, rounded down.
fn scale(value: u64, max: u64, width: usize) -> usize {
    let width = u64::try_from(width).unwrap_or(u64::MAX);
    usize::try_from(value.min(max).saturating_mul(width) / max.max(1)).unwrap_or(0)
}
