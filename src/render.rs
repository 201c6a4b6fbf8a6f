use crate::types::Pattern;

const MAX_WIDTH: f64 = 80.0;

/// Draws one stock piece as a scaled bar: each cut is a labelled segment,
/// leftover material (kerf included) is shown as dots.
pub fn render_pattern(pattern: &Pattern, kerf: u32) -> String {
    if pattern.stock_length == 0 {
        return String::new();
    }
    let scale = MAX_WIDTH / pattern.stock_length as f64;
    let bar_w = (pattern.stock_length as f64 * scale).round() as usize;

    let mut bar = vec!['.'; bar_w + 1];
    bar[0] = '|';
    bar[bar_w] = '|';

    let mut offset: u64 = 0;
    for (i, &cut) in pattern.cuts.iter().enumerate() {
        if i > 0 {
            offset += kerf as u64;
        }
        let sx = (offset as f64 * scale).round() as usize;
        let ex = ((offset + cut as u64) as f64 * scale).round() as usize;
        draw_segment(&mut bar, sx.min(bar_w), ex.min(bar_w), cut);
        offset += cut as u64;
    }

    let border: String = std::iter::once('+')
        .chain(std::iter::repeat_n('-', bar_w.saturating_sub(1)))
        .chain(std::iter::once('+'))
        .collect();
    let line: String = bar.iter().collect();

    let mut result = String::new();
    result.push_str(&border);
    result.push('\n');
    result.push_str(&line);
    result.push('\n');
    result.push_str(&border);
    result.push('\n');
    result
}

fn draw_segment(bar: &mut [char], sx: usize, ex: usize, cut: u32) {
    for cell in bar.iter_mut().take(ex).skip(sx + 1) {
        *cell = ' ';
    }
    bar[sx] = '|';
    bar[ex] = '|';

    // Label, only when it fits between the edges
    let label: Vec<char> = cut.to_string().chars().collect();
    let inner = ex.saturating_sub(sx + 1);
    if inner >= label.len() {
        let start = sx + 1 + (inner - label.len()) / 2;
        for (i, &ch) in label.iter().enumerate() {
            bar[start + i] = ch;
        }
    }
}
