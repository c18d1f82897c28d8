//! Distribution of declared colors over the animated lines.

/// Number of animated lines a renderer draws.
pub const LINE_COUNT: usize = 6;

/// Spread `colors` over `final_len` slots.
///
/// Four colors over six slots use the fixed mapping `[c0, c0, c1, c1, c2, c3]`.
/// Every other combination repeats each color `ceil(final_len / n)` times
/// before moving to the next one, wrapping around the list.
pub fn spread_colors<T: Clone>(colors: &[T], final_len: usize) -> Vec<T> {
    if colors.is_empty() {
        return Vec::new();
    }

    if colors.len() == 4 && final_len == LINE_COUNT {
        return vec![
            colors[0].clone(),
            colors[0].clone(),
            colors[1].clone(),
            colors[1].clone(),
            colors[2].clone(),
            colors[3].clone(),
        ];
    }

    let repetitions = final_len.div_ceil(colors.len());
    let mut color_index = 0;
    let mut result = Vec::with_capacity(final_len);

    for i in 0..final_len {
        if i != 0 && i % repetitions == 0 {
            color_index += 1;
        }
        result.push(colors[color_index % colors.len()].clone());
    }

    result
}
