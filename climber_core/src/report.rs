use crate::search::SearchResult;

/// Narrowest chart that still leaves room for a visible bar.
const MIN_CHART_WIDTH: usize = 10;
const BAR_CHAR: char = '#';

/// Renders a search result the way the console reports it:
///
/// ```text
/// Hill climbing
///
/// Number attempts: 418
/// Time: 0.001s
/// ```
///
/// With `show_guess`, a `Password: ...` line is added before the attempt count.
pub fn format_result(label: &str, result: &SearchResult, show_guess: bool) -> String {
    let password = if show_guess {
        format!("Password: {}\n", result.final_guess)
    } else {
        String::new()
    };
    format!(
        "{label}\n\n{password}Number attempts: {}\nTime: {:.3}s",
        result.attempts,
        result.elapsed_secs()
    )
}

/// Renders time ratios as a horizontal bar chart on a logarithmic scale.
///
/// `ratios[i]` is drawn as the bar for password length `i + 1`. Bar lengths are
/// proportional to `log10(ratio)` relative to the largest ratio, out of `width`
/// cells. Ratios at or below 1 get a single cell. Each bar is annotated with
/// its ratio rounded to the nearest integer, or `n/a` when the ratio is not a
/// positive finite number.
pub fn render_ratio_chart(ratios: &[f64], width: usize) -> String {
    let width = width.max(MIN_CHART_WIDTH);
    let valid = |r: f64| r.is_finite() && r > 0.0;

    let max_log = ratios
        .iter()
        .copied()
        .filter(|&r| valid(r))
        .map(f64::log10)
        .fold(0.0_f64, f64::max);
    let label_width = format!("len {}", ratios.len()).len();

    let mut out = String::from("Brute force time / hill climbing time (log scale)\n");
    for (index, &ratio) in ratios.iter().enumerate() {
        let label = format!("len {}", index + 1);
        let (cells, annotation) = if valid(ratio) {
            let cells = if ratio <= 1.0 || max_log <= 0.0 {
                1
            } else {
                ((ratio.log10() / max_log) * width as f64).round().max(1.0) as usize
            };
            (cells, format!("{}", ratio.round()))
        } else {
            (0, "n/a".to_string())
        };
        let bar: String = std::iter::repeat_n(BAR_CHAR, cells).collect();
        out.push_str(&format!(
            "{label:>label_width$} | {bar:<width$} {annotation}\n"
        ));
    }
    out
}
