/// Converts a raw confidence score of unknown scale into a whole percentage.
///
/// The predict endpoint and the stored history have been seen reporting
/// fractions and percentages respectively, so a score inside `[0, 1]` is read
/// as a fraction and anything else as an already-scaled percentage. The
/// result is always clamped to `[0, 100]`; `1.0` counts as a fraction.
pub fn normalize_confidence(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }

    let percent = if (0.0..=1.0).contains(&score) {
        (score * 100.0).round()
    } else {
        score.round()
    };

    percent.clamp(0.0, 100.0) as u8
}
