use crate::matrix::ScoreMatrix;

/// Index of the largest value; ties go to the first occurrence. `NaN` never wins.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// For each source row, the candidate with the highest score.
pub fn best_per_source(scores: &ScoreMatrix, candidates: &[String]) -> Vec<String> {
    scores
        .iter_rows()
        .filter_map(|row| argmax_first(row).and_then(|idx| candidates.get(idx)))
        .cloned()
        .collect()
}
