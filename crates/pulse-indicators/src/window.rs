//! Window helpers shared by the indicator implementations.

/// Wrap every value as defined.
pub(crate) fn lift(data: &[f64]) -> Vec<Option<f64>> {
    data.iter().copied().map(Some).collect()
}

/// Day-over-day changes; the first position has no predecessor.
pub(crate) fn deltas(data: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(data.len());
    if !data.is_empty() {
        result.push(None);
    }
    result.extend(data.windows(2).map(|w| Some(w[1] - w[0])));
    result
}

/// Apply `f` to every full trailing window.
///
/// A window containing any undefined value produces `None`.
pub(crate) fn rolling_apply<F>(data: &[Option<f64>], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return result;
    }

    let mut buffer = Vec::with_capacity(period);
    for end in (period - 1)..data.len() {
        buffer.clear();
        buffer.extend(data[end + 1 - period..=end].iter().map_while(|v| *v));
        if buffer.len() == period {
            result[end] = Some(f(&buffer));
        }
    }

    result
}

/// Carry the last defined value forward over gaps.
pub(crate) fn forward_fill(data: &mut [Option<f64>]) {
    let mut last = None;
    for value in data.iter_mut() {
        match value {
            Some(v) => last = Some(*v),
            None => *value = last,
        }
    }
}

/// Fill leading gaps with the first defined value.
pub(crate) fn backward_fill(data: &mut [Option<f64>]) {
    let mut next = None;
    for value in data.iter_mut().rev() {
        match value {
            Some(v) => next = Some(*v),
            None => *value = next,
        }
    }
}
