// src/data_analysis/edge_detection.rs

use crate::constants::EDGE_THRESHOLD;

/// Finds indices where an interrupt-indicator signal goes from low to high.
/// Index `i` is reported when `signal[i - 1] <= 0.5` and `signal[i] > 0.5`.
/// Empty or single-sample input yields no edges.
pub fn find_rising_edges(signal: &[f64]) -> Vec<usize> {
    signal
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] <= EDGE_THRESHOLD && pair[1] > EDGE_THRESHOLD)
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a step sequence of `len` samples from (index, value) transitions.
    fn step_sequence(len: usize, transitions: &[(usize, f64)]) -> Vec<f64> {
        let mut out = vec![0.0; len];
        let mut value = 0.0;
        let mut next = transitions.iter().peekable();
        for (i, slot) in out.iter_mut().enumerate() {
            while let Some(&&(idx, v)) = next.peek() {
                if idx == i {
                    value = v;
                    next.next();
                } else {
                    break;
                }
            }
            *slot = value;
        }
        out
    }

    #[test]
    fn test_reports_only_low_to_high_transitions() {
        let signal = step_sequence(20, &[(3, 1.0), (6, 0.0), (10, 1.0), (11, 1.0), (15, 0.0), (18, 1.0)]);
        assert_eq!(find_rising_edges(&signal), vec![3, 10, 18]);
    }

    #[test]
    fn test_threshold_is_inclusive_on_low_side() {
        // 0.5 counts as low, so 0.5 -> 0.6 is an edge but 0.4 -> 0.5 is not.
        assert_eq!(find_rising_edges(&[0.4, 0.5, 0.6, 0.5, 0.5]), vec![2]);
    }

    #[test]
    fn test_high_at_start_is_not_an_edge() {
        assert_eq!(find_rising_edges(&[1.0, 1.0, 0.0, 1.0]), vec![3]);
    }

    #[test]
    fn test_degenerate_input() {
        assert!(find_rising_edges(&[]).is_empty());
        assert!(find_rising_edges(&[1.0]).is_empty());
        assert!(find_rising_edges(&[0.0, 0.0, 0.0]).is_empty());
    }
}
