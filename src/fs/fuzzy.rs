//! Approximate partial-substring scoring.
//!
//! The shorter string is slid across the longer one; each equally long window
//! is compared with a character diff and the best similarity wins. Plain
//! substring containment short-circuits to 100.

use similar::{Algorithm, TextDiff};

/// Scores how well `query` appears inside `candidate`, from 0 to 100.
///
/// Case-insensitive. Returns 0 when either side is empty.
pub fn partial_ratio(query: &str, candidate: &str) -> u8 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    let (short, long) = if query.chars().count() <= candidate.chars().count() {
        (query.as_str(), candidate.as_str())
    } else {
        (candidate.as_str(), query.as_str())
    };

    if short.is_empty() {
        return 0;
    }
    if long.contains(short) {
        return 100;
    }

    // Byte offsets of every char boundary in `long`, including the end.
    let bounds: Vec<usize> = long.char_indices().map(|(i, _)| i).chain(std::iter::once(long.len())).collect();
    let width = short.chars().count();
    let long_len = bounds.len() - 1;

    let mut best = 0.0f32;
    for start in 0..=(long_len - width) {
        let window = &long[bounds[start]..bounds[start + width]];
        let r = ratio(short, window);
        if r > best {
            best = r;
        }
    }

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}

fn ratio(a: &str, b: &str) -> f32 {
    TextDiff::configure().algorithm(Algorithm::Myers).diff_chars(a, b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_scores_full_marks() {
        assert_eq!(partial_ratio("hello", "hello_world.txt"), 100);
        assert_eq!(partial_ratio("world", "hello_world.txt"), 100);
        assert_eq!(partial_ratio("hello_world.txt", "hello_world.txt"), 100);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(partial_ratio("README", "readme.md"), 100);
        assert_eq!(partial_ratio("cargo", "Cargo.toml"), 100);
    }

    #[test]
    fn transposed_letters_still_score_high() {
        let score = partial_ratio("hlelo", "hello_world.txt");
        assert!(score >= 60, "score was {}", score);
        assert!(score < 100);
    }

    #[test]
    fn unrelated_names_score_low() {
        assert!(partial_ratio("xyz", "a_file.txt") < 40);
        assert!(partial_ratio("xyz", "z_file.txt") < 40);
        assert!(partial_ratio("zzzzzznotfound", "test.txt") < 40);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(partial_ratio("", "anything"), 0);
        assert_eq!(partial_ratio("anything", ""), 0);
    }

    #[test]
    fn longer_query_is_slid_over_shorter_name() {
        // The name becomes the needle when it is the shorter side.
        assert_eq!(partial_ratio("my_notes_folder", "notes"), 100);
    }

    #[test]
    fn handles_multibyte_names() {
        assert_eq!(partial_ratio("über", "Übersicht.pdf"), 100);
        let score = partial_ratio("übrs", "Übersicht.pdf");
        assert!(score >= 60 && score < 100, "score was {}", score);
    }
}
