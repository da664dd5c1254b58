//! Natural ordering of folder and file names: `results_2` before `results_10`.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(make_chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(make_chunk(&s[start..], prev));
    }
    out
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

/// Compares two digit runs by numeric value without overflowing on long runs.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
}

fn cmp_chunk(a: &Chunk<'_>, b: &Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
        (Chunk::Text(x), Chunk::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        // Digits sort before text, like an int-vs-str key where numbers lead.
        (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
    }
}

/// Natural comparison: digit runs compare as integers, text runs case-insensitively.
///
/// Names equal under that rule fall back to plain byte order so the result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (chunks(a), chunks(b));
    ca.iter()
        .zip(cb.iter())
        .map(|(x, y)| cmp_chunk(x, y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or_else(|| ca.len().cmp(&cb.len()))
        .then_with(|| a.cmp(b))
}

/// Sorts `items` naturally by the name `key` returns. Stable.
pub fn natural_sort_by_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_sort_results_folders() {
        let mut names = vec!["results_2", "results_10", "results_1"];
        natural_sort_by_key(&mut names, |s| s);
        assert_eq!(names, vec!["results_1", "results_2", "results_10"]);
    }

    #[test]
    fn test_natural_sort_parameter_tuples() {
        let mut names = vec![
            "results_100_500_0.8_0.1_1000_0.99_50",
            "results_50_500_0.8_0.1_1000_0.99_50",
            "results_50_1000_0.8_0.1_1000_0.99_50",
        ];
        natural_sort_by_key(&mut names, |s| s);
        assert_eq!(
            names,
            vec![
                "results_50_500_0.8_0.1_1000_0.99_50",
                "results_50_1000_0.8_0.1_1000_0.99_50",
                "results_100_500_0.8_0.1_1000_0.99_50",
            ]
        );
    }

    #[test]
    fn test_case_insensitive_text() {
        assert_eq!(natural_cmp("PSO_data", "de_data"), Ordering::Greater);
        assert_eq!(natural_cmp("a", "A"), Ordering::Greater);
    }

    #[test]
    fn test_long_digit_runs() {
        assert_eq!(
            natural_cmp("run_99999999999999999999999", "run_100000000000000000000000"),
            Ordering::Less
        );
        assert_eq!(natural_cmp("run_007", "run_7"), Ordering::Less);
    }

    #[test]
    fn test_dimension_names() {
        let mut names = vec!["30D", "2D", "10D"];
        natural_sort_by_key(&mut names, |s| s);
        assert_eq!(names, vec!["2D", "10D", "30D"]);
    }
}
