use itertools::Itertools;

use crate::Item;

/// Generates a cpulist in a format that can be parsed by [`parse()`][crate::parse].
///
/// Items are sorted and deduplicated. Runs of three or more consecutive items are emitted as a
/// range, shorter runs as individual items, which matches what the kernel writes into sysfs.
#[must_use]
pub fn emit<'a>(items: impl IntoIterator<Item = &'a Item>) -> String {
    items
        .into_iter()
        .copied()
        .sorted_unstable()
        .dedup()
        .map(|item| (item, item))
        .coalesce(|(start, end), (next, _)| {
            if end.checked_add(1) == Some(next) {
                Ok((start, next))
            } else {
                Err(((start, end), (next, next)))
            }
        })
        .map(|(start, end)| match end.saturating_sub(start) {
            0 => start.to_string(),
            1 => format!("{start},{end}"),
            _ => format!("{start}-{end}"),
        })
        .join(",")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn emit_smoke_test() {
        assert_eq!(emit(&[]), "");

        assert_eq!(emit(&[555]), "555");

        assert_eq!(emit(&[555, 666]), "555,666");

        assert_eq!(emit(&[0, 1, 2, 3]), "0-3");

        assert_eq!(emit(&[0, 1, 2, 3, 6, 7, 8, 11, 12, 13]), "0-3,6-8,11-13");

        assert_eq!(emit(&[0, 1, 3]), "0,1,3");

        assert_eq!(emit(&[3, 1, 2, 2, 1]), "1-3");
    }

    #[test]
    fn handles_max_item() {
        assert_eq!(emit(&[Item::MAX - 1, Item::MAX]), format!("{},{}", Item::MAX - 1, Item::MAX));
    }

    #[test]
    fn emitted_text_parses_back() {
        let cores = (0..=17).chain(36..=53).chain([60, 62]).collect::<Vec<_>>();

        let text = emit(&cores);

        assert_eq!(text, "0-17,36-53,60,62");
        assert_eq!(crate::parse(&text).unwrap(), cores);
    }
}
