use itertools::Itertools;

use crate::Item;

/// The largest number of items a single `low-high` range may expand to.
///
/// Far above any processor or NUMA node count the kernel supports, low enough that a corrupted
/// range such as `0-4294967295` is rejected instead of exhausting memory.
pub const MAX_RANGE_LEN: Item = 1 << 20;

/// Parses a [cpulist][crate] and returns the numeric items in ascending order, removing duplicates.
///
/// An empty string is valid input and returns an empty result. Overlapping ranges are accepted.
///
/// # Errors
///
/// Returns [`Error::InvalidSyntax`][crate::Error::InvalidSyntax] naming the first offending
/// token if any token is empty, is not a decimal integer, is a range whose start is greater than
/// its end, is a range of more than [`MAX_RANGE_LEN`] items or has more than two hyphen-separated
/// parts.
pub fn parse(cpulist: &str) -> crate::Result<Vec<Item>> {
    if cpulist.is_empty() {
        return Ok(vec![]);
    }

    let item_ranges: crate::Result<Vec<Vec<Item>>> = cpulist.split(',').map(parse_part).collect();

    item_ranges.map(|x| x.into_iter().flatten().sorted_unstable().dedup().collect())
}

fn parse_part(part: &str) -> crate::Result<Vec<Item>> {
    let bounds = part.split('-').collect::<Vec<_>>();

    match bounds.as_slice() {
        [single] => parse_item(single, part, "item").map(|item| vec![item]),
        [range_start, range_end_inc] => parse_range(part, range_start, range_end_inc),
        _ => Err(crate::Error::new(
            part,
            "a range must have exactly one start and one end",
        )),
    }
}

fn parse_range(part: &str, range_start: &str, range_end_inc: &str) -> crate::Result<Vec<Item>> {
    let range_start = parse_item(range_start, part, "range start")?;
    let range_end_inc = parse_item(range_end_inc, part, "range end")?;

    if range_start > range_end_inc {
        return Err(crate::Error::new(part, "range start must be <= end"));
    }

    if range_end_inc.saturating_sub(range_start) >= MAX_RANGE_LEN {
        return Err(crate::Error::new(
            part,
            format!("a range must not span more than {MAX_RANGE_LEN} items"),
        ));
    }

    Ok((range_start..=range_end_inc).collect())
}

fn parse_item(value: &str, part: &str, role: &str) -> crate::Result<Item> {
    if value.is_empty() {
        return Err(crate::Error::new(part, format!("{role} is missing")));
    }

    // `u32::from_str` tolerates a leading '+', which the kernel never emits.
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(crate::Error::new(
            part,
            format!("{role} must consist of decimal digits only"),
        ));
    }

    value.parse::<Item>().map_err(|inner| {
        crate::Error::caused_by(
            part,
            format!("{role} could not be parsed as an integer"),
            inner,
        )
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parse_smoke_test() {
        assert_eq!(parse("").unwrap(), Vec::<Item>::new());

        assert_eq!(parse("555").unwrap(), vec![555]);

        assert_eq!(parse("0,1,2,3").unwrap(), vec![0, 1, 2, 3]);

        assert_eq!(parse("2,3,1").unwrap(), vec![1, 2, 3]);

        assert_eq!(parse("0-5,1-6").unwrap(), vec![0, 1, 2, 3, 4, 5, 6]);

        assert_eq!(parse("0-0,1-1,3-3").unwrap(), vec![0, 1, 3]);

        assert_eq!(parse("0-3,8,12-15").unwrap(), vec![0, 1, 2, 3, 8, 12, 13, 14, 15]);
    }

    #[test]
    fn single_range() {
        assert_eq!(parse("14-27").unwrap(), (14..=27).collect::<Vec<_>>());
    }

    #[test]
    fn two_socket_node() {
        let cores = parse("0-17,36-53").unwrap();

        assert_eq!(cores.len(), 36);
        assert_eq!(cores, (0..=17).chain(36..=53).collect::<Vec<_>>());
    }

    #[test]
    fn overlapping_ranges_are_deduplicated() {
        assert_eq!(
            parse("36-53,0-17,10-40").unwrap(),
            (0..=53).collect::<Vec<_>>()
        );
    }

    #[test]
    fn range_direction_fail_is_error() {
        parse("2-1").unwrap_err();
    }

    #[test]
    fn oversized_range_is_error() {
        let error = parse("0-3,0-4294967295").unwrap_err();

        let crate::Error::InvalidSyntax { invalid_value, .. } = error;
        assert_eq!(invalid_value, "0-4294967295");

        parse(&format!("5-{}", MAX_RANGE_LEN + 5)).unwrap_err();
    }

    #[test]
    fn largest_range_is_accepted() {
        let items = parse(&format!("5-{}", MAX_RANGE_LEN + 4)).unwrap();

        assert_eq!(items.len(), MAX_RANGE_LEN as usize);
    }

    #[test]
    fn too_many_hyphens_is_error() {
        let error = parse("0-3,1-2-3").unwrap_err();

        assert!(error.to_string().contains("'1-2-3'"));
    }

    #[test]
    fn garbage_is_error() {
        parse("foo").unwrap_err();
        parse("123-foo").unwrap_err();
        parse("foo-123").unwrap_err();
        parse("-5").unwrap_err();
        parse("5-").unwrap_err();
        parse("+5").unwrap_err();
        parse(" 5").unwrap_err();
        parse("5\n").unwrap_err();
        parse("99999999999").unwrap_err();
    }

    #[test]
    fn empty_token_is_error() {
        parse("1,,2").unwrap_err();
        parse("1,").unwrap_err();
        parse(",").unwrap_err();
    }

    #[test]
    fn error_identifies_token() {
        let error = parse("0-3,x").unwrap_err();

        let crate::Error::InvalidSyntax { invalid_value, .. } = error;
        assert_eq!(invalid_value, "x");
    }
}
