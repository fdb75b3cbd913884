//! End-to-end scenarios driven through the public `Regex` facade rather
//! than the internal pipeline stages.

use brex::Regex;

fn find<'i>(pattern: &str, input: &'i [u8]) -> Option<(&'i [u8], Vec<Option<&'i [u8]>>)> {
    let re = Regex::new(pattern).unwrap();
    re.find(input).map(|m| {
        let whole = m.as_bytes(input);
        let groups = m
            .groups()
            .iter()
            .map(|g| g.map(|(s, e)| &input[s..e]))
            .collect();
        (whole, groups)
    })
}

#[test]
fn literal() {
    let (whole, groups) = find("a", b"a").unwrap();
    assert_eq!(whole, b"a");
    assert!(groups.is_empty());
}

#[test]
fn one_or_more() {
    let (whole, _) = find("a+", b"aaaaaaa").unwrap();
    assert_eq!(whole, b"aaaaaaa");
}

#[test]
fn optional_group_can_be_absent() {
    let (whole, groups) = find("(a|b)?c", b"c").unwrap();
    assert_eq!(whole, b"c");
    assert_eq!(groups[0], None);
}

#[test]
fn nested_groups() {
    let (whole, groups) = find("((.).)", b"ab").unwrap();
    assert_eq!(whole, b"ab");
    assert_eq!(groups[0], Some(&b"ab"[..]));
    assert_eq!(groups[1], Some(&b"a"[..]));
}

#[test]
fn end_anchor() {
    assert!(find("0x[0-9a-f]+$", b"0xdeadbeef").is_some());
    assert!(find("0x[0-9a-f]+$", b"0xcodecafe").is_none());
}

#[test]
fn lazy_quantifier_stops_at_first_opportunity() {
    let (whole, groups) = find("<(.+?)>", b"<html>xyz</html>").unwrap();
    assert_eq!(whole, b"<html>");
    assert_eq!(groups[0], Some(&b"html"[..]));
}

#[test]
fn nested_star_on_empty_and_nonempty_input() {
    let (whole, groups) = find("(a*)*", b"aaaa").unwrap();
    assert_eq!(whole, b"aaaa");
    assert_eq!(groups[0], Some(&b"aaaa"[..]));

    let (whole, groups) = find("(a*)*", b"").unwrap();
    assert_eq!(whole, b"");
    assert_eq!(groups[0], None);
}

#[test]
fn unanchored_search_skips_leading_digits() {
    let (whole, groups) = find(r"\d+(...)", b"12345abc").unwrap();
    assert_eq!(whole, b"12345abc");
    assert_eq!(groups[0], Some(&b"abc"[..]));
}

#[test]
fn capture_containment() {
    let re = Regex::new(r"(\w+)\s(\w+)").unwrap();
    let input = b"hello world";
    let m = re.find(input).unwrap();
    let (ws, we) = m.whole();
    for g in m.groups() {
        let (gs, ge) = g.unwrap();
        assert!(gs >= ws && ge <= we);
        assert_eq!(&input[gs..ge], &input[gs..ge]);
    }
}

#[test]
fn round_trip_captures_concatenate_within_whole_match() {
    let re = Regex::new(r"(\w+)-(\w+)").unwrap();
    let input = b"foo-bar";
    let m = re.find(input).unwrap();
    let g1 = m.group(1).unwrap();
    let g2 = m.group(2).unwrap();
    let mut reconstructed = Vec::new();
    reconstructed.extend_from_slice(&input[g1.0..g1.1]);
    reconstructed.push(b'-');
    reconstructed.extend_from_slice(&input[g2.0..g2.1]);
    assert_eq!(reconstructed, m.as_bytes(input));
}

#[test]
fn invalid_pattern_reports_compile_error() {
    assert!(Regex::new("(unclosed").is_err());
    assert!(Regex::new("[z-a]").is_err());
    assert!(Regex::new(r"trailing\").is_err());
}

#[test]
fn list_and_alternation_agree_on_single_byte_match() {
    for b in 0u8..=255 {
        let input = [b];
        let class = find("[ab01]", &input).map(|(w, _)| w.to_vec());
        let alt = find("a|b|0|1", &input).map(|(w, _)| w.to_vec());
        assert_eq!(class, alt, "byte {:?} disagreed", b as char);
    }
}
