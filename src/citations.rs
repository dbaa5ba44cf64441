use crate::data_models::CitationMap;

/// A `[n]` marker found in answer text. `start..end` spans the brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    start: usize,
    end: usize,
    number: Option<usize>,
}

/// Finds every `[digits]` run in `text`, left to right.
///
/// `number` is `None` when the digits overflow `usize`; such markers can
/// never be in range and are passed through untouched.
fn scan_markers(text: &str) -> Vec<Marker> {
    let bytes = text.as_bytes();
    let mut markers = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }
        let digits_start = i + 1;
        let mut j = digits_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start && j < bytes.len() && bytes[j] == b']' {
            markers.push(Marker {
                start: i,
                end: j + 1,
                number: text[digits_start..j].parse().ok(),
            });
            i = j + 1;
        } else {
            // resume right after this bracket so "[[1]" still finds "[1]"
            i += 1;
        }
    }
    markers
}

/// Binds `[n]` markers in `answer` to `sources[n - 1]` and annotates them.
///
/// Returns the annotated answer and the map of every in-range number that
/// was cited. Out-of-range markers are left verbatim and all other text is
/// copied unchanged.
pub fn link_citations(answer: &str, sources: &[String]) -> (String, CitationMap) {
    let markers = scan_markers(answer);

    let citation_map: CitationMap = markers
        .iter()
        .filter_map(|m| m.number)
        .filter(|n| (1..=sources.len()).contains(n))
        .map(|n| (n, sources[n - 1].clone()))
        .collect();

    let mut cited = String::with_capacity(answer.len());
    let mut cursor = 0;
    for marker in &markers {
        let Some(url) = marker.number.and_then(|n| citation_map.get(&n)) else {
            continue;
        };
        cited.push_str(&answer[cursor..marker.start]);
        cited.push_str(&citation_span(&answer[marker.start..marker.end], url));
        cursor = marker.end;
    }
    cited.push_str(&answer[cursor..]);

    (cited, citation_map)
}

fn citation_span(marker: &str, url: &str) -> String {
    // The URL lands inside two quoted attributes, so it is escaped; the
    // marker and the rest of the answer are not.
    let url = escape_attr(url);
    format!(r#"<span class="citation" data-source="{url}" title="Source: {url}">{marker}</span>"#)
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("https://s{i}.example")).collect()
    }

    #[test]
    fn test_scan_finds_markers() {
        let markers = scan_markers("a [1] b [23] c");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0], Marker { start: 2, end: 5, number: Some(1) });
        assert_eq!(markers[1], Marker { start: 8, end: 12, number: Some(23) });
    }

    #[test]
    fn test_scan_ignores_non_markers() {
        assert!(scan_markers("[] [a] [1a] [ 1] [1 ] [-1] 1] [1").is_empty());
    }

    #[test]
    fn test_scan_nested_bracket() {
        let markers = scan_markers("[[2]]");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].start, 1);
        assert_eq!(markers[0].number, Some(2));
    }

    #[test]
    fn test_out_of_range_left_verbatim() {
        let sources = vec!["https://a.example".to_string()];
        let (cited, map) = link_citations("See [1] and [3].", &sources);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1).map(String::as_str), Some("https://a.example"));
        assert_eq!(
            cited,
            "See <span class=\"citation\" data-source=\"https://a.example\" \
             title=\"Source: https://a.example\">[1]</span> and [3]."
        );
    }

    #[test]
    fn test_zero_is_never_cited() {
        let (cited, map) = link_citations("zero [0]", &urls(3));
        assert!(map.is_empty());
        assert_eq!(cited, "zero [0]");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let answer = "[2] first, [2] again, [1] once, [2] third.";
        let (cited, map) = link_citations(answer, &urls(2));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(cited.matches(r#"data-source="https://s2.example""#).count(), 3);
        assert_eq!(cited.matches(r#"data-source="https://s1.example""#).count(), 1);
        assert_eq!(cited.matches("<span").count(), 4);
    }

    #[test]
    fn test_other_text_unchanged() {
        let answer = "DIRECT ANSWER: ünïcode — text [1].\n\nSOURCES USED:\n[1], [9]";
        let (cited, _) = link_citations(answer, &urls(1));
        let span = citation_span("[1]", "https://s1.example");
        assert_eq!(cited, answer.replace("[1]", &span));
    }

    #[test]
    fn test_no_markers() {
        let (cited, map) = link_citations("nothing cited", &urls(5));
        assert_eq!(cited, "nothing cited");
        assert!(map.is_empty());
    }

    #[test]
    fn test_uncited_sources_not_mapped() {
        let (_, map) = link_citations("only [3]", &urls(5));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_overflowing_number_passthrough() {
        let answer = "huge [99999999999999999999999999]";
        let (cited, map) = link_citations(answer, &urls(2));
        assert_eq!(cited, answer);
        assert!(map.is_empty());
    }

    #[test]
    fn test_url_is_attribute_escaped() {
        let sources = vec![r#"https://a.example/?q="x"&y=<1>"#.to_string()];
        let (cited, map) = link_citations("[1]", &sources);
        assert_eq!(map[&1], sources[0]);
        assert!(cited.contains(
            r#"data-source="https://a.example/?q=&quot;x&quot;&amp;y=&lt;1&gt;""#
        ));
    }
}
