//! Helpers for decomposing engine highlight snippets into spans.

use common::text_highlight::HighlightTextSpan;

const START_TAG: &str = "{{{";
const END_TAG: &str = "}}}";

pub fn decompose_text_into_spans(text: &str) -> Vec<HighlightTextSpan> {
    let mut v = _do_decompose_text_into_spans(text);
    let mut index = 0;
    for item in v.iter_mut() {
        if item.is_highlighted {
            item.index = index;
            index += 1;
        }
    }
    v
}

/// Every marked run is its own span, so adjacent runs stay separate.
fn _do_decompose_text_into_spans(text: &str) -> Vec<HighlightTextSpan> {
    let span = |text: &str, is_highlighted: bool| HighlightTextSpan { text: text.to_string(), is_highlighted, index: 0 };

    let mut spans = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(START_TAG) {
        if open > 0 {
            spans.push(span(&rest[..open], false));
        }
        let marked = &rest[open + START_TAG.len()..];
        // an unclosed marker highlights the rest
        let close = marked.find(END_TAG).unwrap_or(marked.len());
        if close > 0 {
            spans.push(span(&marked[..close], true));
        }
        rest = marked.get(close + END_TAG.len()..).unwrap_or("");
    }
    if !rest.is_empty() {
        spans.push(span(rest, false));
    }
    spans
}


#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<(bool, String)> {
        decompose_text_into_spans(text).into_iter().map(|s| (s.is_highlighted, s.text)).collect()
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(tokens("abc"), vec![(false, "abc".to_string())]);
        assert!(tokens("").is_empty());
    }

    #[test]
    fn markers_split_the_text() {
        assert_eq!(tokens("{{{aaa}}} bbb"), vec![(true, "aaa".into()), (false, " bbb".into())]);
        assert_eq!(tokens("aaa {{{bbb}}}"), vec![(false, "aaa ".into()), (true, "bbb".into())]);
        assert_eq!(
            tokens("aaa {{{bbb}}} ccc"),
            vec![(false, "aaa ".into()), (true, "bbb".into()), (false, " ccc".into())]
        );
    }

    #[test]
    fn highlighted_spans_are_numbered() {
        let spans = decompose_text_into_spans("{{{a}}} and {{{b}}}");
        let indexes = spans.iter().filter(|s| s.is_highlighted).map(|s| s.index).collect::<Vec<_>>();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn stray_closer_is_literal() {
        assert_eq!(tokens("x }}} {{{y}}}"), vec![(false, "x }}} ".into()), (true, "y".into())]);
    }

    #[test]
    fn adjacent_markers_stay_separate_spans() {
        assert_eq!(tokens("{{{a}}}{{{b}}}"), vec![(true, "a".into()), (true, "b".into())]);
        let indexes = decompose_text_into_spans("{{{a}}}{{{b}}}").iter().map(|s| s.index).collect::<Vec<_>>();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn empty_markers_produce_nothing() {
        assert_eq!(tokens("a{{{}}}b"), vec![(false, "a".into()), (false, "b".into())]);
    }

    #[test]
    fn unclosed_marker_highlights_the_rest() {
        assert_eq!(tokens("a {{{b c"), vec![(false, "a ".into()), (true, "b c".into())]);
    }
}
