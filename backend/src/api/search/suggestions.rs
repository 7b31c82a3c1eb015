//! Spelling suggestions: proposal extraction and the did-you-mean diff.

use common::search_result::SuggestionToken;

use crate::db_utils::solr_utils::RawSpellcheck;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingProposal {
    /// character offsets into the original query text
    pub start_offset: usize,
    pub end_offset: usize,
    pub suggestion: String,
}

/// Proposals in engine order. Entries without offsets or without a
/// suggestion (e.g. `["correctlySpelled", false]`) are skipped.
pub fn spelling_proposals(spellcheck: Option<&RawSpellcheck>) -> Vec<SpellingProposal> {
    let Some(spellcheck) = spellcheck else {
        return Vec::new();
    };
    spellcheck
        .suggestions
        .iter()
        .filter_map(|entry| {
            let details = entry.as_array()?.get(1)?.as_object()?;
            let start_offset = details.get("startOffset")?.as_u64()? as usize;
            let end_offset = details.get("endOffset")?.as_u64()? as usize;
            let best = details.get("suggestion")?.as_array()?.first()?;
            // extended results wrap each suggestion as {"word": .., "freq": ..}
            let suggestion = best
                .as_str()
                .or_else(|| best.get("word").and_then(|w| w.as_str()))?
                .to_string();
            Some(SpellingProposal { start_offset, end_offset, suggestion })
        })
        .collect()
}

/// Walks the query left to right: untouched gaps become `Orig`, each
/// proposal becomes `Fix`. A proposal starting behind the cursor is dropped.
pub fn parse_suggestions(query: &str, proposals: &[SpellingProposal]) -> Vec<SuggestionToken> {
    let chars = query.chars().collect::<Vec<_>>();
    let slice = |from: usize, to: usize| chars[from.min(chars.len())..to.min(chars.len())].iter().collect::<String>();

    let mut reply = Vec::new();
    let mut cursor = 0;
    for proposal in proposals {
        if proposal.start_offset < cursor {
            continue;
        }
        if proposal.start_offset > cursor {
            reply.push(SuggestionToken::Orig(slice(cursor, proposal.start_offset)));
        }
        reply.push(SuggestionToken::Fix(proposal.suggestion.clone()));
        cursor = proposal.end_offset.max(proposal.start_offset);
    }
    if cursor < chars.len() {
        reply.push(SuggestionToken::Orig(slice(cursor, chars.len())));
    }
    reply
}

pub fn corrected_query(tokens: &[SuggestionToken]) -> String {
    tokens.iter().map(SuggestionToken::text).collect()
}
