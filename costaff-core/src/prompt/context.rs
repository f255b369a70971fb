// costaff-core/src/prompt/context.rs

use costaff_common::models::Document;

/// Returned when the workspace has no documents at all.
pub const NO_DOCUMENTS_SENTINEL: &str = "No company documents uploaded yet.";

/// Returned when documents exist but nothing matched or nothing fit. Distinct
/// from the empty-set sentinel so callers can tell the two states apart.
pub const NO_RELEVANT_SENTINEL: &str = "No relevant documents found.";

/// Keyword-overlap ranking of uploaded documents against one query, packed
/// into a single context string bounded by `max_chars`.
///
/// Scoring is deliberately naive: lowercase whitespace terms of length >= 4,
/// one point per term present anywhere in the lowercased text, no frequency
/// or position weighting. The descending sort is stable, so input order
/// breaks ties. Do not "improve" this; fixtures depend on the exact rule.
pub fn relevant_document_context(
    documents: &[Document],
    user_message: &str,
    max_chars: usize,
) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTS_SENTINEL.to_string();
    }

    let keywords: Vec<String> = user_message
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .map(String::from)
        .collect();

    let mut scored: Vec<(&Document, usize)> = documents
        .iter()
        .map(|doc| {
            let text = doc.content_text.as_deref().unwrap_or("").to_lowercase();
            let score = keywords.iter().filter(|kw| text.contains(kw.as_str())).count();
            (doc, score)
        })
        .collect();

    // Stable: ties keep input order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    if scored.iter().all(|(_, score)| *score == 0) {
        return NO_RELEVANT_SENTINEL.to_string();
    }

    let mut context = String::new();
    for (doc, _) in &scored {
        let text = match doc.content_text.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => continue,
        };
        let chunk = format!("\n--- {} ({}) ---\n{}\n", doc.name, doc.doc_type, text);
        // A block that does not fit whole is skipped, not truncated; and
        // since the list is ranked, nothing after it is considered either.
        if context.len() + chunk.len() > max_chars {
            break;
        }
        context.push_str(&chunk);
    }

    if context.is_empty() {
        NO_RELEVANT_SENTINEL.to_string()
    } else {
        context
    }
}
