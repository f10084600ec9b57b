//! The body assembler (spec §4.8): turns the reconstructed, labeled
//! document into the final extracted body text.
//!
//! Pipeline within this stage: locate the signature boundary, split the
//! region before it into blocks at hard breaks (forward/reply headers —
//! visual separators are neutral filler, same as OTHER-labeled lines),
//! trim leading/trailing quote runs off each block while keeping inline
//! quotes and absorbing OTHER-labeled filler lines, then select the body:
//! when a signature was found, concatenate every block in order and trim
//! leading/trailing blank and OTHER filler from the result; otherwise pick
//! the longest block in the document.

use crate::model::{AssembledBody, Label, ReconstructedDocument, ReconstructedLine};
use crate::patterns::is_forward_reply_header;

/// Runs the body assembler over a reconstructed document.
pub fn assemble_body(doc: &ReconstructedDocument) -> AssembledBody {
    let signature_index = doc
        .lines
        .iter()
        .find(|l| !l.is_blank && l.label == Some(Label::Signature))
        .map(|l| l.original_index);

    let candidate_end = signature_index.unwrap_or(doc.line_count());
    let candidates: Vec<&ReconstructedLine> = doc
        .lines
        .iter()
        .filter(|l| l.original_index < candidate_end)
        .collect();

    let raw_blocks = split_at_hard_breaks(&candidates);

    let mut inline_quote_counts = Vec::with_capacity(raw_blocks.len());
    let blocks: Vec<Vec<&ReconstructedLine>> = raw_blocks
        .into_iter()
        .map(|block| {
            let (trimmed, inline_quotes) = trim_quote_runs(block);
            inline_quote_counts.push(inline_quotes);
            trimmed
        })
        .collect();

    let (selected, inline_quote_count) = if signature_index.is_some() {
        // Every block preceding the signature belongs to the body: none of
        // them were split off by anything but a forward/reply header, so
        // dropping all but the last would silently discard earlier content.
        let mut combined: Vec<&ReconstructedLine> = Vec::new();
        let mut total_inline_quotes = 0;
        for (block, inline_quotes) in blocks.iter().zip(inline_quote_counts.iter()) {
            combined.extend(block.iter().copied());
            total_inline_quotes += inline_quotes;
        }
        (trim_blank_and_other(combined), total_inline_quotes)
    } else {
        match blocks.iter().enumerate().max_by_key(|(_, block)| block.len()) {
            Some((i, _)) => (trim_blank_and_other(blocks[i].clone()), inline_quote_counts[i]),
            None => (Vec::new(), 0),
        }
    };

    if selected.is_empty() {
        log::debug!("body_assembler: no eligible block found");
        return AssembledBody {
            body_text: String::new(),
            body_lines: Vec::new(),
            signature_index,
            inline_quote_count: 0,
            success: false,
        };
    }

    let body_text = selected.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n");
    let body_lines = selected.iter().map(|l| l.original_index).collect();

    log::debug!(
        "body_assembler: selected body with {} lines, {} inline quotes, signature_index={signature_index:?}",
        selected.len(),
        inline_quote_count
    );

    AssembledBody {
        success: !body_text.is_empty(),
        body_text,
        body_lines,
        signature_index,
        inline_quote_count,
    }
}

/// A hard break is a non-blank OTHER-labeled forward/reply header. Visual
/// separators are not hard breaks: labeled OTHER, they're neutral filler
/// absorbed into whichever block surrounds them, same as any other
/// OTHER-labeled line.
fn is_hard_break(line: &ReconstructedLine) -> bool {
    !line.is_blank && line.label == Some(Label::Other) && is_forward_reply_header(&line.text)
}

fn split_at_hard_breaks<'a>(lines: &[&'a ReconstructedLine]) -> Vec<Vec<&'a ReconstructedLine>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&ReconstructedLine> = Vec::new();

    for &line in lines {
        if is_hard_break(line) {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Trims a leading and/or trailing run of QUOTE-labeled lines off `block`
/// (a quote run touching either edge is reply-thread boilerplate, not
/// content), keeping any quote lines that remain sandwiched between
/// non-quote content. Returns the trimmed block and the count of
/// non-blank inline quote lines that survived.
fn trim_quote_runs<'a>(block: Vec<&'a ReconstructedLine>) -> (Vec<&'a ReconstructedLine>, usize) {
    let mut start = 0;
    while start < block.len() && block[start].label == Some(Label::Quote) {
        start += 1;
    }
    let mut end = block.len();
    while end > start && block[end - 1].label == Some(Label::Quote) {
        end -= 1;
    }

    let trimmed: Vec<&ReconstructedLine> = block[start..end].to_vec();
    let inline_quotes = trimmed
        .iter()
        .filter(|l| !l.is_blank && l.label == Some(Label::Quote))
        .count();

    (trimmed, inline_quotes)
}

/// Trims a leading and/or trailing run of blank and OTHER-labeled lines off
/// the final selected body: filler at the very edges of the selection, not
/// content, even though the same filler is absorbed when it sits between
/// content lines.
fn trim_blank_and_other(lines: Vec<&ReconstructedLine>) -> Vec<&ReconstructedLine> {
    let is_filler = |l: &&ReconstructedLine| l.is_blank || l.label == Some(Label::Other);
    let mut start = 0;
    while start < lines.len() && is_filler(&lines[start]) {
        start += 1;
    }
    let mut end = lines.len();
    while end > start && is_filler(&lines[end - 1]) {
        end -= 1;
    }
    lines[start..end].to_vec()
}
