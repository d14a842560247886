// File: ./src/render.rs
//! Text serialization of a classified timeline.
use crate::model::Timeline;

/// Opening block expected by the `timeline-labeled` note plugin.
pub const DEFAULT_TEMPLATE: &str = "```timeline-labeled\n[line-3, body-1]\n";

const ENTRY_SEPARATOR: &str = "\n\n";

/// Renders one `date:`/`content:` block per non-empty bucket, in timeline order.
pub fn render_blocks(timeline: &Timeline) -> String {
    let mut out = String::new();
    for bucket in timeline.iter().filter(|b| !b.entries.is_empty()) {
        out.push_str("date: ");
        out.push_str(&bucket.label);
        out.push_str("\ncontent: ");
        out.push_str(&bucket.entries.join(ENTRY_SEPARATOR));
        out.push('\n');
    }
    out
}

/// Full document: template header followed by the blocks.
pub fn render_document(template: &str, timeline: &Timeline) -> String {
    let mut doc = String::with_capacity(template.len() + timeline.entry_count() * 64);
    doc.push_str(template);
    doc.push_str(&render_blocks(timeline));
    doc
}
