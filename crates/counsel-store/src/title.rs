//! Chat title derivation.
//!
//! Applied exactly once, when the first message lands in an empty chat.
//! After that the title is frozen against automatic changes; explicit rename
//! goes through `ChatStore::rename_chat`.

/// Marker embedded in message text when uploaded document content was folded
/// into the message body.
pub const UPLOADED_CONTENT_MARKER: &str = "\u{1F4C4} Uploaded content";

/// Derive a chat title from its first message.
///
/// Messages carrying the uploaded-content marker become
/// `"Analysis: <label>"`, where the label is the segment after the first
/// `": "` cut at the first newline (falling back to `"Document"`). Everything
/// else becomes the first 50 characters followed by an ellipsis.
pub fn derive_title(text: &str) -> String {
    if text.contains(UPLOADED_CONTENT_MARKER) {
        let label = text
            .split(": ")
            .nth(1)
            .and_then(|segment| segment.lines().next())
            .filter(|label| !label.is_empty())
            .unwrap_or("Document");
        format!("Analysis: {}", label)
    } else {
        let head: String = text.chars().take(50).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_message_truncated_to_50_chars() {
        let text = "Hello, I need help with a contract dispute that is quite long and detailed";
        let title = derive_title(text);
        assert_eq!(title.chars().count(), 53); // 50 + "..."
        assert!(title.starts_with("Hello, I need help with a contract dispute that is"));
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_short_message_keeps_full_text() {
        assert_eq!(derive_title("Hi"), "Hi...");
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "\u{00e9}".repeat(60);
        let title = derive_title(&text);
        assert_eq!(title.chars().count(), 53);
    }

    #[test]
    fn test_uploaded_content_marker_extracts_label() {
        let text = "\u{1F4C4} Uploaded content: lease.pdf\nfull text follows";
        assert_eq!(derive_title(text), "Analysis: lease.pdf");
    }

    #[test]
    fn test_uploaded_content_label_cut_at_newline() {
        let text = "\u{1F4C4} Uploaded content: agreement.pdf\nclause 1\nclause 2";
        assert_eq!(derive_title(text), "Analysis: agreement.pdf");
    }

    #[test]
    fn test_uploaded_content_without_label_falls_back() {
        let text = "\u{1F4C4} Uploaded content";
        assert_eq!(derive_title(text), "Analysis: Document");
    }

    #[test]
    fn test_uploaded_content_empty_label_falls_back() {
        let text = "\u{1F4C4} Uploaded content: \nbody";
        // Segment after ": " starts with a newline, so the label is empty.
        assert_eq!(derive_title(text), "Analysis: Document");
    }

    #[test]
    fn test_marker_takes_priority_over_truncation() {
        let mut text = String::from("\u{1F4C4} Uploaded content: brief.pdf\n");
        text.push_str(&"x".repeat(500));
        assert_eq!(derive_title(&text), "Analysis: brief.pdf");
    }
}
