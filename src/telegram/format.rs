use std::borrow::Cow;

/// Longest text Telegram accepts in a single `sendMessage` call.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Escapes user-provided text for messages sent with `parse_mode=HTML`.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Splits `text` into chunks of at most `limit` characters, preferring line
/// boundaries. Lines longer than `limit` are cut hard, but never inside an
/// HTML entity or tag.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            let mut rest = chars.as_slice();
            while rest.len() > limit {
                let cut = cut_point(rest, limit);
                chunks.push(rest[..cut].iter().collect());
                rest = &rest[cut..];
            }
            current = rest.iter().collect();
            current_len = rest.len();
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Largest cut at or below `limit` that does not leave an `&...;` entity or a
/// `<...>` tag open. Falls back to `limit` when the markup starts the window.
fn cut_point(chars: &[char], limit: usize) -> usize {
    let window = &chars[..limit];
    let unclosed = |open: char, close: char| {
        window
            .iter()
            .rposition(|&c| c == open || c == close)
            .filter(|&i| window[i] == open)
    };
    match [unclosed('&', ';'), unclosed('<', '>')]
        .into_iter()
        .flatten()
        .min()
    {
        Some(start) if start > 0 => start,
        _ => limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_html("<b>fish & chips</b>"), "&lt;b&gt;fish &amp; chips&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(split_message("hello", 10), vec!["hello".to_string()]);
        assert!(split_message("", 10).is_empty());
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = "aaaa\nbbbb\ncccc\n";
        let chunks = split_message(text, 10);
        assert_eq!(chunks, vec!["aaaa\nbbbb\n".to_string(), "cccc\n".to_string()]);
    }

    #[test]
    fn cuts_overlong_lines() {
        let text = "x".repeat(25);
        let chunks = split_message(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn hard_cuts_keep_entities_whole() {
        let text = format!("* <i>{}</i>\n", "&amp;".repeat(2000));
        let chunks = split_message(&text, MAX_MESSAGE_LENGTH);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= MAX_MESSAGE_LENGTH);
            assert!(chunk.starts_with('&') || chunk.starts_with('*'), "{chunk:.20}");
            let tail = &chunk[chunk.rfind('&').unwrap()..];
            assert!(tail.contains(';'), "chunk ends inside an entity: {tail}");
        }
    }

    #[test]
    fn hard_cuts_keep_tags_whole() {
        let chunks = split_message("xxxxxxxx<b>yy</b>", 10);
        assert_eq!(chunks, vec!["xxxxxxxx", "<b>yy</b>"]);
    }
}
