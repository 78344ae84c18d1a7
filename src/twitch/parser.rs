use chrono::Utc;

use super::models::ChatEvent;

const CHAT_MARKER: &str = "PRIVMSG";
const KEEPALIVE_TOKEN: &str = "PING";

/// What a raw protocol line turned out to be. `Unparseable` is not an
/// error; the session manager logs the line and moves on.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Chat(ChatEvent),
    KeepAlive,
    Unparseable,
}

/// Decodes one raw protocol line.
///
/// A keep-alive probe is recognized by its leading token. A chat line is
/// recognized by the `PRIVMSG` marker: the sender comes from the prefix
/// segment (after the leading `:` sigil, up to the `!` separator) and the
/// message text from whatever follows the first `:` after the marker.
/// Trailing control characters are tolerated; text may be empty after
/// trimming, the username may not.
pub fn parse(raw_line: &str) -> LineOutcome {
    let line = raw_line.trim_end_matches(|c: char| c.is_control());

    if line.starts_with(KEEPALIVE_TOKEN) {
        return LineOutcome::KeepAlive;
    }

    let Some(marker_pos) = line.find(CHAT_MARKER) else {
        return LineOutcome::Unparseable;
    };
    let prefix = &line[..marker_pos];
    let suffix = &line[marker_pos + CHAT_MARKER.len()..];

    let Some(username) = extract_username(prefix) else {
        return LineOutcome::Unparseable;
    };
    let Some((channel, text)) = extract_target_and_text(suffix) else {
        return LineOutcome::Unparseable;
    };

    LineOutcome::Chat(ChatEvent {
        timestamp: Utc::now(),
        channel,
        username,
        text,
    })
}

fn extract_username(prefix: &str) -> Option<String> {
    let after_sigil = prefix.split(':').nth(1)?;
    let name = after_sigil
        .split(|c: char| c == '!' || c.is_whitespace())
        .next()
        .unwrap_or("")
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn extract_target_and_text(suffix: &str) -> Option<(String, String)> {
    let colon = suffix.find(':')?;
    let target = suffix[..colon].split_whitespace().next().unwrap_or("");
    let channel = target.trim_start_matches('#').to_string();
    let text = suffix[colon + 1..].trim().to_string();
    Some((channel, text))
}
