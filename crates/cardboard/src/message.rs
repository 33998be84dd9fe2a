//! Chat formatting codes and message delivery.

use crate::host::Invoker;

/// Character the host uses to introduce a formatting code.
pub const COLOR_CHAR: char = '§';

/// Character authors use in configuration and messages instead of
/// [`COLOR_CHAR`].
pub const ALTERNATE_COLOR_CHAR: char = '&';

const LEGAL_CODES: &str = "0123456789abcdefklmnorx";

fn is_legal_code(code: char) -> bool {
    LEGAL_CODES.contains(code.to_ascii_lowercase())
}

/// Replaces `alternate` followed by a legal code with [`COLOR_CHAR`] followed
/// by the lower-cased code. Other occurrences of `alternate` are kept.
#[must_use]
pub fn translate_alternate_color_codes(alternate: char, text: &str) -> String {
    let mut translated = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(current) = chars.next() {
        match chars.peek() {
            Some(&code) if current == alternate && is_legal_code(code) => {
                translated.push(COLOR_CHAR);
                translated.push(code.to_ascii_lowercase());
                chars.next();
            }
            _ => translated.push(current),
        }
    }
    translated
}

/// Translates `&`-prefixed formatting codes.
#[must_use]
pub fn colorize(text: &str) -> String {
    translate_alternate_color_codes(ALTERNATE_COLOR_CHAR, text)
}

/// Sends each message to `invoker` after translating formatting codes.
pub fn send_message<I, S>(invoker: &dyn Invoker, messages: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for message in messages {
        invoker.send_message(&colorize(message.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::red("&cHello", "§cHello")]
    #[case::upper_case_code("&AGreen", "§aGreen")]
    #[case::several("&l&6Gold", "§l§6Gold")]
    #[case::hex_marker("&x", "§x")]
    #[case::illegal_code("&zNope", "&zNope")]
    #[case::trailing("Rock &", "Rock &")]
    #[case::ampersand_pairs("R&&cD", "R&§cD")]
    #[case::plain("Hello", "Hello")]
    fn colorize_translates_legal_codes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(colorize(input), expected);
    }

    #[test]
    fn custom_alternate_character() {
        assert_eq!(translate_alternate_color_codes('$', "$4Dark &4"), "§4Dark &4");
    }
}
