//! Dialogue text escaping and colouring

use crate::RenderConfig;

/// Escapes override braces and backslashes and turns newlines into `\N`
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\N");
            }
            '\n' => out.push_str("\\N"),
            _ => out.push(c),
        }
    }

    out
}

/// Renders a chat line with the sender name and body in their own colours.
///
/// The `": "` separator only appears when both parts are present; a body
/// without a name is emitted as-is.
pub fn render_text(name: &str, body: &str, config: &RenderConfig) -> String {
    let name = escape(name);
    let body = escape(body);

    match (name.is_empty(), body.is_empty()) {
        (true, _) => body,
        (false, true) => format!(
            "{{\\1c{}}}{}{{\\1c{}}}",
            config.name_colour, name, config.body_colour
        ),
        (false, false) => format!(
            "{{\\1c{}}}{}{{\\1c{}}}: {}",
            config.name_colour, name, config.body_colour, body
        ),
    }
}
