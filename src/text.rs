//! Markup conversions for legacy content, and plain-text helpers for excerpts.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

type Rules = Lazy<Vec<(Regex, &'static str)>>;

fn compile(rules: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        // Unwrap as the expressions are constants checked by the tests
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
        .collect()
}

fn apply(rules: &[(Regex, &'static str)], text: &str) -> String {
    rules.iter().fold(text.to_owned(), |text, (regex, replacement)| {
        regex.replace_all(&text, *replacement).into_owned()
    })
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

static HTML_TO_BBCODE: Rules = Lazy::new(|| {
    compile(&[
        (r"(?i)<br\s*/?>", "\n"),
        (r"(?i)</p\s*>", "\n\n"),
        (r"(?i)<p(\s[^>]*)?>", ""),
        (r"(?i)<(b|strong)(\s[^>]*)?>", "[b]"),
        (r"(?i)</(b|strong)\s*>", "[/b]"),
        (r"(?i)<(i|em)(\s[^>]*)?>", "[i]"),
        (r"(?i)</(i|em)\s*>", "[/i]"),
        (r"(?i)<u(\s[^>]*)?>", "[u]"),
        (r"(?i)</u\s*>", "[/u]"),
        (r#"(?i)<a\s[^>]*href\s*=\s*["']([^"']*)["'][^>]*>"#, "[url=$1]"),
        (r"(?i)</a\s*>", "[/url]"),
        (r#"(?i)<img\s[^>]*src\s*=\s*["']([^"']*)["'][^>]*>"#, "[img]$1[/img]"),
        (r"(?i)<pre(\s[^>]*)?>\s*<code(\s[^>]*)?>", "[code]"),
        (r"(?i)</code\s*>\s*</pre\s*>", "[/code]"),
        (r"(?i)<(code|pre)(\s[^>]*)?>", "[code]"),
        (r"(?i)</(code|pre)\s*>", "[/code]"),
        (r"(?i)<blockquote(\s[^>]*)?>", "[quote]"),
        (r"(?i)</blockquote\s*>", "[/quote]"),
        (r"(?i)<(ul|ol)(\s[^>]*)?>", "[list]"),
        (r"(?i)</(ul|ol)\s*>", "[/list]"),
        (r"(?i)<li(\s[^>]*)?>", "[*]"),
        (r"(?i)</li\s*>", ""),
        (r"<[^>]*>", ""),
    ])
});

/// Converts the HTML of legacy posts to BBCode. Unknown tags are dropped.
pub fn html_to_bbcode(html: &str) -> String {
    decode_entities(&apply(&HTML_TO_BBCODE, html))
}

static BBCODE_INLINE: Rules = Lazy::new(|| {
    compile(&[
        (r"(?is)\[b\](.*?)\[/b\]", "**$1**"),
        (r"(?is)\[i\](.*?)\[/i\]", "*$1*"),
        (r"(?is)\[u\](.*?)\[/u\]", "$1"),
        (r"(?is)\[url=([^\]]+)\](.*?)\[/url\]", "[$2]($1)"),
        (r"(?is)\[url\](.*?)\[/url\]", "<$1>"),
        (r"(?is)\[img\](.*?)\[/img\]", "![]($1)"),
    ])
});

static BBCODE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\[code\](.*?)\[/code\]").unwrap());
static BBCODE_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[quote(=[^\]]*)?\](.*?)\[/quote\]").unwrap());
static BBCODE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[list(=[^\]]*)?\](.*?)\[/list\]").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Converts BBCode to Markdown.
pub fn bbcode_to_markdown(bbcode: &str) -> String {
    let text = bbcode.replace("\r\n", "\n");

    let text = BBCODE_CODE.replace_all(&text, |caps: &Captures| {
        format!("\n```\n{}\n```\n", caps[1].trim_matches('\n'))
    });

    let text = BBCODE_QUOTE.replace_all(&text, |caps: &Captures| {
        let quoted = caps[2]
            .trim()
            .lines()
            .map(|line| format!("> {line}").trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        format!("\n{quoted}\n")
    });

    let text = BBCODE_LIST.replace_all(&text, |caps: &Captures| {
        let items = caps[2]
            .split("[*]")
            .skip(1)
            .map(|item| format!("- {}", item.trim()))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\n{items}\n")
    });

    let text = apply(&BBCODE_INLINE, &text);

    BLANK_LINES.replace_all(&text, "\n\n").trim().to_owned()
}

static PURGE: Rules = Lazy::new(|| {
    compile(&[
        (r"<(https?://[^>\s]+)>", "$1"),
        (r"<[^>]*>", ""),
        (r"(?i)\[/?(b|i|u|url|img|code|quote|list|\*)(=[^\]]*)?\]", ""),
        (r"!\[([^\]]*)\]\([^)]*\)", "$1"),
        (r"\[([^\]]*)\]\([^)]*\)", "$1"),
        (r"(?m)^\s{0,3}#{1,6}\s+", ""),
        (r"(?m)^\s*>\s?", ""),
        (r"(?m)^\s*[-+]\s+", ""),
        (r"\*+|_{2,}|~~|`+", ""),
        (r"\s+", " "),
    ])
});

/// Plain text out of HTML, BBCode or Markdown, on a single line.
pub fn purge(text: &str) -> String {
    decode_entities(&apply(&PURGE, text)).trim().to_owned()
}

/// At most `length` characters, cut at a word boundary, with `...` appended when something was cut.
pub fn truncate(text: &str, length: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= length {
        return text.to_owned();
    }

    let cut = text.chars().take(length).collect::<String>();
    let at_boundary = text.chars().nth(length).is_some_and(char::is_whitespace);

    let cut = match cut.rfind(char::is_whitespace) {
        Some(pos) if !at_boundary => &cut[..pos],
        _ => cut.as_str(),
    };

    format!("{}...", cut.trim_end())
}
