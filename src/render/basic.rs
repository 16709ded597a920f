use std::sync::LazyLock;

static CODE_BLOCK: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?s)```(\w+)?\n(.*?)```").unwrap());

static INLINE_CODE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"`([^`]+)`").unwrap());

static HEADINGS: LazyLock<[(regex::Regex, &str); 3]> = LazyLock::new(|| {
    [
        (regex::Regex::new(r"(?m)^### (.*)$").unwrap(), "<h3>${1}</h3>"),
        (regex::Regex::new(r"(?m)^## (.*)$").unwrap(), "<h2>${1}</h2>"),
        (regex::Regex::new(r"(?m)^# (.*)$").unwrap(), "<h1>${1}</h1>"),
    ]
});

static STRONG: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\*\*(.*?)\*\*").unwrap());

static EMPHASIS: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\*(.*?)\*").unwrap());

static LINK: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Regex-driven conversion of the common markdown subset.
///
/// Replacements run in sequence over the whole text, so markup produced by an
/// earlier step is visible to later ones. Only fenced code is escaped.
pub fn render_basic(markdown: &str) -> String {
    let html = CODE_BLOCK.replace_all(markdown, |caps: &regex::Captures| {
        let lang = caps.get(1).map_or("text", |lang| lang.as_str());
        let code = html_escape::encode_text(caps[2].trim());
        format!("<pre><code class=\"language-{lang}\">{code}</code></pre>")
    });
    let mut html = INLINE_CODE
        .replace_all(&html, "<code>${1}</code>")
        .into_owned();
    for (pattern, replacement) in HEADINGS.iter() {
        html = pattern.replace_all(&html, *replacement).into_owned();
    }
    let html = STRONG.replace_all(&html, "<strong>${1}</strong>");
    let html = EMPHASIS.replace_all(&html, "<em>${1}</em>");
    let html = LINK.replace_all(
        &html,
        r#"<a href="${2}" target="_blank" rel="noopener">${1}</a>"#,
    );
    let html = html.replace("\n\n", "</p><p>");
    format!("<p>{html}</p>")
}
