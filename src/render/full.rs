use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};

use super::is_external;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if matches!(c, ' ' | '-' | '_') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Give every heading an id from its text; repeats get `-1`, `-2`, ...
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen = HashMap::<String, usize>::new();
    for index in 0..events.len() {
        if !matches!(events[index], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let slug = slugify(&heading_text(&events[index + 1..]));
        let count = seen.entry(slug.clone()).or_default();
        let slug = match *count {
            0 => slug,
            n => format!("{slug}-{n}"),
        };
        *count += 1;
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
            *id = Some(CowStr::from(slug));
        }
    }
}

fn open_external_link(dest_url: &str, title: &str) -> String {
    let href = html_escape::encode_double_quoted_attribute(dest_url);
    if title.is_empty() {
        format!(r#"<a href="{href}" target="_blank" rel="noopener">"#)
    } else {
        let title = html_escape::encode_double_quoted_attribute(title);
        format!(r#"<a href="{href}" title="{title}" target="_blank" rel="noopener">"#)
    }
}

pub fn render_full(markdown: &str) -> String {
    let mut events = Parser::new_ext(markdown, options()).collect::<Vec<_>>();
    assign_heading_ids(&mut events);

    let mut in_external_link = false;
    let events = events.into_iter().map(|event| match event {
        Event::Start(Tag::Link {
            dest_url, title, ..
        }) if is_external(&dest_url) => {
            in_external_link = true;
            Event::InlineHtml(open_external_link(&dest_url, &title).into())
        }
        Event::End(TagEnd::Link) if in_external_link => {
            in_external_link = false;
            Event::InlineHtml("</a>".into())
        }
        event => event,
    });

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events);
    html
}
