use crate::models::Item;
use std::fmt::Write;

pub const EMPTY_PLACEHOLDER: &str = "<li class=\"empty\" style=\"text-align:center;color:#666\">No items.</li>";

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
const GENERIC_MARKER: &str = "🎖";
const UNDATED: &str = "Undated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Ranked,
    History,
    Plain,
    Calendar,
}

pub fn render(items: &[Item], template: Template) -> String {
    if items.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    match template {
        Template::Ranked => render_ranked(items, None),
        Template::History => items
            .iter()
            .map(|item| {
                format!(
                    "<li><strong>{}</strong><br>{}</li>",
                    escape_html(item.time.as_deref().unwrap_or_default()),
                    escape_html(&item.text)
                )
            })
            .collect(),
        Template::Plain => items
            .iter()
            .map(|item| format!("<li>{}</li>", escape_html(&item.text)))
            .collect(),
        Template::Calendar => render_calendar(items),
    }
}

// Ranked rows, annotated against the previously rendered order when one
// is given. Rows are never re-sorted.
pub fn render_ranked(items: &[Item], previous: Option<&[String]>) -> String {
    if items.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    let mut out = String::new();
    for (idx, item) in items.iter().enumerate() {
        let marker = MEDALS.get(idx).copied().unwrap_or(GENERIC_MARKER);
        let score = item
            .score
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "0".to_string());
        let change = previous
            .map(|prev| rank_change(prev, &item.text, idx).symbol())
            .unwrap_or_default();

        let _ = write!(
            out,
            "<li><span class=\"count-badge\">🧠{score}</span> {marker} {}",
            escape_html(&item.text)
        );
        if !change.is_empty() {
            let _ = write!(out, " <span class=\"rank-change\">{change}</span>");
        }
        out.push_str("</li>");
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankChange {
    Up,
    Down,
    Same,
    New,
}

impl RankChange {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Same => "",
            Self::New => "✦",
        }
    }
}

pub fn rank_change(previous: &[String], text: &str, idx: usize) -> RankChange {
    match previous.iter().position(|prev| prev == text) {
        None => RankChange::New,
        Some(old) if old > idx => RankChange::Up,
        Some(old) if old < idx => RankChange::Down,
        Some(_) => RankChange::Same,
    }
}

pub fn group_by_date(items: &[Item]) -> Vec<(&str, Vec<&Item>)> {
    let mut groups: Vec<(&str, Vec<&Item>)> = Vec::new();
    for item in items {
        let date = item.date.as_deref().unwrap_or(UNDATED);
        match groups.iter_mut().find(|(key, _)| *key == date) {
            Some((_, entries)) => entries.push(item),
            None => groups.push((date, vec![item])),
        }
    }
    groups
}

fn render_calendar(items: &[Item]) -> String {
    let mut out = String::new();
    for (date, entries) in group_by_date(items) {
        let _ = write!(out, "<h4>{}</h4><ul>", escape_html(date));
        for entry in entries {
            let _ = write!(
                out,
                "<li><strong>{}</strong> – {}</li>",
                escape_html(entry.time.as_deref().unwrap_or_default()),
                escape_html(&entry.text)
            );
        }
        out.push_str("</ul>");
    }
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
