//! Syntax highlighting for review code snippets.
//!
//! Syntaxes are picked by the session language's extension; languages syntect
//! does not ship (TypeScript, Swift) fall back to plain text.

use std::sync::LazyLock;

use critique_core::Language;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const SYNTECT_THEME: &str = "base16-ocean.dark";

/// Converts a syntect style and text into an owned ratatui span.
///
/// Background colors are dropped so the snippet block's own background shows.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut out = Style::default();
    if fg.a > 0 {
        out = out.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), out)
}

/// Highlights `code` line by line, returning owned lines.
///
/// Falls back to unstyled lines if no theme is available or highlighting fails.
pub fn highlight_snippet(code: &str, language: Language) -> Vec<Line<'static>> {
    let syntax = PS
        .find_syntax_by_extension(language.extension())
        .unwrap_or_else(|| PS.find_syntax_plain_text());
    let Some(theme) = TS.themes.get(SYNTECT_THEME).or_else(|| TS.themes.values().next()) else {
        return plain_lines(code);
    };

    let mut h = HighlightLines::new(syntax, theme);
    code.split('\n')
        .map(|raw| {
            // load_defaults_newlines syntaxes expect the terminator.
            let with_newline = format!("{raw}\n");
            match h.highlight_line(&with_newline, &PS) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, text)| syntect_to_span(style, text.trim_end_matches('\n')))
                        .filter(|span| !span.content.is_empty())
                        .collect::<Vec<_>>(),
                ),
                Err(_) => Line::raw(raw.to_owned()),
            }
        })
        .collect()
}

fn plain_lines(code: &str) -> Vec<Line<'static>> {
    code.split('\n').map(|l| Line::raw(l.to_owned())).collect()
}
