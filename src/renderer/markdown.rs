use crate::renderer::SyntaxCache;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use syntect::easy::HighlightLines;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use textwrap::{wrap, Options};

const ITALIC: &str = "\x1B[3m";
const ITALIC_OFF: &str = "\x1B[23m";
const BOLD: &str = "\x1B[1m";
const BOLD_OFF: &str = "\x1B[22m";

/// The trusted markup path: renders a server reply's markdown to wrapped
/// ANSI text. User input never comes through here.
pub struct MarkdownRenderer {
    wrap_options: Options<'static>,
}

impl MarkdownRenderer {
    pub fn new(width: usize) -> Self {
        let wrap_options = Options::new(width)
            .initial_indent("  ")
            .subsequent_indent("  ");

        Self { wrap_options }
    }

    pub fn render(&self, text: &str) -> String {
        let cache = SyntaxCache::global();

        let mut output = String::with_capacity(text.len() * 2);
        let mut paragraph = String::with_capacity(256);
        let mut in_code_block = false;
        let mut in_list = false;
        let mut language = String::new();

        for event in Parser::new(text) {
            match event {
                Event::Start(Tag::Heading(..)) => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                    paragraph.push_str(BOLD);
                }
                Event::End(Tag::Heading(..)) => {
                    paragraph.push_str(BOLD_OFF);
                    self.flush_paragraph(&mut output, &mut paragraph);
                    output.push('\n');
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                    in_code_block = true;
                    language = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => lang.to_string(),
                        _ => "txt".to_string(),
                    };
                    output.push('\n');
                }
                Event::End(Tag::CodeBlock(_)) => {
                    in_code_block = false;
                    language.clear();
                    output.push('\n');
                }
                Event::Start(Tag::List(_)) => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                    in_list = true;
                }
                Event::End(Tag::List(_)) => {
                    in_list = false;
                    output.push('\n');
                }
                Event::Start(Tag::Item) => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                    paragraph.push_str("• ");
                }
                Event::End(Tag::Item) => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                }
                Event::Start(Tag::Paragraph) => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                }
                Event::End(Tag::Paragraph) => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                    if !in_list {
                        output.push('\n');
                    }
                }
                Event::Start(Tag::Emphasis) => paragraph.push_str(ITALIC),
                Event::End(Tag::Emphasis) => paragraph.push_str(ITALIC_OFF),
                Event::Start(Tag::Strong) => paragraph.push_str(BOLD),
                Event::End(Tag::Strong) => paragraph.push_str(BOLD_OFF),
                Event::Code(code) => {
                    paragraph.push('`');
                    paragraph.push_str(&code);
                    paragraph.push('`');
                }
                Event::Text(text) if in_code_block => {
                    let syntax = cache.syntax_for(&language);
                    let mut highlighter = HighlightLines::new(syntax, cache.theme());

                    for line in LinesWithEndings::from(&text) {
                        output.push_str("    ");
                        match highlighter.highlight_line(line, &cache.syntax_set) {
                            Ok(ranges) => {
                                output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
                            }
                            Err(_) => output.push_str(line),
                        }
                    }
                }
                Event::Text(text) => paragraph.push_str(&text),
                Event::SoftBreak => paragraph.push(' '),
                Event::HardBreak => {
                    self.flush_paragraph(&mut output, &mut paragraph);
                    output.push('\n');
                }
                Event::Html(html) => self.translate_html(&html, &mut output, &mut paragraph),
                _ => {}
            }
        }

        self.flush_paragraph(&mut output, &mut paragraph);
        output.trim_end().to_string()
    }

    /// The service renders replies server-side, so trusted markup can carry
    /// HTML tags alongside markdown. Translate the tag set it emits; drop
    /// anything else (it is styling a terminal cannot show).
    fn translate_html(&self, chunk: &str, output: &mut String, paragraph: &mut String) {
        let mut rest = chunk;
        while let Some(start) = rest.find('<') {
            paragraph.push_str(&rest[..start]);
            let Some(len) = rest[start..].find('>') else {
                paragraph.push_str(&rest[start..]);
                return;
            };
            let tag = rest[start + 1..start + len]
                .trim_end_matches('/')
                .trim()
                .to_ascii_lowercase();
            match tag.as_str() {
                "b" | "strong" => paragraph.push_str(BOLD),
                "/b" | "/strong" => paragraph.push_str(BOLD_OFF),
                "i" | "em" => paragraph.push_str(ITALIC),
                "/i" | "/em" => paragraph.push_str(ITALIC_OFF),
                "code" | "/code" => paragraph.push('`'),
                "li" => {
                    self.flush_paragraph(output, paragraph);
                    paragraph.push_str("• ");
                }
                "/li" | "br" => self.flush_paragraph(output, paragraph),
                "/p" | "/ul" | "/ol" => {
                    self.flush_paragraph(output, paragraph);
                    output.push('\n');
                }
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    self.flush_paragraph(output, paragraph);
                    paragraph.push_str(BOLD);
                }
                "/h1" | "/h2" | "/h3" | "/h4" | "/h5" | "/h6" => {
                    paragraph.push_str(BOLD_OFF);
                    self.flush_paragraph(output, paragraph);
                    output.push('\n');
                }
                _ => {}
            }
            rest = &rest[start + len + 1..];
        }
        paragraph.push_str(rest);
    }

    fn flush_paragraph(&self, output: &mut String, paragraph: &mut String) {
        if paragraph.is_empty() {
            return;
        }

        let lines = if let Some(item) = paragraph.strip_prefix("• ") {
            let mut list_options = self.wrap_options.clone();
            list_options.initial_indent = "  • ";
            list_options.subsequent_indent = "    ";
            wrap(item, &list_options)
        } else {
            wrap(paragraph, &self.wrap_options)
        };

        for line in lines {
            output.push_str(&line);
            output.push('\n');
        }
        paragraph.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(60)
    }

    #[test]
    fn strong_text_gets_bold_escapes() {
        let out = renderer().render("**Hi**");
        assert!(out.contains("\x1B[1mHi\x1B[22m"), "got: {out:?}");
    }

    #[test]
    fn list_items_get_bullets() {
        let out = renderer().render("* first\n* second");
        assert!(out.contains("  • first"));
        assert!(out.contains("  • second"));
    }

    #[test]
    fn code_blocks_are_indented() {
        let out = renderer().render("```\nlet x = 1;\n```");
        assert!(out.lines().any(|line| line.starts_with("    ")), "got: {out:?}");
    }

    #[test]
    fn long_paragraphs_wrap_to_width() {
        let out = MarkdownRenderer::new(30).render(&"word ".repeat(20));
        assert!(out.lines().count() > 1);
        assert!(out.lines().all(|line| line.len() <= 30));
    }

    #[test]
    fn inline_html_bold_is_translated() {
        let out = renderer().render("<b>Hi</b>");
        assert!(out.contains("\x1B[1mHi\x1B[22m"), "got: {out:?}");
    }

    #[test]
    fn html_paragraphs_split() {
        let out = renderer().render("<p>one</p><p>two</p>");
        assert!(out.contains("one"));
        assert!(out.contains("two"));
        assert!(out.lines().count() >= 3, "got: {out:?}");
    }

    #[test]
    fn html_list_items_get_bullets() {
        let out = renderer().render("<ul><li>first</li><li>second</li></ul>");
        assert!(out.contains("  • first"));
        assert!(out.contains("  • second"));
    }

    #[test]
    fn unknown_tags_are_dropped() {
        let out = renderer().render(r#"<p><span class="x">plain</span></p>"#);
        assert!(out.contains("plain"));
        assert!(!out.contains("span"));
    }

    #[test]
    fn headings_render_bold() {
        let out = renderer().render("# Title\n\nbody");
        assert!(out.contains("\x1B[1mTitle\x1B[22m"));
        assert!(out.contains("body"));
    }
}
