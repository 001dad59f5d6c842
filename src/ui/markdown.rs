//! Markdown rendering for terminal display
//!
//! Converts markdown to ANSI-styled text lines for plain terminal output.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const ITALIC: &str = "\x1b[3m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";

/// Render markdown text to ANSI-styled lines
pub fn render_markdown(text: &str) -> Vec<String> {
    let mut renderer = MarkdownRenderer::new();
    renderer.render(text);
    renderer.lines
}

/// Render markdown and join lines for direct printing
pub fn render_markdown_text(text: &str) -> String {
    render_markdown(text).join("\n")
}

/// Markdown renderer state
struct MarkdownRenderer {
    lines: Vec<String>,
    current: String,
    in_code_block: bool,
    code_block_lang: Option<String>,
    code_block_content: String,
    list_depth: usize,
    ordered_list_num: Option<u64>,
}

impl MarkdownRenderer {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            in_code_block: false,
            code_block_lang: None,
            code_block_content: String::new(),
            list_depth: 0,
            ordered_list_num: None,
        }
    }

    fn render(&mut self, text: &str) {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(text, options);

        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => self.add_text(&text),
                Event::Code(code) => {
                    self.current.push_str(YELLOW);
                    self.current.push_str(&code);
                    self.current.push_str(RESET);
                }
                Event::SoftBreak | Event::HardBreak => {
                    if self.in_code_block {
                        self.code_block_content.push('\n');
                    } else {
                        self.flush_line();
                    }
                }
                Event::Rule => {
                    self.flush_line();
                    self.lines.push(format!("{}{}{}", DIM, "─".repeat(40), RESET));
                }
                _ => {}
            }
        }
        self.flush_line();

        // Trim trailing blank lines
        while self.lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            self.lines.pop();
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.blank_line();
                self.current.push_str(BOLD);
                self.current.push_str(CYAN);
            }
            Tag::Paragraph => {
                if self.list_depth == 0 {
                    self.blank_line();
                }
            }
            Tag::CodeBlock(kind) => {
                self.flush_line();
                self.in_code_block = true;
                self.code_block_lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
            }
            Tag::List(start) => {
                if self.list_depth == 0 {
                    self.blank_line();
                }
                self.list_depth += 1;
                self.ordered_list_num = start;
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                match self.ordered_list_num {
                    Some(n) => {
                        self.current.push_str(&format!("{}{}. ", indent, n));
                        self.ordered_list_num = Some(n + 1);
                    }
                    None => self.current.push_str(&format!("{}• ", indent)),
                }
            }
            Tag::Strong => self.current.push_str(BOLD),
            Tag::Emphasis => self.current.push_str(ITALIC),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.current.push_str(RESET);
                self.flush_line();
            }
            TagEnd::Paragraph => self.flush_line(),
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.render_code_block();
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                self.ordered_list_num = None;
                if self.list_depth == 0 {
                    self.flush_line();
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Strong | TagEnd::Emphasis => self.current.push_str(RESET),
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            self.code_block_content.push_str(text);
            return;
        }
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.flush_line();
            }
            self.current.push_str(part);
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn blank_line(&mut self) {
        self.flush_line();
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    fn render_code_block(&mut self) {
        let content = std::mem::take(&mut self.code_block_content);
        let lang = self.code_block_lang.take();

        let content_lines: Vec<&str> = content.lines().collect();
        let max_width = content_lines.iter().map(|l| l.width()).max().unwrap_or(0);
        let inner_width = max_width.clamp(20, 76);

        let lang_display = lang.as_deref().unwrap_or("code");
        let header_label = format!(" {} ", lang_display);
        let dashes = (inner_width + 2).saturating_sub(header_label.width() + 3);
        self.lines.push(format!(
            "{}┌───{}{}{}{}┐{}",
            DIM, RESET, header_label, DIM, "─".repeat(dashes), RESET
        ));

        for line in &content_lines {
            let pad = inner_width.saturating_sub(line.width());
            self.lines.push(format!(
                "{}│{} {}{} {}│{}",
                DIM, RESET, line, " ".repeat(pad), DIM, RESET
            ));
        }

        self.lines
            .push(format!("{}└{}┘{}", DIM, "─".repeat(inner_width + 2), RESET));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip ANSI escapes for structural assertions
    fn plain(lines: &[String]) -> Vec<String> {
        let re = regex::Regex::new("\x1b\\[[0-9;]*m").unwrap();
        lines.iter().map(|l| re.replace_all(l, "").to_string()).collect()
    }

    #[test]
    fn test_paragraph_and_heading() {
        let lines = plain(&render_markdown("# Title\n\nSome body text."));
        assert!(lines.contains(&"Title".to_string()));
        assert!(lines.contains(&"Some body text.".to_string()));
    }

    #[test]
    fn test_bullet_list() {
        let lines = plain(&render_markdown("- one\n- two"));
        assert!(lines.contains(&"• one".to_string()));
        assert!(lines.contains(&"• two".to_string()));
    }

    #[test]
    fn test_ordered_list_numbers() {
        let lines = plain(&render_markdown("1. first\n2. second"));
        assert!(lines.contains(&"1. first".to_string()));
        assert!(lines.contains(&"2. second".to_string()));
    }

    #[test]
    fn test_code_block_is_framed() {
        let lines = plain(&render_markdown("```rust\nfn main() {}\n```"));
        assert!(lines.iter().any(|l| l.contains("rust")));
        assert!(lines.iter().any(|l| l.contains("fn main() {}")));
        assert!(lines.first().unwrap().starts_with('┌'));
        assert!(lines.last().unwrap().starts_with('└'));
    }

    #[test]
    fn test_inline_code_styled() {
        let rendered = render_markdown_text("use `cargo` here");
        assert!(rendered.contains(YELLOW));
        assert!(rendered.contains("cargo"));
    }

    #[test]
    fn test_plain_text_passes_through() {
        let lines = plain(&render_markdown("just a sentence"));
        assert_eq!(lines, vec!["just a sentence".to_string()]);
    }
}
