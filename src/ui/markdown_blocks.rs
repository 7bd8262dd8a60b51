//! Markdown block parsing for the preview pane
//!
//! Markdown source is parsed with pulldown-cmark into a flat list of
//! display blocks, each keeping its byte range in the source. Inline
//! formatting inside headings, paragraphs and list items is kept as a list
//! of styled spans. Block quotes hold their own child blocks.

use std::ops::Range;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::core::render::Renderer;

/// Styled run of inline text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    Text(String),
    Code(String),
    Strong(String),
    Emphasis(String),
    Strikethrough(String),
    Link { text: String, url: String },
    /// Image inside running text
    Image {
        alt: String,
        url: String,
        title: Option<String>,
    },
}

impl InlineSpan {
    /// The visible text of the span
    pub fn text(&self) -> &str {
        match self {
            InlineSpan::Text(t)
            | InlineSpan::Code(t)
            | InlineSpan::Strong(t)
            | InlineSpan::Emphasis(t)
            | InlineSpan::Strikethrough(t) => t,
            InlineSpan::Link { text, .. } => text,
            InlineSpan::Image { alt, .. } => alt,
        }
    }
}

/// Concatenate the visible text of `spans`
pub fn plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

/// A list item with potential checkbox state
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub spans: Vec<InlineSpan>,
    /// Some(true) = checked, Some(false) = unchecked, None = no checkbox
    pub checkbox: Option<bool>,
    /// Nested list items
    pub children: Vec<ListItem>,
    pub children_ordered: bool,
}

/// A table cell
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub content: String,
    pub alignment: TableAlignment,
}

/// Table column alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Alignment> for TableAlignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Center => TableAlignment::Center,
            Alignment::Right => TableAlignment::Right,
            Alignment::None | Alignment::Left => TableAlignment::Left,
        }
    }
}

/// A parsed markdown block with its byte range in the source
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewBlock {
    /// Heading with level (1-6)
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
        range: Range<usize>,
    },

    Paragraph {
        spans: Vec<InlineSpan>,
        range: Range<usize>,
    },

    /// Fenced or indented code block
    CodeBlock {
        lang: Option<String>,
        code: String,
        range: Range<usize>,
    },

    /// Unordered or ordered list
    List {
        items: Vec<ListItem>,
        ordered: bool,
        start: Option<u64>,
        range: Range<usize>,
    },

    BlockQuote {
        content: Vec<PreviewBlock>,
        range: Range<usize>,
    },

    HorizontalRule {
        range: Range<usize>,
    },

    Table {
        headers: Vec<TableCell>,
        rows: Vec<Vec<TableCell>>,
        range: Range<usize>,
    },

    Image {
        alt: String,
        url: String,
        title: Option<String>,
        range: Range<usize>,
    },
}

impl PreviewBlock {
    /// Get the byte range of this block in the source
    pub fn range(&self) -> Range<usize> {
        match self {
            PreviewBlock::Heading { range, .. }
            | PreviewBlock::Paragraph { range, .. }
            | PreviewBlock::CodeBlock { range, .. }
            | PreviewBlock::List { range, .. }
            | PreviewBlock::BlockQuote { range, .. }
            | PreviewBlock::HorizontalRule { range }
            | PreviewBlock::Table { range, .. }
            | PreviewBlock::Image { range, .. } => range.clone(),
        }
    }
}

/// Rendered preview of a whole document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preview {
    blocks: Vec<PreviewBlock>,
}

impl Preview {
    pub fn blocks(&self) -> &[PreviewBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Renderer producing [`Preview`] blocks with pulldown-cmark
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl Renderer for MarkdownRenderer {
    type Output = Preview;

    fn render(&self, markdown: &str) -> Preview {
        Preview {
            blocks: parse_blocks(markdown, self.options),
        }
    }
}

/// Collects inline events into styled spans
#[derive(Debug, Default)]
struct InlineBuffer {
    spans: Vec<InlineSpan>,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    link: Option<(String, String)>,
}

impl InlineBuffer {
    fn push_text(&mut self, text: &str) {
        if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(text);
            return;
        }

        let span = if self.strong > 0 {
            InlineSpan::Strong(text.to_string())
        } else if self.emphasis > 0 {
            InlineSpan::Emphasis(text.to_string())
        } else if self.strikethrough > 0 {
            InlineSpan::Strikethrough(text.to_string())
        } else {
            InlineSpan::Text(text.to_string())
        };

        // Merge adjacent runs of the same style
        let merged = match (self.spans.last_mut(), &span) {
            (Some(InlineSpan::Text(prev)), InlineSpan::Text(next))
            | (Some(InlineSpan::Strong(prev)), InlineSpan::Strong(next))
            | (Some(InlineSpan::Emphasis(prev)), InlineSpan::Emphasis(next))
            | (Some(InlineSpan::Strikethrough(prev)), InlineSpan::Strikethrough(next)) => {
                prev.push_str(next);
                true
            }
            _ => false,
        };
        if !merged {
            self.spans.push(span);
        }
    }

    fn push_code(&mut self, code: &str) {
        if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(code);
        } else {
            self.spans.push(InlineSpan::Code(code.to_string()));
        }
    }

    fn start_link(&mut self, url: String) {
        self.link = Some((url, String::new()));
    }

    fn push_image(&mut self, image: PendingImage) {
        match self.link.as_mut() {
            Some((_, link_text)) => link_text.push_str(&image.alt),
            None => self.spans.push(InlineSpan::Image {
                alt: image.alt,
                url: image.url,
                title: image.title,
            }),
        }
    }

    fn end_link(&mut self) {
        if let Some((url, text)) = self.link.take() {
            self.spans.push(InlineSpan::Link { text, url });
        }
    }

    fn is_empty(&self) -> bool {
        self.spans
            .iter()
            .all(|span| !matches!(span, InlineSpan::Image { .. }) && span.text().trim().is_empty())
    }

    fn take(&mut self) -> Vec<InlineSpan> {
        let spans = std::mem::take(&mut self.spans);
        *self = Self::default();
        spans
    }
}

#[derive(Debug)]
struct ListFrame {
    items: Vec<ListItem>,
    ordered: bool,
    start: Option<u64>,
    range_start: usize,
}

#[derive(Debug, Default)]
struct ItemFrame {
    inline: InlineBuffer,
    checkbox: Option<bool>,
    children: Vec<ListItem>,
    children_ordered: bool,
}

#[derive(Debug)]
struct PendingImage {
    url: String,
    title: Option<String>,
    alt: String,
}

#[derive(Debug)]
struct QuoteFrame {
    content: Vec<PreviewBlock>,
    start: usize,
}

/// Inline content goes to the innermost open list item, else the block
fn inline_target<'a>(items: &'a mut [ItemFrame], inline: &'a mut InlineBuffer) -> &'a mut InlineBuffer {
    match items.last_mut() {
        Some(item) => &mut item.inline,
        None => inline,
    }
}

/// Finished blocks go to the innermost open quote, else the document
fn emit(blocks: &mut Vec<PreviewBlock>, quotes: &mut [QuoteFrame], block: PreviewBlock) {
    match quotes.last_mut() {
        Some(quote) => quote.content.push(block),
        None => blocks.push(block),
    }
}

/// A paragraph holding nothing but one image is shown as an image block
fn paragraph_block(mut spans: Vec<InlineSpan>, range: Range<usize>) -> PreviewBlock {
    if let [InlineSpan::Image { .. }] = spans.as_slice() {
        if let Some(InlineSpan::Image { alt, url, title }) = spans.pop() {
            return PreviewBlock::Image {
                alt,
                url,
                title,
                range,
            };
        }
    }
    PreviewBlock::Paragraph { spans, range }
}

/// Parse markdown content into blocks
pub fn parse_blocks(content: &str, options: Options) -> Vec<PreviewBlock> {
    let parser = Parser::new_ext(content, options);

    let mut blocks = Vec::new();
    let mut block_start = 0;
    let mut inline = InlineBuffer::default();

    let mut code: Option<(Option<String>, String)> = None;
    let mut quotes: Vec<QuoteFrame> = Vec::new();
    // Quotes opened inside a list item are flattened into the item's text
    let mut item_quotes = 0usize;
    let mut lists: Vec<ListFrame> = Vec::new();
    let mut items: Vec<ItemFrame> = Vec::new();
    let mut image: Option<PendingImage> = None;

    let mut table_alignments: Vec<TableAlignment> = Vec::new();
    let mut table_headers: Vec<TableCell> = Vec::new();
    let mut table_rows: Vec<Vec<TableCell>> = Vec::new();
    let mut current_row: Vec<TableCell> = Vec::new();
    let mut in_table_head = false;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { .. } | Tag::Paragraph if items.is_empty() => {
                    block_start = range.start;
                    inline.take();
                }
                Tag::Paragraph => {
                    let target = inline_target(&mut items, &mut inline);
                    if !target.is_empty() {
                        target.push_text("\n");
                    }
                }
                Tag::CodeBlock(kind) => {
                    block_start = range.start;
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code = Some((lang, String::new()));
                }
                Tag::List(start) => {
                    lists.push(ListFrame {
                        items: Vec::new(),
                        ordered: start.is_some(),
                        start,
                        range_start: range.start,
                    });
                }
                Tag::Item => items.push(ItemFrame::default()),
                Tag::BlockQuote(_) => {
                    if items.is_empty() {
                        quotes.push(QuoteFrame {
                            content: Vec::new(),
                            start: range.start,
                        });
                    } else {
                        item_quotes += 1;
                    }
                }
                Tag::Table(alignments) => {
                    block_start = range.start;
                    table_alignments = alignments.into_iter().map(TableAlignment::from).collect();
                    table_headers.clear();
                    table_rows.clear();
                }
                Tag::TableHead => {
                    in_table_head = true;
                    current_row.clear();
                }
                Tag::TableRow => current_row.clear(),
                Tag::TableCell => {
                    inline.take();
                }
                Tag::Strong => inline_target(&mut items, &mut inline).strong += 1,
                Tag::Emphasis => inline_target(&mut items, &mut inline).emphasis += 1,
                Tag::Strikethrough => inline_target(&mut items, &mut inline).strikethrough += 1,
                Tag::Link { dest_url, .. } => {
                    inline_target(&mut items, &mut inline).start_link(dest_url.to_string())
                }
                Tag::Image {
                    dest_url, title, ..
                } => {
                    image = Some(PendingImage {
                        url: dest_url.to_string(),
                        title: (!title.is_empty()).then(|| title.to_string()),
                        alt: String::new(),
                    });
                }
                _ => {}
            },

            Event::End(tag_end) => match tag_end {
                TagEnd::Heading(level) if items.is_empty() => {
                    let heading = PreviewBlock::Heading {
                        level: level as u8,
                        spans: inline.take(),
                        range: block_start..range.end,
                    };
                    emit(&mut blocks, &mut quotes, heading);
                }
                TagEnd::Paragraph if items.is_empty() => {
                    if !inline.is_empty() {
                        let paragraph = paragraph_block(inline.take(), block_start..range.end);
                        emit(&mut blocks, &mut quotes, paragraph);
                    }
                }
                TagEnd::CodeBlock => {
                    if let Some((lang, text)) = code.take() {
                        if let Some(item) = items.last_mut() {
                            item.inline.push_code(text.trim_end());
                        } else {
                            let block = PreviewBlock::CodeBlock {
                                lang,
                                code: text,
                                range: block_start..range.end,
                            };
                            emit(&mut blocks, &mut quotes, block);
                        }
                    }
                }
                TagEnd::List(_) => {
                    if let Some(frame) = lists.pop() {
                        match items.last_mut() {
                            Some(parent) => {
                                parent.children = frame.items;
                                parent.children_ordered = frame.ordered;
                            }
                            None => {
                                let list = PreviewBlock::List {
                                    items: frame.items,
                                    ordered: frame.ordered,
                                    start: frame.start,
                                    range: frame.range_start..range.end,
                                };
                                emit(&mut blocks, &mut quotes, list);
                            }
                        }
                    }
                }
                TagEnd::Item => {
                    if let (Some(mut item), Some(list)) = (items.pop(), lists.last_mut()) {
                        list.items.push(ListItem {
                            spans: item.inline.take(),
                            checkbox: item.checkbox,
                            children: item.children,
                            children_ordered: item.children_ordered,
                        });
                    }
                }
                TagEnd::BlockQuote(_) => {
                    if item_quotes > 0 {
                        item_quotes -= 1;
                    } else if let Some(frame) = quotes.pop() {
                        let quote = PreviewBlock::BlockQuote {
                            content: frame.content,
                            range: frame.start..range.end,
                        };
                        emit(&mut blocks, &mut quotes, quote);
                    }
                }
                TagEnd::Table => {
                    let table = PreviewBlock::Table {
                        headers: std::mem::take(&mut table_headers),
                        rows: std::mem::take(&mut table_rows),
                        range: block_start..range.end,
                    };
                    emit(&mut blocks, &mut quotes, table);
                }
                TagEnd::TableHead => {
                    table_headers = std::mem::take(&mut current_row);
                    in_table_head = false;
                }
                TagEnd::TableRow => {
                    if !in_table_head {
                        table_rows.push(std::mem::take(&mut current_row));
                    }
                }
                TagEnd::TableCell => {
                    let alignment = table_alignments
                        .get(current_row.len())
                        .copied()
                        .unwrap_or_default();
                    current_row.push(TableCell {
                        content: plain_text(&inline.take()).trim().to_string(),
                        alignment,
                    });
                }
                TagEnd::Strong => {
                    let target = inline_target(&mut items, &mut inline);
                    target.strong = target.strong.saturating_sub(1);
                }
                TagEnd::Emphasis => {
                    let target = inline_target(&mut items, &mut inline);
                    target.emphasis = target.emphasis.saturating_sub(1);
                }
                TagEnd::Strikethrough => {
                    let target = inline_target(&mut items, &mut inline);
                    target.strikethrough = target.strikethrough.saturating_sub(1);
                }
                TagEnd::Link => inline_target(&mut items, &mut inline).end_link(),
                TagEnd::Image => {
                    if let Some(pending) = image.take() {
                        inline_target(&mut items, &mut inline).push_image(pending);
                    }
                }
                _ => {}
            },

            Event::Text(text) => {
                if let Some(pending) = image.as_mut() {
                    pending.alt.push_str(&text);
                } else if let Some((_, code_text)) = code.as_mut() {
                    code_text.push_str(&text);
                } else {
                    inline_target(&mut items, &mut inline).push_text(&text);
                }
            }

            Event::Code(text) => {
                if let Some(pending) = image.as_mut() {
                    pending.alt.push_str(&text);
                } else {
                    inline_target(&mut items, &mut inline).push_code(&text);
                }
            }

            Event::Html(html) | Event::InlineHtml(html) => {
                if let Some((_, code_text)) = code.as_mut() {
                    code_text.push_str(&html);
                } else {
                    inline_target(&mut items, &mut inline).push_text(&html);
                }
            }

            Event::SoftBreak | Event::HardBreak => {
                if let Some(pending) = image.as_mut() {
                    pending.alt.push(' ');
                } else {
                    inline_target(&mut items, &mut inline).push_text("\n");
                }
            }

            Event::Rule => {
                emit(&mut blocks, &mut quotes, PreviewBlock::HorizontalRule { range });
            }

            Event::TaskListMarker(checked) => {
                if let Some(item) = items.last_mut() {
                    item.checkbox = Some(checked);
                }
            }

            _ => {}
        }
    }

    blocks
}
