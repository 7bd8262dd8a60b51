//! Block rendering for the preview pane
//!
//! Draws the blocks produced by [`super::markdown_blocks`] with egui
//! widgets. Renderers return a [`BlockAction`] when the user interacted with
//! something the application has to handle.

use eframe::egui::{self, Color32, FontId, RichText, Ui};

use super::markdown_blocks::{InlineSpan, ListItem, PreviewBlock, TableAlignment, TableCell};

/// Action that can be triggered by block interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockAction {
    /// Open external URL
    OpenUrl(String),
}

/// Render a parsed block to the UI. `base_size` is the body font size.
pub fn render_block(ui: &mut Ui, block: &PreviewBlock, base_size: f32) -> Option<BlockAction> {
    match block {
        PreviewBlock::Heading { level, spans, .. } => render_heading(ui, *level, spans, base_size),
        PreviewBlock::Paragraph { spans, .. } => {
            let action = render_spans(ui, spans, base_size);
            ui.add_space(8.0);
            action
        }
        PreviewBlock::CodeBlock { lang, code, .. } => {
            render_code_block(ui, lang.as_deref(), code, base_size);
            None
        }
        PreviewBlock::List {
            items,
            ordered,
            start,
            ..
        } => {
            let action = render_list(ui, items, *ordered, *start, base_size);
            ui.add_space(8.0);
            action
        }
        PreviewBlock::BlockQuote { content, .. } => render_blockquote(ui, content, base_size),
        PreviewBlock::HorizontalRule { .. } => {
            ui.add_space(8.0);
            ui.separator();
            ui.add_space(8.0);
            None
        }
        PreviewBlock::Table { headers, rows, range } => {
            render_table(ui, range.start, headers, rows);
            None
        }
        PreviewBlock::Image { alt, url, title, .. } => render_image(ui, alt, url, title.as_deref()),
    }
}

fn heading_size(level: u8, base_size: f32) -> f32 {
    match level {
        1 => base_size * 2.0,
        2 => base_size * 1.7,
        3 => base_size * 1.4,
        4 => base_size * 1.25,
        5 => base_size * 1.1,
        _ => base_size,
    }
}

/// Render a heading
pub fn render_heading(ui: &mut Ui, level: u8, spans: &[InlineSpan], base_size: f32) -> Option<BlockAction> {
    let font_size = heading_size(level, base_size);
    let mut action = None;

    ui.horizontal_wrapped(|ui| {
        for span in spans {
            let text = RichText::new(span.text())
                .font(FontId::proportional(font_size))
                .strong();
            match span {
                InlineSpan::Link { url, .. } => {
                    if ui.link(text).clicked() {
                        action = Some(BlockAction::OpenUrl(url.clone()));
                    }
                }
                _ => {
                    ui.label(text);
                }
            }
        }
    });

    ui.add_space(match level {
        1 => 12.0,
        2 => 10.0,
        _ => 6.0,
    });

    action
}

/// Render inline spans as one wrapped line of widgets
pub fn render_spans(ui: &mut Ui, spans: &[InlineSpan], base_size: f32) -> Option<BlockAction> {
    let mut action = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            match span {
                InlineSpan::Text(t) => {
                    ui.label(RichText::new(t).size(base_size));
                }
                InlineSpan::Code(code) => {
                    ui.label(
                        RichText::new(code)
                            .font(FontId::monospace(base_size))
                            .background_color(ui.visuals().code_bg_color),
                    );
                }
                InlineSpan::Strong(t) => {
                    ui.label(RichText::new(t).size(base_size).strong());
                }
                InlineSpan::Emphasis(t) => {
                    ui.label(RichText::new(t).size(base_size).italics());
                }
                InlineSpan::Strikethrough(t) => {
                    ui.label(RichText::new(t).size(base_size).strikethrough());
                }
                InlineSpan::Link { text, url } => {
                    let response = ui.link(RichText::new(text).size(base_size));
                    if response.clicked() {
                        action = Some(BlockAction::OpenUrl(url.clone()));
                    }
                    response.on_hover_text(url.as_str());
                }
                InlineSpan::Image { alt, url, title } => {
                    let label = if alt.is_empty() { url } else { alt };
                    let response = ui.link(RichText::new(label).size(base_size).italics());
                    if response.clicked() {
                        action = Some(BlockAction::OpenUrl(url.clone()));
                    }
                    response.on_hover_text(image_hover(url, title.as_deref()));
                }
            }
        }
    });

    action
}

/// Render a code block
pub fn render_code_block(ui: &mut Ui, lang: Option<&str>, code: &str, base_size: f32) {
    egui::Frame::new()
        .fill(ui.visuals().code_bg_color)
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .inner_margin(egui::Margin::same(8))
        .outer_margin(egui::Margin::symmetric(0, 4))
        .corner_radius(4.0)
        .show(ui, |ui| {
            if let Some(lang) = lang {
                ui.label(
                    RichText::new(lang)
                        .font(FontId::monospace(base_size * 0.85))
                        .weak(),
                );
                ui.add_space(4.0);
            }

            ui.label(RichText::new(code.trim_end_matches('\n')).font(FontId::monospace(base_size)));
        });

    ui.add_space(8.0);
}

/// Render a list (ordered or unordered)
pub fn render_list(
    ui: &mut Ui,
    items: &[ListItem],
    ordered: bool,
    start: Option<u64>,
    base_size: f32,
) -> Option<BlockAction> {
    let mut action = None;
    let start_num = start.unwrap_or(1);

    for (idx, item) in items.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.add_space(16.0);

            let marker = if let Some(checked) = item.checkbox {
                let boxed = if checked { "\u{2611}" } else { "\u{2610}" };
                boxed.to_string()
            } else if ordered {
                format!("{}.", start_num + idx as u64)
            } else {
                "\u{2022}".to_string()
            };
            ui.label(RichText::new(marker).size(base_size).weak());
            ui.add_space(4.0);

            if let Some(a) = render_spans(ui, &item.spans, base_size) {
                action = Some(a);
            }
        });

        if !item.children.is_empty() {
            ui.horizontal(|ui| {
                ui.add_space(16.0);
                ui.vertical(|ui| {
                    if let Some(a) = render_list(ui, &item.children, item.children_ordered, None, base_size) {
                        action = Some(a);
                    }
                });
            });
        }
    }

    action
}

/// Render a blockquote and the blocks inside it
pub fn render_blockquote(ui: &mut Ui, content: &[PreviewBlock], base_size: f32) -> Option<BlockAction> {
    let mut action = None;

    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .inner_margin(egui::Margin {
            left: 12,
            right: 8,
            top: 8,
            bottom: 8,
        })
        .show(ui, |ui| {
            // Left border
            let rect = ui.max_rect();
            ui.painter().rect_filled(
                egui::Rect::from_min_size(rect.min - egui::vec2(12.0, 8.0), egui::vec2(4.0, rect.height() + 16.0)),
                0.0,
                Color32::from_rgb(100, 100, 120),
            );

            for block in content {
                if let Some(a) = render_block(ui, block, base_size) {
                    action = Some(a);
                }
            }
        });

    ui.add_space(8.0);
    action
}

fn cell_layout(alignment: TableAlignment) -> egui::Layout {
    match alignment {
        TableAlignment::Left => egui::Layout::left_to_right(egui::Align::Center),
        TableAlignment::Center => egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
        TableAlignment::Right => egui::Layout::right_to_left(egui::Align::Center),
    }
}

/// Render a table
pub fn render_table(ui: &mut Ui, id: usize, headers: &[TableCell], rows: &[Vec<TableCell>]) {
    use egui_extras::{Column, TableBuilder};

    let num_cols = headers.len().max(1);

    ui.push_id(("preview_table", id), |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().at_least(60.0), num_cols)
            .header(20.0, |mut header| {
                for cell in headers {
                    header.col(|ui| {
                        ui.with_layout(cell_layout(cell.alignment), |ui| {
                            ui.strong(&cell.content);
                        });
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(18.0, |mut row_ui| {
                        for idx in 0..num_cols {
                            row_ui.col(|ui| {
                                if let Some(cell) = row.get(idx) {
                                    ui.with_layout(cell_layout(cell.alignment), |ui| {
                                        ui.label(&cell.content);
                                    });
                                }
                            });
                        }
                    });
                }
            });
    });

    ui.add_space(8.0);
}

/// Hover text for an image link: its title, else where it points
fn image_hover<'a>(url: &'a str, title: Option<&'a str>) -> &'a str {
    title.unwrap_or(url)
}

/// Render an image as a placeholder with its alt text; clicking opens it
pub fn render_image(ui: &mut Ui, alt: &str, url: &str, title: Option<&str>) -> Option<BlockAction> {
    let mut action = None;

    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .inner_margin(egui::Margin::same(8))
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                if !alt.is_empty() {
                    ui.label(RichText::new(alt).italics());
                }
                let response = ui.link(RichText::new(url).font(FontId::monospace(12.0)));
                if response.clicked() {
                    action = Some(BlockAction::OpenUrl(url.to_string()));
                }
                response.on_hover_text(image_hover(url, title));
            });
        });

    ui.add_space(8.0);
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_sizes_shrink_with_level() {
        let sizes: Vec<f32> = (1..=6).map(|level| heading_size(level, 14.0)).collect();
        assert!(sizes.windows(2).all(|pair| pair[0] > pair[1]));
        assert_eq!(heading_size(9, 14.0), 14.0);
    }

    #[test]
    fn test_image_hover_prefers_title() {
        assert_eq!(image_hover("cat.png", Some("Cat")), "Cat");
        assert_eq!(image_hover("cat.png", None), "cat.png");
    }
}
