//! UI components: editor and preview panes, preview rendering, file dialogs

pub mod block_renderer;
pub mod editor;
pub mod file_dialogs;
pub mod markdown_blocks;
pub mod preview;
