//! Rendering seam between the editor and the preview

/// Converts markdown source into something the preview can display.
///
/// Implementations must be pure: the same input always yields the same
/// output and rendering has no side effects.
pub trait Renderer {
    type Output;

    fn render(&self, markdown: &str) -> Self::Output;
}
