/// Lowest reflection order the viewport can be limited to.
pub const MIN_RENDER_ORDER: usize = 2;

/// How ray paths are shown in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Whether rays should be rendered at all
    pub render: bool,
    /// Highest reflection order drawn, never below [`MIN_RENDER_ORDER`]
    pub render_order: usize,
    /// Size each source's buffers by its own longest ray history instead of
    /// the first ray of the first source
    pub per_source_max_order: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render: true,
            render_order: MIN_RENDER_ORDER,
            per_source_max_order: false,
        }
    }
}

impl RenderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn render_order(mut self, order: usize) -> Self {
        self.render_order = order.max(MIN_RENDER_ORDER);
        self
    }

    pub fn per_source_max_order(mut self, enable: bool) -> Self {
        self.per_source_max_order = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_order_is_clamped() {
        assert_eq!(RenderSettings::new().render_order(0).render_order, 2);
        assert_eq!(RenderSettings::new().render_order(7).render_order, 7);
    }
}
