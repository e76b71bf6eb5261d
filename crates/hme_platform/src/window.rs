use std::sync::Arc;

use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Hyrule Map Explorer".to_string(),
            width: 1024,
            height: 768,
            resizable: true,
        }
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, OsError> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable);

    let window = event_loop.create_window(attrs)?;
    log::debug!(
        "Window '{}' scale factor {:.2}",
        config.title,
        window.scale_factor()
    );
    Ok(Arc::new(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_resizable_1024x768() {
        let config = PlatformConfig::default();
        assert_eq!((config.width, config.height), (1024, 768));
        assert!(config.resizable);
        assert_eq!(config.title, "Hyrule Map Explorer");
    }
}
