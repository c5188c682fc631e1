//! Configuration constants and the runtime view configuration.

use std::env;
use std::time::Duration;

use crate::listing::SortSpec;
use crate::settings::Settings;
use crate::surface::ViewMode;

/// Edge of the square icon shown in large-icon mode.
pub const LARGE_ICON_SIZE: u32 = 128;

/// Edge of the square icon shown in details mode.
pub const SMALL_ICON_SIZE: u32 = 32;

/// How often a pending directory request checks whether the previous run has stopped.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Auto-resized columns never get narrower than this.
pub const MIN_COLUMN_WIDTH: u32 = 50;

/// Column headers, in column-index order.
pub const COLUMN_HEADERS: [&str; 4] = ["Name", "Size", "Type", "Date"];

/// Runtime configuration for a loader and its view.
/// Priority: environment variables > user settings > defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub large_icon_size: u32,
    pub small_icon_size: u32,
    pub poll_interval: Duration,
    /// When false, dot-entries are skipped while populating.
    pub show_hidden: bool,
    pub default_sort: SortSpec,
    pub view_mode: ViewMode,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            large_icon_size: LARGE_ICON_SIZE,
            small_icon_size: SMALL_ICON_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            show_hidden: true,
            default_sort: SortSpec::default(),
            view_mode: ViewMode::default(),
        }
    }
}

impl ViewConfig {
    /// Load configuration with priority: env vars > user settings > defaults.
    pub fn from_settings_and_env(settings: Option<&Settings>) -> Self {
        Self::from_settings_and_vars(settings, |key| env::var(key).ok())
    }

    /// Same as [`Self::from_settings_and_env`], reading variables through `var`.
    fn from_settings_and_vars(settings: Option<&Settings>, var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(settings) = settings {
            config.show_hidden = settings.show_hidden_files;
            if let Some(ms) = settings.poll_interval_ms {
                config.poll_interval = Duration::from_millis(ms);
            }
            if let Some(sort) = settings.default_sort {
                config.default_sort = sort;
            }
            if let Some(mode) = settings.view_mode {
                config.view_mode = mode;
            }
        }

        let parse = |key: &str| var(key).and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(ms) = parse("THUMBVIEW_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(v) = var("THUMBVIEW_SHOW_HIDDEN") {
            config.show_hidden = v == "true" || v == "1";
        }
        if let Some(size) = parse("THUMBVIEW_LARGE_ICON_SIZE").and_then(|v| u32::try_from(v).ok()) {
            config.large_icon_size = size;
        }
        if let Some(size) = parse("THUMBVIEW_SMALL_ICON_SIZE").and_then(|v| u32::try_from(v).ok()) {
            config.small_icon_size = size;
        }

        // A zero interval would turn the pending-request timer into a spin loop.
        if config.poll_interval.is_zero() {
            config.poll_interval = DEFAULT_POLL_INTERVAL;
        }

        log::debug!("View config: {:?}", config);
        config
    }
}
