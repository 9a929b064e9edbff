use anyhow::Result;

use crate::config::Settings;
use crate::data::resolver::Resolver;
use crate::report::composer::Composer;
use crate::ui::page::Pages;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything a request needs, built once at start-up and never mutated.
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub resolver: Resolver,
    pub composer: Composer,
    pub pages: Pages,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self {
            resolver: Resolver::new(settings.predictors.clone()),
            composer: Composer::new(&settings),
            pages: Pages::new()?,
            settings,
        })
    }
}
