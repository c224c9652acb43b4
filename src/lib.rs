/*!
# Portfolio Site

A personal academic portfolio: one scrolling page with News, Research, Projects,
Publications, Experience and Contact sections, a blog page and an RSS feed,
generated in Rust from a single JSON data file.

## Architecture

### Navigation core
- **nav**: scroll progress, active-section detection, header threshold,
  back-to-top visibility and the mobile menu. Pure and platform independent;
  the display surface is reached only through the `AnchorRectProvider` and
  `ScrollDriver` traits.
- **theme**: light/dark resolution and the toggle state machine
- **binding**: shares a controller between event callbacks and releases
  listeners when dropped

### Site generation
- **data**: the portfolio data file (serde) and its validation
- **views**: display rules such as author truncation, owner highlighting and
  the alternating experience timeline
- **render**: handlebars templates producing the pages
- **rss**: the blog feed
- **export**: writes a self-contained static site
- **scholar**: normalizes scraped publication rows into the data file

### Surfaces
- **app** (feature `web`): axum development server
- **wasm** (feature `wasm`): browser bindings for the navigation core and the
  theme toggle

## Configuration

Settings come from `site.toml`, then `PORTFOLIO__*` environment variables,
then command line flags. See [`config::SiteConfig`].
*/

pub mod binding;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod nav;
pub mod render;
pub mod rss;
pub mod scholar;
pub mod theme;
pub mod views;

#[cfg(feature = "web")]
pub mod app;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::SiteConfig;
pub use data::{Portfolio, load_portfolio, save_portfolio};
pub use error::{SiteError, SiteResult};
pub use nav::{
    AnchorRect, AnchorRectProvider, DerivedUiState, MenuState, NavItem, NavigationController,
    ScrollDriver, ScrollState,
};
pub use render::{RenderOptions, RenderedSite, SiteRenderer};
pub use theme::{Theme, ThemeToggle};
