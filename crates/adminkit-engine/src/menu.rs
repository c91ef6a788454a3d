//! Well-known parent slugs for the host's built-in admin areas.
//!
//! Use these as the `parent_slug` of a page entry to attach it below one
//! of the standard menus instead of creating a new top-level entry.

/// The host dashboard.
pub const DASHBOARD: &str = "dashboard";
/// Content management.
pub const CONTENT: &str = "content";
/// Media library.
pub const MEDIA: &str = "media";
/// Appearance and themes.
pub const APPEARANCE: &str = "appearance";
/// Plugin management.
pub const PLUGINS: &str = "plugins";
/// User management.
pub const USERS: &str = "users";
/// Maintenance tools.
pub const TOOLS: &str = "tools";
/// General settings.
pub const SETTINGS: &str = "settings";
