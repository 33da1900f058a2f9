//! Page Visibility API name resolution
//!
//! Older engines only expose the page visibility API under a vendor
//! prefix. The names are resolved once from what the host reports.

/// Which `hidden`-style document properties the host defines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityCapabilities {
    pub hidden: bool,
    pub moz_hidden: bool,
    pub ms_hidden: bool,
    pub webkit_hidden: bool,
}

impl VisibilityCapabilities {
    /// Unprefixed API only
    pub fn standard() -> Self {
        Self { hidden: true, ..Self::default() }
    }
}

/// Event and property names of the page visibility API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityApiNames {
    /// Window event fired on visibility changes
    pub event_name: &'static str,
    /// Document property holding `"visible"`, `"hidden"`, ...
    pub state_property: &'static str,
}

/// The host has no page visibility API
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Page visibility API is not available in this environment")]
pub struct UnsupportedEnvironment;

/// Resolve the page visibility names for `capabilities`.
/// The unprefixed API wins over any vendor prefix.
pub fn resolve_visibility_api_names(
    capabilities: VisibilityCapabilities,
) -> Result<VisibilityApiNames, UnsupportedEnvironment> {
    let (event_name, state_property) = if capabilities.hidden {
        ("visibilitychange", "visibilityState")
    } else if capabilities.moz_hidden {
        ("mozvisibilitychange", "mozVisibilityState")
    } else if capabilities.ms_hidden {
        ("msvisibilitychange", "msVisibilityState")
    } else if capabilities.webkit_hidden {
        ("webkitvisibilitychange", "webkitVisibilityState")
    } else {
        return Err(UnsupportedEnvironment);
    };

    Ok(VisibilityApiNames { event_name, state_property })
}
