//! Page Visibility API
//!
//! Track document visibility state.

use fos_visibility::VisibilityCapabilities;

/// Visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
}

impl VisibilityState {
    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityState::Visible => "visible",
            VisibilityState::Hidden => "hidden",
        }
    }
}

/// Which flavour of the page visibility API the page exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityVendor {
    #[default]
    Standard,
    Moz,
    Ms,
    Webkit,
    /// No page visibility API at all
    Unsupported,
}

impl VisibilityVendor {
    pub fn capabilities(self) -> VisibilityCapabilities {
        let mut caps = VisibilityCapabilities::default();
        match self {
            VisibilityVendor::Standard => caps.hidden = true,
            VisibilityVendor::Moz => caps.moz_hidden = true,
            VisibilityVendor::Ms => caps.ms_hidden = true,
            VisibilityVendor::Webkit => caps.webkit_hidden = true,
            VisibilityVendor::Unsupported => {}
        }
        caps
    }

    /// Name of the boolean `hidden` property
    pub fn hidden_property(self) -> Option<&'static str> {
        match self {
            VisibilityVendor::Standard => Some("hidden"),
            VisibilityVendor::Moz => Some("mozHidden"),
            VisibilityVendor::Ms => Some("msHidden"),
            VisibilityVendor::Webkit => Some("webkitHidden"),
            VisibilityVendor::Unsupported => None,
        }
    }
}

/// Document visibility
#[derive(Debug, Default)]
pub struct DocumentVisibility {
    state: VisibilityState,
}

impl DocumentVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current visibility state
    pub fn visibility_state(&self) -> VisibilityState {
        self.state
    }

    /// Check if document is hidden
    pub fn is_hidden(&self) -> bool {
        self.state == VisibilityState::Hidden
    }

    /// Set visibility state. Returns whether it changed.
    pub fn set_state(&mut self, state: VisibilityState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }
}
