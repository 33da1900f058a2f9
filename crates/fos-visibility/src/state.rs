//! Signal state
//!
//! One boolean per independent visibility signal.

use std::fmt;

/// An independently updated visibility signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    CssVisibility,
    CssDisplay,
    CssOpacity,
    ViewportIntersecting,
    DocumentFocused,
    DocumentVisible,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::CssVisibility,
        Signal::CssDisplay,
        Signal::CssOpacity,
        Signal::ViewportIntersecting,
        Signal::DocumentFocused,
        Signal::DocumentVisible,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Signal::CssVisibility => "cssVisibility",
            Signal::CssDisplay => "cssDisplay",
            Signal::CssOpacity => "cssOpacity",
            Signal::ViewportIntersecting => "viewportIntersecting",
            Signal::DocumentFocused => "documentFocused",
            Signal::DocumentVisible => "documentVisible",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Latest observed value of every signal. Everything starts `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalState {
    pub css_visibility: bool,
    pub css_display: bool,
    pub css_opacity: bool,
    pub viewport_intersecting: bool,
    pub document_focused: bool,
    pub document_visible: bool,
}

impl SignalState {
    pub fn get(&self, signal: Signal) -> bool {
        match signal {
            Signal::CssVisibility => self.css_visibility,
            Signal::CssDisplay => self.css_display,
            Signal::CssOpacity => self.css_opacity,
            Signal::ViewportIntersecting => self.viewport_intersecting,
            Signal::DocumentFocused => self.document_focused,
            Signal::DocumentVisible => self.document_visible,
        }
    }

    pub fn set(&mut self, signal: Signal, value: bool) {
        let field = match signal {
            Signal::CssVisibility => &mut self.css_visibility,
            Signal::CssDisplay => &mut self.css_display,
            Signal::CssOpacity => &mut self.css_opacity,
            Signal::ViewportIntersecting => &mut self.viewport_intersecting,
            Signal::DocumentFocused => &mut self.document_focused,
            Signal::DocumentVisible => &mut self.document_visible,
        };
        *field = value;
    }

    /// Logical AND of every signal
    pub fn all_visible(&self) -> bool {
        Signal::ALL.iter().all(|&s| self.get(s))
    }

    /// Signals currently reporting not visible
    pub fn blocking(&self) -> impl Iterator<Item = Signal> + '_ {
        Signal::ALL.into_iter().filter(|&s| !self.get(s))
    }
}
