//! Computed style classification

use std::fmt;
use std::rc::Rc;

use fos_dom::NodeId;

use crate::engine::SignalSink;
use crate::host::ComputedStyleSource;
use crate::state::Signal;

/// The three style-derived signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssVisibility {
    pub visibility: bool,
    pub display: bool,
    pub opacity: bool,
}

/// Reads computed `visibility`, `display` and `opacity` of one element
pub struct StyleVisibilityChecker {
    element: NodeId,
    styles: Rc<dyn ComputedStyleSource>,
}

impl StyleVisibilityChecker {
    pub fn new(element: NodeId, styles: Rc<dyn ComputedStyleSource>) -> Self {
        Self { element, styles }
    }

    /// Classify the current computed style. A property without a
    /// computed value counts as not visible.
    pub fn check(&self) -> CssVisibility {
        let read = |property| self.styles.computed_style(self.element, property);

        CssVisibility {
            visibility: read("visibility").is_some_and(|v| visibility_is_visible(&v)),
            display: read("display").is_some_and(|v| display_is_visible(&v)),
            opacity: read("opacity").is_some_and(|v| opacity_is_visible(&v)),
        }
    }

    /// Write all three CSS signals. Does not evaluate.
    pub(crate) fn refresh(&self, sink: &SignalSink) {
        let css = self.check();
        sink.record(Signal::CssVisibility, css.visibility);
        sink.record(Signal::CssDisplay, css.display);
        sink.record(Signal::CssOpacity, css.opacity);
    }
}

impl fmt::Debug for StyleVisibilityChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleVisibilityChecker")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

fn visibility_is_visible(value: &str) -> bool {
    value.trim() == "visible"
}

fn display_is_visible(value: &str) -> bool {
    value.trim() != "none"
}

/// Only an opacity that parses to exactly zero hides the element
fn opacity_is_visible(value: &str) -> bool {
    parse_float_prefix(value) != Some(0.0)
}

/// Parse the longest leading float, ignoring trailing junk (`"0px"` -> 0)
fn parse_float_prefix(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let candidate_len = value
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .unwrap_or(value.len());

    (1..=candidate_len)
        .rev()
        .find_map(|end| value[..end].parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    #[test]
    fn test_classify_values() {
        assert!(visibility_is_visible("visible"));
        assert!(!visibility_is_visible("hidden"));
        assert!(!visibility_is_visible("collapse"));

        assert!(display_is_visible("block"));
        assert!(display_is_visible("contents"));
        assert!(!display_is_visible("none"));

        assert!(opacity_is_visible("1"));
        assert!(opacity_is_visible(".01"));
        assert!(!opacity_is_visible("0"));
        assert!(!opacity_is_visible("0.0"));
        assert!(!opacity_is_visible("-0"));
    }

    #[test]
    fn test_opacity_unparsable_counts_visible() {
        assert!(opacity_is_visible(""));
        assert!(opacity_is_visible("banana"));
        assert!(!opacity_is_visible("0px"));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("  2.5e1x"), Some(25.0));
    }

    #[test]
    fn test_check_reads_host() {
        let host = FakeHost::new();
        let element = NodeId::from_raw(1);
        host.set_style(element, "visibility", "visible");
        host.set_style(element, "display", "none");
        host.set_style(element, "opacity", "0.5");

        let checker = StyleVisibilityChecker::new(element, host.clone());
        assert_eq!(checker.check(), CssVisibility { visibility: true, display: false, opacity: true });
    }

    #[test]
    fn test_check_without_style_context() {
        let host = FakeHost::new();
        let checker = StyleVisibilityChecker::new(NodeId::from_raw(7), host);
        assert_eq!(checker.check(), CssVisibility::default());
    }
}
