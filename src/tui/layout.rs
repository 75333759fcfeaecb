//! Responsive layout decisions.
//!
//! Single source of truth for width thresholds; render code asks here instead
//! of comparing widths itself.

use crate::catalog::selection::{ScrollPolicy, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// Below the configured breakpoint: one section at a time
    Narrow,
    /// Three columns: index/drugs, subdrugs, details
    Columns,
}

impl Breakpoint {
    pub fn from_width(width: u16, policy: &ScrollPolicy) -> Self {
        if policy.is_narrow(width) {
            Breakpoint::Narrow
        } else {
            Breakpoint::Columns
        }
    }

    pub fn is_narrow(&self) -> bool {
        *self == Breakpoint::Narrow
    }
}

/// Sections in the order a narrow layout stacks them
pub const STACK: [Section; 4] = [
    Section::Letters,
    Section::Drugs,
    Section::Subdrugs,
    Section::Details,
];

/// 1-based position of a section in the stack, for "2/4" indicators
pub fn stack_position(section: Section) -> usize {
    STACK
        .iter()
        .position(|&s| s == section)
        .map_or(1, |i| i + 1)
}

/// Section above `section` in the stack, if any
pub fn section_above(section: Section) -> Option<Section> {
    let i = stack_position(section) - 1;
    i.checked_sub(1).map(|above| STACK[above])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn breakpoint_thresholds() {
        let policy = ScrollPolicy {
            breakpoint: 100,
            delay: Duration::from_millis(100),
        };
        assert_eq!(Breakpoint::from_width(40, &policy), Breakpoint::Narrow);
        assert_eq!(Breakpoint::from_width(99, &policy), Breakpoint::Narrow);
        assert_eq!(Breakpoint::from_width(100, &policy), Breakpoint::Columns);
        assert_eq!(Breakpoint::from_width(200, &policy), Breakpoint::Columns);
    }

    #[test]
    fn stack_navigation() {
        assert_eq!(stack_position(Section::Letters), 1);
        assert_eq!(stack_position(Section::Details), 4);
        assert_eq!(section_above(Section::Letters), None);
        assert_eq!(section_above(Section::Subdrugs), Some(Section::Drugs));
    }
}
