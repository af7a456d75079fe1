// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::section::SectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Scrolled,
    /// Target detached or zero-size; nothing moved.
    Skipped,
}

/// Scrolling surface the sections live on.
pub trait Viewport {
    /// Aligns the section's root to the top of the viewport.
    fn scroll_into_view(&mut self, section: SectionKind) -> ScrollOutcome;
    fn scroll_by(&mut self, dy: i32);
    fn scroll_to_section(&mut self, selector: &str);
}

/// A viewport with nothing mounted; every scroll is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetachedViewport;

impl Viewport for DetachedViewport {
    fn scroll_into_view(&mut self, _section: SectionKind) -> ScrollOutcome {
        ScrollOutcome::Skipped
    }

    fn scroll_by(&mut self, _dy: i32) {}

    fn scroll_to_section(&mut self, _selector: &str) {}
}

pub fn section_selector(anchor: &str) -> String {
    format!("[data-section=\"{anchor}\"]")
}

/// Extracts `anchor` from `[data-section="anchor"]`.
pub fn section_anchor(selector: &str) -> Option<&str> {
    let inner = selector
        .trim()
        .strip_prefix("[data-section=")?
        .strip_suffix(']')?;
    let unquoted = inner
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| {
            inner
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
        })
        .unwrap_or(inner);
    (!unquoted.is_empty()).then_some(unquoted)
}
