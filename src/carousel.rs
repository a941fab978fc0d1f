// src/carousel.rs
//! Project carousel focus tracking.
//!
//! The track is a horizontally scrolling list of cards. A visibility watcher
//! scoped to the container reports intersection changes in batches; whichever
//! card last crossed into the qualifying ratio is the single focused card.
//! Leaving the ratio never clears focus on its own, so mid-scroll the previous
//! card stays focused until another one qualifies.

use serde::Serialize;
use tracing::debug;

use crate::content::Project;

pub const CARD_CLASS: &str = "project-card";
pub const FOCUSED_CLASS: &str = "focused";
pub const DEFAULT_THRESHOLD: f32 = 0.8;

/// Options handed to the visibility watcher on the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverOptions {
    pub root_margin: String,
    pub threshold: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: "0px".to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// One visibility notification for the card at `index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub index: usize,
    pub intersection_ratio: f32,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn entering(index: usize, ratio: f32) -> Self {
        Self {
            index,
            intersection_ratio: ratio,
            is_intersecting: true,
        }
    }

    pub fn leaving(index: usize, ratio: f32) -> Self {
        Self {
            index,
            intersection_ratio: ratio,
            is_intersecting: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView {
    pub index: usize,
    pub focused: bool,
}

/// Exclusive focus over `card_count` cards. The single `focused` slot is the
/// whole state, so two cards can never be focused at once.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    card_count: usize,
    focused: Option<usize>,
    options: ObserverOptions,
}

impl FocusTracker {
    pub fn new(card_count: usize) -> Self {
        Self::with_options(card_count, ObserverOptions::default())
    }

    pub fn with_options(card_count: usize, options: ObserverOptions) -> Self {
        Self {
            card_count,
            focused: None,
            options,
        }
    }

    /// Markup pre-seeded a default-focused card. Out of range seeds are ignored.
    pub fn with_focused(card_count: usize, index: usize) -> Self {
        let mut t = Self::new(card_count);
        if index < card_count {
            t.focused = Some(index);
        }
        t
    }

    pub fn is_empty(&self) -> bool {
        self.card_count == 0
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn is_focused(&self, index: usize) -> bool {
        self.focused == Some(index)
    }

    /// Apply one batch of notifications in delivery order; the last qualifying
    /// entry wins. Returns the focused index after the batch.
    pub fn handle_batch(&mut self, entries: &[IntersectionEntry]) -> Option<usize> {
        let threshold = self.options.threshold;
        let card_count = self.card_count;
        for entry in entries {
            let qualifies = entry.is_intersecting
                && entry.intersection_ratio >= threshold
                && entry.index < card_count;
            if !qualifies {
                continue;
            }
            if self.focused != Some(entry.index) {
                debug!(
                    target: "carousel",
                    from = ?self.focused,
                    to = entry.index,
                    ratio = entry.intersection_ratio,
                    "focus moved"
                );
            }
            self.focused = Some(entry.index);
        }
        self.focused
    }

    /// CSS class list for the card at `index`.
    pub fn class_list(&self, index: usize) -> String {
        if self.is_focused(index) {
            format!("{CARD_CLASS} {FOCUSED_CLASS}")
        } else {
            CARD_CLASS.to_string()
        }
    }

    pub fn cards(&self) -> Vec<CardView> {
        (0..self.card_count)
            .map(|index| CardView {
                index,
                focused: self.is_focused(index),
            })
            .collect()
    }
}

/// Render the carousel track for `projects` with the tracker's focus state.
pub fn render_track(projects: &[Project], tracker: &FocusTracker) -> String {
    let mut out = String::from(r#"<div class="carousel-track">"#);
    for (i, p) in projects.iter().enumerate() {
        out.push_str(&format!(
            r#"<div class="{}" data-index="{}"><div class="card-content">"#,
            tracker.class_list(i),
            i,
        ));
        out.push_str(&format!(
            r#"<h3 class="project-title">{}</h3><p class="project-description">{}</p>"#,
            html_escape::encode_text(&p.title),
            html_escape::encode_text(&p.description),
        ));
        out.push_str("</div></div>");
    }
    out.push_str("</div>");
    out
}
