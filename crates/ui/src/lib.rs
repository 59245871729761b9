#![warn(missing_docs)]
//! HUD overlay using egui: crosshair, interaction hint and placement selection label.

use egui::{Align2, Color32, Context, FontId, Pos2, Stroke};

/// Where interaction systems publish player-facing text.
///
/// Every call is idempotent; systems may call these once per frame.
pub trait HintSink {
    /// Show `text` as the interaction hint.
    fn set_hint(&mut self, text: &str);
    /// Hide the interaction hint.
    fn clear_hint(&mut self);
    /// Show `text` as the placement selection label.
    fn set_selection(&mut self, text: &str);
    /// Hide the placement selection label.
    fn clear_selection(&mut self);
}

/// HUD state and rendering.
#[derive(Debug, Default, Clone)]
pub struct HudState {
    hint: Option<String>,
    selection: Option<String>,
    /// Number of times the visible hint text actually changed.
    hint_changes: u64,
}

impl HudState {
    /// Create a new HUD state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hint currently shown, if any.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Selection label currently shown, if any.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// How often the hint text changed (repeats of the same text do not count).
    pub fn hint_changes(&self) -> u64 {
        self.hint_changes
    }

    /// Render the HUD.
    pub fn render(&self, ctx: &Context) {
        // Always render crosshair
        self.render_crosshair(ctx);

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("hud_text"),
        ));
        let screen_rect = ctx.screen_rect();

        if let Some(hint) = &self.hint {
            painter.text(
                Pos2::new(screen_rect.center().x, screen_rect.center().y + 40.0),
                Align2::CENTER_TOP,
                hint,
                FontId::proportional(20.0),
                Color32::WHITE,
            );
        }

        if let Some(selection) = &self.selection {
            painter.text(
                Pos2::new(screen_rect.left() + 16.0, screen_rect.bottom() - 16.0),
                Align2::LEFT_BOTTOM,
                selection,
                FontId::proportional(18.0),
                Color32::from_rgb(255, 200, 120),
            );
        }
    }

    /// Render crosshair in the center of the screen.
    fn render_crosshair(&self, ctx: &Context) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("crosshair"),
        ));

        let center = ctx.screen_rect().center();
        let size = 10.0;
        // Brighter while something is targeted.
        let color = if self.hint.is_some() {
            Color32::from_rgb(255, 230, 120)
        } else {
            Color32::WHITE
        };
        let stroke = Stroke::new(2.0, color);

        painter.line_segment(
            [
                Pos2::new(center.x - size, center.y),
                Pos2::new(center.x + size, center.y),
            ],
            stroke,
        );
        painter.line_segment(
            [
                Pos2::new(center.x, center.y - size),
                Pos2::new(center.x, center.y + size),
            ],
            stroke,
        );
    }
}

impl HintSink for HudState {
    fn set_hint(&mut self, text: &str) {
        if self.hint.as_deref() != Some(text) {
            self.hint = Some(text.to_string());
            self.hint_changes += 1;
        }
    }

    fn clear_hint(&mut self) {
        if self.hint.take().is_some() {
            self.hint_changes += 1;
        }
    }

    fn set_selection(&mut self, text: &str) {
        self.selection = Some(text.to_string());
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }
}
