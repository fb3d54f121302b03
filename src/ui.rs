//! Immediate-mode button panel built on [`Draw2d`].
//!
//! The panel is rebuilt every frame: create a [`UiPanel`] (which queues the
//! background, border and title), then stack [`UiPanel::button`] calls. A
//! button returns `true` on the frame the left mouse button goes down inside
//! it.

use crate::draw2d::{Color, Draw2d};
use crate::input::Input;
use winit::event::MouseButton;

const PANEL_BG: Color = Color::rgba(0.08, 0.08, 0.1, 0.88);
const PANEL_BORDER: Color = Color::rgba(0.4, 0.4, 0.45, 1.0);
const TITLE_BG: Color = Color::rgba(0.14, 0.14, 0.18, 0.95);

const BUTTON_BG: Color = Color::rgba(0.2, 0.2, 0.25, 1.0);
const BUTTON_HOVER: Color = Color::rgba(0.3, 0.3, 0.38, 1.0);
const BUTTON_ACTIVE: Color = Color::rgba(0.16, 0.3, 0.5, 1.0);

const TITLE_HEIGHT: f32 = 24.0;
const BUTTON_HEIGHT: f32 = 26.0;
const MARGIN: f32 = 8.0;
const SPACING: f32 = 6.0;

/// A vertical stack of buttons inside a titled panel.
pub struct UiPanel {
    x: f32,
    y: f32,
    width: f32,
    cursor_y: f32,
}

impl UiPanel {
    /// Start a panel at `(x, y)`. `height` is the full panel height; buttons
    /// stack below the title bar.
    pub fn new(draw: &mut Draw2d, x: f32, y: f32, width: f32, height: f32, title: &str) -> Self {
        draw.rect(x, y, width, height, PANEL_BG);

        // 1px border
        draw.rect(x, y, width, 1.0, PANEL_BORDER);
        draw.rect(x, y + height - 1.0, width, 1.0, PANEL_BORDER);
        draw.rect(x, y, 1.0, height, PANEL_BORDER);
        draw.rect(x + width - 1.0, y, 1.0, height, PANEL_BORDER);

        draw.rect(x, y, width, TITLE_HEIGHT, TITLE_BG);
        draw.text(x + MARGIN, y + 4.0, title, Color::WHITE);

        Self {
            x,
            y,
            width,
            cursor_y: y + TITLE_HEIGHT + MARGIN,
        }
    }

    /// Height needed for a panel with `buttons` stacked buttons.
    pub fn height_for(buttons: usize) -> f32 {
        TITLE_HEIGHT + MARGIN + buttons as f32 * (BUTTON_HEIGHT + SPACING) + MARGIN - SPACING
    }

    /// Stack a button and return whether it was clicked this frame.
    pub fn button(&mut self, draw: &mut Draw2d, input: &Input, label: &str) -> bool {
        let bx = self.x + MARGIN;
        let by = self.cursor_y;
        let bw = self.width - 2.0 * MARGIN;
        let bh = BUTTON_HEIGHT;
        self.cursor_y += bh + SPACING;

        let mouse = input.mouse_position();
        let hovered =
            mouse.x >= bx && mouse.x <= bx + bw && mouse.y >= by && mouse.y <= by + bh;
        let held = hovered && input.mouse_down(MouseButton::Left);
        let clicked = hovered && input.mouse_pressed(MouseButton::Left);

        let bg = if held {
            BUTTON_ACTIVE
        } else if hovered {
            BUTTON_HOVER
        } else {
            BUTTON_BG
        };
        draw.rect(bx, by, bw, bh, bg);

        let text_width = draw.measure(label);
        let tx = bx + ((bw - text_width) * 0.5).max(4.0);
        let ty = by + (bh - draw.line_height()).max(0.0) * 0.5;
        draw.text(tx, ty, label, Color::WHITE);

        clicked
    }
}
