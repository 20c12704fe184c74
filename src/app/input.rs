use glam::Vec2;
use rustc_hash::FxHashSet;

/// Pointer buttons the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Pointer state in window pixels.
#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Current cursor position, origin at the top-left corner.
    pub cursor_position: Vec2,
    /// Cursor movement accumulated since the last `end_frame`.
    pub cursor_delta: Vec2,
    /// Wheel movement since the last `end_frame`, in lines. Positive y
    /// scrolls away from the user.
    pub scroll_delta: Vec2,
    /// Window size in physical pixels.
    pub screen_size: Vec2,
    buttons: FxHashSet<PointerButton>,
    seen_cursor: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_screen_size(width: u32, height: u32) -> Self {
        Self {
            screen_size: Vec2::new(width as f32, height as f32),
            ..Self::default()
        }
    }

    /// Clears per-frame deltas.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if self.seen_cursor {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.seen_cursor = true;
        self.cursor_position = new_pos;
    }

    pub fn handle_button(&mut self, button: PointerButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    pub fn handle_scroll(&mut self, lines_x: f32, lines_y: f32) {
        self.scroll_delta += Vec2::new(lines_x, lines_y);
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Cursor position in normalized device coordinates, `None` while the
    /// window has no area.
    #[must_use]
    pub fn pointer_ndc(&self) -> Option<Vec2> {
        normalized_pointer(self.cursor_position, self.screen_size)
    }
}

/// Maps a pixel position to normalized device coordinates: x grows to the
/// right and y grows upwards, both in `[-1, 1]` across the window.
#[must_use]
pub fn normalized_pointer(pixel: Vec2, screen_size: Vec2) -> Option<Vec2> {
    if screen_size.x <= 0.0 || screen_size.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        pixel.x / screen_size.x * 2.0 - 1.0,
        -(pixel.y / screen_size.y) * 2.0 + 1.0,
    ))
}
