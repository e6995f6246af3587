//! # Input State
//!
//! Input is read once per frame into an [`InputSnapshot`] and passed down the
//! call chain explicitly. Nothing below the application layer queries a device.

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Derives the transition from the previous and current raw key states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// Everything the world needs to know about the player's input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub forward: RawInputState,
    pub backward: RawInputState,
    pub left: RawInputState,
    pub right: RawInputState,
    /// Jump when walking, ascend when flying
    pub jump: RawInputState,
    /// Descend when flying
    pub descend: RawInputState,
    /// Toggles flight on the frame it is pressed
    pub toggle_fly: RawInputState,
    pub place: RawInputState,
    pub destroy: RawInputState,
    /// Drops a free-standing light at the camera position
    pub add_light: RawInputState,
    /// Scroll wheel steps since the last frame
    pub scroll: i32,
    /// Mouse movement since the last frame in pixels
    pub mouse_delta: (f32, f32),
}

impl InputSnapshot {
    /// The same input as seen by a second tick within one frame.
    ///
    /// Held keys stay held, but presses become holds and the scroll and mouse
    /// deltas are spent, so one-shot actions fire only once per frame.
    pub fn repeat_tick(&self) -> Self {
        let settle = |state: RawInputState| match state {
            RawInputState::Pressed => RawInputState::Held,
            RawInputState::Released => RawInputState::NotPressed,
            other => other,
        };
        InputSnapshot {
            forward: settle(self.forward),
            backward: settle(self.backward),
            left: settle(self.left),
            right: settle(self.right),
            jump: settle(self.jump),
            descend: settle(self.descend),
            toggle_fly: settle(self.toggle_fly),
            place: settle(self.place),
            destroy: settle(self.destroy),
            add_light: settle(self.add_light),
            scroll: 0,
            mouse_delta: (0.0, 0.0),
        }
    }
}

/// Raw key flags as sampled from a device, before edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub descend: bool,
    pub toggle_fly: bool,
    pub place: bool,
    pub destroy: bool,
    pub add_light: bool,
}

/// Turns successive raw key samples into snapshots with press/hold/release edges.
#[derive(Debug, Default)]
pub struct InputTracker {
    previous: RawKeys,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds this frame's snapshot and remembers `keys` for the next frame.
    pub fn snapshot(&mut self, keys: RawKeys, scroll: i32, mouse_delta: (f32, f32)) -> InputSnapshot {
        let p = self.previous;
        let snapshot = InputSnapshot {
            forward: RawInputState::from_raw_states(p.forward, keys.forward),
            backward: RawInputState::from_raw_states(p.backward, keys.backward),
            left: RawInputState::from_raw_states(p.left, keys.left),
            right: RawInputState::from_raw_states(p.right, keys.right),
            jump: RawInputState::from_raw_states(p.jump, keys.jump),
            descend: RawInputState::from_raw_states(p.descend, keys.descend),
            toggle_fly: RawInputState::from_raw_states(p.toggle_fly, keys.toggle_fly),
            place: RawInputState::from_raw_states(p.place, keys.place),
            destroy: RawInputState::from_raw_states(p.destroy, keys.destroy),
            add_light: RawInputState::from_raw_states(p.add_light, keys.add_light),
            scroll,
            mouse_delta,
        };
        self.previous = keys;
        snapshot
    }
}
