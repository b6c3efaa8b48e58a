//! Input-driven transform state.
//!
//! Handlers only mutate scalars here; the frame driver reads them when it
//! places sprites.

use beam_engine::input::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

pub const LASER_STEP: f32 = 0.1;
pub const LASER_MAX: f32 = 3.0;
pub const LASER_MIN: f32 = -2.1;

pub const TILT_STEP: f32 = 0.1;
pub const TILT_LIMIT: f32 = 0.8;

pub const BUCKET_STEP: f32 = 0.2;

/// What an input event asks the game to do.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    Quit,
    RaiseLaser,
    LowerLaser,
    TiltLaser(f32),
    ToggleRectangleRotation,
    ToggleTriangleRotation,
    MoveRedBucket(f32),
    MoveGreenBucket(f32),
    FlipRectangleDirection,
    FlipTriangleDirection,
}

/// Free-standing transform scalars, owned by the game.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    /// Degrees. Kept for the camera but never applied to the view.
    pub camera_rotation_angle: f32,
    /// Degrees, applied to both buckets.
    pub rectangle_rotation: f32,
    pub triangle_rotation: f32,
    pub rectangle_rotating: bool,
    pub triangle_rotating: bool,
    /// +1 or -1.
    pub rectangle_rot_dir: f32,
    pub triangle_rot_dir: f32,
    /// Laser vertical offset, in [LASER_MIN, LASER_MAX].
    pub laser_offset: f32,
    /// Laser barrel tilt as a fraction of a quarter turn, in [-TILT_LIMIT, TILT_LIMIT].
    pub laser_tilt: f32,
    pub red_bucket_offset: f32,
    pub green_bucket_offset: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            camera_rotation_angle: 90.0,
            rectangle_rotation: 0.0,
            triangle_rotation: 0.0,
            rectangle_rotating: true,
            triangle_rotating: true,
            rectangle_rot_dir: 1.0,
            triangle_rot_dir: 1.0,
            laser_offset: 0.0,
            laser_tilt: 0.0,
            red_bucket_offset: 0.0,
            green_bucket_offset: 0.0,
        }
    }
}

impl TransformState {
    pub fn raise_laser(&mut self) {
        self.laser_offset = (self.laser_offset + LASER_STEP).min(LASER_MAX);
    }

    pub fn lower_laser(&mut self) {
        self.laser_offset = (self.laser_offset - LASER_STEP).max(LASER_MIN);
    }

    pub fn tilt_laser(&mut self, delta: f32) {
        self.laser_tilt = (self.laser_tilt + delta).clamp(-TILT_LIMIT, TILT_LIMIT);
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => {}
            Command::RaiseLaser => self.raise_laser(),
            Command::LowerLaser => self.lower_laser(),
            Command::TiltLaser(delta) => self.tilt_laser(delta),
            Command::ToggleRectangleRotation => self.rectangle_rotating = !self.rectangle_rotating,
            Command::ToggleTriangleRotation => self.triangle_rotating = !self.triangle_rotating,
            Command::MoveRedBucket(dx) => self.red_bucket_offset += dx,
            Command::MoveGreenBucket(dx) => self.green_bucket_offset += dx,
            Command::FlipRectangleDirection => self.rectangle_rot_dir = -self.rectangle_rot_dir,
            Command::FlipTriangleDirection => self.triangle_rot_dir = -self.triangle_rot_dir,
        }
        log::debug!("{command:?} -> {self:?}");
    }
}

/// Maps an input event to a game command.
///
/// Quitting reacts to the key press; everything else reacts to releases.
pub fn map_input(event: &InputEvent) -> Option<Command> {
    match event {
        InputEvent::Key {
            key: Key::Letter('Q') | Key::Escape,
            state: ButtonState::Pressed,
            ..
        } => Some(Command::Quit),

        InputEvent::Key {
            key,
            state: ButtonState::Released,
            modifiers,
            ..
        } => map_key_release(*key, *modifiers),

        InputEvent::PointerButton(ev) if ev.state == ButtonState::Released => match ev.button {
            MouseButton::Left => Some(Command::FlipTriangleDirection),
            MouseButton::Right => Some(Command::FlipRectangleDirection),
            _ => None,
        },

        _ => None,
    }
}

fn map_key_release(key: Key, modifiers: Modifiers) -> Option<Command> {
    let dx = match key {
        Key::Letter('S') => return Some(Command::RaiseLaser),
        Key::Letter('F') => return Some(Command::LowerLaser),
        Key::Letter('A') => return Some(Command::TiltLaser(-TILT_STEP)),
        Key::Letter('D') => return Some(Command::TiltLaser(TILT_STEP)),
        Key::Letter('C') => return Some(Command::ToggleRectangleRotation),
        Key::Letter('P') => return Some(Command::ToggleTriangleRotation),
        Key::ArrowLeft => -BUCKET_STEP,
        Key::ArrowRight => BUCKET_STEP,
        _ => return None,
    };

    // Exactly one of Ctrl / Shift selects the bucket.
    match (modifiers.ctrl, modifiers.shift) {
        (true, false) => Some(Command::MoveRedBucket(dx)),
        (false, true) => Some(Command::MoveGreenBucket(dx)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beam_engine::input::PointerButtonEvent;

    fn release(key: Key, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key {
            key,
            state: ButtonState::Released,
            modifiers,
            repeat: false,
        }
    }

    fn press(key: Key) -> InputEvent {
        InputEvent::key(key, ButtonState::Pressed)
    }

    fn letter(c: char) -> Key {
        Key::Letter(c)
    }

    fn mouse_up(button: MouseButton) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state: ButtonState::Released,
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers::default(),
        })
    }

    const CTRL: Modifiers = Modifiers::CTRL;
    const SHIFT: Modifiers = Modifiers::SHIFT;

    // ── clamps ────────────────────────────────────────────────────────────

    #[test]
    fn laser_offset_caps_at_three() {
        let mut s = TransformState::default();
        for _ in 0..100 {
            s.raise_laser();
            assert!(s.laser_offset <= LASER_MAX);
        }
        assert_eq!(s.laser_offset, LASER_MAX);
    }

    #[test]
    fn laser_offset_floors_at_minus_two_point_one() {
        let mut s = TransformState::default();
        for _ in 0..100 {
            s.lower_laser();
            assert!(s.laser_offset >= LASER_MIN);
        }
        assert_eq!(s.laser_offset, LASER_MIN);
    }

    #[test]
    fn tilt_stays_within_limit() {
        let mut s = TransformState::default();
        for _ in 0..20 {
            s.apply(Command::TiltLaser(TILT_STEP));
        }
        assert_eq!(s.laser_tilt, TILT_LIMIT);
        for _ in 0..40 {
            s.apply(Command::TiltLaser(-TILT_STEP));
        }
        assert_eq!(s.laser_tilt, -TILT_LIMIT);
    }

    // ── mapping ───────────────────────────────────────────────────────────

    #[test]
    fn letter_keys_act_on_release() {
        let none = Modifiers::default();
        assert_eq!(map_input(&release(letter('S'), none)), Some(Command::RaiseLaser));
        assert_eq!(map_input(&release(letter('F'), none)), Some(Command::LowerLaser));
        assert_eq!(map_input(&release(letter('A'), none)), Some(Command::TiltLaser(-TILT_STEP)));
        assert_eq!(map_input(&release(letter('D'), none)), Some(Command::TiltLaser(TILT_STEP)));
        assert_eq!(map_input(&release(letter('C'), none)), Some(Command::ToggleRectangleRotation));
        assert_eq!(map_input(&release(letter('P'), none)), Some(Command::ToggleTriangleRotation));
        assert_eq!(map_input(&press(letter('S'))), None);
    }

    #[test]
    fn quit_acts_on_press() {
        assert_eq!(map_input(&press(letter('Q'))), Some(Command::Quit));
        assert_eq!(map_input(&press(Key::Escape)), Some(Command::Quit));
        assert_eq!(map_input(&release(letter('Q'), Modifiers::default())), None);
    }

    #[test]
    fn arrows_pick_bucket_by_modifier() {
        assert_eq!(
            map_input(&release(Key::ArrowLeft, CTRL)),
            Some(Command::MoveRedBucket(-BUCKET_STEP))
        );
        assert_eq!(
            map_input(&release(Key::ArrowRight, SHIFT)),
            Some(Command::MoveGreenBucket(BUCKET_STEP))
        );
        assert_eq!(map_input(&release(Key::ArrowRight, Modifiers::default())), None);

        let both = Modifiers { shift: true, ..CTRL };
        assert_eq!(map_input(&release(Key::ArrowLeft, both)), None);
    }

    #[test]
    fn mouse_release_flips_directions() {
        let mut s = TransformState::default();

        for cmd in [mouse_up(MouseButton::Left), mouse_up(MouseButton::Right)]
            .iter()
            .filter_map(map_input)
        {
            s.apply(cmd);
        }

        assert_eq!(s.triangle_rot_dir, -1.0);
        assert_eq!(s.rectangle_rot_dir, -1.0);
    }

    #[test]
    fn toggles_flip_flags() {
        let mut s = TransformState::default();
        assert!(s.rectangle_rotating && s.triangle_rotating);

        s.apply(Command::ToggleRectangleRotation);
        s.apply(Command::ToggleTriangleRotation);
        s.apply(Command::ToggleTriangleRotation);
        assert!(!s.rectangle_rotating);
        assert!(s.triangle_rotating);
    }

    #[test]
    fn first_c_release_stops_rectangle_rotation() {
        let mut s = TransformState::default();
        if let Some(cmd) = map_input(&release(letter('C'), Modifiers::NONE)) {
            s.apply(cmd);
        }
        assert!(!s.rectangle_rotating);
    }
}
