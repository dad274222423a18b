//! The player-controlled person

use glam::Vec2;

use super::person::Person;
use super::rect::Rect;
use crate::consts::DIAGONAL_FACTOR;
use crate::input::{InputAction, InputState};

pub struct Player {
    pub person: Person,
}

impl Player {
    pub fn new(person: Person) -> Self {
        Self { person }
    }

    /// Direction from held buttons.
    ///
    /// Up wins over down and right over left. With both axes held each axis
    /// is divided by [`DIAGONAL_FACTOR`].
    pub fn movement_vector(input: &InputState) -> Vec2 {
        let mut d = Vec2::ZERO;
        if input.is_down(InputAction::Up) {
            d.y = -1.0;
        } else if input.is_down(InputAction::Down) {
            d.y = 1.0;
        }
        if input.is_down(InputAction::Right) {
            d.x = 1.0;
        } else if input.is_down(InputAction::Left) {
            d.x = -1.0;
        }

        if d.x != 0.0 && d.y != 0.0 {
            d /= DIAGONAL_FACTOR;
        }
        d
    }

    /// Move from input, clamp to `bounds`, then face `aim` (offset from the player).
    ///
    /// `speed` is in units per second.
    pub fn update(&mut self, input: &InputState, bounds: Rect, aim: Vec2, speed: f32, dt_ms: f32) {
        let step = speed * dt_ms / 1000.0;
        let moved = self.person.position + Self::movement_vector(input) * step;
        self.person.position = bounds.clamp(moved);

        let position = self.person.position;
        self.person.look_at(position + aim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Texture;
    use crate::sim::person::Appearance;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Person::new(
            Appearance {
                body: Texture::Player,
                hand: Some(Texture::Fingergun),
            },
            Vec2::new(x, y),
            32.0,
        ))
    }

    fn holding(actions: &[InputAction]) -> InputState {
        let mut input = InputState::default();
        for &a in actions {
            input.press(a);
        }
        input
    }

    const ARENA: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 2000.0,
        height: 2000.0,
    };

    #[test]
    fn test_diagonal_displacement() {
        let mut player = player_at(1000.0, 1000.0);
        let input = holding(&[InputAction::Up, InputAction::Right]);
        player.update(&input, ARENA, Vec2::X, 200.0, 1000.0);

        let moved = player.person.position - Vec2::new(1000.0, 1000.0);
        assert!((moved.x - 141.42).abs() < 0.01, "dx {}", moved.x);
        assert!((moved.y + 141.42).abs() < 0.01, "dy {}", moved.y);
    }

    #[test]
    fn test_axial_displacement() {
        let mut player = player_at(1000.0, 1000.0);
        player.update(&holding(&[InputAction::Down]), ARENA, Vec2::X, 200.0, 500.0);
        assert_eq!(player.person.position, Vec2::new(1000.0, 1100.0));
    }

    #[test]
    fn test_opposing_buttons_prefer_up_and_right() {
        let input = holding(&[
            InputAction::Up,
            InputAction::Down,
            InputAction::Left,
            InputAction::Right,
        ]);
        let d = Player::movement_vector(&input);
        assert!(d.x > 0.0 && d.y < 0.0);

        let input = holding(&[InputAction::Up, InputAction::Down]);
        assert_eq!(Player::movement_vector(&input), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_clamped_at_left_edge() {
        let mut player = player_at(0.0, 0.0);
        player.update(&holding(&[InputAction::Left]), ARENA, Vec2::X, 200.0, 16.0);
        assert_eq!(player.person.position.x, 0.0);

        player.update(&holding(&[InputAction::Up]), ARENA, Vec2::X, 200.0, 16.0);
        assert_eq!(player.person.position.y, 0.0);
    }

    #[test]
    fn test_faces_aim() {
        let mut player = player_at(100.0, 100.0);
        player.update(&InputState::default(), ARENA, Vec2::new(0.0, 50.0), 200.0, 16.0);
        assert!((player.person.direction() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_no_input_no_motion() {
        let mut player = player_at(10.0, 10.0);
        player.update(&InputState::default(), ARENA, Vec2::X, 200.0, 1000.0);
        assert_eq!(player.person.position, Vec2::new(10.0, 10.0));
    }
}
