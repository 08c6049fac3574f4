//! Keyboard snapshots and their reduction to per-tick commands

use glam::Vec2;

use crate::sim::TickInput;

/// Boolean-per-key state sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub start: bool,
    pub pause: bool,
}

/// Reduce two consecutive snapshots to one tick's commands.
///
/// Movement reflects the current snapshot only; with several direction
/// keys held the later checks win, so right beats left beats down beats
/// up. Start and pause fire on the press edge alone, which keeps a held
/// key from retriggering menu transitions every tick.
pub fn tick_input(prev: &KeySnapshot, curr: &KeySnapshot) -> TickInput {
    let mut direction = Vec2::ZERO;
    if curr.up {
        direction = Vec2::new(0.0, -1.0);
    }
    if curr.down {
        direction = Vec2::new(0.0, 1.0);
    }
    if curr.left {
        direction = Vec2::new(-1.0, 0.0);
    }
    if curr.right {
        direction = Vec2::new(1.0, 0.0);
    }

    TickInput {
        direction,
        start: curr.start && !prev.start,
        pause: curr.pause && !prev.pause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_is_neutral() {
        let input = tick_input(&KeySnapshot::default(), &KeySnapshot::default());
        assert_eq!(input.direction, Vec2::ZERO);
        assert!(!input.start);
        assert!(!input.pause);
    }

    #[test]
    fn test_single_direction_maps_to_axis() {
        let curr = KeySnapshot {
            up: true,
            ..Default::default()
        };
        let input = tick_input(&KeySnapshot::default(), &curr);
        assert_eq!(input.direction, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_later_checks_win_on_chords() {
        let curr = KeySnapshot {
            up: true,
            right: true,
            ..Default::default()
        };
        let input = tick_input(&KeySnapshot::default(), &curr);
        assert_eq!(input.direction, Vec2::new(1.0, 0.0));

        let curr = KeySnapshot {
            down: true,
            left: true,
            ..Default::default()
        };
        let input = tick_input(&KeySnapshot::default(), &curr);
        assert_eq!(input.direction, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_start_fires_on_press_edge_only() {
        let held = KeySnapshot {
            start: true,
            ..Default::default()
        };

        assert!(tick_input(&KeySnapshot::default(), &held).start);
        assert!(!tick_input(&held, &held).start);
        assert!(!tick_input(&held, &KeySnapshot::default()).start);
    }

    #[test]
    fn test_pause_edge_independent_of_movement() {
        let curr = KeySnapshot {
            pause: true,
            left: true,
            ..Default::default()
        };
        let input = tick_input(&KeySnapshot::default(), &curr);
        assert!(input.pause);
        assert_eq!(input.direction, Vec2::new(-1.0, 0.0));

        assert!(!tick_input(&curr, &curr).pause);
    }
}
