// raw terminal bytes -> input events, and the rules deciding which turns are taken
use std::time::{Duration, Instant};

use circular_buffer::CircularBuffer;
use log::debug;

use crate::geometry::SnakeDirection;

type InputBuffer = CircularBuffer<64, u8>; // unread bytes coming from stdin

const ESC: u8 = 27;
const CSI: u8 = 91; // '[' after ESC starts an arrow key sequence

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Steer(SnakeDirection),
    TogglePause,
    Quit,
}

/// Turns the byte stream of a raw-mode terminal into [`InputEvent`]s.
#[derive(Debug)]
pub struct KeyDecoder {
    input_buffer: InputBuffer,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    pub fn new() -> Self {
        KeyDecoder {
            input_buffer: InputBuffer::new(),
        }
    }

    pub fn push(&mut self, key: u8) {
        // if the buffer is full, drop the input
        if self.input_buffer.is_full() {
            return;
        }
        self.input_buffer.push_back(key);
    }

    pub fn extend(&mut self, keys: &[u8]) {
        for key in keys {
            self.push(*key);
        }
    }

    pub fn pending(&self) -> usize {
        self.input_buffer.len()
    }

    /// Next complete event in the buffer. An unfinished escape sequence stays
    /// buffered until the rest of it arrives.
    pub fn next_event(&mut self) -> Option<InputEvent> {
        while let Some(&key) = self.input_buffer.nth_front(0) {
            if key == ESC {
                match self.input_buffer.nth_front(1).copied() {
                    // wait for the rest of the sequence
                    None => return None,
                    Some(CSI) => {}
                    Some(_) => {
                        // a lone escape
                        self.input_buffer.pop_front();
                        continue;
                    }
                }
                let Some(&code) = self.input_buffer.nth_front(2) else {
                    return None;
                };
                for _ in 0..3 {
                    self.input_buffer.pop_front();
                }
                let direction = match code {
                    65 => SnakeDirection::Up,
                    66 => SnakeDirection::Down,
                    67 => SnakeDirection::Right,
                    68 => SnakeDirection::Left,
                    _ => continue, // not an arrow
                };
                return Some(InputEvent::Steer(direction));
            }

            self.input_buffer.pop_front();
            let event = match key {
                b'w' | b'W' => InputEvent::Steer(SnakeDirection::Up),
                b's' | b'S' => InputEvent::Steer(SnakeDirection::Down),
                b'a' | b'A' => InputEvent::Steer(SnakeDirection::Left),
                b'd' | b'D' => InputEvent::Steer(SnakeDirection::Right),
                b' ' | b'p' | b'P' => InputEvent::TogglePause,
                b'q' | b'Q' => InputEvent::Quit,
                _ => continue,
            };
            return Some(event);
        }
        None
    }
}

/// Keeps the direction the snake will take on the next tick.
///
/// A turn is refused when it points back into the neck, either relative to
/// the last accepted turn or to the direction of the last move, and when it
/// comes sooner than `min_interval` after the previous accepted turn.
#[derive(Debug, Clone)]
pub struct InputController {
    direction: SnakeDirection,
    heading: SnakeDirection,
    last_change: Option<Instant>,
    min_interval: Duration,
}

impl InputController {
    pub fn new(initial: SnakeDirection, min_interval: Duration) -> Self {
        InputController {
            direction: initial,
            heading: initial,
            last_change: None,
            min_interval,
        }
    }

    pub fn direction(&self) -> SnakeDirection {
        self.direction
    }

    /// Returns whether the turn was accepted.
    pub fn request(&mut self, requested: SnakeDirection, now: Instant) -> bool {
        if requested == self.direction {
            return false;
        }
        if requested == self.direction.opposite() || requested == self.heading.opposite() {
            debug!("ignoring reversal {:?} while heading {:?}", requested, self.heading);
            return false;
        }
        if let Some(last) = self.last_change {
            if now.saturating_duration_since(last) < self.min_interval {
                debug!("ignoring {:?}, too soon after the last turn", requested);
                return false;
            }
        }
        self.direction = requested;
        self.last_change = Some(now);
        true
    }

    /// Records the direction the snake actually moved in on the last tick.
    pub fn commit(&mut self, heading: SnakeDirection) {
        self.heading = heading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<InputEvent> {
        let mut decoder = KeyDecoder::new();
        decoder.extend(bytes);
        std::iter::from_fn(|| decoder.next_event()).collect()
    }

    #[test]
    fn decodes_arrow_keys() {
        assert_eq!(
            decode(&[27, 91, 65, 27, 91, 66, 27, 91, 67, 27, 91, 68]),
            vec![
                InputEvent::Steer(SnakeDirection::Up),
                InputEvent::Steer(SnakeDirection::Down),
                InputEvent::Steer(SnakeDirection::Right),
                InputEvent::Steer(SnakeDirection::Left),
            ]
        );
    }

    #[test]
    fn decodes_letters_pause_and_quit() {
        assert_eq!(
            decode(b"wAx pq"),
            vec![
                InputEvent::Steer(SnakeDirection::Up),
                InputEvent::Steer(SnakeDirection::Left),
                InputEvent::TogglePause,
                InputEvent::TogglePause,
                InputEvent::Quit,
            ]
        );
    }

    #[test]
    fn partial_sequence_waits_for_the_rest() {
        let mut decoder = KeyDecoder::new();
        decoder.extend(&[27, 91]);
        assert_eq!(decoder.next_event(), None);
        assert_eq!(decoder.pending(), 2);
        decoder.push(67);
        assert_eq!(
            decoder.next_event(),
            Some(InputEvent::Steer(SnakeDirection::Right))
        );
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn lone_escape_and_unknown_sequences_are_skipped() {
        assert_eq!(decode(&[27, b'q']), vec![InputEvent::Quit]);
        // ESC [ H (home) is not an arrow
        assert_eq!(
            decode(&[27, 91, 72, b'd']),
            vec![InputEvent::Steer(SnakeDirection::Right)]
        );
    }

    #[test]
    fn reversal_is_rejected() {
        let now = Instant::now();
        let mut controller = InputController::new(SnakeDirection::Right, Duration::from_millis(75));
        assert!(!controller.request(SnakeDirection::Left, now));
        assert_eq!(controller.direction(), SnakeDirection::Right);
    }

    #[test]
    fn perpendicular_turn_is_accepted() {
        let now = Instant::now();
        let mut controller = InputController::new(SnakeDirection::Right, Duration::from_millis(75));
        assert!(controller.request(SnakeDirection::Up, now));
        assert_eq!(controller.direction(), SnakeDirection::Up);
    }

    #[test]
    fn turns_are_throttled() {
        let start = Instant::now();
        let mut controller = InputController::new(SnakeDirection::Right, Duration::from_millis(75));
        assert!(controller.request(SnakeDirection::Up, start));
        controller.commit(SnakeDirection::Up);
        assert!(!controller.request(SnakeDirection::Left, start + Duration::from_millis(30)));
        assert_eq!(controller.direction(), SnakeDirection::Up);
        assert!(controller.request(SnakeDirection::Left, start + Duration::from_millis(80)));
        assert_eq!(controller.direction(), SnakeDirection::Left);
    }

    #[test]
    fn two_turns_before_a_move_cannot_reverse() {
        let start = Instant::now();
        let mut controller = InputController::new(SnakeDirection::Right, Duration::from_millis(75));
        assert!(controller.request(SnakeDirection::Up, start));
        // no tick yet, the snake is still moving right
        assert!(!controller.request(SnakeDirection::Left, start + Duration::from_millis(100)));
        assert_eq!(controller.direction(), SnakeDirection::Up);
    }

    #[test]
    fn same_direction_does_not_reset_the_throttle() {
        let start = Instant::now();
        let mut controller = InputController::new(SnakeDirection::Right, Duration::from_millis(75));
        assert!(controller.request(SnakeDirection::Up, start));
        controller.commit(SnakeDirection::Up);
        assert!(!controller.request(SnakeDirection::Up, start + Duration::from_millis(70)));
        assert!(controller.request(SnakeDirection::Right, start + Duration::from_millis(76)));
    }
}
