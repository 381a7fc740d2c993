use bevy::prelude::{ResMut, Resource};
use repro::ShiftEvent;

/// Shift events produced during the current frame. The headless runtime drains
/// them after each update; anything left over is dropped when the next frame
/// starts.
#[derive(Resource, Default, Debug)]
pub struct ShiftQueue {
    pub buf: Vec<ShiftEvent>,
}

impl ShiftQueue {
    pub fn push(&mut self, frame: u32, back_row: i32, front_row: i32) {
        self.buf.push(ShiftEvent {
            frame,
            back_row,
            front_row,
        });
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ShiftEvent> + '_ {
        self.buf.drain(..)
    }
}

pub fn clear_shift_queue(mut queue: ResMut<ShiftQueue>) {
    queue.buf.clear();
}
