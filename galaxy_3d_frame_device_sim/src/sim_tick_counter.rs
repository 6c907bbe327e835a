/// Wall-clock tick counter

use std::time::Instant;
use galaxy_3d_frame::galaxy3d::device::TickCounter;

/// Tick counter backed by `Instant`
#[derive(Debug, Default)]
pub struct SimTickCounter {
    started: Option<Instant>,
    elapsed_ms: f32,
}

impl TickCounter for SimTickCounter {
    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    fn update(&mut self) {
        if let Some(started) = self.started {
            self.elapsed_ms = started.elapsed().as_secs_f32() * 1000.0;
        }
    }

    fn read(&self) -> f32 {
        self.elapsed_ms
    }
}
