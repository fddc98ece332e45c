use crate::Renderer;
use diorama_kernel::{Clock, Diorama};

/// Per-frame driver.
///
/// Each [`FrameLoop::tick`]: sample the clock, write the elapsed time into
/// both `time` uniforms and step the camera controls, then render. Scheduling
/// the next tick belongs to the host (a redraw request on the window, or a
/// plain loop when headless).
pub struct FrameLoop<C: Clock> {
    clock: C,
    last_elapsed: f32,
    ticks: u64,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one frame.
    pub fn tick<R: Renderer>(&mut self, diorama: &mut Diorama, renderer: &mut R) -> R::Output {
        // Clamp so a clock that steps backwards never rewinds the uniforms.
        let elapsed = self.clock.elapsed_seconds().max(self.last_elapsed);
        self.last_elapsed = elapsed;
        self.ticks += 1;

        diorama.advance(elapsed);
        tracing::trace!(tick = self.ticks, elapsed, "frame");
        renderer.render(diorama)
    }
}
