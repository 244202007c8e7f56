use std::time::Duration;

/// Counts frames over one-second windows.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    last: Option<f32>,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame lasting `dt`. Returns the new rate when a window completes.
    pub fn record(&mut self, dt: Duration) -> Option<f32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < Self::WINDOW {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        self.last = Some(fps);
        Some(fps)
    }

    /// Rate measured over the last completed window.
    #[inline]
    pub fn fps(&self) -> Option<f32> {
        self.last
    }
}
