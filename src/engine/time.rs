use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimestepError {
    #[error("fixed step must be positive and finite (got {0})")]
    InvalidStep(f32),
}

/// Fixed-step accumulator. Frames of any length go in; whole simulation
/// steps of `dt` come out.
pub struct FixedTimestep {
    pub dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Result<Self, TimestepError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(TimestepError::InvalidStep(dt));
        }
        Ok(Self {
            dt,
            accumulator: 0.0,
        })
    }

    /// Add `frame_dt` seconds and return how many fixed steps are now due.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        let mut due = 0;
        while self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            due += 1;
        }
        due
    }

    /// How far into the next step the leftover time reaches (0..1).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }
}
