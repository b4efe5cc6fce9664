//! Timecode derived from the controller's frame clock

use std::fmt;

use rsbridge_sdk::FrameData;

/// Rational frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    /// `None` for a zero numerator or denominator
    pub fn new(numerator: u32, denominator: u32) -> Option<Self> {
        (numerator != 0 && denominator != 0).then_some(Self {
            numerator,
            denominator,
        })
    }

    pub fn as_decimal(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// hh:mm:ss:ff timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

/// Frame number at a known rate, with its timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedFrameTime {
    pub frame: u64,
    pub rate: FrameRate,
    pub timecode: Timecode,
}

impl QualifiedFrameTime {
    /// Frame time for `seconds` of controller local time
    pub fn from_seconds(seconds: f64, rate: FrameRate) -> Self {
        let frame = (seconds.max(0.0) * rate.as_decimal()).floor() as u64;
        let per_second = rate.as_decimal().ceil().max(1.0) as u64;

        let total_seconds = frame / per_second;
        let timecode = Timecode {
            hours: (total_seconds / 3600) as u32,
            minutes: (total_seconds / 60 % 60) as u32,
            seconds: (total_seconds % 60) as u32,
            frames: (frame % per_second) as u32,
        };

        Self {
            frame,
            rate,
            timecode,
        }
    }
}

/// Tracks the last valid controller time
///
/// When data stops arriving the last time is kept rather than snapping
/// back to zero.
#[derive(Debug, Default)]
pub struct TimecodeProvider {
    last: Option<QualifiedFrameTime>,
}

impl TimecodeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from the current frame, `None` when no valid data arrived
    pub fn sample(&mut self, frame: Option<&FrameData>) -> Option<QualifiedFrameTime> {
        if let Some(frame) = frame {
            let (seconds, numerator, denominator) = (
                frame.local_time,
                frame.frame_rate_numerator,
                frame.frame_rate_denominator,
            );
            match FrameRate::new(numerator, denominator) {
                Some(rate) => self.last = Some(QualifiedFrameTime::from_seconds(seconds, rate)),
                None => tracing::trace!("Ignoring frame with rate {}/{}", numerator, denominator),
            }
        }
        self.last
    }

    pub fn last(&self) -> Option<QualifiedFrameTime> {
        self.last
    }
}
