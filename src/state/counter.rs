use std::time::Duration;

/// Total time a stat counter takes to climb from zero to its target.
pub const ANIMATION_WINDOW: Duration = Duration::from_millis(1000);

/// Divisor used to derive the per-frame increment from the target.
const STEP_DIVISOR: u64 = 50;

/// Frame-by-frame climb of a dashboard counter from 0 to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterAnimation {
    target: u64,
    step: u64,
    current: u64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            step: target.div_ceil(STEP_DIVISOR).max(1),
            current: 0,
            finished: false,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of frames needed to reach the target. A zero target still gets
    /// one frame so the element shows "0".
    pub fn frame_count(&self) -> u64 {
        self.target.div_ceil(self.step).max(1)
    }

    /// Timer interval between frames so the climb fits the animation window.
    pub fn frame_interval(&self) -> Duration {
        let frames = self.frame_count() as u32;
        (ANIMATION_WINDOW / frames).max(Duration::from_millis(1))
    }

    /// Advance one frame and return the value to display, or `None` once the
    /// final frame has been shown.
    pub fn tick(&mut self) -> Option<u64> {
        if self.finished {
            return None;
        }
        self.current = self.current.saturating_add(self.step).min(self.target);
        if self.current >= self.target {
            self.finished = true;
        }
        Some(self.current)
    }
}

/// Format an integer with comma thousands separators, e.g. `12345` -> `12,345`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(target: u64) -> Vec<u64> {
        let mut anim = CounterAnimation::new(target);
        let mut frames = Vec::new();
        while let Some(v) = anim.tick() {
            frames.push(v);
            assert!(frames.len() <= 1000, "animation for {} never finished", target);
        }
        frames
    }

    #[test]
    fn test_step_size_is_ceil_of_fiftieth() {
        assert_eq!(CounterAnimation::new(0).step(), 1);
        assert_eq!(CounterAnimation::new(10).step(), 1);
        assert_eq!(CounterAnimation::new(50).step(), 1);
        assert_eq!(CounterAnimation::new(51).step(), 2);
        assert_eq!(CounterAnimation::new(1000).step(), 20);
    }

    #[test]
    fn test_zero_target_shows_single_zero_frame() {
        assert_eq!(run_to_end(0), vec![0]);
    }

    #[test]
    fn test_frames_increase_and_end_exactly_on_target() {
        for target in [1, 7, 49, 50, 51, 99, 123, 1000, 98_765] {
            let frames = run_to_end(target);
            assert_eq!(*frames.last().unwrap(), target, "final frame for {}", target);
            for pair in frames.windows(2) {
                assert!(pair[1] > pair[0], "frames not increasing for {}: {:?}", target, pair);
            }
            assert!(frames.iter().all(|&v| v <= target), "overshoot for {}", target);
        }
    }

    #[test]
    fn test_frame_count_matches_ticks() {
        for target in [0, 3, 50, 51, 777] {
            let anim = CounterAnimation::new(target);
            assert_eq!(anim.frame_count() as usize, run_to_end(target).len());
        }
    }

    #[test]
    fn test_interval_fits_window() {
        let anim = CounterAnimation::new(50);
        assert_eq!(anim.frame_interval(), Duration::from_millis(20));
        let single = CounterAnimation::new(0);
        assert_eq!(single.frame_interval(), ANIMATION_WINDOW);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
