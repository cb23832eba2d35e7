/// Frame-rate monitor.
/// Counts frames over fixed windows and reports the measured FPS when a window closes.
pub struct FpsMonitor {
    /// Window length in milliseconds.
    window_ms: f64,
    /// Start of the current window (display timestamp, ms).
    window_start: Option<f64>,
    /// Frames counted in the current window.
    frames: u32,
}

impl FpsMonitor {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start: None,
            frames: 0,
        }
    }

    /// Record one frame at display timestamp `now_ms`.
    /// Returns the FPS of the window that just closed, if any.
    /// The frame that opens a window is not counted; each later frame counts
    /// one interval.
    pub fn frame(&mut self, now_ms: f64) -> Option<u32> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now_ms);
            return None;
        };
        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed < self.window_ms {
            return None;
        }
        let fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.window_start = Some(now_ms);
        Some(fps)
    }
}

impl FpsMonitor {
    /// Drop the current window. The next frame opens a fresh one.
    pub fn reset(&mut self) {
        self.window_start = None;
        self.frames = 0;
    }
}

impl Default for FpsMonitor {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_report_inside_window() {
        let mut m = FpsMonitor::default();
        assert_eq!(m.frame(0.0), None);
        assert_eq!(m.frame(500.0), None);
    }

    #[test]
    fn steady_sixty_reports_sixty() {
        let mut m = FpsMonitor::default();
        let mut report = None;
        for i in 0..=61 {
            report = report.or(m.frame(i as f64 * 1000.0 / 60.0));
        }
        assert_eq!(report, Some(60));
    }

    #[test]
    fn just_below_threshold_is_not_rounded_up() {
        let mut m = FpsMonitor::default();
        let mut report = None;
        for i in 0..=30 {
            report = report.or(m.frame(i as f64 * 1000.0 / 29.0));
        }
        assert_eq!(report, Some(29));
    }

    #[test]
    fn reset_discards_idle_gap() {
        let mut m = FpsMonitor::default();
        for i in 0..30 {
            m.frame(i as f64 * 1000.0 / 60.0);
        }
        m.reset();
        // 30 s later the next frame opens a new window instead of closing a 0 fps one.
        assert_eq!(m.frame(30_000.0), None);
        let mut report = None;
        for i in 1..=61 {
            report = report.or(m.frame(30_000.0 + i as f64 * 1000.0 / 60.0));
        }
        assert_eq!(report, Some(60));
    }

    #[test]
    fn reports_slow_window() {
        let mut m = FpsMonitor::default();
        let mut report = None;
        for i in 0..=20 {
            report = m.frame(i as f64 * 50.0).or(report);
        }
        assert_eq!(report, Some(20));
    }

    #[test]
    fn window_resets_after_report() {
        let mut m = FpsMonitor::default();
        m.frame(0.0);
        assert!(m.frame(1000.0).is_some());
        assert_eq!(m.frame(1500.0), None);
    }
}
