//! # Frame Rate Tracking
//!
//! Measures the interval between presented frames and derives FPS figures
//! for the overlay.
//!
//! ```rust
//! use shapeshop::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//! // Once per presented frame
//! monitor.tick();
//! let fps = monitor.get_metrics().fps;
//! # let _ = fps;
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    /// Frames per second averaged over the sample window
    pub fps: f32,
    /// Average frame interval in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    /// Triangles submitted in the last frame, all viewports
    pub triangle_count: u32,
    /// Line segments submitted in the last frame
    pub line_count: u32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            triangle_count: 0,
            line_count: 0,
        }
    }
}

pub struct PerformanceMonitor {
    /// Ring buffer of recent frame intervals
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    last_tick: Option<Instant>,
    current_metrics: PerformanceMetrics,
    last_update: Instant,
    update_interval: Duration,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_config(120)
    }

    /// Monitor averaging over the last `max_samples` frames.
    pub fn with_config(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            last_tick: None,
            current_metrics: PerformanceMetrics::default(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(250),
        }
    }

    /// Marks a presented frame. Metrics refresh a few times per second.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_tick.replace(now) {
            self.add_frame_time(now - last);
            if self.last_update.elapsed() >= self.update_interval {
                self.update_metrics();
                self.last_update = now;
            }
        }
    }

    /// Adds one frame interval and recomputes the metrics immediately.
    pub fn record_frame(&mut self, frame_time: Duration) {
        self.add_frame_time(frame_time);
        self.update_metrics();
    }

    fn add_frame_time(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time_ms =
            total_time.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn update_render_stats(&mut self, triangle_count: u32, line_count: u32) {
        self.current_metrics.triangle_count = triangle_count;
        self.current_metrics.line_count = line_count;
    }

    pub fn get_metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.last_tick = None;
        self.current_metrics = PerformanceMetrics::default();
    }

    /// FPS counter in the top-left corner
    pub fn render_overlay(&self, ui: &imgui::Ui) {
        let draw_list = ui.get_background_draw_list();
        draw_list.add_text(
            [10.0, 10.0],
            [1.0, 1.0, 1.0, 1.0],
            format!("FPS: {:.2}", self.current_metrics.fps),
        );
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fps_from_average_interval() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(Duration::from_millis(10));
        monitor.record_frame(Duration::from_millis(30));

        let metrics = monitor.get_metrics();
        assert_relative_eq!(metrics.frame_time_ms, 20.0, epsilon = 1e-3);
        assert_relative_eq!(metrics.fps, 50.0, epsilon = 1e-2);
        assert_relative_eq!(metrics.min_frame_time_ms, 10.0, epsilon = 1e-3);
        assert_relative_eq!(metrics.max_frame_time_ms, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn old_samples_fall_out_of_window() {
        let mut monitor = PerformanceMonitor::with_config(2);
        monitor.record_frame(Duration::from_millis(100));
        monitor.record_frame(Duration::from_millis(20));
        monitor.record_frame(Duration::from_millis(20));

        assert_relative_eq!(monitor.get_metrics().fps, 50.0, epsilon = 1e-2);
    }

    #[test]
    fn reset_clears_metrics() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(Duration::from_millis(16));
        monitor.update_render_stats(12, 3);
        monitor.reset();

        assert_eq!(monitor.get_metrics().fps, 0.0);
        assert_eq!(monitor.get_metrics().triangle_count, 0);
    }
}
