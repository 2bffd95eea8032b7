/*
 * Debug Information Module
 *
 * StepStats is what one simulation tick observed; DebugInfo is the host's
 * per-frame view of it plus frame timing, shown in the UI panel.
 */

use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepStats {
    pub tick: u64,
    pub agents: usize,
    /// Agents with no neighbor inside any rule radius this tick.
    pub isolated: usize,
    pub floor_corrections: usize,
    pub edge_wraps: usize,
    pub ceiling_drops: usize,
    pub mean_speed: f32,
}

// Debug information to display
#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub sim_delta: f32,
    pub last_step: StepStats,
}

impl DebugInfo {
    pub fn lines(&self) -> Vec<String> {
        let s = &self.last_step;
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Sim step: {:.2} ms", self.sim_delta * 1000.0),
            format!("Tick: {}", s.tick),
            format!("Agents: {} ({} isolated)", s.agents, s.isolated),
            format!("Mean speed: {:.2}", s.mean_speed),
            format!(
                "Floor / wrap / ceiling: {} / {} / {}",
                s.floor_corrections, s.edge_wraps, s.ceiling_drops
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_show_the_integrated_step() {
        let info = DebugInfo {
            sim_delta: 0.0125,
            last_step: StepStats {
                tick: 3,
                agents: 10,
                isolated: 2,
                ..StepStats::default()
            },
            ..DebugInfo::default()
        };
        let lines = info.lines();
        assert!(lines.iter().any(|l| l == "Sim step: 12.50 ms"));
        assert!(lines.iter().any(|l| l == "Agents: 10 (2 isolated)"));
    }
}
