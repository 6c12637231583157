//! Gesture scripts and their headless replay

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tandem_animation::{AnimationScheduler, SharedScheduler};
use tandem_core::numeric::is_at_rest;
use tandem_scroll::{
    BodyFlingStatus, BodyScroll, CoordinatorConfig, FlingState, InMemoryBody,
    NestedScrollCoordinator,
};

/// A gesture script (`*.toml`)
#[derive(Debug, Deserialize, Serialize)]
pub struct Script {
    /// Scroll range of the simulated body
    #[serde(default = "default_body_max_offset")]
    pub body_max_offset: i32,
    /// Where the body starts
    #[serde(default)]
    pub body_offset: i32,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_body_max_offset() -> i32 {
    2000
}

/// One scripted input
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Layout pass reporting the header height
    Layout { header_height: i32 },
    /// Drag on the header, one delta per frame (scroll space)
    Drag { deltas: Vec<f32> },
    /// Lift the finger with a release velocity
    Release { velocity: f32 },
    /// Fling starting inside the body
    BodyFling { velocity: f32 },
    /// Let animations run for `count` frames
    Frames { count: u32 },
    /// Programmatic scroll of the header
    ScrollTo {
        target: i32,
        #[serde(default)]
        animated: bool,
    },
}

impl Script {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse gesture script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Positions after one replayed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    pub frame: u64,
    pub header_offset: i32,
    pub body_offset: i32,
    pub state: FlingState,
}

impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {:>5}  header {:>5}  body {:>6}  {:?}",
            self.frame, self.header_offset, self.body_offset, self.state
        )
    }
}

/// Body shared with the replay loop, which advances its fling every frame
struct SharedBody(Arc<Mutex<InMemoryBody>>);

impl BodyScroll for SharedBody {
    fn offset(&self) -> i32 {
        self.0.lock().offset()
    }

    fn max_offset(&self) -> i32 {
        self.0.lock().max_offset()
    }

    fn scroll_by(&mut self, delta: i32) -> i32 {
        self.0.lock().scroll_by(delta)
    }

    fn fling(&mut self, velocity: f32) -> f32 {
        self.0.lock().fling(velocity)
    }

    fn stop_fling(&mut self) {
        self.0.lock().stop_fling();
    }
}

/// Drives a coordinator, a scheduler and an in-memory body at a fixed `dt`
pub struct Replay {
    coordinator: NestedScrollCoordinator,
    scheduler: SharedScheduler,
    body: Arc<Mutex<InMemoryBody>>,
    dt: f32,
    frame: u64,
    records: Vec<FrameRecord>,
}

impl Replay {
    pub fn new(config: CoordinatorConfig, script: &Script, dt: f32) -> Self {
        let scheduler = AnimationScheduler::shared();
        let body = Arc::new(Mutex::new(
            InMemoryBody::new(script.body_max_offset)
                .with_offset(script.body_offset)
                .with_decay(config.decay_config()),
        ));

        let mut coordinator = NestedScrollCoordinator::new(config).with_scheduler(&scheduler);
        coordinator.attach_body(Box::new(SharedBody(Arc::clone(&body))));

        Self {
            coordinator,
            scheduler,
            body,
            dt,
            frame: 0,
            records: Vec::new(),
        }
    }

    /// Replay every step and return one record per frame
    pub fn run(mut self, steps: &[Step]) -> Vec<FrameRecord> {
        for step in steps {
            tracing::debug!("step {:?}", step);
            self.step(step);
        }
        self.records
    }

    fn step(&mut self, step: &Step) {
        match step {
            Step::Layout { header_height } => {
                self.coordinator.set_max_offset(*header_height);
                self.record();
            }
            Step::Drag { deltas } => {
                if !self.coordinator.is_dragging() {
                    self.coordinator.begin_drag();
                }
                for delta in deltas {
                    self.coordinator.drag_by(*delta);
                    self.frame += 1;
                    self.record();
                }
            }
            Step::Release { velocity } => {
                self.coordinator.end_drag(*velocity);
                self.record();
            }
            Step::BodyFling { velocity } => {
                self.body_fling(*velocity);
                self.record();
            }
            Step::Frames { count } => {
                for _ in 0..*count {
                    self.advance_frame();
                }
            }
            Step::ScrollTo { target, animated } => {
                if *animated {
                    self.coordinator.animate_scroll_to(*target);
                } else {
                    self.coordinator.scroll_to(*target);
                }
                self.record();
            }
        }
    }

    /// A fling the body starts itself: the header gets first claim on the
    /// velocity, the body whatever is left, and the header again whatever
    /// the body declines
    fn body_fling(&mut self, velocity: f32) {
        let consumed = self.coordinator.pre_fling(velocity);
        let remaining = velocity - consumed;
        if is_at_rest(remaining, self.coordinator.config().decay.velocity_threshold) {
            return;
        }

        let declined = self.body.lock().fling(remaining);
        if declined != 0.0 {
            self.coordinator.post_fling(remaining - declined, declined);
        }
    }

    fn advance_frame(&mut self) {
        self.scheduler.lock().tick_by(self.dt);
        self.coordinator.tick();

        let status = self.body.lock().tick(self.dt);
        if let BodyFlingStatus::Finished { residual } = status {
            self.coordinator.post_fling(0.0, residual);
        }

        self.frame += 1;
        self.record();
    }

    fn record(&mut self) {
        self.records.push(FrameRecord {
            frame: self.frame,
            header_offset: self.coordinator.current_offset(),
            body_offset: self.coordinator.body_offset(),
            state: self.coordinator.fling_state(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../scripts/collapse_and_handoff.toml");

    #[test]
    fn test_parses_sample_script() {
        let script = Script::from_toml_str(SAMPLE).expect("sample parses");
        assert_eq!(script.body_max_offset, 4000);
        assert_eq!(script.body_offset, 0);
        assert_eq!(script.steps.len(), 8);
        assert_eq!(script.steps[0], Step::Layout { header_height: 300 });
        assert_eq!(
            script.steps[6],
            Step::ScrollTo {
                target: 150,
                animated: true
            }
        );
    }

    #[test]
    fn test_rejects_unknown_action() {
        let err = Script::from_toml_str("[[steps]]\naction = \"pinch\"\n")
            .expect_err("unknown action");
        assert!(format!("{err:#}").contains("pinch"));
    }

    #[test]
    fn test_sample_replay_hands_off_both_ways() {
        let script = Script::from_toml_str(SAMPLE).expect("sample parses");
        let records = Replay::new(CoordinatorConfig::default(), &script, 0.016).run(&script.steps);

        // Release fling runs out of header and continues in the body
        assert!(records
            .iter()
            .any(|r| r.state == FlingState::BodyFlinging && r.header_offset == 300 && r.body_offset > 0));

        // Body fling back to the top carries on into revealing the header
        assert!(records
            .iter()
            .any(|r| r.state == FlingState::OuterFlinging && r.body_offset == 0 && r.header_offset < 300));

        let last = records.last().expect("records");
        assert!((149..=151).contains(&last.header_offset));
        assert_eq!(last.body_offset, 0);
    }

    #[test]
    fn test_drag_records_one_frame_per_delta() {
        let script = Script {
            body_max_offset: 500,
            body_offset: 0,
            steps: vec![
                Step::Layout { header_height: 100 },
                Step::Drag {
                    deltas: vec![60.0, 60.0, 60.0],
                },
            ],
        };
        let records = Replay::new(CoordinatorConfig::default(), &script, 0.016).run(&script.steps);

        let offsets: Vec<_> = records
            .iter()
            .map(|r| (r.header_offset, r.body_offset))
            .collect();
        assert_eq!(offsets, vec![(0, 0), (60, 0), (100, 20), (100, 80)]);
    }

    #[test]
    fn test_record_display() {
        let record = FrameRecord {
            frame: 7,
            header_offset: 120,
            body_offset: 0,
            state: FlingState::OuterFlinging,
        };
        assert_eq!(
            record.to_string(),
            "frame     7  header   120  body      0  OuterFlinging"
        );
    }
}
