//! Guided-exercise definitions and the phase/cycle countdown timer.
//!
//! The timer is an explicit finite-state machine driven by a single spawned
//! task. Phase changes are published as events over an unbounded channel and
//! the observable state lives behind a small lock. Cancellation invalidates a
//! generation counter, so a tick scheduled by a superseded run can never
//! mutate state afterwards; there is at most one live countdown per timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Phase {
    pub label: String,
    pub duration_ms: u64,
    pub instruction: String,
}

impl Phase {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cycles: u32,
    pub phases: Vec<Phase>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExerciseError {
    NoPhases,
    ZeroCycles,
    ZeroDuration { phase: String },
}

impl std::fmt::Display for ExerciseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseError::NoPhases => write!(f, "exercise has no phases"),
            ExerciseError::ZeroCycles => write!(f, "exercise must run at least one cycle"),
            ExerciseError::ZeroDuration { phase } => {
                write!(f, "phase '{phase}' has a zero duration")
            }
        }
    }
}

impl std::error::Error for ExerciseError {}

impl ExerciseDefinition {
    pub fn validate(&self) -> Result<(), ExerciseError> {
        if self.phases.is_empty() {
            return Err(ExerciseError::NoPhases);
        }
        if self.cycles == 0 {
            return Err(ExerciseError::ZeroCycles);
        }
        if let Some(phase) = self.phases.iter().find(|p| p.duration_ms == 0) {
            return Err(ExerciseError::ZeroDuration {
                phase: phase.label.clone(),
            });
        }
        Ok(())
    }

    pub fn cycle_duration(&self) -> Duration {
        self.phases.iter().map(Phase::duration).sum()
    }

    /// Duration of the whole exercise, all cycles included.
    pub fn total_duration(&self) -> Duration {
        self.cycle_duration() * self.cycles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { cycle: u32, phase: usize },
    Completed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct PhaseEvent {
    pub cycle: u32,
    pub phase: usize,
    pub label: String,
    pub instruction: String,
}

#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// The active phase changed; carries the instruction to surface.
    Phase(PhaseEvent),
    Completed,
    Cancelled,
}

struct TimerInner {
    state: TimerState,
    /// Bumped on every start/stop; a scheduler task only mutates state while
    /// its generation is current.
    generation: u64,
    started_at: Option<Instant>,
    total: Duration,
}

/// Countdown scheduler for one exercise instance.
///
/// `start` while a run is live cancels the previous run and restarts from
/// cycle 0, phase 0 (the one restart policy applied everywhere). `stop` on an
/// idle or finished timer is a no-op.
pub struct ExerciseTimer {
    inner: Arc<Mutex<TimerInner>>,
    events: mpsc::UnboundedSender<TimerEvent>,
    cancel: Option<CancellationToken>,
}

impl ExerciseTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = ExerciseTimer {
            inner: Arc::new(Mutex::new(TimerInner {
                state: TimerState::Idle,
                generation: 0,
                started_at: None,
                total: Duration::ZERO,
            })),
            events: tx,
            cancel: None,
        };
        (timer, rx)
    }

    pub fn state(&self) -> TimerState {
        lock(&self.inner).state
    }

    /// Progress through the whole exercise as a percentage, clamped to 100.
    /// Derived from elapsed time over the total duration, not the current
    /// phase.
    pub fn progress(&self) -> f64 {
        let inner = lock(&self.inner);
        match inner.state {
            TimerState::Completed => 100.0,
            TimerState::Running { .. } => match inner.started_at {
                Some(started_at) if !inner.total.is_zero() => {
                    let elapsed = started_at.elapsed().as_secs_f64();
                    (elapsed / inner.total.as_secs_f64() * 100.0).min(100.0)
                }
                _ => 0.0,
            },
            TimerState::Idle | TimerState::Cancelled => 0.0,
        }
    }

    /// Begin a fresh run of `definition`. Any live run is cancelled first;
    /// counters reset to cycle 0, phase 0.
    pub fn start(&mut self, definition: ExerciseDefinition) -> Result<(), ExerciseError> {
        definition.validate()?;

        if let Some(token) = self.cancel.take() {
            token.cancel();
        }

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let generation = {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state = TimerState::Running { cycle: 0, phase: 0 };
            inner.started_at = Some(Instant::now());
            inner.total = definition.total_duration();
            inner.generation
        };

        debug!(exercise = %definition.name, generation, "starting exercise run");
        tokio::spawn(run_schedule(
            self.inner.clone(),
            self.events.clone(),
            definition,
            token,
            generation,
        ));
        Ok(())
    }

    /// Cancel the live run, if any. The pending phase tick is invalidated, so
    /// no transition can fire after this returns. A no-op unless running.
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }

        let cancelled = {
            let mut inner = lock(&self.inner);
            if matches!(inner.state, TimerState::Running { .. }) {
                inner.generation += 1;
                inner.state = TimerState::Cancelled;
                inner.started_at = None;
                true
            } else {
                false
            }
        };

        if cancelled {
            let _ = self.events.send(TimerEvent::Cancelled);
        }
    }
}

async fn run_schedule(
    inner: Arc<Mutex<TimerInner>>,
    events: mpsc::UnboundedSender<TimerEvent>,
    definition: ExerciseDefinition,
    token: CancellationToken,
    generation: u64,
) {
    for cycle in 0..definition.cycles {
        for (index, phase) in definition.phases.iter().enumerate() {
            {
                let mut guard = lock(&inner);
                if guard.generation != generation {
                    return;
                }
                guard.state = TimerState::Running {
                    cycle,
                    phase: index,
                };
            }

            let _ = events.send(TimerEvent::Phase(PhaseEvent {
                cycle,
                phase: index,
                label: phase.label.clone(),
                instruction: phase.instruction.clone(),
            }));

            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(phase.duration()) => {}
            }
        }
    }

    let mut guard = lock(&inner);
    if guard.generation != generation {
        return;
    }
    guard.state = TimerState::Completed;
    drop(guard);
    let _ = events.send(TimerEvent::Completed);
}

fn lock(inner: &Mutex<TimerInner>) -> MutexGuard<'_, TimerInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::yield_now;

    fn two_by_two() -> ExerciseDefinition {
        ExerciseDefinition {
            name: "Test Breathing".to_string(),
            description: String::new(),
            cycles: 2,
            phases: vec![
                Phase {
                    label: "In".to_string(),
                    duration_ms: 100,
                    instruction: "breathe in".to_string(),
                },
                Phase {
                    label: "Out".to_string(),
                    duration_ms: 100,
                    instruction: "breathe out".to_string(),
                },
            ],
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn settle() {
        // Let the spawned scheduler task observe its timers.
        for _ in 0..4 {
            yield_now().await;
        }
    }

    #[test]
    fn validation_rejects_degenerate_definitions() {
        let mut def = two_by_two();
        def.phases.clear();
        assert_eq!(def.validate(), Err(ExerciseError::NoPhases));

        let mut def = two_by_two();
        def.cycles = 0;
        assert_eq!(def.validate(), Err(ExerciseError::ZeroCycles));

        let mut def = two_by_two();
        def.phases[1].duration_ms = 0;
        assert_eq!(
            def.validate(),
            Err(ExerciseError::ZeroDuration {
                phase: "Out".to_string()
            })
        );
    }

    #[test]
    fn total_duration_covers_all_cycles() {
        assert_eq!(two_by_two().total_duration(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_emits_every_phase_in_order() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        timer.start(two_by_two()).unwrap();

        tokio::time::sleep(Duration::from_millis(450)).await;
        settle().await;

        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(timer.progress(), 100.0);

        let events = drain(&mut rx);
        let phases: Vec<(u32, usize)> = events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::Phase(p) => Some((p.cycle, p.phase)),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(matches!(events.last(), Some(TimerEvent::Completed)));
    }

    #[tokio::test(start_paused = true)]
    async fn phase_events_carry_instructions() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        timer.start(two_by_two()).unwrap();
        settle().await;

        match drain(&mut rx).first() {
            Some(TimerEvent::Phase(event)) => {
                assert_eq!(event.label, "In");
                assert_eq!(event.instruction, "breathe in");
            }
            other => panic!("expected phase event, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_zombie_transitions() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        timer.start(two_by_two()).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        timer.stop();
        drain(&mut rx);

        tokio::time::sleep(Duration::from_millis(300)).await;
        settle().await;

        assert_eq!(timer.state(), TimerState::Cancelled);
        // No phase event may fire after the stop.
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_emits_a_single_cancelled_event() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        timer.start(two_by_two()).unwrap();
        settle().await;
        drain(&mut rx);

        timer.stop();
        timer.stop();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TimerEvent::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_when_idle_is_a_noop() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        timer.stop();

        assert_eq!(timer.state(), TimerState::Idle);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_while_running_resets_counters() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        timer.start(two_by_two()).unwrap();

        // Into the second phase of the first run.
        tokio::time::sleep(Duration::from_millis(150)).await;
        settle().await;
        assert_eq!(timer.state(), TimerState::Running { cycle: 0, phase: 1 });
        drain(&mut rx);

        timer.start(two_by_two()).unwrap();
        settle().await;
        assert_eq!(timer.state(), TimerState::Running { cycle: 0, phase: 0 });

        // The fresh run finishes on its own schedule; exactly one completion.
        tokio::time::sleep(Duration::from_millis(450)).await;
        settle().await;
        assert_eq!(timer.state(), TimerState::Completed);
        let completions = drain(&mut rx)
            .iter()
            .filter(|e| matches!(e, TimerEvent::Completed))
            .count();
        assert_eq!(completions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_completion_runs_fresh() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        timer.start(two_by_two()).unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;
        settle().await;
        assert_eq!(timer.state(), TimerState::Completed);
        drain(&mut rx);

        timer.start(two_by_two()).unwrap();
        settle().await;
        assert_eq!(timer.state(), TimerState::Running { cycle: 0, phase: 0 });

        tokio::time::sleep(Duration::from_millis(450)).await;
        settle().await;
        assert_eq!(timer.state(), TimerState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_tracks_the_whole_exercise() {
        let (mut timer, _rx) = ExerciseTimer::new();
        timer.start(two_by_two()).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        settle().await;
        let quarter = timer.progress();
        assert!((24.0..=26.0).contains(&quarter), "got {quarter}");

        tokio::time::sleep(Duration::from_millis(200)).await;
        settle().await;
        let late = timer.progress();
        assert!(late > quarter);
        assert!(late <= 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_definition_never_starts_a_run() {
        let (mut timer, mut rx) = ExerciseTimer::new();
        let mut bad = two_by_two();
        bad.cycles = 0;

        assert!(timer.start(bad).is_err());
        assert_eq!(timer.state(), TimerState::Idle);
        settle().await;
        assert!(drain(&mut rx).is_empty());
    }
}
