//! Scripted replay operator implementation.
//!
//! A replay script is a JSON document describing a simulated feed and a
//! sequence of steps to drive an engine through:
//!
//! ```json
//! {
//!   "viewport_height": 800,
//!   "start_ms": 1700000000000,
//!   "cards": [{ "id": "1", "height": 300 }, { "height": 120 }],
//!   "steps": [
//!     { "op": "interval" },
//!     { "op": "advance", "ms": 300 },
//!     { "op": "scroll", "position": 400 },
//!     { "op": "restore", "id": "1" }
//!   ]
//! }
//! ```
//!
//! The engine starts before the first step and is stopped after the last.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::adapter::outbound::feed::card::FeedCard;
use crate::adapter::outbound::feed::surface::SimulatedFeed;
use crate::application::engine::{Engine, TickOutcome, TickReport};
use crate::domain::id::ItemId;
use crate::domain::seen::from_epoch_millis;
use crate::domain::signal::{EngineEvent, Signal};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::store::{StoreBackend, StoreConfig};
use crate::infrastructure::factory::store::build_store;
use crate::port::inbound::operator::replay::{
    ReplayEventView, ReplayOperator, ReplayRequest, ReplaySummary,
};
use crate::port::outbound::clock::{Clock, SystemClock};
use crate::port::outbound::store::SeenStore;

use super::entry::Operator;

/// Longest single `advance` step (ten years).
const MAX_ADVANCE_MS: i64 = 3650 * 24 * 60 * 60 * 1000;

fn default_viewport_height() -> f64 {
    800.0
}

fn default_author() -> String {
    "replay".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReplayScript {
    #[serde(default = "default_viewport_height")]
    viewport_height: f64,
    #[serde(default)]
    permalink_view: bool,
    /// Epoch millis of the first step; the system time when absent.
    #[serde(default)]
    start_ms: Option<i64>,
    #[serde(default)]
    cards: Vec<ScriptCard>,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptCard {
    #[serde(default = "default_author")]
    author: String,
    /// Status id; a card without one has no resolvable identity.
    #[serde(default)]
    id: Option<String>,
    height: f64,
    /// The reply thread continues into the card below.
    #[serde(default)]
    thread: bool,
}

impl ScriptCard {
    fn to_card(&self) -> FeedCard {
        let card = match &self.id {
            Some(id) => FeedCard::status(&self.author, id, self.height),
            None => FeedCard::anonymous(self.height),
        };
        if self.thread {
            card.with_thread()
        } else {
            card
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Scroll { position: f64 },
    Focus,
    Blur,
    Hide,
    Interval,
    Restore { id: String },
    InsertTop { card: ScriptCard },
    Detach { id: String },
    Advance { ms: i64 },
    Start,
    Stop,
}

impl ReplayScript {
    fn parse(json: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            return Err(Error::Replay("viewport_height must be positive".to_string()));
        }
        if let Some(ms) = self.start_ms {
            if from_epoch_millis(ms).is_none() {
                return Err(Error::Replay(format!("start_ms {ms} is out of range")));
            }
        }

        let cards = self.cards.iter().chain(self.steps.iter().filter_map(|step| match step {
            Step::InsertTop { card } => Some(card),
            _ => None,
        }));
        for card in cards {
            if !(card.height.is_finite() && card.height > 0.0) {
                return Err(Error::Replay(format!(
                    "card {} has a non-positive height",
                    card.id.as_deref().unwrap_or("<anonymous>")
                )));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Advance { ms } if *ms < 0 => {
                    return Err(Error::Replay(format!(
                        "step {index}: advance must not be negative"
                    )));
                }
                Step::Advance { ms } if *ms > MAX_ADVANCE_MS => {
                    return Err(Error::Replay(format!(
                        "step {index}: advance must not exceed {MAX_ADVANCE_MS}ms"
                    )));
                }
                Step::Scroll { position } if !position.is_finite() => {
                    return Err(Error::Replay(format!(
                        "step {index}: scroll position must be finite"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn feed(&self) -> SimulatedFeed {
        let mut feed = SimulatedFeed::new(self.viewport_height);
        feed.set_permalink_view(self.permalink_view);
        for card in &self.cards {
            feed.push(card.to_card());
        }
        feed
    }
}

/// Clock that only moves when a script step advances it.
#[derive(Debug)]
struct ReplayClock {
    now: Mutex<DateTime<Utc>>,
}

impl ReplayClock {
    fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Returns false, leaving the clock untouched, when `by` would move it
    /// past the representable range.
    fn advance(&self, by: Duration) -> bool {
        let mut now = self.now.lock();
        match now.checked_add_signed(by) {
            Some(next) => {
                *now = next;
                true
            }
            None => false,
        }
    }
}

impl Clock for ReplayClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Accumulates engine reports into the operator summary.
struct Recorder {
    start: DateTime<Utc>,
    summary: ReplaySummary,
}

impl Recorder {
    fn record(&mut self, step: usize, at: DateTime<Utc>, report: TickReport) {
        let at_ms = at.signed_duration_since(self.start).num_milliseconds();
        let mut lines: Vec<(&'static str, Option<ItemId>)> = Vec::new();

        match report.outcome {
            TickOutcome::Dropped => {
                self.summary.dropped += 1;
                lines.push(("dropped", None));
            }
            TickOutcome::Stopped => lines.push(("stopped", None)),
            TickOutcome::Processed => {}
        }
        for event in report.events {
            let (kind, id) = match event {
                EngineEvent::Seen(id) => {
                    self.summary.seen += 1;
                    ("seen", id)
                }
                EngineEvent::Collapsed(id) => {
                    self.summary.collapsed += 1;
                    ("collapsed", id)
                }
                EngineEvent::Restored(id) => {
                    self.summary.restored += 1;
                    ("restored", id)
                }
            };
            lines.push((kind, Some(id)));
        }

        self.summary
            .events
            .extend(lines.into_iter().map(|(kind, id)| ReplayEventView {
                step,
                at_ms,
                kind: kind.to_string(),
                id: id.map(|id| id.as_str().to_string()),
            }));
    }
}

fn run_script(
    config: &Config,
    script: &ReplayScript,
    store: Arc<dyn SeenStore>,
) -> Result<ReplaySummary> {
    let start = script
        .start_ms
        .and_then(from_epoch_millis)
        .unwrap_or_else(|| SystemClock.now());
    let clock = Arc::new(ReplayClock::new(start));
    let backend = store.backend_name().to_string();

    let mut engine = Engine::new(config.engine_config(), store, script.feed(), clock.clone());
    engine.start();

    let mut recorder = Recorder {
        start,
        summary: ReplaySummary {
            backend,
            steps: script.steps.len(),
            ..ReplaySummary::default()
        },
    };

    for (index, step) in script.steps.iter().enumerate() {
        debug!(step = index, ?step, "Replaying step");
        let signal = match step {
            Step::Scroll { position } => {
                engine.surface_mut().scroll_to(*position);
                Some(Signal::Scroll {
                    position: *position,
                })
            }
            Step::Focus => Some(Signal::Focus),
            Step::Blur => Some(Signal::Blur),
            Step::Hide => Some(Signal::Hide),
            Step::Interval => Some(Signal::Interval),
            Step::Restore { id } => Some(Signal::Restore(ItemId::new(id.as_str()))),
            Step::InsertTop { card } => {
                engine.surface_mut().insert_top(card.to_card());
                None
            }
            Step::Detach { id } => {
                let feed = engine.surface_mut();
                let key = feed.key_of(&ItemId::new(id.as_str())).ok_or_else(|| {
                    Error::Replay(format!("step {index}: no attached card with id {id}"))
                })?;
                feed.detach(key);
                None
            }
            Step::Advance { ms } => {
                if !clock.advance(Duration::milliseconds(*ms)) {
                    return Err(Error::Replay(format!(
                        "step {index}: advance moves the clock out of range"
                    )));
                }
                None
            }
            Step::Start => {
                engine.start();
                None
            }
            Step::Stop => {
                engine.stop();
                None
            }
        };

        if let Some(signal) = signal {
            let report = engine.handle(signal);
            recorder.record(index, clock.now(), report);
        }
    }

    engine.stop();
    Ok(recorder.summary)
}

#[async_trait]
impl ReplayOperator for Operator {
    async fn replay(&self, request: ReplayRequest) -> Result<ReplaySummary> {
        let mut config = Config::parse_toml(&request.config_toml)?;
        if request.ephemeral {
            config.store = StoreConfig {
                backend: StoreBackend::Memory,
                path: None,
                write_behind: false,
            };
        }
        let script = ReplayScript::parse(&request.script_json)?;

        let handle = build_store(&config.store)?;
        let result = run_script(&config, &script, handle.store());
        handle.close().await;

        let summary = result?;
        info!(
            backend = %summary.backend,
            steps = summary.steps,
            seen = summary.seen,
            collapsed = summary.collapsed,
            "Replay finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCROLL_PAST_FIRST: &str = r#"{
        "viewport_height": 800,
        "start_ms": 1700000000000,
        "cards": [
            { "id": "1", "height": 300 },
            { "id": "2", "height": 300 },
            { "id": "3", "height": 300 },
            { "id": "4", "height": 300 },
            { "id": "5", "height": 300 }
        ],
        "steps": [
            { "op": "interval" },
            { "op": "advance", "ms": 300 },
            { "op": "scroll", "position": 400 }
        ]
    }"#;

    fn request(config_toml: String, script: &str, ephemeral: bool) -> ReplayRequest {
        ReplayRequest {
            config_toml,
            script_json: script.to_string(),
            ephemeral,
        }
    }

    fn kinds(summary: &ReplaySummary) -> Vec<(String, Option<String>)> {
        summary
            .events
            .iter()
            .map(|e| (e.kind.clone(), e.id.clone()))
            .collect()
    }

    #[tokio::test]
    async fn ephemeral_replay_marks_first_card_seen() {
        let summary = Operator
            .replay(request(String::new(), SCROLL_PAST_FIRST, true))
            .await
            .unwrap();

        assert_eq!(summary.backend, "memory");
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.seen, 1);
        assert_eq!(kinds(&summary), vec![("seen".to_string(), Some("1".to_string()))]);
        assert_eq!(summary.events[0].step, 2);
        assert_eq!(summary.events[0].at_ms, 300);
    }

    #[tokio::test]
    async fn second_session_collapses_persisted_item() {
        let dir = tempfile::tempdir().unwrap();
        let config = format!(
            "[store]\nbackend = \"json\"\npath = {:?}\nwrite_behind = true\n",
            dir.path().join("seen.json").display().to_string()
        );

        Operator
            .replay(request(config.clone(), SCROLL_PAST_FIRST, false))
            .await
            .unwrap();
        let second = Operator
            .replay(request(
                config,
                r#"{ "start_ms": 1700000060000,
                     "cards": [{ "id": "1", "height": 300 }, { "id": "2", "height": 300 }],
                     "steps": [{ "op": "interval" }] }"#,
                false,
            ))
            .await
            .unwrap();

        assert_eq!(
            kinds(&second),
            vec![("collapsed".to_string(), Some("1".to_string()))]
        );
    }

    #[tokio::test]
    async fn signals_while_stopped_are_reported() {
        let summary = Operator
            .replay(request(
                String::new(),
                r#"{ "start_ms": 0, "steps": [{ "op": "stop" }, { "op": "interval" }] }"#,
                true,
            ))
            .await
            .unwrap();

        assert_eq!(kinds(&summary), vec![("stopped".to_string(), None)]);
    }

    #[tokio::test]
    async fn rate_gate_drops_are_counted() {
        let summary = Operator
            .replay(request(
                String::new(),
                r#"{ "start_ms": 0, "steps": [
                    { "op": "interval" },
                    { "op": "advance", "ms": 10 },
                    { "op": "interval" }
                ] }"#,
                true,
            ))
            .await
            .unwrap();

        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.events[0].step, 2);
    }

    #[tokio::test]
    async fn detaching_unknown_card_fails() {
        let err = Operator
            .replay(request(
                String::new(),
                r#"{ "steps": [{ "op": "detach", "id": "nope" }] }"#,
                true,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Replay(_)));
    }

    #[test]
    fn rejects_invalid_scripts() {
        for script in [
            r#"{ "viewport_height": 0, "steps": [] }"#,
            r#"{ "cards": [{ "height": -1 }], "steps": [] }"#,
            r#"{ "steps": [{ "op": "advance", "ms": -5 }] }"#,
            r#"{ "steps": [{ "op": "advance", "ms": 9000000000000000000 }] }"#,
        ] {
            assert!(matches!(ReplayScript::parse(script), Err(Error::Replay(_))), "{script}");
        }
        assert!(matches!(
            ReplayScript::parse(r#"{ "steps": [{ "op": "teleport" }] }"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn replay_clock_refuses_to_leave_the_calendar() {
        let start = from_epoch_millis(1_700_000_000_000).unwrap();
        let clock = ReplayClock::new(start);

        assert!(!clock.advance(Duration::days(200_000_000)));
        assert_eq!(clock.now(), start);
        assert!(clock.advance(Duration::milliseconds(MAX_ADVANCE_MS)));
        assert!(clock.now() > start);
    }

    #[tokio::test]
    async fn oversized_advance_is_a_script_error() {
        let script = r#"{ "steps": [{ "op": "advance", "ms": 9000000000000000000 }] }"#;
        let result = Operator.replay(request(String::new(), script, true)).await;
        assert!(matches!(result, Err(Error::Replay(_))));
    }
}
