use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::sync::Mutex;

use crate::collaborators::{ReasoningAgent, ReasoningInput, SpeechSynthesizer};
use crate::config::InterviewConfig;
use crate::metrics::{MetricsSnapshot, MetricsStore};
use crate::models::{
    AnalysisRecord, Judgment, Message, PlanItem, PlanItemStatus, ReasoningLogEntry, RoutingAction,
};

use super::state::{InterviewNode, SessionState};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Grace delay between playback completion (or synthesis failure) and
/// entering LISTEN.
const SETTLE_DELAY_MS: u64 = 400;
/// How many trailing transcript messages the reasoning collaborator sees.
const TRANSCRIPT_TAIL_LEN: usize = 6;

pub type SubscriptionId = u64;

type Observer = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// The turn state machine: INIT -> ASK -> LISTEN -> ANALYZE -> DECIDE ->
/// (ASK | WRAP_UP).
///
/// Holds the authoritative session state. All mutation is serialized through
/// one mutate-and-broadcast operation; observers receive an immutable clone
/// of the full state after every mutation. Collaborator failures never halt
/// the cycle; each call site substitutes a safe default.
#[derive(Clone)]
pub struct InterviewController {
    state: Arc<Mutex<SessionState>>,
    observers: Arc<StdMutex<HashMap<SubscriptionId, Observer>>>,
    next_subscription: Arc<AtomicU64>,
    metrics: MetricsStore,
    reasoner: Arc<dyn ReasoningAgent>,
    voice: Arc<dyn SpeechSynthesizer>,
}

impl InterviewController {
    pub fn new(
        config: InterviewConfig,
        metrics: MetricsStore,
        reasoner: Arc<dyn ReasoningAgent>,
        voice: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(config))),
            observers: Arc::new(StdMutex::new(HashMap::new())),
            next_subscription: Arc::new(AtomicU64::new(1)),
            metrics,
            reasoner,
            voice,
        }
    }

    /// Clone of the current session state.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Register an observer. It receives one immediate emission of the
    /// current state, then a full-state clone after every mutation.
    pub async fn subscribe(
        &self,
        callback: impl Fn(&SessionState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let snapshot = self.state.lock().await.clone();
        callback(&snapshot);

        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.observers
            .lock()
            .unwrap()
            .insert(id, Arc::new(callback));
        id
    }

    /// Remove an observer by handle. Unknown handles are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.lock().unwrap().remove(&id);
    }

    /// Begin the interview: generate the plan (or fall back to the built-in
    /// one), activate the first item, compose the opening question, and run
    /// the first ask step. Only valid from INIT.
    pub async fn start(&self) -> Result<()> {
        let config = {
            let guard = self.state.lock().await;
            if guard.node != InterviewNode::Init {
                bail!("interview already started");
            }
            guard.config.clone()
        };

        let mut plan = match self.reasoner.generate_plan(&config).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => {
                log_warn!("plan generation returned no items; using fallback plan");
                default_plan()
            }
            Err(err) => {
                log_warn!("plan generation failed: {err:?}; using fallback plan");
                default_plan()
            }
        };
        plan[0].status = PlanItemStatus::Active;

        let question = opening_question(&config, &plan[0]);
        log_info!("interview starting with {} plan items", plan.len());

        self.mutate(move |state| {
            state.plan = plan;
            state.current_index = 0;
            state.current_question = question;
            state.node = InterviewNode::Ask;
        })
        .await;

        self.run_ask().await;
        Ok(())
    }

    /// Human-in-the-loop re-entry point: the candidate's spoken answer,
    /// already transcribed. Silently ignored outside LISTEN so duplicate or
    /// stray submissions cannot corrupt a turn.
    pub async fn submit_answer(&self, text: &str) -> Result<()> {
        // Freeze the live metrics before anything else; the reasoning call
        // for this turn must never see a later snapshot.
        let frozen = self.metrics.latest();

        let snapshot = {
            let mut guard = self.state.lock().await;
            if guard.node != InterviewNode::Listen {
                log_info!(
                    "submit_answer ignored outside LISTEN (node: {:?})",
                    guard.node
                );
                return Ok(());
            }
            guard.transcript.push(Message::candidate(text));
            guard.metrics_history.push(frozen.clone());
            guard.current_answer = text.to_string();
            guard.node = InterviewNode::Analyze;
            guard.clone()
        };
        self.broadcast(&snapshot);

        self.run_analyze(frozen).await;
        Ok(())
    }

    /// Record external session finalization. Only valid from WRAP_UP; the
    /// engine itself never calls this.
    pub async fn mark_ended(&self) -> Result<()> {
        {
            let guard = self.state.lock().await;
            if guard.node != InterviewNode::WrapUp {
                bail!("interview is not in wrap-up");
            }
        }
        self.mutate(|state| state.node = InterviewNode::Ended).await;
        Ok(())
    }

    /// ASK: append the agent utterance, hand the question text to the speech
    /// collaborator, and enter LISTEN after playback (or straight away on
    /// synthesis failure) plus the settle delay.
    async fn run_ask(&self) {
        let question = { self.state.lock().await.current_question.clone() };

        self.mutate({
            let question = question.clone();
            move |state| state.transcript.push(Message::agent(question))
        })
        .await;

        match self.voice.synthesize(&question).await {
            Ok(Some(buffer)) => {
                if let Err(err) = self.voice.play(buffer).await {
                    log_warn!("audio playback failed: {err:?}");
                }
            }
            Ok(None) => {
                log_info!("speech synthesis unavailable; skipping playback");
            }
            Err(err) => {
                log_warn!("speech synthesis failed: {err:?}");
            }
        }

        tokio::time::sleep(Duration::from_millis(SETTLE_DELAY_MS)).await;

        self.mutate(|state| state.node = InterviewNode::Listen).await;
    }

    /// ANALYZE: invoke the reasoning collaborator with the turn's frozen
    /// metrics, then append the reasoning-log entry and analysis record.
    async fn run_analyze(&self, frozen: MetricsSnapshot) {
        let (config, tail, question, answer, competency, question_id) = {
            let guard = self.state.lock().await;
            let tail_start = guard.transcript.len().saturating_sub(TRANSCRIPT_TAIL_LEN);
            (
                guard.config.clone(),
                guard.transcript[tail_start..].to_vec(),
                guard.current_question.clone(),
                guard.current_answer.clone(),
                guard
                    .current_item()
                    .map(|item| item.competency.clone())
                    .unwrap_or_default(),
                guard
                    .current_item()
                    .map(|item| item.id.clone())
                    .unwrap_or_default(),
            )
        };

        let input = ReasoningInput {
            config: &config,
            transcript_tail: &tail,
            question: &question,
            answer: &answer,
            metrics: &frozen,
            competency: &competency,
        };

        let judgment = match self.reasoner.reason(input).await {
            Ok(draft) => Judgment::from_draft(draft),
            Err(err) => {
                log_warn!("reasoning call failed: {err:?}; using fallback judgment");
                Judgment::fallback()
            }
        };

        let log_entry = ReasoningLogEntry::from_judgment(&judgment, &frozen);
        let record = AnalysisRecord {
            question_id,
            question,
            answer,
            metrics: frozen,
            content_score: judgment.content_score,
            delivery_score: judgment.delivery_score,
            strengths: judgment.strengths.clone(),
            weaknesses: judgment.weaknesses.clone(),
        };

        self.mutate(move |state| {
            state.reasoning_log.push(log_entry);
            state.analyses.push(record);
            state.node = InterviewNode::Decide;
        })
        .await;

        self.run_decide(judgment).await;
    }

    /// DECIDE: apply the routing policy, in order: wrap-up (collaborator says
    /// so, or the plan is exhausted), follow-up on the same item, or advance
    /// to the next item. Unrecognized actions already resolved to advance.
    async fn run_decide(&self, judgment: Judgment) {
        let wrap = {
            let guard = self.state.lock().await;
            judgment.action == RoutingAction::WrapUp || guard.is_last_item()
        };

        if wrap {
            log_info!("routing to wrap-up ({})", judgment.action.as_str());
            self.mutate(move |state| {
                state.complete_current();
                state.current_question = judgment.next_utterance;
                state.node = InterviewNode::WrapUp;
            })
            .await;
            return;
        }

        match judgment.action {
            RoutingAction::FollowUp => {
                self.mutate(move |state| {
                    state.current_question = judgment.next_utterance;
                    state.node = InterviewNode::Ask;
                })
                .await;
            }
            _ => {
                self.mutate(move |state| {
                    state.advance();
                    state.current_question = judgment.next_utterance;
                    state.node = InterviewNode::Ask;
                })
                .await;
            }
        }

        self.run_ask().await;
    }

    /// The single state-replacement operation: apply the mutation under the
    /// lock, then broadcast a clone of the full state to every observer.
    async fn mutate<F>(&self, apply: F) -> SessionState
    where
        F: FnOnce(&mut SessionState),
    {
        let snapshot = {
            let mut guard = self.state.lock().await;
            apply(&mut guard);
            guard.clone()
        };
        self.broadcast(&snapshot);
        snapshot
    }

    fn broadcast(&self, state: &SessionState) {
        // Clone the callbacks out of the lock so an observer may subscribe
        // or unsubscribe from inside its own callback.
        let observers: Vec<Observer> = {
            let guard = self.observers.lock().unwrap();
            guard.values().cloned().collect()
        };
        for callback in observers {
            callback(state);
        }
    }
}

/// Minimal plan used when remote plan generation fails.
fn default_plan() -> Vec<PlanItem> {
    vec![
        PlanItem::new(
            "Background",
            "Walk me through your background and what drew you to this role.",
        ),
        PlanItem::new(
            "Problem Solving",
            "Describe a challenging problem you solved recently and how you approached it.",
        ),
    ]
}

fn opening_question(config: &InterviewConfig, first: &PlanItem) -> String {
    format!(
        "Welcome, and thanks for joining this {} interview. To start: {}",
        config.role, first.topic
    )
}
