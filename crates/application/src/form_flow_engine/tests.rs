use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagecraft_core::{AppError, AppResult, LandingPageId};
use pagecraft_domain::{
    AnalyticsEvent, AnalyticsEventType, BlockConfig, FieldValueMap, FormFlow, FormStep,
    PageDocument, legacy_appraisal_flow,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use super::{DEFAULT_SUBMIT_ERROR, FlowState, FormFlowEngine};
use crate::analytics_service::AnalyticsTracker;
use crate::page_ports::{AnalyticsSink, SubmissionContext, SubmissionReceipt, SubmissionSink};
use crate::BlockRegistry;

#[derive(Default)]
struct RecordingSink {
    submissions: Mutex<Vec<(FieldValueMap, SubmissionContext)>>,
    failures_remaining: Mutex<usize>,
}

impl RecordingSink {
    fn failing_once() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            failures_remaining: Mutex::new(1),
        }
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit(
        &self,
        payload: FieldValueMap,
        context: &SubmissionContext,
    ) -> AppResult<SubmissionReceipt> {
        let mut failures = self.failures_remaining.lock().await;
        if *failures > 0 {
            *failures -= 1;
            return Err(AppError::Internal("receiver unavailable".to_owned()));
        }

        self.submissions
            .lock()
            .await
            .push((payload, context.clone()));
        Ok(SubmissionReceipt {
            id: Some("lead-1".to_owned()),
        })
    }
}

struct StalledSink;

#[async_trait]
impl SubmissionSink for StalledSink {
    async fn submit(
        &self,
        _payload: FieldValueMap,
        _context: &SubmissionContext,
    ) -> AppResult<SubmissionReceipt> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(SubmissionReceipt::default())
    }
}

#[derive(Default)]
struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

#[async_trait]
impl AnalyticsSink for RecordingAnalytics {
    async fn record(&self, event: AnalyticsEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

fn field_block(id: &str, block_type: &str, props: Value) -> BlockConfig {
    let props = match props {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    BlockConfig::new(id, block_type, props).unwrap_or_else(|_| unreachable!())
}

fn step(id: &str, blocks: Vec<BlockConfig>) -> FormStep {
    FormStep::new(id, id, blocks).unwrap_or_else(|_| unreachable!())
}

fn three_step_flow() -> FormFlow {
    FormFlow::new(vec![
        step(
            "a",
            vec![field_block(
                "addr",
                "address-finder",
                json!({"fieldName": "addr", "required": true}),
            )],
        ),
        step(
            "b",
            vec![field_block(
                "choice",
                "radio-cards",
                json!({
                    "fieldName": "choice",
                    "required": true,
                    "autoAdvance": true,
                    "options": [
                        {"value": "owner", "label": "Owner"},
                        {"value": "buyer", "label": "Buyer"}
                    ]
                }),
            )],
        ),
        step(
            "c",
            vec![
                field_block(
                    "name",
                    "text-input",
                    json!({"label": "Full Name", "fieldName": "name", "required": true}),
                ),
                field_block("email", "email-input", json!({"fieldName": "email"})),
                field_block("phone", "phone-input", json!({"fieldName": "phone"})),
                field_block("consent", "checkbox", json!({"fieldName": "consent"})),
            ],
        ),
    ])
}

fn engine(flow: &FormFlow) -> FormFlowEngine {
    let registry = BlockRegistry::builtin();
    let engine = FormFlowEngine::new(&registry, flow, SubmissionContext::default());
    assert!(engine.is_ok());
    engine.unwrap_or_else(|_| unreachable!())
}

fn fill_contact(engine: &mut FormFlowEngine) {
    for (field, value) in [
        ("name", json!("Aroha Smith")),
        ("email", json!("aroha@example.co.nz")),
        ("phone", json!("021 123 4567")),
        ("consent", json!(true)),
    ] {
        assert!(engine.set_field_value(field, value).is_ok());
    }
}

#[test]
fn next_step_validates_only_the_current_step() {
    let mut engine = engine(&three_step_flow());

    assert!(!engine.next_step());
    assert_eq!(engine.state(), FlowState::Step(1));
    assert_eq!(engine.errors().len(), 1);
    assert!(engine.errors().get("addr").is_some());

    assert!(engine.set_field_value("addr", json!("1 Queen Street")).is_ok());
    assert!(engine.errors().is_empty());
    assert!(engine.next_step());
    assert_eq!(engine.state(), FlowState::Step(2));
}

#[test]
fn next_step_on_the_last_step_does_not_navigate() {
    let mut engine = engine(&three_step_flow());
    assert!(engine.go_to_step(3).is_ok());
    fill_contact(&mut engine);

    assert!(!engine.next_step());
    assert_eq!(engine.state(), FlowState::Step(3));
    assert!(engine.errors().is_empty());
}

#[test]
fn prev_step_moves_back_without_validation() {
    let mut engine = engine(&three_step_flow());
    assert!(!engine.prev_step());

    assert!(engine.go_to_step(3).is_ok());
    assert!(engine.prev_step());
    assert_eq!(engine.state(), FlowState::Step(2));
    assert!(engine.errors().is_empty());
}

#[test]
fn go_to_step_is_bounds_checked() {
    let mut engine = engine(&three_step_flow());

    assert!(engine.go_to_step(0).is_err());
    assert!(engine.go_to_step(4).is_err());
    assert!(engine.go_to_step(2).is_ok());
    assert_eq!(engine.current_step(), 2);
}

#[test]
fn unknown_field_names_are_rejected() {
    let mut engine = engine(&three_step_flow());

    let result = engine.set_field_value("nickname", json!("Ro"));
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(engine.values().is_empty());
}

#[test]
fn flow_without_steps_is_a_configuration_error() {
    let registry = BlockRegistry::builtin();
    let result = FormFlowEngine::new(
        &registry,
        &FormFlow::new(Vec::new()),
        SubmissionContext::default(),
    );

    assert!(matches!(result, Err(AppError::Configuration(_))));
}

#[test]
fn field_errors_use_field_level_messages() {
    let mut engine = engine(&three_step_flow());
    assert!(engine.go_to_step(3).is_ok());
    fill_contact(&mut engine);
    assert!(engine.set_field_value("email", json!("a@b")).is_ok());
    assert!(engine.set_field_value("consent", json!(false)).is_ok());

    assert!(!engine.next_step());
    assert_eq!(
        engine.errors().get("email"),
        Some("Please enter a valid email address")
    );
    assert_eq!(engine.errors().get("consent"), Some("You must agree to continue"));

    assert!(engine.set_field_value("email", json!("a@b.co")).is_ok());
    assert!(engine.set_field_value("consent", json!(true)).is_ok());
    assert!(!engine.next_step());
    assert!(engine.errors().is_empty());
}

#[tokio::test]
async fn submit_with_missing_fields_anywhere_skips_the_sink() {
    let sink = RecordingSink::default();
    let mut engine = engine(&three_step_flow());
    assert!(engine.go_to_step(3).is_ok());
    fill_contact(&mut engine);

    let state = engine.submit_form(&sink).await;

    assert_eq!(state, FlowState::Step(3));
    assert!(engine.errors().get("addr").is_some());
    assert!(engine.errors().get("choice").is_some());
    assert!(sink.submissions.lock().await.is_empty());
}

#[tokio::test]
async fn complete_form_is_submitted_once() {
    let sink = RecordingSink::default();
    let page_id = LandingPageId::new();
    let registry = BlockRegistry::builtin();
    let mut engine = FormFlowEngine::new(
        &registry,
        &three_step_flow(),
        SubmissionContext {
            source_page_id: Some(page_id),
            ..SubmissionContext::default()
        },
    )
    .unwrap_or_else(|_| unreachable!());

    assert!(engine.set_field_value("addr", json!("1 Queen Street")).is_ok());
    assert!(engine.set_field_value("choice", json!("owner")).is_ok());
    fill_contact(&mut engine);

    assert_eq!(engine.submit_form(&sink).await, FlowState::Submitted);
    assert_eq!(
        engine.receipt().and_then(|receipt| receipt.id.as_deref()),
        Some("lead-1")
    );

    assert_eq!(engine.submit_form(&sink).await, FlowState::Submitted);
    assert!(engine.set_field_value("addr", json!("changed")).is_ok());
    assert!(!engine.next_step());

    let submissions = sink.submissions.lock().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0.get("addr"), Some(&json!("1 Queen Street")));
    assert_eq!(submissions[0].1.source_page_id, Some(page_id));
}

#[tokio::test]
async fn single_step_optional_field_submits_empty() {
    let flow = FormFlow::new(vec![step(
        "only",
        vec![field_block("note", "text-input", json!({"fieldName": "note"}))],
    )]);
    let sink = RecordingSink::default();
    let mut engine = engine(&flow);

    assert!(!engine.next_step());
    assert!(engine.errors().is_empty());
    assert_eq!(engine.submit_form(&sink).await, FlowState::Submitted);
    assert_eq!(sink.submissions.lock().await.len(), 1);
}

#[tokio::test]
async fn failed_submission_keeps_values_and_allows_retry() {
    let sink = RecordingSink::failing_once();
    let flow = FormFlow::new(vec![step(
        "only",
        vec![field_block(
            "email",
            "email-input",
            json!({"fieldName": "email", "required": true}),
        )],
    )]);
    let mut engine = engine(&flow);
    assert!(engine.set_field_value("email", json!("a@b.co")).is_ok());

    assert_eq!(engine.submit_form(&sink).await, FlowState::SubmitError);
    assert_eq!(engine.submit_error(), Some(DEFAULT_SUBMIT_ERROR));
    assert_eq!(engine.value("email"), Some(&json!("a@b.co")));
    assert_eq!(engine.current_step(), 1);

    assert_eq!(engine.submit_form(&sink).await, FlowState::Submitted);
    assert!(engine.submit_error().is_none());
}

#[test]
fn repeated_submit_while_submitting_is_ignored() {
    let flow = FormFlow::new(vec![step(
        "only",
        vec![field_block("note", "text-input", json!({"fieldName": "note"}))],
    )]);
    let mut engine = engine(&flow);

    assert!(engine.prepare_submission().is_some());
    assert_eq!(engine.state(), FlowState::Submitting);
    assert!(engine.prepare_submission().is_none());
    assert!(!engine.prev_step());
    assert!(engine.set_field_value("note", json!("late")).is_ok());
    assert!(engine.value("note").is_none());

    assert!(engine.finish_submission(Ok(SubmissionReceipt::default())));
    assert!(!engine.finish_submission(Err(AppError::Internal("late".to_owned()))));
    assert_eq!(engine.state(), FlowState::Submitted);
}

#[tokio::test(start_paused = true)]
async fn stalled_submission_times_out() {
    let flow = FormFlow::new(vec![step(
        "only",
        vec![field_block("note", "text-input", json!({"fieldName": "note"}))],
    )]);
    let mut engine = engine(&flow);
    let started = tokio::time::Instant::now();

    assert_eq!(engine.submit_form(&StalledSink).await, FlowState::SubmitError);
    assert!(started.elapsed() >= Duration::from_secs(15));
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn card_selection_auto_advances_after_the_delay() {
    let mut engine = engine(&three_step_flow());
    assert!(engine.set_field_value("addr", json!("1 Queen Street")).is_ok());
    assert!(engine.next_step());
    let started = tokio::time::Instant::now();

    let advanced = engine
        .commit_field_with_auto_advance("choice", json!("buyer"))
        .await;

    assert!(matches!(advanced, Ok(true)));
    assert_eq!(engine.state(), FlowState::Step(3));
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn auto_advance_still_validates() {
    let mut engine = engine(&three_step_flow());
    assert!(engine.go_to_step(2).is_ok());

    let advanced = engine
        .commit_field_with_auto_advance("choice", json!("landlord"))
        .await;

    assert!(matches!(advanced, Ok(false)));
    assert_eq!(engine.state(), FlowState::Step(2));
    assert_eq!(engine.errors().get("choice"), Some("Please select a valid option"));
}

#[tokio::test]
async fn fields_without_auto_advance_do_not_move() {
    let mut engine = engine(&three_step_flow());

    let advanced = engine
        .commit_field_with_auto_advance("addr", json!("1 Queen Street"))
        .await;

    assert!(matches!(advanced, Ok(false)));
    assert_eq!(engine.state(), FlowState::Step(1));
}

#[tokio::test]
async fn legacy_flow_runs_on_the_same_engine() {
    let registry = BlockRegistry::builtin();
    let document = PageDocument::new(Vec::new(), FormFlow::default());
    let engine = FormFlowEngine::for_document(&registry, &document, SubmissionContext::default());
    assert!(engine.is_ok());
    let mut engine = engine.unwrap_or_else(|_| unreachable!());
    assert_eq!(engine.total_steps(), legacy_appraisal_flow().total_steps());

    assert!(engine.set_field_value("addressFull", json!("1 Queen Street")).is_ok());
    assert!(engine.next_step());
    assert!(engine.next_step());
    assert!(engine.next_step());
    assert_eq!(engine.state(), FlowState::Step(4));

    for (field, value) in [
        ("firstName", json!("Aroha")),
        ("lastName", json!("Smith")),
        ("email", json!("aroha@example.co.nz")),
        ("phone", json!("+64 21 123 4567")),
        ("consent", json!(true)),
    ] {
        assert!(engine.set_field_value(field, value).is_ok());
    }

    let sink = RecordingSink::default();
    assert_eq!(engine.submit_form(&sink).await, FlowState::Submitted);
}

#[tokio::test]
async fn funnel_events_reach_the_tracker() {
    let analytics = Arc::new(RecordingAnalytics::default());
    let tracker = AnalyticsTracker::new(analytics.clone(), None, Some("s-1".to_owned()));
    let flow = FormFlow::new(vec![step(
        "only",
        vec![field_block("note", "text-input", json!({"fieldName": "note"}))],
    )]);
    let mut engine = engine(&flow).with_tracker(tracker);

    assert!(engine.set_field_value("note", json!("hi")).is_ok());
    assert!(!engine.next_step());
    assert_eq!(
        engine.submit_form(&RecordingSink::default()).await,
        FlowState::Submitted
    );
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let kinds: Vec<AnalyticsEventType> = analytics
        .events
        .lock()
        .await
        .iter()
        .map(AnalyticsEvent::event_type)
        .collect();
    assert_eq!(
        kinds,
        vec![
            AnalyticsEventType::FormStart,
            AnalyticsEventType::StepComplete,
            AnalyticsEventType::FormSubmit,
        ]
    );
}
