use std::time::Duration;

use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{
    AnalyticsEventType, FieldErrors, FieldValueMap, FormFlow, PageDocument, validate_fields,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::analytics_service::AnalyticsTracker;
use crate::document_inspection::{CompiledFlow, inspect_document, issues_error};
use crate::page_ports::{SubmissionContext, SubmissionReceipt, SubmissionSink};
use crate::renderer::FormContext;
use crate::BlockRegistry;

/// Upper bound on one submission round trip.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Pause between an auto-advancing selection and the step transition.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(300);

/// Banner shown when the receiver fails without a user-facing reason.
pub const DEFAULT_SUBMIT_ERROR: &str = "Something went wrong. Please try again.";

/// Position of a running form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum FlowState {
    /// Filling in the one-based step.
    Step(usize),
    /// Waiting for the submission receiver.
    Submitting,
    /// Accepted. Terminal.
    Submitted,
    /// Receiver failed; the current step stays editable and submit may be retried.
    SubmitError,
}

/// Payload handed to a submission receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    /// Every collected value keyed by field name.
    pub payload: FieldValueMap,
    /// Source page and attribution.
    pub context: SubmissionContext,
}

/// State machine driving one visitor's pass through a form flow.
pub struct FormFlowEngine {
    flow: CompiledFlow,
    context: SubmissionContext,
    values: FieldValueMap,
    errors: FieldErrors,
    current_step: usize,
    state: FlowState,
    submit_error: Option<String>,
    receipt: Option<SubmissionReceipt>,
    tracker: Option<AnalyticsTracker>,
    submit_timeout: Duration,
    auto_advance_delay: Duration,
}

impl FormFlowEngine {
    /// Starts a form on step one.
    pub fn new(
        registry: &BlockRegistry,
        flow: &FormFlow,
        context: SubmissionContext,
    ) -> AppResult<Self> {
        Ok(Self::from_compiled(
            CompiledFlow::compile(registry, flow)?,
            context,
        ))
    }

    /// Starts the effective form of a page document after inspecting the whole document.
    pub fn for_document(
        registry: &BlockRegistry,
        document: &PageDocument,
        context: SubmissionContext,
    ) -> AppResult<Self> {
        let index = inspect_document(registry, document).map_err(|issues| issues_error(&issues))?;
        Ok(Self::from_compiled(index.into_flow(), context))
    }

    /// Starts a form from an already compiled flow.
    #[must_use]
    pub fn from_compiled(flow: CompiledFlow, context: SubmissionContext) -> Self {
        Self {
            flow,
            context,
            values: FieldValueMap::new(),
            errors: FieldErrors::default(),
            current_step: 1,
            state: FlowState::Step(1),
            submit_error: None,
            receipt: None,
            tracker: None,
            submit_timeout: SUBMIT_TIMEOUT,
            auto_advance_delay: AUTO_ADVANCE_DELAY,
        }
    }

    /// Emits funnel events through a session tracker.
    #[must_use]
    pub fn with_tracker(mut self, tracker: AnalyticsTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Overrides the submission timeout.
    #[must_use]
    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Overrides the auto-advance pause.
    #[must_use]
    pub fn with_auto_advance_delay(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Returns the one-based step being filled, kept through submission.
    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.flow.total_steps()
    }

    /// Returns the compiled flow.
    #[must_use]
    pub fn flow(&self) -> &CompiledFlow {
        &self.flow
    }

    /// Returns collected values.
    #[must_use]
    pub fn values(&self) -> &FieldValueMap {
        &self.values
    }

    /// Returns one collected value.
    #[must_use]
    pub fn value(&self, field_name: &str) -> Option<&Value> {
        self.values.get(field_name)
    }

    /// Returns field errors from the last validation.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the banner message of the last failed submission.
    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Returns the receipt of the accepted submission.
    #[must_use]
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Returns a render handle on the current values and errors.
    #[must_use]
    pub fn form_context(&self) -> FormContext<'_> {
        FormContext::new(
            &self.values,
            &self.errors,
            self.current_step,
            self.total_steps(),
        )
    }

    fn accepts_input(&self) -> bool {
        matches!(self.state, FlowState::Step(_) | FlowState::SubmitError)
    }

    /// Stores a committed field value and clears that field's error.
    ///
    /// Ignored while submitting or after submission.
    pub fn set_field_value(&mut self, field_name: &str, value: Value) -> AppResult<()> {
        if !self.accepts_input() {
            debug!(field_name, state = ?self.state, "field value ignored");
            return Ok(());
        }
        if self.flow.field(field_name).is_none() {
            return Err(AppError::Validation(format!(
                "form has no field named '{field_name}'"
            )));
        }

        if self.values.is_empty() {
            self.track(AnalyticsEventType::FormStart, None);
        }
        self.values.insert(field_name.to_owned(), value);
        self.errors.remove(field_name);
        Ok(())
    }

    /// Validates the current step and advances when it passes.
    ///
    /// On the last step a passing validation does not navigate. Returns whether
    /// the step changed.
    pub fn next_step(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }

        let step = self.current_step;
        self.errors = validate_fields(self.flow.step_fields(step), &self.values);
        if !self.errors.is_empty() {
            debug!(step, errors = self.errors.len(), "step validation failed");
            return false;
        }

        self.track(AnalyticsEventType::StepComplete, Some(step));
        if step >= self.total_steps() {
            return false;
        }

        self.move_to(step + 1);
        true
    }

    /// Moves back one step without validation. Returns whether the step changed.
    pub fn prev_step(&mut self) -> bool {
        if !self.accepts_input() || self.current_step <= 1 {
            return false;
        }

        self.move_to(self.current_step - 1);
        true
    }

    /// Jumps to a one-based step without validation.
    pub fn go_to_step(&mut self, step: usize) -> AppResult<()> {
        if !self.accepts_input() {
            return Ok(());
        }
        if !(1..=self.total_steps()).contains(&step) {
            return Err(AppError::Validation(format!(
                "step {step} is outside 1..={}",
                self.total_steps()
            )));
        }

        self.move_to(step);
        Ok(())
    }

    fn move_to(&mut self, step: usize) {
        self.current_step = step;
        self.state = FlowState::Step(step);
        self.submit_error = None;
    }

    /// Validates every field of the flow and, when all pass, enters `Submitting`.
    ///
    /// Returns `None` when validation fails or a submission is already running
    /// or finished.
    pub fn prepare_submission(&mut self) -> Option<SubmissionRequest> {
        if !self.accepts_input() {
            debug!(state = ?self.state, "submission ignored");
            return None;
        }

        self.state = FlowState::Submitting;
        self.errors = validate_fields(self.flow.all_fields(), &self.values);
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "submission validation failed");
            self.state = FlowState::Step(self.current_step);
            return None;
        }

        self.submit_error = None;
        Some(SubmissionRequest {
            payload: self.values.clone(),
            context: self.context.clone(),
        })
    }

    /// Applies the receiver's answer. Ignored unless a submission is running.
    ///
    /// Returns whether the result was applied.
    pub fn finish_submission(&mut self, result: AppResult<SubmissionReceipt>) -> bool {
        if self.state != FlowState::Submitting {
            debug!(state = ?self.state, "late submission result ignored");
            return false;
        }

        match result {
            Ok(receipt) => {
                info!(receipt_id = ?receipt.id, "form submitted");
                self.state = FlowState::Submitted;
                self.receipt = Some(receipt);
                self.track(AnalyticsEventType::FormSubmit, None);
            }
            Err(error) => {
                warn!(%error, "form submission failed");
                self.submit_error = Some(match error {
                    AppError::Validation(message) => message,
                    _ => DEFAULT_SUBMIT_ERROR.to_owned(),
                });
                self.state = FlowState::SubmitError;
            }
        }
        true
    }

    /// Validates, submits through the sink under the timeout, and applies the answer.
    pub async fn submit_form(&mut self, sink: &dyn SubmissionSink) -> FlowState {
        let Some(request) = self.prepare_submission() else {
            return self.state;
        };

        let timeout = self.submit_timeout;
        let result = tokio::time::timeout(timeout, sink.submit(request.payload, &request.context))
            .await
            .unwrap_or_else(|_| {
                Err(AppError::Internal(format!(
                    "submission timed out after {}s",
                    timeout.as_secs()
                )))
            });

        self.finish_submission(result);
        self.state
    }

    /// Commits a value and, when the field auto-advances on the current step,
    /// runs `next_step` after the feedback pause. Returns whether the step changed.
    pub async fn commit_field_with_auto_advance(
        &mut self,
        field_name: &str,
        value: Value,
    ) -> AppResult<bool> {
        self.set_field_value(field_name, value)?;

        let auto_advances = self
            .flow
            .field(field_name)
            .is_some_and(|(step, spec)| spec.auto_advance() && step == self.current_step);
        if !auto_advances || !self.accepts_input() {
            return Ok(false);
        }

        tokio::time::sleep(self.auto_advance_delay).await;
        Ok(self.next_step())
    }

    fn track(&mut self, event_type: AnalyticsEventType, step: Option<usize>) {
        if let Some(tracker) = &mut self.tracker {
            tracker.track(event_type, step, Map::new());
        }
    }
}

#[cfg(test)]
mod tests;
