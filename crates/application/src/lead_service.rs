use std::sync::Arc;

use async_trait::async_trait;
use pagecraft_core::{AppError, AppResult, LandingPageId, LeadId};
use pagecraft_domain::{
    FieldErrors, FieldValueMap, LandingPage, Lead, LeadStatus, TrackingParams, validate_fields,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::BlockRegistry;
use crate::document_inspection::{CompiledFlow, inspect_document, issues_error};
use crate::page_ports::{
    EmailService, LandingPageRepository, LeadListQuery, LeadRepository, LeadWebhookDispatcher,
    LeadWebhookEvent, SubmissionContext, SubmissionReceipt, SubmissionSink,
};

/// Application service for capturing and managing leads.
#[derive(Clone)]
pub struct LeadService {
    pages: Arc<dyn LandingPageRepository>,
    leads: Arc<dyn LeadRepository>,
    registry: Arc<BlockRegistry>,
    webhook_dispatcher: Option<Arc<dyn LeadWebhookDispatcher>>,
    email_service: Option<Arc<dyn EmailService>>,
}

impl LeadService {
    /// Creates a lead service.
    #[must_use]
    pub fn new(
        pages: Arc<dyn LandingPageRepository>,
        leads: Arc<dyn LeadRepository>,
        registry: Arc<BlockRegistry>,
    ) -> Self {
        Self {
            pages,
            leads,
            registry,
            webhook_dispatcher: None,
            email_service: None,
        }
    }

    /// Posts new leads to the page's configured webhook.
    #[must_use]
    pub fn with_webhook_dispatcher(mut self, dispatcher: Arc<dyn LeadWebhookDispatcher>) -> Self {
        self.webhook_dispatcher = Some(dispatcher);
        self
    }

    /// Emails new leads to the page's configured recipient.
    #[must_use]
    pub fn with_email_service(mut self, email_service: Arc<dyn EmailService>) -> Self {
        self.email_service = Some(email_service);
        self
    }

    /// Validates submitted values against every field of a page's flow.
    pub fn validate_submission(
        &self,
        page: &LandingPage,
        form_data: &FieldValueMap,
    ) -> AppResult<FieldErrors> {
        let flow = self.compile(page)?;
        Ok(validate_fields(flow.all_fields(), form_data))
    }

    fn compile(&self, page: &LandingPage) -> AppResult<CompiledFlow> {
        inspect_document(&self.registry, page.document())
            .map(|index| index.into_flow())
            .map_err(|issues| issues_error(&issues))
    }

    /// Captures a submission for a published page.
    ///
    /// Values are validated server-side and only declared fields are kept.
    /// Notifications run in the background once the lead is stored; their
    /// failures are logged and never reach the caller.
    pub async fn submit_lead(
        &self,
        page_id: LandingPageId,
        form_data: FieldValueMap,
        tracking: TrackingParams,
    ) -> AppResult<Lead> {
        let page = self
            .pages
            .find_page(page_id)
            .await?
            .filter(LandingPage::is_published)
            .ok_or_else(|| AppError::NotFound(format!("landing page '{page_id}'")))?;

        let flow = self.compile(&page)?;
        let errors = validate_fields(flow.all_fields(), &form_data);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.summary()));
        }

        let form_data: FieldValueMap = form_data
            .into_iter()
            .filter(|(field_name, _)| flow.field(field_name).is_some())
            .collect();
        let lead = Lead::capture(page.id(), page.page_type(), form_data, tracking);
        self.leads.save_lead(lead.clone()).await?;
        info!(
            lead_id = %lead.id(),
            page_id = %page.id(),
            slug = page.slug().as_str(),
            "lead captured"
        );

        if let Err(error) = self.pages.increment_submissions(page.id()).await {
            warn!(page_id = %page.id(), %error, "failed to count submission");
        }
        self.spawn_notifications(&page, &flow, &lead);

        Ok(lead)
    }

    /// Queues webhook and email delivery on a background task.
    fn spawn_notifications(&self, page: &LandingPage, flow: &CompiledFlow, lead: &Lead) {
        let Some(action) = flow.flow().submit_action() else {
            return;
        };

        let webhook = action
            .webhook_url()
            .zip(self.webhook_dispatcher.clone())
            .map(|(endpoint, dispatcher)| {
                let event = LeadWebhookEvent::lead_created(lead, page.slug().as_str());
                (endpoint.to_owned(), dispatcher, event)
            });
        let email = action
            .email_to()
            .zip(self.email_service.clone())
            .map(|(recipient, email_service)| {
                let subject = format!("New lead from {}", page.name());
                (recipient.to_owned(), email_service, subject, lead_email_body(page, lead))
            });
        if webhook.is_none() && email.is_none() {
            return;
        }

        let lead_id = lead.id();
        let delivery = async move {
            if let Some((endpoint, dispatcher, event)) = webhook
                && let Err(error) = dispatcher.dispatch_lead(&endpoint, &event).await
            {
                warn!(lead_id = %lead_id, %error, "lead webhook failed");
            }

            if let Some((recipient, email_service, subject, body)) = email
                && let Err(error) = email_service
                    .send_email(&recipient, &subject, &body, None)
                    .await
            {
                warn!(lead_id = %lead_id, %error, "lead email failed");
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(delivery);
            }
            Err(_) => warn!(lead_id = %lead_id, "no async runtime, lead notifications dropped"),
        }
    }

    /// Lists leads.
    pub async fn list_leads(&self, query: LeadListQuery) -> AppResult<Vec<Lead>> {
        self.leads.list_leads(query).await
    }

    /// Returns one lead.
    pub async fn get_lead(&self, lead_id: LeadId) -> AppResult<Lead> {
        self.leads
            .find_lead(lead_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("lead '{lead_id}'")))
    }

    /// Moves a lead through the pipeline.
    pub async fn update_lead_status(
        &self,
        lead_id: LeadId,
        status: LeadStatus,
        notes: Option<String>,
    ) -> AppResult<Lead> {
        let mut lead = self.get_lead(lead_id).await?;
        lead.update_status(status, notes)?;
        self.leads.save_lead(lead.clone()).await?;
        Ok(lead)
    }
}

fn lead_email_body(page: &LandingPage, lead: &Lead) -> String {
    let mut lines = vec![
        format!("A new lead was captured on '{}'.", page.name()),
        String::new(),
    ];
    if let Some(name) = lead.contact().display_name() {
        lines.push(format!("Name: {name}"));
    }
    for (field_name, value) in lead.form_data() {
        let value = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        lines.push(format!("{field_name}: {value}"));
    }
    lines.push(String::new());
    lines.push(format!("Lead id: {}", lead.id()));
    lines.join("\n")
}

/// Submission sink storing leads in-process.
#[derive(Clone)]
pub struct LocalSubmissionSink {
    service: LeadService,
}

impl LocalSubmissionSink {
    /// Creates a sink over the lead service.
    #[must_use]
    pub fn new(service: LeadService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SubmissionSink for LocalSubmissionSink {
    async fn submit(
        &self,
        payload: FieldValueMap,
        context: &SubmissionContext,
    ) -> AppResult<SubmissionReceipt> {
        let page_id = context.source_page_id.ok_or_else(|| {
            AppError::Validation("submission is missing its source page".to_owned())
        })?;

        let lead = self
            .service
            .submit_lead(page_id, payload, context.tracking.clone())
            .await?;
        Ok(SubmissionReceipt {
            id: Some(lead.id().to_string()),
        })
    }
}
