//! Block registry, rendering, form flow, and page services.

#![forbid(unsafe_code)]

mod analytics_service;
mod block_registry;
mod block_template_service;
mod blocks;
mod document_editor;
mod document_inspection;
mod form_flow_engine;
mod landing_page_service;
mod lead_service;
mod page_ports;
mod renderer;
mod suburb_service;

#[cfg(test)]
mod test_fakes;

pub use analytics_service::{AnalyticsService, AnalyticsSummary, AnalyticsTracker, TrackEventInput};
pub use block_registry::{
    Block, BlockCategory, BlockMetadata, BlockRegistry, PropOption, PropSchema, PropType,
    SlotStorage,
};
pub use block_template_service::{BlockTemplateService, CreateBlockTemplateInput};
pub use blocks::{
    AddressFinderProps, AgentCardProps, BodyTextProps, CardProps, CheckboxProps, ColumnConfig,
    ColumnsProps, ContainerProps, CtaAction, CtaButtonProps, EmailInputProps, HeadingLevel,
    HeadlineProps, HeroImageProps, PhoneInputProps, ProgressBarProps, RadioCardsProps,
    RadioOption, SpacerProps, StatItem, StatsBarProps, SubheadlineProps, TestimonialCardProps,
    TextAlign, TextInputProps, TrustBadge, TrustBadgesProps,
};
pub use document_editor::{BlockLocation, DocumentEditor, EditorCommand};
pub use document_inspection::{
    CompiledFlow, ConfigurationIssue, DocumentIndex, IssueKind, inspect_document, issues_error,
};
pub use form_flow_engine::{
    AUTO_ADVANCE_DELAY, DEFAULT_SUBMIT_ERROR, FlowState, FormFlowEngine, SUBMIT_TIMEOUT,
    SubmissionRequest,
};
pub use landing_page_service::{
    CreatePageInput, DocumentEdit, LandingPageService, UpdatePageInput,
};
pub use lead_service::{LeadService, LocalSubmissionSink};
pub use page_ports::{
    AnalyticsRepository, AnalyticsSink, BlockTemplateRepository, EmailService,
    LandingPageRepository, LeadListQuery, LeadRepository, LeadWebhookDispatcher, LeadWebhookEvent,
    PageListQuery, SubmissionContext, SubmissionReceipt, SubmissionSink, SuburbRepository,
};
pub use renderer::{
    AnimationFrame, AnimationView, BlockBody, BlockContent, BlockRenderer, BlockSlot,
    EditorHandle, FieldBinding, FlowView, FormContext, MAX_BLOCK_DEPTH, PageView, Placeholder,
    RenderContext, RenderMode, RenderOptions, RenderedBlock, SectionStyle, SectionView, StepView,
    section_style, visibility_class,
};
pub use suburb_service::SuburbService;
