//! Page document model, field rules, and lead-capture entities.

#![forbid(unsafe_code)]

mod analytics;
mod block;
mod block_template;
mod field;
mod form_flow;
mod landing_page;
mod lead;
mod legacy;
mod page;
mod suburb;
mod templates;

pub use analytics::{AnalyticsEvent, AnalyticsEventType, MAX_TRACKED_STEP, SESSION_ID_MAX_LENGTH};
pub use block::{
    BlockAnimation, BlockConfig, BlockProps, BlockVisibility, EntranceAnimation, generate_block_id,
};
pub use block_template::{
    BLOCK_TEMPLATE_CATEGORY_MAX_LENGTH, BLOCK_TEMPLATE_NAME_MAX_LENGTH, BlockTemplate,
};
pub use field::{
    FieldError, FieldErrors, FieldRule, FieldSpec, FieldValueMap, format_nz_phone, is_valid_email,
    is_valid_nz_phone, validate_field, validate_fields,
};
pub use form_flow::{
    DEFAULT_SUBMIT_BUTTON_TEXT, DEFAULT_SUCCESS_MESSAGE, DEFAULT_SUCCESS_TITLE, FormFlow, FormStep,
    StepLayout, SubmitAction,
};
pub use landing_page::{
    LandingPage, PAGE_NAME_MAX_LENGTH, PageSeo, PageSlug, PageStatus, PageType, SLUG_MAX_LENGTH,
};
pub use lead::{Lead, LeadContact, LeadStatus, TrackingParams};
pub use legacy::{LEGACY_APPRAISAL_STEP_COUNT, legacy_appraisal_flow};
pub use page::{
    BackgroundKind, DEFAULT_SECTION_PADDING, PageDocument, PageSection, SectionBackground,
    SectionPadding,
};
pub use suburb::{SUBURB_NAME_MAX_LENGTH, Suburb, SuburbChanges, SuburbDetails};
pub use templates::{PageTemplate, all_page_templates, page_template, page_template_for};
