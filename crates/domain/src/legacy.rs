use serde_json::{Value, json};

use crate::{BlockConfig, FormFlow, FormStep, StepLayout};

/// Number of steps in the fixed appraisal flow.
pub const LEGACY_APPRAISAL_STEP_COUNT: usize = 4;

fn choice_option(value: &str, label: &str, description: &str, icon: &str) -> Value {
    json!({"value": value, "label": label, "description": description, "icon": icon})
}

/// Returns the fixed address → relationship → timeline → contact flow used by
/// pages authored before configurable form steps existed.
#[must_use]
pub fn legacy_appraisal_flow() -> FormFlow {
    let address = FormStep::authored(
        "address",
        "What's Your Home Worth in Today's Market?",
        vec![BlockConfig::authored(
            "legacy-address",
            "address-finder",
            json!({
                "label": "Property Address",
                "placeholder": "Start typing your property address...",
                "required": true,
                "fieldName": "addressFull",
                "errorMessage": "Please select an address"
            }),
        )],
    )
    .with_description("Get a free, no-obligation property appraisal from a local expert.");

    let relationship = FormStep::authored(
        "relationship",
        "What's your relationship to this property?",
        vec![BlockConfig::authored(
            "legacy-relationship",
            "radio-cards",
            json!({
                "fieldName": "relationship",
                "columns": 2,
                "required": false,
                "autoAdvance": true,
                "options": [
                    choice_option("owner", "Owner Occupier", "I live in this property", "Home"),
                    choice_option("investor", "Investor Owner", "I own but don't live here", "Building"),
                    choice_option("buyer", "Potential Buyer", "I'm looking to buy", "Key"),
                    choice_option("tenant", "Tenant", "I'm renting this property", "ClipboardList"),
                    choice_option("other", "Other", "Something else", "HelpCircle")
                ]
            }),
        )],
    );

    let timeline = FormStep::authored(
        "timeline",
        "When are you thinking of selling?",
        vec![BlockConfig::authored(
            "legacy-timeline",
            "radio-cards",
            json!({
                "fieldName": "timeline",
                "columns": 2,
                "required": false,
                "autoAdvance": true,
                "options": [
                    choice_option("asap", "As soon as possible", "Ready to move now", "Zap"),
                    choice_option("1-3months", "1-3 months", "Planning to list soon", "Calendar"),
                    choice_option("3-6months", "3-6 months", "Getting prepared", "CalendarDays"),
                    choice_option("6-12months", "6-12 months", "Thinking ahead", "CalendarRange"),
                    choice_option("justlooking", "Just curious", "No immediate plans", "HelpCircle")
                ]
            }),
        )],
    );

    let contact = FormStep::authored(
        "contact",
        "Almost there! Where should we send your appraisal?",
        vec![
            BlockConfig::authored(
                "legacy-first-name",
                "text-input",
                json!({"label": "First Name", "placeholder": "John", "required": true, "fieldName": "firstName"}),
            ),
            BlockConfig::authored(
                "legacy-last-name",
                "text-input",
                json!({"label": "Last Name", "placeholder": "Smith", "required": true, "fieldName": "lastName"}),
            ),
            BlockConfig::authored(
                "legacy-email",
                "email-input",
                json!({"label": "Email Address", "placeholder": "john@example.com", "required": true, "fieldName": "email"}),
            ),
            BlockConfig::authored(
                "legacy-phone",
                "phone-input",
                json!({"label": "Phone Number", "placeholder": "021 123 4567", "required": true, "fieldName": "phone"}),
            ),
            BlockConfig::authored(
                "legacy-consent",
                "checkbox",
                json!({
                    "label": "I agree to the privacy policy and consent to being contacted about my property appraisal.",
                    "required": true,
                    "fieldName": "consent",
                    "linkText": "privacy policy",
                    "linkUrl": "/privacy"
                }),
            ),
        ],
    )
    .with_layout(StepLayout::TwoColumn);

    FormFlow::new(vec![address, relationship, timeline, contact])
        .with_submit_button_text("Get My Free Appraisal")
        .with_success(
            "Thank You!",
            "We'll be in touch within 24 hours with your property appraisal.",
        )
}
