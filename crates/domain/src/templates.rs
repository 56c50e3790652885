use serde::Serialize;
use serde_json::{Value, json};

use crate::{BlockConfig, FormFlow, FormStep, PageDocument, PageSection, PageType, StepLayout};

/// Starting content for a new page of one type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTemplate {
    /// Page type this template seeds.
    pub page_type: PageType,
    /// Catalog name.
    pub name: &'static str,
    /// Catalog description.
    pub description: &'static str,
    /// Prefix suggested for new slugs.
    pub default_slug_prefix: &'static str,
    /// Seeded sections and form flow.
    pub document: PageDocument,
}

/// Hands out `{type}-tpl-{n}` ids, unique within one template.
#[derive(Default)]
struct TemplateBlocks {
    counter: usize,
}

impl TemplateBlocks {
    fn block(&mut self, block_type: &str, props: Value) -> BlockConfig {
        self.counter += 1;
        BlockConfig::authored(
            format!("{block_type}-tpl-{}", self.counter).as_str(),
            block_type,
            props,
        )
    }

    fn headline(&mut self, text: &str) -> BlockConfig {
        self.block(
            "headline",
            json!({"text": text, "level": "h1", "align": "center"}),
        )
    }

    fn subheadline(&mut self, text: &str) -> BlockConfig {
        self.block("subheadline", json!({"text": text, "align": "center"}))
    }

    fn text_input(&mut self, label: &str, placeholder: &str, field_name: &str, required: bool) -> BlockConfig {
        self.block(
            "text-input",
            json!({"label": label, "placeholder": placeholder, "required": required, "fieldName": field_name}),
        )
    }

    fn email_input(&mut self, label: &str, placeholder: &str) -> BlockConfig {
        self.block(
            "email-input",
            json!({"label": label, "placeholder": placeholder, "required": true, "fieldName": "email"}),
        )
    }

    fn phone_input(&mut self, required: bool) -> BlockConfig {
        self.block(
            "phone-input",
            json!({"label": "Phone Number", "placeholder": "021 123 4567", "required": required, "fieldName": "phone"}),
        )
    }

    fn stats(&mut self, stats: &[(&str, &str)]) -> BlockConfig {
        let stats: Vec<Value> = stats
            .iter()
            .map(|(label, value)| json!({"label": label, "value": value}))
            .collect();
        self.block("stats-bar", json!({"stats": stats}))
    }

    fn trust_badges(&mut self, badges: &[(&str, &str)]) -> BlockConfig {
        let badges: Vec<Value> = badges
            .iter()
            .map(|(icon, text)| json!({"icon": icon, "text": text}))
            .collect();
        self.block("trust-badges", json!({"badges": badges}))
    }
}

fn radio_option(value: &str, label: &str, description: Option<&str>, icon: &str) -> Value {
    match description {
        Some(description) => {
            json!({"value": value, "label": label, "description": description, "icon": icon})
        }
        None => json!({"value": value, "label": label, "icon": icon}),
    }
}

/// Returns the starting template of a page type.
#[must_use]
pub fn page_template(page_type: PageType) -> PageTemplate {
    match page_type {
        PageType::Appraisal => appraisal_template(),
        PageType::LeadMagnet => lead_magnet_template(),
        PageType::Newsletter => newsletter_template(),
        PageType::Webinar => webinar_template(),
        PageType::Inquiry => inquiry_template(),
        PageType::Custom => custom_template(),
    }
}

/// Returns the template for a stored page type name, falling back to `custom`.
#[must_use]
pub fn page_template_for(page_type: &str) -> PageTemplate {
    page_type
        .parse::<PageType>()
        .map(page_template)
        .unwrap_or_else(|_| custom_template())
}

/// Returns every template in catalog order.
#[must_use]
pub fn all_page_templates() -> Vec<PageTemplate> {
    PageType::ALL.into_iter().map(page_template).collect()
}

fn appraisal_template() -> PageTemplate {
    let mut blocks = TemplateBlocks::default();
    let sections = vec![
        PageSection::authored(
            "hero",
            "Hero",
            vec![blocks.block(
                "hero-image",
                json!({"imageUrl": "", "overlayOpacity": 40, "height": "md"}),
            )],
        ),
        PageSection::authored(
            "social-proof",
            "Social Proof",
            vec![blocks.stats(&[
                ("Properties Appraised", "2,500+"),
                ("Years Experience", "15+"),
                ("Happy Clients", "98%"),
            ])],
        ),
        PageSection::authored(
            "trust",
            "Trust",
            vec![blocks.trust_badges(&[
                ("badge", "Free, no-obligation"),
                ("clock", "Delivered within 24 hours"),
                ("award", "Local suburb expert"),
            ])],
        ),
    ];

    let steps = vec![
        FormStep::authored(
            "address",
            "What's Your Home Worth in Today's Market?",
            vec![blocks.block(
                "address-finder",
                json!({
                    "label": "",
                    "placeholder": "Start typing your property address...",
                    "required": true,
                    "fieldName": "addressFull"
                }),
            )],
        )
        .with_description("Get a free, no-obligation property appraisal from a local expert."),
        FormStep::authored(
            "relationship",
            "What's your relationship to this property?",
            vec![blocks.block(
                "radio-cards",
                json!({
                    "fieldName": "relationship",
                    "columns": 2,
                    "required": true,
                    "autoAdvance": true,
                    "options": [
                        radio_option("owner", "Owner Occupier", Some("I live in this property"), "Home"),
                        radio_option("investor", "Investor Owner", Some("I own but don't live here"), "Building"),
                        radio_option("buyer", "Potential Buyer", Some("I'm looking to buy"), "Key"),
                        radio_option("tenant", "Tenant", Some("I'm renting this property"), "ClipboardList")
                    ]
                }),
            )],
        ),
        FormStep::authored(
            "timeline",
            "When are you thinking of selling?",
            vec![blocks.block(
                "radio-cards",
                json!({
                    "fieldName": "timeline",
                    "columns": 2,
                    "required": true,
                    "autoAdvance": true,
                    "options": [
                        radio_option("asap", "As soon as possible", Some("Ready to move now"), "Zap"),
                        radio_option("1-3months", "1-3 months", Some("Planning to list soon"), "Calendar"),
                        radio_option("3-6months", "3-6 months", Some("Getting prepared"), "CalendarDays"),
                        radio_option("justlooking", "Just curious", Some("No immediate plans"), "HelpCircle")
                    ]
                }),
            )],
        ),
        FormStep::authored(
            "contact",
            "Almost there! Where should we send your appraisal?",
            vec![
                blocks.text_input("First Name", "John", "firstName", true),
                blocks.text_input("Last Name", "Smith", "lastName", true),
                blocks.email_input("Email Address", "john@example.com"),
                blocks.phone_input(true),
                blocks.block(
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
        .with_layout(StepLayout::TwoColumn),
    ];

    PageTemplate {
        page_type: PageType::Appraisal,
        name: "Property Appraisal",
        description: "Multi-step property appraisal request form with address finder, relationship, timeline, and contact details.",
        default_slug_prefix: "appraisal",
        document: PageDocument::new(
            sections,
            FormFlow::new(steps)
                .with_submit_button_text("Get My Free Appraisal")
                .with_success(
                    "Thank You!",
                    "We'll be in touch within 24 hours with your property appraisal.",
                ),
        ),
    }
}

fn lead_magnet_template() -> PageTemplate {
    let mut blocks = TemplateBlocks::default();
    let sections = vec![
        PageSection::authored(
            "hero",
            "Hero",
            vec![
                blocks.headline("Free Guide: How to Maximize Your Property Value"),
                blocks.subheadline(
                    "Download our expert guide with 10 proven strategies to increase your home's value before selling.",
                ),
            ],
        ),
        PageSection::authored(
            "benefits",
            "Benefits",
            vec![blocks.block(
                "body-text",
                json!({
                    "content": "In this guide you'll learn:\n- The top renovations that add the most value\n- How to present your property for maximum appeal\n- Market timing strategies from local experts\n- Common mistakes sellers make (and how to avoid them)"
                }),
            )],
        ),
        PageSection::authored(
            "trust",
            "Trust",
            vec![blocks.trust_badges(&[
                ("lock", "Instant download"),
                ("shield", "No spam, ever"),
                ("star", "Expert advice"),
            ])],
        ),
    ];

    let steps = vec![
        FormStep::authored(
            "capture",
            "Get Your Free Guide",
            vec![
                blocks.text_input("First Name", "John", "firstName", true),
                blocks.email_input("Email Address", "john@example.com"),
                blocks.block(
                    "checkbox",
                    json!({
                        "label": "I'd like to receive property market updates and tips.",
                        "required": false,
                        "fieldName": "marketingConsent"
                    }),
                ),
            ],
        )
        .with_description("Enter your details below and we'll send it straight to your inbox.")
        .with_layout(StepLayout::Single),
    ];

    PageTemplate {
        page_type: PageType::LeadMagnet,
        name: "Lead Magnet / Download",
        description: "Offer a free guide, report, or resource in exchange for contact details.",
        default_slug_prefix: "download",
        document: PageDocument::new(
            sections,
            FormFlow::new(steps)
                .with_submit_button_text("Download Free Guide")
                .with_success(
                    "Check Your Inbox!",
                    "Your guide is on its way. Check your email for the download link.",
                ),
        ),
    }
}

fn newsletter_template() -> PageTemplate {
    let mut blocks = TemplateBlocks::default();
    let sections = vec![
        PageSection::authored(
            "hero",
            "Hero",
            vec![
                blocks.headline("Stay Ahead of the Property Market"),
                blocks.subheadline(
                    "Get weekly insights on property values, market trends, and expert tips delivered to your inbox.",
                ),
            ],
        ),
        PageSection::authored(
            "social-proof",
            "Social Proof",
            vec![blocks.stats(&[
                ("Subscribers", "5,000+"),
                ("Weekly Issues", "200+"),
                ("Open Rate", "45%"),
            ])],
        ),
    ];

    let steps = vec![FormStep::authored(
        "subscribe",
        "Subscribe to Our Newsletter",
        vec![
            blocks.text_input("First Name", "John", "firstName", false),
            blocks.email_input("Email Address", "john@example.com"),
        ],
    )];

    PageTemplate {
        page_type: PageType::Newsletter,
        name: "Newsletter Signup",
        description: "Simple email capture for newsletter or market update subscriptions.",
        default_slug_prefix: "subscribe",
        document: PageDocument::new(
            sections,
            FormFlow::new(steps)
                .with_submit_button_text("Subscribe Now")
                .with_success(
                    "You're Subscribed!",
                    "Welcome aboard. You'll receive your first update this week.",
                ),
        ),
    }
}

fn webinar_template() -> PageTemplate {
    let mut blocks = TemplateBlocks::default();
    let sections = vec![
        PageSection::authored(
            "hero",
            "Hero",
            vec![
                blocks.headline("Free Webinar: Property Market Outlook"),
                blocks.subheadline(
                    "Join our expert panel to learn what's ahead for the NZ property market and how to position yourself for success.",
                ),
            ],
        ),
        PageSection::authored(
            "details",
            "Event Details",
            vec![blocks.block(
                "body-text",
                json!({
                    "content": "**When:** Thursday at 7:00 PM NZST\n**Duration:** 45 minutes + Q&A\n**Where:** Online (link sent after registration)\n**Cost:** Free"
                }),
            )],
        ),
        PageSection::authored(
            "speakers",
            "Speakers",
            vec![blocks.block(
                "agent-card",
                json!({
                    "name": "Your Agent Name",
                    "title": "Senior Property Consultant",
                    "experience": "15+ years of experience in the local property market."
                }),
            )],
        ),
    ];

    let steps = vec![
        FormStep::authored(
            "register",
            "Reserve Your Spot",
            vec![
                blocks.text_input("First Name", "John", "firstName", true),
                blocks.text_input("Last Name", "Smith", "lastName", true),
                blocks.email_input("Email Address", "john@example.com"),
                blocks.phone_input(false),
            ],
        )
        .with_description("Limited places available. Register now to secure yours.")
        .with_layout(StepLayout::TwoColumn),
    ];

    PageTemplate {
        page_type: PageType::Webinar,
        name: "Webinar / Event Registration",
        description: "Registration page for webinars, open homes, seminars, or community events.",
        default_slug_prefix: "register",
        document: PageDocument::new(
            sections,
            FormFlow::new(steps)
                .with_submit_button_text("Register Now")
                .with_success(
                    "You're Registered!",
                    "Check your email for the webinar link and calendar invite.",
                ),
        ),
    }
}

fn inquiry_template() -> PageTemplate {
    let mut blocks = TemplateBlocks::default();
    let sections = vec![
        PageSection::authored(
            "hero",
            "Hero",
            vec![
                blocks.headline("Professional Property Management You Can Trust"),
                blocks.subheadline(
                    "Let us handle the hard work while you enjoy reliable rental income and peace of mind.",
                ),
            ],
        ),
        PageSection::authored(
            "benefits",
            "Benefits",
            vec![blocks.stats(&[
                ("Properties Managed", "500+"),
                ("Average Occupancy", "98%"),
                ("Client Retention", "95%"),
            ])],
        ),
    ];

    let steps = vec![
        FormStep::authored(
            "property",
            "Tell Us About Your Property",
            vec![
                blocks.block(
                    "address-finder",
                    json!({
                        "label": "Property Address",
                        "placeholder": "Start typing your property address...",
                        "required": true,
                        "fieldName": "addressFull"
                    }),
                ),
                blocks.block(
                    "radio-cards",
                    json!({
                        "fieldName": "propertyType",
                        "columns": 2,
                        "required": true,
                        "autoAdvance": true,
                        "options": [
                            radio_option("house", "House", None, "Home"),
                            radio_option("apartment", "Apartment", None, "Building"),
                            radio_option("townhouse", "Townhouse", None, "Building2"),
                            radio_option("other", "Other", None, "MoreHorizontal")
                        ]
                    }),
                ),
            ],
        ),
        FormStep::authored(
            "contact",
            "How Can We Reach You?",
            vec![
                blocks.text_input("First Name", "John", "firstName", true),
                blocks.text_input("Last Name", "Smith", "lastName", true),
                blocks.email_input("Email Address", "john@example.com"),
                blocks.phone_input(true),
            ],
        )
        .with_layout(StepLayout::TwoColumn),
    ];

    PageTemplate {
        page_type: PageType::Inquiry,
        name: "Property Management Inquiry",
        description: "Capture property management inquiries from landlords and investors.",
        default_slug_prefix: "pm-inquiry",
        document: PageDocument::new(
            sections,
            FormFlow::new(steps)
                .with_submit_button_text("Get a Free Consultation")
                .with_success(
                    "Thank You!",
                    "One of our property managers will be in touch within 24 hours.",
                ),
        ),
    }
}

fn custom_template() -> PageTemplate {
    let mut blocks = TemplateBlocks::default();
    let sections = vec![PageSection::authored(
        "hero",
        "Hero",
        vec![
            blocks.headline("Your Headline Here"),
            blocks.subheadline("Add a compelling subheadline that explains your offer."),
        ],
    )];

    let steps = vec![FormStep::authored(
        "contact",
        "Get in Touch",
        vec![
            blocks.text_input("Name", "Your name", "firstName", true),
            blocks.email_input("Email", "you@example.com"),
        ],
    )];

    PageTemplate {
        page_type: PageType::Custom,
        name: "Custom Form",
        description: "Start with a blank canvas and build your own landing page and form flow.",
        default_slug_prefix: "page",
        document: PageDocument::new(
            sections,
            FormFlow::new(steps)
                .with_submit_button_text("Submit")
                .with_success(
                    "Thank You!",
                    "We've received your submission and will be in touch soon.",
                ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{all_page_templates, page_template, page_template_for};
    use crate::{BlockConfig, PageType};

    fn collect_ids<'a>(blocks: &'a [BlockConfig], ids: &mut Vec<&'a str>) {
        for block in blocks {
            ids.push(block.id());
            collect_ids(block.children(), ids);
        }
    }

    #[test]
    fn every_page_type_has_a_template() {
        let templates = all_page_templates();
        assert_eq!(templates.len(), PageType::ALL.len());
        for template in &templates {
            assert!(template.document.uses_dynamic_flow());
        }
    }

    #[test]
    fn template_block_ids_are_unique_within_a_document() {
        for template in all_page_templates() {
            let mut ids = Vec::new();
            for section in template.document.sections() {
                collect_ids(section.blocks(), &mut ids);
            }
            for step in template.document.form_flow().steps() {
                collect_ids(step.blocks(), &mut ids);
            }

            let unique: HashSet<&str> = ids.iter().copied().collect();
            assert_eq!(unique.len(), ids.len(), "{}", template.name);
        }
    }

    #[test]
    fn unknown_page_type_falls_back_to_custom() {
        assert_eq!(page_template_for("open_home").page_type, PageType::Custom);
        assert_eq!(page_template_for("webinar").page_type, PageType::Webinar);
    }

    #[test]
    fn appraisal_template_uses_four_steps() {
        let template = page_template(PageType::Appraisal);
        assert_eq!(template.document.form_flow().total_steps(), 4);
        assert_eq!(
            template.document.form_flow().submit_button_text(),
            "Get My Free Appraisal"
        );
    }
}
