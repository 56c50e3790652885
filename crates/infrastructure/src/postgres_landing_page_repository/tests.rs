use pagecraft_application::{
    AnalyticsRepository, BlockTemplateRepository, LandingPageRepository, LeadListQuery,
    LeadRepository, PageListQuery, SuburbRepository,
};
use pagecraft_core::AppError;
use pagecraft_domain::{
    AnalyticsEvent, AnalyticsEventType, BlockConfig, BlockTemplate, FieldValueMap, LandingPage,
    Lead, LeadStatus, PageSlug, PageStatus, PageType, Suburb, SuburbChanges, SuburbDetails,
    TrackingParams, page_template,
};
use serde_json::{Map, json};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresLandingPageRepository;
use crate::{
    PostgresAnalyticsRepository, PostgresBlockTemplateRepository, PostgresLeadRepository,
    PostgresSuburbRepository,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for landing page tests: {error}");
    }

    Some(pool)
}

fn unique_page(prefix: &str, page_type: PageType) -> LandingPage {
    let slug = format!("{prefix}-{}", uuid::Uuid::new_v4().simple());
    LandingPage::new(
        PageSlug::new(slug).unwrap_or_else(|_| unreachable!()),
        "Postgres page",
        page_type,
        page_template(page_type).document,
    )
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn pages_round_trip_with_counters_and_slug_conflicts() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresLandingPageRepository::new(pool);

    let mut page = unique_page("pg", PageType::Appraisal);
    assert!(repository.save_page(page.clone()).await.is_ok());
    assert!(page.publish().is_ok());
    assert!(repository.save_page(page.clone()).await.is_ok());
    assert!(repository.increment_views(page.id()).await.is_ok());
    assert!(repository.increment_submissions(page.id()).await.is_ok());

    let stored = repository
        .find_page_by_slug(page.slug().as_str())
        .await
        .unwrap_or_default();
    assert!(stored.as_ref().is_some_and(|stored| stored.status() == PageStatus::Published
        && stored.views() == 1
        && stored.submissions() == 1
        && stored.document() == page.document()));

    let published = repository
        .list_pages(PageListQuery {
            status: Some(PageStatus::Published),
        })
        .await
        .unwrap_or_default();
    assert!(published.iter().any(|listed| listed.id() == page.id()));

    let clash = LandingPage::new(
        page.slug().clone(),
        "Clash",
        PageType::Custom,
        page_template(PageType::Custom).document,
    )
    .unwrap_or_else(|_| unreachable!());
    assert!(matches!(
        repository.save_page(clash).await,
        Err(AppError::Conflict(_))
    ));

    assert_eq!(repository.delete_page(page.id()).await.ok(), Some(true));
    assert_eq!(repository.delete_page(page.id()).await.ok(), Some(false));
}

#[tokio::test]
async fn leads_and_events_are_listed_newest_first() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let pages = PostgresLandingPageRepository::new(pool.clone());
    let leads = PostgresLeadRepository::new(pool.clone());
    let events = PostgresAnalyticsRepository::new(pool);

    let page = unique_page("pg-leads", PageType::Custom);
    assert!(pages.save_page(page.clone()).await.is_ok());

    let mut form = FieldValueMap::new();
    form.insert("email".to_owned(), json!("Lead@Example.co.nz"));
    let first = Lead::capture(page.id(), page.page_type(), form.clone(), TrackingParams::default());
    let mut second = Lead::capture(page.id(), page.page_type(), form, TrackingParams::default());
    assert!(leads.save_lead(first.clone()).await.is_ok());
    assert!(leads.save_lead(second.clone()).await.is_ok());
    assert!(second.update_status(LeadStatus::Contacted, None).is_ok());
    assert!(leads.save_lead(second.clone()).await.is_ok());

    let listed = leads
        .list_leads(LeadListQuery {
            landing_page_id: Some(page.id()),
            ..LeadListQuery::default()
        })
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id(), second.id());
    assert_eq!(listed[0].status(), LeadStatus::Contacted);
    assert_eq!(
        listed[1].contact().email.as_deref(),
        Some("lead@example.co.nz")
    );

    for step in [1, 2] {
        let event = AnalyticsEvent::new(
            Some(page.id()),
            Some("session-1".to_owned()),
            AnalyticsEventType::StepComplete,
            Map::new(),
            Some(step),
        )
        .unwrap_or_else(|_| unreachable!());
        assert!(events.append_event(event).await.is_ok());
    }

    let steps = events
        .list_events(page.id(), Some(AnalyticsEventType::StepComplete))
        .await
        .unwrap_or_default();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].step_number(), Some(2));
}

#[tokio::test]
async fn block_templates_round_trip_and_filter_by_category() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresBlockTemplateRepository::new(pool);

    let category = format!("pg-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
    let config = BlockConfig::new("gap-1", "spacer", Map::new()).unwrap_or_else(|_| unreachable!());
    let template = BlockTemplate::new("Tall gap", category.as_str(), config, false)
        .unwrap_or_else(|_| unreachable!());
    assert!(repository.save_block_template(template.clone()).await.is_ok());

    let found = repository.find_block_template(template.id()).await;
    assert!(matches!(found, Ok(Some(ref stored)) if stored.default_config().id() == "gap-1"));

    let listed = repository
        .list_block_templates(Some(category.as_str()))
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].block_type(), "spacer");
}

#[tokio::test]
async fn suburbs_round_trip_with_case_insensitive_names() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresSuburbRepository::new(pool);

    let name = format!("Suburb {}", uuid::Uuid::new_v4().simple());
    let mut details = SuburbDetails::named(name.as_str());
    details.median_price = Some(1_250_000);
    let mut suburb = Suburb::new(details).unwrap_or_else(|_| unreachable!());
    assert!(repository.save_suburb(suburb.clone()).await.is_ok());

    let clash = Suburb::new(SuburbDetails::named(name.to_uppercase()))
        .unwrap_or_else(|_| unreachable!());
    assert!(matches!(
        repository.save_suburb(clash).await,
        Err(AppError::Conflict(_))
    ));

    let applied = suburb.apply(SuburbChanges {
        average_days_on_market: Some(31),
        ..SuburbChanges::default()
    });
    assert!(applied.is_ok());
    assert!(repository.save_suburb(suburb.clone()).await.is_ok());

    let found = repository
        .find_suburb_by_name(&name.to_lowercase())
        .await
        .unwrap_or_default();
    assert!(found.is_some_and(|stored| stored.id() == suburb.id()
        && stored.median_price() == Some(1_250_000)
        && stored.average_days_on_market() == Some(31)));
}
