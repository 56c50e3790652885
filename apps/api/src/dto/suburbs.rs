use pagecraft_domain::{Suburb, SuburbChanges, SuburbDetails};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for suburb creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-suburb-request.ts"
)]
pub struct CreateSuburbRequest {
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub homes_sold_last_year: Option<u32>,
    pub median_price: Option<u32>,
    pub average_days_on_market: Option<u32>,
    pub custom_text: Option<String>,
    pub is_active: Option<bool>,
}

impl From<CreateSuburbRequest> for SuburbDetails {
    fn from(value: CreateSuburbRequest) -> Self {
        Self {
            name: value.name,
            region: value.region,
            city: value.city,
            homes_sold_last_year: value.homes_sold_last_year.unwrap_or_default(),
            median_price: value.median_price,
            average_days_on_market: value.average_days_on_market,
            custom_text: value.custom_text,
            is_active: value.is_active.unwrap_or(true),
        }
    }
}

/// Incoming payload for partial suburb updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-suburb-request.ts"
)]
pub struct UpdateSuburbRequest {
    pub name: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub homes_sold_last_year: Option<u32>,
    pub median_price: Option<u32>,
    pub average_days_on_market: Option<u32>,
    pub custom_text: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateSuburbRequest> for SuburbChanges {
    fn from(value: UpdateSuburbRequest) -> Self {
        Self {
            name: value.name,
            region: value.region,
            city: value.city,
            homes_sold_last_year: value.homes_sold_last_year,
            median_price: value.median_price,
            average_days_on_market: value.average_days_on_market,
            custom_text: value.custom_text,
            is_active: value.is_active,
        }
    }
}

/// API representation of a suburb.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/suburb-response.ts"
)]
pub struct SuburbResponse {
    pub id: String,
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub homes_sold_last_year: u32,
    pub median_price: Option<u32>,
    pub average_days_on_market: Option<u32>,
    pub custom_text: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Suburb> for SuburbResponse {
    fn from(suburb: Suburb) -> Self {
        Self {
            id: suburb.id().to_string(),
            name: suburb.name().to_owned(),
            region: suburb.region().map(ToOwned::to_owned),
            city: suburb.city().map(ToOwned::to_owned),
            homes_sold_last_year: suburb.homes_sold_last_year(),
            median_price: suburb.median_price(),
            average_days_on_market: suburb.average_days_on_market(),
            custom_text: suburb.custom_text().map(ToOwned::to_owned),
            is_active: suburb.is_active(),
            created_at: suburb.created_at().to_rfc3339(),
            updated_at: suburb.updated_at().to_rfc3339(),
        }
    }
}
