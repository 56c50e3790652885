use chrono::{DateTime, Utc};
use pagecraft_core::{AppError, AppResult, NonEmptyString, SuburbId};
use serde::{Deserialize, Serialize};

/// Maximum suburb, region, and city name length.
pub const SUBURB_NAME_MAX_LENGTH: usize = 64;

/// Editable fields of a suburb record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuburbDetails {
    /// Suburb name, unique ignoring case.
    pub name: String,
    /// Region, e.g. `Auckland`.
    pub region: Option<String>,
    /// City or district.
    pub city: Option<String>,
    /// Sales over the last twelve months.
    pub homes_sold_last_year: u32,
    /// Median sale price in whole dollars.
    pub median_price: Option<u32>,
    /// Average days a listing stays on market.
    pub average_days_on_market: Option<u32>,
    /// Free text shown alongside the numbers.
    pub custom_text: Option<String>,
    /// Whether public pages may show the record.
    pub is_active: bool,
}

impl SuburbDetails {
    /// Creates active details with zeroed statistics.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            city: None,
            homes_sold_last_year: 0,
            median_price: None,
            average_days_on_market: None,
            custom_text: None,
            is_active: true,
        }
    }
}

/// Partial update; absent fields are kept and blank text clears a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuburbChanges {
    /// New name.
    pub name: Option<String>,
    /// New region.
    pub region: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New sales count.
    pub homes_sold_last_year: Option<u32>,
    /// New median price.
    pub median_price: Option<u32>,
    /// New days on market.
    pub average_days_on_market: Option<u32>,
    /// New custom text.
    pub custom_text: Option<String>,
    /// New visibility.
    pub is_active: Option<bool>,
}

/// Market statistics for one suburb, shown on suburb-targeted pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suburb {
    id: SuburbId,
    name: NonEmptyString,
    region: Option<String>,
    city: Option<String>,
    homes_sold_last_year: u32,
    median_price: Option<u32>,
    average_days_on_market: Option<u32>,
    custom_text: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Suburb {
    /// Creates a new suburb record.
    pub fn new(details: SuburbDetails) -> AppResult<Self> {
        let now = Utc::now();
        Self::from_details(SuburbId::new(), details, now, now)
    }

    /// Restores a suburb from storage.
    pub fn restore(
        id: SuburbId,
        details: SuburbDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Self::from_details(id, details, created_at, updated_at)
    }

    fn from_details(
        id: SuburbId,
        details: SuburbDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: validate_place("suburb name", details.name)?,
            region: optional_place("region", details.region)?,
            city: optional_place("city", details.city)?,
            homes_sold_last_year: details.homes_sold_last_year,
            median_price: details.median_price,
            average_days_on_market: details.average_days_on_market,
            custom_text: details.custom_text.filter(|text| !text.trim().is_empty()),
            is_active: details.is_active,
            created_at,
            updated_at,
        })
    }

    /// Applies a partial update; the record is unchanged when validation fails.
    pub fn apply(&mut self, changes: SuburbChanges) -> AppResult<()> {
        let mut details = self.details();
        if let Some(name) = changes.name {
            details.name = name;
        }
        if let Some(region) = changes.region {
            details.region = Some(region);
        }
        if let Some(city) = changes.city {
            details.city = Some(city);
        }
        if let Some(count) = changes.homes_sold_last_year {
            details.homes_sold_last_year = count;
        }
        if let Some(price) = changes.median_price {
            details.median_price = Some(price);
        }
        if let Some(days) = changes.average_days_on_market {
            details.average_days_on_market = Some(days);
        }
        if let Some(text) = changes.custom_text {
            details.custom_text = Some(text);
        }
        if let Some(is_active) = changes.is_active {
            details.is_active = is_active;
        }

        *self = Self::from_details(self.id, details, self.created_at, Utc::now())?;
        Ok(())
    }

    /// Returns the editable fields.
    #[must_use]
    pub fn details(&self) -> SuburbDetails {
        SuburbDetails {
            name: self.name.as_str().to_owned(),
            region: self.region.clone(),
            city: self.city.clone(),
            homes_sold_last_year: self.homes_sold_last_year,
            median_price: self.median_price,
            average_days_on_market: self.average_days_on_market,
            custom_text: self.custom_text.clone(),
            is_active: self.is_active,
        }
    }

    /// Returns suburb id.
    #[must_use]
    pub fn id(&self) -> SuburbId {
        self.id
    }

    /// Returns suburb name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns whether `name` refers to this suburb, ignoring case and padding.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.as_str().eq_ignore_ascii_case(name.trim())
    }

    /// Returns region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Returns city.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Returns sales over the last twelve months.
    #[must_use]
    pub fn homes_sold_last_year(&self) -> u32 {
        self.homes_sold_last_year
    }

    /// Returns median price.
    #[must_use]
    pub fn median_price(&self) -> Option<u32> {
        self.median_price
    }

    /// Returns average days on market.
    #[must_use]
    pub fn average_days_on_market(&self) -> Option<u32> {
        self.average_days_on_market
    }

    /// Returns custom text.
    #[must_use]
    pub fn custom_text(&self) -> Option<&str> {
        self.custom_text.as_deref()
    }

    /// Returns whether public pages may show the record.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_place(label: &str, value: String) -> AppResult<NonEmptyString> {
    let value = NonEmptyString::new(value.trim())
        .map_err(|_| AppError::Validation(format!("{label} must not be empty")))?;
    if value.as_str().chars().count() > SUBURB_NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "{label} must be at most {SUBURB_NAME_MAX_LENGTH} characters"
        )));
    }

    Ok(value)
}

fn optional_place(label: &str, value: Option<String>) -> AppResult<Option<String>> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(|value| validate_place(label, value).map(String::from))
        .transpose()
}
