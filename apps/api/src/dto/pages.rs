use pagecraft_application::{
    CreatePageInput, DocumentEdit, EditorCommand, PageListQuery, UpdatePageInput,
};
use pagecraft_core::AppError;
use pagecraft_domain::{LandingPage, PageDocument, PageSeo, PageStatus, PageType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Incoming payload for page creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-page-request.ts"
)]
pub struct CreatePageRequest {
    pub slug: String,
    pub name: String,
    pub page_type: String,
    #[ts(type = "unknown | null")]
    pub document: Option<Value>,
}

impl CreatePageRequest {
    pub fn into_input(self) -> Result<CreatePageInput, AppError> {
        Ok(CreatePageInput {
            slug: self.slug,
            name: self.name,
            page_type: self.page_type.parse::<PageType>()?,
            document: self.document.map(decode_document).transpose()?,
        })
    }
}

/// SEO fields of a page.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-seo-request.ts"
)]
pub struct PageSeoRequest {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image_url: Option<String>,
}

impl From<PageSeoRequest> for PageSeo {
    fn from(value: PageSeoRequest) -> Self {
        Self {
            meta_title: value.meta_title,
            meta_description: value.meta_description,
            og_image_url: value.og_image_url,
        }
    }
}

impl From<&PageSeo> for PageSeoRequest {
    fn from(value: &PageSeo) -> Self {
        Self {
            meta_title: value.meta_title.clone(),
            meta_description: value.meta_description.clone(),
            og_image_url: value.og_image_url.clone(),
        }
    }
}

/// Incoming payload for partial page updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-page-request.ts"
)]
pub struct UpdatePageRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub seo: Option<PageSeoRequest>,
    #[ts(type = "unknown | null")]
    pub document: Option<Value>,
}

impl UpdatePageRequest {
    pub fn into_input(self) -> Result<UpdatePageInput, AppError> {
        Ok(UpdatePageInput {
            name: self.name,
            slug: self.slug,
            seo: self.seo.map(PageSeo::from),
            document: self.document.map(decode_document).transpose()?,
        })
    }
}

/// Batch of editor commands applied in order.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/edit-document-request.ts"
)]
pub struct EditDocumentRequest {
    #[ts(type = "Array<Record<string, unknown>>")]
    pub commands: Vec<EditorCommand>,
}

/// Query string of the page listing.
#[derive(Debug, Default, Deserialize)]
pub struct PageListQueryRequest {
    pub status: Option<String>,
}

impl PageListQueryRequest {
    pub fn into_query(self) -> Result<PageListQuery, AppError> {
        Ok(PageListQuery {
            status: self
                .status
                .as_deref()
                .map(str::parse::<PageStatus>)
                .transpose()?,
        })
    }
}

/// API representation of a landing page.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-response.ts"
)]
pub struct PageResponse {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub status: String,
    pub page_type: String,
    pub seo: PageSeoRequest,
    #[ts(type = "unknown")]
    pub document: Value,
    pub uses_dynamic_flow: bool,
    pub views: i64,
    pub submissions: i64,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
}

impl TryFrom<LandingPage> for PageResponse {
    type Error = AppError;

    fn try_from(page: LandingPage) -> Result<Self, Self::Error> {
        let document = serde_json::to_value(page.document()).map_err(|error| {
            AppError::Internal(format!("failed to serialize page document: {error}"))
        })?;

        Ok(Self {
            id: page.id().to_string(),
            slug: page.slug().as_str().to_owned(),
            name: page.name().to_owned(),
            status: page.status().as_str().to_owned(),
            page_type: page.page_type().as_str().to_owned(),
            seo: PageSeoRequest::from(page.seo()),
            uses_dynamic_flow: page.document().uses_dynamic_flow(),
            document,
            views: page.views(),
            submissions: page.submissions(),
            created_at: page.created_at().to_rfc3339(),
            updated_at: page.updated_at().to_rfc3339(),
            published_at: page.published_at().map(|value| value.to_rfc3339()),
        })
    }
}

/// Saved page and the id touched by each editor command.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/document-edit-response.ts"
)]
pub struct DocumentEditResponse {
    pub page: PageResponse,
    pub touched: Vec<String>,
}

impl TryFrom<DocumentEdit> for DocumentEditResponse {
    type Error = AppError;

    fn try_from(edit: DocumentEdit) -> Result<Self, Self::Error> {
        Ok(Self {
            page: PageResponse::try_from(edit.page)?,
            touched: edit.touched,
        })
    }
}

fn decode_document(value: Value) -> Result<PageDocument, AppError> {
    serde_json::from_value(value)
        .map_err(|error| AppError::Validation(format!("invalid page document: {error}")))
}

#[cfg(test)]
mod tests {
    use pagecraft_core::AppError;
    use pagecraft_domain::PageType;
    use serde_json::json;

    use super::{CreatePageRequest, PageListQueryRequest};

    #[test]
    fn create_requests_parse_type_and_document() {
        let request = CreatePageRequest {
            slug: "spring".to_owned(),
            name: "Spring".to_owned(),
            page_type: "lead_magnet".to_owned(),
            document: Some(json!({ "sections": [], "formFlow": { "steps": [] } })),
        };
        let input = request.into_input();
        assert!(input.is_ok_and(|input| input.page_type == PageType::LeadMagnet
            && input.document.is_some()));

        let bad_type = CreatePageRequest {
            slug: "spring".to_owned(),
            name: "Spring".to_owned(),
            page_type: "brochure".to_owned(),
            document: None,
        };
        assert!(matches!(bad_type.into_input(), Err(AppError::Validation(_))));

        let bad_document = CreatePageRequest {
            slug: "spring".to_owned(),
            name: "Spring".to_owned(),
            page_type: "custom".to_owned(),
            document: Some(json!({ "sections": "nope" })),
        };
        assert!(matches!(
            bad_document.into_input(),
            Err(AppError::Validation(message)) if message.contains("document")
        ));
    }

    #[test]
    fn list_query_status_is_validated() {
        let query = PageListQueryRequest {
            status: Some("published".to_owned()),
        };
        assert!(query.into_query().is_ok_and(|query| query.status.is_some()));
        assert!(
            PageListQueryRequest {
                status: Some("live".to_owned())
            }
            .into_query()
            .is_err()
        );
    }
}
