//! Creation request extraction
//!
//! `POST /api` accepts either a JSON body or `multipart/form-data`. Both land
//! in a [`TokenForm`]; an uploaded image is recorded by file name only.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};

use crate::domain::TokenForm;
use super::responses::ApiError;

/// Read a [`TokenForm`] from a JSON or multipart request
pub async fn read_token_form(request: Request) -> Result<TokenForm, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid form data: {}", e)))?;
        return read_multipart(multipart).await;
    }

    let Json(form) = Json::<TokenForm>::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e.body_text())))?;
    Ok(form)
}

async fn read_multipart(mut multipart: Multipart) -> Result<TokenForm, ApiError> {
    let mut form = TokenForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid image upload: {}", e)))?;
            if !bytes.is_empty() {
                tracing::debug!("Received image {:?} ({} bytes)", file_name, bytes.len());
                form.image = Some(file_name.unwrap_or_else(|| "image".to_string()));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid field '{}': {}", name, e)))?;

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "symbol" => &mut form.symbol,
            "totalSupply" => &mut form.total_supply,
            "config" => &mut form.config,
            "uri" => &mut form.uri,
            "walletAddress" => &mut form.wallet_address,
            other => {
                tracing::debug!("Ignoring unknown form field '{}'", other);
                continue;
            }
        };
        *slot = Some(value);
    }

    Ok(form)
}
