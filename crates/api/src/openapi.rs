// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` documentation endpoints

use axum::{Json, response::Html};
use utoipa::OpenApi;

use crate::docs::ApiDoc;

const SPEC_PATH: &str = "/api-doc/openapi.json";

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>NFT Holder Checker API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({ url: '__SPEC_PATH__', dom_id: '#swagger-ui', deepLinking: true });
        }
    </script>
</body>
</html>
"#;

/// Serve the generated `OpenAPI` document
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Serve a Swagger UI page pointed at [`openapi_spec`]
pub async fn swagger_ui() -> Html<String> {
    Html(SWAGGER_UI_HTML.replace("__SPEC_PATH__", SPEC_PATH))
}
