use axum::response::Html;

use crate::view::PreferenceForm;
use crate::view::results::{MAX_COMPARE, MAX_VISIBLE};
use crate::view::transcript::CLIENT_FALLBACK;

const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");

/// GET /
pub async fn index() -> Html<String> {
    Html(render_index(&PreferenceForm::default()))
}

pub fn render_index(form: &PreferenceForm) -> String {
    INDEX_TEMPLATE
        .replace("{{budget}}", &form.budget.to_string())
        .replace("{{mileage}}", &form.mileage.to_string())
        .replace("{{usage}}", form.usage.as_str())
        .replace("{{max_compare}}", &MAX_COMPARE.to_string())
        .replace("{{max_visible}}", &MAX_VISIBLE.to_string())
        // JSON string literal, quotes included
        .replace(
            "{{client_fallback}}",
            &serde_json::Value::from(CLIENT_FALLBACK).to_string(),
        )
}
