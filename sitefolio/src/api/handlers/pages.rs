//! Public pages: pricing and hosted-auth redirects.
//!
//! Builder sign-in and sign-up live on the identity provider's hosted pages;
//! these routes just forward there so the frontend has stable local URLs.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PricingQuery {
    /// Plan to highlight, e.g. from a marketing link
    pub plan: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn sign_in(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.config.auth.identity.sign_in_url)
}

#[tracing::instrument(skip_all)]
pub async fn sign_up(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.config.auth.identity.sign_up_url)
}

#[tracing::instrument(skip_all)]
pub async fn pricing(State(state): State<AppState>, Query(query): Query<PricingQuery>) -> Html<String> {
    let mut rows = String::new();
    for plan in &state.config.billing.plans {
        let limit = match plan.project_limit {
            Some(n) => format!("{n} projects"),
            None => "Unlimited projects".to_string(),
        };
        let highlight = if query.plan.as_deref() == Some(plan.name.as_str()) {
            " class=\"selected\""
        } else {
            ""
        };
        rows.push_str(&format!(
            "<tr{highlight}><td>{}</td><td>{limit}</td></tr>\n",
            plan.name
        ));
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Pricing</title>
  <style>
    body {{ font-family: sans-serif; max-width: 40rem; margin: 4rem auto; }}
    table {{ border-collapse: collapse; width: 100%; }}
    td {{ padding: 0.75rem; border-bottom: 1px solid #ddd; }}
    tr.selected td {{ background: #f0f7ff; font-weight: bold; }}
  </style>
</head>
<body>
  <h1>Plans</h1>
  <table>
{rows}  </table>
  <p><a href="/sign-up">Get started</a></p>
</body>
</html>
"#
    ))
}
