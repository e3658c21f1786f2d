//! Newsletter subscription route handlers.
//!
//! Handles email newsletter subscriptions via Klaviyo. The form posts over
//! HTMX and the response fragment replaces the newsletter section body: a
//! thank-you message on success, or the form again with an error line under
//! it on failure.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use zeroproof_core::Email;

use crate::state::AppState;

/// Newsletter form state shared by the home page and the error fragment.
///
/// Carries the last-typed email (so a failed submit doesn't eat the input)
/// and the error line rendered under the form.
#[derive(Clone, Default)]
pub struct NewsletterView {
    pub email: String,
    pub error: Option<String>,
}

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
}

/// Success fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_success.html")]
pub struct SubscribeSuccessTemplate;

/// Error fragment template (re-renders the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_error.html")]
pub struct SubscribeErrorTemplate {
    pub newsletter: NewsletterView,
}

/// Subscribe to newsletter (HTMX).
///
/// Validates the address, then subscribes it to the Klaviyo list. A duplicate
/// subscription reads as success to the shopper; only transport or API
/// failures surface as errors.
#[instrument(skip(state), fields(email = %form.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> impl IntoResponse {
    let normalized = form.email.trim().to_lowercase();

    let Ok(email) = Email::parse(&normalized) else {
        return SubscribeErrorTemplate {
            newsletter: NewsletterView {
                email: normalized,
                error: Some("Please enter a valid email address.".to_string()),
            },
        }
        .into_response();
    };

    match state.klaviyo().subscribe_email(email.as_str()).await {
        Ok(()) => {
            tracing::info!(email = %email, "Newsletter subscription successful");
            SubscribeSuccessTemplate.into_response()
        }
        Err(e) => {
            tracing::warn!(email = %email, error = %e, "Newsletter subscription failed");
            SubscribeErrorTemplate {
                newsletter: NewsletterView {
                    email: email.as_str().to_string(),
                    error: Some("Something went wrong. Please try again.".to_string()),
                },
            }
            .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_fragment_has_no_form() {
        let html = SubscribeSuccessTemplate.render().unwrap();
        assert!(html.contains("Thanks"));
        assert!(html.contains("for subscribing!"));
        assert!(html.contains("You'll receive our best zero-proof offers soon."));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_error_fragment_keeps_form_and_shows_message() {
        let html = SubscribeErrorTemplate {
            newsletter: NewsletterView {
                email: "shopper@example".to_string(),
                error: Some("Please enter a valid email address.".to_string()),
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("<form"));
        assert!(html.contains("Please enter a valid email address."));
        assert!(html.contains("shopper@example"));
    }

    #[test]
    fn test_error_fragment_without_message_renders_plain_form() {
        let html = SubscribeErrorTemplate {
            newsletter: NewsletterView::default(),
        }
        .render()
        .unwrap();

        assert!(html.contains("<form"));
        assert!(!html.contains("newsletter-error"));
    }
}
