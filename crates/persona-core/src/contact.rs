//! Contact form submission.

use persona_types::{PersonaError, Result, event::Notice, user::ContactForm};

use crate::ports::{ContactGateway, Notifier};
use crate::validate;

/// Validate and send the contact form, reporting the outcome as one notice.
pub async fn submit_contact(
    gateway: &dyn ContactGateway,
    notifier: &dyn Notifier,
    form: &ContactForm,
) -> Result<()> {
    let result = match validate::validate_contact(form) {
        Ok(()) => gateway.submit(form).await,
        Err(e) => Err(e),
    };
    match &result {
        Ok(()) => notifier.notify(Notice::success(
            "Message sent!",
            "We'll get back to you as soon as possible.",
        )),
        Err(PersonaError::Validation(message)) => {
            notifier.notify(Notice::error("Error", message.clone()));
        }
        Err(e) => {
            log::error!("Contact submission failed: {}", e);
            notifier.notify(Notice::error(
                "Error",
                "There was an issue sending your message. Please try again.",
            ));
        }
    }
    result
}
