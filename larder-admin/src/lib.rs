//! larder-admin: the recipe editing dialog, minus the pixels
//!
//! [`RecipeForm`] owns a disposable [`RecipeDraft`], turns it into a typed
//! record on submit, writes it through the recipe service, re-reads it to
//! confirm the write and reports the result through a [`Notifier`].

pub mod draft;
pub mod form;
pub mod notify;

pub use draft::{DraftErrors, DraftField, RecipeDraft};
pub use form::{FormError, FormHandle, FormState, RecipeForm, SubmitError, SubmitOutcome};
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier, Variant};
