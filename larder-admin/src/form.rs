//! Recipe form controller
//!
//! State machine behind the "Add/Edit Recipe" dialog:
//!
//! ```text
//! Closed --open--> Editing --submit--> Submitting --written--> Validating
//!                    ^   |                  |                     |
//!                    |   +-- field edits    +--- write failed ----+-- check failed
//!                    +--------------------------------------------+
//!                                                          check ok --> Closed
//! ```
//!
//! The open dialog is a lifetime scope. Closing it through a [`FormHandle`]
//! while a submit is in flight abandons the pending work and its result is
//! dropped without a notification.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use larder_core::{Ingredient, Recipe, RecipePatch, ValidationError};
use larder_db::{DbError, RecipeService};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::draft::{DraftErrors, RecipeDraft};
use crate::notify::{Notification, Notifier};

pub const SUCCESS_TITLE: &str = "Success! 🎉";
pub const FALLBACK_MESSAGE: &str = "An error occurred while saving the recipe";
const SUCCESS_DURATION: Duration = Duration::from_secs(5);

/// Observable dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Editing,
    Submitting,
    Validating,
}

impl FormState {
    pub fn is_open(self) -> bool {
        self != Self::Closed
    }

    /// Fields are locked and the submit button shows a spinner.
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Submitting | Self::Validating)
    }
}

/// Errors from editing calls
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("the recipe form is not open")]
    Closed,

    #[error("the recipe form is saving; try again when it finishes")]
    Busy,

    #[error(transparent)]
    Field(#[from] ValidationError),
}

/// Why a submit did not produce a verified recipe
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Draft(#[from] DraftErrors),

    #[error(transparent)]
    Write(#[from] DbError),

    #[error("Recipe validation failed")]
    Validation {
        #[source]
        source: DbError,
    },
}

impl SubmitError {
    /// Text for the error notification.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Result of [`RecipeForm::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Written and confirmed; the dialog closed.
    Saved(Recipe),
    /// Draft had field errors; nothing was sent.
    Rejected(DraftErrors),
    /// Write or confirmation failed; the dialog stays open.
    Failed(String),
    /// The dialog closed while the submit was in flight.
    Discarded,
    /// Not in the editing state; nothing happened.
    Ignored,
}

/// Shared view of a form's dialog: observe its state or close it.
#[derive(Debug, Clone)]
pub struct FormHandle {
    state: Arc<watch::Sender<FormState>>,
}

impl FormHandle {
    fn new() -> Self {
        let (state, _) = watch::channel(FormState::Closed);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> FormState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Close the dialog. Ends the scope of any submit in flight.
    pub fn close(&self) {
        let previous = self.state.send_replace(FormState::Closed);
        if previous.is_loading() {
            debug!(?previous, "Recipe form closed mid-submit");
        }
    }

    /// Move to `next` unless the dialog was closed in the meantime.
    fn advance(&self, next: FormState) -> bool {
        self.state.send_if_modified(|state| {
            if *state == FormState::Closed {
                false
            } else {
                *state = next;
                true
            }
        })
    }
}

/// Run `work` unless the dialog closes first.
async fn until_closed<F: Future>(mut scope: watch::Receiver<FormState>, work: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = scope.wait_for(|state| *state == FormState::Closed) => None,
        output = work => Some(output),
    }
}

/// Controller for the add/edit recipe dialog
pub struct RecipeForm {
    recipes: RecipeService,
    notifier: Arc<dyn Notifier>,
    handle: FormHandle,
    editing: Option<Recipe>,
    draft: RecipeDraft,
}

impl RecipeForm {
    pub fn new(recipes: RecipeService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            recipes,
            notifier,
            handle: FormHandle::new(),
            editing: None,
            draft: RecipeDraft::default(),
        }
    }

    pub fn handle(&self) -> FormHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> FormState {
        self.handle.state()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn editing(&self) -> Option<&Recipe> {
        self.editing.as_ref()
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    /// Dialog heading
    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Recipe"
        } else {
            "Add New Recipe"
        }
    }

    /// Open the dialog, blank or on an existing recipe.
    pub fn open(&mut self, editing: Option<Recipe>) {
        self.draft = editing.as_ref().map(RecipeDraft::from).unwrap_or_default();
        self.editing = editing;
        self.handle.state.send_replace(FormState::Editing);
        debug!(editing = ?self.editing.as_ref().map(|r| &r.id), "Recipe form opened");
    }

    /// The dialog's `onOpenChange` callback.
    pub fn on_open_change(&mut self, open: bool) {
        if open {
            if !self.state().is_open() {
                let editing = self.editing.take();
                self.open(editing);
            }
        } else {
            self.handle.close();
        }
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        match self.state() {
            FormState::Editing => Ok(()),
            FormState::Closed => Err(FormError::Closed),
            FormState::Submitting | FormState::Validating => Err(FormError::Busy),
        }
    }

    /// Update one text field by its form name.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.set_by_name(name, value)?;
        Ok(())
    }

    pub fn set_ingredients(&mut self, ingredients: Vec<Ingredient>) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.ingredients = ingredients;
        Ok(())
    }

    pub fn set_instructions(&mut self, instructions: Vec<String>) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.instructions = instructions;
        Ok(())
    }

    fn error_title(&self) -> &'static str {
        if self.editing.is_some() {
            "Error updating recipe"
        } else {
            "Error creating recipe"
        }
    }

    /// Save the draft: write, re-read to confirm, notify.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.state() != FormState::Editing {
            debug!(state = ?self.state(), "Ignoring submit");
            return SubmitOutcome::Ignored;
        }

        let data = match self.draft.to_new_recipe() {
            Ok(data) => data,
            Err(errors) => {
                warn!(%errors, "Recipe draft rejected");
                let message = SubmitError::Draft(errors.clone()).message();
                self.notifier
                    .notify(Notification::error(self.error_title(), message));
                return SubmitOutcome::Rejected(errors);
            }
        };

        if !self.handle.advance(FormState::Submitting) {
            return self.discard();
        }

        let write = async {
            match &self.editing {
                Some(recipe) => {
                    self.recipes
                        .update(&recipe.id, &RecipePatch::from(data))
                        .await
                }
                None => self.recipes.create(&data).await,
            }
        };
        let written = until_closed(self.handle.subscribe(), write).await;
        let written = match written {
            Some(Ok(recipe)) => recipe,
            Some(Err(err)) => return self.fail(SubmitError::Write(err)),
            None => return self.discard(),
        };

        if !self.handle.advance(FormState::Validating) {
            return self.discard();
        }

        let check = until_closed(self.handle.subscribe(), self.recipes.get_by_id(&written.id)).await;
        let verified = match check {
            Some(Ok(recipe)) => recipe,
            Some(Err(err)) => {
                warn!(id = %written.id, error = %err, "Validation error");
                return self.fail(SubmitError::Validation { source: err });
            }
            None => return self.discard(),
        };

        let description = if self.editing.is_some() {
            "Recipe updated successfully and verified in the database."
        } else {
            "Recipe created successfully and verified in the database."
        };
        info!(id = %verified.id, "Recipe saved and verified");

        self.handle.close();
        self.editing = None;
        self.notifier.notify(
            Notification::success(SUCCESS_TITLE, description).with_duration(SUCCESS_DURATION),
        );
        SubmitOutcome::Saved(verified)
    }

    fn fail(&mut self, err: SubmitError) -> SubmitOutcome {
        if !self.handle.advance(FormState::Editing) {
            return self.discard();
        }

        let message = err.message();
        warn!(error = %message, "Recipe submit failed");
        self.notifier
            .notify(Notification::error(self.error_title(), message.clone()));
        SubmitOutcome::Failed(message)
    }

    fn discard(&self) -> SubmitOutcome {
        warn!("Recipe form closed while saving; discarding result");
        SubmitOutcome::Discarded
    }
}
