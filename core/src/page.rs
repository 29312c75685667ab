//! The product management screen as a state machine.
//!
//! # Design
//! `ProductsPage` owns the store, the open editor (if any), the pending
//! deletion target and a queue of notifications. At most one overlay is
//! visible: the editor or the delete confirmation. Loading is read from the
//! store and can overlap either overlay while a save or delete is running.
//!
//! Save and delete failures never close the editor by themselves; the
//! confirmation dialog always closes once the delete call returns.

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::form::{EditorMode, FieldErrors, ProductForm};
use crate::service::ProductService;
use crate::store::{FetchOutcome, ProductStore};
use crate::table::TableState;
use crate::transport::Transport;
use crate::types::{Product, ProductId, ProductPatch};

/// Which overlay is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Editor(EditorMode),
    DeleteConfirm(ProductId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub messages: Vec<String>,
}

impl Notification {
    fn success(title: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.to_string(),
            messages: Vec::new(),
        }
    }

    fn error(title: &str, messages: Vec<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            messages,
        }
    }
}

/// Result of `submit_editor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The editor was closed and the cache patched.
    Saved(Product),
    /// Client-side rules failed; nothing was sent.
    Invalid(FieldErrors),
    /// The remote call failed; the editor stays open.
    Rejected(ApiError),
    /// No editor was open.
    NoEditor,
}

/// The body shape of a remote validation rejection.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

/// Every field-level message in a rejection body, in field order. Empty
/// when the failure carries no structured errors.
pub fn field_messages(error: &ApiError) -> Vec<String> {
    let ApiError::Status { body, .. } = error else {
        return Vec::new();
    };
    serde_json::from_str::<RejectionBody>(body)
        .map(|rejection| rejection.errors.into_values().flatten().collect())
        .unwrap_or_default()
}

fn failure_messages(error: &ApiError, generic: &str) -> Vec<String> {
    let messages = field_messages(error);
    if messages.is_empty() {
        vec![generic.to_string()]
    } else {
        messages
    }
}

#[derive(Debug)]
pub struct ProductsPage<T> {
    service: ProductService<T>,
    store: ProductStore,
    editor: Option<ProductForm>,
    pending_delete: Option<ProductId>,
    notifications: Vec<Notification>,
    table: TableState,
}

impl<T: Transport> ProductsPage<T> {
    pub fn new(service: ProductService<T>) -> Self {
        Self {
            service,
            store: ProductStore::new(),
            editor: None,
            pending_delete: None,
            notifications: Vec::new(),
            table: TableState::new(),
        }
    }

    pub fn service(&self) -> &ProductService<T> {
        &self.service
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    pub fn products(&self) -> &[Product] {
        self.store.products()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn overlay(&self) -> Overlay {
        if let Some(id) = &self.pending_delete {
            return Overlay::DeleteConfirm(id.clone());
        }
        match &self.editor {
            Some(form) => Overlay::Editor(form.mode().clone()),
            None => Overlay::None,
        }
    }

    pub fn editor(&self) -> Option<&ProductForm> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut ProductForm> {
        self.editor.as_mut()
    }

    pub fn pending_delete(&self) -> Option<&ProductId> {
        self.pending_delete.as_ref()
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableState {
        &mut self.table
    }

    /// Jump to a page of the current cache, clamped to the last one.
    pub fn go_to_page(&mut self, page_index: usize) {
        self.table.set_page_index(page_index, self.store.products());
    }

    pub fn render_table(&self) -> String {
        self.table.render(self.store.products())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Initial load.
    pub fn mount(&mut self) -> FetchOutcome {
        self.refresh(None)
    }

    pub fn refresh(&mut self, search: Option<&str>) -> FetchOutcome {
        let outcome = self.store.fetch_products(&self.service, search);
        self.table.clamp_page(self.store.products());
        if let FetchOutcome::Failed(error) = &outcome {
            self.notifications.push(Notification::error(
                "Could not load products",
                vec![error.to_string()],
            ));
        }
        outcome
    }

    pub fn open_create(&mut self) {
        self.pending_delete = None;
        match &mut self.editor {
            Some(form) => form.reseed_create(),
            None => self.editor = Some(ProductForm::create()),
        }
    }

    /// Open the editor seeded from the cached product. Returns false when
    /// `id` is not in the cache.
    pub fn open_edit(&mut self, id: &ProductId) -> bool {
        let Some(product) = self.store.get(id) else {
            return false;
        };
        self.pending_delete = None;
        match &mut self.editor {
            Some(form) => form.reseed_edit(product),
            None => self.editor = Some(ProductForm::edit(product)),
        }
        true
    }

    pub fn submit_editor(&mut self) -> SubmitOutcome {
        let Some(form) = self.editor.as_mut() else {
            return SubmitOutcome::NoEditor;
        };
        let input = match form.submit() {
            Ok(input) => input,
            Err(errors) => {
                debug!(fields = errors.len(), "editor draft rejected");
                return SubmitOutcome::Invalid(errors);
            }
        };
        let mode = form.mode().clone();

        let result = match &mode {
            EditorMode::Create => self.store.create_product(&self.service, &input),
            EditorMode::Edit(id) => {
                self.store
                    .update_product(&self.service, id, &ProductPatch::from(input))
            }
        };

        let (saved, failed) = match mode {
            EditorMode::Create => ("Product created", "Could not create product"),
            EditorMode::Edit(_) => ("Product updated", "Could not update product"),
        };
        match result {
            Ok(product) => {
                info!(id = %product.id, "product saved");
                self.editor = None;
                self.notifications.push(Notification::success(saved));
                SubmitOutcome::Saved(product)
            }
            Err(error) => {
                self.notifications
                    .push(Notification::error(failed, failure_messages(&error, failed)));
                SubmitOutcome::Rejected(error)
            }
        }
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: ProductId) {
        self.editor = None;
        self.pending_delete = Some(id);
    }

    /// Delete the pending target. The dialog closes whatever the outcome.
    /// Returns `None` when no deletion was pending.
    pub fn confirm_delete(&mut self) -> Option<Result<(), ApiError>> {
        let id = self.pending_delete.take()?;
        let result = self.store.delete_product(&self.service, &id);
        match &result {
            Ok(()) => {
                info!(%id, "product deleted");
                self.table.clamp_page(self.store.products());
                self.notifications
                    .push(Notification::success("Product deleted"));
            }
            Err(error) => {
                let title = "Could not delete product";
                self.notifications
                    .push(Notification::error(title, failure_messages(error, title)));
            }
        }
        Some(result)
    }

    /// Close whichever overlay is open, discarding its state.
    pub fn cancel(&mut self) {
        self.editor = None;
        self.pending_delete = None;
    }
}
