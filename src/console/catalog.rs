use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::console::editor::{Editor, EditorState, Submission};
use crate::console::list::HeldList;
use crate::console::lock;
use crate::errors::AppError;
use crate::models::{Category, DesignDraft, NailDesign, RecordId, Service, ServiceDraft};
use crate::services::api::ApiClient;
use crate::services::notify::{NoticeLevel, Notifier};
use crate::services::projection::{CatalogSortKey, SortState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogTab {
    #[default]
    Services,
    Designs,
}

impl CatalogTab {
    fn noun(self) -> &'static str {
        match self {
            CatalogTab::Services => "service",
            CatalogTab::Designs => "design",
        }
    }

    /// Services sort by name, price or duration; designs by name or trend score.
    pub fn sorts_by(self, key: CatalogSortKey) -> bool {
        match self {
            CatalogTab::Services => matches!(
                key,
                CatalogSortKey::Name | CatalogSortKey::Price | CatalogSortKey::Duration
            ),
            CatalogTab::Designs => matches!(key, CatalogSortKey::Name | CatalogSortKey::TrendScore),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRow {
    #[serde(flatten)]
    pub service: Service,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DesignRow {
    #[serde(flatten)]
    pub design: NailDesign,
    pub service_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormView<D> {
    pub editor: EditorState,
    pub draft: D,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> From<&HeldList<T>> for ListStatus {
    fn from(list: &HeldList<T>) -> Self {
        ListStatus {
            loading: list.is_loading(),
            error: list.error().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub tab: CatalogTab,
    pub services: Vec<ServiceRow>,
    pub services_status: ListStatus,
    pub service_sort: SortState<CatalogSortKey>,
    pub service_form: FormView<ServiceDraft>,
    pub designs: Vec<DesignRow>,
    pub designs_status: ListStatus,
    pub design_sort: SortState<CatalogSortKey>,
    pub design_form: FormView<DesignDraft>,
    pub categories: Vec<Category>,
    pub categories_status: ListStatus,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

struct CatalogState {
    tab: CatalogTab,
    services: HeldList<Service>,
    designs: HeldList<NailDesign>,
    categories: HeldList<Category>,
    service_editor: Editor<ServiceDraft>,
    design_editor: Editor<DesignDraft>,
    service_sort: SortState<CatalogSortKey>,
    design_sort: SortState<CatalogSortKey>,
}

impl CatalogState {
    fn busy(&self, tab: CatalogTab) -> bool {
        match tab {
            CatalogTab::Services => self.services.is_loading(),
            CatalogTab::Designs => self.designs.is_loading(),
        }
    }

    fn begin_write(&mut self, tab: CatalogTab) {
        match tab {
            CatalogTab::Services => self.services.begin_write(),
            CatalogTab::Designs => self.designs.begin_write(),
        }
    }

    fn finish_write(&mut self, tab: CatalogTab, error: Option<String>) {
        match tab {
            CatalogTab::Services => self.services.finish_write(error),
            CatalogTab::Designs => self.designs.finish_write(error),
        }
    }

    fn service_name(&self, id: Option<&RecordId>) -> String {
        let Some(id) = id else {
            return "No Service".to_string();
        };
        self.services
            .find(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown Service".to_string())
    }

    fn category_name(&self, id: Option<&RecordId>) -> String {
        let Some(id) = id else {
            return "N/A".to_string();
        };
        self.categories
            .find(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Category {id}"))
    }
}

enum Pending {
    Service(Submission<ServiceDraft>),
    Design(Submission<DesignDraft>),
}

/// Services/designs catalog editor with one tab per record type.
pub struct CatalogScreen {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    resync_delay: Duration,
    state: Mutex<CatalogState>,
}

impl CatalogScreen {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>, resync_delay: Duration) -> Self {
        Self {
            api,
            notifier,
            resync_delay,
            state: Mutex::new(CatalogState {
                tab: CatalogTab::default(),
                services: HeldList::new(),
                designs: HeldList::new(),
                categories: HeldList::new(),
                service_editor: Editor::new(),
                design_editor: Editor::new(),
                service_sort: SortState::default(),
                design_sort: SortState::default(),
            }),
        }
    }

    // ── Fetching ──

    pub async fn refresh(&self) {
        tokio::join!(
            self.refresh_services(),
            self.refresh_designs(),
            self.refresh_categories()
        );
    }

    pub async fn refresh_services(&self) {
        self.fetch_into("services", |s| &mut s.services, self.api.fetch_services())
            .await;
    }

    pub async fn refresh_designs(&self) {
        self.fetch_into("designs", |s| &mut s.designs, self.api.fetch_designs())
            .await;
    }

    pub async fn refresh_categories(&self) {
        self.fetch_into("categories", |s| &mut s.categories, self.api.fetch_categories())
            .await;
    }

    async fn fetch_into<T, F>(
        &self,
        what: &'static str,
        select: fn(&mut CatalogState) -> &mut HeldList<T>,
        fetch: F,
    ) where
        F: Future<Output = Result<Vec<T>, AppError>>,
    {
        let ticket = select(&mut lock(&self.state)).begin_fetch();
        let result = fetch.await;

        match &result {
            Ok(items) => tracing::info!(count = items.len(), list = what, "fetched catalog list"),
            Err(e) => tracing::error!(error = %e, list = what, "error fetching catalog list"),
        }

        if !select(&mut lock(&self.state)).finish_fetch(ticket, result) {
            tracing::debug!(list = what, "discarded stale catalog response");
        }
    }

    // ── Navigation and form state ──

    pub fn set_tab(&self, tab: CatalogTab) {
        lock(&self.state).tab = tab;
    }

    pub fn compose(&self) {
        let mut state = lock(&self.state);
        match state.tab {
            CatalogTab::Services => state.service_editor.compose(),
            CatalogTab::Designs => state.design_editor.compose(),
        }
    }

    /// Populate the active tab's form from the record with `id`.
    pub fn edit(&self, id: &RecordId) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        match state.tab {
            CatalogTab::Services => {
                let draft = state
                    .services
                    .find(id)
                    .map(ServiceDraft::from)
                    .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;
                state.service_editor.edit(id.clone(), draft);
            }
            CatalogTab::Designs => {
                let draft = state
                    .designs
                    .find(id)
                    .map(DesignDraft::from)
                    .ok_or_else(|| AppError::NotFound(format!("design {id}")))?;
                state.design_editor.edit(id.clone(), draft);
            }
        }
        Ok(())
    }

    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        match state.tab {
            CatalogTab::Services => state.service_editor.cancel(),
            CatalogTab::Designs => state.design_editor.cancel(),
        }
    }

    /// Replace the active form's fields. The JSON must describe a draft of the
    /// active tab's record type.
    pub fn set_draft(&self, fields: Value) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        match state.tab {
            CatalogTab::Services => {
                let draft: ServiceDraft = serde_json::from_value(fields)
                    .map_err(|e| AppError::Invalid(format!("service draft: {e}")))?;
                state.service_editor.set_draft(draft);
            }
            CatalogTab::Designs => {
                let draft: DesignDraft = serde_json::from_value(fields)
                    .map_err(|e| AppError::Invalid(format!("design draft: {e}")))?;
                state.design_editor.set_draft(draft);
            }
        }
        Ok(())
    }

    pub fn request_sort(&self, key: CatalogSortKey) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        if !state.tab.sorts_by(key) {
            return Err(AppError::Invalid(format!(
                "{} list cannot be sorted by {key:?}",
                state.tab.noun()
            )));
        }
        match state.tab {
            CatalogTab::Services => state.service_sort.request(key),
            CatalogTab::Designs => state.design_sort.request(key),
        }
        Ok(())
    }

    // ── Writes ──

    /// Create or update the active tab's record. The form goes back to a blank
    /// idle state whatever the outcome; remote failures are recorded and
    /// alerted rather than returned.
    pub async fn submit(&self) -> Result<(), AppError> {
        let (tab, pending) = {
            let mut state = lock(&self.state);
            let tab = state.tab;
            if state.busy(tab) {
                return Err(AppError::Invalid(format!(
                    "a {} request is already in progress",
                    tab.noun()
                )));
            }
            let pending = match tab {
                CatalogTab::Services => state.service_editor.take_submission().map(Pending::Service),
                CatalogTab::Designs => state.design_editor.take_submission().map(Pending::Design),
            }
            .ok_or_else(|| AppError::Invalid("no form is open".to_string()))?;
            state.begin_write(tab);
            (tab, pending)
        };

        let (result, updated) = match &pending {
            Pending::Service(Submission::Create(draft)) => {
                (self.api.create_service(draft).await, false)
            }
            Pending::Service(Submission::Update(id, draft)) => {
                (self.api.update_service(id, draft).await, true)
            }
            Pending::Design(Submission::Create(draft)) => {
                (self.api.create_design(draft).await, false)
            }
            Pending::Design(Submission::Update(id, draft)) => {
                (self.api.update_design(id, draft).await, true)
            }
        };

        if self.settle(tab, updated, result) {
            if updated {
                tokio::time::sleep(self.resync_delay).await;
            }
            match tab {
                CatalogTab::Services => self.refresh_services().await,
                CatalogTab::Designs => self.refresh_designs().await,
            }
        }
        Ok(())
    }

    fn settle(&self, tab: CatalogTab, updated: bool, result: Result<Option<Value>, AppError>) -> bool {
        let noun = tab.noun();
        match result {
            Ok(body) => {
                lock(&self.state).finish_write(tab, None);
                tracing::info!(kind = noun, updated, response = ?body, "catalog write succeeded");
                let mut label = noun.to_string();
                label[..1].make_ascii_uppercase();
                let verb = if updated { "updated" } else { "added" };
                self.notifier
                    .alert(NoticeLevel::Info, &format!("{label} {verb} successfully!"));
                true
            }
            Err(e) => {
                tracing::error!(error = %e, kind = noun, updated, "catalog write failed");
                lock(&self.state).finish_write(tab, Some(e.to_string()));
                let verb = if updated { "updating" } else { "adding" };
                self.notifier.alert(
                    NoticeLevel::Error,
                    &format!("Error {verb} {noun}: {}", e.operator_message()),
                );
                false
            }
        }
    }

    /// Delete a record on the active tab. It leaves the local list only once
    /// the server has confirmed; failures are recorded but never alerted.
    pub async fn delete(&self, id: &RecordId) {
        let tab = {
            let mut state = lock(&self.state);
            let tab = state.tab;
            state.begin_write(tab);
            tab
        };

        let result = match tab {
            CatalogTab::Services => self.api.delete_service(id).await,
            CatalogTab::Designs => self.api.delete_design(id).await,
        };

        let mut state = lock(&self.state);
        match result {
            Ok(()) => {
                state.finish_write(tab, None);
                let removed = match tab {
                    CatalogTab::Services => state.services.remove(id),
                    CatalogTab::Designs => state.designs.remove(id),
                };
                tracing::info!(kind = tab.noun(), id = %id, removed, "deleted catalog record");
            }
            Err(e) => {
                tracing::error!(error = %e, kind = tab.noun(), id = %id, "error deleting catalog record");
                state.finish_write(tab, Some(e.to_string()));
            }
        }
    }

    // ── Lookups ──

    pub fn service_name(&self, id: Option<&RecordId>) -> String {
        lock(&self.state).service_name(id)
    }

    pub fn category_name(&self, id: Option<&RecordId>) -> String {
        lock(&self.state).category_name(id)
    }

    pub fn submit_enabled(&self) -> bool {
        let state = lock(&self.state);
        !state.busy(state.tab)
    }

    pub fn view(&self) -> CatalogView {
        let state = lock(&self.state);

        let mut services = state.services.items().to_vec();
        state.service_sort.apply(&mut services);
        let services = services
            .into_iter()
            .map(|service| ServiceRow {
                category_name: state.category_name(
                    service.category.as_ref().or(service.category_ids.first()),
                ),
                service,
            })
            .collect();

        let mut designs = state.designs.items().to_vec();
        state.design_sort.apply(&mut designs);
        let designs = designs
            .into_iter()
            .map(|design| DesignRow {
                service_name: state.service_name(
                    design
                        .service_id
                        .as_ref()
                        .or(design.services.first().map(|l| &l.service_id)),
                ),
                design,
            })
            .collect();

        let busy = state.busy(state.tab);
        let editing = match state.tab {
            CatalogTab::Services => state.service_editor.is_editing(),
            CatalogTab::Designs => state.design_editor.is_editing(),
        };
        let submit_label = match (busy, editing) {
            (true, _) => "Processing...",
            (false, true) => "Update",
            (false, false) => "Add New",
        };

        CatalogView {
            tab: state.tab,
            services,
            services_status: ListStatus::from(&state.services),
            service_sort: state.service_sort,
            service_form: FormView {
                editor: state.service_editor.state().clone(),
                draft: state.service_editor.draft().clone(),
            },
            designs,
            designs_status: ListStatus::from(&state.designs),
            design_sort: state.design_sort,
            design_form: FormView {
                editor: state.design_editor.state().clone(),
                draft: state.design_editor.draft().clone(),
            },
            categories: state.categories.items().to_vec(),
            categories_status: ListStatus::from(&state.categories),
            submit_label,
            submit_enabled: !busy,
        }
    }
}
