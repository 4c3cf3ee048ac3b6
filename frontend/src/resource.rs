//! REST-backed record collections.
//!
//! `ResourceState` is the in-memory copy of one collection. It only changes
//! through `ResourceAction`s, and the async drivers below only dispatch
//! those after a round trip succeeds. Results arriving after the owning
//! `Lifetime` ended are dropped.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::filter::{Facet, Filterable};
use crate::form::Draft;
use crate::validation::FieldErrors;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;
use yew::Reducible;

pub type RecordId = i64;

/// Table cell content; the list page decides how each kind is drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Text(String),
    Money(f64),
    Badge(String),
}

pub struct Column<R> {
    pub header: &'static str,
    pub value: fn(&R) -> CellContent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    Date,
    Email,
    /// `(value, label)` pairs.
    Select(&'static [(&'static str, &'static str)]),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }
}

/// A record type served under `/{PATH}/`.
pub trait Resource: Filterable + Clone + PartialEq + DeserializeOwned + 'static {
    const PATH: &'static str;
    const TITLE: &'static str;
    const SINGULAR: &'static str;
    /// Heading of the summed-amount card; `None` for records without money.
    const AMOUNT_LABEL: Option<&'static str> = None;
    /// Writes restricted to administrators rather than any publisher.
    const ADMIN_ONLY: bool = false;

    type Draft: Draft;
    type Payload: Serialize + Clone + 'static;

    fn id(&self) -> RecordId;
    fn to_draft(&self) -> Self::Draft;
    fn validate(draft: &Self::Draft) -> Result<Self::Payload, FieldErrors>;

    fn facets() -> &'static [Facet];
    fn columns() -> Vec<Column<Self>>;
    fn form_fields() -> &'static [FormField];
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceState<R> {
    pub items: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<R> Default for ResourceState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResourceAction<R> {
    FetchStarted,
    Fetched(Vec<R>),
    FetchFailed(String),
    Created(R),
    Updated(R),
    Deleted(RecordId),
    MutationFailed(String),
    DismissError,
}

impl<R: Resource> Reducible for ResourceState<R> {
    type Action = ResourceAction<R>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ResourceAction::FetchStarted => next.loading = true,
            ResourceAction::Fetched(items) => {
                next.items = items;
                next.loading = false;
                next.error = None;
            }
            ResourceAction::FetchFailed(message) => {
                next.loading = false;
                next.error = Some(message);
            }
            ResourceAction::Created(record) => {
                next.items.push(record);
                next.error = None;
            }
            ResourceAction::Updated(record) => {
                let id = record.id();
                if let Some(slot) = next.items.iter_mut().find(|r| r.id() == id) {
                    *slot = record;
                }
                next.error = None;
            }
            ResourceAction::Deleted(id) => {
                next.items.retain(|r| r.id() != id);
                next.error = None;
            }
            ResourceAction::MutationFailed(message) => next.error = Some(message),
            ResourceAction::DismissError => next.error = None,
        }
        Rc::new(next)
    }
}

/// Transport used by the drivers; `ApiClient` in the browser.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError>;
    async fn create<R: Resource>(&self, payload: &R::Payload) -> Result<R, ApiError>;
    async fn update<R: Resource>(&self, id: RecordId, payload: &R::Payload)
        -> Result<R, ApiError>;
    async fn remove<R: Resource>(&self, id: RecordId) -> Result<(), ApiError>;
}

fn collection_path<R: Resource>() -> String {
    format!("{}/", R::PATH)
}

fn record_path<R: Resource>(id: RecordId) -> String {
    format!("{}/{}", R::PATH, id)
}

impl Backend for ApiClient {
    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.get_json(&collection_path::<R>()).await
    }

    async fn create<R: Resource>(&self, payload: &R::Payload) -> Result<R, ApiError> {
        self.post_json(&collection_path::<R>(), payload).await
    }

    async fn update<R: Resource>(&self, id: RecordId, payload: &R::Payload) -> Result<R, ApiError> {
        self.put_json(&record_path::<R>(id), payload).await
    }

    async fn remove<R: Resource>(&self, id: RecordId) -> Result<(), ApiError> {
        self.delete(&record_path::<R>(id)).await
    }
}

/// Liveness flag shared by a hook instance and its in-flight requests.
#[derive(Clone, Debug)]
pub struct Lifetime(Rc<Cell<bool>>);

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifetime {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn end(&self) {
        self.0.set(false);
    }
}

impl PartialEq for Lifetime {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn apply<R>(lifetime: &Lifetime, dispatch: &impl Fn(ResourceAction<R>), action: ResourceAction<R>) {
    if lifetime.is_alive() {
        dispatch(action);
    } else {
        debug!("Dropping result for {}: owner is gone", std::any::type_name::<R>());
    }
}

fn fail<R: Resource>(
    lifetime: &Lifetime,
    dispatch: &impl Fn(ResourceAction<R>),
    op: &str,
    err: &ApiError,
) -> String {
    warn!("{} {} failed: {}", op, R::PATH, err);
    let message = err.user_message();
    let action = if op == "list" {
        ResourceAction::FetchFailed(message.clone())
    } else {
        ResourceAction::MutationFailed(message.clone())
    };
    apply(lifetime, dispatch, action);
    message
}

pub async fn fetch_all<R, B>(
    backend: &B,
    lifetime: &Lifetime,
    dispatch: impl Fn(ResourceAction<R>),
) -> Result<(), ApiError>
where
    R: Resource,
    B: Backend,
{
    apply(lifetime, &dispatch, ResourceAction::FetchStarted);
    match backend.list::<R>().await {
        Ok(items) => {
            debug!("Fetched {} {}", items.len(), R::PATH);
            apply(lifetime, &dispatch, ResourceAction::Fetched(items));
            Ok(())
        }
        Err(err) => {
            fail::<R>(lifetime, &dispatch, "list", &err);
            Err(err)
        }
    }
}

pub async fn create<R, B>(
    backend: &B,
    lifetime: &Lifetime,
    dispatch: impl Fn(ResourceAction<R>),
    payload: &R::Payload,
) -> Result<R, ApiError>
where
    R: Resource,
    B: Backend,
{
    match backend.create::<R>(payload).await {
        Ok(record) => {
            apply(lifetime, &dispatch, ResourceAction::Created(record.clone()));
            Ok(record)
        }
        Err(err) => {
            fail::<R>(lifetime, &dispatch, "create", &err);
            Err(err)
        }
    }
}

pub async fn update<R, B>(
    backend: &B,
    lifetime: &Lifetime,
    dispatch: impl Fn(ResourceAction<R>),
    id: RecordId,
    payload: &R::Payload,
) -> Result<R, ApiError>
where
    R: Resource,
    B: Backend,
{
    match backend.update::<R>(id, payload).await {
        Ok(record) => {
            apply(lifetime, &dispatch, ResourceAction::Updated(record.clone()));
            Ok(record)
        }
        Err(err) => {
            fail::<R>(lifetime, &dispatch, "update", &err);
            Err(err)
        }
    }
}

pub async fn delete<R, B>(
    backend: &B,
    lifetime: &Lifetime,
    dispatch: impl Fn(ResourceAction<R>),
    id: RecordId,
) -> Result<(), ApiError>
where
    R: Resource,
    B: Backend,
{
    match backend.remove::<R>(id).await {
        Ok(()) => {
            apply(lifetime, &dispatch, ResourceAction::Deleted(id));
            Ok(())
        }
        Err(err) => {
            fail::<R>(lifetime, &dispatch, "delete", &err);
            Err(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// In-memory REST fake that assigns ids and can be told to fail.
    #[derive(Default)]
    pub struct MemoryBackend {
        pub rows: RefCell<Vec<serde_json::Value>>,
        pub next_id: Cell<RecordId>,
        pub failure: RefCell<Option<ApiError>>,
        pub calls: Cell<usize>,
    }

    impl MemoryBackend {
        pub fn fail_next(&self, err: ApiError) {
            *self.failure.borrow_mut() = Some(err);
        }

        fn take_failure(&self) -> Result<(), ApiError> {
            self.calls.set(self.calls.get() + 1);
            match self.failure.borrow_mut().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn with_id<P: Serialize>(payload: &P, id: RecordId) -> serde_json::Value {
            let mut value = serde_json::to_value(payload).expect("payload serializes");
            value["id"] = serde_json::json!(id);
            value
        }
    }

    impl Backend for MemoryBackend {
        async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
            self.take_failure()?;
            serde_json::from_value(serde_json::Value::Array(self.rows.borrow().clone()))
                .map_err(|e| ApiError::Decode(e.to_string()))
        }

        async fn create<R: Resource>(&self, payload: &R::Payload) -> Result<R, ApiError> {
            self.take_failure()?;
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            let row = Self::with_id(payload, id);
            self.rows.borrow_mut().push(row.clone());
            serde_json::from_value(row).map_err(|e| ApiError::Decode(e.to_string()))
        }

        async fn update<R: Resource>(
            &self,
            id: RecordId,
            payload: &R::Payload,
        ) -> Result<R, ApiError> {
            self.take_failure()?;
            let row = Self::with_id(payload, id);
            let mut rows = self.rows.borrow_mut();
            let slot = rows
                .iter_mut()
                .find(|r| r["id"] == serde_json::json!(id))
                .ok_or_else(|| ApiError::from_status(404, ""))?;
            *slot = row.clone();
            serde_json::from_value(row).map_err(|e| ApiError::Decode(e.to_string()))
        }

        async fn remove<R: Resource>(&self, id: RecordId) -> Result<(), ApiError> {
            self.take_failure()?;
            self.rows.borrow_mut().retain(|r| r["id"] != serde_json::json!(id));
            Ok(())
        }
    }

    /// Holds reducer state the way `use_reducer` does.
    pub struct Store<R: Resource>(pub RefCell<Rc<ResourceState<R>>>);

    impl<R: Resource> Store<R> {
        pub fn new() -> Self {
            Self(RefCell::new(Rc::new(ResourceState::default())))
        }

        pub fn dispatcher(&self) -> impl Fn(ResourceAction<R>) + '_ {
            move |action| {
                let current = self.0.borrow().clone();
                *self.0.borrow_mut() = current.reduce(action);
            }
        }

        pub fn snapshot(&self) -> ResourceState<R> {
            (**self.0.borrow()).clone()
        }
    }
}
