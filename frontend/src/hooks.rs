use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::resource::{self, Lifetime, RecordId, Resource, ResourceAction, ResourceState};
use crate::session::{use_session, SessionHandle};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Collection state plus CRUD operations for one resource.
pub struct ResourceHandle<R: Resource> {
    state: UseReducerHandle<ResourceState<R>>,
    client: ApiClient,
    lifetime: Lifetime,
    session: Option<SessionHandle>,
}

impl<R: Resource> Clone for ResourceHandle<R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            client: self.client.clone(),
            lifetime: self.lifetime.clone(),
            session: self.session.clone(),
        }
    }
}

impl<R: Resource> PartialEq for ResourceHandle<R> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.lifetime == other.lifetime
    }
}

impl<R: Resource> ResourceHandle<R> {
    pub fn state(&self) -> &ResourceState<R> {
        &self.state
    }

    fn dispatcher(&self) -> impl Fn(ResourceAction<R>) {
        let state = self.state.clone();
        move |action| state.dispatch(action)
    }

    fn check_auth<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let (Err(ApiError::Unauthorized), Some(session)) = (&result, &self.session) {
            if self.lifetime.is_alive() {
                session.expire();
            }
        }
        result
    }

    /// Reloads the collection in the background.
    pub fn fetch_all(&self) {
        let handle = self.clone();
        spawn_local(async move {
            let result =
                resource::fetch_all::<R, _>(&handle.client, &handle.lifetime, handle.dispatcher())
                    .await;
            let _ = handle.check_auth(result);
        });
    }

    pub async fn create(&self, payload: R::Payload) -> Result<R, ApiError> {
        let result =
            resource::create::<R, _>(&self.client, &self.lifetime, self.dispatcher(), &payload)
                .await;
        self.check_auth(result)
    }

    pub async fn update(&self, id: RecordId, payload: R::Payload) -> Result<R, ApiError> {
        let result = resource::update::<R, _>(
            &self.client,
            &self.lifetime,
            self.dispatcher(),
            id,
            &payload,
        )
        .await;
        self.check_auth(result)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        let result =
            resource::delete::<R, _>(&self.client, &self.lifetime, self.dispatcher(), id).await;
        self.check_auth(result)
    }

    pub fn dismiss_error(&self) {
        self.state.dispatch(ResourceAction::DismissError);
    }
}

#[hook]
pub fn use_api_client() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new(AppConfig::default()))
}

/// Loads `R` on mount and keeps it in memory for the component's lifetime.
#[hook]
pub fn use_resource<R>() -> ResourceHandle<R>
where
    R: Resource,
{
    let client = use_api_client();
    let session = use_session();
    let state = use_reducer(ResourceState::<R>::default);
    let lifetime = (*use_state(Lifetime::new)).clone();

    {
        let lifetime = lifetime.clone();
        use_effect_with_deps(move |_| move || lifetime.end(), ());
    }

    let handle = ResourceHandle {
        state,
        client,
        lifetime,
        session,
    };

    {
        let handle = handle.clone();
        use_effect_with_deps(
            move |_| {
                handle.fetch_all();
                || ()
            },
            (),
        );
    }

    handle
}
