mod api;
mod components;
mod config;
mod error;
mod filter;
mod form;
mod hooks;
mod models;
mod pages;
mod resource;
mod session;
mod storage;
mod validation;

use api::ApiClient;
use components::layout::Layout;
use components::resource_list::ResourceList;
use config::AppConfig;
use log::info;
use models::bid::Bid;
use models::contract::Contract;
use models::expense::Expense;
use models::info_request::InfoRequest;
use models::revenue::Revenue;
use models::staff::StaffMember;
use models::user::User;
use pages::login::LoginPage;
use pages::overview::OverviewPage;
use pages::Page;
use session::{BrowserTokens, SessionHandle, SessionState, SessionStatus};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
struct AppProps {
    config: AppConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let active_page = use_state(|| Page::Overview);
    let client = use_state(|| ApiClient::new(props.config.clone()));
    let session = SessionHandle::new(use_reducer(SessionState::default));
    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    {
        let client = (*client).clone();
        let session = session.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let user = session::restore(&client, &BrowserTokens).await;
                    session.restored(user);
                });
                || ()
            },
            (),
        );
    }

    {
        let active_page = active_page.clone();
        use_effect_with_deps(
            move |expired| {
                if *expired {
                    active_page.set(Page::Login);
                }
                || ()
            },
            session.state().expired,
        );
    }

    if session.state().status == SessionStatus::Checking {
        return html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"Checking session..."}
            </div>
        };
    }

    let can_manage_users = session.state().can_manage_users();
    let content = match *active_page {
        Page::Overview => html! { <OverviewPage /> },
        Page::Revenues => html! { <ResourceList<Revenue> /> },
        Page::Expenses => html! { <ResourceList<Expense> /> },
        Page::Contracts => html! { <ResourceList<Contract> /> },
        Page::Bids => html! { <ResourceList<Bid> /> },
        Page::InfoRequests => html! { <ResourceList<InfoRequest> /> },
        Page::Staff => html! { <ResourceList<StaffMember> /> },
        Page::Users if can_manage_users => html! { <ResourceList<User> /> },
        Page::Users => html! {
            <div class="p-6 text-sm text-muted-foreground">{"Only administrators can manage users."}</div>
        },
        Page::Login => {
            let active_page = active_page.clone();
            html! { <LoginPage on_done={Callback::from(move |_| active_page.set(Page::Overview))} /> }
        }
    };

    html! {
        <ContextProvider<AppConfig> context={props.config.clone()}>
            <ContextProvider<ApiClient> context={(*client).clone()}>
                <ContextProvider<SessionHandle> context={session}>
                    <Layout active_page={*active_page} on_select={on_select}>
                        { content }
                    </Layout>
                </ContextProvider<SessionHandle>>
            </ContextProvider<ApiClient>>
        </ContextProvider<AppConfig>>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::new(config::log_level()));
    let config = AppConfig::load();
    info!(
        "Transparency portal starting (api: {}, log level: {})",
        config.api_base_url, config.log_level
    );
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
