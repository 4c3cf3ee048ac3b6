use super::widgets::*;
use crate::pages::Page;
use crate::session::use_session;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active_page={props.active_page} on_select={props.on_select.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header on_select={props.on_select.clone()} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    on_select: Callback<Page>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let session = use_session();
    let user = session.as_ref().and_then(|s| s.state().user().cloned());

    let on_login = {
        let on_select = props.on_select.clone();
        Callback::from(move |_| on_select.emit(Page::Login))
    };

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1 text-sm text-[#173E63] font-medium">{"Municipal Transparency Portal"}</div>
            <div class="flex items-center gap-4">
                {
                    match user {
                        Some(user) => html! {
                            <div class="text-right">
                                <p class="text-sm font-bold text-[#173E63]">{ user.name.clone() }</p>
                                <p class="text-[10px] text-slate-500 uppercase tracking-widest">{ user.role.label() }</p>
                            </div>
                        },
                        None => html! {
                            <button onclick={on_login} class="flex items-center gap-2 px-4 py-2 rounded-xl text-sm font-bold text-[#173E63] hover:bg-white/40 transition-colors">
                                { icon_log_in() }
                                <span>{"Staff login"}</span>
                            </button>
                        },
                    }
                }
            </div>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let session = use_session();
    let signed_in = session
        .as_ref()
        .is_some_and(|s| s.state().user().is_some());
    let can_manage_users = session
        .as_ref()
        .is_some_and(|s| s.state().can_manage_users());

    let mut nav_items = vec![
        NavItem {
            label: "Overview",
            page: Page::Overview,
            icon: icon_layout_grid,
        },
        NavItem {
            label: "Revenues",
            page: Page::Revenues,
            icon: icon_trending_up,
        },
        NavItem {
            label: "Expenses",
            page: Page::Expenses,
            icon: icon_credit_card,
        },
        NavItem {
            label: "Contracts",
            page: Page::Contracts,
            icon: icon_file_text,
        },
        NavItem {
            label: "Bids",
            page: Page::Bids,
            icon: icon_gavel,
        },
        NavItem {
            label: "Information Requests",
            page: Page::InfoRequests,
            icon: icon_inbox,
        },
        NavItem {
            label: "Staff",
            page: Page::Staff,
            icon: icon_users,
        },
    ];
    if can_manage_users {
        nav_items.push(NavItem {
            label: "Users",
            page: Page::Users,
            icon: icon_shield,
        });
    }

    let on_logout = {
        let session = session.clone();
        let on_select = props.on_select.clone();
        Callback::from(move |_| {
            if let Some(session) = &session {
                session.logout();
            }
            on_select.emit(Page::Overview);
        })
    };

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-12 h-12 bg-[#173E63] rounded-full flex items-center justify-center">
                    <img src="brasao.png" alt="Logo" class="w-full h-full object-cover rounded-full" />
                </div>
                <span class="text-[#173E63] text-xl font-black tracking-tight">{"Transparência"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items.iter().map(|item| {
                        let is_active = item.page == props.active_page;
                        let class_name = if is_active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = item.page;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                if signed_in {
                    <div class="mt-auto pt-4">
                        <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                            { icon_log_out() }
                            <span>{"Log Out"}</span>
                        </button>
                    </div>
                }
            </div>
        </div>
    }
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}
