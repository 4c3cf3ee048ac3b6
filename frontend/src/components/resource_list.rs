use super::layout::page_shell;
use super::resource_form::{FormTarget, ResourceForm};
use super::widgets::*;
use crate::config::AppConfig;
use crate::filter::{distinct_values, Aggregates, FilterState};
use crate::hooks::use_resource;
use crate::resource::{CellContent, RecordId, Resource};
use crate::session::use_session;
use log::info;
use std::collections::BTreeSet;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// What the table area shows for the current collection and filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListBody {
    Loading,
    Empty,
    Rows,
}

impl ListBody {
    pub fn of(loading: bool, visible: usize) -> Self {
        if loading {
            ListBody::Loading
        } else if visible == 0 {
            ListBody::Empty
        } else {
            ListBody::Rows
        }
    }
}

/// Records with a DELETE in flight; a second request for the same id is refused.
#[derive(Debug, Default)]
pub struct PendingDeletes(BTreeSet<RecordId>);

impl PendingDeletes {
    pub fn begin(&mut self, id: RecordId) -> bool {
        self.0.insert(id)
    }

    pub fn finish(&mut self, id: RecordId) {
        self.0.remove(&id);
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.0.contains(&id)
    }
}

/// Searchable, facet-filtered table for any published resource, with
/// create/edit/delete for signed-in staff.
#[function_component(ResourceList)]
pub fn resource_list<R: Resource>() -> Html {
    let resource = use_resource::<R>();
    let session = use_session();
    let currency_symbol = use_context::<AppConfig>()
        .map(|c| c.currency_symbol)
        .unwrap_or_else(|| AppConfig::default().currency_symbol);
    let filters = use_state(FilterState::new);
    let editing = use_state(|| None::<FormTarget<R>>);
    let pending = use_mut_ref(PendingDeletes::default);
    let redraw = use_force_update();

    let can_write = session.as_ref().is_some_and(|s| {
        if R::ADMIN_ONLY {
            s.state().can_manage_users()
        } else {
            s.state().can_publish()
        }
    });

    let state = resource.state();
    let view = filters.apply(&state.items);
    let stats = Aggregates::compute(&view);

    let on_search = {
        let filters = filters.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*filters).clone();
            next.set_search(input.value());
            filters.set(next);
        })
    };

    let on_clear_filters = {
        let filters = filters.clone();
        Callback::from(move |_| filters.set(FilterState::new()))
    };

    let on_new = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(Some(FormTarget::New)))
    };

    let on_close_form = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(None))
    };

    let on_dismiss = {
        let resource = resource.clone();
        Callback::from(move |_| resource.dismiss_error())
    };

    let actions = if can_write {
        html! {
            <button onclick={on_new} class="flex items-center gap-2 bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-[11px] font-bold">
                { icon_plus() }
                <span>{ format!("New {}", R::SINGULAR.to_lowercase()) }</span>
            </button>
        }
    } else {
        html! {}
    };

    let mut cards = vec![html! {
        <StatCard title="Records" value={format_count(stats.count)} icon={StatIcon::Count} />
    }];
    if let Some(label) = R::AMOUNT_LABEL {
        cards.push(html! {
            <StatCard title={label} value={format_currency(stats.sum, &currency_symbol)} icon={StatIcon::Money} />
        });
        cards.push(html! {
            <StatCard title="Average" value={format_currency(stats.average, &currency_symbol)} icon={StatIcon::Average} />
        });
    }

    let columns = R::columns();

    let filter_bar = html! {
        <div class="bg-white p-4 rounded-[10px] shadow-sm border border-white/50 flex flex-wrap gap-3 items-end">
            <div class="flex-1 min-w-[200px] space-y-1">
                <label class="text-[12px] font-bold text-muted-foreground">{"Search"}</label>
                <input type="search" placeholder="Search..." value={filters.search().to_string()} oninput={on_search}
                    class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none" />
            </div>
            { for R::facets().iter().map(|facet| {
                let key = facet.key;
                let selected = filters.selection(key).unwrap_or_default().to_string();
                let onchange = {
                    let filters = filters.clone();
                    Callback::from(move |e: Event| {
                        let select: HtmlSelectElement = e.target_unchecked_into();
                        let mut next = (*filters).clone();
                        next.select(key, select.value());
                        filters.set(next);
                    })
                };
                html! {
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-muted-foreground">{ facet.label }</label>
                        <select {onchange} class="bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none">
                            <option value="" selected={selected.is_empty()}>{"All"}</option>
                            { for distinct_values(&state.items, key).into_iter().map(|value| html! {
                                <option value={value.clone()} selected={value == selected}>{ value }</option>
                            }) }
                        </select>
                    </div>
                }
            }) }
            if filters.is_active() {
                <button onclick={on_clear_filters} class="bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-[10px] text-[11px] font-bold">
                    {"Clear filters"}
                </button>
            }
        </div>
    };

    let body = match ListBody::of(state.loading, view.len()) {
        ListBody::Loading => html! {
            <p class="px-8 py-6 text-center text-muted-foreground">{"Loading..."}</p>
        },
        ListBody::Empty => html! {
            <p class="px-8 py-6 text-center text-muted-foreground">{"No records found."}</p>
        },
        ListBody::Rows => html! {
            <div class="overflow-x-auto">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                            { for columns.iter().map(|column| html! {
                                <th class="px-6 py-4 font-bold">{ column.header }</th>
                            }) }
                            if can_write {
                                <th class="px-6 py-4 font-bold">{"Action"}</th>
                            }
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        { for view.iter().map(|record| {
                            let id = record.id();
                            let deleting = pending.borrow().contains(id);
                            let on_edit = {
                                let editing = editing.clone();
                                let record = (*record).clone();
                                Callback::from(move |_| editing.set(Some(FormTarget::Existing(record.clone()))))
                            };
                            let on_delete = {
                                let resource = resource.clone();
                                let pending = pending.clone();
                                let redraw = redraw.clone();
                                Callback::from(move |_| {
                                    if pending.borrow().contains(id) {
                                        return;
                                    }
                                    let confirmed = web_sys::window()
                                        .and_then(|w| w.confirm_with_message(&format!("Delete this {}?", R::SINGULAR.to_lowercase())).ok())
                                        .unwrap_or(false);
                                    if !confirmed || !pending.borrow_mut().begin(id) {
                                        return;
                                    }
                                    redraw.force_update();

                                    let resource = resource.clone();
                                    let pending = pending.clone();
                                    let redraw = redraw.clone();
                                    spawn_local(async move {
                                        if resource.delete(id).await.is_ok() {
                                            info!("Deleted {} {}", R::PATH, id);
                                        }
                                        pending.borrow_mut().finish(id);
                                        redraw.force_update();
                                    });
                                })
                            };
                            html! {
                                <tr key={id.to_string()} class="text-sm hover:bg-muted/40 transition-colors">
                                    { for columns.iter().map(|column| html! {
                                        <td class="px-6 py-4 text-foreground">{ render_cell((column.value)(record), &currency_symbol) }</td>
                                    }) }
                                    if can_write {
                                        <td class="px-6 py-4 whitespace-nowrap">
                                            <button onclick={on_edit} disabled={deleting} class="text-[#1D617A] text-xs font-bold mr-3">{"Edit"}</button>
                                            <button onclick={on_delete} disabled={deleting} class="text-red-600 text-xs font-bold">
                                                { if deleting { "Deleting..." } else { "Delete" } }
                                            </button>
                                        </td>
                                    }
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            </div>
        },
    };

    let form = (*editing).clone().map(|target| {
        let key = form_key(&target);
        html! {
            <ResourceForm<R> key={key} handle={resource.clone()} {target} on_close={on_close_form} />
        }
    });

    html! {
        { page_shell(
            R::TITLE,
            actions,
            html! {
                <>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                        { for cards }
                    </div>

                    { filter_bar }

                    if let Some(message) = &state.error {
                        <div class="flex items-center justify-between bg-red-50 border border-red-200 text-red-700 text-sm px-4 py-3 rounded-[10px]">
                            <span>{ message.clone() }</span>
                            <button onclick={on_dismiss} class="text-xs font-bold">{"Dismiss"}</button>
                        </div>
                    }

                    { form }

                    <div class="bg-card rounded-2xl shadow-md border border-border overflow-hidden">
                        { body }
                    </div>
                </>
            }
        ) }
    }
}

fn form_key<R: Resource>(target: &FormTarget<R>) -> String {
    match target {
        FormTarget::New => "new".to_string(),
        FormTarget::Existing(record) => record.id().to_string(),
    }
}

fn render_cell(cell: CellContent, currency_symbol: &str) -> Html {
    match cell {
        CellContent::Text(text) => html! { { text } },
        CellContent::Money(amount) => html! {
            <span class="font-semibold">{ format_currency(amount, currency_symbol) }</span>
        },
        CellContent::Badge(label) => badge(&label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::{Expense, ExpenseCategory, ExpenseStatus};
    use crate::resource::{ResourceAction, ResourceState};
    use chrono::NaiveDate;
    use std::rc::Rc;
    use yew::Reducible;

    fn expense(id: RecordId, description: &str) -> Expense {
        Expense {
            id,
            description: description.into(),
            supplier: "Fornecedor".into(),
            category: ExpenseCategory::Health,
            amount: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            status: ExpenseStatus::Paid,
        }
    }

    #[test]
    fn loading_placeholder_wins_over_everything() {
        assert_eq!(ListBody::of(true, 0), ListBody::Loading);
        assert_eq!(ListBody::of(true, 3), ListBody::Loading);
    }

    #[test]
    fn search_without_matches_shows_no_records() {
        let items = vec![expense(1, "Vacinas"), expense(2, "Merenda")];
        let mut filters = FilterState::new();
        filters.set_search("asfalto");
        let view = filters.apply(&items);
        assert_eq!(ListBody::of(false, view.len()), ListBody::Empty);

        filters.set_search("vacina");
        assert_eq!(ListBody::of(false, filters.apply(&items).len()), ListBody::Rows);
    }

    #[test]
    fn failed_fetch_ends_in_empty_body_with_banner() {
        let state = Rc::new(ResourceState::<Expense>::default())
            .reduce(ResourceAction::FetchStarted);
        assert_eq!(ListBody::of(state.loading, state.items.len()), ListBody::Loading);

        let state = state.reduce(ResourceAction::FetchFailed("Could not reach the server.".into()));
        assert_eq!(ListBody::of(state.loading, state.items.len()), ListBody::Empty);
        assert_eq!(state.error.as_deref(), Some("Could not reach the server."));
    }

    #[test]
    fn second_delete_of_same_record_is_refused_until_finished() {
        let mut pending = PendingDeletes::default();
        assert!(pending.begin(7));
        assert!(!pending.begin(7));
        assert!(pending.begin(8));
        assert!(pending.contains(7));

        pending.finish(7);
        assert!(!pending.contains(7));
        assert!(pending.begin(7));
    }

    #[test]
    fn form_is_keyed_by_its_target() {
        assert_eq!(form_key::<Expense>(&FormTarget::New), "new");
        assert_eq!(form_key(&FormTarget::Existing(expense(42, "Vacinas"))), "42");
    }
}
