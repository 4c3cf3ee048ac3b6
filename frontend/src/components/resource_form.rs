use crate::form::{Draft, FormPhase, FormState, SubmitRejected};
use crate::hooks::ResourceHandle;
use crate::resource::{FieldKind, FormField, Resource};
use log::debug;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

/// What the open form is editing.
#[derive(Clone, PartialEq)]
pub enum FormTarget<R> {
    New,
    Existing(R),
}

#[derive(Properties, PartialEq)]
pub struct ResourceFormProps<R: Resource> {
    pub handle: ResourceHandle<R>,
    pub target: FormTarget<R>,
    pub on_close: Callback<()>,
}

const INPUT_CLASS: &str =
    "w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none";

#[function_component(ResourceForm)]
pub fn resource_form<R: Resource>(props: &ResourceFormProps<R>) -> Html {
    let form = {
        let target = props.target.clone();
        use_mut_ref(move || {
            FormState::new(match &target {
                FormTarget::New => R::Draft::default(),
                FormTarget::Existing(record) => record.to_draft(),
            })
        })
    };
    let redraw = use_force_update();

    let on_input = {
        let form = form.clone();
        let redraw = redraw.clone();
        Callback::from(move |(field, value): (&'static str, String)| {
            form.borrow_mut().edit(field, value);
            redraw.force_update();
        })
    };

    let on_submit = {
        let form = form.clone();
        let redraw = redraw.clone();
        let handle = props.handle.clone();
        let target = props.target.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = match form.borrow_mut().begin_submit(R::validate) {
                Ok(payload) => payload,
                Err(SubmitRejected::Busy) => {
                    debug!("Ignoring repeated submit for {}", R::PATH);
                    return;
                }
                Err(_) => {
                    redraw.force_update();
                    return;
                }
            };
            redraw.force_update();

            let form = form.clone();
            let redraw = redraw.clone();
            let handle = handle.clone();
            let target = target.clone();
            let on_close = on_close.clone();
            spawn_local(async move {
                let result = match &target {
                    FormTarget::New => handle.create(payload).await,
                    FormTarget::Existing(record) => handle.update(record.id(), payload).await,
                };
                form.borrow_mut()
                    .finish_submit(result.map(|_| ()).map_err(|err| err.user_message()));
                if form.borrow().phase() == FormPhase::Closed {
                    on_close.emit(());
                } else {
                    redraw.force_update();
                }
            });
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let form = form.borrow();
    let busy = form.is_busy();
    let heading = match &props.target {
        FormTarget::New => format!("New {}", R::SINGULAR.to_lowercase()),
        FormTarget::Existing(_) => format!("Edit {}", R::SINGULAR.to_lowercase()),
    };

    html! {
        <form onsubmit={on_submit} class="bg-white p-5 rounded-[10px] shadow-sm border border-white/50" novalidate=true>
            <h4 class="text-[#1D617A] font-bold text-[15px] mb-3 tracking-wider">{ heading }</h4>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-3 mb-4">
                { for R::form_fields().iter().map(|field| {
                    let value = form.draft().field(field.name).to_string();
                    let error = form.errors().get(field.name).map(str::to_string);
                    html! {
                        <div class="space-y-1">
                            <label class="text-[12px] font-bold text-muted-foreground">{ field.label }</label>
                            { field_input(field, value, busy, on_input.clone()) }
                            if let Some(error) = error {
                                <p class="text-xs text-red-500">{ error }</p>
                            }
                        </div>
                    }
                }) }
            </div>
            if let Some(message) = form.submit_error() {
                <p class="text-sm text-red-500 mb-3">{ message.to_string() }</p>
            }
            <div class="flex gap-3">
                <button type="submit" disabled={busy} class="flex-1 bg-[#173E63] text-white py-2 rounded-[10px] text-[11px] font-bold">
                    { if busy { "Saving..." } else { "Save" } }
                </button>
                <button type="button" onclick={on_cancel} disabled={busy} class="flex-1 bg-[#B2CBDE] text-[#173E63] py-2 rounded-[10px] text-[11px] font-bold">
                    {"Cancel"}
                </button>
            </div>
        </form>
    }
}

fn field_input(
    field: &FormField,
    value: String,
    disabled: bool,
    on_input: Callback<(&'static str, String)>,
) -> Html {
    let name = field.name;
    match field.kind {
        FieldKind::TextArea => {
            let oninput = Callback::from(move |e: InputEvent| {
                let input: HtmlTextAreaElement = e.target_unchecked_into();
                on_input.emit((name, input.value()));
            });
            html! { <textarea {name} {value} {oninput} {disabled} rows="3" class={INPUT_CLASS} /> }
        }
        FieldKind::Select(options) => {
            let onchange = Callback::from(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                on_input.emit((name, select.value()));
            });
            html! {
                <select {name} {onchange} {disabled} class={INPUT_CLASS}>
                    <option value="" selected={value.is_empty()}>{"Select..."}</option>
                    { for options.iter().map(|(option, label)| html! {
                        <option value={*option} selected={value == *option}>{ *label }</option>
                    }) }
                </select>
            }
        }
        kind => {
            let (input_type, inputmode) = match kind {
                FieldKind::Number => ("text", Some("decimal")),
                FieldKind::Date => ("date", None),
                FieldKind::Email => ("email", None),
                _ => ("text", None),
            };
            let oninput = Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                on_input.emit((name, input.value()));
            });
            html! {
                <input type={input_type} {name} {value} {inputmode} {oninput} {disabled} class={INPUT_CLASS} />
            }
        }
    }
}
