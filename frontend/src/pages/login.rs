use crate::components::widgets::icon_log_in;
use crate::draft;
use crate::form::{FormPhase, FormState, SubmitRejected};
use crate::hooks::use_api_client;
use crate::session::{self, use_session, BrowserTokens};
use crate::validation::{email, required, FieldErrors};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

draft!(LoginDraft { email, password });

/// Shape checks only; the server decides whether the credentials are right.
fn validate(draft: &LoginDraft) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = email(&mut errors, "email", &draft.email);
    required(&mut errors, "password", &draft.password);
    let password = draft.password.clone();
    errors.finish(|| (email, password))
}

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
    pub on_done: Callback<()>,
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let client = use_api_client();
    let session = use_session();
    let form = use_mut_ref(|| FormState::new(LoginDraft::default()));
    let redraw = use_force_update();

    let expired = session.as_ref().is_some_and(|s| s.state().expired);

    let on_input = |field: &'static str| {
        let form = form.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.borrow_mut().edit(field, input.value());
            redraw.force_update();
        })
    };

    let on_submit = {
        let form = form.clone();
        let redraw = redraw.clone();
        let on_done = props.on_done.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (email, password) = match form.borrow_mut().begin_submit(validate) {
                Ok(credentials) => credentials,
                Err(SubmitRejected::Busy) => return,
                Err(_) => {
                    redraw.force_update();
                    return;
                }
            };
            redraw.force_update();

            let form = form.clone();
            let redraw = redraw.clone();
            let client = client.clone();
            let session = session.clone();
            let on_done = on_done.clone();
            spawn_local(async move {
                let result = session::login(&client, &BrowserTokens, &email, &password).await;
                let outcome = match result {
                    Ok(user) => {
                        if let Some(session) = &session {
                            session.signed_in(user);
                        }
                        Ok(())
                    }
                    Err(err) => Err(err.user_message()),
                };
                form.borrow_mut().finish_submit(outcome);
                if form.borrow().phase() == FormPhase::Closed {
                    on_done.emit(());
                } else {
                    redraw.force_update();
                }
            });
        })
    };

    let state = form.borrow();
    let busy = state.is_busy();
    let field_error = |field: &str| {
        state
            .errors()
            .get(field)
            .map(|message| html! { <p class="text-xs text-red-500">{ message.to_string() }</p> })
    };

    html! {
        <div class="flex items-center justify-center min-h-full p-6">
            <form onsubmit={on_submit} novalidate=true class="w-full max-w-sm bg-white p-8 rounded-[16px] shadow-md border border-white/50 space-y-4">
                <div class="flex items-center gap-2 text-[#173E63]">
                    { icon_log_in() }
                    <h2 class="text-lg font-bold">{"Staff login"}</h2>
                </div>
                if expired {
                    <p class="text-sm bg-amber-50 border border-amber-200 text-amber-800 px-3 py-2 rounded-[10px]">
                        {"Your session has expired. Please sign in again."}
                    </p>
                }
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Email"}</label>
                    <input type="email" autocomplete="username" value={state.draft().email.clone()} oninput={on_input("email")} disabled={busy}
                        class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none" />
                    { field_error("email") }
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Password"}</label>
                    <input type="password" autocomplete="current-password" value={state.draft().password.clone()} oninput={on_input("password")} disabled={busy}
                        class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none" />
                    { field_error("password") }
                </div>
                if let Some(message) = state.submit_error() {
                    <p class="text-sm text-red-500">{ message.to_string() }</p>
                }
                <button type="submit" disabled={busy} class="w-full bg-[#173E63] text-white py-2 rounded-[10px] text-[12px] font-bold">
                    { if busy { "Signing in..." } else { "Sign in" } }
                </button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_fields_are_checked_before_any_request() {
        let errors = validate(&LoginDraft {
            email: "ana".into(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "password"]);
    }

    #[test]
    fn password_is_sent_untrimmed() {
        let (email, password) = validate(&LoginDraft {
            email: " ana@pm.gov.br ".into(),
            password: " s3cret ".into(),
        })
        .unwrap();
        assert_eq!(email, "ana@pm.gov.br");
        assert_eq!(password, " s3cret ");
    }
}
