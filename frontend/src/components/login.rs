use crate::hooks::{use_login, use_register};
use folio_shared::{LoginRequest, RegisterRequest};
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

/// 登录 / 注册页面
///
/// 成功后会话状态变化，路由服务自动离开此页面，无需手动导航。
#[component]
pub fn AuthPage() -> impl IntoView {
    let login = use_login();
    let register = use_register();

    let (mode, set_mode) = signal(Mode::Login);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (password_confirm, set_password_confirm) = signal(String::new());
    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (local_error, set_local_error) = signal(Option::<String>::None);

    let is_submitting = move || login.loading() || register.loading();
    let error_msg = move || {
        local_error.get().or_else(|| match mode.get() {
            Mode::Login => login.error().map(|e| e.message),
            Mode::Register => register.error().map(|e| e.message),
        })
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_local_error.set(None);

        if email.get().is_empty() || password.get().is_empty() {
            set_local_error.set(Some("Please fill in all fields".to_string()));
            return;
        }

        match mode.get() {
            Mode::Login => login.mutate(LoginRequest {
                email: email.get(),
                password: password.get(),
            }),
            Mode::Register => {
                let request = RegisterRequest {
                    email: email.get(),
                    password: password.get(),
                    password_confirm: password_confirm.get(),
                    first_name: first_name.get(),
                    last_name: last_name.get(),
                };
                if !request.passwords_match() {
                    set_local_error.set(Some("Passwords do not match".to_string()));
                    return;
                }
                register.mutate(request);
            }
        }
    };

    let toggle_mode = move |_| {
        set_local_error.set(None);
        login.reset();
        register.reset();
        set_mode.update(|m| {
            *m = match m {
                Mode::Login => Mode::Register,
                Mode::Register => Mode::Login,
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">
                    {move || if mode.get() == Mode::Login { "Welcome back" } else { "Create an account" }}
                </h1>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <Show when=move || mode.get() == Mode::Register>
                            <div class="grid grid-cols-2 gap-2">
                                <input class="input input-bordered" placeholder="First name"
                                    prop:value=first_name on:input=move |ev| set_first_name.set(event_target_value(&ev)) />
                                <input class="input input-bordered" placeholder="Last name"
                                    prop:value=last_name on:input=move |ev| set_last_name.set(event_target_value(&ev)) />
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <Show when=move || mode.get() == Mode::Register>
                            <div class="form-control">
                                <label class="label" for="password_confirm">
                                    <span class="label-text">"Confirm password"</span>
                                </label>
                                <input
                                    id="password_confirm"
                                    type="password"
                                    on:input=move |ev| set_password_confirm.set(event_target_value(&ev))
                                    prop:value=password_confirm
                                    class="input input-bordered"
                                />
                            </div>
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_submitting>
                                {move || if is_submitting() {
                                    view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any()
                                } else if mode.get() == Mode::Login {
                                    "Sign in".into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <button type="button" class="btn btn-link" on:click=toggle_mode>
                            {move || if mode.get() == Mode::Login { "No account? Register" } else { "Have an account? Sign in" }}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
