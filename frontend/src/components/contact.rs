use crate::hooks::{use_contact, use_subscribe};
use folio_shared::{NewContactMessage, SubscribeRequest};
use leptos::prelude::*;

#[component]
pub fn ContactPage() -> impl IntoView {
    let contact = use_contact();
    let subscribe = use_subscribe();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (subject, set_subject) = signal(String::new());
    let (message, set_message) = signal(String::new());
    let (newsletter, set_newsletter) = signal(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = NewContactMessage {
            name: name.get(),
            email: email.get(),
            subject: subject.get(),
            message: message.get(),
        };
        contact.mutate_then(draft, move |sent| {
            if sent.is_some() {
                set_subject.set(String::new());
                set_message.set(String::new());
            }
        });
    };

    let on_subscribe = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        subscribe.mutate(SubscribeRequest {
            email: newsletter.get(),
        });
    };

    view! {
        <div class="max-w-2xl mx-auto px-4 py-8 space-y-10">
            <h1 class="text-4xl font-bold">"Contact"</h1>

            <form class="space-y-4" on:submit=on_submit>
                <Show when=move || contact.data().is_some()>
                    <div role="status" class="alert alert-success">"Message sent. Thank you!"</div>
                </Show>
                {move || contact.error().map(|e| view! { <div role="alert" class="alert alert-error">{e.message}</div> })}

                <input class="input input-bordered w-full" placeholder="Name" required
                    prop:value=name on:input=move |ev| set_name.set(event_target_value(&ev)) />
                <input class="input input-bordered w-full" type="email" placeholder="Email" required
                    prop:value=email on:input=move |ev| set_email.set(event_target_value(&ev)) />
                <input class="input input-bordered w-full" placeholder="Subject"
                    prop:value=subject on:input=move |ev| set_subject.set(event_target_value(&ev)) />
                <textarea class="textarea textarea-bordered w-full h-40" placeholder="Message" required
                    prop:value=message on:input=move |ev| set_message.set(event_target_value(&ev))></textarea>
                <button class="btn btn-primary" disabled=move || contact.loading()>
                    {move || if contact.loading() { "Sending..." } else { "Send" }}
                </button>
            </form>

            <form class="join w-full" on:submit=on_subscribe>
                <input class="input input-bordered join-item w-full" type="email" placeholder="Newsletter email" required
                    prop:value=newsletter on:input=move |ev| set_newsletter.set(event_target_value(&ev)) />
                <button class="btn join-item" disabled=move || subscribe.loading()>"Subscribe"</button>
            </form>
            {move || subscribe.data().map(|ack| view! { <p class="text-success">{ack.message}</p> })}
            {move || subscribe.error().map(|e| view! { <p class="text-error">{e.message}</p> })}
        </div>
    }
}
