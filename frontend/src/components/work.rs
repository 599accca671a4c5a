use crate::components::home::ProjectCard;
use crate::components::status::{DegradedNotice, ErrorDisplay, LoadingIndicator};
use crate::hooks::use_projects;
use folio_shared::Category;
use leptos::prelude::*;

const FILTERS: [Option<Category>; 4] = [
    None,
    Some(Category::Development),
    Some(Category::Drone),
    Some(Category::Mixed),
];

#[component]
pub fn WorkPage() -> impl IntoView {
    let projects = use_projects();
    let (filter, set_filter) = signal(Option::<Category>::None);

    let tabs = FILTERS
        .into_iter()
        .map(|category| {
            let label = category.map_or("All", |c| c.label());
            view! {
                <a
                    role="tab"
                    class=move || if filter.get() == category { "tab tab-active" } else { "tab" }
                    on:click=move |_| set_filter.set(category)
                >
                    {label}
                </a>
            }
        })
        .collect_view();

    let content = move || {
        let state = projects.state();
        if let Some(error) = state.error {
            return view! { <ErrorDisplay error=error on_retry=move |_| projects.refetch() /> }
                .into_any();
        }
        let Some(page) = state.data else {
            return view! { <LoadingIndicator /> }.into_any();
        };

        let selected = filter.get();
        let cards = page
            .results
            .into_iter()
            .filter(|p| selected.is_none_or(|c| p.category == c))
            .map(|project| view! { <ProjectCard project=project /> })
            .collect_view();

        view! {
            <DegradedNotice freshness=state.freshness />
            <div class="grid md:grid-cols-3 gap-6">{cards}</div>
        }
        .into_any()
    };

    view! {
        <div class="max-w-6xl mx-auto px-4 py-8 space-y-6">
            <h1 class="text-4xl font-bold">"Work"</h1>
            <div role="tablist" class="tabs tabs-boxed">{tabs}</div>
            {content}
        </div>
    }
}
