use crate::auth::use_auth;
use crate::components::status::query_boundary;
use crate::hooks::{LikeRef, use_project, use_toggle_like};
use folio_shared::{LikeTarget, MediaType, Project};
use leptos::prelude::*;

fn render_project(project: Project) -> AnyView {
    let media = project
        .ordered_media()
        .into_iter()
        .map(|item| match item.media_type {
            MediaType::Image => view! { <img src=item.url.clone() class="rounded-box w-full" /> }.into_any(),
            MediaType::Video => view! { <video src=item.url.clone() controls=true class="rounded-box w-full"></video> }.into_any(),
        })
        .collect_view();
    let technologies = project
        .technologies
        .iter()
        .map(|tech| view! { <span class="badge badge-ghost">{tech.clone()}</span> })
        .collect_view();

    view! {
        <article class="space-y-6">
            <header>
                <div class="badge badge-primary">{project.category.label()}</div>
                <h1 class="text-5xl font-bold mt-2">{project.title.clone()}</h1>
            </header>
            <img src=project.thumbnail.clone() alt=project.title.clone() class="rounded-box w-full" />
            <p class="text-lg whitespace-pre-line">{project.description.clone()}</p>
            <div class="flex flex-wrap gap-2">{technologies}</div>
            <div class="grid gap-4">{media}</div>
            <LikeButton project=project />
        </article>
    }
    .into_any()
}

/// 登录用户可为作品点赞
#[component]
fn LikeButton(project: Project) -> impl IntoView {
    let auth = use_auth();
    let like = use_toggle_like();
    let target = LikeRef {
        target: LikeTarget::Project,
        id: project.id,
    };

    let label = move || match like.data() {
        Some(toggle) if toggle.liked => "Liked",
        _ => "Like",
    };

    view! {
        <Show when=move || auth.state.with(|s| s.is_authenticated())>
            {
                let target = target.clone();
                view! {
                    <button
                        class="btn btn-outline btn-secondary"
                        disabled=move || like.loading()
                        on:click=move |_| like.mutate(target.clone())
                    >
                        {label}
                    </button>
                }
            }
        </Show>
    }
}

#[component]
pub fn ProjectDetailPage(slug: String) -> impl IntoView {
    let project = use_project(move || Some(slug.clone()));

    view! {
        <div class="max-w-4xl mx-auto px-4 py-8">
            {query_boundary(project, render_project)}
        </div>
    }
}
