use crate::components::status::query_boundary;
use crate::hooks::{use_projects, use_settings};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use folio_shared::{Paginated, Project, SiteSettings};
use leptos::prelude::*;

fn hero(settings: SiteSettings) -> AnyView {
    let links = settings
        .social_links()
        .into_iter()
        .map(|(name, url)| view! { <a class="link link-hover" href=url.to_string()>{name}</a> })
        .collect_view();

    view! {
        <section class="hero min-h-[60vh]">
            <div class="hero-content text-center flex-col">
                <h1 class="text-6xl font-bold tracking-tight">
                    {settings.hero_title} " " <span class="text-primary">{settings.hero_subtitle}</span>
                </h1>
                <p class="text-xl text-base-content/70">{settings.hero_tagline}</p>
                <div class="flex gap-4">{links}</div>
            </div>
        </section>
    }
    .into_any()
}

fn featured(page: Paginated<Project>) -> AnyView {
    let featured: Vec<Project> = page.results.into_iter().filter(|p| p.featured).collect();
    if featured.is_empty() {
        return ().into_any();
    }

    view! {
        <section class="max-w-6xl mx-auto px-4 py-8">
            <h2 class="text-3xl font-bold mb-6">"Featured Work"</h2>
            <div class="grid md:grid-cols-3 gap-6">
                {featured
                    .into_iter()
                    .map(|project| view! { <ProjectCard project=project /> })
                    .collect_view()}
            </div>
        </section>
    }
    .into_any()
}

/// 作品卡片，首页与作品列表共用
#[component]
pub fn ProjectCard(project: Project) -> impl IntoView {
    let href = AppRoute::Project {
        slug: project.slug.clone(),
    }
    .to_path();

    view! {
        <Link to=href class="card bg-base-100 shadow-xl hover:shadow-2xl transition-shadow">
            <figure>
                <img src=project.thumbnail alt=project.title.clone() class="h-48 w-full object-cover" />
            </figure>
            <div class="card-body">
                <h3 class="card-title">{project.title}</h3>
                <div class="badge badge-outline">{project.category.label()}</div>
            </div>
        </Link>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let settings = use_settings();
    let projects = use_projects();

    view! {
        <div>
            {query_boundary(settings, hero)}
            {query_boundary(projects, featured)}
        </div>
    }
}
