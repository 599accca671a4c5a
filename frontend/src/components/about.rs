use crate::components::status::query_boundary;
use crate::hooks::{use_cv, use_skills};
use folio_shared::{CvData, Skill};
use leptos::prelude::*;

fn period(start: &str, end: Option<&str>, is_current: bool) -> String {
    match (end, is_current) {
        (_, true) => format!("{start} - Present"),
        (Some(end), false) => format!("{start} - {end}"),
        (None, false) => start.to_string(),
    }
}

fn render_cv(cv: CvData) -> AnyView {
    let skills = cv
        .skills_by_category()
        .into_iter()
        .map(|(category, skills)| {
            let bars = skills
                .into_iter()
                .map(|skill| {
                    view! {
                        <div>
                            <div class="flex justify-between text-sm">
                                <span>{skill.name.clone()}</span>
                                <span>{skill.level.clone()}</span>
                            </div>
                            <progress class="progress progress-primary" value=skill.percentage max="100"></progress>
                        </div>
                    }
                })
                .collect_view();
            view! {
                <div class="space-y-2">
                    <h3 class="font-semibold">{category.to_string()}</h3>
                    {bars}
                </div>
            }
        })
        .collect_view();

    let experiences = cv
        .experiences
        .iter()
        .map(|exp| {
            view! {
                <li class="mb-4">
                    <h3 class="font-bold">{exp.title.clone()} " · " {exp.company.clone()}</h3>
                    <p class="text-sm opacity-70">
                        {period(&exp.start_date, exp.end_date.as_deref(), exp.is_current)}
                    </p>
                    <p>{exp.description.clone()}</p>
                </li>
            }
        })
        .collect_view();

    let education = cv
        .education
        .iter()
        .map(|edu| {
            view! {
                <li class="mb-4">
                    <h3 class="font-bold">{edu.degree.clone()}</h3>
                    <p class="text-sm opacity-70">
                        {edu.institution.clone()} " · "
                        {period(&edu.start_date, edu.end_date.as_deref(), edu.is_current)}
                    </p>
                </li>
            }
        })
        .collect_view();

    let languages = cv
        .languages
        .iter()
        .map(|lang| view! { <span class="badge badge-outline">{format!("{} ({})", lang.name, lang.level)}</span> })
        .collect_view();

    let info = cv.personal_info;
    view! {
        <section class="space-y-8">
            <header>
                <h1 class="text-5xl font-bold">{info.full_name}</h1>
                <p class="text-xl text-primary">{info.job_title}</p>
                <p class="mt-4 whitespace-pre-line">{info.summary}</p>
            </header>
            <div>
                <h2 class="text-2xl font-bold mb-4">"Experience"</h2>
                <ul>{experiences}</ul>
            </div>
            <div>
                <h2 class="text-2xl font-bold mb-4">"Education"</h2>
                <ul>{education}</ul>
            </div>
            <div class="grid md:grid-cols-2 gap-6">{skills}</div>
            <div class="flex flex-wrap gap-2">{languages}</div>
        </section>
    }
    .into_any()
}

fn render_skills(skills: Vec<Skill>) -> AnyView {
    if skills.is_empty() {
        return ().into_any();
    }
    view! {
        <section class="mt-8">
            <h2 class="text-2xl font-bold mb-4">"Toolbox"</h2>
            <div class="flex flex-wrap gap-2">
                {skills
                    .into_iter()
                    .map(|skill| view! { <span class="badge badge-lg">{skill.name}</span> })
                    .collect_view()}
            </div>
        </section>
    }
    .into_any()
}

#[component]
pub fn AboutPage() -> impl IntoView {
    let cv = use_cv();
    let skills = use_skills();

    view! {
        <div class="max-w-4xl mx-auto px-4 py-8">
            {query_boundary(cv, render_cv)}
            {query_boundary(skills, render_skills)}
        </div>
    }
}
