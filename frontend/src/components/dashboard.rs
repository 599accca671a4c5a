use crate::api::UPLOAD_FIELD;
use crate::auth::use_auth;
use crate::components::status::{DegradedNotice, ErrorDisplay, LoadingIndicator};
use crate::hooks::{
    use_admin_users, use_delete_project, use_logout, use_notifications, use_projects, use_upload,
};
use crate::web::read_file;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
fn AdminNavbar() -> impl IntoView {
    let auth = use_auth();
    let logout = use_logout();

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Link to="/admin" class="btn btn-ghost text-xl">"Dashboard"</Link>
                <Link to="/admin/settings" class="btn btn-ghost">"Settings"</Link>
                <Link to="/" class="btn btn-ghost">"Site"</Link>
            </div>
            <div class="flex-none gap-2">
                <span class="badge badge-neutral hidden md:inline-flex">
                    {move || auth.user().map(|u| u.display_name()).unwrap_or_default()}
                </span>
                <button
                    on:click=move |_| logout.run()
                    disabled=move || logout.pending()
                    class="btn btn-outline btn-error"
                >
                    "Log out"
                </button>
            </div>
        </div>
    }
}

/// 管理面板：作品列表、删除、图片上传
#[component]
pub fn DashboardPage() -> impl IntoView {
    let projects = use_projects();
    let delete = use_delete_project();
    let upload = use_upload();
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let handle_delete = move |slug: String| {
        delete.mutate_then(slug, move |result| match result {
            Some(_) => {
                set_notification.set(Some(("Project deleted".to_string(), false)));
                projects.refetch();
            }
            None => set_notification.set(Some(("Failed to delete project".to_string(), true))),
        });
    };

    let on_file = move |ev: leptos::ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        spawn_local(async move {
            match read_file(&file, UPLOAD_FIELD).await {
                Ok(part) => upload.upload(part),
                Err(e) => set_notification.set(Some((e.to_string(), true))),
            }
        });
    };

    let rows = move || {
        let state = projects.state();
        if let Some(error) = state.error {
            return view! { <ErrorDisplay error=error on_retry=move |_| projects.refetch() /> }
                .into_any();
        }
        let Some(page) = state.data else {
            return view! { <LoadingIndicator /> }.into_any();
        };
        if page.results.is_empty() {
            return view! {
                <p class="text-center py-8 text-base-content/50">"No projects yet."</p>
            }
            .into_any();
        }

        view! {
            <DegradedNotice freshness=state.freshness />
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Title"</th>
                        <th>"Category"</th>
                        <th class="hidden md:table-cell">"Created"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {page
                        .results
                        .into_iter()
                        .map(|project| {
                            let slug = project.slug.clone();
                            view! {
                                <tr>
                                    <td class="font-bold">{project.title}</td>
                                    <td><div class="badge badge-outline">{project.category.label()}</div></td>
                                    <td class="hidden md:table-cell opacity-70">{project.created_at}</td>
                                    <td>
                                        <button
                                            class="btn btn-ghost btn-sm text-error"
                                            disabled=move || delete.loading()
                                            on:click=move |_| handle_delete(slug.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-7xl mx-auto space-y-8">
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || match notification.get() {
                            Some((_, true)) => "alert alert-error shadow-lg",
                            _ => "alert alert-success shadow-lg",
                        }>
                            <span>{move || notification.get().map(|(text, _)| text).unwrap_or_default()}</span>
                        </div>
                    </div>
                </Show>

                <AdminNavbar />

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Upload image"</h3>
                        <input type="file" accept="image/*" class="file-input file-input-bordered" on:change=on_file />
                        {move || upload.loading().then(|| view! { <span class="loading loading-spinner"></span> })}
                        {move || upload.state().data.map(|uploaded| view! {
                            <p class="text-sm">"Uploaded: " <a class="link" href=uploaded.url.clone()>{uploaded.filename}</a></p>
                        })}
                        {move || upload.state().error.map(|e| view! { <p class="text-error text-sm">{e.message}</p> })}
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex items-center justify-between p-6 pb-2">
                            <h3 class="card-title">"Projects"</h3>
                            <button on:click=move |_| projects.refetch() disabled=move || projects.loading() class="btn btn-ghost btn-sm">
                                "Refresh"
                            </button>
                        </div>
                        <div class="overflow-x-auto w-full">{rows}</div>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 站点设置：用户列表与通知
#[component]
pub fn AdminSettingsPage() -> impl IntoView {
    let users = use_admin_users();
    let notifications = use_notifications();

    let user_rows = move || {
        let state = users.state();
        if let Some(error) = state.error {
            return view! { <ErrorDisplay error=error on_retry=move |_| users.refetch() /> }
                .into_any();
        }
        let Some(page) = state.data else {
            return view! { <LoadingIndicator /> }.into_any();
        };
        view! {
            <p class="px-6 text-sm opacity-70">{page.count} " users"</p>
            <table class="table w-full">
                <tbody>
                    {page
                        .results
                        .into_iter()
                        .map(|user| view! {
                            <tr>
                                <td>{user.display_name()}</td>
                                <td class="opacity-70">{user.email.clone()}</td>
                                <td>{user.role.label()}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    let unread = move || {
        notifications
            .data()
            .map(|page| page.results.iter().filter(|n| !n.is_read).count())
            .unwrap_or(0)
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-7xl mx-auto space-y-8">
                <AdminNavbar />
                <div class="stats shadow bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Unread notifications"</div>
                        <div class="stat-value text-primary">{unread}</div>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <h3 class="card-title p-6 pb-2">"Users"</h3>
                        {user_rows}
                    </div>
                </div>
            </div>
        </div>
    }
}
