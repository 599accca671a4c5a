//! 请求状态展示：加载中、错误（可重试）、离线数据提示

use crate::error::{ApiError, NETWORK_ERROR_STATUS};
use crate::hooks::QueryHandle;
use crate::query::{Freshness, QueryStatus};
use folio_shared::Resource;
use leptos::prelude::*;

#[component]
pub fn LoadingIndicator() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-16">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 错误信息与重试按钮；状态码为 0（网络失败）时不显示状态码
#[component]
pub fn ErrorDisplay(error: ApiError, #[prop(into)] on_retry: Callback<()>) -> impl IntoView {
    let status = (error.status != NETWORK_ERROR_STATUS).then_some(error.status);

    view! {
        <div role="alert" class="alert alert-error my-4">
            <div class="flex flex-col">
                <span class="font-semibold">{error.message}</span>
                {status.map(|code| view! { <span class="text-sm opacity-70">"Status " {code}</span> })}
            </div>
            <button class="btn btn-sm" on:click=move |_| on_retry.run(())>
                "Retry"
            </button>
        </div>
    }
}

/// 数据并非来自本次请求时的提示
#[component]
pub fn DegradedNotice(freshness: Freshness) -> impl IntoView {
    let text = match freshness {
        Freshness::Cached { stale: true, .. } => Some("Offline: showing saved content that may be out of date."),
        Freshness::Cached { .. } => Some("Offline: showing saved content."),
        Freshness::Fallback => Some("Offline: content is temporarily unavailable."),
        Freshness::Live | Freshness::Initial => None,
    };

    text.map(|text| {
        view! {
            <div role="status" class="alert alert-warning text-sm py-2 my-2">
                <span>{text}</span>
            </div>
        }
    })
}

/// 按查询状态选择视图：加载中 / 错误 / 数据
pub fn query_boundary<R: Resource + Clone + 'static>(
    query: QueryHandle<R>,
    render: fn(R) -> AnyView,
) -> impl IntoView {
    move || {
        let state = query.state();
        let status = state.status();
        match (state.error, state.data) {
            (Some(error), _) => view! {
                <ErrorDisplay error=error on_retry=move |_| query.refetch() />
            }
            .into_any(),
            (None, Some(data)) => view! {
                <DegradedNotice freshness=state.freshness />
                {render(data)}
            }
            .into_any(),
            (None, None) if status == QueryStatus::Loading => view! { <LoadingIndicator /> }.into_any(),
            (None, None) => ().into_any(),
        }
    }
}
