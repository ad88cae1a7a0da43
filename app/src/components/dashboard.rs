use crate::api::{list_regions, region_details};
use crate::components_impl::{
    BAR_COLOR, CHART_HEIGHT, CHART_WIDTH, PLACEHOLDER_TITLE, axis_span, bar_layout, baseline_y,
    chart_title, detail_lines, selection_from_value, svg_num,
};
use crate::projection::{ChartBar, RegionDetails};
use leptos::prelude::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let regions_resource = Resource::new(|| (), |()| async { list_regions().await });
    let (selected, set_selected) = signal::<Option<String>>(None);
    let details_resource = Resource::new(
        move || selected.get(),
        |selected| async move {
            match selected {
                Some(name) => region_details(name).await,
                None => Ok(None),
            }
        },
    );

    view! {
        <div class="dashboard">
            <h1 class="dashboard-title">"Health Risk Analytics Dashboard"</h1>

            <div class="dashboard-select">
                <Suspense fallback=move || view! { <p class="muted">"Loading cities..."</p> }>
                    {move || {
                        regions_resource
                            .get()
                            .map(|result| match result {
                                Ok(names) => {
                                    view! {
                                        <RegionSelect
                                            names=names
                                            on_select={move |name: Option<String>| set_selected.set(name)}
                                        />
                                    }
                                        .into_any()
                                }
                                Err(e) => {
                                    view! { <p class="error">"Error: " {e.to_string()}</p> }
                                        .into_any()
                                }
                            })
                    }}
                </Suspense>
            </div>

            <Suspense fallback=move || view! { <ChartPlaceholder/> }>
                {move || {
                    details_resource
                        .get()
                        .map(|result| match result {
                            Ok(Some(details)) => view! { <RegionView details=details/> }.into_any(),
                            Ok(None) => view! { <ChartPlaceholder/> }.into_any(),
                            Err(e) => {
                                view! { <p class="error">"Error: " {e.to_string()}</p> }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn RegionSelect(
    names: Vec<String>,
    on_select: impl Fn(Option<String>) + 'static + Copy,
) -> impl IntoView {
    view! {
        <select
            class="region-select"
            on:change=move |ev| on_select(selection_from_value(&event_target_value(&ev)))
        >
            <option value="">"Select a City"</option>
            {names
                .into_iter()
                .map(|name| {
                    let value = name.clone();
                    view! { <option value=value>{name}</option> }
                })
                .collect_view()}
        </select>
    }
}

#[component]
fn RegionView(details: RegionDetails) -> impl IntoView {
    let name = details.row.name.clone();
    let lines = detail_lines(&details.row);

    view! {
        <div class="region">
            <div class="details-card">
                <h2 class="details-title">{name.clone()}</h2>
                {lines
                    .into_iter()
                    .map(|(label, value)| view! { <p>{label}": "{value}</p> })
                    .collect_view()}
            </div>

            {match details.chart_error {
                Some(reason) => {
                    view! {
                        <div class="chart-card">
                            <h3 class="chart-title">{chart_title(&name)}</h3>
                            <p class="muted">"Chart unavailable: " {reason}</p>
                        </div>
                    }
                        .into_any()
                }
                None => view! { <MetricsChart title=chart_title(&name) bars=details.chart/> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn MetricsChart(title: String, bars: Vec<ChartBar>) -> impl IntoView {
    let layout = bar_layout(&bars);
    let baseline = svg_num(baseline_y());
    let (axis_start, axis_end) = axis_span();

    view! {
        <div class="chart-card">
            <h3 class="chart-title">{title}</h3>
            <svg class="chart" viewBox=format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}")>
                <line
                    x1=svg_num(axis_start) x2=svg_num(axis_end) y1=baseline.clone() y2=baseline.clone()
                    stroke="#2C3E50" stroke-width="1"
                />
                {layout
                    .into_iter()
                    .map(|bar| {
                        let cx = svg_num(bar.center_x());
                        let label_y = svg_num(baseline_y() + 14.0);
                        let rotate = format!("rotate(-35 {cx} {label_y})");
                        view! {
                            <g>
                                <rect
                                    x=svg_num(bar.x) y=svg_num(bar.y)
                                    width=svg_num(bar.width) height=svg_num(bar.height)
                                    fill=BAR_COLOR
                                />
                                <text x=cx.clone() y=svg_num(bar.y - 6.0) text-anchor="middle" class="chart-value">
                                    {bar.value_text}
                                </text>
                                <text x=cx y=label_y text-anchor="end" transform=rotate class="chart-label">
                                    {bar.label}
                                </text>
                            </g>
                        }
                    })
                    .collect_view()}
            </svg>
        </div>
    }
}

#[component]
fn ChartPlaceholder() -> impl IntoView {
    view! {
        <div class="chart-card">
            <h3 class="chart-title">{PLACEHOLDER_TITLE}</h3>
        </div>
    }
}
