use chrono::Local;
use waypoint_lib::{ledger::LedgerState, view::TrackerView};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub view: TrackerView,
    pub on_start: Callback<()>,
    pub on_register: Callback<()>,
    pub on_follow: Callback<bool>,
}

#[function_component]
pub fn Panel(props: &Props) -> Html {
    let view = &props.view;

    let on_start = {
        let cb = props.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_register = {
        let cb = props.on_register.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_follow = {
        let cb = props.on_follow.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(input.checked());
        })
    };

    html! {
        <div class="panel component-container">
            <h1>{"Waypoint distance"}</h1>

            if !view.available {
                <p class="warning">{"Your browser does not support geolocation."}</p>
            } else if !view.enabled {
                <p class="warning">{"Location tracking is off. Start tracking and allow location access."}</p>
            }

            if let Some(error) = &view.error {
                <p class="error">{error.clone()}</p>
            }

            <div class="controls">
                if view.can_start {
                    <button onclick={on_start} disabled={view.enabled && view.pending}>
                        {if view.pending { "Locating..." } else { "Start tracking" }}
                    </button>
                }
                <button onclick={on_register} disabled={!view.can_register}>
                    {"Register location"}
                </button>
                <label>
                    <input type="checkbox" checked={view.following} disabled={!view.available} onchange={on_follow} />
                    {"Follow my position"}
                </label>
            </div>

            if let Some(reading) = &view.reading {
                <label class="reading">
                    {format!("Current: {:.6}, {:.6} (±{:.0} m)", reading.latitude, reading.longitude, reading.accuracy_m)}
                </label>
            }

            if !view.waypoints.is_empty() {
                <h2>{"Recorded points:"}</h2>
                <ol>
                    { for view.waypoints.iter().enumerate().map(|(i, waypoint)| html! {
                        <li key={i}>
                            {format!("Point {}: {:.4}, {:.4} ±{} m ({})",
                                i + 1,
                                waypoint.latitude(),
                                waypoint.longitude(),
                                waypoint.accuracy_m(),
                                waypoint.recorded_at().with_timezone(&Local).format("%H:%M:%S"))}
                        </li>
                    }) }
                </ol>
            }

            if let Some(distance) = &view.distance_label {
                <h3>{format!("Distance between first and last point: {distance}")}</h3>
            } else if view.ledger_state == LedgerState::HasReferencePoint {
                <label>{"Register another point to measure the distance."}</label>
            }
        </div>
    }
}
