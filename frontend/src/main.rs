use crate::components::{map_component::MapComponent, panel::Panel};
use gloo_console::{error, info, warn};
use geolocation::{BrowserGeolocation, GeoEvent};
use waypoint_lib::{config::TrackerConfig, error::TrackerError, tracker::TrackerState};
use yew::prelude::*;

mod components;
mod config;
mod geolocation;

enum MainMsg {
    StartTracking,
    RegisterLocation,
    SetFollowing(bool),
    Geo(GeoEvent),
    ToggleCollapsed,
}

struct Model {
    tracker: TrackerState<BrowserGeolocation>,
    config: TrackerConfig,
    collapsed: bool,
}

impl Component for Model {
    type Message = MainMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = config::load();
        let provider = BrowserGeolocation::new(ctx.link().callback(MainMsg::Geo), config.watchdog_ms());
        let tracker = TrackerState::new(provider, &config);

        if !tracker.acquirer().is_available() {
            warn!("Geolocation is not available in this browser");
        }

        Self {
            tracker,
            config,
            collapsed: false,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MainMsg::StartTracking => match self.tracker.start_tracking() {
                Ok(ticket) => info!(format!("Requested location ({})", ticket.0)),
                Err(err) => error!(err.to_string()),
            },
            MainMsg::RegisterLocation => match self.tracker.register_location() {
                Ok((waypoint, _)) => {
                    info!(format!("Registered {:.4}, {:.4}", waypoint.latitude(), waypoint.longitude()));
                }
                Err(TrackerError::Ledger(err)) => warn!(err.to_string()),
                Err(err) => error!(err.to_string()),
            },
            MainMsg::SetFollowing(follow) => {
                if let Err(err) = self.tracker.set_following(follow) {
                    error!(err.to_string());
                }
            }
            MainMsg::Geo(GeoEvent::Position(ticket, result)) => {
                return self.tracker.on_position(ticket, result);
            }
            MainMsg::Geo(GeoEvent::Watch(watch, result)) => {
                return self.tracker.on_watch_position(watch, result);
            }
            MainMsg::Geo(GeoEvent::Expired(ticket)) => {
                return self.tracker.on_request_expired(ticket);
            }
            MainMsg::ToggleCollapsed => {
                info!("Toggle collapsed");
                self.collapsed = !self.collapsed;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let collapsed = self.collapsed;
        let link = ctx.link();

        let on_start = link.callback(|()| MainMsg::StartTracking);
        let on_register = link.callback(|()| MainMsg::RegisterLocation);
        let on_follow = link.callback(MainMsg::SetFollowing);
        let on_collapse = link.callback(|()| MainMsg::ToggleCollapsed);

        html! {
            <>
                if !collapsed {
                    <Panel view={self.tracker.view()} {on_start} {on_register} {on_follow} />
                }
                <CollapseBtn collapsed={collapsed} on_click={on_collapse} />
                <MapComponent scene={self.tracker.scene()} config={self.config.map.clone()} collapsed={collapsed} />
            </>
        }
    }
}

#[derive(PartialEq, Properties, Clone)]
struct CollapseBtnProps {
    collapsed: bool,
    on_click: Callback<()>,
}

#[function_component]
fn CollapseBtn(props: &CollapseBtnProps) -> Html {
    let onclick = {
        let cb = props.on_click.clone();
        Callback::from(move |_| cb.emit(()))
    };

    // Side panel on wide screens, top panel on narrow ones
    let (vert, horiz) = if props.collapsed { ("▶", "▼") } else { ("◀", "▲") };

    html! { <>
        <button onclick={onclick.clone()} class="collapse-btn-vert collapse-btn">{vert}</button>
        <button {onclick} class="collapse-btn-horiz collapse-btn">{horiz}</button>
    </> }
}

fn main() {
    yew::Renderer::<Model>::new().render();
}
