use gloo_console::info;
use gloo_utils::document;
use leaflet::{Circle, CircleMarker, CircleOptions, LatLng, Map, MapOptions, Marker, TileLayer, TileLayerOptions, Tooltip, TooltipOptions};
use wasm_bindgen::JsCast;
use waypoint_lib::{
    config::MapConfig,
    view::{LiveMarker, MapRenderer, MapScene, WaypointMarker},
};
use web_sys::{Element, HtmlElement, Node};
use yew::prelude::*;

/// Draws [`MapScene`]s with Leaflet. Keeps its own layers, the scene is the only input.
pub struct LeafletRenderer {
    map: Map,
    markers: Vec<Marker>,
    live: Option<(CircleMarker, Circle)>,
    centered_on: Option<(f64, f64)>,
}

impl LeafletRenderer {
    fn new(map: Map) -> Self {
        Self {
            map,
            markers: Vec::new(),
            live: None,
            centered_on: None,
        }
    }

    fn add_waypoint(&mut self, waypoint: &WaypointMarker) {
        let marker = Marker::new(&LatLng::new(waypoint.latitude, waypoint.longitude));

        let tooltip_opts = TooltipOptions::default();
        tooltip_opts.set_direction("top".into());
        let tooltip = Tooltip::new(&tooltip_opts, None);
        tooltip.set_content(&format!("{}<br>±{} m", waypoint.label, waypoint.accuracy_m).into());

        marker.bind_tooltip(&tooltip);
        marker.add_to(&self.map);
        self.markers.push(marker);
    }

    fn show_live(&mut self, live: &LiveMarker) {
        let pos = LatLng::new(live.latitude, live.longitude);

        if let Some((dot, circle)) = &self.live {
            dot.set_lat_lng(&pos);
            circle.set_lat_lng(&pos);
            circle.set_radius(live.accuracy_m);
            return;
        }

        let dot_opts = CircleOptions::new();
        dot_opts.set_radius(8.);
        dot_opts.set_stroke(false);
        dot_opts.set_fill_color("blue".into());
        dot_opts.set_fill_opacity(0.8);
        let dot = CircleMarker::new_with_options(&pos, &dot_opts);

        let circle_opts = CircleOptions::new();
        circle_opts.set_radius(live.accuracy_m);
        circle_opts.set_color("rgb(0, 96, 255)".into());
        circle_opts.set_weight(1.);
        circle_opts.set_fill_opacity(0.15);
        let circle = Circle::new_with_options(&pos, &circle_opts);

        circle.add_to(&self.map);
        dot.add_to(&self.map);
        self.live = Some((dot, circle));
    }
}

impl MapRenderer for LeafletRenderer {
    fn render(&mut self, scene: &MapScene) {
        // Waypoints are append only, so only the tail is new
        while self.markers.len() > scene.waypoints.len() {
            if let Some(marker) = self.markers.pop() {
                marker.remove();
            }
        }
        let known = self.markers.len();
        for waypoint in &scene.waypoints[known..] {
            self.add_waypoint(waypoint);
        }
        if scene.waypoints.len() > known {
            info!(format!("Added {} markers", scene.waypoints.len() - known));
        }

        match &scene.live {
            Some(live) => self.show_live(live),
            None => {
                if let Some((dot, circle)) = self.live.take() {
                    dot.remove();
                    circle.remove();
                }
            }
        }

        if scene.center != self.centered_on {
            if let Some((lat, lng)) = scene.center {
                self.map.pan_to(&LatLng::new(lat, lng));
            }
            self.centered_on = scene.center;
        }
    }
}

pub struct MapComponent {
    renderer: LeafletRenderer,
    container: HtmlElement,
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub scene: MapScene,
    pub config: MapConfig,
    pub collapsed: bool,
}

impl MapComponent {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }
}

impl Component for MapComponent {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        let container: Element = document().create_element("div").unwrap();
        let container: HtmlElement = container.dyn_into().unwrap();
        container.set_class_name("map");

        let leaflet_map = Map::new_with_element(&container, &MapOptions::default());

        Self {
            renderer: LeafletRenderer::new(leaflet_map),
            container,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let config = &ctx.props().config;
            let map = &self.renderer.map;
            map.set_max_zoom(config.max_zoom);
            map.set_view(&LatLng::new(config.center_lat, config.center_lng), config.zoom);
            add_tile_layer(map, &config.tile_url);
            self.renderer.render(&ctx.props().scene);
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.renderer.map.invalidate_size(false);
        self.renderer.render(&ctx.props().scene);
        true
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="map">
                {self.render_map()}
            </div>
        }
    }
}

fn add_tile_layer(map: &Map, url: &str) {
    let opts = TileLayerOptions::new();
    opts.set_update_when_idle(true);
    TileLayer::new_options(url, &opts).add_to(map);
}
