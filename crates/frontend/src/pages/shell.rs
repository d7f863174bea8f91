use dioxus::prelude::*;

use crate::components::background::Background;
use crate::state::Dashboard;
use crate::Route;

#[component]
pub fn Shell() -> Element {
    let dashboard = use_context_provider(Dashboard::new);
    let theme_class = dashboard.theme.read().css_class();

    rsx! {
        div { class: "app theme-{theme_class}",
            Background {}
            div { class: "header",
                h1 { "Pinpoint Weather" }
                nav { class: "tabs",
                    Link { to: Route::Search {}, active_class: "active", "Search" }
                    Link { to: Route::WorldMap {}, active_class: "active", "Map" }
                }
            }
            div { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
