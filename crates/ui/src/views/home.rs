use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

use super::results::ContactLine;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let take = ctx.quiz_loop().settings().take_count();

    rsx! {
        div { class: "page home",
            h2 { "Driving theory exam" }
            p { class: "home-intro",
                "Answer {take} randomly drawn questions. Pick an answer, confirm it, then move on."
            }
            Link { class: "btn btn-primary", id: "home-start", to: Route::Quiz {}, "Start exam" }
            ContactLine {}
        }
    }
}
