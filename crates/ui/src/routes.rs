use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::context::AppContext;
use crate::views::{HomeView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/quiz", QuizView)] Quiz {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let organisation = ctx.organisation();

    rsx! {
        div { class: "app",
            header { class: "app-header",
                h1 { "{organisation}" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
