use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{Question, QuizSettingsDraft};
use quiz_core::time::fixed_now;
use services::{
    Clock, ContactService, QuestionSource, QuizLoopService, StaticQuestionSource,
};
use storage::repository::{InMemoryRepository, SettingsRepository};

use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{HomeView, QuizView};
use crate::vm::{QuizFrame, QuizIntent};

#[derive(Clone)]
struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
    contact: Arc<ContactService>,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn contact(&self) -> Arc<ContactService> {
        Arc::clone(&self.contact)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Quiz,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn handles(&self) -> &QuizTestHandles {
        self.quiz_handles.as_ref().expect("quiz handles configured")
    }

    /// Send an intent through the registered quiz callback and re-render.
    pub fn dispatch(&mut self, intent: QuizIntent) {
        let dispatch = self.handles().dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    /// Whether the quiz view currently shows the review.
    pub fn shows_review(&self) -> bool {
        let vm = self.handles().vm();
        self.dom.in_runtime(|| {
            vm.read()
                .as_ref()
                .is_some_and(|vm| matches!(vm.frame(), Some(QuizFrame::Review(_))))
        })
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Pool of simple questions where choice 0 is always correct.
pub fn sample_pool(len: u64) -> Vec<Question> {
    (1..=len)
        .map(|id| {
            Question::new(id, vec![format!("Right {id}"), format!("Wrong {id}")])
                .with_text(format!("Question <b>{id}</b>"))
                .with_image(format!("img/q{id}.png"))
                .with_correct_index(0)
        })
        .collect()
}

pub fn setup_view_harness(view: ViewKind, take: u32) -> ViewHarness {
    let source: Arc<dyn QuestionSource> = Arc::new(StaticQuestionSource::new(sample_pool(5)));
    setup_view_harness_with(view, take, source, Arc::new(InMemoryRepository::new()))
}

pub fn setup_view_harness_with(
    view: ViewKind,
    take: u32,
    source: Arc<dyn QuestionSource>,
    settings_repo: Arc<dyn SettingsRepository>,
) -> ViewHarness {
    let settings = QuizSettingsDraft {
        take_count: Some(take),
        pass_threshold: Some(2),
        advance_debounce_ms: Some(0),
        ..QuizSettingsDraft::default()
    }
    .validate()
    .expect("valid settings");

    let contact = Arc::new(ContactService::new(
        settings_repo,
        settings.organisation_name(),
    ));
    let quiz_loop = Arc::new(QuizLoopService::new(
        Clock::fixed(fixed_now()),
        settings,
        source,
    ));

    let quiz_handles = match view {
        ViewKind::Quiz => Some(QuizTestHandles::default()),
        ViewKind::Home => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { quiz_loop, contact }),
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness { dom, quiz_handles }
}
