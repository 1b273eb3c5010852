use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::{ChoiceFeedback, ChoiceView, QuestionView};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ResultsView, ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizFrame, QuizIntent, QuizVm, load_quiz, sanitize_html};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_loop = ctx.quiz_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let mut error = error;
        let mut vm = vm;

        async move {
            let loaded = load_quiz(&quiz_loop).await?;
            vm.set(Some(loaded));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let mut error = error;
            let mut vm = vm;
            let mut guard = vm.write();
            let Some(current) = guard.as_mut() else {
                return;
            };
            match current.dispatch(&quiz_loop, intent) {
                Ok(_) => error.set(None),
                Err(err) => error.set(Some(err)),
            }
        })
    };

    let on_retry = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let mut error = error;
            let mut vm = vm;
            let mut guard = vm.write();
            match guard.as_mut() {
                Some(current) => {
                    if let Err(err) = current.retry(&quiz_loop) {
                        error.set(Some(err));
                    }
                }
                None => {
                    let mut resource = resource;
                    resource.restart();
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let (frame, preload) = {
        let guard = vm.read();
        let frame = guard.as_ref().and_then(QuizVm::frame).cloned();
        let preload = guard
            .as_ref()
            .map(|current| current.image_refs().to_vec())
            .unwrap_or_default();
        (frame, preload)
    };

    rsx! {
        div { class: "page quiz",
            for src in preload {
                link { key: "{src}", rel: "preload", "as": "image", href: "{src}" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "quiz-loading", "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "quiz-error",
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            id: "quiz-retry-load",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(err) = error.read().clone() {
                        p { class: "quiz-error", "{err.message()}" }
                    }
                    match frame {
                        Some(QuizFrame::Question(view)) => rsx! {
                            QuestionCard { view, on_intent: dispatch_intent }
                        },
                        Some(QuizFrame::Review(report)) => rsx! {
                            ResultsView {
                                report,
                                on_retry: move |()| on_retry.call(()),
                                on_home: move |()| {
                                    let _ = navigator.push(Route::Home {});
                                },
                            }
                        },
                        None => rsx! {},
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionCard(view: QuestionView, on_intent: Callback<QuizIntent>) -> Element {
    let progress = view.progress;
    let percent = progress.percent();
    let text_html = view.text.as_deref().map(sanitize_html);
    let can_confirm = view.can_confirm;
    let locked = view.locked;

    rsx! {
        div { class: "quiz-card",
            div { class: "quiz-progress",
                p { class: "quiz-counter", "Question {progress.display_number()} of {progress.total}" }
                div { class: "progress-bar",
                    div { class: "progress-bar__fill", style: "width: {percent:.0}%" }
                }
            }
            if let Some(text_html) = text_html {
                div { class: "quiz-question", dangerous_inner_html: "{text_html}" }
            }
            if let Some(image) = view.image.clone() {
                img { class: "quiz-image", src: "{image}", alt: "" }
            }
            div { class: "quiz-choices",
                for choice in view.choices.iter().cloned() {
                    ChoiceButton { key: "{choice.index}", choice, locked, on_intent }
                }
            }
            div { class: "quiz-actions",
                if locked {
                    button {
                        class: "btn btn-primary",
                        id: "quiz-next",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::Advance),
                        "Next"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        id: "quiz-confirm",
                        r#type: "button",
                        disabled: !can_confirm,
                        onclick: move |_| on_intent.call(QuizIntent::Confirm),
                        "Confirm"
                    }
                }
            }
        }
    }
}

#[component]
fn ChoiceButton(choice: ChoiceView, locked: bool, on_intent: Callback<QuizIntent>) -> Element {
    let class = choice_class(&choice);
    let text_html = sanitize_html(&choice.text);
    let index = choice.index;

    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            disabled: locked,
            onclick: move |_| on_intent.call(QuizIntent::Select(index)),
            span { dangerous_inner_html: "{text_html}" }
        }
    }
}

fn choice_class(choice: &ChoiceView) -> String {
    let mut class = String::from("choice");
    if choice.selected {
        class.push_str(" choice--selected");
    }
    match choice.feedback {
        ChoiceFeedback::Correct => class.push_str(" choice--correct"),
        ChoiceFeedback::Wrong => class.push_str(" choice--wrong"),
        ChoiceFeedback::None => {}
    }
    class
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
