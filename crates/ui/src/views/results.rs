use dioxus::prelude::*;

use quiz_core::model::{QuizReport, ReviewEntry};
use services::ContactDisplay;

use crate::context::AppContext;
use crate::vm::sanitize_html;

/// Organisation contact, read from settings with a built-in fallback.
#[component]
pub fn ContactLine() -> Element {
    let ctx = use_context::<AppContext>();
    let contact = ctx.contact();
    let resource = use_resource(move || {
        let contact = contact.clone();
        async move { contact.load_or_default().await }
    });
    let line = resource.value().read().as_ref().map(ContactDisplay::line);

    rsx! {
        if let Some(line) = line {
            p { class: "contact-line", "{line}" }
        }
    }
}

#[component]
pub fn ResultsView(
    report: QuizReport,
    on_retry: EventHandler<()>,
    on_home: EventHandler<()>,
) -> Element {
    let verdict = if report.passed() { "Passed" } else { "Failed" };
    let verdict_class = if report.passed() {
        "results-verdict results-verdict--pass"
    } else {
        "results-verdict results-verdict--fail"
    };

    rsx! {
        div { class: "results",
            h2 { class: "results-title", "Exam finished" }
            p { class: "results-score", "Score: {report.score()} / {report.total()}" }
            p { class: "{verdict_class}", "{verdict}" }
            p { class: "results-threshold", "Pass mark: {report.pass_threshold()}" }
            div { class: "results-actions",
                button {
                    class: "btn btn-primary",
                    id: "results-retry",
                    r#type: "button",
                    onclick: move |_| on_retry.call(()),
                    "Retry"
                }
                button {
                    class: "btn btn-secondary",
                    id: "results-home",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Home"
                }
            }
            ol { class: "review-list",
                for entry in report.entries().iter().cloned() {
                    ReviewItem { key: "{entry.position}", entry }
                }
            }
            ContactLine {}
        }
    }
}

#[component]
fn ReviewItem(entry: ReviewEntry) -> Element {
    let class = if entry.is_correct {
        "review-item review-item--correct"
    } else {
        "review-item review-item--wrong"
    };
    let text_html = entry.text.as_deref().map(sanitize_html);
    let chosen_html = sanitize_html(entry.chosen_label());
    let correct_html = sanitize_html(entry.correct_label());

    rsx! {
        li { class: "{class}",
            if let Some(text_html) = text_html {
                div { class: "review-question", dangerous_inner_html: "{text_html}" }
            }
            if let Some(image) = entry.image.clone() {
                img { class: "review-image", src: "{image}", alt: "" }
            }
            p { class: "review-answer",
                span { "Your answer: " }
                span { dangerous_inner_html: "{chosen_html}" }
            }
            p { class: "review-correct",
                span { "Correct answer: " }
                span { dangerous_inner_html: "{correct_html}" }
            }
        }
    }
}
