use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::Question;
use services::{LoadError, QuestionSource};
use storage::repository::{CONTACT_PHONE_KEY, InMemoryRepository};

use super::test_harness::{ViewKind, sample_pool, setup_view_harness, setup_view_harness_with};
use crate::vm::QuizIntent;

struct FailingSource;

#[async_trait]
impl QuestionSource for FailingSource {
    async fn load_pool(&self) -> Result<Vec<Question>, LoadError> {
        Err(LoadError::InvalidLocation("offline".to_string()))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_start_and_contact() {
    let repo = InMemoryRepository::with_settings([(CONTACT_PHONE_KEY, "01 555 000")]);
    let source: Arc<dyn QuestionSource> = Arc::new(services::StaticQuestionSource::default());
    let mut harness = setup_view_harness_with(ViewKind::Home, 30, source, Arc::new(repo));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Start exam"), "missing start link in {html}");
    assert!(html.contains("Answer 30 randomly drawn questions"), "missing intro in {html}");
    assert!(
        html.contains("Hajj Brothers Driving School - 01 555 000"),
        "missing contact line in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_falls_back_to_default_contact() {
    let mut harness = setup_view_harness(ViewKind::Home, 30);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("03865092 - 70581828"), "missing default phone in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz, 3);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "missing counter in {html}");
    assert!(html.contains("<b>"), "question markup was not kept in {html}");
    assert!(html.contains("Confirm"), "missing confirm in {html}");
    assert!(html.contains("rel=\"preload\""), "missing preload links in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_shows_load_error_with_retry() {
    let mut harness = setup_view_harness_with(
        ViewKind::Quiz,
        3,
        Arc::new(FailingSource),
        Arc::new(InMemoryRepository::new()),
    );
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Could not load the questions"), "missing error in {html}");
    assert!(
        html.contains("invalid question pool location: offline"),
        "load failure reason missing from {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_marks_feedback_after_confirm() {
    let mut harness = setup_view_harness(ViewKind::Quiz, 2);
    harness.settle().await;
    harness.dispatch(QuizIntent::Select(1));
    harness.dispatch(QuizIntent::Confirm);

    let html = harness.render();
    assert!(html.contains("choice--wrong"), "missing wrong mark in {html}");
    assert!(html.contains("choice--correct"), "missing correct mark in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reaches_results() {
    let mut harness = setup_view_harness(ViewKind::Quiz, 2);
    harness.settle().await;
    for _ in 0..2 {
        harness.dispatch(QuizIntent::Select(0));
        harness.dispatch(QuizIntent::Confirm);
        harness.dispatch(QuizIntent::Advance);
    }
    assert!(harness.shows_review(), "quiz did not reach the review");

    let html = harness.render();
    assert!(html.contains("Score: 2 / 2"), "missing score in {html}");
    assert!(html.contains("Passed"), "missing verdict in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(html.contains("Home"), "missing home in {html}");
    assert_eq!(
        html.matches("Correct answer: ").count(),
        2,
        "each review row should name the correct answer in {html}"
    );
}

#[test]
fn sample_pool_marks_first_choice_correct() {
    let pool = sample_pool(2);
    assert!(pool.iter().all(|q| q.is_correct_choice(0)));
}
