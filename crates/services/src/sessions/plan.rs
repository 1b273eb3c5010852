use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;

/// Questions drawn for one exam.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub requested: usize,
    pub available: usize,
}

impl SessionPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Draw `min(take, pool.len())` distinct questions in uniformly random order.
#[must_use]
pub fn sample(pool: &[Question], take: usize) -> SessionPlan {
    sample_with_rng(pool, take, &mut rng())
}

/// Same as [`sample`] with a caller-provided RNG.
///
/// Shuffles positions rather than questions, so the pool is only cloned for
/// the chosen prefix and is never reordered.
pub fn sample_with_rng<R: Rng + ?Sized>(pool: &[Question], take: usize, rng: &mut R) -> SessionPlan {
    let mut order: Vec<usize> = (0..pool.len()).collect();
    let amount = take.min(pool.len());
    let (chosen, _) = order.partial_shuffle(rng, amount);
    let questions = chosen.iter().map(|&index| pool[index].clone()).collect();

    SessionPlan {
        questions,
        requested: take,
        available: pool.len(),
    }
}
