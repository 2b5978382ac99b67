//! Dataset-level attempt loop.

use super::balance::BalanceCounts;
use super::templates::realize;
use crate::definitions::SceneConfig;
use crate::video::{Question, Video};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Runs `attempts` balanced sampling attempts over `videos`.
///
/// Each attempt samples a template and target from `counts`, then offers the
/// target to the videos in a fresh random order. The first video producing a
/// question it does not already hold receives it and the counters are
/// updated. Returns the number of successful attempts.
pub fn generate_balanced<R: Rng + ?Sized>(
    videos: &mut [Video],
    counts: &mut BalanceCounts,
    attempts: usize,
    scene: &SceneConfig,
    rng: &mut R,
) -> usize {
    let mut order: Vec<usize> = (0..videos.len()).collect();
    let mut successes = 0;

    for attempt in 0..attempts {
        let Some(target) = counts.sample(rng) else {
            continue;
        };
        order.shuffle(rng);

        let realized = order.iter().find_map(|&idx| {
            realize(&videos[idx], &target, scene, rng).map(|(text, answer)| (idx, text, answer))
        });

        match realized {
            Some((idx, text, answer)) => {
                if videos[idx].add_question(Question::new(text, target.template(), answer)) {
                    counts.record(&target);
                    successes += 1;
                }
            }
            None => debug!(attempt, ?target, "no video satisfies target"),
        }
    }

    successes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionTemplate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn videos(n: usize, rng: &mut ChaCha8Rng) -> Vec<Video> {
        let scene = SceneConfig::default();
        (0..n).map(|_| Video::simulate(&scene, rng).unwrap()).collect()
    }

    #[test]
    fn test_counts_follow_added_questions() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = videos(12, &mut rng);
        let mut counts = BalanceCounts::new();

        let scene = SceneConfig::default();
        let successes = generate_balanced(&mut pool, &mut counts, 120, &scene, &mut rng);

        let asked: usize = pool.iter().map(|v| v.questions().len()).sum();
        assert_eq!(asked, successes);
        assert_eq!(counts.templates.total() as usize, successes);
        assert!(successes > 0);

        for template in QuestionTemplate::ALL {
            let asked = pool
                .iter()
                .flat_map(|v| v.questions())
                .filter(|q| q.template == template)
                .count() as u64;
            assert_eq!(counts.templates.count(&template), asked);
            assert_eq!(counts.dimension_counts(template).iter().sum::<u64>(), asked);
        }
    }

    #[test]
    fn test_no_duplicate_question_text() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut pool = videos(6, &mut rng);
        let mut counts = BalanceCounts::new();

        // Far more attempts than there are distinct questions
        generate_balanced(&mut pool, &mut counts, 600, &SceneConfig::default(), &mut rng);

        for video in &pool {
            let texts: HashSet<&str> = video.questions().iter().map(|q| q.text.as_str()).collect();
            assert_eq!(texts.len(), video.questions().len());
        }
    }

    #[test]
    fn test_empty_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut counts = BalanceCounts::new();
        let scene = SceneConfig::default();
        assert_eq!(generate_balanced(&mut [], &mut counts, 10, &scene, &mut rng), 0);
        assert_eq!(counts.templates.total(), 0);
    }
}
