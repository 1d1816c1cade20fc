//! Distractor selection and photo crop positions

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::BirdCard;

/// Choices shown per timed-quiz question (correct answer included)
pub const QUIZ_CHOICES: usize = 5;

/// Birds framed near the top of their photo
const TOP_CROP_BIRDS: [&str; 1] = ["merlin"];

/// Other birds split into (same type, different type), both shuffled
fn shuffled_others<'a, R: Rng + ?Sized>(
    bird: &BirdCard,
    pool: &'a [BirdCard],
    rng: &mut R,
) -> (Vec<&'a BirdCard>, Vec<&'a BirdCard>) {
    let (mut same, mut diff): (Vec<&BirdCard>, Vec<&BirdCard>) = pool
        .iter()
        .filter(|b| b.id != bird.id)
        .partition(|b| b.bird_type == bird.bird_type);
    same.shuffle(rng);
    diff.shuffle(rng);
    (same, diff)
}

/// Pick up to `max_same` same-type distractors, then fill up to `total` with
/// other types
pub(crate) fn pick_distractors<'a, R: Rng + ?Sized>(
    bird: &BirdCard,
    pool: &'a [BirdCard],
    max_same: usize,
    total: usize,
    rng: &mut R,
) -> Vec<&'a BirdCard> {
    let (same, diff) = shuffled_others(bird, pool, rng);
    let same_count = same.len().min(max_same).min(total);
    let diff_count = diff.len().min(total - same_count);
    same.into_iter()
        .take(same_count)
        .chain(diff.into_iter().take(diff_count))
        .collect()
}

/// Names for one timed-quiz question: the right answer, one or two look-alikes
/// of the same type (coin flip), the rest from other types, shuffled
pub fn generate_choices<R: Rng + ?Sized>(bird: &BirdCard, pool: &[BirdCard], rng: &mut R) -> Vec<String> {
    let max_same = if rng.random_bool(0.5) { 1 } else { 2 };
    let distractors = pick_distractors(bird, pool, max_same, QUIZ_CHOICES - 1, rng);

    let mut names: Vec<String> = std::iter::once(bird.common_name.clone())
        .chain(distractors.into_iter().map(|b| b.common_name.clone()))
        .collect();
    names.shuffle(rng);
    names
}

/// Background position (percent) that keeps the bird in frame
pub fn random_crop<R: Rng + ?Sized>(bird_id: &str, rng: &mut R) -> Vec2 {
    let x = 40.0 + rng.random::<f32>() * 20.0;
    let y = if TOP_CROP_BIRDS.contains(&bird_id) {
        10.0 + rng.random::<f32>() * 15.0
    } else {
        35.0 + rng.random::<f32>() * 20.0
    };
    Vec2::new(x, y)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::BirdType;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    pub(crate) fn pool() -> Vec<BirdCard> {
        vec![
            BirdCard::new("coohaw", "Cooper's Hawk", BirdType::Raptor),
            BirdCard::new("shshaw", "Sharp-shinned Hawk", BirdType::Raptor),
            BirdCard::new("rethaw", "Red-tailed Hawk", BirdType::Raptor),
            BirdCard::new("merlin", "Merlin", BirdType::Raptor),
            BirdCard::new("mallar", "Mallard", BirdType::Waterbird),
            BirdCard::new("greger", "Great Egret", BirdType::Waterbird),
            BirdCard::new("annhum", "Anna's Hummingbird", BirdType::Hummingbird),
            BirdCard::new("labwoo", "Ladder-backed Woodpecker", BirdType::Woodpecker),
            BirdCard::new("savspa", "Savannah Sparrow", BirdType::Sparrow),
            BirdCard::new("verfly", "Vermilion Flycatcher", BirdType::Flycatcher),
        ]
    }

    #[test]
    fn test_choices_contain_answer_once() {
        let pool = pool();
        let mut rng = Pcg32::seed_from_u64(10);
        for bird in &pool {
            let choices = generate_choices(bird, &pool, &mut rng);
            assert_eq!(choices.len(), QUIZ_CHOICES);
            assert_eq!(choices.iter().filter(|c| **c == bird.common_name).count(), 1);
            let mut dedup = choices.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), choices.len());
        }
    }

    #[test]
    fn test_same_type_distractors_bounded() {
        let pool = pool();
        let hawk = &pool[0];
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let picks = pick_distractors(hawk, &pool, 2, 4, &mut rng);
            let same = picks.iter().filter(|b| b.bird_type == BirdType::Raptor).count();
            assert_eq!(same, 2);
            assert_eq!(picks.len(), 4);
        }
    }

    #[test]
    fn test_small_pool() {
        let pool = &pool()[..2];
        let mut rng = Pcg32::seed_from_u64(12);
        let choices = generate_choices(&pool[0], pool, &mut rng);
        assert_eq!(choices.len(), 2);
    }

    #[test]
    fn test_crop_ranges() {
        let mut rng = Pcg32::seed_from_u64(13);
        for _ in 0..100 {
            let c = random_crop("mallar", &mut rng);
            assert!((40.0..=60.0).contains(&c.x) && (35.0..=55.0).contains(&c.y));
            let top = random_crop("merlin", &mut rng);
            assert!((10.0..=25.0).contains(&top.y));
        }
    }
}
