//! Bird Games entry point
//!
//! On the web this only installs logging; the page drives the games through
//! the exported bindings. Natively it runs a short scripted demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Bird Games starting...");
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bird Games (native) starting...");
    log::info!("The games run in the browser - this is a logic demo");

    println!("\nGenerating canopy overlay...");
    demo_overlay();

    println!("\nPlaying a flashcard session...");
    demo_flashcards();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_overlay() {
    use bird_games::overlay::{OverlayParams, generate};
    use glam::Vec2;

    for coverage in [0.2, 0.5, 0.85] {
        let overlay = generate(&OverlayParams::new(coverage, Vec2::new(50.0, 45.0), 42));
        println!(
            "  coverage {:.2}: canopy {}, hole r={:.1}, {} glimpses, {} ring + {} surface leaves",
            coverage,
            overlay.canopy_color.hex(),
            overlay.hole.radius,
            overlay.hole.glimpses.len(),
            overlay.ring_leaves().count(),
            overlay.surface_leaves().count(),
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_flashcards() {
    use bird_games::platform::default_store;
    use bird_games::{Mode, ScoringState};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    let cards: Vec<String> = ["merlin", "mallar", "verfly", "annhum"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut store = default_store();
    let mut rng = Pcg32::seed_from_u64(7);
    let mut state = ScoringState::load(store.as_ref());
    let mode = Mode::ImageFirst;

    state.initialize(&cards, mode, &mut rng);
    let mut turn = 0;
    loop {
        let Some(card) = state.current_card_id().cloned() else {
            break;
        };
        // Miss every third card
        let correct = turn % 3 != 2;
        state.record_answer(mode, &card, correct);
        let progress = state.progress();
        println!(
            "  [{}/{}] {} -> {}",
            progress.current,
            progress.total,
            card,
            if correct { "correct" } else { "incorrect" }
        );
        turn += 1;
        if !state.advance() {
            break;
        }
    }

    let score = state.current_score(mode);
    println!(
        "  Score {}/{} ({}%), best streak {}",
        score.correct,
        score.attempts,
        score.percent(),
        state.high_score(mode).best_streak
    );

    if state.incorrect_count(mode) > 0 {
        state.start_review_mistakes(mode, &mut rng);
        println!("  Review deck: {:?}", state.deck().map(|d| d.len()));
    }
    state.save_high_scores(store.as_mut());
}
