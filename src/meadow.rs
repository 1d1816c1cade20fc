//! Meadow rescue game progress
//!
//! Rescued animals move into the meadow and each one adds a landmark (dam,
//! basket, burrow). Progress persists; popups and view changes are queued on
//! a `Scheduler` and die with the session.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_or_default, remove_or_log, save_or_log};
use crate::schedule::Scheduler;

/// Popup lifetime
pub const POPUP_DURATION_MS: f64 = 3000.0;
/// Delay before the landmark popup follows a rescue
pub const LANDMARK_POPUP_DELAY_MS: f64 = 1500.0;
/// Delay before a finished rescue returns to the meadow
pub const RETURN_TO_MEADOW_DELAY_MS: f64 = 2000.0;

/// Persisted rescue progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeadowState {
    pub rescued_animals: Vec<String>,
    pub dam_built: bool,
    pub basket_placed: bool,
    pub burrow_dug: bool,
}

impl MeadowState {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "meadowState";

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_or_log(store, Self::STORAGE_KEY, self);
    }

    /// Delete the stored record
    pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) {
        remove_or_log(store, Self::STORAGE_KEY);
    }

    pub fn is_rescued(&self, animal_id: &str) -> bool {
        self.rescued_animals.iter().any(|a| a == animal_id)
    }
}

/// Landmark an animal adds to the meadow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Landmark {
    Dam,
    Basket,
    Burrow,
}

impl Landmark {
    fn message(&self) -> &'static str {
        match self {
            Landmark::Dam => "Beaver built a dam by the pond!",
            Landmark::Basket => "Snake is curled up in his basket!",
            Landmark::Burrow => "Owl has settled into his new burrow!",
        }
    }
}

/// A rescuable animal and its mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeadowAnimal {
    pub id: &'static str,
    pub name: &'static str,
    /// Mini-game verb shown on the rescue card
    pub action: &'static str,
    /// Actions needed to finish the mini-game
    pub actions_required: u32,
    /// Swims in the pond once rescued
    pub swims: bool,
    pub landmark: Landmark,
}

/// Every rescuable animal, in rescue-screen order
pub static MEADOW_ANIMALS: [MeadowAnimal; 3] = [
    MeadowAnimal {
        id: "beaver",
        name: "Beaver",
        action: "chop",
        actions_required: 3,
        swims: true,
        landmark: Landmark::Dam,
    },
    MeadowAnimal {
        id: "snake",
        name: "Snake",
        action: "charm",
        actions_required: 8,
        swims: false,
        landmark: Landmark::Basket,
    },
    MeadowAnimal {
        id: "owl",
        name: "Burrowing Owl",
        action: "dig",
        actions_required: 6,
        swims: false,
        landmark: Landmark::Burrow,
    },
];

pub fn find_animal(id: &str) -> Option<&'static MeadowAnimal> {
    MEADOW_ANIMALS.iter().find(|a| a.id == id)
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeadowView {
    Meadow,
    Rescue,
    /// Mini-game for one animal
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupKind {
    Rescue,
    Meadow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popup {
    pub id: u32,
    pub message: String,
    pub kind: PopupKind,
}

#[derive(Debug, Clone, PartialEq)]
enum MeadowEvent {
    ShowPopup(String, PopupKind),
    DismissPopup(u32),
    ReturnToMeadow,
}

/// Live meadow session
#[derive(Debug, Clone)]
pub struct MeadowSession {
    state: MeadowState,
    view: MeadowView,
    game_animal: Option<&'static MeadowAnimal>,
    popups: Vec<Popup>,
    next_popup_id: u32,
    scheduler: Scheduler<MeadowEvent>,
}

impl MeadowSession {
    pub fn new(state: MeadowState) -> Self {
        Self {
            state,
            view: MeadowView::Meadow,
            game_animal: None,
            popups: Vec::new(),
            next_popup_id: 1,
            scheduler: Scheduler::new(),
        }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::new(MeadowState::load(store))
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        self.state.save(store);
    }

    pub fn state(&self) -> &MeadowState {
        &self.state
    }

    pub fn view(&self) -> MeadowView {
        self.view
    }

    pub fn game_animal(&self) -> Option<&'static MeadowAnimal> {
        self.game_animal
    }

    pub fn popups(&self) -> &[Popup] {
        &self.popups
    }

    /// Animals still waiting for rescue
    pub fn available_animals(&self) -> Vec<&'static MeadowAnimal> {
        MEADOW_ANIMALS
            .iter()
            .filter(|a| !self.state.is_rescued(a.id))
            .collect()
    }

    pub fn go_to_meadow(&mut self) {
        self.view = MeadowView::Meadow;
        self.game_animal = None;
    }

    /// Open the rescue screen. No-op once every animal is home.
    pub fn go_to_rescue(&mut self, now_ms: f64) -> bool {
        if self.available_animals().is_empty() {
            return false;
        }
        self.view = MeadowView::Rescue;
        self.push_popup("New animals need your help!".to_string(), PopupKind::Rescue, now_ms);
        true
    }

    /// Start the mini-game for an animal still awaiting rescue
    pub fn start_game(&mut self, animal_id: &str) -> bool {
        match find_animal(animal_id) {
            Some(animal) if !self.state.is_rescued(animal.id) => {
                self.game_animal = Some(animal);
                self.view = MeadowView::Game;
                true
            }
            _ => false,
        }
    }

    /// Record a finished mini-game. Caller persists with `save`.
    pub fn complete_rescue(&mut self, animal_id: &str, now_ms: f64) -> bool {
        let Some(animal) = find_animal(animal_id) else {
            log::warn!("Unknown meadow animal {}", animal_id);
            return false;
        };
        if self.state.is_rescued(animal.id) {
            return false;
        }

        self.state.rescued_animals.push(animal.id.to_string());
        match animal.landmark {
            Landmark::Dam => self.state.dam_built = true,
            Landmark::Basket => self.state.basket_placed = true,
            Landmark::Burrow => self.state.burrow_dug = true,
        }
        log::info!("{} rescued ({} total)", animal.name, self.state.rescued_animals.len());

        self.push_popup(
            format!("{} has moved into the meadow!", animal.name),
            PopupKind::Meadow,
            now_ms,
        );
        self.scheduler.schedule(
            now_ms,
            LANDMARK_POPUP_DELAY_MS,
            MeadowEvent::ShowPopup(animal.landmark.message().to_string(), PopupKind::Meadow),
        );
        self.scheduler
            .schedule(now_ms, RETURN_TO_MEADOW_DELAY_MS, MeadowEvent::ReturnToMeadow);
        true
    }

    pub fn dismiss_popup(&mut self, id: u32) {
        self.popups.retain(|p| p.id != id);
    }

    /// Forget all progress, stored record included
    pub fn reset<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, now_ms: f64) {
        self.scheduler.cancel_all();
        self.state = MeadowState::default();
        MeadowState::clear(store);
        self.popups.clear();
        self.go_to_meadow();
        self.push_popup("Meadow has been reset!".to_string(), PopupKind::Meadow, now_ms);
        log::info!("Meadow reset");
    }

    /// Fire due popups and view changes
    pub fn update(&mut self, now_ms: f64) {
        for event in self.scheduler.drain_due(now_ms) {
            match event {
                MeadowEvent::ShowPopup(message, kind) => self.push_popup(message, kind, now_ms),
                MeadowEvent::DismissPopup(id) => self.dismiss_popup(id),
                MeadowEvent::ReturnToMeadow => self.go_to_meadow(),
            }
        }
    }

    /// Cancel everything pending
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.popups.clear();
    }

    fn push_popup(&mut self, message: String, kind: PopupKind, now_ms: f64) {
        let id = self.next_popup_id;
        self.next_popup_id += 1;
        self.popups.push(Popup { id, message, kind });
        self.scheduler
            .schedule(now_ms, POPUP_DURATION_MS, MeadowEvent::DismissPopup(id));
    }
}
