//! Regeneration pipeline: activity data -> grid -> city model -> scene.
//!
//! Each regeneration loads activity, folds it into the grid, builds a new
//! model, and hands it to the scene adapter. Building is synchronous and
//! finishes within the frame that requested it.

use bevy::prelude::*;

use crate::app_state::AppState;
use crate::city::{CityModelBuilder, CityStats};
use crate::data::{load_activity, ActivitySourceConfig};
use crate::render::city_scene::CityModelReady;

pub struct CityPipelinePlugin;

impl Plugin for CityPipelinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActivitySourceConfig>()
            .init_resource::<CityBuilder>()
            .init_resource::<CitySummary>()
            .add_event::<RegenerateCity>()
            .add_systems(Startup, request_initial_city)
            .add_systems(Update, (regenerate_controls, regenerate_city).chain());
    }
}

/// Ask for the city to be rebuilt from the current source config.
#[derive(Event, Default)]
pub struct RegenerateCity;

/// Model builder kept between regenerations so textures can be reused.
#[derive(Resource, Default)]
pub struct CityBuilder(pub CityModelBuilder);

/// What the HUD shows about the current city.
#[derive(Resource, Default, Debug, Clone)]
pub struct CitySummary {
    pub user: Option<String>,
    pub stats: Option<CityStats>,
    /// Last intake failure; the previous city stays on screen.
    pub error: Option<String>,
    /// Demo seed, when the data is synthetic.
    pub demo_seed: Option<u64>,
}

fn request_initial_city(mut events: EventWriter<RegenerateCity>) {
    events.send(RegenerateCity);
}

/// R rerolls the demo year, or reloads the input file.
fn regenerate_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut config: ResMut<ActivitySourceConfig>,
    mut events: EventWriter<RegenerateCity>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    if config.input.is_none() {
        config.seed = config.seed.wrapping_add(1);
    }
    events.send(RegenerateCity);
}

fn regenerate_city(
    mut requests: EventReader<RegenerateCity>,
    config: Res<ActivitySourceConfig>,
    mut builder: ResMut<CityBuilder>,
    mut summary: ResMut<CitySummary>,
    mut ready: EventWriter<CityModelReady>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    // Several requests in one frame collapse into one rebuild
    if requests.read().count() == 0 {
        return;
    }

    let activity = match load_activity(&config) {
        Ok(activity) => activity,
        Err(err) => {
            error!("Could not load activity: {err}");
            summary.error = Some(err.to_string());
            return;
        }
    };

    let model = builder.0.build_from_days(&activity.days);
    let stats = model.stats();
    info!(
        "City regenerated: {} buildings, {} contributions",
        stats.days, stats.total
    );

    *summary = CitySummary {
        user: activity.name,
        stats: Some(stats),
        error: None,
        demo_seed: config.input.is_none().then_some(config.seed),
    };
    ready.send(CityModelReady { model });
    next_state.set(AppState::Viewing);
}
