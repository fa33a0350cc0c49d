//! Contrib City - a year of daily contribution counts as a 3D city.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use contrib_city::data::{ActivitySourceConfig, DataError, DEFAULT_WINDOW_DAYS};
use contrib_city::{app_state, camera, pipeline, render, ui};

#[derive(Parser, Debug)]
#[command(
    name = "contrib-city",
    about = "Render a year of daily contribution counts as a 3D city"
)]
struct Args {
    /// Saved contribution JSON (day list, weekly calendar, or API response).
    /// Without it a demo year is generated.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Username shown in the HUD
    #[arg(short, long)]
    user: Option<String>,

    /// Days kept from the end of the sequence
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    days: usize,

    /// Keep every day in the input instead of trimming to --days
    #[arg(long)]
    full: bool,

    /// Seed for the demo year
    #[arg(long, default_value = "42")]
    seed: u64,
}

impl Args {
    fn into_config(self) -> ActivitySourceConfig {
        ActivitySourceConfig {
            input: self.input,
            user: self.user,
            window: (!self.full).then_some(self.days),
            seed: self.seed,
        }
    }
}

fn main() -> Result<(), DataError> {
    let config = Args::parse().into_config().validated()?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Contrib City".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(config)
        .add_plugins(app_state::AppStatePlugin)
        .add_plugins(camera::CameraPlugin)
        .add_plugins(render::RenderPlugin)
        .add_plugins(pipeline::CityPipelinePlugin)
        .add_plugins(ui::UiPlugin)
        .run();

    Ok(())
}
