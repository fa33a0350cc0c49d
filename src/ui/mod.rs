//! Heads-up display with the current city's numbers and key hints.

use bevy::prelude::*;

use crate::pipeline::CitySummary;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, update_hud.run_if(resource_changed::<CitySummary>));
    }
}

// Colors
const PANEL_BG: Color = Color::srgba(1.0, 1.0, 1.0, 0.75);
const TEXT_COLOR: Color = Color::srgb(0.12, 0.14, 0.13);
const ERROR_COLOR: Color = Color::srgb(0.75, 0.15, 0.12);
const MUTED_TEXT: Color = Color::srgb(0.45, 0.5, 0.47);

/// Marker for the summary text.
#[derive(Component)]
struct SummaryText;

/// Marker for the error line.
#[derive(Component)]
struct ErrorText;

fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                padding: UiRect::axes(Val::Px(14.0), Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Loading activity..."),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                SummaryText,
            ));
            panel.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(ERROR_COLOR),
                ErrorText,
            ));
            panel.spawn((
                Text::new("drag: orbit | right-drag: pan | wheel: zoom | R: regenerate | F: reset view"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(MUTED_TEXT),
            ));
        });
}

/// Multi-line summary for the HUD.
pub fn summary_lines(summary: &CitySummary) -> String {
    let Some(stats) = &summary.stats else {
        return "Loading activity...".to_string();
    };

    let who = match (&summary.user, summary.demo_seed) {
        (Some(user), _) => user.clone(),
        (None, Some(seed)) => format!("Demo city (seed {seed})"),
        (None, None) => "Contribution city".to_string(),
    };

    let mut lines = vec![
        who,
        format!(
            "{} contributions over {} days ({} active)",
            stats.total, stats.days, stats.active_days
        ),
    ];
    if let Some((date, count)) = &stats.busiest {
        lines.push(format!("Busiest day: {date} with {count}"));
    }
    lines.join("\n")
}

fn update_hud(
    summary: Res<CitySummary>,
    mut summary_text: Query<&mut Text, (With<SummaryText>, Without<ErrorText>)>,
    mut error_text: Query<&mut Text, (With<ErrorText>, Without<SummaryText>)>,
) {
    for mut text in &mut summary_text {
        **text = summary_lines(&summary);
    }
    for mut text in &mut error_text {
        **text = summary.error.clone().unwrap_or_default();
    }
}
