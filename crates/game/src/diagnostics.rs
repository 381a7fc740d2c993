use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::text::{TextColor, TextFont};
use retrowave::systems::strip::{StripStats, TerrainStrip, UploadStats};
use retrowave::systems::wireframe::WireframeBatch;

pub struct DiagnosticsUiPlugin;
impl Plugin for DiagnosticsUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(Startup, setup_ui)
            .add_systems(Update, update_ui);
    }
}

#[derive(Component)]
struct FpsText;
#[derive(Component)]
struct RowsText;
#[derive(Component)]
struct WireText;

fn setup_ui(mut cmds: Commands) {
    cmds.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(12.0),
            top: Val::Px(12.0),
            padding: UiRect::all(Val::Px(8.0)),
            row_gap: Val::Px(4.0),
            flex_direction: FlexDirection::Column,
            ..default()
        },
        BackgroundColor(Color::srgba(0.05, 0.02, 0.08, 0.7)),
    ))
    .with_children(|p| {
        let font = TextFont {
            font_size: 14.0,
            ..default()
        };
        let color = TextColor(Color::WHITE);
        p.spawn((Text::new("FPS: --"), font.clone(), color, FpsText));
        p.spawn((Text::new("Rows: --"), font.clone(), color, RowsText));
        p.spawn((Text::new("Wireframe: --"), font, color, WireText));
    });
}

fn update_ui(
    diagnostics: Res<DiagnosticsStore>,
    strip: Res<TerrainStrip>,
    stats: Res<StripStats>,
    uploads: Res<UploadStats>,
    batches: Query<&WireframeBatch>,
    mut fps: Query<&mut Text, (With<FpsText>, Without<RowsText>, Without<WireText>)>,
    mut rows: Query<&mut Text, (With<RowsText>, Without<FpsText>, Without<WireText>)>,
    mut wire: Query<&mut Text, (With<WireText>, Without<FpsText>, Without<RowsText>)>,
) {
    if let Some(d) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
        if let Some(avg) = d.smoothed() {
            if let Ok(mut text) = fps.single_mut() {
                text.0 = format!("FPS: {:.1}", avg);
            }
        }
    }
    if let Ok(mut text) = rows.single_mut() {
        let generator = strip.0.generator();
        text.0 = format!(
            "Rows: {}..{} ({} shifts, {} verts)",
            generator.back_row(),
            generator.front_row(),
            stats.shifts,
            uploads.vertices
        );
    }
    if let Ok(mut text) = wire.single_mut() {
        let markers: usize = batches.iter().map(|b| b.markers).sum();
        text.0 = format!("Wireframe: {} meshes, {} markers", batches.iter().count(), markers);
    }
}
