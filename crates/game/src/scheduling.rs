use bevy::prelude::*;

pub mod sets {
    #![allow(non_camel_case_types)]
    use bevy::prelude::*;

    #[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
    pub struct RETROWAVE_Viewpoint;

    #[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
    pub struct RETROWAVE_Generate;

    #[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
    pub struct RETROWAVE_Wireframe;

    #[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
    pub struct RETROWAVE_Present;
}

/// Scrolling and generation step on the fixed clock; presentation follows
/// once per rendered frame in `Update`.
pub fn configure(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            sets::RETROWAVE_Viewpoint,
            sets::RETROWAVE_Generate.after(sets::RETROWAVE_Viewpoint),
            sets::RETROWAVE_Wireframe.after(sets::RETROWAVE_Generate),
        ),
    );
    app.configure_sets(Update, sets::RETROWAVE_Present);
}
