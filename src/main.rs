#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bouncebox::{sim::BounceSim, EngineBuilder, Key};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut engine = EngineBuilder::with_dimensions(400, 200)
        .title("Bounce".into())
        .build();

    let mut sim = BounceSim::new(engine.height());
    engine.run(move |ctx, frame| {
        sim.step(ctx.width());
        sim.draw(frame);

        if ctx.is_key_just_pressed(Key::Escape) {
            ctx.exit();
        }
    });
}
