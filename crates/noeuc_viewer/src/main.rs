use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use noeuc_renderer::{RenderConfig, Renderer};

mod cli;
mod flythrough;
mod logger;
mod output;
mod world;

use cli::Args;
use flythrough::FlyThrough;
use logger::init_logger;
use output::FrameSink;
use world::World;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    log::info!("Starting noeuc viewer");

    let World {
        scene,
        mut camera,
        skybox,
    } = match &args.scene {
        Some(path) => World::load(path)?,
        None => World::demo()?,
    };

    let config = RenderConfig {
        parallel: !args.single_threaded,
    };
    let mut renderer = Renderer::new(args.width, args.height, camera.fov, config);
    let sink = FrameSink::create(&args.output)?;
    let fly = FlyThrough::new(args.yaw_rate);
    let dt = args.frame_time();

    log::info!(
        "Rendering {} frame(s) at {}x{} into {} ({})",
        args.frames,
        args.width,
        args.height,
        sink.dir().display(),
        if config.parallel {
            "parallel"
        } else {
            "single-threaded"
        }
    );

    let mut shader = args.shader;
    let start = Instant::now();

    for index in 0..args.frames {
        let frame_start = Instant::now();
        let pixels = renderer.render(&scene, &camera, shader, &skybox);
        let render_time = frame_start.elapsed();

        sink.write(index, args.width, args.height, pixels)?;
        log::info!(
            "Frame {} ({}) rendered in {:.1} ms",
            index,
            shader,
            render_time.as_secs_f64() * 1000.0
        );

        // Camera and shader changes only happen between frames
        fly.step(&mut camera, dt);
        if args.cycle_shaders {
            shader = shader.next();
        }
    }

    let total = start.elapsed().as_secs_f64();
    if args.frames > 0 {
        log::info!(
            "Done: {} frames in {:.2} s ({:.1} fps)",
            args.frames,
            total,
            args.frames as f64 / total.max(f64::EPSILON)
        );
    }

    Ok(())
}
