use anyhow::{Context, Result};
use tessera_engine::codec::decode_xpm42;
use tessera_engine::device::GpuInit;
use tessera_engine::image::pack_rgba;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};
use tessera_engine::Engine;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

const GEM: &str = "\
!XPM42
8 8 4 1 c
. #00000000
o #1B3A8CFF
O #3F7FE0FF
* #E8F4FFFF
..oooo..
.oOOOOo.
oOO**OOo
oO*OO*Oo
oOOOOOOo
oOOOOOOo
.oOOOOo.
..oooo..
";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut engine = Engine::new();
    let compositor = engine.compositor_mut();

    // Background: redrawn every frame by a hook.
    let canvas = compositor.new_image(256, 256)?;
    compositor.place(canvas, 192, 112, 0)?;

    let gem = decode_xpm42(GEM).context("embedded sprite")?;
    let gem = compositor.texture_to_image(&gem)?;
    let bouncer = compositor.place(gem, 0, 0, 2)?;
    for i in 0..8 {
        compositor.place(gem, 16 + i * 24, 16, 1)?;
    }

    // Optional PNG given on the command line.
    if let Some(path) = std::env::args().nth(1) {
        match compositor.load_png_image(&path) {
            Ok(id) => {
                compositor.place(id, 8, 64, 1)?;
            }
            Err(e) => log::warn!("could not load {path}: {e}"),
        }
    }

    engine.loop_hook(move |ctx| {
        let t = ctx.time.elapsed as f32;
        let Some(image) = ctx.compositor.image_mut(canvas) else { return };
        let (w, h) = (image.width() as u32, image.height() as u32);
        for y in 0..h {
            for x in 0..w {
                let r = ((x as f32 / w as f32 + t * 0.2).fract() * 255.0) as u8;
                let g = ((y as f32 / h as f32 + t * 0.1).fract() * 255.0) as u8;
                image.put_pixel(x, y, pack_rgba(r, g, 160, 255));
            }
        }
    });

    engine.loop_hook(move |ctx| {
        let t = ctx.time.elapsed as f32;
        if let Some(instance) = ctx.compositor.instance_mut(bouncer) {
            instance.x = (WIDTH as f32 / 2.0 + t.cos() * 200.0) as i32;
            instance.y = (HEIGHT as f32 / 2.0 + (t * 1.3).sin() * 150.0) as i32;
        }
    });

    let config = RuntimeConfig::new("tessera studio", WIDTH, HEIGHT, true);
    Runtime::run(config, GpuInit::default(), &mut engine)?;

    log::info!("{} images still owned at exit", engine.compositor().image_count());
    engine.terminate();
    Ok(())
}
