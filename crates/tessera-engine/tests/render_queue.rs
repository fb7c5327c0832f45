use tessera_engine::{Compositor, Engine, ImageError, ImageState};

// ── placement lifecycle ───────────────────────────────────────────────────

#[test]
fn two_placements_then_delete_empties_queue() {
    let mut c = Compositor::new();
    let id = c.new_image(10, 10).unwrap();
    assert!(c.render_queue().is_empty());

    c.image_to_window(id, 0, 0).unwrap();
    c.image_to_window(id, 20, 20).unwrap();
    assert_eq!(c.render_queue().len(), 2);
    assert_eq!(c.image(id).unwrap().instance_count(), 2);

    c.delete_image(id).unwrap();
    assert!(c.render_queue().is_empty());
    assert_eq!(c.image_count(), 0);
    assert_eq!(c.state(id), ImageState::Destroyed);
}

#[test]
fn deleting_one_image_keeps_the_others_queued() {
    let mut c = Compositor::new();
    let a = c.new_image(1, 1).unwrap();
    let b = c.new_image(1, 1).unwrap();
    c.image_to_window(a, 0, 0).unwrap();
    c.image_to_window(b, 0, 0).unwrap();
    c.image_to_window(a, 1, 1).unwrap();

    c.delete_image(a).unwrap();
    let remaining: Vec<_> = c.render_queue().entries().iter().map(|e| e.image()).collect();
    assert_eq!(remaining, vec![b]);
    assert_eq!(c.visible_in_paint_order().count(), 1);
}

#[test]
fn pixel_writes_reach_every_instance() {
    let mut c = Compositor::new();
    let id = c.new_image(2, 2).unwrap();
    for x in [0, 10, 20] {
        c.image_to_window(id, x, 0).unwrap();
    }
    c.image_mut(id).unwrap().fill(0xFF00FFFF);

    let colors: Vec<_> = c
        .visible_in_paint_order()
        .map(|item| item.image.pixel(1, 1))
        .collect();
    assert_eq!(colors, vec![Some(0xFF00FFFF); 3]);
}

#[test]
fn paint_order_is_depth_then_placement() {
    let mut c = Compositor::new();
    let bottom = c.new_image(1, 1).unwrap();
    let top = c.new_image(1, 1).unwrap();
    c.place(top, 0, 0, 5).unwrap();
    c.place(bottom, 0, 0, -1).unwrap();
    c.place(bottom, 1, 0, 5).unwrap();

    let order: Vec<_> = c
        .visible_in_paint_order()
        .map(|item| (item.id, item.instance.x))
        .collect();
    assert_eq!(order, vec![(bottom, 0), (top, 0), (bottom, 1)]);
}

// ── stale handles ─────────────────────────────────────────────────────────

#[test]
fn stale_handles_are_rejected_everywhere() {
    let mut c = Compositor::new();
    let id = c.new_image(3, 3).unwrap();
    let inst = c.image_to_window(id, 0, 0).unwrap();
    c.delete_image(id).unwrap();

    assert!(matches!(c.delete_image(id), Err(ImageError::StaleHandle)));
    assert!(matches!(c.place(id, 0, 0, 0), Err(ImageError::StaleHandle)));
    assert!(matches!(c.set_enabled(id, false), Err(ImageError::StaleHandle)));
    assert!(matches!(c.set_instance_depth(inst, 1), Err(ImageError::StaleHandle)));
    assert!(c.instance(inst).is_none());
    assert!(c.image_mut(id).is_none());
}

// ── engine teardown ───────────────────────────────────────────────────────

#[test]
fn engine_terminate_releases_images_and_hooks() {
    let mut engine = Engine::new();
    let ids: Vec<_> = (1..=4u16)
        .map(|n| engine.compositor_mut().new_image(n, n).unwrap())
        .collect();
    for &id in &ids {
        engine.compositor_mut().image_to_window(id, 0, 0).unwrap();
    }
    engine.loop_hook(|_| {});

    engine.terminate();
    assert_eq!(engine.hook_count(), 0);
    assert_eq!(engine.compositor().image_count(), 0);
    assert_eq!(engine.compositor().textures().live_count(), 0);
    assert!(engine.compositor().render_queue().is_empty());
    assert!(ids.iter().all(|&id| engine.compositor().state(id) == ImageState::Destroyed));
}
