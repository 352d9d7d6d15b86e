//! Integration tests for Scene lifecycle and strip ownership

mod common;
use common::*;

use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use rgb_scenes::{CycleFade, FadeToColor, Scene, SceneAction, SceneError};

#[test]
fn second_scene_on_claimed_strip_is_rejected() {
    let strip = mock_strip(GREEN);
    let first = CycleFade::scene(&strip).unwrap();

    let second = FadeToColor::scene(&strip, RED);
    assert!(matches!(second, Err(SceneError::AlreadyClaimed { .. })));

    // Through a cloned handle as well: the claim belongs to the strip.
    let alias = strip.clone();
    assert!(matches!(
        CycleFade::scene(&alias),
        Err(SceneError::AlreadyClaimed { .. })
    ));

    first.dispose();
    assert!(!strip.is_claimed());
    assert!(FadeToColor::scene(&strip, RED).is_ok());
}

#[test]
fn stopping_does_not_release_claim() {
    let strip = mock_strip(GREEN);
    let mut scene = Scene::new(&strip, |_| {
        CycleFade::new().with_interval(Duration::from_millis(5))
    })
    .unwrap();

    scene.start_play().unwrap();
    scene.stop_and_wait();

    assert!(strip.is_claimed());
    assert!(CycleFade::scene(&strip).is_err());
}

#[test]
fn concurrent_construction_yields_one_scene() {
    const CONTENDERS: usize = 8;

    let strip = mock_strip(GREEN);
    let barrier = Barrier::new(CONTENDERS);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CONTENDERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    FadeToColor::scene(&strip, RED)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, SceneError::AlreadyClaimed { .. }))
    );

    drop(results);
    assert!(!strip.is_claimed());
}

#[test]
fn start_play_does_not_block_caller() {
    let strip = mock_strip(GREEN);
    let mut scene = Scene::new(&strip, |_| {
        CycleFade::new().with_interval(Duration::from_secs(60))
    })
    .unwrap();

    scene.start_play().unwrap();
    assert!(scene.is_running());

    // The first tick is written right away; the next one is a minute out.
    assert!(eventually(Duration::from_secs(2), || history(&strip).len() == 1));
    assert!(scene.is_running());

    scene.stop_and_wait();
    assert!(!scene.is_running());
}

#[test]
fn stop_ends_loop_within_one_tick() {
    let interval = Duration::from_millis(50);
    let strip = mock_strip(GREEN);
    let mut scene = Scene::new(&strip, |_| CycleFade::new().with_interval(interval)).unwrap();

    scene.start_play().unwrap();
    thread::sleep(Duration::from_millis(120));

    scene.stop();
    assert!(scene.is_stopped());
    assert!(eventually(interval * 2, || !scene.is_running()));

    let written = history(&strip).len();
    thread::sleep(interval * 2);
    assert_eq!(history(&strip).len(), written);
}

#[test]
fn continue_resumes_where_it_stopped() {
    let target = BLUE;
    let strip = mock_strip(BLACK);
    let mut scene = Scene::new(&strip, |start| {
        FadeToColor::new(start, target).with_duration(Duration::from_secs(2))
    })
    .unwrap();

    scene.start_play().unwrap();
    thread::sleep(Duration::from_millis(100));
    scene.stop_and_wait();

    let paused_at = scene.with_animation(|fade| fade.remaining());
    let color = strip.color();
    assert!(paused_at > 0 && paused_at < 255);
    assert!(color.blue > 0 && color.blue < 255);

    // Nothing moves while stopped.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(strip.color(), color);

    scene.continue_scene().unwrap();
    assert!(!scene.is_stopped());
    scene.wait();

    assert_eq!(strip.color(), target);
    assert_eq!(scene.with_animation(|fade| fade.remaining()), 0);
    // Every tick ran exactly once across both runs.
    assert_eq!(history(&strip).len(), 255);
}

#[test]
fn restart_while_running_is_rejected() {
    let strip = mock_strip(GREEN);
    let mut scene = Scene::new(&strip, |_| {
        CycleFade::new().with_interval(Duration::from_millis(20))
    })
    .unwrap();

    scene.start_play().unwrap();
    scene.stop();
    // The loop may still be mid-wait; either way two loops must never coexist.
    match scene.continue_scene() {
        Ok(()) | Err(SceneError::AlreadyRunning) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }

    scene.stop_and_wait();
    scene.continue_scene().unwrap();
    assert!(matches!(
        scene.continue_scene(),
        Err(SceneError::AlreadyRunning)
    ));
    scene.dispose();
}

#[test]
fn dispose_stops_writer_before_releasing() {
    let strip = mock_strip(GREEN);
    let mut scene = Scene::new(&strip, |_| {
        CycleFade::new().with_interval(Duration::from_millis(2))
    })
    .unwrap();

    scene.start_play().unwrap();
    thread::sleep(Duration::from_millis(30));
    scene.dispose();

    assert!(!strip.is_claimed());
    let written = history(&strip).len();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(history(&strip).len(), written);
}

#[test]
fn actions_dispatch_to_scene_methods() {
    let strip = mock_strip(GREEN);
    let mut scene = Scene::new(&strip, |_| {
        CycleFade::new().with_interval(Duration::from_millis(5))
    })
    .unwrap();

    scene.handle_action(SceneAction::Start).unwrap();
    assert!(scene.is_running());

    scene.handle_action(SceneAction::StopAndWait).unwrap();
    assert!(!scene.is_running());
    assert!(scene.is_stopped());

    scene.handle_action(SceneAction::Continue).unwrap();
    assert!(scene.is_running());
    assert!(matches!(
        scene.handle_action(SceneAction::Start),
        Err(SceneError::AlreadyRunning)
    ));

    scene.handle_action(SceneAction::Stop).unwrap();
    assert!(eventually(Duration::from_secs(1), || !scene.is_running()));
}

#[test]
fn start_after_stop_is_rejected_until_continued() {
    let strip = mock_strip(GREEN);
    let mut scene = Scene::new(&strip, |_| {
        CycleFade::new().with_interval(Duration::from_millis(5))
    })
    .unwrap();

    scene.handle_action(SceneAction::Start).unwrap();
    scene.handle_action(SceneAction::StopAndWait).unwrap();
    let written = history(&strip).len();

    assert!(matches!(
        scene.handle_action(SceneAction::Start),
        Err(SceneError::Stopped)
    ));
    assert!(matches!(scene.start_play(), Err(SceneError::Stopped)));
    assert!(!scene.is_running());
    thread::sleep(Duration::from_millis(30));
    assert_eq!(history(&strip).len(), written);

    scene.handle_action(SceneAction::Continue).unwrap();
    assert!(eventually(Duration::from_secs(1), || history(&strip).len() > written));
    scene.stop_and_wait();
}

#[test]
fn handle_writes_are_refused_while_scene_owns_strip() {
    let strip = mock_strip(GREEN);
    let scene = CycleFade::scene(&strip).unwrap();

    assert!(matches!(
        strip.set_color(RED),
        Err(SceneError::AlreadyClaimed { .. })
    ));
    assert!(history(&strip).is_empty());

    scene.dispose();
    strip.set_color(RED).unwrap();
    assert_eq!(strip.color(), RED);
}
