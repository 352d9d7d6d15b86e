//! Scene playback engine.
//!
//! Provides [`Scene`], which claims a strip, runs an [`Animation`] on its own
//! worker thread and gives the strip back when it is disposed. The animation
//! itself only describes a single tick; pacing, cancellation and thread
//! management live here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::claim::StripClaim;
use crate::colors::Rgb8;
use crate::strip::{Strip, StripHandle};
use crate::time::StopSignal;
use crate::types::SceneError;

/// Step logic of a scene.
///
/// Implement this to create a new kind of scene. The engine calls
/// [`keep_running`](Animation::keep_running) before every tick and stops the
/// loop once it returns false.
pub trait Animation<S: Strip>: Send + 'static {
    /// Continuation predicate, checked before each tick.
    ///
    /// Defaults to always continuing, for scenes that only end when stopped.
    fn keep_running(&self) -> bool {
        true
    }

    /// Performs one step against the strip.
    ///
    /// Returns how long to wait before the next tick.
    fn tick(&mut self, strip: &mut S) -> Duration;
}

struct Shared<A> {
    animation: Mutex<A>,
    stop: StopSignal,
    running: AtomicBool,
}

impl<A> Shared<A> {
    fn animation(&self) -> MutexGuard<'_, A> {
        self.animation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the running flag when the loop exits, including by panic.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A time-stepped animation bound exclusively to one strip.
///
/// The strip is claimed on construction and released on [`Scene::dispose`]
/// or drop, after the step loop has been stopped and joined.
///
/// # Type Parameters
/// * `S` - Strip driver type
/// * `A` - Animation driving the strip
pub struct Scene<S: Strip, A: Animation<S>> {
    claim: StripClaim<S>,
    shared: Arc<Shared<A>>,
    worker: Option<JoinHandle<()>>,
}

impl<S: Strip, A: Animation<S>> Scene<S, A> {
    /// Claims `strip` and builds the animation from its current color.
    ///
    /// The claim is taken before the color is read, so the starting point
    /// cannot be changed underneath by another scene.
    ///
    /// # Errors
    /// * `AlreadyClaimed` - another live scene owns the strip
    pub fn new(
        strip: &StripHandle<S>,
        build: impl FnOnce(Rgb8) -> A,
    ) -> Result<Self, SceneError> {
        let claim = strip.try_claim()?;
        let animation = build(strip.color());

        Ok(Self {
            claim,
            shared: Arc::new(Shared {
                animation: Mutex::new(animation),
                stop: StopSignal::new(),
                running: AtomicBool::new(false),
            }),
            worker: None,
        })
    }

    /// Launches the step loop on a new thread and returns immediately.
    ///
    /// # Errors
    /// * `AlreadyRunning` - the previous loop has not exited yet
    /// * `Stopped` - the scene was stopped; resume it with `continue_scene`
    /// * `Spawn` - the worker thread could not be created
    pub fn start_play(&mut self) -> Result<(), SceneError> {
        if self.is_running() {
            return Err(SceneError::AlreadyRunning);
        }
        if self.is_stopped() {
            return Err(SceneError::Stopped);
        }
        self.join_worker();

        let shared = Arc::clone(&self.shared);
        let strip = self.claim.strip().clone();

        self.shared.running.store(true, Ordering::Release);
        let spawned = thread::Builder::new()
            .name(format!("scene-{}", strip.id()))
            .spawn(move || play(&shared, &strip));

        match spawned {
            Ok(worker) => {
                self.worker = Some(worker);
                Ok(())
            }
            Err(err) => {
                self.shared.running.store(false, Ordering::Release);
                Err(err.into())
            }
        }
    }

    /// Requests the loop to stop after the current tick. Does not block.
    pub fn stop(&self) {
        debug!(strip = self.strip().id(), "scene stop requested");
        self.shared.stop.stop();
    }

    /// Stops the loop and waits for the worker thread to exit.
    pub fn stop_and_wait(&mut self) {
        self.stop();
        self.join_worker();
    }

    /// Waits for the loop to finish on its own.
    ///
    /// Blocks forever for scenes that never end unless stopped.
    pub fn wait(&mut self) {
        self.join_worker();
    }

    /// Resumes a stopped scene from where it left off.
    ///
    /// The claim is kept and animation progress is not reset.
    ///
    /// # Errors
    /// * `AlreadyRunning` - the previous loop has not exited yet
    /// * `Spawn` - the worker thread could not be created
    pub fn continue_scene(&mut self) -> Result<(), SceneError> {
        if self.is_running() {
            return Err(SceneError::AlreadyRunning);
        }

        self.shared.stop.reset();
        self.start_play()
    }

    /// Stops the loop, joins it and releases the strip.
    pub fn dispose(mut self) {
        self.shutdown();
    }

    /// Returns true while the step loop is active.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Returns true if a stop has been requested and not yet cleared.
    pub fn is_stopped(&self) -> bool {
        self.shared.stop.is_stopped()
    }

    /// The strip this scene drives.
    pub fn strip(&self) -> &StripHandle<S> {
        self.claim.strip()
    }

    /// Runs `f` against the animation state.
    ///
    /// Blocks for at most one tick while the loop is running.
    pub fn with_animation<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        let animation = self.shared.animation();
        f(&*animation)
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(strip = self.strip().id(), "scene worker panicked");
            }
        }
    }

    fn shutdown(&mut self) {
        if self.claim.is_held() {
            self.shared.stop.stop();
            self.join_worker();
            self.claim.release();
        }
    }
}

impl<S: Strip, A: Animation<S>> Drop for Scene<S, A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: Strip, A: Animation<S>> core::fmt::Debug for Scene<S, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("strip", self.strip())
            .field("running", &self.is_running())
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}

fn play<S: Strip, A: Animation<S>>(shared: &Shared<A>, strip: &StripHandle<S>) {
    let _running = RunningGuard(&shared.running);
    debug!(strip = strip.id(), "scene loop started");

    let mut ticks: u64 = 0;
    loop {
        if shared.stop.is_stopped() {
            break;
        }

        let delay = {
            let mut animation = shared.animation();
            if !animation.keep_running() {
                break;
            }
            strip.with_driver(|driver| animation.tick(driver))
        };
        ticks += 1;

        if shared.stop.wait(delay) {
            break;
        }
    }

    debug!(strip = strip.id(), ticks, "scene loop exited");
}
