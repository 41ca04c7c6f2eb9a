//! # Render Primitives
//!
//! A render primitive is one pluggable piece of per-voxel logic: it may veto
//! drawing a voxel (`occluded`, `hidden`) and it may paint over the block sprite
//! (`draw`). Each primitive type is described by a static [`PrimitiveKind`] and
//! every use of it in a mode is a [`PrimitiveInstance`] owning its own state.
//!
//! ## Lifecycle
//! 1. The kind's `allocate` function creates default-initialized state
//! 2. If the kind declares [`Hooks::START`], `start` configures it from the
//!    descriptor's options; an error discards the state without calling `finish`
//! 3. The instance answers queries and draws for as long as its mode lives
//! 4. [`PrimitiveInstance::destroy`] calls `finish` (if declared) exactly once
//!    and drops the state

use bitflags::bitflags;
use cgmath::Point3;
use image::{GrayImage, RgbaImage};

use super::descriptor::PrimitiveDescriptor;
use super::error::RenderModeError;
use super::registry::PrimitiveRegistry;
use crate::render_state::RenderState;

bitflags! {
    /// The hooks a primitive kind actually implements.
    ///
    /// The engine only calls hooks that are listed here; the trait's default
    /// bodies are never reached for undeclared hooks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Hooks: u8 {
        /// `start` configures the state at construction.
        const START = 1 << 0;
        /// `finish` releases resources at teardown.
        const FINISH = 1 << 1;
        /// `occluded` may veto drawing a voxel.
        const OCCLUDED = 1 << 2;
        /// `hidden` may veto drawing a voxel.
        const HIDDEN = 1 << 3;
        /// `draw` paints over the block sprite.
        const DRAW = 1 << 4;
    }
}

/// Per-instance state and behaviour of a primitive.
///
/// Every method has a no-op default so a primitive only implements the hooks
/// it declares in its kind's [`Hooks`].
pub trait RenderPrimitive {
    /// Configures the primitive from its descriptor.
    ///
    /// # Errors
    /// Any error aborts construction of the whole mode.
    fn start(
        &mut self,
        _state: &mut RenderState,
        _descriptor: &PrimitiveDescriptor,
    ) -> Result<(), RenderModeError> {
        Ok(())
    }

    /// Releases whatever `start` set up. Only called after a successful `start`.
    fn finish(&mut self, _state: &mut RenderState) {}

    /// Returns `true` if the voxel at `position` is fully blocked from view.
    fn occluded(&self, _state: &RenderState, _position: Point3<i32>) -> bool {
        false
    }

    /// Returns `true` if the voxel at `position` must not be drawn.
    fn hidden(&self, _state: &RenderState, _position: Point3<i32>) -> bool {
        false
    }

    /// Paints onto `image` through the block's masks.
    fn draw(
        &mut self,
        _state: &mut RenderState,
        _image: &mut RgbaImage,
        _mask: &GrayImage,
        _mask_light: &GrayImage,
    ) {
    }
}

/// Static description of a primitive type.
///
/// Built with [`PrimitiveKind::of`], usually into a `static`:
///
/// ```
/// use voxel_rendermodes::rendermodes::{Hooks, PrimitiveKind, RenderPrimitive};
///
/// #[derive(Default)]
/// struct Nothing;
/// impl RenderPrimitive for Nothing {}
///
/// static NOTHING: PrimitiveKind = PrimitiveKind::of::<Nothing>("nothing", Hooks::empty());
/// assert_eq!(NOTHING.data_size, 0);
/// ```
#[derive(Debug)]
pub struct PrimitiveKind {
    /// Unique registry key.
    pub name: &'static str,
    /// Size of the per-instance state.
    pub data_size: usize,
    /// Hooks the engine will call.
    pub hooks: Hooks,
    allocate: fn() -> Box<dyn RenderPrimitive>,
}

fn allocate_state<T: RenderPrimitive + Default + 'static>() -> Box<dyn RenderPrimitive> {
    Box::<T>::default()
}

impl PrimitiveKind {
    /// Describes primitive type `T` under `name`, implementing `hooks`.
    pub const fn of<T: RenderPrimitive + Default + 'static>(
        name: &'static str,
        hooks: Hooks,
    ) -> Self {
        Self {
            name,
            data_size: std::mem::size_of::<T>(),
            hooks,
            allocate: allocate_state::<T>,
        }
    }

    /// Returns `true` if this kind implements every hook in `hooks`.
    pub fn implements(&self, hooks: Hooks) -> bool {
        self.hooks.contains(hooks)
    }
}

/// One started primitive inside a render mode.
pub struct PrimitiveInstance {
    kind: &'static PrimitiveKind,
    primitive: Box<dyn RenderPrimitive>,
}

impl PrimitiveInstance {
    /// Resolves, allocates and starts the primitive named by `descriptor`.
    ///
    /// # Errors
    /// - [`RenderModeError::NotFound`] if no kind has that name
    /// - whatever the kind's `start` hook returns; the state is dropped and
    ///   `finish` is not called
    pub fn create(
        registry: &PrimitiveRegistry,
        descriptor: &PrimitiveDescriptor,
        state: &mut RenderState,
    ) -> Result<Self, RenderModeError> {
        let kind = registry.lookup(&descriptor.name)?;
        let mut primitive = (kind.allocate)();

        if kind.implements(Hooks::START) {
            if let Err(err) = primitive.start(state, descriptor) {
                log::debug!("Primitive \"{}\" failed to start: {}", kind.name, err);
                return Err(err);
            }
        }

        log::debug!(
            "Started primitive \"{}\" ({} bytes of state)",
            kind.name,
            kind.data_size
        );
        Ok(Self { kind, primitive })
    }

    /// Finishes the primitive (if its kind has a `finish` hook) and frees its state.
    pub fn destroy(mut self, state: &mut RenderState) {
        if self.kind.implements(Hooks::FINISH) {
            log::trace!("Finishing primitive \"{}\"", self.kind.name);
            self.primitive.finish(state);
        }
    }

    /// The kind this instance was created from.
    pub fn kind(&self) -> &'static PrimitiveKind {
        self.kind
    }

    /// Kind name of this instance.
    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub(crate) fn occluded(&self, state: &RenderState, position: Point3<i32>) -> Option<bool> {
        self.kind
            .implements(Hooks::OCCLUDED)
            .then(|| self.primitive.occluded(state, position))
    }

    pub(crate) fn hidden(&self, state: &RenderState, position: Point3<i32>) -> Option<bool> {
        self.kind
            .implements(Hooks::HIDDEN)
            .then(|| self.primitive.hidden(state, position))
    }

    pub(crate) fn draw(
        &mut self,
        state: &mut RenderState,
        image: &mut RgbaImage,
        mask: &GrayImage,
        mask_light: &GrayImage,
    ) {
        if self.kind.implements(Hooks::DRAW) {
            self.primitive.draw(state, image, mask, mask_light);
        }
    }
}

impl std::fmt::Debug for PrimitiveInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveInstance")
            .field("kind", &self.kind.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static STARTS: Cell<usize> = const { Cell::new(0) };
        static FINISHES: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Default)]
    struct Counted {
        level: i64,
    }

    impl RenderPrimitive for Counted {
        fn start(
            &mut self,
            _state: &mut RenderState,
            descriptor: &PrimitiveDescriptor,
        ) -> Result<(), RenderModeError> {
            STARTS.with(|c| c.set(c.get() + 1));
            self.level = descriptor.option::<i64>("level")?.unwrap_or(1);
            if self.level < 0 {
                return Err(RenderModeError::construction("counted", "negative level"));
            }
            Ok(())
        }

        fn finish(&mut self, _state: &mut RenderState) {
            FINISHES.with(|c| c.set(c.get() + 1));
        }

        fn hidden(&self, _state: &RenderState, position: Point3<i32>) -> bool {
            i64::from(position.y) > self.level
        }
    }

    static COUNTED: PrimitiveKind = PrimitiveKind::of::<Counted>(
        "counted",
        Hooks::START.union(Hooks::FINISH).union(Hooks::HIDDEN),
    );

    static SILENT: PrimitiveKind = PrimitiveKind::of::<Counted>("silent", Hooks::empty());

    fn registry() -> PrimitiveRegistry {
        STARTS.with(|c| c.set(0));
        FINISHES.with(|c| c.set(0));
        PrimitiveRegistry::with_kinds([&COUNTED, &SILENT]).unwrap()
    }

    #[test]
    fn started_instance_is_finished_once_on_destroy() {
        let mut state = RenderState::default();
        let descriptor = PrimitiveDescriptor::new("counted").with_option("level", 3);
        let instance = PrimitiveInstance::create(&registry(), &descriptor, &mut state).unwrap();

        assert_eq!(instance.name(), "counted");
        assert_eq!(instance.kind().data_size, std::mem::size_of::<Counted>());
        assert_eq!(instance.hidden(&state, Point3::new(0, 4, 0)), Some(true));
        assert_eq!(instance.occluded(&state, Point3::new(0, 4, 0)), None);

        instance.destroy(&mut state);
        assert_eq!(STARTS.with(Cell::get), 1);
        assert_eq!(FINISHES.with(Cell::get), 1);
    }

    #[test]
    fn failed_start_is_never_finished() {
        let mut state = RenderState::default();
        let descriptor = PrimitiveDescriptor::new("counted").with_option("level", -1);
        let err = PrimitiveInstance::create(&registry(), &descriptor, &mut state).unwrap_err();

        assert!(matches!(err, RenderModeError::ConstructionFailure { primitive: "counted", .. }));
        assert_eq!(STARTS.with(Cell::get), 1);
        assert_eq!(FINISHES.with(Cell::get), 0);
    }

    #[test]
    fn undeclared_hooks_are_skipped() {
        let mut state = RenderState::default();
        let instance =
            PrimitiveInstance::create(&registry(), &PrimitiveDescriptor::new("silent"), &mut state)
                .unwrap();

        assert_eq!(instance.hidden(&state, Point3::new(0, 100, 0)), None);
        instance.destroy(&mut state);
        assert_eq!(STARTS.with(Cell::get), 0);
        assert_eq!(FINISHES.with(Cell::get), 0);
    }

    #[test]
    fn unknown_kind_is_not_found() {
        let mut state = RenderState::default();
        let err =
            PrimitiveInstance::create(&registry(), &PrimitiveDescriptor::new("nope"), &mut state)
                .unwrap_err();
        assert!(matches!(err, RenderModeError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn option_type_errors_propagate_from_start() {
        let mut state = RenderState::default();
        let descriptor = PrimitiveDescriptor::new("counted").with_option("level", "high");
        let err = PrimitiveInstance::create(&registry(), &descriptor, &mut state).unwrap_err();
        assert!(matches!(err, RenderModeError::TypeMismatch(e) if e.option == "level"));
    }
}
