//! # Render Modes
//!
//! A render mode is an ordered list of render primitives that together define
//! one rendering style. The tile loop drives it once per voxel:
//!
//! 1. [`RenderMode::occluded`] and [`RenderMode::hidden`] are cheap vetoes; the
//!    first primitive answering `true` decides and the rest are not asked
//! 2. If neither vetoes, [`RenderMode::draw`] runs every drawing primitive in
//!    list order, each one painting over what the previous ones left
//!
//! ## Construction
//!
//! Primitives are started in list order. If any of them cannot be resolved or
//! fails to start, the ones already started are finished (last started first)
//! before the error is returned, so callers only ever see complete modes.
//!
//! ```
//! use cgmath::Point3;
//! use voxel_rendermodes::core::StResource;
//! use voxel_rendermodes::render_state::RenderState;
//! use voxel_rendermodes::rendermodes::{PrimitiveDescriptor, PrimitiveRegistry, RenderMode};
//!
//! let state = StResource::new(RenderState::default());
//! let mode = RenderMode::new(
//!     &[PrimitiveDescriptor::new("depth").with_option("max", 64)],
//!     &PrimitiveRegistry::builtin(),
//!     state.clone(),
//! )
//! .unwrap();
//!
//! assert!(mode.hidden(Point3::new(0, 65, 0)));
//! assert!(!mode.occluded(Point3::new(0, 65, 0)));
//! ```

use std::borrow::Cow;

use cgmath::Point3;
use image::{GrayImage, RgbaImage};
use log::{debug, warn};

use crate::core::StResource;
use crate::render_state::RenderState;

pub mod descriptor;
pub mod error;
pub mod options;
pub mod primitive;
pub mod primitives;
pub mod registry;

pub use descriptor::PrimitiveDescriptor;
pub use error::RenderModeError;
pub use options::{parse_option, OptionBag, OptionTypeError, OptionValue};
pub use primitive::{Hooks, PrimitiveInstance, PrimitiveKind, RenderPrimitive};
pub use registry::{PrimitiveRegistry, BUILTIN_PRIMITIVES};

/// Finishes `instances` last-first against `state`.
fn teardown(state: &StResource<RenderState>, instances: &mut Vec<PrimitiveInstance>) {
    let mut state = state.get_mut();
    while let Some(instance) = instances.pop() {
        instance.destroy(&mut state);
    }
}

/// Primitives started so far while a mode is being built.
///
/// Dropping it before [`StagedPrimitives::promote`] finishes everything it holds.
struct StagedPrimitives {
    state: StResource<RenderState>,
    instances: Vec<PrimitiveInstance>,
}

impl StagedPrimitives {
    fn with_capacity(
        state: StResource<RenderState>,
        slots: usize,
    ) -> Result<Self, RenderModeError> {
        let mut instances = Vec::new();
        instances
            .try_reserve_exact(slots)
            .map_err(|source| RenderModeError::AllocationFailure {
                what: format!("{slots} primitive slots"),
                source,
            })?;
        Ok(Self { state, instances })
    }

    fn promote(mut self) -> Vec<PrimitiveInstance> {
        std::mem::take(&mut self.instances)
    }
}

impl Drop for StagedPrimitives {
    fn drop(&mut self) {
        if self.instances.is_empty() {
            return;
        }
        warn!(
            "Render mode construction failed, finishing {} started primitive(s)",
            self.instances.len()
        );
        teardown(&self.state, &mut self.instances);
    }
}

/// An ordered, fully started composition of render primitives.
///
/// The number and order of primitives never change after construction.
/// Dropping the mode finishes every primitive, last to first.
pub struct RenderMode {
    state: StResource<RenderState>,
    primitives: Vec<PrimitiveInstance>,
}

impl RenderMode {
    /// Builds a mode from `descriptors`, in order.
    ///
    /// # Errors
    /// The first error met while resolving or starting a primitive; every
    /// primitive started before it has been finished by the time it is returned.
    pub fn new(
        descriptors: &[PrimitiveDescriptor],
        registry: &PrimitiveRegistry,
        state: StResource<RenderState>,
    ) -> Result<Self, RenderModeError> {
        Self::build(
            descriptors.iter().map(|descriptor| Ok(Cow::Borrowed(descriptor))),
            registry,
            state,
        )
    }

    /// Builds a mode from a JSON list of descriptors.
    ///
    /// Entries are read as they are reached, so a malformed entry unwinds the
    /// primitives before it just like a failing `start` would.
    ///
    /// # Errors
    /// - [`RenderModeError::SequenceTypeError`] if `mode` is not an array
    /// - [`RenderModeError::InvalidDescriptor`] for an unreadable entry
    /// - anything [`RenderMode::new`] can return
    pub fn from_json(
        mode: &serde_json::Value,
        registry: &PrimitiveRegistry,
        state: StResource<RenderState>,
    ) -> Result<Self, RenderModeError> {
        let entries = mode.as_array().ok_or_else(|| {
            RenderModeError::SequenceTypeError(descriptor::json_kind(mode).to_owned())
        })?;

        Self::build(
            entries.iter().enumerate().map(|(index, entry)| {
                PrimitiveDescriptor::from_json(index, entry).map(Cow::Owned)
            }),
            registry,
            state,
        )
    }

    fn build<'d>(
        descriptors: impl ExactSizeIterator<Item = Result<Cow<'d, PrimitiveDescriptor>, RenderModeError>>,
        registry: &PrimitiveRegistry,
        state: StResource<RenderState>,
    ) -> Result<Self, RenderModeError> {
        let mut staged = StagedPrimitives::with_capacity(state.clone(), descriptors.len())?;

        for descriptor in descriptors {
            let descriptor = descriptor?;
            let instance = {
                let mut state = state.get_mut();
                PrimitiveInstance::create(registry, &descriptor, &mut state)
            };
            staged.instances.push(instance?);
        }

        let primitives = staged.promote();
        debug!(
            "Built render mode [{}]",
            primitives
                .iter()
                .map(PrimitiveInstance::name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self { state, primitives })
    }

    /// Returns `true` if any primitive reports the voxel as occluded.
    ///
    /// Primitives are asked in list order and asking stops at the first `true`.
    pub fn occluded(&self, position: Point3<i32>) -> bool {
        let state = self.state.get();
        self.primitives
            .iter()
            .any(|primitive| primitive.occluded(&state, position).unwrap_or(false))
    }

    /// Returns `true` if any primitive reports the voxel as hidden.
    ///
    /// Primitives are asked in list order and asking stops at the first `true`.
    pub fn hidden(&self, position: Point3<i32>) -> bool {
        let state = self.state.get();
        self.primitives
            .iter()
            .any(|primitive| primitive.hidden(&state, position).unwrap_or(false))
    }

    /// Runs every drawing primitive, in list order, on the same targets.
    pub fn draw(&mut self, image: &mut RgbaImage, mask: &GrayImage, mask_light: &GrayImage) {
        let mut state = self.state.get_mut();
        for primitive in &mut self.primitives {
            primitive.draw(&mut state, image, mask, mask_light);
        }
    }

    /// Finishes every primitive and releases the mode.
    ///
    /// Equivalent to dropping it.
    pub fn destroy(self) {}

    /// Number of primitives in the mode.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` if the mode has no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// The started primitives, in list order.
    pub fn primitives(&self) -> &[PrimitiveInstance] {
        &self.primitives
    }

    /// Kind names of the primitives, in list order.
    pub fn primitive_names(&self) -> Vec<&'static str> {
        self.primitives.iter().map(PrimitiveInstance::name).collect()
    }

    /// The render state shared with the caller.
    pub fn state(&self) -> &StResource<RenderState> {
        &self.state
    }
}

impl Drop for RenderMode {
    fn drop(&mut self) {
        teardown(&self.state, &mut self.primitives);
    }
}

impl std::fmt::Debug for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderMode")
            .field("primitives", &self.primitive_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    thread_local! {
        static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn record(event: String) {
        EVENTS.with(|events| events.borrow_mut().push(event));
    }

    fn take_events() -> Vec<String> {
        EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
    }

    #[derive(Default)]
    struct Tracked {
        label: String,
    }

    impl RenderPrimitive for Tracked {
        fn start(
            &mut self,
            _state: &mut RenderState,
            descriptor: &PrimitiveDescriptor,
        ) -> Result<(), RenderModeError> {
            self.label = descriptor.option::<String>("label")?.unwrap_or_default();
            if descriptor.option::<bool>("fail")?.unwrap_or(false) {
                record(format!("start-failed {}", self.label));
                return Err(RenderModeError::construction("tracked", "asked to fail"));
            }
            record(format!("start {}", self.label));
            Ok(())
        }

        fn finish(&mut self, _state: &mut RenderState) {
            record(format!("finish {}", self.label));
        }
    }

    static TRACKED: PrimitiveKind =
        PrimitiveKind::of::<Tracked>("tracked", Hooks::START.union(Hooks::FINISH));

    fn registry() -> PrimitiveRegistry {
        take_events();
        PrimitiveRegistry::with_kinds([&TRACKED]).unwrap()
    }

    fn tracked(label: &str) -> PrimitiveDescriptor {
        PrimitiveDescriptor::new("tracked").with_option("label", label)
    }

    #[test]
    fn teardown_runs_last_started_first() {
        let registry = registry();
        let mode = RenderMode::new(
            &[tracked("a"), tracked("b"), tracked("c")],
            &registry,
            StResource::default(),
        )
        .unwrap();
        assert_eq!(mode.len(), 3);
        mode.destroy();

        assert_eq!(
            take_events(),
            vec!["start a", "start b", "start c", "finish c", "finish b", "finish a"]
        );
    }

    #[test]
    fn failing_start_unwinds_the_started_prefix() {
        let registry = registry();
        let err = RenderMode::new(
            &[tracked("a"), tracked("b"), tracked("c").with_option("fail", true), tracked("d")],
            &registry,
            StResource::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RenderModeError::ConstructionFailure { primitive: "tracked", .. }));
        assert_eq!(
            take_events(),
            vec!["start a", "start b", "start-failed c", "finish b", "finish a"]
        );
    }

    #[test]
    fn unknown_kind_unwinds_the_started_prefix() {
        let registry = registry();
        let err = RenderMode::new(
            &[tracked("a"), PrimitiveDescriptor::new("missing"), tracked("c")],
            &registry,
            StResource::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RenderModeError::NotFound(name) if name == "missing"));
        assert_eq!(take_events(), vec!["start a", "finish a"]);
    }

    #[test]
    fn json_mode_must_be_a_sequence() {
        let registry = registry();
        let err = RenderMode::from_json(&json!({"name": "tracked"}), &registry, StResource::default())
            .unwrap_err();
        assert!(matches!(err, RenderModeError::SequenceTypeError(found) if found == "object"));
        assert!(take_events().is_empty());
    }

    #[test]
    fn malformed_json_entry_unwinds_the_started_prefix() {
        let registry = registry();
        let err = RenderMode::from_json(
            &json!([{"name": "tracked", "options": {"label": "a"}}, 7]),
            &registry,
            StResource::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RenderModeError::InvalidDescriptor { index: 1, .. }));
        assert_eq!(take_events(), vec!["start a", "finish a"]);
    }

    #[test]
    fn empty_mode_vetoes_nothing() {
        let mode = RenderMode::new(&[], &registry(), StResource::default()).unwrap();
        assert!(mode.is_empty());
        assert!(!mode.occluded(Point3::new(0, 0, 0)));
        assert!(!mode.hidden(Point3::new(0, 0, 0)));
    }

    #[test]
    fn mode_shares_the_callers_state() {
        let state = StResource::default();
        let mode = RenderMode::from_json(&json!(["tracked"]), &registry(), state.clone()).unwrap();
        assert!(mode.state().ptr_eq(&state));
        assert_eq!(mode.primitive_names(), vec!["tracked"]);
    }
}
