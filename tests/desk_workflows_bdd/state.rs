//! Scenario state for the desk workflow BDD tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dossier::archives::gateway::test_support::FakeArchivesGateway;
use dossier::notify::test_support::RecordingNotifier;
use dossier::{ArchivesRoom, DeskSettings, RecordRequest, RefreshReport, RequestId};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tokio::runtime::Runtime;

/// Runtime, desk, and the doubles behind it.
///
/// The desk is not `Clone`, so steps take it out of the slot, drive it on
/// the runtime, and put it back.
#[derive(Clone)]
pub(crate) struct DeskWorld {
    runtime: Rc<RefCell<Runtime>>,
    pub(crate) gateway: Arc<FakeArchivesGateway>,
    pub(crate) notifier: Arc<RecordingNotifier>,
}

impl DeskWorld {
    pub(crate) fn new(gateway: FakeArchivesGateway) -> (Self, ArchivesRoom) {
        let runtime = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        let gateway = Arc::new(gateway);
        let notifier = Arc::new(RecordingNotifier::default());
        let room = ArchivesRoom::new(
            Arc::clone(&gateway) as _,
            Arc::clone(&notifier) as _,
            DeskSettings::default(),
        );
        let world = Self {
            runtime: Rc::new(RefCell::new(runtime)),
            gateway,
            notifier,
        };
        (world, room)
    }

    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
pub(crate) struct DeskState {
    pub(crate) world: Slot<DeskWorld>,
    pub(crate) room: Slot<ArchivesRoom>,
    pub(crate) report: Slot<RefreshReport>,
}

impl DeskState {
    pub(crate) fn install(&self, gateway: FakeArchivesGateway) {
        let (world, room) = DeskWorld::new(gateway);
        self.world.set(world);
        self.room.set(room);
    }

    /// Runs `step` against the desk and puts the desk back afterwards.
    pub(crate) fn drive<T>(
        &self,
        step: impl AsyncFnOnce(&mut ArchivesRoom) -> T,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let world = self.world.get().ok_or("desk world must be initialised")?;
        let mut room = self.room.take().ok_or("desk must be initialised")?;
        let output = world.block_on(step(&mut room));
        self.room.set(room);
        Ok(output)
    }
}

/// A record with placeholder patient details.
pub(crate) fn record(id: &str, dossier_number: &str) -> RecordRequest {
    RecordRequest::new(
        RequestId::new(id),
        format!("Patient {id}"),
        dossier_number,
        "Lacoline",
        "10:00",
    )
}
