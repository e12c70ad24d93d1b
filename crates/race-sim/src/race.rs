//! The `Race` orchestrator.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use race_core::{CarId, RaceConfig, RaceRng};
use race_fleet::{Fleet, Standing};
use race_track::RaceSummary;
use tracing::{debug, error, info};

use crate::execution::Units;
use crate::{Circuit, DriveOutcome, ExecutionModel, SimError, SimResult, drive};

/// Seed offset for the start-stagger stream.
const STAGGER_STREAM: u64 = 1;

/// How often `wait_for_completion` looks at unit reports while it waits on
/// the terminal rendezvous.
const REPORT_POLL: Duration = Duration::from_millis(20);

/// What a car unit sends back when it is done.
pub(crate) struct UnitReport {
    car:    CarId,
    result: SimResult<DriveOutcome>,
}

/// One race over one fleet.
///
/// Single use: [`drive_all`](Self::drive_all) may be called once, then
/// [`wait_for_completion`](Self::wait_for_completion) once.
pub struct Race {
    config:  RaceConfig,
    circuit: Arc<Circuit>,
    started: bool,
    units:   Option<Units>,
    reports: Option<Receiver<UnitReport>>,
}

impl Race {
    pub(crate) fn new(circuit: Circuit, config: RaceConfig) -> Self {
        Self { config, circuit: Arc::new(circuit), started: false, units: None, reports: None }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn fleet(&self) -> &Fleet {
        &self.circuit.fleet
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Spawn every car under `model` and release them together.
    ///
    /// Returns once the start gate is open.  Cars are spawned in id order
    /// with a random stagger drawn from `config.stagger_ms`; the gate opens
    /// only after every car has signalled ready, and the ready barrier is
    /// reset in between so it can carry terminal signals.
    ///
    /// # Errors
    ///
    /// [`SimError::AlreadyStarted`] on a second call, or a spawn failure.
    /// After a spawn failure the gate is opened anyway so cars already
    /// spawned can run out.
    pub fn drive_all(&mut self, model: ExecutionModel) -> SimResult<()> {
        if self.started {
            return Err(SimError::AlreadyStarted);
        }
        self.started = true;

        let ids = self.circuit.fleet.ids();
        let (tx, rx) = mpsc::channel();
        let mut units = Units::new(model, ids.len())?;
        let mut stagger = RaceRng::new(self.config.seed).child(STAGGER_STREAM);
        info!(cars = ids.len(), %model, "spawning cars");

        for (i, &car) in ids.iter().enumerate() {
            if i > 0 {
                let pause: u64 = stagger.gen_range(self.config.stagger_ms.clone());
                if pause > 0 {
                    thread::sleep(Duration::from_millis(pause));
                }
            }
            if let Err(e) = self.spawn_unit(&mut units, car, tx.clone()) {
                error!(%car, error = %e, "spawn failed, releasing cars already on the grid");
                drop(tx);
                return Err(self.abandon_start(units, rx, e));
            }
        }
        drop(tx);

        self.circuit.ready.await_all_ready(&ids)?;
        self.circuit.ready.reset();
        self.units = Some(units);
        self.reports = Some(rx);

        self.circuit.gate.open();
        debug!("start gate open");
        Ok(())
    }

    /// Block until every car has retired, then return the race summary.
    ///
    /// The end of the race is the terminal rendezvous on the ready barrier.
    /// While waiting on it the unit reports are polled, so a car that failed
    /// before the start (whose signal the start reset wiped) ends the wait
    /// instead of hanging it.  The remaining reports are then drained and
    /// every unit joined.
    ///
    /// # Errors
    ///
    /// [`SimError::NotStarted`] before [`drive_all`](Self::drive_all); the
    /// first error any car unit reported (including
    /// [`SimError::AgentPanicked`]); or [`SimError::Incomplete`] if some
    /// unit never reported.
    pub fn wait_for_completion(&mut self) -> SimResult<RaceSummary> {
        let reports = self.reports.take().ok_or(SimError::NotStarted)?;
        let ids = self.circuit.fleet.ids();
        let mut tally = ReportTally::default();

        'rendezvous: loop {
            if self.circuit.ready.await_all_ready_timeout(&ids, REPORT_POLL)? {
                debug!("every car signalled a terminal state");
                break;
            }
            loop {
                match reports.try_recv() {
                    Ok(report) => tally.record(report),
                    Err(TryRecvError::Empty) => break,
                    // Every unit is gone; the barrier cannot fill any more.
                    Err(TryRecvError::Disconnected) => break 'rendezvous,
                }
            }
            if tally.failure.is_some() {
                break;
            }
        }

        // Ends once every unit has dropped its sender.
        for report in reports {
            tally.record(report);
        }
        if let Some(units) = self.units.take() {
            units.join();
        }

        if let Some(e) = tally.failure {
            return Err(e);
        }
        if tally.reported != ids.len() {
            return Err(SimError::Incomplete { reported: tally.reported, expected: ids.len() });
        }
        self.circuit.intersection.summary().ok_or(SimError::MissingSummary)
    }

    /// Finishers ordered by position; crashed cars are excluded.
    pub fn results(&self) -> Vec<Standing> {
        self.circuit.fleet.standings()
    }

    /// [`drive_all`](Self::drive_all) then
    /// [`wait_for_completion`](Self::wait_for_completion).
    pub fn run(&mut self, model: ExecutionModel) -> SimResult<RaceSummary> {
        self.drive_all(model)?;
        self.wait_for_completion()
    }

    /// Start the unit that drives `car`; it reports back on `reports`.
    pub(crate) fn spawn_unit(&self, units: &mut Units, car: CarId, reports: Sender<UnitReport>) -> SimResult<()> {
        let circuit = Arc::clone(&self.circuit);
        units.spawn(car, move || run_unit(&circuit, car, &reports))
    }

    /// Release the cars already spawned after a failed start and keep their
    /// units and reports, so [`wait_for_completion`](Self::wait_for_completion)
    /// still drains and joins them.
    pub(crate) fn abandon_start(&mut self, units: Units, reports: Receiver<UnitReport>, cause: SimError) -> SimError {
        self.started = true;
        self.circuit.gate.open();
        self.units = Some(units);
        self.reports = Some(reports);
        cause
    }
}

// ── Car units ─────────────────────────────────────────────────────────────────

/// Outcomes collected from car units.
#[derive(Default)]
struct ReportTally {
    reported: usize,
    failure:  Option<SimError>,
}

impl ReportTally {
    fn record(&mut self, report: UnitReport) {
        self.reported += 1;
        match report.result {
            Ok(outcome) => debug!(car = %report.car, ?outcome, "car retired"),
            Err(e) => {
                self.failure.get_or_insert(e);
            }
        }
    }
}

fn run_unit(circuit: &Circuit, car: CarId, reports: &Sender<UnitReport>) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| drive(circuit, car)))
        .unwrap_or_else(|payload| Err(SimError::AgentPanicked { car, message: panic_message(payload.as_ref()) }));
    if let Err(e) = &result {
        error!(%car, error = %e, "car unit failed");
    }
    // The receiver only goes away if the race itself was dropped.
    let _ = reports.send(UnitReport { car, result });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
