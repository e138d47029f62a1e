//! The refresh cycle: the appliance's single top-level run.
//!
//! One invocation reads the persisted run state, brings up the network and
//! clock, drives the fetch protocol, renders the month, updates the run
//! state and decides the next power transition. All persisted writes happen
//! before the power directive is returned; nothing here survives the
//! power-down that follows.

use crate::components::display::render::ScreenComposer;
use crate::components::display::Display;
use crate::components::events::{day_buckets, sort_by_start, summary_events};
use crate::components::google_calendar::time::{month_geometry, month_window};
use crate::components::google_calendar::EventSource;
use crate::components::network::{ClockSyncProvider, NetworkProvider};
use crate::components::power::PowerDirective;
use crate::components::state_store::{
    RunState, StateStore, FIRST_RUN_KEY, FIRST_RUN_MARKER, RETRY_KEY,
};
use crate::error::CalResult;
use crate::utils::time::seconds_until_half_past_midnight;
use std::time::Duration;
use tracing::{info, warn};

/// Consecutive-failure count (read at cycle start) that escalates to
/// indefinite sleep: the third failed cycle hibernates.
pub const RETRY_THRESHOLD: u32 = 2;

/// One refresh cycle over the external collaborators
pub struct RefreshCycle<'a> {
    pub network: &'a mut dyn NetworkProvider,
    pub clock: &'a mut dyn ClockSyncProvider,
    pub source: &'a dyn EventSource,
    pub display: &'a mut dyn Display,
    pub store: &'a mut dyn StateStore,
    pub network_timeout: Duration,
    pub clock_sync_timeout: Duration,
}

impl RefreshCycle<'_> {
    /// Run the cycle to completion and return the power transition to take
    pub async fn run(self) -> CalResult<PowerDirective> {
        let Self {
            network,
            clock,
            source,
            display,
            store,
            network_timeout,
            clock_sync_timeout,
        } = self;

        let state = RunState::load(store);
        let cold_start = !state.first_run_completed;
        info!(
            cold_start,
            retry_count = state.retry_count,
            "Refresh cycle started"
        );

        if cold_start {
            let mut screen = ScreenComposer::new(&mut *display);
            screen.draw_splash();
            screen.draw_progress(30, 0, Some("[OK] E-Paper Display"));
        }

        network.init()?;
        network.start()?;
        if let Err(e) = network.wait_connected(network_timeout).await {
            warn!("Network stage failed: {}", e);
            return fail_cycle(display, store, &state);
        }

        if cold_start {
            ScreenComposer::new(&mut *display).draw_progress(60, 1, Some("[OK] WIFI Connected"));
        }

        clock.start_sync()?;
        if let Err(e) = clock.wait_synced(clock_sync_timeout).await {
            // Fails open: render with whatever clock value is available
            warn!("Clock sync incomplete, proceeding with current time: {}", e);
        }
        let now = clock.now();
        let timestamp = now.format("%c").to_string();

        if cold_start {
            ScreenComposer::new(&mut *display).draw_progress(80, 2, Some(&timestamp));
        }

        let window = month_window(now.date_naive());

        let mut events = match source.fetch_month(&mut *store, &window).await {
            Ok(events) => events,
            Err(e) => {
                warn!("Calendar fetch failed: {}", e);
                return fail_cycle(display, store, &state);
            }
        };

        if cold_start {
            ScreenComposer::new(&mut *display).draw_progress(
                100,
                3,
                Some("[OK] Fetching Calendar Events"),
            );
            store.set(FIRST_RUN_KEY, FIRST_RUN_MARKER)?;
        }

        // Any success wipes the failure streak
        store.set(RETRY_KEY, "0")?;

        // Most recently fetched calendar first for slot placement
        events.reverse();

        let geometry = month_geometry(now.date_naive());
        let mut screen = ScreenComposer::new(&mut *display);
        let grid = screen.draw_calendar_base(
            geometry.offset,
            geometry.max_day,
            &geometry.title,
            geometry.today,
        );

        for bucket in day_buckets(&events, &window.start_date, &window.end_date) {
            screen.draw_day_slots(&grid, bucket.day, &bucket.slots);
        }

        screen.draw_summary_frame();

        sort_by_start(&mut events);
        let upcoming = summary_events(&events, &geometry.today_date);
        screen.draw_summary_entries(&upcoming);
        screen.draw_footer(&timestamp);

        let sleep_secs = seconds_until_half_past_midnight(&now.time());
        info!("Refresh cycle complete; next wake in {} s", sleep_secs);
        Ok(PowerDirective::SleepFor(sleep_secs))
    }
}

/// Failure path: clear the warm marker, bump the persisted failure streak
/// and either restart promptly or give up until someone intervenes.
fn fail_cycle(
    display: &mut dyn Display,
    store: &mut dyn StateStore,
    state: &RunState,
) -> CalResult<PowerDirective> {
    ScreenComposer::new(display).draw_fetch_failure();

    store.set(FIRST_RUN_KEY, "")?;
    let failures = state.retry_count;
    store.set(RETRY_KEY, &(failures + 1).to_string())?;

    if failures >= RETRY_THRESHOLD {
        warn!("Retry budget exhausted; hibernating until manual wake");
        Ok(PowerDirective::SleepIndefinitely)
    } else {
        info!(
            "Restarting to retry ({} consecutive failures)",
            failures + 1
        );
        Ok(PowerDirective::Restart)
    }
}
