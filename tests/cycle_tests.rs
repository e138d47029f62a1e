use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use kalenteri::components::display::{Display, FontTier, Rect, TextAlign};
use kalenteri::components::google_calendar::time::MonthWindow;
use kalenteri::components::google_calendar::{CalendarEvent, EventSource};
use kalenteri::components::network::{ClockSyncProvider, NetworkProvider};
use kalenteri::components::power::PowerDirective;
use kalenteri::components::state_store::{
    StateStore, ACCESS_TOKEN_KEY, FIRST_RUN_KEY, FIRST_RUN_MARKER, RETRY_KEY,
};
use kalenteri::cycle::RefreshCycle;
use kalenteri::error::{google_calendar_error, CalResult};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory state store standing in for the device's persistent storage
#[derive(Default)]
struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> CalResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Event source that replays scripted per-cycle outcomes
struct ScriptedSource {
    outcomes: Mutex<VecDeque<Option<Vec<CalendarEvent>>>>,
}

impl ScriptedSource {
    fn new(outcomes: Vec<Option<Vec<CalendarEvent>>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    fn succeeding_with(events: Vec<CalendarEvent>) -> Self {
        Self::new(vec![Some(events)])
    }

    fn failing() -> Self {
        Self::new(vec![None])
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn fetch_month(
        &self,
        _store: &mut dyn StateStore,
        _window: &MonthWindow,
    ) -> CalResult<Vec<CalendarEvent>> {
        match self.outcomes.lock().unwrap().pop_front() {
            Some(Some(events)) => Ok(events),
            _ => Err(google_calendar_error("scripted failure")),
        }
    }
}

/// Network that connects as soon as it is started
#[derive(Default)]
struct InstantNetwork;

#[async_trait]
impl NetworkProvider for InstantNetwork {
    fn init(&mut self) -> CalResult<()> {
        Ok(())
    }

    fn start(&mut self) -> CalResult<()> {
        Ok(())
    }

    async fn wait_connected(&mut self, _limit: Duration) -> CalResult<()> {
        Ok(())
    }
}

/// Network whose connected condition never fires
#[derive(Default)]
struct DeadNetwork;

#[async_trait]
impl NetworkProvider for DeadNetwork {
    fn init(&mut self) -> CalResult<()> {
        Ok(())
    }

    fn start(&mut self) -> CalResult<()> {
        Ok(())
    }

    async fn wait_connected(&mut self, limit: Duration) -> CalResult<()> {
        Err(kalenteri::error::network_error(&format!(
            "Network not associated within {} s",
            limit.as_secs()
        )))
    }
}

/// Clock pinned to a fixed instant
struct FixedClock {
    now: DateTime<Tz>,
}

impl FixedClock {
    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            now: chrono_tz::UTC
                .with_ymd_and_hms(year, month, day, hour, minute, second)
                .unwrap(),
        }
    }
}

#[async_trait]
impl ClockSyncProvider for FixedClock {
    fn start_sync(&mut self) -> CalResult<()> {
        Ok(())
    }

    async fn wait_synced(&mut self, _limit: Duration) -> CalResult<()> {
        Ok(())
    }

    fn now(&self) -> DateTime<Tz> {
        self.now
    }
}

/// Display that records every directive for assertions
#[derive(Debug, PartialEq)]
enum Op {
    Text(String),
    InvertedText(String),
    Progress(u8),
    Fill(Rect),
    Outline(Rect),
    Commit,
}

#[derive(Default)]
struct RecordingDisplay {
    ops: Vec<Op>,
}

impl RecordingDisplay {
    fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) | Op::InvertedText(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn progress_values(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl Display for RecordingDisplay {
    fn width(&self) -> i32 {
        825
    }

    fn height(&self) -> i32 {
        1200
    }

    fn draw_text(&mut self, _font: FontTier, _align: TextAlign, _x: i32, _y: i32, text: &str) {
        self.ops.push(Op::Text(text.to_string()));
    }

    fn draw_text_inverted(
        &mut self,
        _font: FontTier,
        _align: TextAlign,
        _x: i32,
        _y: i32,
        text: &str,
    ) {
        self.ops.push(Op::InvertedText(text.to_string()));
    }

    fn draw_progress_bar(&mut self, _x: i32, _y: i32, percent: u8) {
        self.ops.push(Op::Progress(percent));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(Op::Fill(rect));
    }

    fn outline_rect(&mut self, rect: Rect) {
        self.ops.push(Op::Outline(rect));
    }

    fn commit(&mut self) {
        self.ops.push(Op::Commit);
    }
}

fn all_day_event(start: &str, end: &str, organizer: &str, summary: &str) -> CalendarEvent {
    CalendarEvent {
        summary: summary.to_string(),
        description: String::new(),
        creator_email: String::new(),
        organizer_display_name: organizer.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        is_all_day: true,
    }
}

async fn run_cycle(
    store: &mut MemoryStore,
    source: &ScriptedSource,
    display: &mut RecordingDisplay,
    clock: &mut FixedClock,
) -> PowerDirective {
    let mut network = InstantNetwork;

    let cycle = RefreshCycle {
        network: &mut network,
        clock,
        source,
        display,
        store,
        network_timeout: Duration::from_secs(1),
        clock_sync_timeout: Duration::from_secs(1),
    };

    cycle.run().await.unwrap()
}

#[tokio::test]
async fn test_cold_start_success_marks_first_run_and_schedules_wake() {
    let mut store = MemoryStore::default();
    let source = ScriptedSource::succeeding_with(vec![all_day_event(
        "2025-03-10",
        "2025-03-11",
        "Mussu",
        "Laundry",
    )]);
    let mut display = RecordingDisplay::default();
    let mut clock = FixedClock::at(2025, 3, 9, 23, 59, 30);

    let directive = run_cycle(&mut store, &source, &mut display, &mut clock).await;

    assert_eq!(directive, PowerDirective::SleepFor(1830));
    assert_eq!(
        store.get(FIRST_RUN_KEY).as_deref(),
        Some(FIRST_RUN_MARKER)
    );
    assert_eq!(store.get(RETRY_KEY).as_deref(), Some("0"));

    // First-run UI ran the whole progress sequence
    assert_eq!(display.progress_values(), vec![0, 30, 60, 80, 100]);

    let texts = display.texts();
    assert!(texts.contains(&"System Loading"));
    assert!(texts.contains(&"March 2025"));
    assert!(texts.contains(&"Upcoming Events"));
    // Day slot shows the organizer prefix
    assert!(texts.contains(&"Muss"));
    // Today's date box is inverted
    assert!(display.ops.contains(&Op::InvertedText("9".to_string())));
    assert!(texts.iter().any(|t| t.starts_with("Updated: ")));
}

#[tokio::test]
async fn test_warm_cycle_skips_first_run_ui() {
    let mut store = MemoryStore::default();
    store.set(FIRST_RUN_KEY, FIRST_RUN_MARKER).unwrap();
    store.set(RETRY_KEY, "0").unwrap();

    let source = ScriptedSource::succeeding_with(vec![]);
    let mut display = RecordingDisplay::default();
    let mut clock = FixedClock::at(2025, 3, 9, 6, 0, 0);

    let directive = run_cycle(&mut store, &source, &mut display, &mut clock).await;

    assert!(matches!(directive, PowerDirective::SleepFor(_)));
    assert!(display.progress_values().is_empty());
    assert!(!display.texts().contains(&"System Loading"));
}

#[tokio::test]
async fn test_three_consecutive_failures_escalate_to_indefinite_sleep() {
    let mut store = MemoryStore::default();
    let mut clock = FixedClock::at(2025, 3, 9, 6, 0, 0);

    // First failure: prompt restart, marker cleared, counter at 1
    let source = ScriptedSource::failing();
    let mut display = RecordingDisplay::default();
    let directive = run_cycle(&mut store, &source, &mut display, &mut clock).await;
    assert_eq!(directive, PowerDirective::Restart);
    assert_eq!(store.get(FIRST_RUN_KEY).as_deref(), Some(""));
    assert_eq!(store.get(RETRY_KEY).as_deref(), Some("1"));
    assert!(display
        .texts()
        .contains(&"[Fail] Fetching Calendar Events"));

    // Second failure: still restarting
    let source = ScriptedSource::failing();
    let mut display = RecordingDisplay::default();
    let directive = run_cycle(&mut store, &source, &mut display, &mut clock).await;
    assert_eq!(directive, PowerDirective::Restart);
    assert_eq!(store.get(RETRY_KEY).as_deref(), Some("2"));

    // Third failure: give up until someone wakes the device
    let source = ScriptedSource::failing();
    let mut display = RecordingDisplay::default();
    let directive = run_cycle(&mut store, &source, &mut display, &mut clock).await;
    assert_eq!(directive, PowerDirective::SleepIndefinitely);
    assert_eq!(store.get(RETRY_KEY).as_deref(), Some("3"));
}

#[tokio::test]
async fn test_success_resets_retry_count() {
    let mut store = MemoryStore::default();
    let mut clock = FixedClock::at(2025, 3, 9, 6, 0, 0);

    let source = ScriptedSource::failing();
    let mut display = RecordingDisplay::default();
    run_cycle(&mut store, &source, &mut display, &mut clock).await;
    assert_eq!(store.get(RETRY_KEY).as_deref(), Some("1"));

    let source = ScriptedSource::succeeding_with(vec![]);
    let mut display = RecordingDisplay::default();
    let directive = run_cycle(&mut store, &source, &mut display, &mut clock).await;
    assert!(matches!(directive, PowerDirective::SleepFor(_)));
    assert_eq!(store.get(RETRY_KEY).as_deref(), Some("0"));
    assert_eq!(
        store.get(FIRST_RUN_KEY).as_deref(),
        Some(FIRST_RUN_MARKER)
    );
}

#[tokio::test]
async fn test_network_timeout_drives_the_retry_counter() {
    let mut store = MemoryStore::default();
    let source = ScriptedSource::succeeding_with(vec![]);
    let mut display = RecordingDisplay::default();
    let mut clock = FixedClock::at(2025, 3, 9, 6, 0, 0);
    let mut network = DeadNetwork;

    let cycle = RefreshCycle {
        network: &mut network,
        clock: &mut clock,
        source: &source,
        display: &mut display,
        store: &mut store,
        network_timeout: Duration::from_millis(10),
        clock_sync_timeout: Duration::from_secs(1),
    };

    let directive = cycle.run().await.unwrap();
    assert_eq!(directive, PowerDirective::Restart);
    assert_eq!(store.get(RETRY_KEY).as_deref(), Some("1"));
    // The scripted outcome was never consumed
    assert_eq!(source.outcomes.lock().unwrap().len(), 1);
    // Nothing touched the cached credential
    assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
}
