use crate::settings::SettingsError;
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::Tab;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How far a navigation has to progress before the page is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    Load,
    DomContentLoaded,
    /// No network connections for at least 500 ms.
    NetworkIdle0,
    /// At most two network connections for at least 500 ms.
    NetworkIdle2,
}

impl WaitUntil {
    /// Name of the page lifecycle event that marks this milestone.
    pub fn lifecycle_event(self) -> &'static str {
        match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "DOMContentLoaded",
            WaitUntil::NetworkIdle0 => "networkIdle",
            WaitUntil::NetworkIdle2 => "networkAlmostIdle",
        }
    }
}

impl FromStr for WaitUntil {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "load" => Ok(WaitUntil::Load),
            "domcontentloaded" => Ok(WaitUntil::DomContentLoaded),
            "networkidle0" => Ok(WaitUntil::NetworkIdle0),
            "networkidle2" => Ok(WaitUntil::NetworkIdle2),
            _ => Err(SettingsError::UnknownWaitCondition(s.to_string())),
        }
    }
}

/// Lifecycle events seen on the main frame since the current document started.
///
/// A fresh tab reports events for its blank start page, so nothing counts
/// until the first `init` of our own navigation arrives.
#[derive(Debug, Default)]
pub struct LifecycleProgress {
    started: bool,
    events: HashSet<String>,
}

impl LifecycleProgress {
    pub fn record(&mut self, name: &str) {
        if name == "init" {
            self.started = true;
            self.events.clear();
        } else if self.started {
            self.events.insert(name.to_string());
        }
    }

    pub fn reached(&self, wait_until: WaitUntil) -> bool {
        self.started && self.events.contains(wait_until.lifecycle_event())
    }
}

pub fn navigate(
    tab: &Tab,
    url: &str,
    wait_until: WaitUntil,
    timeout: Duration,
) -> anyhow::Result<()> {
    let main_frame = tab.get_target_id().clone();
    let progress = Arc::new(Mutex::new(LifecycleProgress::default()));

    let sink = Arc::clone(&progress);
    let listener = tab.add_event_listener(Arc::new(move |event: &Event| {
        if let Event::PageLifecycleEvent(lifecycle) = event {
            if lifecycle.params.frame_id != main_frame {
                return;
            }
            debug!(event = %lifecycle.params.name, "lifecycle");
            if let Ok(mut progress) = sink.lock() {
                progress.record(&lifecycle.params.name);
            }
        }
    }))?;

    let result = navigate_and_wait(tab, url, wait_until, &progress, timeout);
    tab.remove_event_listener(&listener)?;
    result
}

fn navigate_and_wait(
    tab: &Tab,
    url: &str,
    wait_until: WaitUntil,
    progress: &Mutex<LifecycleProgress>,
    timeout: Duration,
) -> anyhow::Result<()> {
    info!(%url, ?wait_until, "navigating");
    tab.navigate_to(url)?;

    let started = Instant::now();
    loop {
        let reached = progress
            .lock()
            .map_err(|_| anyhow::anyhow!("Lifecycle listener panicked"))?
            .reached(wait_until);
        if reached {
            debug!(elapsed = ?started.elapsed(), "navigation settled");
            return Ok(());
        }
        if started.elapsed() >= timeout {
            anyhow::bail!(
                "Navigation timeout of {} ms exceeded while waiting for `{}`",
                timeout.as_millis(),
                wait_until.lifecycle_event()
            );
        }
        thread::sleep(POLL_INTERVAL);
    }
}
